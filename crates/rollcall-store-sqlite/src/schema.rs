//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2 PHC string
    created_at    TEXT NOT NULL       -- RFC 3339 UTC
);

-- AUTOINCREMENT: a deleted subject's id is never handed out again.
CREATE TABLE IF NOT EXISTS subjects (
    subject_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users(user_id),
    name          TEXT NOT NULL,
    present_count INTEGER NOT NULL DEFAULT 0,
    total_classes INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    CHECK (present_count >= 0 AND total_classes >= present_count)
);

-- One accepted mark per subject per calendar day.
CREATE TABLE IF NOT EXISTS attendance_records (
    record_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  INTEGER NOT NULL REFERENCES subjects(subject_id),
    date_marked TEXT NOT NULL,        -- YYYY-MM-DD
    status      TEXT NOT NULL,
    UNIQUE (subject_id, date_marked)
);

CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,    -- hex SHA-256 of the cookie token
    user_id      INTEGER NOT NULL REFERENCES users(user_id),
    created_at   TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS subjects_user_idx ON subjects(user_id);
CREATE INDEX IF NOT EXISTS records_date_idx  ON attendance_records(date_marked);

PRAGMA user_version = 1;
";

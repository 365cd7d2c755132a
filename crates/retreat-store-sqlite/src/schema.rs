//! SQL schema for the retreat SQLite store.
//!
//! Executed once at connection startup. Later migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per record. `doc` is the authoritative JSON body; the remaining
-- columns are projections of it, rewritten on every insert and replace.
CREATE TABLE IF NOT EXISTS documents (
    collection         TEXT NOT NULL,
    id                 TEXT NOT NULL,
    doc                TEXT NOT NULL,
    created_at         TEXT NOT NULL,   -- RFC 3339 UTC
    email              TEXT,            -- normalized
    registration_code  TEXT,
    token_digest       TEXT,            -- SHA-256 of the pending token
    spent_token_digest TEXT,            -- digest of the token that confirmed
    role               TEXT,
    is_confirmed       INTEGER NOT NULL DEFAULT 0,
    visible            INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (collection, id)
);

CREATE UNIQUE INDEX IF NOT EXISTS documents_code_uq
    ON documents(collection, registration_code)
    WHERE registration_code IS NOT NULL;

-- Any person record, pending or confirmed, owns its email.
CREATE UNIQUE INDEX IF NOT EXISTS documents_people_email_uq
    ON documents(email)
    WHERE collection = 'people';

-- Pending registrations may repeat an email; confirmed ones may not.
CREATE UNIQUE INDEX IF NOT EXISTS documents_confirmed_registration_email_uq
    ON documents(email)
    WHERE collection = 'registrations' AND is_confirmed = 1;

CREATE INDEX IF NOT EXISTS documents_email_idx   ON documents(collection, email);
CREATE INDEX IF NOT EXISTS documents_token_idx   ON documents(collection, token_digest);
CREATE INDEX IF NOT EXISTS documents_spent_idx   ON documents(collection, spent_token_digest);
CREATE INDEX IF NOT EXISTS documents_role_idx    ON documents(collection, role);
CREATE INDEX IF NOT EXISTS documents_created_idx ON documents(collection, created_at);

PRAGMA user_version = 1;
";

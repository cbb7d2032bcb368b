//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` and are safe to
//! re-run on every server startup.

use sqlx::SqlitePool;

use crate::Result;

/// Apply the worker and sequence counter tables.
///
/// The counter table is constrained to a single row (`id = 1`). Creating
/// the table never creates that row; the allocator seeds it once.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS sequence_counter (
    id              INTEGER PRIMARY KEY NOT NULL CHECK(id = 1),
    last_id         INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS worker (
    id                      TEXT PRIMARY KEY NOT NULL,
    form_no                 TEXT NOT NULL UNIQUE,
    admin_id                TEXT NOT NULL,
    zone                    TEXT,
    status                  TEXT NOT NULL CHECK(status IN ('Pending','Verified')),
    created_at              TEXT NOT NULL,
    photo_url               TEXT,
    scan_link               TEXT,
    designation             TEXT,
    name                    TEXT,
    fh_name                 TEXT,
    dob                     TEXT,
    sex                     TEXT,
    blood_group             TEXT,
    category                TEXT,
    marital_status          TEXT,
    mobile_no               TEXT,
    email                   TEXT,
    communication_address   TEXT,
    address                 TEXT,
    education               TEXT,
    aadhaar_no              TEXT,
    pan_no                  TEXT,
    eshram_no               TEXT,
    acc_name                TEXT,
    acc_no                  TEXT,
    ifsc                    TEXT,
    bank_name               TEXT,
    division                TEXT,
    shed                    TEXT
);

CREATE INDEX IF NOT EXISTS idx_worker_admin ON worker(admin_id);
CREATE INDEX IF NOT EXISTS idx_worker_created ON worker(created_at);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}

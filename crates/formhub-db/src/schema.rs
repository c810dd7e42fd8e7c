//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (admins and employees)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['admin', 'user'];
DEFINE FIELD org_code ON TABLE user TYPE option<string>;
DEFINE FIELD linked_admin ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_org_code ON TABLE user COLUMNS org_code;

-- =======================================================================
-- Org code reservations (record id = the code)
-- =======================================================================
DEFINE TABLE org_code SCHEMAFULL;
DEFINE FIELD admin_id ON TABLE org_code TYPE string;
DEFINE FIELD created_at ON TABLE org_code TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Forms (owned by one admin)
-- =======================================================================
DEFINE TABLE form SCHEMAFULL;
DEFINE FIELD name ON TABLE form TYPE string;
DEFINE FIELD fields ON TABLE form TYPE array<object>;
DEFINE FIELD fields.*.id ON TABLE form TYPE string;
DEFINE FIELD fields.*.kind ON TABLE form TYPE string \
    ASSERT $value IN ['text', 'email', 'textarea'];
DEFINE FIELD fields.*.label ON TABLE form TYPE string;
DEFINE FIELD fields.*.required ON TABLE form TYPE bool DEFAULT false;
DEFINE FIELD created_by ON TABLE form TYPE string;
DEFINE FIELD created_at ON TABLE form TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE form TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_form_owner ON TABLE form COLUMNS created_by;

-- =======================================================================
-- Submissions
-- =======================================================================
DEFINE TABLE submission SCHEMAFULL;
DEFINE FIELD form_id ON TABLE submission TYPE string;
DEFINE FIELD submitted_by ON TABLE submission TYPE string;
DEFINE FIELD answers ON TABLE submission TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD is_edited ON TABLE submission TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE submission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE submission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_submission_form ON TABLE submission COLUMNS form_id;
DEFINE INDEX idx_submission_form_author ON TABLE submission \
    COLUMNS form_id, submitted_by;

-- =======================================================================
-- Revisions (append-only)
-- =======================================================================
DEFINE TABLE revision SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD submission_id ON TABLE revision TYPE string;
DEFINE FIELD edited_by ON TABLE revision TYPE string;
DEFINE FIELD answers ON TABLE revision TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE revision TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_revision_submission ON TABLE revision \
    COLUMNS submission_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

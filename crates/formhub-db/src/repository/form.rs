//! SurrealDB implementation of [`FormRepository`].

use chrono::{DateTime, Utc};
use formhub_core::error::FormHubResult;
use formhub_core::models::form::{CreateForm, FieldKind, Form, FormField, UpdateForm};
use formhub_core::repository::FormRepository;
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

/// Stored shape of a field. `kind` rather than `type` keeps the column
/// clear of the SurrealQL keyword.
#[derive(Debug, Serialize, Deserialize)]
struct StoredField {
    id: String,
    kind: String,
    label: String,
    #[serde(default)]
    required: bool,
}

fn fields_to_value(fields: &[FormField]) -> serde_json::Value {
    serde_json::Value::Array(
        fields
            .iter()
            .map(|f| {
                serde_json::json!({
                    "id": f.id,
                    "kind": f.kind.as_str(),
                    "label": f.label,
                    "required": f.required,
                })
            })
            .collect(),
    )
}

fn fields_from_value(value: serde_json::Value) -> Result<Vec<FormField>, DbError> {
    let stored: Vec<StoredField> = serde_json::from_value(value)
        .map_err(|e| DbError::InvalidRecord(format!("malformed form fields: {e}")))?;
    stored
        .into_iter()
        .map(|f| {
            let kind = FieldKind::parse(&f.kind)
                .ok_or_else(|| DbError::InvalidRecord(format!("unknown field kind: {}", f.kind)))?;
            Ok(FormField {
                id: f.id,
                kind,
                label: f.label,
                required: f.required,
            })
        })
        .collect()
}

#[derive(Debug, SurrealValue)]
struct FormRow {
    name: String,
    fields: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct FormRowWithId {
    record_id: String,
    name: String,
    fields: serde_json::Value,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FormRow {
    fn into_form(self, id: Uuid) -> Result<Form, DbError> {
        Ok(Form {
            id,
            name: self.name,
            fields: fields_from_value(self.fields)?,
            created_by: parse_uuid("created_by", &self.created_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl FormRowWithId {
    fn try_into_form(self) -> Result<Form, DbError> {
        let id = parse_uuid("form id", &self.record_id)?;
        FormRow {
            name: self.name,
            fields: self.fields,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_form(id)
    }
}

/// SurrealDB implementation of the Form repository.
#[derive(Clone)]
pub struct SurrealFormRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFormRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FormRepository for SurrealFormRepository<C> {
    async fn create(&self, input: CreateForm) -> FormHubResult<Form> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('form', $id) SET \
                 name = $name, fields = $fields, created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("fields", fields_to_value(&input.fields)))
            .bind(("created_by", input.created_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<FormRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "form".into(),
            id: id_str,
        })?;

        Ok(row.into_form(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> FormHubResult<Form> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('form', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FormRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "form".into(),
            id: id_str,
        })?;

        Ok(row.into_form(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateForm) -> FormHubResult<Form> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('form', $id) SET \
                 name = $name, fields = $fields, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("fields", fields_to_value(&input.fields)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<FormRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "form".into(),
            id: id_str,
        })?;

        Ok(row.into_form(id)?)
    }

    async fn delete(&self, id: Uuid) -> FormHubResult<()> {
        self.db
            .query("DELETE type::record('form', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_owner(&self, owner: Uuid) -> FormHubResult<Vec<Form>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM form \
                 WHERE created_by = $owner \
                 ORDER BY created_at DESC",
            )
            .bind(("owner", owner.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FormRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_form())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}

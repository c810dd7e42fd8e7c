//! Form domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Textarea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Textarea => "textarea",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(FieldKind::Text),
            "email" => Some(FieldKind::Email),
            "textarea" => Some(FieldKind::Textarea),
            _ => None,
        }
    }
}

/// A single input on a form. The `id` is generated by the client and
/// keys the answers in a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub name: String,
    /// Display order is the order of this list.
    pub fields: Vec<FormField>,
    /// The owning admin.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateForm {
    pub name: String,
    pub fields: Vec<FormField>,
    pub created_by: Uuid,
}

/// Full replacement of a form's editable content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateForm {
    pub name: String,
    pub fields: Vec<FormField>,
}

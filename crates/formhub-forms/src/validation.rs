//! Input validation for form definitions and submission values.
//!
//! Checks run before any write. Every failure is a
//! [`FormHubError::Validation`] carrying a short message for the client.

use std::collections::HashSet;

use formhub_core::error::{FormHubError, FormHubResult};
use formhub_core::models::form::{FieldKind, Form, FormField};
use formhub_core::models::submission::SubmissionValues;

/// Validate a form's name and field list on create and update.
pub fn validate_form_definition(name: &str, fields: &[FormField]) -> FormHubResult<()> {
    if name.trim().is_empty() {
        return Err(FormHubError::validation("form name is required"));
    }
    if fields.is_empty() {
        return Err(FormHubError::validation("a form needs at least one field"));
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.id.trim().is_empty() {
            return Err(FormHubError::validation("every field needs an id"));
        }
        if field.label.trim().is_empty() {
            return Err(FormHubError::validation(format!(
                "field {} needs a label",
                field.id
            )));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(FormHubError::validation(format!(
                "duplicate field id: {}",
                field.id
            )));
        }
    }
    Ok(())
}

/// Validate submitted answers against the form's current fields.
pub fn validate_values(form: &Form, values: &SubmissionValues) -> FormHubResult<()> {
    if values.is_empty() {
        return Err(FormHubError::validation("values are required"));
    }

    if let Some(unknown) = values.keys().find(|key| form.field(key).is_none()) {
        return Err(FormHubError::validation(format!("unknown field: {unknown}")));
    }

    for field in &form.fields {
        let answer = values.get(&field.id).map(|v| v.trim()).unwrap_or_default();
        if answer.is_empty() {
            if field.required {
                return Err(FormHubError::validation(format!(
                    "{} is required",
                    field.label
                )));
            }
            continue;
        }
        if field.kind == FieldKind::Email && !looks_like_email(answer) {
            return Err(FormHubError::validation(format!(
                "{} must be an email address",
                field.label
            )));
        }
    }
    Ok(())
}

/// `local@domain` with both parts present and no whitespace.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

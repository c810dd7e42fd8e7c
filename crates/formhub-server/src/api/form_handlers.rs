//! Form definition endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use formhub_core::models::form::{Form, FormField, UpdateForm};
use serde::Deserialize;
use serde_json::{Value, json};
use surrealdb::Connection;

use crate::api::error::{ApiError, parse_id};
use crate::api::middleware::AuthContext;
use crate::state::AppState;

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct FormRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

pub async fn create_form<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Form>), ApiError> {
    let Json(body) = payload?;
    let form = state
        .forms
        .create_form(&ctx.caller, body.name, body.fields)
        .await?;
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn list_forms<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Form>>, ApiError> {
    Ok(Json(state.forms.list_forms(&ctx.caller).await?))
}

pub async fn get_form<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Form>, ApiError> {
    let form_id = parse_id("form", &id)?;
    Ok(Json(state.forms.get_form(&ctx.caller, form_id).await?))
}

pub async fn update_form<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    payload: Result<Json<FormRequest>, JsonRejection>,
) -> Result<Json<Form>, ApiError> {
    let form_id = parse_id("form", &id)?;
    let Json(body) = payload?;
    let form = state
        .forms
        .update_form(
            &ctx.caller,
            form_id,
            UpdateForm {
                name: body.name,
                fields: body.fields,
            },
        )
        .await?;
    Ok(Json(form))
}

pub async fn delete_form<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let form_id = parse_id("form", &id)?;
    state.forms.delete_form(&ctx.caller, form_id).await?;
    Ok(Json(json!({ "message": "Form deleted successfully" })))
}

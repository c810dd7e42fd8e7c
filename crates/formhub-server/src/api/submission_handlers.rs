//! Submission and revision endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use formhub_core::models::revision::Revision;
use formhub_core::models::submission::{Submission, SubmissionEntry, SubmissionValues};
use serde::Deserialize;
use surrealdb::Connection;

use crate::api::error::{ApiError, parse_id};
use crate::api::middleware::AuthContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValuesRequest {
    #[serde(default)]
    pub values: SubmissionValues,
}

pub async fn create_submission<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let form_id = parse_id("form", &id)?;
    let Json(body) = payload?;
    let submission = state
        .forms
        .create_submission(&ctx.caller, form_id, body.values)
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn list_submissions<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SubmissionEntry>>, ApiError> {
    let form_id = parse_id("form", &id)?;
    Ok(Json(
        state.forms.list_submissions(&ctx.caller, form_id).await?,
    ))
}

pub async fn get_submission<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, ApiError> {
    let submission_id = parse_id("submission", &id)?;
    Ok(Json(
        state
            .forms
            .get_submission(&ctx.caller, submission_id)
            .await?,
    ))
}

pub async fn edit_submission<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> Result<Json<Submission>, ApiError> {
    let submission_id = parse_id("submission", &id)?;
    let Json(body) = payload?;
    Ok(Json(
        state
            .forms
            .edit_submission(&ctx.caller, submission_id, body.values)
            .await?,
    ))
}

pub async fn list_revisions<C: Connection>(
    State(state): State<AppState<C>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Revision>>, ApiError> {
    let submission_id = parse_id("submission", &id)?;
    Ok(Json(
        state
            .forms
            .list_revisions(&ctx.caller, submission_id)
            .await?,
    ))
}

//! Policy graph route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use polidoc_graph::{
    queries::{
        coverages::{CoverageSummary, CoverageTerm},
        forms::{Form, PolicyType, PolicyTypeEntry},
        paragraphs::{CcqList, Paragraph, ParagraphSummary},
    },
    resolve_policy_form, ConnectionStatus, ParagraphQuery,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PolicyFormParams {
    pub policy_form: Option<String>,
}

pub async fn test_connection(
    State(state): State<AppState>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    Ok(Json(state.gateway.test_connection().await?))
}

pub async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<Form>>, ApiError> {
    Ok(Json(state.gateway.list_forms().await?))
}

pub async fn list_policy_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<PolicyTypeEntry>>, ApiError> {
    Ok(Json(state.gateway.list_policy_types().await?))
}

pub async fn list_coverages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    Ok(Json(state.gateway.list_coverages().await?))
}

pub async fn get_policy_type_by_form(
    State(state): State<AppState>,
    Path(form_number): Path<String>,
) -> Result<Json<PolicyType>, ApiError> {
    Ok(Json(state.gateway.get_policy_type_by_form(&form_number).await?))
}

pub async fn list_coverages_by_form(
    State(state): State<AppState>,
    Path(form_number): Path<String>,
) -> Result<Json<Vec<CoverageSummary>>, ApiError> {
    Ok(Json(state.gateway.list_coverages_by_form(&form_number).await?))
}

pub async fn list_coverage_terms(
    State(state): State<AppState>,
    Path((form_number, coverage_code)): Path<(String, String)>,
) -> Result<Json<Vec<CoverageTerm>>, ApiError> {
    let terms = state
        .gateway
        .list_coverage_terms(&form_number, &coverage_code)
        .await?;
    Ok(Json(terms))
}

pub async fn get_ccq_list(
    State(state): State<AppState>,
    Query(params): Query<PolicyFormParams>,
) -> Result<Json<CcqList>, ApiError> {
    let policy_form = resolve_policy_form(params.policy_form.as_deref());
    Ok(Json(state.gateway.get_ccq_list(&policy_form).await?))
}

pub async fn list_all_paragraphs(
    State(state): State<AppState>,
    Query(params): Query<PolicyFormParams>,
) -> Result<Json<Vec<ParagraphSummary>>, ApiError> {
    let policy_form = resolve_policy_form(params.policy_form.as_deref());
    Ok(Json(state.gateway.list_all_paragraphs(&policy_form).await?))
}

/// Malformed bodies are reported as invalid input rather than axum's
/// default rejection.
pub async fn query_paragraphs(
    State(state): State<AppState>,
    body: Result<Json<ParagraphQuery>, JsonRejection>,
) -> Result<Json<Vec<Paragraph>>, ApiError> {
    let Json(query) = body?;
    Ok(Json(state.gateway.query_paragraphs(query).await?))
}

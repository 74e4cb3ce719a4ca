use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::{error, info};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::parsers::{parse_list, parse_order, parse_types, parse_year_range};
use crate::analytics::AnalyticsService;
use crate::domain::{DiscrepancyType, ScatterFilter, TemporalFilter};

pub struct AppState {
    pub service: AnalyticsService,
}

#[derive(Deserialize)]
pub struct RankParams {
    pub n: Option<usize>,
    pub order: Option<String>,
    pub reliable_only: Option<bool>,
}

#[derive(Deserialize)]
pub struct ConsensusParams {
    pub band: Option<f64>,
}

#[derive(Deserialize)]
pub struct TemporalParams {
    pub genres: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

#[derive(Deserialize)]
pub struct ExtremeParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub n: Option<usize>,
}

#[derive(Deserialize)]
pub struct ScatterParams {
    pub genres: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub types: Option<String>,
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.service.overall_stats())
}

pub async fn get_distribution(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.service.type_distribution())
}

pub async fn get_genres(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RankParams>,
) -> impl IntoResponse {
    let order = match parse_order(params.order.as_deref()) {
        Ok(order) => order,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let n = params
        .n
        .unwrap_or(state.service.config().aggregation.default_top_genres);

    respond(
        state
            .service
            .ranked_genres(order, n, params.reliable_only.unwrap_or(false)),
    )
}

pub async fn get_consensus_genres(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConsensusParams>,
) -> impl IntoResponse {
    if params.band.is_some_and(|band| !band.is_finite() || band < 0.0) {
        return (StatusCode::BAD_REQUEST, "band must be a non-negative number").into_response();
    }
    respond(state.service.consensus_genres(params.band))
}

pub async fn get_developers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RankParams>,
) -> impl IntoResponse {
    let order = match parse_order(params.order.as_deref()) {
        Ok(order) => order,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let n = params
        .n
        .unwrap_or(state.service.config().aggregation.default_top_developers);

    respond(state.service.ranked_developers(order, n))
}

pub async fn get_temporal(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TemporalParams>,
) -> impl IntoResponse {
    let filter = TemporalFilter {
        genres: parse_list(params.genres.as_deref()),
        years: parse_year_range(params.from, params.to),
    };
    respond(state.service.temporal_matrix(&filter))
}

pub async fn get_extremes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExtremeParams>,
) -> impl IntoResponse {
    let kind = match params.kind.as_deref().map(str::parse::<DiscrepancyType>) {
        None => DiscrepancyType::Overhyped,
        Some(Ok(kind)) => kind,
        Some(Err(e)) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let n = params
        .n
        .unwrap_or(state.service.config().aggregation.default_extreme_cases);

    respond(state.service.extreme_cases(kind, n))
}

pub async fn get_scatter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScatterParams>,
) -> impl IntoResponse {
    let types = match parse_types(params.types.as_deref()) {
        Ok(types) => types,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let filter = ScatterFilter {
        genres: parse_list(params.genres.as_deref()),
        years: parse_year_range(params.from, params.to),
        types,
    };
    respond(state.service.query_scatter(&filter))
}

pub async fn get_filters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.service.filter_options())
}

pub async fn get_coverage(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.service.coverage())
}

pub async fn admin_reload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = state.service.config().server.admin_token.clone() else {
        return (StatusCode::FORBIDDEN, "Reload disabled").into_response();
    };
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some(format!("Bearer {}", token).as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    info!("Admin triggered reload");
    let reload_state = Arc::clone(&state);
    match tokio::task::spawn_blocking(move || reload_state.service.reload()).await {
        Ok(Ok(())) => (StatusCode::OK, "Reloaded").into_response(),
        Ok(Err(e)) => {
            error!("Reload failed: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Reload Error: {}", e)).into_response()
        }
        Err(e) => {
            error!("Reload task panicked: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn respond(result: Result<Arc<Value>>) -> Response {
    match result {
        Ok(value) => Json(value.as_ref()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

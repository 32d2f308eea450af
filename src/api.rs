//! HTTP API consumed by the dashboard frontend
//!
//! The frontend never talks to the weather or AI providers directly; it
//! renders the JSON state these endpoints produce, so provider credentials
//! stay on the server.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::SkypanelError;
use crate::dashboard::{Dashboard, DashboardView};
use crate::models::LocationQuery;
use crate::views::MapState;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Search input: a city name or a `lat,lon` pair. Empty or missing
    /// falls back to the configured default city.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MapClickRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub text: String,
}

/// Error payload: `alert` carries the user-facing message
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub alert: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/dashboard", get(render_dashboard))
        .route("/dashboard/state", get(dashboard_state))
        .route("/map-click", post(map_click))
        .route("/map-config", get(map_config))
        .route("/ask", post(ask))
        .with_state(dashboard)
}

/// Run a render chain for the given search input
async fn render_dashboard(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<DashboardParams>,
) -> ApiResult<DashboardView> {
    let input = params.q.unwrap_or_default();
    let query = if input.trim().is_empty() {
        dashboard.default_query()
    } else {
        LocationQuery::parse(&input).map_err(|err| reject(&err))?
    };

    let view = dashboard.render(query).await.map_err(|err| reject(&err))?;
    Ok(Json(view))
}

/// Latest committed view without triggering a render
async fn dashboard_state(
    State(dashboard): State<Arc<Dashboard>>,
) -> ApiResult<Option<DashboardView>> {
    Ok(Json(dashboard.current_view().await))
}

/// A click on the map: marker moves, then the coordinate render runs
async fn map_click(
    State(dashboard): State<Arc<Dashboard>>,
    Json(request): Json<MapClickRequest>,
) -> ApiResult<DashboardView> {
    let view = dashboard
        .map_click(request.lat, request.lon)
        .await
        .map_err(|err| reject(&err))?;
    Ok(Json(view))
}

/// Tile layers and center the map widget needs before the first render
async fn map_config(State(dashboard): State<Arc<Dashboard>>) -> Json<MapState> {
    Json(dashboard.map_state().await)
}

/// Manual ask path; rejected with 409 while another ask is in flight
async fn ask(
    State(dashboard): State<Arc<Dashboard>>,
    Json(request): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    match dashboard.ask(&request.prompt).await {
        Ok(text) => Ok(Json(AskResponse { text })),
        Err(err) => Err((
            status_for(&err),
            Json(ApiError {
                alert: match &err {
                    SkypanelError::Ai { message } => format!("Error: {message}"),
                    other => other.user_message(),
                },
            }),
        )),
    }
}

fn reject(err: &SkypanelError) -> (StatusCode, Json<ApiError>) {
    let alert = match err {
        SkypanelError::Fetch { message, .. } => message.clone(),
        other => other.user_message(),
    };
    (status_for(err), Json(ApiError { alert }))
}

fn status_for(err: &SkypanelError) -> StatusCode {
    match err {
        SkypanelError::Validation { .. } => StatusCode::BAD_REQUEST,
        SkypanelError::AiBusy | SkypanelError::Superseded => StatusCode::CONFLICT,
        SkypanelError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SkypanelError::Fetch { .. }
        | SkypanelError::Ai { .. }
        | SkypanelError::Network { .. } => StatusCode::BAD_GATEWAY,
        SkypanelError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&SkypanelError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&SkypanelError::AiBusy), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&SkypanelError::fetch(404, "nope")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_reject_surfaces_fetch_message_as_alert() {
        let err = SkypanelError::fetch(404, "Could not fetch weather data for Nowhere");
        let (status, Json(body)) = reject(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.alert, "Could not fetch weather data for Nowhere");
    }
}

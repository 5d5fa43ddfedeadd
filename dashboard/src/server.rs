use crate::error::DashboardError;
use crate::model::{DashboardView, SummarySort};
use crate::render::{render_error_page, render_page};
use crate::view::{render, DashboardConfig, Selection};
use anyhow::Context;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, SubsecRound, Utc};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Query string of the dashboard page, also posted by the re-run form
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub pipeline: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

impl PageParams {
    fn into_selection(self, rerun_nonce: Option<u64>) -> Result<Selection, DashboardError> {
        let sort = match self.sort {
            Some(column) => SummarySort {
                column: column.parse()?,
                descending: self.desc.unwrap_or(false),
            },
            None => SummarySort::default(),
        };

        Ok(Selection {
            pipeline: self.pipeline,
            sort,
            rerun_nonce,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/rerun", post(rerun_pipeline))
        .route("/api/dashboard", get(dashboard_json))
        .with_state(state)
}

/// Serve the dashboard until the process is stopped.
pub async fn serve(config: DashboardConfig, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    log::info!("Serving dashboard on http://{}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(config)))
        .await
        .context("Dashboard server")?;

    Ok(())
}

pub(crate) async fn dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    let view = render_params(&state, params, None)?;
    Ok(Html(render_page(&view)))
}

pub(crate) async fn rerun_pipeline(
    State(state): State<AppState>,
    Form(params): Form<PageParams>,
) -> Result<Html<String>, AppError> {
    // Every click gets its own draw
    let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let view = render_params(&state, params, Some(nonce))?;
    Ok(Html(render_page(&view)))
}

pub(crate) async fn dashboard_json(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<DashboardView>, AppError> {
    Ok(Json(render_params(&state, params, None)?))
}

fn render_params(
    state: &AppState,
    params: PageParams,
    rerun_nonce: Option<u64>,
) -> Result<DashboardView, AppError> {
    let selection = params.into_selection(rerun_nonce)?;
    log::debug!("Rendering dashboard for {selection:?}");

    Ok(render(&state.config, &selection, render_time())?)
}

/// The history is generated relative to this, truncated to whole seconds.
fn render_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Error returned by the handlers, mapped onto a response status
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<DashboardError>() {
            Some(DashboardError::UnknownPipeline { .. }) => StatusCode::NOT_FOUND,
            Some(DashboardError::UnknownColumn { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            log::error!("Failed to render dashboard: {:?}", self.0);
            "The dashboard could not be rendered".to_string()
        } else {
            log::warn!("Rejected dashboard request: {}", self.0);
            self.0.to_string()
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(render_error_page(title, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SummaryColumn;

    fn state() -> AppState {
        AppState::new(DashboardConfig::default())
    }

    fn params(pipeline: &str) -> PageParams {
        PageParams {
            pipeline: Some(pipeline.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn params_into_selection() {
        let selection = PageParams {
            pipeline: Some("IoT_Load".to_string()),
            sort: Some("avg_duration".to_string()),
            desc: Some(true),
        }
        .into_selection(Some(3))
        .unwrap();

        assert_eq!(Some("IoT_Load"), selection.pipeline.as_deref());
        assert_eq!(SummaryColumn::AvgDuration, selection.sort.column);
        assert!(selection.sort.descending);
        assert_eq!(Some(3), selection.rerun_nonce);

        let selection = PageParams::default().into_selection(None).unwrap();
        assert_eq!(SummarySort::default(), selection.sort);
        assert!(selection.pipeline.is_none());
    }

    #[test]
    fn bad_sort_column() {
        let err = PageParams {
            sort: Some("nope".to_string()),
            ..Default::default()
        }
        .into_selection(None)
        .unwrap_err();
        assert!(matches!(err, DashboardError::UnknownColumn { .. }));
    }

    #[tokio::test]
    async fn page_for_selected_pipeline() {
        let Html(page) = dashboard_page(State(state()), Query(params("Orders_ETL")))
            .await
            .unwrap();
        assert!(page.contains("Re-Run Orders_ETL"));
        assert!(!page.contains("rerun-result"));
    }

    #[tokio::test]
    async fn rerun_shows_acknowledgment() {
        let Html(page) = rerun_pipeline(State(state()), Form(params("Employee_HR")))
            .await
            .unwrap();
        assert!(page.contains("rerun-result"));
        assert!(
            page.contains("Employee_HR re-run executed successfully.")
                || page.contains("Mocked connection error")
        );
    }

    #[tokio::test]
    async fn json_view() {
        let Json(view) = dashboard_json(State(state()), Query(params("Sales_Transform")))
            .await
            .unwrap();
        assert_eq!("Sales_Transform", view.selected);
        assert_eq!(10, view.detail.runs.len());
    }

    #[tokio::test]
    async fn unknown_pipeline_is_not_found() {
        let err = dashboard_page(State(state()), Query(params("Nope")))
            .await
            .unwrap_err();
        assert_eq!(StatusCode::NOT_FOUND, err.into_response().status());
    }

    #[tokio::test]
    async fn unknown_sort_is_bad_request() {
        let err = dashboard_page(
            State(state()),
            Query(PageParams {
                sort: Some("colour".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(StatusCode::BAD_REQUEST, err.into_response().status());
    }
}

//! HTTP front end for the dashboard.

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{future, stream, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::client::RecordSource;
use crate::error::ClientError;
use crate::render::Renderer;
use crate::session::Dashboard;

pub struct DashboardApp {
    pub source: Arc<dyn RecordSource>,
    pub renderer: Renderer,
}

pub type SharedApp = Arc<DashboardApp>;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Index of the tile whose detail modal starts open.
    pub selected: Option<usize>,
}

/// GET / - Streamed page.
///
/// The head and loading indicator go out as soon as the view is mounted; the
/// grid follows once its fetch resolves. If the client goes away first, the
/// body stream is dropped with the view in it, which unmounts the view and
/// discards the pending result.
pub async fn dashboard_page(
    State(app): State<SharedApp>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ClientError> {
    let head = app.renderer.render_head(true)?;
    let mut dashboard = Dashboard::mount(app.source.clone());

    let rest = async move {
        dashboard.settle().await;

        if let Some(index) = query.selected {
            if !dashboard.select(index).await {
                debug!("Ignoring selection of missing tile {}", index);
            }
        }

        dashboard
            .render_body(&app.renderer, &chrono::Local)
            .await
            .inspect_err(|e| error!("Dashboard render failed: {}", e))
    };

    let body = stream::once(future::ready(Ok::<_, ClientError>(head))).chain(stream::once(rest));

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}

pub fn build_router(app: DashboardApp) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(app))
}

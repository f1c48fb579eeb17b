//! Thread snapshot endpoint handlers.
//!
//! Each request fetches a fresh snapshot, groups it, applies the default
//! selection and then any `group`/`state` query overrides.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use herakles_thread_inspector::render::{render_view, summarize, UNAVAILABLE_TEXT};
use herakles_thread_inspector::{StateFilter, ThreadView};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::handlers::health::FOOTER_TEXT;
use crate::state::SharedState;

/// Query parameters accepted by the thread endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub group: Option<String>,
    pub state: Option<String>,
}

fn text_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [("Content-Type", "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Applies query overrides on top of the default selection.
fn apply_query(view: &mut ThreadView, query: &SelectionQuery) -> Result<(), Response> {
    if let Some(state) = query.state.as_deref() {
        let state: StateFilter = state
            .parse()
            .map_err(|e| text_response(StatusCode::BAD_REQUEST, format!("{e}\n")))?;
        view.select_state(state);
    }

    if let Some(group) = query.group.as_deref() {
        view.select_group(group)
            .map_err(|e| text_response(StatusCode::NOT_FOUND, format!("{e}\n")))?;
    }

    Ok(())
}

/// Handler for the /threads endpoint.
#[instrument(skip(state))]
pub async fn threads_handler(
    State(state): State<SharedState>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    debug!("Processing /threads request");
    state.health_stats.record_http_request();

    let (captured_at, mut view) = match state.fresh_view().await {
        Ok(fetched) => fetched,
        Err(_) => {
            return text_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{UNAVAILABLE_TEXT}\n"),
            )
        }
    };

    if let Err(response) = apply_query(&mut view, &query) {
        return response;
    }

    match render_view(&view, captured_at) {
        Ok(body) => text_response(StatusCode::OK, format!("{body}\n{FOOTER_TEXT}\n")),
        Err(e) => text_response(StatusCode::NOT_FOUND, format!("{e}\n")),
    }
}

/// Handler for the /threads/groups endpoint.
#[instrument(skip(state))]
pub async fn groups_handler(
    State(state): State<SharedState>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    debug!("Processing /threads/groups request");
    state.health_stats.record_http_request();

    let (captured_at, mut view) = match state.fresh_view().await {
        Ok(fetched) => fetched,
        Err(_) => {
            return text_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{UNAVAILABLE_TEXT}\n"),
            )
        }
    };

    if let Err(response) = apply_query(&mut view, &query) {
        return response;
    }

    match summarize(&view, captured_at) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => text_response(StatusCode::NOT_FOUND, format!("{e}\n")),
    }
}

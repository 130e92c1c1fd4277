// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! `GET /audit?site=<url>`: runs an audit and streams its progress as
//! server-sent events.

use crate::app::AppState;
use crate::models::audit::{AuditQuery, ErrorResponse};
use crate::models::progress::AuditEvent;
use crate::services::orchestrator::AuditOrchestrator;
use crate::services::progress::progress_channel;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;

/// Events buffered between the audit task and a slow client
const PROGRESS_CHANNEL_CAPACITY: usize = 16;

pub async fn audit_handler(
    State(state): State<AppState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, Json<ErrorResponse>)>
{
    let Query(query) =
        query.map_err(|rejection| error_response(rejection.status(), &rejection.body_text()))?;

    let site = query
        .site()
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Site URL is required."))?
        .to_string();

    let orchestrator = AuditOrchestrator::new(&state.settings, state.auditor.clone())
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    let (progress, events) = progress_channel(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    tokio::spawn(orchestrator.run(site, progress, cancel.clone()));

    // Dropping the response stream (client disconnect) cancels the audit
    let disconnect_guard = cancel.drop_guard();
    let stream = events.into_stream().map(move |event| {
        let _guard = &disconnect_guard;
        Ok(sse_event(&event))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn sse_event(event: &AuditEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to encode audit event");
        Event::default().data(r#"{"error":"Failed to encode audit event"}"#)
    })
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

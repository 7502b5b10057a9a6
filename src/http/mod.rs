// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only HTTP API for the UI layer.
//!
//! Every route answers from a directory snapshot taken at startup; nothing here mutates state.

use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::directory::{Directory, SearchOptions, StreamerRecord};
use crate::embed::{compile, compile_chat, streamer_target, EmbedOptions};
use crate::model::{Streamer, StreamRef};
use crate::ops::{deserialize, serialize};
use crate::reconcile::{OfflinePolicy, Reconciler};
use crate::resolve::{resolve, to_link};
use crate::wall::WallOptions;

/// Fuzzy search results are capped at this many entries.
const RANKED_LIMIT: usize = 20;

#[derive(Debug)]
pub struct ApiState {
    directory: Directory,
    embed: EmbedOptions,
    search: SearchOptions,
    offline_policy: OfflinePolicy,
}

impl ApiState {
    pub fn new(directory: Directory, options: WallOptions) -> Self {
        Self {
            directory,
            embed: options.embed,
            search: options.search,
            offline_policy: options.offline_policy,
        }
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/resolve", get(resolve_input))
        .route("/embed", get(embed_input))
        .route("/wall", get(wall_view))
        .route("/search", get(search_streamers))
        .route("/streamers", get(list_streamers))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, err: impl std::fmt::Display) -> Self {
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct InputParams {
    input: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default)]
    fuzzy: bool,
}

#[derive(Debug, Serialize)]
struct Resolved {
    stream: StreamRef,
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct Embedded {
    url: String,
    source: StreamRef,
    chat: Option<String>,
}

#[derive(Debug, Serialize)]
struct WallView {
    rows: usize,
    columns: usize,
    backend: Option<String>,
    query: String,
    cells: Vec<CellView>,
}

#[derive(Debug, Serialize)]
struct CellView {
    index: usize,
    stream: StreamRef,
    embed: Option<String>,
}

#[derive(Debug, Serialize)]
struct StreamerSummary {
    name: String,
    group: Vec<String>,
    offline: bool,
    target: Option<StreamRef>,
}

impl StreamerSummary {
    fn from_streamer(streamer: &Streamer) -> Self {
        Self {
            name: streamer.name().to_string(),
            group: streamer.group_path().iter().map(ToString::to_string).collect(),
            offline: streamer.is_confirmed_offline(),
            target: streamer_target(streamer),
        }
    }
}

async fn resolve_input(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<InputParams>,
) -> Result<Json<Resolved>, ApiError> {
    let stream = resolve(&params.input, &state.directory)
        .map_err(|err| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err))?;
    let link = to_link(&stream);
    Ok(Json(Resolved { stream, link }))
}

async fn embed_input(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<InputParams>,
) -> Result<Json<Embedded>, ApiError> {
    let stream = resolve(&params.input, &state.directory)
        .map_err(|err| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err))?;
    let embed = compile(&stream, &state.directory, &state.embed)
        .map_err(|err| ApiError::new(StatusCode::NOT_FOUND, err))?;
    let chat = compile_chat(&stream, &state.directory, &state.embed);
    Ok(Json(Embedded { url: embed.url, source: embed.source, chat }))
}

async fn wall_view(
    State(state): State<Arc<ApiState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<WallView>, ApiError> {
    let url_state = deserialize(query.as_deref().unwrap_or_default(), &state.directory)
        .map_err(|err| ApiError::new(StatusCode::BAD_REQUEST, err))?;
    let reconciler = Reconciler::new(state.offline_policy);

    let cells = url_state
        .grid
        .cells()
        .iter()
        .enumerate()
        .map(|(index, stream)| CellView {
            index,
            stream: stream.clone(),
            embed: reconciler
                .embed_for(stream, &state.directory, &state.embed)
                .map(|embed| embed.url),
        })
        .collect();

    Ok(Json(WallView {
        rows: url_state.grid.rows(),
        columns: url_state.grid.columns(),
        backend: url_state.backend.clone(),
        query: serialize(&url_state),
        cells,
    }))
}

async fn search_streamers(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<StreamerSummary>> {
    let found: Vec<&Streamer> = if params.fuzzy {
        state
            .directory
            .search_ranked(&params.q, RANKED_LIMIT, state.search)
            .into_iter()
            .map(|ranked| ranked.streamer)
            .collect()
    } else {
        let terms: Vec<&str> = params.q.split_whitespace().collect();
        state.directory.search(&terms, state.search)
    };
    Json(found.into_iter().map(StreamerSummary::from_streamer).collect())
}

async fn list_streamers(State(state): State<Arc<ApiState>>) -> Json<Vec<StreamerRecord>> {
    Json(state.directory.records())
}

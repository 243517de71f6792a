use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use scrub_config::AdminConfig;
use scrub_core::{
    BatchEngine, BatchOptions, CommentInterceptor, ENABLED_SENTINEL, NewComment, NoProgress,
    OptionStore, RecordLocator, RecordMutator, RecordStore, ScrubGate, WorkSet,
    sanitize_flag_input,
};
use scrub_storage::Storage;

use crate::nonce::{BULK_ACTION, NonceIssuer, SETTINGS_ACTION};
use crate::notice::{self, BulkResult, NoticeParams, SETTINGS_PATH};

#[derive(Deserialize)]
struct BulkParams {
    #[serde(rename = "ip-scrub-run-bulk")]
    run_bulk: Option<String>,
    #[serde(rename = "ip-scrub-nonce")]
    nonce: Option<String>,
}

#[derive(Deserialize)]
struct SettingsForm {
    // Unchecked checkboxes are omitted from the form entirely
    #[serde(rename = "scrub_comment_author_ip", default)]
    value: Option<String>,
    #[serde(rename = "ip-scrub-nonce", default)]
    nonce: Option<String>,
}

pub struct AdminServer {
    pub storage: Storage,
    pub gate: ScrubGate,
    pub locator: RecordLocator,
    pub engine: BatchEngine,
    pub interceptor: CommentInterceptor,
    pub nonces: NonceIssuer,
    pub cli_suggest_threshold: u64,
}

#[derive(Clone)]
struct AppState {
    server: Arc<AdminServer>,
}

impl AdminServer {
    /// Scrub against the same SQLite database the comments live in
    pub fn new(storage: Storage, masked_override: Option<String>, config: &AdminConfig) -> Self {
        let store = Arc::new(storage.clone());
        Self::with_stores(storage, store.clone(), store, masked_override, config)
    }

    /// `storage` only serves comment submission; the flag and scrubbing go
    /// through `records` and `options`.
    pub fn with_stores(
        storage: Storage,
        records: Arc<dyn RecordStore>,
        options: Arc<dyn OptionStore>,
        masked_override: Option<String>,
        config: &AdminConfig,
    ) -> Self {
        let gate = ScrubGate::new(options).with_masked_override(masked_override);
        let mutator = RecordMutator::new(records.clone(), gate.clone());

        Self {
            locator: RecordLocator::new(records, gate.clone()),
            engine: BatchEngine::new(mutator.clone()),
            interceptor: CommentInterceptor::new(mutator),
            nonces: NonceIssuer::new(config.nonce_secret.as_deref(), config.nonce_lifetime_secs),
            cli_suggest_threshold: config.cli_suggest_threshold,
            storage,
            gate,
        }
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", get(handle_info))
            .route(SETTINGS_PATH, get(settings_view).post(settings_update))
            .route(notice::BULK_PATH, get(run_bulk))
            .route("/api/comments", post(submit_comment))
            .layer(TraceLayer::new_for_http())
            .with_state(AppState { server: self })
    }

    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        let app = Arc::new(self).router();

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Admin server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Locate pending comments and scrub them all-or-nothing
    pub async fn bulk_scrub(&self) -> BulkResult {
        let ids = match self.locator.find_pending().await {
            Ok(WorkSet::Empty) => return BulkResult::NoComments,
            Ok(WorkSet::Pending(ids)) => ids,
            Err(e) => {
                error!(error = %e, "bulk cleanup could not read comments");
                return BulkResult::QueryError;
            }
        };

        match self
            .engine
            .run_batch(&ids, BatchOptions::fail_fast(), &mut NoProgress)
            .await
        {
            Ok(outcome) => BulkResult::Success {
                count: outcome.succeeded,
            },
            Err(e) => {
                error!(code = e.code(), error = %e, "bulk cleanup failed");
                BulkResult::UpdateError
            }
        }
    }
}

/// GET handler for server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "scrub",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /settings - flag, masked address, pending count and bulk action link
async fn settings_view(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Json<serde_json::Value> {
    let server = &state.server;

    let pending = match server.locator.count_pending().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "could not count pending comments");
            None
        }
    };

    let bulk_link = pending
        .filter(|count| *count > 0)
        .map(|_| notice::bulk_url(&server.nonces.create(BULK_ACTION)));
    let suggest_cli = pending.is_some_and(|count| count > server.cli_suggest_threshold);

    Json(serde_json::json!({
        "enabled": server.gate.is_enabled().await,
        "flag": server.gate.enabled_label().await,
        "masked_ip": server.gate.masked_value(),
        "pending": pending,
        "bulk_link": bulk_link,
        "suggest_cli": suggest_cli,
        "settings_nonce": server.nonces.create(SETTINGS_ACTION),
        "notice": params.notice(),
    }))
}

/// POST /settings - save the checkbox
async fn settings_update(State(state): State<AppState>, Form(form): Form<SettingsForm>) -> Response {
    if !nonce_valid(&state.server.nonces, SETTINGS_ACTION, form.nonce.as_deref()) {
        return nonce_rejected();
    }

    let value = sanitize_flag_input(form.value.as_deref().unwrap_or_default());

    match state.server.gate.set_enabled(value == ENABLED_SENTINEL).await {
        Ok(()) => {
            info!(value, "scrub setting saved");
            Redirect::to(&notice::settings_url(&[("settings-updated", "true")])).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// GET /settings/bulk - confirmed, nonce-checked bulk cleanup
async fn run_bulk(State(state): State<AppState>, Query(params): Query<BulkParams>) -> Response {
    if params.run_bulk.as_deref() != Some("yes") {
        return Redirect::to(SETTINGS_PATH).into_response();
    }

    if !nonce_valid(&state.server.nonces, BULK_ACTION, params.nonce.as_deref()) {
        return nonce_rejected();
    }

    let result = state.server.bulk_scrub().await;
    Redirect::to(&result.redirect_url()).into_response()
}

fn nonce_valid(nonces: &NonceIssuer, action: &str, nonce: Option<&str>) -> bool {
    nonce.is_some_and(|nonce| nonces.verify(action, nonce))
}

fn nonce_rejected() -> Response {
    (
        StatusCode::FORBIDDEN,
        "There was an error validating the nonce.",
    )
        .into_response()
}

/// POST /api/comments - persist a comment through the write-path interceptor
async fn submit_comment(
    State(state): State<AppState>,
    Json(mut comment): Json<NewComment>,
) -> Response {
    let server = &state.server;

    if comment.content.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Comment content is required").into_response();
    }

    server.interceptor.preprocess(&mut comment).await;

    let stored = match server.storage.insert_comment(&comment).await {
        Ok(stored) => stored,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let stored = match server.interceptor.confirm(stored.id, &stored.author_ip).await {
        Ok(true) => match server.storage.get_comment(stored.id).await {
            Ok(reloaded) => reloaded,
            Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        },
        Ok(false) => stored,
        Err(e) => {
            warn!(id = %stored.id, error = %e, "could not confirm masked address");
            stored
        }
    };

    (StatusCode::CREATED, Json(stored)).into_response()
}

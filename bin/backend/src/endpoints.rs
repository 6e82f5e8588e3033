use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use medichat_agent::{AgentError, AnswerEngine};
use medichat_backend::{render_history, SessionStore, HISTORY_WINDOW};

use crate::cookie::CookieSigner;

const MAX_MESSAGE_CHARS: usize = 1000;
const TOO_LONG_REPLY: &str = "Message too long. Please keep it under 1000 characters.";
const INTERNAL_ERROR_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

#[derive(Clone)]
pub(crate) struct AppState {
    pub engine: Arc<dyn AnswerEngine>,
    pub sessions: Arc<SessionStore>,
    pub signer: Arc<CookieSigner>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn AnswerEngine>,
        sessions: Arc<SessionStore>,
        signer: CookieSigner,
    ) -> Self {
        Self {
            engine,
            sessions,
            signer: Arc::new(signer),
            started_at: Utc::now(),
        }
    }
}

pub(crate) fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/get", get(chat_get).post(chat_post))
        .route("/clear", post(clear_history))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .with_state(state)
}

#[derive(Deserialize)]
pub(crate) struct ChatParams {
    #[serde(default)]
    msg: String,
}

async fn index_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = state.signer.session_token(&headers);
    let (session_id, is_new) = state.sessions.get_or_create(token.as_deref()).await;

    let mut response = Html(include_str!("../templates/chat.html")).into_response();
    if is_new {
        set_session_cookie(&mut response, &state.signer, &session_id);
    }
    response
}

async fn chat_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ChatParams>,
) -> Response {
    handle_chat(state, headers, params.msg).await
}

async fn chat_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<ChatParams>,
) -> Response {
    handle_chat(state, headers, params.msg).await
}

async fn handle_chat(state: AppState, headers: HeaderMap, msg: String) -> Response {
    let msg = msg.trim().to_string();
    if msg.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Empty message"})),
        )
            .into_response();
    }
    if msg.chars().count() > MAX_MESSAGE_CHARS {
        return (StatusCode::BAD_REQUEST, TOO_LONG_REPLY).into_response();
    }

    let token = state.signer.session_token(&headers);
    let (session_id, is_new) = state.sessions.get_or_create(token.as_deref()).await;

    // History is copied out here; no store lock is held while the external
    // retrieval and generation calls run.
    let history = state.sessions.history(&session_id, HISTORY_WINDOW).await;
    let history_text = render_history(&history);

    tracing::info!(session_id = %session_id, "answering user message");

    match state.engine.answer(&msg, &history_text).await {
        Ok(reply) => {
            state
                .sessions
                .append_exchange(&session_id, msg, reply.clone())
                .await;

            let mut response = reply.into_response();
            if is_new {
                set_session_cookie(&mut response, &state.signer, &session_id);
            }
            response
        }
        Err(err) => {
            // The boundary collapses every internal failure into one generic
            // apology; only the log distinguishes an unavailable dependency
            // from a fault of our own.
            match &err {
                AgentError::ServiceUnavailable { service, .. } => {
                    tracing::error!(service, error = %err, "external service unavailable");
                }
                _ => tracing::error!(error = %err, "failed to answer message"),
            }
            let mut response =
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_REPLY).into_response();
            // The session was registered before the failure; hand the client
            // its cookie so a retry lands in the same session instead of
            // minting an orphan each time.
            if is_new {
                set_session_cookie(&mut response, &state.signer, &session_id);
            }
            response
        }
    }
}

async fn clear_history(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let cleared = match state.signer.session_token(&headers) {
        Some(token) => state.sessions.clear(&token).await,
        None => false,
    };

    if cleared {
        Json(json!({"status": "success", "message": "Conversation history cleared"}))
    } else {
        Json(json!({"status": "error", "message": "No active session"}))
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "active_sessions": state.sessions.active_sessions().await,
    }))
}

async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "active_sessions": state.sessions.active_sessions().await,
        "total_conversations": state.sessions.total_exchanges().await,
        // Start time rather than a duration; the field name matches the
        // original surface.
        "uptime": state.started_at.to_rfc3339(),
    }))
}

fn set_session_cookie(response: &mut Response, signer: &CookieSigner, session_id: &str) {
    if let Ok(value) = header::HeaderValue::from_str(&signer.set_cookie_value(session_id)) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

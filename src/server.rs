use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::extract::ExtractionError;
use crate::models::{ChatRequest, ChatResponse, ClassifyRequest, QuestionAnalysis};

const PROCESSING_FAILED_MESSAGE: &str = "Error processing document";

#[derive(Clone)]
struct AppState {
    chat: ChatService,
}

pub fn router(chat: ChatService) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler).fallback(method_not_allowed))
        .route(
            "/api/classify",
            post(classify_handler).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { chat })
}

pub async fn run_server(config: AppConfig, chat: ChatService) -> Result<()> {
    let app = router(chat);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!(
        document = %config.document_path.display(),
        "listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn chat_handler(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = request?;
    let answer = state.chat.answer(request).await?;
    Ok(Json(ChatResponse {
        response: answer.response,
    }))
}

async fn classify_handler(
    State(state): State<AppState>,
    request: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<QuestionAnalysis>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.chat.classifier().analyze(&request.question)))
}

async fn method_not_allowed() -> ApiError {
    ApiError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "Method not allowed".to_string(),
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<ExtractionError> for ApiError {
    fn from(value: ExtractionError) -> Self {
        tracing::error!("error processing request: {}", value);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: PROCESSING_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", value.body_text());
        Self {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

//! API routes for voxopsd

use crate::server::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use voxops_common::{CommandReport, ToolRunner};

type AppStateArc<R> = Arc<AppState<R>>;

pub const BANNER: &str = "Voice DevOps Assistant is Running!";

// ============================================================================
// Index
// ============================================================================

pub fn index_routes<R: ToolRunner + 'static>() -> Router<AppStateArc<R>> {
    Router::new().route("/", get(index))
}

async fn index() -> &'static str {
    BANNER
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub fn health_routes<R: ToolRunner + 'static>() -> Router<AppStateArc<R>> {
    Router::new().route("/api/health", get(health_check::<R>))
}

async fn health_check<R: ToolRunner + 'static>(
    State(state): State<AppStateArc<R>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "voxops".to_string(),
        version: voxops_common::VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Voice commands
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VoiceCommandRequest {
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceCommandResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: CommandReport,
}

pub fn command_routes<R: ToolRunner + 'static>() -> Router<AppStateArc<R>> {
    Router::new().route("/api/voice-command", post(voice_command::<R>))
}

async fn voice_command<R: ToolRunner + 'static>(
    State(state): State<AppStateArc<R>>,
    Json(req): Json<VoiceCommandRequest>,
) -> Json<VoiceCommandResponse> {
    let request_id = Uuid::new_v4();
    info!("[{}] Voice command: '{}'", request_id, req.command);

    let report = state.pipeline.process(&req.command).await;
    info!(
        "[{}] {} -> {}",
        request_id,
        report.intent,
        report.outcome.as_str()
    );

    state.speaker.speak(&report.spoken_text);

    Json(VoiceCommandResponse {
        success: true,
        report,
    })
}

#[cfg(test)]
mod tests {
    use crate::server::{app, AppState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use voxops_common::runner::testing::ScriptedRunner;
    use voxops_common::speech::NullSpeaker;
    use voxops_common::{Config, Invocation, Pipeline};

    fn test_app(runner: ScriptedRunner) -> axum::Router {
        let pipeline = Pipeline::with_runner(&Config::default(), runner);
        app(AppState::new(pipeline, Arc::new(NullSpeaker)))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_command(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/voice-command")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_banner() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_app(ScriptedRunner::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Voice DevOps Assistant is Running!");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let response = test_app(ScriptedRunner::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "voxops");
    }

    #[tokio::test]
    async fn test_voice_command() {
        let app = test_app(ScriptedRunner::new().on(
            "kubectl get pods",
            Invocation::ok("NAME   STATUS\nweb    Running"),
        ));
        let response = app
            .oneshot(post_command(r#"{"command": "show me the pods"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["command"], "show me the pods");
        assert_eq!(json["intent"], "get_pods");
        assert_eq!(json["description"], "Fetching all pods in the cluster");
        assert_eq!(json["outcome"], "ok");
        assert_eq!(json["spokenText"], "Found 1 running items");
        assert!(json["displayText"]
            .as_str()
            .unwrap()
            .starts_with("✅ Found 1 running pod(s)."));
    }

    #[tokio::test]
    async fn test_missing_command_is_empty() {
        let response = test_app(ScriptedRunner::new())
            .oneshot(post_command("{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["command"], "");
        assert_eq!(json["intent"], "unknown");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let response = test_app(ScriptedRunner::new())
            .oneshot(post_command("{not json"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}

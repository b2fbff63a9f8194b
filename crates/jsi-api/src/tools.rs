use std::time::Duration;

use axum::{
    Extension, Json,
    extract::State,
    routing::{MethodRouter, post},
};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use jsi_db::models::NewScanLog;
use jsi_tools::ToolKind;
use jsi_types::api::{Claims, ToolInput};

use crate::auth::AppState;
use crate::error::{ApiError, JsonBody};

/// Run one tool for an authenticated caller.
///
/// Input problems come back as a 200 body `{"error": ...}`; callers branch
/// on the `error` key. Successful results are audited in the background.
pub async fn dispatch(
    state: &AppState,
    claims: &Claims,
    kind: ToolKind,
    input: ToolInput,
) -> Result<Value, ApiError> {
    match state.toolbox.run(kind, &input) {
        Ok(result) => {
            record_scan(state, claims, kind, &input, &result);
            Ok(result)
        }
        Err(e) if e.is_input_error() => {
            debug!("{} rejected input from {}: {}", kind.action(), claims.username, e);
            Ok(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => Err(ApiError::internal("Tool execution failed", e)),
    }
}

/// Append the audit entry off the request path. Failures are logged only.
pub fn record_scan(
    state: &AppState,
    claims: &Claims,
    kind: ToolKind,
    input: &ToolInput,
    result: &Value,
) -> JoinHandle<()> {
    let state = state.clone();
    let user_id = claims.sub.to_string();
    let username = claims.username.clone();
    let target = kind.target(input).map(str::to_string);
    let result = result.to_string();
    let tracker = state.audit_tasks.clone();

    tracker.spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || {
            let log_id = Uuid::new_v4().to_string();
            state.db.insert_scan_log(&NewScanLog {
                id: &log_id,
                user_id: &user_id,
                username: &username,
                tool_type: kind.tag(),
                target: target.as_deref(),
                result: &result,
            })?;
            Ok::<_, anyhow::Error>(username)
        })
        .await;

        match outcome {
            Ok(Ok(username)) => info!("Logged {} for user {}", kind.tag(), username),
            Ok(Err(e)) => error!("Failed to save scan log for {}: {}", kind.tag(), e),
            Err(e) => error!("spawn_blocking join error: {}", e),
        }
    })
}

/// Wait up to `grace` for background audit writes to finish. Returns
/// `false` if some were still running.
pub async fn drain_audit_writes(state: &AppState, grace: Duration) -> bool {
    state.audit_tasks.close();
    let pending = state.audit_tasks.len();
    if pending > 0 {
        info!("Waiting for {} pending scan log writes", pending);
    }
    match tokio::time::timeout(grace, state.audit_tasks.wait()).await {
        Ok(()) => true,
        Err(_) => {
            warn!("{} scan log writes still pending after {:?}", state.audit_tasks.len(), grace);
            false
        }
    }
}

/// `POST /api/tools/...` handler for one tool. Mounted behind `require_auth`.
pub fn tool_route(kind: ToolKind) -> MethodRouter<AppState> {
    post(
        move |State(state): State<AppState>,
              Extension(claims): Extension<Claims>,
              JsonBody(input): JsonBody<ToolInput>| async move {
            dispatch(&state, &claims, kind, input).await.map(Json)
        },
    )
}

/// Path each tool is mounted at.
pub fn tool_path(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Nik => "/api/tools/nik",
        ToolKind::Slik => "/api/tools/slik",
        ToolKind::Phone => "/api/tools/phone",
        ToolKind::DeviceTrack => "/api/tools/track",
        ToolKind::ImeiFraud => "/api/tools/fraud/imei",
        ToolKind::PhoneFraud => "/api/tools/fraud/phone",
        ToolKind::Persona => "/api/tools/persona",
    }
}

//! Single-endpoint transport: `/api?action=<id>`.
//!
//! Shares the auth and dispatch core with the path routes; only the
//! routing convention differs.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use jsi_tools::ToolKind;
use jsi_types::api::{LoginRequest, RegisterRequest, StatusResponse, ToolInput};

use crate::auth::{self, AppState};
use crate::error::{ApiError, QueryParams, parse_body};
use crate::middleware::authenticate;
use crate::{logs, tools};

#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    pub limit: Option<u32>,
}

pub async fn handle_action(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ActionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let action = query.action.as_deref().unwrap_or_default();

    match action {
        "register" => {
            let req: RegisterRequest = parse_body(&body)?;
            let resp = auth::register_user(&state, req).await?;
            return Ok((StatusCode::CREATED, Json(resp)).into_response());
        }
        "login" => {
            let req: LoginRequest = parse_body(&body)?;
            return Ok(Json(auth::login_user(&state, req).await?).into_response());
        }
        _ => {}
    }

    let claims = authenticate(&headers, &state.jwt_secret)?;

    if action == "logs" {
        let entries = logs::list_logs(&state, &claims, query.limit).await?;
        return Ok(Json(entries).into_response());
    }

    match ToolKind::from_action(action) {
        Some(kind) => {
            let input: ToolInput = parse_body(&body)?;
            let result = tools::dispatch(&state, &claims, kind, input).await?;
            Ok(Json(result).into_response())
        }
        None => Ok(Json(StatusResponse {
            status: crate::SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            user: Some(claims.username),
        })
        .into_response()),
    }
}

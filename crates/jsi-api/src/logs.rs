use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use tracing::{error, warn};
use uuid::Uuid;

use jsi_db::models::ScanLogRow;
use jsi_types::api::{Claims, LogQuery, ScanLogResponse};

use crate::auth::AppState;
use crate::error::{ApiError, QueryParams};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

pub async fn get_logs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    QueryParams(query): QueryParams<LogQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(list_logs(&state, &claims, query.limit).await?))
}

/// The caller's own scan history, newest first.
pub async fn list_logs(
    state: &AppState,
    claims: &Claims,
    limit: Option<u32>,
) -> Result<Vec<ScanLogResponse>, ApiError> {
    let db = state.clone();
    let user_id = claims.sub.to_string();
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let rows = tokio::task::spawn_blocking(move || db.db.get_scan_logs_for_user(&user_id, limit))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal("Failed to load scan logs", e)
        })?
        .map_err(|e| ApiError::internal("Failed to load scan logs", e))?;

    Ok(rows.into_iter().map(to_response).collect())
}

fn to_response(row: ScanLogRow) -> ScanLogResponse {
    ScanLogResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt scan log id '{}': {}", row.id, e);
            Uuid::default()
        }),
        result: serde_json::from_str(&row.result).unwrap_or_else(|e| {
            warn!("Corrupt result payload on scan log '{}': {}", row.id, e);
            serde_json::Value::Null
        }),
        timestamp: row
            .timestamp
            .parse::<chrono::DateTime<chrono::Utc>>()
            .or_else(|_| {
                // Rows written outside the default column value may lack a zone.
                chrono::NaiveDateTime::parse_from_str(&row.timestamp, "%Y-%m-%d %H:%M:%S")
                    .map(|ndt| ndt.and_utc())
            })
            .unwrap_or_else(|e| {
                warn!("Corrupt timestamp '{}' on scan log '{}': {}", row.timestamp, row.id, e);
                chrono::DateTime::default()
            }),
        tool_type: row.tool_type,
        target: row.target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(timestamp: &str, result: &str) -> ScanLogRow {
        ScanLogRow {
            id: "8f2b1d6e-6a0e-4a43-9a57-0f6f3c1d2e4b".into(),
            user_id: "u1".into(),
            username: "budi".into(),
            tool_type: "NIK Analysis".into(),
            target: Some("3171012505990001".into()),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }

    #[test]
    fn converts_stored_row() {
        let resp = to_response(row("2026-10-18T08:30:00.125Z", r#"{"gender":"Male"}"#));
        assert_eq!(resp.result["gender"], "Male");
        assert_eq!(resp.timestamp.timestamp_subsec_millis(), 125);
        assert_eq!(resp.tool_type, "NIK Analysis");
    }

    #[test]
    fn accepts_sqlite_datetime_format() {
        let resp = to_response(row("2026-10-18 08:30:00", "{}"));
        assert_eq!(resp.timestamp.to_rfc3339(), "2026-10-18T08:30:00+00:00");
    }

    #[test]
    fn corrupt_payload_degrades_to_null() {
        let resp = to_response(row("2026-10-18T08:30:00Z", "not json"));
        assert!(resp.result.is_null());
    }
}

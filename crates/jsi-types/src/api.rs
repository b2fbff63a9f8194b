use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::Role;

// -- JWT Claims --

/// Claims minted at login and decoded by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

/// Fields are optional so a missing field becomes a 400 with a readable
/// message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

// -- Tools --

/// Union of every field any tool reads. Each tool picks what it needs.
///
/// Fields keep whatever JSON the caller sent. A value of the wrong type is
/// the analyzer's problem, so it surfaces as an inline tool error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub nik: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub imei: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
}

impl ToolInput {
    fn slot(&self, name: InputField) -> Option<&Value> {
        match name {
            InputField::Nik => self.nik.as_ref(),
            InputField::Phone => self.phone.as_ref(),
            InputField::Imei => self.imei.as_ref(),
            InputField::Name => self.name.as_ref(),
        }
    }

    /// The field as a non-empty string. Other JSON types count as absent.
    pub fn field(&self, name: InputField) -> Option<&str> {
        self.slot(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The field exactly as sent, `null` when absent.
    pub fn raw(&self, name: InputField) -> Value {
        self.slot(name).cloned().unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Nik,
    Phone,
    Imei,
    Name,
}

// -- Scan history --

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ScanLogResponse {
    pub id: Uuid,
    pub tool_type: String,
    pub target: Option<String>,
    pub result: serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

// -- Status --

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

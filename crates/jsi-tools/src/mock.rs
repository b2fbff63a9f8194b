//! Fixed-shape mock responders for tools with no real data source yet.

use chrono::{SecondsFormat, Utc};
use jsi_types::api::{InputField, ToolInput};
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::{Analyzer, ToolError};

/// Upper bound (exclusive) of the mock persona risk score.
pub const PERSONA_RISK_CEILING: u32 = 30;

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Falsy values (`null`, `false`, `0`, `""`) count as not given.
fn given(value: Value) -> Option<Value> {
    let falsy = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    (!falsy).then_some(value)
}

#[derive(Serialize)]
struct DeviceTrack {
    phone: Value,
    status: &'static str,
    timestamp: String,
    message: &'static str,
}

pub struct DeviceTrackMock;

impl Analyzer for DeviceTrackMock {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        Ok(serde_json::to_value(DeviceTrack {
            phone: input.raw(InputField::Phone),
            status: "tracked",
            timestamp: now(),
            message: "Device tracking initiated",
        })?)
    }
}

#[derive(Serialize)]
struct ImeiFraud {
    imei: Value,
    status: &'static str,
    risk_level: &'static str,
    blacklisted: bool,
    timestamp: String,
}

pub struct ImeiFraudMock;

impl Analyzer for ImeiFraudMock {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        Ok(serde_json::to_value(ImeiFraud {
            imei: input.raw(InputField::Imei),
            status: "checked",
            risk_level: "low",
            blacklisted: false,
            timestamp: now(),
        })?)
    }
}

#[derive(Serialize)]
struct PhoneFraud {
    phone: Value,
    status: &'static str,
    risk_level: &'static str,
    reported: bool,
    timestamp: String,
}

pub struct PhoneFraudMock;

impl Analyzer for PhoneFraudMock {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        Ok(serde_json::to_value(PhoneFraud {
            phone: input.raw(InputField::Phone),
            status: "checked",
            risk_level: "low",
            reported: false,
            timestamp: now(),
        })?)
    }
}

#[derive(Serialize)]
struct Persona {
    target: Value,
    phone: Value,
    nik: Value,
    analysis: PersonaAnalysis,
    timestamp: String,
}

#[derive(Serialize)]
struct PersonaAnalysis {
    risk_score: u32,
    status: &'static str,
}

/// Risk score is uniform in `[0, PERSONA_RISK_CEILING)`.
pub struct PersonaMock;

impl Analyzer for PersonaMock {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        let risk_score = rand::rng().random_range(0..PERSONA_RISK_CEILING);
        Ok(serde_json::to_value(Persona {
            target: given(input.raw(InputField::Name)).unwrap_or_else(|| Value::from("Unknown")),
            phone: input.raw(InputField::Phone),
            nik: input.raw(InputField::Nik),
            analysis: PersonaAnalysis {
                risk_score,
                status: "analyzed",
            },
            timestamp: now(),
        })?)
    }
}

#[derive(Serialize)]
struct Slik {
    nik: Value,
    status: &'static str,
    credit_status: &'static str,
    timestamp: String,
}

/// Credit-bureau (SLIK) lookup stand-in.
pub struct SlikMock;

impl Analyzer for SlikMock {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        Ok(serde_json::to_value(Slik {
            nik: input.raw(InputField::Nik),
            status: "checked",
            credit_status: "no_records",
            timestamp: now(),
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn device_track_echoes_phone() {
        let input = ToolInput {
            phone: Some("6281212345678".into()),
            ..Default::default()
        };
        let value = DeviceTrackMock.analyze(&input).unwrap();
        assert_eq!(value["phone"], "6281212345678");
        assert_eq!(value["status"], "tracked");
        assert_eq!(value["message"], "Device tracking initiated");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn imei_fraud_shape() {
        let input = ToolInput {
            imei: Some("356938035643809".into()),
            ..Default::default()
        };
        let value = ImeiFraudMock.analyze(&input).unwrap();
        assert_eq!(
            keys(&value),
            ["blacklisted", "imei", "risk_level", "status", "timestamp"]
        );
        assert_eq!(value["blacklisted"], false);
    }

    #[test]
    fn phone_fraud_shape_with_missing_phone() {
        let value = PhoneFraudMock.analyze(&ToolInput::default()).unwrap();
        assert_eq!(
            keys(&value),
            ["phone", "reported", "risk_level", "status", "timestamp"]
        );
        assert!(value["phone"].is_null());
    }

    #[test]
    fn persona_defaults_target_and_bounds_score() {
        for _ in 0..200 {
            let value = PersonaMock.analyze(&ToolInput::default()).unwrap();
            assert_eq!(value["target"], "Unknown");
            let score = value["analysis"]["risk_score"].as_u64().unwrap();
            assert!(score < u64::from(PERSONA_RISK_CEILING));
            assert_eq!(value["analysis"]["status"], "analyzed");
        }
    }

    #[test]
    fn persona_echoes_inputs() {
        let input = ToolInput {
            name: Some("Budi Santoso".into()),
            phone: Some("6281212345678".into()),
            nik: Some("3171012505990001".into()),
            ..Default::default()
        };
        let value = PersonaMock.analyze(&input).unwrap();
        assert_eq!(value["target"], "Budi Santoso");
        assert_eq!(value["phone"], "6281212345678");
        assert_eq!(value["nik"], "3171012505990001");
    }

    #[test]
    fn mocks_echo_values_as_sent() {
        let input = ToolInput {
            phone: Some(json!("")),
            imei: Some(json!(356938035643809u64)),
            ..Default::default()
        };
        let track = DeviceTrackMock.analyze(&input).unwrap();
        assert_eq!(track["phone"], "");
        let fraud = PhoneFraudMock.analyze(&input).unwrap();
        assert_eq!(fraud["phone"], "");
        let imei = ImeiFraudMock.analyze(&input).unwrap();
        assert_eq!(imei["imei"], json!(356938035643809u64));
    }

    #[test]
    fn persona_treats_empty_name_as_unknown() {
        let input = ToolInput {
            name: Some(json!("")),
            phone: Some(json!(6281212345678u64)),
            ..Default::default()
        };
        let value = PersonaMock.analyze(&input).unwrap();
        assert_eq!(value["target"], "Unknown");
        assert_eq!(value["phone"], json!(6281212345678u64));
        assert!(value["nik"].is_null());
    }

    #[test]
    fn slik_shape() {
        let value = SlikMock.analyze(&ToolInput::default()).unwrap();
        assert_eq!(keys(&value), ["credit_status", "nik", "status", "timestamp"]);
    }
}

use jsi_types::api::{InputField, ToolInput};
use serde::Serialize;
use serde_json::Value;

use crate::{Analyzer, ToolError};

const COUNTRY_PREFIX: &str = "62";
const MIN_LEN: usize = 10;
const MAX_LEN: usize = 15;

/// National prefixes without the leading trunk `0`, checked in order.
const CARRIERS: &[(&str, &[&str])] = &[
    ("Telkomsel", &["811", "812", "813", "821", "822", "823", "852", "853"]),
    ("Indosat Ooredoo", &["814", "815", "816", "855", "856", "857", "858"]),
    ("XL Axiata", &["817", "818", "819", "859", "877", "878"]),
    ("Axis", &["838", "831", "832", "833"]),
    ("Three (3)", &["895", "896", "897", "898", "899"]),
    ("Smartfren", &["881", "882", "883", "884", "885", "886", "887", "888", "889"]),
];

const UNKNOWN_CARRIER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneReport {
    pub phone_number: String,
    pub valid: bool,
    pub provider: &'static str,
    pub line_type: &'static str,
    pub geolocation: Geolocation,
    pub timezone: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Geolocation {
    pub country: &'static str,
    pub location: &'static str,
}

pub fn analyze_phone(phone: &str) -> PhoneReport {
    let cleaned = clean(phone);

    PhoneReport {
        phone_number: phone.to_string(),
        valid: (MIN_LEN..=MAX_LEN).contains(&cleaned.len()),
        provider: carrier(&cleaned),
        line_type: "Mobile",
        geolocation: Geolocation {
            country: "Indonesia",
            location: "Indonesia",
        },
        timezone: "Asia/Jakarta",
    }
}

fn clean(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Carrier from the (up to) four digits after the country code.
fn carrier(cleaned: &str) -> &'static str {
    let Some(national) = cleaned.strip_prefix(COUNTRY_PREFIX) else {
        return UNKNOWN_CARRIER;
    };
    let prefix = &national[..national.len().min(4)];

    CARRIERS
        .iter()
        .find(|(_, prefixes)| prefixes.iter().any(|p| prefix.starts_with(p)))
        .map(|(name, _)| *name)
        .unwrap_or(UNKNOWN_CARRIER)
}

pub struct PhoneAnalyzer;

impl Analyzer for PhoneAnalyzer {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        let phone = input.field(InputField::Phone).ok_or(ToolError::MissingPhone)?;
        Ok(serde_json::to_value(analyze_phone(phone))?)
    }
}

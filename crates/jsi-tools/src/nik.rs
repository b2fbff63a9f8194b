//! NIK (Indonesian national ID) structure parsing.
//!
//! Layout: `PP CC DD ddmmyy SSSS`. Women have 40 added to the day. The
//! two-digit year uses a fixed century split at 30, which is an
//! approximation rather than a calendar rule. Dates are not validated.

use jsi_types::api::{InputField, ToolInput};
use serde::Serialize;
use serde_json::Value;

use crate::{Analyzer, ToolError};

const NIK_LEN: usize = 16;
const FEMALE_DAY_OFFSET: u32 = 40;
const CENTURY_SPLIT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NikReport {
    pub nik: String,
    pub provinsi: String,
    pub kabupaten_kota: String,
    pub kecamatan: String,
    pub gender: Gender,
    pub tanggal_lahir: String,
    pub unique_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

pub fn parse_nik(nik: &str) -> Result<NikReport, ToolError> {
    if nik.len() != NIK_LEN || !nik.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ToolError::InvalidNik);
    }

    // All ASCII from here, so byte offsets are char offsets.
    let province = &nik[0..2];
    let city = &nik[2..4];
    let district = &nik[4..6];
    let birth = &nik[6..12];
    let suffix = &nik[12..16];

    let raw_day = two_digits(&birth[0..2]);
    let month = &birth[2..4];
    let year = &birth[4..6];

    let (gender, day) = if raw_day > FEMALE_DAY_OFFSET {
        (Gender::Female, raw_day - FEMALE_DAY_OFFSET)
    } else {
        (Gender::Male, raw_day)
    };

    let century = if two_digits(year) > CENTURY_SPLIT { "19" } else { "20" };

    Ok(NikReport {
        nik: nik.to_string(),
        provinsi: format!("Province Code: {}", province),
        kabupaten_kota: format!("City Code: {}", city),
        kecamatan: format!("District Code: {}", district),
        gender,
        tanggal_lahir: format!("{:02}-{}-{}{}", day, month, century, year),
        unique_id: suffix.to_string(),
    })
}

fn two_digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

pub struct NikAnalyzer;

impl Analyzer for NikAnalyzer {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError> {
        let nik = input.field(InputField::Nik).ok_or(ToolError::InvalidNik)?;
        Ok(serde_json::to_value(parse_nik(nik)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_male_nik() {
        let report = parse_nik("3171012505990001").unwrap();
        assert_eq!(report.provinsi, "Province Code: 31");
        assert_eq!(report.kabupaten_kota, "City Code: 71");
        assert_eq!(report.kecamatan, "District Code: 01");
        assert_eq!(report.gender, Gender::Male);
        assert_eq!(report.tanggal_lahir, "25-05-1999");
        assert_eq!(report.unique_id, "0001");
    }

    #[test]
    fn day_over_forty_is_female() {
        let report = parse_nik("3171014508010002").unwrap();
        assert_eq!(report.gender, Gender::Female);
        assert_eq!(report.tanggal_lahir, "05-08-2001");
    }

    #[test]
    fn day_forty_is_still_male() {
        let report = parse_nik("3171014012850003").unwrap();
        assert_eq!(report.gender, Gender::Male);
        assert_eq!(report.tanggal_lahir, "40-12-1985");
    }

    #[test]
    fn century_split_at_thirty() {
        assert!(parse_nik("3171010101300001").unwrap().tanggal_lahir.ends_with("2030"));
        assert!(parse_nik("3171010101310001").unwrap().tanggal_lahir.ends_with("1931"));
        assert!(parse_nik("3171010101000001").unwrap().tanggal_lahir.ends_with("2000"));
    }

    #[test]
    fn impossible_dates_pass_through() {
        let report = parse_nik("3171019913990001").unwrap();
        assert_eq!(report.gender, Gender::Female);
        assert_eq!(report.tanggal_lahir, "59-13-1999");
    }

    #[test]
    fn wrong_length_is_rejected() {
        for nik in ["", "317101250599000", "31710125059900012"] {
            assert!(matches!(parse_nik(nik), Err(ToolError::InvalidNik)));
        }
    }

    #[test]
    fn non_digits_are_rejected_without_panicking() {
        assert!(matches!(parse_nik("31710125059900ab"), Err(ToolError::InvalidNik)));
        // 16 bytes but multi-byte chars
        assert!(matches!(parse_nik("31710125059900é"), Err(ToolError::InvalidNik)));
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(
            parse_nik("3273154407920005").unwrap(),
            parse_nik("3273154407920005").unwrap()
        );
    }

    #[test]
    fn analyzer_reports_missing_nik_as_invalid() {
        let err = NikAnalyzer.analyze(&ToolInput::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid NIK format (must be 16 digits)");
    }

    #[test]
    fn analyzer_rejects_numeric_nik() {
        let input = ToolInput {
            nik: Some(serde_json::json!(3171012505990001u64)),
            ..Default::default()
        };
        let err = NikAnalyzer.analyze(&input).unwrap_err();
        assert!(matches!(err, ToolError::InvalidNik));
    }

    #[test]
    fn analyzer_output_uses_wire_field_names() {
        let input = ToolInput {
            nik: Some("3171012505990001".into()),
            ..Default::default()
        };
        let value = NikAnalyzer.analyze(&input).unwrap();
        assert_eq!(value["gender"], "Male");
        assert_eq!(value["tanggal_lahir"], "25-05-1999");
        assert_eq!(value["nik"], "3171012505990001");
    }
}

//! Lookup tools behind a single `Analyzer` interface.
//!
//! Real analyzers (NIK parsing, phone carrier detection) and the mock
//! responders share the same trait, so a mock can be replaced by a real
//! implementation through `Toolbox::replace` without touching the caller.

pub mod mock;
pub mod nik;
pub mod phone;

use std::collections::HashMap;
use std::sync::Arc;

use jsi_types::api::{InputField, ToolInput};
use serde_json::Value;

pub use nik::{NikReport, parse_nik};
pub use phone::{PhoneReport, analyze_phone};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid NIK format (must be 16 digits)")]
    InvalidNik,
    #[error("Phone number required")]
    MissingPhone,
    #[error("No analyzer registered for {0}")]
    Unsupported(&'static str),
    #[error("failed to encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// Errors caused by caller input, as opposed to server-side faults.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ToolError::InvalidNik | ToolError::MissingPhone)
    }
}

pub trait Analyzer: Send + Sync {
    fn analyze(&self, input: &ToolInput) -> Result<Value, ToolError>;
}

/// Every tool the dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Nik,
    Slik,
    Phone,
    DeviceTrack,
    ImeiFraud,
    PhoneFraud,
    Persona,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Nik,
        ToolKind::Slik,
        ToolKind::Phone,
        ToolKind::DeviceTrack,
        ToolKind::ImeiFraud,
        ToolKind::PhoneFraud,
        ToolKind::Persona,
    ];

    /// Identifier used by the `?action=` endpoint.
    pub fn action(self) -> &'static str {
        match self {
            ToolKind::Nik => "analyze_nik",
            ToolKind::Slik => "check_slik",
            ToolKind::Phone => "analyze_phone",
            ToolKind::DeviceTrack => "track_device",
            ToolKind::ImeiFraud => "fraud_check_imei",
            ToolKind::PhoneFraud => "fraud_check_phone",
            ToolKind::Persona => "analyze_persona",
        }
    }

    pub fn from_action(action: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|kind| kind.action() == action)
    }

    /// Tag recorded in the audit log.
    pub fn tag(self) -> &'static str {
        match self {
            ToolKind::Nik => "NIK Analysis",
            ToolKind::Slik => "SLIK Check",
            ToolKind::Phone => "Phone Analysis",
            ToolKind::DeviceTrack => "Device Track",
            ToolKind::ImeiFraud => "IMEI Fraud Check",
            ToolKind::PhoneFraud => "Phone Fraud Check",
            ToolKind::Persona => "Persona Analysis",
        }
    }

    /// Input fields, in priority order, that name the scan target.
    pub fn target_fields(self) -> &'static [InputField] {
        match self {
            ToolKind::Nik | ToolKind::Slik => &[InputField::Nik],
            ToolKind::Phone | ToolKind::DeviceTrack | ToolKind::PhoneFraud => &[InputField::Phone],
            ToolKind::ImeiFraud => &[InputField::Imei],
            ToolKind::Persona => &[InputField::Name, InputField::Phone, InputField::Nik],
        }
    }

    pub fn target(self, input: &ToolInput) -> Option<&str> {
        self.target_fields().iter().find_map(|f| input.field(*f))
    }
}

/// Registry mapping each tool to its analyzer.
#[derive(Clone)]
pub struct Toolbox {
    analyzers: HashMap<ToolKind, Arc<dyn Analyzer>>,
}

impl Toolbox {
    /// Real NIK and phone analyzers, mocks for everything else.
    pub fn standard() -> Self {
        let mut analyzers: HashMap<ToolKind, Arc<dyn Analyzer>> = HashMap::new();
        analyzers.insert(ToolKind::Nik, Arc::new(nik::NikAnalyzer));
        analyzers.insert(ToolKind::Phone, Arc::new(phone::PhoneAnalyzer));
        analyzers.insert(ToolKind::Slik, Arc::new(mock::SlikMock));
        analyzers.insert(ToolKind::DeviceTrack, Arc::new(mock::DeviceTrackMock));
        analyzers.insert(ToolKind::ImeiFraud, Arc::new(mock::ImeiFraudMock));
        analyzers.insert(ToolKind::PhoneFraud, Arc::new(mock::PhoneFraudMock));
        analyzers.insert(ToolKind::Persona, Arc::new(mock::PersonaMock));
        Self { analyzers }
    }

    pub fn replace(mut self, kind: ToolKind, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzers.insert(kind, analyzer);
        self
    }

    pub fn run(&self, kind: ToolKind, input: &ToolInput) -> Result<Value, ToolError> {
        let analyzer = self
            .analyzers
            .get(&kind)
            .ok_or(ToolError::Unsupported(kind.action()))?;
        analyzer.analyze(input)
    }
}

/// Database row types — these map directly to SQLite rows.
/// Distinct from jsi-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct ScanLogRow {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub tool_type: String,
    pub target: Option<String>,
    /// Serialized JSON payload produced by the tool.
    pub result: String,
    pub timestamp: String,
}

/// Insert parameters for a new scan-log entry.
pub struct NewScanLog<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub username: &'a str,
    pub tool_type: &'a str,
    pub target: Option<&'a str>,
    pub result: &'a str,
}

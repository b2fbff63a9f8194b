use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role carried in tokens and stored on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Client,
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    /// Parse a stored role tag. Anything outside the enum becomes `User`.
    pub fn from_stored(tag: &str) -> Role {
        match tag {
            "client" => Role::Client,
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            _ => Role::User,
        }
    }

    /// Role requested at registration. `admin` cannot be self-assigned.
    pub fn self_assigned(requested: Option<&str>) -> Role {
        match requested {
            Some("client") => Role::Client,
            Some("staff") => Role::Staff,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

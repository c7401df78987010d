use serde::{Deserialize, Serialize};
use crate::types::Cents;

/// Commands a host sends to a table session, one JSON object per line.
/// Variants are append only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum TableCommand {
    // ── Session ──────────────────────────────────
    GetState,
    Quit,

    // ── Spin lifecycle ───────────────────────────
    Spin {
        /// Stake in cents. Defaults to the configured stake.
        #[serde(default)]
        stake: Option<Cents>,
    },
    Advance { ms: u64 },
    Dismiss,
    Teardown,

    // ── Wallet ───────────────────────────────────
    Deposit {
        #[serde(default)]
        amount: Option<Cents>,
    },
    Register {
        name:  String,
        email: String,
        #[serde(default)]
        phone: String,
    },
    /// Resume a registered player's account by email.
    Login { email: String },
    /// Leave the account and continue as a zero-balance guest.
    Logout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_commands_parse_from_json_lines() {
        let login: TableCommand =
            serde_json::from_str(r#"{"cmd":"login","email":"a@b.com"}"#).unwrap();
        assert_eq!(login, TableCommand::Login { email: "a@b.com".into() });
        let logout: TableCommand = serde_json::from_str(r#"{"cmd":"logout"}"#).unwrap();
        assert_eq!(logout, TableCommand::Logout);
        let spin: TableCommand = serde_json::from_str(r#"{"cmd":"spin"}"#).unwrap();
        assert_eq!(spin, TableCommand::Spin { stake: None });
    }
}

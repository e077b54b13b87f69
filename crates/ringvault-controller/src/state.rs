// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable, secret-free snapshot of the controller.

use serde::Serialize;

/// What an upper layer (UI, RPC) may see about the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerState {
    pub is_unlocked: bool,
    /// Type tags the registry can build.
    pub keyring_types: Vec<String>,
    pub keyrings: Vec<KeyringSummary>,
}

/// One live keyring: its type tag and account list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyringSummary {
    #[serde(rename = "type")]
    pub keyring_type: String,
    pub accounts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_in_camel_case() {
        let state = ControllerState {
            is_unlocked: true,
            keyring_types: vec!["HD Key Tree".into()],
            keyrings: vec![KeyringSummary {
                keyring_type: "HD Key Tree".into(),
                accounts: vec!["0x01".into()],
            }],
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "isUnlocked": true,
                "keyringTypes": ["HD Key Tree"],
                "keyrings": [{ "type": "HD Key Tree", "accounts": ["0x01"] }],
            })
        );
    }
}

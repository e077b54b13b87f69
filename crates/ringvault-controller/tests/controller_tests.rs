// SPDX-FileCopyrightText: 2026 RingVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the keyring controller.

use ringvault_config::{RingVaultConfig, StorageConfig, VaultConfig};
use ringvault_controller::{KeyringController, KeyringSummary};
use ringvault_core::{EncryptedBlob, PersistedState, RingVaultError, SerializedKeyring, StateStore};
use ringvault_test_utils::{password, TestHarness, MOCK_KEYRING_TYPE};
use secrecy::ExposeSecret;
use serde_json::json;

const PUZZLE: &str = "puzzle seed penalty soldier say clay field arctic metal hen cage runway";
const PUZZLE_ADDRESS: &str = "0xef35ca8ebb9669a35c31b5f6f249a9941a812ac1";
const PUZZLE_KEY: &str = "ace918800411c0b96b915f76efbbd4d50e6c997180fc5a7a5e8e2ca6c3b2b1c0";

const TRUFFLE_KEY: &str = "c87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";
const TRUFFLE_ADDRESS: &str = "0x627306090abab3a6e1400e9345bc60c78a8bef57";

const UNKNOWN_ADDRESS: &str = "0x0000000000000000000000000000000000000001";

// --- Vault lifecycle ---

#[tokio::test]
async fn create_twice_keeps_single_keyring() {
    let mut harness = TestHarness::new();
    let first = harness
        .controller
        .create_new_vault_and_keychain(password("pw"))
        .await
        .unwrap();
    let second = harness
        .controller
        .create_new_vault_and_keychain(password("pw"))
        .await
        .unwrap();

    assert_eq!(harness.controller.keyrings().len(), 1);
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn create_on_existing_vault_with_other_password_fails() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let before = harness.stored_vault().await.unwrap();
    harness.controller.set_locked();

    let err = harness
        .controller
        .create_new_vault_and_keychain(password("other"))
        .await
        .unwrap_err();
    assert!(err.is_decryption());
    assert!(!harness.controller.is_unlocked());
    assert_eq!(harness.stored_vault().await.unwrap(), before);
}

#[tokio::test]
async fn wrong_passwords_never_change_keyring_count() {
    let mut harness = TestHarness::unlocked("correct").await.unwrap();
    let count = harness.controller.keyrings().len();

    for attempt in ["wrong", "also wrong", "Correct", ""] {
        let unlocked = harness
            .controller
            .submit_password(password(attempt))
            .await
            .unwrap();
        assert_eq!(unlocked, 0);
        assert_eq!(harness.controller.keyrings().len(), count);
    }

    let unlocked = harness
        .controller
        .submit_password(password("correct"))
        .await
        .unwrap();
    assert_eq!(unlocked, count);
    assert_eq!(harness.controller.keyrings().len(), count);
}

/// Damaged variants of a real vault blob, each paired with a label.
fn corrupted_blobs(valid: &EncryptedBlob) -> Vec<(&'static str, EncryptedBlob)> {
    let envelope: serde_json::Value = serde_json::from_str(valid.as_str()).unwrap();
    let with = |field: &str, value: serde_json::Value| {
        let mut copy = envelope.clone();
        copy[field] = value;
        EncryptedBlob(copy.to_string())
    };
    let data = envelope["data"].as_str().unwrap();
    let mut flipped = data.as_bytes().to_vec();
    flipped[0] = if flipped[0] == b'A' { b'B' } else { b'A' };

    vec![
        ("empty", EncryptedBlob(String::new())),
        ("not json", EncryptedBlob("{not json".to_string())),
        ("wrong shape", EncryptedBlob(r#"{"vault":"x"}"#.to_string())),
        ("future version", with("version", json!(2))),
        ("bad salt encoding", with("salt", json!("!!!"))),
        ("short iv", with("iv", json!("AAAA"))),
        ("truncated data", with("data", json!(&data[..8]))),
        ("flipped data", with("data", json!(String::from_utf8(flipped).unwrap()))),
        (
            "zero iterations",
            with("kdf", json!({ "memory_cost": 1024, "iterations": 0, "parallelism": 1 })),
        ),
        (
            "huge memory cost",
            with("kdf", json!({ "memory_cost": u32::MAX, "iterations": 1, "parallelism": 1 })),
        ),
    ]
}

#[tokio::test]
async fn corrupt_vaults_are_rejected_without_changing_keyrings() {
    let mut harness = TestHarness::unlocked("correct").await.unwrap();
    let valid = harness.stored_vault().await.unwrap().unwrap();
    let accounts = harness.controller.get_accounts();
    let count = harness.controller.keyrings().len();

    for (label, blob) in corrupted_blobs(&valid) {
        harness
            .store
            .update_state(PersistedState { vault: Some(blob.clone()) })
            .await
            .unwrap();

        let unlocked = harness
            .controller
            .submit_password(password("correct"))
            .await
            .unwrap_or_else(|e| panic!("{label}: expected Ok(0), got {e}"));
        assert_eq!(unlocked, 0, "{label}");
        assert_eq!(harness.controller.get_accounts(), accounts, "{label}");
        assert!(harness.controller.is_unlocked(), "{label}");

        let mut locked = harness.restart();
        let unlocked = locked
            .controller
            .submit_password(password("correct"))
            .await
            .unwrap_or_else(|e| panic!("{label}: expected Ok(0), got {e}"));
        assert_eq!(unlocked, 0, "{label}");
        assert!(locked.controller.keyrings().is_empty(), "{label}");
        assert!(!locked.controller.is_unlocked(), "{label}");

        let err = locked
            .controller
            .unlock_keyrings(password("correct"))
            .await
            .err().unwrap();
        assert!(err.is_decryption(), "{label}: {err}");
        assert_eq!(harness.stored_vault().await.unwrap(), Some(blob), "{label}");
    }

    harness
        .store
        .update_state(PersistedState { vault: Some(valid) })
        .await
        .unwrap();
    assert_eq!(
        harness.controller.submit_password(password("correct")).await.unwrap(),
        count
    );
    assert_eq!(harness.controller.get_accounts(), accounts);
}

#[tokio::test]
async fn submit_password_without_vault_creates_nothing() {
    let mut harness = TestHarness::new();
    let unlocked = harness
        .controller
        .submit_password(password("anything"))
        .await
        .unwrap();

    assert_eq!(unlocked, 0);
    assert!(harness.controller.keyrings().is_empty());
    assert!(!harness.controller.is_unlocked());
    assert!(harness.stored_vault().await.unwrap().is_none());
}

#[tokio::test]
async fn unlock_keyrings_is_strict() {
    let mut empty = TestHarness::new();
    let err = empty
        .controller
        .unlock_keyrings(password("pw"))
        .await
        .err()
        .unwrap();
    assert!(err.is_decryption());

    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness.controller.set_locked();
    let err = harness
        .controller
        .unlock_keyrings(password("nope"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RingVaultError::Decryption(_)));
}

#[tokio::test]
async fn lock_then_unlock_restores_same_accounts() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();
    let accounts = harness.controller.get_accounts();
    let vault = harness.stored_vault().await.unwrap();

    harness.controller.set_locked();
    assert!(!harness.controller.is_unlocked());
    assert!(harness.controller.get_accounts().is_empty());
    assert_eq!(harness.stored_vault().await.unwrap(), vault);

    let keyrings = harness
        .controller
        .unlock_keyrings(password("pw"))
        .await
        .unwrap();
    assert_eq!(keyrings.len(), 2);
    assert_eq!(harness.controller.get_accounts(), accounts);
}

#[tokio::test]
async fn restart_reads_persisted_vault() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let added = harness.controller.add_new_account(0).await.unwrap();
    let accounts = harness.controller.get_accounts();

    let mut restarted = harness.restart();
    assert_eq!(
        restarted
            .controller
            .submit_password(password("pw"))
            .await
            .unwrap(),
        1
    );
    assert_eq!(restarted.controller.get_accounts(), accounts);
    assert_eq!(restarted.controller.get_accounts()[1], added);
}

#[tokio::test]
async fn verify_password_does_not_unlock() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness.controller.set_locked();

    harness.controller.verify_password(&password("pw")).await.unwrap();
    assert!(harness
        .controller
        .verify_password(&password("bad"))
        .await
        .unwrap_err()
        .is_decryption());
    assert!(!harness.controller.is_unlocked());
}

#[tokio::test]
async fn restore_from_mnemonic_replaces_vault() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let accounts = harness
        .controller
        .create_new_vault_and_restore(password("new-pw"), password(PUZZLE))
        .await
        .unwrap();

    assert_eq!(accounts, vec![PUZZLE_ADDRESS]);
    let key = harness.controller.export_account(PUZZLE_ADDRESS).unwrap();
    assert_eq!(key.expose_secret(), PUZZLE_KEY);

    harness.controller.set_locked();
    assert_eq!(
        harness
            .controller
            .submit_password(password("pw"))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        harness
            .controller
            .submit_password(password("new-pw"))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn restore_from_invalid_mnemonic_changes_nothing() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let accounts = harness.controller.get_accounts();
    let vault = harness.stored_vault().await.unwrap();

    let err = harness
        .controller
        .create_new_vault_and_restore(password("pw"), password("definitely not a mnemonic"))
        .await
        .unwrap_err();
    assert!(matches!(err, RingVaultError::InvalidKeyMaterial(_)));
    assert_eq!(harness.controller.get_accounts(), accounts);
    assert_eq!(harness.stored_vault().await.unwrap(), vault);
}

// --- Keyrings ---

#[tokio::test]
async fn hd_restore_is_deterministic() {
    let harness = TestHarness::new();
    let serialized = SerializedKeyring {
        keyring_type: "HD Key Tree".into(),
        data: json!({ "mnemonic": PUZZLE, "numberOfAccounts": 1 }),
    };
    for _ in 0..3 {
        let keyring = harness
            .controller
            .restore_keyring(serialized.clone())
            .unwrap();
        assert_eq!(keyring.accounts(), vec![PUZZLE_ADDRESS]);
    }
    assert!(harness.controller.keyrings().is_empty());
}

#[tokio::test]
async fn accounts_aggregate_in_keyring_order() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let hd_account = harness.controller.get_accounts()[0].clone();
    harness.controller.remove_account(&hd_account).await.unwrap();
    assert!(harness.controller.keyrings().is_empty());

    harness
        .controller
        .add_new_keyring(MOCK_KEYRING_TYPE, Some(json!(["1", "2", "3"])))
        .await
        .unwrap();
    harness
        .controller
        .add_new_keyring(MOCK_KEYRING_TYPE, Some(json!(["4", "5", "6"])))
        .await
        .unwrap();

    assert_eq!(
        harness.controller.get_accounts(),
        vec!["1", "2", "3", "4", "5", "6"]
    );
}

#[tokio::test]
async fn removing_last_account_drops_keyring() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let keyrings_before = harness.controller.keyrings().len();
    let accounts_before = harness.controller.get_accounts();

    let keyring = harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();
    assert_eq!(keyring.accounts(), vec![TRUFFLE_ADDRESS]);
    assert_eq!(harness.controller.keyrings().len(), keyrings_before + 1);

    harness.controller.remove_account(TRUFFLE_ADDRESS).await.unwrap();
    assert_eq!(harness.controller.keyrings().len(), keyrings_before);
    assert_eq!(harness.controller.get_accounts(), accounts_before);

    harness.controller.set_locked();
    harness.controller.unlock_keyrings(password("pw")).await.unwrap();
    assert_eq!(harness.controller.keyrings().len(), keyrings_before);
}

#[tokio::test]
async fn removing_one_hd_account_keeps_the_rest() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let first = harness.controller.get_accounts()[0].clone();
    let second = harness.controller.add_new_account(0).await.unwrap();

    harness.controller.remove_account(&first).await.unwrap();
    assert_eq!(harness.controller.keyrings().len(), 1);
    assert_eq!(harness.controller.get_accounts(), vec![second.clone()]);

    let mut restarted = harness.restart();
    restarted.controller.submit_password(password("pw")).await.unwrap();
    assert_eq!(restarted.controller.get_accounts(), vec![second]);
}

#[tokio::test]
async fn unknown_keyring_type_is_unsupported() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    let result = harness
        .controller
        .add_new_keyring("Ledger Hardware", None)
        .await;
    assert!(matches!(
        result,
        Err(RingVaultError::UnsupportedKeyringType(t)) if t == "Ledger Hardware"
    ));
    assert_eq!(harness.controller.keyrings().len(), 1);

    let restored = harness.controller.restore_keyring(SerializedKeyring {
        keyring_type: "Ledger Hardware".into(),
        data: json!({}),
    });
    assert!(matches!(
        restored,
        Err(RingVaultError::UnsupportedKeyringType(_))
    ));
}

#[tokio::test]
async fn keyring_lookups() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();

    let owner = harness
        .controller
        .get_keyring_for_account(&TRUFFLE_ADDRESS.to_uppercase().replacen("0X", "0x", 1))
        .unwrap();
    assert_eq!(owner.keyring_type(), "Simple Key Pair");

    assert_eq!(harness.controller.get_keyrings_by_type("HD Key Tree").len(), 1);
    assert_eq!(harness.controller.get_keyrings_by_type("Simple Key Pair").len(), 1);
    assert!(harness.controller.get_keyrings_by_type(MOCK_KEYRING_TYPE).is_empty());

    assert!(matches!(
        harness.controller.get_keyring_for_account(UNKNOWN_ADDRESS),
        Err(RingVaultError::AccountNotFound(_))
    ));
}

// --- Accounts ---

#[tokio::test]
async fn export_returns_imported_key() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();

    let key = harness.controller.export_account(TRUFFLE_ADDRESS).unwrap();
    assert_eq!(key.expose_secret(), TRUFFLE_KEY);
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();

    assert!(matches!(
        harness.controller.export_account(UNKNOWN_ADDRESS),
        Err(RingVaultError::AccountNotFound(_))
    ));
    assert!(matches!(
        harness.controller.remove_account(UNKNOWN_ADDRESS).await,
        Err(RingVaultError::AccountNotFound(_))
    ));
    assert!(matches!(
        harness.controller.sign_message(UNKNOWN_ADDRESS, &[1u8; 32]),
        Err(RingVaultError::AccountNotFound(_))
    ));
    assert_eq!(harness.controller.keyrings().len(), 1);
}

#[tokio::test]
async fn signatures_route_to_owning_keyring() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();

    let signature = harness
        .controller
        .sign_personal_message(TRUFFLE_ADDRESS, b"hello")
        .unwrap();
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 2 + 65 * 2);
    assert!(signature.ends_with("1b") || signature.ends_with("1c"));

    let again = harness
        .controller
        .sign_personal_message(TRUFFLE_ADDRESS, b"hello")
        .unwrap();
    assert_eq!(signature, again);

    let digest = harness
        .controller
        .sign_message(TRUFFLE_ADDRESS, &[7u8; 32])
        .unwrap();
    assert_ne!(digest, signature);
}

#[tokio::test]
async fn state_snapshot_reflects_keyrings() {
    let mut harness = TestHarness::unlocked("pw").await.unwrap();
    harness
        .controller
        .add_new_keyring("Simple Key Pair", Some(json!([TRUFFLE_KEY])))
        .await
        .unwrap();

    let state = harness.controller.state();
    assert!(state.is_unlocked);
    assert_eq!(
        state.keyring_types,
        vec!["HD Key Tree", MOCK_KEYRING_TYPE, "Simple Key Pair"]
    );
    assert_eq!(state.keyrings.len(), 2);
    assert_eq!(
        state.keyrings[1],
        KeyringSummary {
            keyring_type: "Simple Key Pair".into(),
            accounts: vec![TRUFFLE_ADDRESS.into()],
        }
    );

    let rendered = serde_json::to_string(&state).unwrap();
    assert!(!rendered.contains(TRUFFLE_KEY));

    harness.controller.set_locked();
    let locked = harness.controller.state();
    assert!(!locked.is_unlocked);
    assert!(locked.keyrings.is_empty());
}

// --- SQLite-backed controller ---

#[tokio::test]
async fn sqlite_backed_controller_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = RingVaultConfig {
        vault: VaultConfig {
            kdf_memory_cost: 1024,
            kdf_iterations: 1,
            kdf_parallelism: 1,
        },
        storage: StorageConfig {
            database_path: dir.path().join("vault.db").to_string_lossy().to_string(),
        },
        ..Default::default()
    };

    let accounts = {
        let mut controller = KeyringController::from_config(&config).await.unwrap();
        controller
            .create_new_vault_and_restore(password("pw"), password(PUZZLE))
            .await
            .unwrap()
    };

    let mut reopened = KeyringController::from_config(&config).await.unwrap();
    assert_eq!(reopened.submit_password(password("pw")).await.unwrap(), 1);
    assert_eq!(reopened.get_accounts(), accounts);
    assert_eq!(reopened.get_accounts(), vec![PUZZLE_ADDRESS]);
}

#[tokio::test]
#[serial_test::serial]
async fn load_reports_rendered_config_errors() {
    // SAFETY: test-only env mutation, serialized by #[serial].
    unsafe { std::env::set_var("RINGVAULT_KEYRING_INITIAL_ACCOUNTS", "0") };
    let result = KeyringController::load().await;
    unsafe { std::env::remove_var("RINGVAULT_KEYRING_INITIAL_ACCOUNTS") };

    match result {
        Err(RingVaultError::Config(report)) => {
            assert!(report.contains("ringvault::config::validation"));
            assert!(report.contains("keyring.initial_accounts must be at least 1"));
        }
        Err(other) => panic!("expected a config error, got {other}"),
        Ok(_) => panic!("zero initial accounts must be rejected"),
    }
}

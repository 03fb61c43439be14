// Path: crates/storage/tests/redb_state_store.rs

use strata_api::storage::StateStore;
use strata_storage::{load_state_or_genesis, BootstrapError, MemStateStore, RedbStateStore};
use strata_test_utils::fixtures::{genesis_doc, genesis_state};
use strata_test_utils::{assert_err, assert_ok};
use strata_types::app::{ChainId, ChainState, EndBlockResponse, ExecutionResponses, TxResult};
use strata_types::config::StoreConfig;
use strata_types::error::StorageError;
use tempfile::tempdir;

/// The genesis state moved forward to `height` without running any blocks.
fn state_at(height: u64) -> ChainState {
    let mut state = genesis_state(&[10, 20]);
    state.last_validators = state.validators.clone();
    state.last_block_height = height;
    state.last_block_total_tx = height * 2;
    state.last_block_time += height * 1_000;
    state.last_results_hash = Some([height as u8; 32]);
    state
}

fn responses(n: usize) -> ExecutionResponses {
    ExecutionResponses {
        deliver_tx: (0..n)
            .map(|i| TxResult {
                code: (i % 2) as u32,
                data: vec![i as u8],
                log: format!("tx {i}"),
                gas_used: 21,
            })
            .collect(),
        end_block: EndBlockResponse::default(),
    }
}

#[test]
fn test_state_roundtrip_is_byte_identical() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    let state = state_at(3);

    assert_ok!(store.save_state(&state));
    let loaded = assert_ok!(store.load_state(3));
    assert_eq!(loaded, state);
    assert_eq!(loaded.bytes().unwrap(), state.bytes().unwrap());
    assert_eq!(assert_ok!(store.latest_height()), Some(3));
}

#[test]
fn test_empty_store() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    assert_eq!(assert_ok!(store.latest_height()), None);
    assert!(assert_ok!(store.load_latest()).is_none());
    assert!(matches!(
        assert_err!(store.load_state(1)),
        StorageError::NotFound(1)
    ));
    assert!(matches!(
        assert_err!(store.load_execution_responses(1)),
        StorageError::NotFound(1)
    ));
}

#[test]
fn test_saving_same_height_overwrites() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    let mut state = state_at(5);
    assert_ok!(store.save_state(&state));
    state.last_block_total_tx = 99;
    assert_ok!(store.save_state(&state));

    assert_eq!(assert_ok!(store.load_state(5)).last_block_total_tx, 99);
    assert_eq!(assert_ok!(store.latest_height()), Some(5));
}

#[test]
fn test_responses_roundtrip() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    let saved = responses(3);
    assert_ok!(store.save_execution_responses(7, &saved));
    let loaded = assert_ok!(store.load_execution_responses(7));
    assert_eq!(loaded, saved);
    assert_eq!(loaded.results_hash(), saved.results_hash());
    // Responses alone never move the latest pointer.
    assert_eq!(assert_ok!(store.latest_height()), None);
}

#[test]
fn test_reopen_sees_committed_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.redb");
    {
        let store = assert_ok!(RedbStateStore::open(&path, 0));
        for h in 1..=3 {
            assert_ok!(store.save_state(&state_at(h)));
        }
    }
    let store = assert_ok!(RedbStateStore::open(&path, 0));
    assert_eq!(assert_ok!(store.load_latest()), Some(state_at(3)));
}

#[test]
fn test_retention_prunes_old_heights() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 2));
    for h in 1..=5 {
        assert_ok!(store.save_execution_responses(h, &responses(1)));
        assert_ok!(store.save_state(&state_at(h)));
    }

    for h in 1..=2 {
        assert!(matches!(
            store.load_state(h),
            Err(StorageError::NotFound(_))
        ));
        assert!(store.load_execution_responses(h).is_err());
    }
    for h in 3..=5 {
        assert_ok!(store.load_state(h));
        assert_ok!(store.load_execution_responses(h));
    }
}

#[test]
fn test_load_validators_uses_historical_state() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    let mut at_4 = state_at(4);
    at_4.validators = genesis_state(&[1, 2, 3]).validators;
    assert_ok!(store.save_state(&at_4));

    // Block 4 was signed by `last_validators` of the state after it.
    assert_eq!(assert_ok!(store.load_validators(4)), at_4.last_validators);
    // Block 5 is not committed; the set that will sign it is `validators` at 4.
    assert_eq!(assert_ok!(store.load_validators(5)), at_4.validators);
    assert!(matches!(
        store.load_validators(9),
        Err(StorageError::NotFound(9))
    ));
}

#[test]
fn test_from_config_creates_parent_directory() {
    let dir = tempdir().unwrap();
    let config = StoreConfig {
        path: dir.path().join("nested/deeper/state.redb"),
        retain_heights: 0,
    };
    let store = assert_ok!(RedbStateStore::from_config(&config));
    assert_ok!(store.save_state(&state_at(1)));
    assert!(config.path.exists());
}

#[test]
fn test_bootstrap_from_genesis_then_from_store() {
    let dir = tempdir().unwrap();
    let store = assert_ok!(RedbStateStore::open(dir.path().join("state.redb"), 0));
    let doc = genesis_doc(&[10, 20]);

    let first = assert_ok!(load_state_or_genesis(&store, &doc));
    assert_eq!(first.last_block_height, 0);
    assert_eq!(assert_ok!(store.latest_height()), Some(0));

    assert_ok!(store.save_state(&state_at(2)));
    let resumed = assert_ok!(load_state_or_genesis(&store, &doc));
    assert_eq!(resumed.last_block_height, 2);
}

#[test]
fn test_bootstrap_rejects_foreign_store() {
    let store = MemStateStore::new();
    let mut doc = genesis_doc(&[10]);
    assert_ok!(load_state_or_genesis(&store, &doc));

    doc.chain_id = ChainId::from("other-chain");
    assert!(matches!(
        assert_err!(load_state_or_genesis(&store, &doc)),
        BootstrapError::ChainIdMismatch { .. }
    ));
}

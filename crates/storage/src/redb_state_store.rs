// Path: crates/storage/src/redb_state_store.rs
use crate::metrics::metrics;
use redb::{Database, ReadTransaction, ReadableTable, Table, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use strata_api::storage::StateStore;
use strata_types::app::{ChainState, ExecutionResponses};
use strata_types::codec;
use strata_types::config::StoreConfig;
use strata_types::error::StorageError;

/// ---- Table definitions ----
/// Canonical `ChainState` encoding, keyed by `last_block_height`.
const STATES: TableDefinition<u64, &[u8]> = TableDefinition::new("STATES");
/// Canonical `ExecutionResponses` encoding, keyed by block height.
const RESPONSES: TableDefinition<u64, &[u8]> = TableDefinition::new("RESPONSES");
/// Singleton values. Holds the latest-height pointer under `LATEST_KEY`.
const META: TableDefinition<&str, u64> = TableDefinition::new("META");

const LATEST_KEY: &str = "latest_height";

fn backend<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Deletes every entry keyed below `cutoff` and returns how many were removed.
fn prune_below(
    table: &mut Table<'_, '_, u64, &'static [u8]>,
    cutoff: u64,
) -> Result<u64, StorageError> {
    let doomed = table
        .range(..cutoff)
        .map_err(backend)?
        .map(|entry| entry.map(|(k, _)| k.value()))
        .collect::<Result<Vec<u64>, _>>()
        .map_err(backend)?;
    for height in &doomed {
        table.remove(*height).map_err(backend)?;
    }
    Ok(doomed.len() as u64)
}

/// A [`StateStore`] backed by a single redb database file.
///
/// Every write is one redb transaction and is durable when `commit` returns. With
/// a non-zero `retain_heights`, `save_state` also deletes snapshots and responses
/// more than `retain_heights` heights below the saved one, inside the same
/// transaction.
#[derive(Clone)]
pub struct RedbStateStore {
    db: Arc<Database>,
    retain_heights: u64,
}

impl std::fmt::Debug for RedbStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStateStore")
            .field("retain_heights", &self.retain_heights)
            .finish_non_exhaustive()
    }
}

impl RedbStateStore {
    pub fn open<P: AsRef<Path>>(path: P, retain_heights: u64) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(backend)?;

        // Ensure tables exist so readers never see `TableDoesNotExist`.
        {
            let w = db.begin_write().map_err(backend)?;
            {
                w.open_table(STATES).map_err(backend)?;
                w.open_table(RESPONSES).map_err(backend)?;
                w.open_table(META).map_err(backend)?;
            }
            w.commit().map_err(backend)?;
        }

        tracing::info!(
            target: "storage",
            event = "opened",
            path = %path.as_ref().display(),
            retain_heights
        );
        Ok(Self {
            db: Arc::new(db),
            retain_heights,
        })
    }

    /// Opens the store described by `config`, creating its parent directory.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StorageError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(backend)?;
            }
        }
        Self::open(&config.path, config.retain_heights)
    }

    fn read_txn(&self) -> Result<ReadTransaction<'_>, StorageError> {
        self.db.begin_read().map_err(backend)
    }

    fn write_txn(&self) -> Result<WriteTransaction<'_>, StorageError> {
        self.db.begin_write().map_err(backend)
    }

    /// The lowest height kept after saving `height`, if pruning applies.
    fn prune_cutoff(&self, height: u64) -> Option<u64> {
        if self.retain_heights == 0 || height <= self.retain_heights {
            None
        } else {
            Some(height - self.retain_heights)
        }
    }

    fn get_bytes(
        &self,
        def: TableDefinition<'static, u64, &'static [u8]>,
        height: u64,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let r = self.read_txn()?;
        let t = r.open_table(def).map_err(backend)?;
        let value = t
            .get(height)
            .map_err(backend)?
            .map(|v| v.value().to_vec());
        Ok(value)
    }
}

impl StateStore for RedbStateStore {
    fn save_state(&self, state: &ChainState) -> Result<(), StorageError> {
        let bytes = codec::to_bytes_canonical(state).map_err(StorageError::Encode)?;
        let height = state.last_block_height;
        let cutoff = self.prune_cutoff(height);

        let w = self.write_txn()?;
        let pruned = {
            let mut states = w.open_table(STATES).map_err(backend)?;
            states.insert(height, bytes.as_slice()).map_err(backend)?;
            let mut meta = w.open_table(META).map_err(backend)?;
            meta.insert(LATEST_KEY, height).map_err(backend)?;

            match cutoff {
                Some(cutoff) => {
                    let mut responses = w.open_table(RESPONSES).map_err(backend)?;
                    prune_below(&mut responses, cutoff)?;
                    prune_below(&mut states, cutoff)?
                }
                None => 0,
            }
        };
        w.commit().map_err(backend)?;

        metrics().inc_bytes_written_total(bytes.len() as u64);
        if pruned > 0 {
            metrics().inc_heights_pruned(pruned);
            tracing::debug!(target: "storage", event = "pruned", height, pruned);
        }
        tracing::debug!(target: "storage", event = "state_saved", height, bytes = bytes.len());
        Ok(())
    }

    fn save_execution_responses(
        &self,
        height: u64,
        responses: &ExecutionResponses,
    ) -> Result<(), StorageError> {
        let bytes = codec::to_bytes_canonical(responses).map_err(StorageError::Encode)?;
        let w = self.write_txn()?;
        {
            let mut t = w.open_table(RESPONSES).map_err(backend)?;
            t.insert(height, bytes.as_slice()).map_err(backend)?;
        }
        w.commit().map_err(backend)?;
        metrics().inc_bytes_written_total(bytes.len() as u64);
        tracing::debug!(target: "storage", event = "responses_saved", height, bytes = bytes.len());
        Ok(())
    }

    fn load_state(&self, height: u64) -> Result<ChainState, StorageError> {
        let bytes = self
            .get_bytes(STATES, height)?
            .ok_or(StorageError::NotFound(height))?;
        codec::from_bytes_canonical(&bytes).map_err(StorageError::Decode)
    }

    fn latest_height(&self) -> Result<Option<u64>, StorageError> {
        let r = self.read_txn()?;
        let t = r.open_table(META).map_err(backend)?;
        let latest = t.get(LATEST_KEY).map_err(backend)?.map(|v| v.value());
        Ok(latest)
    }

    fn load_execution_responses(&self, height: u64) -> Result<ExecutionResponses, StorageError> {
        let bytes = self
            .get_bytes(RESPONSES, height)?
            .ok_or(StorageError::NotFound(height))?;
        codec::from_bytes_canonical(&bytes).map_err(StorageError::Decode)
    }
}

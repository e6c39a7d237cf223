//! Pin registry persistence.

use std::path::Path;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use hawser_types::{ContentId, PinRecord, PinScope};
use tracing::debug;

use crate::error::RegistryError;

type Result<T> = std::result::Result<T, RegistryError>;

/// Durable record of pin state, keyed by scope and content identifier.
///
/// One partition:
/// - `pins`: `<scope>/<content-id>` -> postcard-encoded [`PinRecord`]
///
/// Writes overwrite, so the stored record is always the latest confirmed
/// state. Records are never removed: an unpin writes `pinned: false` over
/// the previous record and the key stays behind as history.
pub struct PinRegistry {
    /// Keyspace handle kept so the database outlives the partition.
    #[allow(dead_code)]
    keyspace: Keyspace,
    /// `<scope>/<content-id>` -> [`PinRecord`]
    pins: PartitionHandle,
    /// Backing directory guard for temporary registries.
    _tmp: Option<tempfile::TempDir>,
}

impl PinRegistry {
    /// Open (or create) a registry at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let keyspace = Config::new(path).open()?;
        Self::init(keyspace, None)
    }

    /// Open a registry backed by a temporary directory, removed on drop.
    pub fn open_temporary() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let keyspace = Config::new(tmp.path()).open()?;
        Self::init(keyspace, Some(tmp))
    }

    fn init(keyspace: Keyspace, tmp: Option<tempfile::TempDir>) -> Result<Self> {
        let pins = keyspace.open_partition("pins", PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            pins,
            _tmp: tmp,
        })
    }

    // ----- Pin state -----

    /// Record a confirmed pin state change, returning the stored record.
    pub fn set_pinned(&self, id: &ContentId, scope: PinScope, pinned: bool) -> Result<PinRecord> {
        let record = PinRecord {
            content_id: id.clone(),
            scope,
            pinned,
            updated_at: now_secs(),
        };
        let value = postcard::to_allocvec(&record)?;
        self.pins.insert(pin_storage_key(scope, id), value.as_slice())?;
        debug!(%id, %scope, pinned, "recorded pin state");
        Ok(record)
    }

    /// Latest recorded state for one identifier in one scope.
    ///
    /// Also returns records with `pinned: false`: an identifier that was
    /// pinned and later released still has its history here.
    pub fn get(&self, id: &ContentId, scope: PinScope) -> Result<Option<PinRecord>> {
        match self.pins.get(pin_storage_key(scope, id))? {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All records in a scope that are currently pinned.
    pub fn list_pinned(&self, scope: PinScope) -> Result<Vec<PinRecord>> {
        let prefix = format!("{}/", scope.as_str());
        let mut records = Vec::new();
        for entry in self.pins.prefix(prefix.as_bytes()) {
            let (_key, value) = entry?;
            let record: PinRecord = postcard::from_bytes(&value)?;
            if record.pinned {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Storage key for a pin record. The scope prefix keeps local and remote
/// state for the same identifier on separate keys.
fn pin_storage_key(scope: PinScope, id: &ContentId) -> String {
    format!("{}/{}", scope.as_str(), id)
}

fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

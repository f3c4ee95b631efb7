use super::{Collection, Store};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Persistent store backed by a fjall keyspace, one partition per
/// collection.
pub struct DiskStore {
    keyspace: Keyspace,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        Ok(Self { keyspace })
    }
}

impl Store for DiskStore {
    fn collection(&self, name: &str) -> Result<Arc<dyn Collection>> {
        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open collection: {name}"))?;

        Ok(Arc::new(DiskCollection {
            keyspace: self.keyspace.clone(),
            partition,
        }))
    }
}

pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

#[async_trait]
impl Collection for DiskCollection {
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.partition.get(id)?.map(|value| value.to_vec()))
    }

    async fn put(&self, id: &str, value: &[u8]) -> Result<()> {
        self.partition.insert(id, value)?;
        // Records are written one per invocation, flush before the process exits
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Stored record: {id}");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let existed = self.partition.contains_key(id)?;
        self.partition.remove(id)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Removed record: {id}");
        Ok(existed)
    }

    async fn list(&self) -> Result<Vec<Vec<u8>>> {
        let mut values = Vec::new();
        for entry in self.partition.iter() {
            let (_, value) = entry?;
            values.push(value.to_vec());
        }
        Ok(values)
    }
}

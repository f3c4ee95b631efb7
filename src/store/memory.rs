use super::{Collection, Store};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// In-memory store implementation used by tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn collection(&self, name: &str) -> Result<Arc<dyn Collection>> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::default()))
            .clone();
        Ok(collection)
    }
}

#[derive(Default)]
pub struct MemoryCollection {
    records: tokio::sync::Mutex<BTreeMap<String, Vec<u8>>>,
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn put(&self, id: &str, value: &[u8]) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(id.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.records.lock().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<Vec<u8>>> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryStore::new();
        let records = store.collection("portfolio").unwrap();

        assert!(records.get("1").await.unwrap().is_none());

        records.put("1", b"first").await.unwrap();
        assert_eq!(records.get("1").await.unwrap(), Some(b"first".to_vec()));

        assert!(records.remove("1").await.unwrap());
        assert!(records.get("1").await.unwrap().is_none());
        assert!(!records.remove("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_name_returns_same_collection() {
        let store = MemoryStore::new();
        let first = store.collection("subscriptions").unwrap();
        let second = store.collection("subscriptions").unwrap();

        first.put("1", b"netflix").await.unwrap();
        assert_eq!(second.get("1").await.unwrap(), Some(b"netflix".to_vec()));
    }

    #[tokio::test]
    async fn test_list_in_key_order() {
        let store = MemoryStore::new();
        let records = store.collection("savings").unwrap();

        records.put("1700000000002", b"b").await.unwrap();
        records.put("1700000000001", b"a").await.unwrap();

        let values = records.list().await.unwrap();
        assert_eq!(values, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}

pub mod disk;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One named collection of user records, keyed by string id.
///
/// Values are opaque bytes; the record modules encode and decode them as
/// JSON. Ids are millisecond timestamps, so key order is creation order.
#[async_trait]
pub trait Collection: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, id: &str, value: &[u8]) -> Result<()>;
    /// Returns whether a record with this id existed.
    async fn remove(&self, id: &str) -> Result<bool>;
    /// All values in key order.
    async fn list(&self) -> Result<Vec<Vec<u8>>>;
}

/// A store holding named record collections.
pub trait Store: Send + Sync {
    fn collection(&self, name: &str) -> Result<Arc<dyn Collection>>;
}

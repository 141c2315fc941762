//! The boundary to the content parser.

use async_trait::async_trait;

use crate::error::Result;
use crate::pending::Pending;
use crate::table::ContentTable;

/// Produces a complete, validated content table.
///
/// Implemented by whatever parses content files. The registry only consumes
/// the finished table.
#[async_trait]
pub trait ContentLoader<T>: Send + Sync {
    /// Parse and return a full table.
    async fn load(&self) -> Result<ContentTable<T>>;
}

/// Run `loader` on the current tokio runtime and return a handle to its result.
///
/// Must be called from within a tokio runtime.
pub fn spawn_load<T, L>(loader: L) -> Pending<ContentTable<T>>
where
    T: Send + 'static,
    L: ContentLoader<T> + 'static,
{
    let (sender, pending) = Pending::channel();
    tokio::spawn(async move {
        let result = loader.load().await;
        if !sender.send(result) {
            tracing::debug!("content load finished after its receiver was dropped");
        }
    });
    pending
}

/// A loader that hands out a copy of a fixed table.
#[derive(Debug, Clone)]
pub struct StaticLoader<T> {
    table: ContentTable<T>,
}

impl<T> StaticLoader<T> {
    pub fn new(table: ContentTable<T>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> ContentLoader<T> for StaticLoader<T> {
    async fn load(&self) -> Result<ContentTable<T>> {
        Ok(self.table.clone())
    }
}

//! Table manager: creates, tracks, and destroys tables.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use roundkeeper_engine::{Catalog, Session};
use roundkeeper_model::TableId;

use crate::table::spawn_table;
use crate::{Collaborators, TableConfig, TableError, TableHandle, TableSnapshot};

/// Counter for generating unique table IDs.
static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Manages every running table on a host.
///
/// All tables share one content catalog. Each gets its own session and
/// its own collaborators.
pub struct TableManager {
    tables: HashMap<TableId, TableHandle>,
    catalog: Arc<Catalog>,
    config: TableConfig,
}

impl TableManager {
    pub fn new(catalog: Arc<Catalog>, config: TableConfig) -> Self {
        Self {
            tables: HashMap::new(),
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Starts a table with a fresh session and returns its ID.
    pub fn create_table(&mut self, collaborators: Collaborators) -> TableId {
        let session = Session::new(self.config.engine.clone(), Arc::clone(&self.catalog));
        self.create_table_from(session, collaborators)
    }

    /// Starts a table around an already-prepared session (for example one
    /// with localized labels or a restored roster).
    pub fn create_table_from(&mut self, session: Session, collaborators: Collaborators) -> TableId {
        let table_id = TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_table(table_id, session, collaborators, self.config.channel_size);
        self.tables.insert(table_id, handle);
        tracing::info!(%table_id, "table created");
        table_id
    }

    /// Returns a handle to a running table.
    pub fn get(&self, table_id: TableId) -> Result<TableHandle, TableError> {
        self.tables
            .get(&table_id)
            .cloned()
            .ok_or(TableError::NotFound(table_id))
    }

    /// Shuts a table down and forgets it.
    pub async fn destroy_table(&mut self, table_id: TableId) -> Result<(), TableError> {
        let handle = self
            .tables
            .remove(&table_id)
            .ok_or(TableError::NotFound(table_id))?;

        let _ = handle.shutdown().await;

        tracing::info!(%table_id, "table destroyed");
        Ok(())
    }

    /// Snapshots of every table that still answers. Tables that fail to
    /// respond (e.g., shutting down) are skipped.
    pub async fn list_tables(&self) -> Vec<TableSnapshot> {
        let mut snapshots = Vec::with_capacity(self.tables.len());
        for handle in self.tables.values() {
            if let Ok(snapshot) = handle.snapshot().await {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by_key(|s| s.table_id.0);
        snapshots
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }
}

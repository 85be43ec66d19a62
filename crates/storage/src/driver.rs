//! In-memory storage driver
//!
//! Models the physical store as namespaces -> tables -> rows in nested
//! BTreeMaps behind a `parking_lot::RwLock`. Structure (tables, the general
//! payload index, per-attribute expression indexes with their cast types)
//! is tracked explicitly so tests can observe exactly what DDL produced.
//!
//! All `ensure_*`/`drop_*` operations are idempotent per the
//! [`StorageDriver`] contract. Record operations fail with a `Storage`
//! error when the addressed table does not exist, the way a real store
//! rejects DML against a missing relation.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tessera_core::{
    DataRecord, EngineError, Payload, PhysicalType, RecordId, Result, StorageDriver,
};

#[derive(Debug, Clone)]
struct StoredRow {
    data: Payload,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Monotonic per-table insertion order, tiebreaker for listing
    seq: u64,
}

#[derive(Debug, Default)]
struct TableState {
    rows: BTreeMap<RecordId, StoredRow>,
    general_index: bool,
    /// attribute name -> cast type of its expression index
    attribute_indexes: BTreeMap<String, PhysicalType>,
    next_seq: u64,
}

#[derive(Debug, Default)]
struct NamespaceState {
    tables: BTreeMap<String, TableState>,
}

/// In-memory implementation of the [`StorageDriver`] port
///
/// The reference driver: integration tests run against it, and it defines
/// the observable semantics (idempotence, missing-relation errors) that
/// durable drivers must match.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    namespaces: RwLock<BTreeMap<String, NamespaceState>>,
}

impl MemoryDriver {
    /// Create an empty driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a namespace exists
    pub fn namespace_exists(&self, namespace: &str) -> bool {
        self.namespaces.read().contains_key(namespace)
    }

    /// Whether a table exists
    pub fn table_exists(&self, namespace: &str, table: &str) -> bool {
        self.namespaces
            .read()
            .get(namespace)
            .is_some_and(|ns| ns.tables.contains_key(table))
    }

    /// Whether the general payload index exists on a table
    pub fn has_general_index(&self, namespace: &str, table: &str) -> bool {
        self.namespaces
            .read()
            .get(namespace)
            .and_then(|ns| ns.tables.get(table))
            .is_some_and(|t| t.general_index)
    }

    /// Cast type of an attribute's expression index, if one exists
    pub fn attribute_index_type(
        &self,
        namespace: &str,
        table: &str,
        attribute: &str,
    ) -> Option<PhysicalType> {
        self.namespaces
            .read()
            .get(namespace)
            .and_then(|ns| ns.tables.get(table))
            .and_then(|t| t.attribute_indexes.get(attribute).copied())
    }

    /// Number of rows in a table (0 if the table is missing)
    pub fn row_count(&self, namespace: &str, table: &str) -> usize {
        self.namespaces
            .read()
            .get(namespace)
            .and_then(|ns| ns.tables.get(table))
            .map_or(0, |t| t.rows.len())
    }

    fn missing_table(namespace: &str, table: &str) -> EngineError {
        EngineError::storage(format!("no such table: {namespace}.{table}"))
    }
}

impl StorageDriver for MemoryDriver {
    fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        self.namespaces
            .write()
            .entry(namespace.to_string())
            .or_default();
        Ok(())
    }

    fn drop_namespace(&self, namespace: &str) -> Result<()> {
        self.namespaces.write().remove(namespace);
        Ok(())
    }

    fn ensure_table(&self, namespace: &str, table: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        let ns = namespaces
            .get_mut(namespace)
            .ok_or_else(|| EngineError::storage(format!("no such namespace: {namespace}")))?;
        ns.tables.entry(table.to_string()).or_default();
        Ok(())
    }

    fn drop_table(&self, namespace: &str, table: &str) -> Result<()> {
        if let Some(ns) = self.namespaces.write().get_mut(namespace) {
            ns.tables.remove(table);
        }
        Ok(())
    }

    fn ensure_general_index(&self, namespace: &str, table: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        let state = namespaces
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;
        state.general_index = true;
        Ok(())
    }

    fn ensure_attribute_index(
        &self,
        namespace: &str,
        table: &str,
        attribute: &str,
        physical: &PhysicalType,
    ) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        let state = namespaces
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;
        state
            .attribute_indexes
            .entry(attribute.to_string())
            .or_insert(*physical);
        Ok(())
    }

    fn drop_attribute_index(&self, namespace: &str, table: &str, attribute: &str) -> Result<()> {
        if let Some(state) = self
            .namespaces
            .write()
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
        {
            state.attribute_indexes.remove(attribute);
        }
        Ok(())
    }

    fn insert_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
        data: &Payload,
    ) -> Result<DataRecord> {
        let mut namespaces = self.namespaces.write();
        let state = namespaces
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;

        if state.rows.contains_key(&id) {
            return Err(EngineError::storage(format!(
                "duplicate key in {namespace}.{table}: {id}"
            )));
        }

        let now = Utc::now();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.insert(
            id,
            StoredRow {
                data: data.clone(),
                created_at: now,
                updated_at: now,
                seq,
            },
        );

        Ok(DataRecord {
            id,
            data: data.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
        data: &Payload,
    ) -> Result<Option<DataRecord>> {
        let mut namespaces = self.namespaces.write();
        let state = namespaces
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;

        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.data = data.clone();
        row.updated_at = Utc::now();

        Ok(Some(DataRecord {
            id,
            data: row.data.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    fn fetch_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
    ) -> Result<Option<DataRecord>> {
        let namespaces = self.namespaces.read();
        let state = namespaces
            .get(namespace)
            .and_then(|ns| ns.tables.get(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;

        Ok(state.rows.get(&id).map(|row| DataRecord {
            id,
            data: row.data.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    fn list_records(&self, namespace: &str, table: &str) -> Result<Vec<DataRecord>> {
        let namespaces = self.namespaces.read();
        let state = namespaces
            .get(namespace)
            .and_then(|ns| ns.tables.get(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;

        let mut rows: Vec<_> = state.rows.iter().collect();
        // Newest first; insertion order breaks timestamp ties
        rows.sort_by(|(_, a), (_, b)| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));

        Ok(rows
            .into_iter()
            .map(|(id, row)| DataRecord {
                id: *id,
                data: row.data.clone(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    fn delete_record(&self, namespace: &str, table: &str, id: RecordId) -> Result<bool> {
        let mut namespaces = self.namespaces.write();
        let state = namespaces
            .get_mut(namespace)
            .and_then(|ns| ns.tables.get_mut(table))
            .ok_or_else(|| Self::missing_table(namespace, table))?;
        Ok(state.rows.remove(&id).is_some())
    }
}

//! SQLite-backed store
//!
//! One [`SqliteStore`] implements both ports:
//! - metadata rows (tenants, collections, attributes) live in the main
//!   database file
//! - each tenant namespace is a separate database file ATTACH-ed under its
//!   schema name, holding one table per collection
//!
//! Collection tables carry `id`, `created_at`, `updated_at`, and a JSON
//! `data` payload column. Attribute indexes are expression indexes over
//! `CAST(json_extract(data, '$.<attr>') AS <affinity>)`, so comparisons use
//! the resolved physical type rather than text. The general index covers
//! the raw payload column.
//!
//! All DDL goes through `IF [NOT] EXISTS` forms, making every ensure/drop
//! idempotent. Identifier operands are produced by the core naming module;
//! they are still quoted defensively before being spliced into SQL.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tessera_core::{
    Attribute, AttributeConfig, AttributeType, Collection, CollectionId, DataRecord, EngineError,
    MetadataStore, Page, PageRequest, Payload, PhysicalType, RecordId, Result, StorageDriver,
    Tenant, TenantId,
};
use tracing::{debug, info};

/// Default busy timeout (ms)
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// File name of the main (metadata) database inside the store directory
const METADATA_DB: &str = "metadata.db";

/// Configuration for the SQLite store
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    /// Directory holding the metadata database and per-tenant namespace files
    pub dir: PathBuf,
    /// Busy timeout in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

impl SqliteConfig {
    /// Config with defaults for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            dir: dir.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

struct Inner {
    conn: Connection,
    /// Namespaces currently ATTACH-ed under their schema name
    attached: HashSet<String>,
}

/// Durable store over SQLite, implementing both engine ports
pub struct SqliteStore {
    inner: Mutex<Inner>,
    dir: PathBuf,
}

impl SqliteStore {
    /// Open (or create) a store in the given directory
    ///
    /// Creates the directory and the metadata schema if missing, and
    /// re-attaches every namespace file found from a previous run.
    ///
    /// # Errors
    ///
    /// `Storage` if the directory or database cannot be opened.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(SqliteConfig::new(dir.as_ref()))
    }

    /// Open with explicit configuration
    ///
    /// # Errors
    ///
    /// `Storage` if the directory or database cannot be opened.
    pub fn open_with_config(config: SqliteConfig) -> Result<Self> {
        fs::create_dir_all(&config.dir)
            .map_err(|e| EngineError::storage(format!("create store dir: {e}")))?;

        let conn = Connection::open(config.dir.join(METADATA_DB))
            .map_err(|e| EngineError::storage(format!("open metadata db: {e}")))?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(storage_err)?;
        let _mode: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(storage_err)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(storage_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tenants (
                 id         TEXT PRIMARY KEY,
                 name       TEXT NOT NULL UNIQUE,
                 created_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS collections (
                 id         TEXT PRIMARY KEY,
                 tenant_id  TEXT NOT NULL,
                 name       TEXT NOT NULL,
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL,
                 UNIQUE (tenant_id, name)
             );
             CREATE TABLE IF NOT EXISTS attributes (
                 collection_id TEXT NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
                 name          TEXT NOT NULL,
                 data_type     TEXT NOT NULL,
                 indexed       INTEGER NOT NULL,
                 config        TEXT NOT NULL,
                 position      INTEGER NOT NULL,
                 UNIQUE (collection_id, name)
             );",
        )
        .map_err(storage_err)?;

        let mut store = Inner {
            conn,
            attached: HashSet::new(),
        };
        reattach_namespaces(&mut store, &config.dir)?;

        info!(dir = %config.dir.display(), "opened sqlite store");
        Ok(SqliteStore {
            inner: Mutex::new(store),
            dir: config.dir,
        })
    }

    fn namespace_file(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.db"))
    }
}

/// Re-attach namespace files left by a previous process
fn reattach_namespaces(inner: &mut Inner, dir: &Path) -> Result<()> {
    let entries =
        fs::read_dir(dir).map_err(|e| EngineError::storage(format!("scan store dir: {e}")))?;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::storage(e.to_string()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(namespace) = name.strip_suffix(".db") else {
            continue;
        };
        if name == METADATA_DB || !namespace.starts_with("tenant_") {
            continue;
        }
        attach(inner, dir, namespace)?;
    }
    Ok(())
}

fn attach(inner: &mut Inner, dir: &Path, namespace: &str) -> Result<()> {
    if inner.attached.contains(namespace) {
        return Ok(());
    }
    let file = dir.join(format!("{namespace}.db"));
    let sql = format!("ATTACH DATABASE ?1 AS {}", quote_ident(namespace));
    inner
        .conn
        .execute(&sql, params![file.to_string_lossy().into_owned()])
        .map_err(storage_err)?;
    inner.attached.insert(namespace.to_string());
    debug!(namespace, "attached namespace");
    Ok(())
}

fn storage_err(err: rusqlite::Error) -> EngineError {
    EngineError::storage(err.to_string())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn format_ts(ts: DateTime<Utc>) -> String {
    // Fixed-width fractions keep lexicographic order equal to time order,
    // and nanoseconds round-trip the in-memory value exactly
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EngineError::storage(format!("corrupt timestamp '{s}': {e}")))
}

fn parse_record_id(s: &str) -> Result<RecordId> {
    RecordId::parse_str(s).ok_or_else(|| EngineError::storage(format!("corrupt record id '{s}'")))
}

fn parse_payload(s: &str) -> Result<Payload> {
    match serde_json::from_str(s) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        _ => Err(EngineError::storage("corrupt record payload")),
    }
}

/// CAST target used in the expression index for a physical type
fn sqlite_affinity(physical: &PhysicalType) -> &'static str {
    match physical {
        PhysicalType::Integer | PhysicalType::BigInt | PhysicalType::Boolean => "INTEGER",
        PhysicalType::Numeric => "NUMERIC",
        PhysicalType::Bytea => "BLOB",
        PhysicalType::Text
        | PhysicalType::VarChar(_)
        | PhysicalType::Date
        | PhysicalType::Time
        | PhysicalType::Timestamp
        | PhysicalType::Jsonb
        | PhysicalType::Uuid => "TEXT",
    }
}

fn attribute_index_name(table: &str, attribute: &str) -> String {
    format!("{table}_{attribute}_idx")
}

fn row_to_record(
    id: String,
    created_at: String,
    updated_at: String,
    data: String,
) -> Result<DataRecord> {
    Ok(DataRecord {
        id: parse_record_id(&id)?,
        data: parse_payload(&data)?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

impl StorageDriver for SqliteStore {
    fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        attach(&mut inner, &self.dir, namespace)
    }

    fn drop_namespace(&self, namespace: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.attached.remove(namespace) {
            let sql = format!("DETACH DATABASE {}", quote_ident(namespace));
            inner.conn.execute(&sql, []).map_err(storage_err)?;
        }
        match fs::remove_file(self.namespace_file(namespace)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EngineError::storage(format!("remove namespace file: {e}"))),
        }
    }

    fn ensure_table(&self, namespace: &str, table: &str) -> Result<()> {
        let inner = self.inner.lock();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (
                 id         TEXT PRIMARY KEY,
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL,
                 data       TEXT NOT NULL
             )",
            quote_ident(namespace),
            quote_ident(table)
        );
        inner.conn.execute(&sql, []).map_err(storage_err)?;
        Ok(())
    }

    fn drop_table(&self, namespace: &str, table: &str) -> Result<()> {
        let inner = self.inner.lock();
        if !inner.attached.contains(namespace) {
            return Ok(());
        }
        let sql = format!(
            "DROP TABLE IF EXISTS {}.{}",
            quote_ident(namespace),
            quote_ident(table)
        );
        inner.conn.execute(&sql, []).map_err(storage_err)?;
        Ok(())
    }

    fn ensure_general_index(&self, namespace: &str, table: &str) -> Result<()> {
        let inner = self.inner.lock();
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {}.{} ON {} (data)",
            quote_ident(namespace),
            quote_ident(&format!("{table}_data_idx")),
            quote_ident(table)
        );
        inner.conn.execute(&sql, []).map_err(storage_err)?;
        Ok(())
    }

    fn ensure_attribute_index(
        &self,
        namespace: &str,
        table: &str,
        attribute: &str,
        physical: &PhysicalType,
    ) -> Result<()> {
        let inner = self.inner.lock();
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {}.{} ON {} (CAST(json_extract(data, '$.{}') AS {}))",
            quote_ident(namespace),
            quote_ident(&attribute_index_name(table, attribute)),
            quote_ident(table),
            attribute,
            sqlite_affinity(physical)
        );
        inner.conn.execute(&sql, []).map_err(storage_err)?;
        Ok(())
    }

    fn drop_attribute_index(&self, namespace: &str, table: &str, attribute: &str) -> Result<()> {
        let inner = self.inner.lock();
        if !inner.attached.contains(namespace) {
            return Ok(());
        }
        let sql = format!(
            "DROP INDEX IF EXISTS {}.{}",
            quote_ident(namespace),
            quote_ident(&attribute_index_name(table, attribute))
        );
        inner.conn.execute(&sql, []).map_err(storage_err)?;
        Ok(())
    }

    fn insert_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
        data: &Payload,
    ) -> Result<DataRecord> {
        let inner = self.inner.lock();
        let now = Utc::now();
        let ts = format_ts(now);
        let body = serde_json::to_string(data).map_err(|e| EngineError::storage(e.to_string()))?;
        let sql = format!(
            "INSERT INTO {}.{} (id, created_at, updated_at, data) VALUES (?1, ?2, ?3, ?4)",
            quote_ident(namespace),
            quote_ident(table)
        );
        inner
            .conn
            .execute(&sql, params![id.to_string(), ts, ts, body])
            .map_err(storage_err)?;

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
        let inner = self.inner.lock();
        let select = format!(
            "SELECT created_at FROM {}.{} WHERE id = ?1",
            quote_ident(namespace),
            quote_ident(table)
        );
        let created_at: Option<String> = inner
            .conn
            .query_row(&select, params![id.to_string()], |row| row.get(0))
            .optional()
            .map_err(storage_err)?;
        let Some(created_at) = created_at else {
            return Ok(None);
        };

        let now = Utc::now();
        let body = serde_json::to_string(data).map_err(|e| EngineError::storage(e.to_string()))?;
        let update = format!(
            "UPDATE {}.{} SET data = ?2, updated_at = ?3 WHERE id = ?1",
            quote_ident(namespace),
            quote_ident(table)
        );
        inner
            .conn
            .execute(&update, params![id.to_string(), body, format_ts(now)])
            .map_err(storage_err)?;

        Ok(Some(DataRecord {
            id,
            data: data.clone(),
            created_at: parse_ts(&created_at)?,
            updated_at: now,
        }))
    }

    fn fetch_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
    ) -> Result<Option<DataRecord>> {
        let inner = self.inner.lock();
        let sql = format!(
            "SELECT id, created_at, updated_at, data FROM {}.{} WHERE id = ?1",
            quote_ident(namespace),
            quote_ident(table)
        );
        let row = inner
            .conn
            .query_row(&sql, params![id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()
            .map_err(storage_err)?;

        row.map(|(id, created, updated, data)| row_to_record(id, created, updated, data))
            .transpose()
    }

    fn list_records(&self, namespace: &str, table: &str) -> Result<Vec<DataRecord>> {
        let inner = self.inner.lock();
        let sql = format!(
            "SELECT id, created_at, updated_at, data FROM {}.{}
             ORDER BY created_at DESC, rowid DESC",
            quote_ident(namespace),
            quote_ident(table)
        );
        let mut stmt = inner.conn.prepare(&sql).map_err(storage_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(storage_err)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, created, updated, data) = row.map_err(storage_err)?;
            records.push(row_to_record(id, created, updated, data)?);
        }
        Ok(records)
    }

    fn delete_record(&self, namespace: &str, table: &str, id: RecordId) -> Result<bool> {
        let inner = self.inner.lock();
        let sql = format!(
            "DELETE FROM {}.{} WHERE id = ?1",
            quote_ident(namespace),
            quote_ident(table)
        );
        let affected = inner
            .conn
            .execute(&sql, params![id.to_string()])
            .map_err(storage_err)?;
        Ok(affected > 0)
    }
}

impl MetadataStore for SqliteStore {
    fn insert_tenant(&self, tenant: &Tenant) -> Result<()> {
        let inner = self.inner.lock();
        inner
            .conn
            .execute(
                "INSERT INTO tenants (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    tenant.id.to_string(),
                    tenant.name,
                    format_ts(tenant.created_at)
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    EngineError::conflict("Tenant", "name", &tenant.name)
                } else {
                    storage_err(e)
                }
            })?;
        Ok(())
    }

    fn tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>> {
        let inner = self.inner.lock();
        load_tenant(
            &inner.conn,
            "SELECT id, name, created_at FROM tenants WHERE id = ?1",
            &id.to_string(),
        )
    }

    fn tenant_by_name(&self, name: &str) -> Result<Option<Tenant>> {
        let inner = self.inner.lock();
        load_tenant(
            &inner.conn,
            "SELECT id, name, created_at FROM tenants WHERE name = ?1",
            name,
        )
    }

    fn delete_tenant(&self, id: TenantId) -> Result<bool> {
        let inner = self.inner.lock();
        let affected = inner
            .conn
            .execute(
                "DELETE FROM tenants WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(storage_err)?;
        Ok(affected > 0)
    }

    fn insert_collection(&self, collection: &Collection) -> Result<()> {
        let mut inner = self.inner.lock();
        let tx = inner.conn.transaction().map_err(storage_err)?;

        tx.execute(
            "INSERT INTO collections (id, tenant_id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                collection.id.to_string(),
                collection.tenant_id.to_string(),
                collection.name,
                format_ts(collection.created_at),
                format_ts(collection.updated_at)
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                EngineError::conflict("Collection", "name", &collection.name)
            } else {
                storage_err(e)
            }
        })?;

        insert_attributes(&tx, collection)?;
        tx.commit().map_err(storage_err)
    }

    fn save_collection(&self, collection: &Collection) -> Result<()> {
        let mut inner = self.inner.lock();
        let tx = inner.conn.transaction().map_err(storage_err)?;

        let affected = tx
            .execute(
                "UPDATE collections SET updated_at = ?2 WHERE id = ?1",
                params![collection.id.to_string(), format_ts(collection.updated_at)],
            )
            .map_err(storage_err)?;
        if affected == 0 {
            return Err(EngineError::not_found(
                "Collection",
                "id",
                collection.id.to_string(),
            ));
        }

        tx.execute(
            "DELETE FROM attributes WHERE collection_id = ?1",
            params![collection.id.to_string()],
        )
        .map_err(storage_err)?;
        insert_attributes(&tx, collection)?;
        tx.commit().map_err(storage_err)
    }

    fn delete_collection(&self, id: CollectionId) -> Result<bool> {
        let inner = self.inner.lock();
        let affected = inner
            .conn
            .execute(
                "DELETE FROM collections WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(storage_err)?;
        Ok(affected > 0)
    }

    fn collection_by_id(&self, id: CollectionId) -> Result<Option<Collection>> {
        let inner = self.inner.lock();
        load_collection(
            &inner.conn,
            "SELECT id, tenant_id, name, created_at, updated_at FROM collections WHERE id = ?1",
            &id.to_string(),
        )
    }

    fn collection_by_name(&self, tenant_id: TenantId, name: &str) -> Result<Option<Collection>> {
        let inner = self.inner.lock();
        let row = inner
            .conn
            .query_row(
                "SELECT id, tenant_id, name, created_at, updated_at
                 FROM collections WHERE tenant_id = ?1 AND name = ?2",
                params![tenant_id.to_string(), name],
                collection_row,
            )
            .optional()
            .map_err(storage_err)?;
        row.map(|head| finish_collection(&inner.conn, head)).transpose()
    }

    fn collection_exists(&self, tenant_id: TenantId, name: &str) -> Result<bool> {
        let inner = self.inner.lock();
        let count: i64 = inner
            .conn
            .query_row(
                "SELECT COUNT(*) FROM collections WHERE tenant_id = ?1 AND name = ?2",
                params![tenant_id.to_string(), name],
                |row| row.get(0),
            )
            .map_err(storage_err)?;
        Ok(count > 0)
    }

    fn collections_by_tenant(
        &self,
        tenant_id: TenantId,
        page: PageRequest,
    ) -> Result<Page<Collection>> {
        let inner = self.inner.lock();
        let total: i64 = inner
            .conn
            .query_row(
                "SELECT COUNT(*) FROM collections WHERE tenant_id = ?1",
                params![tenant_id.to_string()],
                |row| row.get(0),
            )
            .map_err(storage_err)?;

        let mut stmt = inner
            .conn
            .prepare(
                "SELECT id, tenant_id, name, created_at, updated_at
                 FROM collections WHERE tenant_id = ?1
                 ORDER BY name LIMIT ?2 OFFSET ?3",
            )
            .map_err(storage_err)?;
        let heads = stmt
            .query_map(
                params![
                    tenant_id.to_string(),
                    i64::from(page.per_page),
                    page.offset() as i64
                ],
                collection_row,
            )
            .map_err(storage_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        let mut items = Vec::with_capacity(heads.len());
        for head in heads {
            items.push(finish_collection(&inner.conn, head)?);
        }

        Ok(Page::new(items, page, total as u64))
    }
}

/// Raw collection row before attributes are loaded
struct CollectionHead {
    id: String,
    tenant_id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

fn collection_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CollectionHead> {
    Ok(CollectionHead {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn load_tenant(conn: &Connection, sql: &str, key: &str) -> Result<Option<Tenant>> {
    let row = conn
        .query_row(sql, params![key], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .optional()
        .map_err(storage_err)?;

    row.map(|(id, name, created_at)| {
        Ok(Tenant {
            id: TenantId::parse_str(&id)
                .ok_or_else(|| EngineError::storage(format!("corrupt tenant id '{id}'")))?,
            name,
            created_at: parse_ts(&created_at)?,
        })
    })
    .transpose()
}

fn load_collection(conn: &Connection, sql: &str, key: &str) -> Result<Option<Collection>> {
    let row = conn
        .query_row(sql, params![key], collection_row)
        .optional()
        .map_err(storage_err)?;
    row.map(|head| finish_collection(conn, head)).transpose()
}

fn finish_collection(conn: &Connection, head: CollectionHead) -> Result<Collection> {
    let id = CollectionId::parse_str(&head.id)
        .ok_or_else(|| EngineError::storage(format!("corrupt collection id '{}'", head.id)))?;
    let tenant_id = TenantId::parse_str(&head.tenant_id)
        .ok_or_else(|| EngineError::storage(format!("corrupt tenant id '{}'", head.tenant_id)))?;

    let mut stmt = conn
        .prepare(
            "SELECT name, data_type, indexed, config FROM attributes
             WHERE collection_id = ?1 ORDER BY position",
        )
        .map_err(storage_err)?;
    let rows = stmt
        .query_map(params![head.id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(storage_err)?;

    let mut attributes = Vec::new();
    for row in rows {
        let (name, data_type, indexed, config) = row.map_err(storage_err)?;
        attributes.push(Attribute {
            name,
            data_type: data_type
                .parse::<AttributeType>()
                .map_err(EngineError::storage)?,
            indexed,
            config: serde_json::from_str::<AttributeConfig>(&config)
                .map_err(|e| EngineError::storage(format!("corrupt attribute config: {e}")))?,
        });
    }

    Ok(Collection {
        id,
        tenant_id,
        name: head.name,
        attributes,
        created_at: parse_ts(&head.created_at)?,
        updated_at: parse_ts(&head.updated_at)?,
    })
}

fn insert_attributes(tx: &rusqlite::Transaction<'_>, collection: &Collection) -> Result<()> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO attributes (collection_id, name, data_type, indexed, config, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(storage_err)?;
    for (position, attr) in collection.attributes.iter().enumerate() {
        let config = serde_json::to_string(&attr.config)
            .map_err(|e| EngineError::storage(e.to_string()))?;
        stmt.execute(params![
            collection.id.to_string(),
            attr.name,
            attr.data_type.as_str(),
            attr.indexed,
            config,
            position as i64
        ])
        .map_err(storage_err)?;
    }
    Ok(())
}

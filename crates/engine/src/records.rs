//! Record validation and repository delegation
//!
//! Every write validates the payload against the owning collection's
//! CURRENT attribute set before anything reaches the physical table: a
//! required attribute absent from the payload fails, a present value runs
//! the type registry's chain for its attribute. The first failing field
//! aborts the whole write; there are no partial writes.
//!
//! Reads and deletes resolve the physical table name and delegate; no
//! schema involvement beyond the collection lookup.

use crate::Engine;
use tessera_core::{
    naming, Collection, DataRecord, EngineError, Payload, RecordId, Result, TenantId,
};
use tracing::debug;

impl Engine {
    /// Validate and insert a record
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection, `Validation` on the
    /// first failing field, `IllegalArgument` for an oversized payload,
    /// `Storage` on driver failure.
    pub fn create_record(
        &self,
        tenant_id: TenantId,
        collection_name: &str,
        data: Payload,
    ) -> Result<DataRecord> {
        let (collection, schema, table) = self.resolve_collection(tenant_id, collection_name)?;
        self.check_payload_size(&data)?;
        self.validate_payload(&collection, &data)?;

        let record = self
            .driver
            .insert_record(&schema, &table, RecordId::new(), &data)?;

        debug!(collection = %collection.name, record = %record.id, "created record");
        Ok(record)
    }

    /// Validate and replace a record's payload
    ///
    /// # Errors
    ///
    /// As [`Engine::create_record`], plus `ResourceNotFound` when the
    /// record id does not exist.
    pub fn update_record(
        &self,
        tenant_id: TenantId,
        collection_name: &str,
        id: RecordId,
        data: Payload,
    ) -> Result<DataRecord> {
        let (collection, schema, table) = self.resolve_collection(tenant_id, collection_name)?;
        self.check_payload_size(&data)?;
        self.validate_payload(&collection, &data)?;

        self.driver
            .update_record(&schema, &table, id, &data)?
            .ok_or_else(|| EngineError::not_found("Record", "id", id.to_string()))
    }

    /// Load a record by id
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection or record.
    pub fn get_record(
        &self,
        tenant_id: TenantId,
        collection_name: &str,
        id: RecordId,
    ) -> Result<DataRecord> {
        let (_, schema, table) = self.resolve_collection(tenant_id, collection_name)?;
        self.driver
            .fetch_record(&schema, &table, id)?
            .ok_or_else(|| EngineError::not_found("Record", "id", id.to_string()))
    }

    /// List a collection's records, newest first
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection.
    pub fn list_records(
        &self,
        tenant_id: TenantId,
        collection_name: &str,
    ) -> Result<Vec<DataRecord>> {
        let (_, schema, table) = self.resolve_collection(tenant_id, collection_name)?;
        self.driver.list_records(&schema, &table)
    }

    /// Delete a record by id
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection or record.
    pub fn delete_record(
        &self,
        tenant_id: TenantId,
        collection_name: &str,
        id: RecordId,
    ) -> Result<()> {
        let (_, schema, table) = self.resolve_collection(tenant_id, collection_name)?;
        if !self.driver.delete_record(&schema, &table, id)? {
            return Err(EngineError::not_found("Record", "id", id.to_string()));
        }
        Ok(())
    }

    fn resolve_collection(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> Result<(Collection, String, String)> {
        let collection = self.get_collection_by_name(tenant_id, name)?;
        let schema = naming::schema_name(tenant_id);
        let table = naming::table_name(tenant_id, &collection.name)?;
        Ok((collection, schema, table))
    }

    /// Field-by-field validation against the current attribute set
    ///
    /// Payload fields with no matching attribute are ignored.
    fn validate_payload(&self, collection: &Collection, data: &Payload) -> Result<()> {
        for attribute in &collection.attributes {
            let value = data.get(&attribute.name);
            self.registry
                .validate(attribute.data_type, &attribute.name, value, &attribute.config)?;
        }
        Ok(())
    }

    fn check_payload_size(&self, data: &Payload) -> Result<()> {
        let size = serde_json::to_vec(data)
            .map_err(|e| EngineError::storage(e.to_string()))?
            .len();
        if size > self.limits.max_payload_bytes {
            return Err(EngineError::illegal_argument(format!(
                "record payload exceeds {} bytes",
                self.limits.max_payload_bytes
            )));
        }
        Ok(())
    }
}

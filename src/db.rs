pub mod composition;
pub mod driver;
pub mod fleet;
pub mod record;
pub mod snapshot;
pub mod storage;
pub mod work_order;

use itertools::Itertools;
use serde_json::Value;

pub use self::{
    composition::{Composition, CompositionChanges},
    driver::Driver,
    fleet::FleetUnit,
    record::{CollectionKey, Record},
    snapshot::{ImportSummary, Snapshot},
    storage::{FileStorage, Storage},
    work_order::{NewWorkOrder, StandBy, WorkOrderChanges, WorkOrderFilter},
};
#[cfg(test)]
pub use self::storage::MemoryStorage;
use crate::{
    core::{Clock, RecordId},
    prelude::*,
};

/// Typed record collections on top of the key-value storage.
#[must_use]
pub struct Db<S> {
    storage: S,
    clock: Box<dyn Clock>,
}

impl<S: Storage> Db<S> {
    pub fn new(storage: S, clock: impl Clock + 'static) -> Self {
        Self { storage, clock: Box::new(clock) }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Read the whole collection, a missing key is an empty collection.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let key = R::KEY.as_str();
        match self.storage.get(key)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("failed to deserialize the `{key}` collection")),
        }
    }

    /// Replace the whole collection.
    #[instrument(skip_all, fields(key = R::KEY.as_str(), n_records = records.len()))]
    pub fn save_all<R: Record>(&mut self, records: &[R]) -> Result {
        let value = serde_json::to_value(records)
            .with_context(|| format!("failed to serialize the `{}` collection", R::KEY.as_str()))?;
        self.storage.set(R::KEY.as_str(), value)
    }

    pub fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>> {
        Ok(self.list::<R>()?.into_iter().find(|record| record.id() == id))
    }

    pub fn insert<R: Record>(&mut self, record: R) -> Result<R> {
        let mut records = self.list::<R>()?;
        records.push(record.clone());
        self.save_all(&records)?;
        info!(kind = R::NAME, id = %record.id(), "inserted");
        Ok(record)
    }

    /// Modify the record in place and save it, unless the modification fails.
    pub fn update<R: Record>(
        &mut self,
        id: RecordId,
        modify: impl FnOnce(&mut R) -> Result,
    ) -> Result<R> {
        let mut records = self.list::<R>()?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .with_context(|| format!("there is no {} with id `{id}`", R::NAME))?;
        modify(record)?;
        let updated = record.clone();
        self.save_all(&records)?;
        info!(kind = R::NAME, %id, "updated");
        Ok(updated)
    }

    /// Delete the record, returning whether it existed.
    pub fn delete<R: Record>(&mut self, id: RecordId) -> Result<bool> {
        let mut records = self.list::<R>()?;
        let n_records = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == n_records {
            return Ok(false);
        }
        self.save_all(&records)?;
        info!(kind = R::NAME, %id, "deleted");
        Ok(true)
    }

    /// Find the single record whose identifier starts with the prefix.
    pub fn resolve_id<R: Record>(&self, prefix: &str) -> Result<RecordId> {
        let prefix = prefix.trim();
        ensure!(!prefix.is_empty(), "{} id must not be blank", R::NAME);
        let matches =
            self.list::<R>()?.iter().map(Record::id).filter(|id| id.starts_with(prefix)).collect_vec();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => bail!("there is no {} with id `{prefix}`", R::NAME),
            _ => bail!("`{prefix}` matches {} {} records, use a longer prefix", matches.len(), R::NAME),
        }
    }
}

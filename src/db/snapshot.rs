use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    core::WorkOrder,
    db::{Composition, Db, Driver, FleetUnit, Record, Storage},
    prelude::*,
};

/// Portable copy of every collection.
///
/// Absent collections are left untouched on import.
#[must_use]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub fleet_units: Option<Vec<FleetUnit>>,
    pub compositions: Option<Vec<Composition>>,
    pub drivers: Option<Vec<Driver>>,
    pub work_orders: Option<Vec<WorkOrder>>,
    pub exported_at: Option<NaiveDateTime>,
}

/// Number of records written per collection, `None` for the skipped ones.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub n_fleet_units: Option<usize>,
    pub n_compositions: Option<usize>,
    pub n_drivers: Option<usize>,
    pub n_work_orders: Option<usize>,
}

impl<S: Storage> Db<S> {
    #[instrument(skip_all)]
    pub fn export(&self) -> Result<Snapshot> {
        info!("exporting…");
        Ok(Snapshot {
            fleet_units: Some(self.list()?),
            compositions: Some(self.list()?),
            drivers: Some(self.list()?),
            work_orders: Some(self.list()?),
            exported_at: Some(self.clock().now()),
        })
    }

    /// Replace the collections present in the snapshot.
    #[instrument(skip_all, fields(exported_at = ?snapshot.exported_at))]
    pub fn import(&mut self, snapshot: Snapshot) -> Result<ImportSummary> {
        info!("importing…");
        let summary = ImportSummary {
            n_fleet_units: self.replace(snapshot.fleet_units)?,
            n_compositions: self.replace(snapshot.compositions)?,
            n_drivers: self.replace(snapshot.drivers)?,
            n_work_orders: self.replace(snapshot.work_orders)?,
        };
        info!(?summary, "imported");
        Ok(summary)
    }

    fn replace<R: Record>(&mut self, records: Option<Vec<R>>) -> Result<Option<usize>> {
        let Some(records) = records else {
            debug!(key = R::KEY.as_str(), "absent, skipping");
            return Ok(None);
        };
        self.save_all(&records)?;
        Ok(Some(records.len()))
    }
}

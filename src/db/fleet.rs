use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::{RecordId, ValidationError},
    db::{CollectionKey, Db, Record, Storage},
    prelude::*,
};

/// Mechanical tractor unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetUnit {
    pub id: RecordId,

    /// Fleet number, for example, `T2506`.
    #[serde(default)]
    pub fleet_name: String,

    pub plate: String,

    pub created_at: NaiveDateTime,
}

impl Record for FleetUnit {
    const KEY: CollectionKey = CollectionKey::FleetUnits;
    const NAME: &'static str = "fleet unit";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl FleetUnit {
    /// Label shown next to the work orders: the fleet name, falling back to the plate.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.fleet_name.is_empty() { &self.plate } else { &self.fleet_name }
    }

    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let search = search.to_lowercase();
        self.plate.to_lowercase().contains(&search)
            || self.fleet_name.to_lowercase().contains(&search)
    }
}

/// Split an import line into the fleet name and the plate, the plate being the last word.
fn parse_import_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.rsplit_once(char::is_whitespace) {
        Some((fleet_name, plate)) => Some((fleet_name.trim(), plate)),
        None => Some(("", line)),
    }
}

impl<S: Storage> Db<S> {
    pub fn fleet_units(&self, search: Option<&str>) -> Result<Vec<FleetUnit>> {
        let mut units = self.list::<FleetUnit>()?;
        if let Some(search) = search {
            units.retain(|unit| unit.matches(search));
        }
        Ok(units)
    }

    #[instrument(skip_all, fields(plate = plate))]
    pub fn add_fleet_unit(&mut self, fleet_name: &str, plate: &str) -> Result<FleetUnit> {
        let plate = plate.trim();
        if plate.is_empty() {
            return Err(ValidationError::Blank("plate").into());
        }
        if self.list::<FleetUnit>()?.iter().any(|unit| unit.plate == plate) {
            return Err(ValidationError::DuplicatePlate(plate.to_string()).into());
        }
        self.insert(FleetUnit {
            id: RecordId::random(),
            fleet_name: fleet_name.trim().to_string(),
            plate: plate.to_string(),
            created_at: self.clock().now(),
        })
    }

    /// Register the fleet units listed one per line, skipping the already known plates.
    #[instrument(skip_all)]
    pub fn import_fleet_units(&mut self, text: &str) -> Result<Vec<FleetUnit>> {
        let mut units = self.list::<FleetUnit>()?;
        let now = self.clock().now();
        let mut imported = Vec::new();

        for (fleet_name, plate) in text.lines().filter_map(parse_import_line) {
            if units.iter().chain(&imported).any(|unit: &FleetUnit| unit.plate == plate) {
                debug!(plate, "skipping the known plate");
                continue;
            }
            imported.push(FleetUnit {
                id: RecordId::random(),
                fleet_name: fleet_name.to_string(),
                plate: plate.to_string(),
                created_at: now,
            });
        }

        if !imported.is_empty() {
            units.extend(imported.iter().cloned());
            self.save_all(&units)?;
        }
        info!(n_imported = imported.len(), "imported");
        Ok(imported)
    }

    pub fn update_fleet_unit(
        &mut self,
        id: RecordId,
        fleet_name: Option<&str>,
        plate: Option<&str>,
    ) -> Result<FleetUnit> {
        let plate = plate.map(str::trim);
        if let Some(plate) = plate {
            if plate.is_empty() {
                return Err(ValidationError::Blank("plate").into());
            }
            if self.list::<FleetUnit>()?.iter().any(|unit| unit.id != id && unit.plate == plate) {
                return Err(ValidationError::DuplicatePlate(plate.to_string()).into());
            }
        }
        self.update::<FleetUnit>(id, |unit| {
            if let Some(fleet_name) = fleet_name {
                unit.fleet_name = fleet_name.trim().to_string();
            }
            if let Some(plate) = plate {
                unit.plate = plate.to_string();
            }
            Ok(())
        })
    }
}

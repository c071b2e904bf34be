use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::{RecordId, ValidationError},
    db::{CollectionKey, Db, Record, Storage},
    prelude::*,
};

/// Pair of trailers tracked as a single maintenance unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: RecordId,

    /// For example, `C01`.
    pub identifier: String,

    pub first_plate: String,

    pub second_plate: String,

    pub created_at: NaiveDateTime,
}

impl Record for Composition {
    const KEY: CollectionKey = CollectionKey::Compositions;
    const NAME: &'static str = "composition";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Composition {
    #[must_use]
    pub fn reference_plate(&self) -> String {
        format!("{} {}", self.first_plate, self.second_plate)
    }

    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let search = search.to_lowercase();
        [&self.identifier, &self.first_plate, &self.second_plate]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&search))
    }
}

/// Partial update of a composition.
#[derive(Default)]
pub struct CompositionChanges {
    pub identifier: Option<String>,
    pub first_plate: Option<String>,
    pub second_plate: Option<String>,
}

impl<S: Storage> Db<S> {
    pub fn compositions(&self, search: Option<&str>) -> Result<Vec<Composition>> {
        let mut compositions = self.list::<Composition>()?;
        if let Some(search) = search {
            compositions.retain(|composition| composition.matches(search));
        }
        Ok(compositions)
    }

    #[instrument(skip_all, fields(identifier = identifier))]
    pub fn add_composition(
        &mut self,
        identifier: &str,
        first_plate: &str,
        second_plate: &str,
    ) -> Result<Composition> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ValidationError::Blank("identifier").into());
        }
        self.ensure_unique_identifier(None, identifier)?;
        self.insert(Composition {
            id: RecordId::random(),
            identifier: identifier.to_string(),
            first_plate: first_plate.trim().to_string(),
            second_plate: second_plate.trim().to_string(),
            created_at: self.clock().now(),
        })
    }

    pub fn update_composition(
        &mut self,
        id: RecordId,
        changes: CompositionChanges,
    ) -> Result<Composition> {
        if let Some(identifier) = &changes.identifier {
            let identifier = identifier.trim();
            if identifier.is_empty() {
                return Err(ValidationError::Blank("identifier").into());
            }
            self.ensure_unique_identifier(Some(id), identifier)?;
        }
        self.update::<Composition>(id, |composition| {
            if let Some(identifier) = changes.identifier {
                composition.identifier = identifier.trim().to_string();
            }
            if let Some(first_plate) = changes.first_plate {
                composition.first_plate = first_plate.trim().to_string();
            }
            if let Some(second_plate) = changes.second_plate {
                composition.second_plate = second_plate.trim().to_string();
            }
            Ok(())
        })
    }

    fn ensure_unique_identifier(&self, except: Option<RecordId>, identifier: &str) -> Result {
        let is_taken = self
            .list::<Composition>()?
            .iter()
            .any(|composition| Some(composition.id) != except && composition.identifier == identifier);
        if is_taken {
            return Err(ValidationError::DuplicateIdentifier(identifier.to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::db;

    #[test]
    fn add_ok() -> Result {
        let mut db = db();
        let composition = db.add_composition("C01", "QAH0J25", "QAH0J27")?;
        assert_eq!(composition.reference_plate(), "QAH0J25 QAH0J27");
        assert_eq!(db.compositions(Some("j27"))?.len(), 1);
        assert_eq!(db.compositions(Some("c02"))?.len(), 0);
        Ok(())
    }

    #[test]
    fn add_duplicate_identifier_fails() -> Result {
        let mut db = db();
        db.add_composition("C01", "QAH0J25", "QAH0J27")?;
        assert!(db.add_composition("C01", "QAH0J28", "QAH0J29").is_err());
        assert!(db.add_composition(" ", "QAH0J28", "QAH0J29").is_err());
        Ok(())
    }

    #[test]
    fn update_ok() -> Result {
        let mut db = db();
        let first = db.add_composition("C01", "QAH0J25", "QAH0J27")?;
        let second = db.add_composition("C02", "QAH0J28", "QAH0J29")?;

        let changes = CompositionChanges { second_plate: Some("QAH0J30".into()), ..Default::default() };
        let updated = db.update_composition(first.id, changes)?;
        assert_eq!(updated.reference_plate(), "QAH0J25 QAH0J30");

        let changes = CompositionChanges { identifier: Some("C01".into()), ..Default::default() };
        assert!(db.update_composition(second.id, changes).is_err());
        Ok(())
    }
}

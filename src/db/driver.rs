use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::{RecordId, ValidationError},
    db::{CollectionKey, Db, Record, Storage},
    prelude::*,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: RecordId,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl Record for Driver {
    const KEY: CollectionKey = CollectionKey::Drivers;
    const NAME: &'static str = "driver";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl<S: Storage> Db<S> {
    pub fn drivers(&self, search: Option<&str>) -> Result<Vec<Driver>> {
        let mut drivers = self.list::<Driver>()?;
        if let Some(search) = search.map(str::to_lowercase) {
            drivers.retain(|driver| driver.name.to_lowercase().contains(&search));
        }
        Ok(drivers)
    }

    pub fn add_driver(&mut self, name: &str) -> Result<Driver> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Blank("name").into());
        }
        self.insert(Driver {
            id: RecordId::random(),
            name: name.to_string(),
            created_at: self.clock().now(),
        })
    }

    pub fn rename_driver(&mut self, id: RecordId, name: &str) -> Result<Driver> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Blank("name").into());
        }
        self.update::<Driver>(id, |driver| {
            driver.name = name.to_string();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::db;

    #[test]
    fn drivers_ok() -> Result {
        let mut db = db();
        let driver = db.add_driver(" Maria Souza ")?;
        db.add_driver("João Pereira")?;
        assert_eq!(driver.name, "Maria Souza");
        assert_eq!(db.drivers(Some("souza"))?.len(), 1);
        assert_eq!(db.drivers(None)?.len(), 2);

        assert_eq!(db.rename_driver(driver.id, "Maria S.")?.name, "Maria S.");
        assert!(db.rename_driver(driver.id, "").is_err());
        assert!(db.add_driver("").is_err());
        Ok(())
    }
}

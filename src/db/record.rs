use serde::{Serialize, de::DeserializeOwned};

use crate::core::RecordId;

/// Storage key of a record collection.
#[derive(Copy, Clone, Debug)]
pub enum CollectionKey {
    FleetUnits,
    Compositions,
    Drivers,
    WorkOrders,
}

impl CollectionKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FleetUnits => "cavalos-mecanicos",
            Self::Compositions => "composicoes",
            Self::Drivers => "motoristas",
            Self::WorkOrders => "ordens-servico",
        }
    }
}

/// Record stored as an element of a JSON array under its collection key.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KEY: CollectionKey;

    /// Human-readable name used in messages.
    const NAME: &'static str;

    fn id(&self) -> RecordId;
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Asset category a work order applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleType {
    /// Mechanical tractor unit.
    Fleet,

    /// Set of trailer plates tracked as one maintenance unit.
    Composition,
}

impl Display for VehicleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fleet => write!(f, "fleet unit"),
            Self::Composition => write!(f, "composition"),
        }
    }
}

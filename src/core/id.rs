use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record identifier, a random UUID assigned on insert.
#[must_use]
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Display, From, FromStr, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight characters, enough to tell records apart on screen.
    #[must_use]
    pub fn short(self) -> String {
        let mut short = self.0.simple().to_string();
        short.truncate(8);
        short
    }

    /// Check whether the hyphenated or simple form starts with the prefix.
    #[must_use]
    pub fn starts_with(self, prefix: &str) -> bool {
        let prefix = prefix.to_ascii_lowercase();
        self.0.hyphenated().to_string().starts_with(&prefix)
            || self.0.simple().to_string().starts_with(&prefix)
    }
}

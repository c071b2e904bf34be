use std::path::PathBuf;

use clap::Parser;

use crate::{
    core::{FixedClock, LocalTimestamp, SystemClock},
    db::{Db, FileStorage},
    prelude::*,
};

#[derive(Parser)]
pub struct StoreArgs {
    /// JSON file keeping all the records.
    #[clap(long, env = "FROTA_STORE_PATH", default_value = "frota.json", global = true)]
    store_path: PathBuf,

    /// Pretend the current time is this, for example, `19-10-2026 15:00`.
    #[clap(long, env = "FROTA_NOW", global = true)]
    now: Option<LocalTimestamp>,
}

impl StoreArgs {
    pub fn open(&self) -> Result<Db<FileStorage>> {
        let storage = FileStorage::open(&self.store_path)?;
        Ok(match self.now {
            Some(now) => {
                info!(%now, "using the fixed clock");
                Db::new(storage, FixedClock(now.into()))
            }
            None => Db::new(storage, SystemClock),
        })
    }
}

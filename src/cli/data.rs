use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::{
    db::{Db, ImportSummary, Snapshot, Storage},
    prelude::*,
};

#[derive(Parser)]
pub struct DataArgs {
    #[command(subcommand)]
    command: DataCommand,
}

#[derive(Subcommand)]
enum DataCommand {
    /// Dump every collection into a single JSON document.
    Export {
        /// Write to the file instead of the standard output.
        #[clap(long)]
        output: Option<PathBuf>,
    },

    /// Replace the collections present in the previously exported document.
    Import { file: PathBuf },
}

impl DataArgs {
    #[instrument(skip_all)]
    pub fn run(self, db: &mut Db<impl Storage>) -> Result {
        match self.command {
            DataCommand::Export { output } => {
                let contents = serde_json::to_string_pretty(&db.export()?)?;
                match output {
                    Some(path) => {
                        fs::write(&path, contents)
                            .with_context(|| format!("failed to write `{}`", path.display()))?;
                        info!(path = %path.display(), "exported");
                    }
                    None => println!("{contents}"),
                }
            }
            DataCommand::Import { file } => {
                let contents = fs::read_to_string(&file)
                    .with_context(|| format!("failed to read `{}`", file.display()))?;
                let snapshot: Snapshot = serde_json::from_str(&contents)
                    .with_context(|| format!("`{}` is not a valid export", file.display()))?;
                let ImportSummary { n_fleet_units, n_compositions, n_drivers, n_work_orders } =
                    db.import(snapshot)?;
                for (name, n_records) in [
                    ("fleet units", n_fleet_units),
                    ("compositions", n_compositions),
                    ("drivers", n_drivers),
                    ("work orders", n_work_orders),
                ] {
                    match n_records {
                        Some(n_records) => println!("{name}: {n_records} imported"),
                        None => println!("{name}: kept"),
                    }
                }
            }
        }
        Ok(())
    }
}

use std::{fs, io, io::Read, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::{
    db::{Db, FleetUnit, Storage},
    prelude::*,
    tables::build_fleet_units_table,
};

#[derive(Parser)]
pub struct FleetArgs {
    #[command(subcommand)]
    command: FleetCommand,
}

impl FleetArgs {
    pub fn run(self, db: &mut Db<impl Storage>) -> Result {
        match self.command {
            FleetCommand::List { search } => {
                let units = db.fleet_units(search.as_deref())?;
                println!("{}", build_fleet_units_table(&units));
            }
            FleetCommand::Add { plate, fleet_name } => {
                let unit = db.add_fleet_unit(fleet_name.as_deref().unwrap_or_default(), &plate)?;
                println!("{}", build_fleet_units_table(&[unit]));
            }
            FleetCommand::Import { file } => {
                let text = match file {
                    Some(path) => fs::read_to_string(&path)
                        .with_context(|| format!("failed to read `{}`", path.display()))?,
                    None => {
                        let mut text = String::new();
                        io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
                        text
                    }
                };
                let units = db.import_fleet_units(&text)?;
                println!("{}", build_fleet_units_table(&units));
            }
            FleetCommand::Update { id, plate, fleet_name } => {
                let id = db.resolve_id::<FleetUnit>(&id)?;
                let unit = db.update_fleet_unit(id, fleet_name.as_deref(), plate.as_deref())?;
                println!("{}", build_fleet_units_table(&[unit]));
            }
            FleetCommand::Remove { id } => {
                let id = db.resolve_id::<FleetUnit>(&id)?;
                db.delete::<FleetUnit>(id)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum FleetCommand {
    /// List the fleet units.
    List {
        /// Case-insensitive search over the plate and fleet name.
        #[clap(long)]
        search: Option<String>,
    },

    /// Register a fleet unit.
    Add {
        #[clap(long)]
        plate: String,

        /// For example, `T2506`.
        #[clap(long)]
        fleet_name: Option<String>,
    },

    /// Register fleet units listed one per line as `<fleet name> <plate>`.
    Import {
        /// Read the list from the file instead of the standard input.
        #[clap(long)]
        file: Option<PathBuf>,
    },

    Update {
        /// Full identifier or its unique prefix.
        id: String,

        #[clap(long)]
        plate: Option<String>,

        #[clap(long)]
        fleet_name: Option<String>,
    },

    Remove {
        id: String,
    },
}

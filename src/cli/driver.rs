use clap::{Parser, Subcommand};

use crate::{
    db::{Db, Driver, Storage},
    prelude::*,
    tables::build_drivers_table,
};

#[derive(Parser)]
pub struct DriverArgs {
    #[command(subcommand)]
    command: DriverCommand,
}

impl DriverArgs {
    pub fn run(self, db: &mut Db<impl Storage>) -> Result {
        match self.command {
            DriverCommand::List { search } => {
                println!("{}", build_drivers_table(&db.drivers(search.as_deref())?));
            }
            DriverCommand::Add { name } => {
                println!("{}", build_drivers_table(&[db.add_driver(&name)?]));
            }
            DriverCommand::Update { id, name } => {
                let id = db.resolve_id::<Driver>(&id)?;
                println!("{}", build_drivers_table(&[db.rename_driver(id, &name)?]));
            }
            DriverCommand::Remove { id } => {
                let id = db.resolve_id::<Driver>(&id)?;
                db.delete::<Driver>(id)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum DriverCommand {
    List {
        #[clap(long)]
        search: Option<String>,
    },

    Add {
        #[clap(long)]
        name: String,
    },

    Update {
        /// Full identifier or its unique prefix.
        id: String,

        #[clap(long)]
        name: String,
    },

    Remove {
        id: String,
    },
}

use clap::{Parser, Subcommand};

use crate::{
    db::{Composition, CompositionChanges, Db, Storage},
    prelude::*,
    tables::build_compositions_table,
};

#[derive(Parser)]
pub struct CompositionArgs {
    #[command(subcommand)]
    command: CompositionCommand,
}

impl CompositionArgs {
    pub fn run(self, db: &mut Db<impl Storage>) -> Result {
        match self.command {
            CompositionCommand::List { search } => {
                let compositions = db.compositions(search.as_deref())?;
                println!("{}", build_compositions_table(&compositions));
            }
            CompositionCommand::Add { identifier, first_plate, second_plate } => {
                let composition = db.add_composition(&identifier, &first_plate, &second_plate)?;
                println!("{}", build_compositions_table(&[composition]));
            }
            CompositionCommand::Update { id, identifier, first_plate, second_plate } => {
                let id = db.resolve_id::<Composition>(&id)?;
                let changes = CompositionChanges { identifier, first_plate, second_plate };
                let composition = db.update_composition(id, changes)?;
                println!("{}", build_compositions_table(&[composition]));
            }
            CompositionCommand::Remove { id } => {
                let id = db.resolve_id::<Composition>(&id)?;
                db.delete::<Composition>(id)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum CompositionCommand {
    /// List the compositions.
    List {
        /// Case-insensitive search over the identifier and plates.
        #[clap(long)]
        search: Option<String>,
    },

    /// Register a composition.
    Add {
        /// For example, `C01`.
        #[clap(long)]
        identifier: String,

        /// Plate of the first trailer, also used to find the tractor for stand-by orders.
        #[clap(long)]
        first_plate: String,

        #[clap(long)]
        second_plate: String,
    },

    Update {
        /// Full identifier or its unique prefix.
        id: String,

        #[clap(long)]
        identifier: Option<String>,

        #[clap(long)]
        first_plate: Option<String>,

        #[clap(long)]
        second_plate: Option<String>,
    },

    Remove {
        id: String,
    },
}

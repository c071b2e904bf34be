mod availability;
mod composition;
mod data;
mod driver;
mod fleet;
mod order;
mod stats;
mod store;

use clap::{Parser, Subcommand};

use crate::{
    cli::{
        availability::AvailabilityArgs,
        composition::CompositionArgs,
        data::DataArgs,
        driver::DriverArgs,
        fleet::FleetArgs,
        order::OrderArgs,
        stats::StatsArgs,
        store::StoreArgs,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn run(self) -> Result {
        let mut db = self.store.open()?;
        match self.command {
            Command::Fleet(args) => args.run(&mut db),
            Command::Composition(args) => args.run(&mut db),
            Command::Driver(args) => args.run(&mut db),
            Command::Order(args) => args.run(&mut db),
            Command::Availability(args) => args.run(&db),
            Command::Stats(args) => args.run(&db),
            Command::Data(args) => args.run(&mut db),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage the mechanical tractor units.
    Fleet(FleetArgs),

    /// Manage the trailer compositions.
    Composition(CompositionArgs),

    /// Manage the drivers.
    Driver(DriverArgs),

    /// Open, close, and browse the maintenance work orders.
    Order(Box<OrderArgs>),

    /// Hourly mechanical availability over a single day.
    Availability(AvailabilityArgs),

    /// Work order counts and mean resolution time.
    Stats(StatsArgs),

    /// Back up and restore all the records.
    Data(DataArgs),
}

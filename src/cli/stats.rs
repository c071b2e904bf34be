use clap::Parser;

use crate::{
    core::{VehicleType, calculate_work_order_stats},
    db::{Db, Storage, WorkOrderFilter},
    prelude::*,
    tables::build_stats_table,
};

#[derive(Parser)]
pub struct StatsArgs {
    /// Only the orders of this vehicle type.
    #[clap(long, value_enum)]
    vehicle_type: Option<VehicleType>,
}

impl StatsArgs {
    pub fn run(self, db: &Db<impl Storage>) -> Result {
        let filter = WorkOrderFilter { vehicle_type: self.vehicle_type, ..Default::default() };
        let stats = calculate_work_order_stats(&db.work_orders(&filter)?);
        println!("{}", build_stats_table(&stats));
        Ok(())
    }
}

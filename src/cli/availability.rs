use chrono::{NaiveDate, Timelike};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    core::{
        AvailabilityReport,
        TargetAssessment,
        VehicleType,
        WorkOrder,
        calculate_availability,
        parse_date,
    },
    db::{Db, Storage},
    prelude::*,
    quantity::percent::{self, Percent},
    tables::build_availability_table,
};

#[derive(Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Toml,
}

#[derive(Parser)]
pub struct AvailabilityArgs {
    /// Analysis date, `DD-MM-YYYY` or `YYYY-MM-DD`, defaults to today.
    #[clap(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[clap(long, value_enum, default_value = "fleet")]
    vehicle_type: VehicleType,

    /// Availability target percent.
    #[clap(long, default_value = "90", env = "FROTA_TARGET", value_parser = percent::parse_bounded)]
    target: Percent,

    #[clap(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct Output<'a> {
    report: &'a AvailabilityReport,
    target: &'a TargetAssessment,
}

impl AvailabilityArgs {
    #[instrument(skip_all, fields(vehicle_type = ?self.vehicle_type))]
    pub fn run(self, db: &Db<impl Storage>) -> Result {
        let now = db.clock().now();
        let analysis_date = self.date.unwrap_or_else(|| now.date());
        let fleet_size = db.fleet_size(self.vehicle_type)?;
        let work_orders = db.list::<WorkOrder>()?;
        info!(%analysis_date, fleet_size, n_work_orders = work_orders.len(), "calculating…");

        let report =
            calculate_availability(fleet_size, &work_orders, analysis_date, self.vehicle_type, now);
        let assessment = report.assess(self.target);
        info!(mean = %report.mean_percent, is_met = assessment.is_met, "calculated");

        let output = Output { report: &report, target: &assessment };
        match self.format {
            OutputFormat::Table => println!("{}", build_availability_table(&report, &assessment)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
            OutputFormat::Toml => println!("{}", toml::to_string_pretty(&output)?),
        }
        if matches!(self.format, OutputFormat::Table) && report.is_real_time() {
            println!("Real-time report, the hours after {:02}:00 are not computed yet.", now.hour());
        }
        Ok(())
    }
}

use clap::{Parser, Subcommand};

use crate::{
    core::{LocalTimestamp, MaintenanceType, RecordId, VehicleType, WorkOrder, WorkOrderStatus},
    db::{
        Composition,
        Db,
        FleetUnit,
        NewWorkOrder,
        StandBy,
        Storage,
        WorkOrderChanges,
        WorkOrderFilter,
    },
    prelude::*,
    tables::build_work_orders_table,
};

#[derive(Parser)]
pub struct OrderArgs {
    #[command(subcommand)]
    command: OrderCommand,
}

impl OrderArgs {
    pub fn run(self, db: &mut Db<impl Storage>) -> Result {
        match self.command {
            OrderCommand::List { vehicle_type, vehicle, open } => {
                let vehicle_id = match (vehicle, vehicle_type) {
                    (Some(prefix), Some(vehicle_type)) => {
                        Some(resolve_vehicle(db, vehicle_type, &prefix)?)
                    }
                    (Some(_), None) => bail!("`--vehicle` requires `--vehicle-type`"),
                    (None, _) => None,
                };
                let filter = WorkOrderFilter { vehicle_type, vehicle_id, open_only: open };
                println!("{}", build_work_orders_table(&db.work_orders(&filter)?));
            }
            OrderCommand::Open(args) => {
                let vehicle_id = resolve_vehicle(db, args.vehicle_type, &args.vehicle)?;
                let new = NewWorkOrder::builder()
                    .vehicle_type(args.vehicle_type)
                    .vehicle_id(vehicle_id)
                    .opened_at(args.opened_at)
                    .maybe_closed_at(args.closed_at)
                    .maintenance_type(args.maintenance_type)
                    .description(args.description.unwrap_or_default())
                    .status(args.status)
                    .stand_by(args.stand_by)
                    .build();
                let opened = db.open_work_order(new)?;
                let mut orders = vec![opened.work_order];
                match opened.stand_by {
                    StandBy::NotRequested => {}
                    StandBy::Created(stand_by_order) => orders.push(stand_by_order),
                    StandBy::Skipped(reason) => println!("Stand-by order is not created: {reason}"),
                }
                println!("{}", build_work_orders_table(&orders));
            }
            OrderCommand::Update {
                id,
                opened_at,
                closed_at,
                maintenance_type,
                description,
                status,
            } => {
                let id = db.resolve_id::<WorkOrder>(&id)?;
                let changes =
                    WorkOrderChanges { opened_at, closed_at, maintenance_type, description, status };
                println!("{}", build_work_orders_table(&[db.update_work_order(id, changes)?]));
            }
            OrderCommand::Close { id, closed_at } => {
                let id = db.resolve_id::<WorkOrder>(&id)?;
                println!("{}", build_work_orders_table(&[db.close_work_order(id, closed_at)?]));
            }
            OrderCommand::Cancel { id } => {
                let id = db.resolve_id::<WorkOrder>(&id)?;
                println!("{}", build_work_orders_table(&[db.cancel_work_order(id)?]));
            }
            OrderCommand::Remove { id } => {
                let id = db.resolve_id::<WorkOrder>(&id)?;
                db.delete::<WorkOrder>(id)?;
            }
        }
        Ok(())
    }
}

fn resolve_vehicle(
    db: &Db<impl Storage>,
    vehicle_type: VehicleType,
    prefix: &str,
) -> Result<RecordId> {
    match vehicle_type {
        VehicleType::Fleet => db.resolve_id::<FleetUnit>(prefix),
        VehicleType::Composition => db.resolve_id::<Composition>(prefix),
    }
}

#[derive(Subcommand)]
enum OrderCommand {
    /// List the work orders.
    List {
        #[clap(long, value_enum)]
        vehicle_type: Option<VehicleType>,

        /// Only the orders of this vehicle, requires `--vehicle-type`.
        #[clap(long)]
        vehicle: Option<String>,

        /// Only the orders in progress.
        #[clap(long)]
        open: bool,
    },

    /// Register a work order.
    Open(OpenOrderArgs),

    /// Change the work order fields, setting the status to `open` reopens the order.
    Update {
        /// Full identifier or its unique prefix.
        id: String,

        #[clap(long)]
        opened_at: Option<LocalTimestamp>,

        #[clap(long)]
        closed_at: Option<LocalTimestamp>,

        #[clap(long, value_enum)]
        maintenance_type: Option<MaintenanceType>,

        #[clap(long)]
        description: Option<String>,

        #[clap(long, value_enum)]
        status: Option<WorkOrderStatus>,
    },

    /// Complete the work order.
    Close {
        id: String,

        /// Defaults to now.
        #[clap(long)]
        closed_at: Option<LocalTimestamp>,
    },

    /// Mark the work order as never happened.
    Cancel {
        id: String,
    },

    Remove {
        id: String,
    },
}

#[derive(Parser)]
struct OpenOrderArgs {
    #[clap(long, value_enum)]
    vehicle_type: VehicleType,

    /// Fleet unit or composition identifier, or its unique prefix.
    #[clap(long)]
    vehicle: String,

    /// For example, `19-10-2026 08:00` or `2026-10-19T08:00`.
    #[clap(long)]
    opened_at: LocalTimestamp,

    /// Only for orders registered after the fact.
    #[clap(long)]
    closed_at: Option<LocalTimestamp>,

    #[clap(long, value_enum)]
    maintenance_type: MaintenanceType,

    #[clap(long)]
    description: Option<String>,

    #[clap(long, value_enum, default_value = "open")]
    status: WorkOrderStatus,

    /// Also put the tractor pulling the composition on stand-by.
    #[clap(long)]
    stand_by: bool,
}

use bon::Builder;

use crate::{
    core::{
        LocalTimestamp,
        MaintenanceType,
        RecordId,
        ValidationError,
        VehicleType,
        WorkOrder,
        WorkOrderStatus,
    },
    db::{CollectionKey, Composition, Db, FleetUnit, Record, Storage},
    prelude::*,
};

impl Record for WorkOrder {
    const KEY: CollectionKey = CollectionKey::WorkOrders;
    const NAME: &'static str = "work order";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// User input for a new work order.
#[must_use]
#[derive(Builder)]
pub struct NewWorkOrder {
    vehicle_type: VehicleType,
    vehicle_id: RecordId,
    opened_at: LocalTimestamp,
    closed_at: Option<LocalTimestamp>,
    maintenance_type: MaintenanceType,

    #[builder(into, default)]
    description: String,

    #[builder(default = WorkOrderStatus::Open)]
    status: WorkOrderStatus,

    /// Also open a stand-by order for the tractor of the composition.
    #[builder(default)]
    stand_by: bool,
}

pub struct OpenedWorkOrder {
    pub work_order: WorkOrder,
    pub stand_by: StandBy,
}

/// Outcome of the stand-by order request.
pub enum StandBy {
    NotRequested,
    Created(WorkOrder),
    Skipped(String),
}

/// Partial update of a work order.
#[derive(Default)]
pub struct WorkOrderChanges {
    pub opened_at: Option<LocalTimestamp>,
    pub closed_at: Option<LocalTimestamp>,
    pub maintenance_type: Option<MaintenanceType>,
    pub description: Option<String>,

    /// Reopening clears the closing time.
    pub status: Option<WorkOrderStatus>,
}

#[derive(Default)]
pub struct WorkOrderFilter {
    pub vehicle_type: Option<VehicleType>,
    pub vehicle_id: Option<RecordId>,
    pub open_only: bool,
}

impl WorkOrderFilter {
    #[must_use]
    pub fn matches(&self, order: &WorkOrder) -> bool {
        self.vehicle_type.is_none_or(|vehicle_type| order.vehicle_type == vehicle_type)
            && self.vehicle_id.is_none_or(|vehicle_id| order.vehicle_id == vehicle_id)
            && (!self.open_only || order.is_open())
    }
}

/// Check the timestamps and status of an order for consistency.
fn validate(order: &WorkOrder) -> Result<(), ValidationError> {
    if let Some(closed_at) = order.closed_at {
        if order.is_open() {
            return Err(ValidationError::OpenOrderWithClosingTime(closed_at));
        }
        if closed_at < order.opened_at {
            return Err(ValidationError::ClosedBeforeOpened { opened_at: order.opened_at, closed_at });
        }
    }
    if order.status == WorkOrderStatus::Completed && order.closed_at.is_none() {
        warn!(id = %order.id, "completed work order has no closing time and will not affect availability");
    }
    Ok(())
}

/// Make sure the vehicle is not already in maintenance.
fn ensure_no_open_order(
    orders: &[WorkOrder],
    order: &WorkOrder,
) -> Result<(), ValidationError> {
    let has_open_order = orders.iter().any(|other| {
        other.id != order.id
            && other.is_open()
            && other.vehicle_type == order.vehicle_type
            && other.vehicle_id == order.vehicle_id
    });
    if has_open_order {
        return Err(ValidationError::DuplicateOpenOrder(order.reference_plate.clone()));
    }
    Ok(())
}

impl<S: Storage> Db<S> {
    pub fn work_orders(&self, filter: &WorkOrderFilter) -> Result<Vec<WorkOrder>> {
        let mut orders = self.list::<WorkOrder>()?;
        orders.retain(|order| filter.matches(order));
        Ok(orders)
    }

    /// Number of registered vehicles of the type.
    pub fn fleet_size(&self, vehicle_type: VehicleType) -> Result<usize> {
        match vehicle_type {
            VehicleType::Fleet => Ok(self.list::<FleetUnit>()?.len()),
            VehicleType::Composition => Ok(self.list::<Composition>()?.len()),
        }
    }

    fn reference_plate(&self, vehicle_type: VehicleType, vehicle_id: RecordId) -> Result<String> {
        let plate = match vehicle_type {
            VehicleType::Fleet => self.get::<FleetUnit>(vehicle_id)?.map(|unit| unit.plate),
            VehicleType::Composition => {
                self.get::<Composition>(vehicle_id)?.map(|composition| composition.reference_plate())
            }
        };
        Ok(plate.ok_or(ValidationError::UnknownVehicle { vehicle_type, id: vehicle_id })?)
    }

    /// Register the work order, and the stand-by order for the composition tractor if requested.
    #[instrument(skip_all, fields(vehicle_type = ?new.vehicle_type, vehicle_id = %new.vehicle_id))]
    pub fn open_work_order(&mut self, new: NewWorkOrder) -> Result<OpenedWorkOrder> {
        let work_order = WorkOrder::builder()
            .vehicle_type(new.vehicle_type)
            .vehicle_id(new.vehicle_id)
            .reference_plate(self.reference_plate(new.vehicle_type, new.vehicle_id)?)
            .opened_at(new.opened_at)
            .maybe_closed_at(new.closed_at)
            .maintenance_type(new.maintenance_type)
            .description(new.description)
            .status(new.status)
            .created_at(self.clock().now())
            .build();
        validate(&work_order)?;

        let mut orders = self.list::<WorkOrder>()?;
        if work_order.is_open() {
            ensure_no_open_order(&orders, &work_order)?;
        }

        let stand_by = if new.stand_by {
            match self.stand_by_order(&orders, &work_order)? {
                Ok(stand_by_order) => StandBy::Created(stand_by_order),
                Err(reason) => {
                    warn!(%reason, "stand-by order is not created");
                    StandBy::Skipped(reason)
                }
            }
        } else {
            StandBy::NotRequested
        };

        orders.push(work_order.clone());
        if let StandBy::Created(stand_by_order) = &stand_by {
            orders.push(stand_by_order.clone());
        }
        self.save_all(&orders)?;
        info!(id = %work_order.id, "opened");

        Ok(OpenedWorkOrder { work_order, stand_by })
    }

    /// Build the order for the tractor pulling the composition, or explain why it is not possible.
    fn stand_by_order(
        &self,
        orders: &[WorkOrder],
        composition_order: &WorkOrder,
    ) -> Result<Result<WorkOrder, String>> {
        if composition_order.vehicle_type != VehicleType::Composition {
            return Ok(Err("stand-by orders are only created for compositions".to_string()));
        }
        let composition = self
            .get::<Composition>(composition_order.vehicle_id)?
            .context("the composition disappeared")?;
        let Some(tractor) = self
            .list::<FleetUnit>()?
            .into_iter()
            .find(|unit| unit.plate == composition.first_plate)
        else {
            return Ok(Err(format!(
                "there is no fleet unit with plate `{}`",
                composition.first_plate
            )));
        };

        let stand_by_order = WorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(tractor.id)
            .reference_plate(tractor.plate)
            .opened_at(composition_order.opened_at)
            .maybe_closed_at(composition_order.closed_at)
            .maintenance_type(composition_order.maintenance_type)
            .description(format!(
                "STAND-BY {} - {}",
                composition.identifier, composition_order.description
            ))
            .status(composition_order.status)
            .is_stand_by(true)
            .origin_composition_id(composition.id)
            .created_at(composition_order.created_at)
            .build();
        Ok(ensure_no_open_order(orders, &stand_by_order)
            .map(|()| stand_by_order)
            .map_err(|error| error.to_string()))
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn update_work_order(&mut self, id: RecordId, changes: WorkOrderChanges) -> Result<WorkOrder> {
        let orders = self.list::<WorkOrder>()?;
        let mut updated = orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .with_context(|| format!("there is no work order with id `{id}`"))?;

        if let Some(opened_at) = changes.opened_at {
            updated.opened_at = opened_at;
        }
        if let Some(status) = changes.status {
            if status == WorkOrderStatus::Open {
                updated.closed_at = None;
            }
            updated.status = status;
        }
        if let Some(closed_at) = changes.closed_at {
            updated.closed_at = Some(closed_at);
        }
        if let Some(maintenance_type) = changes.maintenance_type {
            updated.maintenance_type = maintenance_type;
        }
        if let Some(description) = changes.description {
            updated.description = description;
        }

        validate(&updated)?;
        if updated.is_open() {
            ensure_no_open_order(&orders, &updated)?;
        }
        self.update::<WorkOrder>(id, |order| {
            *order = updated;
            Ok(())
        })
    }

    /// Complete the work order at the given time, or now.
    #[instrument(skip_all, fields(id = %id))]
    pub fn close_work_order(
        &mut self,
        id: RecordId,
        closed_at: Option<LocalTimestamp>,
    ) -> Result<WorkOrder> {
        let closed_at = closed_at.unwrap_or_else(|| LocalTimestamp::from(self.clock().now()));
        self.update::<WorkOrder>(id, |order| {
            if order.status == WorkOrderStatus::Cancelled {
                return Err(ValidationError::CancelledOrder(order.id).into());
            }
            order.status = WorkOrderStatus::Completed;
            order.closed_at = Some(closed_at);
            Ok(validate(order)?)
        })
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn cancel_work_order(&mut self, id: RecordId) -> Result<WorkOrder> {
        self.update::<WorkOrder>(id, |order| {
            order.status = WorkOrderStatus::Cancelled;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStorage, tests::db};

    fn at(s: &str) -> LocalTimestamp {
        s.parse().unwrap()
    }

    fn setup() -> Result<(Db<MemoryStorage>, FleetUnit, Composition)> {
        let mut db = db();
        let unit = db.add_fleet_unit("T2506", "QAH0J25")?;
        let composition = db.add_composition("C01", "QAH0J25", "QAH0J27")?;
        Ok((db, unit, composition))
    }

    fn new_fleet_order(unit: &FleetUnit) -> NewWorkOrder {
        NewWorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(unit.id)
            .opened_at(at("19-10-2026 08:00"))
            .maintenance_type(MaintenanceType::Corrective)
            .description("Oil leak")
            .build()
    }

    fn validation_error(error: &Error) -> Option<&ValidationError> {
        error.downcast_ref::<ValidationError>()
    }

    #[test]
    fn open_ok() -> Result {
        let (mut db, unit, _) = setup()?;
        let opened = db.open_work_order(new_fleet_order(&unit))?;
        assert!(matches!(opened.stand_by, StandBy::NotRequested));
        assert_eq!(opened.work_order.reference_plate, "QAH0J25");
        assert!(opened.work_order.is_open());
        assert_eq!(db.work_orders(&WorkOrderFilter::default())?.len(), 1);
        Ok(())
    }

    #[test]
    fn open_unknown_vehicle_fails() -> Result {
        let (mut db, _, _) = setup()?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Composition)
            .vehicle_id(RecordId::random())
            .opened_at(at("19-10-2026 08:00"))
            .maintenance_type(MaintenanceType::Tire)
            .build();
        let error = db.open_work_order(new).err().unwrap();
        assert!(matches!(validation_error(&error), Some(ValidationError::UnknownVehicle { .. })));
        Ok(())
    }

    #[test]
    fn second_open_order_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        db.open_work_order(new_fleet_order(&unit))?;
        let error = db.open_work_order(new_fleet_order(&unit)).err().unwrap();
        assert!(matches!(validation_error(&error), Some(ValidationError::DuplicateOpenOrder(_))));
        Ok(())
    }

    #[test]
    fn completed_order_next_to_open_one_ok() -> Result {
        let (mut db, unit, _) = setup()?;
        db.open_work_order(new_fleet_order(&unit))?;
        let historical = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(unit.id)
            .opened_at(at("01-10-2026 08:00"))
            .closed_at(at("01-10-2026 12:00"))
            .maintenance_type(MaintenanceType::Preventive)
            .status(WorkOrderStatus::Completed)
            .build();
        db.open_work_order(historical)?;
        Ok(())
    }

    #[test]
    fn closed_before_opened_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(unit.id)
            .opened_at(at("19-10-2026 08:00"))
            .closed_at(at("19-10-2026 07:00"))
            .maintenance_type(MaintenanceType::Corrective)
            .status(WorkOrderStatus::Completed)
            .build();
        let error = db.open_work_order(new).err().unwrap();
        assert!(matches!(
            validation_error(&error),
            Some(ValidationError::ClosedBeforeOpened { .. })
        ));
        Ok(())
    }

    #[test]
    fn open_with_closing_time_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(unit.id)
            .opened_at(at("19-10-2026 08:00"))
            .closed_at(at("19-10-2026 09:00"))
            .maintenance_type(MaintenanceType::Corrective)
            .build();
        assert!(db.open_work_order(new).is_err());
        Ok(())
    }

    #[test]
    fn stand_by_created() -> Result {
        let (mut db, unit, composition) = setup()?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Composition)
            .vehicle_id(composition.id)
            .opened_at(at("19-10-2026 08:00"))
            .maintenance_type(MaintenanceType::Electrical)
            .description("Lights")
            .stand_by(true)
            .build();
        let opened = db.open_work_order(new)?;
        assert_eq!(opened.work_order.reference_plate, "QAH0J25 QAH0J27");

        let StandBy::Created(stand_by) = opened.stand_by else {
            panic!("stand-by order is expected");
        };
        assert!(stand_by.is_stand_by);
        assert_eq!(stand_by.vehicle_type, VehicleType::Fleet);
        assert_eq!(stand_by.vehicle_id, unit.id);
        assert_eq!(stand_by.origin_composition_id, Some(composition.id));
        assert_eq!(stand_by.description, "STAND-BY C01 - Lights");
        assert_eq!(stand_by.opened_at, opened.work_order.opened_at);
        assert_eq!(db.work_orders(&WorkOrderFilter::default())?.len(), 2);
        Ok(())
    }

    #[test]
    fn stand_by_skipped_when_tractor_is_busy() -> Result {
        let (mut db, unit, composition) = setup()?;
        db.open_work_order(new_fleet_order(&unit))?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Composition)
            .vehicle_id(composition.id)
            .opened_at(at("19-10-2026 09:00"))
            .maintenance_type(MaintenanceType::Electrical)
            .stand_by(true)
            .build();
        let opened = db.open_work_order(new)?;
        let StandBy::Skipped(reason) = opened.stand_by else {
            panic!("skipped stand-by order is expected");
        };
        assert_eq!(reason, "`QAH0J25` already has an open work order");
        assert_eq!(db.work_orders(&WorkOrderFilter::default())?.len(), 2);
        Ok(())
    }

    #[test]
    fn stand_by_skipped_without_tractor() -> Result {
        let mut db = db();
        let composition = db.add_composition("C02", "QAH0J28", "QAH0J29")?;
        let new = NewWorkOrder::builder()
            .vehicle_type(VehicleType::Composition)
            .vehicle_id(composition.id)
            .opened_at(at("19-10-2026 09:00"))
            .maintenance_type(MaintenanceType::Sos)
            .stand_by(true)
            .build();
        let opened = db.open_work_order(new)?;
        let StandBy::Skipped(reason) = opened.stand_by else {
            panic!("skipped stand-by order is expected");
        };
        assert_eq!(reason, "there is no fleet unit with plate `QAH0J28`");
        Ok(())
    }

    #[test]
    fn close_ok() -> Result {
        let (mut db, unit, _) = setup()?;
        let order = db.open_work_order(new_fleet_order(&unit))?.work_order;

        let closed = db.close_work_order(order.id, None)?;
        assert_eq!(closed.status, WorkOrderStatus::Completed);
        assert_eq!(closed.closed_at, Some(at("19-10-2026 15:27")));

        let closed = db.close_work_order(order.id, Some(at("19-10-2026 12:00")))?;
        assert_eq!(closed.closed_at, Some(at("19-10-2026 12:00")));

        assert!(db.close_work_order(order.id, Some(at("19-10-2026 07:00"))).is_err());
        Ok(())
    }

    #[test]
    fn close_cancelled_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        let order = db.open_work_order(new_fleet_order(&unit))?.work_order;
        db.cancel_work_order(order.id)?;
        let error = db.close_work_order(order.id, None).err().unwrap();
        assert!(matches!(validation_error(&error), Some(ValidationError::CancelledOrder(_))));
        Ok(())
    }

    #[test]
    fn update_ok() -> Result {
        let (mut db, unit, _) = setup()?;
        let order = db.open_work_order(new_fleet_order(&unit))?.work_order;
        db.close_work_order(order.id, Some(at("19-10-2026 12:00")))?;

        let changes = WorkOrderChanges {
            description: Some("Oil leak, gasket replaced".to_string()),
            maintenance_type: Some(MaintenanceType::Preventive),
            ..Default::default()
        };
        let updated = db.update_work_order(order.id, changes)?;
        assert_eq!(updated.description, "Oil leak, gasket replaced");
        assert_eq!(updated.maintenance_type, MaintenanceType::Preventive);
        assert_eq!(updated.closed_at, Some(at("19-10-2026 12:00")));

        let reopened = db.update_work_order(
            order.id,
            WorkOrderChanges { status: Some(WorkOrderStatus::Open), ..Default::default() },
        )?;
        assert!(reopened.is_open());
        assert_eq!(reopened.closed_at, None);
        Ok(())
    }

    #[test]
    fn update_open_order_with_closing_time_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        let order = db.open_work_order(new_fleet_order(&unit))?.work_order;
        let changes =
            WorkOrderChanges { closed_at: Some(at("19-10-2026 12:00")), ..Default::default() };
        let error = db.update_work_order(order.id, changes).err().unwrap();
        assert!(matches!(
            validation_error(&error),
            Some(ValidationError::OpenOrderWithClosingTime(_))
        ));
        let stored = db.get::<WorkOrder>(order.id)?.unwrap();
        assert!(stored.is_open());
        assert_eq!(stored.closed_at, None);
        Ok(())
    }

    #[test]
    fn reopen_next_to_open_order_fails() -> Result {
        let (mut db, unit, _) = setup()?;
        let first = db.open_work_order(new_fleet_order(&unit))?.work_order;
        db.close_work_order(first.id, None)?;
        db.open_work_order(new_fleet_order(&unit))?;
        let changes = WorkOrderChanges { status: Some(WorkOrderStatus::Open), ..Default::default() };
        assert!(db.update_work_order(first.id, changes).is_err());
        Ok(())
    }

    #[test]
    fn filter_ok() -> Result {
        let (mut db, unit, composition) = setup()?;
        let order = db.open_work_order(new_fleet_order(&unit))?.work_order;
        db.close_work_order(order.id, None)?;
        db.open_work_order(new_fleet_order(&unit))?;
        db.open_work_order(
            NewWorkOrder::builder()
                .vehicle_type(VehicleType::Composition)
                .vehicle_id(composition.id)
                .opened_at(at("19-10-2026 08:00"))
                .maintenance_type(MaintenanceType::Termac)
                .build(),
        )?;

        let filter = WorkOrderFilter { vehicle_type: Some(VehicleType::Fleet), ..Default::default() };
        assert_eq!(db.work_orders(&filter)?.len(), 2);
        let filter = WorkOrderFilter { open_only: true, ..Default::default() };
        assert_eq!(db.work_orders(&filter)?.len(), 2);
        let filter = WorkOrderFilter { vehicle_id: Some(composition.id), ..Default::default() };
        assert_eq!(db.work_orders(&filter)?.len(), 1);
        assert_eq!(db.fleet_size(VehicleType::Fleet)?, 1);
        assert_eq!(db.fleet_size(VehicleType::Composition)?, 1);
        Ok(())
    }
}

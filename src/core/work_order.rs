use std::fmt::{Display, Formatter};

use bon::Builder;
use chrono::{NaiveDateTime, TimeDelta};
use comfy_table::Color;
use enumset::{EnumSet, enum_set};
use serde::{Deserialize, Serialize};

use crate::core::{LocalTimestamp, RecordId, VehicleType};

#[derive(Debug, Hash, Serialize, Deserialize, clap::ValueEnum, enumset::EnumSetType)]
#[serde(rename_all = "kebab-case")]
pub enum WorkOrderStatus {
    /// Maintenance in progress, the vehicle is out of service.
    Open,

    /// Maintenance finished at the closing time.
    Completed,

    /// Never happened, ignored by every calculation.
    Cancelled,
}

impl WorkOrderStatus {
    /// Statuses that take a vehicle out of service.
    pub const UNAVAILABLE: EnumSet<Self> = enum_set!(Self::Open | Self::Completed);

    pub const fn color(self) -> Color {
        match self {
            Self::Open => Color::Red,
            Self::Completed => Color::Green,
            Self::Cancelled => Color::DarkGrey,
        }
    }
}

impl Display for WorkOrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Tire,
    Electrical,
    Sos,
    Termac,
    Itr,
    Other,
}

impl Display for MaintenanceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preventive => write!(f, "Preventive"),
            Self::Corrective => write!(f, "Corrective"),
            Self::Tire => write!(f, "Tire"),
            Self::Electrical => write!(f, "Electrical"),
            Self::Sos => write!(f, "SOS"),
            Self::Termac => write!(f, "TERMAC"),
            Self::Itr => write!(f, "ITR"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Maintenance intervention on a single fleet unit or composition.
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    #[builder(default = RecordId::random())]
    pub id: RecordId,

    pub vehicle_type: VehicleType,

    pub vehicle_id: RecordId,

    /// Plate or plates of the vehicle at the time the order was opened.
    #[builder(into, default)]
    #[serde(default)]
    pub reference_plate: String,

    /// Unavailability starts here.
    pub opened_at: LocalTimestamp,

    /// Unavailability ends here, absent while the order is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<LocalTimestamp>,

    pub maintenance_type: MaintenanceType,

    #[builder(into, default)]
    #[serde(default)]
    pub description: String,

    #[builder(default = WorkOrderStatus::Open)]
    pub status: WorkOrderStatus,

    /// Created for the tractor of a composition that went into maintenance.
    #[builder(default)]
    #[serde(default)]
    pub is_stand_by: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_composition_id: Option<RecordId>,

    pub created_at: NaiveDateTime,
}

impl WorkOrder {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == WorkOrderStatus::Open
    }

    /// Check whether the order keeps the vehicle out of service at the moment.
    ///
    /// Open orders are unbounded, completed ones cover the closed interval between the opening
    /// and the closing time. Anything else, including a completed order without a closing time,
    /// does not count.
    #[must_use]
    pub fn is_unavailable_at(&self, timestamp: LocalTimestamp) -> bool {
        if !WorkOrderStatus::UNAVAILABLE.contains(self.status) {
            return false;
        }
        match (self.status, self.closed_at) {
            (WorkOrderStatus::Open, None) => timestamp >= self.opened_at,
            (WorkOrderStatus::Completed, Some(closed_at)) => {
                (self.opened_at <= timestamp) && (timestamp <= closed_at)
            }
            _ => false,
        }
    }

    /// Time between opening and closing of a completed order.
    #[must_use]
    pub fn resolution_time(&self) -> Option<TimeDelta> {
        match (self.status, self.closed_at) {
            (WorkOrderStatus::Completed, Some(closed_at)) => Some(closed_at.since(self.opened_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(s: &str) -> LocalTimestamp {
        s.parse().unwrap()
    }

    fn order(status: WorkOrderStatus, opened_at: &str, closed_at: Option<&str>) -> WorkOrder {
        WorkOrder::builder()
            .vehicle_type(VehicleType::Fleet)
            .vehicle_id(RecordId::random())
            .opened_at(at(opened_at))
            .maybe_closed_at(closed_at.map(at))
            .maintenance_type(MaintenanceType::Corrective)
            .status(status)
            .created_at(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
            .build()
    }

    #[test]
    fn open_order_is_unbounded() {
        let order = order(WorkOrderStatus::Open, "10-10-2026 10:00", None);
        assert!(!order.is_unavailable_at(at("10-10-2026 09:00")));
        assert!(order.is_unavailable_at(at("10-10-2026 10:00")));
        assert!(order.is_unavailable_at(at("31-12-2026 23:00")));
    }

    #[test]
    fn completed_order_is_inclusive() {
        let order = order(WorkOrderStatus::Completed, "10-10-2026 08:00", Some("10-10-2026 14:00"));
        assert!(!order.is_unavailable_at(at("10-10-2026 07:00")));
        assert!(order.is_unavailable_at(at("10-10-2026 08:00")));
        assert!(order.is_unavailable_at(at("10-10-2026 14:00")));
        assert!(!order.is_unavailable_at(at("10-10-2026 15:00")));
    }

    #[test]
    fn completed_order_without_closing_time_never_counts() {
        let order = order(WorkOrderStatus::Completed, "10-10-2026 08:00", None);
        assert!(!order.is_unavailable_at(at("10-10-2026 12:00")));
        assert_eq!(order.resolution_time(), None);
    }

    #[test]
    fn cancelled_order_never_counts() {
        let order = order(WorkOrderStatus::Cancelled, "10-10-2026 08:00", Some("10-10-2026 14:00"));
        assert!(!order.is_unavailable_at(at("10-10-2026 12:00")));
    }

    #[test]
    fn resolution_time_ok() {
        let order = order(WorkOrderStatus::Completed, "10-10-2026 08:00", Some("11-10-2026 10:30"));
        assert_eq!(order.resolution_time(), Some(TimeDelta::minutes(26 * 60 + 30)));
    }

    #[test]
    fn serde_ok() -> anyhow::Result<()> {
        let order = order(WorkOrderStatus::Open, "10-10-2026 08:00", None);
        let json = serde_json::to_value(&order)?;
        assert_eq!(json["vehicleType"], "fleet");
        assert_eq!(json["openedAt"], "10-10-2026 08:00");
        assert_eq!(json["status"], "open");
        assert!(json.get("closedAt").is_none());
        let _ = serde_json::from_value::<WorkOrder>(json)?;
        Ok(())
    }
}

pub mod availability;
pub mod clock;
pub mod error;
pub mod id;
pub mod stats;
pub mod timestamp;
pub mod vehicle;
pub mod work_order;

pub use self::{
    availability::{AvailabilityReport, TargetAssessment, calculate_availability},
    clock::{Clock, FixedClock, SystemClock},
    error::ValidationError,
    id::RecordId,
    stats::{WorkOrderStats, calculate_work_order_stats},
    timestamp::{LocalTimestamp, parse_date},
    vehicle::VehicleType,
    work_order::{MaintenanceType, WorkOrder, WorkOrderStatus},
};

use serde::Serialize;

use crate::{
    core::{WorkOrder, WorkOrderStatus},
    quantity::time::Hours,
};

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderStats {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub cancelled: usize,

    /// Mean time between opening and closing of the completed orders that have been closed.
    pub mean_resolution_time: Option<Hours>,
}

impl<'a> FromIterator<&'a WorkOrder> for WorkOrderStats {
    fn from_iter<T: IntoIterator<Item = &'a WorkOrder>>(iterator: T) -> Self {
        let mut this = Self::default();
        let mut total_resolution_time = Hours::ZERO;
        let mut n_resolved = 0_u32;

        for order in iterator {
            this.total += 1;
            match order.status {
                WorkOrderStatus::Open => this.open += 1,
                WorkOrderStatus::Completed => this.completed += 1,
                WorkOrderStatus::Cancelled => this.cancelled += 1,
            }
            if let Some(resolution_time) = order.resolution_time() {
                total_resolution_time += Hours::from(resolution_time);
                n_resolved += 1;
            }
        }

        this.mean_resolution_time =
            (n_resolved != 0).then(|| total_resolution_time / f64::from(n_resolved));
        this
    }
}

pub fn calculate_work_order_stats(work_orders: &[WorkOrder]) -> WorkOrderStats {
    work_orders.iter().collect()
}

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{LocalTimestamp, VehicleType, WorkOrder, WorkOrderStatus},
    quantity::percent::Percent,
};

/// Availability at the start of a single hour.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySample {
    pub hour: u32,
    pub unavailable: usize,
    pub available: usize,
    pub percent: Percent,
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub analysis_date: NaiveDate,
    pub vehicle_type: VehicleType,
    pub fleet_size: usize,

    /// Mean over the computed hours only.
    pub mean_percent: Percent,

    /// Mean over the computed hours only.
    pub mean_available: f64,

    /// Last computed hour when the report covers the current day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_time_cutoff: Option<u32>,

    pub samples: Vec<AvailabilitySample>,
}

impl AvailabilityReport {
    #[must_use]
    pub const fn is_real_time(&self) -> bool {
        self.real_time_cutoff.is_some()
    }

    /// Compare the report against the availability target.
    pub fn assess(&self, target: Percent) -> TargetAssessment {
        let target_vehicles = target.apply_to(self.fleet_size);
        #[expect(clippy::cast_precision_loss)]
        let hours_above_target = self
            .samples
            .iter()
            .map(|sample| sample.available as f64 >= target_vehicles)
            .collect_vec();
        TargetAssessment {
            target,
            target_vehicles,
            is_met: self.mean_percent >= target,
            hours_above_target,
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAssessment {
    pub target: Percent,

    /// Number of vehicles that must be available to hit the target.
    pub target_vehicles: f64,

    /// Whether the mean availability reaches the target.
    pub is_met: bool,

    /// Per computed hour, in the order of the report samples.
    pub hours_above_target: Vec<bool>,
}

/// Reconstruct the hourly availability of the fleet over the analysis date.
///
/// When the date is today, only the hours up to and including the current one are computed.
/// Work orders of the other vehicle type are ignored, so the caller may pass all of them.
pub fn calculate_availability(
    fleet_size: usize,
    work_orders: &[WorkOrder],
    analysis_date: NaiveDate,
    vehicle_type: VehicleType,
    now: NaiveDateTime,
) -> AvailabilityReport {
    let real_time_cutoff = (analysis_date == now.date()).then(|| now.hour());
    let last_hour = real_time_cutoff.unwrap_or(23);

    let relevant_orders = work_orders
        .iter()
        .filter(|order| order.vehicle_type == vehicle_type)
        .filter(|order| WorkOrderStatus::UNAVAILABLE.contains(order.status))
        .collect_vec();

    let samples = (0..=last_hour)
        .filter_map(|hour| LocalTimestamp::at_hour(analysis_date, hour).map(|start| (hour, start)))
        .map(|(hour, start)| {
            let unavailable =
                relevant_orders.iter().filter(|order| order.is_unavailable_at(start)).count();
            let available = fleet_size.saturating_sub(unavailable);
            AvailabilitySample {
                hour,
                unavailable,
                available,
                percent: Percent::of_total(available, fleet_size),
            }
        })
        .collect_vec();

    #[expect(clippy::cast_precision_loss)]
    let n_samples = samples.len().max(1) as f64;
    let mean_percent = samples.iter().map(|sample| sample.percent).sum::<Percent>() / n_samples;
    #[expect(clippy::cast_precision_loss)]
    let mean_available =
        samples.iter().map(|sample| sample.available as f64).sum::<f64>() / n_samples;

    AvailabilityReport {
        analysis_date,
        vehicle_type,
        fleet_size,
        mean_percent,
        mean_available,
        real_time_cutoff,
        samples,
    }
}

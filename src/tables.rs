use comfy_table::{Attribute, Cell, CellAlignment, Color, Row, Table, modifiers, presets};

use crate::{
    core::{AvailabilityReport, RecordId, TargetAssessment, WorkOrder, WorkOrderStats},
    db::{Composition, Driver, FleetUnit},
};

fn new_table(header: impl Into<Row>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(header);
    table
}

fn id_cell(id: RecordId) -> Cell {
    Cell::new(id.short()).add_attribute(Attribute::Dim)
}

pub fn build_fleet_units_table(units: &[FleetUnit]) -> Table {
    let mut table = new_table(["ID", "Fleet", "Plate", "Registered"]);
    for unit in units {
        table.add_row(vec![
            id_cell(unit.id),
            Cell::new(unit.label()),
            Cell::new(&unit.plate).add_attribute(Attribute::Bold),
            Cell::new(unit.created_at.format("%d-%m-%Y")).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_compositions_table(compositions: &[Composition]) -> Table {
    let mut table = new_table(["ID", "Identifier", "First plate", "Second plate"]);
    for composition in compositions {
        table.add_row(vec![
            id_cell(composition.id),
            Cell::new(&composition.identifier).add_attribute(Attribute::Bold),
            Cell::new(&composition.first_plate),
            Cell::new(&composition.second_plate),
        ]);
    }
    table
}

pub fn build_drivers_table(drivers: &[Driver]) -> Table {
    let mut table = new_table(["ID", "Name"]);
    for driver in drivers {
        table.add_row(vec![id_cell(driver.id), Cell::new(&driver.name)]);
    }
    table
}

pub fn build_work_orders_table(orders: &[WorkOrder]) -> Table {
    let mut table =
        new_table(["ID", "Vehicle", "Plate", "Type", "Opened", "Closed", "Status", "Description"]);
    for order in orders {
        table.add_row(vec![
            id_cell(order.id),
            Cell::new(order.vehicle_type).add_attribute(Attribute::Dim),
            Cell::new(&order.reference_plate).add_attribute(Attribute::Bold),
            Cell::new(order.maintenance_type),
            Cell::new(order.opened_at),
            order.closed_at.map_or_else(|| Cell::new("-"), Cell::new),
            Cell::new(order.status).fg(order.status.color()),
            if order.is_stand_by {
                Cell::new(&order.description).fg(Color::DarkYellow)
            } else {
                Cell::new(&order.description)
            },
        ]);
    }
    table
}

pub fn build_availability_table(report: &AvailabilityReport, assessment: &TargetAssessment) -> Table {
    let mut table = new_table(["Hour", "Unavailable", "Available", "Availability"]);
    for (sample, is_above_target) in report.samples.iter().zip(&assessment.hours_above_target) {
        let color = if *is_above_target { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(format!("{:02}:00", sample.hour)),
            Cell::new(sample.unavailable)
                .set_alignment(CellAlignment::Right)
                .fg(if sample.unavailable == 0 { Color::Reset } else { Color::Red }),
            Cell::new(sample.available).set_alignment(CellAlignment::Right),
            Cell::new(sample.percent).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table.add_row(vec![
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new(format!("of {}", report.fleet_size)).add_attribute(Attribute::Dim),
        Cell::new(format!("{:.1}", report.mean_available)).set_alignment(CellAlignment::Right),
        Cell::new(report.mean_percent)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(if assessment.is_met { Color::Green } else { Color::Red }),
    ]);
    table.add_row(vec![
        Cell::new("Target").add_attribute(Attribute::Dim),
        Cell::new(""),
        Cell::new(format!("{:.1}", assessment.target_vehicles))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
        Cell::new(assessment.target).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn build_stats_table(stats: &WorkOrderStats) -> Table {
    let mut table = new_table(["Total", "Open", "Completed", "Cancelled", "Mean resolution"]);
    table.add_row(vec![
        Cell::new(stats.total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        Cell::new(stats.open).set_alignment(CellAlignment::Right).fg(Color::Red),
        Cell::new(stats.completed).set_alignment(CellAlignment::Right).fg(Color::Green),
        Cell::new(stats.cancelled).set_alignment(CellAlignment::Right).fg(Color::DarkGrey),
        stats
            .mean_resolution_time
            .map_or_else(|| Cell::new("-"), Cell::new)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

use crate::core::{LocalTimestamp, RecordId, VehicleType};

/// Domain rule violation, reported back to the user as is.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("`{0}` is not a valid timestamp, expected `DD-MM-YYYY HH:MM` or `YYYY-MM-DDTHH:MM`")]
    MalformedTimestamp(String),

    #[error("`{0}` is not a valid date, expected `DD-MM-YYYY` or `YYYY-MM-DD`")]
    MalformedDate(String),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("a fleet unit with plate `{0}` already exists")]
    DuplicatePlate(String),

    #[error("a composition with identifier `{0}` already exists")]
    DuplicateIdentifier(String),

    #[error("there is no {vehicle_type} with id `{id}`")]
    UnknownVehicle { vehicle_type: VehicleType, id: RecordId },

    #[error("`{0}` already has an open work order")]
    DuplicateOpenOrder(String),

    #[error("closing time {closed_at} precedes opening time {opened_at}")]
    ClosedBeforeOpened { opened_at: LocalTimestamp, closed_at: LocalTimestamp },

    #[error("an open work order cannot have a closing time ({0})")]
    OpenOrderWithClosingTime(LocalTimestamp),

    #[error("work order `{0}` is cancelled and cannot be closed")]
    CancelledOrder(RecordId),
}

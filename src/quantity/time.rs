use chrono::TimeDelta;

quantity!(Hours, " h", 1);

impl From<TimeDelta> for Hours {
    #[expect(clippy::cast_precision_loss)]
    fn from(delta: TimeDelta) -> Self {
        Self(delta.num_seconds() as f64 / 3600.0)
    }
}

use chrono::{DateTime, TimeDelta, Utc};

/// Seconds between the Unix epoch and the Ripple epoch (2000-01-01T00:00:00Z)
pub const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

/// Convert a ledger close time (seconds since the Ripple epoch) to UTC.
pub fn to_absolute_time(ripple_epoch_seconds: u32) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(RIPPLE_EPOCH_OFFSET + i64::from(ripple_epoch_seconds))
}

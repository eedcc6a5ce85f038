//! Time and timestamp helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp used for publish throttling and the startup grace period.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whether `now` is still inside the `window` that opened at `since`.
///
/// A `now` earlier than `since` (clock stepped backwards) counts as inside.
#[must_use]
pub fn within(since: Timestamp, now: Timestamp, window: Duration) -> bool {
    match (now - since).to_std() {
        Ok(elapsed) => elapsed <= window,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_report_inside_window_at_boundary() {
        let start = now();
        let end = start + chrono::Duration::seconds(600);
        assert!(within(start, end, Duration::from_secs(600)));
    }

    #[test]
    fn should_report_outside_window_after_boundary() {
        let start = now();
        let later = start + chrono::Duration::seconds(601);
        assert!(!within(start, later, Duration::from_secs(600)));
    }

    #[test]
    fn should_treat_backwards_clock_as_inside_window() {
        let start = now();
        let earlier = start - chrono::Duration::seconds(5);
        assert!(within(start, earlier, Duration::from_secs(1)));
    }
}

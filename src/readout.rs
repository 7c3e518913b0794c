//! # Planisphere Calendar Readout
//!
//! Derives the month and hour a planisphere wheel is set to from its rotation angle.
//! One full turn spans both a year of months (30° each) and a day of hours (15° each),
//! so the two rings are read off the same normalized angle.
//!
//! The rotation angle itself is never normalized while dragging; only this readout
//! folds it into `[0, 360)`.

use serde::Serialize;

/// Month ring labels, starting at 0°.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Degrees of rotation per hour on the time ring (360° / 24).
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Degrees of rotation per month on the date ring (360° / 12).
pub const DEGREES_PER_MONTH: f64 = 30.0;

/// Month and hour shown by the wheel at a given angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarReading {
    /// Index into [`MONTH_LABELS`], 0 = January.
    pub month_index: usize,
    /// Three-letter month abbreviation.
    pub month_label: &'static str,
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Zero-padded `"HH:00"`.
    pub hour_label: String,
}

/// Fold any angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = ((angle % 360.0) + 360.0) % 360.0;
    // a tiny negative remainder can come back as exactly 360
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Read the calendar position for a rotation angle in degrees.
pub fn calendar_reading(angle: f64) -> CalendarReading {
    let normalized = normalize_degrees(angle);

    let hour = ((normalized / DEGREES_PER_HOUR) % 24.0).floor() as u32;
    let month_index = (((normalized / DEGREES_PER_MONTH) % 12.0).floor() as usize).min(11);

    CalendarReading {
        month_index,
        month_label: MONTH_LABELS[month_index],
        hour,
        hour_label: format!("{:02}:00", hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_reads_january_midnight() {
        let reading = calendar_reading(0.0);
        assert_eq!(reading.month_label, "Jan");
        assert_eq!(reading.hour_label, "00:00");
    }

    #[test]
    fn test_normalize_handles_negative_and_large() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-360.0), 0.0);
        assert_eq!(normalize_degrees(365.0), 5.0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
    }

    #[test]
    fn test_month_and_hour_steps() {
        let r = calendar_reading(45.0);
        assert_eq!(r.month_label, "Feb");
        assert_eq!(r.hour, 3);
        assert_eq!(r.hour_label, "03:00");

        let r = calendar_reading(359.9);
        assert_eq!(r.month_label, "Dec");
        assert_eq!(r.hour_label, "23:00");

        let r = calendar_reading(-90.0);
        assert_eq!(r.month_label, "Oct");
        assert_eq!(r.hour_label, "18:00");
    }

    #[test]
    fn test_boundaries_round_down() {
        assert_eq!(calendar_reading(29.999).month_label, "Jan");
        assert_eq!(calendar_reading(30.0).month_label, "Feb");
        assert_eq!(calendar_reading(14.999).hour, 0);
        assert_eq!(calendar_reading(15.0).hour, 1);
    }

    #[test]
    fn test_periodic_in_full_turns() {
        for angle in [7.5, 100.25, 200.0, -33.3, 1234.5] {
            let base = calendar_reading(angle);
            for turns in [-2.0, 1.0, 3.0] {
                assert_eq!(base, calendar_reading(angle + 360.0 * turns), "angle {angle}");
            }
        }
    }
}

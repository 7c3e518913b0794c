//! # Text Rendering
//!
//! Plain-text cards for the moon reading and the planisphere dial, used by the CLI.
//! Both functions return the card as a `String` so the caller decides where it goes.

use crate::lunar::LunarPhaseReading;
use crate::lunar::SYNODIC_MONTH_DAYS;
use crate::readout::{calendar_reading, normalize_degrees, MONTH_LABELS};
use std::fmt::Write;

/// Width of the illumination bar in characters.
const BAR_WIDTH: usize = 20;

/// Render a moon reading as a small text card:
/// ```text
/// 🌔 Waxing Gibbous
///    illumination  99% [###################.]
///    moon age      13.7 / 29.5 days
/// ```
pub fn render_moon_ascii(reading: &LunarPhaseReading) -> String {
    let lit = (reading.illumination_percent as usize * BAR_WIDTH + 50) / 100;
    let bar: String = "#".repeat(lit) + &".".repeat(BAR_WIDTH - lit);

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", reading.phase.icon(), reading.phase_name);
    let _ = writeln!(
        out,
        "   illumination {:>3}% [{}]",
        reading.illumination_percent, bar
    );
    let _ = writeln!(
        out,
        "   moon age      {:.1} / {:.1} days",
        reading.cycle_position_days, SYNODIC_MONTH_DAYS
    );
    out
}

/// Render the dial for a rotation angle: the raw angle, the month ring with the
/// current month bracketed, and the hour the time ring points at.
pub fn render_dial_ascii(angle: f64) -> String {
    let reading = calendar_reading(angle);

    let ring: Vec<String> = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            if i == reading.month_index {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "angle {:.1}° (wheel at {:.1}°)",
        angle,
        normalize_degrees(angle)
    );
    let _ = writeln!(out, "{}", ring.join(""));
    let _ = writeln!(
        out,
        "month {}  hour {}",
        reading.month_label, reading.hour_label
    );
    out
}

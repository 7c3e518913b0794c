//! Moon-phase calculator (mean synodic month, cosine illumination model)
//!
//! Counts fractional days from a fixed reference new moon, folds them into one
//! synodic cycle and reads the phase off a fixed eight-bin table.
//! Accuracy: good to about a day for the phase category; illumination is the
//! standard `(1 − cos θ) / 2` approximation, not an ephemeris.

use chrono::{DateTime, TimeZone, Utc};
use core::f64::consts::TAU;
use serde::{Deserialize, Serialize};

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Upper bounds (exclusive, in cycle days) of the first seven phase bins.
/// Anything at or past the last bound is a waning crescent.
///
/// These are hand-tuned and deliberately asymmetric around the quarters.
/// Do not re-derive them.
const PHASE_BOUNDS: [(f64, LunarPhase); 7] = [
    (1.845_66, LunarPhase::New),
    (7.382_64, LunarPhase::WaxingCrescent),
    (9.228_30, LunarPhase::FirstQuarter),
    (13.765_28, LunarPhase::WaxingGibbous),
    (15.765_28, LunarPhase::Full),
    (22.147_92, LunarPhase::WaningGibbous),
    (23.993_58, LunarPhase::LastQuarter),
];

/// Reference new moon, epoch zero of the synodic cycle: 2000-01-06 18:14 UTC.
pub fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or_default()
}

/// The eight named phase categories, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LunarPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarPhase {
    /// All categories, new moon first.
    pub const ALL: [LunarPhase; 8] = [
        LunarPhase::New,
        LunarPhase::WaxingCrescent,
        LunarPhase::FirstQuarter,
        LunarPhase::WaxingGibbous,
        LunarPhase::Full,
        LunarPhase::WaningGibbous,
        LunarPhase::LastQuarter,
        LunarPhase::WaningCrescent,
    ];

    /// Display label, e.g. "Full Moon".
    pub fn label(self) -> &'static str {
        match self {
            LunarPhase::New => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::Full => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// Moon glyph for the category (northern-hemisphere orientation).
    pub fn icon(self) -> &'static str {
        match self {
            LunarPhase::New => "🌑",
            LunarPhase::WaxingCrescent => "🌒",
            LunarPhase::FirstQuarter => "🌓",
            LunarPhase::WaxingGibbous => "🌔",
            LunarPhase::Full => "🌕",
            LunarPhase::WaningGibbous => "🌖",
            LunarPhase::LastQuarter => "🌗",
            LunarPhase::WaningCrescent => "🌘",
        }
    }
}

/// Everything the calculator derives for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarPhaseReading {
    /// Display label of `phase`.
    pub phase_name: String,
    /// Phase category.
    pub phase: LunarPhase,
    /// Lit fraction of the disk, 0–100.
    pub illumination_percent: u8,
    /// Age of the moon in days since the last mean new moon, in `[0, L)`.
    pub cycle_position_days: f64,
}

/// Compute the phase reading for `instant`.
/// If `instant` is `None`, fall back to `Utc::now()`.
pub fn moon_phase(instant: Option<DateTime<Utc>>) -> LunarPhaseReading {
    let instant = instant.unwrap_or_else(Utc::now);
    reading_at_cycle_position(cycle_position(instant))
}

/// Fractional days between the reference new moon and `instant` (negative before it).
pub fn days_since_epoch(instant: DateTime<Utc>) -> f64 {
    (instant - reference_new_moon()).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Position of `instant` inside its synodic cycle, in days, within `[0, L)`.
///
/// Instants resolve to the millisecond, so shifting `instant` by a whole number
/// of synodic months only reproduces the position to within that resolution.
pub fn cycle_position(instant: DateTime<Utc>) -> f64 {
    cycle_position_from_days(days_since_epoch(instant))
}

/// Fold a day count since the reference new moon into `[0, L)`.
pub fn cycle_position_from_days(days: f64) -> f64 {
    let mut pos = days % SYNODIC_MONTH_DAYS;
    if pos < 0.0 {
        pos += SYNODIC_MONTH_DAYS;
    }
    // -ε + L can round up to exactly L
    if pos >= SYNODIC_MONTH_DAYS {
        pos = 0.0;
    }
    pos
}

/// Phase category for a cycle position. Bins are `[lower, upper)`, so a
/// position sitting exactly on a bound belongs to the next category.
pub fn phase_at_cycle_position(pos: f64) -> LunarPhase {
    PHASE_BOUNDS
        .iter()
        .find(|(upper, _)| pos < *upper)
        .map(|(_, phase)| *phase)
        .unwrap_or(LunarPhase::WaningCrescent)
}

/// Illuminated percentage for a cycle position: 0 at new, 100 at half-cycle.
pub fn illumination_at_cycle_position(pos: f64) -> u8 {
    let theta = pos / SYNODIC_MONTH_DAYS * TAU;
    let pct = ((1.0 - theta.cos()) / 2.0 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Full reading for a cycle position.
pub fn reading_at_cycle_position(pos: f64) -> LunarPhaseReading {
    let phase = phase_at_cycle_position(pos);
    LunarPhaseReading {
        phase_name: phase.label().to_string(),
        phase,
        illumination_percent: illumination_at_cycle_position(pos),
        cycle_position_days: pos,
    }
}

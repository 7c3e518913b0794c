//! # Kilo Hoku Core Library
//!
//! The astronomical-time engine behind a Hawaiian sky reference: the moon-phase
//! calculator and the rotation model of the interactive planisphere wheel.
//!
//! ## Components
//!
//! ### Lunar phase ([`lunar`])
//! A pure function from an instant to a [`LunarPhaseReading`]: phase category,
//! display name and illumination percent. Days are counted from a fixed reference
//! new moon and folded into one mean synodic month.
//!
//! ### Planisphere rotation ([`orientation`], [`readout`], [`planisphere`])
//! - [`OrientationController`] turns pointer/touch drags into an unbounded rotation angle
//! - [`readout::calendar_reading`] derives the month and hour the wheel points at
//! - [`Planisphere`] holds the inline wheel and the modal wheel seeded from it
//!
//! The two components never share state. Everything runs synchronously on the
//! caller's thread; nothing here blocks or allocates beyond small strings.
//!
//! ## Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use kilo_hoku_lib::SkySnapshot;
//!
//! let at = Utc.with_ymd_and_hms(2024, 1, 25, 0, 0, 0).unwrap();
//! let sky = SkySnapshot::capture(Some(at), 45.0);
//!
//! assert_eq!(sky.moon.phase_name, "Waxing Gibbous");
//! assert_eq!(sky.dial.month_label, "Feb");
//! assert_eq!(sky.dial.hour_label, "03:00");
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod config;
pub mod lunar;
pub mod orientation;
pub mod planisphere;
pub mod readout;
pub mod renderer;

pub use lunar::{moon_phase, LunarPhase, LunarPhaseReading};
pub use orientation::{
    BoundingRect, GestureEvent, ListenerRegistration, OrientationController, OrientationState,
    PointerSample, StaticSurface, WidgetSurface,
};
pub use planisphere::{ModalClosePolicy, Planisphere};
pub use readout::CalendarReading;

/// Moon reading and dial readout captured together for one render pass.
#[derive(Clone, Debug, Serialize)]
pub struct SkySnapshot {
    /// Instant the moon was computed for
    pub instant: DateTime<Utc>,
    /// Wheel rotation the dial was read at
    pub rotation_angle_degrees: f64,
    pub moon: LunarPhaseReading,
    pub dial: CalendarReading,
}

impl SkySnapshot {
    /// Capture both readings. `None` means "now".
    pub fn capture(instant: Option<DateTime<Utc>>, rotation_angle_degrees: f64) -> Self {
        let instant = instant.unwrap_or_else(Utc::now);
        SkySnapshot {
            instant,
            rotation_angle_degrees,
            moon: moon_phase(Some(instant)),
            dial: readout::calendar_reading(rotation_angle_degrees),
        }
    }
}

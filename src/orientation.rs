//! # Planisphere Rotation Controller
//!
//! Turns a stream of pointer/touch samples over a circular widget into a rotation
//! angle for the wheel.
//!
//! ## Gesture model
//! - **Start**: measure the widget, take the pointer's angle around its center and
//!   remember `anchor = pointer − rotation`. Holding the anchor (not the absolute
//!   pointer angle) constant keeps the wheel under the finger wherever the drag began.
//! - **Move**: `rotation = pointer − anchor`. The pointer angle is unwrapped against
//!   the previous sample, so crossing the ±180° seam of `atan2` never makes the wheel
//!   jump a full turn.
//! - **End**: release, touch end/cancel, or an empty touch list. The angle is left as is.
//!
//! The rotation angle is never normalized here; it accumulates across gestures and
//! only [`crate::readout`] folds it into a single turn.
//!
//! ## Host integration
//! The host UI implements [`WidgetSurface`]: it reports the widget's bounding
//! rectangle and registers global move/end listeners while a drag is live. The
//! registration comes back as a [`ListenerRegistration`] which the controller owns
//! for the length of the gesture; dropping it is the only place listeners are removed,
//! so release, cancel, reset and teardown all share one cleanup path.
//!
//! Unmeasurable geometry makes every handler a silent no-op.

use crate::readout::{calendar_reading, CalendarReading};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// One pointer or touch position in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Screen-space bounding rectangle of the wheel widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Geometric center of the rectangle.
    pub fn center(&self) -> PointerSample {
        PointerSample::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// A rect is usable only with finite coordinates and a positive size.
    pub fn is_measurable(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Live registration of the global move/end listeners for one gesture session.
///
/// Dropping the value deregisters the listeners.
pub struct ListenerRegistration {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerRegistration {
    /// Wrap the host's deregistration callback.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("live", &self.release.is_some())
            .finish()
    }
}

/// What the controller needs from the host UI.
pub trait WidgetSurface {
    /// Current bounding rectangle, or `None` if the widget cannot be measured yet.
    fn bounding_rect(&self) -> Option<BoundingRect>;

    /// Register global move/end listeners for a new gesture session.
    fn register_drag_listeners(&mut self) -> ListenerRegistration;
}

/// Fixed-geometry surface that counts how many listener registrations are alive.
#[derive(Debug, Clone, Default)]
pub struct StaticSurface {
    rect: Option<BoundingRect>,
    live: Rc<Cell<usize>>,
}

impl StaticSurface {
    pub fn new(rect: Option<BoundingRect>) -> Self {
        Self {
            rect,
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Square widget of side `size` with its top-left corner at the origin.
    pub fn square(size: f64) -> Self {
        Self::new(Some(BoundingRect::new(0.0, 0.0, size, size)))
    }

    pub fn set_rect(&mut self, rect: Option<BoundingRect>) {
        self.rect = rect;
    }

    /// Number of registrations handed out and not yet dropped.
    pub fn live_registrations(&self) -> usize {
        self.live.get()
    }
}

impl WidgetSurface for StaticSurface {
    fn bounding_rect(&self) -> Option<BoundingRect> {
        self.rect
    }

    fn register_drag_listeners(&mut self) -> ListenerRegistration {
        self.live.set(self.live.get() + 1);
        let live = Rc::clone(&self.live);
        ListenerRegistration::new(move || live.set(live.get().saturating_sub(1)))
    }
}

/// Raw input events as delivered by the host, already reduced to samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent<'a> {
    PointerDown(PointerSample),
    PointerMove(PointerSample),
    PointerUp,
    /// Touches currently on the surface.
    TouchStart(&'a [PointerSample]),
    /// Touches currently on the surface.
    TouchMove(&'a [PointerSample]),
    TouchEnd,
    TouchCancel,
}

/// Snapshot of a controller for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrientationState {
    pub rotation_angle_degrees: f64,
    pub is_dragging: bool,
    pub drag_anchor_offset_degrees: f64,
}

#[derive(Debug)]
struct DragSession {
    // unwrapped pointer angle of the previous sample
    last_pointer_degrees: f64,
    _listeners: ListenerRegistration,
}

/// Rotation state of one wheel instance.
#[derive(Debug, Default)]
pub struct OrientationController {
    rotation_angle_degrees: f64,
    // anchor of the current or most recent session; 0 until the first press
    drag_anchor_offset_degrees: f64,
    session: Option<DragSession>,
}

impl OrientationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller starting at `seed` degrees, e.g. a modal copying the inline wheel.
    pub fn with_angle(seed: f64) -> Self {
        Self {
            rotation_angle_degrees: if seed.is_finite() { seed } else { 0.0 },
            drag_anchor_offset_degrees: 0.0,
            session: None,
        }
    }

    pub fn rotation_angle_degrees(&self) -> f64 {
        self.rotation_angle_degrees
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> OrientationState {
        OrientationState {
            rotation_angle_degrees: self.rotation_angle_degrees,
            is_dragging: self.is_dragging(),
            drag_anchor_offset_degrees: self.drag_anchor_offset_degrees,
        }
    }

    /// Month/hour the wheel currently shows.
    pub fn calendar_reading(&self) -> CalendarReading {
        calendar_reading(self.rotation_angle_degrees)
    }

    /// Start a gesture session at `sample`. Ignored while already dragging or
    /// when the widget cannot be measured.
    pub fn begin_drag<S>(&mut self, sample: PointerSample, surface: &mut S)
    where
        S: WidgetSurface + ?Sized,
    {
        if self.session.is_some() {
            debug!("press ignored, gesture already in progress");
            return;
        }
        let Some(pointer) = pointer_angle(sample, &*surface) else {
            debug!("press ignored, widget not measurable");
            return;
        };

        let anchor = pointer - self.rotation_angle_degrees;
        self.drag_anchor_offset_degrees = anchor;
        self.session = Some(DragSession {
            last_pointer_degrees: pointer,
            _listeners: surface.register_drag_listeners(),
        });
        debug!(
            pointer_deg = pointer,
            anchor_deg = anchor,
            "drag session started"
        );
    }

    /// Track the pointer to `sample`. No-op outside a session.
    pub fn drag_to<S: WidgetSurface + ?Sized>(&mut self, sample: PointerSample, surface: &S) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(raw) = pointer_angle(sample, surface) else {
            debug!("move ignored, widget not measurable");
            return;
        };

        let pointer =
            session.last_pointer_degrees + shortest_delta(raw - session.last_pointer_degrees);
        session.last_pointer_degrees = pointer;
        self.rotation_angle_degrees = pointer - self.drag_anchor_offset_degrees;
        trace!(angle_deg = self.rotation_angle_degrees, "wheel rotated");
    }

    /// Finish the current session, releasing its listeners.
    pub fn end_drag(&mut self) {
        if self.session.take().is_some() {
            debug!(
                angle_deg = self.rotation_angle_degrees,
                "drag session ended"
            );
        }
    }

    /// Back to 0°, cancelling any gesture in progress.
    pub fn reset(&mut self) {
        self.end_drag();
        self.rotation_angle_degrees = 0.0;
        self.drag_anchor_offset_degrees = 0.0;
    }

    /// Dispatch a raw input event. Only single-pointer/single-finger gestures rotate the wheel.
    pub fn handle<S: WidgetSurface + ?Sized>(&mut self, event: GestureEvent<'_>, surface: &mut S) {
        match event {
            GestureEvent::PointerDown(sample) => self.begin_drag(sample, surface),
            GestureEvent::PointerMove(sample) => self.drag_to(sample, &*surface),
            GestureEvent::PointerUp | GestureEvent::TouchEnd | GestureEvent::TouchCancel => {
                self.end_drag()
            }
            GestureEvent::TouchStart(touches) => match touches {
                [single] => self.begin_drag(*single, surface),
                _ => debug!(touches = touches.len(), "multi-touch start ignored"),
            },
            GestureEvent::TouchMove(touches) => match touches {
                [] => self.end_drag(),
                [single] => self.drag_to(*single, &*surface),
                _ => trace!(touches = touches.len(), "multi-touch move ignored"),
            },
        }
    }
}

/// Pointer angle in degrees around the widget center, if it can be computed.
fn pointer_angle<S: WidgetSurface + ?Sized>(sample: PointerSample, surface: &S) -> Option<f64> {
    let rect = surface.bounding_rect().filter(BoundingRect::is_measurable)?;
    if !sample.is_finite() {
        return None;
    }
    let center = rect.center();
    Some((sample.y - center.y).atan2(sample.x - center.x).to_degrees())
}

/// Equivalent of `delta` in `[-180, 180)`.
fn shortest_delta(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

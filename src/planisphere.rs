//! # Inline and Modal Planisphere Wheels
//!
//! The wheel appears twice: inline on the page and enlarged in a modal dialog.
//! Each is its own [`OrientationController`]. Opening the modal seeds it once from
//! the inline angle; after that the two never share state. Only one is interactive
//! at a time, so input goes to the modal while it is open and to the inline wheel
//! otherwise.
//!
//! What happens to the modal's angle on close is a [`ModalClosePolicy`]: by default
//! it is thrown away, so the modal works as a scratch view for exploring the sky.

use crate::orientation::{GestureEvent, OrientationController, WidgetSurface};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Fate of the modal wheel's angle when the dialog closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalClosePolicy {
    /// Drop the modal angle; the inline wheel keeps its own.
    #[default]
    Discard,
    /// Copy the modal angle back onto the inline wheel.
    Commit,
}

/// The pair of wheels shown by one page.
#[derive(Debug, Default)]
pub struct Planisphere {
    inline: OrientationController,
    modal: Option<OrientationController>,
    close_policy: ModalClosePolicy,
}

impl Planisphere {
    pub fn new(initial_angle: f64, close_policy: ModalClosePolicy) -> Self {
        Self {
            inline: OrientationController::with_angle(initial_angle),
            modal: None,
            close_policy,
        }
    }

    pub fn close_policy(&self) -> ModalClosePolicy {
        self.close_policy
    }

    pub fn inline(&self) -> &OrientationController {
        &self.inline
    }

    pub fn inline_mut(&mut self) -> &mut OrientationController {
        &mut self.inline
    }

    pub fn modal(&self) -> Option<&OrientationController> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut OrientationController> {
        self.modal.as_mut()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Open the modal wheel, seeded from the inline angle. Any inline drag is
    /// cancelled first. If the modal is already open it is returned untouched.
    pub fn open_modal(&mut self) -> &mut OrientationController {
        if self.modal.is_none() {
            self.inline.end_drag();
            let seed = self.inline.rotation_angle_degrees();
            info!(seed_deg = seed, "planisphere modal opened");
            self.modal = Some(OrientationController::with_angle(seed));
        }
        self.modal.get_or_insert_with(OrientationController::new)
    }

    /// Close the modal, releasing any gesture it still holds. Returns the modal's
    /// final angle, or `None` if it was not open.
    pub fn close_modal(&mut self) -> Option<f64> {
        let modal = self.modal.take()?;
        let final_angle = modal.rotation_angle_degrees();
        drop(modal);

        if self.close_policy == ModalClosePolicy::Commit {
            self.inline = OrientationController::with_angle(final_angle);
        }
        info!(
            final_deg = final_angle,
            policy = ?self.close_policy,
            inline_deg = self.inline.rotation_angle_degrees(),
            "planisphere modal closed"
        );
        Some(final_angle)
    }

    /// The wheel currently receiving input.
    pub fn active_mut(&mut self) -> &mut OrientationController {
        match self.modal.as_mut() {
            Some(modal) => modal,
            None => &mut self.inline,
        }
    }

    /// Route a raw input event to the interactive wheel.
    pub fn handle<S: WidgetSurface + ?Sized>(&mut self, event: GestureEvent<'_>, surface: &mut S) {
        self.active_mut().handle(event, surface);
    }
}

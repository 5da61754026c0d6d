// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The seam between the widget engine and a windowing system.
//!
//! The engine never talks to a platform directly. It asks a [`SurfaceBackend`]
//! to create, move and show native drawing surfaces at realize, map and allocate
//! boundaries, and to invalidate regions for redraw.
//! [`HeadlessBackend`] is an in-memory implementation used by tests and by
//! applications without a display.

use std::num::NonZeroU64;

use bitflags::bitflags;

use crate::core::{Rect, WidgetId};

mod headless;

pub use headless::{BackendCall, HeadlessBackend, HeadlessSurface};

/// Identifies a native drawing surface created by a [`SurfaceBackend`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfaceId(NonZeroU64);

impl SurfaceId {
    /// Creates an id from its raw value. Returns `None` for zero.
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the integer value of the `SurfaceId`.
    pub fn to_raw(self) -> u64 {
        self.0.get()
    }
}

/// Identifies an input device, such as a mouse pointer or a touch screen.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

/// Identifies the display a toplevel is shown on.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct ScreenId(pub u32);

bitflags! {
    /// The kinds of input a surface is interested in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventMask: u32 {
        /// Expose (redraw) events.
        const EXPOSURE = 1 << 0;
        /// Pointer motion.
        const POINTER_MOTION = 1 << 1;
        /// Button presses.
        const BUTTON_PRESS = 1 << 2;
        /// Button releases.
        const BUTTON_RELEASE = 1 << 3;
        /// Key presses.
        const KEY_PRESS = 1 << 4;
        /// Key releases.
        const KEY_RELEASE = 1 << 5;
        /// Pointer entering the surface.
        const ENTER_NOTIFY = 1 << 6;
        /// Pointer leaving the surface.
        const LEAVE_NOTIFY = 1 << 7;
        /// Keyboard focus changes.
        const FOCUS_CHANGE = 1 << 8;
        /// Surface configuration changes.
        const STRUCTURE = 1 << 9;
        /// Scroll wheel and gestures.
        const SCROLL = 1 << 10;
    }
}

/// Everything needed to create a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceAttributes {
    /// The parent surface, `None` for toplevel surfaces.
    pub parent: Option<SurfaceId>,
    /// Initial geometry, relative to the parent surface.
    pub rect: Rect,
    /// The events the surface should report.
    pub event_mask: EventMask,
    /// The widget which owns the surface.
    pub owner: WidgetId,
}

/// A windowing system, as seen by the widget engine.
///
/// All methods are infallible: a backend which fails to create a surface is expected
/// to log the failure and hand out an id which behaves as an invisible surface.
pub trait SurfaceBackend {
    /// Creates a new, hidden surface.
    fn create_surface(&mut self, attributes: &SurfaceAttributes) -> SurfaceId;
    /// Destroys a surface. Its children must have been destroyed or reparented before.
    fn destroy_surface(&mut self, surface: SurfaceId);
    /// Moves `surface` under `new_parent`, at `(x, y)` in the parent's coordinates.
    fn reparent_surface(&mut self, surface: SurfaceId, new_parent: Option<SurfaceId>, x: i32, y: i32);
    /// Changes the geometry of a surface.
    fn move_resize(&mut self, surface: SurfaceId, rect: Rect);
    /// Makes a surface visible.
    fn show(&mut self, surface: SurfaceId);
    /// Hides a surface.
    fn hide(&mut self, surface: SurfaceId);
    /// Schedules a redraw of `rect`, in the coordinates of `surface`.
    fn invalidate(&mut self, surface: SurfaceId, rect: Rect);
    /// Sets the events reported for `surface`.
    fn set_event_mask(&mut self, surface: SurfaceId, mask: EventMask);
    /// Sets the events reported for `surface` from a specific `device`.
    fn set_device_event_mask(&mut self, surface: SurfaceId, device: DeviceId, mask: EventMask);
    /// Whether the surface and all its ancestors are shown.
    fn is_viewable(&self, surface: SurfaceId) -> bool;
    /// The parent of `surface`, `None` for toplevel surfaces.
    fn surface_parent(&self, surface: SurfaceId) -> Option<SurfaceId>;
    /// The input devices attached to the display.
    fn devices(&self) -> Vec<DeviceId>;
    /// The surface `device` is currently over, if any.
    fn device_surface(&self, device: DeviceId) -> Option<SurfaceId>;
}

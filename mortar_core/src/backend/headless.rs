// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::backend::{DeviceId, EventMask, SurfaceAttributes, SurfaceBackend, SurfaceId};
use crate::core::{Rect, WidgetId};

/// A call made by the engine on a [`HeadlessBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendCall {
    /// [`SurfaceBackend::create_surface`].
    Create(SurfaceId),
    /// [`SurfaceBackend::destroy_surface`].
    Destroy(SurfaceId),
    /// [`SurfaceBackend::reparent_surface`].
    Reparent(SurfaceId, Option<SurfaceId>),
    /// [`SurfaceBackend::move_resize`].
    MoveResize(SurfaceId, Rect),
    /// [`SurfaceBackend::show`].
    Show(SurfaceId),
    /// [`SurfaceBackend::hide`].
    Hide(SurfaceId),
    /// [`SurfaceBackend::invalidate`].
    Invalidate(SurfaceId, Rect),
}

/// The state of a surface of a [`HeadlessBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadlessSurface {
    /// Parent surface.
    pub parent: Option<SurfaceId>,
    /// Geometry relative to the parent.
    pub rect: Rect,
    /// Whether `show` was called more recently than `hide`.
    pub visible: bool,
    /// The widget which created the surface.
    pub owner: WidgetId,
    /// Events reported for every device.
    pub event_mask: EventMask,
    /// Per-device overrides.
    pub device_masks: HashMap<DeviceId, EventMask>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u64,
    surfaces: HashMap<SurfaceId, HeadlessSurface>,
    devices: Vec<DeviceId>,
    pointers: HashMap<DeviceId, SurfaceId>,
    calls: Vec<BackendCall>,
}

/// An in-memory [`SurfaceBackend`] which models a surface tree and pointer devices.
///
/// Cloning a `HeadlessBackend` returns a handle to the same state, so tests can keep a
/// handle while the widget tree owns another one.
#[derive(Clone, Debug, Default)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    /// Creates a backend with a single pointer device, `DeviceId(0)`.
    pub fn new() -> Self {
        let backend = Self::default();
        backend.add_device(DeviceId(0));
        backend
    }

    /// Attaches a new input device.
    pub fn add_device(&self, device: DeviceId) {
        let mut state = self.state.borrow_mut();
        if !state.devices.contains(&device) {
            state.devices.push(device);
        }
    }

    /// Moves the pointer of `device` over `surface`, or out of every surface.
    ///
    /// No crossing notification is generated; this only sets up where the engine
    /// will believe the pointer is.
    pub fn place_pointer(&self, device: DeviceId, surface: Option<SurfaceId>) {
        let mut state = self.state.borrow_mut();
        match surface {
            Some(surface) => state.pointers.insert(device, surface),
            None => state.pointers.remove(&device),
        };
    }

    /// Returns a copy of the state of `surface`, if it exists.
    pub fn surface(&self, surface: SurfaceId) -> Option<HeadlessSurface> {
        self.state.borrow().surfaces.get(&surface).cloned()
    }

    /// The number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.state.borrow().surfaces.len()
    }

    /// Returns every call made since the last [`take_calls`](Self::take_calls).
    pub fn take_calls(&self) -> Vec<BackendCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    fn log(&self, call: BackendCall) {
        tracing::trace!(?call, "headless backend");
        self.state.borrow_mut().calls.push(call);
    }
}

impl SurfaceBackend for HeadlessBackend {
    fn create_surface(&mut self, attributes: &SurfaceAttributes) -> SurfaceId {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let Some(id) = SurfaceId::from_raw(state.next_id) else {
                unreachable!("surface ids start at 1");
            };
            state.surfaces.insert(
                id,
                HeadlessSurface {
                    parent: attributes.parent,
                    rect: attributes.rect,
                    visible: false,
                    owner: attributes.owner,
                    event_mask: attributes.event_mask,
                    device_masks: HashMap::new(),
                },
            );
            id
        };
        self.log(BackendCall::Create(id));
        id
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        {
            let mut state = self.state.borrow_mut();
            state.surfaces.remove(&surface);
            state.pointers.retain(|_, s| *s != surface);
        }
        self.log(BackendCall::Destroy(surface));
    }

    fn reparent_surface(&mut self, surface: SurfaceId, new_parent: Option<SurfaceId>, x: i32, y: i32) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.parent = new_parent;
            s.rect.x = x;
            s.rect.y = y;
        }
        self.log(BackendCall::Reparent(surface, new_parent));
    }

    fn move_resize(&mut self, surface: SurfaceId, rect: Rect) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.rect = rect;
        }
        self.log(BackendCall::MoveResize(surface, rect));
    }

    fn show(&mut self, surface: SurfaceId) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.visible = true;
        }
        self.log(BackendCall::Show(surface));
    }

    fn hide(&mut self, surface: SurfaceId) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.visible = false;
        }
        self.log(BackendCall::Hide(surface));
    }

    fn invalidate(&mut self, surface: SurfaceId, rect: Rect) {
        self.log(BackendCall::Invalidate(surface, rect));
    }

    fn set_event_mask(&mut self, surface: SurfaceId, mask: EventMask) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.event_mask = mask;
        }
    }

    fn set_device_event_mask(&mut self, surface: SurfaceId, device: DeviceId, mask: EventMask) {
        if let Some(s) = self.state.borrow_mut().surfaces.get_mut(&surface) {
            s.device_masks.insert(device, mask);
        }
    }

    fn is_viewable(&self, surface: SurfaceId) -> bool {
        let state = self.state.borrow();
        let mut current = Some(surface);
        while let Some(id) = current {
            match state.surfaces.get(&id) {
                Some(s) if s.visible => current = s.parent,
                _ => return false,
            }
        }
        true
    }

    fn surface_parent(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.state.borrow().surfaces.get(&surface)?.parent
    }

    fn devices(&self) -> Vec<DeviceId> {
        self.state.borrow().devices.clone()
    }

    fn device_surface(&self, device: DeviceId) -> Option<SurfaceId> {
        self.state.borrow().pointers.get(&device).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WidgetId;

    fn attrs(parent: Option<SurfaceId>) -> SurfaceAttributes {
        SurfaceAttributes {
            parent,
            rect: Rect::new(0, 0, 10, 10),
            event_mask: EventMask::EXPOSURE,
            owner: WidgetId::next(),
        }
    }

    #[test]
    fn viewable_requires_shown_ancestors() {
        let mut backend = HeadlessBackend::new();
        let top = backend.create_surface(&attrs(None));
        let child = backend.create_surface(&attrs(Some(top)));

        backend.show(child);
        assert!(!backend.is_viewable(child));
        backend.show(top);
        assert!(backend.is_viewable(child));
        assert_eq!(backend.surface_parent(child), Some(top));
    }

    #[test]
    fn destroying_a_surface_moves_pointers_out() {
        let mut backend = HeadlessBackend::new();
        let top = backend.create_surface(&attrs(None));
        backend.place_pointer(DeviceId(0), Some(top));
        assert_eq!(backend.device_surface(DeviceId(0)), Some(top));

        backend.destroy_surface(top);
        assert_eq!(backend.device_surface(DeviceId(0)), None);
        assert_eq!(
            backend.take_calls(),
            [BackendCall::Create(top), BackendCall::Destroy(top)]
        );
    }
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The lifecycle pass: show, map, realize and their inverses, and destruction.
//!
//! A widget moves through these states in order:
//!
//! ```text
//! inserted -> visible -> realized -> mapped
//! ```
//!
//! Realizing gives a widget a drawing surface, its own or its parent's. Mapping makes
//! it appear on screen, and requires the widget and its parent to be mapped-eligible.
//! Going back down, children are unmapped and unrealized before their parent.

use tracing::debug;

use crate::app::WidgetTree;
use crate::backend::SurfaceAttributes;
use crate::core::{
    DeviceEventInterest, DiagnosticKind, EventInterest, LifecycleCtx, Notification, WidgetId,
};

// --- MARK: SHOW
impl WidgetTree {
    /// See [`WidgetTree::show`].
    pub(crate) fn show_inner(&mut self, id: WidgetId) {
        if !self.check_exists(id, "show") {
            return;
        }
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        if state.is_visible {
            return;
        }
        state.is_visible = true;
        let is_toplevel = state.is_toplevel;
        let needs_allocate = state.needs_allocate || !state.is_realized;
        let parent = state.parent;
        let _guard = self.verify_guard(id);
        self.emit(id, Notification::Show);

        if is_toplevel {
            if !self.realize_inner(id) {
                return;
            }
            if needs_allocate {
                self.allocate_toplevel(id);
            }
            self.map_inner(id);
        } else {
            self.queue_resize_inner(id, true);
            if parent.is_some_and(|p| self.is_mapped(p)) && self.child_visible(id) {
                self.map_inner(id);
            }
        }
    }

    /// See [`WidgetTree::show_all`].
    pub(crate) fn show_all_inner(&mut self, id: WidgetId) {
        for child in self.child_snapshot(id, false) {
            self.show_all_inner(child);
        }
        self.show_inner(id);
    }

    /// See [`WidgetTree::hide`].
    pub(crate) fn hide_inner(&mut self, id: WidgetId) {
        if !self.check_exists(id, "hide") || !self.is_visible(id) {
            return;
        }
        let _guard = self.verify_guard(id);
        self.unset_focus_within(id);
        self.grab_remove_inner(id);

        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.is_visible = false;
        let is_mapped = state.is_mapped;
        let parent = state.parent;
        self.emit(id, Notification::Hide);
        if is_mapped {
            self.unmap_inner(id);
        }
        // The widget is hidden, so its own resize wouldn't reach the parent.
        if let Some(parent) = parent {
            self.queue_resize_inner(parent, true);
        }
    }

    /// See [`WidgetTree::set_child_visible`].
    pub(crate) fn set_child_visible_inner(&mut self, id: WidgetId, child_visible: bool) {
        if !self.check_exists(id, "set_child_visible") {
            return;
        }
        if self.is_toplevel(id) {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "set_child_visible: not allowed on toplevels",
            );
            return;
        }
        if self.child_visible(id) == child_visible {
            return;
        }
        let _guard = self.verify_guard(id);
        if !child_visible {
            self.unset_focus_within(id);
        }
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.is_child_visible = child_visible;
        let is_visible = state.is_visible;

        if let Some(parent) = state.parent
            && self.is_realized(parent)
        {
            if self.is_mapped(parent) && child_visible && is_visible {
                self.map_inner(id);
            } else {
                self.unmap_inner(id);
            }
        }
        self.queue_resize_inner(id, true);
    }
}

// --- MARK: MAP
impl WidgetTree {
    /// See [`WidgetTree::map`].
    pub(crate) fn map_inner(&mut self, id: WidgetId) {
        if !self.check_exists(id, "map") {
            return;
        }
        let Some(state) = self.arena.state(id) else {
            return;
        };
        if state.is_mapped {
            return;
        }
        let is_mappable = state.is_mappable();
        let parent = state.parent;
        if !is_mappable {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "map: the widget is hidden",
            );
            return;
        }
        if let Some(parent) = parent
            && !self.is_mapped(parent)
        {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "map: the parent isn't mapped",
            );
            return;
        }
        let _guard = self.verify_guard(id);
        if !self.realize_inner(id) {
            return;
        }

        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.is_mapped = true;
        let own_surface = state.surface.filter(|_| state.has_own_surface);
        self.with_widget(id, |widget, tree| {
            let mut ctx = LifecycleCtx {
                tree,
                widget_id: id,
            };
            widget.map(&mut ctx);
        });
        self.emit(id, Notification::Map);

        for child in self.child_snapshot(id, true) {
            if self.arena.state(child).is_some_and(|s| s.is_mappable()) {
                self.map_inner(child);
            }
        }
        match own_surface {
            Some(surface) => self.backend.show(surface),
            None => self.queue_draw_inner(id),
        }
    }

    /// See [`WidgetTree::unmap`].
    pub(crate) fn unmap_inner(&mut self, id: WidgetId) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        if !state.is_mapped {
            return;
        }
        let own_surface = state.surface.filter(|_| state.has_own_surface);
        let _guard = self.verify_guard(id);
        if own_surface.is_none() {
            // The area is only invalidated while the widget is still mapped.
            self.queue_draw_inner(id);
        }
        if let Some(state) = self.arena.state_mut(id) {
            state.is_mapped = false;
        }

        for child in self.child_snapshot(id, true) {
            self.unmap_inner(child);
        }
        self.with_widget(id, |widget, tree| {
            let mut ctx = LifecycleCtx {
                tree,
                widget_id: id,
            };
            widget.unmap(&mut ctx);
        });
        self.emit(id, Notification::Unmap);
        if let Some(surface) = own_surface {
            self.backend.hide(surface);
        }
    }
}

// --- MARK: REALIZE
impl WidgetTree {
    /// Realizes the widget and its ancestors. Children are realized when they are mapped.
    ///
    /// Returns whether the widget is realized.
    pub(crate) fn realize_inner(&mut self, id: WidgetId) -> bool {
        let Some(state) = self.arena.state(id) else {
            self.check_exists(id, "realize");
            return false;
        };
        if state.is_realized {
            return true;
        }
        let parent = state.parent;
        if !state.is_anchored {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "realize: the widget isn't inside a toplevel",
            );
            return false;
        }
        let _guard = self.verify_guard(id);
        if let Some(parent) = parent
            && !self.realize_inner(parent)
        {
            return false;
        }

        let parent_surface = parent.and_then(|p| self.surface(p));
        let Some(state) = self.arena.state(id) else {
            return false;
        };
        let surface = if state.has_own_surface {
            let attributes = SurfaceAttributes {
                parent: parent_surface,
                rect: state.allocation,
                event_mask: state
                    .attributes
                    .get::<EventInterest>()
                    .map(|i| i.0)
                    .unwrap_or_default(),
                owner: id,
            };
            let device_masks: Vec<_> = state
                .attributes
                .get::<DeviceEventInterest>()
                .map(|i| i.0.iter().map(|(d, m)| (*d, *m)).collect())
                .unwrap_or_default();
            let surface = self.backend.create_surface(&attributes);
            for (device, mask) in device_masks {
                self.backend.set_device_event_mask(surface, device, mask);
            }
            self.surface_owners.insert(surface, id);
            debug!(widget = id.trace(), ?surface, "created surface");
            Some(surface)
        } else {
            parent_surface
        };

        if let Some(state) = self.arena.state_mut(id) {
            state.surface = surface;
            state.is_realized = true;
        }
        self.with_widget(id, |widget, tree| {
            let mut ctx = LifecycleCtx {
                tree,
                widget_id: id,
            };
            widget.realize(&mut ctx);
        });
        self.emit(id, Notification::Realize);
        true
    }

    /// See [`WidgetTree::unrealize`].
    pub(crate) fn unrealize_inner(&mut self, id: WidgetId) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        if !state.is_realized {
            return;
        }
        let is_mapped = state.is_mapped;
        let _guard = self.verify_guard(id);
        if is_mapped {
            self.unmap_inner(id);
        }
        for child in self.child_snapshot(id, true) {
            self.unrealize_inner(child);
        }
        self.with_widget(id, |widget, tree| {
            let mut ctx = LifecycleCtx {
                tree,
                widget_id: id,
            };
            widget.unrealize(&mut ctx);
        });

        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        let own_surface = state.surface.take().filter(|_| state.has_own_surface);
        state.is_realized = false;
        if let Some(surface) = own_surface {
            self.surface_owners.remove(&surface);
            self.backend.destroy_surface(surface);
        }
        self.emit(id, Notification::Unrealize);
    }
}

// --- MARK: DESTROY
impl WidgetTree {
    /// See [`WidgetTree::destroy`].
    ///
    /// The widget is unmapped, unrealized and detached, then its children are
    /// destroyed, and finally the widget itself is removed.
    pub(crate) fn destroy_inner(&mut self, id: WidgetId) {
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        if state.in_destruction {
            return;
        }
        state.in_destruction = true;
        debug!(widget = id.trace(), "destroying");

        self.hide_inner(id);
        self.unrealize_inner(id);
        if self.parent(id).is_some() {
            self.unparent_inner(id);
        }
        for child in self.child_snapshot(id, true) {
            self.destroy_inner(child);
        }
        self.emit(id, Notification::Destroy);

        let groups = self
            .arena
            .state(id)
            .map(|s| s.size_groups.to_vec())
            .unwrap_or_default();
        for group in groups {
            let Some(size_group) = self.size_groups.get_mut(group) else {
                continue;
            };
            size_group.members.retain(|member| *member != id);
            for member in size_group.members.clone() {
                self.queue_resize_inner(member, true);
            }
        }
        self.grabs.retain(|grab| *grab != id);
        self.resize_queue.retain(|toplevel| *toplevel != id);
        self.surface_owners.retain(|_, owner| *owner != id);
        self.arena.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::backend::BackendCall;
    use crate::core::{DiagnosticKind, Rect};
    use crate::testing_widgets::{
        Leaf, Stack, Toplevel, names_for, record_notifications, test_tree, test_tree_with_backend,
    };

    #[test]
    fn showing_a_toplevel_maps_the_tree() {
        let (mut tree, backend) = test_tree_with_backend();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: true });
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(stack, window);
        tree.set_parent(leaf, stack);
        let log = record_notifications(&mut tree);
        tree.show_all(window);

        for widget in [window, stack, leaf] {
            assert!(tree.is_visible(widget));
            assert!(tree.is_realized(widget));
            assert!(tree.is_mapped(widget));
        }
        assert_eq!(
            names_for(&log, leaf),
            ["Show", "SizeAllocate", "Realize", "Map"]
        );
        assert_eq!(tree.surface(leaf), tree.surface(stack));
        assert_ne!(tree.surface(stack), tree.surface(window));
        let stack_surface = backend.surface(tree.surface(stack).unwrap()).unwrap();
        assert_eq!(stack_surface.parent, tree.surface(window));
        assert!(stack_surface.visible);
        assert!(tree.take_diagnostics().is_empty());
    }

    #[test]
    fn hiding_unmaps_but_keeps_resources() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: false });
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(stack, window);
        tree.set_parent(leaf, stack);
        tree.show_all(window);

        tree.hide(stack);
        assert!(!tree.is_mapped(stack));
        assert!(!tree.is_mapped(leaf));
        assert!(tree.is_visible(leaf));
        assert!(tree.is_realized(leaf));

        tree.show(stack);
        assert!(tree.is_mapped(leaf));
        assert!(tree.take_diagnostics().is_empty());
    }

    #[test]
    fn child_visible_controls_mapping() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(leaf, window);
        tree.show_all(window);

        tree.set_child_visible(leaf, false);
        assert!(tree.is_visible(leaf));
        assert!(!tree.is_mapped(leaf));
        tree.set_child_visible(leaf, true);
        assert!(tree.is_mapped(leaf));

        tree.set_child_visible(window, false);
        assert_eq!(tree.take_diagnostics()[0].kind, DiagnosticKind::Rejected);
    }

    #[test]
    fn detached_widgets_are_not_realized() {
        let mut tree = test_tree();
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.show(leaf);
        tree.realize(leaf);
        assert!(!tree.is_realized(leaf));
        assert_eq!(tree.take_diagnostics()[0].kind, DiagnosticKind::Rejected);
    }

    #[test]
    fn mapping_requires_a_mapped_parent() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(leaf, window);
        tree.show(leaf);
        tree.map(leaf);
        assert!(!tree.is_mapped(leaf));
        assert_eq!(tree.take_diagnostics()[0].kind, DiagnosticKind::Rejected);
    }

    #[test]
    fn children_release_surfaces_first() {
        let (mut tree, backend) = test_tree_with_backend();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: true });
        tree.set_parent(stack, window);
        tree.show_all(window);
        let window_surface = tree.surface(window).unwrap();
        let stack_surface = tree.surface(stack).unwrap();
        backend.take_calls();

        tree.unrealize(window);
        let destroyed: Vec<_> = backend
            .take_calls()
            .into_iter()
            .filter(|call| matches!(call, BackendCall::Destroy(_)))
            .collect();
        assert_eq!(
            destroyed,
            [
                BackendCall::Destroy(stack_surface),
                BackendCall::Destroy(window_surface)
            ]
        );
        assert_eq!(tree.surface(stack), None);
        assert_eq!(tree.surface_owner(stack_surface), None);
    }

    #[test]
    fn destroy_removes_the_subtree() {
        let (mut tree, backend) = test_tree_with_backend();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: true });
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(stack, window);
        tree.set_parent(leaf, stack);
        tree.show_all(window);
        let log = record_notifications(&mut tree);

        tree.destroy(stack);
        assert!(!tree.contains(stack));
        assert!(!tree.contains(leaf));
        assert!(tree.children(window).is_empty());
        assert_eq!(backend.surface_count(), 1);
        assert_eq!(
            names_for(&log, stack),
            [
                "Hide",
                "Unmap",
                "Unrealize",
                "ParentSet",
                "HierarchyChanged",
                "ScreenChanged",
                "Destroy"
            ]
        );
        assert_matches!(names_for(&log, leaf).last(), Some(&"Destroy"));

        // Destroying twice is harmless.
        tree.destroy(stack);
        assert!(tree.contains(window));
        assert_eq!(tree.allocation(stack), Rect::DEGENERATE);
    }
}

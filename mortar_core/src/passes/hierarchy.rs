// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The hierarchy pass: linking widgets, anchoring, screens, direction and style.

use tracing::{debug, info_span};

use crate::app::WidgetTree;
use crate::backend::{ScreenId, SurfaceId};
use crate::core::{
    ChildSlot, DiagnosticKind, Notification, Rect, StateCtx, StateDelta, StateFlags,
    TextContext, TextDirection, WidgetId,
};

// --- MARK: LINK
impl WidgetTree {
    /// See [`WidgetTree::set_parent`].
    pub(crate) fn set_parent_inner(&mut self, child: WidgetId, parent: WidgetId, internal: bool) {
        if !self.check_exists(child, "set_parent") || !self.check_exists(parent, "set_parent") {
            return;
        }
        let rejection = if child == parent {
            Some("a widget can't be its own parent")
        } else if self.parent(child).is_some() {
            Some("the widget already has a parent, unparent it first")
        } else if self.is_toplevel(child) {
            Some("toplevels can't have a parent")
        } else if self.is_ancestor(child, parent) {
            Some("the new parent is a descendant of the widget")
        } else {
            None
        };
        if let Some(rejection) = rejection {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(child),
                format!("set_parent: {rejection}"),
            );
            return;
        }
        let _guard = self.verify_guard(child);
        debug!(child = child.trace(), parent = parent.trace(), internal, "set_parent");

        if let Some(state) = self.arena.state_mut(parent) {
            state.children.push(ChildSlot { id: child, internal });
        }
        if let Some(state) = self.arena.state_mut(child) {
            state.parent = Some(parent);
            state.is_composite_child = internal;
        }

        // The child takes the propagating flags of its new parent, on top of its own.
        let flags = (self.state_flags(parent) & StateFlags::DO_PROPAGATE) | self.state_flags(child);
        let use_forall = self.is_sensitive(parent) != self.is_sensitive(child);
        self.propagate_state_inner(
            child,
            StateDelta {
                set: flags,
                unset: flags.complement(),
            },
            use_forall,
        );

        self.emit(child, Notification::ParentSet { previous: None });
        // A widget moved by `reparent` keeps its anchoring until the move is done.
        let in_reparent = self.arena.state(child).is_some_and(|s| s.in_reparent);
        if in_reparent {
            self.move_surfaces(child, parent);
        } else if self.is_anchored(parent) {
            self.propagate_hierarchy_changed(child, None);
        }
        if self.is_realized(parent) {
            self.realize_inner(child);
        }
        if self.is_visible(child) {
            if self.is_mapped(parent) && self.child_visible(child) {
                self.map_inner(child);
            }
            self.queue_resize_inner(child, true);
        }
    }

    /// See [`WidgetTree::unparent`].
    pub(crate) fn unparent_inner(&mut self, id: WidgetId) {
        self.detach(id, false);
    }

    /// Unlinks a widget from its parent.
    ///
    /// Inside `reparent`, the widget keeps its resources and anchoring, and stays mapped
    /// when `keep_mapped` is set.
    fn detach(&mut self, id: WidgetId, keep_mapped: bool) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let _guard = self.verify_guard(id);
        let _parent_guard = self.verify_guard(parent);

        self.unset_focus_within(id);
        if let Some(state) = self.arena.state_mut(parent)
            && state.focus_child == Some(id)
        {
            state.focus_child = None;
        }
        self.queue_draw_inner(id);

        let previous_toplevel = if self.is_anchored(id) {
            self.toplevel_of(id)
        } else {
            None
        };
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.allocation = Rect::DEGENERATE;
        let in_reparent = state.in_reparent;
        if state.is_realized {
            if !in_reparent {
                self.unrealize_inner(id);
            } else if !keep_mapped {
                self.unmap_inner(id);
            }
        }

        if let Some(state) = self.arena.state_mut(parent) {
            state.children.retain(|slot| slot.id != id);
        }
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.is_child_visible = true;
        state.is_composite_child = false;
        state.parent = None;
        let is_visible = state.is_visible;
        if is_visible {
            self.queue_resize_inner(parent, true);
        }

        self.emit(
            id,
            Notification::ParentSet {
                previous: Some(parent),
            },
        );
        if !in_reparent {
            self.propagate_hierarchy_changed(id, previous_toplevel);
        }

        // Insensitivity inherited from the old parent goes away.
        if self.sensitive(id) && !self.is_sensitive(id) {
            self.propagate_state_inner(
                id,
                StateDelta {
                    set: StateFlags::empty(),
                    unset: StateFlags::INSENSITIVE,
                },
                true,
            );
        }
    }

    /// See [`WidgetTree::reparent`].
    pub(crate) fn reparent_inner(&mut self, id: WidgetId, new_parent: WidgetId) {
        if !self.check_exists(id, "reparent") || !self.check_exists(new_parent, "reparent") {
            return;
        }
        let Some(old_parent) = self.parent(id) else {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                "reparent: the widget has no parent, use set_parent",
            );
            return;
        };
        if old_parent == new_parent {
            return;
        }
        if self.is_ancestor(id, new_parent) {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                "reparent: the new parent is a descendant of the widget",
            );
            return;
        }
        let _guard = self.verify_guard(id);
        let internal = self.is_composite_child(id);
        // Both sides realized: the widget keeps its resources.
        let fast = self.is_realized(id) && self.is_realized(new_parent);
        debug!(widget = id.trace(), fast, "reparent");
        if !fast {
            self.unparent_inner(id);
            self.set_parent_inner(id, new_parent, internal);
            return;
        }

        let previous_toplevel = self.toplevel_of(id);
        let keep_mapped = self.is_mapped(new_parent);
        if let Some(state) = self.arena.state_mut(id) {
            state.in_reparent = true;
        }
        self.detach(id, keep_mapped);
        self.set_parent_inner(id, new_parent, internal);
        if let Some(state) = self.arena.state_mut(id) {
            state.in_reparent = false;
        }

        // Anchoring and the screen are settled once, against the final parent.
        self.propagate_hierarchy_changed(id, previous_toplevel);
        let screen = self
            .toplevel_of(id)
            .and_then(|t| self.arena.state(t))
            .and_then(|t| t.toplevel.as_ref())
            .map(|t| t.screen);
        if let Some(screen) = screen
            && self.arena.state(id).is_some_and(|s| s.screen != Some(screen))
        {
            self.propagate_screen(id, screen);
        }
    }

    /// Moves the surfaces of a realized widget under the surface of its new parent.
    ///
    /// Own surfaces are reparented on the backend. Widgets drawing into an inherited
    /// surface are pointed at the new one, down to the first descendants with their own.
    fn move_surfaces(&mut self, id: WidgetId, new_parent: WidgetId) {
        let new_surface = self.surface(new_parent);
        let Some(state) = self.arena.state(id) else {
            return;
        };
        if !state.is_realized {
            return;
        }
        if state.has_own_surface {
            if let Some(surface) = state.surface {
                let allocation = state.allocation;
                self.backend
                    .reparent_surface(surface, new_surface, allocation.x, allocation.y);
            }
        } else {
            self.repoint_surface(id, new_surface);
        }
    }

    fn repoint_surface(&mut self, id: WidgetId, new_surface: Option<SurfaceId>) {
        if let Some(state) = self.arena.state_mut(id) {
            state.surface = new_surface;
        }
        for child in self.child_snapshot(id, true) {
            let Some(state) = self.arena.state(child) else {
                continue;
            };
            if !state.is_realized {
                continue;
            }
            match state.surface.filter(|_| state.has_own_surface) {
                Some(surface) => {
                    let allocation = state.allocation;
                    self.backend
                        .reparent_surface(surface, new_surface, allocation.x, allocation.y);
                }
                None => self.repoint_surface(child, new_surface),
            }
        }
    }
}

// --- MARK: ANCHORING
impl WidgetTree {
    /// Updates whether a widget and its descendants are anchored to a toplevel.
    ///
    /// Widgets whose anchoring changed are notified, and get the screen of their
    /// new toplevel, or none.
    pub(crate) fn propagate_hierarchy_changed(
        &mut self,
        id: WidgetId,
        previous_toplevel: Option<WidgetId>,
    ) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        let is_toplevel = state.is_toplevel;
        let was_anchored = state.is_anchored;
        let anchored = is_toplevel || state.parent.is_some_and(|p| self.is_anchored(p));
        if anchored == was_anchored {
            return;
        }
        let screen = if anchored {
            self.toplevel_of(id)
                .and_then(|t| self.arena.state(t))
                .and_then(|t| t.toplevel.as_ref())
                .map(|t| t.screen)
        } else {
            None
        };
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.is_anchored = anchored;
        let previous_screen = std::mem::replace(&mut state.screen, screen);

        self.emit(id, Notification::HierarchyChanged { previous_toplevel });
        self.with_widget(id, |widget, tree| {
            let mut ctx = StateCtx {
                tree,
                widget_id: id,
            };
            widget.hierarchy_changed(&mut ctx, previous_toplevel);
        });
        if previous_screen != screen {
            self.screen_changed(id, previous_screen);
        }
        for child in self.child_snapshot(id, true) {
            self.propagate_hierarchy_changed(child, previous_toplevel);
        }
    }

    /// Moves a widget and its descendants to `screen`.
    pub(crate) fn propagate_screen(&mut self, id: WidgetId, screen: ScreenId) {
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        let previous = state.screen.replace(screen);
        if previous != Some(screen) {
            self.screen_changed(id, previous);
        }
        for child in self.child_snapshot(id, true) {
            self.propagate_screen(child, screen);
        }
    }

    fn screen_changed(&mut self, id: WidgetId, previous: Option<ScreenId>) {
        if let Some(attributes) = self.attributes_mut(id) {
            attributes.remove::<TextContext>();
        }
        self.emit(id, Notification::ScreenChanged { previous });
    }
}

// --- MARK: DIRECTION AND STYLE
impl WidgetTree {
    /// Notifies a widget that its effective direction changed from `previous`.
    pub(crate) fn emit_direction_changed(&mut self, id: WidgetId, previous: TextDirection) {
        if let Some(attributes) = self.attributes_mut(id) {
            attributes.remove::<TextContext>();
        }
        self.emit(id, Notification::DirectionChanged { previous });
        self.with_widget(id, |widget, tree| {
            let mut ctx = StateCtx {
                tree,
                widget_id: id,
            };
            widget.direction_changed(&mut ctx, previous);
        });
        self.queue_resize_inner(id, true);
    }

    /// See [`WidgetTree::set_default_direction`].
    pub(crate) fn set_default_direction_inner(&mut self, direction: TextDirection) {
        if direction == TextDirection::None {
            self.report(
                DiagnosticKind::ContractViolation,
                None,
                "set_default_direction: the default direction must be Ltr or Rtl",
            );
            return;
        }
        let previous = self.default_direction();
        if previous == direction {
            return;
        }
        let _span = info_span!("set_default_direction", ?direction).entered();
        self.settings.update(|s| s.default_direction = direction);

        let roots: Vec<_> = self
            .arena
            .ids()
            .iter()
            .copied()
            .filter(|id| self.parent(*id).is_none())
            .collect();
        for root in roots {
            self.default_direction_changed(root, previous);
        }
    }

    fn default_direction_changed(&mut self, id: WidgetId, previous: TextDirection) {
        if self.direction(id) == TextDirection::None {
            self.emit_direction_changed(id, previous);
        }
        for child in self.child_snapshot(id, true) {
            self.default_direction_changed(child, previous);
        }
    }

    /// See [`WidgetTree::reset_style`].
    pub(crate) fn reset_style_inner(&mut self, id: WidgetId) {
        if let Some(attributes) = self.attributes_mut(id) {
            attributes.remove::<TextContext>();
        }
        self.emit(id, Notification::StyleUpdated);
        self.with_widget(id, |widget, tree| {
            let mut ctx = StateCtx {
                tree,
                widget_id: id,
            };
            widget.style_updated(&mut ctx);
        });
        for child in self.child_snapshot(id, true) {
            self.reset_style_inner(child);
        }
    }
}

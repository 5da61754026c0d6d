// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The state pass: state flags, sensitivity, keyboard focus and grabs.

use tracing::debug;

use crate::app::{DebugFlags, WidgetTree};
use crate::core::{
    CrossingMode, DiagnosticKind, Notification, StateCtx, StateDelta, StateFlags, TextContext,
    WidgetId,
};
use crate::passes::enter_span_if;

// --- MARK: PROPAGATE
impl WidgetTree {
    /// Applies `delta` to a widget, then to its descendants.
    ///
    /// A widget stays insensitive while its own sensitivity is off or its parent is
    /// insensitive, whatever the delta says. Children are only visited when the
    /// widget's flags changed; internal children are visited when `use_forall` is set
    /// or when the widget's sensitivity changed.
    pub(crate) fn propagate_state_inner(
        &mut self,
        id: WidgetId,
        delta: StateDelta,
        use_forall: bool,
    ) {
        let debug_state = self.settings.debug().contains(DebugFlags::STATE);
        let Some(state) = self.arena.state(id) else {
            return;
        };
        let _span = enter_span_if(debug_state, state);
        let parent_insensitive = state
            .parent
            .and_then(|p| self.arena.state(p))
            .is_some_and(|p| !p.is_effectively_sensitive());
        let toplevel = self.toplevel_of(id);
        let is_focus = toplevel.is_some_and(|t| self.focus_widget(t) == Some(id));

        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        let previous = state.state_flags;
        let mut flags = delta.apply(previous);
        if !state.is_sensitive || parent_insensitive {
            flags |= StateFlags::INSENSITIVE;
        }
        let loses_focus = is_focus && flags.contains(StateFlags::INSENSITIVE);
        if loses_focus {
            flags -= StateFlags::FOCUSED;
        }
        if flags == previous {
            return;
        }
        state.state_flags = flags;
        state.attributes.remove::<TextContext>();
        let is_mapped = state.is_mapped;
        let _guard = self.verify_guard(id);
        if debug_state {
            debug!(widget = id.trace(), ?previous, new = ?flags, "state flags changed");
        }

        if loses_focus && let Some(toplevel) = toplevel {
            self.clear_focus_chain(toplevel);
        }
        let insensitive = flags.contains(StateFlags::INSENSITIVE);
        if insensitive && self.grabs.contains(&id) {
            self.grab_remove_inner(id);
        }

        self.emit(
            id,
            Notification::StateChanged {
                previous: previous.into(),
            },
        );
        self.emit(id, Notification::StateFlagsChanged { previous });
        self.with_widget(id, |widget, tree| {
            let mut ctx = StateCtx {
                tree,
                widget_id: id,
            };
            widget.state_flags_changed(&mut ctx, previous);
        });

        let sensitivity_changed = (previous ^ flags).contains(StateFlags::INSENSITIVE);
        if sensitivity_changed && is_mapped && !self.is_shadowed(id) {
            self.cross_pointers_for_sensitivity(id, insensitive);
        }

        let child_delta = delta.for_children();
        let forall = use_forall || sensitivity_changed;
        for child in self.child_snapshot(id, forall) {
            self.propagate_state_inner(child, child_delta, use_forall);
        }
    }

    /// Pointers over one of the widget's own surfaces leave it when it becomes
    /// insensitive, and enter it again when it becomes sensitive.
    fn cross_pointers_for_sensitivity(&mut self, id: WidgetId, insensitive: bool) {
        for device in self.backend.devices() {
            let Some(surface) = self.backend.device_surface(device) else {
                continue;
            };
            if self.surface_owners.get(&surface) != Some(&id) {
                continue;
            }
            if insensitive {
                self.synthesize_crossing_inner(Some(id), None, device, CrossingMode::StateChanged);
            } else {
                self.synthesize_crossing_inner(None, Some(id), device, CrossingMode::StateChanged);
            }
        }
    }

    /// See [`WidgetTree::set_state_flags`].
    pub(crate) fn update_state_flags(&mut self, id: WidgetId, set: StateFlags, unset: StateFlags) {
        self.propagate_state_inner(id, StateDelta { set, unset }, false);
    }

    /// Changes the own sensitivity of a widget.
    ///
    /// Returns whether the effective sensitivity of the widget may have changed.
    /// Under an insensitive parent only the own value is recorded.
    pub(crate) fn set_sensitive_inner(&mut self, id: WidgetId, sensitive: bool) -> bool {
        let Some(state) = self.arena.state_mut(id) else {
            return false;
        };
        if state.is_sensitive == sensitive {
            return false;
        }
        state.is_sensitive = sensitive;
        let parent = state.parent;
        if parent.is_some_and(|p| !self.is_sensitive(p)) {
            return false;
        }
        let delta = if sensitive {
            StateDelta {
                set: StateFlags::empty(),
                unset: StateFlags::INSENSITIVE,
            }
        } else {
            StateDelta {
                set: StateFlags::INSENSITIVE,
                unset: StateFlags::empty(),
            }
        };
        self.propagate_state_inner(id, delta, true);
        true
    }
}

// --- MARK: FOCUS
impl WidgetTree {
    /// See [`WidgetTree::grab_focus`].
    pub(crate) fn grab_focus_inner(&mut self, id: WidgetId) {
        if !self.check_exists(id, "grab_focus") {
            return;
        }
        if !self.can_focus(id) || !self.is_sensitive(id) {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "grab_focus: the widget can't take focus",
            );
            return;
        }
        let Some(toplevel) = self.toplevel_of(id) else {
            self.report(
                DiagnosticKind::Rejected,
                Some(id),
                "grab_focus: the widget isn't inside a toplevel",
            );
            return;
        };
        if self.focus_widget(toplevel) == Some(id) {
            return;
        }
        if let Some(previous) = self.clear_focus_chain(toplevel) {
            self.update_state_flags(previous, StateFlags::empty(), StateFlags::FOCUSED);
        }

        let mut child = id;
        while let Some(parent) = self.parent(child) {
            if let Some(state) = self.arena.state_mut(parent) {
                state.focus_child = Some(child);
            }
            child = parent;
        }
        if let Some(toplevel) = self.arena.state_mut(toplevel).and_then(|s| s.toplevel.as_mut())
        {
            toplevel.focus = Some(id);
        }
        self.update_state_flags(id, StateFlags::FOCUSED, StateFlags::empty());
    }

    /// Drops the focus of a toplevel if it is `id` or one of its descendants.
    pub(crate) fn unset_focus_within(&mut self, id: WidgetId) {
        let Some(toplevel) = self.toplevel_of(id) else {
            return;
        };
        let Some(focus) = self.focus_widget(toplevel) else {
            return;
        };
        if !self.is_ancestor(id, focus) {
            return;
        }
        if let Some(previous) = self.clear_focus_chain(toplevel) {
            self.update_state_flags(previous, StateFlags::empty(), StateFlags::FOCUSED);
        }
    }

    /// Forgets the focus widget of `toplevel` and the `focus_child` links leading to it.
    ///
    /// Returns the former focus widget. Its [`StateFlags::FOCUSED`] flag is left to the caller.
    fn clear_focus_chain(&mut self, toplevel: WidgetId) -> Option<WidgetId> {
        let previous = self
            .arena
            .state_mut(toplevel)
            .and_then(|s| s.toplevel.as_mut())
            .and_then(|t| t.focus.take())?;
        let mut current = Some(previous);
        while let Some(widget) = current {
            let Some(state) = self.arena.state_mut(widget) else {
                break;
            };
            state.focus_child = None;
            current = state.parent;
        }
        Some(previous)
    }
}

// --- MARK: GRABS
impl WidgetTree {
    /// See [`WidgetTree::grab_add`].
    pub(crate) fn grab_add_inner(&mut self, id: WidgetId) {
        if !self.check_exists(id, "grab_add") {
            return;
        }
        if self.grabs.contains(&id) || !self.is_sensitive(id) {
            return;
        }
        self.grabs.push(id);
    }

    /// See [`WidgetTree::grab_remove`].
    pub(crate) fn grab_remove_inner(&mut self, id: WidgetId) {
        self.grabs.retain(|grab| *grab != id);
    }
}

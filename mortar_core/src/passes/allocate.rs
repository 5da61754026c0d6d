// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The allocate pass: commits rectangles, invalidates what changed, and
//! schedules resizes and redraws.

use tracing::{debug, trace};

use crate::app::{DebugFlags, WidgetTree};
use crate::core::{
    AllocateCtx, Allocation, DiagnosticKind, Notification, Orientation, Rect, RequestMode,
    SizeGroupId, SizeGroupMode, WidgetId,
};
use crate::passes::enter_span_if;

impl WidgetTree {
    /// See [`WidgetTree::size_allocate`].
    pub(crate) fn size_allocate_inner(&mut self, id: WidgetId, allocation: Allocation) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        if !state.is_visible && !state.is_toplevel {
            return;
        }
        let debug_geometry = self.settings.debug().contains(DebugFlags::GEOMETRY);
        let _span = enter_span_if(debug_geometry, state);
        let _guard = self.verify_guard(id);

        self.ensure_resize(id);
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        // Cleared before any work, so a resize queued from below is not lost.
        let alloc_needed = std::mem::replace(&mut state.needs_allocate, false);
        let old_allocation = state.allocation;

        let mut proposed = allocation;
        if proposed.width < 0 || proposed.height < 0 {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!("negative allocation {allocation:?}, using 1x1"),
            );
            proposed.width = 1;
            proposed.height = 1;
        }

        // Requests are re-derived in the native orientation first.
        let (width, height) = if self.request_mode_inner(id) == RequestMode::WidthForHeight {
            let height = self.preferred_size_inner(id, Orientation::Vertical, None);
            let width =
                self.preferred_size_inner(id, Orientation::Horizontal, Some(proposed.height));
            (width, height)
        } else {
            let width = self.preferred_size_inner(id, Orientation::Horizontal, None);
            let height =
                self.preferred_size_inner(id, Orientation::Vertical, Some(proposed.width));
            (width, height)
        };
        if width.minimum > proposed.width || height.minimum > proposed.height {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!(
                    "allocation {proposed:?} is smaller than the minimum size {}x{}",
                    width.minimum, height.minimum
                ),
            );
        }

        let ctx = self.adjust_ctx(id);
        let mut adjusted = proposed;
        if let Some(widget) = self.arena.widget(id) {
            for (orientation, mut request) in
                [(Orientation::Horizontal, width), (Orientation::Vertical, height)]
            {
                let (mut pos, mut size) = adjusted.span(orientation);
                widget.adjust_size_allocation(&ctx, orientation, &mut request, &mut pos, &mut size);
                adjusted.set_span(orientation, pos, size);
            }
        }
        let mut committed = if proposed.contains_rect(&adjusted) {
            adjusted
        } else {
            self.report(
                DiagnosticKind::InvariantViolation,
                Some(id),
                format!(
                    "adjust_size_allocation moved the allocation from {proposed:?} to {adjusted:?}, \
                     outside of the original bounds"
                ),
            );
            proposed
        };
        committed.width = committed.width.max(1);
        committed.height = committed.height.max(1);

        let size_changed = committed.size() != old_allocation.size();
        let position_changed =
            committed.x != old_allocation.x || committed.y != old_allocation.y;
        if !alloc_needed && !size_changed && !position_changed {
            trace!(widget = id.trace(), "allocation unchanged");
            return;
        }

        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state.allocation = committed;
        let own_surface = state.surface.filter(|_| state.has_own_surface && state.is_realized);
        if debug_geometry {
            debug!(
                widget = id.trace(),
                old = ?old_allocation,
                new = ?committed,
                "size_allocate"
            );
        }
        self.emit(id, Notification::SizeAllocate(committed));

        if let Some(surface) = own_surface {
            self.backend.move_resize(surface, committed);
        }
        self.with_widget(id, |widget, tree| {
            let mut ctx = AllocateCtx {
                tree,
                widget_id: id,
            };
            widget.size_allocate(&mut ctx, committed);
        });

        self.invalidate_after_allocate(id, old_allocation, size_changed, position_changed);
    }

    fn invalidate_after_allocate(
        &mut self,
        id: WidgetId,
        old_allocation: Allocation,
        size_changed: bool,
        position_changed: bool,
    ) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        let new_allocation = state.allocation;
        let mut invalidations = Vec::new();
        if state.is_mapped && state.redraw_on_allocate {
            if let Some(surface) = state.surface {
                if !state.has_own_surface && (position_changed || size_changed) {
                    invalidations.push((surface, new_allocation.union(&old_allocation)));
                } else if state.has_own_surface && size_changed {
                    let area = Rect::from_size(new_allocation.size())
                        .union(&Rect::from_size(old_allocation.size()));
                    invalidations.push((surface, area));
                }
            }
        }
        if (size_changed || position_changed)
            && let Some(parent) = state.parent.and_then(|p| self.arena.state(p))
            && parent.is_realized
            && parent.reallocate_redraws
            && let Some(surface) = parent.surface
        {
            let area = if parent.has_own_surface {
                Rect::from_size(parent.allocation.size())
            } else {
                parent.allocation
            };
            invalidations.push((surface, area));
        }
        for (surface, area) in invalidations {
            self.backend.invalidate(surface, area);
        }
    }

    /// See [`WidgetTree::queue_resize`].
    pub(crate) fn queue_resize_inner(&mut self, id: WidgetId, redraw: bool) {
        if redraw && self.is_realized(id) {
            self.queue_draw_inner(id);
        }
        self.mark_needs_resize(id);
    }

    /// Marks a widget, its visible ancestors and their size-group peers as dirty.
    ///
    /// The walk stops after the first hidden widget: hidden widgets request nothing,
    /// so their ancestors' requests don't depend on them.
    fn mark_needs_resize(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(widget) = current {
            let Some(state) = self.arena.state_mut(widget) else {
                return;
            };
            state.needs_resize = true;
            state.needs_allocate = true;
            state.size_cache.clear();
            let parent = state.parent;
            let is_visible = state.is_visible;
            let is_toplevel = state.is_toplevel;
            let groups = state.size_groups.to_vec();

            for group in groups {
                for member in self.size_group_members_with_effect(group) {
                    // Peers already dirty were or are being walked from.
                    if !self.needs_resize(member) {
                        self.mark_needs_resize(member);
                    }
                }
            }
            if !is_visible {
                return;
            }
            if is_toplevel && parent.is_none() && !self.resize_queue.contains(&widget) {
                if self.settings.debug().contains(DebugFlags::RESIZE) {
                    debug!(toplevel = widget.trace(), "queued for resize");
                }
                self.resize_queue.push(widget);
            }
            current = parent;
        }
    }

    fn size_group_members_with_effect(&self, group: SizeGroupId) -> Vec<WidgetId> {
        match self.size_groups.get(group) {
            Some(g) if g.mode != SizeGroupMode::None => g.members.clone(),
            _ => Vec::new(),
        }
    }

    /// See [`WidgetTree::queue_draw`].
    pub(crate) fn queue_draw_inner(&mut self, id: WidgetId) {
        let size = self.allocation(id).size();
        self.invalidate_widget_area(id, Rect::from_size(size));
    }

    /// See [`WidgetTree::queue_draw_area`].
    pub(crate) fn queue_draw_area_inner(&mut self, id: WidgetId, area: Rect) {
        if area.is_empty() {
            return;
        }
        self.invalidate_widget_area(id, area);
    }

    /// Invalidates `area`, relative to the origin of the widget's allocation.
    ///
    /// Nothing happens unless the widget is realized and it and all its ancestors are mapped.
    fn invalidate_widget_area(&mut self, id: WidgetId, area: Rect) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        let Some(surface) = state.surface.filter(|_| state.is_realized) else {
            return;
        };
        let area = if state.has_own_surface {
            area
        } else {
            area.translate(state.allocation.x, state.allocation.y)
        };
        let mut current = Some(id);
        while let Some(widget) = current {
            if !self.is_mapped(widget) {
                return;
            }
            current = self.parent(widget);
        }
        self.backend.invalidate(surface, area);
    }

    /// Allocates a toplevel its default size, or its natural size, but never less
    /// than its minimum size.
    ///
    /// For contextual request modes the native size is clamped first, and the other
    /// size is floored at the minimum for that native size.
    pub(crate) fn allocate_toplevel(&mut self, id: WidgetId) {
        let (minimum, natural) = self.preferred_size_pair_inner(id);
        let size = self.default_size(id).unwrap_or(natural);
        let (width, height) = match self.request_mode_inner(id) {
            RequestMode::HeightForWidth => {
                let width = size.width.max(minimum.width);
                let height_minimum = self
                    .preferred_size_inner(id, Orientation::Vertical, Some(width))
                    .minimum;
                (width, size.height.max(height_minimum))
            }
            RequestMode::WidthForHeight => {
                let height = size.height.max(minimum.height);
                let width_minimum = self
                    .preferred_size_inner(id, Orientation::Horizontal, Some(height))
                    .minimum;
                (size.width.max(width_minimum), height)
            }
            RequestMode::ConstantSize => {
                (size.width.max(minimum.width), size.height.max(minimum.height))
            }
        };
        self.size_allocate_inner(id, Rect::new(0, 0, width, height));
    }

    /// See [`WidgetTree::process_pending_resizes`].
    ///
    /// Toplevels queued while this runs are left for the next call.
    pub(crate) fn process_pending_resizes_inner(&mut self) {
        let queue = std::mem::take(&mut self.resize_queue);
        for toplevel in queue {
            if self.is_visible(toplevel) {
                if self.settings.debug().contains(DebugFlags::RESIZE) {
                    debug!(toplevel = toplevel.trace(), "processing resize");
                }
                self.allocate_toplevel(toplevel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use assert_matches::assert_matches;

    use crate::backend::BackendCall;
    use crate::core::{
        AdjustCtx, Align, DiagnosticKind, Edge, Handled, Notification, Orientation, Rect,
        Realizable, Resizable, Size, SizeRequest, Stateful, TextDirection, Widget, WidgetId,
    };
    use crate::app::WidgetTree;
    use crate::testing_widgets::{Leaf, Stack, Toplevel, test_tree, test_tree_with_backend};

    struct Expanding;

    impl Resizable for Expanding {
        fn adjust_size_allocation(
            &self,
            _ctx: &AdjustCtx,
            _orientation: Orientation,
            _request: &mut SizeRequest,
            pos: &mut i32,
            size: &mut i32,
        ) {
            *pos -= 5;
            *size += 10;
        }
    }
    impl Realizable for Expanding {}
    impl Stateful for Expanding {}
    impl Widget for Expanding {}

    fn record_allocations(tree: &mut WidgetTree) -> Rc<RefCell<Vec<(WidgetId, Rect)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        tree.subscribe(None, move |_, widget, notification| {
            if let Notification::SizeAllocate(rect) = notification {
                log_clone.borrow_mut().push((widget, *rect));
            }
            Handled::No
        });
        log
    }

    #[test]
    fn expanding_adjustments_are_vetoed() {
        let mut tree = test_tree();
        let widget = tree.insert(Expanding);
        tree.show(widget);
        let proposed = Rect::new(10, 10, 40, 20);
        tree.size_allocate(widget, proposed);
        assert_eq!(tree.allocation(widget), proposed);

        let diagnostics = tree.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::InvariantViolation);
    }

    #[test]
    fn identical_allocations_are_skipped() {
        let (mut tree, backend) = test_tree_with_backend();
        let window = tree.insert(Toplevel);
        let leaf = tree.insert(Leaf::fixed(10, 10));
        tree.set_parent(leaf, window);
        tree.show(leaf);
        tree.show(window);
        let log = record_allocations(&mut tree);
        backend.take_calls();

        let allocation = tree.allocation(leaf);
        tree.size_allocate(leaf, allocation);
        assert!(log.borrow().is_empty());
        assert!(backend.take_calls().is_empty());

        tree.size_allocate(leaf, allocation.translate(1, 0));
        assert_eq!(log.borrow().len(), 1);
        let calls = backend.take_calls();
        assert_matches!(calls.as_slice(), [BackendCall::Invalidate(_, area)] if area.width == 11);
    }

    #[test]
    fn negative_sizes_become_one_pixel() {
        let mut tree = test_tree();
        let leaf = tree.insert(Leaf::fixed(0, 0));
        tree.show(leaf);
        tree.size_allocate(leaf, Rect::new(0, 0, -4, 10));
        assert_eq!(tree.allocation(leaf), Rect::new(0, 0, 1, 1));
        assert_eq!(
            tree.take_diagnostics()[0].kind,
            DiagnosticKind::ContractViolation
        );
    }

    #[test]
    fn alignment_and_margins() {
        let mut tree = test_tree();
        let leaf = tree.insert(Leaf::fixed(20, 10));
        tree.show(leaf);
        tree.set_halign(leaf, Align::Center);
        tree.set_valign(leaf, Align::End);
        tree.set_margin(leaf, Edge::Top, 4);

        tree.size_allocate(leaf, Rect::new(0, 0, 100, 50));
        assert_eq!(tree.allocation(leaf), Rect::new(40, 40, 20, 10));

        tree.set_direction(leaf, TextDirection::Rtl);
        tree.set_halign(leaf, Align::Start);
        tree.size_allocate(leaf, Rect::new(0, 0, 100, 50));
        assert_eq!(tree.allocation(leaf), Rect::new(80, 40, 20, 10));
    }

    #[test]
    fn resizes_are_flushed_per_toplevel() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: false });
        let leaf = tree.insert(Leaf::fixed(30, 20));
        tree.set_parent(stack, window);
        tree.set_parent(leaf, stack);
        tree.show_all(window);
        assert_eq!(tree.allocation(window), Rect::new(0, 0, 30, 20));
        assert!(!tree.has_pending_resizes());

        tree.set_margin(leaf, Edge::Left, 10);
        assert!(tree.has_pending_resizes());
        // Nothing moves until the flush.
        assert_eq!(tree.allocation(leaf), Rect::new(0, 0, 30, 20));

        tree.process_pending_resizes();
        assert!(!tree.has_pending_resizes());
        assert_eq!(tree.allocation(window), Rect::new(0, 0, 40, 20));
        assert_eq!(tree.allocation(stack), Rect::new(0, 0, 40, 20));
        assert_eq!(tree.allocation(leaf), Rect::new(10, 0, 30, 20));
    }

    #[test]
    fn default_size_is_clamped_to_the_minimum() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let leaf = tree.insert(Leaf::fixed(30, 20));
        tree.set_parent(leaf, window);
        tree.show(leaf);
        tree.set_default_size(window, Some(Size::new(100, 5)));
        tree.show(window);
        assert_eq!(tree.allocation(window), Rect::new(0, 0, 100, 20));
        assert_eq!(tree.allocation(leaf), Rect::new(0, 0, 100, 20));
    }
}

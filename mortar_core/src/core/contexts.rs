// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The context types that are passed into various widget methods.

use crate::app::WidgetTree;
use crate::backend::SurfaceId;
use crate::core::{
    Align, Allocation, AuxInfo, ChildrenIds, DiagnosticKind, Orientation, Rect, RequestMode,
    SizeRequest, StateFlags, TextDirection, WidgetId,
};

/// A macro for implementing methods on multiple contexts.
///
/// There are a lot of methods defined on multiple contexts; this lets us only
/// have to write them out once.
macro_rules! impl_context_method {
    ($ty:ty,  { $($method:item)+ } ) => {
        impl $ty { $($method)+ }
    };
    ( $ty:ty, $($more:ty),+, { $($method:item)+ } ) => {
        impl_context_method!($ty, { $($method)+ });
        impl_context_method!($($more),+, { $($method)+ });
    };
}

/// A context passed to [`Resizable::measure`](crate::core::Resizable::measure)
/// and [`Resizable::request_mode`](crate::core::Resizable::request_mode).
pub struct MeasureCtx<'a> {
    pub(crate) tree: &'a mut WidgetTree,
    pub(crate) widget_id: WidgetId,
}

/// A context passed to [`Resizable::size_allocate`](crate::core::Resizable::size_allocate).
pub struct AllocateCtx<'a> {
    pub(crate) tree: &'a mut WidgetTree,
    pub(crate) widget_id: WidgetId,
}

/// A context passed to the [`Realizable`](crate::core::Realizable) hooks.
pub struct LifecycleCtx<'a> {
    pub(crate) tree: &'a mut WidgetTree,
    pub(crate) widget_id: WidgetId,
}

/// A context passed to the [`Stateful`](crate::core::Stateful) hooks.
pub struct StateCtx<'a> {
    pub(crate) tree: &'a mut WidgetTree,
    pub(crate) widget_id: WidgetId,
}

// --- MARK: GETTERS
impl_context_method!(MeasureCtx<'_>, AllocateCtx<'_>, LifecycleCtx<'_>, StateCtx<'_>, {
    /// The `WidgetId` of the current widget.
    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    /// The children of the current widget, in order, including internal children.
    pub fn children(&self) -> ChildrenIds {
        self.tree
            .arena
            .state(self.widget_id)
            .map(|s| s.child_ids().collect())
            .unwrap_or_default()
    }

    /// The children of the current widget which aren't internal.
    pub fn children_non_internal(&self) -> ChildrenIds {
        self.tree
            .arena
            .state(self.widget_id)
            .map(|s| s.non_internal_child_ids().collect())
            .unwrap_or_default()
    }

    /// Whether `widget` is visible.
    pub fn is_visible(&self, widget: WidgetId) -> bool {
        self.tree.arena.state(widget).is_some_and(|s| s.is_visible)
    }

    /// The allocation of the current widget, in the coordinates of its parent's surface.
    pub fn allocation(&self) -> Allocation {
        self.tree
            .arena
            .state(self.widget_id)
            .map_or(Rect::DEGENERATE, |s| s.allocation)
    }

    /// The direction the current widget lays out its content in, never [`TextDirection::None`].
    pub fn direction(&self) -> TextDirection {
        self.tree.effective_direction(self.widget_id)
    }

    /// The state flags of the current widget.
    pub fn state_flags(&self) -> StateFlags {
        self.tree.state_flags(self.widget_id)
    }

    /// The surface the current widget draws into, if it is realized.
    pub fn surface(&self) -> Option<SurfaceId> {
        self.tree.arena.state(self.widget_id).and_then(|s| s.surface)
    }
});

// --- MARK: CHILD SIZES
impl_context_method!(MeasureCtx<'_>, AllocateCtx<'_>, {
    /// Returns the request of `child` along `orientation`, with margins, alignment
    /// and size groups applied.
    ///
    /// `for_size` is the size the child will get in the other orientation, if known.
    /// Calling this for the current widget itself is a contract violation,
    /// which is reported and answered with a zero request.
    pub fn child_preferred_size(
        &mut self,
        child: WidgetId,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        if child == self.widget_id {
            self.tree.report(
                DiagnosticKind::ContractViolation,
                Some(child),
                "a widget queried its own adjusted size while measuring itself",
            );
            return SizeRequest::ZERO;
        }
        self.tree.preferred_size_inner(child, orientation, for_size)
    }

    /// The request mode of `child`.
    pub fn child_request_mode(&mut self, child: WidgetId) -> RequestMode {
        self.tree.request_mode_inner(child)
    }
});

impl AllocateCtx<'_> {
    /// The area children are allocated in by default.
    ///
    /// This is the widget's allocation, moved to the origin if the widget has its
    /// own surface (children then draw in that surface's coordinates).
    pub fn content_area(&self) -> Rect {
        match self.tree.arena.state(self.widget_id) {
            Some(state) if state.has_own_surface => Rect::from_size(state.allocation.size()),
            Some(state) => state.allocation,
            None => Rect::DEGENERATE,
        }
    }

    /// Assigns `allocation` to `child`.
    ///
    /// The child applies its margins and alignment, then allocates its own children.
    pub fn allocate_child(&mut self, child: WidgetId, allocation: Allocation) {
        self.tree.size_allocate_inner(child, allocation);
    }
}

impl LifecycleCtx<'_> {
    /// Whether the current widget is mapped.
    pub fn is_mapped(&self) -> bool {
        self.tree.arena.state(self.widget_id).is_some_and(|s| s.is_mapped)
    }

    /// Whether the current widget is realized.
    pub fn is_realized(&self) -> bool {
        self.tree.arena.state(self.widget_id).is_some_and(|s| s.is_realized)
    }
}

impl StateCtx<'_> {
    /// Whether the current widget is effectively sensitive.
    pub fn is_sensitive(&self) -> bool {
        self.tree.is_sensitive(self.widget_id)
    }

    /// Whether the current widget is reachable from a toplevel.
    pub fn is_anchored(&self) -> bool {
        self.tree.arena.state(self.widget_id).is_some_and(|s| s.is_anchored)
    }

    /// Marks the widget's size as outdated.
    pub fn queue_resize(&mut self) {
        self.tree.queue_resize_inner(self.widget_id, true);
    }

    /// Schedules a redraw of the widget's area.
    pub fn queue_draw(&mut self) {
        self.tree.queue_draw_inner(self.widget_id);
    }
}

// --- MARK: ADJUST

/// The read-only context passed to the `adjust_*` hooks of [`Resizable`](crate::core::Resizable).
#[derive(Clone, Copy, Debug)]
pub struct AdjustCtx {
    pub(crate) widget_id: WidgetId,
    pub(crate) aux: AuxInfo,
    pub(crate) direction: TextDirection,
}

impl AdjustCtx {
    /// The `WidgetId` of the current widget.
    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    /// The size request, alignment and margins of the current widget.
    pub fn aux_info(&self) -> &AuxInfo {
        &self.aux
    }

    /// The direction the current widget lays out its content in, never [`TextDirection::None`].
    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    /// The default request adjustment.
    ///
    /// An explicit size request raises the minimum, the natural size is floored at
    /// the minimum, and margins are added to both.
    pub fn default_adjust_size_request(&self, orientation: Orientation, request: &mut SizeRequest) {
        if let Some(explicit) = self.aux.size_request(orientation)
            && explicit > 0
        {
            request.minimum = request.minimum.max(explicit);
        }
        // An explicit request may have pushed the minimum above the natural size.
        if request.natural < request.minimum {
            request.natural = request.minimum;
        }
        let margin = self.aux.margin.total(orientation);
        request.minimum = request.minimum.saturating_add(margin);
        request.natural = request.natural.saturating_add(margin);
    }

    /// The default allocation adjustment.
    ///
    /// Margins are removed from the request and the proposed area, then the
    /// alignment places the natural size inside what's left:
    /// `Fill` keeps the area, `Start` clips it, `End` clips it against the trailing
    /// edge, `Center` clips it around the middle, rounding towards the start.
    pub fn default_adjust_size_allocation(
        &self,
        orientation: Orientation,
        request: &mut SizeRequest,
        pos: &mut i32,
        size: &mut i32,
    ) {
        let (start, end) = self.aux.margin.along(orientation);
        request.minimum = request.minimum.saturating_sub(start + end);
        request.natural = request.natural.saturating_sub(start + end);
        *pos = pos.saturating_add(start);
        *size = size.saturating_sub(start + end);

        let natural = request.natural;
        match self.aux.align(orientation).effective(orientation, self.direction) {
            Align::Fill => {}
            Align::Start => *size = (*size).min(natural),
            Align::End => {
                if *size > natural {
                    *pos += *size - natural;
                    *size = natural;
                }
            }
            Align::Center => {
                if *size > natural {
                    *pos += (*size - natural) / 2;
                    *size = natural;
                }
            }
        }
    }
}

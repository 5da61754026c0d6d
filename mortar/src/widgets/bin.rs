// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use tracing::{Span, trace_span};

use super::{bordered_allocate, bordered_measure, bordered_request_mode};
use crate::app::WidgetTree;
use crate::core::{
    AllocateCtx, Allocation, MeasureCtx, Orientation, Realizable, RequestMode, Resizable,
    SizeRequest, Stateful, Widget, WidgetId,
};

/// A container with a single child, which fills it minus an optional border.
///
/// The tree owns the child link; [`Bin::set_child`] replaces the child of a bin in place.
/// If a bin ends up with several children anyway, only the first visible one is laid out.
///
/// A bin resolves its size in the same order as its child, so a height-for-width child
/// makes the bin height-for-width.
pub struct Bin {
    border_width: i32,
}

// --- MARK: BUILDERS
impl Bin {
    /// Creates a bin without a border.
    pub fn new() -> Self {
        Self { border_width: 0 }
    }

    /// Builder-style method to set the border around the child.
    ///
    /// Negative widths are treated as zero.
    pub fn with_border(mut self, border_width: i32) -> Self {
        self.border_width = border_width.clamp(0, i16::MAX.into());
        self
    }
}

impl Default for Bin {
    fn default() -> Self {
        Self::new()
    }
}

// --- MARK: METHODS
impl Bin {
    /// The border around the child.
    pub fn border_width(&self) -> i32 {
        self.border_width
    }

    /// The child of `bin`, if it has one.
    pub fn child(tree: &WidgetTree, bin: WidgetId) -> Option<WidgetId> {
        tree.children_non_internal(bin).first().copied()
    }

    /// Makes `child` the only non-internal child of `bin`.
    ///
    /// The previous child is unparented, not destroyed.
    pub fn set_child(tree: &mut WidgetTree, bin: WidgetId, child: WidgetId) {
        if Self::child(tree, bin) == Some(child) {
            return;
        }
        for previous in tree.children_non_internal(bin) {
            tree.unparent(previous);
        }
        match tree.parent(child) {
            Some(_) => tree.reparent(child, bin),
            None => tree.set_parent(child, bin),
        }
    }

    /// Changes the border of `bin` and queues a resize.
    pub fn set_border_width(tree: &mut WidgetTree, bin: WidgetId, border_width: i32) {
        let Some(widget) = tree.widget_mut::<Self>(bin) else {
            return;
        };
        let border_width = border_width.clamp(0, i16::MAX.into());
        if widget.border_width == border_width {
            return;
        }
        widget.border_width = border_width;
        tree.queue_resize(bin);
    }
}

// --- MARK: IMPL WIDGET
impl Resizable for Bin {
    fn request_mode(&mut self, ctx: &mut MeasureCtx<'_>) -> RequestMode {
        bordered_request_mode(ctx)
    }

    fn measure(
        &mut self,
        ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        bordered_measure(ctx, self.border_width, orientation, for_size)
    }

    fn size_allocate(&mut self, ctx: &mut AllocateCtx<'_>, _allocation: Allocation) {
        bordered_allocate(ctx, self.border_width);
    }
}

impl Realizable for Bin {}

impl Stateful for Bin {}

impl Widget for Bin {
    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("Bin", id = id.trace())
    }
}

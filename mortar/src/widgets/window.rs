// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use tracing::{Span, trace_span};

use super::{bordered_allocate, bordered_measure, bordered_request_mode};
use crate::app::WidgetTree;
use crate::core::{
    AllocateCtx, Allocation, MeasureCtx, Orientation, Realizable, RequestMode, Resizable,
    SizeRequest, Stateful, Widget, WidgetId,
};

/// A toplevel window, backed by its own native surface.
///
/// A window is the root of a widget tree: it can't have a parent, and showing it
/// realizes, allocates and maps everything visible below it. Like [`Bin`](super::Bin),
/// it lays out a single child inside an optional border.
///
/// The window is sized to its natural size, or to its
/// [default size](WidgetTree::set_default_size) if one is set, and never below its
/// minimum size. Resizes queued below a shown window are applied by
/// [`WidgetTree::process_pending_resizes`].
pub struct Window {
    title: String,
    border_width: i32,
}

// --- MARK: BUILDERS
impl Window {
    /// Creates a window with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            border_width: 0,
        }
    }

    /// Builder-style method to set the border around the child.
    pub fn with_border(mut self, border_width: i32) -> Self {
        self.border_width = border_width.clamp(0, i16::MAX.into());
        self
    }
}

// --- MARK: METHODS
impl Window {
    /// The title of the window.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Changes the title of `window`.
    pub fn set_title(tree: &mut WidgetTree, window: WidgetId, title: impl Into<String>) {
        if let Some(widget) = tree.widget_mut::<Self>(window) {
            widget.title = title.into();
        }
    }
}

// --- MARK: IMPL WIDGET
impl Resizable for Window {
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

impl Realizable for Window {}

impl Stateful for Window {}

impl Widget for Window {
    fn is_toplevel(&self) -> bool {
        true
    }

    fn has_own_surface(&self) -> bool {
        true
    }

    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("Window", id = id.trace())
    }

    fn get_debug_text(&self) -> Option<String> {
        Some(self.title.clone())
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rect, Size};
    use crate::testing::TestHarness;
    use crate::widgets::Filler;

    #[test]
    fn window_owns_a_surface_at_the_origin() {
        let mut harness = TestHarness::create();
        let window = harness.insert(Window::new("main").with_border(5));
        let filler = harness.insert(Filler::new(20, 10));
        harness.set_parent(filler, window);
        harness.show_all(window);

        assert_eq!(harness.allocation(window), Rect::new(0, 0, 30, 20));
        // Children of a window are placed in the window's own surface.
        assert_eq!(harness.allocation(filler), Rect::new(5, 5, 20, 10));
        let surface = harness.surface(window).unwrap();
        assert_eq!(harness.surface(filler), Some(surface));
        assert_eq!(harness.surface_owner(surface), Some(window));
        assert!(harness.backend().surface(surface).unwrap().visible);
        harness.assert_no_diagnostics();
    }

    #[test]
    fn default_size_is_used_above_the_minimum() {
        let mut harness = TestHarness::create();
        let window = harness.insert(Window::new("sized"));
        let filler = harness.insert(Filler::new(20, 10));
        harness.set_parent(filler, window);
        harness.set_default_size(window, Some(Size::new(100, 5)));
        harness.show_all(window);

        assert_eq!(harness.allocation(window).size(), Size::new(100, 10));
    }

    #[test]
    fn title() {
        let mut harness = TestHarness::create();
        let window = harness.insert(Window::new("before"));
        Window::set_title(&mut harness, window, "after");
        assert_eq!(harness.widget::<Window>(window).map(Window::title), Some("after"));
    }
}

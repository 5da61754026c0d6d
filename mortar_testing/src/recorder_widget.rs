// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Helper widgets for writing tests.
//!
//! Note: Some of these types are undocumented. They're meant to help maintainers of
//! Mortar, not to be user-facing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::Span;

use mortar_core::core::{
    AdjustCtx, AllocateCtx, Allocation, LifecycleCtx, MeasureCtx, Orientation, Realizable,
    RequestMode, Resizable, SizeRequest, StateCtx, StateFlags, Stateful, TextDirection, Widget,
    WidgetId,
};

/// A wrapper widget that records each time the engine calls one of its hooks.
///
/// Notifications tell listeners what happened to a widget; a recording tells what
/// the widget itself was asked to do, and in which order. Measure results are
/// recorded, so tests can see which requests were served from the cache.
///
/// ```
/// use mortar_testing::{ModularWidget, Record, Recording, TestHarness, TestWidgetExt};
///
/// let recording = Recording::default();
/// let mut harness = TestHarness::create();
/// let window = harness.insert(ModularWidget::new(()).toplevel(true).record(&recording));
/// harness.show(window);
///
/// assert!(recording.drain().contains(&Record::Map));
/// ```
pub struct Recorder<W> {
    recording: Recording,
    child: W,
}

/// A recording of widget method calls.
///
/// Internally stores a queue of [`Records`](Record).
#[derive(Debug, Clone, Default)]
pub struct Recording(Rc<RefCell<VecDeque<Record>>>);

/// A recording of a method call on a widget.
///
/// Each member of the enum corresponds to one of the hooks of the widget traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Request mode. Records the returned mode.
    RequestMode(RequestMode),
    /// Measure. Records the orientation, the contextual size and the returned request.
    Measure(Orientation, Option<i32>, SizeRequest),
    /// Size allocation of the children.
    SizeAllocate(Allocation),
    /// Realize.
    Realize,
    /// Unrealize.
    Unrealize,
    /// Map.
    Map,
    /// Unmap.
    Unmap,
    /// State flags change. Records the previous flags.
    StateFlagsChanged(StateFlags),
    /// Direction change. Records the previous direction.
    DirectionChanged(TextDirection),
    /// Style update.
    StyleUpdated,
    /// Hierarchy change. Records the previous toplevel.
    HierarchyChanged(Option<WidgetId>),
}

impl Recording {
    /// True if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// The number of events in the recording.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Clear recorded events.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Returns the next event in the recording, if one exists.
    ///
    /// This consumes the event.
    pub fn next(&self) -> Option<Record> {
        self.0.borrow_mut().pop_front()
    }

    /// Returns a vec of events drained from the recording.
    pub fn drain(&self) -> Vec<Record> {
        self.0.borrow_mut().drain(..).collect::<Vec<_>>()
    }

    /// How many measure calls were recorded, without consuming them.
    pub fn measure_count(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|r| matches!(r, Record::Measure(..)))
            .count()
    }

    fn push(&self, event: Record) {
        self.0.borrow_mut().push_back(event);
    }
}

impl<W: Widget> Recorder<W> {
    /// Wrap child widget in a Recorder that records all method calls.
    pub fn new(child: W, recording: &Recording) -> Self {
        Self {
            child,
            recording: recording.clone(),
        }
    }
}

impl<W: Widget> Resizable for Recorder<W> {
    fn request_mode(&mut self, ctx: &mut MeasureCtx<'_>) -> RequestMode {
        let mode = self.child.request_mode(ctx);
        self.recording.push(Record::RequestMode(mode));
        mode
    }

    fn measure(
        &mut self,
        ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        let request = self.child.measure(ctx, orientation, for_size);
        self.recording
            .push(Record::Measure(orientation, for_size, request));
        request
    }

    fn adjust_size_request(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
    ) {
        self.child.adjust_size_request(ctx, orientation, request);
    }

    fn adjust_size_allocation(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
        pos: &mut i32,
        size: &mut i32,
    ) {
        self.child
            .adjust_size_allocation(ctx, orientation, request, pos, size);
    }

    fn size_allocate(&mut self, ctx: &mut AllocateCtx<'_>, allocation: Allocation) {
        self.recording.push(Record::SizeAllocate(allocation));
        self.child.size_allocate(ctx, allocation);
    }
}

impl<W: Widget> Realizable for Recorder<W> {
    fn realize(&mut self, ctx: &mut LifecycleCtx<'_>) {
        self.recording.push(Record::Realize);
        self.child.realize(ctx);
    }

    fn unrealize(&mut self, ctx: &mut LifecycleCtx<'_>) {
        self.recording.push(Record::Unrealize);
        self.child.unrealize(ctx);
    }

    fn map(&mut self, ctx: &mut LifecycleCtx<'_>) {
        self.recording.push(Record::Map);
        self.child.map(ctx);
    }

    fn unmap(&mut self, ctx: &mut LifecycleCtx<'_>) {
        self.recording.push(Record::Unmap);
        self.child.unmap(ctx);
    }
}

impl<W: Widget> Stateful for Recorder<W> {
    fn state_flags_changed(&mut self, ctx: &mut StateCtx<'_>, previous: StateFlags) {
        self.recording.push(Record::StateFlagsChanged(previous));
        self.child.state_flags_changed(ctx, previous);
    }

    fn direction_changed(&mut self, ctx: &mut StateCtx<'_>, previous: TextDirection) {
        self.recording.push(Record::DirectionChanged(previous));
        self.child.direction_changed(ctx, previous);
    }

    fn style_updated(&mut self, ctx: &mut StateCtx<'_>) {
        self.recording.push(Record::StyleUpdated);
        self.child.style_updated(ctx);
    }

    fn hierarchy_changed(&mut self, ctx: &mut StateCtx<'_>, previous_toplevel: Option<WidgetId>) {
        self.recording.push(Record::HierarchyChanged(previous_toplevel));
        self.child.hierarchy_changed(ctx, previous_toplevel);
    }
}

#[warn(clippy::missing_trait_methods)]
impl<W: Widget> Widget for Recorder<W> {
    fn is_toplevel(&self) -> bool {
        self.child.is_toplevel()
    }

    fn has_own_surface(&self) -> bool {
        self.child.has_own_surface()
    }

    fn accepts_focus(&self) -> bool {
        self.child.accepts_focus()
    }

    fn make_trace_span(&self, id: WidgetId) -> Span {
        self.child.make_trace_span(id)
    }

    fn get_debug_text(&self) -> Option<String> {
        self.child.get_debug_text()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn short_type_name(&self) -> &'static str {
        "Recorder"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mortar_core::core::{Orientation, StateFlags};

    use super::*;
    use crate::{ModularWidget, TestHarness, TestWidgetExt};

    #[test]
    fn cached_requests_skip_measure() {
        let recording = Recording::default();
        let mut harness = TestHarness::create();
        let leaf = harness.insert(ModularWidget::leaf(10, 20).record(&recording));
        harness.show(leaf);

        harness.preferred_width(leaf);
        harness.preferred_width(leaf);
        assert_eq!(recording.measure_count(), 1);
        assert_matches!(
            recording.drain().as_slice(),
            [
                Record::RequestMode(RequestMode::ConstantSize),
                Record::Measure(Orientation::Horizontal, None, _)
            ]
        );

        harness.queue_resize(leaf);
        harness.preferred_width(leaf);
        assert_eq!(recording.measure_count(), 1);
    }

    #[test]
    fn state_hooks_get_the_previous_flags() {
        let recording = Recording::default();
        let mut harness = TestHarness::create();
        let leaf = harness.insert(ModularWidget::leaf(1, 1).record(&recording));
        harness.set_state_flags(leaf, StateFlags::PRELIGHT, false);
        harness.unset_state_flags(leaf, StateFlags::PRELIGHT);
        assert_eq!(
            recording.drain(),
            [
                Record::StateFlagsChanged(StateFlags::empty()),
                Record::StateFlagsChanged(StateFlags::PRELIGHT),
            ]
        );
    }
}

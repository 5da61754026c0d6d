// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use mortar_core::core::{
    AdjustCtx, AllocateCtx, Allocation, LifecycleCtx, MeasureCtx, Orientation, Realizable,
    RequestMode, Resizable, SizeRequest, StateCtx, StateFlags, Stateful, TextDirection, Widget,
    WidgetId,
};
use tracing::{Span, trace_span};

pub(crate) type RequestModeFn<S> = dyn FnMut(&mut S, &mut MeasureCtx<'_>) -> RequestMode;
pub(crate) type MeasureFn<S> =
    dyn FnMut(&mut S, &mut MeasureCtx<'_>, Orientation, Option<i32>) -> SizeRequest;
pub(crate) type AdjustRequestFn<S> = dyn Fn(&S, &AdjustCtx, Orientation, &mut SizeRequest);
pub(crate) type AdjustAllocationFn<S> =
    dyn Fn(&S, &AdjustCtx, Orientation, &mut SizeRequest, &mut i32, &mut i32);
pub(crate) type SizeAllocateFn<S> = dyn FnMut(&mut S, &mut AllocateCtx<'_>, Allocation);
pub(crate) type LifecycleFn<S> = dyn FnMut(&mut S, &mut LifecycleCtx<'_>);
pub(crate) type StateFlagsFn<S> = dyn FnMut(&mut S, &mut StateCtx<'_>, StateFlags);
pub(crate) type DirectionFn<S> = dyn FnMut(&mut S, &mut StateCtx<'_>, TextDirection);
pub(crate) type StyleFn<S> = dyn FnMut(&mut S, &mut StateCtx<'_>);
pub(crate) type HierarchyFn<S> = dyn FnMut(&mut S, &mut StateCtx<'_>, Option<WidgetId>);

/// A widget that can be constructed from individual functions, builder-style.
///
/// This widget is generic over its state, which is passed in at construction time.
/// Methods without a callback behave like the default methods of the widget traits:
/// the widget stacks its visible children and gives each of them its whole area.
pub struct ModularWidget<S> {
    /// The state passed to all the callbacks of this widget
    pub state: S,
    toplevel: bool,
    own_surface: bool,
    accepts_focus: bool,
    request_mode: Option<Box<RequestModeFn<S>>>,
    measure: Option<Box<MeasureFn<S>>>,
    adjust_request: Option<Box<AdjustRequestFn<S>>>,
    adjust_allocation: Option<Box<AdjustAllocationFn<S>>>,
    size_allocate: Option<Box<SizeAllocateFn<S>>>,
    realize: Option<Box<LifecycleFn<S>>>,
    unrealize: Option<Box<LifecycleFn<S>>>,
    map: Option<Box<LifecycleFn<S>>>,
    unmap: Option<Box<LifecycleFn<S>>>,
    state_flags_changed: Option<Box<StateFlagsFn<S>>>,
    direction_changed: Option<Box<DirectionFn<S>>>,
    style_updated: Option<Box<StyleFn<S>>>,
    hierarchy_changed: Option<Box<HierarchyFn<S>>>,
}

impl<S> ModularWidget<S> {
    /// Creates a new `ModularWidget`.
    pub fn new(state: S) -> Self {
        Self {
            state,
            toplevel: false,
            own_surface: false,
            accepts_focus: false,
            request_mode: None,
            measure: None,
            adjust_request: None,
            adjust_allocation: None,
            size_allocate: None,
            realize: None,
            unrealize: None,
            map: None,
            unmap: None,
            state_flags_changed: None,
            direction_changed: None,
            style_updated: None,
            hierarchy_changed: None,
        }
    }
}

impl ModularWidget<()> {
    /// Creates a leaf whose content is `width` by `height` in both its minimum and
    /// natural size.
    pub fn leaf(width: i32, height: i32) -> Self {
        Self::new(()).fixed_size(width, height)
    }

    /// Creates a leaf which lays out `area` pixels of content in rows, like wrapping text.
    ///
    /// Its minimum width is the square root of the area, its natural width the whole area
    /// on one line, and its height is the area divided by the width it gets.
    pub fn wrapping(area: i32) -> Self {
        let min_width = area.max(0).isqrt().max(1);
        Self::new(())
            .request_mode_fn(|_, _| RequestMode::HeightForWidth)
            .measure_fn(move |_, _, orientation, for_size| match orientation {
                Orientation::Horizontal => SizeRequest::new(min_width, area),
                Orientation::Vertical => {
                    let width = for_size.unwrap_or(area).max(1);
                    SizeRequest::fixed((area + width - 1) / width)
                }
            })
    }
}

/// Builder methods.
///
/// Each method takes a flag which is then returned by the matching [`Widget`] method.
impl<S> ModularWidget<S> {
    /// See [`Widget::is_toplevel`]
    pub fn toplevel(mut self, flag: bool) -> Self {
        self.toplevel = flag;
        self
    }

    /// See [`Widget::has_own_surface`]
    pub fn own_surface(mut self, flag: bool) -> Self {
        self.own_surface = flag;
        self
    }

    /// See [`Widget::accepts_focus`]
    pub fn accepts_focus(mut self, flag: bool) -> Self {
        self.accepts_focus = flag;
        self
    }
}

/// Builder methods.
///
/// Each method takes a callback that matches the behavior of the matching trait method.
impl<S> ModularWidget<S> {
    /// Sets a measure callback returning a fixed content size.
    pub fn fixed_size(self, width: i32, height: i32) -> Self {
        self.measure_fn(move |_, _, orientation, _| match orientation {
            Orientation::Horizontal => SizeRequest::fixed(width),
            Orientation::Vertical => SizeRequest::fixed(height),
        })
    }

    /// See [`Resizable::request_mode`]
    pub fn request_mode_fn(
        mut self,
        f: impl FnMut(&mut S, &mut MeasureCtx<'_>) -> RequestMode + 'static,
    ) -> Self {
        self.request_mode = Some(Box::new(f));
        self
    }

    /// See [`Resizable::measure`]
    pub fn measure_fn(
        mut self,
        f: impl FnMut(&mut S, &mut MeasureCtx<'_>, Orientation, Option<i32>) -> SizeRequest + 'static,
    ) -> Self {
        self.measure = Some(Box::new(f));
        self
    }

    /// See [`Resizable::adjust_size_request`]
    pub fn adjust_request_fn(
        mut self,
        f: impl Fn(&S, &AdjustCtx, Orientation, &mut SizeRequest) + 'static,
    ) -> Self {
        self.adjust_request = Some(Box::new(f));
        self
    }

    /// See [`Resizable::adjust_size_allocation`]
    pub fn adjust_allocation_fn(
        mut self,
        f: impl Fn(&S, &AdjustCtx, Orientation, &mut SizeRequest, &mut i32, &mut i32) + 'static,
    ) -> Self {
        self.adjust_allocation = Some(Box::new(f));
        self
    }

    /// See [`Resizable::size_allocate`]
    pub fn size_allocate_fn(
        mut self,
        f: impl FnMut(&mut S, &mut AllocateCtx<'_>, Allocation) + 'static,
    ) -> Self {
        self.size_allocate = Some(Box::new(f));
        self
    }

    /// See [`Realizable::realize`]
    pub fn realize_fn(mut self, f: impl FnMut(&mut S, &mut LifecycleCtx<'_>) + 'static) -> Self {
        self.realize = Some(Box::new(f));
        self
    }

    /// See [`Realizable::unrealize`]
    pub fn unrealize_fn(mut self, f: impl FnMut(&mut S, &mut LifecycleCtx<'_>) + 'static) -> Self {
        self.unrealize = Some(Box::new(f));
        self
    }

    /// See [`Realizable::map`]
    pub fn map_fn(mut self, f: impl FnMut(&mut S, &mut LifecycleCtx<'_>) + 'static) -> Self {
        self.map = Some(Box::new(f));
        self
    }

    /// See [`Realizable::unmap`]
    pub fn unmap_fn(mut self, f: impl FnMut(&mut S, &mut LifecycleCtx<'_>) + 'static) -> Self {
        self.unmap = Some(Box::new(f));
        self
    }

    /// See [`Stateful::state_flags_changed`]
    pub fn state_flags_changed_fn(
        mut self,
        f: impl FnMut(&mut S, &mut StateCtx<'_>, StateFlags) + 'static,
    ) -> Self {
        self.state_flags_changed = Some(Box::new(f));
        self
    }

    /// See [`Stateful::direction_changed`]
    pub fn direction_changed_fn(
        mut self,
        f: impl FnMut(&mut S, &mut StateCtx<'_>, TextDirection) + 'static,
    ) -> Self {
        self.direction_changed = Some(Box::new(f));
        self
    }

    /// See [`Stateful::style_updated`]
    pub fn style_updated_fn(mut self, f: impl FnMut(&mut S, &mut StateCtx<'_>) + 'static) -> Self {
        self.style_updated = Some(Box::new(f));
        self
    }

    /// See [`Stateful::hierarchy_changed`]
    pub fn hierarchy_changed_fn(
        mut self,
        f: impl FnMut(&mut S, &mut StateCtx<'_>, Option<WidgetId>) + 'static,
    ) -> Self {
        self.hierarchy_changed = Some(Box::new(f));
        self
    }
}

// --- MARK: IMPL WIDGET
impl<S> Resizable for ModularWidget<S> {
    fn request_mode(&mut self, ctx: &mut MeasureCtx<'_>) -> RequestMode {
        match self.request_mode.as_mut() {
            Some(f) => f(&mut self.state, ctx),
            None => RequestMode::ConstantSize,
        }
    }

    fn measure(
        &mut self,
        ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        if let Some(f) = self.measure.as_mut() {
            return f(&mut self.state, ctx, orientation, for_size);
        }
        let mut request = SizeRequest::ZERO;
        for child in ctx.children() {
            if ctx.is_visible(child) {
                request = request.max(ctx.child_preferred_size(child, orientation, for_size));
            }
        }
        request
    }

    fn adjust_size_request(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
    ) {
        match self.adjust_request.as_ref() {
            Some(f) => f(&self.state, ctx, orientation, request),
            None => ctx.default_adjust_size_request(orientation, request),
        }
    }

    fn adjust_size_allocation(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
        pos: &mut i32,
        size: &mut i32,
    ) {
        match self.adjust_allocation.as_ref() {
            Some(f) => f(&self.state, ctx, orientation, request, pos, size),
            None => ctx.default_adjust_size_allocation(orientation, request, pos, size),
        }
    }

    fn size_allocate(&mut self, ctx: &mut AllocateCtx<'_>, allocation: Allocation) {
        if let Some(f) = self.size_allocate.as_mut() {
            f(&mut self.state, ctx, allocation);
            return;
        }
        let area = ctx.content_area();
        for child in ctx.children() {
            if ctx.is_visible(child) {
                ctx.allocate_child(child, area);
            }
        }
    }
}

impl<S> Realizable for ModularWidget<S> {
    fn realize(&mut self, ctx: &mut LifecycleCtx<'_>) {
        if let Some(f) = self.realize.as_mut() {
            f(&mut self.state, ctx);
        }
    }

    fn unrealize(&mut self, ctx: &mut LifecycleCtx<'_>) {
        if let Some(f) = self.unrealize.as_mut() {
            f(&mut self.state, ctx);
        }
    }

    fn map(&mut self, ctx: &mut LifecycleCtx<'_>) {
        if let Some(f) = self.map.as_mut() {
            f(&mut self.state, ctx);
        }
    }

    fn unmap(&mut self, ctx: &mut LifecycleCtx<'_>) {
        if let Some(f) = self.unmap.as_mut() {
            f(&mut self.state, ctx);
        }
    }
}

impl<S> Stateful for ModularWidget<S> {
    fn state_flags_changed(&mut self, ctx: &mut StateCtx<'_>, previous: StateFlags) {
        if let Some(f) = self.state_flags_changed.as_mut() {
            f(&mut self.state, ctx, previous);
        }
    }

    fn direction_changed(&mut self, ctx: &mut StateCtx<'_>, previous: TextDirection) {
        if let Some(f) = self.direction_changed.as_mut() {
            f(&mut self.state, ctx, previous);
        }
    }

    fn style_updated(&mut self, ctx: &mut StateCtx<'_>) {
        if let Some(f) = self.style_updated.as_mut() {
            f(&mut self.state, ctx);
        }
    }

    fn hierarchy_changed(&mut self, ctx: &mut StateCtx<'_>, previous_toplevel: Option<WidgetId>) {
        if let Some(f) = self.hierarchy_changed.as_mut() {
            f(&mut self.state, ctx, previous_toplevel);
        }
    }
}

impl<S: 'static> Widget for ModularWidget<S> {
    fn is_toplevel(&self) -> bool {
        self.toplevel
    }

    fn has_own_surface(&self) -> bool {
        self.own_surface
    }

    fn accepts_focus(&self) -> bool {
        self.accepts_focus
    }

    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("ModularWidget", id = id.trace())
    }
}

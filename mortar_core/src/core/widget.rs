// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::field::DisplayValue;
use tracing::{Span, trace_span};

use crate::core::{
    AdjustCtx, AllocateCtx, Allocation, LifecycleCtx, MeasureCtx, Orientation, RequestMode,
    SizeRequest, StateCtx, StateFlags, TextDirection,
};

/// A unique identifier for a single [`Widget`].
///
/// `WidgetId`s are generated automatically when a widget is inserted into a
/// [`WidgetTree`](crate::app::WidgetTree), and are never reused within a process.
/// Every operation on the tree takes the id of the widget it applies to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) NonZeroU64);

impl WidgetId {
    /// Allocates a new, unique `WidgetId`.
    pub(crate) fn next() -> Self {
        static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = WIDGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(id) {
            Some(id) => Self(id),
            None => unreachable!("the widget id counter starts at 1 and never wraps"),
        }
    }

    /// Returns the integer value of the `WidgetId`.
    pub fn to_raw(self) -> u64 {
        self.0.into()
    }

    /// A serialized representation of the `WidgetId` for debugging purposes.
    pub fn trace(self) -> DisplayValue<Self> {
        tracing::field::display(self)
    }
}

impl From<WidgetId> for u64 {
    fn from(id: WidgetId) -> Self {
        id.0.into()
    }
}

impl Display for WidgetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A list of child ids, as returned by the traversal methods of the contexts.
///
/// Internally, this uses a small vector optimisation, but you should treat it as a `Vec<WidgetId>`.
pub type ChildrenIds = SmallVec<[WidgetId; 16]>;

#[doc(hidden)]
/// A trait to access a [`Widget`] value as a trait object. It is implemented for all types that implement `Widget`.
pub trait AsDynWidget {
    fn as_box_dyn(self: Box<Self>) -> Box<dyn Widget>;
    fn as_dyn(&self) -> &dyn Widget;
    fn as_mut_dyn(&mut self) -> &mut dyn Widget;
}

impl<T: Widget> AsDynWidget for T {
    fn as_box_dyn(self: Box<Self>) -> Box<dyn Widget> {
        self
    }

    fn as_dyn(&self) -> &dyn Widget {
        self as &dyn Widget
    }

    fn as_mut_dyn(&mut self) -> &mut dyn Widget {
        self as &mut dyn Widget
    }
}

/// A trait that lets functions either downcast to a `Sized` widget or keep a `dyn Widget`.
pub trait FromDynWidget {
    /// Downcasts `widget` if `Self: Sized`, else returns it as-is.
    fn from_dyn(widget: &dyn Widget) -> Option<&Self>;
    /// Downcasts `widget` if `Self: Sized`, else returns it as-is.
    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self>;
}

impl<T: Widget> FromDynWidget for T {
    fn from_dyn(widget: &dyn Widget) -> Option<&Self> {
        (widget as &dyn Any).downcast_ref()
    }

    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self> {
        (widget as &mut dyn Any).downcast_mut()
    }
}

impl FromDynWidget for dyn Widget {
    fn from_dyn(widget: &dyn Widget) -> Option<&Self> {
        Some(widget)
    }

    fn from_dyn_mut(widget: &mut dyn Widget) -> Option<&mut Self> {
        Some(widget)
    }
}

// --- MARK: RESIZABLE

/// The geometry capability of a widget.
///
/// Widgets only override the methods they customize; the defaults describe a
/// container which stacks all its visible children on top of each other.
///
/// The methods of this trait are only ever called by the engine. A widget must never
/// call the *wrapped* size accessors of the tree for itself from inside
/// [`measure`](Self::measure): doing so would apply margins, alignment and size groups twice.
/// Children are queried through [`MeasureCtx::child_preferred_size`].
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Resizable {
    /// Which orientation this widget resolves first.
    ///
    /// The result is cached until the next resize is queued on the widget.
    fn request_mode(&mut self, ctx: &mut MeasureCtx<'_>) -> RequestMode {
        RequestMode::ConstantSize
    }

    /// Computes the intrinsic content size of the widget along `orientation`.
    ///
    /// `for_size` is the content size already decided in the other orientation.
    /// It is always `None` in the widget's native orientation and for
    /// [`RequestMode::ConstantSize`] widgets.
    ///
    /// The default implementation returns the largest request among visible children.
    fn measure(
        &mut self,
        ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        let mut request = SizeRequest::ZERO;
        for child in ctx.children() {
            if ctx.is_visible(child) {
                request = request.max(ctx.child_preferred_size(child, orientation, for_size));
            }
        }
        request
    }

    /// Turns the intrinsic request into the request reported to the parent.
    ///
    /// The request passed in has already been bumped by size groups. Implementations
    /// must never make it smaller; a smaller result is discarded with a diagnostic.
    ///
    /// Overrides usually call [`AdjustCtx::default_adjust_size_request`] first.
    fn adjust_size_request(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
    ) {
        ctx.default_adjust_size_request(orientation, request);
    }

    /// Converts a proposed allocation along `orientation` into the area the widget
    /// will actually occupy.
    ///
    /// `request` holds the adjusted request of the widget, `pos` and `size` the
    /// proposed position and extent. The result must stay within the proposed area,
    /// or it is reverted with a diagnostic.
    ///
    /// Overrides usually call [`AdjustCtx::default_adjust_size_allocation`] first.
    fn adjust_size_allocation(
        &self,
        ctx: &AdjustCtx,
        orientation: Orientation,
        request: &mut SizeRequest,
        pos: &mut i32,
        size: &mut i32,
    ) {
        ctx.default_adjust_size_allocation(orientation, request, pos, size);
    }

    /// Allocates the children of the widget, once its own allocation was committed.
    ///
    /// `allocation` is the committed allocation, in the coordinates of the parent's surface.
    /// The default implementation gives every visible child the whole area.
    fn size_allocate(&mut self, ctx: &mut AllocateCtx<'_>, allocation: Allocation) {
        let area = ctx.content_area();
        for child in ctx.children() {
            if ctx.is_visible(child) {
                ctx.allocate_child(child, area);
            }
        }
    }
}

// --- MARK: REALIZABLE

/// Hooks run when a widget's native resources are created or shown.
///
/// The engine performs the bookkeeping (surfaces, flags, notifications, children);
/// these hooks only let a widget attach its own resources.
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Realizable {
    /// Called once the widget has a drawing surface.
    fn realize(&mut self, ctx: &mut LifecycleCtx<'_>) {}

    /// Called before the widget loses its drawing surface, after its children were unrealized.
    fn unrealize(&mut self, ctx: &mut LifecycleCtx<'_>) {}

    /// Called when the widget becomes mapped, before its children are mapped.
    fn map(&mut self, ctx: &mut LifecycleCtx<'_>) {}

    /// Called when the widget is unmapped, after its children were unmapped.
    fn unmap(&mut self, ctx: &mut LifecycleCtx<'_>) {}
}

// --- MARK: STATEFUL

/// Hooks run when state that styling depends on changes.
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Stateful {
    /// Called after the state flags of the widget changed.
    fn state_flags_changed(&mut self, ctx: &mut StateCtx<'_>, previous: StateFlags) {}

    /// Called after the effective text direction of the widget changed.
    fn direction_changed(&mut self, ctx: &mut StateCtx<'_>, previous: TextDirection) {}

    /// Called after the style of the widget was invalidated.
    fn style_updated(&mut self, ctx: &mut StateCtx<'_>) {}

    /// Called after the widget became anchored or stopped being anchored.
    fn hierarchy_changed(&mut self, ctx: &mut StateCtx<'_>, previous_toplevel: Option<WidgetId>) {}
}

// --- MARK: WIDGET

/// The trait implemented by all widgets.
///
/// A widget is a combination of three capabilities, each with default behavior:
/// [`Resizable`] for size negotiation and allocation, [`Realizable`] for native
/// resources, and [`Stateful`] for reacting to state and style changes.
/// A leaf widget typically only overrides [`Resizable::measure`].
///
/// Widgets are stored in a [`WidgetTree`](crate::app::WidgetTree), which owns
/// the parent/child links. Widget methods are called by the tree, and a widget should only be
/// mutated during a method call or through [`WidgetTree::widget_mut`](crate::app::WidgetTree::widget_mut).
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Widget: AsDynWidget + Resizable + Realizable + Stateful + Any {
    /// Whether the widget is a toplevel window.
    ///
    /// Toplevels can't be parented, are always anchored, and are allocated by
    /// [`WidgetTree::process_pending_resizes`](crate::app::WidgetTree::process_pending_resizes).
    /// Read once, when the widget is inserted.
    fn is_toplevel(&self) -> bool {
        false
    }

    /// Whether the widget draws into its own native surface instead of its parent's.
    ///
    /// Read once, when the widget is inserted.
    /// See [`WidgetTree::set_has_own_surface`](crate::app::WidgetTree::set_has_own_surface).
    fn has_own_surface(&self) -> bool {
        false
    }

    /// Whether the widget can take keyboard focus. Read once, when the widget is inserted.
    fn accepts_focus(&self) -> bool {
        false
    }

    /// Returns a span for tracing.
    ///
    /// As methods recurse through the widget tree, trace spans are added for each child
    /// widget visited, and popped when control flow goes back to the parent. This method
    /// returns a static span (that you can use to filter traces and logs).
    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("Widget", r#type = self.short_type_name(), id = id.trace())
    }

    /// Returns a small string representing important info about this widget instance.
    fn get_debug_text(&self) -> Option<String> {
        None
    }

    /// Gets the type name of the widget for debugging purposes.
    /// You should not override this method.
    #[doc(hidden)]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Gets the (abridged) type name of the widget for debugging purposes.
    /// You should not override this method.
    #[doc(hidden)]
    fn short_type_name(&self) -> &'static str {
        let name = self.type_name();
        name.split('<')
            .next()
            .unwrap_or(name)
            .split("::")
            .last()
            .unwrap_or(name)
    }
}

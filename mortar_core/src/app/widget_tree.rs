// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use tracing::{debug, info_span};

use crate::app::{NotificationQueue, SettingsHandle, settings};
use crate::backend::{
    DeviceId, EventMask, HeadlessBackend, ScreenId, SurfaceBackend, SurfaceId,
};
use crate::core::{
    Align, Allocation, Attributes, AuxInfo, ChildrenIds, CrossingMode, DefaultStyleProvider,
    DeviceEventInterest, Diagnostic, DiagnosticKind, DiagnosticSink, Edge, EventInterest,
    FromDynWidget, Handled, InputEvent, Margins, Notification, Orientation, Rect, RequestMode,
    Size, SizeGroupId, SizeGroupMode, SizeGroups, SizeRequest, StateChange, StateFlags,
    StateType, StyleProvider, StyleValue, TextContext, TextDirection, TooltipMarkup, Widget,
    WidgetArena, WidgetId, WidgetState,
};
use crate::passes::verify::InvariantTracker;
use crate::util::clamp_margin;

// --- MARK: STRUCTS

/// The collaborators a [`WidgetTree`] is created with.
pub struct TreeOptions {
    /// The windowing system native surfaces are created in.
    pub backend: Box<dyn SurfaceBackend>,
    /// The source of fonts and style values.
    pub style: Box<dyn StyleProvider>,
    /// Process-wide defaults. Defaults to [`settings::global()`].
    pub settings: SettingsHandle,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            backend: Box::new(HeadlessBackend::new()),
            style: Box::new(DefaultStyleProvider::new()),
            settings: settings::global(),
        }
    }
}

/// The owner of a widget tree, and the entry point of every operation on it.
///
/// Widgets are inserted detached, then linked with [`set_parent`](Self::set_parent).
/// Each public method is one *operation*: when it returns, invariants have been
/// verified (in debug configurations) and every notification it caused has been
/// delivered to listeners. Listeners may mutate the tree in turn.
pub struct WidgetTree {
    pub(crate) arena: WidgetArena,
    pub(crate) backend: Box<dyn SurfaceBackend>,
    pub(crate) style: Box<dyn StyleProvider>,
    pub(crate) settings: SettingsHandle,
    pub(crate) notifications: NotificationQueue,
    pub(crate) diagnostics: DiagnosticSink,
    pub(crate) invariants: Rc<RefCell<InvariantTracker>>,
    pub(crate) size_groups: SizeGroups,
    /// Visible toplevels waiting for [`process_pending_resizes`](Self::process_pending_resizes).
    pub(crate) resize_queue: Vec<WidgetId>,
    /// The widget owning each native surface.
    pub(crate) surface_owners: HashMap<SurfaceId, WidgetId>,
    /// Widgets holding a grab, most recent last.
    pub(crate) grabs: Vec<WidgetId>,
    op_depth: u32,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Creates an empty tree with a headless backend, the default style and the
    /// process-wide settings.
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    /// Creates an empty tree.
    pub fn with_options(options: TreeOptions) -> Self {
        let TreeOptions {
            backend,
            style,
            settings,
        } = options;
        debug!(debug_flags = ?settings.debug(), "creating widget tree");
        Self {
            arena: WidgetArena::default(),
            backend,
            style,
            settings,
            notifications: NotificationQueue::default(),
            diagnostics: DiagnosticSink::default(),
            invariants: Rc::new(RefCell::new(InvariantTracker::default())),
            size_groups: SizeGroups::default(),
            resize_queue: Vec::new(),
            surface_owners: HashMap::new(),
            grabs: Vec::new(),
            op_depth: 0,
        }
    }

    /// Runs one public operation.
    ///
    /// Operations nest. When the outermost one returns, pending invariant checks run
    /// and queued notifications are delivered.
    pub(crate) fn op<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.op_depth += 1;
        let result = f(self);
        self.op_depth -= 1;
        if self.op_depth == 0 {
            self.verify_pending();
            self.flush_notifications();
        }
        result
    }

    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        widget: Option<WidgetId>,
        message: impl Into<String>,
    ) {
        self.diagnostics.report(kind, widget, message);
    }

    /// Reports `operation` being called with an id that isn't in the tree.
    pub(crate) fn check_exists(&mut self, id: WidgetId, operation: &str) -> bool {
        if self.arena.contains(id) {
            return true;
        }
        self.report(
            DiagnosticKind::ContractViolation,
            Some(id),
            format!("{operation}: no such widget"),
        );
        false
    }

    // --- MARK: INSERT

    /// Adds a detached widget to the tree and returns its id.
    ///
    /// The widget starts hidden, unrealized and without a parent.
    pub fn insert(&mut self, widget: impl Widget) -> WidgetId {
        self.insert_boxed(Box::new(widget))
    }

    /// Adds a detached, boxed widget to the tree and returns its id.
    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>) -> WidgetId {
        let id = WidgetId::next();
        let is_toplevel = widget.is_toplevel();
        let mut state = WidgetState::new(id, is_toplevel, widget.make_trace_span(id));
        state.has_own_surface = is_toplevel || widget.has_own_surface();
        state.can_focus = widget.accepts_focus();
        if let Some(toplevel) = &mut state.toplevel {
            let screen = self.settings.get().default_screen;
            toplevel.screen = screen;
            state.screen = Some(screen);
        }
        debug!(
            widget = id.trace(),
            r#type = widget.short_type_name(),
            is_toplevel,
            "inserted"
        );
        self.arena.insert(widget, state);
        id
    }

    // --- MARK: ACCESS WIDGETS

    /// Whether `id` is in the tree.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.contains(id)
    }

    /// The number of widgets in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the tree has no widgets.
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// All widgets in the tree, in insertion order.
    pub fn widget_ids(&self) -> &[WidgetId] {
        self.arena.ids()
    }

    /// Returns the widget with the given id, downcast to `W`.
    ///
    /// Returns `None` if there is no such widget, if it isn't a `W`, or if one of its
    /// methods is running.
    pub fn widget<W: Widget + FromDynWidget + ?Sized>(&self, id: WidgetId) -> Option<&W> {
        self.arena.widget(id).and_then(W::from_dyn)
    }

    /// Returns the widget with the given id, downcast to `W`, for mutation.
    ///
    /// If the mutation changes the widget's size, call [`queue_resize`](Self::queue_resize).
    pub fn widget_mut<W: Widget + FromDynWidget + ?Sized>(
        &mut self,
        id: WidgetId,
    ) -> Option<&mut W> {
        self.arena.widget_mut(id).and_then(W::from_dyn_mut)
    }

    /// The parent of a widget.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.state(id).and_then(|s| s.parent)
    }

    /// The children of a widget, including internal ones.
    pub fn children(&self, id: WidgetId) -> ChildrenIds {
        self.arena
            .state(id)
            .map(|s| s.child_ids().collect())
            .unwrap_or_default()
    }

    /// The children of a widget which aren't internal.
    pub fn children_non_internal(&self, id: WidgetId) -> ChildrenIds {
        self.arena
            .state(id)
            .map(|s| s.non_internal_child_ids().collect())
            .unwrap_or_default()
    }

    /// The toplevel at the root of the widget's branch, if the root is a toplevel.
    pub fn toplevel_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = self.arena.state(id)?;
        while let Some(parent) = current.parent.and_then(|p| self.arena.state(p)) {
            current = parent;
        }
        current.is_toplevel.then_some(current.id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == ancestor {
                return true;
            }
            current = self.parent(widget);
        }
        false
    }

    fn flag(&self, id: WidgetId, f: impl FnOnce(&WidgetState) -> bool) -> bool {
        self.arena.state(id).is_some_and(f)
    }

    /// Whether the widget is a toplevel.
    pub fn is_toplevel(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_toplevel)
    }

    /// Whether the widget was shown.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_visible)
    }

    /// Whether the widget is visible and mapped, so that drawing it has an effect.
    pub fn is_drawable(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_visible && s.is_mapped)
    }

    /// Whether the widget is mapped.
    pub fn is_mapped(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_mapped)
    }

    /// Whether the widget is realized.
    pub fn is_realized(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_realized)
    }

    /// Whether the widget is reachable from a toplevel.
    pub fn is_anchored(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_anchored)
    }

    /// Whether the widget's parent lets it be mapped.
    pub fn child_visible(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_child_visible)
    }

    /// Whether the widget was added with [`set_parent_internal`](Self::set_parent_internal).
    pub fn is_composite_child(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_composite_child)
    }

    /// Whether the widget is being destroyed.
    pub fn in_destruction(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.in_destruction)
    }

    /// The allocation of the widget, in the coordinates of its parent's surface.
    ///
    /// Widgets which were never allocated report [`Rect::DEGENERATE`].
    pub fn allocation(&self, id: WidgetId) -> Allocation {
        self.arena
            .state(id)
            .map_or(Rect::DEGENERATE, |s| s.allocation)
    }

    /// Whether the widget's size request is outdated.
    pub fn needs_resize(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.needs_resize)
    }

    /// Whether the widget must be allocated again, even with an unchanged rectangle.
    pub fn needs_allocate(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.needs_allocate)
    }

    /// The surface the widget draws into, if it is realized.
    pub fn surface(&self, id: WidgetId) -> Option<SurfaceId> {
        self.arena.state(id).and_then(|s| s.surface)
    }

    /// The widget owning `surface`.
    pub fn surface_owner(&self, surface: SurfaceId) -> Option<WidgetId> {
        self.surface_owners.get(&surface).copied()
    }

    /// The screen the widget is shown on, if it is anchored.
    pub fn screen(&self, id: WidgetId) -> Option<ScreenId> {
        self.arena.state(id).and_then(|s| s.screen)
    }

    /// The typed attributes of a widget.
    pub fn attributes(&self, id: WidgetId) -> Option<&Attributes> {
        self.arena.state(id).map(|s| &s.attributes)
    }

    /// The typed attributes of a widget, for mutation.
    pub fn attributes_mut(&mut self, id: WidgetId) -> Option<&mut Attributes> {
        self.arena.state_mut(id).map(|s| &mut s.attributes)
    }

    // --- MARK: TREE STRUCTURE

    /// Makes `parent` the parent of `child`, appending it to the parent's children.
    ///
    /// Rejected if `child` already has a parent, is a toplevel, or is `parent` or
    /// one of its ancestors.
    pub fn set_parent(&mut self, child: WidgetId, parent: WidgetId) {
        self.op(|tree| tree.set_parent_inner(child, parent, false));
    }

    /// Like [`set_parent`](Self::set_parent), for an internal child.
    ///
    /// Internal children are part of their parent's implementation:
    /// only "for-all" traversals, such as sensitivity changes, visit them.
    pub fn set_parent_internal(&mut self, child: WidgetId, parent: WidgetId) {
        self.op(|tree| tree.set_parent_inner(child, parent, true));
    }

    /// Detaches a widget from its parent.
    pub fn unparent(&mut self, id: WidgetId) {
        self.op(|tree| tree.unparent_inner(id));
    }

    /// Moves a widget to a new parent.
    ///
    /// When both the widget and the new parent are realized, the widget keeps its
    /// native resources: it is unmapped and mapped, never unrealized.
    pub fn reparent(&mut self, id: WidgetId, new_parent: WidgetId) {
        self.op(|tree| tree.reparent_inner(id, new_parent));
    }

    // --- MARK: LIFECYCLE

    /// Makes a widget visible. A toplevel is allocated, realized and mapped.
    pub fn show(&mut self, id: WidgetId) {
        self.op(|tree| tree.show_inner(id));
    }

    /// Shows a widget and all its non-internal descendants.
    pub fn show_all(&mut self, id: WidgetId) {
        self.op(|tree| tree.show_all_inner(id));
    }

    /// Hides a widget, unmapping it.
    pub fn hide(&mut self, id: WidgetId) {
        self.op(|tree| tree.hide_inner(id));
    }

    /// Creates the native resources of a widget and its ancestors.
    ///
    /// Rejected for widgets which aren't anchored.
    pub fn realize(&mut self, id: WidgetId) {
        self.op(|tree| {
            tree.realize_inner(id);
        });
    }

    /// Releases the native resources of a widget and its descendants.
    pub fn unrealize(&mut self, id: WidgetId) {
        self.op(|tree| tree.unrealize_inner(id));
    }

    /// Maps a visible widget, realizing it first if needed.
    pub fn map(&mut self, id: WidgetId) {
        self.op(|tree| tree.map_inner(id));
    }

    /// Unmaps a widget and its descendants.
    pub fn unmap(&mut self, id: WidgetId) {
        self.op(|tree| tree.unmap_inner(id));
    }

    /// Removes a widget and its descendants from the tree.
    pub fn destroy(&mut self, id: WidgetId) {
        self.op(|tree| tree.destroy_inner(id));
    }

    /// Sets whether the parent lets the widget be mapped.
    ///
    /// Containers use this to hide children without changing their visibility,
    /// e.g. the inactive pages of a notebook. Not allowed on toplevels.
    pub fn set_child_visible(&mut self, id: WidgetId, child_visible: bool) {
        self.op(|tree| tree.set_child_visible_inner(id, child_visible));
    }

    // --- MARK: GEOMETRY

    /// The request of a widget along `orientation`, with margins, alignment,
    /// explicit size requests and size groups applied.
    ///
    /// `for_size` is the size the widget would be allocated in the other orientation.
    pub fn preferred_size(
        &mut self,
        id: WidgetId,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        self.op(|tree| tree.preferred_size_inner(id, orientation, for_size))
    }

    /// The unconstrained width request.
    pub fn preferred_width(&mut self, id: WidgetId) -> SizeRequest {
        self.preferred_size(id, Orientation::Horizontal, None)
    }

    /// The unconstrained height request.
    pub fn preferred_height(&mut self, id: WidgetId) -> SizeRequest {
        self.preferred_size(id, Orientation::Vertical, None)
    }

    /// The height request for a given width.
    pub fn preferred_height_for_width(&mut self, id: WidgetId, width: i32) -> SizeRequest {
        self.preferred_size(id, Orientation::Vertical, Some(width))
    }

    /// The width request for a given height.
    pub fn preferred_width_for_height(&mut self, id: WidgetId, height: i32) -> SizeRequest {
        self.preferred_size(id, Orientation::Horizontal, Some(height))
    }

    /// The minimum and natural sizes of a widget, resolved in its request mode.
    pub fn preferred_size_pair(&mut self, id: WidgetId) -> (Size, Size) {
        self.op(|tree| tree.preferred_size_pair_inner(id))
    }

    /// Which orientation the widget resolves first.
    pub fn request_mode(&mut self, id: WidgetId) -> RequestMode {
        self.op(|tree| tree.request_mode_inner(id))
    }

    /// Assigns a rectangle to a widget, in the coordinates of its parent's surface.
    ///
    /// This is what containers call for their children; applications mostly rely on
    /// [`process_pending_resizes`](Self::process_pending_resizes) instead.
    pub fn size_allocate(&mut self, id: WidgetId, allocation: Allocation) {
        self.op(|tree| tree.size_allocate_inner(id, allocation));
    }

    /// Marks the size of a widget as outdated, and schedules a redraw.
    pub fn queue_resize(&mut self, id: WidgetId) {
        self.op(|tree| tree.queue_resize_inner(id, true));
    }

    /// Marks the size of a widget as outdated, without scheduling a redraw.
    pub fn queue_resize_no_redraw(&mut self, id: WidgetId) {
        self.op(|tree| tree.queue_resize_inner(id, false));
    }

    /// Schedules a redraw of the widget's whole area.
    pub fn queue_draw(&mut self, id: WidgetId) {
        self.op(|tree| tree.queue_draw_inner(id));
    }

    /// Schedules a redraw of part of the widget's area.
    ///
    /// `area` is relative to the origin of the widget's allocation.
    pub fn queue_draw_area(&mut self, id: WidgetId, area: Rect) {
        self.op(|tree| tree.queue_draw_area_inner(id, area));
    }

    /// Allocates every toplevel whose size is outdated.
    ///
    /// The event loop calls this before drawing the next frame.
    pub fn process_pending_resizes(&mut self) {
        let _span = info_span!("process_pending_resizes").entered();
        self.op(|tree| tree.process_pending_resizes_inner());
    }

    /// Whether [`process_pending_resizes`](Self::process_pending_resizes) has work to do.
    pub fn has_pending_resizes(&self) -> bool {
        !self.resize_queue.is_empty()
    }

    /// The explicit size request, alignment and margins of a widget.
    pub fn aux_info(&self, id: WidgetId) -> AuxInfo {
        self.arena
            .state(id)
            .map_or(AuxInfo::DEFAULT, |s| *s.aux.get())
    }

    /// Changes the auxiliary info of a widget, queueing a resize if it changed.
    fn update_aux(&mut self, id: WidgetId, operation: &str, f: impl FnOnce(&mut AuxInfo)) {
        self.op(|tree| {
            if !tree.check_exists(id, operation) {
                return;
            }
            let mut aux = tree.aux_info(id);
            f(&mut aux);
            let Some(state) = tree.arena.state_mut(id) else {
                return;
            };
            if *state.aux.get() == aux {
                return;
            }
            *state.aux.get_mut() = aux;
            tree.queue_resize_inner(id, true);
        });
    }

    /// Sets the explicit minimum size of a widget. `None` unsets a dimension.
    ///
    /// A requested size of zero is stored as one. Negative sizes are reported and
    /// treated as unset.
    pub fn set_size_request(&mut self, id: WidgetId, width: Option<i32>, height: Option<i32>) {
        let width = self.sanitize_size_request(id, width);
        let height = self.sanitize_size_request(id, height);
        self.update_aux(id, "set_size_request", |aux| {
            aux.width_request = width;
            aux.height_request = height;
        });
    }

    /// Sets the explicit minimum width, leaving the height request untouched.
    pub fn set_width_request(&mut self, id: WidgetId, width: Option<i32>) {
        let width = self.sanitize_size_request(id, width);
        self.update_aux(id, "set_width_request", |aux| aux.width_request = width);
    }

    /// Sets the explicit minimum height, leaving the width request untouched.
    pub fn set_height_request(&mut self, id: WidgetId, height: Option<i32>) {
        let height = self.sanitize_size_request(id, height);
        self.update_aux(id, "set_height_request", |aux| aux.height_request = height);
    }

    fn sanitize_size_request(&mut self, id: WidgetId, size: Option<i32>) -> Option<i32> {
        match size {
            Some(0) => Some(1),
            Some(size) if size < 0 => {
                self.report(
                    DiagnosticKind::ContractViolation,
                    Some(id),
                    format!("size request {size} is negative, treating it as unset"),
                );
                None
            }
            size => size,
        }
    }

    /// Sets the horizontal alignment of a widget within its allocation.
    pub fn set_halign(&mut self, id: WidgetId, align: Align) {
        self.update_aux(id, "set_halign", |aux| aux.halign = align);
    }

    /// Sets the vertical alignment of a widget within its allocation.
    pub fn set_valign(&mut self, id: WidgetId, align: Align) {
        self.update_aux(id, "set_valign", |aux| aux.valign = align);
    }

    /// Sets one margin of a widget. Margins are clamped to `0..=i16::MAX`.
    pub fn set_margin(&mut self, id: WidgetId, edge: Edge, margin: i32) {
        let margin = self.sanitize_margin(id, margin);
        self.update_aux(id, "set_margin", |aux| match edge {
            Edge::Left => aux.margin.left = margin,
            Edge::Right => aux.margin.right = margin,
            Edge::Top => aux.margin.top = margin,
            Edge::Bottom => aux.margin.bottom = margin,
        });
    }

    /// Sets all margins of a widget. Margins are clamped to `0..=i16::MAX`.
    pub fn set_margins(&mut self, id: WidgetId, margins: Margins) {
        let margins = Margins {
            left: self.sanitize_margin(id, margins.left.into()),
            right: self.sanitize_margin(id, margins.right.into()),
            top: self.sanitize_margin(id, margins.top.into()),
            bottom: self.sanitize_margin(id, margins.bottom.into()),
        };
        self.update_aux(id, "set_margins", |aux| aux.margin = margins);
    }

    fn sanitize_margin(&mut self, id: WidgetId, margin: i32) -> i16 {
        let (clamped, was_clamped) = clamp_margin(margin);
        if was_clamped {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!("margin {margin} is out of range, clamped to {clamped}"),
            );
        }
        clamped
    }

    /// Sets the size a toplevel is allocated instead of its natural size.
    pub fn set_default_size(&mut self, id: WidgetId, size: Option<Size>) {
        self.op(|tree| {
            let Some(toplevel) = tree.arena.state_mut(id).and_then(|s| s.toplevel.as_mut())
            else {
                tree.report(
                    DiagnosticKind::ContractViolation,
                    Some(id),
                    "set_default_size: not a toplevel",
                );
                return;
            };
            if toplevel.default_size == size {
                return;
            }
            toplevel.default_size = size;
            tree.queue_resize_inner(id, true);
        });
    }

    /// The default size of a toplevel.
    pub fn default_size(&self, id: WidgetId) -> Option<Size> {
        self.arena
            .state(id)
            .and_then(|s| s.toplevel.as_ref())
            .and_then(|t| t.default_size)
    }

    // --- MARK: SIZE GROUPS

    /// Creates a size group, whose members share their requests along `mode`.
    pub fn create_size_group(&mut self, mode: SizeGroupMode) -> SizeGroupId {
        self.size_groups.create(mode)
    }

    /// Adds a widget to a size group.
    pub fn add_to_size_group(&mut self, group: SizeGroupId, id: WidgetId) {
        self.op(|tree| {
            if !tree.check_exists(id, "add_to_size_group") {
                return;
            }
            let Some(size_group) = tree.size_groups.get_mut(group) else {
                tree.report(
                    DiagnosticKind::ContractViolation,
                    Some(id),
                    format!("add_to_size_group: no such group {group:?}"),
                );
                return;
            };
            if size_group.members.contains(&id) {
                return;
            }
            size_group.members.push(id);
            if let Some(state) = tree.arena.state_mut(id) {
                state.size_groups.push(group);
            }
            tree.queue_resize_group(group);
        });
    }

    /// Removes a widget from a size group.
    pub fn remove_from_size_group(&mut self, group: SizeGroupId, id: WidgetId) {
        self.op(|tree| {
            let Some(size_group) = tree.size_groups.get_mut(group) else {
                return;
            };
            let len = size_group.members.len();
            size_group.members.retain(|member| *member != id);
            if len == size_group.members.len() {
                return;
            }
            // The group and the removed widget both lose a constraint.
            tree.queue_resize_group(group);
            if let Some(state) = tree.arena.state_mut(id) {
                state.size_groups.retain(|g| *g != group);
            }
            tree.queue_resize_inner(id, true);
        });
    }

    /// Changes which orientations a size group equalizes.
    pub fn set_size_group_mode(&mut self, group: SizeGroupId, mode: SizeGroupMode) {
        self.op(|tree| {
            let Some(size_group) = tree.size_groups.get_mut(group) else {
                return;
            };
            if size_group.mode == mode {
                return;
            }
            // Resize with the old mode, so former peers are invalidated too.
            tree.queue_resize_group(group);
            if let Some(size_group) = tree.size_groups.get_mut(group) {
                size_group.mode = mode;
            }
            tree.queue_resize_group(group);
        });
    }

    /// Sets whether hidden members are left out when computing the group's request.
    pub fn set_size_group_ignore_hidden(&mut self, group: SizeGroupId, ignore_hidden: bool) {
        self.op(|tree| {
            let Some(size_group) = tree.size_groups.get_mut(group) else {
                return;
            };
            if size_group.ignore_hidden == ignore_hidden {
                return;
            }
            size_group.ignore_hidden = ignore_hidden;
            tree.queue_resize_group(group);
        });
    }

    /// Removes a size group, releasing its members.
    pub fn destroy_size_group(&mut self, group: SizeGroupId) {
        self.op(|tree| {
            tree.queue_resize_group(group);
            let Some(size_group) = tree.size_groups.remove(group) else {
                return;
            };
            for member in size_group.members {
                if let Some(state) = tree.arena.state_mut(member) {
                    state.size_groups.retain(|g| *g != group);
                }
                tree.queue_resize_inner(member, true);
            }
        });
    }

    /// The members of a size group.
    pub fn size_group_members(&self, group: SizeGroupId) -> Vec<WidgetId> {
        self.size_groups
            .get(group)
            .map(|g| g.members.clone())
            .unwrap_or_default()
    }

    fn queue_resize_group(&mut self, group: SizeGroupId) {
        let members = self.size_group_members(group);
        for member in members {
            self.queue_resize_inner(member, true);
        }
    }

    // --- MARK: STATE

    /// Applies a raw state change to a widget and propagates it to its descendants.
    ///
    /// Prefer [`set_state_flags`](Self::set_state_flags) and
    /// [`set_sensitive`](Self::set_sensitive), which keep sensitivity consistent.
    pub fn propagate_state(&mut self, id: WidgetId, change: StateChange) {
        self.op(|tree| {
            if tree.check_exists(id, "propagate_state") {
                tree.propagate_state_inner(id, change.delta(), change.use_forall);
            }
        });
    }

    /// Adds `flags` to the state of a widget, or replaces its state when `clear` is set.
    ///
    /// Flags are inherited by descendants, except [`StateFlags::FOCUSED`]. Setting
    /// [`StateFlags::INSENSITIVE`] here doesn't change the widget's own sensitivity.
    pub fn set_state_flags(&mut self, id: WidgetId, flags: StateFlags, clear: bool) {
        self.op(|tree| {
            let Some(current) = tree.arena.state(id).map(|s| s.state_flags) else {
                tree.check_exists(id, "set_state_flags");
                return;
            };
            if (!clear && current.contains(flags)) || (clear && current == flags) {
                return;
            }
            let unset = if clear {
                flags.complement()
            } else {
                StateFlags::empty()
            };
            tree.update_state_flags(id, flags, unset);
            tree.queue_resize_inner(id, true);
        });
    }

    /// Removes `flags` from the state of a widget.
    pub fn unset_state_flags(&mut self, id: WidgetId, flags: StateFlags) {
        self.op(|tree| {
            let Some(current) = tree.arena.state(id).map(|s| s.state_flags) else {
                tree.check_exists(id, "unset_state_flags");
                return;
            };
            if !current.intersects(flags) {
                return;
            }
            tree.update_state_flags(id, StateFlags::empty(), flags);
            tree.queue_resize_inner(id, true);
        });
    }

    /// The state flags of a widget.
    pub fn state_flags(&self, id: WidgetId) -> StateFlags {
        self.arena
            .state(id)
            .map_or(StateFlags::empty(), |s| s.state_flags)
    }

    /// The single-valued summary of the widget's state flags.
    pub fn state_type(&self, id: WidgetId) -> StateType {
        self.state_flags(id).into()
    }

    /// Sets the widget's own sensitivity.
    ///
    /// The widget is effectively insensitive if it or any ancestor isn't sensitive.
    /// Setting the current value does nothing.
    pub fn set_sensitive(&mut self, id: WidgetId, sensitive: bool) {
        self.op(|tree| {
            if tree.check_exists(id, "set_sensitive") && tree.set_sensitive_inner(id, sensitive)
            {
                tree.queue_resize_inner(id, true);
            }
        });
    }

    /// The widget's own sensitivity, regardless of its ancestors.
    pub fn sensitive(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_sensitive)
    }

    /// Whether the widget responds to input: it and all its ancestors are sensitive.
    pub fn is_sensitive(&self, id: WidgetId) -> bool {
        self.flag(id, WidgetState::is_effectively_sensitive)
    }

    // --- MARK: FOCUS AND GRABS

    /// Sets whether the widget can take keyboard focus.
    pub fn set_can_focus(&mut self, id: WidgetId, can_focus: bool) {
        self.op(|tree| {
            let Some(state) = tree.arena.state_mut(id) else {
                return;
            };
            if state.can_focus == can_focus {
                return;
            }
            state.can_focus = can_focus;
            if !can_focus {
                tree.unset_focus_within(id);
            }
        });
    }

    /// Whether the widget can take keyboard focus.
    pub fn can_focus(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.can_focus)
    }

    /// Gives keyboard focus to the widget, within its toplevel.
    pub fn grab_focus(&mut self, id: WidgetId) {
        self.op(|tree| tree.grab_focus_inner(id));
    }

    /// The widget with keyboard focus within `toplevel`.
    pub fn focus_widget(&self, toplevel: WidgetId) -> Option<WidgetId> {
        self.arena
            .state(toplevel)
            .and_then(|s| s.toplevel.as_ref())
            .and_then(|t| t.focus)
    }

    /// Whether the widget is the focus widget of its toplevel.
    pub fn is_focus(&self, id: WidgetId) -> bool {
        self.toplevel_of(id)
            .is_some_and(|toplevel| self.focus_widget(toplevel) == Some(id))
    }

    /// Whether the widget has keyboard focus.
    pub fn has_focus(&self, id: WidgetId) -> bool {
        self.state_flags(id).contains(StateFlags::FOCUSED)
    }

    /// The child of `id` on the path to the focus widget.
    pub fn focus_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.state(id).and_then(|s| s.focus_child)
    }

    /// Makes the widget hold a grab: other widgets are shadowed until it is removed.
    ///
    /// Ignored for insensitive widgets.
    pub fn grab_add(&mut self, id: WidgetId) {
        self.op(|tree| tree.grab_add_inner(id));
    }

    /// Releases a grab held by the widget.
    pub fn grab_remove(&mut self, id: WidgetId) {
        self.op(|tree| tree.grab_remove_inner(id));
    }

    /// Whether the widget holds a grab.
    pub fn has_grab(&self, id: WidgetId) -> bool {
        self.grabs.contains(&id)
    }

    /// The widget holding the most recent grab.
    pub fn current_grab(&self) -> Option<WidgetId> {
        self.grabs.last().copied()
    }

    /// Whether another widget's grab keeps this widget from receiving input.
    pub fn is_shadowed(&self, id: WidgetId) -> bool {
        self.current_grab()
            .is_some_and(|grab| !self.is_ancestor(grab, id))
    }

    /// Emits the pointer crossing notifications a windowing system would emit when
    /// the pointer of `device` moves from `from` to `to`.
    pub fn synthesize_crossing(
        &mut self,
        from: Option<WidgetId>,
        to: Option<WidgetId>,
        device: DeviceId,
        mode: CrossingMode,
    ) {
        self.op(|tree| tree.synthesize_crossing_inner(from, to, device, mode));
    }

    // --- MARK: DIRECTION AND STYLE

    /// Sets the text direction of a widget. [`TextDirection::None`] follows the default.
    pub fn set_direction(&mut self, id: WidgetId, direction: TextDirection) {
        self.op(|tree| {
            let previous = tree.effective_direction(id);
            let Some(state) = tree.arena.state_mut(id) else {
                tree.check_exists(id, "set_direction");
                return;
            };
            state.direction = direction;
            if tree.effective_direction(id) != previous {
                tree.emit_direction_changed(id, previous);
            }
        });
    }

    /// The text direction set on a widget, possibly [`TextDirection::None`].
    pub fn direction(&self, id: WidgetId) -> TextDirection {
        self.arena
            .state(id)
            .map_or(TextDirection::None, |s| s.direction)
    }

    /// The direction the widget lays out its content in. Never [`TextDirection::None`].
    pub fn effective_direction(&self, id: WidgetId) -> TextDirection {
        match self.direction(id) {
            TextDirection::None => self.default_direction(),
            direction => direction,
        }
    }

    /// The direction used by widgets which don't set one.
    pub fn default_direction(&self) -> TextDirection {
        match self.settings.get().default_direction {
            TextDirection::None => TextDirection::Ltr,
            direction => direction,
        }
    }

    /// Changes the default direction in the settings of this tree.
    ///
    /// Every widget of this tree which follows the default is notified.
    pub fn set_default_direction(&mut self, direction: TextDirection) {
        self.op(|tree| tree.set_default_direction_inner(direction));
    }

    /// The font and resolved direction used to lay out the widget's text.
    ///
    /// Built from the style provider on first use and cached until the widget's
    /// state, direction or style changes.
    pub fn text_context(&mut self, id: WidgetId) -> Option<TextContext> {
        if let Some(cached) = self.attributes(id)?.get::<TextContext>() {
            return Some(cached.clone());
        }
        let context = TextContext {
            font: self.style.font_description(id, self.state_flags(id)),
            direction: self.effective_direction(id),
        };
        self.attributes_mut(id)?.insert(context.clone());
        Some(context)
    }

    /// Looks up a style value for the widget.
    pub fn style_value(&self, id: WidgetId, name: &str) -> Option<StyleValue> {
        self.style.style_value(id, name)
    }

    /// Invalidates the style of a widget and its descendants.
    pub fn reset_style(&mut self, id: WidgetId) {
        self.op(|tree| {
            if tree.check_exists(id, "reset_style") {
                tree.reset_style_inner(id);
                tree.queue_resize_inner(id, true);
            }
        });
    }

    /// Moves a toplevel to another screen.
    pub fn set_screen(&mut self, id: WidgetId, screen: ScreenId) {
        self.op(|tree| {
            let Some(toplevel) = tree.arena.state_mut(id).and_then(|s| s.toplevel.as_mut())
            else {
                tree.report(
                    DiagnosticKind::ContractViolation,
                    Some(id),
                    "set_screen: not a toplevel",
                );
                return;
            };
            if toplevel.screen == screen {
                return;
            }
            toplevel.screen = screen;
            tree.propagate_screen(id, screen);
        });
    }

    // --- MARK: SURFACES

    /// Sets whether the widget gets its own native surface when realized.
    ///
    /// Rejected once the widget is realized.
    pub fn set_has_own_surface(&mut self, id: WidgetId, has_own_surface: bool) {
        self.op(|tree| {
            let Some(state) = tree.arena.state_mut(id) else {
                return;
            };
            if state.is_realized {
                tree.report(
                    DiagnosticKind::Rejected,
                    Some(id),
                    "set_has_own_surface: the widget is already realized",
                );
                return;
            }
            state.has_own_surface = has_own_surface || state.is_toplevel;
        });
    }

    /// Whether the widget has its own native surface.
    pub fn has_own_surface(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.has_own_surface)
    }

    /// Sets whether the widget's area is invalidated when its allocation changes.
    pub fn set_redraw_on_allocate(&mut self, id: WidgetId, redraw_on_allocate: bool) {
        if let Some(state) = self.arena.state_mut(id) {
            state.redraw_on_allocate = redraw_on_allocate;
        }
    }

    /// Sets whether the whole widget is redrawn when one of its children is reallocated.
    pub fn set_reallocate_redraws(&mut self, id: WidgetId, reallocate_redraws: bool) {
        if let Some(state) = self.arena.state_mut(id) {
            state.reallocate_redraws = reallocate_redraws;
        }
    }

    /// Sets whether the widget is drawn through an off-screen buffer.
    pub fn set_double_buffered(&mut self, id: WidgetId, double_buffered: bool) {
        if let Some(state) = self.arena.state_mut(id) {
            state.is_double_buffered = double_buffered;
        }
    }

    /// Whether the widget is drawn through an off-screen buffer.
    pub fn is_double_buffered(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.is_double_buffered)
    }

    /// Replaces the events the widget is interested in.
    ///
    /// Rejected once the widget is realized; use [`add_events`](Self::add_events) then.
    pub fn set_event_mask(&mut self, id: WidgetId, mask: EventMask) {
        self.op(|tree| {
            let Some(state) = tree.arena.state_mut(id) else {
                return;
            };
            if state.is_realized {
                tree.report(
                    DiagnosticKind::Rejected,
                    Some(id),
                    "set_event_mask: the widget is already realized",
                );
                return;
            }
            state.attributes.insert(EventInterest(mask));
        });
    }

    /// Adds to the events the widget is interested in.
    pub fn add_events(&mut self, id: WidgetId, mask: EventMask) {
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        let interest = state.attributes.get_or_default::<EventInterest>();
        interest.0 |= mask;
        let mask = interest.0;
        if let Some(surface) = state.surface.filter(|_| state.has_own_surface) {
            self.backend.set_event_mask(surface, mask);
        }
    }

    /// The events the widget is interested in.
    pub fn events(&self, id: WidgetId) -> EventMask {
        self.attributes(id)
            .and_then(|a| a.get::<EventInterest>())
            .map_or(EventMask::empty(), |i| i.0)
    }

    /// Sets the events the widget is interested in from one input device.
    pub fn set_device_events(&mut self, id: WidgetId, device: DeviceId, mask: EventMask) {
        let Some(state) = self.arena.state_mut(id) else {
            return;
        };
        state
            .attributes
            .get_or_default::<DeviceEventInterest>()
            .0
            .insert(device, mask);
        if let Some(surface) = state.surface.filter(|_| state.has_own_surface) {
            self.backend.set_device_event_mask(surface, device, mask);
        }
    }

    /// The events the widget is interested in from one input device.
    pub fn device_events(&self, id: WidgetId, device: DeviceId) -> EventMask {
        self.attributes(id)
            .and_then(|a| a.get::<DeviceEventInterest>())
            .and_then(|i| i.0.get(&device).copied())
            .unwrap_or_default()
    }

    /// Sets the tooltip of a widget, as markup.
    pub fn set_tooltip_markup(&mut self, id: WidgetId, markup: Option<String>) {
        let Some(attributes) = self.attributes_mut(id) else {
            return;
        };
        match markup {
            Some(markup) => {
                attributes.insert(TooltipMarkup(markup));
            }
            None => {
                attributes.remove::<TooltipMarkup>();
            }
        }
    }

    /// The tooltip of a widget, as markup.
    pub fn tooltip_markup(&self, id: WidgetId) -> Option<&str> {
        self.attributes(id)?
            .get::<TooltipMarkup>()
            .map(|t| t.0.as_str())
    }

    // --- MARK: EVENTS

    /// Delivers an input event to the listeners of a widget.
    ///
    /// Unrealized, insensitive and shadowed widgets don't receive input.
    pub fn send_event(&mut self, id: WidgetId, event: InputEvent) -> Handled {
        self.op(|tree| {
            if !tree.is_realized(id) {
                tree.report(
                    DiagnosticKind::Rejected,
                    Some(id),
                    "send_event: the widget isn't realized",
                );
                return Handled::No;
            }
            if !tree.is_sensitive(id) || tree.is_shadowed(id) {
                return Handled::No;
            }
            tree.deliver(id, &Notification::Event(event))
        })
    }

    /// Asks the listeners of a mapped widget to draw `area`.
    pub fn draw(&mut self, id: WidgetId, area: Rect) -> Handled {
        self.op(|tree| {
            if !tree.is_mapped(id) {
                return Handled::No;
            }
            tree.deliver(id, &Notification::Draw(area))
        })
    }

    /// Activates a widget through its mnemonic.
    ///
    /// Listeners get the first chance. Otherwise a focusable widget takes focus;
    /// any other widget isn't suitable for mnemonic activation, which is reported.
    pub fn mnemonic_activate(&mut self, id: WidgetId, group_cycling: bool) -> Handled {
        self.op(|tree| {
            if !tree.check_exists(id, "mnemonic_activate") {
                return Handled::No;
            }
            let notification = Notification::MnemonicActivate { group_cycling };
            if tree.deliver(id, &notification).is_handled() {
                return Handled::Yes;
            }
            if tree.can_focus(id) {
                tree.grab_focus_inner(id);
                Handled::Yes
            } else {
                tree.report(
                    DiagnosticKind::Rejected,
                    Some(id),
                    "the widget isn't suitable for mnemonic activation",
                );
                Handled::No
            }
        })
    }

    // --- MARK: DIAGNOSTICS

    /// The diagnostics reported so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    /// Removes and returns the diagnostics reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    /// The settings this tree reads.
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }
}

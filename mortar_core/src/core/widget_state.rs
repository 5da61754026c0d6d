// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use smallvec::SmallVec;
use tracing::Span;

use crate::backend::{ScreenId, SurfaceId};
use crate::core::{
    Allocation, Attributes, AuxSlot, Rect, Size, SizeGroupId, SizeRequestCache, StateFlags,
    TextDirection, WidgetId,
};

/// A child link, in the order maintained by the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChildSlot {
    pub(crate) id: WidgetId,
    /// Internal (composite) children are only visited by "for-all" traversals.
    pub(crate) internal: bool,
}

/// Bookkeeping only toplevels carry.
#[derive(Clone, Debug, Default)]
pub(crate) struct ToplevelState {
    /// The widget with keyboard focus, if any.
    pub(crate) focus: Option<WidgetId>,
    /// Size used instead of the natural size when the toplevel is allocated.
    pub(crate) default_size: Option<Size>,
    /// The screen the toplevel is shown on.
    pub(crate) screen: ScreenId,
}

/// Generic state for all widgets in the hierarchy.
///
/// This struct contains the widget's layout rect, its lifecycle and interaction flags,
/// its links to parent and children, and the caches the engine keeps for it.
///
/// It is stored next to the widget in the arena, and may be accessed
/// while the widget itself is taken out to run one of its hooks.
///
/// Flags with `needs_` in their name are set when the engine owes the widget some work,
/// and cleared once that work is done.
pub(crate) struct WidgetState {
    pub(crate) id: WidgetId,

    // --- LINKS ---
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<ChildSlot>,
    /// The child on the path to the focus widget.
    pub(crate) focus_child: Option<WidgetId>,
    pub(crate) size_groups: SmallVec<[SizeGroupId; 2]>,

    // --- GEOMETRY ---
    pub(crate) allocation: Allocation,
    pub(crate) aux: AuxSlot,
    pub(crate) size_cache: SizeRequestCache,
    /// A size query is owed: the cache must be cleared before it is consulted.
    pub(crate) needs_resize: bool,
    /// The next allocation must not be short-circuited.
    pub(crate) needs_allocate: bool,

    // --- LIFECYCLE ---
    pub(crate) is_visible: bool,
    pub(crate) is_mapped: bool,
    pub(crate) is_realized: bool,
    pub(crate) is_child_visible: bool,
    pub(crate) is_anchored: bool,
    pub(crate) is_toplevel: bool,
    pub(crate) in_reparent: bool,
    pub(crate) in_destruction: bool,
    pub(crate) is_composite_child: bool,

    // --- SURFACES ---
    pub(crate) has_own_surface: bool,
    /// The surface the widget draws into: its own, or an ancestor's.
    pub(crate) surface: Option<SurfaceId>,
    pub(crate) is_double_buffered: bool,
    pub(crate) redraw_on_allocate: bool,
    pub(crate) reallocate_redraws: bool,
    pub(crate) screen: Option<ScreenId>,

    // --- INTERACTION ---
    /// The widget's own sensitivity. The effective sensitivity is in `state_flags`.
    pub(crate) is_sensitive: bool,
    pub(crate) can_focus: bool,
    pub(crate) state_flags: StateFlags,
    pub(crate) direction: TextDirection,

    pub(crate) toplevel: Option<ToplevelState>,
    pub(crate) attributes: Attributes,

    pub(crate) trace_span: Span,
}

impl WidgetState {
    pub(crate) fn new(id: WidgetId, is_toplevel: bool, trace_span: Span) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            focus_child: None,
            size_groups: SmallVec::new(),
            allocation: Rect::DEGENERATE,
            aux: AuxSlot::default(),
            size_cache: SizeRequestCache::new(),
            needs_resize: true,
            needs_allocate: true,
            is_visible: false,
            is_mapped: false,
            is_realized: false,
            is_child_visible: true,
            is_anchored: is_toplevel,
            is_toplevel,
            in_reparent: false,
            in_destruction: false,
            is_composite_child: false,
            has_own_surface: is_toplevel,
            surface: None,
            is_double_buffered: true,
            redraw_on_allocate: true,
            reallocate_redraws: false,
            screen: None,
            is_sensitive: true,
            can_focus: false,
            state_flags: StateFlags::empty(),
            direction: TextDirection::None,
            toplevel: is_toplevel.then(ToplevelState::default),
            attributes: Attributes::new(),
            trace_span,
        }
    }

    /// Effective sensitivity: own sensitivity and every ancestor's.
    pub(crate) fn is_effectively_sensitive(&self) -> bool {
        !self.state_flags.contains(StateFlags::INSENSITIVE)
    }

    /// Whether the widget may be mapped, given that its parent is mapped.
    pub(crate) fn is_mappable(&self) -> bool {
        self.is_visible && (self.is_toplevel || self.is_child_visible)
    }

    pub(crate) fn child_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.children.iter().map(|c| c.id)
    }

    pub(crate) fn non_internal_child_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.children.iter().filter(|c| !c.internal).map(|c| c.id)
    }
}

impl std::fmt::Debug for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetState")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("allocation", &self.allocation)
            .field("visible", &self.is_visible)
            .field("mapped", &self.is_mapped)
            .field("realized", &self.is_realized)
            .field("state_flags", &self.state_flags)
            .finish_non_exhaustive()
    }
}

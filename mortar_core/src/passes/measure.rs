// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The measure pass: answers size queries, applying size groups and the
//! `adjust_size_request` hook on top of each widget's intrinsic size.

use tracing::debug;

use crate::app::{DebugFlags, WidgetTree};
use crate::core::{
    AdjustCtx, DiagnosticKind, MeasureCtx, Orientation, RequestMode, Size, SizeRequest, WidgetId,
};

impl WidgetTree {
    pub(crate) fn adjust_ctx(&self, id: WidgetId) -> AdjustCtx {
        AdjustCtx {
            widget_id: id,
            aux: self.aux_info(id),
            direction: self.effective_direction(id),
        }
    }

    /// Drops the cached requests of a widget whose size was marked outdated.
    pub(crate) fn ensure_resize(&mut self, id: WidgetId) {
        if let Some(state) = self.arena.state_mut(id)
            && state.needs_resize
        {
            state.needs_resize = false;
            state.size_cache.clear();
        }
    }

    pub(crate) fn request_mode_inner(&mut self, id: WidgetId) -> RequestMode {
        let Some(state) = self.arena.state(id) else {
            return RequestMode::ConstantSize;
        };
        if let Some(mode) = state.size_cache.request_mode() {
            return mode;
        }
        let Some(mode) = self.with_widget(id, |widget, tree| {
            let mut ctx = MeasureCtx {
                tree,
                widget_id: id,
            };
            widget.request_mode(&mut ctx)
        }) else {
            return RequestMode::ConstantSize;
        };
        if let Some(state) = self.arena.state_mut(id) {
            state.size_cache.set_request_mode(mode);
        }
        mode
    }

    fn in_size_group(&self, id: WidgetId, orientation: Orientation) -> bool {
        self.arena.state(id).is_some_and(|state| {
            state.size_groups.iter().any(|group| {
                self.size_groups
                    .get(*group)
                    .is_some_and(|g| g.mode.affects(orientation))
            })
        })
    }

    /// Converts `size`, a proposed allocation along `orientation`, into the content
    /// size the widget will actually get.
    fn content_size_for(&mut self, id: WidgetId, orientation: Orientation, size: i32) -> i32 {
        let mut request = self.preferred_size_inner(id, orientation, None);
        let ctx = self.adjust_ctx(id);
        let (mut pos, mut size) = (0, size);
        if let Some(widget) = self.arena.widget(id) {
            widget.adjust_size_allocation(&ctx, orientation, &mut request, &mut pos, &mut size);
        }
        size.max(request.minimum)
    }

    /// The size along `orientation.cross()` that a query along `orientation` is made for,
    /// when the caller didn't give one.
    fn default_contextual_size(
        &mut self,
        id: WidgetId,
        mode: RequestMode,
        orientation: Orientation,
    ) -> Option<i32> {
        if mode == RequestMode::ConstantSize || orientation == mode.native_orientation() {
            return None;
        }
        Some(self.preferred_size_inner(id, orientation.cross(), None).natural)
    }

    /// Calls [`Resizable::measure`](crate::core::Resizable::measure).
    ///
    /// `for_size` is still a proposed allocation: it is converted to content space here.
    fn measure_widget(
        &mut self,
        id: WidgetId,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> Option<SizeRequest> {
        let for_size =
            for_size.map(|size| self.content_size_for(id, orientation.cross(), size));
        self.with_widget(id, |widget, tree| {
            let mut ctx = MeasureCtx {
                tree,
                widget_id: id,
            };
            widget.measure(&mut ctx, orientation, for_size)
        })
    }

    /// The unadjusted, unconstrained request of a size group member.
    fn intrinsic_size(&mut self, id: WidgetId, orientation: Orientation) -> Option<SizeRequest> {
        if self.arena.is_busy(id) {
            return None;
        }
        self.ensure_resize(id);
        let mode = self.request_mode_inner(id);
        let for_size = self.default_contextual_size(id, mode, orientation);
        self.measure_widget(id, orientation, for_size)
    }

    /// The wrapped size query. See [`WidgetTree::preferred_size`].
    pub(crate) fn preferred_size_inner(
        &mut self,
        id: WidgetId,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        let Some(state) = self.arena.state(id) else {
            return SizeRequest::ZERO;
        };
        if !state.is_visible && !state.is_toplevel {
            return SizeRequest::ZERO;
        }
        self.ensure_resize(id);

        let mode = self.request_mode_inner(id);
        let for_size = if mode == RequestMode::ConstantSize
            || orientation == mode.native_orientation()
            || self.in_size_group(id, orientation)
        {
            None
        } else {
            for_size
        };

        if let Some(cached) = self
            .arena
            .state(id)
            .and_then(|s| s.size_cache.get(orientation, for_size))
        {
            return cached;
        }

        if self.arena.is_busy(id) {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!("re-entrant {orientation:?} size query while the widget is being measured"),
            );
            return SizeRequest::ZERO;
        }

        let contextual = match for_size {
            Some(size) => Some(size),
            None => self.default_contextual_size(id, mode, orientation),
        };
        let Some(mut request) = self.measure_widget(id, orientation, contextual) else {
            return SizeRequest::ZERO;
        };
        if request.minimum > request.natural {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!(
                    "measure returned a {orientation:?} minimum of {} above the natural size {}",
                    request.minimum, request.natural
                ),
            );
        }

        if self.in_size_group(id, orientation) {
            request = self.bump_for_size_groups(id, orientation, request);
        }

        let before = request;
        let ctx = self.adjust_ctx(id);
        if let Some(widget) = self.arena.widget(id) {
            widget.adjust_size_request(&ctx, orientation, &mut request);
        }
        if request.minimum < before.minimum || request.natural < before.natural {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                format!(
                    "adjust_size_request shrank the {orientation:?} request from {before:?} to {request:?}"
                ),
            );
            request = before;
        }
        request.natural = request.natural.max(request.minimum);

        if self.settings.debug().contains(DebugFlags::SIZE_REQUEST) {
            debug!(
                widget = id.trace(),
                ?orientation,
                ?for_size,
                minimum = request.minimum,
                natural = request.natural,
                "size request"
            );
        }
        if let Some(state) = self.arena.state_mut(id) {
            state.size_cache.insert(orientation, for_size, request);
        }
        request
    }

    fn bump_for_size_groups(
        &mut self,
        id: WidgetId,
        orientation: Orientation,
        mut request: SizeRequest,
    ) -> SizeRequest {
        let groups = self
            .arena
            .state(id)
            .map(|s| s.size_groups.to_vec())
            .unwrap_or_default();
        let ignore_hidden = self.size_groups.ignores_hidden(&groups, orientation);
        let peers = self.size_groups.peers(id, Some(orientation), |widget| {
            self.arena
                .state(widget)
                .map(|s| s.size_groups.to_vec())
                .unwrap_or_default()
        });
        for peer in peers {
            if peer == id || (ignore_hidden && !self.is_visible(peer)) {
                continue;
            }
            if let Some(peer_request) = self.intrinsic_size(peer, orientation) {
                request = request.max(peer_request);
            }
        }
        request
    }

    /// Minimum and natural sizes, resolved in the order given by the request mode.
    pub(crate) fn preferred_size_pair_inner(&mut self, id: WidgetId) -> (Size, Size) {
        let native = self.request_mode_inner(id).native_orientation();
        let cross = native.cross();
        let native_request = self.preferred_size_inner(id, native, None);
        let cross_minimum = self
            .preferred_size_inner(id, cross, Some(native_request.minimum))
            .minimum;
        let cross_natural = self
            .preferred_size_inner(id, cross, Some(native_request.natural))
            .natural;
        match native {
            Orientation::Horizontal => (
                Size::new(native_request.minimum, cross_minimum),
                Size::new(native_request.natural, cross_natural),
            ),
            Orientation::Vertical => (
                Size::new(cross_minimum, native_request.minimum),
                Size::new(cross_natural, native_request.natural),
            ),
        }
    }
}

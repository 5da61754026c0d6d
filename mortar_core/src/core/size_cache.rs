// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::{Orientation, RequestMode, SizeRequest};

/// How many contextual requests are kept per orientation.
const CONTEXTUAL_CAPACITY: usize = 5;

/// A cached answer for every `for_size` in `lower..=upper`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ContextualEntry {
    lower: i32,
    upper: i32,
    request: SizeRequest,
}

#[derive(Clone, Debug, Default)]
struct OrientationCache {
    unconstrained: Option<SizeRequest>,
    /// Bounded ring of contextual entries.
    contextual: Vec<ContextualEntry>,
    /// Slot replaced next once `contextual` is full.
    next_victim: usize,
}

impl OrientationCache {
    fn get(&self, for_size: Option<i32>) -> Option<SizeRequest> {
        match for_size {
            None => self.unconstrained,
            Some(for_size) => self
                .contextual
                .iter()
                .find(|e| (e.lower..=e.upper).contains(&for_size))
                .map(|e| e.request),
        }
    }

    fn insert(&mut self, for_size: Option<i32>, request: SizeRequest) {
        let Some(for_size) = for_size else {
            self.unconstrained = Some(request);
            return;
        };
        // Identical answers for neighbouring sizes widen a single entry.
        if let Some(entry) = self.contextual.iter_mut().find(|e| e.request == request) {
            entry.lower = entry.lower.min(for_size);
            entry.upper = entry.upper.max(for_size);
            return;
        }
        let entry = ContextualEntry {
            lower: for_size,
            upper: for_size,
            request,
        };
        if self.contextual.len() < CONTEXTUAL_CAPACITY {
            self.contextual.push(entry);
        } else {
            self.contextual[self.next_victim] = entry;
            self.next_victim = (self.next_victim + 1) % CONTEXTUAL_CAPACITY;
        }
    }
}

/// Memoized results of the wrapped size queries of one widget.
///
/// Entries are only valid until the next geometry-affecting mutation;
/// [`WidgetTree::queue_resize`](crate::app::WidgetTree::queue_resize) clears the cache
/// of the widget, its ancestors and its size-group peers.
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeRequestCache {
    request_mode: Option<RequestMode>,
    orientations: [OrientationCache; 2],
}

impl SizeRequestCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn request_mode(&self) -> Option<RequestMode> {
        self.request_mode
    }

    pub(crate) fn set_request_mode(&mut self, mode: RequestMode) {
        self.request_mode = Some(mode);
    }

    pub(crate) fn get(&self, orientation: Orientation, for_size: Option<i32>) -> Option<SizeRequest> {
        self.orientations[orientation.index()].get(for_size)
    }

    pub(crate) fn insert(
        &mut self,
        orientation: Orientation,
        for_size: Option<i32>,
        request: SizeRequest,
    ) {
        self.orientations[orientation.index()].insert(for_size, request);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Internal passes run by the widget tree.
//!
//! Each pass is a group of `impl WidgetTree` blocks with `_inner` methods. Public
//! operations in [`widget_tree`](crate::app::WidgetTree) wrap them in
//! [`WidgetTree::op`], which verifies invariants and flushes notifications once the
//! outermost operation returns. Passes call each other's `_inner` methods directly.
//!
//! This file includes utility functions used by multiple passes.

use tracing::span::EnteredSpan;

use crate::app::WidgetTree;
use crate::core::{DiagnosticKind, Widget, WidgetId, WidgetState};

pub(crate) mod allocate;
pub(crate) mod crossing;
pub(crate) mod hierarchy;
pub(crate) mod lifecycle;
pub(crate) mod measure;
pub(crate) mod state;
pub(crate) mod verify;

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span_if(enabled: bool, state: &WidgetState) -> Option<EnteredSpan> {
    enabled.then(|| enter_span(state))
}

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span(state: &WidgetState) -> EnteredSpan {
    state.trace_span.clone().entered()
}

impl WidgetTree {
    /// Runs `f` with the widget taken out of the arena.
    ///
    /// The rest of the tree stays accessible to `f`, including the widget's own state.
    /// Returns `None` if the widget doesn't exist, or if one of its methods is already
    /// running further up the stack; the latter is reported.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Option<R> {
        if self.arena.is_busy(id) {
            self.report(
                DiagnosticKind::ContractViolation,
                Some(id),
                "re-entrant call into a widget whose method is already running",
            );
            return None;
        }
        let mut widget = self.arena.take_widget(id)?;
        let _span = self.arena.state(id).map(enter_span);
        let result = f(&mut *widget, self);
        self.arena.restore_widget(id, widget);
        Some(result)
    }

    /// A snapshot of the children of `id`, so that traversals survive mutation by
    /// hooks and listeners.
    pub(crate) fn child_snapshot(&self, id: WidgetId, include_internal: bool) -> Vec<WidgetId> {
        let Some(state) = self.arena.state(id) else {
            return Vec::new();
        };
        if include_internal {
            state.child_ids().collect()
        } else {
            state.non_internal_child_ids().collect()
        }
    }
}

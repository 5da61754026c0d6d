// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Deferred invariant checks.
//!
//! Multi-step operations go through states which violate the lifecycle invariants,
//! e.g. a widget is briefly realized before its parent during reparenting.
//! Each step holds a [`VerifyGuard`] for the widget it mutates; a widget is only
//! checked once every guard on it was dropped, and the checks themselves run when
//! the outermost public operation returns.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::app::{DebugFlags, WidgetTree};
use crate::core::{DiagnosticKind, WidgetId};

#[derive(Debug, Default)]
pub(crate) struct InvariantTracker {
    counts: HashMap<WidgetId, u32>,
    /// Widgets whose count went back to zero since the last verification.
    pending: Vec<WidgetId>,
}

/// Marks a widget as being in the middle of a mutation until dropped.
#[must_use = "the widget is only marked while the guard is alive"]
pub(crate) struct VerifyGuard {
    tracker: Rc<RefCell<InvariantTracker>>,
    widget: WidgetId,
}

impl Drop for VerifyGuard {
    fn drop(&mut self) {
        let mut tracker = self.tracker.borrow_mut();
        let count = tracker.counts.entry(self.widget).or_insert(0);
        *count = count.saturating_sub(1);
        if *count == 0 {
            tracker.counts.remove(&self.widget);
            if !tracker.pending.contains(&self.widget) {
                tracker.pending.push(self.widget);
            }
        }
    }
}

impl WidgetTree {
    pub(crate) fn verify_guard(&self, widget: WidgetId) -> VerifyGuard {
        *self
            .invariants
            .borrow_mut()
            .counts
            .entry(widget)
            .or_insert(0) += 1;
        VerifyGuard {
            tracker: self.invariants.clone(),
            widget,
        }
    }

    /// Checks every widget whose guards were all dropped, and their children.
    pub(crate) fn verify_pending(&mut self) {
        let pending = std::mem::take(&mut self.invariants.borrow_mut().pending);
        if !self.settings.debug().contains(DebugFlags::INVARIANTS) {
            return;
        }
        let mut checked = Vec::new();
        for widget in pending {
            if self.invariants.borrow().counts.contains_key(&widget) {
                continue;
            }
            let mut targets = vec![widget];
            targets.extend(self.child_snapshot(widget, true));
            for target in targets {
                if !checked.contains(&target) {
                    checked.push(target);
                    self.verify_widget(target);
                }
            }
        }
    }

    fn verify_widget(&mut self, id: WidgetId) {
        let Some(state) = self.arena.state(id) else {
            return;
        };
        let parent = state.parent.and_then(|p| self.arena.state(p));
        let parent_mapped = parent.is_some_and(|p| p.is_mapped);
        let parent_realized = parent.is_some_and(|p| p.is_realized);

        let mut violations = Vec::new();
        if state.is_mapped {
            if !state.is_visible {
                violations.push("mapped but not visible");
            }
            if !state.is_realized {
                violations.push("mapped but not realized");
            }
            if !state.is_toplevel && !(state.is_child_visible && parent_mapped) {
                violations.push("mapped but its parent is unmapped or hides it");
            }
        } else if !state.is_toplevel && parent_mapped && state.is_visible && state.is_child_visible
        {
            violations.push("visible child of a mapped parent is not mapped");
        }
        if state.is_realized
            && !state.is_toplevel
            && !parent_realized
            && !state.in_reparent
        {
            violations.push("realized but its parent is not");
        }

        for violation in violations {
            self.report(DiagnosticKind::InvariantViolation, Some(id), violation);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::WidgetTree;
    use crate::core::{DiagnosticKind, WidgetId};
    use crate::testing_widgets::{Toplevel, test_tree};

    #[test]
    fn nested_guards_defer_checks() {
        let tree = WidgetTree::new();
        let widget = WidgetId::next();
        let outer = tree.verify_guard(widget);
        let inner = tree.verify_guard(widget);
        drop(inner);
        assert!(tree.invariants.borrow().pending.is_empty());
        drop(outer);
        assert_eq!(tree.invariants.borrow().pending, [widget]);
    }

    #[test]
    fn broken_state_is_reported() {
        let mut tree = test_tree();
        let toplevel = tree.insert(Toplevel);
        let state = tree.arena.state_mut(toplevel).unwrap();
        state.is_mapped = true;
        drop(tree.verify_guard(toplevel));
        tree.verify_pending();

        let kinds: Vec<_> = tree.take_diagnostics().into_iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                DiagnosticKind::InvariantViolation,
                DiagnosticKind::InvariantViolation
            ]
        );
        assert!(tree.invariants.borrow().pending.is_empty());
    }
}

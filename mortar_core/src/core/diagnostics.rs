// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::core::WidgetId;

/// The category of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The caller passed invalid input, e.g. a negative allocation.
    ///
    /// Processing continued with clamped values.
    ContractViolation,
    /// A consistency check failed after an operation completed.
    ///
    /// This indicates a defect in a widget implementation.
    InvariantViolation,
    /// The operation was structurally impossible and was ignored,
    /// e.g. parenting a widget which already has a parent.
    Rejected,
}

/// A non-fatal report of misuse or of an inconsistent widget.
///
/// Engine operations never return errors. Instead, they log the problem with
/// [`tracing::warn!`], record a `Diagnostic`, and degrade gracefully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The widget involved, if any.
    pub widget: Option<WidgetId>,
    /// Human readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.widget {
            Some(id) => write!(f, "{:?} on {id}: {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

/// Collected diagnostics of a widget tree.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        widget: Option<WidgetId>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            widget,
            message: message.into(),
        };
        tracing::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub(crate) fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub(crate) fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

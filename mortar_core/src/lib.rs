// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mortar Core is the widget engine underneath the Mortar toolkit.
//!
//! It keeps a retained tree of widgets consistent while the tree is mutated from the outside
//! and from notification listeners which themselves mutate it:
//!
//! - Two-pass size negotiation, where a widget's height can depend on its width
//!   (height-for-width) or the other way around, with margins, alignment, explicit size
//!   requests and size groups applied on top of each widget's intrinsic size.
//! - Allocation of actual rectangles, with redraw invalidation of the areas that changed.
//! - Propagation of state flags (sensitivity, prelight, selection, ...) down the tree,
//!   including synthesized pointer crossings when a widget under the pointer changes sensitivity.
//! - The show / map / realize lifecycle of each widget and the native surfaces backing it.
//!
//! The engine is embedded by a windowing layer, which it talks to through the
//! [`SurfaceBackend`](backend::SurfaceBackend) trait, and by a styling layer, which it
//! talks to through the [`StyleProvider`](core::StyleProvider) trait.
//! [`HeadlessBackend`](backend::HeadlessBackend) lets the engine run without a display.
//!
//! The entry point is [`WidgetTree`](app::WidgetTree).
//!
//! ## Feedback
//!
//! Misbehaving widgets never make the engine panic. Contract violations are reported
//! as [`Diagnostic`](core::Diagnostic)s, logged through [`tracing`] and kept in the tree,
//! and processing continues with clamped values.
//!
//! Debug output is controlled with the `MORTAR_DEBUG` environment variable;
//! see [`DebugFlags`](app::DebugFlags).

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(missing_debug_implementations, reason = "Deferred: Noisy")]

#[macro_use]
pub mod util;

mod passes;

#[cfg(test)]
mod testing_widgets;

pub mod app;
pub mod backend;
pub mod core;

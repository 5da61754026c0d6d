// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mortar is a retained-mode widget engine with height-for-width geometry negotiation.
//!
//! This crate re-exports the engine from [Mortar Core](mortar_core) and adds the
//! standard widgets built on it:
//!
//! - [`Window`](widgets::Window), a toplevel with its own native surface.
//! - [`Bin`](widgets::Bin), a container whose single child fills it.
//! - [`Filler`](widgets::Filler), a leaf of a fixed or wrapping content size.
//!
//! ## Example
//!
//! ```
//! use mortar::app::WidgetTree;
//! use mortar::widgets::{Bin, Filler, Window};
//!
//! let mut tree = WidgetTree::new();
//! let window = tree.insert(Window::new("Example"));
//! let bin = tree.insert(Bin::new().with_border(4));
//! let filler = tree.insert(Filler::new(40, 20));
//! tree.set_parent(bin, window);
//! tree.set_parent(filler, bin);
//! tree.show_all(window);
//!
//! assert!(tree.is_mapped(filler));
//! assert_eq!(tree.allocation(filler).size(), mortar::core::Size::new(40, 20));
//! ```
//!
//! Widget trees are tested with the harness from `mortar_testing`.

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

pub use mortar_core::{app, backend, core};

pub mod widgets;

#[cfg(test)]
pub(crate) use mortar_testing as testing;

#[cfg(test)]
mod tests;

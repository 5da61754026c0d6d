// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Assertions over lists of recorded items, with readable failure messages.

use std::fmt::{Debug, Write};

/// Checks that at least one item of the given `IntoIterator` matches the given predicate.
#[macro_export]
macro_rules! assert_any {
    ($iter:expr, $pred:expr $(,)?) => {
        $crate::assert_any_inner($iter, $pred)
    };
}

/// Checks that all items of the given `IntoIterator` match the given predicate.
#[macro_export]
macro_rules! assert_all {
    ($iter:expr, $pred:expr $(,)?) => {
        $crate::assert_all_inner($iter, $pred)
    };
}

/// Checks that no item of the given `IntoIterator` matches the given predicate.
#[macro_export]
macro_rules! assert_none {
    ($iter:expr, $pred:expr $(,)?) => {
        $crate::assert_none_inner($iter, $pred)
    };
}

/// Checks that `expected` appears in the given `IntoIterator` in order, possibly with
/// other items in between.
///
/// Useful for notification logs, where a test cares about the relative order of a few
/// notifications but not about everything else the tree reported.
#[macro_export]
macro_rules! assert_in_order {
    ($iter:expr, $expected:expr $(,)?) => {
        $crate::assert_in_order_inner($iter, $expected)
    };
}

const MAX_LISTED: usize = 6;

/// Formats the items for which `listed` returns true, at most [`MAX_LISTED`] of them.
fn list_items<I: IntoIterator>(iter: I, mut listed: impl FnMut(&I::Item) -> bool) -> Option<String>
where
    I::Item: Debug,
{
    let mut contents = String::new();
    let mut count = 0;
    for (i, item) in iter.into_iter().enumerate() {
        if !listed(&item) {
            continue;
        }
        count += 1;
        if count > MAX_LISTED {
            contents.push_str("  ...\n");
            break;
        }
        let _ = writeln!(contents, "  ({i}) {item:?},");
    }
    (count > 0).then_some(contents)
}

#[track_caller]
#[doc(hidden)]
pub fn assert_any_inner<I: IntoIterator>(iter: I, mut pred: impl FnMut(&I::Item) -> bool)
where
    I::Item: Debug,
{
    let mut contents = String::new();
    for item in iter {
        if pred(&item) {
            return;
        }
        let _ = writeln!(contents, "  {item:?},");
    }
    panic!("assertion failed: no item matched predicate in [\n{contents}]");
}

#[track_caller]
#[doc(hidden)]
pub fn assert_all_inner<I: IntoIterator>(iter: I, mut pred: impl FnMut(&I::Item) -> bool)
where
    I::Item: Debug,
{
    if let Some(contents) = list_items(iter, |item| !pred(item)) {
        panic!("assertion failed: items failed to match predicate: [\n{contents}]");
    }
}

#[track_caller]
#[doc(hidden)]
pub fn assert_none_inner<I: IntoIterator>(iter: I, pred: impl FnMut(&I::Item) -> bool)
where
    I::Item: Debug,
{
    if let Some(contents) = list_items(iter, pred) {
        panic!("assertion failed: items matched predicate against expectations: [\n{contents}]");
    }
}

#[track_caller]
#[doc(hidden)]
pub fn assert_in_order_inner<I, T>(iter: I, expected: &[T])
where
    I: IntoIterator,
    I::Item: Debug + PartialEq<T>,
    T: Debug,
{
    let items: Vec<_> = iter.into_iter().collect();
    let mut next = 0;
    for item in &items {
        if next < expected.len() && *item == expected[next] {
            next += 1;
        }
    }
    if next < expected.len() {
        panic!(
            "assertion failed: {:?} not found in order (matched up to {:?}) in {items:?}",
            expected,
            &expected[..next],
        );
    }
}

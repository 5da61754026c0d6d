// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::backend::BackendCall;
use crate::core::{
    Align, DiagnosticKind, Edge, Notification, Rect, RequestMode, Size, SizeGroupMode, SizeRequest,
    TextDirection,
};
use crate::testing::{ModularWidget, TestHarness, assert_all, assert_any};
use crate::widgets::{Bin, Filler, Window};

// ALLOCATION

#[test]
fn adjustments_cannot_leave_the_proposed_area() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new().with_border(4));
    let leaf = harness.insert(ModularWidget::leaf(10, 10).adjust_allocation_fn(
        |_, ctx, orientation, request, pos, size| {
            ctx.default_adjust_size_allocation(orientation, request, pos, size);
            *size += 20;
        },
    ));
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(window);

    assert_eq!(harness.allocation(leaf), Rect::new(4, 4, 10, 10));
    let diagnostics = harness.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InvariantViolation);
    assert_eq!(diagnostics[0].widget, Some(leaf));
}

#[test]
fn same_allocation_twice_does_nothing() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main").with_border(2));
    let leaf = harness.insert(Filler::new(10, 6));
    harness.set_parent(leaf, window);
    harness.show_all(window);
    harness.clear_notifications();
    harness.backend().take_calls();

    let allocation = harness.allocation(window);
    harness.size_allocate(window, allocation);
    assert!(harness.notifications().is_empty());
    assert!(harness.backend().take_calls().is_empty());

    harness.size_allocate(window, Rect::new(0, 0, 40, 30));
    assert_eq!(harness.count_notifications(window, "SizeAllocate"), 1);
    assert_eq!(harness.allocation(leaf), Rect::new(2, 2, 36, 26));
    let surface = harness.surface(window).unwrap();
    assert_any!(harness.backend().take_calls(), |call| *call
        == BackendCall::MoveResize(surface, Rect::new(0, 0, 40, 30)));
    assert_eq!(
        harness.backend().surface(surface).unwrap().rect,
        Rect::new(0, 0, 40, 30)
    );
    harness.assert_no_diagnostics();
}

#[test]
fn collapsed_content_is_one_pixel() {
    let mut harness = TestHarness::create();
    let bin = harness.insert(Bin::new().with_border(10));
    let leaf = harness.insert(Filler::new(4, 4));
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(bin);

    harness.size_allocate(bin, Rect::new(0, 0, 5, 5));
    assert_eq!(harness.allocation(bin), Rect::new(0, 0, 5, 5));
    assert_eq!(harness.allocation(leaf), Rect::new(10, 10, 1, 1));
    // Both the bin and the leaf were given less than they asked for.
    let diagnostics = harness.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_all!(diagnostics, |d| d.kind == DiagnosticKind::ContractViolation);
}

#[test]
fn huge_requests_saturate() {
    let mut harness = TestHarness::create();
    let bin = harness.insert(Bin::new().with_border(3));
    let leaf = harness.insert(Filler::new(4, 4));
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(bin);

    harness.set_size_request(leaf, Some(i32::MAX), None);
    harness.set_margin(leaf, Edge::Left, 5);
    assert_eq!(harness.preferred_width(leaf), SizeRequest::fixed(i32::MAX));
    assert_eq!(harness.preferred_width(bin), SizeRequest::fixed(i32::MAX));
    harness.assert_no_diagnostics();
}

#[test]
fn alignment_inside_a_bin() {
    let mut harness = TestHarness::create();
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(10, 10));
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(bin);

    harness.set_halign(leaf, Align::Center);
    harness.set_valign(leaf, Align::End);
    harness.size_allocate(bin, Rect::new(0, 0, 30, 30));
    assert_eq!(harness.allocation(leaf), Rect::new(10, 20, 10, 10));

    // Start is the right edge in right-to-left layouts.
    harness.set_halign(leaf, Align::Start);
    harness.set_direction(leaf, TextDirection::Rtl);
    harness.size_allocate(bin, Rect::new(0, 0, 30, 30));
    assert_eq!(harness.allocation(leaf), Rect::new(20, 20, 10, 10));
    harness.assert_no_diagnostics();
}

// HEIGHT FOR WIDTH

#[test]
fn window_wraps_its_content() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new().with_border(2));
    let leaf = harness.insert(Filler::wrapping(64));
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(window);

    assert_eq!(harness.request_mode(window), RequestMode::HeightForWidth);
    assert_eq!(
        harness.preferred_size_pair(window),
        (Size::new(12, 12), Size::new(68, 5))
    );
    assert_eq!(harness.allocation(window), Rect::new(0, 0, 68, 5));
    assert_eq!(harness.allocation(leaf), Rect::new(2, 2, 64, 1));

    // A narrow window gets at least the height its content needs at that width,
    // not the height needed at the minimum width.
    harness.set_default_size(window, Some(Size::new(20, 5)));
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(window), Rect::new(0, 0, 20, 8));
    assert_eq!(harness.allocation(leaf), Rect::new(2, 2, 16, 4));

    // Below the minimum width, the width is raised first.
    harness.set_default_size(window, Some(Size::new(4, 1)));
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(window), Rect::new(0, 0, 12, 12));
    assert_eq!(harness.allocation(leaf), Rect::new(2, 2, 8, 8));
    harness.assert_no_diagnostics();
}

#[test]
fn resizes_wait_for_the_next_pass() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let leaf = harness.insert(Filler::new(10, 10));
    harness.set_parent(leaf, window);
    harness.show_all(window);
    harness.clear_notifications();

    harness.set_size_request(leaf, Some(30), None);
    assert!(harness.needs_resize(window));
    assert!(harness.has_pending_resizes());
    assert_eq!(harness.allocation(window).width, 10);

    harness.process_pending_resizes();
    assert!(!harness.has_pending_resizes());
    assert_eq!(harness.allocation(window), Rect::new(0, 0, 30, 10));
    assert_matches!(
        harness.notifications_for(leaf).as_slice(),
        [Notification::SizeAllocate(rect)] if rect.width == 30
    );
    harness.assert_no_diagnostics();
}

// SIZE GROUPS

#[test]
fn size_group_spans_windows() {
    let mut harness = TestHarness::create();
    let first_window = harness.insert(Window::new("first"));
    let second_window = harness.insert(Window::new("second"));
    let narrow = harness.insert(Filler::new(10, 10));
    let wide = harness.insert(Filler::new(40, 5));
    harness.set_parent(narrow, first_window);
    harness.set_parent(wide, second_window);

    let group = harness.create_size_group(SizeGroupMode::Horizontal);
    harness.add_to_size_group(group, narrow);
    harness.add_to_size_group(group, wide);
    assert_eq!(harness.size_group_members(group), [narrow, wide]);
    harness.show_all(first_window);
    harness.show_all(second_window);

    assert_eq!(harness.allocation(first_window), Rect::new(0, 0, 40, 10));
    assert_eq!(harness.allocation(second_window), Rect::new(0, 0, 40, 5));

    // Hidden members still count until the group ignores them.
    harness.hide(wide);
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(first_window).width, 40);
    harness.set_size_group_ignore_hidden(group, true);
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(first_window).width, 10);

    harness.show(wide);
    harness.set_size_group_mode(group, SizeGroupMode::Vertical);
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(first_window), Rect::new(0, 0, 10, 10));
    assert_eq!(harness.allocation(second_window), Rect::new(0, 0, 40, 10));

    harness.destroy_size_group(group);
    harness.process_pending_resizes();
    assert_eq!(harness.allocation(second_window), Rect::new(0, 0, 40, 5));
    assert!(harness.size_group_members(group).is_empty());
    harness.assert_no_diagnostics();
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::backend::ScreenId;
use crate::core::{Edge, Notification, SizeRequest, StateFlags};
use crate::testing::{Record, Recording, TestHarness, TestWidgetExt, assert_in_order, assert_none};
use crate::widgets::{Bin, Filler, Window};

// SHOW

#[test]
fn showing_a_window_maps_every_leaf() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new().with_border(2));
    let filler = harness.insert(Filler::new(10, 10));
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, filler);

    harness.show_all(window);

    for widget in [window, bin, filler] {
        assert!(harness.is_visible(widget));
        assert!(harness.is_realized(widget));
        assert!(harness.is_mapped(widget));
    }
    assert_eq!(harness.count_notifications(filler, "SizeAllocate"), 1);
    let allocation = harness.allocation(filler);
    assert!(allocation.width >= 1 && allocation.height >= 1);
    assert_in_order!(
        harness.notification_names(filler),
        &["Show", "SizeAllocate", "Realize", "Map"]
    );
    harness.assert_no_diagnostics();
}

// SIZE NEGOTIATION

#[test]
fn explicit_request_and_margin_reach_the_caller() {
    let mut harness = TestHarness::create();
    let leaf = harness.insert(Filler::new(10, 10));
    harness.show(leaf);
    harness.set_size_request(leaf, Some(50), Some(30));
    harness.set_margin(leaf, Edge::Left, 5);

    let width = harness.preferred_width(leaf);
    assert!(width.minimum >= 55);
    assert_eq!(width, SizeRequest::fixed(55));

    let height = harness.preferred_height_for_width(leaf, 100);
    assert!(height.minimum >= 30);
    assert!(height.natural >= height.minimum);
    harness.assert_no_diagnostics();
}

#[test]
fn wrapping_leaf_gets_its_width_without_the_margin() {
    let mut harness = TestHarness::create();
    let leaf = harness.insert(Filler::wrapping(400));
    harness.show(leaf);
    harness.set_margin(leaf, Edge::Left, 5);

    assert_eq!(harness.preferred_width(leaf), SizeRequest::new(25, 405));
    assert_eq!(harness.preferred_height_for_width(leaf, 105).minimum, 4);
    // Widths below the minimum are measured at the minimum.
    assert_eq!(harness.preferred_height_for_width(leaf, 10).minimum, 20);
    harness.assert_no_diagnostics();
}

// SENSITIVITY

#[test]
fn insensitive_container_covers_its_descendants() {
    let mut harness = TestHarness::create();
    let outer = harness.insert(Bin::new());
    let inner = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(4, 4));
    Bin::set_child(&mut harness, outer, inner);
    Bin::set_child(&mut harness, inner, leaf);

    harness.set_sensitive(outer, false);
    for widget in [inner, leaf] {
        assert!(!harness.is_sensitive(widget));
        assert!(harness.sensitive(widget));
        assert!(harness.state_flags(widget).contains(StateFlags::INSENSITIVE));
    }

    harness.set_sensitive(outer, true);
    for widget in [outer, inner, leaf] {
        assert!(harness.is_sensitive(widget));
        assert!(!harness.state_flags(widget).contains(StateFlags::INSENSITIVE));
    }
    harness.assert_no_diagnostics();
}

#[test]
fn own_insensitivity_outlives_the_container() {
    let mut harness = TestHarness::create();
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(4, 4));
    Bin::set_child(&mut harness, bin, leaf);

    harness.set_sensitive(bin, false);
    harness.set_sensitive(leaf, false);
    harness.set_sensitive(bin, true);
    assert!(!harness.is_sensitive(leaf));
    assert!(!harness.sensitive(leaf));

    harness.set_sensitive(leaf, true);
    assert!(harness.is_sensitive(leaf));
}

// REPARENT

#[test]
fn moving_a_leaf_between_shown_windows_keeps_it_realized() {
    let recording = Recording::default();
    let mut harness = TestHarness::create();
    let first_window = harness.insert(Window::new("first"));
    let second_window = harness.insert(Window::new("second"));
    let first_bin = harness.insert(Bin::new());
    let second_bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(12, 8).record(&recording));
    harness.set_parent(first_bin, first_window);
    harness.set_parent(second_bin, second_window);
    Bin::set_child(&mut harness, first_bin, leaf);
    harness.show_all(first_window);
    harness.show_all(second_window);
    harness.clear_notifications();
    recording.clear();

    Bin::set_child(&mut harness, second_bin, leaf);

    assert_eq!(harness.parent(leaf), Some(second_bin));
    assert!(harness.is_realized(leaf));
    assert!(harness.is_mapped(leaf));
    assert_eq!(harness.surface(leaf), harness.surface(second_window));

    // The leaf stays anchored and mapped all along: it only learns about its parents.
    assert_eq!(harness.notification_names(leaf), ["ParentSet", "ParentSet"]);
    assert_matches!(
        harness.notifications_for(leaf).as_slice(),
        [
            Notification::ParentSet { previous: Some(previous) },
            Notification::ParentSet { previous: None },
        ] if *previous == first_bin
    );
    assert_none!(recording.drain(), |record| matches!(
        record,
        Record::Realize | Record::Unrealize | Record::HierarchyChanged(_)
    ));

    harness.process_pending_resizes();
    assert_eq!(harness.allocation(leaf).size(), harness.allocation(second_window).size());
    harness.assert_no_diagnostics();
}

#[test]
fn moving_a_leaf_into_a_hidden_bin_unmaps_it() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let shown = harness.insert(Bin::new());
    let hidden = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(3, 3));
    harness.set_parent(shown, window);
    harness.set_parent(hidden, window);
    Bin::set_child(&mut harness, shown, leaf);
    harness.show_all(window);
    harness.hide(hidden);
    assert!(harness.is_realized(hidden));
    harness.clear_notifications();

    Bin::set_child(&mut harness, hidden, leaf);
    assert!(harness.is_realized(leaf));
    assert!(!harness.is_mapped(leaf));
    assert_eq!(
        harness.notification_names(leaf),
        ["Unmap", "ParentSet", "ParentSet"]
    );
    harness.assert_no_diagnostics();
}

#[test]
fn moving_a_leaf_to_another_screen() {
    let mut harness = TestHarness::create();
    let first_window = harness.insert(Window::new("first"));
    let second_window = harness.insert(Window::new("second"));
    let leaf = harness.insert(Filler::new(3, 3));
    harness.set_parent(leaf, first_window);
    harness.set_screen(second_window, ScreenId(1));
    harness.show_all(first_window);
    harness.show_all(second_window);
    let first_screen = harness.screen(first_window);
    harness.clear_notifications();

    harness.reparent(leaf, second_window);
    assert_eq!(harness.screen(leaf), Some(ScreenId(1)));
    assert_eq!(
        harness.notification_names(leaf),
        ["ParentSet", "ParentSet", "ScreenChanged"]
    );
    assert_matches!(
        harness.notifications_for(leaf).last(),
        Some(Notification::ScreenChanged { previous }) if *previous == first_screen
    );
    harness.assert_no_diagnostics();
}

#[test]
fn moving_a_leaf_out_of_the_tree_releases_it() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let detached = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(3, 3));
    harness.set_parent(leaf, window);
    harness.show_all(window);
    harness.clear_notifications();

    Bin::set_child(&mut harness, detached, leaf);
    assert!(!harness.is_realized(leaf));
    assert!(!harness.is_anchored(leaf));
    assert_eq!(harness.surface(leaf), None);
    assert_in_order!(
        harness.notification_names(leaf),
        &["Unmap", "Unrealize", "ParentSet", "ParentSet"]
    );
    harness.assert_no_diagnostics();
}

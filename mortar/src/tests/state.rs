// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::{
    CrossingKind, CrossingMode, DiagnosticKind, Notification, NotifyDetail, StateFlags, StateType,
    WidgetId,
};
use crate::testing::{TestHarness, assert_none};
use crate::widgets::{Bin, Filler, Window};

fn crossings(harness: &mut TestHarness) -> Vec<(WidgetId, CrossingKind, NotifyDetail)> {
    harness
        .take_notifications()
        .into_iter()
        .filter_map(|(widget, notification)| match notification {
            Notification::Crossing(crossing) => Some((widget, crossing.kind, crossing.detail)),
            _ => None,
        })
        .collect()
}

// SENSITIVITY

#[test]
fn repeating_a_sensitivity_change_is_silent() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(5, 5));
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(window);

    harness.set_sensitive(bin, false);
    assert_eq!(harness.state_type(leaf), StateType::Insensitive);
    assert_eq!(harness.state_type(window), StateType::Normal);
    harness.clear_notifications();

    harness.set_sensitive(bin, false);
    assert!(harness.notifications().is_empty());

    harness.set_sensitive(bin, true);
    assert_eq!(harness.count_notifications(leaf, "StateFlagsChanged"), 1);
    assert_eq!(harness.count_notifications(leaf, "StateChanged"), 1);
    harness.assert_no_diagnostics();
}

#[test]
fn state_flags_reach_descendants() {
    let mut harness = TestHarness::create();
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(5, 5));
    Bin::set_child(&mut harness, bin, leaf);

    harness.set_state_flags(bin, StateFlags::PRELIGHT, false);
    assert!(harness.state_flags(leaf).contains(StateFlags::PRELIGHT));
    assert_eq!(harness.state_type(leaf), StateType::Prelight);

    // Setting INSENSITIVE as a flag doesn't touch the widget's own sensitivity.
    harness.set_state_flags(bin, StateFlags::INSENSITIVE, true);
    assert!(!harness.is_sensitive(leaf));
    assert!(harness.sensitive(bin));
    assert!(!harness.state_flags(leaf).contains(StateFlags::PRELIGHT));

    harness.unset_state_flags(bin, StateFlags::INSENSITIVE);
    assert!(harness.is_sensitive(leaf));
    harness.assert_no_diagnostics();
}

// FOCUS

#[test]
fn focus_moves_and_follows_sensitivity() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new());
    let first = harness.insert(Filler::new(5, 5).focusable());
    let second = harness.insert(Filler::new(5, 5).focusable());
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, first);
    harness.set_parent(second, window);
    harness.show_all(window);

    harness.grab_focus(first);
    assert_eq!(harness.focus_widget(window), Some(first));
    assert_eq!(harness.focus_child(window), Some(bin));
    assert_eq!(harness.focus_child(bin), Some(first));
    assert!(harness.has_focus(first));
    // Focus is the only flag children don't inherit.
    assert!(!harness.has_focus(bin));

    harness.grab_focus(second);
    assert!(!harness.has_focus(first));
    assert!(harness.is_focus(second));
    assert_eq!(harness.focus_child(bin), None);
    assert_eq!(harness.focus_child(window), Some(second));

    harness.set_sensitive(window, false);
    assert_eq!(harness.focus_widget(window), None);
    assert!(!harness.has_focus(second));
    harness.assert_no_diagnostics();

    harness.grab_focus(second);
    let diagnostics = harness.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::Rejected);
}

#[test]
fn hiding_the_focus_branch_clears_focus() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(5, 5).focusable());
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(window);
    harness.grab_focus(leaf);

    harness.hide(bin);
    assert_eq!(harness.focus_widget(window), None);
    assert!(!harness.has_focus(leaf));
    harness.assert_no_diagnostics();
}

// GRABS

#[test]
fn grabs_shadow_other_windows() {
    let mut harness = TestHarness::create();
    let main = harness.insert(Window::new("main"));
    let dialog = harness.insert(Window::new("dialog"));
    let leaf = harness.insert(Filler::new(5, 5));
    let button = harness.insert(Filler::new(5, 5));
    harness.set_parent(leaf, main);
    harness.set_parent(button, dialog);
    harness.show_all(main);
    harness.show_all(dialog);

    harness.grab_add(dialog);
    assert_eq!(harness.current_grab(), Some(dialog));
    assert!(harness.is_shadowed(leaf));
    assert!(!harness.is_shadowed(button));

    // An insensitive widget loses its grab.
    harness.set_sensitive(dialog, false);
    assert_eq!(harness.current_grab(), None);
    assert!(!harness.is_shadowed(leaf));
    harness.assert_no_diagnostics();
}

// CROSSINGS

#[test]
fn crossings_into_a_child_surface_mirror_each_other() {
    let mut harness = TestHarness::create();
    let window = harness.insert(Window::new("main"));
    let bin = harness.insert(Bin::new());
    let leaf = harness.insert(Filler::new(5, 5));
    harness.set_has_own_surface(bin, true);
    harness.set_parent(bin, window);
    Bin::set_child(&mut harness, bin, leaf);
    harness.show_all(window);
    harness.place_pointer_over(Some(bin));
    harness.clear_notifications();

    let pointer = TestHarness::POINTER;
    harness.synthesize_crossing(Some(bin), Some(window), pointer, CrossingMode::Normal);
    let out = crossings(&mut harness);
    assert_eq!(
        out,
        [
            (bin, CrossingKind::Leave, NotifyDetail::Ancestor),
            (window, CrossingKind::Enter, NotifyDetail::Inferior),
        ]
    );

    harness.synthesize_crossing(Some(window), Some(bin), pointer, CrossingMode::Normal);
    let back = crossings(&mut harness);
    let mirrored: Vec<_> = out
        .iter()
        .rev()
        .map(|(widget, kind, detail)| {
            let kind = match kind {
                CrossingKind::Enter => CrossingKind::Leave,
                CrossingKind::Leave => CrossingKind::Enter,
            };
            (*widget, kind, *detail)
        })
        .collect();
    assert_eq!(back, mirrored);
    harness.assert_no_diagnostics();
}

#[test]
fn crossings_between_windows_are_nonlinear() {
    let mut harness = TestHarness::create();
    let first = harness.insert(Window::new("first"));
    let second = harness.insert(Window::new("second"));
    let first_leaf = harness.insert(Filler::new(5, 5));
    let second_leaf = harness.insert(Filler::new(5, 5));
    harness.set_parent(first_leaf, first);
    harness.set_parent(second_leaf, second);
    harness.show_all(first);
    harness.show_all(second);
    harness.clear_notifications();

    harness.synthesize_crossing(
        Some(first_leaf),
        Some(second_leaf),
        TestHarness::POINTER,
        CrossingMode::Grab,
    );
    assert_eq!(
        crossings(&mut harness),
        [
            (first_leaf, CrossingKind::Leave, NotifyDetail::Nonlinear),
            (second_leaf, CrossingKind::Enter, NotifyDetail::Nonlinear),
        ]
    );

    // Widgets without a surface take no part in crossings.
    let detached = harness.insert(Filler::new(5, 5));
    harness.synthesize_crossing(
        Some(detached),
        None,
        TestHarness::POINTER,
        CrossingMode::Normal,
    );
    assert_none!(harness.notifications(), |(_, n)| matches!(
        n,
        Notification::Crossing(_)
    ));
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tools and infrastructure for testing widget trees.

use std::cell::RefCell;
use std::fmt::Write;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use tracing::debug;

use mortar_core::app::{
    DebugFlags, Settings, SettingsHandle, TreeOptions, WidgetTree, try_init_test_tracing,
};
use mortar_core::backend::{DeviceId, HeadlessBackend, SurfaceId};
use mortar_core::core::{
    DefaultStyleProvider, Diagnostic, Handled, Notification, StyleProvider, SubscriptionId,
    TextDirection, WidgetId,
};

type NotificationLog = Rc<RefCell<Vec<(WidgetId, Notification)>>>;

/// A safe headless environment to test widgets in.
///
/// `TestHarness` owns a [`WidgetTree`] and dereferences to it, so every operation of the
/// tree can be called on the harness directly.
///
/// ## Workflow
///
/// - Create a harness, insert widgets and link them.
/// - Run operations on the tree as the embedding toolkit would.
/// - Check the state of the tree, the notifications it delivered, the calls it made on
///   the backend and the diagnostics it reported.
///
/// ## Isolation
///
/// Each harness has its own [`Settings`], so tests changing the default direction don't
/// affect each other. Invariant checks are always enabled, and their failures show up
/// in [`diagnostics`](WidgetTree::diagnostics); most tests end with
/// [`assert_no_diagnostics`](Self::assert_no_diagnostics).
///
/// ## Example
///
/// ```
/// use mortar_core::core::Notification;
/// use mortar_testing::{ModularWidget, TestHarness};
///
/// let mut harness = TestHarness::create();
/// let window = harness.insert(ModularWidget::new(()).toplevel(true));
/// harness.show(window);
///
/// assert_eq!(
///     harness.notification_names(window),
///     ["Show", "Realize", "SizeAllocate", "Map"]
/// );
/// ```
pub struct TestHarness {
    tree: WidgetTree,
    backend: HeadlessBackend,
    settings: SettingsHandle,
    log: NotificationLog,
    subscription: SubscriptionId,
}

/// Parameters for creating a [`TestHarness`].
#[non_exhaustive]
pub struct TestHarnessParams {
    /// The default text direction of the harness' settings.
    /// Defaults to [`TextDirection::Ltr`].
    pub default_direction: TextDirection,
    /// Debug flags on top of [`DebugFlags::INVARIANTS`], which is always set.
    /// Defaults to none.
    pub debug: DebugFlags,
    /// The style provider of the tree.
    /// Defaults to [`DefaultStyleProvider`].
    pub style: Box<dyn StyleProvider>,
    /// Pointer devices the backend starts with, in addition to [`TestHarness::POINTER`].
    pub extra_devices: Vec<DeviceId>,
}

impl Default for TestHarnessParams {
    fn default() -> Self {
        Self {
            default_direction: TextDirection::Ltr,
            debug: DebugFlags::empty(),
            style: Box::new(DefaultStyleProvider::new()),
            extra_devices: Vec::new(),
        }
    }
}

impl TestHarness {
    /// The pointer device every harness starts with.
    pub const POINTER: DeviceId = DeviceId(0);

    /// Builds a harness with default parameters.
    pub fn create() -> Self {
        Self::create_with(TestHarnessParams::default())
    }

    /// Builds a harness with the given parameters.
    pub fn create_with(params: TestHarnessParams) -> Self {
        let _ = try_init_test_tracing();

        let TestHarnessParams {
            default_direction,
            debug,
            style,
            extra_devices,
        } = params;
        let backend = HeadlessBackend::new();
        for device in extra_devices {
            backend.add_device(device);
        }
        let settings = SettingsHandle::new(Settings {
            default_direction,
            debug: debug | DebugFlags::INVARIANTS,
            ..Settings::new()
        });
        let mut tree = WidgetTree::with_options(TreeOptions {
            backend: Box::new(backend.clone()),
            style,
            settings: settings.clone(),
        });

        let log = NotificationLog::default();
        let log_clone = log.clone();
        let subscription = tree.subscribe(None, move |_, widget, notification| {
            log_clone.borrow_mut().push((widget, *notification));
            Handled::No
        });

        Self {
            tree,
            backend,
            settings,
            log,
            subscription,
        }
    }

    // --- MARK: GETTERS

    /// The tree under test.
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The tree under test, mutably.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// A handle to the backend of the tree, to inspect surfaces and recorded calls.
    pub fn backend(&self) -> &HeadlessBackend {
        &self.backend
    }

    /// The settings of this harness, which no other tree shares.
    pub fn harness_settings(&self) -> &SettingsHandle {
        &self.settings
    }

    // --- MARK: NOTIFICATIONS

    /// Every notification delivered since the harness was created or last cleared.
    pub fn notifications(&self) -> Vec<(WidgetId, Notification)> {
        self.log.borrow().clone()
    }

    /// The notifications delivered about `widget`, in order.
    pub fn notifications_for(&self, widget: WidgetId) -> Vec<Notification> {
        self.log
            .borrow()
            .iter()
            .filter(|(id, _)| *id == widget)
            .map(|(_, n)| *n)
            .collect()
    }

    /// The names of the notifications delivered about `widget`, in order.
    ///
    /// See [`Notification::short_name`].
    pub fn notification_names(&self, widget: WidgetId) -> Vec<&'static str> {
        self.log
            .borrow()
            .iter()
            .filter(|(id, _)| *id == widget)
            .map(|(_, n)| n.short_name())
            .collect()
    }

    /// How many notifications named `name` were delivered about `widget`.
    pub fn count_notifications(&self, widget: WidgetId, name: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|(id, n)| *id == widget && n.short_name() == name)
            .count()
    }

    /// Returns and forgets the recorded notifications.
    pub fn take_notifications(&mut self) -> Vec<(WidgetId, Notification)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Forgets the recorded notifications.
    pub fn clear_notifications(&mut self) {
        self.log.borrow_mut().clear();
    }

    /// Stops recording notifications.
    ///
    /// Listeners registered afterwards are then the only ones the tree calls.
    pub fn stop_recording(&mut self) {
        self.tree.unsubscribe(self.subscription);
    }

    // --- MARK: POINTER

    /// Places the harness pointer over the surface of `widget`, or nowhere.
    pub fn place_pointer_over(&mut self, widget: Option<WidgetId>) {
        let surface = widget.and_then(|w| self.tree.surface(w));
        self.place_pointer(Self::POINTER, surface);
    }

    /// Places a pointer device over `surface`, or nowhere.
    pub fn place_pointer(&mut self, device: DeviceId, surface: Option<SurfaceId>) {
        debug!(?device, ?surface, "placing pointer");
        self.backend.place_pointer(device, surface);
    }

    // --- MARK: DIAGNOSTICS

    /// Panics with the list of diagnostics if the tree reported any.
    #[track_caller]
    pub fn assert_no_diagnostics(&self) {
        let diagnostics = self.tree.diagnostics();
        if diagnostics.is_empty() {
            return;
        }
        let mut list = String::new();
        for diagnostic in diagnostics {
            let _ = writeln!(list, "  {diagnostic}");
        }
        panic!(
            "assertion failed: the tree reported {} diagnostics:\n{list}",
            diagnostics.len()
        );
    }

    /// Returns and forgets the diagnostics reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.tree.take_diagnostics()
    }
}

impl Deref for TestHarness {
    type Target = WidgetTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl DerefMut for TestHarness {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tree
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mortar_core::core::{DiagnosticKind, Notification, TextDirection};

    use super::*;
    use crate::ModularWidget;

    #[test]
    fn harnesses_are_isolated() {
        let mut first = TestHarness::create();
        let second = TestHarness::create();
        first.set_default_direction(TextDirection::Rtl);
        assert_eq!(first.default_direction(), TextDirection::Rtl);
        assert_eq!(second.default_direction(), TextDirection::Ltr);
        assert!(
            !first
                .harness_settings()
                .ptr_eq(second.harness_settings())
        );
    }

    #[test]
    fn records_notifications() {
        let mut harness = TestHarness::create();
        let window = harness.insert(ModularWidget::new(()).toplevel(true));
        harness.show(window);
        assert_eq!(harness.count_notifications(window, "Map"), 1);
        assert_matches!(harness.notifications_for(window)[0], Notification::Show);

        harness.clear_notifications();
        harness.stop_recording();
        harness.hide(window);
        assert!(harness.notifications().is_empty());
    }

    #[test]
    #[should_panic(expected = "diagnostics")]
    fn diagnostics_fail_the_assertion() {
        let mut harness = TestHarness::create();
        let window = harness.insert(ModularWidget::new(()).toplevel(true));
        harness.set_child_visible(window, false);
        assert_eq!(harness.diagnostics()[0].kind, DiagnosticKind::Rejected);
        harness.assert_no_diagnostics();
    }
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Minimal widgets for the unit tests of this crate.
//!
//! The full test toolkit lives in `mortar_testing`, which depends on this crate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{DebugFlags, Settings, SettingsHandle, TreeOptions, WidgetTree};
use crate::backend::HeadlessBackend;
use crate::core::{
    DefaultStyleProvider, Handled, MeasureCtx, Notification, Orientation, Realizable,
    RequestMode, Resizable, SizeRequest, Stateful, Widget, WidgetId,
};

pub(crate) type NotificationLog = Rc<RefCell<Vec<(WidgetId, Notification)>>>;

/// A tree with isolated settings and invariant checks enabled, and a handle to its backend.
pub(crate) fn test_tree_with_backend() -> (WidgetTree, HeadlessBackend) {
    let backend = HeadlessBackend::new();
    let settings = Settings {
        debug: DebugFlags::INVARIANTS,
        ..Settings::new()
    };
    let tree = WidgetTree::with_options(TreeOptions {
        backend: Box::new(backend.clone()),
        style: Box::new(DefaultStyleProvider::new()),
        settings: SettingsHandle::new(settings),
    });
    (tree, backend)
}

pub(crate) fn test_tree() -> WidgetTree {
    test_tree_with_backend().0
}

/// Records every notification delivered from now on.
pub(crate) fn record_notifications(tree: &mut WidgetTree) -> NotificationLog {
    let log = NotificationLog::default();
    let log_clone = log.clone();
    tree.subscribe(None, move |_, widget, notification| {
        log_clone.borrow_mut().push((widget, *notification));
        Handled::No
    });
    log
}

/// The notifications of `log` about `widget`, by short name.
pub(crate) fn names_for(log: &NotificationLog, widget: WidgetId) -> Vec<&'static str> {
    log.borrow()
        .iter()
        .filter(|(id, _)| *id == widget)
        .map(|(_, n)| n.short_name())
        .collect()
}

/// A toplevel which stacks its children.
pub(crate) struct Toplevel;

impl Resizable for Toplevel {}
impl Realizable for Toplevel {}
impl Stateful for Toplevel {}
impl Widget for Toplevel {
    fn is_toplevel(&self) -> bool {
        true
    }
}

/// A container which stacks its children.
pub(crate) struct Stack {
    pub(crate) own_surface: bool,
}

impl Resizable for Stack {}
impl Realizable for Stack {}
impl Stateful for Stack {}
impl Widget for Stack {
    fn has_own_surface(&self) -> bool {
        self.own_surface
    }
}

/// A leaf with a fixed content size, or a wrapping one trading width for height.
pub(crate) enum Leaf {
    Fixed { width: SizeRequest, height: SizeRequest },
    /// Content of `area` pixels, at least `min_width` wide.
    Wrapping { area: i32, min_width: i32 },
}

impl Leaf {
    pub(crate) fn fixed(width: i32, height: i32) -> Self {
        Self::Fixed {
            width: SizeRequest::fixed(width),
            height: SizeRequest::fixed(height),
        }
    }
}

impl Resizable for Leaf {
    fn request_mode(&mut self, _ctx: &mut MeasureCtx<'_>) -> RequestMode {
        match self {
            Self::Fixed { .. } => RequestMode::ConstantSize,
            Self::Wrapping { .. } => RequestMode::HeightForWidth,
        }
    }

    fn measure(
        &mut self,
        _ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        match (&*self, orientation) {
            (Self::Fixed { width, .. }, Orientation::Horizontal) => *width,
            (Self::Fixed { height, .. }, Orientation::Vertical) => *height,
            (Self::Wrapping { area, min_width }, Orientation::Horizontal) => {
                SizeRequest::new(*min_width, *area)
            }
            (Self::Wrapping { area, min_width }, Orientation::Vertical) => {
                let width = for_size.unwrap_or(*area).max(*min_width).max(1);
                let height = (area + width - 1) / width;
                SizeRequest::fixed(height)
            }
        }
    }
}

impl Realizable for Leaf {}
impl Stateful for Leaf {}
impl Widget for Leaf {}

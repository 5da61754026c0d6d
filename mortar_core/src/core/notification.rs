// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::backend::{DeviceId, ScreenId, SurfaceId};
use crate::core::{Allocation, Rect, StateFlags, StateType, TextDirection, WidgetId};

/// Return value of notification listeners.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Handled {
    /// An event was already handled, and shouldn't be propagated to other listeners.
    Yes,
    /// An event has not yet been handled.
    No,
}

impl Handled {
    /// Has the event been handled yet?
    pub fn is_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    /// Returns `Handled::Yes` if `handled` is true, and `Handled::No` otherwise.
    fn from(handled: bool) -> Self {
        if handled { Self::Yes } else { Self::No }
    }
}

/// Identifies a listener registered with [`WidgetTree::subscribe`](crate::app::WidgetTree::subscribe).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Whether the pointer entered or left a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingKind {
    /// The pointer entered the surface.
    Enter,
    /// The pointer left the surface.
    Leave,
}

/// Why a crossing happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingMode {
    /// The pointer moved.
    Normal,
    /// A windowing system grab started.
    Grab,
    /// A windowing system grab ended.
    Ungrab,
    /// A toolkit grab started.
    GtkGrab,
    /// A toolkit grab ended.
    GtkUngrab,
    /// The sensitivity of the widget under the pointer changed.
    StateChanged,
}

/// How the surface receiving a crossing relates to the other end of the transition.
///
/// These follow the conventions of native windowing systems, so listeners can't
/// distinguish a synthesized crossing from a real one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotifyDetail {
    /// The other surface is an ancestor of this one.
    Ancestor,
    /// This surface lies strictly between the two ends, which are related.
    Virtual,
    /// The other surface is a descendant of this one.
    Inferior,
    /// The two ends are unrelated, and this surface is one of them.
    Nonlinear,
    /// The two ends are unrelated, and this surface lies between one of them
    /// and their common ancestor.
    NonlinearVirtual,
}

/// A pointer enter or leave notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CrossingEvent {
    /// Enter or leave.
    pub kind: CrossingKind,
    /// The surface the pointer entered or left.
    pub surface: SurfaceId,
    /// The pointer device.
    pub device: DeviceId,
    /// Why the crossing happened.
    pub mode: CrossingMode,
    /// How `surface` relates to the other end.
    pub detail: NotifyDetail,
}

/// The kind of an input event routed to a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// A pointer button was pressed.
    ButtonPress,
    /// A pointer button was released.
    ButtonRelease,
    /// A key was pressed.
    KeyPress,
    /// A key was released.
    KeyRelease,
    /// The pointer moved.
    Motion,
    /// A scroll wheel or gesture.
    Scroll,
}

/// An input event delivered through [`WidgetTree::send_event`](crate::app::WidgetTree::send_event).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputEvent {
    /// What happened.
    pub kind: InputKind,
    /// The device it came from.
    pub device: Option<DeviceId>,
}

/// Something that happened to a widget, published to the listeners of the tree.
///
/// Most notifications are queued while an operation runs and delivered once the tree
/// is consistent again. [`Draw`](Self::Draw), [`Event`](Self::Event) and
/// [`MnemonicActivate`](Self::MnemonicActivate) are delivered immediately instead,
/// and stop at the first listener which returns [`Handled::Yes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    /// The widget became visible.
    Show,
    /// The widget became invisible.
    Hide,
    /// The widget was mapped.
    Map,
    /// The widget was unmapped.
    Unmap,
    /// The widget was realized.
    Realize,
    /// The widget was unrealized.
    Unrealize,
    /// A new allocation was committed.
    SizeAllocate(Allocation),
    /// The [`StateType`] summary may have changed.
    StateChanged {
        /// The summary before the change.
        previous: StateType,
    },
    /// The state flags changed.
    StateFlagsChanged {
        /// The flags before the change.
        previous: StateFlags,
    },
    /// The widget was attached to or detached from a parent.
    ParentSet {
        /// The parent before the change, `None` if the widget was attached.
        previous: Option<WidgetId>,
    },
    /// The widget became anchored or stopped being anchored.
    HierarchyChanged {
        /// The toplevel the widget was anchored to before the change.
        previous_toplevel: Option<WidgetId>,
    },
    /// The widget moved to a different screen.
    ScreenChanged {
        /// The screen before the change.
        previous: Option<ScreenId>,
    },
    /// The effective text direction changed.
    DirectionChanged {
        /// The effective direction before the change.
        previous: TextDirection,
    },
    /// The style of the widget was invalidated.
    StyleUpdated,
    /// The pointer entered or left one of the widget's surfaces.
    Crossing(CrossingEvent),
    /// The widget was destroyed and removed from the tree.
    Destroy,
    /// The given area of the widget should be drawn.
    Draw(Rect),
    /// An input event.
    Event(InputEvent),
    /// The mnemonic of the widget was activated.
    MnemonicActivate {
        /// Whether several widgets share the mnemonic.
        group_cycling: bool,
    },
}

impl Notification {
    /// Whether the notification is delivered synchronously and stops at the
    /// first listener which handles it.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            Self::Draw(_) | Self::Event(_) | Self::MnemonicActivate { .. }
        )
    }

    /// A short name, used in logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Show => "Show",
            Self::Hide => "Hide",
            Self::Map => "Map",
            Self::Unmap => "Unmap",
            Self::Realize => "Realize",
            Self::Unrealize => "Unrealize",
            Self::SizeAllocate(_) => "SizeAllocate",
            Self::StateChanged { .. } => "StateChanged",
            Self::StateFlagsChanged { .. } => "StateFlagsChanged",
            Self::ParentSet { .. } => "ParentSet",
            Self::HierarchyChanged { .. } => "HierarchyChanged",
            Self::ScreenChanged { .. } => "ScreenChanged",
            Self::DirectionChanged { .. } => "DirectionChanged",
            Self::StyleUpdated => "StyleUpdated",
            Self::Crossing(_) => "Crossing",
            Self::Destroy => "Destroy",
            Self::Draw(_) => "Draw",
            Self::Event(_) => "Event",
            Self::MnemonicActivate { .. } => "MnemonicActivate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handled_from_bool() {
        assert!(Handled::from(true).is_handled());
        assert!(!Handled::from(false).is_handled());
    }

    #[test]
    fn boolean_notifications() {
        assert!(Notification::MnemonicActivate { group_cycling: false }.is_boolean());
        assert!(Notification::Draw(Rect::new(0, 0, 1, 1)).is_boolean());
        assert!(!Notification::Show.is_boolean());
        assert!(!Notification::SizeAllocate(Rect::DEGENERATE).is_boolean());
    }
}

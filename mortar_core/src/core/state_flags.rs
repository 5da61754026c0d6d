// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use bitflags::bitflags;

bitflags! {
    /// The interaction state of a widget, as seen by styling and by its descendants.
    ///
    /// All flags except [`FOCUSED`](Self::FOCUSED) propagate from a widget to its children.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u8 {
        /// The widget does not respond to input, either itself or through an ancestor.
        const INSENSITIVE = 1 << 0;
        /// The widget is being activated, e.g. a pressed button.
        const ACTIVE = 1 << 1;
        /// The pointer hovers the widget.
        const PRELIGHT = 1 << 2;
        /// The widget is selected.
        const SELECTED = 1 << 3;
        /// The widget shows a mixed value, e.g. a partially checked checkbox.
        const INCONSISTENT = 1 << 4;
        /// The widget has keyboard focus.
        const FOCUSED = 1 << 5;
    }
}

impl StateFlags {
    /// The flags which flow from a parent to its children.
    pub const DO_PROPAGATE: Self = Self::all().difference(Self::FOCUSED);
}

/// The legacy single-valued summary of [`StateFlags`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StateType {
    /// None of the other states apply.
    #[default]
    Normal,
    /// The widget is being activated.
    Active,
    /// The pointer hovers the widget.
    Prelight,
    /// The widget is selected.
    Selected,
    /// The widget does not respond to input.
    Insensitive,
}

impl From<StateFlags> for StateType {
    fn from(flags: StateFlags) -> Self {
        if flags.contains(StateFlags::INSENSITIVE) {
            Self::Insensitive
        } else if flags.contains(StateFlags::ACTIVE) {
            Self::Active
        } else if flags.contains(StateFlags::SELECTED) {
            Self::Selected
        } else if flags.contains(StateFlags::PRELIGHT) {
            Self::Prelight
        } else {
            Self::Normal
        }
    }
}

/// How [`StateChange::flags`] combine with a widget's current flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateOperation {
    /// The flags become the widget's flags.
    Replace,
    /// The flags are added.
    Set,
    /// The flags are removed.
    Unset,
}

/// A request to change the state flags of a widget and its descendants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateChange {
    /// The flags to apply.
    pub flags: StateFlags,
    /// How to apply them.
    pub operation: StateOperation,
    /// Whether internal children are traversed too.
    ///
    /// Set for sensitivity changes, which must reach every descendant.
    pub use_forall: bool,
}

impl StateChange {
    /// Splits the change into the flags to add and the flags to remove.
    pub(crate) fn delta(&self) -> StateDelta {
        match self.operation {
            StateOperation::Replace => StateDelta {
                set: self.flags,
                unset: self.flags.complement(),
            },
            StateOperation::Set => StateDelta {
                set: self.flags,
                unset: StateFlags::empty(),
            },
            StateOperation::Unset => StateDelta {
                set: StateFlags::empty(),
                unset: self.flags,
            },
        }
    }
}

/// The flags a propagation step adds and removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StateDelta {
    pub(crate) set: StateFlags,
    pub(crate) unset: StateFlags,
}

impl StateDelta {
    pub(crate) fn apply(&self, current: StateFlags) -> StateFlags {
        (current | self.set) - self.unset
    }

    /// The delta sent to children: non-propagating flags are left alone.
    pub(crate) fn for_children(&self) -> Self {
        Self {
            set: self.set & StateFlags::DO_PROPAGATE,
            unset: self.unset & StateFlags::DO_PROPAGATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_is_not_propagated() {
        assert!(!StateFlags::DO_PROPAGATE.contains(StateFlags::FOCUSED));
        assert!(StateFlags::DO_PROPAGATE.contains(StateFlags::INSENSITIVE | StateFlags::PRELIGHT));

        let change = StateChange {
            flags: StateFlags::FOCUSED | StateFlags::SELECTED,
            operation: StateOperation::Replace,
            use_forall: false,
        };
        let delta = change.delta().for_children();
        assert_eq!(delta.set, StateFlags::SELECTED);
        // A replace on the parent must not clear a child's focus.
        assert!(!delta.unset.contains(StateFlags::FOCUSED));
        let child = StateFlags::FOCUSED | StateFlags::ACTIVE;
        assert_eq!(delta.apply(child), StateFlags::FOCUSED | StateFlags::SELECTED);
    }

    #[test]
    fn state_type_priority() {
        let all = StateFlags::all();
        assert_eq!(StateType::from(all), StateType::Insensitive);
        assert_eq!(
            StateType::from(StateFlags::PRELIGHT | StateFlags::SELECTED),
            StateType::Selected
        );
        assert_eq!(
            StateType::from(StateFlags::PRELIGHT | StateFlags::ACTIVE),
            StateType::Active
        );
        assert_eq!(StateType::from(StateFlags::FOCUSED), StateType::Normal);
    }

    #[test]
    fn operations() {
        let current = StateFlags::ACTIVE | StateFlags::PRELIGHT;
        let change = |operation| StateChange {
            flags: StateFlags::PRELIGHT | StateFlags::SELECTED,
            operation,
            use_forall: false,
        };
        assert_eq!(
            change(StateOperation::Replace).delta().apply(current),
            StateFlags::PRELIGHT | StateFlags::SELECTED
        );
        assert_eq!(
            change(StateOperation::Set).delta().apply(current),
            StateFlags::ACTIVE | StateFlags::PRELIGHT | StateFlags::SELECTED
        );
        assert_eq!(change(StateOperation::Unset).delta().apply(current), StateFlags::ACTIVE);
    }
}

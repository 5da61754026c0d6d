// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use hashbrown::{HashMap, HashSet};

use crate::core::{Orientation, WidgetId};

/// Identifies a size group created by [`WidgetTree::create_size_group`](crate::app::WidgetTree::create_size_group).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SizeGroupId(pub(crate) u32);

/// The orientations a size group equalizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeGroupMode {
    /// The group has no effect.
    None,
    /// Members share the same width request.
    #[default]
    Horizontal,
    /// Members share the same height request.
    Vertical,
    /// Members share both width and height requests.
    Both,
}

impl SizeGroupMode {
    /// Whether the mode constrains `orientation`.
    pub fn affects(self, orientation: Orientation) -> bool {
        matches!(
            (self, orientation),
            (Self::Both, _)
                | (Self::Horizontal, Orientation::Horizontal)
                | (Self::Vertical, Orientation::Vertical)
        )
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct SizeGroup {
    pub(crate) mode: SizeGroupMode,
    pub(crate) ignore_hidden: bool,
    pub(crate) members: Vec<WidgetId>,
}

/// All size groups of a tree. Widgets list their groups in their state.
#[derive(Debug, Default)]
pub(crate) struct SizeGroups {
    groups: HashMap<SizeGroupId, SizeGroup>,
    next_id: u32,
}

impl SizeGroups {
    pub(crate) fn create(&mut self, mode: SizeGroupMode) -> SizeGroupId {
        self.next_id += 1;
        let id = SizeGroupId(self.next_id);
        self.groups.insert(
            id,
            SizeGroup {
                mode,
                ..SizeGroup::default()
            },
        );
        id
    }

    pub(crate) fn get(&self, id: SizeGroupId) -> Option<&SizeGroup> {
        self.groups.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: SizeGroupId) -> Option<&mut SizeGroup> {
        self.groups.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: SizeGroupId) -> Option<SizeGroup> {
        self.groups.remove(&id)
    }

    /// Every widget sharing a group with `widget`, transitively, including `widget`.
    ///
    /// When `orientation` is given, only groups constraining it are followed;
    /// otherwise every group whose mode isn't [`SizeGroupMode::None`] is.
    pub(crate) fn peers(
        &self,
        widget: WidgetId,
        orientation: Option<Orientation>,
        groups_of: impl Fn(WidgetId) -> Vec<SizeGroupId>,
    ) -> Vec<WidgetId> {
        let mut seen_widgets = HashSet::new();
        let mut seen_groups = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![widget];
        while let Some(current) = stack.pop() {
            if !seen_widgets.insert(current) {
                continue;
            }
            result.push(current);
            for group_id in groups_of(current) {
                let Some(group) = self.groups.get(&group_id) else {
                    continue;
                };
                let relevant = match orientation {
                    Some(orientation) => group.mode.affects(orientation),
                    None => group.mode != SizeGroupMode::None,
                };
                if relevant && seen_groups.insert(group_id) {
                    stack.extend(group.members.iter().copied());
                }
            }
        }
        result
    }

    /// Whether any group of `widget` ignores hidden members and constrains `orientation`.
    pub(crate) fn ignores_hidden(&self, groups: &[SizeGroupId], orientation: Orientation) -> bool {
        groups.iter().filter_map(|id| self.groups.get(id)).any(|g| {
            g.ignore_hidden && g.mode.affects(orientation)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_affects() {
        assert!(SizeGroupMode::Both.affects(Orientation::Vertical));
        assert!(SizeGroupMode::Horizontal.affects(Orientation::Horizontal));
        assert!(!SizeGroupMode::Horizontal.affects(Orientation::Vertical));
        assert!(!SizeGroupMode::None.affects(Orientation::Horizontal));
    }

    #[test]
    fn peers_are_transitive() {
        let mut groups = SizeGroups::default();
        let a = groups.create(SizeGroupMode::Horizontal);
        let b = groups.create(SizeGroupMode::Horizontal);
        let c = groups.create(SizeGroupMode::Vertical);
        let [w1, w2, w3, w4] = [(); 4].map(|()| WidgetId::next());

        groups.get_mut(a).unwrap().members = vec![w1, w2];
        groups.get_mut(b).unwrap().members = vec![w2, w3];
        groups.get_mut(c).unwrap().members = vec![w3, w4];
        let groups_of = |w: WidgetId| {
            if w == w1 {
                vec![a]
            } else if w == w2 {
                vec![a, b]
            } else if w == w3 {
                vec![b, c]
            } else {
                vec![c]
            }
        };

        let mut horizontal = groups.peers(w1, Some(Orientation::Horizontal), groups_of);
        horizontal.sort();
        assert_eq!(horizontal, vec![w1, w2, w3]);

        let all = groups.peers(w1, None, groups_of);
        assert_eq!(all.len(), 4);
    }
}

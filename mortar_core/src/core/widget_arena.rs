// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use hashbrown::HashMap;

use crate::core::{Widget, WidgetId, WidgetState};

/// Storage for widgets and their states.
///
/// Widgets and states live in separate maps so that a widget can be taken out while
/// one of its hooks runs, leaving its state (and the rest of the tree) accessible.
/// A widget which is taken out is *busy*: any attempt to re-enter it is detected
/// by [`WidgetArena::is_busy`].
#[derive(Default)]
pub(crate) struct WidgetArena {
    widgets: HashMap<WidgetId, Box<dyn Widget>>,
    states: HashMap<WidgetId, WidgetState>,
    /// Insertion order, so that traversals over all roots are deterministic.
    order: Vec<WidgetId>,
}

impl WidgetArena {
    pub(crate) fn insert(&mut self, widget: Box<dyn Widget>, state: WidgetState) {
        let id = state.id;
        self.widgets.insert(id, widget);
        self.states.insert(id, state);
        self.order.push(id);
    }

    /// Removes a widget and its state. Children links are not touched.
    pub(crate) fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.states.remove(&id);
        self.order.retain(|other| *other != id);
        self.widgets.remove(&id)
    }

    pub(crate) fn contains(&self, id: WidgetId) -> bool {
        self.states.contains_key(&id)
    }

    pub(crate) fn state(&self, id: WidgetId) -> Option<&WidgetState> {
        self.states.get(&id)
    }

    pub(crate) fn state_mut(&mut self, id: WidgetId) -> Option<&mut WidgetState> {
        self.states.get_mut(&id)
    }

    pub(crate) fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.get(&id).map(|w| &**w)
    }

    pub(crate) fn widget_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        self.widgets.get_mut(&id).map(|w| &mut **w)
    }

    /// Takes a widget out so one of its hooks can run with access to the arena.
    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.widgets.remove(&id)
    }

    /// Puts back a widget taken with [`take_widget`](Self::take_widget).
    ///
    /// If the widget was destroyed while its hook ran, it is dropped here.
    pub(crate) fn restore_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if self.states.contains_key(&id) {
            self.widgets.insert(id, widget);
        }
    }

    /// Whether the widget exists but is currently taken out.
    pub(crate) fn is_busy(&self, id: WidgetId) -> bool {
        self.states.contains_key(&id) && !self.widgets.contains_key(&id)
    }

    /// All widget ids, in insertion order.
    pub(crate) fn ids(&self) -> &[WidgetId] {
        &self.order
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}

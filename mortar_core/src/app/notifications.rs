// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::app::{DebugFlags, WidgetTree};
use crate::core::{Handled, Notification, SubscriptionId, WidgetId};

/// A notification listener.
///
/// Listeners get mutable access to the tree and may mutate it. Notifications caused
/// by those mutations are appended to the queue currently being delivered.
///
/// The returned [`Handled`] is only meaningful for boolean notifications
/// (see [`Notification::is_boolean`]), where `Handled::Yes` stops delivery.
pub type Listener = dyn FnMut(&mut WidgetTree, WidgetId, &Notification) -> Handled;

struct ListenerEntry {
    id: SubscriptionId,
    /// Only notifications about this widget are delivered, if set.
    filter: Option<WidgetId>,
    callback: Rc<RefCell<Box<Listener>>>,
}

/// Queued notifications and the listeners they are delivered to.
#[derive(Default)]
pub(crate) struct NotificationQueue {
    pending: VecDeque<(WidgetId, Notification)>,
    listeners: Vec<ListenerEntry>,
    dispatching: bool,
    next_id: u64,
}

impl NotificationQueue {
    pub(crate) fn push(&mut self, widget: WidgetId, notification: Notification) {
        self.pending.push_back((widget, notification));
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// The listeners interested in `widget`, in subscription order.
    fn snapshot(&self, widget: WidgetId) -> Vec<(SubscriptionId, Rc<RefCell<Box<Listener>>>)> {
        self.listeners
            .iter()
            .filter(|l| l.filter.is_none_or(|filter| filter == widget))
            .map(|l| (l.id, l.callback.clone()))
            .collect()
    }
}

impl WidgetTree {
    // --- MARK: SUBSCRIBE

    /// Registers a listener for notifications.
    ///
    /// With `Some(widget)`, only notifications about that widget are delivered.
    /// Listeners are called in the order they were registered.
    pub fn subscribe(
        &mut self,
        widget: Option<WidgetId>,
        listener: impl FnMut(&mut Self, WidgetId, &Notification) -> Handled + 'static,
    ) -> SubscriptionId {
        let queue = &mut self.notifications;
        queue.next_id += 1;
        let id = SubscriptionId(queue.next_id);
        queue.listeners.push(ListenerEntry {
            id,
            filter: widget,
            callback: Rc::new(RefCell::new(Box::new(listener))),
        });
        id
    }

    /// Removes a listener. Returns `false` if it wasn't registered.
    ///
    /// A listener removed while a notification is being delivered doesn't see the
    /// rest of that notification's delivery.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len = self.notifications.listeners.len();
        self.notifications.listeners.retain(|l| l.id != id);
        len != self.notifications.listeners.len()
    }

    // --- MARK: DELIVER

    /// Queues a notification about `widget`.
    ///
    /// Boolean notifications are never queued, see [`deliver`](Self::deliver).
    pub(crate) fn emit(&mut self, widget: WidgetId, notification: Notification) {
        if self.settings.debug().contains(DebugFlags::STATE)
            && matches!(
                notification,
                Notification::StateFlagsChanged { .. } | Notification::Crossing(_)
            )
        {
            tracing::debug!(widget = widget.trace(), ?notification, "queued");
        }
        self.notifications.push(widget, notification);
    }

    /// Delivers every queued notification, including those queued while delivering.
    ///
    /// This runs automatically when the outermost public operation returns.
    /// Calling it from a listener does nothing: the running delivery loop picks up
    /// any new notification.
    pub fn flush_notifications(&mut self) {
        if self.notifications.dispatching {
            return;
        }
        self.notifications.dispatching = true;
        while let Some((widget, notification)) = self.notifications.pending.pop_front() {
            self.deliver(widget, &notification);
        }
        self.notifications.dispatching = false;
    }

    /// Calls the listeners interested in `widget`, synchronously.
    ///
    /// For boolean notifications, delivery stops at the first listener returning
    /// [`Handled::Yes`]. A listener which is already running further up the stack
    /// is skipped.
    pub(crate) fn deliver(&mut self, widget: WidgetId, notification: &Notification) -> Handled {
        trace!(
            widget = widget.trace(),
            notification = notification.short_name(),
            "deliver"
        );
        for (id, callback) in self.notifications.snapshot(widget) {
            if !self.notifications.is_subscribed(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                continue;
            };
            let handled = callback(self, widget, notification);
            if notification.is_boolean() && handled.is_handled() {
                return Handled::Yes;
            }
        }
        Handled::No
    }

    /// The number of notifications waiting to be delivered.
    pub fn pending_notifications(&self) -> usize {
        self.notifications.pending_len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::app::WidgetTree;
    use crate::core::{Handled, Notification, Rect, WidgetId};

    #[test]
    fn delivery_follows_subscription_order() {
        let mut tree = WidgetTree::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let log = log.clone();
            tree.subscribe(None, move |_, _, _| {
                log.borrow_mut().push(name);
                Handled::No
            });
        }
        let widget = WidgetId::next();
        tree.emit(widget, Notification::Show);
        assert!(log.borrow().is_empty());
        tree.flush_notifications();
        assert_eq!(*log.borrow(), ["first", "second"]);
    }

    #[test]
    fn boolean_notifications_stop_at_handled() {
        let mut tree = WidgetTree::new();
        let calls = Rc::new(RefCell::new(0));
        for handled in [Handled::Yes, Handled::No] {
            let calls = calls.clone();
            tree.subscribe(None, move |_, _, _| {
                *calls.borrow_mut() += 1;
                handled
            });
        }
        let widget = WidgetId::next();
        let draw = Notification::Draw(Rect::new(0, 0, 1, 1));
        assert_eq!(tree.deliver(widget, &draw), Handled::Yes);
        assert_eq!(*calls.borrow(), 1);

        // Non-boolean notifications reach every listener.
        tree.deliver(widget, &Notification::Map);
        assert_eq!(*calls.borrow(), 3);
    }

    #[test]
    fn filtered_and_removed_listeners() {
        let mut tree = WidgetTree::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let watched = WidgetId::next();
        let other = WidgetId::next();

        let seen_clone = seen.clone();
        let id = tree.subscribe(Some(watched), move |_, widget, _| {
            seen_clone.borrow_mut().push(widget);
            Handled::No
        });
        tree.emit(other, Notification::Show);
        tree.emit(watched, Notification::Show);
        tree.flush_notifications();
        assert_eq!(*seen.borrow(), [watched]);

        assert!(tree.unsubscribe(id));
        assert!(!tree.unsubscribe(id));
        tree.emit(watched, Notification::Hide);
        tree.flush_notifications();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn listeners_can_queue_more_notifications() {
        let mut tree = WidgetTree::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let order_clone = order.clone();
        tree.subscribe(None, move |tree, widget, notification| {
            order_clone.borrow_mut().push(notification.short_name());
            if *notification == Notification::Show {
                tree.emit(widget, Notification::Map);
                // Re-entrant flushes are no-ops; the outer loop delivers `Map`.
                tree.flush_notifications();
                assert_eq!(tree.pending_notifications(), 2);
            }
            Handled::No
        });
        let widget = WidgetId::next();
        tree.emit(widget, Notification::Show);
        tree.emit(widget, Notification::Realize);
        tree.flush_notifications();
        assert_eq!(*order.borrow(), ["Show", "Realize", "Map"]);
    }
}

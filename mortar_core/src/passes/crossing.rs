// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Synthesized pointer crossings.
//!
//! When the widget under a pointer changes without the pointer moving (a grab starts,
//! or the widget becomes insensitive), the engine emits the enter and leave
//! notifications the windowing system would have emitted for an actual motion between
//! the two surfaces. Each surface on the path gets one notification, whose
//! [`NotifyDetail`] describes how it relates to the other end.

use crate::app::WidgetTree;
use crate::backend::{DeviceId, SurfaceId};
use crate::core::{CrossingEvent, CrossingKind, CrossingMode, Notification, NotifyDetail, WidgetId};

impl WidgetTree {
    /// See [`WidgetTree::synthesize_crossing`].
    pub(crate) fn synthesize_crossing_inner(
        &mut self,
        from: Option<WidgetId>,
        to: Option<WidgetId>,
        device: DeviceId,
        mode: CrossingMode,
    ) {
        if from == to {
            return;
        }
        let from = from.and_then(|w| Some((w, self.crossing_surface(w, device)?)));
        let to = to.and_then(|w| Some((w, self.crossing_surface(w, device)?)));
        let crossing = Crossing { device, mode };

        match (from, to) {
            (None, None) => {}
            (Some((from, from_surface)), None) => {
                crossing.leave(self, Some(from), from_surface, NotifyDetail::Ancestor);
                for surface in self.surface_ancestors(from_surface) {
                    crossing.leave(self, None, surface, NotifyDetail::Virtual);
                }
            }
            (None, Some((to, to_surface))) => {
                for surface in self.surface_ancestors(to_surface).into_iter().rev() {
                    crossing.enter(self, None, surface, NotifyDetail::Virtual);
                }
                crossing.enter(self, Some(to), to_surface, NotifyDetail::Ancestor);
            }
            (Some((_, from_surface)), Some((_, to_surface))) if from_surface == to_surface => {}
            (Some((from, from_surface)), Some((to, to_surface))) => {
                let from_ancestors = self.surface_ancestors(from_surface);
                let to_ancestors = self.surface_ancestors(to_surface);

                if let Some(depth) = to_ancestors.iter().position(|s| *s == from_surface) {
                    // `to` is inside `from`.
                    if mode != CrossingMode::GtkUngrab {
                        crossing.leave(self, Some(from), from_surface, NotifyDetail::Inferior);
                    }
                    for surface in to_ancestors[..depth].iter().rev() {
                        crossing.enter(self, None, *surface, NotifyDetail::Virtual);
                    }
                    crossing.enter(self, Some(to), to_surface, NotifyDetail::Ancestor);
                } else if let Some(depth) = from_ancestors.iter().position(|s| *s == to_surface) {
                    // `from` is inside `to`.
                    crossing.leave(self, Some(from), from_surface, NotifyDetail::Ancestor);
                    for surface in &from_ancestors[..depth] {
                        crossing.leave(self, None, *surface, NotifyDetail::Virtual);
                    }
                    if mode != CrossingMode::GtkGrab {
                        crossing.enter(self, Some(to), to_surface, NotifyDetail::Inferior);
                    }
                } else {
                    // Ancestors are listed nearest first, so the common ones are at the end.
                    let common = from_ancestors
                        .iter()
                        .rev()
                        .zip(to_ancestors.iter().rev())
                        .take_while(|(a, b)| a == b)
                        .count();
                    let from_path = &from_ancestors[..from_ancestors.len() - common];
                    let to_path = &to_ancestors[..to_ancestors.len() - common];

                    crossing.leave(self, Some(from), from_surface, NotifyDetail::Nonlinear);
                    for surface in from_path {
                        crossing.leave(self, None, *surface, NotifyDetail::NonlinearVirtual);
                    }
                    for surface in to_path.iter().rev() {
                        crossing.enter(self, None, *surface, NotifyDetail::NonlinearVirtual);
                    }
                    crossing.enter(self, Some(to), to_surface, NotifyDetail::Nonlinear);
                }
            }
        }
    }

    /// The surface a pointer crossing into or out of `widget` happens on.
    ///
    /// That is the surface the pointer is over if the widget owns it, otherwise the
    /// surface the widget draws into.
    fn crossing_surface(&self, widget: WidgetId, device: DeviceId) -> Option<SurfaceId> {
        if let Some(surface) = self.backend.device_surface(device)
            && self.surface_owners.get(&surface) == Some(&widget)
        {
            return Some(surface);
        }
        self.arena.state(widget)?.surface
    }

    /// The ancestors of a surface, nearest first.
    fn surface_ancestors(&self, surface: SurfaceId) -> Vec<SurfaceId> {
        let mut ancestors = Vec::new();
        let mut current = self.backend.surface_parent(surface);
        while let Some(surface) = current {
            ancestors.push(surface);
            current = self.backend.surface_parent(surface);
        }
        ancestors
    }
}

struct Crossing {
    device: DeviceId,
    mode: CrossingMode,
}

impl Crossing {
    fn enter(
        &self,
        tree: &mut WidgetTree,
        widget: Option<WidgetId>,
        surface: SurfaceId,
        detail: NotifyDetail,
    ) {
        self.emit(tree, widget, surface, CrossingKind::Enter, detail);
    }

    fn leave(
        &self,
        tree: &mut WidgetTree,
        widget: Option<WidgetId>,
        surface: SurfaceId,
        detail: NotifyDetail,
    ) {
        self.emit(tree, widget, surface, CrossingKind::Leave, detail);
    }

    /// Notifies `widget`, or the owner of `surface` for surfaces between the two ends.
    fn emit(
        &self,
        tree: &mut WidgetTree,
        widget: Option<WidgetId>,
        surface: SurfaceId,
        kind: CrossingKind,
        detail: NotifyDetail,
    ) {
        let Some(widget) = widget.or_else(|| tree.surface_owner(surface)) else {
            return;
        };
        tree.emit(
            widget,
            Notification::Crossing(CrossingEvent {
                kind,
                surface,
                device: self.device,
                mode: self.mode,
                detail,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::app::WidgetTree;
    use crate::backend::DeviceId;
    use crate::core::{CrossingKind, CrossingMode, Notification, NotifyDetail, WidgetId};
    use crate::testing_widgets::{NotificationLog, Stack, Toplevel, record_notifications, test_tree};

    /// window ─┬─ outer ── inner
    ///         └─ sibling
    ///
    /// Every widget has its own surface.
    fn surfaces_tree() -> (WidgetTree, [WidgetId; 4]) {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let outer = tree.insert(Stack { own_surface: true });
        let inner = tree.insert(Stack { own_surface: true });
        let sibling = tree.insert(Stack { own_surface: true });
        tree.set_parent(outer, window);
        tree.set_parent(inner, outer);
        tree.set_parent(sibling, window);
        tree.realize(inner);
        tree.realize(sibling);
        (tree, [window, outer, inner, sibling])
    }

    fn crossings(log: &NotificationLog) -> Vec<(WidgetId, CrossingKind, NotifyDetail)> {
        log.borrow()
            .iter()
            .filter_map(|(widget, n)| match n {
                Notification::Crossing(c) => Some((*widget, c.kind, c.detail)),
                _ => None,
            })
            .collect()
    }

    fn cross(
        tree: &mut WidgetTree,
        from: Option<WidgetId>,
        to: Option<WidgetId>,
        mode: CrossingMode,
    ) -> Vec<(WidgetId, CrossingKind, NotifyDetail)> {
        let log = record_notifications(tree);
        tree.synthesize_crossing(from, to, DeviceId(0), mode);
        crossings(&log)
    }

    #[test]
    fn nonlinear_crossing() {
        let (mut tree, [window, outer, inner, sibling]) = surfaces_tree();
        let events = cross(&mut tree, Some(inner), Some(sibling), CrossingMode::Normal);
        assert_eq!(
            events,
            [
                (inner, CrossingKind::Leave, NotifyDetail::Nonlinear),
                (outer, CrossingKind::Leave, NotifyDetail::NonlinearVirtual),
                (sibling, CrossingKind::Enter, NotifyDetail::Nonlinear),
            ]
        );
        assert!(!events.iter().any(|(w, ..)| *w == window));
    }

    #[test]
    fn crossings_are_mirrored() {
        let (mut tree, [window, _, inner, sibling]) = surfaces_tree();
        let pairs = [
            (Some(inner), Some(sibling)),
            (Some(window), Some(inner)),
            (None, Some(inner)),
        ];
        for (a, b) in pairs {
            let forward = cross(&mut tree, a, b, CrossingMode::Normal);
            let backward = cross(&mut tree, b, a, CrossingMode::Normal);
            let mirrored: Vec<_> = forward
                .into_iter()
                .rev()
                .map(|(widget, kind, detail)| {
                    let kind = match kind {
                        CrossingKind::Enter => CrossingKind::Leave,
                        CrossingKind::Leave => CrossingKind::Enter,
                    };
                    (widget, kind, detail)
                })
                .collect();
            assert_eq!(backward, mirrored);
        }
    }

    #[test]
    fn linear_crossings() {
        let (mut tree, [window, outer, inner, _]) = surfaces_tree();
        assert_eq!(
            cross(&mut tree, Some(window), Some(inner), CrossingMode::Normal),
            [
                (window, CrossingKind::Leave, NotifyDetail::Inferior),
                (outer, CrossingKind::Enter, NotifyDetail::Virtual),
                (inner, CrossingKind::Enter, NotifyDetail::Ancestor),
            ]
        );
        assert_eq!(
            cross(&mut tree, Some(inner), Some(window), CrossingMode::Normal),
            [
                (inner, CrossingKind::Leave, NotifyDetail::Ancestor),
                (outer, CrossingKind::Leave, NotifyDetail::Virtual),
                (window, CrossingKind::Enter, NotifyDetail::Inferior),
            ]
        );
    }

    #[test]
    fn toolkit_grabs_skip_the_inferior_end() {
        let (mut tree, [window, outer, inner, _]) = surfaces_tree();
        assert_eq!(
            cross(&mut tree, Some(window), Some(inner), CrossingMode::GtkUngrab),
            [
                (outer, CrossingKind::Enter, NotifyDetail::Virtual),
                (inner, CrossingKind::Enter, NotifyDetail::Ancestor),
            ]
        );
        assert_eq!(
            cross(&mut tree, Some(inner), Some(window), CrossingMode::GtkGrab),
            [
                (inner, CrossingKind::Leave, NotifyDetail::Ancestor),
                (outer, CrossingKind::Leave, NotifyDetail::Virtual),
            ]
        );
    }

    #[test]
    fn unrealized_ends_are_ignored() {
        let mut tree = test_tree();
        let window = tree.insert(Toplevel);
        let stack = tree.insert(Stack { own_surface: true });
        assert!(cross(&mut tree, Some(stack), Some(window), CrossingMode::Normal).is_empty());
        assert!(cross(&mut tree, Some(stack), Some(stack), CrossingMode::Normal).is_empty());
    }
}

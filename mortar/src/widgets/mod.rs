// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The standard widgets.

mod bin;
mod filler;
mod window;

pub use bin::Bin;
pub use filler::Filler;
pub use window::Window;

use crate::core::{AllocateCtx, MeasureCtx, Orientation, Rect, RequestMode, SizeRequest, WidgetId};

/// The first visible child, which single-child containers lay out.
fn visible_child(children: &[WidgetId], is_visible: impl Fn(WidgetId) -> bool) -> Option<WidgetId> {
    children.iter().copied().find(|child| is_visible(*child))
}

/// The request mode of a container surrounding its only child with a border.
fn bordered_request_mode(ctx: &mut MeasureCtx<'_>) -> RequestMode {
    let children = ctx.children();
    match visible_child(&children, |child| ctx.is_visible(child)) {
        Some(child) => ctx.child_request_mode(child),
        None => RequestMode::ConstantSize,
    }
}

/// The request of a container surrounding its only child with `border` on every side.
fn bordered_measure(
    ctx: &mut MeasureCtx<'_>,
    border: i32,
    orientation: Orientation,
    for_size: Option<i32>,
) -> SizeRequest {
    let children = ctx.children();
    let Some(child) = visible_child(&children, |child| ctx.is_visible(child)) else {
        return SizeRequest::fixed(2 * border);
    };
    let for_size = for_size.map(|size| (size - 2 * border).max(0));
    let request = ctx.child_preferred_size(child, orientation, for_size);
    SizeRequest::new(
        request.minimum.saturating_add(2 * border),
        request.natural.saturating_add(2 * border),
    )
}

/// Gives the only child the content area minus `border` on every side.
fn bordered_allocate(ctx: &mut AllocateCtx<'_>, border: i32) {
    let area = ctx.content_area();
    let inner = Rect::new(
        area.x + border,
        area.y + border,
        (area.width - 2 * border).max(1),
        (area.height - 2 * border).max(1),
    );
    let children = ctx.children();
    if let Some(child) = visible_child(&children, |child| ctx.is_visible(child)) {
        ctx.allocate_child(child, inner);
    }
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use tracing::{Span, trace_span};

use crate::core::{
    MeasureCtx, Orientation, Realizable, RequestMode, Resizable, SizeRequest, Stateful, Widget,
    WidgetId,
};

/// A leaf widget which takes up space and draws nothing.
///
/// A filler either has a fixed content size, or lays out an area of content in rows
/// like wrapping text, in which case its height depends on the width it gets.
pub struct Filler {
    content: Content,
    can_focus: bool,
}

enum Content {
    Fixed { width: i32, height: i32 },
    Wrapping { area: i32, min_width: i32 },
}

// --- MARK: BUILDERS
impl Filler {
    /// Creates a filler with a fixed `width` by `height` content size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            content: Content::Fixed {
                width: width.max(0),
                height: height.max(0),
            },
            can_focus: false,
        }
    }

    /// Creates a height-for-width filler of `area` square pixels.
    ///
    /// Its natural width puts the whole area on one row, its minimum width is the
    /// side of the square of the same area.
    pub fn wrapping(area: i32) -> Self {
        let area = area.max(1);
        Self {
            content: Content::Wrapping {
                area,
                min_width: area.isqrt(),
            },
            can_focus: false,
        }
    }

    /// Builder-style method to let the filler take keyboard focus.
    pub fn focusable(mut self) -> Self {
        self.can_focus = true;
        self
    }
}

// --- MARK: IMPL WIDGET
impl Resizable for Filler {
    fn request_mode(&mut self, _ctx: &mut MeasureCtx<'_>) -> RequestMode {
        match self.content {
            Content::Fixed { .. } => RequestMode::ConstantSize,
            Content::Wrapping { .. } => RequestMode::HeightForWidth,
        }
    }

    fn measure(
        &mut self,
        _ctx: &mut MeasureCtx<'_>,
        orientation: Orientation,
        for_size: Option<i32>,
    ) -> SizeRequest {
        match (&self.content, orientation) {
            (Content::Fixed { width, .. }, Orientation::Horizontal) => SizeRequest::fixed(*width),
            (Content::Fixed { height, .. }, Orientation::Vertical) => SizeRequest::fixed(*height),
            (Content::Wrapping { area, min_width }, Orientation::Horizontal) => {
                SizeRequest::new(*min_width, *area)
            }
            (Content::Wrapping { area, .. }, Orientation::Vertical) => {
                let width = for_size.unwrap_or(*area).max(1);
                SizeRequest::fixed(area / width + i32::from(area % width != 0))
            }
        }
    }
}

impl Realizable for Filler {}

impl Stateful for Filler {}

impl Widget for Filler {
    fn accepts_focus(&self) -> bool {
        self.can_focus
    }

    fn make_trace_span(&self, id: WidgetId) -> Span {
        trace_span!("Filler", id = id.trace())
    }

    fn get_debug_text(&self) -> Option<String> {
        match self.content {
            Content::Fixed { width, height } => Some(format!("{width}x{height}")),
            Content::Wrapping { area, .. } => Some(format!("wrapping {area}")),
        }
    }
}

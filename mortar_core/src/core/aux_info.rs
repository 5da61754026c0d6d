// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::{Orientation, TextDirection};

/// How a widget positions itself inside an allocation larger than its natural size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Stretch to fill the whole allocation.
    #[default]
    Fill,
    /// Keep the natural size, at the leading edge.
    ///
    /// For horizontal alignment this is the left edge in left-to-right text
    /// and the right edge in right-to-left text.
    Start,
    /// Keep the natural size, at the trailing edge.
    End,
    /// Keep the natural size, centered.
    Center,
}

impl Align {
    /// Resolves `Start` and `End` against the text direction.
    ///
    /// Only horizontal alignment is mirrored.
    pub(crate) fn effective(self, orientation: Orientation, direction: TextDirection) -> Self {
        match (self, orientation, direction) {
            (Self::Start, Orientation::Horizontal, TextDirection::Rtl) => Self::End,
            (Self::End, Orientation::Horizontal, TextDirection::Rtl) => Self::Start,
            (align, _, _) => align,
        }
    }
}

/// Empty space around a widget, included in its size request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Margins {
    /// Space on the left edge.
    pub left: i16,
    /// Space on the right edge.
    pub right: i16,
    /// Space on the top edge.
    pub top: i16,
    /// Space on the bottom edge.
    pub bottom: i16,
}

impl Margins {
    /// No margins.
    pub const ZERO: Self = Self::uniform(0);

    /// The same margin on all four sides.
    pub const fn uniform(margin: i16) -> Self {
        Self {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
        }
    }

    /// The leading and trailing margins along `orientation`.
    pub fn along(&self, orientation: Orientation) -> (i32, i32) {
        match orientation {
            Orientation::Horizontal => (self.left.into(), self.right.into()),
            Orientation::Vertical => (self.top.into(), self.bottom.into()),
        }
    }

    /// The total margin along `orientation`.
    pub fn total(&self, orientation: Orientation) -> i32 {
        let (start, end) = self.along(orientation);
        start + end
    }
}

/// Which edge a margin setter writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The left edge.
    Left,
    /// The right edge.
    Right,
    /// The top edge.
    Top,
    /// The bottom edge.
    Bottom,
}

/// Rarely-set geometry attributes of a widget.
///
/// Widgets only carry a boxed `AuxInfo` after one of its values was first written;
/// until then [`AuxInfo::DEFAULT`] is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AuxInfo {
    /// Explicit width request. `None` means the widget's own request is used.
    pub width_request: Option<i32>,
    /// Explicit height request. `None` means the widget's own request is used.
    pub height_request: Option<i32>,
    /// Horizontal alignment.
    pub halign: Align,
    /// Vertical alignment.
    pub valign: Align,
    /// Margins on the four sides.
    pub margin: Margins,
}

impl AuxInfo {
    /// The values reported for widgets which never set any auxiliary attribute.
    pub const DEFAULT: Self = Self {
        width_request: None,
        height_request: None,
        halign: Align::Fill,
        valign: Align::Fill,
        margin: Margins::ZERO,
    };

    /// The explicit size request along `orientation`.
    pub fn size_request(&self, orientation: Orientation) -> Option<i32> {
        match orientation {
            Orientation::Horizontal => self.width_request,
            Orientation::Vertical => self.height_request,
        }
    }

    /// The alignment along `orientation`.
    pub fn align(&self, orientation: Orientation) -> Align {
        match orientation {
            Orientation::Horizontal => self.halign,
            Orientation::Vertical => self.valign,
        }
    }
}

impl Default for AuxInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lazily-allocated storage for [`AuxInfo`].
#[derive(Clone, Debug, Default)]
pub(crate) struct AuxSlot(Option<Box<AuxInfo>>);

impl AuxSlot {
    pub(crate) fn get(&self) -> &AuxInfo {
        self.0.as_deref().unwrap_or(&AuxInfo::DEFAULT)
    }

    /// Returns the record, creating it on first write.
    pub(crate) fn get_mut(&mut self) -> &mut AuxInfo {
        self.0.get_or_insert_with(|| Box::new(AuxInfo::DEFAULT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_lazy() {
        let mut slot = AuxSlot::default();
        assert!(slot.0.is_none());
        assert_eq!(*slot.get(), AuxInfo::DEFAULT);
        slot.get_mut().halign = Align::Center;
        assert!(slot.0.is_some());
        assert_eq!(slot.get().align(Orientation::Horizontal), Align::Center);
    }

    #[test]
    fn rtl_swaps_horizontal_only() {
        let rtl = TextDirection::Rtl;
        assert_eq!(Align::Start.effective(Orientation::Horizontal, rtl), Align::End);
        assert_eq!(Align::End.effective(Orientation::Horizontal, rtl), Align::Start);
        assert_eq!(Align::Start.effective(Orientation::Vertical, rtl), Align::Start);
        assert_eq!(
            Align::Center.effective(Orientation::Horizontal, rtl),
            Align::Center
        );
    }
}

// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Integer geometry used by size negotiation and allocation.

use std::fmt;

/// The two directions in which a widget negotiates its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The horizontal axis, i.e. widths.
    Horizontal,
    /// The vertical axis, i.e. heights.
    Vertical,
}

impl Orientation {
    /// Returns the orientation orthogonal to this one.
    #[inline(always)]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Index usable for per-orientation arrays.
    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }
}

/// Which orientation a widget resolves first when it is asked for its size.
///
/// A widget whose height depends on the width it is given (e.g. wrapping text)
/// reports [`HeightForWidth`](Self::HeightForWidth): its width is computed first,
/// and its height is then computed *for* a given width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestMode {
    /// The widget's size does not depend on the size proposed in the other orientation.
    #[default]
    ConstantSize,
    /// Width is the native orientation, height is computed for a given width.
    HeightForWidth,
    /// Height is the native orientation, width is computed for a given height.
    WidthForHeight,
}

impl RequestMode {
    /// The orientation which is resolved without any contextual size.
    ///
    /// Constant-size widgets report [`Orientation::Horizontal`], matching the order
    /// in which parents usually query them.
    pub const fn native_orientation(self) -> Orientation {
        match self {
            Self::ConstantSize | Self::HeightForWidth => Orientation::Horizontal,
            Self::WidthForHeight => Orientation::Vertical,
        }
    }
}

/// The text direction a widget lays out its content in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDirection {
    /// Follow the process-wide default direction.
    #[default]
    None,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

/// A minimum and natural size in one orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SizeRequest {
    /// The smallest size the widget can be allocated without clipping.
    pub minimum: i32,
    /// The size the widget would choose given unlimited space.
    pub natural: i32,
}

impl SizeRequest {
    /// A zero request, used for hidden widgets.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a request from its two components.
    pub const fn new(minimum: i32, natural: i32) -> Self {
        Self { minimum, natural }
    }

    /// Creates a request where the minimum and natural sizes are equal.
    pub const fn fixed(size: i32) -> Self {
        Self::new(size, size)
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.minimum.max(other.minimum),
            self.natural.max(other.natural),
        )
    }
}

/// A width and a height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// The horizontal extent.
    pub width: i32,
    /// The vertical extent.
    pub height: i32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the extent along `orientation`.
    pub const fn get(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// An integer rectangle, in the coordinate space of the parent's drawing surface.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

/// The rectangle actually assigned to a widget by its parent.
pub type Allocation = Rect;

impl Rect {
    /// The allocation given to widgets which were never allocated, or were just unparented.
    ///
    /// It is deliberately off-screen and 1×1, so that the next real allocation never
    /// compares equal to it.
    pub const DEGENERATE: Self = Self::new(-1, -1, 1, 1);

    /// Creates a new rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The size of this rectangle.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Position and extent along `orientation`.
    pub(crate) const fn span(&self, orientation: Orientation) -> (i32, i32) {
        match orientation {
            Orientation::Horizontal => (self.x, self.width),
            Orientation::Vertical => (self.y, self.height),
        }
    }

    /// Overwrites position and extent along `orientation`.
    pub(crate) fn set_span(&mut self, orientation: Orientation, pos: i32, size: i32) {
        match orientation {
            Orientation::Horizontal => {
                self.x = pos;
                self.width = size;
            }
            Orientation::Vertical => {
                self.y = pos;
                self.height = size;
            }
        }
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// The smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self::new(x, y, right - x, bottom - y)
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether the rectangle covers no area.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment() {
        let outer = Rect::new(0, 0, 100, 50);
        assert!(outer.contains_rect(&Rect::new(10, 10, 90, 40)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(-1, 0, 10, 10)));
        assert!(!outer.contains_rect(&Rect::new(95, 0, 10, 10)));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 10, 10);
        assert_eq!(a.union(&b), Rect::new(0, 0, 30, 15));
    }

    #[test]
    fn native_orientation() {
        assert_eq!(
            RequestMode::WidthForHeight.native_orientation(),
            Orientation::Vertical
        );
        assert_eq!(
            RequestMode::HeightForWidth.native_orientation(),
            Orientation::Horizontal
        );
        assert_eq!(Orientation::Vertical.cross(), Orientation::Horizontal);
    }
}

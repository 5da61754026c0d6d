// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The narrow interface to a styling system.

use hashbrown::HashMap;

use crate::core::{StateFlags, TextDirection, WidgetAttribute, WidgetId};

/// The font a widget renders its text with.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescription {
    /// Font family name.
    pub family: String,
    /// Size in points.
    pub size: f32,
    /// CSS-style weight, 400 is regular.
    pub weight: u16,
    /// Whether the italic face is used.
    pub italic: bool,
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            family: "sans-serif".into(),
            size: 10.0,
            weight: 400,
            italic: false,
        }
    }
}

/// A value looked up by name in the style of a widget.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// An integer, e.g. a focus line width.
    Int(i32),
    /// A boolean.
    Bool(bool),
    /// A floating point number.
    Float(f64),
    /// An RGBA color, packed as `0xRRGGBBAA`.
    Color(u32),
    /// A string.
    Str(String),
}

/// The styling system, as seen by the widget engine.
///
/// Lookups are made reactively, when a widget needs its [`TextContext`] or a style value;
/// styling never drives allocation directly.
pub trait StyleProvider {
    /// The font used by `widget` in the given state.
    fn font_description(&self, widget: WidgetId, state: StateFlags) -> FontDescription;

    /// A named style value for `widget`, if the style defines it.
    fn style_value(&self, widget: WidgetId, name: &str) -> Option<StyleValue>;
}

/// A [`StyleProvider`] with a single font and a flat table of values.
#[derive(Clone, Debug, Default)]
pub struct DefaultStyleProvider {
    font: FontDescription,
    values: HashMap<String, StyleValue>,
}

impl DefaultStyleProvider {
    /// Creates a provider with the default font and no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to set the font.
    pub fn with_font(mut self, font: FontDescription) -> Self {
        self.font = font;
        self
    }

    /// Builder-style method to add a named value.
    pub fn with_value(mut self, name: impl Into<String>, value: StyleValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }
}

impl StyleProvider for DefaultStyleProvider {
    fn font_description(&self, _widget: WidgetId, state: StateFlags) -> FontDescription {
        let mut font = self.font.clone();
        // Insensitive text is usually rendered lighter.
        if state.contains(StateFlags::INSENSITIVE) && font.weight > 300 {
            font.weight = 300;
        }
        font
    }

    fn style_value(&self, _widget: WidgetId, name: &str) -> Option<StyleValue> {
        self.values.get(name).cloned()
    }
}

/// What a widget needs to shape its text: a font and a resolved direction.
///
/// Cached per widget and dropped whenever its style, direction or state changes.
#[derive(Clone, Debug, PartialEq)]
pub struct TextContext {
    /// The font to shape text with.
    pub font: FontDescription,
    /// The resolved base direction, never [`TextDirection::None`].
    pub direction: TextDirection,
}

impl WidgetAttribute for TextContext {}

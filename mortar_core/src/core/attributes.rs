// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use anymap3::AnyMap;
use hashbrown::HashMap;

use crate::backend::{DeviceId, EventMask};

/// A rarely-set value that can be attached to a widget.
///
/// Each attribute type is its own key: a widget holds at most one value per type.
pub trait WidgetAttribute: 'static {}

/// Sparse storage for [`WidgetAttribute`]s, owned by a widget.
#[derive(Default)]
pub struct Attributes {
    map: AnyMap,
}

impl Attributes {
    /// Create an empty collection of attributes.
    pub fn new() -> Self {
        Self { map: AnyMap::new() }
    }

    /// Returns true if the widget has an attribute of type `T`.
    pub fn contains<T: WidgetAttribute>(&self) -> bool {
        self.map.contains::<T>()
    }

    /// Get value of attribute `T`, or None if the widget has no `T` attribute.
    pub fn get<T: WidgetAttribute>(&self) -> Option<&T> {
        self.map.get::<T>()
    }

    /// Get value of attribute `T`, or None if the widget has no `T` attribute.
    pub fn get_mut<T: WidgetAttribute>(&mut self) -> Option<&mut T> {
        self.map.get_mut::<T>()
    }

    /// Get value of attribute `T`, inserting the default value first if needed.
    pub fn get_or_default<T: WidgetAttribute + Default>(&mut self) -> &mut T {
        self.map.entry::<T>().or_insert_with(T::default)
    }

    /// Set attribute `T` to given value. Returns the previous value if `T` was already set.
    pub fn insert<T: WidgetAttribute>(&mut self, value: T) -> Option<T> {
        self.map.insert(value)
    }

    /// Remove attribute `T`. Returns the previous value if `T` was set.
    pub fn remove<T: WidgetAttribute>(&mut self) -> Option<T> {
        self.map.remove::<T>()
    }

    /// The number of attributes set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

/// Markup shown in the widget's tooltip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipMarkup(pub String);

impl WidgetAttribute for TooltipMarkup {}

/// The events a widget's surface reports for every device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventInterest(pub EventMask);

impl WidgetAttribute for EventInterest {}

/// Per-device overrides of [`EventInterest`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceEventInterest(pub HashMap<DeviceId, EventMask>);

impl WidgetAttribute for DeviceEventInterest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_keys() {
        let mut attributes = Attributes::new();
        assert!(attributes.is_empty());

        attributes.insert(TooltipMarkup("<b>hi</b>".into()));
        attributes.insert(EventInterest(EventMask::BUTTON_PRESS));
        assert_eq!(attributes.len(), 2);
        assert_eq!(
            attributes.get::<TooltipMarkup>(),
            Some(&TooltipMarkup("<b>hi</b>".into()))
        );

        let old = attributes.insert(EventInterest(EventMask::SCROLL));
        assert_eq!(old, Some(EventInterest(EventMask::BUTTON_PRESS)));

        attributes
            .get_or_default::<DeviceEventInterest>()
            .0
            .insert(DeviceId(3), EventMask::KEY_PRESS);
        assert!(attributes.contains::<DeviceEventInterest>());

        assert!(attributes.remove::<TooltipMarkup>().is_some());
        assert!(!attributes.contains::<TooltipMarkup>());
    }
}

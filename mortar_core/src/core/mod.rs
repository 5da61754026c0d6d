// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Basic types and traits Mortar is built on.

mod attributes;
mod aux_info;
mod contexts;
mod diagnostics;
mod geometry;
mod notification;
mod size_cache;
mod size_group;
mod state_flags;
mod style;
mod widget;
mod widget_arena;
mod widget_state;

pub use attributes::{Attributes, DeviceEventInterest, EventInterest, TooltipMarkup, WidgetAttribute};
pub use aux_info::{Align, AuxInfo, Edge, Margins};
pub use contexts::{AdjustCtx, AllocateCtx, LifecycleCtx, MeasureCtx, StateCtx};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use geometry::{Allocation, Orientation, Rect, RequestMode, Size, SizeRequest, TextDirection};
pub use notification::{
    CrossingEvent, CrossingKind, CrossingMode, Handled, InputEvent, InputKind, Notification,
    NotifyDetail, SubscriptionId,
};
pub use size_group::{SizeGroupId, SizeGroupMode};
pub use state_flags::{StateChange, StateFlags, StateOperation, StateType};
pub use style::{DefaultStyleProvider, FontDescription, StyleProvider, StyleValue, TextContext};
pub use widget::{
    AsDynWidget, ChildrenIds, FromDynWidget, Realizable, Resizable, Stateful, Widget, WidgetId,
};

pub(crate) use aux_info::AuxSlot;
pub(crate) use diagnostics::DiagnosticSink;
pub(crate) use size_cache::SizeRequestCache;
pub(crate) use size_group::SizeGroups;
pub(crate) use state_flags::StateDelta;
pub(crate) use widget_arena::WidgetArena;
pub(crate) use widget_state::{ChildSlot, WidgetState};

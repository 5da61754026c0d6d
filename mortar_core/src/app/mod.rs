// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Types needed for embedding the engine: the widget tree, its settings and its logging.

mod notifications;
pub mod settings;
mod tracing_backend;
mod widget_tree;

pub use notifications::Listener;
pub use settings::{DebugFlags, Settings, SettingsHandle};
pub use tracing_backend::{
    TracingSubscriberHasBeenSetError, default_tracing_subscriber, try_init_test_tracing,
    try_init_tracing,
};
pub use widget_tree::{TreeOptions, WidgetTree};

pub(crate) use notifications::NotificationQueue;

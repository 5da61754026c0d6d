// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Configures a suitable default [`tracing`] implementation for applications and tests
//! built on Mortar.
//!
//! The default filter can be overwritten using `RUST_LOG`.
//! This will include all [`DEBUG`](tracing::Level::DEBUG) messages in debug mode,
//! and all [`INFO`](tracing::Level::INFO) level messages in release mode.
//!
//! The engine reports its diagnostics as [`WARN`](tracing::Level::WARN) messages,
//! so they are visible with either default.
//!
//! If a `tracing` backend is already configured, this will not overwrite that.

use std::error::Error;
use std::fmt;

use time::macros::format_description;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

/// Constructs a default tracing subscriber with a given `default_level` filter.
///
/// Returns the subscriber, and the error in case of a (recoverable) error.
pub fn default_tracing_subscriber(
    default_level: LevelFilter,
) -> (impl Subscriber, Option<Box<dyn Error>>) {
    // Use EnvFilter to allow the user to override the log level without recompiling.
    let env_filter_builder = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG");
    let err = env_filter_builder
        .from_env()
        .err()
        .map(|err| format!("failed to parse RUST_LOG environment variable: {err:#}").into());
    let env_filter = env_filter_builder.from_env_lossy();

    // Widget trees are short-lived in tests and interactive sessions:
    // print the time without the date, with millisecond precision, and skip the target.
    let timer = UtcTime::new(format_description!(
        // We append a `Z` here to indicate clearly that this is a UTC time
        "[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_target(false)
        .with_filter(env_filter);

    (tracing_subscriber::registry().with(console_layer), err)
}

/// An Error indicating that a tracing subscriber has been set before.
#[derive(Debug)]
pub struct TracingSubscriberHasBeenSetError;

impl fmt::Display for TracingSubscriberHasBeenSetError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.pad("A tracing subscriber has been set before.")
    }
}

impl Error for TracingSubscriberHasBeenSetError {}

/// Verify that a tracing subscriber has not been set before or return with an error.
fn verify_subscriber_has_not_been_set() -> Result<(), TracingSubscriberHasBeenSetError> {
    // The tracing_core::dispatcher::has_been_set function is doc(hidden).
    // However, it is guaranteed to remain for the entire tracing_core 1.0 series,
    // as tracing depends on it, and it isn't documented as unsupported.
    if tracing_core::dispatcher::has_been_set() {
        return Err(TracingSubscriberHasBeenSetError);
    }
    Ok(())
}

fn init_with_level(default_level: LevelFilter) -> Result<(), TracingSubscriberHasBeenSetError> {
    verify_subscriber_has_not_been_set()?;

    let (subscriber, err) = default_tracing_subscriber(default_level);

    // Another thread may have won the race since the check above.
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| TracingSubscriberHasBeenSetError)?;
    if let Some(err) = err {
        tracing::error!("Initialising logging encountered recoverable error: {err}");
    }

    Ok(())
}

/// Initialise tracing with a default subscriber for a unit test.
///
/// This ignores messages below [`WARN`](tracing::Level::WARN) to limit noise.
pub fn try_init_test_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    init_with_level(LevelFilter::WARN)
}

/// Initialise tracing with a default subscriber for an end-user application.
pub fn try_init_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    // Default level is DEBUG in --dev, INFO in --release, unless a level is passed.
    // DEBUG should print a few logs per low-density event.
    // INFO should only print logs for noteworthy things.
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    init_with_level(default_level)
}

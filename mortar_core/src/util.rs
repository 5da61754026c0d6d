// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Miscellaneous utility functions.

/// Panic in debug and `tracing::error` in release mode.
///
/// This macro is in some way a combination of `panic` and `debug_assert`,
/// but it will log the provided message instead of ignoring it in release builds.
///
/// It's useful when a backtrace would aid debugging but a crash can be avoided in release.
#[macro_export]
macro_rules! debug_panic {
    ($msg:expr$(,)?) => {
        if cfg!(debug_assertions) {
            panic!($msg);
        } else {
            tracing::error!($msg);
        }
    };
    ($fmt:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) {
            panic!($fmt, $($arg)*);
        } else {
            tracing::error!($fmt, $($arg)*);
        }
    };
}

pub use crate::debug_panic;

/// Clamps a margin to the range a widget can store, which is `0..=i16::MAX`.
///
/// Returns the clamped value, and whether clamping was needed.
pub(crate) fn clamp_margin(margin: i32) -> (i16, bool) {
    match i16::try_from(margin) {
        Ok(value) if value >= 0 => (value, false),
        Ok(_) => (0, true),
        Err(_) if margin < 0 => (0, true),
        Err(_) => (i16::MAX, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_are_clamped() {
        assert_eq!(clamp_margin(12), (12, false));
        assert_eq!(clamp_margin(-3), (0, true));
        assert_eq!(clamp_margin(100_000), (i16::MAX, true));
        assert_eq!(clamp_margin(i32::MIN), (0, true));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "broken widget 7")]
    fn debug_panic_panics_in_debug() {
        debug_panic!("broken widget {}", 7);
    }
}

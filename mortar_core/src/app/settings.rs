// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Process-wide defaults read by every widget tree.
//!
//! The defaults live in a [`Settings`] value behind a shared [`SettingsHandle`].
//! Widget trees never read a bare global: they are given a handle when created,
//! which defaults to [`global()`]. Tests create their own handle (or call
//! [`reset_global`]) to stay isolated from each other.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use bitflags::bitflags;
use once_cell::unsync::OnceCell;

use crate::backend::ScreenId;
use crate::core::TextDirection;

bitflags! {
    /// Optional debugging aids, usually enabled through the `MORTAR_DEBUG` environment variable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u8 {
        /// Verify tree invariants at the end of every public operation.
        const INVARIANTS = 1 << 0;
        /// Log every committed allocation.
        const GEOMETRY = 1 << 1;
        /// Log every computed size request.
        const SIZE_REQUEST = 1 << 2;
        /// Log resize queueing and flushing.
        const RESIZE = 1 << 3;
        /// Log state flag propagation.
        const STATE = 1 << 4;
    }
}

impl DebugFlags {
    const NAMES: [(&'static str, Self); 5] = [
        ("invariants", Self::INVARIANTS),
        ("geometry", Self::GEOMETRY),
        ("size-request", Self::SIZE_REQUEST),
        ("resize", Self::RESIZE),
        ("state", Self::STATE),
    ];

    /// The flags enabled when nothing is configured.
    ///
    /// Invariant checking is on in debug builds.
    pub fn default_for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::INVARIANTS
        } else {
            Self::empty()
        }
    }

    /// Parses a comma-separated list of flag names, such as `"invariants,resize"`.
    ///
    /// Unknown names are logged and ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Self::all();
        }
        let mut result = Self::empty();
        let mut show_help = false;
        for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                tracing::warn!("`MORTAR_DEBUG=all` cannot be meaningfully combined with other flags");
                return Self::all();
            }
            if let Some((_, flag)) = Self::NAMES
                .iter()
                .find(|(flag_name, _)| flag_name.eq_ignore_ascii_case(name))
            {
                if result.contains(*flag) {
                    tracing::warn!(flag = name, "MORTAR_DEBUG: Enabled same flag twice");
                }
                result |= *flag;
            } else {
                tracing::warn!(flag = name, "MORTAR_DEBUG: Unknown flag");
                show_help = true;
            }
        }
        if show_help {
            let supported_str = Self::NAMES
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                "Supported flags for the `MORTAR_DEBUG` environment variable are {supported_str}"
            );
        }
        result
    }

    /// Reads `MORTAR_DEBUG`, falling back to [`default_for_build`](Self::default_for_build).
    pub fn from_env() -> Self {
        match std::env::var("MORTAR_DEBUG") {
            Ok(value) => Self::parse(&value),
            Err(std::env::VarError::NotPresent) => Self::default_for_build(),
            Err(std::env::VarError::NotUnicode(value)) => {
                tracing::error!(
                    ?value,
                    "Couldn't parse `MORTAR_DEBUG` environment variable: Not valid UTF-8",
                );
                Self::default_for_build()
            }
        }
    }
}

/// Defaults shared by all widget trees of a process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Direction used by widgets whose direction is [`TextDirection::None`].
    ///
    /// Never `TextDirection::None` itself.
    pub default_direction: TextDirection,
    /// Screen assigned to toplevels which don't pick one.
    pub default_screen: ScreenId,
    /// Enabled debugging aids.
    pub debug: DebugFlags,
}

impl Settings {
    /// Settings with left-to-right text and the build's default debug flags,
    /// ignoring the environment.
    pub fn new() -> Self {
        Self {
            default_direction: TextDirection::Ltr,
            default_screen: ScreenId::default(),
            debug: DebugFlags::default_for_build(),
        }
    }

    /// Settings configured from `MORTAR_DEBUG` and `MORTAR_DIRECTION`.
    pub fn from_env() -> Self {
        let default_direction = match std::env::var("MORTAR_DIRECTION").as_deref() {
            Ok(value) if value.trim().eq_ignore_ascii_case("rtl") => TextDirection::Rtl,
            Ok(value) if value.trim().eq_ignore_ascii_case("ltr") => TextDirection::Ltr,
            Ok(value) => {
                tracing::warn!(
                    value,
                    "MORTAR_DIRECTION: expected `ltr` or `rtl`, using `ltr`"
                );
                TextDirection::Ltr
            }
            Err(_) => TextDirection::Ltr,
        };
        Self {
            default_direction,
            debug: DebugFlags::from_env(),
            ..Self::new()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// A shared, mutable reference to a [`Settings`] value.
#[derive(Clone, Debug, Default)]
pub struct SettingsHandle(Rc<RefCell<Settings>>);

impl SettingsHandle {
    /// Creates a handle to a new, unshared settings value.
    pub fn new(settings: Settings) -> Self {
        Self(Rc::new(RefCell::new(settings)))
    }

    /// Borrows the settings.
    pub fn get(&self) -> Ref<'_, Settings> {
        self.0.borrow()
    }

    /// Modifies the settings.
    ///
    /// Widget trees don't observe the change by themselves; use
    /// [`WidgetTree::set_default_direction`](crate::app::WidgetTree::set_default_direction)
    /// to change the direction of live widgets.
    pub fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// The configured debug flags.
    pub fn debug(&self) -> DebugFlags {
        self.0.borrow().debug
    }

    /// Whether two handles share the same settings.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

thread_local! {
    static GLOBAL: OnceCell<SettingsHandle> = const { OnceCell::new() };
}

/// Returns the process-wide settings, reading the environment on first use.
///
/// The tree is single-threaded, so "process-wide" means per thread.
pub fn global() -> SettingsHandle {
    GLOBAL.with(|cell| {
        cell.get_or_init(|| SettingsHandle::new(Settings::from_env()))
            .clone()
    })
}

/// Restores the process-wide settings to their initial values.
///
/// Existing handles observe the reset.
pub fn reset_global() {
    GLOBAL.with(|cell| {
        if let Some(handle) = cell.get() {
            handle.update(|settings| *settings = Settings::from_env());
        }
    });
}

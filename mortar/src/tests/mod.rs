// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! We test the engine end to end here instead of in `mortar_core`, to exercise the
//! passes through real containers and windows rather than through minimal test widgets.

mod geometry;
mod scenarios;
mod state;

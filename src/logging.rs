// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tracing setup for hosts embedding the bridge

use std::env;

/// Install a formatting subscriber, defaulting `RUST_LOG` to `info`
///
/// Returns `false` if the host already installed a global subscriber.
pub fn init_tracing() -> bool {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::try_init().is_ok()
}

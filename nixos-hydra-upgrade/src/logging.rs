// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

/// Default log filter for the given debug setting.
pub fn default_filter(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Installs the global logger. `RUST_LOG` takes precedence over `debug`.
/// Key-value pairs attached to records are printed after the message.
pub fn init(debug: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(debug)),
    )
    .init();
}

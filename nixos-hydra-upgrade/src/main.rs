// SPDX-FileCopyrightText: 2026 nixos-hydra-upgrade contributors
// SPDX-License-Identifier: MIT

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};
use nhu_hydra::HydraClient;
use nhu_nix::{Nix, System};
use nixos_hydra_upgrade::cli::Cli;
use nixos_hydra_upgrade::config;
use nixos_hydra_upgrade::error::{ConfigError, Error, UpgradeError};
use nixos_hydra_upgrade::logging;
use nixos_hydra_upgrade::upgrade::{Outcome, Upgrade};

async fn run(cli: Cli) -> Result<Outcome, Error> {
    let settings = match config::resolve(&cli.sources()) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init(cli.debug);
            return Err(e.into());
        }
    };
    logging::init(settings.debug);
    debug!(settings:? = settings; "Resolved configuration");

    let config = settings.validate().map_err(ConfigError::from)?;

    let hydra = HydraClient::new(config.hydra.instance.clone(), config.hydra.coordinates())
        .map_err(UpgradeError::from)?;
    let upgrade = Upgrade::new(&config, hydra, Nix::new(), System::new());
    Ok(upgrade.run().await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => {
            info!(exit_code = outcome.exit_code(); "{outcome}");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

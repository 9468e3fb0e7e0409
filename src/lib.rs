//! rWorkforce library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::{Config, Secrets};
use errors::AppResult;
use services::Services;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, services: &Services) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(cmd, cfg),
        Commands::Db { .. } => commands::db::handle(cmd, cfg),
        Commands::Log { .. } => commands::log::handle(cmd, cfg),
        Commands::Org { .. } | Commands::Employee { .. } => commands::org::handle(cmd, cfg),
        Commands::Outlet { .. } | Commands::Route { .. } => {
            commands::route::handle(cmd, cfg, services)
        }
        Commands::Attendance { .. } => commands::attendance::handle(cmd, cfg, services),
        Commands::Payroll { .. } => commands::payroll::handle(cmd, cfg),
        Commands::Incident { .. } => commands::incident::handle(cmd, cfg, services),
        Commands::Notify { .. } => commands::notify::handle(cmd, cfg, services),
        Commands::Form { .. } | Commands::Visit { .. } => {
            commands::form::handle(cmd, cfg, services)
        }
        Commands::Backup { .. } => commands::backup::handle(cmd, cfg),
        Commands::Export { .. } => commands::export::handle(cmd, cfg),
    }
}

fn uses_services(cmd: &Commands) -> bool {
    matches!(
        cmd,
        Commands::Outlet { .. }
            | Commands::Route { .. }
            | Commands::Attendance { .. }
            | Commands::Incident { .. }
            | Commands::Notify { .. }
            | Commands::Form { .. }
            | Commands::Visit { .. }
    )
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config is loaded once and handed down.
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(org) = cli.org {
        cfg.organization = org;
    }

    // Integrations are built only for commands that use them.
    let services = if uses_services(&cli.command) {
        Services::from_config(&cfg, &Secrets::from_env())?
    } else {
        Services::default()
    };

    dispatch(&cli, &cfg, &services)
}

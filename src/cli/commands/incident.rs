use crate::cli::parser::{Commands, IncidentAction};
use crate::config::Config;
use crate::core::incident::{IncidentLogic, ScanContext};
use crate::db::queries::incidents;
use crate::errors::AppResult;
use crate::services::Services;
use crate::ui::messages::{detail, header, info};
use crate::utils::path::absolute;

/// Handle the `incident` command
pub fn handle(cmd: &Commands, cfg: &Config, services: &Services) -> AppResult<()> {
    let Commands::Incident { action } = cmd else {
        return Ok(());
    };
    let mut pool = super::open_pool(&cfg.database)?;

    match action {
        IncidentAction::Scan { file, no_alert } => {
            let ctx = ScanContext::new(&cfg.incidents, &cfg.email, services, !*no_alert);
            let outcome = IncidentLogic::scan_file(&mut pool, &absolute(file), &ctx)?;

            header(format!("Scan of {}", file));
            detail("Log entries", outcome.entries);
            detail("Error patterns", outcome.groups);
            detail(
                format!("Below threshold (<{})", cfg.incidents.min_occurrences),
                outcome.below_threshold,
            );
            detail("Incidents created", outcome.created.len());
            detail("Incidents updated", outcome.updated.len());
            detail("Alerts sent", outcome.alerts);

            if outcome.created.is_empty() && outcome.updated.is_empty() {
                info("No recurring errors found.");
            }
        }
        IncidentAction::List { all } => {
            let list = IncidentLogic::list(&mut pool, *all)?;
            IncidentLogic::print_list(&list);
        }
        IncidentAction::Show { id } => {
            let inc = incidents::load_incident(&pool.conn, *id)?;
            IncidentLogic::print_detail(&inc);
        }
        IncidentAction::Resolve { id } => {
            IncidentLogic::resolve(&mut pool, *id, services.webhooks.as_ref())?;
        }
    }

    Ok(())
}

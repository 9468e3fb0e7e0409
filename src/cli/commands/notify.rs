use crate::cli::parser::{Commands, NotifyAction};
use crate::config::Config;
use crate::core::notify::{Dialect, NotificationEvent, Vars, build_payload, parse_vars};
use crate::errors::{AppError, AppResult};
use crate::services::Services;
use crate::ui::messages::{success, warning};
use crate::utils::table::Table;

fn vars_from(pairs: &[String]) -> AppResult<Vars> {
    parse_vars(pairs).map_err(AppError::Other)
}

/// Handle the `notify` command
pub fn handle(cmd: &Commands, cfg: &Config, services: &Services) -> AppResult<()> {
    let Commands::Notify { action } = cmd else {
        return Ok(());
    };

    match action {
        NotifyAction::Events => {
            let mut table = Table::new(vec!["Event", "Variables"]);
            for e in NotificationEvent::ALL {
                table.add_row(vec![e.as_str().to_string(), e.variables().join(", ")]);
            }
            print!("{}", table.render());
        }
        NotifyAction::Render {
            event,
            dialect,
            vars,
        } => {
            let event = NotificationEvent::parse(event)?;
            let dialect = Dialect::parse(dialect)?;
            let payload = build_payload(event, dialect, &vars_from(vars)?);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        NotifyAction::Send { event, vars } => {
            let event = NotificationEvent::parse(event)?;
            let vars = vars_from(vars)?;

            let Some(client) = services.webhooks.as_ref() else {
                warning("No webhook configured (webhooks.slack_url / webhooks.discord_url).");
                return Ok(());
            };

            let pool = super::open_pool(&cfg.database)?;
            let deliveries = client.broadcast(&pool.conn, event, &vars)?;
            let mut failed = 0;
            for d in &deliveries {
                match &d.error {
                    None => success(format!("{} sent to {}.", event, d.dialect)),
                    Some(e) => {
                        failed += 1;
                        warning(format!("{} to {} failed: {}", event, d.dialect, e));
                    }
                }
            }
            if failed == deliveries.len() {
                return Err(AppError::Webhook(format!(
                    "{} of {} deliveries failed",
                    failed,
                    deliveries.len()
                )));
            }
        }
    }

    Ok(())
}

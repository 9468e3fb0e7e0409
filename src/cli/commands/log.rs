use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::queries::notifications;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{GREEN, RED, RESET};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        print,
        limit,
        notifications: show_notifications,
    } = cmd
    {
        let mut pool = super::open_pool(&cfg.database)?;

        if *show_notifications {
            let rows = notifications::load_recent(&pool.conn, limit.unwrap_or(20))?;
            if rows.is_empty() {
                info("No notifications sent yet.");
                return Ok(());
            }
            let mut table = Table::new(vec!["ID", "When", "Event", "Channel", "Status", "Error"]);
            for r in rows {
                let color = if r.status == "sent" { GREEN } else { RED };
                table.add_row(vec![
                    r.id.to_string(),
                    r.created_at,
                    r.event,
                    r.channel,
                    format!("{color}{}{RESET}", r.status),
                    opt_or_dash(r.error),
                ]);
            }
            print!("{}", table.render());
        } else if *print {
            LogLogic::print_log(&mut pool, *limit)?;
        }
    }

    Ok(())
}

use crate::cli::parser::{Commands, EmployeeAction, OrgAction};
use crate::config::Config;
use crate::core::people::PeopleLogic;
use crate::errors::{AppError, AppResult};
use crate::models::profile::Role;

/// Handle the `org` and `employee` commands
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = super::open_pool(&cfg.database)?;

    match cmd {
        Commands::Org { action } => match action {
            OrgAction::Show => PeopleLogic::show_organization(&mut pool, cfg.organization)?,
            OrgAction::Add { name } => {
                PeopleLogic::add_organization(&mut pool, name)?;
            }
            OrgAction::Set { key, value } => {
                PeopleLogic::set_setting(&mut pool, cfg.organization, key, value)?;
            }
        },
        Commands::Employee { action } => match action {
            EmployeeAction::Add { name, email, role } => {
                let role = Role::from_db_str(role).ok_or_else(|| AppError::InvalidRole(role.clone()))?;
                PeopleLogic::add_employee(&mut pool, cfg.organization, name, email, role)?;
            }
            EmployeeAction::List => {
                let list = PeopleLogic::employees(&mut pool, cfg.organization)?;
                PeopleLogic::print_employees(&list);
            }
        },
        _ => {}
    }

    Ok(())
}

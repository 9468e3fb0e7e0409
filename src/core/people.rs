use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{organizations, profiles};
use crate::errors::{AppError, AppResult};
use crate::models::organization::OrgSettings;
use crate::models::profile::{Profile, Role};
use crate::ui::messages::{detail, header, info, success};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;

/// High-level business logic for the `employee` and `org` commands.
pub struct PeopleLogic;

impl PeopleLogic {
    pub fn add_organization(pool: &mut DbPool, name: &str) -> AppResult<i64> {
        let id = organizations::create_organization(&pool.conn, name)?;
        ttlog_quiet(&pool.conn, "org_add", &format!("org {id}"), name);
        success(format!("Organization #{} '{}' created.", id, name));
        Ok(id)
    }

    pub fn add_employee(
        pool: &mut DbPool,
        organization_id: i64,
        full_name: &str,
        email: &str,
        role: Role,
    ) -> AppResult<i64> {
        organizations::load_organization(&pool.conn, organization_id)?;
        if !email.contains('@') {
            return Err(AppError::Other(format!("Invalid email address: {}", email)));
        }

        let id = profiles::insert_profile(&pool.conn, organization_id, full_name, email, role)?;
        ttlog_quiet(
            &pool.conn,
            "employee_add",
            &format!("user {id}"),
            &format!("{} <{}> as {}", full_name, email, role.to_db_str()),
        );
        success(format!("Employee #{} {} added as {}.", id, full_name, role.to_db_str()));
        Ok(id)
    }

    pub fn employees(pool: &mut DbPool, organization_id: i64) -> AppResult<Vec<Profile>> {
        profiles::load_profiles(&pool.conn, organization_id)
    }

    pub fn print_employees(list: &[Profile]) {
        if list.is_empty() {
            info("No employees.");
            return;
        }
        let mut table = Table::new(vec!["ID", "Name", "Email", "Role"]);
        for p in list {
            table.add_row(vec![
                p.id.to_string(),
                p.full_name.clone(),
                p.email.clone(),
                p.role.to_db_str().to_string(),
            ]);
        }
        print!("{}", table.render());
    }

    pub fn set_setting(
        pool: &mut DbPool,
        organization_id: i64,
        key: &str,
        value: &str,
    ) -> AppResult<OrgSettings> {
        organizations::load_organization(&pool.conn, organization_id)?;
        let mut settings = organizations::load_settings(&pool.conn, organization_id)?;
        settings.set(key, value)?;
        organizations::save_settings(&pool.conn, &settings)?;

        ttlog_quiet(
            &pool.conn,
            "org_set",
            &format!("org {organization_id}"),
            &format!("{key}={value}"),
        );
        success(format!("{} set to {}.", key, value));
        Ok(settings)
    }

    pub fn show_organization(pool: &mut DbPool, organization_id: i64) -> AppResult<()> {
        let org = organizations::load_organization(&pool.conn, organization_id)?;
        let s = organizations::load_settings(&pool.conn, organization_id)?;

        header(format!("Organization #{} {}", org.id, org.name));
        detail("currency", &s.currency);
        detail("member_rate", s.member_rate);
        detail("manager_rate", opt_or_dash(s.manager_rate));
        detail("admin_rate", opt_or_dash(s.admin_rate));
        detail("overtime_mode", s.overtime_mode.to_db_str());
        detail("overtime_threshold", s.overtime_threshold);
        detail("overtime_multiplier", s.overtime_multiplier);
        detail("tax_rate", s.tax_rate);
        detail("benefits_rate", s.benefits_rate);
        detail("other_rate", s.other_rate);
        Ok(())
    }
}

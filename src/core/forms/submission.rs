use super::validator::{check_definition, validate};
use crate::core::notify::{NotificationEvent, Vars, WebhookClient, notify_quiet};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{forms, profiles, routes, visits};
use crate::errors::{AppError, AppResult};
use crate::models::form::{Answers, FieldValue, Form, FormDefinition, FormResponse};
use crate::models::visit::OutletVisit;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, GREY, RESET};
use crate::utils::date::now;
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;
use chrono::NaiveDateTime;

/// High-level business logic for the `form` command.
pub struct FormLogic;

impl FormLogic {
    pub fn create(pool: &mut DbPool, organization_id: i64, def: &FormDefinition) -> AppResult<i64> {
        let problems = check_definition(def);
        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        let id = forms::insert_form(&pool.conn, organization_id, def)?;
        ttlog_quiet(
            &pool.conn,
            "form_create",
            &format!("form {id}"),
            &format!("{} ({} fields)", def.title, def.fields.len()),
        );
        success(format!("Form #{} '{}' created.", id, def.title));
        Ok(id)
    }

    /// Store a response after validating it. When `visit_id` is given the
    /// open visit is closed and linked to the response.
    pub fn submit(
        pool: &mut DbPool,
        form_id: i64,
        user_id: i64,
        answers: &Answers,
        visit_id: Option<i64>,
        webhooks: Option<&WebhookClient>,
    ) -> AppResult<i64> {
        let form = forms::load_form(&pool.conn, form_id)?;
        let member = profiles::load_profile(&pool.conn, user_id)?;

        let errors = validate(&form.definition, answers);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let visit = match visit_id {
            Some(id) => {
                let v = visits::load_visit(&pool.conn, id)?;
                if v.user_id != user_id {
                    return Err(AppError::Other(format!(
                        "Visit #{} belongs to another member",
                        id
                    )));
                }
                if !v.is_open() {
                    return Err(AppError::Other(format!("Visit #{} is already closed", id)));
                }
                Some(v)
            }
            None => None,
        };

        let submitted_at = now();
        let tx = pool.conn.unchecked_transaction()?;
        let response_id = forms::insert_response(
            &tx,
            form_id,
            user_id,
            visit.as_ref().map(|v| v.outlet_id),
            &submitted_at,
            answers,
        )?;
        if let Some(v) = &visit {
            visits::complete_visit(&tx, v.id, &submitted_at, response_id)?;
        }
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "form_submit",
            &format!("form {form_id}"),
            &format!("response {} by user {}", response_id, user_id),
        );
        success(format!(
            "Response #{} to '{}' stored.",
            response_id, form.definition.title
        ));

        let outlet = match &visit {
            Some(v) => routes::load_outlet(&pool.conn, v.outlet_id)?.name,
            None => "-".to_string(),
        };
        let mut vars = Vars::new();
        vars.insert("name".into(), member.full_name);
        vars.insert("form".into(), form.definition.title.clone());
        vars.insert("outlet".into(), outlet);
        vars.insert("submitted_at".into(), submitted_at.format("%Y-%m-%d %H:%M").to_string());
        notify_quiet(webhooks, &pool.conn, NotificationEvent::FormSubmitted, &vars);

        Ok(response_id)
    }

    pub fn print_forms(list: &[Form]) {
        if list.is_empty() {
            info("No forms.");
            return;
        }

        let mut table = Table::new(vec!["ID", "Title", "Fields", "Created"]);
        for f in list {
            table.add_row(vec![
                f.id.to_string(),
                f.definition.title.clone(),
                f.definition.fields.len().to_string(),
                f.created_at.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    /// One row per response with answers in field order.
    pub fn print_responses(form: &Form, list: &[FormResponse]) {
        if list.is_empty() {
            info(format!("No responses to '{}'.", form.definition.title));
            return;
        }

        let fields: Vec<_> = form
            .definition
            .fields
            .iter()
            .filter(|f| !f.field_type.is_decorative())
            .collect();

        let mut headers = vec!["ID".to_string(), "Member".to_string(), "Submitted".to_string()];
        headers.extend(fields.iter().map(|f| f.id.clone()));
        let mut table = Table::new(headers);

        for r in list {
            let mut row = vec![
                r.id.to_string(),
                r.user_id.to_string(),
                r.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            ];
            row.extend(
                fields
                    .iter()
                    .map(|f| opt_or_dash(r.answers.get(&f.id).map(FieldValue::display))),
            );
            table.add_row(row);
        }
        print!("{}", table.render());
    }
}

/// High-level business logic for the `visit` command.
pub struct VisitLogic;

impl VisitLogic {
    pub fn check_in(
        pool: &mut DbPool,
        outlet_id: i64,
        user_id: i64,
        at: NaiveDateTime,
    ) -> AppResult<i64> {
        let outlet = routes::load_outlet(&pool.conn, outlet_id)?;
        let member = profiles::load_profile(&pool.conn, user_id)?;

        let id = visits::insert_visit(&pool.conn, outlet_id, user_id, &at)?;
        ttlog_quiet(
            &pool.conn,
            "visit_checkin",
            &format!("visit {id}"),
            &format!("{} at {}", member.full_name, outlet.name),
        );
        success(format!(
            "Visit #{}: {} checked in at {}.",
            id, member.full_name, outlet.name
        ));
        Ok(id)
    }

    pub fn list(pool: &mut DbPool, user_id: Option<i64>) -> AppResult<Vec<OutletVisit>> {
        visits::load_visits(&pool.conn, user_id)
    }

    pub fn print(list: &[OutletVisit]) {
        if list.is_empty() {
            info("No visits.");
            return;
        }

        let mut table = Table::new(vec!["ID", "Outlet", "Member", "In", "Out", "Form"]);
        for v in list {
            let form = match v.form_response_id {
                Some(r) if v.form_completed => format!("{GREEN}#{r}{RESET}"),
                _ => format!("{GREY}-{RESET}"),
            };
            table.add_row(vec![
                v.id.to_string(),
                v.outlet_id.to_string(),
                v.user_id.to_string(),
                v.check_in_time.format("%Y-%m-%d %H:%M").to_string(),
                opt_or_dash(v.check_out_time.map(|t| t.format("%H:%M").to_string())),
                form,
            ]);
        }
        print!("{}", table.render());
    }
}

use super::read_json;
use crate::cli::parser::{Commands, FormAction, VisitAction};
use crate::config::Config;
use crate::core::forms::{FormLogic, ValidationErrors, VisitLogic, render_form, validate};
use crate::db::queries::forms;
use crate::errors::{AppError, AppResult};
use crate::models::form::{Answers, FormDefinition};
use crate::services::Services;
use crate::ui::messages::{error, success};
use crate::utils::date::{now, parse_datetime};

fn print_errors(errors: &ValidationErrors) {
    for (field, msg) in errors {
        error(format!("{}: {}", field, msg));
    }
}

/// Print per-field messages before the error reaches `main`.
fn report<T>(res: AppResult<T>) -> AppResult<T> {
    if let Err(AppError::Validation(errors)) = &res {
        print_errors(errors);
    }
    res
}

/// Handle the `form` and `visit` commands
pub fn handle(cmd: &Commands, cfg: &Config, services: &Services) -> AppResult<()> {
    let mut pool = super::open_pool(&cfg.database)?;

    match cmd {
        Commands::Form { action } => match action {
            FormAction::Create { file } => {
                let def: FormDefinition = read_json(file)?;
                report(FormLogic::create(&mut pool, cfg.organization, &def))?;
            }
            FormAction::List => {
                let list = forms::load_forms(&pool.conn, cfg.organization)?;
                FormLogic::print_forms(&list);
            }
            FormAction::Show { id } => {
                let form = forms::load_form(&pool.conn, *id)?;
                print!("{}", render_form(&form));
            }
            FormAction::Validate { form, answers } => {
                let form = forms::load_form(&pool.conn, *form)?;
                let answers: Answers = read_json(answers)?;
                let errors = validate(&form.definition, &answers);
                if !errors.is_empty() {
                    print_errors(&errors);
                    return Err(AppError::Validation(errors));
                }
                success(format!("Answers are valid for '{}'.", form.definition.title));
            }
            FormAction::Submit {
                form,
                member,
                answers,
                visit,
            } => {
                let answers: Answers = read_json(answers)?;
                report(FormLogic::submit(
                    &mut pool,
                    *form,
                    *member,
                    &answers,
                    *visit,
                    services.webhooks.as_ref(),
                ))?;
            }
            FormAction::Responses { id } => {
                let form = forms::load_form(&pool.conn, *id)?;
                let list = forms::load_responses(&pool.conn, *id)?;
                FormLogic::print_responses(&form, &list);
            }
        },

        Commands::Visit { action } => match action {
            VisitAction::Checkin { outlet, member, at } => {
                let at = match at {
                    Some(s) => parse_datetime(s)?,
                    None => now(),
                };
                VisitLogic::check_in(&mut pool, *outlet, *member, at)?;
            }
            VisitAction::List { member } => {
                let list = VisitLogic::list(&mut pool, *member)?;
                VisitLogic::print(&list);
            }
        },

        _ => {}
    }

    Ok(())
}

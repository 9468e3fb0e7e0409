use chrono::NaiveDateTime;
use rworkforce::core::forms::validator::check_definition;
use rworkforce::core::forms::{FormLogic, VisitLogic, Widget, render_form, validate, widget_for};
use rworkforce::core::people::PeopleLogic;
use rworkforce::core::routes::planner::RouteLogic;
use rworkforce::db::pool::DbPool;
use rworkforce::db::queries::{forms, visits};
use rworkforce::errors::AppError;
use rworkforce::models::form::{Answers, FormDefinition};
use rworkforce::models::profile::Role;
use serde_json::json;

fn definition() -> FormDefinition {
    serde_json::from_value(json!({
        "title": "Store audit",
        "fields": [
            { "id": "intro", "type": "section", "label": "Shelf" },
            { "id": "manager", "type": "text", "label": "Store manager", "required": true,
              "settings": { "min_length": 2, "max_length": 20 } },
            { "id": "phone", "type": "text", "label": "Phone", "settings": { "format": "phone" } },
            { "id": "contact", "type": "email", "label": "Contact" },
            { "id": "facings", "type": "number", "label": "Facings",
              "settings": { "min": 0, "max": 50 } },
            { "id": "display", "type": "select", "label": "Display", "options": ["end cap", "aisle"] },
            { "id": "issues", "type": "checkbox", "label": "Issues", "required": true,
              "options": ["x", "y"] },
            { "id": "visit_date", "type": "date", "label": "Visit date" },
            { "id": "score", "type": "rating", "label": "Score" },
            { "id": "clean", "type": "likert", "label": "Store is clean" },
            { "id": "code", "type": "text", "label": "Code", "settings": { "pattern": "[A-Z]{3}" } }
        ]
    }))
    .unwrap()
}

fn answers(value: serde_json::Value) -> Answers {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_valid_answers_pass() {
    let errors = validate(
        &definition(),
        &answers(json!({
            "manager": "Ann",
            "phone": "+39 02 1234567",
            "contact": "ann@example.com",
            "facings": 12,
            "display": "aisle",
            "issues": ["x"],
            "visit_date": "2025-03-03",
            "score": 4,
            "clean": "Agree",
            "code": "ABC"
        })),
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_required_checkbox_rejects_empty_list() {
    let errors = validate(
        &definition(),
        &answers(json!({ "manager": "Ann", "issues": [] })),
    );
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("issues"));
}

#[test]
fn test_optional_fields_may_be_missing_or_null() {
    let errors = validate(
        &definition(),
        &answers(json!({ "manager": "Ann", "issues": ["y"], "contact": null, "phone": "" })),
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_each_rule_reports_its_field() {
    let errors = validate(
        &definition(),
        &answers(json!({
            "manager": "A",
            "phone": "call me",
            "contact": "not-an-email",
            "facings": 51,
            "display": "window",
            "issues": ["z"],
            "visit_date": "03/03/2025",
            "score": 6,
            "clean": "Meh",
            "code": "ABCD"
        })),
    );

    for id in [
        "manager",
        "phone",
        "contact",
        "facings",
        "display",
        "issues",
        "visit_date",
        "score",
        "clean",
        "code",
    ] {
        assert!(errors.contains_key(id), "expected an error for {}", id);
    }
    assert!(!errors.contains_key("intro"));
}

#[test]
fn test_rating_must_be_whole() {
    let errors = validate(
        &definition(),
        &answers(json!({ "manager": "Ann", "issues": ["x"], "score": 2.5 })),
    );
    assert!(errors.contains_key("score"));
}

#[test]
fn test_definition_checks() {
    let def: FormDefinition = serde_json::from_value(json!({
        "title": " ",
        "fields": [
            { "id": "a", "type": "text", "label": "A" },
            { "id": "a", "type": "text", "label": "A again" },
            { "id": "b", "type": "radio", "label": "B" },
            { "id": "c", "type": "number", "label": "C", "settings": { "min": 5, "max": 1 } },
            { "id": "d", "type": "text", "label": "D", "settings": { "pattern": "(" } }
        ]
    }))
    .unwrap();

    let problems = check_definition(&def);
    assert!(problems.contains_key("title"));
    assert!(problems.contains_key("a"));
    assert!(problems.contains_key("b"));
    assert!(problems.contains_key("c"));
    assert!(problems.contains_key("d"));

    assert!(check_definition(&definition()).is_empty());
}

#[test]
fn test_widgets() {
    let def = definition();
    assert_eq!(widget_for(&def.fields[0]), Widget::Heading);
    assert_eq!(widget_for(&def.fields[2]), Widget::TextInput { input_type: "tel" });
    assert_eq!(widget_for(&def.fields[3]), Widget::TextInput { input_type: "email" });
    assert_eq!(widget_for(&def.fields[8]), Widget::Stars { scale: 5 });
    match widget_for(&def.fields[9]) {
        Widget::LikertScale { options } => assert_eq!(options.len(), 5),
        other => panic!("unexpected widget {:?}", other),
    }
}

#[test]
fn test_submit_closes_visit() {
    let mut pool = DbPool::in_memory().unwrap();
    let ann = PeopleLogic::add_employee(&mut pool, 1, "Ann", "ann@example.com", Role::Member)
        .unwrap();
    let bob = PeopleLogic::add_employee(&mut pool, 1, "Bob", "bob@example.com", Role::Member)
        .unwrap();
    let outlet = RouteLogic::add_outlet(&mut pool, 1, "Corner shop", "Main St 1", None, None)
        .unwrap();
    let form_id = FormLogic::create(&mut pool, 1, &definition()).unwrap();

    let at = NaiveDateTime::parse_from_str("2025-03-03 10:00", "%Y-%m-%d %H:%M").unwrap();
    let visit = VisitLogic::check_in(&mut pool, outlet, ann, at).unwrap();

    let good = answers(json!({ "manager": "Ann", "issues": ["x"] }));

    // someone else's visit
    let res = FormLogic::submit(&mut pool, form_id, bob, &good, Some(visit), None);
    assert!(res.is_err());

    // invalid answers leave the visit open
    let bad = answers(json!({ "manager": "Ann" }));
    let res = FormLogic::submit(&mut pool, form_id, ann, &bad, Some(visit), None);
    assert!(matches!(res, Err(AppError::Validation(_))));
    assert!(visits::load_visit(&pool.conn, visit).unwrap().is_open());

    let response = FormLogic::submit(&mut pool, form_id, ann, &good, Some(visit), None).unwrap();
    let v = visits::load_visit(&pool.conn, visit).unwrap();
    assert!(!v.is_open());
    assert!(v.form_completed);
    assert_eq!(v.form_response_id, Some(response));

    let stored = forms::load_responses(&pool.conn, form_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].outlet_id, Some(outlet));

    // a closed visit cannot be completed twice
    let res = FormLogic::submit(&mut pool, form_id, ann, &good, Some(visit), None);
    assert!(res.is_err());
}

#[test]
fn test_create_rejects_broken_definition() {
    let mut pool = DbPool::in_memory().unwrap();
    let def: FormDefinition =
        serde_json::from_value(json!({ "title": "", "fields": [] })).unwrap();
    let res = FormLogic::create(&mut pool, 1, &def);
    assert!(matches!(res, Err(AppError::Validation(_))));
}

#[test]
fn test_render_form_lists_fields() {
    let mut pool = DbPool::in_memory().unwrap();
    let id = FormLogic::create(&mut pool, 1, &definition()).unwrap();
    let form = forms::load_form(&pool.conn, id).unwrap();

    let text = render_form(&form);
    assert!(text.contains("Store audit"));
    assert!(text.contains("Store manager *"));
    assert!(text.contains("== Shelf =="));
}

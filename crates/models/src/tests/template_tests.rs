use std::collections::HashMap;

use chrono::Utc;

use crate::template::{default_templates, placeholders, render, MessageTemplate, NewTemplate, TemplatePatch};

#[test]
fn extracts_placeholders_in_order_without_duplicates() {
    let body = "Hi {client_name}, {date} at {time}. Bye {client_name}! {not closed {} {bad-token}";
    assert_eq!(placeholders(body), vec!["client_name", "date", "time"]);
}

#[test]
fn render_leaves_unknown_tokens() {
    let mut vars = HashMap::new();
    vars.insert("client_name".to_string(), "Rita".to_string());
    let out = render("Hi {client_name}, see you {date}. {client_name}!", &vars);
    assert_eq!(out, "Hi Rita, see you {date}. Rita!");
}

#[test]
fn render_handles_braces_and_unicode() {
    let mut vars = HashMap::new();
    vars.insert("x".to_string(), "✓".to_string());
    assert_eq!(render("{{x}} é {x}", &vars), "{✓} é ✓");
}

#[test]
fn template_requires_body() {
    assert!(MessageTemplate::create(NewTemplate { name: "n".into(), body: "  ".into(), ..Default::default() }, Utc::now()).is_err());
    let mut t = MessageTemplate::create(NewTemplate { name: "n".into(), body: "Hi {client_name}".into(), ..Default::default() }, Utc::now()).unwrap();
    assert!(t.apply(TemplatePatch { body: Some(String::new()), ..Default::default() }).is_err());
    assert_eq!(t.placeholders(), vec!["client_name"]);
}

#[test]
fn defaults_use_known_placeholders() {
    let templates = default_templates(Utc::now());
    assert_eq!(templates.len(), 3);
    for t in templates {
        assert!(!t.channels.is_empty());
        assert!(t.placeholders().contains(&"client_name".to_string()));
    }
}

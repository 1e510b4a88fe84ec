use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::appointment::{validate_duration, validate_price, Appointment, AppointmentPatch, NewAppointment};
use crate::catalog::normalize_tags;
use crate::client::{Client, ClientPatch, NewClient};
use crate::price::validate_base_price;
use crate::{validate_email, validate_name, validate_optional_email};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[test]
fn names_are_trimmed_and_required() {
    assert_eq!(validate_name("name", "  Rita ").unwrap(), "Rita");
    assert!(validate_name("name", "   ").is_err());
    assert!(validate_name("name", &"x".repeat(121)).is_err());
}

#[test]
fn email_rules() {
    assert!(validate_email("ink@studio.com").is_ok());
    for bad in ["", "no-at", "@studio.com", "a@b", "a@.com", "a@b@c.com"] {
        assert!(validate_email(bad).is_err(), "{bad}");
    }
    assert_eq!(validate_optional_email("  ").unwrap(), "");
}

#[test]
fn client_patch_is_all_or_nothing() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut c = Client::create(NewClient { name: "Rita".into(), instagram: "@rita.ink".into(), ..Default::default() }, now).unwrap();
    assert_eq!(c.instagram, "rita.ink");

    let bad = ClientPatch { name: Some("Rosa".into()), email: Some("broken".into()), ..Default::default() };
    assert!(c.apply(bad).is_err());
    assert_eq!(c.name, "Rita");

    c.apply(ClientPatch { birth_date: Some(Some(day(3))), ..Default::default() }).unwrap();
    assert_eq!(c.birth_date, Some(day(3)));
    c.apply(ClientPatch { birth_date: Some(None), ..Default::default() }).unwrap();
    assert_eq!(c.birth_date, None);
}

#[test]
fn sessions_only_move_forward() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let mut c = Client::create(NewClient { name: "Rita".into(), ..Default::default() }, now).unwrap();
    c.record_session(day(10));
    c.record_session(day(5));
    assert_eq!(c.total_sessions, 2);
    assert_eq!(c.last_session_at, Some(day(10)));
    assert!(c.matches("RIT"));
    assert!(!c.matches("zzz"));
}

#[test]
fn appointment_bounds() {
    assert!(validate_duration(0).is_err());
    assert!(validate_duration(1440).is_ok());
    assert!(validate_duration(1441).is_err());
    assert!(validate_price(Some(-1)).is_err());
    assert_eq!(validate_price(None).unwrap(), None);
    assert!(validate_base_price(-5).is_err());
}

#[test]
fn overlap_is_half_open() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let input = NewAppointment {
        client_id: Uuid::new_v4(),
        date: day(3),
        time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        duration_minutes: 60,
        description: String::new(),
        price_cents: None,
        notes: String::new(),
    };
    let mut a = Appointment::create(input, "Rita", now).unwrap();
    let at = |h: u32| day(3).and_hms_opt(h, 0, 0).unwrap();
    assert!(a.overlaps(at(14), at(15)));
    assert!(!a.overlaps(at(15), at(16)));
    assert!(!a.overlaps(at(13), at(14)));

    assert!(a.apply(AppointmentPatch { duration_minutes: Some(0), ..Default::default() }).is_err());
    assert_eq!(a.duration_minutes, 60);
}

#[test]
fn tags_are_normalized() {
    let tags = normalize_tags(vec!["#Floral".into(), " floral ".into(), "".into(), "Blackwork".into()]);
    assert_eq!(tags, vec!["floral", "blackwork"]);
}

use crate::appointment::AppointmentStatus::{self, *};

#[test]
fn pending_can_move_anywhere() {
    for next in [Confirmed, Cancelled, Completed, Pending] {
        assert!(Pending.can_transition_to(next), "pending -> {next}");
    }
}

#[test]
fn confirmed_cannot_go_back_to_pending() {
    assert!(!Confirmed.can_transition_to(Pending));
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Confirmed.can_transition_to(Cancelled));
}

#[test]
fn terminal_states_are_final() {
    for terminal in [Cancelled, Completed] {
        assert!(terminal.is_terminal());
        for next in [Pending, Confirmed] {
            assert!(!terminal.can_transition_to(next));
        }
        assert!(terminal.can_transition_to(terminal));
    }
    assert!(!Cancelled.can_transition_to(Completed));
}

#[test]
fn parses_and_serializes_lowercase() -> anyhow::Result<()> {
    assert_eq!("Confirmed".parse::<AppointmentStatus>()?, Confirmed);
    assert_eq!("canceled".parse::<AppointmentStatus>()?, Cancelled);
    assert!("done".parse::<AppointmentStatus>().is_err());
    assert_eq!(serde_json::to_string(&Completed)?, "\"completed\"");
    Ok(())
}

use crate::workflows::intake::{AgreementError, AgreementGate, AgreementStatus};

#[test]
fn starts_unset_and_hidden() {
    let gate = AgreementGate::default();
    assert_eq!(gate.current_status(), AgreementStatus::Unset);
    assert!(!gate.is_presenting());
    assert!(gate.notice().contains("you'll be asked to review"));
}

#[test]
fn accept_records_agreement_and_hides() {
    let mut gate = AgreementGate::default();
    gate.reopen().expect("unset gate can reopen");
    assert!(gate.is_presenting());

    assert_eq!(gate.accept(), AgreementStatus::Agreed);
    assert!(!gate.is_presenting());
    assert_eq!(
        gate.notice(),
        "You have agreed to the Engineer Registration Agreement."
    );
}

#[test]
fn decline_is_recorded_and_can_be_reopened() {
    let mut gate = AgreementGate::default();
    assert_eq!(gate.decline(), Ok(AgreementStatus::Declined));
    assert_eq!(gate.notice(), "You must agree to the terms to register.");

    gate.reopen().expect("declined gate can reopen");
    assert!(gate.is_presenting());
    assert_eq!(gate.current_status(), AgreementStatus::Declined);

    gate.accept();
    assert_eq!(gate.current_status(), AgreementStatus::Agreed);
}

#[test]
fn agreed_gate_refuses_decline_and_reopen() {
    let mut gate = AgreementGate::default();
    gate.accept();

    assert_eq!(gate.decline(), Err(AgreementError::AlreadyAgreed));
    assert_eq!(gate.reopen(), Err(AgreementError::AlreadyAgreed));
    assert_eq!(gate.current_status(), AgreementStatus::Agreed);
}

#[test]
fn dismiss_leaves_status_alone() {
    let mut gate = AgreementGate::default();
    gate.reopen().expect("unset gate can reopen");
    gate.dismiss();

    assert!(!gate.is_presenting());
    assert_eq!(gate.current_status(), AgreementStatus::Unset);
}

#[test]
fn view_serializes_snake_case_status() {
    let mut gate = AgreementGate::default();
    gate.decline().expect("unset gate can decline");
    let json = serde_json::to_value(gate.view()).expect("serializes");

    assert_eq!(json["status"], "declined");
    assert_eq!(json["presenting"], false);
}

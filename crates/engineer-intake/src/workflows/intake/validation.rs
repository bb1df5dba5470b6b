//! Field rules for both intake kinds.
//!
//! Each rule inspects one field (or the schedule pair) and contributes at most one message, so a
//! field's verdict never depends on whether its neighbours are valid.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use super::fields::{BookingField, FieldErrors, RegistrationField, ScheduleMode};
use super::forms::{BookingForm, RegistrationForm};

pub const MAX_YEARS_EXPERIENCE: f64 = 60.0;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && email_pattern().is_match(value)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn parse_schedule_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_schedule_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Evaluate every booking rule. `today` bounds the earliest schedulable date.
pub fn validate_booking(form: &BookingForm, today: NaiveDate) -> FieldErrors<BookingField> {
    let mut errors = FieldErrors::new();

    if is_blank(&form.name) {
        errors.insert(BookingField::Name, "Name is required");
    }
    if !is_valid_email(&form.email) {
        errors.insert(BookingField::Email, "Valid email is required");
    }
    if is_blank(&form.phone) {
        errors.insert(BookingField::Phone, "Phone number is required");
    }
    if is_blank(&form.location) {
        errors.insert(BookingField::Location, "Location is required");
    }
    if form.service().is_none() {
        errors.insert(BookingField::ServiceType, "Please select a service type");
    }

    if form.schedule_mode == ScheduleMode::Scheduled {
        if is_blank(&form.schedule_date) {
            errors.insert(BookingField::ScheduleDate, "Please select a date");
        } else {
            match parse_schedule_date(&form.schedule_date) {
                None => errors.insert(BookingField::ScheduleDate, "Please select a valid date"),
                Some(date) if date < today => {
                    errors.insert(BookingField::ScheduleDate, "Date cannot be in the past")
                }
                Some(_) => {}
            }
        }

        if is_blank(&form.schedule_time) {
            errors.insert(BookingField::ScheduleTime, "Please select a time");
        } else if parse_schedule_time(&form.schedule_time).is_none() {
            errors.insert(BookingField::ScheduleTime, "Please select a valid time");
        }
    }

    errors
}

/// Evaluate every registration rule. License number is free text and never fails.
pub fn validate_registration(form: &RegistrationForm) -> FieldErrors<RegistrationField> {
    let mut errors = FieldErrors::new();

    let required = [
        (RegistrationField::FirstName, &form.first_name),
        (RegistrationField::LastName, &form.last_name),
        (RegistrationField::Phone, &form.phone),
        (RegistrationField::City, &form.city),
        (RegistrationField::Country, &form.country),
    ];
    for (field, value) in required {
        if is_blank(value) {
            errors.insert(field, "Required");
        }
    }

    if !is_valid_email(&form.email) {
        errors.insert(RegistrationField::Email, "Valid email required");
    }
    if form.discipline().is_none() {
        errors.insert(RegistrationField::Discipline, "Required");
    }

    let years_in_range =
        |years: f64| years.is_finite() && (0.0..=MAX_YEARS_EXPERIENCE).contains(&years);
    match form.years_experience() {
        Some(Ok(years)) if years_in_range(years) => {}
        Some(_) => errors.insert(
            RegistrationField::YearsExperience,
            "Years of experience must be between 0 and 60",
        ),
        None => {}
    }

    errors
}

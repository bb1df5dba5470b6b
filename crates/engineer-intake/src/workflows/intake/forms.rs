use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::fields::{BookingField, Discipline, RegistrationField, ScheduleMode, ServiceType};

/// Raw values captured by the booking form. Values are stored as typed by the user;
/// trimming and parsing happen during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub service_type: String,
    pub description: String,
    pub schedule_mode: ScheduleMode,
    pub schedule_date: String,
    pub schedule_time: String,
}

impl BookingForm {
    pub fn set(&mut self, field: BookingField, value: &str) -> Result<(), SessionError> {
        let slot = match field {
            BookingField::Name => &mut self.name,
            BookingField::Email => &mut self.email,
            BookingField::Phone => &mut self.phone,
            BookingField::Location => &mut self.location,
            BookingField::ServiceType => &mut self.service_type,
            BookingField::Description => &mut self.description,
            BookingField::ScheduleDate => &mut self.schedule_date,
            BookingField::ScheduleTime => &mut self.schedule_time,
            BookingField::ScheduleMode => {
                self.schedule_mode = value.parse().map_err(|_| SessionError::InvalidValue {
                    field: field.name(),
                    value: value.to_string(),
                })?;
                return Ok(());
            }
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn service(&self) -> Option<ServiceType> {
        ServiceType::from_label(&self.service_type)
    }
}

/// Raw values captured by the engineer registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub discipline: String,
    pub license_number: String,
    pub years_experience: String,
    pub city: String,
    pub country: String,
}

impl RegistrationForm {
    pub fn set(&mut self, field: RegistrationField, value: &str) {
        let slot = match field {
            RegistrationField::FirstName => &mut self.first_name,
            RegistrationField::LastName => &mut self.last_name,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Phone => &mut self.phone,
            RegistrationField::Discipline => &mut self.discipline,
            RegistrationField::LicenseNumber => &mut self.license_number,
            RegistrationField::YearsExperience => &mut self.years_experience,
            RegistrationField::City => &mut self.city,
            RegistrationField::Country => &mut self.country,
        };
        *slot = value.to_string();
    }

    pub fn discipline(&self) -> Option<Discipline> {
        Discipline::from_label(&self.discipline)
    }

    /// `None` when left blank, `Some(Err(()))` when present but not a number.
    pub fn years_experience(&self) -> Option<Result<f64, ()>> {
        let raw = self.years_experience.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.parse::<f64>().map_err(|_| ()))
    }
}

/// A single field edit raised by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

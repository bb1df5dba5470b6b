use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Which of the two workflows a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeKind {
    Booking,
    Registration,
}

impl IntakeKind {
    pub const fn label(self) -> &'static str {
        match self {
            IntakeKind::Booking => "booking",
            IntakeKind::Registration => "registration",
        }
    }
}

/// Whether a booking wants the next available engineer or a specific slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    #[default]
    Immediate,
    Scheduled,
}

impl FromStr for ScheduleMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" | "now" | "asap" => Ok(Self::Immediate),
            "scheduled" | "later" | "schedule" => Ok(Self::Scheduled),
            _ => Err(()),
        }
    }
}

/// Services a customer can book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Electrical Engineering")]
    Electrical,
    #[serde(rename = "Mechanical Engineering")]
    Mechanical,
    #[serde(rename = "Civil & Structural Engineering")]
    CivilStructural,
    #[serde(rename = "IT & Network Engineering")]
    ItNetwork,
    #[serde(rename = "HVAC Engineering")]
    Hvac,
    #[serde(rename = "Other")]
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::Electrical,
        ServiceType::Mechanical,
        ServiceType::CivilStructural,
        ServiceType::ItNetwork,
        ServiceType::Hvac,
        ServiceType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Electrical => "Electrical Engineering",
            ServiceType::Mechanical => "Mechanical Engineering",
            ServiceType::CivilStructural => "Civil & Structural Engineering",
            ServiceType::ItNetwork => "IT & Network Engineering",
            ServiceType::Hvac => "HVAC Engineering",
            ServiceType::Other => "Other",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|kind| kind.label() == value)
    }
}

/// Engineering disciplines an engineer can register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    #[serde(rename = "Electrical Engineering")]
    Electrical,
    #[serde(rename = "Mechanical Engineering")]
    Mechanical,
    #[serde(rename = "Civil Engineering")]
    Civil,
    #[serde(rename = "Structural Engineering")]
    Structural,
    #[serde(rename = "IT & Network Engineering")]
    ItNetwork,
    #[serde(rename = "HVAC Engineering")]
    Hvac,
    #[serde(rename = "Chemical Engineering")]
    Chemical,
    #[serde(rename = "Software Engineering")]
    Software,
    #[serde(rename = "Other")]
    Other,
}

impl Discipline {
    pub const ALL: [Discipline; 9] = [
        Discipline::Electrical,
        Discipline::Mechanical,
        Discipline::Civil,
        Discipline::Structural,
        Discipline::ItNetwork,
        Discipline::Hvac,
        Discipline::Chemical,
        Discipline::Software,
        Discipline::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Discipline::Electrical => "Electrical Engineering",
            Discipline::Mechanical => "Mechanical Engineering",
            Discipline::Civil => "Civil Engineering",
            Discipline::Structural => "Structural Engineering",
            Discipline::ItNetwork => "IT & Network Engineering",
            Discipline::Hvac => "HVAC Engineering",
            Discipline::Chemical => "Chemical Engineering",
            Discipline::Software => "Software Engineering",
            Discipline::Other => "Other",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|kind| kind.label() == value)
    }
}

/// Editable fields of a booking form, named as the view layer sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    Name,
    Email,
    Phone,
    Location,
    ServiceType,
    Description,
    ScheduleMode,
    ScheduleDate,
    ScheduleTime,
}

impl BookingField {
    pub const fn name(self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
            BookingField::Location => "location",
            BookingField::ServiceType => "serviceType",
            BookingField::Description => "description",
            BookingField::ScheduleMode => "scheduleMode",
            BookingField::ScheduleDate => "scheduleDate",
            BookingField::ScheduleTime => "scheduleTime",
        }
    }
}

impl FromStr for BookingField {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value {
            "name" => BookingField::Name,
            "email" => BookingField::Email,
            "phone" => BookingField::Phone,
            "location" => BookingField::Location,
            "serviceType" => BookingField::ServiceType,
            "description" => BookingField::Description,
            "scheduleMode" => BookingField::ScheduleMode,
            "scheduleDate" => BookingField::ScheduleDate,
            "scheduleTime" => BookingField::ScheduleTime,
            other => return Err(SessionError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editable fields of an engineer registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    FirstName,
    LastName,
    Email,
    Phone,
    Discipline,
    LicenseNumber,
    YearsExperience,
    City,
    Country,
}

impl RegistrationField {
    pub const fn name(self) -> &'static str {
        match self {
            RegistrationField::FirstName => "firstName",
            RegistrationField::LastName => "lastName",
            RegistrationField::Email => "email",
            RegistrationField::Phone => "phone",
            RegistrationField::Discipline => "discipline",
            RegistrationField::LicenseNumber => "licenseNumber",
            RegistrationField::YearsExperience => "yearsExperience",
            RegistrationField::City => "city",
            RegistrationField::Country => "country",
        }
    }
}

impl FromStr for RegistrationField {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value {
            "firstName" => RegistrationField::FirstName,
            "lastName" => RegistrationField::LastName,
            "email" => RegistrationField::Email,
            "phone" => RegistrationField::Phone,
            "discipline" => RegistrationField::Discipline,
            "licenseNumber" => RegistrationField::LicenseNumber,
            "yearsExperience" => RegistrationField::YearsExperience,
            "city" => RegistrationField::City,
            "country" => RegistrationField::Country,
            other => return Err(SessionError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-scoped validation messages. A field without an entry is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, String>);

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self, field: F) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: F) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

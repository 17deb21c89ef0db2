//! Report form validation.
//!
//! Validation is a pure function of the form data, the two rich-text documents and the current
//! date. Every rule runs; the resulting [`ValidationErrors`] holds one message per failing field.
//! When several rules fail for the same field, the later rule's message wins (required, then
//! length, then format).

use crate::constants::{MAX_NAME_CHARS, MAX_RICH_TEXT_CHARS};
use crate::form::{Field, ReportFormData};
use crate::rich_text::RichTextDocument;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const PHONE_MESSAGE: &str = "Invalid phone number (10-15 digits)";
pub const DOB_FORMAT_MESSAGE: &str = "Invalid date format (DD-MM-YYYY)";
pub const DOB_FUTURE_MESSAGE: &str = "Date of birth cannot be in the future";
pub const URL_MESSAGE: &str = "Invalid URL format";

/// Format of the date-of-birth field.
pub const DOB_FORMAT: &str = "%d-%m-%Y";

const REQUIRED_FIELDS: [Field; 5] = [
    Field::ClinicName,
    Field::PhysicianName,
    Field::PatientFirstName,
    Field::PatientLastName,
    Field::PatientDob,
];

const NAME_LIMITS: [(Field, &str); 4] = [
    (Field::ClinicName, "Clinic name"),
    (Field::PhysicianName, "Physician name"),
    (Field::PatientFirstName, "First name"),
    (Field::PatientLastName, "Last name"),
];

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("Invalid phone regex"))
}

fn dob_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("Invalid date regex"))
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/\w .-]*)/?$")
            .expect("Invalid URL regex")
    })
}

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Removes the entry for `field`, returning whether one existed.
    pub fn clear_field(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// `true` if `value` is 10 to 15 ASCII digits and nothing else.
pub fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

/// `true` if `value` looks like a URL: optional http(s) scheme, lowercase host, TLD, optional path.
pub fn is_valid_logo_url(value: &str) -> bool {
    url_regex().is_match(value)
}

/// Checks a date of birth against the `DD-MM-YYYY` format and `today`.
///
/// Returns the error message, or `None` when the date is acceptable.
pub fn check_date_of_birth(value: &str, today: NaiveDate) -> Option<&'static str> {
    if !dob_regex().is_match(value) {
        return Some(DOB_FORMAT_MESSAGE);
    }
    match NaiveDate::parse_from_str(value, DOB_FORMAT) {
        Ok(dob) if dob > today => Some(DOB_FUTURE_MESSAGE),
        Ok(_) => None,
        Err(_) => Some(DOB_FORMAT_MESSAGE),
    }
}

fn check_rich_text(
    errors: &mut ValidationErrors,
    field: Field,
    label: &str,
    doc: &RichTextDocument,
) {
    if doc.is_blank() {
        errors.insert(field, format!("{} is required", label));
    } else if doc.char_count() > MAX_RICH_TEXT_CHARS {
        errors.insert(
            field,
            format!("{} exceeds {} characters", label, MAX_RICH_TEXT_CHARS),
        );
    }
}

/// Validates the whole report, reporting every violated rule.
pub fn validate_report(
    form: &ReportFormData,
    chief_complaint: &RichTextDocument,
    consultation_note: &RichTextDocument,
    today: NaiveDate,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let value = |field: Field| form.get(field).unwrap_or_default();

    for field in REQUIRED_FIELDS {
        if value(field).trim().is_empty() {
            errors.insert(field, REQUIRED_MESSAGE);
        }
    }

    for (field, label) in NAME_LIMITS {
        if value(field).chars().count() > MAX_NAME_CHARS {
            errors.insert(
                field,
                format!("{} should be less than {} characters", label, MAX_NAME_CHARS),
            );
        }
    }

    let dob = value(Field::PatientDob);
    if !dob.trim().is_empty() {
        if let Some(message) = check_date_of_birth(dob, today) {
            errors.insert(Field::PatientDob, message);
        }
    }

    for field in [Field::PhysicianContact, Field::PatientContact] {
        let contact = value(field);
        if !contact.is_empty() && !is_valid_phone(contact) {
            errors.insert(field, PHONE_MESSAGE);
        }
    }

    let logo = value(Field::ClinicLogo);
    if !logo.is_empty() && !is_valid_logo_url(logo) {
        errors.insert(Field::ClinicLogo, URL_MESSAGE);
    }

    check_rich_text(
        &mut errors,
        Field::ChiefComplaint,
        "Chief complaint",
        chief_complaint,
    );
    check_rich_text(
        &mut errors,
        Field::ConsultationNote,
        "Consultation note",
        consultation_note,
    );

    errors
}

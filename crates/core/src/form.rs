//! Report form data and field identifiers.

use crate::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every input of the report form, including the two rich-text sections.
///
/// The string form (`Field::key`) matches the keys used by the form file and the error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ClinicName,
    PhysicianName,
    PhysicianContact,
    ClinicLogo,
    PatientFirstName,
    PatientLastName,
    PatientDob,
    PatientContact,
    ChiefComplaint,
    ConsultationNote,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::ClinicName,
        Field::PhysicianName,
        Field::PhysicianContact,
        Field::ClinicLogo,
        Field::PatientFirstName,
        Field::PatientLastName,
        Field::PatientDob,
        Field::PatientContact,
        Field::ChiefComplaint,
        Field::ConsultationNote,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::ClinicName => "clinicName",
            Field::PhysicianName => "physicianName",
            Field::PhysicianContact => "physicianContact",
            Field::ClinicLogo => "clinicLogo",
            Field::PatientFirstName => "patientFirstName",
            Field::PatientLastName => "patientLastName",
            Field::PatientDob => "patientDob",
            Field::PatientContact => "patientContact",
            Field::ChiefComplaint => "chiefComplaint",
            Field::ConsultationNote => "consultationNote",
        }
    }

    /// Human label, as shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ClinicName => "Clinic Name",
            Field::PhysicianName => "Physician Name",
            Field::PhysicianContact => "Physician Contact",
            Field::ClinicLogo => "Clinic Logo",
            Field::PatientFirstName => "Patient First Name",
            Field::PatientLastName => "Patient Last Name",
            Field::PatientDob => "Patient Dob",
            Field::PatientContact => "Patient Contact",
            Field::ChiefComplaint => "Chief Complaint",
            Field::ConsultationNote => "Consultation Note",
        }
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self, Field::ChiefComplaint | Field::ConsultationNote)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Field {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| ReportError::InvalidInput(format!("unknown field: {}", s)))
    }
}

/// The flat text fields of the report form. Every field starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ReportFormData {
    pub clinic_name: String,
    pub physician_name: String,
    pub physician_contact: String,
    pub clinic_logo: String,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_dob: String,
    pub patient_contact: String,
}

impl ReportFormData {
    /// Value of a text field; `None` for the rich-text sections.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::ClinicName => &self.clinic_name,
            Field::PhysicianName => &self.physician_name,
            Field::PhysicianContact => &self.physician_contact,
            Field::ClinicLogo => &self.clinic_logo,
            Field::PatientFirstName => &self.patient_first_name,
            Field::PatientLastName => &self.patient_last_name,
            Field::PatientDob => &self.patient_dob,
            Field::PatientContact => &self.patient_contact,
            Field::ChiefComplaint | Field::ConsultationNote => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to a text field; `None` for the rich-text sections.
    pub fn get_mut(&mut self, field: Field) -> Option<&mut String> {
        let value = match field {
            Field::ClinicName => &mut self.clinic_name,
            Field::PhysicianName => &mut self.physician_name,
            Field::PhysicianContact => &mut self.physician_contact,
            Field::ClinicLogo => &mut self.clinic_logo,
            Field::PatientFirstName => &mut self.patient_first_name,
            Field::PatientLastName => &mut self.patient_last_name,
            Field::PatientDob => &mut self.patient_dob,
            Field::PatientContact => &mut self.patient_contact,
            Field::ChiefComplaint | Field::ConsultationNote => return None,
        };
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn from_yaml_str(source: &str) -> ReportResult<Self> {
        serde_yaml::from_str(source).map_err(ReportError::FormYaml)
    }

    pub fn from_yaml_file(path: &Path) -> ReportResult<Self> {
        let source = std::fs::read_to_string(path).map_err(ReportError::FormRead)?;
        Self::from_yaml_str(&source)
    }
}

//! Report composer screen state.
//!
//! One aggregate owns the form fields, both rich-text editors and the error map. Editing a field
//! clears that field's error; [`ReportComposer::validate`] recomputes the whole map; a
//! successful export resets everything to empty.

use crate::export::{ExportedReport, ReportExporter};
use crate::form::{Field, ReportFormData};
use crate::notifications::Notifications;
use crate::printable::{report_file_name, PrintableView};
use crate::rich_text::RichTextEditor;
use crate::session::Identity;
use crate::validation::{validate_report, ValidationErrors};
use crate::{ReportError, ReportResult};
use api_client::AssetFetcher;
use chrono::{NaiveDate, NaiveDateTime};

pub const EXPORT_SUCCESS_MESSAGE: &str = "Form data added successfully!";
pub const EXPORT_FAILURE_MESSAGE: &str = "Failed to generate report. Please try again.";
pub const IMAGES_OMITTED_MESSAGE: &str = "Images are not included in the PDF.";

#[derive(Debug, Default)]
pub struct ReportComposer {
    form: ReportFormData,
    chief_complaint: RichTextEditor,
    consultation_note: RichTextEditor,
    errors: ValidationErrors,
    identity: Identity,
}

impl ReportComposer {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn form(&self) -> &ReportFormData {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn chief_complaint(&self) -> &RichTextEditor {
        &self.chief_complaint
    }

    pub fn consultation_note(&self) -> &RichTextEditor {
        &self.consultation_note
    }

    /// Sets a text field and clears its error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> ReportResult<()> {
        let slot = self.form.get_mut(field).ok_or_else(|| {
            ReportError::InvalidInput(format!("{} is a rich-text section", field))
        })?;
        *slot = value.into();
        self.errors.clear_field(field);
        Ok(())
    }

    /// Copies every text field from `form`.
    pub fn load_form(&mut self, form: &ReportFormData) -> ReportResult<()> {
        for field in Field::ALL.into_iter().filter(|f| !f.is_rich_text()) {
            let value = form.get(field).unwrap_or_default();
            self.set_field(field, value)?;
        }
        Ok(())
    }

    /// Applies an edit to one rich-text section and clears its error.
    pub fn edit_section<T>(
        &mut self,
        section: Field,
        edit: impl FnOnce(&mut RichTextEditor) -> T,
    ) -> ReportResult<T> {
        let editor = match section {
            Field::ChiefComplaint => &mut self.chief_complaint,
            Field::ConsultationNote => &mut self.consultation_note,
            other => {
                return Err(ReportError::InvalidInput(format!(
                    "{} is not a rich-text section",
                    other
                )))
            }
        };
        let out = edit(editor);
        self.errors.clear_field(section);
        Ok(out)
    }

    /// Recomputes the error map. Returns `true` when the report may be exported.
    pub fn validate(&mut self, today: NaiveDate) -> bool {
        self.errors = validate_report(
            &self.form,
            self.chief_complaint.document(),
            self.consultation_note.document(),
            today,
        );
        self.errors.is_empty()
    }

    pub fn printable_view(&self) -> PrintableView {
        PrintableView::from_report(
            &self.form,
            self.chief_complaint.document(),
            self.consultation_note.document(),
        )
    }

    pub fn file_name(&self) -> String {
        report_file_name(&self.form)
    }

    /// Validates and exports the report.
    ///
    /// Returns `Ok(None)` when validation blocks the export (see [`errors`](Self::errors)).
    /// On success the composer is reset. On failure an error notification is raised, the form
    /// is left as it was and the error is returned.
    pub async fn generate_report<F: AssetFetcher>(
        &mut self,
        exporter: &ReportExporter<F>,
        notices: &mut Notifications,
        today: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> ReportResult<Option<ExportedReport>> {
        if !self.validate(today) {
            tracing::info!(errors = self.errors.len(), "report export blocked by validation");
            return Ok(None);
        }

        let view = self.printable_view();
        if view.has_images() {
            notices.info(IMAGES_OMITTED_MESSAGE);
        }
        let file_name = self.file_name();
        let logo = Some(self.form.clinic_logo.as_str()).filter(|l| !l.trim().is_empty());
        let result = exporter.export(&view, logo, &file_name, generated_at).await;
        match result {
            Ok(report) => {
                notices.success(EXPORT_SUCCESS_MESSAGE);
                self.reset();
                Ok(Some(report))
            }
            Err(e) => {
                tracing::error!("report export failed: {}", e);
                notices.error(EXPORT_FAILURE_MESSAGE);
                Err(e)
            }
        }
    }

    /// Empties the form, both editors and the error map. Editor history is kept so the
    /// cleared content can still be undone.
    pub fn reset(&mut self) {
        self.form = ReportFormData::default();
        self.chief_complaint.clear_content();
        self.consultation_note.clear_content();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationVariant;
    use crate::rich_text::{from_markdown, RichTextDocument};
    use crate::validation::REQUIRED_MESSAGE;
    use api_client::AssetError;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoLogo;

    #[async_trait]
    impl AssetFetcher for NoLogo {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, AssetError> {
            Err(AssetError::Empty)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(9, 30, 0).unwrap()
    }

    fn filled() -> ReportComposer {
        let mut composer = ReportComposer::default();
        let form = ReportFormData {
            clinic_name: "Riverside Clinic".into(),
            physician_name: "Dr Grace Hopper".into(),
            physician_contact: "02079460000".into(),
            clinic_logo: "riverside.example/logo.png".into(),
            patient_first_name: "Ada".into(),
            patient_last_name: "Lovelace".into(),
            patient_dob: "10-12-1985".into(),
            patient_contact: "1234567890".into(),
        };
        composer.load_form(&form).unwrap();
        composer
            .edit_section(Field::ChiefComplaint, |e| e.insert_text("Headache for 3 days"))
            .unwrap();
        composer
            .edit_section(Field::ConsultationNote, |e| {
                e.set_content(from_markdown("Advised **rest** and fluids."))
            })
            .unwrap();
        composer
    }

    #[test]
    fn test_set_field_clears_only_that_error() {
        let mut composer = ReportComposer::default();
        assert!(!composer.validate(today()));
        assert_eq!(composer.errors().get(Field::ClinicName), Some(REQUIRED_MESSAGE));

        composer.set_field(Field::ClinicName, "R").unwrap();
        assert!(!composer.errors().contains(Field::ClinicName));
        assert!(composer.errors().contains(Field::PhysicianName));
    }

    #[test]
    fn test_set_field_rejects_rich_text_sections() {
        let mut composer = ReportComposer::default();
        assert!(composer.set_field(Field::ChiefComplaint, "x").is_err());
        assert!(composer.edit_section(Field::ClinicName, |_| ()).is_err());
    }

    #[test]
    fn test_editing_section_clears_its_error() {
        let mut composer = ReportComposer::default();
        composer.validate(today());
        assert!(composer.errors().contains(Field::ChiefComplaint));

        composer
            .edit_section(Field::ChiefComplaint, |e| e.insert_text("Cough"))
            .unwrap();
        assert!(!composer.errors().contains(Field::ChiefComplaint));
        assert!(composer.errors().contains(Field::ConsultationNote));
    }

    #[tokio::test]
    async fn test_successful_export_resets_everything() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(NoLogo, out.path());
        let mut notices = Notifications::new();
        let mut composer = filled();

        let report = composer
            .generate_report(&exporter, &mut notices, today(), now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.path, out.path().join("CR_Lovelace_Ada_10-12-1985.pdf"));
        assert!(report.path.is_file());
        assert_eq!(composer.form(), &ReportFormData::default());
        assert_eq!(composer.chief_complaint().document(), &RichTextDocument::new());
        assert_eq!(composer.consultation_note().document(), &RichTextDocument::new());
        assert!(composer.errors().is_empty());

        let notice = notices.drain().next().unwrap();
        assert_eq!(notice.variant, NotificationVariant::Success);
        assert_eq!(notice.message, "Form data added successfully!");
    }

    #[tokio::test]
    async fn test_name_with_slash_still_exports() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(NoLogo, out.path());
        let mut notices = Notifications::new();
        let mut composer = filled();
        composer.set_field(Field::PatientFirstName, "Ann/Marie").unwrap();

        let report = composer
            .generate_report(&exporter, &mut notices, today(), now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            report.path,
            out.path().join("CR_Lovelace_Ann-Marie_10-12-1985.pdf")
        );
        assert!(report.path.is_file());
    }

    #[tokio::test]
    async fn test_blocked_export_is_not_attempted() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(NoLogo, out.path().join("reports"));
        let mut notices = Notifications::new();
        let mut composer = filled();
        composer.set_field(Field::ClinicName, "").unwrap();

        let result = composer
            .generate_report(&exporter, &mut notices, today(), now())
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(composer.errors().len(), 1);
        assert_eq!(composer.errors().get(Field::ClinicName), Some(REQUIRED_MESSAGE));
        assert!(!out.path().join("reports").exists());
        assert!(notices.is_empty());
        assert_eq!(composer.form().patient_first_name, "Ada");
    }

    #[tokio::test]
    async fn test_failed_export_keeps_state_and_notifies() {
        let out = TempDir::new().unwrap();
        let blocker = out.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let exporter = ReportExporter::new(NoLogo, &blocker);
        let mut notices = Notifications::new();
        let mut composer = filled();
        let before = composer.form().clone();

        let err = composer
            .generate_report(&exporter, &mut notices, today(), now())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::OutputDirCreation(_)));
        assert_eq!(composer.form(), &before);
        assert_eq!(composer.chief_complaint().get_text(), "Headache for 3 days");
        let notice = notices.drain().next().unwrap();
        assert_eq!(notice.variant, NotificationVariant::Error);
        assert_eq!(notice.message, "Failed to generate report. Please try again.");
    }

    #[tokio::test]
    async fn test_images_in_sections_raise_info_notice() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(NoLogo, out.path());
        let mut notices = Notifications::new();
        let mut composer = filled();
        composer
            .edit_section(Field::ChiefComplaint, |e| {
                e.set_content(from_markdown("Rash ![photo](https://img.example/r.png)"))
            })
            .unwrap();

        composer
            .generate_report(&exporter, &mut notices, today(), now())
            .await
            .unwrap();

        let variants: Vec<_> = notices.drain().map(|n| n.variant).collect();
        assert_eq!(
            variants,
            [NotificationVariant::Info, NotificationVariant::Success]
        );
    }

    #[test]
    fn test_reset_is_undoable_per_editor() {
        let mut composer = filled();
        composer.reset();
        assert!(composer.chief_complaint().is_empty());
        composer.edit_section(Field::ChiefComplaint, |e| e.undo()).unwrap();
        assert_eq!(composer.chief_complaint().get_text(), "Headache for 3 days");
    }

    #[test]
    fn test_identity_defaults_to_placeholder() {
        let composer = ReportComposer::default();
        assert_eq!(composer.identity().display_name(), "User");
        assert_eq!(composer.identity().avatar_initial(), 'U');
    }
}

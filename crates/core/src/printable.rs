//! The printable report view.
//!
//! This is the document that gets rendered into the PDF: a header with the clinic name, two
//! labelled information blocks and the two rich-text sections. It can also be rendered as HTML
//! for previewing.

use crate::constants::{DEFAULT_REPORT_TITLE, REPORT_FILE_PREFIX};
use crate::form::ReportFormData;
use crate::rich_text::{document::escape_html, RichTextDocument};
use report_types::NonEmptyText;

/// A `label: value` line of an information block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

/// A titled block of rows. Rendered without page breaks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoSection {
    pub title: &'static str,
    pub rows: Vec<InfoRow>,
}

/// A titled rich-text section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichSection {
    pub title: &'static str,
    pub content: RichTextDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableView {
    pub title: String,
    pub patient: InfoSection,
    pub physician: InfoSection,
    pub chief_complaint: RichSection,
    pub consultation_note: RichSection,
}

fn row(label: &'static str, value: &str) -> InfoRow {
    InfoRow {
        label,
        value: value.to_string(),
    }
}

impl PrintableView {
    /// Populates the view from the current form state.
    pub fn from_report(
        form: &ReportFormData,
        chief_complaint: &RichTextDocument,
        consultation_note: &RichTextDocument,
    ) -> Self {
        let title = NonEmptyText::new(&form.clinic_name)
            .map(|name| name.to_string())
            .unwrap_or_else(|_| DEFAULT_REPORT_TITLE.to_string());

        Self {
            title,
            patient: InfoSection {
                title: "Patient Information",
                rows: vec![
                    row("First Name", &form.patient_first_name),
                    row("Last Name", &form.patient_last_name),
                    row("Date of Birth", &form.patient_dob),
                    row("Contact", &form.patient_contact),
                ],
            },
            physician: InfoSection {
                title: "Physician Information",
                rows: vec![
                    row("Name", &form.physician_name),
                    row("Contact", &form.physician_contact),
                ],
            },
            chief_complaint: RichSection {
                title: "Chief Complaint",
                content: chief_complaint.clone(),
            },
            consultation_note: RichSection {
                title: "Consultation Note",
                content: consultation_note.clone(),
            },
        }
    }

    /// An independent copy that can be modified for rendering without touching this view.
    pub fn detached(&self) -> Self {
        self.clone()
    }

    pub fn info_sections(&self) -> [&InfoSection; 2] {
        [&self.patient, &self.physician]
    }

    pub fn rich_sections(&self) -> [&RichSection; 2] {
        [&self.chief_complaint, &self.consultation_note]
    }

    pub fn has_images(&self) -> bool {
        self.rich_sections().iter().any(|s| s.content.has_images())
    }

    /// Removes embedded images from both rich-text sections.
    pub fn strip_images(&mut self) {
        self.chief_complaint.content.strip_images();
        self.consultation_note.content.strip_images();
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<div class=\"printable-report\">");
        out.push_str(&format!(
            "<header><h1>{}</h1></header>",
            escape_html(&self.title)
        ));
        for section in self.info_sections() {
            out.push_str(&format!(
                "<section class=\"info\" style=\"break-inside: avoid\"><h2>{}</h2>",
                escape_html(section.title)
            ));
            for r in &section.rows {
                out.push_str(&format!(
                    "<p><strong>{}:</strong> {}</p>",
                    escape_html(r.label),
                    escape_html(&r.value)
                ));
            }
            out.push_str("</section>");
        }
        for section in self.rich_sections() {
            out.push_str(&format!(
                "<section class=\"pdf-section\"><h2>{}</h2><div class=\"pdf-content-box\">{}</div></section>",
                escape_html(section.title),
                section.content.to_html()
            ));
        }
        out.push_str("</div>");
        out
    }
}

/// Name of the exported file: `CR_<last>_<first>_<dob>.pdf`.
///
/// Path separators in any part become `-`, so the result is always a bare file name.
pub fn report_file_name(form: &ReportFormData) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        REPORT_FILE_PREFIX,
        file_name_part(&form.patient_last_name),
        file_name_part(&form.patient_first_name),
        file_name_part(&form.patient_dob)
    )
}

fn file_name_part(value: &str) -> String {
    value.replace(['/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::from_markdown;

    fn form() -> ReportFormData {
        ReportFormData {
            clinic_name: "Riverside Clinic".into(),
            physician_name: "Dr. Okafor".into(),
            physician_contact: "5551234567".into(),
            patient_first_name: "Ada".into(),
            patient_last_name: "Lovelace".into(),
            patient_dob: "10-12-1985".into(),
            patient_contact: "".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_file_name_template() {
        assert_eq!(report_file_name(&form()), "CR_Lovelace_Ada_10-12-1985.pdf");

        let mut slashed = form();
        slashed.patient_dob = "10/12/1985".into();
        assert_eq!(report_file_name(&slashed), "CR_Lovelace_Ada_10-12-1985.pdf");
    }

    #[test]
    fn test_file_name_replaces_separators_in_names() {
        let mut f = form();
        f.patient_first_name = "Ann/Marie".into();
        f.patient_last_name = "Smith\\Jones".into();
        assert_eq!(
            report_file_name(&f),
            "CR_Smith-Jones_Ann-Marie_10-12-1985.pdf"
        );
    }

    #[test]
    fn test_title_falls_back_when_clinic_name_blank() {
        let mut f = form();
        f.clinic_name = "   ".into();
        let view = PrintableView::from_report(&f, &RichTextDocument::new(), &RichTextDocument::new());
        assert_eq!(view.title, "Clinic Report");
    }

    #[test]
    fn test_info_rows_follow_form() {
        let view = PrintableView::from_report(&form(), &RichTextDocument::new(), &RichTextDocument::new());
        let labels: Vec<_> = view.patient.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["First Name", "Last Name", "Date of Birth", "Contact"]);
        assert_eq!(view.physician.rows[0].value, "Dr. Okafor");
    }

    #[test]
    fn test_detached_copy_strips_images_independently() {
        let chief = from_markdown("See ![scan](https://img.example/a.png) attached.");
        let view = PrintableView::from_report(&form(), &chief, &RichTextDocument::new());

        let mut copy = view.detached();
        copy.strip_images();

        assert!(view.has_images());
        assert!(!copy.has_images());
        assert!(!copy.to_html().contains("<img"));
    }

    #[test]
    fn test_html_escapes_values_and_embeds_rich_text() {
        let mut f = form();
        f.clinic_name = "A&B <Clinic>".into();
        let chief = from_markdown("**Cough**");
        let html = PrintableView::from_report(&f, &chief, &RichTextDocument::new()).to_html();
        assert!(html.contains("<h1>A&amp;B &lt;Clinic&gt;</h1>"));
        assert!(html.contains("<p><strong>First Name:</strong> Ada</p>"));
        assert!(html.contains("<div class=\"pdf-content-box\"><p><strong>Cough</strong></p></div>"));
    }
}

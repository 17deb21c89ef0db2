//! PDF export of the printable view.
//!
//! The pipeline: detach the view and strip its images, acquire a render container, fetch the
//! logo (failures are logged and ignored), lay out, paginate, render with footer stamps, stage
//! the file in the container and copy it into the output directory. The container is released
//! on every path.

pub mod container;
pub mod layout;
pub mod pdf;

use crate::constants::{
    PAGE_HEIGHT_PT, PAGE_MARGIN_HORIZONTAL_PT, PAGE_MARGIN_VERTICAL_PT, PAGE_WIDTH_PT,
    VIEW_PADDING_HORIZONTAL_PT,
};
use crate::printable::PrintableView;
use crate::{ReportError, ReportResult};
use api_client::AssetFetcher;
use chrono::NaiveDateTime;
use container::RenderContainer;
use std::path::{Path, PathBuf};

pub use pdf::RenderedPdf;

/// Width available to the view's content, inside page margins and view padding.
pub const CONTENT_WIDTH_PT: f32 =
    PAGE_WIDTH_PT - 2.0 * PAGE_MARGIN_HORIZONTAL_PT - 2.0 * VIEW_PADDING_HORIZONTAL_PT;

/// Height available on each page, inside the top and bottom margins.
pub const CONTENT_HEIGHT_PT: f32 = PAGE_HEIGHT_PT - 2.0 * PAGE_MARGIN_VERTICAL_PT;

/// Footer timestamp, e.g. `05/03/2024, 14:07:09`.
pub fn format_generated_at(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// A report written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub page_count: usize,
}

/// Renders printable views to PDF files in `output_dir`.
#[derive(Debug, Clone)]
pub struct ReportExporter<F> {
    fetcher: F,
    output_dir: PathBuf,
}

impl<F: AssetFetcher> ReportExporter<F> {
    pub fn new(fetcher: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Runs the whole export pipeline for `view`.
    ///
    /// `file_name` must be a bare file name. Logo problems never fail the export.
    pub async fn export(
        &self,
        view: &PrintableView,
        logo_url: Option<&str>,
        file_name: &str,
        generated_at: NaiveDateTime,
    ) -> ReportResult<ExportedReport> {
        check_file_name(file_name)?;

        let mut detached = view.detached();
        if detached.has_images() {
            tracing::info!("embedded images are not included in the PDF");
        }
        detached.strip_images();

        let container = RenderContainer::acquire()?;

        let logo = match logo_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => self.load_logo(url).await,
            None => None,
        };

        let blocks = layout::layout_view(&detached, CONTENT_WIDTH_PT);
        let pages = layout::paginate(blocks, CONTENT_HEIGHT_PT);
        let rendered = pdf::render_pdf(
            &detached.title,
            &pages,
            &format_generated_at(generated_at),
            logo.as_ref(),
        )?;

        let staged = container.stage(file_name, &rendered.bytes)?;
        let path = self.persist(&staged, file_name)?;

        tracing::info!(
            path = %path.display(),
            page_count = rendered.page_count,
            "report exported"
        );
        Ok(ExportedReport {
            path,
            page_count: rendered.page_count,
        })
    }

    async fn load_logo(&self, url: &str) -> Option<printpdf::image_crate::DynamicImage> {
        match self.fetcher.fetch(url).await {
            Ok(bytes) => pdf::decode_logo(&bytes),
            Err(e) => {
                tracing::error!(%url, "Error adding image: {}", e);
                None
            }
        }
    }

    fn persist(&self, staged: &Path, file_name: &str) -> ReportResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(ReportError::OutputDirCreation)?;
        let dest = self.output_dir.join(file_name);
        std::fs::copy(staged, &dest).map_err(|source| ReportError::PdfSave {
            path: dest.clone(),
            source,
        })?;
        Ok(dest)
    }
}

fn check_file_name(file_name: &str) -> ReportResult<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(()),
        _ => Err(ReportError::InvalidInput(format!(
            "report file name must not contain path separators: {}",
            file_name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ReportFormData;
    use crate::rich_text::{from_markdown, RichTextDocument};
    use api_client::AssetError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeFetcher {
        response: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn failing() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn serving(bytes: Vec<u8>) -> Self {
            Self {
                response: Some(bytes),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssetFetcher for FakeFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, AssetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or(AssetError::Status(404))
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap()
    }

    fn view(chief: &RichTextDocument) -> PrintableView {
        let form = ReportFormData {
            clinic_name: "Riverside Clinic".into(),
            physician_name: "Dr. Okafor".into(),
            patient_first_name: "Ada".into(),
            patient_last_name: "Lovelace".into(),
            patient_dob: "10-12-1985".into(),
            ..Default::default()
        };
        PrintableView::from_report(&form, chief, &from_markdown("Rest and fluids."))
    }

    #[test]
    fn test_format_generated_at() {
        assert_eq!(format_generated_at(at()), "05/03/2024, 14:07:09");
    }

    #[tokio::test]
    async fn test_export_writes_pdf_to_output_dir() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());

        let report = exporter
            .export(&view(&from_markdown("Headache")), None, "CR_Lovelace_Ada_10-12-1985.pdf", at())
            .await
            .unwrap();

        assert_eq!(report.path, out.path().join("CR_Lovelace_Ada_10-12-1985.pdf"));
        assert_eq!(report.page_count, 1);
        let bytes = std::fs::read(&report.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_long_report_paginates() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());
        let long = (1..=150)
            .map(|i| format!("Finding {i}: unremarkable on examination."))
            .collect::<Vec<_>>()
            .join("\n\n");

        let report = exporter
            .export(&view(&from_markdown(&long)), None, "long.pdf", at())
            .await
            .unwrap();

        assert!(report.page_count > 1);
    }

    #[tokio::test]
    async fn test_logo_failure_does_not_abort_export() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());

        let report = exporter
            .export(&view(&from_markdown("Headache")), Some("clinic.org/logo.png"), "r.pdf", at())
            .await
            .unwrap();

        assert!(report.path.is_file());
        assert_eq!(exporter.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_logo_does_not_abort_export() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::serving(b"not an image".to_vec()), out.path());

        let report = exporter
            .export(&view(&from_markdown("Headache")), Some("https://clinic.org/logo.png"), "r.pdf", at())
            .await;

        assert!(report.is_ok());
    }

    #[tokio::test]
    async fn test_blank_logo_url_is_not_fetched() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());
        exporter
            .export(&view(&from_markdown("Headache")), Some("  "), "r.pdf", at())
            .await
            .unwrap();
        assert_eq!(exporter.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_images_do_not_reach_the_pdf_and_view_is_untouched() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());
        let v = view(&from_markdown("See ![x-ray](https://img.example/x.png)"));

        exporter.export(&v, None, "r.pdf", at()).await.unwrap();

        assert!(v.has_images());
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_fails() {
        let out = TempDir::new().unwrap();
        let blocker = out.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), &blocker);

        let err = exporter
            .export(&view(&from_markdown("Headache")), None, "r.pdf", at())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::OutputDirCreation(_)));
    }

    #[tokio::test]
    async fn test_file_name_with_separator_is_rejected() {
        let out = TempDir::new().unwrap();
        let exporter = ReportExporter::new(FakeFetcher::failing(), out.path());
        let err = exporter
            .export(&view(&from_markdown("Headache")), None, "../escape.pdf", at())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }
}

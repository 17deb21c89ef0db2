//! Drawing paginated layout into a PDF with printpdf.

use super::layout::{text_width, Color, LineKind, Page, PlacedLine, TextStyle};
use crate::constants::{
    FOOTER_FONT_SIZE, FOOTER_OFFSET_PT, LOGO_HEIGHT_PT, LOGO_WIDTH_PT, LOGO_X_PT, LOGO_Y_PT,
    PAGE_HEIGHT_PT, PAGE_MARGIN_HORIZONTAL_PT, PAGE_MARGIN_VERTICAL_PT, PAGE_WIDTH_PT,
    VIEW_PADDING_HORIZONTAL_PT,
};
use crate::{ReportError, ReportResult};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};

const LAYER_NAME: &str = "Report";

/// The rendered document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn rgb(color: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

fn render_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::PdfRender(e.to_string())
}

/// Builtin fonts only cover WinAnsi; common typographic punctuation is folded to ASCII and
/// anything else outside Latin-1 becomes `?`.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            '\u{00A0}' => ' ',
            c if (c as u32) < 0x20 => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> ReportResult<Self> {
        Ok(Self {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(render_error)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(render_error)?,
            italic: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(render_error)?,
            bold_italic: doc
                .add_builtin_font(BuiltinFont::HelveticaBoldOblique)
                .map_err(render_error)?,
        })
    }

    fn pick(&self, style: &TextStyle) -> &IndirectFontRef {
        match (style.bold, style.italic) {
            (false, false) => &self.regular,
            (true, false) => &self.bold,
            (false, true) => &self.italic,
            (true, true) => &self.bold_italic,
        }
    }
}

/// Decodes logo bytes. Undecodable images are logged and skipped.
pub fn decode_logo(bytes: &[u8]) -> Option<DynamicImage> {
    match image_crate::load_from_memory(bytes) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::error!("Error adding image: {}", e);
            None
        }
    }
}

fn horizontal_line(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, thickness: f32, color: Color) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(thickness);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(x1), mm(y)), false),
            (Point::new(mm(x2), mm(y)), false),
        ],
        is_closed: false,
    });
}

fn draw_line(layer: &PdfLayerReference, fonts: &Fonts, placed: &PlacedLine) {
    let left = PAGE_MARGIN_HORIZONTAL_PT + VIEW_PADDING_HORIZONTAL_PT;
    let right = PAGE_WIDTH_PT - PAGE_MARGIN_HORIZONTAL_PT - VIEW_PADDING_HORIZONTAL_PT;
    let top = PAGE_HEIGHT_PT - PAGE_MARGIN_VERTICAL_PT - placed.top;

    match &placed.line.kind {
        LineKind::Space => {}
        LineKind::Rule { thickness, color } => {
            let y = top - placed.line.height / 2.0;
            horizontal_line(layer, left, right, y, *thickness, *color);
        }
        LineKind::Text(spans) => {
            let size = spans.iter().map(|s| s.style.size).fold(0.0, f32::max);
            let baseline = top - (placed.line.height + size * 0.7) / 2.0;
            for span in spans {
                let x = left + span.x;
                layer.set_fill_color(rgb(span.style.color));
                layer.use_text(
                    pdf_text(&span.text),
                    span.style.size,
                    mm(x),
                    mm(baseline),
                    fonts.pick(&span.style),
                );
                if span.style.underline {
                    let y = baseline - span.style.size * 0.12;
                    let thickness = span.style.size * 0.06;
                    horizontal_line(layer, x, x + span.width, y, thickness, span.style.color);
                }
            }
        }
    }
}

fn stamp_footer(layer: &PdfLayerReference, fonts: &Fonts, text: &str) {
    let width = text_width(text, FOOTER_FONT_SIZE, false);
    let x = (PAGE_WIDTH_PT - width) / 2.0;
    layer.set_fill_color(rgb(Color::new(0.0, 0.0, 0.0)));
    layer.use_text(
        pdf_text(text),
        FOOTER_FONT_SIZE,
        mm(x),
        mm(FOOTER_OFFSET_PT),
        &fonts.regular,
    );
}

fn place_logo(layer: &PdfLayerReference, logo: &DynamicImage) {
    let (width, height) = logo.dimensions();
    let (width_px, height_px) = (width.max(1) as f32, height.max(1) as f32);
    // At 72 dpi one pixel is one point.
    let rgb_logo = DynamicImage::ImageRgb8(logo.to_rgb8());
    Image::from_dynamic_image(&rgb_logo).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(LOGO_X_PT)),
            translate_y: Some(mm(PAGE_HEIGHT_PT - LOGO_Y_PT - LOGO_HEIGHT_PT)),
            scale_x: Some(LOGO_WIDTH_PT / width_px),
            scale_y: Some(LOGO_HEIGHT_PT / height_px),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

/// Footer caption for page `index` (1-based) of `count`.
pub fn footer_text(generated_at: &str, index: usize, count: usize) -> String {
    format!(
        "This report is generated on {} - Page {} of {}",
        generated_at, index, count
    )
}

/// Draws every page, then stamps the footer (and logo, if any) on each of them.
pub fn render_pdf(
    title: &str,
    pages: &[Page],
    generated_at: &str,
    logo: Option<&DynamicImage>,
) -> ReportResult<RenderedPdf> {
    let page_count = pages.len().max(1);
    let (doc, first_page, first_layer) = PdfDocument::new(
        pdf_text(title),
        mm(PAGE_WIDTH_PT),
        mm(PAGE_HEIGHT_PT),
        LAYER_NAME,
    );
    let fonts = Fonts::load(&doc)?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..page_count {
        let (page, layer) = doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), LAYER_NAME);
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for (page, layer) in pages.iter().zip(&layers) {
        for placed in &page.lines {
            draw_line(layer, &fonts, placed);
        }
    }

    for (i, layer) in layers.iter().enumerate() {
        if let Some(logo) = logo {
            place_logo(layer, logo);
        }
        stamp_footer(layer, &fonts, &footer_text(generated_at, i + 1, page_count));
    }

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    tracing::debug!(page_count, bytes = bytes.len(), "pdf rendered");
    Ok(RenderedPdf { bytes, page_count })
}

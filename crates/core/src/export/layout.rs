//! Layout of the printable view.
//!
//! Rendering runs in two passes. [`layout_view`] turns the view into blocks of positioned lines
//! at a fixed content width, word-wrapping text with Helvetica metrics. [`paginate`] then
//! distributes those lines over fixed-height pages, moving a keep-together block to a fresh page
//! rather than splitting it.

use crate::printable::{InfoSection, PrintableView, RichSection};
use crate::rich_text::{Alignment, Block, Inline, ListKind, Marks, Paragraph};

/// Body text size (14 px at 0.75 pt/px).
pub const BODY_SIZE: f32 = 10.5;
const LINE_HEIGHT: f32 = 1.6;
const TITLE_SIZE: f32 = 18.0;
const SECTION_TITLE_SIZE: f32 = 15.0;
const LIST_INDENT: f32 = 18.0;
const MARKER_GAP: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

pub const TEXT_COLOR: Color = Color::new(0.133, 0.133, 0.133);
pub const ACCENT_COLOR: Color = Color::new(0.098, 0.463, 0.824);
pub const RULE_COLOR: Color = Color::new(0.867, 0.867, 0.867);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn body() -> Self {
        Self {
            size: BODY_SIZE,
            bold: false,
            italic: false,
            underline: false,
            color: TEXT_COLOR,
        }
    }

    fn heading(size: f32) -> Self {
        Self {
            size,
            bold: true,
            ..Self::body()
        }
    }

    fn bolded(self) -> Self {
        Self { bold: true, ..self }
    }

    fn with_marks(self, marks: Marks) -> Self {
        Self {
            bold: self.bold || marks.bold,
            italic: self.italic || marks.italic,
            underline: self.underline || marks.underline,
            ..self
        }
    }
}

/// A run of same-styled text at horizontal offset `x` from the content box's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub x: f32,
    pub text: String,
    pub width: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Text(Vec<Span>),
    Rule { thickness: f32, color: Color },
    Space,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub height: f32,
    pub kind: LineKind,
}

impl Line {
    fn space(height: f32) -> Self {
        Self {
            height,
            kind: LineKind::Space,
        }
    }

    fn rule(thickness: f32, color: Color) -> Self {
        Self {
            height: thickness,
            kind: LineKind::Rule { thickness, color },
        }
    }

    pub fn text(&self) -> String {
        match &self.kind {
            LineKind::Text(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutBlock {
    pub lines: Vec<Line>,
    pub keep_together: bool,
}

impl LayoutBlock {
    /// Height up to the last text line; trailing spacing may be dropped at a page end.
    pub fn text_height(&self) -> f32 {
        let end = self
            .lines
            .iter()
            .rposition(|l| !matches!(l.kind, LineKind::Space))
            .map_or(0, |i| i + 1);
        self.lines[..end].iter().map(|l| l.height).sum()
    }
}

/// A line placed on a page. `top` is measured down from the top of the content box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub top: f32,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|p| p.line.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn glyph_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match c as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        _ => 556,
    }
}

/// Width in points of `text` set in Helvetica (oblique shares the upright metrics).
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, bold))).sum();
    units as f32 * size / 1000.0
}

enum Fragment {
    Text(String, TextStyle),
    Break,
}

/// Greedy word wrapper producing lines of spans.
struct Wrapper {
    max_width: f32,
    align: Alignment,
    indent: f32,
    lines: Vec<Line>,
    spans: Vec<Span>,
    cursor: f32,
    min_size: f32,
}

impl Wrapper {
    fn new(max_width: f32, align: Alignment, indent: f32, min_size: f32) -> Self {
        Self {
            max_width: (max_width - indent).max(1.0),
            align,
            indent,
            lines: Vec::new(),
            spans: Vec::new(),
            cursor: 0.0,
            min_size,
        }
    }

    fn push_piece(&mut self, text: &str, style: TextStyle) {
        let width = text_width(text, style.size, style.bold);
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                last.width += width;
                self.cursor += width;
                return;
            }
        }
        self.spans.push(Span {
            x: self.cursor,
            text: text.to_string(),
            width,
            style,
        });
        self.cursor += width;
    }

    fn push_word(&mut self, word: &str, style: TextStyle) {
        let visible = word.trim_end();
        let visible_width = text_width(visible, style.size, style.bold);

        if self.cursor > 0.0 && self.cursor + visible_width > self.max_width {
            self.finish_line();
            if visible.is_empty() {
                return;
            }
        }

        if visible_width > self.max_width {
            // Hard-wrap words wider than the whole line.
            for c in word.chars() {
                let w = text_width(c.encode_utf8(&mut [0; 4]), style.size, style.bold);
                if self.cursor > 0.0 && self.cursor + w > self.max_width && !c.is_whitespace() {
                    self.finish_line();
                }
                self.push_piece(c.encode_utf8(&mut [0; 4]), style);
            }
            return;
        }

        self.push_piece(word, style);
    }

    fn push_text(&mut self, text: &str, style: TextStyle) {
        for word in text.split_inclusive(' ') {
            self.push_word(word, style);
        }
    }

    fn finish_line(&mut self) {
        let mut spans = std::mem::take(&mut self.spans);
        self.cursor = 0.0;

        // Trailing whitespace does not count towards alignment.
        while let Some(last) = spans.last_mut() {
            let trimmed = last.text.trim_end().len();
            if trimmed == last.text.len() {
                break;
            }
            last.text.truncate(trimmed);
            last.width = text_width(&last.text, last.style.size, last.style.bold);
            if last.text.is_empty() {
                spans.pop();
            } else {
                break;
            }
        }

        let line_width = spans.last().map_or(0.0, |s| s.x + s.width);
        let offset = self.indent
            + match self.align {
                Alignment::Center => ((self.max_width - line_width) / 2.0).max(0.0),
                Alignment::Right => (self.max_width - line_width).max(0.0),
                Alignment::Left | Alignment::Justify => 0.0,
            };
        for span in &mut spans {
            span.x += offset;
        }

        let size = spans
            .iter()
            .map(|s| s.style.size)
            .fold(self.min_size, f32::max);
        self.lines.push(Line {
            height: size * LINE_HEIGHT,
            kind: LineKind::Text(spans),
        });
    }

    fn wrap(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Vec<Line> {
        for fragment in fragments {
            match fragment {
                Fragment::Text(text, style) => self.push_text(&text, style),
                Fragment::Break => self.finish_line(),
            }
        }
        self.finish_line();
        self.lines
    }
}

fn paragraph_fragments(paragraph: &Paragraph, base: TextStyle) -> Vec<Fragment> {
    paragraph
        .inlines
        .iter()
        .filter_map(|inline| match inline {
            Inline::Text { text, marks } => {
                Some(Fragment::Text(text.clone(), base.with_marks(*marks)))
            }
            Inline::HardBreak => Some(Fragment::Break),
            Inline::Image { .. } => None,
        })
        .collect()
}

fn wrap_paragraph(paragraph: &Paragraph, base: TextStyle, width: f32, indent: f32) -> Vec<Line> {
    Wrapper::new(width, paragraph.align, indent, base.size)
        .wrap(paragraph_fragments(paragraph, base))
}

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 18.0,
        2 => 15.0,
        3 => 13.0,
        _ => 11.5,
    }
}

fn section_heading(title: &str, width: f32) -> Vec<Line> {
    let mut lines = Wrapper::new(width, Alignment::Left, 0.0, SECTION_TITLE_SIZE).wrap([
        Fragment::Text(title.to_string(), TextStyle::heading(SECTION_TITLE_SIZE)),
    ]);
    lines.push(Line::space(3.75));
    lines.push(Line::rule(1.0, RULE_COLOR));
    lines.push(Line::space(11.25));
    lines
}

fn title_block(title: &str, width: f32) -> LayoutBlock {
    let style = TextStyle {
        color: ACCENT_COLOR,
        ..TextStyle::heading(TITLE_SIZE)
    };
    let mut lines = vec![Line::space(crate::constants::VIEW_PADDING_TOP_PT)];
    lines.extend(
        Wrapper::new(width, Alignment::Center, 0.0, TITLE_SIZE)
            .wrap([Fragment::Text(title.to_string(), style)]),
    );
    lines.push(Line::space(7.5));
    lines.push(Line::rule(2.0, ACCENT_COLOR));
    lines.push(Line::space(11.25));
    LayoutBlock {
        lines,
        keep_together: true,
    }
}

fn info_block(section: &InfoSection, width: f32) -> LayoutBlock {
    let mut lines = section_heading(section.title, width);
    let body = TextStyle::body();
    for row in &section.rows {
        lines.extend(Wrapper::new(width, Alignment::Left, 0.0, BODY_SIZE).wrap([
            Fragment::Text(format!("{}: ", row.label), body.bolded()),
            Fragment::Text(row.value.clone(), body),
        ]));
    }
    lines.push(Line::space(22.5));
    LayoutBlock {
        lines,
        keep_together: true,
    }
}

fn rich_blocks(section: &RichSection, width: f32) -> Vec<LayoutBlock> {
    let mut blocks = Vec::new();
    let body = TextStyle::body();
    let gap = BODY_SIZE * 0.75;

    for block in section.content.blocks() {
        let mut lines = Vec::new();
        match block {
            Block::Paragraph(p) => lines.extend(wrap_paragraph(p, body, width, 0.0)),
            Block::Heading { level, content } => {
                lines.extend(wrap_paragraph(
                    content,
                    TextStyle::heading(heading_size(*level)),
                    width,
                    0.0,
                ));
            }
            Block::List { kind, items } => {
                for (i, item) in items.iter().enumerate() {
                    let marker = match kind {
                        ListKind::Bullet => "-".to_string(),
                        ListKind::Ordered => format!("{}.", i + 1),
                    };
                    let mut item_lines = wrap_paragraph(item, body, width, LIST_INDENT);
                    if let Some(Line {
                        kind: LineKind::Text(spans),
                        ..
                    }) = item_lines.first_mut()
                    {
                        let marker_width = text_width(&marker, BODY_SIZE, false);
                        spans.insert(
                            0,
                            Span {
                                x: (LIST_INDENT - MARKER_GAP - marker_width).max(0.0),
                                text: marker,
                                width: marker_width,
                                style: body,
                            },
                        );
                    }
                    lines.extend(item_lines);
                }
            }
        }
        lines.push(Line::space(gap));
        blocks.push(LayoutBlock {
            lines,
            keep_together: false,
        });
    }

    // The heading travels with the first content block.
    let mut heading = section_heading(section.title, width);
    match blocks.first_mut() {
        Some(first) => {
            heading.append(&mut first.lines);
            first.lines = heading;
            first.keep_together = true;
        }
        None => blocks.push(LayoutBlock {
            lines: heading,
            keep_together: true,
        }),
    }

    blocks.push(LayoutBlock {
        lines: vec![Line::space(15.0)],
        keep_together: false,
    });
    blocks
}

/// First pass: lays the whole view out at `width` points.
pub fn layout_view(view: &PrintableView, width: f32) -> Vec<LayoutBlock> {
    let mut blocks = vec![title_block(&view.title, width)];
    for section in view.info_sections() {
        blocks.push(info_block(section, width));
    }
    for section in view.rich_sections() {
        blocks.extend(rich_blocks(section, width));
    }
    blocks
}

/// Second pass: distributes lines over pages of `content_height` points.
///
/// Always yields at least one page. Spacing lines never open a page: they are dropped at the
/// top of a new page and when they would overflow the current one.
pub fn paginate(blocks: Vec<LayoutBlock>, content_height: f32) -> Vec<Page> {
    let mut pages = vec![Page::default()];
    let mut cursor = 0.0_f32;

    for block in blocks {
        let height = block.text_height();
        if block.keep_together
            && cursor > 0.0
            && cursor + height > content_height
            && height <= content_height
        {
            pages.push(Page::default());
            cursor = 0.0;
        }

        for line in block.lines {
            if matches!(line.kind, LineKind::Space) {
                let at_top = cursor == 0.0 && pages.len() > 1;
                if at_top || cursor + line.height > content_height {
                    continue;
                }
            } else if cursor > 0.0 && cursor + line.height > content_height {
                pages.push(Page::default());
                cursor = 0.0;
            }
            let line_height = line.height;
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine { top: cursor, line });
            }
            cursor += line_height;
        }
    }

    while pages.len() > 1 && pages.last().is_some_and(|p| p.lines.is_empty()) {
        pages.pop();
    }
    pages
}

//! Rich-text document model.
//!
//! A document is a flat sequence of blocks. Text blocks (paragraphs, headings and list items)
//! hold inline content: marked text runs, hard breaks and images.

/// Block alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl std::str::FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            "justify" => Ok(Alignment::Justify),
            other => Err(format!("unknown alignment: {}", other)),
        }
    }
}

/// A single inline formatting mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

/// The set of marks carried by a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
    }

    pub fn toggle(&mut self, mark: Mark) {
        let on = !self.has(mark);
        self.set(mark, on);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, marks: Marks },
    HardBreak,
    Image { src: String, alt: String },
}

/// A text block: inline content plus an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub align: Alignment,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(align: Alignment) -> Self {
        Self {
            align,
            inlines: Vec::new(),
        }
    }

    /// Appends text, merging into the previous run when the marks match.
    pub fn push_text(&mut self, text: &str, marks: Marks) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text {
            text: last,
            marks: last_marks,
        }) = self.inlines.last_mut()
        {
            if *last_marks == marks {
                last.push_str(text);
                return;
            }
        }
        self.inlines.push(Inline::Text {
            text: text.to_string(),
            marks,
        });
    }

    pub fn push_inline(&mut self, inline: Inline) {
        match inline {
            Inline::Text { text, marks } => self.push_text(&text, marks),
            other => self.inlines.push(other),
        }
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text { text, .. } => out.push_str(text),
                Inline::HardBreak => out.push('\n'),
                Inline::Image { .. } => {}
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.is_empty()
    }

    pub fn has_images(&self) -> bool {
        self.inlines
            .iter()
            .any(|i| matches!(i, Inline::Image { .. }))
    }

    pub fn strip_images(&mut self) {
        self.inlines.retain(|i| !matches!(i, Inline::Image { .. }));
    }

    fn write_html(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        if self.align != Alignment::Left {
            out.push_str(&format!(" style=\"text-align: {}\"", self.align.as_css()));
        }
        out.push('>');
        write_inlines_html(&self.inlines, out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Heading { level: u8, content: Paragraph },
    List { kind: ListKind, items: Vec<Paragraph> },
}

impl Block {
    /// Text blocks contained in this block, in document order.
    pub fn text_blocks(&self) -> Vec<&Paragraph> {
        match self {
            Block::Paragraph(p) => vec![p],
            Block::Heading { content, .. } => vec![content],
            Block::List { items, .. } => items.iter().collect(),
        }
    }

    fn text_blocks_mut(&mut self) -> Vec<&mut Paragraph> {
        match self {
            Block::Paragraph(p) => vec![p],
            Block::Heading { content, .. } => vec![content],
            Block::List { items, .. } => items.iter_mut().collect(),
        }
    }
}

/// A rich-text document, as produced by the editor or imported from Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichTextDocument {
    blocks: Vec<Block>,
}

impl RichTextDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Plain text with text blocks separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .flat_map(|b| b.text_blocks())
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of characters in [`plain_text`](Self::plain_text).
    pub fn char_count(&self) -> usize {
        self.plain_text().chars().count()
    }

    /// `true` when the document has no visible text.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    pub fn has_images(&self) -> bool {
        self.blocks
            .iter()
            .flat_map(|b| b.text_blocks())
            .any(|p| p.has_images())
    }

    /// Removes every image from the document.
    pub fn strip_images(&mut self) {
        for block in &mut self.blocks {
            for p in block.text_blocks_mut() {
                p.strip_images();
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => p.write_html("p", &mut out),
                Block::Heading { level, content } => {
                    let tag = format!("h{}", (*level).clamp(1, 6));
                    content.write_html(&tag, &mut out);
                }
                Block::List { kind, items } => {
                    let tag = match kind {
                        ListKind::Bullet => "ul",
                        ListKind::Ordered => "ol",
                    };
                    out.push_str(&format!("<{}>", tag));
                    for item in items {
                        out.push_str("<li>");
                        item.write_html("p", &mut out);
                        out.push_str("</li>");
                    }
                    out.push_str(&format!("</{}>", tag));
                }
            }
        }
        out
    }
}

fn write_inlines_html(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { text, marks } => {
                if marks.bold {
                    out.push_str("<strong>");
                }
                if marks.italic {
                    out.push_str("<em>");
                }
                if marks.underline {
                    out.push_str("<u>");
                }
                out.push_str(&escape_html(text));
                if marks.underline {
                    out.push_str("</u>");
                }
                if marks.italic {
                    out.push_str("</em>");
                }
                if marks.bold {
                    out.push_str("</strong>");
                }
            }
            Inline::HardBreak => out.push_str("<br>"),
            Inline::Image { src, alt } => {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    escape_html(src),
                    escape_html(alt)
                ));
            }
        }
    }
}

/// Escapes text for embedding in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

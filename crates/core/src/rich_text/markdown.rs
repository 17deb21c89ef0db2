//! Markdown import for rich-text sections.
//!
//! Markdown has no underline syntax, so inline `<u>…</u>` HTML is honoured. Nested lists are
//! flattened into their parent list. Block quotes become plain paragraphs. Rules and raw HTML
//! blocks are dropped.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::path::Path;

use super::document::{Block, Inline, ListKind, Marks, Paragraph, RichTextDocument};
use crate::{ReportError, ReportResult};

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    current: Option<Paragraph>,
    heading: Option<u8>,
    lists: Vec<(ListKind, Vec<Paragraph>)>,
    marks: Marks,
    image: Option<(String, String)>,
    in_code_block: bool,
}

impl Builder {
    fn paragraph(&mut self) -> &mut Paragraph {
        self.current.get_or_insert_with(Paragraph::new)
    }

    /// Finishes the pending text block, routing it into the open list or the document.
    fn flush(&mut self) {
        let Some(p) = self.current.take() else {
            return;
        };
        if let Some((_, items)) = self.lists.last_mut() {
            items.push(p);
            return;
        }
        if p.is_empty() {
            return;
        }
        match self.heading.take() {
            Some(level) => self.blocks.push(Block::Heading { level, content: p }),
            None => self.blocks.push(Block::Paragraph(p)),
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, alt)) = self.image.as_mut() {
            alt.push_str(text);
            return;
        }
        let marks = self.marks;
        if self.in_code_block {
            let mut lines = text.split('\n').peekable();
            while let Some(line) = lines.next() {
                self.paragraph().push_text(line, marks);
                if lines.peek().is_some_and(|next| !next.is_empty()) {
                    self.paragraph().push_inline(Inline::HardBreak);
                }
            }
        } else {
            self.paragraph().push_text(text, marks);
        }
    }

    fn inline_html(&mut self, html: &str) {
        match html.trim().to_ascii_lowercase().as_str() {
            "<u>" => self.marks.underline = true,
            "</u>" => self.marks.underline = false,
            "<br>" | "<br/>" | "<br />" => self.paragraph().push_inline(Inline::HardBreak),
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => {
                self.paragraph();
            }
            Event::End(TagEnd::Paragraph) => self.flush(),
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.heading = Some(heading_level(level));
                self.paragraph();
            }
            Event::End(TagEnd::Heading(_)) => self.flush(),
            Event::Start(Tag::List(start)) => {
                self.flush();
                let kind = if start.is_some() {
                    ListKind::Ordered
                } else {
                    ListKind::Bullet
                };
                self.lists.push((kind, Vec::new()));
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                if let Some((kind, items)) = self.lists.pop() {
                    match self.lists.last_mut() {
                        Some((_, parent)) => parent.extend(items),
                        None if !items.is_empty() => self.blocks.push(Block::List { kind, items }),
                        None => {}
                    }
                }
            }
            Event::Start(Tag::Item) => {
                self.flush();
                self.paragraph();
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.in_code_block = true;
                self.paragraph();
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                self.flush();
            }
            Event::Start(Tag::Emphasis) => self.marks.italic = true,
            Event::End(TagEnd::Emphasis) => self.marks.italic = false,
            Event::Start(Tag::Strong) => self.marks.bold = true,
            Event::End(TagEnd::Strong) => self.marks.bold = false,
            Event::Start(Tag::Image { dest_url, .. }) => {
                self.image = Some((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Image) => {
                if let Some((src, alt)) = self.image.take() {
                    self.paragraph().push_inline(Inline::Image { src, alt });
                }
            }
            Event::Text(text) | Event::Code(text) => self.text(&text),
            Event::InlineHtml(html) => self.inline_html(&html),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.paragraph().push_inline(Inline::HardBreak),
            _ => {}
        }
    }

    fn finish(mut self) -> RichTextDocument {
        self.flush();
        while let Some((kind, items)) = self.lists.pop() {
            if !items.is_empty() {
                self.blocks.push(Block::List { kind, items });
            }
        }
        RichTextDocument::from_blocks(self.blocks)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parses Markdown into a rich-text document.
pub fn from_markdown(source: &str) -> RichTextDocument {
    let mut builder = Builder::default();
    for event in Parser::new(source) {
        builder.event(event);
    }
    builder.finish()
}

/// Reads and parses a Markdown file.
pub fn from_markdown_file(path: &Path) -> ReportResult<RichTextDocument> {
    let source = std::fs::read_to_string(path).map_err(ReportError::RichTextRead)?;
    Ok(from_markdown(&source))
}

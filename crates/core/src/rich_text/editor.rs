//! Rich-text editor commands over [`RichTextDocument`].
//!
//! The editor models a caret that always sits at the end of the document: typed text is
//! appended to the last text block, and block-level commands (lists, alignment) act on that
//! block. Toggling a mark changes the marks applied to text typed afterwards.

use super::document::{Alignment, Block, Inline, ListKind, Mark, Marks, Paragraph, RichTextDocument};
use crate::constants::MAX_RICH_TEXT_CHARS;

const HISTORY_DEPTH: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct RichTextEditor {
    doc: RichTextDocument,
    stored_marks: Marks,
    undo_stack: Vec<RichTextDocument>,
    redo_stack: Vec<RichTextDocument>,
}

impl RichTextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &RichTextDocument {
        &self.doc
    }

    pub fn get_text(&self) -> String {
        self.doc.plain_text()
    }

    pub fn get_html(&self) -> String {
        self.doc.to_html()
    }

    pub fn char_count(&self) -> usize {
        self.doc.char_count()
    }

    /// Character counter as displayed under the editor, e.g. `12 / 5000`.
    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.char_count(), MAX_RICH_TEXT_CHARS)
    }

    pub fn is_empty(&self) -> bool {
        self.doc.blocks().is_empty()
    }

    /// Types text at the caret. Each `\n` starts a new paragraph (or list item).
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.checkpoint();
        let marks = self.stored_marks;
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.split_block();
            }
            self.current_block().push_text(segment, marks);
        }
    }

    /// Starts a new paragraph, or a new item when the caret is inside a list.
    pub fn new_paragraph(&mut self) {
        self.checkpoint();
        self.split_block();
    }

    pub fn hard_break(&mut self) {
        self.checkpoint();
        self.current_block().push_inline(Inline::HardBreak);
    }

    pub fn toggle_bold(&mut self) {
        self.stored_marks.toggle(Mark::Bold);
    }

    pub fn toggle_italic(&mut self) {
        self.stored_marks.toggle(Mark::Italic);
    }

    pub fn toggle_underline(&mut self) {
        self.stored_marks.toggle(Mark::Underline);
    }

    /// Whether `mark` applies to the next typed text.
    pub fn is_active(&self, mark: Mark) -> bool {
        self.stored_marks.has(mark)
    }

    /// Whether the caret block is inside a list of `kind`.
    pub fn is_list_active(&self, kind: ListKind) -> bool {
        matches!(self.doc.blocks().last(), Some(Block::List { kind: k, .. }) if *k == kind)
    }

    pub fn toggle_bullet_list(&mut self) {
        self.toggle_list(ListKind::Bullet);
    }

    pub fn toggle_ordered_list(&mut self) {
        self.toggle_list(ListKind::Ordered);
    }

    fn toggle_list(&mut self, kind: ListKind) {
        self.checkpoint();
        let blocks = self.doc.blocks_mut();
        let Some(last) = blocks.pop() else {
            blocks.push(Block::List {
                kind,
                items: vec![Paragraph::new()],
            });
            return;
        };

        match last {
            Block::List {
                kind: current,
                mut items,
            } if current == kind => {
                // Lift the caret item back out to a paragraph.
                let item = items.pop().unwrap_or_default();
                if !items.is_empty() {
                    blocks.push(Block::List {
                        kind: current,
                        items,
                    });
                }
                blocks.push(Block::Paragraph(item));
            }
            Block::List { items, .. } => blocks.push(Block::List { kind, items }),
            Block::Paragraph(p) | Block::Heading { content: p, .. } => {
                // Join a directly preceding list of the same kind.
                if let Some(Block::List {
                    kind: previous,
                    items,
                }) = blocks.last_mut()
                {
                    if *previous == kind {
                        items.push(p);
                        return;
                    }
                }
                blocks.push(Block::List {
                    kind,
                    items: vec![p],
                });
            }
        }
    }

    pub fn set_text_align(&mut self, align: Alignment) {
        self.checkpoint();
        self.current_block().align = align;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.doc, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.doc, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole document (e.g. with imported content).
    pub fn set_content(&mut self, doc: RichTextDocument) {
        self.checkpoint();
        self.doc = doc;
    }

    /// Empties the document. The previous content stays reachable through undo.
    pub fn clear_content(&mut self) {
        if self.is_empty() {
            return;
        }
        self.checkpoint();
        self.doc.clear();
        self.stored_marks = Marks::default();
    }

    fn checkpoint(&mut self) {
        self.undo_stack.push(self.doc.clone());
        if self.undo_stack.len() > HISTORY_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn current_block(&mut self) -> &mut Paragraph {
        let blocks = self.doc.blocks_mut();
        if blocks.is_empty() {
            blocks.push(Block::Paragraph(Paragraph::new()));
        }
        let last = blocks.len() - 1;
        match &mut blocks[last] {
            Block::Paragraph(p) => p,
            Block::Heading { content, .. } => content,
            Block::List { items, .. } => {
                if items.is_empty() {
                    items.push(Paragraph::new());
                }
                let last_item = items.len() - 1;
                &mut items[last_item]
            }
        }
    }

    fn split_block(&mut self) {
        let align = self.current_block().align;
        let blocks = self.doc.blocks_mut();
        match blocks.last_mut() {
            Some(Block::List { items, .. }) => items.push(Paragraph::with_align(align)),
            _ => blocks.push(Block::Paragraph(Paragraph::with_align(align))),
        }
    }
}

//! Rich-text sections of the report: document model, editor commands and Markdown import.

pub mod document;
pub mod editor;
pub mod markdown;

pub use document::{Alignment, Block, Inline, ListKind, Mark, Marks, Paragraph, RichTextDocument};
pub use editor::RichTextEditor;
pub use markdown::{from_markdown, from_markdown_file};

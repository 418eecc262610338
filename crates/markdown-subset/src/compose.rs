//! Authoring helpers that insert markdown-subset markers into editor text.
//!
//! These mirror the editor toolbar: wrap the selection in a format, turn it
//! into a link, or insert an image, emoji, or alignment block at the cursor.
//! Offsets are byte offsets into the text and must fall on `char`
//! boundaries. Every helper returns the edited text and the cursor position
//! the editor should restore.

use thiserror::Error;

const IMAGE_ALT: &str = "Image";
const BLOCK_CLOSE: &str = "</div>\n";

/// Errors raised when a selection cannot address the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The selection ends before it starts.
    #[error("selection start {start} is after its end {end}")]
    Inverted {
        /// Selection start offset.
        start: usize,
        /// Selection end offset.
        end: usize,
    },

    /// An offset is past the end of the text or splits a character.
    #[error("offset {offset} is not a character boundary of a {len}-byte text")]
    NotCharBoundary {
        /// Offending offset.
        offset: usize,
        /// Length of the text in bytes.
        len: usize,
    },
}

/// Selected byte range of the editor text. A caret is an empty selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// Select `start..end`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Inverted`] when `start > end`.
    pub const fn new(start: usize, end: usize) -> Result<Self, EditError> {
        if start > end {
            return Err(EditError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// An empty selection at `offset`.
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Start offset.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// End offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Whether nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result of an edit: new text and where the cursor goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    text: String,
    cursor: usize,
}

impl Edit {
    /// Edited text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor byte offset in the edited text.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Take the edited text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Formats applied around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    /// `**selection**`
    Bold,
    /// `*selection*`
    Italic,
    /// `~~selection~~`
    Strikethrough,
    /// A new bullet line holding the selection.
    BulletItem,
    /// A new numbered line holding the selection.
    NumberedItem,
}

impl InlineFormat {
    fn wrap(self, selected: &str) -> String {
        match self {
            Self::Bold => format!("**{selected}**"),
            Self::Italic => format!("*{selected}*"),
            Self::Strikethrough => format!("~~{selected}~~"),
            Self::BulletItem => format!("\n• {selected}"),
            Self::NumberedItem => format!("\n1. {selected}"),
        }
    }
}

/// Text alignment blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// `text-align: left`
    Left,
    /// `text-align: center`
    Center,
    /// `text-align: right`
    Right,
}

impl Alignment {
    const fn css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

fn check_boundary(text: &str, offset: usize) -> Result<(), EditError> {
    if text.is_char_boundary(offset) {
        Ok(())
    } else {
        Err(EditError::NotCharBoundary {
            offset,
            len: text.len(),
        })
    }
}

fn splice(text: &str, selection: Selection, replacement: &str) -> Result<Edit, EditError> {
    check_boundary(text, selection.start)?;
    check_boundary(text, selection.end)?;
    let (head, rest) = text.split_at(selection.start);
    let (_, tail) = rest.split_at(selection.end - selection.start);
    let mut out = String::with_capacity(head.len() + replacement.len() + tail.len());
    out.push_str(head);
    out.push_str(replacement);
    out.push_str(tail);
    Ok(Edit {
        text: out,
        cursor: selection.start + replacement.len(),
    })
}

fn selected<'a>(text: &'a str, selection: Selection) -> Result<&'a str, EditError> {
    check_boundary(text, selection.start)?;
    check_boundary(text, selection.end)?;
    Ok(text.get(selection.start..selection.end).unwrap_or_default())
}

/// Wrap the selection in `format`.
///
/// Returns `Ok(None)` when nothing is selected.
///
/// # Errors
///
/// Returns [`EditError::NotCharBoundary`] when the selection does not
/// address `text`.
///
/// # Examples
/// ```
/// use markdown_subset::{InlineFormat, Selection, compose::format_selection};
///
/// let selection = Selection::new(6, 11).expect("ordered selection");
/// let edit = format_selection("Hello world", selection, InlineFormat::Bold)
///     .expect("valid selection")
///     .expect("non-empty selection");
/// assert_eq!(edit.text(), "Hello **world**");
/// assert_eq!(edit.cursor(), 15);
/// ```
pub fn format_selection(
    text: &str,
    selection: Selection,
    format: InlineFormat,
) -> Result<Option<Edit>, EditError> {
    let chosen = selected(text, selection)?;
    if chosen.is_empty() {
        return Ok(None);
    }
    splice(text, selection, &format.wrap(chosen)).map(Some)
}

/// Replace the selection with a link labelled by it.
///
/// Returns `Ok(None)` when nothing is selected or `url` is blank.
///
/// # Errors
///
/// Returns [`EditError::NotCharBoundary`] when the selection does not
/// address `text`.
pub fn insert_link(text: &str, selection: Selection, url: &str) -> Result<Option<Edit>, EditError> {
    let chosen = selected(text, selection)?;
    if chosen.is_empty() || url.trim().is_empty() {
        return Ok(None);
    }
    splice(text, selection, &format!("[{chosen}]({url})")).map(Some)
}

/// Insert an image marker at the selection start.
///
/// Returns `Ok(None)` when `url` is blank.
///
/// # Errors
///
/// Returns [`EditError::NotCharBoundary`] when the offset does not address
/// `text`.
pub fn insert_image(text: &str, at: usize, url: &str) -> Result<Option<Edit>, EditError> {
    if url.trim().is_empty() {
        return Ok(None);
    }
    splice(text, Selection::caret(at), &format!("![{IMAGE_ALT}]({url})")).map(Some)
}

/// Insert an emoji at the cursor.
///
/// # Errors
///
/// Returns [`EditError::NotCharBoundary`] when the offset does not address
/// `text`.
pub fn insert_emoji(text: &str, at: usize, emoji: &str) -> Result<Edit, EditError> {
    splice(text, Selection::caret(at), emoji)
}

/// Insert an alignment block at the cursor, leaving the cursor inside it.
///
/// # Errors
///
/// Returns [`EditError::NotCharBoundary`] when the offset does not address
/// `text`.
pub fn insert_alignment(text: &str, at: usize, alignment: Alignment) -> Result<Edit, EditError> {
    let block = format!(
        "\n<div style=\"text-align: {};\">\n\n{BLOCK_CLOSE}",
        alignment.css()
    );
    let mut edit = splice(text, Selection::caret(at), &block)?;
    edit.cursor -= BLOCK_CLOSE.len();
    Ok(edit)
}

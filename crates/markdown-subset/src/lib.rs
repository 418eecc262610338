//! Renderer and authoring helpers for the StackIt markdown subset.
//!
//! The subset is deliberately small: bold, italic, strikethrough, links,
//! images, bullet and numbered list lines, and line breaks. It is not
//! CommonMark. Rendering is an ordered pipeline of `(matcher, replacer)`
//! rules over the cumulative text; see [`rules`] for the table and the
//! ordering constraints it encodes.
//!
//! # Overview
//!
//! - [`render`] turns authored text into an HTML fragment and never fails.
//! - [`compose`] inserts the markers the renderer understands into editor
//!   text, the way the editor toolbar does.
//!
//! The fragment is not sanitised: raw HTML in the input passes through.
//!
//! # Example
//!
//! ```
//! use markdown_subset::render;
//!
//! let html = render("**Hello** [docs](https://example.com)\n• one\n• two");
//! assert_eq!(
//!     html,
//!     "<strong>Hello</strong> <a href=\"https://example.com\" target=\"_blank\" \
//!      rel=\"noopener noreferrer\">docs</a><ul><li>one</li><li>two</li></ul>"
//! );
//! ```

pub mod compose;
mod rules;

pub use compose::{Alignment, Edit, EditError, InlineFormat, Selection};
pub use rules::{Rule, RuleKind, render, rules};

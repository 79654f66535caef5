//! Source positions for the IndoUI playground.
//!
//! Every token, tag and render-tree node produced by the playground parser
//! carries a [`Span`] into the original snippet. [`LineIndex`] turns those
//! byte offsets into the 1-based line/column pairs shown in error panels.

mod line_index;
mod span;

pub use line_index::{LineIndex, Position};
pub use span::{ByteOffset, Span};

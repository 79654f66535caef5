//! Closing-tag matching.

use crate::error::{ParseError, ParseErrorKind};
use crate::scanner::{RawTag, Token, TokenKind};

/// Finds the `</Name>` that closes `tag` within `following`, the tokens
/// that come after the opening tag (bounded by the enclosing element).
/// Returns the index of the closing token within `following`.
///
/// Depth starts at 1 for `tag` itself. Every further non self-closing
/// `<Name>` adds one and every `</Name>` removes one; the match is the close
/// that brings depth back to 0. Self-closing `<Name />` tags never change
/// depth. Names must match exactly, so `<Group>` and `<GroupItem>` are
/// unrelated.
pub fn find_closing_tag(tag: &RawTag, following: &[Token]) -> Result<usize, ParseError> {
    let mut depth = 1usize;

    for (index, token) in following.iter().enumerate() {
        match &token.kind {
            TokenKind::Open(inner) if inner.name == tag.name && !inner.self_closing => depth += 1,
            TokenKind::Close(name) if *name == tag.name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::new(
        ParseErrorKind::UnclosedTag {
            tag_name: tag.name.clone(),
        },
        tag.span,
    ))
}

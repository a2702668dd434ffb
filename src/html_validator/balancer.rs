//! Append-only tag balancing.
//!
//! Closing tags for every tag left open at end of input are appended,
//! innermost first. Nothing is inserted mid-document, so a tag closed in the
//! wrong place stays where it is; only the net imbalance is compensated.

use std::borrow::Cow;

use super::nesting::residual_stack;

pub fn balance_tags(html: &str) -> Cow<'_, str> {
    let open = residual_stack(html);
    if open.is_empty() {
        return Cow::Borrowed(html);
    }

    let closers: String = open.iter().rev().map(|tag| format!("</{tag}>")).collect();
    log::debug!("Appending {} missing closing tag(s): {}", open.len(), closers);

    let mut balanced = String::with_capacity(html.len() + closers.len());
    balanced.push_str(html);
    balanced.push_str(&closers);
    Cow::Owned(balanced)
}

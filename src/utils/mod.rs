pub mod constants;
pub mod string_utils;

pub use constants::*;
pub use string_utils::{char_len, collapse_whitespace, strip_tags, visible_word_count};

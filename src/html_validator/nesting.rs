//! Open-tag stack and depth tracking over scanner events.
//!
//! A close tag pops the stack only when it matches the current top; any other
//! close is ignored. Depth is a separate counter that drops on every close
//! regardless of name, floored at zero.

use super::scanner::{TagEvent, TagScanner};

#[derive(Debug, Default, Clone)]
pub struct NestingTracker {
    stack: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl NestingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed every tag event of `html` through a fresh tracker.
    pub fn scan(html: &str) -> Self {
        let mut tracker = Self::new();
        for event in TagScanner::new(html) {
            tracker.observe(&event);
        }
        tracker
    }

    pub fn observe(&mut self, event: &TagEvent) {
        if event.is_self_closing() {
            return;
        }

        if event.is_closing {
            if self.stack.last() == Some(&event.tag_name) {
                self.stack.pop();
            }
            self.depth = self.depth.saturating_sub(1);
        } else {
            self.stack.push(event.tag_name.clone());
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }
    }

    /// Tags still open at the scan cursor, outermost first.
    #[must_use]
    pub fn open_tags(&self) -> &[String] {
        &self.stack
    }

    #[must_use]
    pub fn into_residual_stack(self) -> Vec<String> {
        self.stack
    }

    /// Deepest nesting reached so far.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Tags never closed by the end of `html`, outermost first.
pub fn residual_stack(html: &str) -> Vec<String> {
    NestingTracker::scan(html).into_residual_stack()
}

pub fn max_nesting_depth(html: &str) -> usize {
    NestingTracker::scan(html).max_depth()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_markup_leaves_nothing_open() {
        assert!(residual_stack("<div><p>a<br>b</p></div>").is_empty());
    }

    #[test]
    fn unclosed_tags_remain_in_opening_order() {
        assert_eq!(residual_stack("<div><p>Hello <b>world"), vec!["div", "p", "b"]);
    }

    #[test]
    fn mismatched_close_is_ignored() {
        // </strong> does not match the <a> on top, so it is skipped and the
        // <strong> stays open after </a> pops.
        assert_eq!(residual_stack("<strong><a href=x>t</strong></a>"), vec!["strong"]);
        assert_eq!(residual_stack("</div><p>x</p>"), Vec::<String>::new());
    }

    #[test]
    fn depth_counter_ignores_names() {
        assert_eq!(max_nesting_depth("<a><b><c></x></y><d>"), 3);
        assert_eq!(max_nesting_depth("</a></b><p>"), 1);
        assert_eq!(max_nesting_depth("<br><hr><img>"), 0);
    }

    #[test]
    fn deep_nesting_is_measured() {
        let html = "<div>".repeat(25) + &"</div>".repeat(25);
        assert_eq!(max_nesting_depth(&html), 25);
        assert!(residual_stack(&html).is_empty());
    }
}

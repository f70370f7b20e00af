//! Per-page script text.
//!
//! One line per balloon; blank lines are dropped when the script loads.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default, Clone)]
pub struct TextList {
    lines: Vec<String>,
    current: usize,
}

impl TextList {
    /// Splits `text` on newlines, dropping lines that are only whitespace.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            current: 0,
        }
    }

    pub async fn read_file(path: &Path) -> CoreResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|err| {
            CoreError::InvalidInput(format!("cannot read {}: {err}", path.display()))
        })?;
        Ok(Self::from_text(&text))
    }

    pub fn current_line(&self) -> Option<&str> {
        self.lines.get(self.current).map(String::as_str)
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Advances to the next line. False when already at the end.
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.lines.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Steps back one line. False when already at the beginning.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jumps to `index`. False when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.lines.len() {
            return false;
        }
        self.current = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn blank_lines_are_dropped() {
        let list = TextList::from_text("first\n\n   \nsecond\nthird\n");
        assert_eq!(list.len(), 3);
        assert_eq!(list.current_line(), Some("first"));
    }

    #[test]
    fn navigation_respects_bounds() {
        let mut list = TextList::from_text("a\nb");
        assert!(!list.back());
        assert!(list.next());
        assert_eq!(list.current_line(), Some("b"));
        assert!(!list.next());
        assert!(list.back());
        assert_eq!(list.current_line(), Some("a"));

        assert!(list.go_to(1));
        assert_eq!(list.position(), 1);
        assert!(!list.go_to(2));
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn empty_list_has_no_current_line() {
        let mut list = TextList::from_text("");
        assert!(list.is_empty());
        assert!(list.current_line().is_none());
        assert!(!list.next());
        assert!(!list.back());
        assert!(!list.go_to(0));
    }

    #[tokio::test]
    async fn reads_script_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("text.txt");
        fs::write(&path, "line one\nline two\n").unwrap();

        let list = TextList::read_file(&path).await.unwrap();
        assert_eq!(list.len(), 2);

        let missing = TextList::read_file(&temp.path().join("gone.txt")).await;
        assert!(missing.is_err());
    }
}

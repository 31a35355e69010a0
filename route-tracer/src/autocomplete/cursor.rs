//! Keyboard selection over the suggestion list.

/// Step direction for the selection cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Up,
    Down,
}

/// Highlighted index over a list of `len` suggestions.
///
/// Starts with nothing highlighted. Steps are clamped to `[0, len - 1]`;
/// the cursor is only reset when the list itself is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionCursor {
    highlighted: Option<usize>,
}

impl SelectionCursor {
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Move one step over a list of `len` entries.
    pub fn step(&mut self, step: Step, len: usize) {
        if len == 0 {
            self.highlighted = None;
            return;
        }

        let last = len - 1;
        self.highlighted = Some(match (self.highlighted, step) {
            (None, _) => 0,
            (Some(i), Step::Down) => (i + 1).min(last),
            (Some(i), Step::Up) => i.saturating_sub(1).min(last),
        });
    }

    /// The index a "confirm" without explicit choice selects.
    pub fn confirm_index(&self) -> usize {
        self.highlighted.unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_highlights_top() {
        let mut cursor = SelectionCursor::default();
        cursor.step(Step::Down, 3);
        assert_eq!(cursor.highlighted(), Some(0));

        let mut cursor = SelectionCursor::default();
        cursor.step(Step::Up, 3);
        assert_eq!(cursor.highlighted(), Some(0));
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut cursor = SelectionCursor::default();
        for _ in 0..10 {
            cursor.step(Step::Down, 3);
        }
        assert_eq!(cursor.highlighted(), Some(2));

        for _ in 0..10 {
            cursor.step(Step::Up, 3);
        }
        assert_eq!(cursor.highlighted(), Some(0));
    }

    #[test]
    fn empty_list_has_no_highlight() {
        let mut cursor = SelectionCursor::default();
        cursor.step(Step::Down, 0);
        assert_eq!(cursor.highlighted(), None);
    }

    #[test]
    fn confirm_defaults_to_first() {
        let mut cursor = SelectionCursor::default();
        assert_eq!(cursor.confirm_index(), 0);
        cursor.step(Step::Down, 4);
        cursor.step(Step::Down, 4);
        assert_eq!(cursor.confirm_index(), 1);
        cursor.reset();
        assert_eq!(cursor.confirm_index(), 0);
    }

    #[test]
    fn step_deserializes_lowercase() {
        let step: Step = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(step, Step::Up);
    }
}

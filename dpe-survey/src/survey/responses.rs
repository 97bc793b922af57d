//! Per-question selection state
//!
//! One slot per question; selecting an option overwrites the slot, so at
//! most one option is ever active per question. All operations are
//! idempotent and infallible.

use super::questions::Question;

/// Option index recorded when a question was left unanswered
pub const NO_ANSWER: i8 = -1;

/// Selection state for the current survey item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseStore {
    selections: [Option<u8>; Question::COUNT],
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `option` as the active selection for `question`, clearing any
    /// previous selection on that question.
    ///
    /// Option indices are validated at the API boundary; the store records
    /// whatever it is handed.
    pub fn select(&mut self, question: Question, option: u8) {
        self.selections[question.index()] = Some(option);
    }

    /// Reset one question, or all questions when `question` is `None`
    pub fn clear(&mut self, question: Option<Question>) {
        match question {
            Some(q) => self.selections[q.index()] = None,
            None => self.selections = [None; Question::COUNT],
        }
    }

    /// Active option for a question, if any
    pub fn selected(&self, question: Question) -> Option<u8> {
        self.selections[question.index()]
    }

    /// Active option index, or [`NO_ANSWER`] when none is selected
    pub fn selected_index(&self, question: Question) -> i8 {
        self.selected(question).map_or(NO_ANSWER, |option| option as i8)
    }

    /// Whether any question has an active selection
    pub fn any_selected(&self) -> bool {
        self.selections.iter().any(Option::is_some)
    }
}

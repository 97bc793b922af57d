//! Running human-vs-AI identification score
//!
//! Pure counters; nothing here persists across sessions. "Unsure" answers
//! (and unanswered origin questions) are not counted as attempts.

/// Running count of rated items and correct origin identifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringTracker {
    ratings: u32,
    correct: u32,
}

impl ScoringTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one submission. Unsure attempts are ignored; otherwise the
    /// attempt total increments, and the correct count increments when the
    /// origin was identified correctly.
    pub fn record_attempt(&mut self, was_unsure: bool, was_correct: bool) {
        if was_unsure {
            return;
        }
        self.ratings += 1;
        if was_correct {
            self.correct += 1;
        }
    }

    /// Total counted attempts
    pub fn ratings(&self) -> u32 {
        self.ratings
    }

    /// Correct identifications among counted attempts
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Rounded percentage of correct identifications, or `None` before the
    /// first counted attempt
    pub fn percentage(&self) -> Option<u32> {
        if self.ratings == 0 {
            return None;
        }
        Some((self.correct as f64 / self.ratings as f64 * 100.0).round() as u32)
    }

    /// Score line shown to the rater after a submission
    pub fn score_message(&self) -> String {
        match self.percentage() {
            Some(percentage) => format!(
                "You correctly identified {} out of {} ({}%) human-vs-AI generated drum patterns. \
                 Press Next to evaluate another.",
                self.correct, self.ratings, percentage
            ),
            None => "Press Next to evaluate another.".to_string(),
        }
    }
}

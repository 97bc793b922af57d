//! Per-browser-session survey state
//!
//! Each session is an explicit context object owned by the HTTP dispatcher;
//! handlers are the only mutators, and they hold the session map's write
//! lock for the duration of a mutation, so there is exactly one logical
//! actor per session.
//!
//! Per-sample evaluation state machine:
//! `AwaitingInput -> (submit) -> Submitted -> (next) -> AwaitingInput`
//! with a fresh sample on each cycle.

use crate::catalog::{Origin, Sample, ANY_GENRE};
use crate::record::{ReviewerSnapshot, SubmissionRecord};
use crate::survey::questions::{OPTION_GENERATED, OPTION_HUMAN, OPTION_UNSURE};
use crate::survey::{Question, ResponseStore, ScoringTracker};
use serde::Serialize;
use uuid::Uuid;

/// Status line shown when submit is attempted with no answers
pub const PROMPT_ANSWER_FIRST: &str = "Please answer the above questions before submitting.";

/// Status line shown when the storage write failed
pub const STORAGE_FAILURE_STATUS: &str = "Failed to store evaluation results!";

/// Evaluation state for the active sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationPhase {
    /// Rating widgets enabled, awaiting a submission
    AwaitingInput,
    /// Ratings submitted and origin revealed; awaiting "Next"
    Submitted,
}

/// Reviewer metadata collected at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    pub age: String,
    pub gender: String,
    pub background: String,
    pub email: String,
    /// Reported IP address or timestamp-derived fallback
    pub identifier: String,
}

impl Default for Reviewer {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: "Rather not say".to_string(),
            background: "Rather not say".to_string(),
            email: String::new(),
            identifier: String::new(),
        }
    }
}

impl Reviewer {
    /// Snapshot embedded in a submission record
    pub fn snapshot(&self) -> ReviewerSnapshot {
        ReviewerSnapshot {
            age: self.age.clone(),
            gender: self.gender.clone(),
            background: self.background.clone(),
            email: self.email.clone(),
            ip: self.identifier.clone(),
        }
    }
}

/// Result of a submit command
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Record built; the caller persists it best-effort
    Evaluated { record: SubmissionRecord },
    /// Rejected: no question answered; status set to the prompt
    NothingSelected,
    /// No active sample to rate (empty catalog); nothing changed
    NoActiveSample,
    /// Already submitted; nothing changed
    AlreadySubmitted,
}

/// Survey state for one browser session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub reviewer: Reviewer,
    pub responses: ResponseStore,
    pub scoring: ScoringTracker,
    /// Genre filter, [`ANY_GENRE`] for no filtering
    pub genre_filter: String,
    /// Sample under evaluation; `None` triggers re-selection
    pub active_sample: Option<Sample>,
    pub phase: EvaluationPhase,
    /// Correct/incorrect feedback plus origin reveal
    pub feedback: String,
    /// Score line, prompt, or storage failure message
    pub status: String,
}

impl Session {
    pub fn new(id: Uuid, reviewer: Reviewer) -> Self {
        Self {
            id,
            reviewer,
            responses: ResponseStore::new(),
            scoring: ScoringTracker::new(),
            genre_filter: ANY_GENRE.to_string(),
            active_sample: None,
            phase: EvaluationPhase::AwaitingInput,
            feedback: String::new(),
            status: String::new(),
        }
    }

    /// Whether rating widgets are disabled (between submit and next)
    pub fn input_disabled(&self) -> bool {
        self.phase == EvaluationPhase::Submitted
    }

    /// Toggle a response option. Ignored while inputs are disabled.
    pub fn select(&mut self, question: Question, option: u8) {
        if self.input_disabled() {
            return;
        }
        self.responses.select(question, option);
    }

    /// Set the genre filter
    ///
    /// Returns true when the active sample was cleared (filter changed while
    /// awaiting input), which obliges the caller to pick a new sample. A
    /// filter change after submission takes effect on the next advance.
    pub fn set_genre_filter(&mut self, genre: String) -> bool {
        if self.genre_filter == genre {
            return false;
        }
        self.genre_filter = genre;
        if self.phase == EvaluationPhase::AwaitingInput {
            self.active_sample = None;
            return true;
        }
        false
    }

    /// Submit the current ratings
    ///
    /// On success the session transitions to [`EvaluationPhase::Submitted`]:
    /// scoring updates, feedback reveals the origin, the status line carries
    /// the running score, and the built record is returned for persistence.
    pub fn submit(&mut self, timestamp_ms: i64) -> SubmitOutcome {
        if self.phase == EvaluationPhase::Submitted {
            return SubmitOutcome::AlreadySubmitted;
        }
        let sample = match &self.active_sample {
            Some(sample) => sample.clone(),
            None => return SubmitOutcome::NoActiveSample,
        };
        if !self.responses.any_selected() {
            self.status = PROMPT_ANSWER_FIRST.to_string();
            return SubmitOutcome::NothingSelected;
        }

        let origin_answer = self.responses.selected(Question::HumanOrAi);
        let was_unsure =
            matches!(origin_answer, None | Some(OPTION_UNSURE));
        let was_correct = match sample.origin {
            Origin::Human => origin_answer == Some(OPTION_HUMAN),
            Origin::Generated => origin_answer == Some(OPTION_GENERATED),
        };

        self.feedback = if was_unsure {
            String::new()
        } else if was_correct {
            "Correct! ".to_string()
        } else {
            "Incorrect! ".to_string()
        };
        self.feedback.push_str(sample.origin.reveal_text());

        self.scoring.record_attempt(was_unsure, was_correct);
        self.status = self.scoring.score_message();

        let record = SubmissionRecord::build(
            &sample,
            self.reviewer.snapshot(),
            &self.responses,
            &self.scoring,
            timestamp_ms,
        );

        self.phase = EvaluationPhase::Submitted;
        SubmitOutcome::Evaluated { record }
    }

    /// Advance to the next sample after a submission
    ///
    /// Clears responses, feedback, and status, re-enables inputs, and drops
    /// the active sample so the caller picks a fresh one. No-op while
    /// awaiting input.
    pub fn advance(&mut self) {
        if self.phase != EvaluationPhase::Submitted {
            return;
        }
        self.responses.clear(None);
        self.feedback.clear();
        self.status.clear();
        self.phase = EvaluationPhase::AwaitingInput;
        self.active_sample = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_sample(rel_path: &str) -> Session {
        let mut session = Session::new(Uuid::new_v4(), Reviewer::default());
        session.active_sample = Some(Sample::from_rel_path(rel_path).unwrap());
        session
    }

    #[test]
    fn test_submit_with_nothing_selected_is_rejected() {
        let mut session = session_with_sample("rock/training/1.wav");

        let outcome = session.submit(1000);

        assert!(matches!(outcome, SubmitOutcome::NothingSelected));
        assert_eq!(session.status, PROMPT_ANSWER_FIRST);
        assert_eq!(session.phase, EvaluationPhase::AwaitingInput);
        assert_eq!(session.scoring.ratings(), 0);
    }

    #[test]
    fn test_correct_identification() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::HumanOrAi, OPTION_HUMAN);

        let outcome = session.submit(1000);

        let record = match outcome {
            SubmitOutcome::Evaluated { record } => record,
            other => panic!("expected Evaluated, got {:?}", other),
        };
        assert!(session.feedback.starts_with("Correct! "));
        assert!(session.feedback.contains("human-composed"));
        assert_eq!(session.scoring.ratings(), 1);
        assert_eq!(session.scoring.correct(), 1);
        assert_eq!(record.num_ratings, 1);
        assert_eq!(record.num_correct, 1);
        assert_eq!(session.phase, EvaluationPhase::Submitted);
    }

    #[test]
    fn test_incorrect_identification() {
        let mut session = session_with_sample("jazz/generated/2.wav");
        session.select(Question::HumanOrAi, OPTION_HUMAN);

        session.submit(1000);

        assert!(session.feedback.starts_with("Incorrect! "));
        assert!(session.feedback.contains("AI-generated"));
        assert_eq!(session.scoring.ratings(), 1);
        assert_eq!(session.scoring.correct(), 0);
    }

    #[test]
    fn test_unsure_still_submits_but_is_not_scored() {
        let mut session = session_with_sample("jazz/generated/2.wav");
        session.select(Question::HumanOrAi, OPTION_UNSURE);

        let outcome = session.submit(1000);

        assert!(matches!(outcome, SubmitOutcome::Evaluated { .. }));
        assert_eq!(session.scoring.ratings(), 0);
        // Origin is still revealed
        assert_eq!(session.feedback, "This drum pattern was AI-generated");
    }

    #[test]
    fn test_likert_only_answers_submit_unscored() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::Overall, 3);

        let outcome = session.submit(1000);

        assert!(matches!(outcome, SubmitOutcome::Evaluated { .. }));
        assert_eq!(session.scoring.ratings(), 0);
    }

    #[test]
    fn test_double_submit_is_a_no_op() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::HumanOrAi, OPTION_HUMAN);
        session.submit(1000);

        let outcome = session.submit(2000);

        assert!(matches!(outcome, SubmitOutcome::AlreadySubmitted));
        assert_eq!(session.scoring.ratings(), 1);
    }

    #[test]
    fn test_select_ignored_while_submitted() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::HumanOrAi, OPTION_HUMAN);
        session.submit(1000);

        session.select(Question::Overall, 2);

        assert_eq!(session.responses.selected(Question::Overall), None);
    }

    #[test]
    fn test_advance_resets_for_next_sample() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::HumanOrAi, OPTION_GENERATED);
        session.submit(1000);

        session.advance();

        assert_eq!(session.phase, EvaluationPhase::AwaitingInput);
        assert!(!session.responses.any_selected());
        assert!(session.feedback.is_empty());
        assert!(session.status.is_empty());
        assert!(session.active_sample.is_none());
        // Score survives across samples
        assert_eq!(session.scoring.ratings(), 1);
    }

    #[test]
    fn test_advance_before_submit_is_a_no_op() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::Overall, 1);

        session.advance();

        assert!(session.active_sample.is_some());
        assert!(session.responses.any_selected());
    }

    #[test]
    fn test_genre_change_clears_active_sample() {
        let mut session = session_with_sample("rock/training/1.wav");

        let cleared = session.set_genre_filter("jazz".to_string());

        assert!(cleared);
        assert!(session.active_sample.is_none());
    }

    #[test]
    fn test_unchanged_genre_keeps_active_sample() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.genre_filter = "rock".to_string();

        let cleared = session.set_genre_filter("rock".to_string());

        assert!(!cleared);
        assert!(session.active_sample.is_some());
    }

    #[test]
    fn test_genre_change_after_submit_defers_to_next() {
        let mut session = session_with_sample("rock/training/1.wav");
        session.select(Question::HumanOrAi, OPTION_HUMAN);
        session.submit(1000);

        let cleared = session.set_genre_filter("jazz".to_string());

        assert!(!cleared);
        // The reveal stays coherent with the rated sample
        assert!(session.active_sample.is_some());
        assert_eq!(session.genre_filter, "jazz");
    }
}

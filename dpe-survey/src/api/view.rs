//! Session view state returned to the survey page
//!
//! Every command handler responds with the full view so the page performs a
//! single re-render pass from it. The ground-truth origin is included only
//! after submission; before that the view exposes the sample's genre alone.

use crate::catalog::{Catalog, Origin, ANY_GENRE};
use crate::session::{EvaluationPhase, Session};
use crate::survey::Question;
use serde::Serialize;
use uuid::Uuid;

/// One question as rendered on the page
#[derive(Debug, Serialize)]
pub struct QuestionView {
    /// 1-based ordinal id
    pub id: u8,
    pub text: String,
    pub options: Vec<String>,
    /// Active option index, -1 when unanswered
    pub selected: i8,
}

/// The active sample, stripped of its origin
#[derive(Debug, Serialize)]
pub struct SampleView {
    pub genre: String,
}

/// Full survey state for one session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: EvaluationPhase,
    /// Catalog genres plus the "Any Genre" pass-through entry
    pub genres: Vec<String>,
    pub genre_filter: String,
    pub sample: Option<SampleView>,
    /// Ground-truth origin, revealed only after submission
    pub origin_revealed: Option<Origin>,
    pub questions: Vec<QuestionView>,
    pub feedback: String,
    pub status: String,
    pub num_ratings: u32,
    pub num_correct: u32,
    pub input_disabled: bool,
    pub submit_label: &'static str,
}

impl SessionView {
    /// Assemble the view for one session
    pub fn build(session: &Session, catalog: &Catalog) -> SessionView {
        let mut genres: Vec<String> = catalog.genres().to_vec();
        genres.push(ANY_GENRE.to_string());

        let genre_for_text = session
            .active_sample
            .as_ref()
            .map(|sample| sample.genre.as_str())
            .unwrap_or("selected");

        let questions = Question::ALL
            .iter()
            .map(|&question| QuestionView {
                id: question.id(),
                text: question.text(genre_for_text),
                options: question.options().iter().map(|s| s.to_string()).collect(),
                selected: session.responses.selected_index(question),
            })
            .collect();

        let submitted = session.phase == EvaluationPhase::Submitted;

        SessionView {
            session_id: session.id,
            phase: session.phase,
            genres,
            genre_filter: session.genre_filter.clone(),
            sample: session.active_sample.as_ref().map(|sample| SampleView {
                genre: sample.genre.clone(),
            }),
            origin_revealed: session
                .active_sample
                .as_ref()
                .filter(|_| submitted)
                .map(|sample| sample.origin),
            questions,
            feedback: session.feedback.clone(),
            status: session.status.clone(),
            num_ratings: session.scoring.ratings(),
            num_correct: session.scoring.correct(),
            input_disabled: session.input_disabled(),
            submit_label: if submitted { "Next" } else { "Submit" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Sample;
    use crate::session::Reviewer;
    use crate::survey::questions::OPTION_HUMAN;

    fn catalog() -> Catalog {
        let dir = tempfile::tempdir().unwrap();
        for rel in ["rock/training/1.wav", "jazz/generated/2.wav"] {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"RIFF").unwrap();
        }
        Catalog::scan(dir.path()).unwrap()
    }

    fn session() -> Session {
        let mut session = Session::new(Uuid::new_v4(), Reviewer::default());
        session.active_sample = Some(Sample::from_rel_path("rock/training/1.wav").unwrap());
        session
    }

    #[test]
    fn test_origin_hidden_before_submission() {
        let catalog = catalog();
        let session = session();

        let view = SessionView::build(&session, &catalog);

        assert!(view.origin_revealed.is_none());
        assert_eq!(view.sample.unwrap().genre, "rock");
        assert_eq!(view.submit_label, "Submit");
        assert!(!view.input_disabled);
    }

    #[test]
    fn test_origin_revealed_after_submission() {
        let catalog = catalog();
        let mut session = session();
        session.select(Question::HumanOrAi, OPTION_HUMAN);
        session.submit(1000);

        let view = SessionView::build(&session, &catalog);

        assert_eq!(view.origin_revealed, Some(Origin::Human));
        assert_eq!(view.submit_label, "Next");
        assert!(view.input_disabled);
        assert_eq!(view.num_ratings, 1);
    }

    #[test]
    fn test_genres_include_any_genre_entry() {
        let catalog = catalog();
        let view = SessionView::build(&session(), &catalog);

        assert_eq!(view.genres, ["jazz", "rock", ANY_GENRE]);
    }

    #[test]
    fn test_genre_question_uses_sample_genre() {
        let catalog = catalog();
        let view = SessionView::build(&session(), &catalog);

        let q2 = &view.questions[1];
        assert!(q2.text.contains("rock"));
    }

    #[test]
    fn test_view_serializes_expected_fields() {
        let catalog = catalog();
        let view = SessionView::build(&session(), &catalog);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["phase"], "awaiting_input");
        assert_eq!(value["questions"].as_array().unwrap().len(), 5);
        assert_eq!(value["questions"][0]["selected"], -1);
    }
}

//! Submission records
//!
//! One immutable record per submit action: sample filename, a snapshot of
//! the reviewer metadata, the per-question response indices, and the
//! cumulative rating counters. Records are serialized once and written once.

use crate::catalog::Sample;
use crate::survey::{Question, ResponseStore, ScoringTracker};
use serde::{Deserialize, Serialize};

/// Reviewer metadata snapshot embedded in each record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSnapshot {
    pub age: String,
    pub gender: String,
    pub background: String,
    pub email: String,
    /// Reviewer identifier: reported IP address, or the timestamp-derived
    /// fallback when no address could be determined
    pub ip: String,
}

/// Per-question response indices; -1 marks an unanswered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(rename = "human-or-ai")]
    pub human_or_ai: i8,
    #[serde(rename = "representative-of-genre")]
    pub representative_of_genre: i8,
    pub expressive: i8,
    #[serde(rename = "free-of-glitches")]
    pub free_of_glitches: i8,
    pub overall: i8,
}

impl Ratings {
    /// Capture the response indices for all five questions
    pub fn from_responses(responses: &ResponseStore) -> Ratings {
        Ratings {
            human_or_ai: responses.selected_index(Question::HumanOrAi),
            representative_of_genre: responses.selected_index(Question::RepresentativeOfGenre),
            expressive: responses.selected_index(Question::Expressive),
            free_of_glitches: responses.selected_index(Question::FreeOfGlitches),
            overall: responses.selected_index(Question::Overall),
        }
    }
}

/// The structured record persisted for each submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Catalog-relative path of the rated sample
    pub filename: String,
    pub reviewer: ReviewerSnapshot,
    pub ratings: Ratings,
    /// Unix epoch milliseconds at submit time
    pub timestamp: i64,
    /// Cumulative counted attempts, including this submission
    pub num_ratings: u32,
    /// Cumulative correct identifications, including this submission
    pub num_correct: u32,
}

impl SubmissionRecord {
    /// Build the immutable record for one submission
    pub fn build(
        sample: &Sample,
        reviewer: ReviewerSnapshot,
        responses: &ResponseStore,
        scoring: &ScoringTracker,
        timestamp_ms: i64,
    ) -> SubmissionRecord {
        SubmissionRecord {
            filename: sample.rel_path.clone(),
            reviewer,
            ratings: Ratings::from_responses(responses),
            timestamp: timestamp_ms,
            num_ratings: scoring.ratings(),
            num_correct: scoring.correct(),
        }
    }

    /// Display-stable JSON body written to object storage
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Storage key for a record: `<prefix>/<sanitized identifier>-<timestamp>.json`
pub fn storage_key(prefix: &str, reviewer_identifier: &str, timestamp_ms: i64) -> String {
    format!(
        "{}/{}-{}.json",
        prefix,
        sanitize_identifier(reviewer_identifier),
        timestamp_ms
    )
}

/// Replace key-hostile separator characters in the reviewer identifier
fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c == '.' || c == ':' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::questions::{OPTION_GENERATED, OPTION_UNSURE};

    fn sample() -> Sample {
        Sample::from_rel_path("jazz/generated/2.wav").unwrap()
    }

    fn reviewer() -> ReviewerSnapshot {
        ReviewerSnapshot {
            age: "34".to_string(),
            gender: "Other/diverse".to_string(),
            background: "Hobby musician or producer".to_string(),
            email: "listener@example.com".to_string(),
            ip: "192.168.0.17".to_string(),
        }
    }

    #[test]
    fn test_build_captures_responses_and_counters() {
        let mut responses = ResponseStore::new();
        responses.select(Question::HumanOrAi, OPTION_GENERATED);
        responses.select(Question::Overall, 3);

        let mut scoring = ScoringTracker::new();
        scoring.record_attempt(false, true);

        let record =
            SubmissionRecord::build(&sample(), reviewer(), &responses, &scoring, 1_700_000_000_123);

        assert_eq!(record.filename, "jazz/generated/2.wav");
        assert_eq!(record.ratings.human_or_ai, 1);
        assert_eq!(record.ratings.overall, 3);
        // Unanswered questions carry the sentinel
        assert_eq!(record.ratings.expressive, -1);
        assert_eq!(record.num_ratings, 1);
        assert_eq!(record.num_correct, 1);
        assert_eq!(record.timestamp, 1_700_000_000_123);
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut responses = ResponseStore::new();
        responses.select(Question::HumanOrAi, OPTION_UNSURE);
        responses.select(Question::RepresentativeOfGenre, 2);
        responses.select(Question::FreeOfGlitches, 0);

        let record = SubmissionRecord::build(
            &sample(),
            reviewer(),
            &responses,
            &ScoringTracker::new(),
            42,
        );

        let json = record.to_json().unwrap();
        let parsed: SubmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_json_uses_hyphenated_rating_keys() {
        let record = SubmissionRecord::build(
            &sample(),
            reviewer(),
            &ResponseStore::new(),
            &ScoringTracker::new(),
            0,
        );

        let json = record.to_json().unwrap();
        assert!(json.contains("\"human-or-ai\""));
        assert!(json.contains("\"representative-of-genre\""));
        assert!(json.contains("\"free-of-glitches\""));
    }

    #[test]
    fn test_storage_key_sanitizes_identifier() {
        assert_eq!(
            storage_key("dev", "1.2.3.4", 1234),
            "dev/1_2_3_4-1234.json"
        );
        assert_eq!(
            storage_key("prod", "2001:db8::1", 99),
            "prod/2001_db8__1-99.json"
        );
    }
}

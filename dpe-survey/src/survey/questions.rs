//! Survey question definitions
//!
//! Question 1 asks for the origin judgment (human-composed vs AI-generated);
//! questions 2 through 5 are 4-point Likert statements about the pattern.

/// Likert scale labels for questions 2-5, ordered from index 0
pub const LIKERT_OPTIONS: [&str; 4] = [
    "Strongly disagree",
    "Somewhat disagree",
    "Somewhat agree",
    "Strongly agree",
];

/// Option labels for question 1, ordered from index 0
pub const ORIGIN_OPTIONS: [&str; 3] = ["Human-composed", "AI-generated", "Unsure"];

/// Option index on question 1 meaning "Human-composed"
pub const OPTION_HUMAN: u8 = 0;
/// Option index on question 1 meaning "AI-generated"
pub const OPTION_GENERATED: u8 = 1;
/// Option index on question 1 meaning "Unsure"
pub const OPTION_UNSURE: u8 = 2;

/// The five survey questions, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    /// Q1: origin judgment (human / AI / unsure)
    HumanOrAi,
    /// Q2: pattern is representative of its genre
    RepresentativeOfGenre,
    /// Q3: sounds like an expressive human performance
    Expressive,
    /// Q4: plays without technical glitches
    FreeOfGlitches,
    /// Q5: overall interesting and pleasing
    Overall,
}

impl Question {
    /// All questions in page order
    pub const ALL: [Question; 5] = [
        Question::HumanOrAi,
        Question::RepresentativeOfGenre,
        Question::Expressive,
        Question::FreeOfGlitches,
        Question::Overall,
    ];

    /// Number of questions on the page
    pub const COUNT: usize = Self::ALL.len();

    /// Resolve a 1-based ordinal question id
    pub fn from_id(id: u8) -> Option<Question> {
        match id {
            1 => Some(Question::HumanOrAi),
            2 => Some(Question::RepresentativeOfGenre),
            3 => Some(Question::Expressive),
            4 => Some(Question::FreeOfGlitches),
            5 => Some(Question::Overall),
            _ => None,
        }
    }

    /// 1-based ordinal id
    pub fn id(self) -> u8 {
        self.index() as u8 + 1
    }

    /// 0-based array index
    pub fn index(self) -> usize {
        match self {
            Question::HumanOrAi => 0,
            Question::RepresentativeOfGenre => 1,
            Question::Expressive => 2,
            Question::FreeOfGlitches => 3,
            Question::Overall => 4,
        }
    }

    /// Allowed response options, ordered by option index
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Question::HumanOrAi => &ORIGIN_OPTIONS,
            _ => &LIKERT_OPTIONS,
        }
    }

    /// Number of allowed response options
    pub fn option_count(self) -> usize {
        self.options().len()
    }

    /// Question text as shown to the rater
    ///
    /// Question 2 embeds the genre of the active sample.
    pub fn text(self, genre: &str) -> String {
        match self {
            Question::HumanOrAi => {
                "Is this drum pattern human-composed or AI-generated?".to_string()
            }
            Question::RepresentativeOfGenre => {
                format!("This drum pattern is representative of the {} genre:", genre)
            }
            Question::Expressive => {
                "The recording of the drum pattern sounds like an expressive human performance:"
                    .to_string()
            }
            Question::FreeOfGlitches => {
                "The drum pattern plays without any technical glitches (e.g. sudden pauses):"
                    .to_string()
            }
            Question::Overall => {
                "Overall I find the drum pattern interesting and pleasing to listen to:"
                    .to_string()
            }
        }
    }
}

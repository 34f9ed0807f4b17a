// src/exam.rs

/// One of the eight CPCE content areas.
///
/// The `id` is the stable tag stored on questions and in per-user statistics;
/// names follow the official CCE exam outline.
#[derive(Debug, Clone, Copy)]
pub struct ContentArea {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    /// Questions drawn from this area in a full simulation.
    pub quota: i64,
    /// Scored questions per area on the real exam (the rest are pretest items).
    pub scored: i64,
}

/// The eight content areas in their fixed exam order.
pub const CONTENT_AREAS: [ContentArea; 8] = [
    ContentArea {
        id: "professional-orientation",
        name: "Professional Counseling Orientation and Ethical Practice",
        short_name: "Professional Orientation",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "social-cultural-diversity",
        name: "Social and Cultural Diversity",
        short_name: "Diversity",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "human-growth-development",
        name: "Human Growth and Development",
        short_name: "Human Development",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "career-development",
        name: "Career Development",
        short_name: "Career",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "counseling-helping-relationships",
        name: "Counseling and Helping Relationships",
        short_name: "Counseling Relationships",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "group-counseling",
        name: "Group Counseling and Group Work",
        short_name: "Group Work",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "assessment-testing",
        name: "Assessment and Testing",
        short_name: "Assessment",
        quota: 20,
        scored: 17,
    },
    ContentArea {
        id: "research-program-evaluation",
        name: "Research and Program Evaluation",
        short_name: "Research",
        quota: 20,
        scored: 17,
    },
];

/// Looks up a content area by its id tag.
pub fn content_area(id: &str) -> Option<&'static ContentArea> {
    CONTENT_AREAS.iter().find(|area| area.id == id)
}

// Exam format (official CPCE outline).
pub const SIMULATION_QUESTION_COUNT: i64 = 160;
pub const SCORED_QUESTION_COUNT: i64 = 136;
pub const TIME_LIMIT_MINUTES: i64 = 225;
pub const TIME_LIMIT_SECONDS: i64 = TIME_LIMIT_MINUTES * 60;

// Default batch sizes per mode; callers may request fewer or more
// within MAX_BATCH_SIZE.
pub const PRACTICE_DEFAULT_COUNT: i64 = 20;
pub const SECTION_DEFAULT_COUNT: i64 = 20;
pub const QUIZPLUS_DEFAULT_COUNT: i64 = 10;
pub const FLASHCARD_DEFAULT_COUNT: i64 = 20;
pub const MAX_BATCH_SIZE: i64 = 100;

/// A named quiz configuration controlling selection breadth and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Random questions from all content areas, untimed.
    Practice,
    /// Questions from a single content area, untimed.
    Section,
    /// Full 160-question timed exam, 20 per area.
    Simulation,
    /// AI-generated extra questions, untimed.
    Quizplus,
}

impl QuizMode {
    /// Stable tag stored on session rows.
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Practice => "practice",
            QuizMode::Section => "section",
            QuizMode::Simulation => "simulation",
            QuizMode::Quizplus => "quizplus",
        }
    }
}

use std::fmt;

/// Coarse effort classification, ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "Low"),
            Complexity::Medium => write!(f, "Medium"),
            Complexity::High => write!(f, "High"),
        }
    }
}

/// One proposed test case for a selection of files.
///
/// Contract between:
/// suggestion engine → UI listing → template resolution.
#[derive(Debug, Clone)]
pub struct SuggestionDescriptor {
    /// Rule tag plus a per-engine sequence number. Unique within one
    /// generation pass and across repeated passes in one process.
    pub id: String,

    pub title: String,
    pub description: String,

    /// Testing framework tag; drives template selection.
    pub framework: String,

    /// File names this suggestion covers.
    pub files: Vec<String>,

    pub estimated_effort: String,
    pub complexity: Complexity,
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword-matched topic bucket used to pick a scene template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Ocean,
    Solar,
    Atomic,
    Anatomy,
    Geology,
    Botany,
    AbstractConcept,
}

/// Keyword groups in priority order. The first group with any keyword that
/// occurs as a substring of the lower-cased topic decides the category.
const KEYWORD_GROUPS: &[(Category, &[&str])] = &[
    (Category::Ocean, &["ocean", "sea", "marine", "depth"]),
    (Category::Solar, &["solar", "planet", "space"]),
    (Category::Atomic, &["atom", "molecular", "chemistry"]),
    (
        Category::Anatomy,
        &["human", "body", "anatomy", "heart", "brain"],
    ),
    (
        Category::Geology,
        &["mountain", "geology", "rock", "volcano"],
    ),
    (
        Category::Botany,
        &["plant", "photosynthesis", "leaf", "chlorophyll"],
    ),
];

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Ocean,
        Self::Solar,
        Self::Atomic,
        Self::Anatomy,
        Self::Geology,
        Self::Botany,
        Self::AbstractConcept,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Solar => "solar",
            Self::Atomic => "atomic",
            Self::Anatomy => "anatomy",
            Self::Geology => "geology",
            Self::Botany => "botany",
            Self::AbstractConcept => "abstract-concept",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ocean => "Ocean & Marine Life",
            Self::Solar => "Solar System & Space",
            Self::Atomic => "Atoms & Chemistry",
            Self::Anatomy => "Human Anatomy",
            Self::Geology => "Geology",
            Self::Botany => "Plants & Photosynthesis",
            Self::AbstractConcept => "Abstract Concept",
        }
    }

    /// Keywords that select this category; empty for the fallback.
    pub fn keywords(&self) -> &'static [&'static str] {
        KEYWORD_GROUPS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, kw)| *kw)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Classify a free-text topic. Case-insensitive; first match wins.
pub fn classify(topic: &str) -> Category {
    matched_keyword(topic)
        .map(|(category, _)| category)
        .unwrap_or(Category::AbstractConcept)
}

/// The category and the keyword that triggered it, if any group matched.
pub fn matched_keyword(topic: &str) -> Option<(Category, &'static str)> {
    let lower = topic.to_lowercase();
    KEYWORD_GROUPS.iter().find_map(|(category, keywords)| {
        keywords
            .iter()
            .find(|kw| lower.contains(*kw))
            .map(|kw| (*category, *kw))
    })
}

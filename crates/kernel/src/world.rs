use crate::object::ObjectDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of one built world. Issued by a [`crate::WorldBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u64);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

/// Failed to parse an age group or complexity from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?} (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Target audience of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeGroup {
    Elementary,
    #[default]
    MiddleSchool,
    HighSchool,
    College,
}

impl AgeGroup {
    pub const ALL: [Self; 4] = [
        Self::Elementary,
        Self::MiddleSchool,
        Self::HighSchool,
        Self::College,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Elementary => "elementary",
            Self::MiddleSchool => "middle-school",
            Self::HighSchool => "high-school",
            Self::College => "college",
        }
    }

    /// Human-facing label, as shown in the age selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elementary => "Elementary (K-5)",
            Self::MiddleSchool => "Middle School (6-8)",
            Self::HighSchool => "High School (9-12)",
            Self::College => "College/Adult",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AgeGroup {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "age group",
                value: s.to_string(),
                expected: "elementary, middle-school, high-school, college",
            })
    }
}

/// How deep a world goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl Complexity {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Intermediate, Self::Advanced];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// How many learning objectives a world of this complexity lists.
    pub fn objective_count(&self) -> usize {
        match self {
            Self::Basic => 2,
            Self::Intermediate => 3,
            Self::Advanced => 4,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Complexity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "complexity",
                value: s.to_string(),
                expected: "basic, intermediate, advanced",
            })
    }
}

/// Full declarative description of one learning scene.
///
/// Built only through [`crate::WorldBuilder`], which guarantees a non-empty
/// topic and a non-empty object list. There are no setters: a new world
/// replaces the old one as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDescriptor {
    pub(crate) id: WorldId,
    pub(crate) topic: String,
    pub(crate) age_group: AgeGroup,
    pub(crate) complexity: Complexity,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) objects: Vec<ObjectDescriptor>,
    pub(crate) narration: String,
    pub(crate) learning_objectives: Vec<String>,
    pub(crate) generated_at: DateTime<Utc>,
}

impl WorldDescriptor {
    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn objects(&self) -> &[ObjectDescriptor] {
        &self.objects
    }

    pub fn narration(&self) -> &str {
        &self.narration
    }

    pub fn learning_objectives(&self) -> &[String] {
        &self.learning_objectives
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// The first object is the world's central body.
    pub fn central_object(&self) -> &ObjectDescriptor {
        &self.objects[0]
    }

    pub fn object(&self, name: &str) -> Option<&ObjectDescriptor> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Names shown as interactive badges, in authoring order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_group_round_trips_through_slug() {
        for age in AgeGroup::ALL {
            assert_eq!(age.slug().parse::<AgeGroup>().unwrap(), age);
        }
        assert_eq!(AgeGroup::default(), AgeGroup::MiddleSchool);
    }

    #[test]
    fn complexity_parse_is_case_insensitive() {
        assert_eq!("Advanced".parse::<Complexity>().unwrap(), Complexity::Advanced);
        assert_eq!(Complexity::default(), Complexity::Intermediate);
    }

    #[test]
    fn unknown_enum_value_reports_choices() {
        let err = "kindergarten".parse::<AgeGroup>().unwrap_err();
        assert!(err.to_string().contains("middle-school"));
    }

    #[test]
    fn enums_serialize_kebab_case() {
        let json = serde_json::to_string(&AgeGroup::HighSchool).unwrap();
        assert_eq!(json, "\"high-school\"");
    }

    #[test]
    fn objective_count_grows_with_complexity() {
        assert!(Complexity::Basic.objective_count() < Complexity::Advanced.objective_count());
    }
}

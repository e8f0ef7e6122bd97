use eduverse_kernel::{AgeGroup, Complexity};

/// A high-level request that any front end (desktop, CLI) can produce.
///
/// The session consumes actions, never raw input events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start generating a world for a free-text topic.
    Generate {
        topic: String,
        age_group: AgeGroup,
        complexity: Complexity,
    },
    /// Abandon the in-flight generation, if any.
    CancelGeneration,
    /// Show a prebuilt card's world by id.
    SelectPrebuilt(u32),
    TogglePlayback,
    Pause,
    Resume,
    ResetCamera,
    /// Highlight an object of the current world by name.
    SelectObject(String),
    Resize {
        width: u32,
        height: u32,
    },
    /// No-op (used for input that isn't bound to anything).
    Noop,
}

impl Action {
    pub fn generate(topic: impl Into<String>, age_group: AgeGroup, complexity: Complexity) -> Self {
        Self::Generate {
            topic: topic.into(),
            age_group,
            complexity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_helper_builds_variant() {
        let a = Action::generate("Volcanoes", AgeGroup::HighSchool, Complexity::Advanced);
        assert_eq!(
            a,
            Action::Generate {
                topic: "Volcanoes".into(),
                age_group: AgeGroup::HighSchool,
                complexity: Complexity::Advanced,
            }
        );
    }

    #[test]
    fn playback_actions() {
        assert!(matches!(Action::TogglePlayback, Action::TogglePlayback));
        assert!(matches!(Action::Pause, Action::Pause));
        assert!(matches!(Action::Resume, Action::Resume));
    }
}

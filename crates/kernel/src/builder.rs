use crate::catalog::PrebuiltCard;
use crate::classify::classify;
use crate::object::ObjectDescriptor;
use crate::templates::{learning_objectives, scene_template};
use crate::world::{AgeGroup, Complexity, WorldDescriptor, WorldId};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Errors from building a world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Please enter a topic to explore!")]
    EmptyTopic,
    #[error("world {0:?} has no objects")]
    NoObjects(String),
}

/// Composes classifier output, the template library and user-selected
/// metadata into immutable [`WorldDescriptor`]s.
///
/// Owns the identity counter, so two builders issue independent id sequences.
#[derive(Debug)]
pub struct WorldBuilder {
    next_id: AtomicU64,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Builder whose first world gets id `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next_id: AtomicU64::new(first),
        }
    }

    /// Build a world for a free-text topic, stamped with the current time.
    pub fn build(
        &self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
    ) -> Result<WorldDescriptor, BuildError> {
        self.build_at(topic, age_group, complexity, Utc::now())
    }

    /// Same as [`Self::build`] with an explicit timestamp.
    pub fn build_at(
        &self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
        generated_at: DateTime<Utc>,
    ) -> Result<WorldDescriptor, BuildError> {
        let topic = validate_topic(topic)?;
        let category = classify(topic);
        tracing::debug!(topic, %category, "classified topic");
        self.free_text(
            topic,
            age_group,
            complexity,
            scene_template(category, topic),
            generated_at,
        )
    }

    /// Build a world from caller-supplied objects, e.g. loaded from JSON.
    /// Title, narration and objectives follow the free-text path.
    pub fn build_custom(
        &self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
        objects: Vec<ObjectDescriptor>,
    ) -> Result<WorldDescriptor, BuildError> {
        let topic = validate_topic(topic)?;
        self.free_text(topic, age_group, complexity, objects, Utc::now())
    }

    /// Wrap a prebuilt card into a world. Skips generation entirely.
    pub fn from_card(&self, card: &PrebuiltCard) -> Result<WorldDescriptor, BuildError> {
        self.from_card_at(card, Utc::now())
    }

    pub fn from_card_at(
        &self,
        card: &PrebuiltCard,
        generated_at: DateTime<Utc>,
    ) -> Result<WorldDescriptor, BuildError> {
        self.assemble(
            card.topic,
            AgeGroup::default(),
            card.difficulty.complexity(),
            card.title.to_string(),
            card.description.to_string(),
            card.objects(),
            format!(
                "Welcome to {}. {}. Let's begin exploring!",
                card.title, card.description
            ),
            generated_at,
        )
    }

    fn free_text(
        &self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
        objects: Vec<ObjectDescriptor>,
        generated_at: DateTime<Utc>,
    ) -> Result<WorldDescriptor, BuildError> {
        self.assemble(
            topic,
            age_group,
            complexity,
            format!("{topic} - 3D Learning World"),
            format!(
                "Explore {topic} through an immersive 3D environment tailored for {} learners.",
                age_group.label()
            ),
            objects,
            format!(
                "Welcome to your {topic} learning world. Let's explore this concept step by step..."
            ),
            generated_at,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        topic: &str,
        age_group: AgeGroup,
        complexity: Complexity,
        title: String,
        description: String,
        objects: Vec<ObjectDescriptor>,
        narration: String,
        generated_at: DateTime<Utc>,
    ) -> Result<WorldDescriptor, BuildError> {
        if objects.is_empty() {
            return Err(BuildError::NoObjects(title));
        }
        let id = WorldId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let world = WorldDescriptor {
            id,
            topic: topic.to_string(),
            age_group,
            complexity,
            title,
            description,
            objects,
            narration,
            learning_objectives: learning_objectives(classify(topic), topic, complexity),
            generated_at,
        };
        tracing::info!(
            %id,
            topic,
            objects = world.objects.len(),
            "built world"
        );
        Ok(world)
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Trimmed topic, or [`BuildError::EmptyTopic`] if nothing is left.
pub fn validate_topic(topic: &str) -> Result<&str, BuildError> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(BuildError::EmptyTopic);
    }
    Ok(trimmed)
}

//! Hand-authored scene templates, one per category.
//!
//! Every template lists its central body first, at the origin.

use crate::classify::Category;
use crate::object::{ObjectDescriptor, ShapeKind};
use crate::world::Complexity;

use ShapeKind::{Box, Helix, Sphere};

/// Objects for a category. The fallback category substitutes `topic` into
/// every description; the authored categories ignore it.
pub fn scene_template(category: Category, topic: &str) -> Vec<ObjectDescriptor> {
    match category {
        Category::Ocean => ocean(),
        Category::Solar => solar(),
        Category::Atomic => atomic(),
        Category::Anatomy => anatomy(),
        Category::Geology => geology(),
        Category::Botany => botany(),
        Category::AbstractConcept => abstract_concept(topic),
    }
}

fn ocean() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Coral Reef")
            .color(0xFF7F50)
            .scale(1.2)
            .describe("A living reef built by tiny animals over thousands of years."),
        ObjectDescriptor::new(Sphere, "Sea Turtle")
            .at(3.0, 0.5, 1.0)
            .color(0x2E8B57)
            .scale(0.6)
            .describe("Migrates across whole ocean basins to return to its nesting beach."),
        ObjectDescriptor::new(Sphere, "Jellyfish")
            .at(-2.5, 1.5, -1.0)
            .color(0xE0B0FF)
            .scale(0.5)
            .describe("Drifts with the currents and stings prey with its tentacles."),
        ObjectDescriptor::new(Helix, "Kelp Forest")
            .at(-3.0, 0.0, 2.0)
            .color(0x3CB371)
            .describe("Tall algae anchored to the sea floor, sheltering hundreds of species."),
        ObjectDescriptor::new(Box, "Ocean Floor")
            .at(0.0, -2.5, 0.0)
            .color(0x1B3B5A)
            .scale_xyz(8.0, 0.3, 8.0)
            .describe("The abyssal plain, where pressure is hundreds of times that at the surface."),
    ]
}

fn solar() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Sun")
            .color(0xFFA500)
            .scale(2.0)
            .describe("The star at the center of our solar system, fusing hydrogen into helium."),
        ObjectDescriptor::new(Sphere, "Earth")
            .at(5.0, 0.0, 0.0)
            .color(0x4A90E2)
            .scale(0.8)
            .describe("The third planet from the Sun and the only one known to host life."),
        ObjectDescriptor::new(Sphere, "Mars")
            .at(8.0, 0.0, 2.0)
            .color(0xCD5C5C)
            .scale(0.6)
            .describe("The red planet, colored by iron oxide dust across its surface."),
        ObjectDescriptor::new(Sphere, "Jupiter")
            .at(12.0, 0.0, -2.0)
            .color(0xD2691E)
            .scale(1.5)
            .describe("A gas giant more than twice as massive as all other planets combined."),
    ]
}

fn atomic() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Nucleus")
            .color(0xFF4444)
            .scale(1.0)
            .describe("Protons and neutrons packed together, holding almost all of the mass."),
        ObjectDescriptor::new(Sphere, "Electron 1")
            .at(2.0, 0.0, 0.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("A negatively charged particle in the innermost shell."),
        ObjectDescriptor::new(Sphere, "Electron 2")
            .at(-2.0, 0.0, 0.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("Shares the first shell, spinning opposite to its partner."),
        ObjectDescriptor::new(Sphere, "Electron 3")
            .at(0.0, 0.0, 3.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("Occupies the second shell, farther from the nucleus and easier to remove."),
    ]
}

fn anatomy() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Heart")
            .color(0xC0392B)
            .scale(1.2)
            .describe("A muscular pump that beats about 100,000 times a day."),
        ObjectDescriptor::new(Sphere, "Brain")
            .at(0.0, 3.0, 0.0)
            .color(0xF5B7B1)
            .scale(1.0)
            .describe("Coordinates every thought and movement through billions of neurons."),
        ObjectDescriptor::new(Box, "Lungs")
            .at(-1.8, 0.8, 0.0)
            .color(0xE59866)
            .scale_xyz(1.0, 1.6, 0.8)
            .describe("Exchange oxygen and carbon dioxide with the blood."),
        ObjectDescriptor::new(Helix, "Spinal Cord")
            .at(0.0, 0.0, -1.5)
            .color(0xF0E68C)
            .describe("Carries signals between the brain and the rest of the body."),
        ObjectDescriptor::new(Sphere, "Red Blood Cell")
            .at(2.5, 0.0, 1.0)
            .color(0xFF0000)
            .scale(0.3)
            .describe("Ferries oxygen using the iron-rich protein hemoglobin."),
    ]
}

fn geology() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Magma Chamber")
            .color(0xFF4500)
            .scale(1.2)
            .describe("Molten rock pooling beneath the crust, feeding eruptions above."),
        ObjectDescriptor::new(Box, "Mountain Peak")
            .at(-3.0, 0.5, -1.0)
            .color(0x8D6E63)
            .scale_xyz(2.0, 3.0, 2.0)
            .describe("Pushed upward where tectonic plates collide."),
        ObjectDescriptor::new(Sphere, "Granite Boulder")
            .at(3.0, 0.0, 2.0)
            .color(0x9E9E9E)
            .scale(0.7)
            .describe("An igneous rock that cooled slowly deep underground."),
        ObjectDescriptor::new(Box, "Bedrock Layer")
            .at(0.0, -2.0, 0.0)
            .color(0x5D4037)
            .scale_xyz(8.0, 0.8, 8.0)
            .describe("Solid rock under the soil, recording millions of years of history."),
    ]
}

fn botany() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(Sphere, "Chloroplast")
            .color(0x2ECC71)
            .scale(1.2)
            .describe("The organelle where light energy is captured by chlorophyll."),
        ObjectDescriptor::new(Sphere, "Sunlight")
            .at(0.0, 5.0, 0.0)
            .color(0xFFE066)
            .scale(1.0)
            .describe("The energy source that drives photosynthesis."),
        ObjectDescriptor::new(Sphere, "Water Molecule")
            .at(-3.0, -1.0, 1.0)
            .color(0x5DADE2)
            .scale(0.4)
            .describe("Drawn up from the roots and split to release oxygen."),
        ObjectDescriptor::new(Sphere, "Carbon Dioxide")
            .at(3.0, 1.0, -1.0)
            .color(0xBDC3C7)
            .scale(0.4)
            .describe("Taken in through the leaf's pores and built into sugar."),
        ObjectDescriptor::new(Box, "Leaf Blade")
            .at(0.0, -1.5, 0.0)
            .color(0x27AE60)
            .scale_xyz(4.0, 0.2, 2.0)
            .describe("A broad, flat surface that catches as much light as possible."),
        ObjectDescriptor::new(Helix, "Stem")
            .at(0.0, -3.0, 0.0)
            .color(0x6B8E23)
            .describe("Moves water up and sugars down through the plant."),
    ]
}

/// Name, shape, position, color and description pattern for the fallback.
/// `{}` in the pattern is replaced with the topic.
const CONCEPTS: [(&str, ShapeKind, [f32; 3], u32, f32, &str); 4] = [
    (
        "Core Idea",
        Sphere,
        [0.0, 0.0, 0.0],
        0x8B5CF6,
        1.2,
        "The central idea behind {}.",
    ),
    (
        "Key Principle",
        Box,
        [-3.0, 0.0, 0.0],
        0x6366F1,
        1.0,
        "A rule that shapes how {} works.",
    ),
    (
        "Real-World Example",
        Box,
        [3.0, 0.0, 0.0],
        0x06B6D4,
        1.0,
        "Where you can see {} in everyday life.",
    ),
    (
        "Connection",
        Sphere,
        [0.0, 2.5, -2.0],
        0xEC4899,
        0.7,
        "How {} links to other things you know.",
    ),
];

fn abstract_concept(topic: &str) -> Vec<ObjectDescriptor> {
    CONCEPTS
        .iter()
        .map(|(name, kind, [x, y, z], color, scale, pattern)| {
            ObjectDescriptor::new(*kind, *name)
                .at(*x, *y, *z)
                .color(*color)
                .scale(*scale)
                .describe(pattern.replace("{}", topic))
        })
        .collect()
}

/// Learning objectives for a world, trimmed to the complexity level.
pub fn learning_objectives(category: Category, topic: &str, complexity: Complexity) -> Vec<String> {
    let all: [String; 4] = match category {
        Category::Ocean => [
            "Name the main zones of the ocean".into(),
            "Describe how marine animals adapt to depth and pressure".into(),
            "Explain how reefs and kelp forests support food webs".into(),
            "Evaluate human impacts on marine ecosystems".into(),
        ],
        Category::Solar => [
            "Identify the Sun and the planets by order".into(),
            "Compare the sizes of rocky planets and gas giants".into(),
            "Explain how gravity keeps planets in orbit".into(),
            "Relate orbital distance to a planet's year and temperature".into(),
        ],
        Category::Atomic => [
            "Identify the nucleus and electrons of an atom".into(),
            "Describe how electrons are arranged in shells".into(),
            "Explain how outer electrons drive chemical bonding".into(),
            "Predict reactivity from electron configuration".into(),
        ],
        Category::Anatomy => [
            "Locate the major organs of the human body".into(),
            "Describe what the heart, lungs and brain each do".into(),
            "Explain how organ systems work together".into(),
            "Trace a signal from the brain through the spinal cord".into(),
        ],
        Category::Geology => [
            "Tell apart the layers beneath the ground".into(),
            "Describe how magma becomes igneous rock".into(),
            "Explain how colliding plates build mountains".into(),
            "Read geologic history from rock layers".into(),
        ],
        Category::Botany => [
            "Name what a plant needs to make food".into(),
            "Describe the role of chlorophyll in capturing light".into(),
            "Explain the inputs and outputs of photosynthesis".into(),
            "Connect photosynthesis to the oxygen in our atmosphere".into(),
        ],
        Category::AbstractConcept => [
            format!("Define {topic} in your own words"),
            format!("Identify the key principles of {topic}"),
            format!("Give a real-world example of {topic}"),
            format!("Connect {topic} to related ideas"),
        ],
    };
    all.into_iter().take(complexity.objective_count()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn authored_templates_have_three_to_six_objects() {
        for category in Category::ALL {
            let objects = scene_template(category, "Anything");
            assert!(
                (3..=6).contains(&objects.len()),
                "{category} has {} objects",
                objects.len()
            );
        }
    }

    #[test]
    fn central_body_comes_first_at_origin() {
        for category in Category::ALL {
            let objects = scene_template(category, "Topic");
            assert_eq!(objects[0].position, Vec3::ZERO, "{category}");
        }
    }

    #[test]
    fn fallback_has_four_objects_embedding_topic() {
        let topic = "Supply and Demand";
        let objects = scene_template(Category::AbstractConcept, topic);
        assert_eq!(objects.len(), 4);
        for obj in &objects {
            assert!(obj.description.contains(topic), "{}", obj.description);
        }
    }

    #[test]
    fn templates_are_stable() {
        assert_eq!(
            scene_template(Category::Geology, "a"),
            scene_template(Category::Geology, "b")
        );
    }

    #[test]
    fn solar_template_has_sun() {
        let objects = scene_template(Category::Solar, "");
        let sun = objects.iter().find(|o| o.name == "Sun").unwrap();
        assert_eq!(sun.kind, ShapeKind::Sphere);
        assert_eq!(sun.color.to_hex(), "#FFA500");
    }

    #[test]
    fn objective_count_follows_complexity() {
        for complexity in Complexity::ALL {
            let objectives = learning_objectives(Category::Atomic, "x", complexity);
            assert_eq!(objectives.len(), complexity.objective_count());
        }
    }

    #[test]
    fn fallback_objectives_mention_topic() {
        let objectives = learning_objectives(Category::AbstractConcept, "Jazz", Complexity::Advanced);
        assert!(objectives.iter().all(|o| o.contains("Jazz")));
    }
}

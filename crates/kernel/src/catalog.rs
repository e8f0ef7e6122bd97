use crate::object::{ObjectDescriptor, ShapeKind};
use crate::world::Complexity;
use serde::Serialize;
use std::fmt;

/// Difficulty badge shown on a prebuilt card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn complexity(&self) -> Complexity {
        match self {
            Self::Beginner => Complexity::Basic,
            Self::Intermediate => Complexity::Intermediate,
            Self::Advanced => Complexity::Advanced,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        })
    }
}

/// A ready-made world that bypasses generation.
#[derive(Debug, Clone, Serialize)]
pub struct PrebuiltCard {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub topic: &'static str,
    pub difficulty: Difficulty,
    #[serde(skip)]
    objects: fn() -> Vec<ObjectDescriptor>,
}

impl PrebuiltCard {
    pub fn objects(&self) -> Vec<ObjectDescriptor> {
        (self.objects)()
    }
}

static CATALOG: [PrebuiltCard; 3] = [
    PrebuiltCard {
        id: 1,
        title: "Solar System Tour",
        description: "Journey through planets, moons, and cosmic phenomena",
        topic: "Solar System",
        difficulty: Difficulty::Beginner,
        objects: solar_system_tour,
    },
    PrebuiltCard {
        id: 2,
        title: "Atomic Structure",
        description: "Explore electrons, protons, and quantum mechanics",
        topic: "Atomic Physics",
        difficulty: Difficulty::Intermediate,
        objects: atomic_structure,
    },
    PrebuiltCard {
        id: 3,
        title: "DNA Replication",
        description: "Watch the miracle of life unfold at molecular level",
        topic: "Molecular Biology",
        difficulty: Difficulty::Advanced,
        objects: dna_replication,
    },
];

/// All prebuilt cards, in display order.
pub fn catalog() -> &'static [PrebuiltCard] {
    &CATALOG
}

pub fn card(id: u32) -> Option<&'static PrebuiltCard> {
    CATALOG.iter().find(|c| c.id == id)
}

fn solar_system_tour() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(ShapeKind::Sphere, "Sun")
            .color(0xFFA500)
            .scale(2.0)
            .describe("Our star, holding every planet in its gravitational grip."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Earth")
            .at(5.0, 0.0, 0.0)
            .color(0x4A90E2)
            .scale(0.8)
            .describe("Home: a rocky world with liquid water oceans."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Mars")
            .at(8.0, 0.0, 2.0)
            .color(0xCD5C5C)
            .scale(0.6)
            .describe("A cold desert planet with the tallest volcano in the solar system."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Jupiter")
            .at(12.0, 0.0, -2.0)
            .color(0xD2691E)
            .scale(1.5)
            .describe("The largest planet, wrapped in storms like the Great Red Spot."),
    ]
}

fn atomic_structure() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(ShapeKind::Sphere, "Nucleus")
            .color(0xFF4444)
            .scale(1.0)
            .describe("Positively charged core of protons and neutrons."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Electron Shell 1")
            .at(2.0, 0.0, 0.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("The innermost shell, holding up to two electrons."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Electron Shell 2")
            .at(-2.0, 0.0, 0.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("The second shell, holding up to eight electrons."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Electron Shell 3")
            .at(0.0, 2.0, 0.0)
            .color(0x44FF44)
            .scale(0.3)
            .describe("An outer shell whose electrons take part in bonding."),
    ]
}

fn dna_replication() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new(ShapeKind::Helix, "DNA Strand A")
            .at(-1.0, 0.0, 0.0)
            .color(0x00FF00)
            .describe("The leading strand, copied continuously."),
        ObjectDescriptor::new(ShapeKind::Helix, "DNA Strand B")
            .at(1.0, 0.0, 0.0)
            .color(0x0088FF)
            .describe("The lagging strand, copied in short fragments."),
        ObjectDescriptor::new(ShapeKind::Sphere, "Enzyme")
            .at(0.0, 2.0, 0.0)
            .color(0xFF8800)
            .scale(0.8)
            .describe("DNA polymerase, adding matching bases to each strand."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_three_cards_with_unique_ids() {
        let ids: Vec<u32> = catalog().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn card_lookup() {
        assert_eq!(card(3).unwrap().title, "DNA Replication");
        assert!(card(99).is_none());
    }

    #[test]
    fn every_card_has_objects() {
        for card in catalog() {
            assert!(!card.objects().is_empty(), "{}", card.title);
        }
    }

    #[test]
    fn dna_card_uses_helices() {
        let objects = card(3).unwrap().objects();
        let helices = objects.iter().filter(|o| o.kind == ShapeKind::Helix).count();
        assert_eq!(helices, 2);
    }

    #[test]
    fn difficulty_maps_to_complexity() {
        assert_eq!(Difficulty::Beginner.complexity(), Complexity::Basic);
        assert_eq!(Difficulty::Advanced.complexity(), Complexity::Advanced);
    }
}

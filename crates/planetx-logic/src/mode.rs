//! Game mode catalog — objects, counts, conferences, theory sectors.
//!
//! Everything mode-specific lives in a [`ModeConfig`] table. The engine is
//! parameterized entirely by this table; nothing outside it hard-codes a
//! sector count or threshold. Two built-in tables exist (`standard` with 12
//! sectors and `expert` with 18), but a caller may construct its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of thing that can occupy a sector.
///
/// Variant order matches the hints-table row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    PlanetX,
    TrulyEmpty,
    GasCloud,
    DwarfPlanet,
    Asteroid,
    Comet,
}

impl ObjectType {
    pub const ALL: [ObjectType; 6] = [
        ObjectType::PlanetX,
        ObjectType::TrulyEmpty,
        ObjectType::GasCloud,
        ObjectType::DwarfPlanet,
        ObjectType::Asteroid,
        ObjectType::Comet,
    ];

    /// Stable kebab-case identifier, used in hint keys and score fields.
    pub fn key(self) -> &'static str {
        match self {
            ObjectType::PlanetX => "planet-x",
            ObjectType::TrulyEmpty => "truly-empty",
            ObjectType::GasCloud => "gas-cloud",
            ObjectType::DwarfPlanet => "dwarf-planet",
            ObjectType::Asteroid => "asteroid",
            ObjectType::Comet => "comet",
        }
    }

    pub fn from_key(key: &str) -> Option<ObjectType> {
        Self::ALL.into_iter().find(|object| object.key() == key)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Player pawn color. The order players pick colors at game start defines
/// seating and turn-priority order, so the session stores an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Blue,
    Purple,
    Red,
    Yellow,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Blue,
        PlayerColor::Purple,
        PlayerColor::Red,
        PlayerColor::Yellow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlayerColor::Blue => "Blue",
            PlayerColor::Purple => "Purple",
            PlayerColor::Red => "Red",
            PlayerColor::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Difficulty level chosen at game start. Determines how many starting
/// hints the official app deals out; the companion only records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Youth,
    Beginner,
    Experienced,
    Genius,
}

impl Difficulty {
    /// Number of starting hints dealt at this difficulty.
    pub fn start_hints(self) -> u32 {
        match self {
            Difficulty::Youth => 12,
            Difficulty::Beginner => 8,
            Difficulty::Experienced => 4,
            Difficulty::Genius => 0,
        }
    }
}

/// Per-object settings for a game mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub object: ObjectType,
    /// How many sectors truly hold this object.
    pub count: u32,
    /// Points per correct theory about this object (None = not scorable).
    pub points: Option<u32>,
    /// Display label, e.g. "Dwarf Planets".
    pub label: String,
    /// Placement rule text shown in the logic-rules table.
    pub rule: String,
}

/// A scheduled Planet X conference, triggered by cumulative time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub name: String,
    pub threshold: u32,
}

/// The full per-mode configuration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeConfig {
    pub name: String,
    pub objects: Vec<ObjectSpec>,
    /// Size of the wrapped time track. Equal to the sector count in both
    /// built-in modes, but a mode property of its own.
    pub track_size: u32,
    pub research_areas: Vec<String>,
    pub conferences: Vec<Conference>,
    pub theory_sectors: Vec<u32>,
}

impl ModeConfig {
    /// Number of sectors on the board: the sum of all object counts.
    /// Works out to 12 for standard mode and 18 for expert mode.
    pub fn num_sectors(&self) -> u32 {
        self.objects.iter().map(|spec| spec.count).sum()
    }

    pub fn track_size(&self) -> u32 {
        self.track_size
    }

    pub fn object_spec(&self, object: ObjectType) -> Option<&ObjectSpec> {
        self.objects.iter().find(|spec| spec.object == object)
    }

    /// Count limit for an object, or 0 if the mode doesn't use it.
    pub fn object_count(&self, object: ObjectType) -> u32 {
        self.object_spec(object).map(|spec| spec.count).unwrap_or(0)
    }

    pub fn object_points(&self, object: ObjectType) -> Option<u32> {
        self.object_spec(object).and_then(|spec| spec.points)
    }

    /// Look up a built-in mode by its serialized name.
    pub fn by_name(name: &str) -> Option<ModeConfig> {
        match name {
            "standard" => Some(ModeConfig::standard()),
            "expert" => Some(ModeConfig::expert()),
            _ => None,
        }
    }

    /// The standard 12-sector game.
    pub fn standard() -> ModeConfig {
        ModeConfig {
            name: "standard".to_string(),
            objects: vec![
                object_spec(ObjectType::PlanetX, 1, None, "Planet X",
                    "not adjacent to dwarf planets; appears empty"),
                object_spec(ObjectType::TrulyEmpty, 2, None, "Truly Empty Sectors",
                    "(remember: Planet X appears empty)"),
                object_spec(ObjectType::GasCloud, 2, Some(4), "Gas Clouds",
                    "adjacent to at least 1 truly empty sector"),
                object_spec(ObjectType::DwarfPlanet, 1, Some(4), "Dwarf Planet",
                    "not adjacent to Planet X"),
                object_spec(ObjectType::Asteroid, 4, Some(2), "Asteroids",
                    "adjacent to at least 1 other asteroid"),
                object_spec(ObjectType::Comet, 2, Some(3), "Comets",
                    "only in prime sectors (2, 3, 5, 7, 11)"),
            ],
            track_size: 12,
            research_areas: research_areas(),
            conferences: vec![Conference { name: "X1".to_string(), threshold: 12 }],
            theory_sectors: vec![3, 6, 9, 12],
        }
    }

    /// The expert 18-sector game.
    pub fn expert() -> ModeConfig {
        ModeConfig {
            name: "expert".to_string(),
            objects: vec![
                object_spec(ObjectType::PlanetX, 1, None, "Planet X",
                    "not adjacent to dwarf planets; appears empty"),
                object_spec(ObjectType::TrulyEmpty, 5, None, "Truly Empty Sectors",
                    "(remember: Planet X appears empty)"),
                object_spec(ObjectType::GasCloud, 2, Some(4), "Gas Clouds",
                    "adjacent to at least 1 truly empty sector"),
                object_spec(ObjectType::DwarfPlanet, 4, Some(2), "Dwarf Planets",
                    "in a band of 6; not adjacent to Planet X"),
                object_spec(ObjectType::Asteroid, 4, Some(2), "Asteroids",
                    "adjacent to at least 1 other asteroid"),
                object_spec(ObjectType::Comet, 2, Some(3), "Comets",
                    "only in prime sectors (2, 3, 5, 7, 11, 13, 17)"),
            ],
            track_size: 18,
            research_areas: research_areas(),
            conferences: vec![
                Conference { name: "X1".to_string(), threshold: 10 },
                Conference { name: "X2".to_string(), threshold: 22 },
            ],
            theory_sectors: vec![3, 6, 9, 12, 15, 18],
        }
    }
}

fn object_spec(
    object: ObjectType,
    count: u32,
    points: Option<u32>,
    label: &str,
    rule: &str,
) -> ObjectSpec {
    ObjectSpec {
        object,
        count,
        points,
        label: label.to_string(),
        rule: rule.to_string(),
    }
}

fn research_areas() -> Vec<String> {
    ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_has_12_sectors() {
        let mode = ModeConfig::standard();
        assert_eq!(mode.num_sectors(), 12);
        assert_eq!(mode.track_size(), 12);
    }

    #[test]
    fn expert_has_18_sectors() {
        let mode = ModeConfig::expert();
        assert_eq!(mode.num_sectors(), 18);
        assert_eq!(mode.theory_sectors, vec![3, 6, 9, 12, 15, 18]);
    }

    #[test]
    fn object_counts_standard() {
        let mode = ModeConfig::standard();
        assert_eq!(mode.object_count(ObjectType::Asteroid), 4);
        assert_eq!(mode.object_count(ObjectType::PlanetX), 1);
        assert_eq!(mode.object_points(ObjectType::Comet), Some(3));
        assert_eq!(mode.object_points(ObjectType::PlanetX), None);
    }

    #[test]
    fn by_name_round_trip() {
        assert_eq!(ModeConfig::by_name("standard").unwrap().name, "standard");
        assert_eq!(ModeConfig::by_name("expert").unwrap().name, "expert");
        assert!(ModeConfig::by_name("galactic").is_none());
    }

    #[test]
    fn object_keys_round_trip() {
        for object in ObjectType::ALL {
            assert_eq!(ObjectType::from_key(object.key()), Some(object));
        }
        assert_eq!(ObjectType::from_key("black-hole"), None);
    }

    #[test]
    fn difficulty_start_hints() {
        assert_eq!(Difficulty::Youth.start_hints(), 12);
        assert_eq!(Difficulty::Beginner.start_hints(), 8);
        assert_eq!(Difficulty::Experienced.start_hints(), 4);
        assert_eq!(Difficulty::Genius.start_hints(), 0);
    }
}

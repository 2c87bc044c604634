use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct NodeId;
}

/// Built-in node categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Ordinary,
    MinorEncounter,
    Boss,
    Treasure,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] =
        [NodeKind::Ordinary, NodeKind::MinorEncounter, NodeKind::Boss, NodeKind::Treasure];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::MinorEncounter => "minor_encounter",
            Self::Boss => "boss",
            Self::Treasure => "treasure",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Category of a node: one of the built-ins or a content-defined identifier.
///
/// Serialized as a plain string. Built-in names always resolve to
/// [`Category::Builtin`], so a custom category cannot shadow them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Builtin(NodeKind),
    Custom(String),
}

impl Category {
    pub const ORDINARY: Category = Category::Builtin(NodeKind::Ordinary);
    pub const MINOR_ENCOUNTER: Category = Category::Builtin(NodeKind::MinorEncounter);
    pub const BOSS: Category = Category::Builtin(NodeKind::Boss);
    pub const TREASURE: Category = Category::Builtin(NodeKind::Treasure);

    pub fn custom(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, Self::Builtin(NodeKind::Boss))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(kind) => kind.as_str(),
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        match NodeKind::from_name(&name) {
            Some(kind) => Self::Builtin(kind),
            None => Self::Custom(name),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Builtin(kind) => kind.as_str().to_string(),
            Category::Custom(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slot coordinates in the generation grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub floor: usize,
    pub column: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / length, self.y / length)
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

mod filter;
mod parse;
mod source;

use std::fmt;

use serde::Serialize;

pub use filter::filter_records;
pub use source::{JsonFileSource, RecordSource, SourceError};

/// Relationships lighter than this are treated as noise.
pub const MIN_WEIGHT: f64 = 2.0;

/// Relationship categories the palette knows about. Anything else is kept as
/// `Other` so the pipeline never rejects a tag it has not seen before.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Interacts1,
    Interacts2,
    Interacts3,
    Interacts45,
    Other(String),
}

impl RelationKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "INTERACTS1" => Self::Interacts1,
            "INTERACTS2" => Self::Interacts2,
            "INTERACTS3" => Self::Interacts3,
            "INTERACTS45" => Self::Interacts45,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Interacts1 => "INTERACTS1",
            Self::Interacts2 => "INTERACTS2",
            Self::Interacts3 => "INTERACTS3",
            Self::Interacts45 => "INTERACTS45",
            Self::Other(tag) => tag,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Interacts1 => Color::Purple,
            Self::Interacts2 => Color::Red,
            Self::Interacts3 => Color::Green,
            Self::Interacts45 => Color::Blue,
            Self::Other(_) => Color::Gray,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge display color. `Gray` is the fallback for unknown relation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Purple,
    Red,
    Green,
    Blue,
    Gray,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Gray => "gray",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Purple => [128, 0, 128],
            Self::Red => [255, 0, 0],
            Self::Green => [0, 128, 0],
            Self::Blue => [0, 0, 255],
            Self::Gray => [128, 128, 128],
        }
    }
}

/// `weight` is `None` when the column was missing or not a finite number.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationRecord {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
    pub weight: Option<f64>,
}

#[cfg(test)]
impl RelationRecord {
    pub fn new(source: &str, target: &str, relation: &str, weight: f64) -> Self {
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
            relation: RelationKind::parse(relation),
            weight: Some(weight),
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    Digital,
    Paint,
    NonInkDrawing,
    Ink,
    Sculpture,
    MixedMedium,
    Other,
}

impl Medium {
    /// Categories that carry a wordlist, in matching order. `Other` is the
    /// fallback label and never a collection bucket.
    pub const CATEGORIES: [Medium; 6] = [
        Medium::Digital,
        Medium::Paint,
        Medium::NonInkDrawing,
        Medium::Ink,
        Medium::Sculpture,
        Medium::MixedMedium,
    ];

    pub const NON_DIGITAL_SUBCLASSES: [Medium; 4] = [
        Medium::Ink,
        Medium::NonInkDrawing,
        Medium::Paint,
        Medium::Sculpture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Digital => "digital",
            Medium::Paint => "paint",
            Medium::NonInkDrawing => "non_ink_drawing",
            Medium::Ink => "ink",
            Medium::Sculpture => "sculpture",
            Medium::MixedMedium => "mixed_medium",
            Medium::Other => "other",
        }
    }

    pub fn binary_class(&self) -> BinaryClass {
        match self {
            Medium::Digital => BinaryClass::Digital,
            _ => BinaryClass::NonDigital,
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryClass {
    Digital,
    NonDigital,
}

impl BinaryClass {
    pub const ALL: [BinaryClass; 2] = [BinaryClass::Digital, BinaryClass::NonDigital];

    pub fn dir_name(&self) -> &'static str {
        match self {
            BinaryClass::Digital => "digital",
            BinaryClass::NonDigital => "non_digital",
        }
    }
}

impl fmt::Display for BinaryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];
    pub const FILL_ORDER: [Split; 3] = [Split::Train, Split::Test, Split::Val];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

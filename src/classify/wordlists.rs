use crate::domain::Medium;

/// A literal keyword, optionally vetoed when immediately followed by a suffix
/// (`pen` must not match inside `pencil`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub text: &'static str,
    pub not_followed_by: Option<&'static str>,
}

impl Keyword {
    const fn plain(text: &'static str) -> Self {
        Self {
            text,
            not_followed_by: None,
        }
    }

    const fn unless_followed_by(text: &'static str, suffix: &'static str) -> Self {
        Self {
            text,
            not_followed_by: Some(suffix),
        }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        haystack.match_indices(self.text).any(|(start, _)| {
            match self.not_followed_by {
                None => true,
                Some(suffix) => !haystack[start + self.text.len()..].starts_with(suffix),
            }
        })
    }
}

const DIGITAL: &[Keyword] = &[
    Keyword::plain("digital"),
    Keyword::plain("adobe"),
    Keyword::plain("photoshop"),
    Keyword::plain("procreate"),
    Keyword::plain("wacom"),
    Keyword::plain("tablet"),
    Keyword::plain("illustrator"),
    Keyword::plain("3d"),
    Keyword::plain("vector"),
];

const PAINT: &[Keyword] = &[
    Keyword::plain("acrylic"),
    Keyword::plain("oil"),
    Keyword::plain("watercolor"),
    Keyword::plain("water color"),
    Keyword::plain("watercolour"),
    Keyword::plain("water colour"),
];

const NON_INK_DRAWING: &[Keyword] = &[
    Keyword::plain("pencil"),
    Keyword::plain("colored pencil"),
    Keyword::plain("coloredpencil"),
    Keyword::plain("color pencil"),
    Keyword::plain("colorpencil"),
    Keyword::plain("colour pencil"),
    Keyword::plain("colourpencil"),
    Keyword::plain("coloured pencil"),
    Keyword::plain("colouredpencil"),
    Keyword::plain("graphite"),
    Keyword::plain("charcoal"),
    Keyword::plain("chalk"),
];

const INK: &[Keyword] = &[
    Keyword::unless_followed_by("pen", "cil"),
    Keyword::plain("marker"),
    Keyword::plain("ink"),
];

const SCULPTURE: &[Keyword] = &[
    Keyword::plain("clay"),
    Keyword::plain("string"),
    Keyword::plain("sculpture"),
    Keyword::plain("wire"),
    Keyword::plain("nail"),
    Keyword::plain("glass"),
    Keyword::plain("yarn"),
    Keyword::plain("metal"),
    Keyword::plain("copper"),
];

pub fn wordlist(medium: Medium) -> &'static [Keyword] {
    match medium {
        Medium::Digital => DIGITAL,
        Medium::Paint => PAINT,
        Medium::NonInkDrawing => NON_INK_DRAWING,
        Medium::Ink => INK,
        Medium::Sculpture => SCULPTURE,
        Medium::MixedMedium | Medium::Other => &[],
    }
}

pub fn corpus() -> impl Iterator<Item = &'static Keyword> {
    Medium::CATEGORIES
        .into_iter()
        .flat_map(|medium| wordlist(medium).iter())
}

use thiserror::Error;

use crate::domain::Medium;

use super::wordlists::wordlist;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("title has {0} comma-separated parts; a medium field needs at least 3")]
    TooFewParts(usize),
}

pub fn title_parts(title: &str) -> Vec<String> {
    title.to_lowercase().split(',').map(str::to_string).collect()
}

/// Returns the medium field of a title: the third comma-separated part, or
/// the second when the third is just "me" (titles like "name, medium, me, size"
/// swap the order).
pub fn medium_field(title: &str) -> Result<String, TitleError> {
    medium_field_from_parts(&title_parts(title))
}

pub(crate) fn medium_field_from_parts(parts: &[String]) -> Result<String, TitleError> {
    if parts.len() < 3 {
        return Err(TitleError::TooFewParts(parts.len()));
    }
    let field = parts[2].trim();
    if field == "me" {
        Ok(parts[1].trim().to_string())
    } else {
        Ok(field.to_string())
    }
}

/// Classifies a medium field. Each category counts once; several matching
/// categories make the post `MixedMedium`, none make it `Other`.
pub fn classify_medium(field: &str) -> Medium {
    let mut matched = Medium::CATEGORIES
        .into_iter()
        .filter(|medium| wordlist(*medium).iter().any(|kw| kw.matches(field)));

    match (matched.next(), matched.next()) {
        (None, _) => Medium::Other,
        (Some(medium), None) => medium,
        (Some(_), Some(_)) => Medium::MixedMedium,
    }
}

pub fn extract_medium_from_title(title: &str) -> Medium {
    match medium_field(title) {
        Ok(field) => classify_medium(&field),
        Err(_) => Medium::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_field_uses_third_part() {
        assert_eq!(
            medium_field("Sunset, Me, Oil on Canvas, 2020").unwrap(),
            "oil on canvas"
        );
    }

    #[test]
    fn medium_field_falls_back_when_third_part_is_me() {
        assert_eq!(
            medium_field("Sunset, Procreate, me, 2020").unwrap(),
            "procreate"
        );
    }

    #[test]
    fn medium_field_requires_three_parts() {
        assert_eq!(medium_field("just a title"), Err(TitleError::TooFewParts(1)));
    }

    #[test]
    fn single_category_titles() {
        assert_eq!(
            extract_medium_from_title("Dragon, me, Digital, 2021"),
            Medium::Digital
        );
        assert_eq!(
            extract_medium_from_title("Study, me, Watercolour on paper, 2021"),
            Medium::Paint
        );
        assert_eq!(
            extract_medium_from_title("Portrait, me, graphite, 2021"),
            Medium::NonInkDrawing
        );
        assert_eq!(
            extract_medium_from_title("Portrait, me, colored pencil, 2021"),
            Medium::NonInkDrawing
        );
        assert_eq!(
            extract_medium_from_title("Cat, me, ballpoint pen, 2021"),
            Medium::Ink
        );
        assert_eq!(
            extract_medium_from_title("Vase, me, clay, 2021"),
            Medium::Sculpture
        );
    }

    #[test]
    fn multiple_categories_are_mixed_medium() {
        assert_eq!(
            extract_medium_from_title("Forest, me, ink and watercolor, 2021"),
            Medium::MixedMedium
        );
    }

    #[test]
    fn several_keywords_of_one_category_stay_single() {
        assert_eq!(
            extract_medium_from_title("Face, me, photoshop with wacom tablet, 2021"),
            Medium::Digital
        );
    }

    #[test]
    fn unmatched_or_malformed_titles_are_other() {
        assert_eq!(
            extract_medium_from_title("Thing, me, mystery, 2021"),
            Medium::Other
        );
        assert_eq!(extract_medium_from_title("no commas"), Medium::Other);
    }
}

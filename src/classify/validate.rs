use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Submission;

use super::{
    title::{medium_field_from_parts, title_parts},
    wordlists::corpus,
};

static LINK_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://i\.redd\.it/.{13}\.(jpg|png)").expect("valid image link regex")
});

const REMOVED_MARKERS: [&str; 2] = ["[deleted]", "[removed]"];
const TITLE_PARTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    Removed,
    LowUpvoteRatio(f64),
    TitleFormat(usize),
    LinkFormat,
    NoMediumKeyword,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Removed => f.write_str("post was deleted or removed"),
            Rejection::LowUpvoteRatio(ratio) => write!(f, "upvote ratio {ratio:.2} too low"),
            Rejection::TitleFormat(parts) => write!(f, "title has {parts} parts"),
            Rejection::LinkFormat => f.write_str("url is not a direct image link"),
            Rejection::NoMediumKeyword => f.write_str("medium field has no known keyword"),
        }
    }
}

pub fn validate_submission(post: &Submission, min_upvote_ratio: f64) -> Result<(), Rejection> {
    if REMOVED_MARKERS.contains(&post.selftext.as_str()) {
        return Err(Rejection::Removed);
    }
    if post.upvote_ratio < min_upvote_ratio {
        return Err(Rejection::LowUpvoteRatio(post.upvote_ratio));
    }

    let parts = title_parts(&post.title);
    if parts.len() != TITLE_PARTS {
        return Err(Rejection::TitleFormat(parts.len()));
    }
    if !is_image_link(&post.url) {
        return Err(Rejection::LinkFormat);
    }

    let field = medium_field_from_parts(&parts).map_err(|_| Rejection::TitleFormat(parts.len()))?;
    if corpus().any(|keyword| keyword.matches(&field)) {
        Ok(())
    } else {
        Err(Rejection::NoMediumKeyword)
    }
}

pub fn is_image_link(url: &str) -> bool {
    LINK_FORMAT.is_match(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, url: &str) -> Submission {
        Submission {
            id: "abc123".into(),
            title: title.into(),
            url: url.into(),
            created_utc: 1_600_000_000,
            selftext: String::new(),
            upvote_ratio: 0.9,
            score: None,
        }
    }

    const GOOD_URL: &str = "https://i.redd.it/abcdefghijklm.jpg";

    #[test]
    fn accepts_well_formed_post() {
        assert_eq!(
            validate_submission(&post("Owl, me, acrylic, 2020", GOOD_URL), 0.4),
            Ok(())
        );
    }

    #[test]
    fn rejects_removed_posts() {
        let mut p = post("Owl, me, acrylic, 2020", GOOD_URL);
        p.selftext = "[removed]".into();
        assert_eq!(validate_submission(&p, 0.4), Err(Rejection::Removed));
    }

    #[test]
    fn rejects_low_ratio() {
        let mut p = post("Owl, me, acrylic, 2020", GOOD_URL);
        p.upvote_ratio = 0.39;
        assert_eq!(
            validate_submission(&p, 0.4),
            Err(Rejection::LowUpvoteRatio(0.39))
        );
        p.upvote_ratio = 0.4;
        assert_eq!(validate_submission(&p, 0.4), Ok(()));
    }

    #[test]
    fn rejects_titles_without_four_parts() {
        assert_eq!(
            validate_submission(&post("Owl, me, acrylic", GOOD_URL), 0.4),
            Err(Rejection::TitleFormat(3))
        );
        assert_eq!(
            validate_submission(&post("Owl, me, acrylic, 2020, extra", GOOD_URL), 0.4),
            Err(Rejection::TitleFormat(5))
        );
    }

    #[test]
    fn rejects_non_image_links() {
        for url in [
            "https://imgur.com/abcdefghijklm.jpg",
            "https://i.redd.it/short.jpg",
            "https://i.redd.it/abcdefghijklm.gif",
            "see https://i.redd.it/abcdefghijklm.jpg",
        ] {
            assert_eq!(
                validate_submission(&post("Owl, me, acrylic, 2020", url), 0.4),
                Err(Rejection::LinkFormat),
                "{url}"
            );
        }
        assert!(is_image_link("https://i.redd.it/abcdefghijklm.png"));
    }

    #[test]
    fn rejects_unknown_media() {
        assert_eq!(
            validate_submission(&post("Owl, me, mystery, 2020", GOOD_URL), 0.4),
            Err(Rejection::NoMediumKeyword)
        );
    }
}

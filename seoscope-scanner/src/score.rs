// Heuristic page health score: 100 minus fixed penalties, never below zero.

use crate::report::{Headings, ImageAudit, MetaTags};

pub const MAX_SCORE: u8 = 100;
pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 60;

const MISSING_TITLE_PENALTY: u32 = 20;
const TITLE_LENGTH_PENALTY: u32 = 5;
const MISSING_DESCRIPTION_PENALTY: u32 = 20;
const MISSING_H1_PENALTY: u32 = 15;
const MISSING_ALT_PENALTY_EACH: u32 = 2;
const MISSING_ALT_PENALTY_CAP: u32 = 10;

pub fn compute_score(meta: &MetaTags, headings: &Headings, images: &ImageAudit) -> u8 {
    let mut penalty = 0u32;

    match meta.title.as_deref() {
        None => penalty += MISSING_TITLE_PENALTY,
        Some(title) => {
            let length = title.chars().count();
            if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&length) {
                penalty += TITLE_LENGTH_PENALTY;
            }
        }
    }

    if meta.description.is_none() {
        penalty += MISSING_DESCRIPTION_PENALTY;
    }

    if headings.h1.is_empty() {
        penalty += MISSING_H1_PENALTY;
    }

    let missing_alt = u32::try_from(images.without_alt).unwrap_or(u32::MAX);
    penalty += missing_alt
        .saturating_mul(MISSING_ALT_PENALTY_EACH)
        .min(MISSING_ALT_PENALTY_CAP);

    u32::from(MAX_SCORE).saturating_sub(penalty) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: Option<&str>, description: Option<&str>) -> MetaTags {
        MetaTags {
            title: title.map(String::from),
            description: description.map(String::from),
            ..MetaTags::default()
        }
    }

    fn headings_with_h1() -> Headings {
        Headings {
            h1: vec!["Welcome".to_string()],
            ..Headings::default()
        }
    }

    fn images_missing_alt(count: usize) -> ImageAudit {
        ImageAudit {
            total: count,
            with_alt: 0,
            without_alt: count,
            samples: Vec::new(),
        }
    }

    #[test]
    fn test_perfect_page() {
        let score = compute_score(
            &meta(Some("A descriptive page title"), Some("desc")),
            &headings_with_h1(),
            &ImageAudit::default(),
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_missing_title_outranks_length_penalty() {
        let score = compute_score(
            &meta(None, Some("desc")),
            &headings_with_h1(),
            &ImageAudit::default(),
        );
        assert_eq!(score, 80);
    }

    #[test]
    fn test_title_length_bounds() {
        let h = headings_with_h1();
        let none = ImageAudit::default();

        assert_eq!(compute_score(&meta(Some("Hi"), Some("d")), &h, &none), 95);
        assert_eq!(compute_score(&meta(Some(&"x".repeat(61)), Some("d")), &h, &none), 95);
        assert_eq!(compute_score(&meta(Some(&"x".repeat(60)), Some("d")), &h, &none), 100);
        assert_eq!(compute_score(&meta(Some(&"x".repeat(10)), Some("d")), &h, &none), 100);
        assert_eq!(compute_score(&meta(Some(&"x".repeat(9)), Some("d")), &h, &none), 95);
    }

    #[test]
    fn test_title_length_counts_characters() {
        // 10 characters, 20 bytes
        let title = "éééééééééé";
        let score = compute_score(
            &meta(Some(title), Some("d")),
            &headings_with_h1(),
            &ImageAudit::default(),
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_missing_alt_penalty_is_capped() {
        let m = meta(Some("A descriptive page title"), Some("d"));
        let h = headings_with_h1();

        assert_eq!(compute_score(&m, &h, &images_missing_alt(2)), 96);
        assert_eq!(compute_score(&m, &h, &images_missing_alt(5)), 90);
        assert_eq!(compute_score(&m, &h, &images_missing_alt(500)), 90);
    }

    #[test]
    fn test_everything_missing() {
        let score = compute_score(&meta(None, None), &Headings::default(), &images_missing_alt(50));
        assert_eq!(score, 100 - 20 - 20 - 15 - 10);
    }
}

//! First-seen-wins deduplication by content digest.

use std::collections::HashSet;

use crate::types::RawImage;

/// Result of a dedup pass.
#[derive(Debug)]
pub struct Deduplicated {
    /// Unique images in original encounter order
    pub unique: Vec<RawImage>,
    /// Number of images dropped as duplicates
    pub skipped: usize,
}

/// Drops every image whose digest was already seen earlier in the sequence.
pub struct Deduplicator;

impl Deduplicator {
    /// Single pass over `images`; order of the survivors is preserved.
    pub fn dedupe(images: Vec<RawImage>) -> Deduplicated {
        let total = images.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<RawImage> = images
            .into_iter()
            .filter(|image| seen.insert(image.digest()))
            .collect();

        let skipped = total - unique.len();
        if skipped > 0 {
            tracing::info!("Skipped {} duplicate image(s)", skipped);
        }
        Deduplicated { unique, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractedImage;

    fn raw(name: &str, bytes: &[u8]) -> RawImage {
        RawImage::load(ExtractedImage::new(name, bytes.to_vec()))
    }

    fn names(images: &[RawImage]) -> Vec<&str> {
        images.iter().map(|i| i.source_name()).collect()
    }

    #[test]
    fn test_distinct_images_all_survive() {
        let images = vec![raw("a", b"1"), raw("b", b"2"), raw("c", b"3")];
        let result = Deduplicator::dedupe(images);
        assert_eq!(result.skipped, 0);
        assert_eq!(names(&result.unique), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_identical_images_collapse_to_first() {
        let images: Vec<RawImage> = (0..6).map(|i| raw(&format!("img{i}"), b"same")).collect();
        let result = Deduplicator::dedupe(images);
        assert_eq!(result.unique.len(), 1);
        assert_eq!(result.skipped, 5);
        assert_eq!(result.unique[0].source_name(), "img0");
    }

    #[test]
    fn test_first_occurrence_order_is_kept() {
        // positions 2 and 4 repeat position 0
        let images = vec![
            raw("p0", b"alpha"),
            raw("p1", b"beta"),
            raw("p2", b"alpha"),
            raw("p3", b"gamma"),
            raw("p4", b"alpha"),
        ];
        let result = Deduplicator::dedupe(images);
        assert_eq!(result.skipped, 2);
        assert_eq!(names(&result.unique), vec!["p0", "p1", "p3"]);
    }

    #[test]
    fn test_name_does_not_matter() {
        let images = vec![raw("x.png", b"pix"), raw("y.jpg", b"pix")];
        let result = Deduplicator::dedupe(images);
        assert_eq!(names(&result.unique), vec!["x.png"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let images = vec![
            raw("a", b"1"),
            raw("b", b"1"),
            raw("c", b"2"),
            raw("d", b"3"),
            raw("e", b"2"),
        ];
        let once = Deduplicator::dedupe(images);
        let first_names: Vec<String> = once
            .unique
            .iter()
            .map(|i| i.source_name().to_string())
            .collect();

        let twice = Deduplicator::dedupe(once.unique);
        assert_eq!(twice.skipped, 0);
        assert_eq!(names(&twice.unique), first_names);
    }

    #[test]
    fn test_empty_input() {
        let result = Deduplicator::dedupe(Vec::new());
        assert!(result.unique.is_empty());
        assert_eq!(result.skipped, 0);
    }
}

//! In-memory cache of generated stage renders.

use crate::payload::ImagePayload;
use crate::stage::Stage;

/// A model-produced render for one stage of the current base image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Stage the render depicts.
    pub stage: Stage,
    /// The rendered image.
    pub url: ImagePayload,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Generated renders in the order they were produced.
///
/// Holds at most one entry per stage. The catalog is tiny, so lookups
/// scan the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<GeneratedImage>,
}

impl Gallery {
    /// Create an empty gallery.
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// The render for `stage`, if one has been generated.
    #[must_use]
    pub fn get(&self, stage: Stage) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.stage == stage)
    }

    /// Whether `stage` already has a render.
    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.get(stage).is_some()
    }

    /// Append a render.
    ///
    /// The first render for a stage wins: if `image.stage` is already
    /// present the gallery is left unchanged and the rejected image is
    /// handed back.
    ///
    /// # Errors
    ///
    /// Returns the rejected image when its stage is already cached.
    pub fn insert(&mut self, image: GeneratedImage) -> Result<(), GeneratedImage> {
        if self.contains(image.stage) {
            return Err(image);
        }
        self.images.push(image);
        Ok(())
    }

    /// Drop every render.
    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Number of cached renders.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` if no render has been cached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterate renders in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedImage> {
        self.images.iter()
    }
}

impl<'a> IntoIterator for &'a Gallery {
    type Item = &'a GeneratedImage;
    type IntoIter = std::slice::Iter<'a, GeneratedImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(stage: Stage, byte: u8, timestamp: u64) -> GeneratedImage {
        GeneratedImage {
            stage,
            url: ImagePayload::from_bytes("image/png", &[byte; 4]).unwrap(),
            timestamp,
        }
    }

    #[test]
    fn keeps_generation_order() {
        let mut gallery = Gallery::new();
        gallery.insert(render(Stage::Finishing, 1, 10)).unwrap();
        gallery.insert(render(Stage::Foundation, 2, 20)).unwrap();

        let order: Vec<Stage> = gallery.iter().map(|image| image.stage).collect();
        assert_eq!(order, vec![Stage::Finishing, Stage::Foundation]);
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn first_render_for_a_stage_wins() {
        let mut gallery = Gallery::new();
        let first = render(Stage::Masonry, 1, 10);
        gallery.insert(first.clone()).unwrap();

        let second = render(Stage::Masonry, 2, 20);
        let rejected = gallery.insert(second.clone()).unwrap_err();
        assert_eq!(rejected, second);
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.get(Stage::Masonry), Some(&first));
    }

    #[test]
    fn clear_empties() {
        let mut gallery = Gallery::new();
        gallery.insert(render(Stage::Completed, 1, 10)).unwrap();
        gallery.clear();
        assert!(gallery.is_empty());
        assert!(!gallery.contains(Stage::Completed));
    }
}

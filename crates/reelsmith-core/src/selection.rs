//! Ordered, capped set of images picked for a run.

use tokio::sync::watch;

use crate::models::UploadedImage;

pub const DEFAULT_MAX_IMAGES: usize = 10;

/// Images picked by the user, in pick order, capped at `max_images`.
///
/// Every change is published on a watch channel so a front end can react to
/// "images changed" without polling.
#[derive(Debug)]
pub struct ImageSelection {
    max_images: usize,
    images: Vec<UploadedImage>,
    changes: watch::Sender<Vec<UploadedImage>>,
}

impl ImageSelection {
    pub fn new(max_images: usize) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            max_images,
            images: Vec::new(),
            changes,
        }
    }

    /// Append images up to the remaining capacity. Returns how many were kept.
    pub fn add(&mut self, images: Vec<UploadedImage>) -> usize {
        let offered = images.len();
        let kept: Vec<UploadedImage> = images.into_iter().take(self.remaining_slots()).collect();
        let added = kept.len();
        if added < offered {
            tracing::warn!(
                offered,
                added,
                max_images = self.max_images,
                "Image selection is full, dropping extra images"
            );
        }
        if added > 0 {
            self.images.extend(kept);
            self.publish();
        }
        added
    }

    pub fn remove(&mut self, index: usize) -> Option<UploadedImage> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        self.publish();
        Some(removed)
    }

    pub fn clear(&mut self) {
        if !self.images.is_empty() {
            self.images.clear();
            self.publish();
        }
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn remaining_slots(&self) -> usize {
        self.max_images.saturating_sub(self.images.len())
    }

    /// Receiver that observes the selection after every change
    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadedImage>> {
        self.changes.subscribe()
    }

    pub fn into_images(self) -> Vec<UploadedImage> {
        self.images
    }

    fn publish(&self) {
        self.changes.send_replace(self.images.clone());
    }
}

impl Default for ImageSelection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageCodec;
    use bytes::Bytes;

    fn image(name: &str) -> UploadedImage {
        ImageCodec::encode(name, Bytes::from(name.as_bytes().to_vec()), "image/png")
    }

    fn images(count: usize) -> Vec<UploadedImage> {
        (0..count).map(|i| image(&format!("shot-{}.png", i))).collect()
    }

    #[test]
    fn test_add_caps_at_max() {
        let mut selection = ImageSelection::default();
        assert_eq!(selection.add(images(7)), 7);
        assert_eq!(selection.add(images(7)), 3);
        assert_eq!(selection.len(), DEFAULT_MAX_IMAGES);
        assert_eq!(selection.remaining_slots(), 0);
        assert_eq!(selection.add(images(1)), 0);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut selection = ImageSelection::new(5);
        selection.add(images(3));
        let removed = selection.remove(1).unwrap();
        assert_eq!(removed.name, "shot-1.png");
        let names: Vec<&str> = selection.images().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["shot-0.png", "shot-2.png"]);
        assert!(selection.remove(5).is_none());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut selection = ImageSelection::new(4);
        let mut rx = selection.subscribe();
        assert!(!rx.has_changed().unwrap());

        selection.add(images(2));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);

        selection.clear();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear_on_empty_does_not_notify() {
        let mut selection = ImageSelection::new(2);
        let rx = selection.subscribe();
        selection.clear();
        assert!(!rx.has_changed().unwrap());
    }
}

/// In-memory image cache
///
/// Decoded-handle cache keyed by wallpaper id and resolution tier, with an
/// in-flight set so the same image is never requested twice concurrently.
/// Prefetched pairs are warmed at the medium tier; the rank screen upgrades
/// to full once those bytes arrive, and the review grid uses small.

use std::collections::{HashMap, HashSet};

use iced::widget::image;

use super::data::ImageSize;

#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<(i64, ImageSize), image::Handle>,
    loading: HashSet<(i64, ImageSize)>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to fetch an image. False when the bytes are already
    /// cached or a fetch for this id/tier is outstanding.
    pub fn begin_fetch(&mut self, id: i64, size: ImageSize) -> bool {
        let key = (id, size);
        if self.handles.contains_key(&key) || self.loading.contains(&key) {
            return false;
        }
        self.loading.insert(key);
        true
    }

    /// Store fetched bytes as a renderable handle
    pub fn insert(&mut self, id: i64, size: ImageSize, bytes: Vec<u8>) {
        let key = (id, size);
        self.loading.remove(&key);
        self.handles.insert(key, image::Handle::from_bytes(bytes));
    }

    /// Drop the in-flight mark after a failed fetch so a later view can retry
    pub fn fail(&mut self, id: i64, size: ImageSize) {
        self.loading.remove(&(id, size));
    }

    pub fn get(&self, id: i64, size: ImageSize) -> Option<&image::Handle> {
        self.handles.get(&(id, size))
    }

    /// Best available handle for an id, preferring higher resolution tiers
    pub fn best(&self, id: i64) -> Option<&image::Handle> {
        self.best_tier(id)
            .and_then(|size| self.handles.get(&(id, size)))
    }

    fn best_tier(&self, id: i64) -> Option<ImageSize> {
        [ImageSize::Full, ImageSize::Medium, ImageSize::Small]
            .into_iter()
            .find(|size| self.handles.contains_key(&(id, *size)))
    }

    /// Evict handles for ids that are no longer on screen. In-flight fetches
    /// are left alone; a stale completion is simply evicted next time.
    pub fn retain_ids(&mut self, keep: &HashSet<i64>) {
        self.handles.retain(|(id, _), _| keep.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_fetch_dedupes_in_flight() {
        let mut cache = ImageCache::new();
        assert!(cache.begin_fetch(7, ImageSize::Medium));
        assert!(!cache.begin_fetch(7, ImageSize::Medium));
        // A different tier is a different fetch
        assert!(cache.begin_fetch(7, ImageSize::Full));
    }

    #[test]
    fn test_failed_fetch_is_retryable() {
        let mut cache = ImageCache::new();
        assert!(cache.begin_fetch(7, ImageSize::Small));
        cache.fail(7, ImageSize::Small);
        assert!(cache.begin_fetch(7, ImageSize::Small));
    }

    #[test]
    fn test_best_prefers_full_over_medium() {
        let mut cache = ImageCache::new();
        assert!(cache.best(7).is_none());

        cache.insert(7, ImageSize::Medium, vec![1, 2, 3]);
        assert_eq!(cache.best_tier(7), Some(ImageSize::Medium));

        cache.insert(7, ImageSize::Full, vec![4, 5, 6]);
        assert_eq!(cache.best_tier(7), Some(ImageSize::Full));
    }

    #[test]
    fn test_retain_evicts_offscreen_ids() {
        let mut cache = ImageCache::new();
        cache.insert(5, ImageSize::Full, vec![1]);
        cache.insert(9, ImageSize::Full, vec![2]);

        let keep = HashSet::from([5]);
        cache.retain_ids(&keep);

        assert!(cache.get(5, ImageSize::Full).is_some());
        assert!(cache.get(9, ImageSize::Full).is_none());
    }
}

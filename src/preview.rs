//! Revocable preview handles for selected media
//!
//! Mirrors the browser object-URL pattern: a preview is acquired when media is
//! selected and must be released exactly once when superseded or discarded.
//! Handles are consumed by value on release, so a stale handle cannot be
//! revoked twice.

use std::collections::HashMap;

use crate::media::MediaFile;

/// Opaque reference to an acquired preview resource
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: u64,
}

impl PreviewHandle {
    pub(crate) fn new(id: u64) -> Self {
        PreviewHandle { id }
    }
}

/// Issues and revokes preview resources. Injected into the composer so tests
/// can count acquire/release pairs.
pub trait PreviewRegistry: Send {
    fn acquire(&mut self, file: &MediaFile) -> PreviewHandle;
    fn release(&mut self, handle: PreviewHandle);

    /// Human-readable description of a live preview, for rendering
    fn describe(&self, handle: &PreviewHandle) -> Option<String>;
}

/// Entry kept for a live preview
#[derive(Debug)]
struct PreviewEntry {
    file_name: String,
    mime: String,
    size: u64,
}

/// Default registry keeping preview metadata in memory
#[derive(Debug, Default)]
pub struct InMemoryPreviews {
    next_id: u64,
    live: HashMap<u64, PreviewEntry>,
}

impl InMemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of previews currently held
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl PreviewRegistry for InMemoryPreviews {
    fn acquire(&mut self, file: &MediaFile) -> PreviewHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(
            id,
            PreviewEntry {
                file_name: file.file_name.clone(),
                mime: file.mime.clone(),
                size: file.size(),
            },
        );
        PreviewHandle::new(id)
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.live.remove(&handle.id);
    }

    fn describe(&self, handle: &PreviewHandle) -> Option<String> {
        self.live.get(&handle.id).map(|e| {
            format!(
                "{} ({}, {:.1} MiB)",
                e.file_name,
                e.mime,
                e.size as f64 / (1024.0 * 1024.0)
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MediaFile {
        MediaFile::new("cat.png", "image/png", vec![0u8; 2048])
    }

    #[test]
    fn test_acquire_then_release_leaves_nothing_live() {
        let mut registry = InMemoryPreviews::new();
        let handle = registry.acquire(&sample());
        assert_eq!(registry.live_count(), 1);
        registry.release(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_describe_live_and_released() {
        let mut registry = InMemoryPreviews::new();
        let handle = registry.acquire(&sample());
        let desc = registry.describe(&handle).unwrap();
        assert!(desc.contains("cat.png"));
        assert!(desc.contains("image/png"));
        registry.release(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut registry = InMemoryPreviews::new();
        let a = registry.acquire(&sample());
        let b = registry.acquire(&sample());
        assert_ne!(a, b);
        registry.release(a);
        assert_eq!(registry.live_count(), 1);
        registry.release(b);
    }
}

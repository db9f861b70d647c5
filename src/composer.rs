//! Story composer - draft state machine, media validation and submission guard
//!
//! A [`Draft`] is created when the composer opens and discarded on successful
//! submission or cancel. Media and non-empty text are mutually exclusive;
//! videos are gated on size before their duration is probed. The duration
//! probe and the preview registry are injected so the flow is testable
//! without touching the filesystem.

use thiserror::Error;

use crate::constants::{MAX_VIDEO_DURATION_SECS, MAX_VIDEO_SIZE_BYTES};
use crate::media::{DurationProbe, MediaFile, MediaKind};
use crate::models::{Background, MediaType};
use crate::preview::{PreviewHandle, PreviewRegistry};

/// Active authoring surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposeMode {
    #[default]
    Text,
    Media,
}

/// Local composer failures, all recoverable; the draft survives every one
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Please add some text!")]
    EmptyDraft,
    #[error("Video size exceeds 50mb!")]
    MediaTooLarge,
    #[error("Video duration cannot exceed 1 minute.")]
    MediaTooLong,
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),
    #[error("A story is already being submitted.")]
    SubmissionInProgress,
}

/// Validated payload handed to the network layer
#[derive(Clone, Debug)]
pub struct StorySubmission {
    pub content: String,
    pub media_type: MediaType,
    pub media: Option<MediaFile>,
    pub background: Background,
}

/// The in-progress story
#[derive(Debug, Default)]
pub struct Draft {
    mode: ComposeMode,
    text: String,
    media: Option<MediaFile>,
    preview: Option<PreviewHandle>,
    background: Background,
    submitting: bool,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ComposeMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn media(&self) -> Option<&MediaFile> {
        self.media.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and store a candidate file.
    ///
    /// Videos are rejected on size before the duration probe runs; images are
    /// accepted unconditionally. Acceptance switches to media mode, replaces
    /// any previous selection and clears the text. Rejection of a video also
    /// discards the current selection, matching the original composer.
    pub async fn select_media(
        &mut self,
        file: MediaFile,
        probe: &dyn DurationProbe,
        previews: &mut dyn PreviewRegistry,
    ) -> Result<(), ComposeError> {
        match file.kind() {
            MediaKind::Unsupported => Err(ComposeError::UnsupportedMedia(file.mime.clone())),
            MediaKind::Video => {
                if file.size() > MAX_VIDEO_SIZE_BYTES {
                    self.discard_media(previews);
                    return Err(ComposeError::MediaTooLarge);
                }
                // Preview is allocated before the probe so metadata decoding
                // can read from it, and must be revoked on rejection.
                let candidate = previews.acquire(&file);
                match probe.duration_secs(&file).await {
                    Ok(secs) if secs > MAX_VIDEO_DURATION_SECS => {
                        previews.release(candidate);
                        self.discard_media(previews);
                        Err(ComposeError::MediaTooLong)
                    }
                    Ok(_) => {
                        self.accept(file, candidate, previews);
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(file = %file.file_name, error = %e, "Duration probe failed");
                        previews.release(candidate);
                        self.discard_media(previews);
                        Err(ComposeError::UnsupportedMedia(file.mime.clone()))
                    }
                }
            }
            MediaKind::Image => {
                let candidate = previews.acquire(&file);
                self.accept(file, candidate, previews);
                Ok(())
            }
        }
    }

    fn accept(
        &mut self,
        file: MediaFile,
        candidate: PreviewHandle,
        previews: &mut dyn PreviewRegistry,
    ) {
        if let Some(old) = self.preview.take() {
            previews.release(old);
        }
        self.media = Some(file);
        self.preview = Some(candidate);
        self.text.clear();
        self.mode = ComposeMode::Media;
    }

    fn discard_media(&mut self, previews: &mut dyn PreviewRegistry) {
        self.media = None;
        if let Some(handle) = self.preview.take() {
            previews.release(handle);
        }
    }

    /// Replace the text content; ignored while media is selected
    pub fn set_text(&mut self, value: impl Into<String>) {
        if self.mode == ComposeMode::Text {
            self.text = value.into();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.mode == ComposeMode::Text {
            self.text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.mode == ComposeMode::Text {
            self.text.pop();
        }
    }

    /// Force the authoring mode; leaving media mode releases the selection
    pub fn set_mode(&mut self, mode: ComposeMode, previews: &mut dyn PreviewRegistry) {
        if mode == ComposeMode::Text && self.mode == ComposeMode::Media {
            self.discard_media(previews);
        }
        self.mode = mode;
    }

    /// Select a palette entry; out-of-range indices are ignored
    pub fn select_background(&mut self, index: usize) {
        if let Some(bg) = Background::from_index(index) {
            self.background = bg;
        }
    }

    pub fn cycle_background(&mut self) {
        let next = (self.background.index() + 1) % Background::PALETTE.len();
        self.background = Background::PALETTE[next];
    }

    /// Validate preconditions and produce the submission payload.
    ///
    /// Marks the draft in flight; a second call before [`Draft::submission_failed`]
    /// or discard is rejected so only one request can be outstanding.
    pub fn begin_submission(&mut self) -> Result<StorySubmission, ComposeError> {
        if self.submitting {
            return Err(ComposeError::SubmissionInProgress);
        }

        let media_type = match (&self.media, self.mode) {
            (Some(file), ComposeMode::Media) => file
                .kind()
                .media_type()
                .unwrap_or(MediaType::Text),
            _ => MediaType::Text,
        };

        if media_type == MediaType::Text && self.text.trim().is_empty() {
            return Err(ComposeError::EmptyDraft);
        }

        self.submitting = true;
        Ok(StorySubmission {
            content: self.text.clone(),
            media_type,
            media: if media_type == MediaType::Text {
                None
            } else {
                self.media.clone()
            },
            background: self.background,
        })
    }

    /// Re-enable editing after a failed submission; the draft is preserved
    pub fn submission_failed(&mut self) {
        self.submitting = false;
    }

    /// Drop the draft, revoking any live preview
    pub fn discard(mut self, previews: &mut dyn PreviewRegistry) {
        self.discard_media(previews);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;

    /// Probe returning a fixed duration
    struct FixedProbe(f64);

    #[async_trait]
    impl DurationProbe for FixedProbe {
        async fn duration_secs(&self, _file: &MediaFile) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    /// Probe that must never run (size gate comes first)
    struct PanicProbe;

    #[async_trait]
    impl DurationProbe for PanicProbe {
        async fn duration_secs(&self, _file: &MediaFile) -> anyhow::Result<f64> {
            panic!("duration probe must not run for oversized files");
        }
    }

    /// Probe that fails to parse the container
    struct BrokenProbe;

    #[async_trait]
    impl DurationProbe for BrokenProbe {
        async fn duration_secs(&self, _file: &MediaFile) -> anyhow::Result<f64> {
            Err(anyhow!("not a container"))
        }
    }

    /// Registry counting acquire/release calls
    #[derive(Default)]
    struct CountingPreviews {
        next_id: u64,
        acquired: usize,
        released: usize,
    }

    impl CountingPreviews {
        fn live(&self) -> usize {
            self.acquired - self.released
        }
    }

    impl PreviewRegistry for CountingPreviews {
        fn acquire(&mut self, _file: &MediaFile) -> PreviewHandle {
            self.acquired += 1;
            self.next_id += 1;
            PreviewHandle::new(self.next_id)
        }

        fn release(&mut self, _handle: PreviewHandle) {
            self.released += 1;
        }

        fn describe(&self, _handle: &PreviewHandle) -> Option<String> {
            None
        }
    }

    fn video(size: usize) -> MediaFile {
        MediaFile::new("clip.mp4", "video/mp4", vec![0u8; size])
    }

    fn image() -> MediaFile {
        MediaFile::new("cat.png", "image/png", vec![0u8; 1024])
    }

    const MIB: usize = 1024 * 1024;

    #[tokio::test]
    async fn test_oversized_video_rejected_without_probe() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        let err = draft
            .select_media(video(60 * MIB), &PanicProbe, &mut previews)
            .await
            .unwrap_err();
        assert_eq!(err, ComposeError::MediaTooLarge);
        assert!(draft.media().is_none());
        assert_eq!(previews.acquired, 0);
    }

    #[tokio::test]
    async fn test_long_video_rejected_and_preview_revoked() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        let err = draft
            .select_media(video(10 * MIB), &FixedProbe(61.0), &mut previews)
            .await
            .unwrap_err();
        assert_eq!(err, ComposeError::MediaTooLong);
        assert!(draft.media().is_none());
        assert_eq!(previews.acquired, 1);
        assert_eq!(previews.released, 1);
        assert_eq!(previews.live(), 0);
    }

    #[tokio::test]
    async fn test_valid_video_accepted_and_clears_text() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft.set_text("caption to be discarded");
        draft
            .select_media(video(10 * MIB), &FixedProbe(30.0), &mut previews)
            .await
            .unwrap();
        assert_eq!(draft.mode(), ComposeMode::Media);
        assert!(draft.media().is_some());
        assert!(draft.text().is_empty());
        assert_eq!(previews.live(), 1);
    }

    #[tokio::test]
    async fn test_image_accepted_unconditionally() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft.set_text("old text");
        draft
            .select_media(image(), &PanicProbe, &mut previews)
            .await
            .unwrap();
        assert_eq!(draft.mode(), ComposeMode::Media);
        assert!(draft.text().is_empty());
        assert_eq!(previews.live(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_mime_leaves_draft_untouched() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft.set_text("keep me");
        let file = MediaFile::new("doc.pdf", "application/pdf", vec![0u8; 16]);
        let err = draft
            .select_media(file, &PanicProbe, &mut previews)
            .await
            .unwrap_err();
        assert_eq!(err, ComposeError::UnsupportedMedia("application/pdf".into()));
        assert_eq!(draft.mode(), ComposeMode::Text);
        assert_eq!(draft.text(), "keep me");
        assert_eq!(previews.acquired, 0);
    }

    #[tokio::test]
    async fn test_unparseable_video_rejected() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        let err = draft
            .select_media(video(MIB), &BrokenProbe, &mut previews)
            .await
            .unwrap_err();
        assert_eq!(err, ComposeError::UnsupportedMedia("video/mp4".into()));
        assert!(draft.media().is_none());
        assert_eq!(previews.live(), 0);
    }

    #[tokio::test]
    async fn test_replacing_media_releases_previous_preview() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft
            .select_media(image(), &PanicProbe, &mut previews)
            .await
            .unwrap();
        draft
            .select_media(video(MIB), &FixedProbe(10.0), &mut previews)
            .await
            .unwrap();
        assert_eq!(previews.acquired, 2);
        assert_eq!(previews.released, 1);
        assert_eq!(previews.live(), 1);
    }

    #[tokio::test]
    async fn test_switching_to_text_mode_releases_media() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft
            .select_media(image(), &PanicProbe, &mut previews)
            .await
            .unwrap();
        draft.set_mode(ComposeMode::Text, &mut previews);
        assert_eq!(draft.mode(), ComposeMode::Text);
        assert!(draft.media().is_none());
        assert_eq!(previews.live(), 0);
    }

    #[test]
    fn test_error_notice_copy() {
        assert_eq!(ComposeError::EmptyDraft.to_string(), "Please add some text!");
        assert_eq!(ComposeError::MediaTooLarge.to_string(), "Video size exceeds 50mb!");
        assert_eq!(
            ComposeError::MediaTooLong.to_string(),
            "Video duration cannot exceed 1 minute."
        );
    }

    #[test]
    fn test_submit_empty_draft_rejected() {
        let mut draft = Draft::new();
        assert_eq!(
            draft.begin_submission().unwrap_err(),
            ComposeError::EmptyDraft
        );
        assert!(!draft.is_submitting());
    }

    #[test]
    fn test_submit_text_story_has_no_binary_payload() {
        let mut draft = Draft::new();
        draft.set_text("hello world");
        draft.select_background(2);
        let submission = draft.begin_submission().unwrap();
        assert_eq!(submission.media_type, MediaType::Text);
        assert!(submission.media.is_none());
        assert_eq!(submission.content, "hello world");
        assert_eq!(submission.background, Background::OrangeRed);
    }

    #[tokio::test]
    async fn test_submit_video_story_derives_tag_from_mime() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft
            .select_media(video(10 * MIB), &FixedProbe(30.0), &mut previews)
            .await
            .unwrap();
        let submission = draft.begin_submission().unwrap();
        assert_eq!(submission.media_type, MediaType::Video);
        assert!(submission.media.is_some());
    }

    #[test]
    fn test_concurrent_submission_rejected() {
        let mut draft = Draft::new();
        draft.set_text("once");
        draft.begin_submission().unwrap();
        assert_eq!(
            draft.begin_submission().unwrap_err(),
            ComposeError::SubmissionInProgress
        );
        draft.submission_failed();
        assert!(draft.begin_submission().is_ok());
    }

    #[test]
    fn test_out_of_range_background_is_ignored() {
        let mut draft = Draft::new();
        draft.select_background(1);
        draft.select_background(99);
        assert_eq!(draft.background(), Background::CyanBlue);
    }

    #[tokio::test]
    async fn test_discard_revokes_preview() {
        let mut draft = Draft::new();
        let mut previews = CountingPreviews::default();
        draft
            .select_media(image(), &PanicProbe, &mut previews)
            .await
            .unwrap();
        draft.discard(&mut previews);
        assert_eq!(previews.live(), 0);
    }
}

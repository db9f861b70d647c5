//! Media classification and video metadata probing
//!
//! A selected file is classified exactly once into [`MediaKind`]; every later
//! decision (limits, wire tag, preview) branches on the tag instead of
//! re-inspecting the MIME string.

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::models::MediaType;

/// A candidate media file, loaded into memory for validation and upload
#[derive(Clone, Debug)]
pub struct MediaFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        MediaFile {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("upload"));
        Ok(MediaFile::new(file_name, mime, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.mime)
    }
}

/// Classification of a candidate file by MIME type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl MediaKind {
    pub fn classify(mime: &str) -> MediaKind {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Unsupported
        }
    }

    /// Wire tag for an accepted file (unsupported files are never uploaded)
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            MediaKind::Image => Some(MediaType::Image),
            MediaKind::Video => Some(MediaType::Video),
            MediaKind::Unsupported => None,
        }
    }
}

/// Probes the intrinsic duration of a video file.
///
/// Decoding metadata may suspend, so the probe is async; tests inject stubs
/// with fixed durations.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds, or an error when the container cannot be parsed
    async fn duration_secs(&self, file: &MediaFile) -> Result<f64>;
}

/// Reads the duration from the `mvhd` box of an ISO-BMFF (MP4/MOV) container
#[derive(Debug, Default)]
pub struct Mp4MetadataProbe;

#[async_trait]
impl DurationProbe for Mp4MetadataProbe {
    async fn duration_secs(&self, file: &MediaFile) -> Result<f64> {
        let moov = find_box(&file.bytes, b"moov").context("no moov box found")?;
        let mvhd = find_box(moov, b"mvhd").context("no mvhd box found")?;
        parse_mvhd(mvhd)
    }
}

/// Locate a top-level box by type and return its payload
fn find_box<'a>(data: &'a [u8], box_type: &[u8; 4]) -> Option<&'a [u8]> {
    let mut offset = 0usize;
    while offset + 8 <= data.len() {
        let size = u32::from_be_bytes(data[offset..offset + 4].try_into().ok()?) as u64;
        let kind = &data[offset + 4..offset + 8];

        let (header_len, box_len) = match size {
            0 => (8u64, (data.len() - offset) as u64),
            1 => {
                if offset + 16 > data.len() {
                    return None;
                }
                let large = u64::from_be_bytes(data[offset + 8..offset + 16].try_into().ok()?);
                (16u64, large)
            }
            n => (8u64, n),
        };
        if box_len < header_len {
            return None;
        }

        let end = (offset as u64).checked_add(box_len)? as usize;
        if end > data.len() {
            return None;
        }
        if kind == box_type {
            return Some(&data[offset + header_len as usize..end]);
        }
        offset = end;
    }
    None
}

/// Decode timescale and duration from an mvhd payload (versions 0 and 1)
fn parse_mvhd(payload: &[u8]) -> Result<f64> {
    if payload.is_empty() {
        bail!("empty mvhd box");
    }
    let version = payload[0];
    let (timescale, duration) = match version {
        0 => {
            // version/flags (4) + creation (4) + modification (4)
            if payload.len() < 20 {
                bail!("truncated mvhd (v0)");
            }
            let ts = u32::from_be_bytes(payload[12..16].try_into()?) as u64;
            let dur = u32::from_be_bytes(payload[16..20].try_into()?) as u64;
            (ts, dur)
        }
        1 => {
            // version/flags (4) + creation (8) + modification (8)
            if payload.len() < 32 {
                bail!("truncated mvhd (v1)");
            }
            let ts = u32::from_be_bytes(payload[20..24].try_into()?) as u64;
            let dur = u64::from_be_bytes(payload[24..32].try_into()?);
            (ts, dur)
        }
        v => bail!("unsupported mvhd version {}", v),
    };
    if timescale == 0 {
        bail!("mvhd timescale is zero");
    }
    Ok(duration as f64 / timescale as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a box with the given type and payload
    fn make_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&((payload.len() as u32 + 8).to_be_bytes()));
        out.extend_from_slice(box_type);
        out.extend_from_slice(payload);
        out
    }

    fn mvhd_v0(timescale: u32, duration: u32) -> Vec<u8> {
        let mut payload = vec![0u8; 20];
        payload[12..16].copy_from_slice(&timescale.to_be_bytes());
        payload[16..20].copy_from_slice(&duration.to_be_bytes());
        make_box(b"mvhd", &payload)
    }

    fn mvhd_v1(timescale: u32, duration: u64) -> Vec<u8> {
        let mut payload = vec![0u8; 32];
        payload[0] = 1;
        payload[20..24].copy_from_slice(&timescale.to_be_bytes());
        payload[24..32].copy_from_slice(&duration.to_be_bytes());
        make_box(b"mvhd", &payload)
    }

    fn mp4_with_duration(mvhd: Vec<u8>) -> MediaFile {
        let mut data = make_box(b"ftyp", b"isom");
        data.extend(make_box(b"moov", &mvhd));
        MediaFile::new("clip.mp4", "video/mp4", data)
    }

    #[test]
    fn test_classify_by_mime_prefix() {
        assert_eq!(MediaKind::classify("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::classify("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::classify("application/pdf"), MediaKind::Unsupported);
        assert_eq!(MediaKind::classify("text/plain"), MediaKind::Unsupported);
    }

    #[test]
    fn test_media_type_tags() {
        assert_eq!(MediaKind::Image.media_type(), Some(MediaType::Image));
        assert_eq!(MediaKind::Video.media_type(), Some(MediaType::Video));
        assert_eq!(MediaKind::Unsupported.media_type(), None);
    }

    #[tokio::test]
    async fn test_probe_mvhd_v0() {
        let file = mp4_with_duration(mvhd_v0(1000, 30_000));
        let secs = Mp4MetadataProbe.duration_secs(&file).await.unwrap();
        assert!((secs - 30.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_probe_mvhd_v1() {
        let file = mp4_with_duration(mvhd_v1(600, 54_000));
        let secs = Mp4MetadataProbe.duration_secs(&file).await.unwrap();
        assert!((secs - 90.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_probe_rejects_non_mp4_bytes() {
        let file = MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 64]);
        assert!(Mp4MetadataProbe.duration_secs(&file).await.is_err());
    }

    #[tokio::test]
    async fn test_probe_rejects_truncated_mvhd() {
        let mut data = make_box(b"moov", &make_box(b"mvhd", &[0u8; 4]));
        data.truncate(data.len() - 2);
        let file = MediaFile::new("clip.mp4", "video/mp4", data);
        assert!(Mp4MetadataProbe.duration_secs(&file).await.is_err());
    }
}

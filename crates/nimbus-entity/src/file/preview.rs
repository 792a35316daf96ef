//! Preview classification by MIME type.

use serde::{Deserialize, Serialize};

/// How a file can be previewed by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    /// Rendered inline as an image.
    Image,
    /// Played as video.
    Video,
    /// Played as audio.
    Audio,
    /// Rendered as a PDF document.
    Pdf,
    /// Shown as plain text (text/*, JSON, XML).
    Text,
    /// Office document; download to view.
    Office,
    /// No preview available.
    Unsupported,
}

impl PreviewKind {
    /// Classify a MIME type.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        let top = mime.split('/').next().unwrap_or_default();
        match top {
            "image" => return Self::Image,
            "video" => return Self::Video,
            "audio" => return Self::Audio,
            "text" => return Self::Text,
            _ => {}
        }
        // Office MIME types contain "openxmlformats", so test them before xml.
        if mime == "application/pdf" {
            Self::Pdf
        } else if ["word", "excel", "powerpoint", "spreadsheet", "presentation"]
            .iter()
            .any(|needle| mime.contains(needle))
        {
            Self::Office
        } else if mime.contains("json") || mime.contains("xml") {
            Self::Text
        } else {
            Self::Unsupported
        }
    }

    /// Whether the bytes can be shown without an external application.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Image | Self::Pdf | Self::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(PreviewKind::from_mime("image/png"), PreviewKind::Image);
        assert_eq!(PreviewKind::from_mime("video/mp4"), PreviewKind::Video);
        assert_eq!(PreviewKind::from_mime("audio/mpeg"), PreviewKind::Audio);
        assert_eq!(PreviewKind::from_mime("application/pdf"), PreviewKind::Pdf);
        assert_eq!(PreviewKind::from_mime("application/json"), PreviewKind::Text);
        assert_eq!(
            PreviewKind::from_mime(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            PreviewKind::Office
        );
        assert_eq!(PreviewKind::from_mime("application/zip"), PreviewKind::Unsupported);
    }
}

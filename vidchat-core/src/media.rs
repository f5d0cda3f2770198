//! Media type detection for files picked from disk.

use std::path::Path;

use crate::types::VideoUpload;

/// Returns `true` when a declared media type belongs to the video class.
pub fn is_video_media_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("video/")
}

/// Maps a filename's extension to a declared media type.
///
/// Unknown extensions map to `application/octet-stream`, which the upload
/// validation then rejects as non-video.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mpeg" | "mpg" => "video/mpeg",

        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",

        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",

        "txt" => "text/plain",
        "pdf" => "application/pdf",

        _ => "application/octet-stream",
    }
}

/// Reads a file into a [`VideoUpload`], deriving its media type from the extension.
///
/// No validation happens here; the controller decides whether the type is acceptable.
pub async fn read_upload(path: &Path) -> std::io::Result<VideoUpload> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let content_type = content_type_for(&filename);
    Ok(VideoUpload::new(filename, content_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_extensions_map_to_video_types() {
        for name in ["clip.mp4", "CLIP.MOV", "a.b.webm", "talk.mkv"] {
            assert!(is_video_media_type(content_type_for(name)), "{name}");
        }
    }

    #[test]
    fn other_files_are_not_video() {
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("README"), "application/octet-stream");
        assert!(!is_video_media_type(content_type_for("song.mp3")));
    }

    #[test]
    fn media_type_check_ignores_case() {
        assert!(is_video_media_type("Video/MP4"));
        assert!(!is_video_media_type("application/video"));
    }

    #[tokio::test]
    async fn read_upload_takes_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let upload = read_upload(&path).await.unwrap();
        assert_eq!(upload.filename, "garden.mp4");
        assert_eq!(upload.content_type, "video/mp4");
        assert_eq!(upload.size(), 18);
    }
}

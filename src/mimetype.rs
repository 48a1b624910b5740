//! Mimetype detection.
//!
//! Files are classified by extension first, using a fixed extension table. Files
//! whose extension is missing or unknown get their header sniffed for a known
//! audio container. Anything left over is reported as [`UNKNOWN_MIMETYPE`].

use lofty::file::FileType;
use lofty::probe::Probe;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sentinel mimetype for files that could not be identified.
pub const UNKNOWN_MIMETYPE: &str = "unknown";

/// Extension to mimetype table. Extensions are lowercase with a leading dot.
const MIMETYPES: &[(&str, &str)] = &[
    // Audio
    (".mp3", "audio/mpeg"),
    (".mp2", "audio/mpeg"),
    (".mpga", "audio/mpeg"),
    (".flac", "audio/flac"),
    (".ogg", "audio/ogg"),
    (".oga", "audio/ogg"),
    (".opus", "audio/ogg"),
    (".spx", "audio/ogg"),
    (".m4a", "audio/mp4"),
    (".m4b", "audio/mp4"),
    (".aac", "audio/aac"),
    (".wav", "audio/x-wav"),
    (".aif", "audio/x-aiff"),
    (".aiff", "audio/x-aiff"),
    (".aifc", "audio/x-aiff"),
    (".wma", "audio/x-ms-wma"),
    (".ape", "audio/x-ape"),
    (".mpc", "audio/x-musepack"),
    (".wv", "audio/x-wavpack"),
    (".mid", "audio/midi"),
    (".midi", "audio/midi"),
    (".m3u", "audio/x-mpegurl"),
    (".pls", "audio/x-scpls"),
    // Images
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".bmp", "image/bmp"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    (".webp", "image/webp"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
    // Video
    (".mp4", "video/mp4"),
    (".m4v", "video/mp4"),
    (".mkv", "video/x-matroska"),
    (".webm", "video/webm"),
    (".avi", "video/x-msvideo"),
    (".mov", "video/quicktime"),
    (".mpg", "video/mpeg"),
    (".mpeg", "video/mpeg"),
    // Text
    (".txt", "text/plain"),
    (".nfo", "text/plain"),
    (".log", "text/plain"),
    (".md", "text/markdown"),
    (".cue", "application/x-cue"),
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".csv", "text/csv"),
    (".xml", "application/xml"),
    (".json", "application/json"),
    // Documents
    (".pdf", "application/pdf"),
    (".doc", "application/msword"),
    (".rtf", "application/rtf"),
    // Archives
    (".zip", "application/zip"),
    (".rar", "application/vnd.rar"),
    (".7z", "application/x-7z-compressed"),
    (".tar", "application/x-tar"),
    (".gz", "application/gzip"),
    (".bz2", "application/x-bzip2"),
    (".xz", "application/x-xz"),
];

/// Looks up the mimetype for an extension.
///
/// # Arguments
///
/// * `extension` - The file extension including the leading dot (e.g., ".mp3")
///
/// # Examples
///
/// ```
/// use audiostat::mimetype::mimetype_for_extension;
///
/// assert_eq!(mimetype_for_extension(".mp3"), Some("audio/mpeg"));
/// assert_eq!(mimetype_for_extension(".JPG"), Some("image/jpeg"));
/// assert_eq!(mimetype_for_extension(".unknown"), None);
/// ```
pub fn mimetype_for_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.to_lowercase();

    MIMETYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mimetype)| *mimetype)
}

/// Extracts the file extension from a path.
///
/// Returns the extension in lowercase with a leading dot, or an empty string
/// if the path has no extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use audiostat::mimetype::get_extension;
///
/// assert_eq!(get_extension(Path::new("/music/Track.MP3")), ".mp3");
/// assert_eq!(get_extension(Path::new("/music/README")), "");
/// ```
pub fn get_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{}", s.to_lowercase()))
        .unwrap_or_default()
}

fn mimetype_for_file_type(file_type: FileType) -> Option<&'static str> {
    match file_type {
        FileType::Mpeg => Some("audio/mpeg"),
        FileType::Flac => Some("audio/flac"),
        FileType::Opus | FileType::Vorbis | FileType::Speex => Some("audio/ogg"),
        FileType::Mp4 => Some("audio/mp4"),
        FileType::Aac => Some("audio/aac"),
        FileType::Wav => Some("audio/x-wav"),
        FileType::Aiff => Some("audio/x-aiff"),
        FileType::Ape => Some("audio/x-ape"),
        FileType::Mpc => Some("audio/x-musepack"),
        FileType::WavPack => Some("audio/x-wavpack"),
        _ => None,
    }
}

/// Identifies an audio container from the first bytes of the file.
fn sniff_audio(path: &Path) -> Option<&'static str> {
    let file = File::open(path).ok()?;
    let probe = Probe::new(BufReader::new(file)).guess_file_type().ok()?;

    probe.file_type().and_then(mimetype_for_file_type)
}

/// Guesses the mimetype of a file. Never fails.
///
/// Unrecognised files yield [`UNKNOWN_MIMETYPE`].
pub fn guess_mimetype(path: &Path) -> String {
    let extension = get_extension(path);

    mimetype_for_extension(&extension)
        .or_else(|| sniff_audio(path))
        .unwrap_or(UNKNOWN_MIMETYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mimetype_for_extension_audio() {
        assert_eq!(mimetype_for_extension(".mp3"), Some("audio/mpeg"));
        assert_eq!(mimetype_for_extension(".flac"), Some("audio/flac"));
        assert_eq!(mimetype_for_extension(".ogg"), Some("audio/ogg"));
        assert_eq!(mimetype_for_extension(".m4a"), Some("audio/mp4"));
    }

    #[test]
    fn test_mimetype_for_extension_other() {
        assert_eq!(mimetype_for_extension(".jpg"), Some("image/jpeg"));
        assert_eq!(mimetype_for_extension(".txt"), Some("text/plain"));
        assert_eq!(mimetype_for_extension(".pdf"), Some("application/pdf"));
        assert_eq!(mimetype_for_extension(".mp4"), Some("video/mp4"));
    }

    #[test]
    fn test_mimetype_for_extension_case_insensitive() {
        assert_eq!(mimetype_for_extension(".MP3"), Some("audio/mpeg"));
        assert_eq!(mimetype_for_extension(".Png"), Some("image/png"));
    }

    #[test]
    fn test_mimetype_for_extension_unknown() {
        assert_eq!(mimetype_for_extension(".xyz"), None);
        assert_eq!(mimetype_for_extension(""), None);
    }

    #[test]
    fn test_table_extensions_are_normalised() {
        for (extension, mimetype) in MIMETYPES {
            assert!(extension.starts_with('.'), "{extension}");
            assert_eq!(*extension, extension.to_lowercase());
            assert!(mimetype.contains('/'), "{mimetype}");
        }
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(Path::new("song.mp3")), ".mp3");
        assert_eq!(get_extension(Path::new("cover.JPG")), ".jpg");
        assert_eq!(get_extension(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(get_extension(Path::new("Makefile")), "");
    }

    #[test]
    fn test_guess_mimetype_by_extension_without_reading() {
        // Extension lookup never touches the file
        assert_eq!(guess_mimetype(Path::new("/no/such/file.flac")), "audio/flac");
    }

    #[test]
    fn test_guess_mimetype_missing_file_is_unknown() {
        assert_eq!(guess_mimetype(Path::new("/no/such/file")), UNKNOWN_MIMETYPE);
    }

    #[test]
    fn test_guess_mimetype_unrecognised_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"just some bytes, nothing audio about them").unwrap();

        assert_eq!(guess_mimetype(&path), UNKNOWN_MIMETYPE);
    }

    #[test]
    fn test_guess_mimetype_sniffs_flac_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"fLaC").unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        drop(file);

        assert_eq!(guess_mimetype(&path), "audio/flac");
    }
}

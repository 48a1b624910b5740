//! Audio metadata probing.
//!
//! The statistics only care about a handful of facts per audio file: which ID3
//! tag version it carries, its bitrate, and whether that bitrate is variable.
//! [`AudioProbe`] is the seam the scanner uses to obtain them; [`LoftyProbe`]
//! reads MP3 files with lofty.

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::id3::v2::Id3v2Version;
use lofty::mpeg::MpegFile;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::stats::{AudioInfo, TagVersion};

/// Mimetype of the files [`LoftyProbe`] treats as audio.
pub const MP3_MIMETYPE: &str = "audio/mpeg";

/// Bytes searched for a VBR header after the ID3v2 tag.
const VBR_SEARCH_WINDOW: u64 = 4096;

/// Result of probing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Audio(AudioInfo),
    NotAudio,
    /// The file looked like audio but its metadata could not be read
    Failed(String),
}

impl ProbeOutcome {
    /// Collapses the outcome into the audio facts the counters consume.
    ///
    /// Parse failures count as "not audio".
    pub fn into_audio(self) -> Option<AudioInfo> {
        match self {
            ProbeOutcome::Audio(info) => Some(info),
            ProbeOutcome::NotAudio | ProbeOutcome::Failed(_) => None,
        }
    }
}

pub trait AudioProbe {
    fn probe(&self, path: &Path, mimetype: &str) -> ProbeOutcome;
}

impl<F> AudioProbe for F
where
    F: Fn(&Path, &str) -> ProbeOutcome,
{
    fn probe(&self, path: &Path, mimetype: &str) -> ProbeOutcome {
        self(path, mimetype)
    }
}

/// Reads MP3 files with lofty. Every other mimetype is "not audio".
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyProbe;

impl AudioProbe for LoftyProbe {
    fn probe(&self, path: &Path, mimetype: &str) -> ProbeOutcome {
        if mimetype != MP3_MIMETYPE {
            return ProbeOutcome::NotAudio;
        }

        match read_mp3(path) {
            Ok(info) => ProbeOutcome::Audio(info),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

fn read_mp3(path: &Path) -> color_eyre::Result<AudioInfo> {
    let mut reader = BufReader::new(File::open(path)?);
    let options = ParseOptions::new().read_cover_art(false);
    let mp3 = MpegFile::read_from(&mut reader, options)?;

    let tag = if let Some(id3v2) = mp3.id3v2() {
        Some(id3v2_tag_version(id3v2.original_version()))
    } else {
        mp3.id3v1()
            .map(|id3v1| id3v1_tag_version(id3v1.track_number.is_some()))
    };

    reader.seek(SeekFrom::Start(0))?;
    let variable_bit_rate = matches!(
        read_vbr_marker(&mut reader)?,
        Some(VbrMarker::Xing | VbrMarker::Vbri)
    );

    Ok(AudioInfo {
        tag,
        variable_bit_rate,
        bitrate_kbps: mp3.properties().audio_bitrate(),
    })
}

pub fn id3v2_tag_version(version: Id3v2Version) -> TagVersion {
    match version {
        Id3v2Version::V2 => TagVersion::V2_2,
        Id3v2Version::V3 => TagVersion::V2_3,
        Id3v2Version::V4 => TagVersion::V2_4,
    }
}

/// ID3v1.1 differs from v1.0 only by carrying a track number.
pub fn id3v1_tag_version(has_track_number: bool) -> TagVersion {
    if has_track_number {
        TagVersion::V1_1
    } else {
        TagVersion::V1_0
    }
}

/// Info tag written at the start of an MP3 stream by encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VbrMarker {
    /// Xing header, written for VBR streams
    Xing,
    /// Fraunhofer VBRI header
    Vbri,
    /// LAME's CBR variant of the Xing header
    Info,
}

/// Finds the first encoder info marker in `buf`.
pub fn find_vbr_marker(buf: &[u8]) -> Option<VbrMarker> {
    buf.windows(4).find_map(|window| match window {
        b"Xing" => Some(VbrMarker::Xing),
        b"VBRI" => Some(VbrMarker::Vbri),
        b"Info" => Some(VbrMarker::Info),
        _ => None,
    })
}

/// Returns the number of bytes taken by a leading ID3v2 tag, or 0 if there is none.
pub fn id3v2_tag_len(header: &[u8; 10]) -> u64 {
    if &header[..3] != b"ID3" {
        return 0;
    }

    let size = header[6..10]
        .iter()
        .fold(0u64, |acc, byte| (acc << 7) | u64::from(byte & 0x7F));
    let footer = if header[5] & 0x10 == 0x10 { 10 } else { 0 };

    10 + size + footer
}

/// Counts the zero bytes padding the start of the stream.
fn leading_zeros<R: Read>(reader: &mut R) -> std::io::Result<u64> {
    let mut count = 0;
    for byte in reader.bytes() {
        if byte? != 0 {
            break;
        }
        count += 1;
    }
    Ok(count)
}

fn read_vbr_marker<R>(reader: &mut R) -> std::io::Result<Option<VbrMarker>>
where
    R: Read + Seek,
{
    let padding = leading_zeros(reader)?;
    reader.seek(SeekFrom::Start(padding))?;

    let mut header = [0u8; 10];
    let tag_len = match reader.read_exact(&mut header) {
        Ok(()) => id3v2_tag_len(&header),
        Err(_) => 0,
    };

    reader.seek(SeekFrom::Start(padding + tag_len))?;
    let mut window = Vec::new();
    reader.take(VBR_SEARCH_WINDOW).read_to_end(&mut window)?;

    Ok(find_vbr_marker(&window))
}

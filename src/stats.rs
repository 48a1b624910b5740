//! Run counters and file classification.
//!
//! This module holds everything the statistics run accumulates: file totals,
//! mimetype distribution, ID3 tag versions, and MP3 bitrate mode and bands.
//! Counting is a pure fold over [`AudioFileFacts`], one call per scanned file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::StatsError;

/// ID3 tag versions tracked by the report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagVersion {
    V1_0,
    V1_1,
    V2_2,
    V2_3,
    V2_4,
}

impl TagVersion {
    /// Every known version, in the fixed order the report lists them.
    pub const ALL: [TagVersion; 5] = [
        TagVersion::V1_0,
        TagVersion::V1_1,
        TagVersion::V2_2,
        TagVersion::V2_3,
        TagVersion::V2_4,
    ];

    /// Maps a raw `(major, minor)` version pair onto a known tag version.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UnknownTagVersion`] for any pair outside the known set.
    ///
    /// # Examples
    ///
    /// ```
    /// use audiostat::stats::TagVersion;
    ///
    /// assert_eq!(TagVersion::from_parts(2, 3).unwrap(), TagVersion::V2_3);
    /// assert!(TagVersion::from_parts(3, 0).is_err());
    /// ```
    pub fn from_parts(major: u8, minor: u8) -> Result<Self, StatsError> {
        match (major, minor) {
            (1, 0) => Ok(TagVersion::V1_0),
            (1, 1) => Ok(TagVersion::V1_1),
            (2, 2) => Ok(TagVersion::V2_2),
            (2, 3) => Ok(TagVersion::V2_3),
            (2, 4) => Ok(TagVersion::V2_4),
            _ => Err(StatsError::UnknownTagVersion(format!("{major}.{minor}"))),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagVersion::V1_0 => "v1.0",
            TagVersion::V1_1 => "v1.1",
            TagVersion::V2_2 => "v2.2",
            TagVersion::V2_3 => "v2.3",
            TagVersion::V2_4 => "v2.4",
        }
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagVersion {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let unknown = || StatsError::UnknownTagVersion(s.to_string());
        let (major, minor) = digits.split_once('.').ok_or_else(unknown)?;
        let major = major.parse::<u8>().map_err(|_| unknown())?;
        let minor = minor.parse::<u8>().map_err(|_| unknown())?;

        Self::from_parts(major, minor).map_err(|_| unknown())
    }
}

/// Comparison used by a bitrate band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Le,
    Lt,
    Ge,
    Gt,
    Eq,
    Ne,
}

impl Comparator {
    pub fn matches(self, value: u32, threshold: u32) -> bool {
        match self {
            Comparator::Le => value <= threshold,
            Comparator::Lt => value < threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Gt => value > threshold,
            Comparator::Eq => value == threshold,
            Comparator::Ne => value != threshold,
        }
    }

    /// Fixed two-character token, padded so report columns line up.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Le => "<=",
            Comparator::Lt => "< ",
            Comparator::Ge => ">=",
            Comparator::Gt => "> ",
            Comparator::Eq => "= ",
            Comparator::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateBand {
    pub comparator: Comparator,
    pub threshold_kbps: u32,
}

impl BitrateBand {
    const fn new(comparator: Comparator, threshold_kbps: u32) -> Self {
        Self {
            comparator,
            threshold_kbps,
        }
    }

    pub fn matches(&self, kbps: u32) -> bool {
        self.comparator.matches(kbps, self.threshold_kbps)
    }
}

impl fmt::Display for BitrateBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.comparator.symbol(), self.threshold_kbps)
    }
}

/// Bitrate bands in evaluation order. A file lands in the first band that matches.
pub const BITRATE_BANDS: [BitrateBand; 8] = [
    BitrateBand::new(Comparator::Le, 96),
    BitrateBand::new(Comparator::Le, 112),
    BitrateBand::new(Comparator::Le, 128),
    BitrateBand::new(Comparator::Le, 160),
    BitrateBand::new(Comparator::Le, 192),
    BitrateBand::new(Comparator::Le, 256),
    BitrateBand::new(Comparator::Le, 320),
    BitrateBand::new(Comparator::Gt, 320),
];

/// Returns the index into [`BITRATE_BANDS`] of the first band matching `kbps`.
///
/// # Examples
///
/// ```
/// use audiostat::stats::classify_bitrate;
///
/// assert_eq!(classify_bitrate(96), Some(0));
/// assert_eq!(classify_bitrate(97), Some(1));
/// assert_eq!(classify_bitrate(320), Some(6));
/// assert_eq!(classify_bitrate(321), Some(7));
/// ```
pub fn classify_bitrate(kbps: u32) -> Option<usize> {
    BITRATE_BANDS.iter().position(|band| band.matches(kbps))
}

/// Returns true when the file's base name starts with a dot.
///
/// This is a name-based heuristic; filesystem hidden attributes are not consulted.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Decoded audio facts for a file the parser recognised as audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    /// The embedded tag version, `None` when the file carries no tag
    pub tag: Option<TagVersion>,
    pub variable_bit_rate: bool,
    pub bitrate_kbps: u32,
}

/// Everything the counters need to know about one scanned file.
#[derive(Debug, Clone)]
pub struct AudioFileFacts {
    pub path: PathBuf,
    pub mimetype: String,
    /// `None` when the file is not audio or its metadata could not be parsed
    pub audio: Option<AudioInfo>,
}

impl AudioFileFacts {
    pub fn is_audio_file(&self) -> bool {
        self.audio.is_some()
    }

    pub fn has_tag(&self) -> bool {
        self.audio.is_some_and(|info| info.tag.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTotals {
    pub total: u64,
    pub audio: u64,
    pub hidden: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitrateModes {
    pub constant: u64,
    pub variable: u64,
}

/// What [`RunCounters::observe`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Counted in the file totals and mimetypes only
    Counted,
    /// Audio with a tag: also counted in tag versions and bitrates
    Tagged,
}

/// Cumulative counters for a single statistics run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCounters {
    pub file_totals: FileTotals,
    pub mimetypes: BTreeMap<String, u64>,
    tag_versions: [u64; TagVersion::ALL.len()],
    pub bitrate_modes: BitrateModes,
    bitrate_bands: [u64; BITRATE_BANDS.len()],
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCounters {
    /// Creates counters with every tag version and bitrate band seeded at zero.
    pub fn new() -> Self {
        Self {
            file_totals: FileTotals::default(),
            mimetypes: BTreeMap::new(),
            tag_versions: [0; TagVersion::ALL.len()],
            bitrate_modes: BitrateModes::default(),
            bitrate_bands: [0; BITRATE_BANDS.len()],
        }
    }

    /// Counts one scanned file.
    ///
    /// Every file counts towards the totals and its mimetype. Tag version,
    /// bitrate mode and bitrate band are only counted for audio files that
    /// carry a tag.
    pub fn observe(&mut self, facts: &AudioFileFacts) -> Observation {
        self.file_totals.total += 1;
        if facts.is_audio_file() {
            self.file_totals.audio += 1;
        }
        if is_hidden(&facts.path) {
            self.file_totals.hidden += 1;
        }

        *self.mimetypes.entry(facts.mimetype.clone()).or_insert(0) += 1;

        let Some(AudioInfo {
            tag: Some(version),
            variable_bit_rate,
            bitrate_kbps,
        }) = facts.audio
        else {
            return Observation::Counted;
        };

        self.tag_versions[version.index()] += 1;

        if variable_bit_rate {
            self.bitrate_modes.variable += 1;
        } else {
            self.bitrate_modes.constant += 1;
        }

        if let Some(band) = classify_bitrate(bitrate_kbps) {
            self.bitrate_bands[band] += 1;
        }

        Observation::Tagged
    }

    /// Adds another run's counters into this one, key by key.
    ///
    /// Merging is commutative and associative, so partial counters from
    /// independent scans can be combined in any order.
    pub fn merge(&mut self, other: &RunCounters) {
        self.file_totals.total += other.file_totals.total;
        self.file_totals.audio += other.file_totals.audio;
        self.file_totals.hidden += other.file_totals.hidden;

        for (mimetype, count) in &other.mimetypes {
            *self.mimetypes.entry(mimetype.clone()).or_insert(0) += count;
        }
        for (mine, theirs) in self.tag_versions.iter_mut().zip(other.tag_versions) {
            *mine += theirs;
        }

        self.bitrate_modes.constant += other.bitrate_modes.constant;
        self.bitrate_modes.variable += other.bitrate_modes.variable;

        for (mine, theirs) in self.bitrate_bands.iter_mut().zip(other.bitrate_bands) {
            *mine += theirs;
        }
    }

    pub fn non_audio(&self) -> u64 {
        self.file_totals.total - self.file_totals.audio
    }

    /// Number of tagged audio files, i.e. files counted in the bitrate sections.
    pub fn tagged(&self) -> u64 {
        self.bitrate_modes.constant + self.bitrate_modes.variable
    }

    pub fn tag_version_count(&self, version: TagVersion) -> u64 {
        self.tag_versions[version.index()]
    }

    /// Tag version counts in report order, zero counts included.
    pub fn tag_versions(&self) -> impl Iterator<Item = (TagVersion, u64)> + '_ {
        TagVersion::ALL
            .into_iter()
            .map(move |version| (version, self.tag_version_count(version)))
    }

    /// Bitrate band counts in evaluation order.
    pub fn bitrate_bands(&self) -> impl Iterator<Item = (BitrateBand, u64)> + '_ {
        BITRATE_BANDS.iter().copied().zip(self.bitrate_bands)
    }
}

/// Feeds scanned files into a [`RunCounters`] and signals progress.
///
/// The progress callback fires once for each tagged audio file.
pub struct Collector<F = fn()>
where
    F: FnMut(),
{
    counters: RunCounters,
    on_tagged: F,
}

impl Collector {
    pub fn new() -> Self {
        Self::with_progress(|| {})
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut()> Collector<F> {
    pub fn with_progress(on_tagged: F) -> Self {
        Self {
            counters: RunCounters::new(),
            on_tagged,
        }
    }

    pub fn observe(&mut self, facts: &AudioFileFacts) {
        if self.counters.observe(facts) == Observation::Tagged {
            (self.on_tagged)();
        }
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Ends collection and hands the counters over for rendering.
    pub fn finish(self) -> RunCounters {
        self.counters
    }
}

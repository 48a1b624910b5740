//! File system scanning.
//!
//! Walks the requested paths one file at a time, derives the facts the
//! statistics need for every regular file, and hands them to a callback.
//! Scanning is serial: the callback sees files in a stable, name-sorted order.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{Result, StatsError};
use crate::mimetype::guess_mimetype;
use crate::probe::{AudioProbe, ProbeOutcome};
use crate::stats::AudioFileFacts;

/// Outcome of a scan besides the per-file facts.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of files handed to the callback
    pub files: u64,
    /// Walk errors (unreadable directories, broken links); none of them stop the scan
    pub errors: Vec<String>,
}

impl ScanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

/// Returns true if the entry matches one of the exclusion patterns.
///
/// Patterns match a base name exactly. Scan roots are never excluded.
fn is_excluded(entry: &DirEntry, config: &ScanConfig) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let file_name = entry.file_name().to_string_lossy();
    config
        .exclude_patterns
        .iter()
        .any(|pattern| *pattern == file_name)
}

fn walker<'a>(
    root: &Path,
    config: &'a ScanConfig,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| !is_excluded(e, config))
}

fn check_roots(paths: &[PathBuf]) -> Result<()> {
    match paths.iter().find(|path| !path.exists()) {
        Some(missing) => Err(StatsError::PathNotFound(missing.clone())),
        None => Ok(()),
    }
}

/// Derives the facts for a single file.
///
/// Metadata that cannot be parsed is logged and the file is treated as not audio.
pub fn file_facts<P: AudioProbe + ?Sized>(path: &Path, probe: &P) -> AudioFileFacts {
    let mimetype = guess_mimetype(path);

    let audio = match probe.probe(path, &mimetype) {
        ProbeOutcome::Failed(reason) => {
            debug!("Unreadable audio metadata in {}: {}", path.display(), reason);
            None
        }
        outcome => outcome.into_audio(),
    };

    AudioFileFacts {
        path: path.to_path_buf(),
        mimetype,
        audio,
    }
}

/// Counts the regular files the scan will visit.
///
/// Used to size progress displays. Walk errors are ignored here; they are
/// reported by [`scan_paths`].
pub fn count_files(paths: &[PathBuf], config: &ScanConfig) -> u64 {
    paths
        .iter()
        .flat_map(|root| walker(root, config))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count() as u64
}

/// Scans every path and reports the facts of each regular file.
///
/// A path naming a file is visited as itself; directories are walked
/// recursively. Each file is reported exactly once per occurrence in the walk.
///
/// # Arguments
///
/// * `paths` - Files and directories to scan, in order
/// * `config` - Exclusion patterns and link handling
/// * `probe` - Source of audio facts for each file
/// * `on_file` - Called with the facts of each file, in scan order
///
/// # Errors
///
/// Returns [`StatsError::PathNotFound`] if any of the paths does not exist.
/// Nothing is scanned in that case. Errors met while walking are collected
/// in [`ScanSummary::errors`].
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use audiostat::config::ScanConfig;
/// use audiostat::probe::LoftyProbe;
/// use audiostat::scanner::scan_paths;
/// use audiostat::stats::Collector;
///
/// # fn example() -> Result<(), audiostat::error::StatsError> {
/// let mut collector = Collector::new();
/// let summary = scan_paths(
///     &[PathBuf::from("/music")],
///     &ScanConfig::default(),
///     &LoftyProbe,
///     |facts| collector.observe(&facts),
/// )?;
///
/// println!("Scanned {} files", summary.files);
/// # Ok(())
/// # }
/// ```
pub fn scan_paths<P, F>(
    paths: &[PathBuf],
    config: &ScanConfig,
    probe: &P,
    mut on_file: F,
) -> Result<ScanSummary>
where
    P: AudioProbe + ?Sized,
    F: FnMut(AudioFileFacts),
{
    check_roots(paths)?;

    let mut summary = ScanSummary::new();

    for root in paths {
        for entry in walker(root, config) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    on_file(file_facts(entry.path(), probe));
                    summary.files += 1;
                }
                Err(e) => {
                    warn!("Error walking {}: {}", root.display(), e);
                    summary.add_error(format!("Error walking directory: {}", e));
                }
                _ => {}
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AudioInfo, TagVersion};
    use std::fs;

    fn fake_probe(_: &Path, mimetype: &str) -> ProbeOutcome {
        match mimetype {
            "audio/mpeg" => ProbeOutcome::Audio(AudioInfo {
                tag: Some(TagVersion::V2_3),
                variable_bit_rate: false,
                bitrate_kbps: 128,
            }),
            "audio/flac" => ProbeOutcome::Failed("no STREAMINFO block".to_string()),
            _ => ProbeOutcome::NotAudio,
        }
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("album")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("album/01.mp3"), b"").unwrap();
        fs::write(dir.path().join("album/02.flac"), b"").unwrap();
        fs::write(dir.path().join("album/.cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("node_modules/skip.mp3"), b"").unwrap();
        dir
    }

    fn config() -> ScanConfig {
        ScanConfig {
            exclude_patterns: vec!["node_modules".to_string()],
            follow_links: false,
        }
    }

    #[test]
    fn test_scan_summary_new() {
        let summary = ScanSummary::new();
        assert_eq!(summary.files, 0);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_file_facts_failed_parse_is_not_audio() {
        let facts = file_facts(Path::new("album/02.flac"), &fake_probe);

        assert_eq!(facts.mimetype, "audio/flac");
        assert!(!facts.is_audio_file());
    }

    #[test]
    fn test_file_facts_audio() {
        let facts = file_facts(Path::new("album/01.mp3"), &fake_probe);

        assert_eq!(facts.mimetype, "audio/mpeg");
        assert!(facts.has_tag());
    }

    #[test]
    fn test_scan_paths_visits_every_file_once_in_order() {
        let dir = tree();
        let mut seen = Vec::new();

        let summary = scan_paths(&[dir.path().to_path_buf()], &config(), &fake_probe, |facts| {
            seen.push(facts.path.strip_prefix(dir.path()).unwrap().to_path_buf())
        })
        .unwrap();

        assert_eq!(summary.files, 4);
        assert!(summary.errors.is_empty());
        assert_eq!(
            seen,
            vec![
                PathBuf::from("album/.cover.jpg"),
                PathBuf::from("album/01.mp3"),
                PathBuf::from("album/02.flac"),
                PathBuf::from("notes.txt"),
            ]
        );
    }

    #[test]
    fn test_scan_paths_keeps_hidden_files() {
        let dir = tree();
        let mut hidden = 0;

        scan_paths(&[dir.path().to_path_buf()], &config(), &fake_probe, |facts| {
            if crate::stats::is_hidden(&facts.path) {
                hidden += 1;
            }
        })
        .unwrap();

        assert_eq!(hidden, 1);
    }

    #[test]
    fn test_scan_paths_single_file_root() {
        let dir = tree();
        let file = dir.path().join("album/01.mp3");
        let mut facts = Vec::new();

        let summary = scan_paths(&[file.clone()], &config(), &fake_probe, |f| facts.push(f)).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(facts[0].path, file);
        assert!(facts[0].is_audio_file());
    }

    #[test]
    fn test_scan_paths_excluded_root_is_still_scanned() {
        let dir = tree();
        let root = dir.path().join("node_modules");

        let summary = scan_paths(&[root], &config(), &fake_probe, |_| {}).unwrap();
        assert_eq!(summary.files, 1);
    }

    #[test]
    fn test_scan_paths_missing_root() {
        let dir = tree();
        let missing = dir.path().join("nope");
        let mut called = false;

        let result = scan_paths(
            &[dir.path().to_path_buf(), missing.clone()],
            &config(),
            &fake_probe,
            |_| called = true,
        );

        assert!(matches!(result, Err(StatsError::PathNotFound(p)) if p == missing));
        assert!(!called);
    }

    #[test]
    fn test_count_files_matches_scan() {
        let dir = tree();
        let paths = vec![dir.path().to_path_buf()];

        let counted = count_files(&paths, &config());
        let summary = scan_paths(&paths, &config(), &fake_probe, |_| {}).unwrap();

        assert_eq!(counted, 4);
        assert_eq!(counted, summary.files);
    }

    #[test]
    fn test_count_files_without_exclusions() {
        let dir = tree();
        let config = ScanConfig {
            exclude_patterns: Vec::new(),
            follow_links: false,
        };

        assert_eq!(count_files(&[dir.path().to_path_buf()], &config), 5);
    }
}

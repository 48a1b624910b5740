//! The `stats` command.
//!
//! Feeds every file through the collector and prints the report once the last
//! file has been observed. When stdout is redirected the files are counted
//! first so that a progress bar can be drawn on stderr.

use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::{Config, ScanConfig};
use crate::error::Result;
use crate::probe::{AudioProbe, LoftyProbe};
use crate::report::render;
use crate::scanner::{ScanSummary, count_files, scan_paths};
use crate::stats::{Collector, RunCounters};
use crate::tui::{DotProgress, ProgressMode, UI};

/// Scans `paths` and returns the final counters.
///
/// `on_file` is called once for every file scanned and `on_tagged` once for
/// every tagged audio file, both in scan order.
///
/// # Errors
///
/// Returns [`StatsError::PathNotFound`](crate::error::StatsError::PathNotFound)
/// if one of the paths does not exist.
pub fn collect_stats<P, G, F>(
    paths: &[PathBuf],
    config: &ScanConfig,
    probe: &P,
    mut on_file: G,
    on_tagged: F,
) -> Result<(RunCounters, ScanSummary)>
where
    P: AudioProbe + ?Sized,
    G: FnMut(),
    F: FnMut(),
{
    let mut collector = Collector::with_progress(on_tagged);
    let summary = scan_paths(paths, config, probe, |facts| {
        on_file();
        collector.observe(&facts);
    })?;

    Ok((collector.finish(), summary))
}

pub fn handle_stats(paths: &[PathBuf], progress: bool, config: &Config) -> color_eyre::Result<()> {
    let ui = UI::new().with_color_theme(config.ui.color.theme.clone());

    let mode = ProgressMode::select(
        progress && config.ui.progress,
        console::Term::stdout().is_term(),
        ui.term.is_term(),
    );

    let bar = if mode == ProgressMode::Bar {
        // Phase 1: Count files
        ui.print_info("Phase 1/2: Counting files")?;
        let spinner = ui.create_spinner("Walking directory tree...");
        let total_files = count_files(paths, &config.scan);
        spinner.finish_and_clear();
        ui.print_success(&format!("Discovered {} files", total_files))?;

        // Phase 2: Collect
        ui.print_info("Phase 2/2: Reading tags and bitrates")?;
        Some(ui.create_progress_bar(total_files, "Analyzing"))
    } else {
        None
    };

    let mut dots = DotProgress::new(mode == ProgressMode::Dots);
    let (counters, summary) = collect_stats(
        paths,
        &config.scan,
        &LoftyProbe,
        || {
            if let Some(pb) = &bar {
                pb.inc(1);
            }
        },
        || dots.tick(),
    )?;
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    dots.finish()?;
    info!(
        "Analyzed {} files, {} tagged audio",
        summary.files,
        counters.tagged()
    );

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render(&counters).as_bytes())?;
    stdout.flush()?;

    if !summary.errors.is_empty() {
        ui.print_warning(&format!(
            "{} path(s) skipped due to permission errors or I/O failures",
            summary.errors.len()
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use crate::probe::ProbeOutcome;
    use crate::stats::{AudioInfo, TagVersion};
    use std::fs;
    use std::path::Path;

    fn probe(path: &Path, _: &str) -> ProbeOutcome {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("tagged.mp3") => ProbeOutcome::Audio(AudioInfo {
                tag: Some(TagVersion::V2_4),
                variable_bit_rate: true,
                bitrate_kbps: 192,
            }),
            Some("untagged.mp3") => ProbeOutcome::Audio(AudioInfo {
                tag: None,
                variable_bit_rate: false,
                bitrate_kbps: 128,
            }),
            _ => ProbeOutcome::NotAudio,
        }
    }

    #[test]
    fn test_collect_stats() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tagged.mp3"), b"").unwrap();
        fs::write(dir.path().join("untagged.mp3"), b"").unwrap();
        fs::write(dir.path().join(".directory"), b"").unwrap();

        let mut files = 0;
        let mut ticks = 0;
        let (counters, summary) = collect_stats(
            &[dir.path().to_path_buf()],
            &ScanConfig::default(),
            &probe,
            || files += 1,
            || ticks += 1,
        )
        .unwrap();

        assert_eq!(files, 3);
        assert_eq!(ticks, 1);
        assert_eq!(summary.files, 3);
        assert_eq!(counters.file_totals.total, 3);
        assert_eq!(counters.file_totals.audio, 2);
        assert_eq!(counters.file_totals.hidden, 1);
        assert_eq!(counters.bitrate_modes.variable, 1);
        assert_eq!(counters.tag_version_count(TagVersion::V2_4), 1);
        assert_eq!(counters.mimetypes["audio/mpeg"], 2);
        assert_eq!(counters.mimetypes["unknown"], 1);
    }

    #[test]
    fn test_collect_stats_missing_path() {
        let result = collect_stats(
            &[PathBuf::from("/no/such/music")],
            &ScanConfig::default(),
            &probe,
            || {},
            || {},
        );

        assert!(matches!(result, Err(StatsError::PathNotFound(_))));
    }

    #[test]
    fn test_collect_stats_file_hook_matches_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        fs::write(dir.path().join("album/tagged.mp3"), b"").unwrap();
        fs::write(dir.path().join("album/cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        let paths = [dir.path().to_path_buf()];
        let config = ScanConfig::default();

        let mut files = 0;
        collect_stats(&paths, &config, &probe, || files += 1, || {}).unwrap();

        assert_eq!(files, count_files(&paths, &config));
        assert_eq!(files, 3);
    }
}

//! Statistics report rendering.
//!
//! Turns the final [`RunCounters`] of a run into the plain-text summary printed
//! on stdout. Rendering is pure: the same counters always give the same text.

use crate::stats::RunCounters;

/// Placeholder for a percentage whose denominator is zero.
pub const NOT_APPLICABLE: &str = "n/a";

/// Formats `count` as a percentage of `whole` with two decimals.
///
/// Returns [`NOT_APPLICABLE`] when `whole` is zero.
pub fn percent(count: u64, whole: u64) -> String {
    if whole == 0 {
        return NOT_APPLICABLE.to_string();
    }
    format!("{:.2}%", count as f64 / whole as f64 * 100.0)
}

/// Renders the statistics report.
///
/// The headline is always present. When no files were scanned nothing else
/// follows. When files were scanned but none of them were audio, the bitrate
/// and tag version sections still list their (zero) counts with `n/a` in
/// place of percentages.
///
/// # Examples
///
/// ```
/// use audiostat::report::render;
/// use audiostat::stats::RunCounters;
///
/// let report = render(&RunCounters::new());
/// assert_eq!(report, "Analyzed 0 files (0 audio, 0 non-audio, 0 hidden)\n");
/// ```
pub fn render(counters: &RunCounters) -> String {
    let totals = &counters.file_totals;
    let mut content = String::new();

    content.push_str(&format!(
        "Analyzed {} files ({} audio, {} non-audio, {} hidden)\n",
        totals.total,
        totals.audio,
        counters.non_audio(),
        totals.hidden
    ));

    if totals.total == 0 {
        return content;
    }

    content.push_str("\nMime-types:\n");
    for (mimetype, count) in &counters.mimetypes {
        content.push_str(&format!(
            "\t{:<12}:{:>8} ({})\n",
            mimetype,
            count,
            percent(*count, totals.total)
        ));
    }

    content.push_str("\nMP3 bitrates:\n");
    for (label, count) in [
        ("cbr", counters.bitrate_modes.constant),
        ("vbr", counters.bitrate_modes.variable),
    ] {
        content.push_str(&format!(
            "\t{}   : {} \t{}\n",
            label,
            count,
            percent(count, totals.audio)
        ));
    }
    for (band, count) in counters.bitrate_bands() {
        content.push_str(&format!(
            "\t{} : {} \t{}\n",
            band,
            count,
            percent(count, totals.audio)
        ));
    }

    content.push_str("\nID3 versions:\n");
    for (version, count) in counters.tag_versions() {
        content.push_str(&format!(
            "\t{} : {} \t{}\n",
            version,
            count,
            percent(count, totals.audio)
        ));
    }

    content
}

//! Terminal output helpers.
//!
//! Status lines and spinners go to stderr so that stdout carries nothing but
//! the progress dots and the final report.

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;

pub struct UI {
    pub term: Term,
    pub color_theme: String,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            color_theme: "default".to_string(),
        }
    }

    pub fn with_color_theme(mut self, theme: String) -> Self {
        self.color_theme = theme;
        self
    }

    /// Returns (info_style, warning_style, success_style) for the theme
    fn get_status_styles(&self) -> (Style, Style, Style) {
        match self.color_theme.as_str() {
            "cyan" => (
                Style::new().cyan(),
                Style::new().color256(51),
                Style::new().color256(123),
            ),
            "magenta" => (
                Style::new().magenta(),
                Style::new().color256(201),
                Style::new().color256(213),
            ),
            "yellow" => (
                Style::new().yellow(),
                Style::new().color256(226),
                Style::new().color256(227),
            ),
            "green" => (
                Style::new().green(),
                Style::new().color256(46),
                Style::new().color256(120),
            ),
            "red" => (
                Style::new().red(),
                Style::new().color256(196),
                Style::new().color256(210),
            ),
            "blue" => (
                Style::new().blue(),
                Style::new().color256(39),
                Style::new().color256(117),
            ),
            _ => (
                Style::new().white(),
                Style::new().color256(255),
                Style::new().color256(255),
            ),
        }
    }

    fn get_spinner_color(&self) -> &str {
        match self.color_theme.as_str() {
            "cyan" => ".cyan",
            "magenta" => ".magenta",
            "yellow" => ".yellow",
            "green" => ".green",
            "red" => ".red",
            "blue" => ".blue",
            _ => ".white",
        }
    }

    fn get_bar_color(&self) -> &str {
        match self.color_theme.as_str() {
            "cyan" => "bright_cyan",
            "magenta" => "bright_magenta",
            "yellow" => "bright_yellow",
            "green" => "bright_green",
            "red" => "bright_red",
            "blue" => "bright_blue",
            _ => "bright_white",
        }
    }

    /// Create a spinner for phases without a known length
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let template = format!("{{spinner:{}}} {{msg}}", self.get_spinner_color());
        if let Ok(style) = ProgressStyle::default_spinner().template(&template) {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Create a progress bar sized to the pre-counted number of files
    pub fn create_progress_bar(&self, total: u64, message: &str) -> ProgressBar {
        let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        let template = format!(
            "{{spinner:{}}} {{bar:40.{1}/{1}}} {{pos}}/{{len}} ({{percent}}%) {{msg}}",
            self.get_spinner_color(),
            self.get_bar_color()
        );
        if let Ok(style) = ProgressStyle::default_bar().template(&template) {
            pb.set_style(style.progress_chars("█ ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    fn print_status(&self, tag: &str, style: &Style, message: &str) -> io::Result<()> {
        let white_bold = Style::new().white().bold();
        self.term.write_line(&format!(
            "{} {}",
            style.apply_to(tag).bold(),
            white_bold.apply_to(message)
        ))
    }

    pub fn print_info(&self, message: &str) -> io::Result<()> {
        let (info_style, _, _) = self.get_status_styles();
        self.print_status("[*]", &info_style, message)
    }

    pub fn print_success(&self, message: &str) -> io::Result<()> {
        let (_, _, success_style) = self.get_status_styles();
        self.print_status("[✓]", &success_style, message)
    }

    pub fn print_warning(&self, message: &str) -> io::Result<()> {
        let (_, warning_style, _) = self.get_status_styles();
        self.print_status("[!] WARNING:", &warning_style, message)
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

/// How scan progress is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// A dot on stdout per tagged audio file.
    Dots,
    /// A counted progress bar on stderr, used when stdout is redirected.
    Bar,
    Off,
}

impl ProgressMode {
    pub fn select(enabled: bool, stdout_is_term: bool, stderr_is_term: bool) -> Self {
        match (enabled, stdout_is_term, stderr_is_term) {
            (false, _, _) => ProgressMode::Off,
            (true, true, _) => ProgressMode::Dots,
            (true, false, true) => ProgressMode::Bar,
            (true, false, false) => ProgressMode::Off,
        }
    }
}

/// One `.` on stdout per tagged audio file, written unbuffered.
pub struct DotProgress {
    term: Term,
    enabled: bool,
    dots: u64,
}

impl DotProgress {
    /// Dots are only drawn when `enabled` and stdout is a terminal.
    pub fn new(enabled: bool) -> Self {
        let term = Term::stdout();
        let enabled = enabled && term.is_term();
        Self {
            term,
            enabled,
            dots: 0,
        }
    }

    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        // A failed write to the terminal only loses a dot
        if self.term.write_str(".").is_ok() {
            self.dots += 1;
        }
    }

    /// Ends the dot line so the report starts on a fresh line.
    pub fn finish(&self) -> io::Result<()> {
        if self.dots > 0 {
            self.term.write_line("")?;
        }
        Ok(())
    }
}

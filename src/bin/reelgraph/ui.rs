use std::fmt::Display;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use nu_ansi_term::{Color, Style};
use reelgraph::model::{Movie, Person};

pub struct Ui {
    palette: Palette,
    paint: bool,
    quiet: bool,
    spinner_style: ProgressStyle,
}

impl Ui {
    /// Styled output when stdout is a terminal; `quiet` suppresses all
    /// decoration and the spinner.
    pub fn new(quiet: bool) -> Self {
        let paint = std::io::stdout().is_terminal() && !quiet;

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        let palette = if paint {
            Palette::dark()
        } else {
            Palette::plain()
        };
        let spinner_style = ProgressStyle::with_template("{prefix} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

        Self {
            palette,
            paint,
            quiet,
            spinner_style,
        }
    }

    pub fn movie(&self, movie: &Movie) {
        self.heading(&movie.title);
        let details: Vec<(&str, String)> = [
            ("released", movie.released.map(|year| year.to_string())),
            ("tagline", movie.tagline.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect();
        self.section(details);
        if movie.cast.is_empty() {
            println!("  {}", self.palette.muted.paint("no cast"));
            return;
        }
        let bullet = if self.paint { "•" } else { "-" };
        for person in &movie.cast {
            println!("  {} {}", self.palette.bullet.paint(bullet), self.person(person));
        }
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {message}", self.palette.info.paint(INFO_ICON));
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {message}", self.palette.warn.paint(WARNING_ICON));
    }

    pub fn task(&self, label: impl Into<String>) -> TaskGuard<'_> {
        let label = label.into();
        let pb = if self.quiet {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(self.spinner_style.clone());
            pb.set_prefix(self.palette.info.paint(PROGRESS_ICON).to_string());
            pb.set_message(label.clone());
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        };
        TaskGuard {
            ui: self,
            label,
            start: Instant::now(),
            finished: false,
            pb,
        }
    }

    fn person(&self, person: &Person) -> String {
        let name = self.palette.value.paint(&person.name);
        let job = self.palette.key.paint(&person.job);
        match person.role.as_deref() {
            Some(roles) if !roles.is_empty() => format!("{name} ({job}: {})", roles.join(", ")),
            _ => format!("{name} ({job})"),
        }
    }

    fn section<K: Display, V: Display>(&self, rows: Vec<(K, V)>) {
        for (key, value) in rows {
            println!(
                "  {} {}",
                self.palette.key.paint(format!("{key}:")),
                self.palette.value.paint(value.to_string())
            );
        }
    }

    fn heading(&self, title: &str) {
        println!(
            "{}",
            self.palette.heading.paint(format!("{HEADING_ICON} {title}"))
        );
    }
}

pub struct TaskGuard<'a> {
    ui: &'a Ui,
    label: String,
    start: Instant,
    finished: bool,
    pb: Option<ProgressBar>,
}

impl TaskGuard<'_> {
    pub fn finish(mut self) -> Duration {
        self.finished = true;
        let elapsed = self.start.elapsed();
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
        elapsed
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
        if !self.ui.quiet {
            let elapsed = format_duration(self.start.elapsed());
            self.ui.warn(&format!("{} failed after {elapsed}", self.label));
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{:.0}ms", duration.as_secs_f64() * 1_000.0)
    }
}

struct Palette {
    heading: Style,
    key: Style,
    value: Style,
    bullet: Style,
    muted: Style,
    info: Style,
    warn: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            heading: Style::new().fg(Color::Purple).bold(),
            key: Style::new().fg(Color::LightBlue).bold(),
            value: Style::new().fg(Color::White),
            bullet: Style::new().fg(Color::LightBlue),
            muted: Style::new().fg(Color::DarkGray).italic(),
            info: Style::new().fg(Color::LightCyan),
            warn: Style::new().fg(Color::Yellow).bold(),
        }
    }

    fn plain() -> Self {
        Self {
            heading: Style::new(),
            key: Style::new(),
            value: Style::new(),
            bullet: Style::new(),
            muted: Style::new(),
            info: Style::new(),
            warn: Style::new(),
        }
    }
}

const HEADING_ICON: &str = "▸";
const WARNING_ICON: &str = "⚠";
const INFO_ICON: &str = "ℹ";
const PROGRESS_ICON: &str = "▶";

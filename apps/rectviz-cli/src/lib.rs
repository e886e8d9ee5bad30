//! Shared plumbing for the `plot-rectangles` and `step-visualizer` binaries:
//! argument checking, logging setup and the two program flows.

use std::ffi::OsString;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use rectviz_io::{LoadError, RenderSettings};
use rectviz_renderer::{render_svg, static_plot, FigureSize, StepVisualizer};

/// Wrong number of arguments.
pub const EXIT_USAGE: u8 = 1;
/// Input could not be loaded or the figure could not be written.
pub const EXIT_FAILURE: u8 = 2;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to render figure")]
    Render(#[from] fmt::Error),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} <path_to_json>")
}

/// The single input path, or the usage line when the argument count is wrong.
/// Paths need not be valid UTF-8.
pub fn input_path<I, T>(args: I) -> Result<PathBuf, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args
        .next()
        .map_or_else(|| "rectviz".to_string(), |p| p.to_string_lossy().into_owned());
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(PathBuf::from(path)),
        _ => Err(usage(&program)),
    }
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Render the rectangles in `input` and return where the figure went.
pub fn plot_rectangles(input: &Path, settings: &RenderSettings) -> Result<PathBuf, CliError> {
    let set = rectviz_io::load_rectangles(input)?;
    let scene = static_plot::build_scene(&set);
    let svg = render_svg(&scene, &settings.static_figure())?;
    let output = rectviz_io::output_path_for(input, settings);
    rectviz_io::write_figure(&output, &svg)?;
    Ok(output)
}

/// One line of step visualizer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Zero-based step index, typed one-based.
    GoTo(usize),
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(Command::Next),
            "p" | "prev" | "previous" => Some(Command::Previous),
            "q" | "quit" => Some(Command::Quit),
            _ => match line.parse::<usize>() {
                Ok(number) if number >= 1 => Some(Command::GoTo(number - 1)),
                _ => None,
            },
        }
    }
}

/// A step visualizer bound to the SVG file it redraws.
pub struct StepSession {
    visualizer: StepVisualizer,
    output: PathBuf,
    figure: FigureSize,
}

impl StepSession {
    pub fn open(input: &Path, settings: &RenderSettings) -> Result<Self, CliError> {
        let steps = rectviz_io::load_steps(input)?;
        Ok(Self {
            visualizer: StepVisualizer::new(steps),
            output: rectviz_io::output_path_for(input, settings),
            figure: settings.step_figure(),
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn visualizer(&self) -> &StepVisualizer {
        &self.visualizer
    }

    /// Rewrite the figure for the current step.
    pub fn redraw(&self) -> Result<(), CliError> {
        let svg = render_svg(&self.visualizer.scene(), &self.figure)?;
        rectviz_io::write_figure(&self.output, &svg)?;
        log::info!(
            "showing step {} of {}",
            self.visualizer.current_step() + 1,
            self.visualizer.len()
        );
        Ok(())
    }

    /// Apply a navigation command. Returns whether the current step changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Next => self.visualizer.next_step(),
            Command::Previous => self.visualizer.previous_step(),
            Command::GoTo(index) => self.visualizer.go_to(index),
            Command::Quit => false,
        }
    }

    fn announce<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Step {}/{}: {}",
            self.visualizer.current_step() + 1,
            self.visualizer.len(),
            self.visualizer.description()
        )
    }

    /// Draw the first step, then follow commands from `input` until `q` or
    /// end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<(), CliError> {
        self.redraw()?;
        writeln!(out, "Figure: {}", self.output.display())?;
        self.announce(&mut out)?;

        for line in input.lines() {
            let line = line?;
            let Some(command) = Command::parse(&line) else {
                log::warn!("ignoring '{}', use n, p, a step number or q", line.trim());
                continue;
            };
            if command == Command::Quit {
                break;
            }
            if self.apply(command) {
                self.redraw()?;
                self.announce(&mut out)?;
            } else {
                log::info!(
                    "staying on step {} of {}",
                    self.visualizer.current_step() + 1,
                    self.visualizer.len()
                );
            }
        }
        Ok(())
    }
}

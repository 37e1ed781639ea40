//! `clusterscope` terminal front end.
//!
//! Reads commands from stdin, runs backend calls on a worker thread, and
//! prints notifications and control state as they change. With `--svg`, the
//! settled scene is written to disk after every visual change.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use clap::Parser;
use clusterscope::backend::http::HttpBackend;
use clusterscope::backend::worker::RequestWorker;
use clusterscope::error::ScopeError;
use clusterscope::options::Options;
use clusterscope::scene::svg;
use clusterscope::session::{Session, Step};
use web_time::Instant;

/// Event loop period while waiting for input or replies.
const TICK: Duration = Duration::from_millis(50);

const HELP: &str = "\
commands:
  generate        fetch a new dataset
  run [k]         run k-means (default k from options)
  next            step to the next iteration
  status          show controls and status
  save <path>     write the current frame as SVG
  help            this text
  quit            exit";

/// Step through k-means iterations served by a clustering backend.
#[derive(Parser)]
#[command(name = "clusterscope", version, about)]
struct Cli {
    /// TOML options file.
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Backend base URL, overriding the options file.
    #[arg(long)]
    base_url: Option<String>,

    /// Cluster count used by `run` without an argument.
    #[arg(short)]
    k: Option<usize>,

    /// Write the settled scene to this SVG file after every change.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the effective options, overrides included, to this TOML file.
    #[arg(long, value_name = "PATH")]
    save_options: Option<PathBuf>,

    /// Print the options JSON Schema and exit.
    #[arg(long)]
    print_schema: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Generate,
    Run(Option<String>),
    Next,
    Status,
    Save(PathBuf),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments: {line:?}"));
    }
    let command = match (head, arg) {
        ("generate" | "g", None) => Command::Generate,
        ("run" | "r", k) => Command::Run(k.map(str::to_owned)),
        ("next" | "n", None) => Command::Next,
        ("status" | "s", None) => Command::Status,
        ("save", Some(path)) => Command::Save(PathBuf::from(path)),
        ("help" | "h" | "?", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        _ => return Err(format!("unknown command {line:?}; type `help`")),
    };
    Ok(Some(command))
}

fn spawn_stdin_reader() -> Result<mpsc::Receiver<String>, ScopeError> {
    let (tx, rx) = mpsc::channel();
    let _ = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(ScopeError::ThreadSpawn)?;
    Ok(rx)
}

/// Swallow recoverable workflow errors; the session already queued a
/// notification for them.
fn settle<T>(result: Result<T, ScopeError>) -> Result<(), ScopeError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_recoverable() => Ok(()),
        Err(e) => Err(e),
    }
}

fn write_svg(
    session: &Session,
    options: &Options,
    path: &Path,
    now: Instant,
) -> Result<(), ScopeError> {
    let document = svg::render(&session.frame(now), &options.chart);
    std::fs::write(path, document)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

struct App {
    options: Options,
    session: Session,
    worker: RequestWorker,
    svg_path: Option<PathBuf>,
}

impl App {
    fn execute(
        &mut self,
        command: Command,
        out: &mut impl Write,
    ) -> Result<(), ScopeError> {
        match command {
            Command::Generate => {
                settle(self.session.request_generate(&self.worker))
            }
            Command::Run(k) => {
                let input = k.unwrap_or_else(|| {
                    self.options.playback.default_k.to_string()
                });
                settle(self.session.request_run(&self.worker, &input))
            }
            Command::Next => {
                if !self.session.affordances().advance.enabled {
                    writeln!(out, "Next Step is disabled.")?;
                    return Ok(());
                }
                if let Step::Advanced { iteration, .. } =
                    self.session.advance(Instant::now())?
                {
                    log::debug!("showing iteration {iteration}");
                }
                Ok(())
            }
            Command::Status => {
                writeln!(out, "{}", self.session.affordances())?;
                Ok(())
            }
            Command::Save(path) => {
                write_svg(&self.session, &self.options, &path, Instant::now())?;
                writeln!(out, "saved {}", path.display())?;
                Ok(())
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    /// Export the scene once its transitions have finished.
    fn export_if_settled(&mut self, now: Instant) -> Result<(), ScopeError> {
        let Some(path) = &self.svg_path else {
            return Ok(());
        };
        let scene = self.session.scene();
        if scene.is_dirty() && !scene.is_animating(now) {
            write_svg(&self.session, &self.options, path, now)?;
            self.session.scene_mut().mark_rendered();
        }
        Ok(())
    }

    fn event_loop(&mut self, lines: &mpsc::Receiver<String>) -> Result<(), ScopeError> {
        let mut out = io::stdout().lock();
        let mut shown = self.session.affordances();
        writeln!(out, "{shown}")?;

        loop {
            match lines.recv_timeout(TICK) {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        if let Err(e) = self.execute(command, &mut out) {
                            if !e.is_recoverable() {
                                return Err(e);
                            }
                            writeln!(out, "error: {e}")?;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => writeln!(out, "{msg}")?,
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let _ = self.session.pump(&self.worker, now)?;
            for notification in self.session.drain_notifications() {
                writeln!(out, "{notification}")?;
            }
            let current = self.session.affordances();
            if current != shown {
                writeln!(out, "{current}")?;
                shown = current;
            }
            if let Err(e) = self.export_if_settled(now) {
                log::warn!("SVG export failed: {e}");
            }
        }
        Ok(())
    }
}

/// Options file (or defaults) with command-line overrides applied.
fn resolve_options(cli: &Cli) -> Result<Options, ScopeError> {
    let mut options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(url) = &cli.base_url {
        options.backend.base_url.clone_from(url);
    }
    if let Some(k) = cli.k {
        options.playback.default_k = k;
    }
    Ok(options)
}

fn run(cli: Cli) -> Result<(), ScopeError> {
    let options = resolve_options(&cli)?;
    if let Some(path) = &cli.save_options {
        options.save(path)?;
        log::info!("saved options to {}", path.display());
    }

    if cli.print_schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())
            .map_err(|e| ScopeError::OptionsParse(e.to_string()))?;
        writeln!(io::stdout(), "{schema}")?;
        return Ok(());
    }

    log::info!("backend at {}", options.backend.base_url);
    let worker = RequestWorker::spawn(HttpBackend::new(&options.backend))
        .map_err(ScopeError::ThreadSpawn)?;
    let lines = spawn_stdin_reader()?;

    let mut app = App {
        session: Session::new(&options),
        options,
        worker,
        svg_path: cli.svg,
    };
    app.event_loop(&lines)
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_command("generate"), Ok(Some(Command::Generate)));
        assert_eq!(parse_command("  g  "), Ok(Some(Command::Generate)));
        assert_eq!(parse_command("run"), Ok(Some(Command::Run(None))));
        assert_eq!(
            parse_command("run 4"),
            Ok(Some(Command::Run(Some("4".to_owned()))))
        );
        assert_eq!(parse_command("n"), Ok(Some(Command::Next)));
        assert_eq!(
            parse_command("save out.svg"),
            Ok(Some(Command::Save(PathBuf::from("out.svg"))))
        );
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_command("save").is_err());
        assert!(parse_command("next 2").is_err());
        assert!(parse_command("run 1 2").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn recoverable_errors_are_settled() {
        assert!(settle::<()>(Err(ScopeError::NoDataset)).is_ok());
        let fatal = ScopeError::Playback(
            clusterscope::playback::PlaybackError::InvalidTransition {
                operation: "load_run",
                reason: "no dataset loaded",
            },
        );
        assert!(settle::<()>(Err(fatal)).is_err());
    }

    #[test]
    fn cli_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "clusterscope",
            "--base-url",
            "http://localhost:8080",
            "-k",
            "5",
            "--svg",
            "scene.svg",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.k, Some(5));
        assert_eq!(cli.svg, Some(PathBuf::from("scene.svg")));
        assert_eq!(cli.save_options, None);
        assert!(!cli.print_schema);
    }

    #[test]
    fn saved_options_include_overrides() {
        let dir = std::env::temp_dir()
            .join(format!("clusterscope-cli-{}", std::process::id()));
        let path = dir.join("effective.toml");
        let cli = Cli::try_parse_from([
            "clusterscope",
            "-k",
            "7",
            "--base-url",
            "http://backend:9000",
            "--save-options",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli.save_options.as_deref(), Some(path.as_path()));

        let options = resolve_options(&cli).unwrap();
        options.save(&path).unwrap();
        let reloaded = Options::load(&path).unwrap();
        assert_eq!(reloaded.playback.default_k, 7);
        assert_eq!(reloaded.backend.base_url, "http://backend:9000");
        assert_eq!(reloaded, options);

        let from_file = Cli::try_parse_from([
            "clusterscope",
            "--options",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(resolve_options(&from_file).unwrap(), options);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

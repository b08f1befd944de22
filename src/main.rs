//! Terminal host for the geoform core.
//!
//! Stands in for the browser: reads line commands from stdin, feeds them to
//! the runtime as form, map and URL events, plays the map widget against a
//! headless viewport and prints the form after every change.
//!
//! # Usage
//!
//! ```text
//! geoform [--config <file.toml>] [--url <path>] [key=value ...]
//! ```
//!
//! `--config` takes precedence over `key=value` pairs; see `Config::from_map`
//! for the keys.
//!
//! # Commands
//!
//! - `type <field> <text>`: focus a field and type into it
//! - `enter <field>` / `escape <field>`: commit or cancel the edit
//! - `focus <field>`
//! - `pick <n>`: choose candidate `n` (1-based)
//! - `pan <lon> <lat> [zoom]`: drag the map
//! - `click <lon> <lat>`: click the map
//! - `go <url>`, `back`, `forward`: navigate
//! - `dismiss`: close the toast
//! - `show`, `quit`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use crossbeam_channel::{select, Receiver};
use geoform::domain::Geometry;
use geoform::geocode::NominatimClient;
use geoform::map::{self, MapCommand, MapEndpoint, Viewport};
use geoform::router::MemoryHistory;
use geoform::worker::WorkerResponse;
use geoform::{observability, Config, Event, FieldId, KeyCode, Result, Runtime};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("geoform: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Command line of the terminal host.
#[derive(Debug, Parser)]
#[command(name = "geoform", version, about = "Place/coordinate form driven from the terminal")]
struct Args {
    /// TOML configuration file; takes precedence over key=value settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL to open first
    #[arg(long, default_value = "/")]
    url: String,

    /// Settings as key=value (service_url, locale, default_lon, ...)
    #[arg(value_parser = parse_setting)]
    settings: Vec<(String, String)>,
}

fn parse_setting(text: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {text:?}"))?;
    Ok((key.to_string(), value.to_string()))
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_toml_file(path)?,
        None => {
            let settings: BTreeMap<String, String> = args.settings.iter().cloned().collect();
            let config = Config::from_map(&settings);
            config.validate()?;
            config
        }
    };
    observability::init_tracing(&config);

    let span = tracing::debug_span!("host_run");
    let _guard = span.entered();
    tracing::debug!(service_url = %config.service_url, url = %args.url, "starting");

    let (port, endpoint) = map::channel();
    let mut runtime = geoform::launch(
        &config,
        NominatimClient::new(&config),
        Box::new(MemoryHistory::new(args.url.clone())),
        port,
    )?;
    let mut widget = HeadlessMap::new(endpoint);
    let responses = runtime.context().worker.responses().clone();
    let lines = spawn_stdin_reader()?;

    runtime.start();
    settle(&mut runtime, &mut widget);
    print_view(&mut runtime);

    loop {
        let incoming = select! {
            recv(lines) -> line => line.ok().map(Incoming::Line),
            recv(responses) -> response => response.ok().map(Incoming::Response),
        };

        match incoming {
            Some(Incoming::Line(line)) => match execute_command(&mut runtime, &mut widget, line.trim()) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(message) => eprintln!("{message}"),
            },
            Some(Incoming::Response(response)) => {
                runtime.dispatch(response.into());
            }
            None => break,
        }
        settle(&mut runtime, &mut widget);
        print_view(&mut runtime);
    }

    tracing::debug!("host exiting");
    Ok(())
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Lets the map execute queued commands and feeds its reports back until
/// both sides are quiet.
fn settle(runtime: &mut Runtime, widget: &mut HeadlessMap) {
    loop {
        widget.execute_pending();
        if !runtime.pump() {
            break;
        }
    }
}

fn print_view(runtime: &mut Runtime) {
    for toast in runtime.context_mut().take_toasts() {
        tracing::trace!(toast = %toast, "toast shown");
    }
    println!("{}", geoform::ui::render(runtime.state()));
}

enum Incoming {
    Line(String),
    Response(WorkerResponse),
}

enum Flow {
    Continue,
    Quit,
}

fn execute_command(
    runtime: &mut Runtime,
    widget: &mut HeadlessMap,
    line: &str,
) -> std::result::Result<Flow, String> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" | "show" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "type" => {
            let (field, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let field: FieldId = field.parse()?;
            if !runtime.state().field(field).focused {
                runtime.dispatch(Event::FieldFocus(field));
            }
            runtime.dispatch(Event::FieldInput(field, text.to_string()));
        }
        "focus" => {
            runtime.dispatch(Event::FieldFocus(rest.parse()?));
        }
        "enter" => {
            runtime.dispatch(Event::FieldKeyPress(rest.parse()?, KeyCode::Enter));
        }
        "escape" => {
            runtime.dispatch(Event::FieldKeyPress(rest.parse()?, KeyCode::Escape));
        }
        "pick" => {
            let n: usize = rest.parse().map_err(|_| format!("not a candidate number: {rest:?}"))?;
            runtime.dispatch(Event::CandidateSelected(n.saturating_sub(1)));
        }
        "pan" => {
            let numbers = parse_numbers(rest)?;
            let (lon, lat, zoom) = match numbers.as_slice() {
                [lon, lat] => (*lon, *lat, runtime.state().zoom),
                [lon, lat, zoom] => (*lon, *lat, *zoom),
                _ => return Err("usage: pan <lon> <lat> [zoom]".to_string()),
            };
            widget.user_moved(Viewport::new(lon, lat, zoom));
        }
        "click" => match parse_numbers(rest)?.as_slice() {
            [lon, lat] => widget.user_clicked(*lon, *lat),
            _ => return Err("usage: click <lon> <lat>".to_string()),
        },
        "go" => {
            runtime.visit(rest);
        }
        "back" => {
            runtime.back();
        }
        "forward" => {
            runtime.forward();
        }
        "dismiss" => {
            runtime.dispatch(Event::ToastDismissed);
        }
        other => return Err(format!("unknown command {other:?}")),
    }
    Ok(Flow::Continue)
}

fn parse_numbers(text: &str) -> std::result::Result<Vec<f64>, String> {
    text.split_whitespace()
        .map(|n| n.parse::<f64>().map_err(|_| format!("not a number: {n:?}")))
        .collect()
}

/// Map widget stand-in: tracks a viewport and prints what it is told.
struct HeadlessMap {
    endpoint: MapEndpoint,
    viewport: Option<Viewport>,
}

impl HeadlessMap {
    const fn new(endpoint: MapEndpoint) -> Self {
        Self {
            endpoint,
            viewport: None,
        }
    }

    /// Runs every queued command; programmatic moves end with a move-end
    /// report the endpoint's guard swallows.
    fn execute_pending(&mut self) {
        while let Some(command) = self.endpoint.next_command() {
            match command {
                MapCommand::Fly {
                    target,
                    geometry,
                    animation,
                } => {
                    println!(
                        "[map] fly to {}, {} at zoom {} ({} ms){}",
                        target.lon,
                        target.lat,
                        target.zoom,
                        animation.duration_ms,
                        geometry.map_or_else(String::new, |g| format!(", outlining {}", describe(&g)))
                    );
                    self.finish_move(target);
                }
                MapCommand::Fit { geometry } => {
                    let zoom = self.viewport.map_or(0.0, |v| v.zoom);
                    let target = geometry
                        .bounds()
                        .map_or(Viewport::new(0.0, 0.0, zoom), |b| {
                            let [lon, lat] = b.center();
                            Viewport::new(lon, lat, zoom)
                        });
                    println!("[map] fit {}", describe(&geometry));
                    self.finish_move(target);
                }
                MapCommand::SelectText { element_id } => {
                    println!("[map] select text of #{element_id}");
                }
            }
        }
    }

    fn finish_move(&mut self, target: Viewport) {
        self.viewport = Some(target);
        self.endpoint.move_ended(target.lon, target.lat, target.zoom);
    }

    fn user_moved(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.endpoint.move_ended(viewport.lon, viewport.lat, viewport.zoom);
    }

    fn user_clicked(&self, lon: f64, lat: f64) {
        self.endpoint.clicked(lon, lat);
    }
}

fn describe(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "point",
        Geometry::MultiPoint(_) => "points",
        Geometry::LineString(_) | Geometry::MultiLineString(_) => "line",
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => "area",
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, Level};

use orch::config::OrchestratorConfig;
use orch::dispatch::{self, Dispatcher, Function};
use orch::export::{self, Composition, ExportFormat};
use orch::harmony::{chord_table, form, Complexity, GenerationRequest, ProgressionGenerator, Style, AVAILABLE_KEYS};
use orch::voicing::voice_progression;

/// ORCH - Harmonic progression generator and chamber voicing engine
#[derive(Parser)]
#[command(name = "orch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (YAML, or TOML with a .toml extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a harmonic progression
    Generate {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Voice a progression read as JSON from a file or stdin
    Voice {
        /// Progression JSON (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate, voice and export a composition
    Export {
        /// Output format (musicxml, midi, pdf)
        #[arg(short, long, default_value = "musicxml", value_parser = ["musicxml", "midi", "pdf"])]
        format: String,

        /// Output file (default: <title>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Composition title
        #[arg(long)]
        title: Option<String>,

        /// Tempo in BPM
        #[arg(long)]
        tempo: Option<f64>,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Call a function by name with JSON parameters from stdin
    Call {
        /// Function name (e.g. generate_harmonic_progression)
        function: String,
    },

    /// Answer line-delimited JSON calls on stdin/stdout
    Serve,

    /// List keys, forms, styles, chord vocabulary and callable functions
    List,
}

/// Generation fields that override configured defaults
#[derive(Args, Debug, Default)]
struct RequestArgs {
    /// Key (e.g. C, Eb, F, G)
    #[arg(short, long)]
    key: Option<String>,

    /// Song form (AABA, ABAC, "16 bars", "32 bars")
    #[arg(long)]
    form: Option<String>,

    /// Style (Jazz Pop, Bossa Nova, ECM Style, Rubato)
    #[arg(short, long)]
    style: Option<String>,

    /// Complexity (simple, medium, complex, advanced)
    #[arg(long, value_parser = parse_complexity)]
    complexity: Option<Complexity>,

    /// Seed for reproducible template choice
    #[arg(long)]
    seed: Option<u64>,
}

impl RequestArgs {
    fn apply(&self, mut request: GenerationRequest) -> GenerationRequest {
        if let Some(key) = &self.key {
            request.key = key.clone();
        }
        if let Some(form) = &self.form {
            request.form = form.clone();
        }
        if let Some(style) = &self.style {
            request.style = style.clone();
        }
        if let Some(complexity) = self.complexity {
            request.complexity = complexity;
        }
        if self.seed.is_some() {
            request.seed = self.seed;
        }
        request
    }
}

fn parse_complexity(s: &str) -> std::result::Result<Complexity, String> {
    Complexity::from_name(s).ok_or_else(|| format!("unknown complexity '{}'", s))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout carries JSON results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<OrchestratorConfig> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            OrchestratorConfig::load(path)?
        }
        None => OrchestratorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {:?}", path))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Accept a bare measure list or any object carrying a `progression` list
fn voicing_params(input: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;
    if value.is_array() {
        return Ok(json!({ "progression": value }));
    }
    if value.get("progression").is_none() {
        bail!("Expected a progression list or an object with a \"progression\" field");
    }
    Ok(value)
}

fn run_export(
    config: &OrchestratorConfig,
    format: &str,
    output: Option<PathBuf>,
    title: Option<String>,
    tempo: Option<f64>,
    request: &RequestArgs,
) -> Result<()> {
    let format = ExportFormat::from_name(format).ok_or_else(|| anyhow!("Unknown format: {}", format))?;
    let request = request.apply(config.defaults.request());

    let progression = ProgressionGenerator::for_request(&request).generate(&request);
    let voiced = voice_progression(&progression.progression)?;

    let composition = Composition {
        title: title.unwrap_or_else(|| config.defaults.title.clone()),
        key: request.key.clone(),
        form: request.form.clone(),
        style: request.style.clone(),
        tempo: tempo.unwrap_or(config.defaults.tempo),
        measures: voiced.voicings,
    };

    let exporter = export::exporter_for(format, config.export.midi_exporter());
    let result = export::export(exporter.as_ref(), &composition);
    if !result.success {
        bail!(
            "Export failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    let path = output.unwrap_or_else(|| PathBuf::from(&result.filename));
    fs::write(&path, result.bytes()?)
        .with_context(|| format!("Failed to write output file: {:?}", path))?;
    info!(path = %path.display(), %format, measures = composition.measures.len(), "wrote score");
    println!("{}", path.display());
    Ok(())
}

fn list() {
    println!("Keys:   {}", AVAILABLE_KEYS.join(", "));
    println!("Forms:  {}", form::available_forms().join(", "));
    let styles: Vec<&str> = Style::ALL.iter().map(|s| s.name()).collect();
    println!("Styles: {}", styles.join(", "));
    println!();
    println!("Chord vocabulary:");
    for (family, symbols) in chord_table::FAMILIES {
        println!("  {:<12} {}", family, symbols.join(" "));
    }
    println!();
    println!("Functions:");
    for function in Function::ALL {
        println!("  {}", function.name());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Generate { request } => {
            let request = request.apply(config.defaults.request());
            let progression = ProgressionGenerator::for_request(&request).generate(&request);
            print_json(&serde_json::to_value(progression)?, cli.pretty)?;
        }
        Commands::Voice { input } => {
            let params = voicing_params(&read_input(input.as_ref())?)?;
            let voiced = Dispatcher::new(config).invoke(Function::GenerateVoicings, params)?;
            print_json(&voiced, cli.pretty)?;
        }
        Commands::Export {
            format,
            output,
            title,
            tempo,
            request,
        } => {
            run_export(&config, &format, output, title, tempo, &request)?;
        }
        Commands::Call { function } => {
            let input = read_input(None)?;
            let dispatcher = Dispatcher::new(config);
            let response = if input.trim().is_empty() {
                dispatcher.call(&function, Value::Null)
            } else {
                serde_json::from_str(&input)
                    .map_err(orch::Error::from)
                    .and_then(|params| dispatcher.call(&function, params))
            };
            let value = response.unwrap_or_else(|e| dispatch::error_response(&e));
            print_json(&value, cli.pretty)?;
        }
        Commands::Serve => {
            let served = dispatch::serve_stdio(&Dispatcher::new(config))?;
            info!(served, "server stopped");
        }
        Commands::List => list(),
    }

    Ok(())
}

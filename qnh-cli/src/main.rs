//! qnh - state-vector engine
//! Command-line interface for simulating circuits, sampling and reasoning

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use qnh_quantum::{
    CircuitReport, CircuitRequest, EngineConfig, GateSpec, QuantumEngine, ReasoningRequest,
    Sampler,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qnh")]
#[command(author = "QNH Contributors")]
#[command(version)]
#[command(about = "qnh - state-vector simulation and interference reasoning", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", env = "QNH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the qubit ceiling
    #[arg(long, global = true, value_name = "N")]
    max_qubits: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a circuit from |0…0⟩
    Circuit {
        /// Circuit request file (JSON)
        #[arg(
            value_name = "FILE",
            conflicts_with_all = ["qubits", "gates"],
            required_unless_present = "qubits"
        )]
        input: Option<PathBuf>,

        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<usize>,

        /// Gate, e.g. H:0, CNOT:1:c=0, RX:0:p=pi/2 (repeatable)
        #[arg(short, long = "gate", value_name = "SPEC")]
        gates: Vec<String>,

        /// Sample a histogram of N shots
        #[arg(short, long, value_name = "N")]
        shots: Option<usize>,

        /// Sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank options by interference
    Reason {
        /// Reasoning request file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a circuit and draw one measurement
    Measure {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: usize,

        /// Gate spec (repeatable)
        #[arg(short, long = "gate", value_name = "SPEC")]
        gates: Vec<String>,

        /// Sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List registered gates
    Gates,

    /// Show the effective configuration
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qnh=info,qnh_quantum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), cli.max_qubits)?;
    let engine = QuantumEngine::with_config(config).context("invalid engine configuration")?;

    match cli.command {
        Commands::Circuit {
            input,
            qubits,
            gates,
            shots,
            seed,
            json,
        } => {
            let request = match input {
                Some(path) => read_json::<CircuitRequest>(&path)?,
                None => CircuitRequest {
                    num_qubits: qubits.context("--qubits is required without a FILE")?,
                    gates: parse_gate_specs(&gates)?,
                },
            };
            circuit_command(&engine, &request, shots, seed, json)
        }

        Commands::Reason { input, json } => {
            let request = read_json::<ReasoningRequest>(&input)?;
            reason_command(&engine, &request, json)
        }

        Commands::Measure {
            qubits,
            gates,
            seed,
            json,
        } => measure_command(&engine, qubits, &parse_gate_specs(&gates)?, seed, json),

        Commands::Gates => {
            print_gates(&engine);
            Ok(())
        }

        Commands::Info { json } => print_info(&engine, json),
    }
}

// ============================================================================
// Configuration and input
// ============================================================================

/// Defaults → TOML file → QNH_* environment → command-line flags
fn load_config(path: Option<&Path>, max_qubits: Option<usize>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            EngineConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    let mut config = config
        .with_env_overrides()
        .context("invalid QNH_* environment variable")?;

    if let Some(max) = max_qubits {
        tracing::debug!(max_qubits = max, "qubit ceiling overridden by flag");
        config.max_qubits = max;
    }
    config.validate()?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn parse_gate_specs(specs: &[String]) -> Result<Vec<GateSpec>> {
    specs
        .iter()
        .map(|s| parse_gate_spec(s).with_context(|| format!("invalid gate '{}'", s)))
        .collect()
}

/// `NAME:targets[:c=controls][:p=params]`, lists separated by commas
fn parse_gate_spec(spec: &str) -> Result<GateSpec> {
    let mut parts = spec.split(':');
    let name = parts.next().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        bail!("missing gate name");
    }
    let targets = match parts.next() {
        Some(list) => parse_list(list, parse_index)?,
        None => bail!("missing target qubits"),
    };

    let mut gate = GateSpec::new(name, targets);
    for part in parts {
        match part.split_once('=') {
            Some(("c", list)) => gate = gate.with_controls(parse_list(list, parse_index)?),
            Some(("p", list)) => gate = gate.with_params(parse_list(list, parse_angle)?),
            _ => bail!("unknown section '{}', expected c=... or p=...", part),
        }
    }
    Ok(gate)
}

fn parse_list<T>(list: &str, item: fn(&str) -> Result<T>) -> Result<Vec<T>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(item)
        .collect()
}

fn parse_index(s: &str) -> Result<usize> {
    s.parse()
        .with_context(|| format!("'{}' is not a qubit index", s))
}

/// Number, `pi`, `-pi` or `pi/k`
fn parse_angle(s: &str) -> Result<f64> {
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s),
    };
    let value = match body.to_ascii_lowercase().as_str() {
        "pi" => std::f64::consts::PI,
        other => match other.strip_prefix("pi/") {
            Some(divisor) => {
                let divisor: f64 = divisor
                    .parse()
                    .with_context(|| format!("'{}' is not a number", divisor))?;
                std::f64::consts::PI / divisor
            }
            None => other
                .parse()
                .with_context(|| format!("'{}' is not an angle", s))?,
        },
    };
    Ok(sign * value)
}

// ============================================================================
// Commands
// ============================================================================

fn circuit_command(
    engine: &QuantumEngine,
    request: &CircuitRequest,
    shots: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let (report, counts) = run_circuit(engine, request, shots, seed)?;

    if json {
        let mut value = serde_json::to_value(&report)?;
        if let (Some(counts), Some(object)) = (&counts, value.as_object_mut()) {
            object.insert("counts".to_string(), serde_json::to_value(counts)?);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {} qubit(s), {} gate(s)",
        "Simulated".green().bold(),
        report.num_qubits,
        report.gate_history.len()
    );
    println!();
    println!("{}", "States:".bold());
    for state in &report.states {
        println!(
            "  |{}⟩  {:>8.4}  {}",
            state.state.cyan(),
            state.probability,
            bar(state.probability)
        );
    }
    if let Some(top) = &report.most_likely {
        println!();
        println!(
            "{} |{}⟩ ({:.4})",
            "Most likely:".bold(),
            top.state.cyan(),
            top.probability
        );
    }
    if let Some(counts) = counts {
        print_counts(&counts);
    }
    Ok(())
}

/// Relatório e, com `shots`, histograma do mesmo estado final
fn run_circuit(
    engine: &QuantumEngine,
    request: &CircuitRequest,
    shots: Option<usize>,
    seed: Option<u64>,
) -> Result<(CircuitReport, Option<BTreeMap<String, usize>>)> {
    let outcome = engine.simulate_outcome(request.num_qubits, &request.gates)?;
    let report = engine.report(&outcome);

    let counts = match shots {
        Some(shots) => {
            let mut sampler = Sampler::from_optional_seed(seed.or(engine.config().seed));
            Some(sampler.counts(&outcome.state, shots)?)
        }
        None => None,
    };
    Ok((report, counts))
}

fn reason_command(engine: &QuantumEngine, request: &ReasoningRequest, json: bool) -> Result<()> {
    let result = engine.reasoning_request(request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some(description) = &request.problem.description {
        println!("{} {}", "Problem:".bold(), description);
    }
    println!(
        "{} {} option(s) on {} qubit(s)",
        "Ranked".green().bold(),
        result.ranked_options.len(),
        result.num_qubits
    );
    println!();
    for (rank, option) in result.ranked_options.iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {:>8.4}  {}",
            rank + 1,
            option.option.cyan(),
            option.probability,
            bar(option.probability)
        );
    }
    println!();
    println!(
        "{} {} (confidence {:.4})",
        "Most likely:".bold(),
        result.most_likely.option.cyan(),
        result.confidence
    );
    Ok(())
}

fn measure_command(
    engine: &QuantumEngine,
    qubits: usize,
    gates: &[GateSpec],
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut handle = engine.initialize_state(qubits)?;
    engine.run_circuit(&mut handle, gates)?;

    let mut sampler = Sampler::from_optional_seed(seed.or(engine.config().seed));
    let measurement = engine.measure(&handle, sampler.rng_mut())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&measurement)?);
    } else {
        println!(
            "{} |{}⟩ (p = {:.4})",
            "Measured".green().bold(),
            measurement.bitstring.cyan(),
            measurement.probability
        );
    }
    Ok(())
}

fn print_counts(counts: &BTreeMap<String, usize>) {
    let shots: usize = counts.values().sum();
    println!();
    println!("{} ({} shots)", "Counts:".bold(), shots);
    for (bitstring, count) in counts {
        let fraction = *count as f64 / shots.max(1) as f64;
        println!("  |{}⟩  {:>8}  {}", bitstring.cyan(), count, bar(fraction));
    }
}

fn print_gates(engine: &QuantumEngine) {
    let status = engine.status();
    println!("{} ({})", "Registered gates:".bold(), status.gates.len());
    for name in &status.gates {
        println!("  • {}", name.cyan());
    }
    println!();
    println!("{}", "Spec syntax:".bold());
    println!("  NAME:targets[:c=controls][:p=params]");
    println!("  H:0   CNOT:1:c=0   RX:0:p=pi/2   SWAP:0,1");
}

fn print_info(engine: &QuantumEngine, json: bool) -> Result<()> {
    let status = engine.status();
    let config = engine.config();

    if json {
        let value = serde_json::json!({ "status": status, "config": config });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} v{}", "qnh".bold(), status.version);
    println!();
    println!("{}", "Configuration:".bold());
    println!("  max_qubits        {}", config.max_qubits);
    println!("  tolerance         {:e}", config.tolerance);
    println!("  report_threshold  {}", config.report_threshold);
    match config.seed {
        Some(seed) => println!("  seed              {}", seed),
        None => println!("  seed              {}", "entropy".dimmed()),
    }
    println!();
    println!("{}", "Commands:".bold());
    println!("  qnh circuit -n 2 -g H:0 -g CNOT:1:c=0     # Bell state");
    println!("  qnh circuit bell.json --shots 1000        # Histogram");
    println!("  qnh reason problem.json                   # Rank options");
    println!("  qnh measure -n 1 -g H:0 --seed 7          # One shot");
    println!("  qnh gates                                 # Gate library");
    Ok(())
}

fn bar(probability: f64) -> String {
    let width = (probability.clamp(0.0, 1.0) * 40.0).round() as usize;
    "█".repeat(width)
}

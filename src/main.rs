use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use zkp_k_coloring::config::{AcceptancePolicy, ProtocolConfig};
use zkp_k_coloring::crypto::HashAlgorithm;
use zkp_k_coloring::protocol::orchestrator::{soundness_bound, Orchestrator, ProofReport};
use zkp_k_coloring::protocol::prover::Prover;
use zkp_k_coloring::protocol::verifier::{RoundVerdict, Verifier};
use zkp_k_coloring::utils::random_graph::{
    generate_colorable_instance, EDGE_PROBABILITY, EXAMPLE_INSTANCE,
};
use zkp_k_coloring::utils::serialization::{
    load_graph_instance, save_graph_instance, GraphInstance,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Zero-knowledge proof of a graph k-coloring", long_about = None)]
struct Cli {
    /// Log every verification step
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Strict,
    Diagnostic,
}

#[derive(clap::Args, Clone, Debug)]
struct ProtocolArgs {
    /// TOML file with `rounds`, `hash` and `[policy]`
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long)]
    rounds: Option<u32>,
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Pass ratio required by the diagnostic policy
    #[arg(long, default_value_t = 0.95)]
    threshold: f64,
    #[arg(long, value_enum)]
    hash: Option<HashAlgorithm>,
}

impl ProtocolArgs {
    fn resolve(&self) -> CliResult<ProtocolConfig> {
        let mut config = match &self.config {
            Some(path) => ProtocolConfig::load(path)?,
            None => ProtocolConfig::default(),
        };
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(hash) = self.hash {
            config.hash = hash;
        }
        match self.policy {
            Some(PolicyArg::Strict) => config.policy = AcceptancePolicy::Strict,
            Some(PolicyArg::Diagnostic) => {
                config.policy = AcceptancePolicy::Diagnostic {
                    threshold: self.threshold,
                }
            }
            None => {}
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the example graph, prove its coloring, then remove the file
    Demo {
        #[arg(long, value_name = "FILE", default_value = "graph.txt")]
        path: PathBuf,
        /// Leave the example file on disk
        #[arg(long)]
        keep: bool,
        #[command(flatten)]
        protocol: ProtocolArgs,
    },
    /// Run the interactive protocol on a graph file with a coloring line
    Prove {
        #[arg(short, long, value_name = "FILE")]
        instance: PathBuf,
        /// Seed both parties for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        protocol: ProtocolArgs,
    },
    /// Generate a random graph with a planted proper coloring
    Generate {
        #[arg(long, default_value_t = 16)]
        nodes: u32,
        #[arg(long, default_value_t = 3)]
        colors: u32,
        #[arg(long, default_value_t = EDGE_PROBABILITY)]
        edge_probability: f64,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run many independent sessions and report the acceptance rate
    Simulate {
        #[arg(short, long, value_name = "FILE")]
        instance: PathBuf,
        #[arg(long, default_value_t = 1000)]
        sessions: u64,
        #[command(flatten)]
        protocol: ProtocolArgs,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let level = match (&cli.command, cli.verbose) {
        (_, true) => tracing::Level::DEBUG,
        (Commands::Simulate { .. }, false) => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Demo {
            path,
            keep,
            protocol,
        } => run_demo(path, keep, protocol.resolve()?)?,
        Commands::Prove {
            instance,
            seed,
            json,
            protocol,
        } => run_prove(instance, seed, json, protocol.resolve()?)?,
        Commands::Generate {
            nodes,
            colors,
            edge_probability,
            output,
            seed,
        } => run_generate(nodes, colors, edge_probability, output, seed)?,
        Commands::Simulate {
            instance,
            sessions,
            protocol,
        } => run_simulate(instance, sessions, protocol.resolve()?)?,
    }
    Ok(())
}

fn run_demo(path: PathBuf, keep: bool, config: ProtocolConfig) -> CliResult<()> {
    fs::write(&path, EXAMPLE_INSTANCE)?;
    println!("Example graph written to {}", path.display());
    let outcome = prove_file(&path, None, &config);
    if !keep {
        fs::remove_file(&path)?;
    }
    let report = outcome?;
    print_report(&report);
    finish(&report)
}

fn run_prove(
    instance: PathBuf,
    seed: Option<u64>,
    json: bool,
    config: ProtocolConfig,
) -> CliResult<()> {
    let report = prove_file(&instance, seed, &config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    finish(&report)
}

/// Prover and verifier each load their own copy; the verifier never sees
/// the coloring line.
fn prove_file(path: &Path, seed: Option<u64>, config: &ProtocolConfig) -> CliResult<ProofReport> {
    let prover_instance = load_graph_instance(path)?;
    let coloring = prover_instance.require_coloring()?.clone();
    let GraphInstance { graph: public_graph, .. } = load_graph_instance(path)?;

    tracing::info!(
        vertices = public_graph.vertex_count(),
        edges = public_graph.edge_count(),
        colors = coloring.num_colors(),
        rounds = config.rounds,
        hash = ?config.hash,
        policy = ?config.policy,
        "graph loaded from {}",
        path.display()
    );

    let scheme = config.scheme();
    let (mut prover, mut verifier) = match seed {
        Some(seed) => (
            Prover::with_seed(prover_instance.graph, coloring, scheme, seed)?,
            Verifier::with_seed(public_graph, scheme, seed.wrapping_add(1)),
        ),
        None => (
            Prover::new(prover_instance.graph, coloring, scheme)?,
            Verifier::new(public_graph, scheme),
        ),
    };
    Ok(Orchestrator::new(config.clone()).run(&mut prover, &mut verifier)?)
}

fn print_report(report: &ProofReport) {
    for round in &report.rounds {
        match &round.verdict {
            RoundVerdict::Accepted => println!(
                "Round {:>3}/{}: edge {} passed",
                round.round,
                report.requested_rounds,
                round.challenge.edge()
            ),
            RoundVerdict::Rejected(reason) => println!(
                "Round {:>3}/{}: edge {} FAILED ({reason})",
                round.round,
                report.requested_rounds,
                round.challenge.edge()
            ),
        }
    }
    println!(
        "Passed {}/{} executed rounds ({:.1}%), {} requested",
        report.passed,
        report.executed(),
        report.pass_ratio() * 100.0,
        report.requested_rounds
    );
    if let AcceptancePolicy::Diagnostic { threshold } = report.policy {
        println!(
            "Warning: diagnostic policy (threshold {threshold:.2}) is not a sound acceptance rule"
        );
    }
    if report.accepted {
        println!("Proof ACCEPTED: the prover knows a proper coloring");
    } else {
        println!("Proof REJECTED");
    }
}

fn finish(report: &ProofReport) -> CliResult<()> {
    if report.accepted {
        Ok(())
    } else {
        Err("proof rejected".into())
    }
}

fn run_generate(
    nodes: u32,
    colors: u32,
    edge_probability: f64,
    output: PathBuf,
    seed: Option<u64>,
) -> CliResult<()> {
    if !(0.0..=1.0).contains(&edge_probability) {
        return Err("edge probability must lie in [0, 1]".into());
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let (instance, params) = generate_colorable_instance(nodes, colors, edge_probability, &mut rng)?;
    save_graph_instance(&output, &instance)?;
    println!(
        "  n = {}, k = {}, p = {:.2}, edges = {}",
        params.nodes, params.colors, params.edge_probability, params.edges
    );
    println!("Instance saved to {}", output.display());
    Ok(())
}

fn run_simulate(instance_path: PathBuf, sessions: u64, config: ProtocolConfig) -> CliResult<()> {
    if sessions == 0 {
        return Err("sessions must be greater than zero".into());
    }
    let instance = load_graph_instance(&instance_path)?;
    let coloring = instance.require_coloring()?.clone();
    let conflicts = coloring.conflicting_edges(&instance.graph);
    let scheme = config.scheme();
    let orchestrator = Orchestrator::new(config.clone());

    let progress = ProgressBar::new(sessions);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} sessions ({eta})")?,
    );
    let accepted = AtomicU64::new(0);
    let start = Instant::now();

    (0..sessions).into_par_iter().try_for_each(|_| -> zkp_k_coloring::Result<()> {
        let mut prover = Prover::new(instance.graph.clone(), coloring.clone(), scheme)?;
        let mut verifier = Verifier::new(instance.graph.clone(), scheme);
        let report = orchestrator.run(&mut prover, &mut verifier)?;
        if report.accepted {
            accepted.fetch_add(1, Ordering::Relaxed);
        }
        progress.inc(1);
        Ok(())
    })?;
    progress.finish_and_clear();

    let accepted = accepted.load(Ordering::Relaxed);
    println!(
        "{} sessions of {} rounds in {:.2?}: {} accepted ({:.4})",
        sessions,
        config.rounds,
        start.elapsed(),
        accepted,
        accepted as f64 / sessions as f64
    );
    if conflicts.is_empty() {
        println!("Coloring is proper: every session is expected to be accepted");
    } else {
        println!(
            "Coloring conflicts on {} edge(s), first {}; acceptance bound (1 - 1/|E|)^rounds = {:.4}",
            conflicts.len(),
            conflicts[0],
            soundness_bound(instance.graph.edge_count(), config.rounds)
        );
    }
    Ok(())
}

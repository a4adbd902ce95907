mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    BalanceReport, BalanceTester, PlayerStrategy, SimulationPlan, TuningDir, resolve_seed_inputs,
    split_csv,
};
use tidecast_game::{DEFAULT_MAX_TICKS, FishingEngine, Loadout, TuningCatalog, TuningSource};

#[derive(Debug, Parser)]
#[command(name = "tidecast-tester", version = "0.1.0")]
#[command(about = "Automated QA and balance runs for the Tidecast fishing engine")]
struct Args {
    /// Directory holding worlds.json, fish.json, characters.json, rods.json and quests.json
    #[arg(long)]
    tuning_dir: Option<PathBuf>,

    /// World id to fish in
    #[arg(long, default_value_t = 1)]
    world: i32,

    /// Character id of the angler
    #[arg(long, default_value = "starter")]
    character: String,

    /// Rod id equipped for every run
    #[arg(long, default_value = "starter_rod")]
    rod: String,

    /// Player policies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    policies: String,

    /// List all available policies and exit
    #[arg(long)]
    list_policies: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of sessions per seed and policy
    #[arg(long, default_value_t = 10)]
    iterations: u64,

    /// Steps after which a session still running is cancelled
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_policies(&args)? {
        return Ok(());
    }

    if wants_banner(&args) {
        announce_banner();
    }

    let start_time = Instant::now();
    let report = match &args.tuning_dir {
        Some(dir) => {
            let engine = FishingEngine::new(TuningDir::new(dir))
                .with_context(|| format!("failed to load tuning from {}", dir.display()))?;
            log::info!("loaded tuning from {}", engine.source().root().display());
            run_harness(&args, &engine)?
        }
        None => run_harness(&args, &FishingEngine::builtin())?,
    };

    write_reports(&args, &report, start_time)?;

    if report.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_policies(args: &Args) -> Result<bool> {
    if !args.list_policies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available policies:")?;
    for strategy in PlayerStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

/// Machine-readable reports on stdout stay free of decoration.
fn wants_banner(args: &Args) -> bool {
    args.report == "console" || args.output.is_some()
}

fn announce_banner() {
    println!("{}", "🎣 Tidecast Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_policies(policies_arg: &str) -> Result<Vec<PlayerStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(policies_arg) {
        if token.eq_ignore_ascii_case("all") {
            for strategy in PlayerStrategy::ALL {
                if !strategies.contains(&strategy) {
                    strategies.push(strategy);
                }
            }
            continue;
        }
        match PlayerStrategy::from_key(&token) {
            Some(strategy) if !strategies.contains(&strategy) => strategies.push(strategy),
            Some(_) => {}
            None => eprintln!("⚠️  Unknown policy: {}", token.yellow()),
        }
    }
    if strategies.is_empty() {
        bail!("no known policies in `{policies_arg}` (try --list-policies)");
    }
    Ok(strategies)
}

fn build_loadout(args: &Args, catalog: &TuningCatalog) -> Loadout {
    if !catalog.worlds().any(|world| world.id == args.world) {
        log::warn!("unknown world {}; sessions fall back to the default world", args.world);
    }
    if !catalog.has_character(&args.character) {
        log::warn!("unknown character `{}`; using neutral stats", args.character);
    }
    if catalog.rod(&args.rod).is_none() {
        log::warn!("unknown rod `{}`; using the starter rod", args.rod);
    }
    Loadout {
        world_id: args.world,
        character_id: args.character.clone(),
        rod_id: args.rod.clone(),
    }
}

fn run_harness<L: TuningSource>(args: &Args, engine: &FishingEngine<L>) -> Result<BalanceReport> {
    let strategies = expand_policies(&args.policies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let plan =
        SimulationPlan::new(build_loadout(args, engine.catalog())).with_max_ticks(args.max_ticks);

    if wants_banner(args) {
        println!("{}", "🧠 Running Balance Sessions".bright_yellow().bold());
        println!("{}", "-".repeat(30).yellow());
    }

    let tester = BalanceTester::new(args.verbose);
    Ok(tester.run(
        engine.catalog(),
        engine.quests(),
        &plan,
        &strategies,
        &seeds,
        args.iterations,
    ))
}

fn write_reports(args: &Args, report: &BalanceReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, report)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, report)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, report)?,
        _ => {
            let duration = start_time.elapsed();
            if report.runs.is_empty() {
                writeln!(&mut output_target, "No sessions executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, report, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

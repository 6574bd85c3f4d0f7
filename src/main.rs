use clap::Parser;
use log::{LevelFilter, Metadata, Record};
use skirmish::rosters::{get_prefab_roster_ids, prefab_battle};
use skirmish::{BattleConfig, BattleOutcome, BattleResult, BattleRunner};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "skirmish-sim",
    about = "Run headless skirmish battles from a RON config or prefab rosters",
    version
)]
struct Args {
    /// Battle config file (RON)
    #[arg(value_name = "CONFIG", required_unless_present = "players")]
    config: Option<PathBuf>,

    /// Prefab roster id for the player side
    #[arg(long, value_name = "ROSTER", requires = "enemies", conflicts_with = "config")]
    players: Option<String>,

    /// Prefab roster id for the enemy side
    #[arg(long, value_name = "ROSTER", requires = "players")]
    enemies: Option<String>,

    /// Override the seed from the config; run N uses seed + N
    #[arg(long)]
    seed: Option<u64>,

    /// Number of battles to run
    #[arg(long, default_value = "1")]
    runs: u32,

    /// Print the formatted event log of each battle
    #[arg(long)]
    log: bool,

    /// Send engine trace output to stderr
    #[arg(long)]
    verbose: bool,

    /// Print each result as JSON
    #[arg(long)]
    json: bool,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Default)]
struct Tally {
    victories: u32,
    defeats: u32,
    turn_limits: u32,
    total_turns: u64,
}

impl Tally {
    fn record(&mut self, result: &BattleResult) {
        match result.outcome {
            BattleOutcome::Victory => self.victories += 1,
            BattleOutcome::Defeat => self.defeats += 1,
            BattleOutcome::TurnLimit => self.turn_limits += 1,
            BattleOutcome::InProgress => {}
        }
        self.total_turns += u64::from(result.turns_elapsed);
    }

    fn print(&self, runs: u32) {
        let average = if runs == 0 {
            0.0
        } else {
            self.total_turns as f64 / f64::from(runs)
        };
        println!(
            "=== {} runs: {} victories, {} defeats, {} turn limits, {:.1} turns on average ===",
            runs, self.victories, self.defeats, self.turn_limits, average
        );
    }
}

fn load_config(args: &Args) -> Result<BattleConfig, String> {
    if let (Some(players), Some(enemies)) = (&args.players, &args.enemies) {
        return prefab_battle(players, enemies, 0).ok_or_else(|| {
            format!(
                "Unknown roster; available rosters: {}",
                get_prefab_roster_ids().join(", ")
            )
        });
    }
    match &args.config {
        Some(path) => BattleConfig::load_from_file(path).map_err(|e| e.to_string()),
        None => Err("No config file given".to_string()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading battle: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let base_seed = args.seed.unwrap_or(config.seed);

    let mut tally = Tally::default();
    for run in 0..args.runs {
        config.seed = base_seed.wrapping_add(u64::from(run));
        let mut runner = match BattleRunner::from_config(&config) {
            Ok(runner) => runner,
            Err(e) => {
                eprintln!("Error setting up battle: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let result = runner.run_to_completion();
        tally.record(&result);

        if args.log {
            println!("--- Battle log (seed {}) ---", config.seed);
            runner.events().print_formatted(runner.field());
        }

        if args.json {
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing result: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!(
                "Run {} (seed {}): {:?} after {} turns, {} players and {} enemies standing",
                run + 1,
                config.seed,
                result.outcome,
                result.turns_elapsed,
                result.player_survivors.len(),
                result.enemy_survivors.len()
            );
        }
    }

    if !args.json {
        tally.print(args.runs);
    }
    ExitCode::SUCCESS
}

//! Light-up Puzzle
//!
//! Command-line front end for the light-up engine. Each subcommand takes a
//! layout code (see `lightgame::codec`), does one thing and prints the result.
//! Set `RUST_LOG=debug` to watch the solver and generator work.

use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lightgame::{generate_layout, winning_starts, Budget, Direction, Game};

/// Solves, generates and replays light-up puzzle layouts.
#[derive(Parser)]
#[command(name = "lightgame")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board for a layout code.
    Show { code: String },
    /// Check whether a layout can be won.
    Solve {
        code: String,
        /// List every solution instead of stopping at the first.
        #[arg(long)]
        all: bool,
    },
    /// Generate a random solvable layout.
    Generate {
        height: usize,
        width: usize,
        #[arg(long, default_value_t = 3)]
        min_blocks: usize,
        #[arg(long, default_value_t = 6)]
        max_blocks: usize,
        #[command(flatten)]
        random: RandomArgs,
    },
    /// Block more tiles of a layout at random, keeping it solvable.
    Augment {
        code: String,
        blocks: usize,
        #[command(flatten)]
        random: RandomArgs,
    },
    /// Start a game and apply a sequence of moves.
    Play {
        code: String,
        x: usize,
        y: usize,
        /// Moves: up, down, left, right (or u, d, l, r).
        moves: Vec<Direction>,
        /// Keep sliding while only one direction is open.
        #[arg(long)]
        fast: bool,
    },
}

#[derive(clap::Args)]
struct RandomArgs {
    /// Seed for reproducible output; random if omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Give up after this many candidate layouts.
    #[arg(long)]
    max_attempts: Option<u64>,
}

impl RandomArgs {
    fn rng(&self) -> ChaCha8Rng {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(seed, "seeding generator");
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn budget(&self) -> Budget {
        self.max_attempts.map_or(Budget::Unbounded, Budget::Attempts)
    }
}

type CliResult = Result<String, Box<dyn Error>>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Show { code } => run_show(&code),
        Command::Solve { code, all } => run_solve(&code, all),
        Command::Generate {
            height,
            width,
            min_blocks,
            max_blocks,
            random,
        } => run_generate(height, width, min_blocks, max_blocks, &random),
        Command::Augment {
            code,
            blocks,
            random,
        } => run_augment(&code, blocks, &random),
        Command::Play {
            code,
            x,
            y,
            moves,
            fast,
        } => run_play(&code, x, y, &moves, fast),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Renders a layout code as a board.
fn run_show(code: &str) -> CliResult {
    let game: Game = code.parse()?;
    Ok(game.to_string())
}

/// Reports whether a layout is solvable, optionally listing every solution.
fn run_solve(code: &str, all: bool) -> CliResult {
    let mut game: Game = code.parse()?;
    let mut output = game.to_string();

    if !all {
        let solvable = game.is_solvable(None);
        output.push_str(&format!("Solvable: {}\n", yes_no(solvable)));
        return Ok(output);
    }

    let solutions = game.solutions();
    output.push_str(&format!("Solvable: {}\n", yes_no(!solutions.is_empty())));
    for solution in &solutions {
        output.push_str(&format!("{solution}\n"));
    }
    output.push_str(&format!(
        "{} of {} starting positions win\n",
        winning_starts(&solutions).len(),
        game.off_count()
    ));
    Ok(output)
}

/// Generates a fresh solvable layout and prints its code and board.
fn run_generate(
    height: usize,
    width: usize,
    min_blocks: usize,
    max_blocks: usize,
    random: &RandomArgs,
) -> CliResult {
    if height == 0 || width == 0 {
        return Err("height and width must be positive".into());
    }
    if min_blocks > max_blocks {
        return Err(format!("--min-blocks {min_blocks} exceeds --max-blocks {max_blocks}").into());
    }

    let game = generate_layout(
        height,
        width,
        min_blocks..=max_blocks,
        &mut random.rng(),
        random.budget(),
    )?;
    Ok(format!("{}\n{game}", game.encode()))
}

/// Adds blocks to an existing layout and prints the new code and board.
fn run_augment(code: &str, blocks: usize, random: &RandomArgs) -> CliResult {
    let mut game: Game = code.parse()?;
    game.augment_randomly_within(blocks, &mut random.rng(), random.budget())?;
    Ok(format!("{}\n{game}", game.encode()))
}

/// Plays a game from (x, y) and prints the final board and outcome.
fn run_play(code: &str, x: usize, y: usize, moves: &[Direction], fast: bool) -> CliResult {
    let mut game: Game = code.parse()?;
    game.start(x, y)?;
    for &dir in moves {
        if fast {
            game.move_fast(dir)?;
        } else {
            game.move_dir(dir)?;
        }
    }

    let mut output = game.to_string();
    let dirs = game.valid_dirs();
    if !dirs.is_empty() {
        output.push_str(&format!("Valid directions: {dirs}\n"));
    } else if game.have_won() {
        output.push_str("You won!\n");
    } else {
        output.push_str("Game over, you lose.\n");
    }
    Ok(output)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use std::path::PathBuf;

use gomoku_ai::{
    record::GameRecord,
    solver::{choose_move_with, SearchConfig, SearchError},
    Board, PlayerId, Radius, Roster, Scoring, Variant, BOARD_SIZE,
};

mod display;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VariantArg {
    Naive,
    Alphabeta,
    Alphabeta3p,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Naive => Variant::Naive,
            VariantArg::Alphabeta => Variant::AlphaBeta,
            VariantArg::Alphabeta3p => Variant::AlphaBeta3p,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScoringArg {
    Balanced,
    Defensive,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Balanced => Scoring::Balanced,
            ScoringArg::Defensive => Scoring::Defensive,
        }
    }
}

/// Lets the engine play Gomoku against itself
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Game record to continue from
    record: Option<PathBuf>,

    /// Plies searched per move
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    #[arg(long, value_enum, default_value_t = VariantArg::Alphabeta3p)]
    variant: VariantArg,

    #[arg(long, value_enum, default_value_t = ScoringArg::Balanced)]
    scoring: ScoringArg,

    /// Seated players, 2 to 4
    #[arg(short, long, default_value_t = 2)]
    players: usize,

    /// Side length of the board
    #[arg(long, default_value_t = BOARD_SIZE)]
    size: usize,

    /// Moves to play before stopping
    #[arg(long, default_value_t = 99_999)]
    rounds: usize,

    /// Also consider cells two steps away from existing stones
    #[arg(long)]
    extended: bool,

    /// Search the root's moves on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the explored search tree after every move
    #[arg(long)]
    trace: bool,

    /// Draw the board without colours
    #[arg(long)]
    plain: bool,
}

fn show(board: &Board, roster: &Roster, last: Option<(usize, usize)>, plain: bool) -> Result<()> {
    if plain {
        println!("{}", display::plain(board, roster));
        Ok(())
    } else {
        display::display(board, roster, last).context("Failed to draw board!")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let roster = Roster::standard(args.players);
    let (mut board, mut player) = match &args.record {
        Some(path) => {
            let record = GameRecord::load(path)?;
            let board = record.replay(args.size, args.players)?;
            info!(
                "replayed {} moves from {}",
                record.moves.len(),
                path.display()
            );
            (board, record.to_move)
        }
        None => (Board::new(args.size, args.players)?, PlayerId(0)),
    };
    let radius = if args.extended {
        Radius::Extended
    } else {
        Radius::Adjacent
    };
    board = board.with_frontier_radius(radius);

    // the frontier is empty until a stone is down
    if board.is_empty() {
        let centre = board.size() / 2;
        board.place(centre, centre, player)?;
        println!(
            "{} opens at ({}, {})",
            roster.name(player),
            centre,
            centre
        );
        player = player.next(board.player_count());
    }
    show(&board, &roster, None, args.plain)?;

    let config = SearchConfig {
        depth: args.depth,
        variant: args.variant.into(),
        scoring: args.scoring.into(),
        parallel: args.parallel,
        trace: args.trace,
    };

    for _ in 0..args.rounds {
        if let Some(winner) = board.winner() {
            println!("{} wins!", roster.name(winner));
            return Ok(());
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
        spinner.set_message(&format!("{} is thinking...", roster.name(player)));
        spinner.enable_steady_tick(100);
        let outcome = choose_move_with(&mut board, player, &config);
        spinner.finish_and_clear();

        let decision = match outcome {
            Ok(decision) => decision,
            Err(SearchError::NoLegalMoves) => {
                println!("Draw!");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let (x, y) = decision.mv;

        if args.trace {
            println!("{} to play ({}, {})", roster.name(player), x, y);
            println!("Search tree:");
            for line in decision.future.dump("root") {
                println!("{}", line);
            }
        }

        board.place(x, y, player)?;
        show(&board, &roster, Some((x, y)), args.plain)?;
        println!(
            "[move=({}, {}, {}), future-hval = {}]",
            roster.mark(player),
            x,
            y,
            decision.value
        );
        for seated in PlayerId::all(board.player_count()) {
            println!("{}", display::group_summary(&board, &roster, seated));
        }
        info!("searched {} nodes", decision.node_count);

        player = player.next(board.player_count());
    }

    match board.winner() {
        Some(winner) => println!("{} wins!", roster.name(winner)),
        None => println!("Stopped after {} rounds", args.rounds),
    }
    Ok(())
}

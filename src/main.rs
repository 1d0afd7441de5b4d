use anyhow::{Context, Result};
use chess_minimax::{Board, CastlingRights, Search, SearchConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plays a short self-play game from the starting position.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Depth handed to minimax below each root move
    #[arg(long, env = "CHESS_SEARCH_DEPTH", default_value_t = chess_minimax::config::DEFAULT_SEARCH_DEPTH)]
    depth: u32,

    /// Number of half-moves to play
    #[arg(long, env = "CHESS_SELFPLAY_PLIES", default_value_t = 4)]
    plies: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = SearchConfig::with_depth(args.depth);
    config.validate().context("invalid search settings")?;

    chess_minimax::init_zobrist();

    let mut board = Board::starting_position();
    let mut rights = CastlingRights::default();
    let mut white_to_move = true;

    for ply in 1..=args.plies {
        let mut search = Search::new(config).with_castling_rights(rights);
        let Some(mv) = search.find_best_move(&board, white_to_move) else {
            info!(ply, white_to_move, "side to move has no legal move, stopping");
            break;
        };

        rights.update(&board, mv.from);
        board.make_move(mv);
        info!(
            ply,
            from = ?mv.from,
            to = ?mv.to,
            promotion = ?mv.promotion,
            nodes = search.get_nodes_searched(),
            "move played"
        );
        println!("{board}");
        white_to_move = !white_to_move;
    }

    Ok(())
}

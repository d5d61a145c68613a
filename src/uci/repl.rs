//! Interactive UCI read-eval-print loop.
//!
//! Ties the line-oriented command parser, the engine controller, and
//! stdout reporting together into the binary's entry point.

use std::io::{self, BufRead, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::board::{Board, SearchIterationInfo, SearchInfoCallback, DEFAULT_TT_MB};
use crate::engine::{
    build_search_request, EngineController, SearchParams as EngineGoParams, TimeConfig,
    TimeControl,
};
use crate::tt::TranspositionTable;

use super::command::{parse_go_params, parse_uci_command, GoParams, UciCommand};
use super::options::{parse_setoption, UciOptionAction, UciOptions};
use super::{format_uci_move, try_parse_position_command};

/// Positions used by the `bench` command: a small fixed set covering the
/// opening, a tactical middlegame, and an endgame. Kept short deliberately -
/// this is a sanity/perf smoke test, not the datagen bench harness.
const BENCH_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbqkb1r/pp1p1ppp/2p2n2/4p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R w KQkq - 0 4",
];

const DEFAULT_BENCH_DEPTH: u32 = 12;

fn format_score(info: &SearchIterationInfo) -> String {
    match info.mate_in {
        Some(mate) => format!("mate {mate}"),
        None => format!("cp {}", info.score),
    }
}

/// Build the per-iteration reporter that prints `info ...` lines to stdout.
///
/// The transposition table handle is captured independently of the search
/// state lock (TT buckets are individually mutex-guarded), so `hashfull` can
/// be queried from this callback even while the search thread holds the
/// `SearchState` lock.
fn make_info_callback(tt: Arc<TranspositionTable>) -> SearchInfoCallback {
    Arc::new(move |info: &SearchIterationInfo| {
        let hashfull = tt.hashfull_per_mille();
        if info.multipv > 1 {
            println!(
                "info depth {} seldepth {} multipv {} score {} nodes {} nps {} time {} hashfull {} tbhits 0 pv {}",
                info.depth,
                info.seldepth,
                info.multipv,
                format_score(info),
                info.nodes,
                info.nps,
                info.time_ms,
                hashfull,
                info.pv
            );
        } else {
            println!(
                "info depth {} seldepth {} score {} nodes {} nps {} time {} hashfull {} tbhits 0 pv {}",
                info.depth,
                info.seldepth,
                format_score(info),
                info.nodes,
                info.nps,
                info.time_ms,
                hashfull,
                info.pv
            );
        }
        let _ = io::stdout().flush();
    })
}

fn build_time_control(go: &GoParams, white_to_move: bool) -> TimeControl {
    if let Some(movetime) = go.movetime {
        return TimeControl::move_time_ms(movetime);
    }
    if go.infinite {
        return TimeControl::Infinite;
    }
    if go.wtime.is_none() && go.btime.is_none() {
        return TimeControl::Depth;
    }
    let (time_left, inc) = if white_to_move {
        (go.wtime.unwrap_or(0), go.winc.unwrap_or(0))
    } else {
        (go.btime.unwrap_or(0), go.binc.unwrap_or(0))
    };
    TimeControl::Incremental {
        time_left_ms: time_left,
        inc_ms: inc,
        movestogo: go.movestogo,
    }
}

/// Translate a parsed `go` command plus the active UCI options into the
/// controller's search request.
fn go_params_to_search_params(go: &GoParams, board: &Board, options: &UciOptions) -> EngineGoParams {
    let config = TimeConfig {
        move_overhead_ms: options.move_overhead_ms,
        soft_time_percent: options.soft_time_percent,
        hard_time_percent: options.hard_time_percent,
        default_max_nodes: options.default_max_nodes,
    };

    // `go mate N` has no dedicated search mode here; approximate it as a
    // depth search deep enough to find short mates.
    let depth = go.depth.or(go.mate.map(|m| m.saturating_mul(2).saturating_add(2)));

    let time_control = build_time_control(go, board.white_to_move());
    let depth_only = matches!(time_control, TimeControl::Depth);
    let unlimited = go.infinite || depth_only;

    let (req, _) = build_search_request(time_control, depth, go.nodes, go.ponder, unlimited, &config);

    EngineGoParams {
        depth: req.depth,
        soft_time_ms: req.soft_time_ms,
        hard_time_ms: req.hard_time_ms,
        ponder: go.ponder,
        infinite: unlimited,
        multi_pv: options.multi_pv,
    }
}

fn handle_go(controller: &mut EngineController, options: &UciOptions, parts: &[String]) {
    let str_parts: Vec<&str> = parts.iter().map(String::as_str).collect();
    let go = parse_go_params(&str_parts);
    let search_params = go_params_to_search_params(&go, controller.board(), options);

    controller.set_max_nodes(go.nodes.unwrap_or(options.default_max_nodes));
    controller.start_search(search_params, move |result| {
        if let Some(best) = result.best_move {
            let uci = format_uci_move(&best);
            if let Some(ponder) = result.ponder_move {
                println!("bestmove {uci} ponder {}", format_uci_move(&ponder));
            } else {
                println!("bestmove {uci}");
            }
        } else {
            println!("bestmove 0000");
        }
        let _ = io::stdout().flush();
    });
}

fn run_bench(depth: u32) {
    let start = std::time::Instant::now();
    let mut total_nodes = 0u64;

    for fen in BENCH_POSITIONS {
        let mut board = Board::from_fen(fen);
        let mut state = crate::board::SearchState::new(DEFAULT_TT_MB);
        let stop = AtomicBool::new(false);
        let config = crate::board::SearchConfig::depth(depth);
        let _ = crate::board::search(&mut board, &mut state, config, &stop);
        total_nodes += state.stats.total_nodes;
    }

    let elapsed = start.elapsed();
    let nps = if elapsed.as_millis() > 0 {
        total_nodes * 1000 / elapsed.as_millis() as u64
    } else {
        total_nodes
    };
    println!("Nodes searched: {total_nodes}");
    println!(
        "Time: {} ms, {} nps",
        elapsed.as_millis(),
        nps
    );
    let _ = io::stdout().flush();
}

fn run_perft(controller: &mut EngineController, depth: usize) {
    let mut board = controller.board().clone();
    let start = std::time::Instant::now();
    let nodes = board.perft(depth);
    let elapsed = start.elapsed();
    super::print::print_perft_info(depth, nodes, elapsed);
    let _ = io::stdout().flush();
}

/// Run the blocking UCI loop, reading commands from stdin and writing
/// responses to stdout until `quit` or end-of-input.
pub fn run_uci_loop() {
    let mut controller = EngineController::new(DEFAULT_TT_MB);
    let mut options = UciOptions::new(DEFAULT_TT_MB);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(cmd) = parse_uci_command(&line) else {
            continue;
        };

        match cmd {
            UciCommand::Uci => {
                let params = controller
                    .with_search_state_ref(|s| s.params().clone())
                    .unwrap_or_default();
                options.print(&params);
                let _ = io::stdout().flush();
            }
            UciCommand::IsReady => {
                println!("readyok");
                let _ = io::stdout().flush();
            }
            UciCommand::UciNewGame => {
                controller.new_game();
            }
            UciCommand::Position(parts) => {
                let str_parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let mut board = controller.board().clone();
                if let Err(e) = try_parse_position_command(&mut board, &str_parts) {
                    eprintln!("info string error: {e}");
                    continue;
                }
                controller.set_board(board);
            }
            UciCommand::Go(parts) => {
                let tt = controller
                    .with_search_state_ref(|s| s.shared_tt())
                    .unwrap_or_else(|| Arc::new(TranspositionTable::new(DEFAULT_TT_MB)));
                controller.set_info_callback(Some(make_info_callback(tt)));
                handle_go(&mut controller, &options, &parts);
            }
            UciCommand::Perft(depth) => run_perft(&mut controller, depth),
            UciCommand::Bench(depth) => run_bench(depth.unwrap_or(DEFAULT_BENCH_DEPTH)),
            UciCommand::Eval => {
                let score = controller.board().evaluate();
                println!("info string eval {score}");
                let _ = io::stdout().flush();
            }
            UciCommand::SetOption(parts) => {
                let str_parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Some((name, value)) = parse_setoption(&str_parts) {
                    let action = controller.with_search_state(|state| {
                        options.apply_setoption(&name, value.as_deref(), state)
                    });
                    match action.flatten() {
                        Some(UciOptionAction::ReinitHash(mb)) => controller.resize_hash(mb),
                        Some(UciOptionAction::SetThreads(n)) => controller.set_threads(n),
                        None => {}
                    }
                }
            }
            UciCommand::Debug(_) => {}
            UciCommand::Stop => controller.signal_stop(),
            UciCommand::PonderHit => controller.ponderhit(),
            UciCommand::Quit => {
                controller.stop_search();
                break;
            }
            UciCommand::Unknown(_) => {}
        }
    }

    controller.stop_search();
}

//! Self-play battle generation.
//!
//! Plays complete battles with uniformly random legal actions on both
//! sides and records every committed action as JSONL. Useful as an
//! end-to-end exerciser of the turn machinery and as a source of sample
//! battles for tooling; the random player is a harness, not an opponent.

use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{CellPos, Deployment, Team, FLEET_SIZE, GRID_SIZE};
use crate::protocol::sfen::encode_sfen;
use crate::rules::Outcome;
use crate::turn::{Action, OpKind, TurnController};

/// Configuration for self-play battle generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of battles to play.
    pub num_battles: usize,
    /// Turn cap per battle; random play can stall indefinitely without it.
    pub max_turns: u32,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress the stderr summary.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_battles: 10,
            max_turns: 200,
            seed: 0,
            quiet: false,
        }
    }
}

/// A committed action as it appears in a battle record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ActionRecord {
    Attack { target: CellPos, outcome: Outcome },
    Move { from: CellPos, to: CellPos },
}

impl From<Action> for ActionRecord {
    fn from(action: Action) -> Self {
        match action {
            Action::Attack { target, outcome } => ActionRecord::Attack { target, outcome },
            Action::Move { from, to } => ActionRecord::Move { from, to },
        }
    }
}

/// One turn of a recorded battle.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    /// Turn number the action was committed on.
    pub turn: u32,
    /// The side that acted.
    pub team: Team,
    #[serde(flatten)]
    pub action: ActionRecord,
    /// SFEN of the position after the turn handoff.
    pub sfen: String,
}

/// A complete self-play battle record.
#[derive(Debug, Clone, Serialize)]
pub struct BattleRecord {
    /// Sequential battle ID.
    pub battle_id: usize,
    /// SFEN of the starting position.
    pub opening: String,
    /// Every committed turn, in order.
    pub turns: Vec<TurnRecord>,
    /// The winning team, or `None` if the turn cap was reached.
    pub winner: Option<Team>,
}

/// Generates a random valid deployment: four distinct cells per fleet.
pub fn random_deployment(rng: &mut impl Rng) -> Deployment {
    let mut deployment = Deployment::new();
    for team in [Team::Red, Team::Blue] {
        while deployment.cells(team).len() < FLEET_SIZE {
            let pos = CellPos::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
            if !deployment.cells(team).contains(&pos) {
                deployment.toggle(team, pos);
            }
        }
    }
    deployment
}

fn pick<T: Copy>(cells: &[T], rng: &mut impl Rng) -> T {
    cells[rng.gen_range(0..cells.len())]
}

/// Plays one random turn to completion: select, commit, acknowledge.
fn play_turn(ctrl: &mut TurnController, rng: &mut impl Rng) -> Action {
    // Try a move half the time; fall back to an attack if the chosen boat
    // is boxed in.
    if rng.gen_bool(0.5) {
        ctrl.select_op(OpKind::Move);
        let boats: Vec<CellPos> = ctrl
            .roster()
            .units(ctrl.current_team())
            .iter()
            .map(|u| u.pos)
            .collect();
        ctrl.select_cell(pick(&boats, rng));
        let dests: Vec<CellPos> = ctrl.movable().iter().copied().collect();
        if !dests.is_empty() {
            ctrl.select_cell(pick(&dests, rng));
            let action = ctrl.apply().expect("move commit with valid selection");
            ctrl.acknowledge();
            return action;
        }
        ctrl.cancel();
    }
    ctrl.select_op(OpKind::Attack);
    let targets: Vec<CellPos> = ctrl.attackable().iter().copied().collect();
    ctrl.select_cell(pick(&targets, rng));
    let action = ctrl.apply().expect("attack commit with valid selection");
    ctrl.acknowledge();
    action
}

/// Plays a single battle to elimination or the turn cap.
pub fn play_battle(battle_id: usize, config: &SelfPlayConfig, rng: &mut impl Rng) -> BattleRecord {
    let deployment = random_deployment(rng);
    let mut ctrl = TurnController::new(&deployment).expect("random deployment is valid");

    let mut record = BattleRecord {
        battle_id,
        opening: encode_sfen(&ctrl),
        turns: Vec::new(),
        winner: None,
    };

    while ctrl.winner().is_none() && ctrl.turn_number() <= config.max_turns {
        let turn = ctrl.turn_number();
        let team = ctrl.current_team();
        let action = play_turn(&mut ctrl, rng);
        record.turns.push(TurnRecord {
            turn,
            team,
            action: action.into(),
            sfen: encode_sfen(&ctrl),
        });
    }

    record.winner = ctrl.winner();
    record
}

/// Plays the configured number of battles and returns their records.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<BattleRecord> {
    let mut rng = if config.seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(config.seed)
    };
    (0..config.num_battles)
        .map(|id| play_battle(id, config, &mut rng))
        .collect()
}

/// Writes one JSON object per battle, newline separated.
pub fn write_jsonl<W: Write>(battles: &[BattleRecord], out: &mut W) -> std::io::Result<()> {
    for battle in battles {
        serde_json::to_writer(&mut *out, battle)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Prints win/length statistics to stderr.
pub fn print_summary(battles: &[BattleRecord]) {
    let red = battles.iter().filter(|b| b.winner == Some(Team::Red)).count();
    let blue = battles
        .iter()
        .filter(|b| b.winner == Some(Team::Blue))
        .count();
    let capped = battles.iter().filter(|b| b.winner.is_none()).count();
    let avg_turns = if battles.is_empty() {
        0.0
    } else {
        battles.iter().map(|b| b.turns.len()).sum::<usize>() as f64 / battles.len() as f64
    };
    eprintln!(
        "red {} / blue {} / capped {}, avg {:.1} turns",
        red, blue, capped, avg_turns
    );
}

//! The turn state machine.
//!
//! Sequences a side's intent -- pick an operation, pick cells, commit --
//! into roster mutations, then hands the turn to the other side once the
//! presentation layer acknowledges that its effects have finished.
//!
//! Every command defensively re-validates its input and rejects illegal
//! selections as silent no-ops: the presentation layer is expected to only
//! offer legal choices, but nothing here trusts it. No command panics and
//! none returns an error for a merely illegal selection.

use std::collections::BTreeSet;

use crate::board::{CellPos, DeployError, Deployment, Roster, Team};
use crate::rules::{attackable_cells, classify_attack, movable_cells, Outcome};

/// The two operations a side may take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Attack,
    Move,
}

impl OpKind {
    /// Returns the lowercase protocol word for the operation.
    pub const fn name(self) -> &'static str {
        match self {
            OpKind::Attack => "attack",
            OpKind::Move => "move",
        }
    }

    /// Parses an operation from its lowercase protocol word.
    pub fn from_name(s: &str) -> Option<OpKind> {
        match s {
            "attack" => Some(OpKind::Attack),
            "move" => Some(OpKind::Move),
            _ => None,
        }
    }
}

/// Where the current turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Top of the turn: waiting for the side to choose attack or move.
    OpSelect,
    /// Waiting for a depth charge target.
    AttackTarget,
    /// Waiting for the side to pick which boat moves.
    MoveActor,
    /// Waiting for the chosen boat's destination.
    MoveDest,
    /// The commit is applied; waiting for the presentation layer to
    /// acknowledge before the turn is handed over.
    Resolving,
    /// One fleet has been eliminated; only a session reset leaves this.
    Finished,
}

impl Phase {
    /// Returns the lowercase protocol word for the phase.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::OpSelect => "opselect",
            Phase::AttackTarget => "attacktarget",
            Phase::MoveActor => "moveactor",
            Phase::MoveDest => "movedest",
            Phase::Resolving => "resolving",
            Phase::Finished => "finished",
        }
    }
}

/// A committed turn action, returned by [`TurnController::apply`] for the
/// presentation layer to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A depth charge was dropped. The outcome is classified against the
    /// roster as it stood before the damage was applied.
    Attack { target: CellPos, outcome: Outcome },
    /// A boat moved.
    Move { from: CellPos, to: CellPos },
}

/// The battle's turn controller: whose turn it is, where in the turn the
/// interaction stands, the pending selections, and the roster itself.
///
/// The controller is the roster's only mutator. The rule calculators and
/// the presentation layer read snapshots via [`TurnController::roster`].
#[derive(Debug, Clone, PartialEq)]
pub struct TurnController {
    roster: Roster,
    current_team: Team,
    turn_number: u32,
    phase: Phase,
    attack_target: Option<CellPos>,
    move_actor: Option<CellPos>,
    move_dest: Option<CellPos>,
    winner: Option<Team>,
}

impl TurnController {
    /// Starts a battle from a validated deployment. Red moves first on
    /// turn 1. Refuses any deployment without exactly four boats per side.
    pub fn new(deployment: &Deployment) -> Result<Self, DeployError> {
        deployment.validate()?;
        let mut roster = Roster::new();
        for team in [Team::Red, Team::Blue] {
            for &pos in deployment.cells(team) {
                roster.add(team, pos);
            }
        }
        Ok(TurnController::from_position(roster, Team::Red, 1))
    }

    /// Resumes a battle from a mid-game position, e.g. one parsed from
    /// SFEN. If one side is already eliminated the controller starts in
    /// the finished state.
    pub fn from_position(roster: Roster, team: Team, turn_number: u32) -> Self {
        let winner = [Team::Red, Team::Blue]
            .into_iter()
            .find(|&t| roster.is_winner(t));
        let phase = if winner.is_some() {
            Phase::Finished
        } else {
            Phase::OpSelect
        };
        TurnController {
            roster,
            current_team: team,
            turn_number,
            phase,
            attack_target: None,
            move_actor: None,
            move_dest: None,
            winner,
        }
    }

    /// Chooses the operation for this turn. Accepted only at the top of
    /// the turn; anywhere else it is a no-op.
    pub fn select_op(&mut self, op: OpKind) -> bool {
        if self.phase != Phase::OpSelect {
            return false;
        }
        self.clear_selections();
        self.phase = match op {
            OpKind::Attack => Phase::AttackTarget,
            OpKind::Move => Phase::MoveActor,
        };
        true
    }

    /// Handles a cell selection; its meaning depends on the phase.
    ///
    /// Illegal selections -- a cell outside the legal set, a cell with no
    /// friendly boat when picking the mover, a selection in a phase that
    /// takes none -- are rejected without changing anything.
    pub fn select_cell(&mut self, pos: CellPos) -> bool {
        match self.phase {
            Phase::AttackTarget => {
                if !attackable_cells(self.current_team, &self.roster).contains(&pos) {
                    return false;
                }
                // Re-selection overwrites the pending target.
                self.attack_target = Some(pos);
                true
            }
            Phase::MoveActor => {
                if !self.roster.exists_at(self.current_team, pos) {
                    return false;
                }
                self.move_actor = Some(pos);
                self.phase = Phase::MoveDest;
                true
            }
            Phase::MoveDest => {
                let actor = match self.move_actor {
                    Some(a) => a,
                    None => return false,
                };
                if movable_cells(actor, self.current_team, &self.roster).contains(&pos) {
                    self.move_dest = Some(pos);
                    return true;
                }
                // Picking another friendly boat changes one's mind about
                // which boat moves; destinations never overlap friendly
                // cells, so the two cases are disjoint.
                if self.roster.exists_at(self.current_team, pos) {
                    self.move_actor = Some(pos);
                    self.move_dest = None;
                    return true;
                }
                false
            }
            Phase::OpSelect | Phase::Resolving | Phase::Finished => false,
        }
    }

    /// Commits the pending selection.
    ///
    /// For an attack, the outcome is classified against the roster before
    /// the damage lands, then one hit point of damage is applied to the
    /// target cell. For a move, the actor is relocated. Either way the
    /// roster mutation happens here, synchronously; the turn handoff waits
    /// for [`TurnController::acknowledge`].
    ///
    /// Returns the committed action, or `None` when there is nothing to
    /// commit.
    pub fn apply(&mut self) -> Option<Action> {
        match self.phase {
            Phase::AttackTarget => {
                let target = self.attack_target?;
                let defender = self.current_team.opponent();
                let outcome = classify_attack(target, defender, &self.roster);
                self.roster.apply_damage(defender, target);
                self.phase = Phase::Resolving;
                Some(Action::Attack { target, outcome })
            }
            Phase::MoveDest => {
                let from = self.move_actor?;
                let to = self.move_dest?;
                if !self.roster.relocate(self.current_team, from, to) {
                    return None;
                }
                self.phase = Phase::Resolving;
                Some(Action::Move { from, to })
            }
            _ => None,
        }
    }

    /// Abandons the pending selection and returns to the top of the turn.
    ///
    /// Never touches the roster, and is idempotent: cancelling twice, or
    /// with nothing pending, leaves the controller exactly as it was.
    pub fn cancel(&mut self) {
        match self.phase {
            Phase::AttackTarget | Phase::MoveActor | Phase::MoveDest => {
                self.clear_selections();
                self.phase = Phase::OpSelect;
            }
            Phase::OpSelect | Phase::Resolving | Phase::Finished => {}
        }
    }

    /// Completes the deferred turn handoff after the presentation layer
    /// has finished showing the committed action: bumps the turn number,
    /// flips the active team, clears selections, and re-checks for a
    /// winner. Accepted only while resolving.
    pub fn acknowledge(&mut self) -> bool {
        if self.phase != Phase::Resolving {
            return false;
        }
        self.turn_number += 1;
        self.current_team = self.current_team.opponent();
        self.clear_selections();
        self.winner = [Team::Red, Team::Blue]
            .into_iter()
            .find(|&t| self.roster.is_winner(t));
        self.phase = if self.winner.is_some() {
            Phase::Finished
        } else {
            Phase::OpSelect
        };
        true
    }

    fn clear_selections(&mut self) {
        self.attack_target = None;
        self.move_actor = None;
        self.move_dest = None;
    }

    /// The current interaction phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The side whose turn it is.
    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// The 1-based turn counter. Advances once per acknowledged turn.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// The winning team, once one fleet has been eliminated.
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Read-only view of both fleets.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The pending depth charge target, if one is selected.
    pub fn attack_target(&self) -> Option<CellPos> {
        self.attack_target
    }

    /// The boat selected to move, if any.
    pub fn move_actor(&self) -> Option<CellPos> {
        self.move_actor
    }

    /// The pending move destination, if one is selected.
    pub fn move_dest(&self) -> Option<CellPos> {
        self.move_dest
    }

    /// Cells the active side may fire at right now, for highlighting.
    pub fn attackable(&self) -> BTreeSet<CellPos> {
        attackable_cells(self.current_team, &self.roster)
    }

    /// Legal destinations for the selected mover, for highlighting.
    /// Empty until a boat has been picked.
    pub fn movable(&self) -> BTreeSet<CellPos> {
        match self.move_actor {
            Some(actor) => movable_cells(actor, self.current_team, &self.roster),
            None => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> CellPos {
        CellPos::new(row, col)
    }

    fn start_battle() -> TurnController {
        let deployment = Deployment::from_lists(
            &[pos(0, 0), pos(0, 1), pos(0, 2), pos(0, 3)],
            &[pos(4, 0), pos(4, 1), pos(4, 2), pos(4, 3)],
        )
        .unwrap();
        TurnController::new(&deployment).unwrap()
    }

    /// A two-boat position with the fleets in depth charge range.
    fn close_quarters() -> TurnController {
        let mut roster = Roster::new();
        roster.add(Team::Red, pos(2, 2));
        roster.add(Team::Blue, pos(2, 3));
        TurnController::from_position(roster, Team::Red, 1)
    }

    #[test]
    fn new_battle_starts_with_red_on_turn_one() {
        let ctrl = start_battle();
        assert_eq!(ctrl.phase(), Phase::OpSelect);
        assert_eq!(ctrl.current_team(), Team::Red);
        assert_eq!(ctrl.turn_number(), 1);
        assert_eq!(ctrl.winner(), None);
        assert_eq!(ctrl.roster().count_alive(Team::Red), 4);
        assert_eq!(ctrl.roster().count_alive(Team::Blue), 4);
    }

    #[test]
    fn new_refuses_incomplete_deployment() {
        let mut deployment = Deployment::new();
        deployment.toggle(Team::Red, pos(0, 0));
        assert!(matches!(
            TurnController::new(&deployment),
            Err(DeployError::WrongFleetSize { .. })
        ));
    }

    #[test]
    fn select_op_moves_to_the_matching_phase() {
        let mut ctrl = start_battle();
        assert!(ctrl.select_op(OpKind::Attack));
        assert_eq!(ctrl.phase(), Phase::AttackTarget);

        let mut ctrl = start_battle();
        assert!(ctrl.select_op(OpKind::Move));
        assert_eq!(ctrl.phase(), Phase::MoveActor);
    }

    #[test]
    fn select_op_rejected_outside_top_of_turn() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        assert!(!ctrl.select_op(OpKind::Move));
        assert_eq!(ctrl.phase(), Phase::AttackTarget);
    }

    #[test]
    fn attack_target_must_be_legal() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        // (3,3) is far from every red boat on row 0.
        assert!(!ctrl.select_cell(pos(3, 3)));
        assert_eq!(ctrl.attack_target(), None);
        // A friendly cell is never attackable.
        assert!(!ctrl.select_cell(pos(0, 0)));
        // (1,1) neighbors red's row-0 boats.
        assert!(ctrl.select_cell(pos(1, 1)));
        assert_eq!(ctrl.attack_target(), Some(pos(1, 1)));
    }

    #[test]
    fn reselecting_attack_target_overwrites() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        assert!(ctrl.select_cell(pos(1, 1)));
        assert!(ctrl.select_cell(pos(1, 2)));
        assert_eq!(ctrl.attack_target(), Some(pos(1, 2)));
    }

    #[test]
    fn attack_commit_classifies_before_damage() {
        let mut ctrl = close_quarters();
        ctrl.select_op(OpKind::Attack);
        assert!(ctrl.select_cell(pos(2, 3)));
        let action = ctrl.apply().unwrap();
        // Blue boat had 3 hp: classified as a plain hit, then damaged.
        assert_eq!(
            action,
            Action::Attack {
                target: pos(2, 3),
                outcome: Outcome::Hit
            }
        );
        assert_eq!(ctrl.roster().unit_at(Team::Blue, pos(2, 3)).unwrap().hp, 2);
        assert_eq!(ctrl.phase(), Phase::Resolving);
    }

    #[test]
    fn lethal_attack_reports_sunk_and_removes_the_boat() {
        let mut ctrl = close_quarters();
        // Wear the blue boat down to 1 hp; blue returns fire into empty
        // water in between.
        for _ in 0..2 {
            ctrl.select_op(OpKind::Attack);
            ctrl.select_cell(pos(2, 3));
            ctrl.apply().unwrap();
            ctrl.acknowledge();
            ctrl.select_op(OpKind::Attack);
            ctrl.select_cell(pos(1, 3));
            ctrl.apply().unwrap();
            ctrl.acknowledge();
        }
        assert_eq!(ctrl.roster().unit_at(Team::Blue, pos(2, 3)).unwrap().hp, 1);

        ctrl.select_op(OpKind::Attack);
        ctrl.select_cell(pos(2, 3));
        let action = ctrl.apply().unwrap();
        assert_eq!(
            action,
            Action::Attack {
                target: pos(2, 3),
                outcome: Outcome::Sunk
            }
        );
        assert!(!ctrl.roster().exists_at(Team::Blue, pos(2, 3)));

        assert!(ctrl.acknowledge());
        assert_eq!(ctrl.phase(), Phase::Finished);
        assert_eq!(ctrl.winner(), Some(Team::Red));
    }

    #[test]
    fn attack_on_empty_water_still_commits() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        assert!(ctrl.select_cell(pos(1, 1)));
        let action = ctrl.apply().unwrap();
        // No blue boat anywhere near row 1.
        assert_eq!(
            action,
            Action::Attack {
                target: pos(1, 1),
                outcome: Outcome::Miss
            }
        );
        assert_eq!(ctrl.roster().count_alive(Team::Blue), 4);
    }

    #[test]
    fn move_actor_must_be_a_friendly_boat() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Move);
        // Empty cell.
        assert!(!ctrl.select_cell(pos(2, 2)));
        // Enemy boat.
        assert!(!ctrl.select_cell(pos(4, 0)));
        assert_eq!(ctrl.phase(), Phase::MoveActor);
        // Own boat.
        assert!(ctrl.select_cell(pos(0, 0)));
        assert_eq!(ctrl.phase(), Phase::MoveDest);
        assert_eq!(ctrl.move_actor(), Some(pos(0, 0)));
    }

    #[test]
    fn move_commit_relocates_the_actor() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Move);
        ctrl.select_cell(pos(0, 0));
        assert!(ctrl.select_cell(pos(2, 0)));
        let action = ctrl.apply().unwrap();
        assert_eq!(
            action,
            Action::Move {
                from: pos(0, 0),
                to: pos(2, 0)
            }
        );
        assert!(!ctrl.roster().exists_at(Team::Red, pos(0, 0)));
        assert!(ctrl.roster().exists_at(Team::Red, pos(2, 0)));
        assert_eq!(ctrl.phase(), Phase::Resolving);
    }

    #[test]
    fn move_dest_rejects_illegal_cells() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Move);
        ctrl.select_cell(pos(0, 0));
        // Diagonal.
        assert!(!ctrl.select_cell(pos(1, 1)));
        // Three steps away.
        assert!(!ctrl.select_cell(pos(3, 0)));
        assert_eq!(ctrl.move_dest(), None);
    }

    #[test]
    fn picking_another_boat_changes_the_actor() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Move);
        ctrl.select_cell(pos(0, 0));
        assert!(ctrl.select_cell(pos(2, 0)));
        // Changing one's mind: select a different friendly boat.
        assert!(ctrl.select_cell(pos(0, 3)));
        assert_eq!(ctrl.move_actor(), Some(pos(0, 3)));
        assert_eq!(ctrl.move_dest(), None);
        assert_eq!(ctrl.phase(), Phase::MoveDest);
        // And the new actor can pick a destination.
        assert!(ctrl.select_cell(pos(2, 3)));
        assert_eq!(ctrl.move_dest(), Some(pos(2, 3)));
    }

    #[test]
    fn apply_without_selection_is_rejected() {
        let mut ctrl = start_battle();
        assert_eq!(ctrl.apply(), None);
        ctrl.select_op(OpKind::Attack);
        assert_eq!(ctrl.apply(), None);
        ctrl.cancel();
        ctrl.select_op(OpKind::Move);
        assert_eq!(ctrl.apply(), None);
        ctrl.select_cell(pos(0, 0));
        assert_eq!(ctrl.apply(), None);
    }

    #[test]
    fn acknowledge_hands_the_turn_over() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        ctrl.select_cell(pos(1, 1));
        ctrl.apply().unwrap();

        assert!(ctrl.acknowledge());
        assert_eq!(ctrl.turn_number(), 2);
        assert_eq!(ctrl.current_team(), Team::Blue);
        assert_eq!(ctrl.phase(), Phase::OpSelect);
        assert_eq!(ctrl.attack_target(), None);
    }

    #[test]
    fn acknowledge_rejected_unless_resolving() {
        let mut ctrl = start_battle();
        assert!(!ctrl.acknowledge());
        ctrl.select_op(OpKind::Attack);
        assert!(!ctrl.acknowledge());
        assert_eq!(ctrl.turn_number(), 1);
        assert_eq!(ctrl.current_team(), Team::Red);
    }

    #[test]
    fn turns_alternate_and_count_up() {
        let mut ctrl = start_battle();
        let mut expected_team = Team::Red;
        for expected_turn in 1..=6u32 {
            assert_eq!(ctrl.turn_number(), expected_turn);
            assert_eq!(ctrl.current_team(), expected_team);
            ctrl.select_op(OpKind::Attack);
            let target = *ctrl.attackable().iter().next().unwrap();
            ctrl.select_cell(target);
            ctrl.apply().unwrap();
            ctrl.acknowledge();
            expected_team = expected_team.opponent();
        }
        assert_eq!(ctrl.turn_number(), 7);
    }

    #[test]
    fn cancel_returns_to_top_of_turn_without_touching_the_roster() {
        let mut ctrl = start_battle();
        let roster_before = ctrl.roster().clone();

        ctrl.select_op(OpKind::Attack);
        ctrl.select_cell(pos(1, 1));
        ctrl.cancel();
        assert_eq!(ctrl.phase(), Phase::OpSelect);
        assert_eq!(ctrl.attack_target(), None);

        ctrl.select_op(OpKind::Move);
        ctrl.select_cell(pos(0, 0));
        ctrl.select_cell(pos(2, 0));
        ctrl.cancel();
        assert_eq!(ctrl.phase(), Phase::OpSelect);
        assert_eq!(ctrl.move_actor(), None);
        assert_eq!(ctrl.move_dest(), None);

        assert_eq!(ctrl.roster(), &roster_before);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        ctrl.cancel();
        let phase = ctrl.phase();
        let team = ctrl.current_team();
        let turn = ctrl.turn_number();
        ctrl.cancel();
        ctrl.cancel();
        assert_eq!(ctrl.phase(), phase);
        assert_eq!(ctrl.current_team(), team);
        assert_eq!(ctrl.turn_number(), turn);
    }

    #[test]
    fn cancel_does_nothing_while_resolving() {
        let mut ctrl = start_battle();
        ctrl.select_op(OpKind::Attack);
        ctrl.select_cell(pos(1, 1));
        ctrl.apply().unwrap();
        ctrl.cancel();
        assert_eq!(ctrl.phase(), Phase::Resolving);
        assert!(ctrl.acknowledge());
    }

    #[test]
    fn finished_battle_rejects_all_commands() {
        let mut roster = Roster::new();
        roster.add(Team::Red, pos(2, 2));
        let mut ctrl = TurnController::from_position(roster, Team::Red, 9);
        assert_eq!(ctrl.phase(), Phase::Finished);
        assert_eq!(ctrl.winner(), Some(Team::Red));

        assert!(!ctrl.select_op(OpKind::Attack));
        assert!(!ctrl.select_cell(pos(2, 2)));
        assert_eq!(ctrl.apply(), None);
        assert!(!ctrl.acknowledge());
        ctrl.cancel();
        assert_eq!(ctrl.phase(), Phase::Finished);
    }

    #[test]
    fn from_position_with_both_fleets_alive_awaits_op() {
        let ctrl = close_quarters();
        assert_eq!(ctrl.phase(), Phase::OpSelect);
        assert_eq!(ctrl.winner(), None);
    }

    #[test]
    fn movable_query_empty_until_actor_picked() {
        let mut ctrl = start_battle();
        assert!(ctrl.movable().is_empty());
        ctrl.select_op(OpKind::Move);
        assert!(ctrl.movable().is_empty());
        ctrl.select_cell(pos(0, 0));
        assert!(!ctrl.movable().is_empty());
    }

    #[test]
    fn attack_then_move_onto_shared_cell_is_legal() {
        let mut ctrl = close_quarters();
        // Red moves onto blue's cell.
        ctrl.select_op(OpKind::Move);
        ctrl.select_cell(pos(2, 2));
        assert!(ctrl.select_cell(pos(2, 3)));
        ctrl.apply().unwrap();
        ctrl.acknowledge();
        assert!(ctrl.roster().exists_at(Team::Red, pos(2, 3)));
        assert!(ctrl.roster().exists_at(Team::Blue, pos(2, 3)));
    }
}

//! Game lifecycle engine.
//!
//! Drives each game through
//! `AwaitingBet -> AwaitingReveal -> Resolved`, or straight from
//! `AwaitingBet` to `Resolved` by cancellation or an unplayed-game claim.
//!
//! Every mutating operation checks its guards in one fixed order:
//! pause, existence, state, authorization, timing, then business rules.
//! All checks run before the first mutation, and the only fallible step
//! after them (custody) is undone on failure, so a rejected call changes
//! nothing.

mod config;

pub use config::{BetPayment, CancelPolicy, EngineConfig, DEFAULT_GRACE_PERIOD};

use crate::crypto::{compute_commitment, Commitment, Secret};
use crate::error::{EngineError, Result};
use crate::games::{resolve, Choice, Outcome};
use crate::host::Host;
use crate::ledger::BalanceLedger;
use crate::protocol::{GameEvent, GameId, GamePhase, GameRecord, PrincipalId, Resolution};
use crate::registry::GameRegistry;
use tracing::{debug, info, warn};

/// Engine instance owning its registry, ledger and event journal.
pub struct GameEngine<H> {
    host: H,
    config: EngineConfig,
    registry: GameRegistry,
    ledger: BalanceLedger,
    events: Vec<GameEvent>,
}

/// Log a rejected operation on its way out.
fn rejected(op: &'static str, caller: PrincipalId) -> impl FnOnce(EngineError) -> EngineError {
    move |e| {
        debug!(op, %caller, error = %e, "operation rejected");
        e
    }
}

impl<H: Host> GameEngine<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            registry: GameRegistry::new(),
            ledger: BalanceLedger::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host access for clock and custody administration
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // === Queries ===

    pub fn get_game(&self, id: &GameId) -> Option<&GameRecord> {
        self.registry.get(id)
    }

    pub fn phase(&self, id: &GameId) -> Option<GamePhase> {
        self.registry.get(id).map(GameRecord::phase)
    }

    pub fn get_balance(&self, principal: &PrincipalId) -> u64 {
        self.ledger.balance(principal)
    }

    /// View for a prospective player 1
    pub fn compute_commitment(
        &self,
        choice: u8,
        opponent: &PrincipalId,
        secret: &Secret,
        caller: &PrincipalId,
    ) -> Result<Commitment> {
        compute_commitment(choice, opponent, secret, caller)
    }

    pub fn live_games(&self) -> impl Iterator<Item = (&GameId, &GameRecord)> {
        self.registry.live()
    }

    /// Value the engine accounts for: live stakes plus ledger balances.
    ///
    /// Equals the host's custody total after every operation.
    pub fn escrowed_total(&self) -> u64 {
        self.registry
            .live()
            .fold(self.ledger.total(), |acc, (_, g)| acc.saturating_add(g.escrowed()))
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events after the first `cursor` ones
    pub fn events_since(&self, cursor: usize) -> &[GameEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn events_for(&self, principal: &PrincipalId) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.involves(principal)).collect()
    }

    pub fn events_for_game(&self, id: &GameId) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.game_id() == Some(id)).collect()
    }

    /// Records held, settled ones included until pruned
    pub fn game_count(&self) -> usize {
        self.registry.count()
    }

    /// Drop settled records; their commitments stay unusable.
    pub fn prune_settled(&mut self) -> usize {
        let pruned = self.registry.prune_settled();
        if pruned > 0 {
            info!(pruned, remaining = self.registry.count(), "settled games pruned");
        }
        pruned
    }

    // === Guards ===

    fn ensure_operational(&self) -> Result<()> {
        if self.host.is_operational() {
            Ok(())
        } else {
            Err(EngineError::SystemPaused)
        }
    }

    /// Existence and state check in one step.
    fn game_in_phase(&self, id: &GameId, expected: GamePhase) -> Result<&GameRecord> {
        let game = self.registry.get(id).ok_or(EngineError::GameNotFound(*id))?;
        let actual = game.phase();
        if actual != expected {
            return Err(EngineError::WrongState { expected, actual });
        }
        Ok(game)
    }

    fn ensure_caller(caller: &PrincipalId, allowed: &PrincipalId) -> Result<()> {
        if caller == allowed {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    /// Passes once the clock is strictly past `deadline`.
    fn ensure_deadline_passed(&self, deadline: u64) -> Result<()> {
        let height = self.host.current_height();
        if height > deadline {
            Ok(())
        } else {
            Err(EngineError::TimeoutNotReached { deadline, height })
        }
    }

    /// Passes while the clock has not gone past `deadline`.
    fn ensure_not_expired(&self, deadline: u64) -> Result<()> {
        let height = self.host.current_height();
        if height > deadline {
            Err(EngineError::GameExpired { deadline, height })
        } else {
            Ok(())
        }
    }

    /// Absolute deadline `blocks` from now. Zero is the terminal marker and
    /// is never a valid deadline.
    fn deadline_in(&self, blocks: u64) -> Result<u64> {
        self.host
            .current_height()
            .checked_add(blocks)
            .filter(|deadline| *deadline != 0)
            .ok_or(EngineError::InvalidDeadline)
    }

    fn record_mut(&mut self, id: &GameId) -> Result<&mut GameRecord> {
        self.registry.get_mut(id).ok_or(EngineError::GameNotFound(*id))
    }

    fn emit(&mut self, event: GameEvent) -> GameEvent {
        self.events.push(event.clone());
        event
    }

    // === Operations ===

    /// Open a game against `opponent`, escrowing `stake` from the caller.
    pub fn create_game(
        &mut self,
        caller: PrincipalId,
        opponent: PrincipalId,
        commitment: Commitment,
        relative_deadline: u64,
        stake: u64,
    ) -> Result<GameEvent> {
        self.try_create_game(caller, opponent, commitment, relative_deadline, stake)
            .map_err(rejected("create_game", caller))
    }

    fn try_create_game(
        &mut self,
        caller: PrincipalId,
        opponent: PrincipalId,
        commitment: Commitment,
        relative_deadline: u64,
        stake: u64,
    ) -> Result<GameEvent> {
        self.ensure_operational()?;

        if self.registry.is_live(&commitment) {
            return Err(EngineError::DuplicateGame(commitment));
        }
        if self.registry.was_used(&commitment) {
            return Err(EngineError::DuplicateSecretUse);
        }
        if opponent == caller {
            return Err(EngineError::SelfPlay);
        }

        stake.checked_mul(2).ok_or(EngineError::AmountOverflow)?;
        let valid_until_block = self.deadline_in(relative_deadline)?;

        self.host.accept_deposit(&caller, stake).map_err(|e| {
            warn!(%caller, stake, error = %e, "stake deposit refused");
            e
        })?;

        self.registry.insert(
            commitment,
            GameRecord::new(caller, opponent, stake, valid_until_block),
        );

        info!(
            game_id = %commitment,
            player1 = %caller,
            player2 = %opponent,
            stake,
            valid_until_block,
            "game created"
        );

        Ok(self.emit(GameEvent::GameCreated {
            player1: caller,
            player2: opponent,
            game_id: commitment,
            bet_value: stake,
        }))
    }

    /// Player 2 matches the stake and places an open choice.
    ///
    /// `deposit` is the value attached to the call. Under
    /// [`BetPayment::LedgerAssisted`] any shortfall is drawn from the
    /// caller's ledger balance and any excess is credited back as change.
    pub fn bet_in_game(
        &mut self,
        caller: PrincipalId,
        id: GameId,
        choice: u8,
        deposit: u64,
    ) -> Result<GameEvent> {
        self.try_bet_in_game(caller, id, choice, deposit)
            .map_err(rejected("bet_in_game", caller))
    }

    fn try_bet_in_game(
        &mut self,
        caller: PrincipalId,
        id: GameId,
        choice: u8,
        deposit: u64,
    ) -> Result<GameEvent> {
        self.ensure_operational()?;

        let game = self.game_in_phase(&id, GamePhase::AwaitingBet)?;
        let (player1, player2, bet_value, deadline) =
            (game.player1, game.player2, game.bet_value, game.valid_until_block);

        Self::ensure_caller(&caller, &player2)?;
        self.ensure_not_expired(deadline)?;

        let choice = Choice::from_tag(choice)?;

        let (from_ledger, change) = match self.config.bet_payment {
            BetPayment::LedgerAssisted => {
                let balance = self.ledger.balance(&caller);
                let available = deposit.saturating_add(balance);
                if available < bet_value {
                    return Err(EngineError::InsufficientStake {
                        need: bet_value,
                        available,
                    });
                }
                (bet_value.saturating_sub(deposit), deposit.saturating_sub(bet_value))
            }
            BetPayment::Exact => {
                if deposit != bet_value {
                    return Err(EngineError::StakeMismatch {
                        expected: bet_value,
                        provided: deposit,
                    });
                }
                (0, 0)
            }
        };

        let reveal_deadline = self.deadline_in(self.config.grace_period)?;

        if !self.ledger.try_debit(&caller, from_ledger) {
            return Err(EngineError::InsufficientStake {
                need: bet_value,
                available: deposit.saturating_add(self.ledger.balance(&caller)),
            });
        }
        if let Err(e) = self.host.accept_deposit(&caller, deposit) {
            warn!(%caller, deposit, error = %e, "bet deposit refused");
            self.ledger.credit(caller, from_ledger);
            return Err(e.into());
        }
        self.ledger.credit(caller, change);

        let game = self.record_mut(&id)?;
        game.p2_choice = Some(choice);
        game.valid_until_block = reveal_deadline;

        info!(
            game_id = %id,
            player2 = %caller,
            deposit,
            from_ledger,
            change,
            reveal_deadline,
            "bet placed"
        );

        Ok(self.emit(GameEvent::GameReadyForReveal {
            player1,
            player2,
            game_id: id,
        }))
    }

    /// Player 1 opens the commitment and the pot is settled.
    pub fn reveal_choice(
        &mut self,
        caller: PrincipalId,
        id: GameId,
        choice: u8,
        secret: &Secret,
    ) -> Result<GameEvent> {
        self.try_reveal_choice(caller, id, choice, secret)
            .map_err(rejected("reveal_choice", caller))
    }

    fn try_reveal_choice(
        &mut self,
        caller: PrincipalId,
        id: GameId,
        choice: u8,
        secret: &Secret,
    ) -> Result<GameEvent> {
        self.ensure_operational()?;

        let game = self.game_in_phase(&id, GamePhase::AwaitingReveal)?;
        let (player1, player2, deadline, pot) =
            (game.player1, game.player2, game.valid_until_block, game.pot());
        let p2_choice = game.p2_choice.ok_or(EngineError::WrongState {
            expected: GamePhase::AwaitingReveal,
            actual: GamePhase::AwaitingBet,
        })?;

        Self::ensure_caller(&caller, &player1)?;
        if self.config.enforce_reveal_deadline {
            self.ensure_not_expired(deadline)?;
        }

        let choice = Choice::from_tag(choice)?;
        if !id.verify(choice, &player2, secret, &player1) {
            return Err(EngineError::RevealMismatch);
        }

        let outcome = resolve(choice, p2_choice);
        let winner = match outcome {
            Outcome::Player1Wins => {
                self.ledger.credit(player1, pot);
                Some(player1)
            }
            Outcome::Player2Wins => {
                self.ledger.credit(player2, pot);
                Some(player2)
            }
            Outcome::Draw => {
                let half = pot / 2;
                self.ledger.credit(player1, half);
                self.ledger.credit(player2, pot - half);
                None
            }
        };

        self.record_mut(&id)?.settle(Resolution::Revealed);

        info!(
            game_id = %id,
            p1_choice = %choice,
            p2_choice = %p2_choice,
            %outcome,
            pot,
            "game resolved"
        );

        Ok(self.emit(GameEvent::GameResolved {
            game_id: id,
            winner,
            prize: pot,
        }))
    }

    /// Player 1 withdraws an unanswered game and gets the stake back.
    pub fn cancel_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.try_cancel_game(caller, id)
            .map_err(rejected("cancel_game", caller))
    }

    fn try_cancel_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.ensure_operational()?;

        let game = self.game_in_phase(&id, GamePhase::AwaitingBet)?;
        let (player1, bet_value, deadline) = (game.player1, game.bet_value, game.valid_until_block);

        Self::ensure_caller(&caller, &player1)?;
        // Under the deadline policy an unexpired game is not yet cancellable.
        if self.config.cancel_policy == CancelPolicy::AfterDeadline
            && self.host.current_height() <= deadline
        {
            return Err(EngineError::WrongState {
                expected: GamePhase::AwaitingBet,
                actual: GamePhase::AwaitingBet,
            });
        }

        self.ledger.credit(player1, bet_value);
        self.record_mut(&id)?.settle(Resolution::Cancelled);

        info!(game_id = %id, player1 = %caller, refund = bet_value, "game cancelled");

        Ok(self.emit(GameEvent::GameCancelled {
            cancelled_by: caller,
            game_id: id,
        }))
    }

    /// Player 1 reclaims the stake of a game nobody bet on before the deadline.
    pub fn claim_unplayed_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.try_claim_unplayed_game(caller, id)
            .map_err(rejected("claim_unplayed_game", caller))
    }

    fn try_claim_unplayed_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.ensure_operational()?;

        let game = self.game_in_phase(&id, GamePhase::AwaitingBet)?;
        let (player1, bet_value, deadline) = (game.player1, game.bet_value, game.valid_until_block);

        Self::ensure_caller(&caller, &player1)?;
        self.ensure_deadline_passed(deadline)?;

        self.ledger.credit(player1, bet_value);
        self.record_mut(&id)?.settle(Resolution::UnplayedClaimed);

        info!(game_id = %id, player1 = %caller, refund = bet_value, "unplayed game reclaimed");

        Ok(self.emit(GameEvent::UnplayedGameReclaimed {
            claimed_by: caller,
            game_id: id,
        }))
    }

    /// Player 2 takes the whole pot when player 1 never revealed.
    pub fn claim_unrevealed_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.try_claim_unrevealed_game(caller, id)
            .map_err(rejected("claim_unrevealed_game", caller))
    }

    fn try_claim_unrevealed_game(&mut self, caller: PrincipalId, id: GameId) -> Result<GameEvent> {
        self.ensure_operational()?;

        let game = self.game_in_phase(&id, GamePhase::AwaitingReveal)?;
        let (player2, pot, deadline) = (game.player2, game.pot(), game.valid_until_block);

        Self::ensure_caller(&caller, &player2)?;
        self.ensure_deadline_passed(deadline)?;

        self.ledger.credit(player2, pot);
        self.record_mut(&id)?.settle(Resolution::UnrevealedClaimed);

        info!(game_id = %id, player2 = %caller, pot, "unrevealed game claimed");

        Ok(self.emit(GameEvent::UnrevealedGameClaimed {
            claimed_by: caller,
            game_id: id,
        }))
    }

    /// Pay the caller's whole ledger balance out of custody.
    ///
    /// The ledger entry is zeroed before the payout runs and restored only if
    /// the payout fails.
    pub fn withdraw(&mut self, caller: PrincipalId) -> Result<GameEvent> {
        self.try_withdraw(caller).map_err(rejected("withdraw", caller))
    }

    fn try_withdraw(&mut self, caller: PrincipalId) -> Result<GameEvent> {
        self.ensure_operational()?;

        let Self { ledger, host, .. } = self;
        let paid = ledger
            .withdraw_with(&caller, |amount| host.pay_out(&caller, amount))
            .map_err(|e| {
                warn!(%caller, error = %e, "payout failed, balance restored");
                EngineError::from(e)
            })?;
        let amount = paid.ok_or(EngineError::NoBalance)?;

        info!(who = %caller, amount, "withdrawal");

        Ok(self.emit(GameEvent::Withdrawal { who: caller, amount }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Clock, Custody, SimulatedHost};

    struct Table {
        engine: GameEngine<SimulatedHost>,
        p1: PrincipalId,
        p2: PrincipalId,
    }

    impl Table {
        fn new(config: EngineConfig) -> Self {
            Self {
                engine: GameEngine::with_config(SimulatedHost::unbounded(1), config),
                p1: PrincipalId::new(),
                p2: PrincipalId::new(),
            }
        }

        fn open(&mut self, choice: Choice, secret: &str, deadline: u64, stake: u64) -> GameId {
            let id = Commitment::new(choice, &self.p2, &Secret::from_phrase(secret), &self.p1);
            self.engine
                .create_game(self.p1, self.p2, id, deadline, stake)
                .unwrap();
            id
        }
    }

    #[test]
    fn test_pause_checked_before_everything() {
        let mut t = Table::new(EngineConfig::default());
        t.engine.host_mut().pause();
        let unknown = Commitment::from_bytes([9; 32]);

        assert_eq!(
            t.engine.bet_in_game(t.p2, unknown, 0, 0),
            Err(EngineError::SystemPaused)
        );
        assert_eq!(t.engine.withdraw(t.p1), Err(EngineError::SystemPaused));
    }

    #[test]
    fn test_existence_before_state() {
        let mut t = Table::new(EngineConfig::default());
        let unknown = Commitment::from_bytes([9; 32]);

        assert_eq!(
            t.engine.cancel_game(t.p1, unknown),
            Err(EngineError::GameNotFound(unknown))
        );
    }

    #[test]
    fn test_state_before_authorization() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);

        let stranger = PrincipalId::new();
        assert_eq!(
            t.engine.claim_unrevealed_game(stranger, id),
            Err(EngineError::WrongState {
                expected: GamePhase::AwaitingReveal,
                actual: GamePhase::AwaitingBet,
            })
        );
    }

    #[test]
    fn test_authorization_before_timing_and_choice() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        t.engine.host_mut().advance(50);

        assert_eq!(
            t.engine.bet_in_game(t.p1, id, 0, 100),
            Err(EngineError::Unauthorized)
        );
    }

    #[test]
    fn test_timing_before_choice_validation() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        t.engine.host_mut().advance(11);

        assert!(matches!(
            t.engine.bet_in_game(t.p2, id, 9, 100),
            Err(EngineError::GameExpired { .. })
        ));
    }

    #[test]
    fn test_bet_on_deadline_block_allowed() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        t.engine.host_mut().advance(10);

        t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 100).unwrap();
        assert_eq!(t.engine.phase(&id), Some(GamePhase::AwaitingReveal));
    }

    #[test]
    fn test_bet_rearms_clock_with_grace_period() {
        let config = EngineConfig {
            grace_period: 7,
            ..EngineConfig::default()
        };
        let mut t = Table::new(config);
        let id = t.open(Choice::Rock, "s", 1000, 100);
        t.engine.host_mut().advance(3);

        t.engine.bet_in_game(t.p2, id, Choice::Rock.tag(), 100).unwrap();
        let height = t.engine.host().current_height();
        assert_eq!(t.engine.get_game(&id).unwrap().valid_until_block, height + 7);
    }

    #[test]
    fn test_invalid_choice_on_bet() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);

        assert_eq!(
            t.engine.bet_in_game(t.p2, id, 0, 100),
            Err(EngineError::InvalidChoice(0))
        );
        assert_eq!(t.engine.phase(&id), Some(GamePhase::AwaitingBet));
        assert_eq!(t.engine.host().held(), 100);
    }

    #[test]
    fn test_ledger_assisted_bet_uses_balance() {
        let mut t = Table::new(EngineConfig::default());
        t.engine.ledger.credit(t.p2, 60);
        t.engine.host_mut().accept_deposit(&t.p2, 60).unwrap();
        let id = t.open(Choice::Rock, "s", 10, 100);

        t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 40).unwrap();
        assert_eq!(t.engine.get_balance(&t.p2), 0);
        assert_eq!(t.engine.escrowed_total(), t.engine.host().held());
    }

    #[test]
    fn test_insufficient_stake() {
        let mut t = Table::new(EngineConfig::default());
        t.engine.ledger.credit(t.p2, 10);
        t.engine.host_mut().accept_deposit(&t.p2, 10).unwrap();
        let id = t.open(Choice::Rock, "s", 10, 100);

        assert_eq!(
            t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 80),
            Err(EngineError::InsufficientStake {
                need: 100,
                available: 90
            })
        );
        assert_eq!(t.engine.get_balance(&t.p2), 10);
        assert_eq!(t.engine.phase(&id), Some(GamePhase::AwaitingBet));
    }

    #[test]
    fn test_exact_payment_mode() {
        let config = EngineConfig {
            bet_payment: BetPayment::Exact,
            ..EngineConfig::default()
        };
        let mut t = Table::new(config);
        t.engine.ledger.credit(t.p2, 500);
        t.engine.host_mut().accept_deposit(&t.p2, 500).unwrap();
        let id = t.open(Choice::Rock, "s", 10, 100);

        assert_eq!(
            t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 150),
            Err(EngineError::StakeMismatch {
                expected: 100,
                provided: 150
            })
        );
        assert_eq!(
            t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 0),
            Err(EngineError::StakeMismatch {
                expected: 100,
                provided: 0
            })
        );
        t.engine.bet_in_game(t.p2, id, Choice::Paper.tag(), 100).unwrap();
        assert_eq!(t.engine.get_balance(&t.p2), 500);
    }

    #[test]
    fn test_failed_bet_deposit_restores_ledger() {
        let mut engine = GameEngine::new(SimulatedHost::new(1));
        let (p1, p2) = (PrincipalId::new(), PrincipalId::new());
        engine.host_mut().fund(p1, 100);
        engine.ledger.credit(p2, 30);
        let id = Commitment::new(Choice::Rock, &p2, &Secret::from_phrase("s"), &p1);
        engine.create_game(p1, p2, id, 10, 100).unwrap();

        // Ledger covers 30, wallet cannot cover the remaining 70.
        assert!(matches!(
            engine.bet_in_game(p2, id, Choice::Paper.tag(), 70),
            Err(EngineError::Custody(_))
        ));
        assert_eq!(engine.get_balance(&p2), 30);
        assert_eq!(engine.phase(&id), Some(GamePhase::AwaitingBet));
    }

    #[test]
    fn test_cancel_before_bet_any_time() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);

        let event = t.engine.cancel_game(t.p1, id).unwrap();
        assert_eq!(
            event,
            GameEvent::GameCancelled {
                cancelled_by: t.p1,
                game_id: id
            }
        );
        assert_eq!(t.engine.get_balance(&t.p1), 100);
        assert_eq!(
            t.engine.phase(&id),
            Some(GamePhase::Resolved(Some(Resolution::Cancelled)))
        );
    }

    #[test]
    fn test_cancel_after_deadline_policy() {
        let config = EngineConfig {
            cancel_policy: CancelPolicy::AfterDeadline,
            ..EngineConfig::default()
        };
        let mut t = Table::new(config);
        let id = t.open(Choice::Rock, "s", 10, 100);
        let premature = Err(EngineError::WrongState {
            expected: GamePhase::AwaitingBet,
            actual: GamePhase::AwaitingBet,
        });

        assert_eq!(t.engine.cancel_game(t.p1, id), premature);
        t.engine.host_mut().advance(10);
        assert_eq!(t.engine.cancel_game(t.p1, id), premature);
        assert_eq!(t.engine.get_balance(&t.p1), 0);

        t.engine.host_mut().advance(1);
        assert!(matches!(
            t.engine.cancel_game(t.p1, id),
            Ok(GameEvent::GameCancelled { .. })
        ));
        assert_eq!(t.engine.get_balance(&t.p1), 100);
    }

    #[test]
    fn test_cancel_after_bet_is_wrong_state() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        t.engine.bet_in_game(t.p2, id, Choice::Rock.tag(), 100).unwrap();

        assert!(matches!(
            t.engine.cancel_game(t.p1, id),
            Err(EngineError::WrongState { .. })
        ));
    }

    #[test]
    fn test_cancel_by_opponent_unauthorized() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);

        assert_eq!(t.engine.cancel_game(t.p2, id), Err(EngineError::Unauthorized));
    }

    #[test]
    fn test_enforced_reveal_deadline() {
        let config = EngineConfig {
            grace_period: 5,
            enforce_reveal_deadline: true,
            ..EngineConfig::default()
        };
        let mut t = Table::new(config);
        let id = t.open(Choice::Paper, "s", 10, 100);
        t.engine.bet_in_game(t.p2, id, Choice::Rock.tag(), 100).unwrap();
        t.engine.host_mut().advance(6);

        assert!(matches!(
            t.engine.reveal_choice(t.p1, id, Choice::Paper.tag(), &Secret::from_phrase("s")),
            Err(EngineError::GameExpired { .. })
        ));
    }

    #[test]
    fn test_late_reveal_allowed_by_default() {
        let config = EngineConfig {
            grace_period: 5,
            ..EngineConfig::default()
        };
        let mut t = Table::new(config);
        let id = t.open(Choice::Paper, "s", 10, 100);
        t.engine.bet_in_game(t.p2, id, Choice::Rock.tag(), 100).unwrap();
        t.engine.host_mut().advance(500);

        t.engine
            .reveal_choice(t.p1, id, Choice::Paper.tag(), &Secret::from_phrase("s"))
            .unwrap();
        assert_eq!(t.engine.get_balance(&t.p1), 200);
    }

    #[test]
    fn test_zero_deadline_at_genesis_rejected() {
        let mut engine = GameEngine::new(SimulatedHost::unbounded(0));
        let (p1, p2) = (PrincipalId::new(), PrincipalId::new());
        let id = Commitment::new(Choice::Rock, &p2, &Secret::from_phrase("s"), &p1);

        assert_eq!(
            engine.create_game(p1, p2, id, 0, 100),
            Err(EngineError::InvalidDeadline)
        );
        assert!(engine.get_game(&id).is_none());
        assert_eq!(engine.host().held(), 0);
    }

    #[test]
    fn test_overflowing_stake_rejected() {
        let mut t = Table::new(EngineConfig::default());
        let id = Commitment::new(Choice::Rock, &t.p2, &Secret::from_phrase("s"), &t.p1);

        assert_eq!(
            t.engine.create_game(t.p1, t.p2, id, 10, u64::MAX / 2 + 1),
            Err(EngineError::AmountOverflow)
        );
    }

    #[test]
    fn test_events_journal_filters() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        let other = t.open(Choice::Paper, "t", 10, 100);
        t.engine.cancel_game(t.p1, other).unwrap();

        assert_eq!(t.engine.events().len(), 3);
        assert_eq!(t.engine.events_since(2).len(), 1);
        assert!(t.engine.events_since(10).is_empty());
        assert_eq!(t.engine.events_for_game(&id).len(), 1);
        assert_eq!(t.engine.events_for(&t.p2).len(), 2);
    }

    #[test]
    fn test_prune_keeps_secret_burned() {
        let mut t = Table::new(EngineConfig::default());
        let id = t.open(Choice::Rock, "s", 10, 100);
        t.engine.cancel_game(t.p1, id).unwrap();

        let other = t.open(Choice::Paper, "t", 10, 100);
        assert_eq!(t.engine.game_count(), 2);

        assert_eq!(t.engine.prune_settled(), 1);
        assert!(t.engine.get_game(&id).is_none());
        assert!(t.engine.get_game(&other).is_some());
        assert_eq!(t.engine.game_count(), 1);
        assert_eq!(t.engine.prune_settled(), 0);
        assert_eq!(
            t.engine.create_game(t.p1, t.p2, id, 10, 100),
            Err(EngineError::DuplicateSecretUse)
        );
    }
}

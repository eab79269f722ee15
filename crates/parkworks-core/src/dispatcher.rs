//! Query/execute orchestration.
//!
//! The [`Dispatcher`] is the only path by which actions reach the world.
//! For each action it:
//!
//! 1. Applies session gates (editor-only actions, paused game).
//! 2. Runs [`GameAction::query`] and checks the park can afford the cost.
//! 3. On execute, runs [`GameAction::execute`] with `APPLY` set.
//! 4. Posts the cost to the [`Ledger`] and appends the encoded command to
//!    the [`ReplayLog`].
//!
//! Execution is strictly sequential; the dispatcher owns the batch
//! accounting marks and resets them in [`Dispatcher::begin_batch`].

use tracing::{debug, info, warn};

use parkworks_actions::{
    ActionContext, GameAction, GameActionResult, SceneryAccounting, Session, describe_action,
    encode_command,
};
use parkworks_ledger::Ledger;
use parkworks_types::{ActionFlags, ActionStatus, GameCommandFlags, StringId};
use parkworks_world::World;

use crate::config::ParkConfig;
use crate::error::DispatchError;
use crate::replay::ReplayLog;

/// Sequential action dispatcher.
#[derive(Debug)]
pub struct Dispatcher {
    /// Editor and sandbox modes.
    session: Session,
    /// Whether the game is paused.
    paused: bool,
    /// Whether costs are checked and charged.
    money_enabled: bool,
    /// Player stamped on recorded commands.
    player_id: u32,
    /// Current simulation tick.
    tick: u64,
    /// Number of batches begun so far.
    batch: u64,
    /// Batch accounting marks.
    accounting: SceneryAccounting,
    /// Park finances.
    ledger: Ledger,
    /// Every applied command, in order.
    replay: ReplayLog,
}

impl Dispatcher {
    /// Create a dispatcher from configuration.
    pub fn new(config: &ParkConfig) -> Self {
        Self {
            session: Session {
                editor_mode: config.session.editor_mode,
                sandbox_mode: config.session.sandbox_mode,
            },
            paused: config.session.paused,
            money_enabled: !config.finance.no_money,
            player_id: config.session.player_id,
            tick: 0,
            batch: 0,
            accounting: SceneryAccounting::new(),
            ledger: Ledger::new(config.finance.starting_money()),
            replay: ReplayLog::new(),
        }
    }

    // -------------------------------------------------------------------
    // Session state
    // -------------------------------------------------------------------

    /// Current session modes.
    pub const fn session(&self) -> Session {
        self.session
    }

    /// Replace the session modes.
    pub const fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Whether the game is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume the game.
    pub const fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance to the next tick and return it.
    pub const fn advance_tick(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Current batch number.
    pub const fn batch(&self) -> u64 {
        self.batch
    }

    /// Start a new batch, clearing the accounting marks.
    pub fn begin_batch(&mut self) {
        self.enter_batch(self.batch.saturating_add(1));
    }

    /// Enter batch `batch`, clearing the accounting marks.
    ///
    /// Replays use this so re-recorded commands keep the batch number they
    /// were first recorded under.
    pub fn enter_batch(&mut self, batch: u64) {
        self.batch = batch;
        self.accounting.clear();
        debug!(batch = self.batch, tick = self.tick, "batch started");
    }

    /// Park finances.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The commands applied so far.
    pub const fn replay_log(&self) -> &ReplayLog {
        &self.replay
    }

    /// Take the replay log, leaving an empty one in its place.
    pub fn take_replay_log(&mut self) -> ReplayLog {
        std::mem::take(&mut self.replay)
    }

    // -------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------

    /// Validate and price an action without applying it.
    ///
    /// The query runs against a scratch copy of the batch accounting marks,
    /// so a preview never changes how later commands are priced.
    pub fn query(
        &self,
        world: &World,
        action: &dyn GameAction,
        flags: GameCommandFlags,
    ) -> GameActionResult {
        let mut scratch = self.accounting.clone();
        self.query_with(world, action, flags, &mut scratch)
    }

    /// Session gates, the action's own query, and the funds check, marking
    /// objects in `accounting`.
    fn query_with(
        &self,
        world: &World,
        action: &dyn GameAction,
        flags: GameCommandFlags,
        accounting: &mut SceneryAccounting,
    ) -> GameActionResult {
        if let Some(rejected) = self.check_session(action, flags) {
            return rejected;
        }

        let mut ctx = ActionContext::new(flags, self.session, accounting);
        let result = action.query(world, &mut ctx);
        if !result.is_ok() {
            return result;
        }

        if self.charges(flags) && !self.ledger.can_afford(result.cost) {
            debug!(
                action = %action.action_type(),
                cost = %result.cost,
                cash = %self.ledger.cash(),
                "action rejected: insufficient funds"
            );
            return result.failed(ActionStatus::InsufficientFunds, StringId::NotEnoughCash, None);
        }
        result
    }

    /// Validate and apply an action.
    ///
    /// The action is queried first; if that fails its result is returned and
    /// nothing changes. Otherwise it is executed with `APPLY` set, its cost
    /// is charged, and the command is recorded for replay.
    ///
    /// Accounting marks claimed during the call are kept only if the action
    /// is applied. A rejected command leaves the batch as it found it, which
    /// is what a replay of the recorded commands sees.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if the command cannot be encoded for the
    /// replay log or the ledger refuses the charge. The world has already
    /// been changed in that case.
    pub fn execute(
        &mut self,
        world: &mut World,
        action: &mut dyn GameAction,
        flags: GameCommandFlags,
    ) -> Result<GameActionResult, DispatchError> {
        let mut scratch = self.accounting.clone();
        let queried = self.query_with(world, action, flags, &mut scratch);
        if !queried.is_ok() {
            debug!(
                action = %describe_action(action),
                status = %queried.status,
                "action rejected by query"
            );
            return Ok(queried);
        }

        let applied_flags = flags.with(GameCommandFlags::APPLY);
        let mut ctx = ActionContext::new(applied_flags, self.session, &mut scratch);
        let result = action.execute(world, &mut ctx);
        if !result.is_ok() {
            warn!(
                action = %describe_action(action),
                status = %result.status,
                "action failed on execute after passing query"
            );
            return Ok(result);
        }
        self.accounting = scratch;

        if self.charges(flags) && result.cost.is_positive() {
            self.ledger.record_expenditure(
                self.tick,
                result.expenditure,
                result.cost,
                action.action_type().name(),
            )?;
        }

        let ghost = flags.contains(GameCommandFlags::GHOST);
        if !ghost && !action.action_flags().contains(ActionFlags::IGNORE_FOR_REPLAYS) {
            let recorded = flags.without(GameCommandFlags::REPLAY);
            let payload = encode_command(action, recorded, self.player_id)?;
            self.replay.record(self.tick, self.batch, payload);
        }

        info!(
            tick = self.tick,
            action = %describe_action(action),
            cost = %result.cost,
            cash = %self.ledger.cash(),
            skipped = result.diagnostics.len(),
            "action executed"
        );
        Ok(result)
    }

    /// Session gates applied before the action's own checks.
    fn check_session(
        &self,
        action: &dyn GameAction,
        flags: GameCommandFlags,
    ) -> Option<GameActionResult> {
        let action_flags = action.action_flags();
        if action_flags.contains(ActionFlags::EDITOR_ONLY) && !self.session.editor_mode {
            return Some(GameActionResult::new().failed(
                ActionStatus::NotInEditorMode,
                StringId::EditorOnly,
                None,
            ));
        }
        let may_run_paused = action_flags.contains(ActionFlags::ALLOW_WHILE_PAUSED)
            || flags.contains(GameCommandFlags::ALLOW_DURING_PAUSED);
        if self.paused && !may_run_paused {
            return Some(GameActionResult::new().failed(
                ActionStatus::GamePaused,
                StringId::GamePaused,
                None,
            ));
        }
        None
    }

    /// Whether costs under these flags are checked and charged.
    const fn charges(&self, flags: GameCommandFlags) -> bool {
        self.money_enabled
            && !flags.contains(GameCommandFlags::GHOST)
            && !flags.contains(GameCommandFlags::NO_SPEND)
    }
}

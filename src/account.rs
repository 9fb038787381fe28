//! Miner balance and reward accounting.

use std::{fmt, time::Duration};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    clock::{Clock, SystemClock},
    price::Price,
    rig::{HashRate, MiningRig},
};

/// Tracks a single miner's cash balance, mined total, and the history of
/// balance changes over a session.
///
/// The account has two steady states: `NO_RIG` (no rig assigned, or a rig
/// with zero hash rate) and `RIG_ACTIVE`. Mining attempts and power billing
/// only take effect in the active state; in the idle state they are no-ops
/// rather than errors.
#[derive(Debug, Clone)]
pub struct MinerAccount {
    balance: f64,
    total_mined: f64,
    balance_history: Vec<f64>,
    time_history: Vec<Duration>,
    last_update: Duration,
    rig: Option<MiningRig>,
    rng: StdRng,
    clock: Box<dyn Clock>,
}

/// Read-only snapshot of an account, paired with the price it was taken at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub balance: f64,
    /// `None` when no rig is assigned.
    pub hash_rate: Option<HashRate>,
    pub price: Price,
    pub total_mined: f64,
}

impl MinerAccount {
    /// Divisor turning a hash rate into a per-tick discovery probability.
    ///
    /// The quotient is deliberately not clamped to `[0, 1]`: a rig at or
    /// above this rate finds a block on every tick.
    pub const DIFFICULTY: f64 = 1_000_000.0;

    /// Coins credited per mined block.
    pub const BLOCK_REWARD: f64 = 0.001;

    /// Operating cost charged per elapsed hour while a rig is active.
    pub const POWER_COST_PER_HOUR: f64 = 0.5;

    /// Starting balance used when none is specified.
    pub const DEFAULT_BALANCE: f64 = 100.0;

    /// Creates an account with the default starting balance, wall-clock
    /// time, and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_parts(
            Self::DEFAULT_BALANCE,
            Box::new(SystemClock::new()),
            StdRng::from_entropy(),
        )
    }

    /// Creates an account with the given starting balance.
    pub fn with_balance(balance: f64) -> Self {
        Self::with_parts(
            balance,
            Box::new(SystemClock::new()),
            StdRng::from_entropy(),
        )
    }

    /// Creates an account from an explicit balance, clock, and RNG. The
    /// injected clock drives cost accrual; the RNG drives block discovery.
    pub fn with_parts(
        balance: f64,
        clock: Box<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        let now = clock.elapsed();
        MinerAccount {
            balance,
            total_mined: 0.0,
            balance_history: vec![balance],
            time_history: vec![now],
            last_update: now,
            rig: None,
            rng,
            clock,
        }
    }

    /// Assigns `rig` to this account, replacing any previous rig whole.
    pub fn set_rig(&mut self, rig: MiningRig) {
        self.rig = Some(rig);
    }

    /// Removes the assigned rig, returning the account to its idle state.
    pub fn clear_rig(&mut self) -> Option<MiningRig> {
        self.rig.take()
    }

    /// The currently assigned rig, if any.
    #[inline]
    pub fn rig(&self) -> Option<&MiningRig> {
        self.rig.as_ref()
    }

    /// Returns true iff a rig with nonzero hash rate is assigned.
    #[inline]
    pub fn has_active_rig(&self) -> bool {
        self.rig.map_or(false, |rig| rig.is_active())
    }

    /// Current cash balance. May be negative; no floor is enforced.
    #[inline]
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Total coins mined over the account's lifetime.
    #[inline]
    pub fn total_mined(&self) -> f64 {
        self.total_mined
    }

    /// Number of blocks found over the account's lifetime.
    pub fn blocks_found(&self) -> u64 {
        (self.total_mined / Self::BLOCK_REWARD).round() as u64
    }

    /// Balance snapshots, oldest first: the starting balance followed by one
    /// entry per mutating event.
    #[inline]
    pub fn balance_history(&self) -> &[f64] {
        &self.balance_history
    }

    /// Clock readings parallel to [balance_history](Self::balance_history);
    /// the two are always the same length.
    #[inline]
    pub fn time_history(&self) -> &[Duration] {
        &self.time_history
    }

    /// Attempts to mine one block at the given price. Returns whether a
    /// block was found.
    ///
    /// With no active rig this is a no-op returning `false` — a valid
    /// steady state, not a fault. Otherwise a block is found with
    /// probability `hash_rate / DIFFICULTY`; on success the balance is
    /// credited `BLOCK_REWARD * price` and the mined total grows by
    /// [BLOCK_REWARD](Self::BLOCK_REWARD).
    pub fn mine_block(&mut self, price: Price) -> bool {
        let hash_rate = match &self.rig {
            Some(rig) if rig.is_active() => rig.hash_rate(),
            _ => return false,
        };

        let probability = hash_rate / Self::DIFFICULTY;
        if self.rng.gen::<f64>() >= probability {
            return false;
        }

        self.balance += Self::BLOCK_REWARD * price;
        self.total_mined += Self::BLOCK_REWARD;
        self.record_snapshot();

        true
    }

    /// Charges power cost for the time elapsed since the last deduction.
    ///
    /// With an active rig the charge is `elapsed_hours * POWER_COST_PER_HOUR`
    /// and a balance snapshot is recorded. With no active rig nothing is
    /// charged, but the elapsed-time marker is still refreshed so idle time
    /// is never billed retroactively once a rig is attached later.
    pub fn deduct_power_cost(&mut self) {
        let now = self.clock.elapsed();

        if self.has_active_rig() {
            let hours =
                now.saturating_sub(self.last_update).as_secs_f64() / 3600.0;
            self.balance -= hours * Self::POWER_COST_PER_HOUR;
            self.record_snapshot_at(now);
        }

        self.last_update = now;
    }

    /// Takes a read-only snapshot of the account at the given price.
    pub fn status(&self, price: Price) -> Status {
        Status {
            balance: self.balance,
            hash_rate: self.rig.map(|rig| rig.hash_rate()),
            price,
            total_mined: self.total_mined,
        }
    }

    fn record_snapshot(&mut self) {
        let now = self.clock.elapsed();
        self.record_snapshot_at(now);
    }

    fn record_snapshot_at(&mut self, now: Duration) {
        self.balance_history.push(self.balance);
        self.time_history.push(now);
    }
}

impl Default for MinerAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Mining Status ---")?;
        writeln!(f, "Current Balance: ${:.2}", self.balance)?;
        match self.hash_rate {
            Some(rate) => writeln!(f, "Hash Rate: {} MH/s", rate)?,
            None => writeln!(f, "Hash Rate: unset")?,
        }
        writeln!(f, "Current Price: ${:.2}", self.price)?;
        write!(f, "Total Mined: {:.8}", self.total_mined)
    }
}

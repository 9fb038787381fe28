//! Building and driving simulation sessions.
//!
//! A [Session] wires one [PriceProcess] and one [MinerAccount] together and
//! advances them in discrete ticks. Each tick is one price update, one
//! mining attempt at the new price, and one power-cost deduction, in that
//! order. Ticks run strictly sequentially; the session owns all mutable
//! state and no locking is involved.

use std::time::Duration;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    account::{MinerAccount, Status},
    clock::ManualClock,
    price::{Price, PriceProcess},
    results::SessionOutput,
};

pub mod builder;

pub use builder::{SessionBuildError, SessionBuilder};

/// A single miner's simulation session. Owned by the caller and driven
/// either tick-by-tick via [tick](Session::tick) or to completion via
/// [run](Session::run).
#[derive(Debug, Clone)]
pub struct Session {
    prices: PriceProcess,
    account: MinerAccount,
    /// Present when the session drives its own manual clock; the clock is
    /// advanced by the interval at the start of every tick.
    step: Option<(ManualClock, Duration)>,
    ticks: u64,
    ticks_run: u64,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// The price sample the tick's mining attempt used.
    pub price: Price,
    /// Whether the attempt found a block.
    pub block_found: bool,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Advances the session by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if let Some((clock, interval)) = &self.step {
            clock.advance(*interval);
        }

        let price = self.prices.update();
        let block_found = self.account.mine_block(price);
        self.account.deduct_power_cost();
        self.ticks_run += 1;

        TickOutcome { price, block_found }
    }

    /// Runs the configured number of ticks and returns the session's output.
    pub fn run(mut self) -> SessionOutput {
        for _ in self.ticks_run..self.ticks {
            self.tick();
        }

        self.into_output()
    }

    /// Consumes the session, capturing its final state and histories.
    pub fn into_output(self) -> SessionOutput {
        SessionOutput {
            ticks: self.ticks_run,
            blocks_found: self.account.blocks_found(),
            total_mined: self.account.total_mined(),
            final_balance: self.account.balance(),
            final_price: self.prices.current_price(),
            balance_history: self.account.balance_history().to_vec(),
            time_history: self.account.time_history().to_vec(),
            price_history: self.prices.history().to_vec(),
        }
    }

    /// Status snapshot at the current price.
    pub fn status(&self) -> Status {
        self.account.status(self.prices.current_price())
    }

    #[inline]
    pub fn account(&self) -> &MinerAccount {
        &self.account
    }

    /// Mutable access to the account, for reconfiguring the rig mid-session.
    #[inline]
    pub fn account_mut(&mut self) -> &mut MinerAccount {
        &mut self.account
    }

    #[inline]
    pub fn prices(&self) -> &PriceProcess {
        &self.prices
    }

    /// Number of ticks executed so far.
    #[inline]
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }
}

/// A Monte-Carlo batch of sessions sharing one configuration but differing
/// by RNG seed. Runs in parallel when the `rayon` feature is enabled.
#[derive(Debug, Clone)]
pub struct SessionGroup {
    base: SessionBuilder,
    seeds: Vec<u64>,
}

impl SessionGroup {
    /// Creates a group around a base configuration. The base's own RNG seed
    /// is ignored; each added seed produces one session.
    pub fn new(base: SessionBuilder) -> Self {
        SessionGroup { base, seeds: vec![] }
    }

    pub fn add_seed(&mut self, seed: u64) {
        self.seeds.push(seed);
    }

    pub fn with_seeds<I>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        self.seeds.extend(seeds);
        self
    }

    /// Builds and runs one session per seed, in seed order.
    pub fn run_all(self) -> Result<Vec<SessionOutput>, SessionBuildError> {
        let SessionGroup { base, seeds } = self;

        let sessions: Result<Vec<_>, _> = seeds
            .into_iter()
            .map(|seed| base.clone().rng_seed(seed).build())
            .collect();
        let sessions = sessions?;

        #[cfg(feature = "rayon")]
        let outputs = sessions.into_par_iter().map(Session::run).collect();

        #[cfg(not(feature = "rayon"))]
        let outputs = sessions.into_iter().map(Session::run).collect();

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{account::MinerAccount, price::PriceModel, rig::MiningRig};

    use super::{Session, SessionBuilder, SessionGroup};

    fn deterministic_builder() -> SessionBuilder {
        Session::builder()
            .price_model(PriceModel::Normal { drift: 0.0, volatility: 0.0 })
            .manual_clock(Duration::from_secs(1))
            .rng_seed(0)
    }

    #[test]
    fn tick_runs_price_then_mine_then_cost() {
        let mut session = deterministic_builder()
            .hash_rate(MinerAccount::DIFFICULTY)
            .build()
            .unwrap();

        let outcome = session.tick();
        assert!(outcome.block_found);
        assert_eq!(outcome.price, 50_000.0);

        // One block reward minus one second of power cost.
        let expected = MinerAccount::DEFAULT_BALANCE
            + MinerAccount::BLOCK_REWARD * 50_000.0
            - MinerAccount::POWER_COST_PER_HOUR / 3600.0;
        assert!((session.account().balance() - expected).abs() < 1e-9);
        assert_eq!(session.ticks_run(), 1);
    }

    #[test]
    fn run_executes_configured_ticks() {
        let output = deterministic_builder()
            .hash_rate(MinerAccount::DIFFICULTY)
            .ticks(25)
            .build()
            .unwrap()
            .run();

        assert_eq!(output.ticks, 25);
        assert_eq!(output.blocks_found, 25);
        assert_eq!(output.price_history.len(), 26);
    }

    #[test]
    fn session_without_rig_only_drifts_price() {
        let output = deterministic_builder().ticks(10).build().unwrap().run();

        assert_eq!(output.blocks_found, 0);
        assert_eq!(output.final_balance, MinerAccount::DEFAULT_BALANCE);
        // Starting snapshot only: nothing mutated the balance.
        assert_eq!(output.balance_history.len(), 1);
    }

    #[test]
    fn rig_can_be_swapped_mid_session() {
        let mut session = deterministic_builder().build().unwrap();
        session.tick();
        assert_eq!(session.account().blocks_found(), 0);

        session
            .account_mut()
            .set_rig(MiningRig::new(MinerAccount::DIFFICULTY).unwrap());
        session.tick();
        assert_eq!(session.account().blocks_found(), 1);
    }

    #[test]
    fn status_reflects_current_price() {
        let session = deterministic_builder()
            .seed_price(1000.0)
            .build()
            .unwrap();

        let status = session.status();
        assert_eq!(status.price, 1000.0);
        assert_eq!(status.balance, MinerAccount::DEFAULT_BALANCE);
    }

    #[test]
    fn group_runs_one_session_per_seed() {
        let outputs = SessionGroup::new(
            deterministic_builder()
                .hash_rate(MinerAccount::DIFFICULTY)
                .ticks(5),
        )
        .with_seeds(0..8)
        .run_all()
        .unwrap();

        assert_eq!(outputs.len(), 8);
        for output in &outputs {
            assert_eq!(output.ticks, 5);
            assert_eq!(output.blocks_found, 5);
        }
    }

    #[test]
    fn group_runs_are_reproducible_per_seed() {
        let group = || {
            SessionGroup::new(
                Session::builder()
                    .manual_clock(Duration::from_millis(500))
                    .hash_rate(400_000.0)
                    .ticks(200),
            )
            .with_seeds([1, 2, 3])
        };

        let first = group().run_all().unwrap();
        let second = group().run_all().unwrap();

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.final_balance, b.final_balance);
            assert_eq!(a.blocks_found, b.blocks_found);
            assert_eq!(a.price_history, b.price_history);
        }
    }
}

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    account::MinerAccount,
    clock::{Clock, ManualClock, SystemClock},
    price::{Price, PriceModel, PriceModelError, PriceProcess},
    rig::{HashRate, MiningRig, RigError},
};

use super::Session;

/// Builds a [Session].
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    pub initial_balance: Option<f64>,
    pub seed_price: Option<Price>,
    pub price_model: Option<PriceModel>,
    pub hash_rate: Option<HashRate>,
    pub rng_seed: Option<u64>,
    pub ticks: Option<u64>,
    clock: ClockChoice,
}

/// Which time source a built session's account will accrue cost against.
#[derive(Debug, Clone, Copy, Default)]
enum ClockChoice {
    /// Wall-clock time; cost accrual tracks real execution speed.
    #[default]
    System,
    /// A session-owned [ManualClock], advanced by the interval once per
    /// tick. Makes runs independent of execution speed.
    Manual(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionBuildError {
    #[error("number of session ticks must be greater than 0")]
    ZeroTicks,
    #[error(transparent)]
    RigError(#[from] RigError),
    #[error(transparent)]
    PriceModelError(#[from] PriceModelError),
}

impl SessionBuilder {
    /// Creates a new [SessionBuilder].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account's starting balance
    /// ([MinerAccount::DEFAULT_BALANCE] otherwise).
    pub fn initial_balance(mut self, balance: f64) -> Self {
        self.initial_balance = Some(balance);

        self
    }

    /// Sets the first price sample
    /// ([DEFAULT_SEED_PRICE](crate::price::DEFAULT_SEED_PRICE) otherwise).
    pub fn seed_price(mut self, price: Price) -> Self {
        self.seed_price = Some(price);

        self
    }

    /// Sets the price model ([PriceModel::default] otherwise).
    pub fn price_model(mut self, model: PriceModel) -> Self {
        self.price_model = Some(model);

        self
    }

    /// Assigns a rig with the given hash rate from the start. Without this
    /// the session begins idle and a rig can be attached later through
    /// [Session::account_mut].
    pub fn hash_rate(mut self, rate: HashRate) -> Self {
        self.hash_rate = Some(rate);

        self
    }

    /// Seeds both the price walk and block discovery, making the session
    /// fully reproducible (given a manual clock). Entropy-seeded otherwise.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);

        self
    }

    /// Sets the number of ticks [Session::run] will execute (default 1).
    pub fn ticks(mut self, ticks: u64) -> Self {
        self.ticks = Some(ticks);

        self
    }

    /// Replaces the wall clock with a session-owned [ManualClock] advanced
    /// by `interval` at the start of every tick.
    pub fn manual_clock(mut self, interval: Duration) -> Self {
        self.clock = ClockChoice::Manual(interval);

        self
    }

    /// Creates a [Session] from the specified parameters.
    pub fn build(self) -> Result<Session, SessionBuildError> {
        let SessionBuilder {
            initial_balance,
            seed_price,
            price_model,
            hash_rate,
            rng_seed,
            ticks,
            clock,
        } = self;

        let ticks = match ticks {
            Some(0) => return Err(SessionBuildError::ZeroTicks),
            Some(n) => n,
            None => 1,
        };

        // One seed fans out into independent streams for the price walk and
        // for block discovery.
        let mut seeder = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let price_rng = StdRng::seed_from_u64(seeder.gen());
        let account_rng = StdRng::seed_from_u64(seeder.gen());

        let prices = PriceProcess::with_parts(
            seed_price.unwrap_or(crate::price::DEFAULT_SEED_PRICE),
            price_model.unwrap_or_default(),
            price_rng,
        )?;

        let (boxed, step): (Box<dyn Clock>, _) = match clock {
            ClockChoice::System => (Box::new(SystemClock::new()), None),
            ClockChoice::Manual(interval) => {
                let manual = ManualClock::new();
                (Box::new(manual.clone()), Some((manual, interval)))
            }
        };

        let mut account = MinerAccount::with_parts(
            initial_balance.unwrap_or(MinerAccount::DEFAULT_BALANCE),
            boxed,
            account_rng,
        );
        if let Some(rate) = hash_rate {
            account.set_rig(MiningRig::new(rate)?);
        }

        Ok(Session { prices, account, step, ticks, ticks_run: 0 })
    }
}

#[cfg(test)]
mod tests {
    use crate::{price::PriceModel, session::SessionBuildError};

    use super::SessionBuilder;

    #[test]
    fn example_build() {
        SessionBuilder::new().build().expect("valid session build");
    }

    #[test]
    fn rejects_zero_ticks() {
        assert!(matches!(
            SessionBuilder::new().ticks(0).build(),
            Err(SessionBuildError::ZeroTicks)
        ));
    }

    #[test]
    fn rejects_negative_hash_rate() {
        assert!(matches!(
            SessionBuilder::new().hash_rate(-10.0).build(),
            Err(SessionBuildError::RigError(_))
        ));
    }

    #[test]
    fn propagates_price_model_errors() {
        let result = SessionBuilder::new()
            .price_model(PriceModel::Uniform { max_change: -0.5 })
            .build();
        assert!(matches!(
            result,
            Err(SessionBuildError::PriceModelError(_))
        ));
    }
}

//! Stochastic asset price generation.
//!
//! The price follows a multiplicative random walk: each update draws a
//! fractional change and applies `price * (1 + change)`. The draw comes from
//! either a symmetric uniform distribution or a normal distribution with
//! configurable drift and volatility.

use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};
use rand_distr::Normal;
use thiserror::Error;

/// Numeric type used for asset prices.
pub type Price = f64;

/// Seed price used when none is specified.
pub const DEFAULT_SEED_PRICE: Price = 50_000.0;

/// The distribution a [PriceProcess] draws fractional price changes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceModel {
    /// Change drawn uniformly from `[-max_change, +max_change]`.
    Uniform { max_change: f64 },
    /// Change drawn from a normal distribution. `drift` is the mean
    /// fractional change per update, `volatility` its standard deviation.
    Normal { drift: f64, volatility: f64 },
}

impl Default for PriceModel {
    /// Uniform changes of at most one percent per update.
    fn default() -> Self {
        PriceModel::Uniform { max_change: 0.01 }
    }
}

#[derive(Debug, Error)]
pub enum PriceModelError {
    #[error("seed price {0} is not positive and finite")]
    BadSeedPrice(Price),
    #[error("maximum price change {0} is negative")]
    NegativeMaxChange(f64),
    #[error("volatility {0} is negative")]
    NegativeVolatility(f64),
    #[error("model parameter {0} is not a finite number")]
    NonFiniteParameter(f64),
}

/// Pre-built sampler for a validated [PriceModel].
#[derive(Debug, Clone, Copy)]
enum ChangeSampler {
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
}

impl PriceModel {
    fn sampler(&self) -> Result<ChangeSampler, PriceModelError> {
        use PriceModelError::*;

        match *self {
            PriceModel::Uniform { max_change } => {
                if !max_change.is_finite() {
                    return Err(NonFiniteParameter(max_change));
                }
                if max_change < 0.0 {
                    return Err(NegativeMaxChange(max_change));
                }

                Ok(ChangeSampler::Uniform(Uniform::new_inclusive(
                    -max_change,
                    max_change,
                )))
            }
            PriceModel::Normal { drift, volatility } => {
                if !drift.is_finite() {
                    return Err(NonFiniteParameter(drift));
                }
                if !volatility.is_finite() {
                    return Err(NonFiniteParameter(volatility));
                }
                if volatility < 0.0 {
                    return Err(NegativeVolatility(volatility));
                }

                Normal::new(drift, volatility)
                    .map(ChangeSampler::Normal)
                    .map_err(|_| NegativeVolatility(volatility))
            }
        }
    }
}

/// Generates a session's price series one sample at a time.
///
/// The full series is kept for the session lifetime: `history` starts with
/// the seed price and always ends with the current price.
#[derive(Debug, Clone)]
pub struct PriceProcess {
    current: Price,
    history: Vec<Price>,
    model: PriceModel,
    sampler: ChangeSampler,
    rng: StdRng,
}

impl PriceProcess {
    /// Creates a process seeded from system entropy.
    pub fn new(
        seed_price: Price,
        model: PriceModel,
    ) -> Result<Self, PriceModelError> {
        Self::with_parts(seed_price, model, StdRng::from_entropy())
    }

    /// Creates a process with a fixed RNG seed, so the generated series is
    /// reproducible.
    pub fn with_seed(
        seed_price: Price,
        model: PriceModel,
        seed: u64,
    ) -> Result<Self, PriceModelError> {
        Self::with_parts(seed_price, model, StdRng::seed_from_u64(seed))
    }

    /// Creates a process from an explicit RNG.
    pub(crate) fn with_parts(
        seed_price: Price,
        model: PriceModel,
        rng: StdRng,
    ) -> Result<Self, PriceModelError> {
        if !seed_price.is_finite() || seed_price <= 0.0 {
            return Err(PriceModelError::BadSeedPrice(seed_price));
        }

        Ok(PriceProcess {
            current: seed_price,
            history: vec![seed_price],
            sampler: model.sampler()?,
            model,
            rng,
        })
    }

    /// Draws the next price sample, appends it to the history, and returns
    /// it. Positivity is not enforced: a sufficiently adverse draw under the
    /// normal model can push the price to zero or below.
    pub fn update(&mut self) -> Price {
        let change = match &self.sampler {
            ChangeSampler::Uniform(dist) => dist.sample(&mut self.rng),
            ChangeSampler::Normal(dist) => dist.sample(&mut self.rng),
        };

        self.current *= 1.0 + change;
        self.history.push(self.current);
        self.current
    }

    /// The most recent price sample.
    #[inline]
    pub fn current_price(&self) -> Price {
        self.current
    }

    /// All samples generated so far, oldest first. The first entry is the
    /// seed price and the last is always [current_price](Self::current_price).
    #[inline]
    pub fn history(&self) -> &[Price] {
        &self.history
    }

    /// The model this process draws changes from.
    #[inline]
    pub fn model(&self) -> PriceModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PriceModel, PriceModelError, PriceProcess, DEFAULT_SEED_PRICE,
    };

    #[test]
    fn history_starts_at_seed_and_tracks_current() {
        let mut prices = PriceProcess::with_seed(
            DEFAULT_SEED_PRICE,
            PriceModel::default(),
            7,
        )
        .unwrap();

        assert_eq!(prices.history(), &[DEFAULT_SEED_PRICE]);

        for n in 1..=50 {
            let price = prices.update();
            assert_eq!(prices.history().len(), n + 1);
            assert_eq!(*prices.history().last().unwrap(), price);
            assert_eq!(prices.current_price(), price);
        }

        assert_eq!(prices.history()[0], DEFAULT_SEED_PRICE);
    }

    #[test]
    fn uniform_changes_stay_within_bound() {
        let max_change = 0.01;
        let mut prices = PriceProcess::with_seed(
            1000.0,
            PriceModel::Uniform { max_change },
            42,
        )
        .unwrap();

        let mut previous = prices.current_price();
        for _ in 0..500 {
            let price = prices.update();
            let change = (price - previous) / previous;
            assert!(change.abs() <= max_change + 1e-12);
            previous = price;
        }
    }

    #[test]
    fn zero_volatility_walk_is_constant() {
        let mut prices = PriceProcess::with_seed(
            DEFAULT_SEED_PRICE,
            PriceModel::Normal { drift: 0.0, volatility: 0.0 },
            0,
        )
        .unwrap();

        assert_eq!(prices.update(), DEFAULT_SEED_PRICE);
        assert_eq!(
            prices.history(),
            &[DEFAULT_SEED_PRICE, DEFAULT_SEED_PRICE]
        );
    }

    #[test]
    fn pure_drift_compounds_multiplicatively() {
        let mut prices = PriceProcess::with_seed(
            100.0,
            PriceModel::Normal { drift: 0.5, volatility: 0.0 },
            0,
        )
        .unwrap();

        assert_eq!(prices.update(), 150.0);
        assert_eq!(prices.update(), 225.0);
    }

    #[test]
    fn same_seed_reproduces_series() {
        let model = PriceModel::Normal { drift: 0.001, volatility: 0.02 };
        let mut a = PriceProcess::with_seed(2000.0, model, 99).unwrap();
        let mut b = PriceProcess::with_seed(2000.0, model, 99).unwrap();

        for _ in 0..100 {
            assert_eq!(a.update(), b.update());
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            PriceProcess::with_seed(0.0, PriceModel::default(), 0),
            Err(PriceModelError::BadSeedPrice(_))
        ));
        assert!(matches!(
            PriceProcess::with_seed(-5.0, PriceModel::default(), 0),
            Err(PriceModelError::BadSeedPrice(_))
        ));
        assert!(matches!(
            PriceProcess::with_seed(
                100.0,
                PriceModel::Uniform { max_change: -0.01 },
                0
            ),
            Err(PriceModelError::NegativeMaxChange(_))
        ));
        assert!(matches!(
            PriceProcess::with_seed(
                100.0,
                PriceModel::Normal { drift: 0.0, volatility: -1.0 },
                0
            ),
            Err(PriceModelError::NegativeVolatility(_))
        ));
        assert!(matches!(
            PriceProcess::with_seed(
                100.0,
                PriceModel::Normal { drift: f64::NAN, volatility: 1.0 },
                0
            ),
            Err(PriceModelError::NonFiniteParameter(_))
        ));
    }
}

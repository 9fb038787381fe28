//! Session output data and batch aggregation.

use std::{fmt::Display, time::Duration};

use crate::price::Price;

/// Floating point precision of displayed results data.
pub const FLOAT_PRECISION_DIGITS: usize = 6;

/// The complete record of one finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutput {
    /// Ticks executed.
    pub ticks: u64,
    /// Blocks found across the whole session.
    pub blocks_found: u64,
    /// Coins mined across the whole session.
    pub total_mined: f64,
    pub final_balance: f64,
    pub final_price: Price,
    /// Balance snapshots, one per balance-mutating event, starting balance
    /// first.
    pub balance_history: Vec<f64>,
    /// Clock readings parallel to `balance_history`.
    pub time_history: Vec<Duration>,
    /// Every price sample of the session, seed price first.
    pub price_history: Vec<Price>,
}

impl SessionOutput {
    /// Net profit or loss relative to the session's starting balance.
    pub fn net_change(&self) -> f64 {
        match self.balance_history.first() {
            Some(start) => self.final_balance - start,
            None => 0.0,
        }
    }
}

/// Describes the appearance of a [GroupSummary] as given by its [Display]
/// implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Format {
    /// Comma-separated, without extra whitespace.
    Csv,
    /// Human-readable.
    #[default]
    PrettyPrint,
}

/// Aggregate statistics over a batch of session outputs, as produced by
/// [SessionGroup::run_all](crate::session::SessionGroup::run_all).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub runs: usize,
    pub mean_final_balance: f64,
    pub min_final_balance: f64,
    pub max_final_balance: f64,
    pub mean_blocks_found: f64,
    pub mean_final_price: f64,
    format: Format,
}

impl GroupSummary {
    /// Summarizes a batch of outputs. Returns `None` for an empty batch.
    pub fn of(outputs: &[SessionOutput]) -> Option<Self> {
        if outputs.is_empty() {
            return None;
        }

        let runs = outputs.len();
        let n = runs as f64;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut balance_sum = 0.0;
        let mut blocks_sum = 0.0;
        let mut price_sum = 0.0;
        for output in outputs {
            min = min.min(output.final_balance);
            max = max.max(output.final_balance);
            balance_sum += output.final_balance;
            blocks_sum += output.blocks_found as f64;
            price_sum += output.final_price;
        }

        Some(GroupSummary {
            runs,
            mean_final_balance: balance_sum / n,
            min_final_balance: min,
            max_final_balance: max,
            mean_blocks_found: blocks_sum / n,
            mean_final_price: price_sum / n,
            format: Format::default(),
        })
    }

    /// Sets the output format used by this summary's [Display]
    /// implementation.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;

        self
    }
}

impl Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = FLOAT_PRECISION_DIGITS;
        match self.format {
            Format::Csv => {
                writeln!(
                    f,
                    "Runs,Mean Final Balance,Min Final Balance,\
                     Max Final Balance,Mean Blocks Found,Mean Final Price"
                )?;
                write!(
                    f,
                    "{},{:.p$},{:.p$},{:.p$},{:.p$},{:.p$}",
                    self.runs,
                    self.mean_final_balance,
                    self.min_final_balance,
                    self.max_final_balance,
                    self.mean_blocks_found,
                    self.mean_final_price,
                )
            }
            Format::PrettyPrint => {
                writeln!(f, "Runs:               {}", self.runs)?;
                writeln!(
                    f,
                    "Mean Final Balance: {:.p$}",
                    self.mean_final_balance
                )?;
                writeln!(
                    f,
                    "Min Final Balance:  {:.p$}",
                    self.min_final_balance
                )?;
                writeln!(
                    f,
                    "Max Final Balance:  {:.p$}",
                    self.max_final_balance
                )?;
                writeln!(
                    f,
                    "Mean Blocks Found:  {:.p$}",
                    self.mean_blocks_found
                )?;
                write!(
                    f,
                    "Mean Final Price:   {:.p$}",
                    self.mean_final_price
                )
            }
        }
    }
}

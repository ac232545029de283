//! Period arithmetic shared by both phases.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::{RepaymentCadence, DRAW_PERIOD_YEARS, MAX_TERM_YEARS};

#[derive(Debug, Clone)]
pub struct Calendar {
    cadence: RepaymentCadence,
    periods_per_year: u32,
    // Calendar-month boundaries are located in binary floating point. For the
    // weekly cadence 52/12 is not representable, so no period after the first
    // lands exactly on a month boundary; schedules exported from earlier
    // versions depend on that pattern.
    periods_per_month: f64,
    draw_periods: u32,
}

impl Calendar {
    pub fn new(cadence: RepaymentCadence) -> Self {
        let periods_per_year = cadence.periods_per_year();
        Self {
            cadence,
            periods_per_year,
            periods_per_month: f64::from(periods_per_year) / 12.0,
            draw_periods: DRAW_PERIOD_YEARS * periods_per_year,
        }
    }

    pub fn cadence(&self) -> RepaymentCadence {
        self.cadence
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    pub fn draw_periods(&self) -> u32 {
        self.draw_periods
    }

    /// First period of a calendar month. `period` is 1-based.
    pub fn is_month_start(&self, period: u32) -> bool {
        let elapsed = f64::from(period.saturating_sub(1));
        elapsed % self.periods_per_month == 0.0
    }

    /// First period of a year. `period` is 1-based.
    pub fn is_year_start(&self, period: u32) -> bool {
        period.saturating_sub(1) % self.periods_per_year == 0
    }

    /// Zero-based calendar month containing `period`; indexes the draw schedule.
    pub fn month_index(&self, period: u32) -> usize {
        let elapsed = f64::from(period.saturating_sub(1));
        (elapsed / self.periods_per_month).floor() as usize
    }

    /// Whole repayment periods in a term of `term_in_years`, and whether the
    /// term had to be cut to [`MAX_TERM_YEARS`].
    ///
    /// Fractional trailing periods are dropped; a term shorter than one period
    /// yields zero.
    pub fn repayment_periods(&self, term_in_years: Decimal) -> (u32, bool) {
        let cap = self.max_repayment_periods();
        let periods = term_in_years
            .checked_mul(Decimal::from(self.periods_per_year))
            .map(|p| p.floor().max(Decimal::ZERO))
            .and_then(|p| p.to_u32());
        match periods {
            Some(n) if n <= cap => (n, false),
            _ => (cap, true),
        }
    }

    pub fn max_repayment_periods(&self) -> u32 {
        MAX_TERM_YEARS * self.periods_per_year
    }

    /// Periods in the simulated horizon expressed as years.
    pub fn years_for(&self, periods: usize) -> Decimal {
        Decimal::from(periods) / Decimal::from(self.periods_per_year)
    }
}

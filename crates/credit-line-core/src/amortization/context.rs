//! Mutable working state threaded through the two simulation phases.

use log::debug;
use rust_decimal::Decimal;

use crate::config::{CreditLineConfig, RateChange};
use crate::types::{Money, Percent};

/// Ordered cursor over rate-change events.
///
/// Events are sorted by period once. For a given period the first event in
/// sorted order wins; later events for the same period are skipped.
#[derive(Debug, Clone)]
pub struct RateCursor {
    events: Vec<RateChange>,
    position: usize,
    skipped: Vec<RateChange>,
}

impl RateCursor {
    pub fn new(events: &[RateChange]) -> Self {
        let mut events = events.to_vec();
        events.sort_by_key(|e| e.period);
        Self {
            events,
            position: 0,
            skipped: Vec::new(),
        }
    }

    /// Rate taking effect at the start of `period`, if any.
    ///
    /// Periods must be visited in ascending order.
    pub fn take(&mut self, period: u32) -> Option<Percent> {
        while let Some(event) = self.events.get(self.position) {
            if event.period >= period {
                break;
            }
            self.skipped.push(event.clone());
            self.position += 1;
        }

        let event = self.events.get(self.position)?;
        if event.period != period {
            return None;
        }
        let rate = event.new_total_apr;
        self.position += 1;
        while let Some(dup) = self.events.get(self.position) {
            if dup.period != period {
                break;
            }
            self.skipped.push(dup.clone());
            self.position += 1;
        }
        Some(rate)
    }

    /// Events that never took effect: duplicates, out-of-range periods, and
    /// anything past the last simulated period.
    pub fn unapplied(&self) -> Vec<RateChange> {
        let mut out = self.skipped.clone();
        out.extend_from_slice(&self.events[self.position..]);
        out.sort_by_key(|e| e.period);
        out
    }
}

#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub remaining_balance: Money,
    pub current_annual_rate: Percent,
    pub peak_balance: Money,
    pub total_interest: Money,
    pub total_draws: Money,
    pub total_fees: Money,
    /// Amount drawn at time zero after clamping.
    pub initial_draw: Money,
    /// Periods whose requested draw was cut back by the borrow limit.
    pub clamped_draw_periods: Vec<u32>,
    pub rates: RateCursor,
}

impl SimulationContext {
    pub fn new(config: &CreditLineConfig) -> Self {
        Self {
            remaining_balance: Decimal::ZERO,
            current_annual_rate: config.annual_rate,
            peak_balance: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_draws: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            initial_draw: Decimal::ZERO,
            clamped_draw_periods: Vec::new(),
            rates: RateCursor::new(&config.rate_changes),
        }
    }

    /// Draw at time zero. Its fees go to the running total only, never to a
    /// period's fees.
    pub fn apply_initial_draw(&mut self, config: &CreditLineConfig) {
        let draw = config
            .initial_draw_amount
            .min(config.borrow_limit)
            .max(Decimal::ZERO);
        self.initial_draw = draw;
        self.remaining_balance += draw;
        self.total_draws += draw;
        if draw > Decimal::ZERO {
            self.total_fees += super::fees::draw_fees(draw, config);
        }
        self.peak_balance = self.remaining_balance;
    }

    /// Switch to a new rate if one takes effect at `period`.
    pub fn apply_rate_change(&mut self, period: u32) -> bool {
        match self.rates.take(period) {
            Some(rate) => {
                debug!(
                    "period {period}: rate {} -> {rate}",
                    self.current_annual_rate
                );
                self.current_annual_rate = rate;
                true
            }
            None => false,
        }
    }

    pub fn record_draw(&mut self, draw: Money) {
        self.remaining_balance += draw;
        self.total_draws += draw;
        if self.remaining_balance > self.peak_balance {
            self.peak_balance = self.remaining_balance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn change(period: u32, apr: Decimal) -> RateChange {
        RateChange {
            period,
            new_total_apr: apr,
        }
    }

    #[test]
    fn test_cursor_applies_in_period_order() {
        let mut cursor = RateCursor::new(&[change(10, dec!(8)), change(3, dec!(7))]);
        assert_eq!(cursor.take(1), None);
        assert_eq!(cursor.take(3), Some(dec!(7)));
        assert_eq!(cursor.take(4), None);
        assert_eq!(cursor.take(10), Some(dec!(8)));
        assert!(cursor.unapplied().is_empty());
    }

    #[test]
    fn test_cursor_first_duplicate_wins() {
        let mut cursor = RateCursor::new(&[change(5, dec!(6)), change(5, dec!(9))]);
        assert_eq!(cursor.take(5), Some(dec!(6)));
        assert_eq!(cursor.unapplied(), vec![change(5, dec!(9))]);
    }

    #[test]
    fn test_cursor_reports_unreached_and_zero_period() {
        let mut cursor = RateCursor::new(&[change(0, dec!(6)), change(500, dec!(9))]);
        for p in 1..=84 {
            assert_eq!(cursor.take(p), None);
        }
        assert_eq!(
            cursor.unapplied(),
            vec![change(0, dec!(6)), change(500, dec!(9))]
        );
    }

    #[test]
    fn test_initial_draw_clamped_and_charged() {
        let cfg = CreditLineConfig {
            initial_draw_amount: dec!(150000),
            borrow_limit: dec!(100000),
            origination_fee_percent: dec!(1),
            draw_fee: dec!(50),
            ..CreditLineConfig::default()
        };
        let mut ctx = SimulationContext::new(&cfg);
        ctx.apply_initial_draw(&cfg);
        assert_eq!(ctx.remaining_balance, dec!(100000));
        assert_eq!(ctx.total_draws, dec!(100000));
        assert_eq!(ctx.total_fees, dec!(1050));
        assert_eq!(ctx.peak_balance, dec!(100000));
    }

    #[test]
    fn test_negative_initial_draw_is_zero() {
        let cfg = CreditLineConfig {
            initial_draw_amount: dec!(-10),
            draw_fee: dec!(50),
            ..CreditLineConfig::default()
        };
        let mut ctx = SimulationContext::new(&cfg);
        ctx.apply_initial_draw(&cfg);
        assert_eq!(ctx.remaining_balance, Decimal::ZERO);
        assert_eq!(ctx.total_fees, Decimal::ZERO);
    }
}

//! Line of credit amortization engine.
//!
//! A schedule is simulated in two sequential phases over one
//! [`SimulationContext`]: a fixed two-year draw period, where scheduled draws
//! are taken against the limit and payments follow the configured policy, and
//! a repayment period that fully amortizes what remains with level payments,
//! re-amortizing on every rate change. Both phases share one global period
//! numbering. All math uses `rust_decimal::Decimal`; nothing is rounded here.

pub mod calendar;
pub mod context;
pub mod draw_phase;
pub mod fees;
pub mod interest;
pub mod repayment_phase;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{CreditLineConfig, RateChange, MAX_TERM_YEARS};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CreditLineResult;

use calendar::Calendar;
use context::SimulationContext;
use draw_phase::run_draw_phase;
use repayment_phase::run_repayment_phase;

/// Which phase produced a period record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Draw,
    Repayment,
}

/// A single period in the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
    /// Global 1-based period number.
    pub period: u32,
    pub phase: Phase,
    /// All-in annual rate in effect for the period.
    pub annual_rate: Percent,
    /// Balance before this period's draw and payment.
    pub beginning_balance: Money,
    pub draw_amount: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub fees: Money,
    /// Payment plus fees.
    pub total_cash_flow: Money,
    pub ending_balance: Money,
    pub available_credit: Money,
}

/// Output of a schedule computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Latest repayment-phase level payment; zero if repayment never ran.
    pub principal_and_interest_payment: Money,
    pub peak_balance: Money,
    pub total_interest: Money,
    /// Draws + interest + fees.
    pub total_payment: Money,
    pub total_fees: Money,
    /// Interest and fees per unit drawn, annualized over the schedule, in percent.
    pub effective_apr: Percent,
    pub schedule: Vec<PeriodEntry>,
}

impl ScheduleResult {
    /// Result for inputs the engine declines to simulate.
    pub fn zeroed() -> Self {
        Self {
            principal_and_interest_payment: Decimal::ZERO,
            peak_balance: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            effective_apr: Decimal::ZERO,
            schedule: Vec::new(),
        }
    }
}

/// Side observations from a run. They never affect the numbers.
#[derive(Debug, Default)]
struct SimulationNotes {
    degenerate: bool,
    /// Repayment periods actually simulated when the term was truncated.
    capped_term_periods: Option<u32>,
    clamped_draw_periods: Vec<u32>,
    unapplied_rate_changes: Vec<RateChange>,
}

impl SimulationNotes {
    fn into_warnings(self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.degenerate {
            warnings.push(
                "Negative annual rate or non-positive term: returning an empty schedule".into(),
            );
        }
        if let Some(periods) = self.capped_term_periods {
            warnings.push(format!(
                "Repayment term exceeds {MAX_TERM_YEARS} years: truncated to {periods} periods"
            ));
        }
        if !self.clamped_draw_periods.is_empty() {
            let periods: Vec<String> = self
                .clamped_draw_periods
                .iter()
                .map(u32::to_string)
                .collect();
            warnings.push(format!(
                "Requested draws reduced to available credit in period(s) {}",
                periods.join(", ")
            ));
        }
        for change in self.unapplied_rate_changes {
            warnings.push(format!(
                "Rate change to {}% at period {} was not applied (outside the schedule or superseded by an earlier change for the same period)",
                change.new_total_apr, change.period
            ));
        }
        warnings
    }
}

/// Compute the full draw + repayment schedule for a line of credit.
///
/// Pure and deterministic: identical configurations give identical results.
/// A negative `annual_rate` or non-positive `term_in_years` yields
/// [`ScheduleResult::zeroed`].
pub fn compute_schedule(config: &CreditLineConfig) -> ScheduleResult {
    simulate(config).0
}

/// [`compute_schedule`] wrapped in the standard output envelope, with
/// warnings describing clamped draws and ignored rate changes.
pub fn amortize(config: &CreditLineConfig) -> CreditLineResult<ComputationOutput<ScheduleResult>> {
    let start = Instant::now();
    let (result, notes) = simulate(config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Line of Credit Amortization (draw period + level-payment repayment)",
        &serde_json::json!({
            "annual_rate": config.annual_rate.to_string(),
            "term_in_years": config.term_in_years.to_string(),
            "borrow_limit": config.borrow_limit.to_string(),
            "repayment_cadence": config.repayment_cadence,
            "payment_policy": config.payment_policy,
            "interest_calculation_method": config.interest_calculation_method,
            "draw_periods": config.draw_periods(),
        }),
        notes.into_warnings(),
        elapsed,
        result,
    ))
}

fn simulate(config: &CreditLineConfig) -> (ScheduleResult, SimulationNotes) {
    if config.annual_rate < Decimal::ZERO || config.term_in_years <= Decimal::ZERO {
        let notes = SimulationNotes {
            degenerate: true,
            ..SimulationNotes::default()
        };
        return (ScheduleResult::zeroed(), notes);
    }

    let calendar = Calendar::new(config.repayment_cadence);
    let mut ctx = SimulationContext::new(config);
    ctx.apply_initial_draw(config);

    let (ctx, mut schedule) = run_draw_phase(ctx, config, &calendar);
    let (ctx, level_payment) = if ctx.remaining_balance > Decimal::ZERO {
        let outcome = run_repayment_phase(ctx, config, &calendar);
        schedule.extend(outcome.entries);
        (outcome.context, outcome.level_payment)
    } else {
        (ctx, Decimal::ZERO)
    };

    let years = calendar.years_for(schedule.len());
    let effective_apr = if ctx.total_draws.is_zero() || years.is_zero() {
        Decimal::ZERO
    } else {
        (ctx.total_interest + ctx.total_fees) / ctx.total_draws / years * dec!(100)
    };

    let (repayment_periods, term_capped) = calendar.repayment_periods(config.term_in_years);
    let notes = SimulationNotes {
        degenerate: false,
        capped_term_periods: term_capped.then_some(repayment_periods),
        clamped_draw_periods: ctx.clamped_draw_periods.clone(),
        unapplied_rate_changes: ctx.rates.unapplied(),
    };

    let result = ScheduleResult {
        principal_and_interest_payment: level_payment,
        peak_balance: ctx.peak_balance,
        total_interest: ctx.total_interest,
        total_payment: ctx.total_draws + ctx.total_interest + ctx.total_fees,
        total_fees: ctx.total_fees,
        effective_apr,
        schedule,
    };
    (result, notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InterestMethod, PaymentPolicy, RepaymentCadence};
    use pretty_assertions::assert_eq;

    fn sample_config() -> CreditLineConfig {
        CreditLineConfig {
            draw_schedule: vec![dec!(50000)],
            annual_rate: dec!(9.75),
            term_in_years: dec!(5),
            borrow_limit: dec!(100000),
            ..CreditLineConfig::default()
        }
    }

    #[test]
    fn test_negative_rate_returns_zeroed() {
        let mut cfg = sample_config();
        cfg.annual_rate = dec!(-1);
        assert_eq!(compute_schedule(&cfg), ScheduleResult::zeroed());
    }

    #[test]
    fn test_zero_term_returns_zeroed() {
        let mut cfg = sample_config();
        cfg.term_in_years = Decimal::ZERO;
        let out = amortize(&cfg).unwrap();
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_no_balance_skips_repayment() {
        let mut cfg = sample_config();
        cfg.draw_schedule = vec![];
        let result = compute_schedule(&cfg);
        assert_eq!(result.schedule.len(), 24);
        assert_eq!(result.principal_and_interest_payment, Decimal::ZERO);
        assert_eq!(result.effective_apr, Decimal::ZERO);
    }

    #[test]
    fn test_sum_law_holds() {
        let mut cfg = sample_config();
        cfg.annual_fee = dec!(100);
        cfg.monthly_maintenance_fee = dec!(10);
        cfg.origination_fee_percent = dec!(1);
        let result = compute_schedule(&cfg);
        let draws: Money = result.schedule.iter().map(|e| e.draw_amount).sum();
        assert_eq!(
            result.total_payment,
            draws + result.total_interest + result.total_fees
        );
    }

    #[test]
    fn test_effective_apr_interest_only_draw_phase() {
        let mut cfg = sample_config();
        cfg.term_in_years = dec!(5);
        let result = compute_schedule(&cfg);
        let years = Decimal::from(result.schedule.len()) / dec!(12);
        let expected = result.total_interest / dec!(50000) / years * dec!(100);
        assert_eq!(result.effective_apr, expected);
    }

    #[test]
    fn test_weekly_adb_runs_both_phases() {
        let mut cfg = sample_config();
        cfg.repayment_cadence = RepaymentCadence::Weekly;
        cfg.interest_calculation_method = InterestMethod::Adb;
        cfg.payment_policy = PaymentPolicy::PercentOfBalance;
        cfg.balance_payment_percent = dec!(1);
        let result = compute_schedule(&cfg);
        assert_eq!(result.schedule.len(), 104 + 260);
        assert!(result.schedule.iter().all(|e| e.ending_balance >= Decimal::ZERO));
    }

    #[test]
    fn test_warnings_for_clamp_and_unreached_rate_change() {
        let mut cfg = sample_config();
        cfg.draw_schedule = vec![dec!(150000)];
        cfg.rate_changes = vec![RateChange {
            period: 1000,
            new_total_apr: dec!(5),
        }];
        let out = amortize(&cfg).unwrap();
        assert_eq!(out.result.schedule[0].draw_amount, dec!(100000));
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("period(s) 1"));
        assert!(out.warnings[1].contains("period 1000"));
    }

    #[test]
    fn test_overlong_term_truncated_and_reported() {
        let mut cfg = sample_config();
        cfg.term_in_years = dec!(400000000);
        let out = amortize(&cfg).unwrap();
        let result = &out.result;
        assert_eq!(result.schedule.len(), 24 + 1200);
        assert!(result.principal_and_interest_payment > Decimal::ZERO);
        let last = result.schedule.last().unwrap();
        assert_eq!(last.period, 1224);
        assert!(last.ending_balance < dec!(0.000001), "{}", last.ending_balance);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("truncated to 1200 periods"));
    }
}

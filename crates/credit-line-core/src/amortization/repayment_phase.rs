//! Repayment period: level payments that retire the balance, re-amortized
//! whenever the rate changes.

use log::debug;
use rust_decimal::Decimal;

use super::calendar::Calendar;
use super::context::SimulationContext;
use super::{fees, interest, PeriodEntry, Phase};
use crate::config::CreditLineConfig;
use crate::types::Money;

/// Result of the repayment phase.
#[derive(Debug, Clone)]
pub struct RepaymentOutcome {
    pub context: SimulationContext,
    pub entries: Vec<PeriodEntry>,
    /// Most recent level payment, after any re-amortization.
    pub level_payment: Money,
}

pub fn run_repayment_phase(
    mut ctx: SimulationContext,
    config: &CreditLineConfig,
    calendar: &Calendar,
) -> RepaymentOutcome {
    let (total_periods, _) = calendar.repayment_periods(config.term_in_years);
    let mut entries = Vec::with_capacity(total_periods as usize);
    let mut payment = interest::level_payment(
        ctx.remaining_balance,
        interest::periodic_rate(ctx.current_annual_rate, calendar),
        total_periods,
    );
    debug!(
        "repayment phase: {} over {total_periods} periods, level payment {payment}",
        ctx.remaining_balance
    );

    for local in 1..=total_periods {
        let period = calendar.draw_periods() + local;
        if ctx.apply_rate_change(period) {
            let periods_left = total_periods - (local - 1);
            payment = interest::level_payment(
                ctx.remaining_balance,
                interest::periodic_rate(ctx.current_annual_rate, calendar),
                periods_left,
            );
            debug!("period {period}: re-amortized to {payment} over {periods_left} periods");
        }

        let beginning_balance = ctx.remaining_balance;
        let period_fees = fees::periodic_fees(period, config, calendar);
        let interest = interest::accrue(
            beginning_balance,
            ctx.current_annual_rate,
            config.interest_calculation_method,
            calendar,
        );

        // Final-period overshoot: principal is capped but the recorded payment
        // stays at the level amount.
        let principal = (payment - interest).min(beginning_balance);
        let ending_balance = (beginning_balance - principal).max(Decimal::ZERO);

        ctx.total_interest += interest;
        ctx.total_fees += period_fees;
        ctx.remaining_balance = ending_balance;

        entries.push(PeriodEntry {
            period,
            phase: Phase::Repayment,
            annual_rate: ctx.current_annual_rate,
            beginning_balance,
            draw_amount: Decimal::ZERO,
            payment,
            interest,
            principal,
            fees: period_fees,
            total_cash_flow: payment + period_fees,
            ending_balance,
            available_credit: config.borrow_limit - ending_balance,
        });
    }

    RepaymentOutcome {
        context: ctx,
        entries,
        level_payment: payment,
    }
}

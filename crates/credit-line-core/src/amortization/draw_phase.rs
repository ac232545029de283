//! Draw period: scheduled draws against the limit, payments per policy.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calendar::Calendar;
use super::context::SimulationContext;
use super::{fees, interest, PeriodEntry, Phase};
use crate::config::{CreditLineConfig, PaymentPolicy};
use crate::types::Money;

/// Run every draw-period period, returning the updated context and the
/// period records in order.
pub fn run_draw_phase(
    mut ctx: SimulationContext,
    config: &CreditLineConfig,
    calendar: &Calendar,
) -> (SimulationContext, Vec<PeriodEntry>) {
    let mut entries = Vec::with_capacity(calendar.draw_periods() as usize);

    for period in 1..=calendar.draw_periods() {
        ctx.apply_rate_change(period);
        let beginning_balance = ctx.remaining_balance;
        let mut period_fees = fees::periodic_fees(period, config, calendar);

        let draw = scheduled_draw(&mut ctx, config, calendar, period);
        if draw > Decimal::ZERO {
            period_fees += fees::draw_fees(draw, config);
        } else if !(period == 1 && ctx.initial_draw > Decimal::ZERO) {
            period_fees += config.inactivity_fee;
        }
        ctx.record_draw(draw);
        ctx.total_fees += period_fees;

        let balance = ctx.remaining_balance;
        let interest = interest::accrue(
            balance,
            ctx.current_annual_rate,
            config.interest_calculation_method,
            calendar,
        );
        let (payment, principal) = policy_payment(config, interest, balance);

        ctx.total_interest += interest;
        ctx.remaining_balance = (balance - principal).max(Decimal::ZERO);

        entries.push(PeriodEntry {
            period,
            phase: Phase::Draw,
            annual_rate: ctx.current_annual_rate,
            beginning_balance,
            draw_amount: draw,
            payment,
            interest,
            principal,
            fees: period_fees,
            total_cash_flow: payment + period_fees,
            ending_balance: ctx.remaining_balance,
            available_credit: config.borrow_limit - ctx.remaining_balance,
        });
    }

    debug!(
        "draw phase complete: balance {}, peak {}",
        ctx.remaining_balance, ctx.peak_balance
    );
    (ctx, entries)
}

/// Draw for `period`, clamped to the headroom under the limit. Only the first
/// period of a calendar month consults the draw schedule.
fn scheduled_draw(
    ctx: &mut SimulationContext,
    config: &CreditLineConfig,
    calendar: &Calendar,
    period: u32,
) -> Money {
    if !calendar.is_month_start(period) {
        return Decimal::ZERO;
    }
    let requested = config
        .draw_schedule
        .get(calendar.month_index(period))
        .copied()
        .unwrap_or(Decimal::ZERO);
    let headroom = config.borrow_limit - ctx.remaining_balance;
    let draw = requested.min(headroom).max(Decimal::ZERO);
    if draw < requested {
        ctx.clamped_draw_periods.push(period);
    }
    draw
}

/// Payment and principal for one draw-period period.
///
/// Principal is capped at the balance, in which case the payment becomes
/// principal plus interest.
pub fn policy_payment(config: &CreditLineConfig, interest: Money, balance: Money) -> (Money, Money) {
    let (payment, principal) = match config.payment_policy {
        PaymentPolicy::InterestOnly => (interest, Decimal::ZERO),
        PaymentPolicy::PercentOfBalance => {
            let payment = interest.max(balance * config.balance_payment_percent / dec!(100));
            (payment, payment - interest)
        }
        PaymentPolicy::InterestPlusPrincipalFloor => {
            let principal = config.principal_floor_amount;
            (interest + principal, principal)
        }
    };

    if principal > balance {
        (balance + interest, balance)
    } else {
        (payment, principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepaymentCadence;
    use pretty_assertions::assert_eq;

    fn base_config() -> CreditLineConfig {
        CreditLineConfig {
            draw_schedule: vec![dec!(50000)],
            borrow_limit: dec!(100000),
            annual_rate: dec!(12),
            ..CreditLineConfig::default()
        }
    }

    fn run(config: &CreditLineConfig) -> (SimulationContext, Vec<PeriodEntry>) {
        let calendar = Calendar::new(config.repayment_cadence);
        let mut ctx = SimulationContext::new(config);
        ctx.apply_initial_draw(config);
        run_draw_phase(ctx, config, &calendar)
    }

    #[test]
    fn test_interest_only_keeps_balance() {
        let (ctx, entries) = run(&base_config());
        assert_eq!(entries.len(), 24);
        assert_eq!(entries[0].draw_amount, dec!(50000));
        assert_eq!(entries[0].interest, dec!(500));
        assert_eq!(entries[0].payment, dec!(500));
        assert!(entries.iter().all(|e| e.ending_balance == dec!(50000)));
        assert_eq!(ctx.total_interest, dec!(12000));
    }

    #[test]
    fn test_percent_of_balance_never_below_interest() {
        let mut cfg = base_config();
        cfg.payment_policy = PaymentPolicy::PercentOfBalance;
        cfg.balance_payment_percent = dec!(0.5);
        let (_, entries) = run(&cfg);
        // 0.5% of 50,000 = 250 < 500 interest, so payment = interest
        assert_eq!(entries[0].payment, dec!(500));
        assert_eq!(entries[0].principal, Decimal::ZERO);

        cfg.balance_payment_percent = dec!(2);
        let (_, entries) = run(&cfg);
        assert_eq!(entries[0].payment, dec!(1000));
        assert_eq!(entries[0].principal, dec!(500));
        assert_eq!(entries[0].ending_balance, dec!(49500));
    }

    #[test]
    fn test_principal_floor_capped_at_balance() {
        let mut cfg = base_config();
        cfg.draw_schedule = vec![dec!(1000)];
        cfg.payment_policy = PaymentPolicy::InterestPlusPrincipalFloor;
        cfg.principal_floor_amount = dec!(600);
        let (ctx, entries) = run(&cfg);

        assert_eq!(entries[0].principal, dec!(600));
        assert_eq!(entries[0].payment, dec!(610));
        // Second period: only 400 left, payment recomputed as 400 + interest
        assert_eq!(entries[1].principal, dec!(400));
        assert_eq!(entries[1].payment, dec!(404));
        assert_eq!(entries[1].ending_balance, Decimal::ZERO);
        assert_eq!(ctx.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_draw_clamped_to_headroom() {
        let mut cfg = base_config();
        cfg.initial_draw_amount = dec!(80000);
        cfg.draw_schedule = vec![dec!(50000), dec!(-500)];
        let (ctx, entries) = run(&cfg);
        assert_eq!(entries[0].draw_amount, dec!(20000));
        assert_eq!(entries[0].available_credit, Decimal::ZERO);
        // Negative request never becomes a negative draw
        assert_eq!(entries[1].draw_amount, Decimal::ZERO);
        assert_eq!(ctx.clamped_draw_periods, vec![1]);
    }

    #[test]
    fn test_inactivity_fee_skipped_when_initial_draw_covers_period_one() {
        let mut cfg = base_config();
        cfg.draw_schedule = vec![];
        cfg.initial_draw_amount = dec!(10000);
        cfg.inactivity_fee = dec!(35);
        let (_, entries) = run(&cfg);
        assert_eq!(entries[0].fees, Decimal::ZERO);
        assert_eq!(entries[1].fees, dec!(35));
    }

    #[test]
    fn test_weekly_draws_only_in_first_period() {
        let mut cfg = base_config();
        cfg.repayment_cadence = RepaymentCadence::Weekly;
        cfg.draw_schedule = vec![dec!(1000); 24];
        let (ctx, entries) = run(&cfg);
        assert_eq!(entries.len(), 104);
        assert_eq!(entries[0].draw_amount, dec!(1000));
        assert!(entries[1..].iter().all(|e| e.draw_amount.is_zero()));
        assert_eq!(ctx.total_draws, dec!(1000));
    }
}

//! Interest accrual and level-payment math.

use log::warn;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::calendar::Calendar;
use crate::config::InterestMethod;
use crate::types::{Money, Percent};

const PERCENT: Decimal = dec!(100);
const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Periodic rate (as a fraction) for an annual percentage rate.
pub fn periodic_rate(annual_rate: Percent, calendar: &Calendar) -> Decimal {
    annual_rate / PERCENT / Decimal::from(calendar.periods_per_year())
}

/// Interest accrued over one period on `balance`.
pub fn accrue(
    balance: Money,
    annual_rate: Percent,
    method: InterestMethod,
    calendar: &Calendar,
) -> Money {
    match method {
        InterestMethod::Adb => {
            let daily_rate = annual_rate / PERCENT / DAYS_PER_YEAR;
            balance * daily_rate * calendar.cadence().days_in_period()
        }
        InterestMethod::EndOfPeriod => balance * periodic_rate(annual_rate, calendar),
    }
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
///
/// Zero rate amortizes straight-line; no periods means no payment.
pub fn level_payment(principal: Money, rate: Decimal, periods: u32) -> Money {
    if periods == 0 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return principal / n;
    }

    match (Decimal::ONE + rate).checked_powi(i64::from(periods)) {
        Some(growth) => {
            let denominator = growth - Decimal::ONE;
            if denominator.is_zero() {
                return principal / n;
            }
            // Divide first so the growth factor never multiplies the balance
            principal * rate * (growth / denominator)
        }
        None => {
            warn!(
                "annuity factor overflowed at rate {rate} over {periods} periods; \
                 using interest-only payment"
            );
            principal * rate
        }
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calendar::Calendar;
use crate::config::CreditLineConfig;
use crate::types::Money;

/// Flat fees keyed to the calendar: maintenance at each month start, the
/// annual fee at each year start. Both can fall in the same period.
pub fn periodic_fees(period: u32, config: &CreditLineConfig, calendar: &Calendar) -> Money {
    let mut fees = Decimal::ZERO;
    if calendar.is_month_start(period) {
        fees += config.monthly_maintenance_fee;
    }
    if calendar.is_year_start(period) {
        fees += config.annual_fee;
    }
    fees
}

/// Origination percentage plus the flat draw fee for a nonzero draw.
pub fn draw_fees(draw: Money, config: &CreditLineConfig) -> Money {
    draw * config.origination_fee_percent / dec!(100) + config.draw_fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepaymentCadence;

    fn fee_config() -> CreditLineConfig {
        CreditLineConfig {
            annual_fee: dec!(250),
            monthly_maintenance_fee: dec!(15),
            origination_fee_percent: dec!(1.5),
            draw_fee: dec!(25),
            ..CreditLineConfig::default()
        }
    }

    #[test]
    fn test_monthly_and_annual_stack_in_first_period() {
        let cal = Calendar::new(RepaymentCadence::Monthly);
        let cfg = fee_config();
        assert_eq!(periodic_fees(1, &cfg, &cal), dec!(265));
        assert_eq!(periodic_fees(2, &cfg, &cal), dec!(15));
        assert_eq!(periodic_fees(13, &cfg, &cal), dec!(265));
    }

    #[test]
    fn test_weekly_non_boundary_has_no_flat_fees() {
        let cal = Calendar::new(RepaymentCadence::Weekly);
        let cfg = fee_config();
        assert_eq!(periodic_fees(2, &cfg, &cal), Decimal::ZERO);
        // Year start but not a month start under the weekly cadence
        assert_eq!(periodic_fees(53, &cfg, &cal), dec!(250));
    }

    #[test]
    fn test_draw_fees() {
        let cfg = fee_config();
        // 10,000 * 1.5% + 25
        assert_eq!(draw_fees(dec!(10000), &cfg), dec!(175));
    }
}

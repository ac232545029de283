//! Line of credit configuration.
//!
//! A [`CreditLineConfig`] is the flat record the engine consumes. Every field
//! is read by the engine and every field is required when deserializing;
//! unknown keys are rejected. The [`Default`] implementation belongs to callers
//! (CLI flags, partially specified CLI files) and is never consulted by the
//! engine itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Length of the draw period in years.
pub const DRAW_PERIOD_YEARS: u32 = 2;

/// Longest repayment term simulated; longer terms are truncated to it.
pub const MAX_TERM_YEARS: u32 = 100;

/// How often payments fall due. Drives the period length for both phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentCadence {
    #[default]
    Monthly,
    Weekly,
}

impl RepaymentCadence {
    pub fn periods_per_year(self) -> u32 {
        match self {
            RepaymentCadence::Monthly => 12,
            RepaymentCadence::Weekly => 52,
        }
    }

    /// Days accrued per period under the average-daily-balance method.
    pub fn days_in_period(self) -> Decimal {
        match self {
            RepaymentCadence::Monthly => dec!(365.25) / dec!(12),
            RepaymentCadence::Weekly => dec!(7),
        }
    }
}

/// Payment formula applied during the draw period. The repayment period
/// always fully amortizes regardless of this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPolicy {
    /// Pay accrued interest only; principal untouched.
    #[default]
    InterestOnly,
    /// Pay a percentage of the balance, never less than accrued interest.
    PercentOfBalance,
    /// Pay accrued interest plus a fixed principal amount.
    InterestPlusPrincipalFloor,
}

/// Interest accrual basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// Periodic rate applied to the post-draw balance.
    #[default]
    EndOfPeriod,
    /// Average daily balance: balance × daily rate × days in period.
    Adb,
}

/// A change to the all-in annual rate, effective from the start of `period`.
///
/// Periods are numbered globally: the repayment phase continues the draw
/// phase's numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateChange {
    pub period: u32,
    pub new_total_apr: Percent,
}

/// Input for computing a line of credit schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditLineConfig {
    /// Requested draw per calendar month of the draw period (index 0 = month 1).
    pub draw_schedule: Vec<Money>,
    /// Drawn at time zero, before period 1.
    pub initial_draw_amount: Money,
    /// All-in annual rate in percent (base rate + margin).
    pub annual_rate: Percent,
    /// Length of the repayment phase.
    pub term_in_years: Decimal,
    /// Percent of each draw charged as origination fee.
    pub origination_fee_percent: Percent,
    pub annual_fee: Money,
    pub draw_fee: Money,
    pub inactivity_fee: Money,
    pub monthly_maintenance_fee: Money,
    /// Ceiling on outstanding principal during the draw period.
    pub borrow_limit: Money,
    pub repayment_cadence: RepaymentCadence,
    pub payment_policy: PaymentPolicy,
    /// Used by [`PaymentPolicy::PercentOfBalance`].
    pub balance_payment_percent: Percent,
    /// Used by [`PaymentPolicy::InterestPlusPrincipalFloor`].
    pub principal_floor_amount: Money,
    pub rate_changes: Vec<RateChange>,
    pub interest_calculation_method: InterestMethod,
}

/// Prime-style base rate used for the caller default.
pub const DEFAULT_BASE_RATE: Percent = dec!(7.25);
/// Lender margin used for the caller default.
pub const DEFAULT_MARGIN: Percent = dec!(2.5);

impl Default for CreditLineConfig {
    fn default() -> Self {
        Self {
            draw_schedule: Vec::new(),
            initial_draw_amount: Decimal::ZERO,
            annual_rate: DEFAULT_BASE_RATE + DEFAULT_MARGIN,
            term_in_years: dec!(5),
            origination_fee_percent: Decimal::ZERO,
            annual_fee: Decimal::ZERO,
            draw_fee: Decimal::ZERO,
            inactivity_fee: Decimal::ZERO,
            monthly_maintenance_fee: Decimal::ZERO,
            borrow_limit: dec!(100000),
            repayment_cadence: RepaymentCadence::Monthly,
            payment_policy: PaymentPolicy::InterestOnly,
            balance_payment_percent: Decimal::ZERO,
            principal_floor_amount: Decimal::ZERO,
            rate_changes: Vec::new(),
            interest_calculation_method: InterestMethod::EndOfPeriod,
        }
    }
}

impl CreditLineConfig {
    /// Combine a base rate and margin into the all-in annual rate.
    pub fn with_base_and_margin(mut self, base_rate: Percent, margin: Percent) -> Self {
        self.annual_rate = base_rate + margin;
        self
    }

    /// Number of periods in the draw phase for this cadence.
    pub fn draw_periods(&self) -> u32 {
        DRAW_PERIOD_YEARS * self.repayment_cadence.periods_per_year()
    }
}

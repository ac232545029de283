pub mod amortization;
pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use amortization::{amortize, compute_schedule, PeriodEntry, Phase, ScheduleResult};
pub use config::{CreditLineConfig, InterestMethod, PaymentPolicy, RateChange, RepaymentCadence};
pub use error::CreditLineError;
pub use types::*;

/// Standard result type for all credit-line operations
pub type CreditLineResult<T> = Result<T, CreditLineError>;

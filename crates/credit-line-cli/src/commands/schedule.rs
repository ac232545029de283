use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use credit_line_core::amortization;
use credit_line_core::config::{
    CreditLineConfig, InterestMethod, PaymentPolicy, RateChange, RepaymentCadence,
    DEFAULT_BASE_RATE,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CadenceArg {
    Monthly,
    Weekly,
}

impl From<CadenceArg> for RepaymentCadence {
    fn from(arg: CadenceArg) -> Self {
        match arg {
            CadenceArg::Monthly => RepaymentCadence::Monthly,
            CadenceArg::Weekly => RepaymentCadence::Weekly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    InterestOnly,
    PercentOfBalance,
    InterestPlusPrincipalFloor,
}

impl From<PolicyArg> for PaymentPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::InterestOnly => PaymentPolicy::InterestOnly,
            PolicyArg::PercentOfBalance => PaymentPolicy::PercentOfBalance,
            PolicyArg::InterestPlusPrincipalFloor => PaymentPolicy::InterestPlusPrincipalFloor,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InterestMethodArg {
    EndOfPeriod,
    Adb,
}

impl From<InterestMethodArg> for InterestMethod {
    fn from(arg: InterestMethodArg) -> Self {
        match arg {
            InterestMethodArg::EndOfPeriod => InterestMethod::EndOfPeriod,
            InterestMethodArg::Adb => InterestMethod::Adb,
        }
    }
}

/// Parse a `PERIOD:APR` rate change, e.g. `30:11.25`.
fn parse_rate_change(s: &str) -> Result<RateChange, String> {
    let (period, apr) = s
        .split_once(':')
        .ok_or_else(|| format!("expected PERIOD:APR, got '{s}'"))?;
    let period = period
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid period '{period}': {e}"))?;
    let new_total_apr = apr
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid APR '{apr}': {e}"))?;
    Ok(RateChange {
        period,
        new_total_apr,
    })
}

/// Arguments for a line of credit schedule
#[derive(Args, Default)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML config file; flags override values from the file
    #[arg(long)]
    pub input: Option<String>,

    /// Requested draw per month of the draw period (comma-separated, e.g. "50000,0,10000")
    #[arg(long, value_delimiter = ',')]
    pub draws: Option<Vec<Decimal>>,

    /// Amount drawn at time zero
    #[arg(long)]
    pub initial_draw: Option<Decimal>,

    /// All-in annual rate in percent (takes precedence over --base-rate/--margin)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Base rate in percent, combined with --margin
    #[arg(long)]
    pub base_rate: Option<Decimal>,

    /// Lender margin in percent, combined with --base-rate
    #[arg(long)]
    pub margin: Option<Decimal>,

    /// Repayment term in years
    #[arg(long)]
    pub term_years: Option<Decimal>,

    /// Origination fee as percent of each draw
    #[arg(long)]
    pub origination_fee_percent: Option<Decimal>,

    /// Flat fee on the first period of each year
    #[arg(long)]
    pub annual_fee: Option<Decimal>,

    /// Flat fee per nonzero draw
    #[arg(long)]
    pub draw_fee: Option<Decimal>,

    /// Flat fee for a draw-period period without a draw
    #[arg(long)]
    pub inactivity_fee: Option<Decimal>,

    /// Flat fee on the first period of each month
    #[arg(long)]
    pub maintenance_fee: Option<Decimal>,

    /// Credit limit
    #[arg(long)]
    pub borrow_limit: Option<Decimal>,

    /// Payment cadence
    #[arg(long, value_enum)]
    pub cadence: Option<CadenceArg>,

    /// Draw-period payment policy
    #[arg(long, value_enum)]
    pub payment_policy: Option<PolicyArg>,

    /// Percent of balance paid under percent-of-balance
    #[arg(long)]
    pub balance_payment_percent: Option<Decimal>,

    /// Principal paid each period under interest-plus-principal-floor
    #[arg(long)]
    pub principal_floor: Option<Decimal>,

    /// Rate change as PERIOD:APR (repeatable)
    #[arg(long = "rate-change", value_parser = parse_rate_change)]
    pub rate_changes: Vec<RateChange>,

    /// Interest accrual method
    #[arg(long, value_enum)]
    pub interest_method: Option<InterestMethodArg>,
}

/// Layer command-line flags over a base configuration.
fn apply_flags(mut config: CreditLineConfig, args: ScheduleArgs) -> CreditLineConfig {
    if let Some(draws) = args.draws {
        config.draw_schedule = draws;
    }
    if let Some(v) = args.initial_draw {
        config.initial_draw_amount = v;
    }
    match (args.annual_rate, args.base_rate, args.margin) {
        (Some(rate), _, _) => config.annual_rate = rate,
        (None, Some(base), margin) => {
            config = config.with_base_and_margin(base, margin.unwrap_or(Decimal::ZERO))
        }
        (None, None, Some(margin)) => {
            config = config.with_base_and_margin(DEFAULT_BASE_RATE, margin)
        }
        (None, None, None) => {}
    }
    if let Some(v) = args.term_years {
        config.term_in_years = v;
    }
    if let Some(v) = args.origination_fee_percent {
        config.origination_fee_percent = v;
    }
    if let Some(v) = args.annual_fee {
        config.annual_fee = v;
    }
    if let Some(v) = args.draw_fee {
        config.draw_fee = v;
    }
    if let Some(v) = args.inactivity_fee {
        config.inactivity_fee = v;
    }
    if let Some(v) = args.maintenance_fee {
        config.monthly_maintenance_fee = v;
    }
    if let Some(v) = args.borrow_limit {
        config.borrow_limit = v;
    }
    if let Some(v) = args.cadence {
        config.repayment_cadence = v.into();
    }
    if let Some(v) = args.payment_policy {
        config.payment_policy = v.into();
    }
    if let Some(v) = args.balance_payment_percent {
        config.balance_payment_percent = v;
    }
    if let Some(v) = args.principal_floor {
        config.principal_floor_amount = v;
    }
    if !args.rate_changes.is_empty() {
        config.rate_changes = args.rate_changes;
    }
    if let Some(v) = args.interest_method {
        config.interest_calculation_method = v.into();
    }
    config
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let partial: Option<Value> = if let Some(ref path) = args.input {
        Some(input::file::read_config(path)?)
    } else {
        input::stdin::read_stdin()?
    };
    let base = match partial {
        Some(value) => input::defaults::config_with_defaults(value)?,
        None => CreditLineConfig::default(),
    };

    let config = apply_flags(base, args);
    let result = amortization::amortize(&config)?;
    Ok(serde_json::to_value(result)?)
}

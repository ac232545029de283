use clap::Args;
use serde_json::Value;

use credit_line_core::comparison::{self, ComparisonInput};

use crate::input;

/// Arguments for scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML file with a `scenarios` list of `{ name, config }`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = if let Some(ref path) = args.input {
        input::file::read_config(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file> or stdin required for scenario comparison".into());
    };
    let cmp_input: ComparisonInput =
        serde_json::from_value(input::defaults::scenarios_with_defaults(raw)?)?;
    let result = comparison::compare_scenarios(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

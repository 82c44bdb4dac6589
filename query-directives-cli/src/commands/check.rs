use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use query_directives::prelude::*;

use crate::output::{self, Format};

#[derive(Args)]
pub struct CheckArgs {
    /// Query string to check, e.g. "filters=age:gte:18&sort=id:desc&page=2"
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Configuration file declaring endpoint policies
    #[arg(short, long, value_name = "FILE", env = "QUERY_DIRECTIVES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Endpoint whose policy applies (unrestricted when omitted)
    #[arg(short, long, value_name = "NAME")]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Returns `Ok(false)` when the query is rejected
pub fn execute(args: CheckArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => DirectivesConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => DirectivesConfig::load().context("Failed to load configuration")?,
    };

    let policy = match &args.endpoint {
        Some(name) => config.endpoint(name)?.clone(),
        None => EndpointPolicy::default(),
    };

    Ok(check(&args.query, &policy, &config.parameters, args.format)?)
}

/// Parse `query` and print the outcome
fn check(
    query: &str,
    policy: &EndpointPolicy,
    names: &ParameterNames,
    format: Format,
) -> query_directives::Result<bool> {
    let pairs = QueryPairs::parse(query)?;

    match ListDirectives::from_source(&pairs, policy, names) {
        Ok(directives) => {
            println!("{}", output::accepted(&directives, format));
            Ok(true)
        }
        Err(error) => {
            println!("{}", output::rejected(&error, format));
            Ok(false)
        }
    }
}

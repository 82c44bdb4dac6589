use anyhow::Result;
use colored::Colorize;
use query_directives::FilterRule;
use serde::Serialize;

#[derive(Serialize)]
struct RuleInfo {
    token: &'static str,
    name: &'static str,
    nullary: bool,
}

fn rule_infos() -> Vec<RuleInfo> {
    FilterRule::ALL
        .into_iter()
        .map(|rule| RuleInfo {
            token: rule.token(),
            name: rule.name(),
            nullary: rule.is_nullary(),
        })
        .collect()
}

pub fn execute(json: bool) -> Result<()> {
    let rules = rule_infos();

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", "Filter rules".bold());
    println!();
    for rule in &rules {
        let usage = if rule.nullary {
            format!("property:{}", rule.token)
        } else {
            format!("property:{}:value", rule.token)
        };
        println!("  {:<10} {:<24} {}", rule.token.cyan(), rule.name, usage.dimmed());
    }

    Ok(())
}

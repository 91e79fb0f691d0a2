use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use paro::config::{Config, Parameter};
use serde_json::Value;

pub async fn execute(config: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config.as_deref())?;

    println!(
        "{:<10} {:<16} {}",
        "PARAMETER".bold(),
        "QUERY KEY".bold(),
        "DEFAULT".bold()
    );
    for parameter in Parameter::ALL {
        let key = config.parameters.key(parameter);
        let key = if key == parameter.name() {
            key.normal()
        } else {
            key.cyan()
        };
        println!(
            "{:<10} {:<16} {}",
            parameter.name(),
            key,
            default_summary(&config, parameter).as_str().dimmed()
        );
    }

    println!(
        "\n{} {}   {} {}",
        "include mode:".bold(),
        config.defaults.include_mode,
        "strict sort:".bold(),
        config.parsing.strict_sort
    );

    Ok(())
}

fn default_summary(config: &Config, parameter: Parameter) -> String {
    let defaults = &config.defaults;
    match parameter {
        Parameter::Fields => list_summary(defaults.fields.len()),
        Parameter::Filters => list_summary(defaults.filters.len()),
        Parameter::Includes => list_summary(defaults.includes.len()),
        Parameter::Sort => list_summary(defaults.sort.len()),
        Parameter::Limit => optional(defaults.limit.map(Value::from)),
        Parameter::Page => optional(defaults.page.map(Value::from)),
        Parameter::Start => optional(defaults.start.as_ref().map(|s| Value::from(s.to_string()))),
    }
}

fn list_summary(len: usize) -> String {
    match len {
        0 => "-".to_string(),
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    }
}

fn optional(value: Option<Value>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

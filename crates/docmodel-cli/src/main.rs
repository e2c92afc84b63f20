//! Document model operator CLI

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use docmodel_filter::{unwrap_list, FilterDescriptorRegistry, JsonDocumentFilter};
use docmodel_process::CacheConfig;
use docmodel_value::{convert, Value, ValueType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("docmodel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Document model tooling")
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("resolve-filter")
                .about("Resolve wire filters against registered filter descriptors")
                .arg(
                    Arg::new("descriptors")
                        .long("descriptors")
                        .value_parser(value_parser!(PathBuf))
                        .help("YAML file with filter descriptors"),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .required(true)
                        .help("JSON filter object or array of filter objects"),
                ),
        )
        .subcommand(
            Command::new("coerce")
                .about("Convert a JSON value to a field type")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(value_parser!(ValueType))
                        .help("Target type: text, integer, decimal, date, boolean, lookup"),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required(true)
                        .help("Value as JSON; bare words are taken as text"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate a process cache config file")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML config file"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_filter(args: &ArgMatches) -> Result<()> {
    let registry = match args.get_one::<PathBuf>("descriptors") {
        Some(path) => FilterDescriptorRegistry::from_file(path)
            .with_context(|| format!("loading filter descriptors from {}", path.display()))?,
        None => FilterDescriptorRegistry::new(),
    };
    tracing::info!(filters = registry.len(), "filter descriptors loaded");

    let raw = args
        .get_one::<String>("filter")
        .context("missing --filter")?;
    let json: serde_json::Value = serde_json::from_str(raw).context("--filter is not valid JSON")?;
    let wire: Vec<JsonDocumentFilter> = if json.is_array() {
        serde_json::from_value(json)?
    } else {
        vec![serde_json::from_value(json)?]
    };

    let filters = unwrap_list(&wire, &registry)?;
    println!("{}", serde_json::to_string_pretty(&filters)?);
    Ok(())
}

fn coerce(args: &ArgMatches) -> Result<()> {
    let target = *args
        .get_one::<ValueType>("type")
        .context("missing --type")?;
    let raw = args
        .get_one::<String>("value")
        .context("missing --value")?;
    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map_or_else(|_| Value::text(raw.as_str()), Value::from);

    let converted = convert(&value, target, None)?;
    tracing::debug!(from = ?value.kind(), to = %target, "converted");
    println!("{}", converted.to_json());
    Ok(())
}

fn check_config(args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("path")
        .context("missing config path")?;
    let config = CacheConfig::from_file(path)
        .with_context(|| format!("checking {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("resolve-filter", args)) => resolve_filter(args),
        Some(("coerce", args)) => coerce(args),
        Some(("check-config", args)) => check_config(args),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_coerce_arguments() {
        let matches = cli()
            .try_get_matches_from(["docmodel", "coerce", "--type", "integer", "--value", "\"42\""])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "coerce");
        assert_eq!(args.get_one::<ValueType>("type"), Some(&ValueType::Integer));
    }

    #[test]
    fn rejects_unknown_type() {
        let result = cli().try_get_matches_from(["docmodel", "coerce", "--type", "blob", "--value", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn coerces_bare_word_as_text() {
        let matches = cli()
            .try_get_matches_from(["docmodel", "coerce", "--type", "boolean", "--value", "Y"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(coerce(args).is_ok());
    }

    #[test]
    fn resolves_ad_hoc_filter_without_descriptors() {
        let matches = cli()
            .try_get_matches_from([
                "docmodel",
                "resolve-filter",
                "--filter",
                r#"{"filterId":"adhoc","parameters":[{"parameterName":"Name","value":"Joe"}]}"#,
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(resolve_filter(args).is_ok());
    }
}

//! scopefilter - command-line front end for the scope filter engine
//!
//! - `filter`: build a SQL predicate from a permission file
//! - `parse-scope`: show how a scope string is parsed
//! - `columns`: list accepted column identifiers

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use scopefilter::{Filter, PermissionSet, PlaceholderStyle, Scope, ScopeAttribute, SignedInUser};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

mod config;

use config::CliConfig;

/// Scope filter CLI
#[derive(Parser)]
#[command(name = "scopefilter")]
#[command(about = "Turn scope-based permissions into parameterized SQL predicates")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SCOPEFILTER_CONFIG")]
    config: Option<PathBuf>,

    /// Placeholder syntax (overrides config)
    #[arg(long, value_enum)]
    placeholder: Option<PlaceholderArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlaceholderArg {
    Question,
    Dollar,
}

impl From<PlaceholderArg> for PlaceholderStyle {
    fn from(arg: PlaceholderArg) -> Self {
        match arg {
            PlaceholderArg::Question => PlaceholderStyle::Question,
            PlaceholderArg::Dollar => PlaceholderStyle::Dollar,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Build a predicate for a column
    #[command(group(ArgGroup::new("source").required(true).args(["permissions", "user"])))]
    Filter {
        /// JSON file with a permission set (`{"action": ["scope", ...]}`)
        #[arg(short, long)]
        permissions: Option<PathBuf>,

        /// JSON file with a signed-in user (`{"id", "org_id", "permissions"}`)
        #[arg(short, long)]
        user: Option<PathBuf>,

        /// Column identifier; must be in the accept list
        #[arg(long)]
        column: String,

        /// Scope prefix, e.g. `datasources`
        #[arg(long)]
        prefix: String,

        /// Scope attribute (`id` or `uid`)
        #[arg(long, default_value = "id")]
        attribute: ScopeAttribute,

        /// Required action; repeat for several
        #[arg(short, long = "action", required = true)]
        actions: Vec<String>,
    },

    /// Parse a scope string
    ParseScope {
        scope: String,
    },

    /// List accepted columns
    Columns {
        /// Only this attribute
        #[arg(long)]
        attribute: Option<ScopeAttribute>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(placeholder) = cli.placeholder {
        config.filter.placeholder = placeholder.into();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directive(cli.verbose, &config).into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    debug!(config = ?cli.config, "configuration loaded");

    let output = execute(&cli.command, &config)?;
    println!("{}", output);
    Ok(())
}

/// Log filter used when `RUST_LOG` is unset
///
/// Other crates stay at `warn`; ours follow `--verbose` or `[logging] level`.
fn log_directive(verbose: bool, config: &CliConfig) -> String {
    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    format!("warn,scopefilter={}", level)
}

/// Runs a subcommand and returns what should be printed
fn execute(command: &Command, config: &CliConfig) -> Result<String> {
    let engine = Filter::try_new(config.filter_config())?;

    match command {
        Command::Filter {
            permissions,
            user,
            column,
            prefix,
            attribute,
            actions,
        } => {
            let sql = match (permissions, user) {
                (Some(path), _) => {
                    let permissions: PermissionSet = read_json(path)?;
                    engine.filter(&permissions, column, prefix, *attribute, actions)?
                }
                (None, Some(path)) => {
                    let user: SignedInUser = read_json(path)?;
                    engine.filter_for_user(&user, column, prefix, *attribute, actions)?
                }
                (None, None) => anyhow::bail!("either --permissions or --user is required"),
            };
            Ok(serde_json::to_string_pretty(&sql)?)
        }

        Command::ParseScope { scope } => {
            let parsed = Scope::parse(scope).with_context(|| format!("Invalid scope '{}'", scope))?;
            Ok(serde_json::to_string_pretty(&parsed)?)
        }

        Command::Columns { attribute } => {
            let accept_list = engine.accept_list();
            let attributes: Vec<ScopeAttribute> = match attribute {
                Some(attribute) => vec![*attribute],
                None => ScopeAttribute::ALL.to_vec(),
            };

            let lines: Vec<String> = attributes
                .iter()
                .flat_map(|attribute| {
                    accept_list
                        .columns(*attribute)
                        .map(move |column| format!("{}\t{}", attribute, column))
                        .collect::<Vec<_>>()
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_directive_follows_level_and_verbose() {
        let config = CliConfig::from_toml_str("[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(log_directive(false, &config), "warn,scopefilter=warn");
        assert_eq!(log_directive(true, &config), "warn,scopefilter=debug");
        assert_eq!(log_directive(false, &CliConfig::default()), "warn,scopefilter=info");

        let cli = Cli::try_parse_from(["scopefilter", "--verbose", "columns"]).unwrap();
        assert_eq!(log_directive(cli.verbose, &config), "warn,scopefilter=debug");

        let filter: tracing_subscriber::EnvFilter = log_directive(false, &config).into();
        assert!(!filter.to_string().contains("debug"));
    }

    #[test]
    fn test_filter_from_permission_file() {
        let file = json_file(r#"{"datasources:read": ["datasources:id:7", "datasources:id:3"]}"#);
        let cli = Cli::try_parse_from([
            "scopefilter",
            "filter",
            "--permissions",
            file.path().to_str().unwrap(),
            "--column",
            "data_source.id",
            "--prefix",
            "datasources",
            "--action",
            "datasources:read",
        ])
        .unwrap();

        let output = execute(&cli.command, &CliConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["where"], "data_source.id IN (?, ?)");
        assert_eq!(json["args"], serde_json::json!([3, 7]));
    }

    #[test]
    fn test_filter_from_user_file_with_dollar_placeholders() {
        let file = json_file(
            r#"{"id": 1, "org_id": 1, "permissions": {"1": {"datasources:read": ["datasources:uid:abc"]}}}"#,
        );
        let cli = Cli::try_parse_from([
            "scopefilter",
            "--placeholder",
            "dollar",
            "filter",
            "--user",
            file.path().to_str().unwrap(),
            "--column",
            "data_source.uid",
            "--prefix",
            "datasources",
            "--attribute",
            "uid",
            "-a",
            "datasources:read",
        ])
        .unwrap();

        let mut config = CliConfig::default();
        config.filter.placeholder = cli.placeholder.unwrap().into();

        let output = execute(&cli.command, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["where"], "data_source.uid IN ($1)");
        assert_eq!(json["args"], serde_json::json!(["abc"]));
    }

    #[test]
    fn test_filter_rejects_unknown_column() {
        let file = json_file(r#"{"datasources:read": ["datasources:*"]}"#);
        let cli = Cli::try_parse_from([
            "scopefilter",
            "filter",
            "-p",
            file.path().to_str().unwrap(),
            "--column",
            "other.id",
            "--prefix",
            "datasources",
            "-a",
            "datasources:read",
        ])
        .unwrap();

        let err = execute(&cli.command, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("accept list"));
    }

    #[test]
    fn test_filter_requires_a_source_and_action() {
        assert!(Cli::try_parse_from([
            "scopefilter",
            "filter",
            "--column",
            "data_source.id",
            "--prefix",
            "datasources",
            "-a",
            "datasources:read",
        ])
        .is_err());

        assert!(Cli::try_parse_from([
            "scopefilter",
            "filter",
            "-p",
            "perms.json",
            "--column",
            "data_source.id",
            "--prefix",
            "datasources",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_scope_command() {
        let cli = Cli::try_parse_from(["scopefilter", "parse-scope", "datasources:id:*"]).unwrap();
        let output = execute(&cli.command, &CliConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["prefix"], "datasources");
        assert_eq!(json["attribute"], "id");
        assert_eq!(json["value"], "*");

        let cli = Cli::try_parse_from(["scopefilter", "parse-scope", "datasources:id:1*"]).unwrap();
        assert!(execute(&cli.command, &CliConfig::default()).is_err());
    }

    #[test]
    fn test_columns_include_configured_extras() {
        let config = CliConfig::from_toml_str("[accept_list]\nuid = [\"report.uid\"]\n").unwrap();
        let cli = Cli::try_parse_from(["scopefilter", "columns", "--attribute", "uid"]).unwrap();

        let output = execute(&cli.command, &config).unwrap();
        assert!(output.lines().any(|line| line == "uid\treport.uid"));
        assert!(output.lines().any(|line| line == "uid\tdashboard.uid"));
        assert!(!output.contains("data_source.id"));
    }
}

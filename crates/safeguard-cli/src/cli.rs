use safeguard::config::vars;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "safeguard.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Config,
    ConfigInit,
    Replay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help(HelpTopic),
    Config(ConfigCommand),
    Replay(ReplayArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    Show(ConfigShowArgs),
    Init(ConfigInitArgs),
}

/// `None` means the default path, which may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigShowArgs {
    pub config: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigInitArgs {
    pub config: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayArgs {
    pub config: Option<PathBuf>,
    pub deny_warnings: bool,
    pub input: Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "config" => parse_config(it.map(|s| s.as_str())),
        "replay" => parse_replay(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_config<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut config: Option<PathBuf> = None;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => {
                return Ok(Command::Help(match subcmd {
                    None => HelpTopic::Config,
                    Some("init") => HelpTopic::ConfigInit,
                    Some(other) => anyhow::bail!("unknown subcommand: {other}"),
                }));
            }
            "init" if subcmd.is_none() => subcmd = Some(token),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--json" => json = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let cmd = match subcmd {
        None => ConfigCommand::Show(ConfigShowArgs { config, json }),
        Some("init") => {
            if json {
                anyhow::bail!("--json is not supported by `safeguard config init`");
            }
            ConfigCommand::Init(ConfigInitArgs {
                config: config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)),
            })
        }
        Some(other) => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok(Command::Config(cmd))
}

fn parse_replay<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut deny_warnings = false;
    let mut input: Option<Input> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Replay)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--deny-warnings" => deny_warnings = true,
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("unknown argument: {other}")
            }
            other => {
                if input.is_some() {
                    anyhow::bail!("replay accepts a single input, got extra: {other}");
                }
                input = Some(if other == "-" {
                    Input::Stdin
                } else {
                    Input::File(PathBuf::from(other))
                });
            }
        }
    }

    Ok(Command::Replay(ReplayArgs {
        config,
        deny_warnings,
        input: input.unwrap_or(Input::Stdin),
    }))
}

fn root_help() -> String {
    format!(
        "\
safeguard - slow query and request/command lifecycle thresholds

USAGE:
  safeguard <COMMAND> [OPTIONS]

COMMANDS:
  config        Print resolved thresholds (or `config init` to write a template)
  replay        Evaluate recorded timings against the thresholds

ENVIRONMENT (overrides the config file):
  {}
  RUST_LOG controls log output (default: safeguard=info).

Run `safeguard <command> --help` for more.",
        vars::ALL.join("\n  ")
    )
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => println!("{}", root_help()),
        HelpTopic::Config => {
            println!(
                "\
USAGE:
  safeguard config [OPTIONS]
  safeguard config init [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: safeguard.toml, optional)
  --json                Print thresholds as JSON
  -h, --help            Print help"
            );
        }
        HelpTopic::ConfigInit => {
            println!(
                "\
USAGE:
  safeguard config init [OPTIONS]

OPTIONS:
  --config <FILE>       Output path (default: safeguard.toml)
  -h, --help            Print help"
            );
        }
        HelpTopic::Replay => {
            println!(
                "\
USAGE:
  safeguard replay [OPTIONS] [FILE|-]

Reads one JSON event per line, e.g.
  {{\"kind\":\"individual_query\",\"duration_ms\":1500,\"context\":{{\"sql\":\"select 1\"}}}}
Blank lines and lines starting with `#` are skipped. Reads stdin when FILE is
omitted or `-`.

OPTIONS:
  --config <FILE>       Config file path (default: safeguard.toml, optional)
  --deny-warnings       Exit non-zero if any threshold was exceeded
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use super::quick_add::help_text;
use super::router;
use super::toast;
use super::App;
use super::Screen;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Notification;
use crate::domain::models::PermissionsName;
use crate::domain::models::RecognizerName;
use crate::domain::models::TransactionFilter;
use crate::domain::models::TransactionQuery;
use crate::domain::services::HydrationGate;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn arg_filter() -> Arg {
    return Arg::new("type")
        .short('t')
        .long("type")
        .num_args(1)
        .help("Only show transactions of this type.")
        .default_value("all")
        .value_parser(PossibleValuesParser::new(TransactionFilter::VARIANTS));
}

fn arg_email() -> Arg {
    return Arg::new("email")
        .short('e')
        .long("email")
        .num_args(1)
        .help("Account email. Prompted for when omitted.");
}

fn arg_password() -> Arg {
    return Arg::new("password")
        .short('p')
        .long("password")
        .env("SAVI_PASSWORD")
        .hide_env_values(true)
        .num_args(1)
        .help("Account password. Prompted for when omitted.");
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Sign in and store the access token.")
        .arg(arg_email())
        .arg(arg_password());
}

fn subcommand_signup() -> Command {
    return Command::new("signup")
        .about("Create an account. A verification code is sent to the email.")
        .arg(
            Arg::new("full-name")
                .short('n')
                .long("full-name")
                .num_args(1)
                .help("Full name. Prompted for when omitted."),
        )
        .arg(arg_email())
        .arg(arg_password());
}

fn subcommand_verify() -> Command {
    return Command::new("verify")
        .about("Verify a new account with the 6 digit code sent by email.")
        .arg(
            Arg::new("code")
                .long("code")
                .num_args(1)
                .help("Verification code. Prompted for when omitted."),
        );
}

fn subcommand_transactions() -> Command {
    return Command::new("transactions")
        .about("List transactions.")
        .arg(arg_filter())
        .arg(
            Arg::new("from")
                .long("from")
                .num_args(1)
                .help("First day to include, as YYYY-MM-DD."),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .num_args(1)
                .help("Last day to include, as YYYY-MM-DD."),
        );
}

fn subcommand_schedule() -> Command {
    return Command::new("schedule")
        .about("Show one day of transactions with its totals.")
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .num_args(1)
                .help("Day to show, as YYYY-MM-DD. Defaults to today."),
        )
        .arg(arg_filter());
}

fn subcommand_add() -> Command {
    return Command::new("add")
        .about("Create a transaction from speech. Pass --text to skip the microphone.")
        .arg(
            Arg::new("text")
                .long("text")
                .num_args(1)
                .help("Transaction described in plain words, e.g. \"mua cà phê 20000\"."),
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("QUICK ADD {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("savi")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_add())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("home").about("Show the balance and today's transactions."))
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Forget the stored session."))
        .subcommand(subcommand_schedule())
        .subcommand(subcommand_signup())
        .subcommand(subcommand_transactions())
        .subcommand(subcommand_verify())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SAVI_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("SAVI_API_URL")
                .num_args(1)
                .help(format!("Base URL of the Savi API. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Language.to_string())
                .short('l')
                .long(ConfigKey::Language.to_string())
                .env("SAVI_LANGUAGE")
                .num_args(1)
                .help(format!("Language tag handed to the speech recognizer. [default: {}]", Config::default(ConfigKey::Language)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Permissions.to_string())
                .long(ConfigKey::Permissions.to_string())
                .env("SAVI_PERMISSIONS")
                .num_args(1)
                .help(format!("How microphone access is granted. [default: {}]", Config::default(ConfigKey::Permissions)))
                .value_parser(PossibleValuesParser::new(PermissionsName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Recognizer.to_string())
                .short('r')
                .long(ConfigKey::Recognizer.to_string())
                .env("SAVI_RECOGNIZER")
                .num_args(1)
                .help(format!("The speech recognizer used by quick add. [default: {}]", Config::default(ConfigKey::Recognizer)))
                .value_parser(PossibleValuesParser::new(RecognizerName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RecognizerCommand.to_string())
                .long(ConfigKey::RecognizerCommand.to_string())
                .env("SAVI_RECOGNIZER_COMMAND")
                .num_args(1)
                .help("Shell command for the command recognizer. It must print one hypothesis per line to stdout.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StateDir.to_string())
                .long(ConfigKey::StateDir.to_string())
                .env("SAVI_STATE_DIR")
                .num_args(1)
                .help(format!("Directory holding the stored session and permission decisions. [default: {}]", Config::default(ConfigKey::StateDir)))
                .global(true),
        );
}

fn get_string(matches: &ArgMatches, id: &str) -> Option<String> {
    return matches.get_one::<String>(id).map(|e| return e.to_string());
}

fn get_filter(matches: &ArgMatches) -> Result<TransactionFilter> {
    let text = get_string(matches, "type").unwrap_or_else(|| return "all".to_string());
    return TransactionFilter::parse(&text)
        .ok_or_else(|| return anyhow!(format!("Unknown transaction type '{text}'")));
}

/// Turns a screen subcommand into the screen it asks for.
pub fn screen_from_matches(name: &str, matches: &ArgMatches) -> Result<Screen> {
    match name {
        "login" => {
            return Ok(Screen::Login {
                email: get_string(matches, "email"),
                password: get_string(matches, "password"),
            });
        }
        "signup" => {
            return Ok(Screen::Signup {
                full_name: get_string(matches, "full-name"),
                email: get_string(matches, "email"),
                password: get_string(matches, "password"),
            });
        }
        "verify" => {
            return Ok(Screen::Verify {
                code: get_string(matches, "code"),
            });
        }
        "home" => return Ok(Screen::Home),
        "transactions" => {
            return Ok(Screen::Transactions {
                query: TransactionQuery {
                    filter: get_filter(matches)?,
                    start_date: get_string(matches, "from"),
                    end_date: get_string(matches, "to"),
                    ..TransactionQuery::default()
                },
            });
        }
        "schedule" => {
            return Ok(Screen::Schedule {
                date: get_string(matches, "date"),
                filter: get_filter(matches)?,
            });
        }
        "add" => {
            return Ok(Screen::Add {
                text: get_string(matches, "text"),
            });
        }
        _ => bail!(format!("No screen implemented for {name}")),
    }
}

fn logout(app: &App) {
    app.session.logout();
    toast::show(&Notification::success("Logged out"));
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    let screen = match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(());
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(());
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(());
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(());
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(());
            }
        },
        Some(("logout", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let app = App::start().await?;
            logout(&app);
            app.shutdown().await;
            return Ok(());
        }
        Some((name, subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            Some(screen_from_matches(name, subcmd_matches)?)
        }
        None => {
            Config::load(build(), vec![&matches]).await?;
            None
        }
    };

    let app = App::start().await?;
    let screen = match screen {
        Some(screen) => screen,
        None => {
            let route = HydrationGate::entry_route(&app.session.current())
                .ok_or_else(|| return anyhow!("The stored session has not been loaded yet"))?;
            Screen::from(route)
        }
    };

    let res = router::open(&app, screen).await;
    app.shutdown().await;

    return res;
}

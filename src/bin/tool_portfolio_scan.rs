//! Developer tool: discover and price one or more wallets from the command line
//!
//! Usage:
//!   tool_portfolio_scan --network tron --address TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t
//!   tool_portfolio_scan --network ethereum --address 0x... --address 0x... --json
//!
//! Logging flags (`--debug-<tag>`, `--verbose`, `--quiet`) are handled by the
//! logger and may be mixed with the options below.

use anyhow::{bail, Context, Result};
use chainfolio::config::{get_config_clone, load_config_from_path, CONFIG_FILE_PATH};
use chainfolio::logger;
use chainfolio::portfolio::PortfolioDisplay;
use chainfolio::{Network, PortfolioService};
use clap::{Arg, ArgAction, Command};

fn is_logger_flag(arg: &str) -> bool {
    arg == "--verbose" || arg == "--quiet" || arg.starts_with("--debug-") || arg.starts_with("--verbose-")
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().filter(|a| !is_logger_flag(a)).collect();
    let matches = Command::new("Portfolio Scan")
        .about("Discovers token holdings of a wallet and values them in USD")
        .arg(
            Arg::new("network")
                .long("network")
                .short('n')
                .value_name("NETWORK")
                .help("tron, ethereum or celo")
                .required(true),
        )
        .arg(
            Arg::new("address")
                .long("address")
                .short('a')
                .value_name("ADDRESS")
                .help("Wallet address; repeat for a combined portfolio")
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Path to the TOML config file")
                .default_value(CONFIG_FILE_PATH),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the snapshot as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("One line per token")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
        .get_matches_from(args);

    let network: Network = matches
        .get_one::<String>("network")
        .context("missing --network")?
        .parse()
        .map_err(anyhow::Error::msg)?;
    let addresses: Vec<String> = matches
        .get_many::<String>("address")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if addresses.is_empty() {
        bail!("at least one --address is required");
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(CONFIG_FILE_PATH);
    load_config_from_path(config_path)
        .with_context(|| format!("loading config from {}", config_path))?;

    let config = get_config_clone();
    logger::apply_settings(&config.logging);
    let service = PortfolioService::from_config(&config).context("building portfolio service")?;

    let wallets: Vec<(String, Network)> = addresses.into_iter().map(|a| (a, network)).collect();
    let snapshot = if wallets.len() == 1 {
        service.discover_and_price(&wallets[0].0, network).await?
    } else {
        service.discover_and_price_many(&wallets).await?
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let mut display = PortfolioDisplay::new().with_colors(!matches.get_flag("no-color"));
    if matches.get_flag("compact") {
        display = display.compact();
    }
    display.print(&snapshot);

    for (address, network) in &wallets {
        println!("Explorer: {}", network.explorer_address_url(address));
    }
    Ok(())
}

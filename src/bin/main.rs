//! Taisen CLI - read tournaments from chain, build tournament transactions
//!
//! Reads go straight to a Sui fullnode:
//!   taisen tournaments [--gm <addr>] [--player <addr>] [--cards]
//!   taisen tournament <id> [--matches]
//!   taisen bracket <id>
//!   taisen admin-cap <addr>
//!   taisen games
//!
//! Writes need a wallet, so the CLI only builds them and prints the
//! transaction JSON for a wallet to sign:
//!   taisen tx create '<params json>'
//!   taisen tx register <tournament> <username> <entry_fee_mist>
//!   taisen tx start <tournament>
//!   taisen tx report <tournament> <match_id> <winner>
//!
//! Configuration comes from TAISEN_* variables (see `TaisenConfig::from_env`),
//! overridden by --network / --package / --rpc.
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use tracing::debug;

use taisen::logging::init_logging;
use taisen::model::Bracket;
use taisen::tx::{build_create_tournament_tx, build_register_tx, build_report_match_result_tx, build_start_tournament_tx};
use taisen::{CreateTournamentParams, JsonRpcClient, TaisenConfig, Transaction, TournamentService};

#[tokio::main]
async fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("taisen {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("tournaments") | Some("ls") => cmd_tournaments(&opts).await,
        Some("tournament") | Some("get") => cmd_tournament(&opts).await,
        Some("bracket") => cmd_bracket(&opts).await,
        Some("admin-cap") => cmd_admin_cap(&opts).await,
        Some("games") => cmd_games(&opts),
        Some("tx") => cmd_tx(&opts),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let formatted = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    formatted.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    args: Vec<String>,
    // Chain options
    network: Option<String>,
    package: Option<String>,
    rpc_url: Option<String>,
    // Filters
    gm: Option<String>,
    player: Option<String>,
    cards: bool,
    matches: bool,
    // Transaction options
    sender: Option<String>,
    // Output options
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let mut value = || {
                i += 1;
                args.get(i).cloned()
            };
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--cards" => opts.cards = true,
                "--matches" => opts.matches = true,
                "--network" | "-n" => opts.network = value(),
                "--package" | "-p" => opts.package = value(),
                "--rpc" => opts.rpc_url = value(),
                "--gm" => opts.gm = value(),
                "--player" => opts.player = value(),
                "--sender" | "-s" => opts.sender = value(),
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        opts.args = positional;
        opts
    }

    fn arg(&self, index: usize, name: &str) -> anyhow::Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("missing <{}>", name))
    }

    fn config(&self) -> anyhow::Result<TaisenConfig> {
        let mut config = TaisenConfig::from_env()?;
        if let Some(network) = &self.network {
            config.network = network.parse()?;
        }
        if let Some(package) = &self.package {
            config.contract.package_id = package.clone();
        }
        if let Some(url) = &self.rpc_url {
            config.rpc_url = Some(url.clone());
        }
        debug!(network = %config.network.as_str(), rpc = %config.rpc_url(), "configured");
        Ok(config)
    }

    fn service(&self) -> anyhow::Result<TournamentService<JsonRpcClient>> {
        let config = self.config()?;
        let rpc = JsonRpcClient::new(config.rpc_url());
        Ok(TournamentService::new(rpc, config))
    }
}

fn print_usage() {
    println!(
        r#"taisen - Sui tournament client

USAGE:
    taisen <command> [args] [options]

COMMANDS:
    tournaments                     List tournaments (newest activity first)
    tournament <id>                 Show one tournament
    bracket <id>                    Show a tournament's bracket
    admin-cap <addr>                Find the platform admin cap owned by addr
    games                           List known games
    tx create <params-json>         Build create_tournament
    tx register <id> <name> <fee>   Build register (fee in MIST)
    tx start <id>                   Build start_tournament
    tx report <id> <match> <winner> Build report_match_result

LISTING OPTIONS:
    --gm <addr>             Only tournaments run by addr
    --player <addr>         Only tournaments addr registered for
    --cards                 Display form (formatted pools, countdown)
    --matches               Include matches (tournament)

CHAIN OPTIONS:
    --network, -n <net>     devnet|testnet|mainnet|localnet (env: TAISEN_NETWORK)
    --package, -p <id>      Tournament package (env: TAISEN_PACKAGE_ID)
    --rpc <url>             Fullnode URL override (env: TAISEN_RPC_URL)
    --sender, -s <addr>     Sender recorded in built transactions

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

EXAMPLES:
    taisen tournaments --network testnet --package 0x...
    taisen bracket 0x... --pretty
    taisen tx register 0x... alice 1000000000 --sender 0x...
"#
    );
}

async fn cmd_tournaments(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let service = opts.service()?;
    let listing = match (&opts.gm, &opts.player) {
        (Some(gm), _) => service.fetch_game_master_tournaments(gm).await,
        (None, Some(player)) => service.fetch_registered_tournaments(player).await,
        (None, None) => service.fetch_all_tournaments().await,
    };
    if let Some(error) = service.error() {
        bail!(error);
    }

    if opts.cards {
        let cards = service.display_tournaments();
        let keep: Vec<_> = cards.into_iter().filter(|c| listing.iter().any(|t| t.id == c.id)).collect();
        return Ok(serde_json::to_value(keep)?);
    }
    Ok(json!({ "count": listing.len(), "tournaments": listing }))
}

async fn cmd_tournament(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let id = opts.arg(0, "id")?;
    let service = opts.service()?;
    let mut tournament = service
        .fetch_tournament(id)
        .await?
        .ok_or_else(|| anyhow!("tournament {} not found", id))?;
    if opts.matches {
        service.fetch_matches(&mut tournament).await?;
    }
    Ok(serde_json::to_value(tournament)?)
}

async fn cmd_bracket(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let id = opts.arg(0, "id")?;
    let service = opts.service()?;
    let bracket: Bracket = service
        .fetch_bracket(id)
        .await?
        .ok_or_else(|| anyhow!("tournament {} not found", id))?;
    Ok(serde_json::to_value(bracket)?)
}

async fn cmd_admin_cap(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let owner = opts.arg(0, "addr")?;
    let cap = opts.service()?.find_admin_cap(owner).await?;
    Ok(json!({ "owner": owner, "admin_cap": cap }))
}

fn cmd_games(_opts: &ParsedArgs) -> anyhow::Result<Value> {
    let games = taisen::model::GameCatalog::builtin();
    Ok(serde_json::to_value(games.all())?)
}

fn cmd_tx(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let config = opts.config()?;
    let package = config.require_package()?;
    let kind = opts.arg(0, "create|register|start|report")?;

    let mut tx: Transaction = match kind {
        "create" => {
            let params: CreateTournamentParams =
                serde_json::from_str(opts.arg(1, "params-json")?).context("parsing tournament params")?;
            build_create_tournament_tx(&params, &config.contract, config.creation_fee)?
        }
        "register" => {
            let fee: u64 = opts.arg(3, "fee")?.parse().context("entry fee must be MIST")?;
            build_register_tx(package, opts.arg(1, "id")?, opts.arg(2, "name")?, fee)?
        }
        "start" => build_start_tournament_tx(package, opts.arg(1, "id")?)?,
        "report" => {
            let match_id: u64 = opts.arg(2, "match")?.parse().context("match id must be a number")?;
            build_report_match_result_tx(package, opts.arg(1, "id")?, match_id, opts.arg(3, "winner")?)?
        }
        other => bail!("Unknown transaction: {}", other),
    };

    if let Some(sender) = &opts.sender {
        tx.set_sender(sender)?;
    }
    Ok(tx.to_json()?)
}

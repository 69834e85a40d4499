use anyhow::Result;
use clap::Parser;
use helius::commands::{self, FeeQuery, HoldersQuery, config::Config};
use helius::{Network, PriorityLevel, RequestContext};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// helius - command-line client for the Helius Solana API
///
/// Results are printed as JSON. The API key is read from --api-key or the
/// HELIUS_API_KEY environment variable.
///
/// Examples:
///   helius asset <MINT>            # Look up one asset
///   helius holders <MINT> --all    # Fetch every holder of a token
#[derive(Parser, Debug)]
#[command(author, about, version = env!("HELIUS_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Helius API key
    #[arg(long, env = "HELIUS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Network selecting the default endpoints (mainnet or devnet)
    #[arg(long, env = "HELIUS_NETWORK", default_value = "mainnet", global = true)]
    network: Network,

    /// API base URL (overrides the network default)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// RPC base URL (overrides the network default)
    #[arg(long = "rpc-url", value_name = "URL", global = true)]
    rpc_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    timeout: Option<u64>,

    /// Retries after the first attempt for transient failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch one asset by mint address
    Asset(AssetArgs),

    /// List assets held by a wallet
    Assets(AssetsArgs),

    /// List holders of a token
    Holders(HoldersArgs),

    /// Estimate a priority fee
    Fee(FeeArgs),

    /// Manage webhooks
    #[command(subcommand)]
    Webhooks(WebhookCommands),

    /// Print the RPC connection URL
    RpcUrl,

    /// Verify the signature of a webhook payload and print its events
    VerifySignature(VerifySignatureArgs),
}

#[derive(clap::Args, Debug)]
struct AssetArgs {
    #[arg(value_name = "ID")]
    id: String,
}

#[derive(clap::Args, Debug)]
struct AssetsArgs {
    #[arg(value_name = "OWNER")]
    owner: String,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    limit: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct HoldersArgs {
    #[arg(value_name = "MINT")]
    mint: String,

    #[arg(long, conflicts_with = "all")]
    limit: Option<u32>,

    #[arg(long, conflicts_with = "all")]
    cursor: Option<String>,

    /// Follow cursors until every holder is fetched
    #[arg(long)]
    all: bool,

    /// Print concentration stats for the top N holders
    #[arg(long, value_name = "N")]
    top: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct FeeArgs {
    /// Accounts the transaction will touch
    #[arg(value_name = "ACCOUNT", required_unless_present = "transaction")]
    accounts: Vec<String>,

    /// Base64 serialized transaction
    #[arg(long, conflicts_with = "accounts")]
    transaction: Option<String>,

    /// Priority level (min, low, medium, high, very-high, unsafe-max)
    #[arg(long)]
    level: Option<PriorityLevel>,

    /// Include estimates for every priority level
    #[arg(long)]
    all_levels: bool,
}

#[derive(clap::Subcommand, Debug)]
enum WebhookCommands {
    /// List all webhooks
    List,
    /// Show one webhook
    Get { id: String },
    /// Delete a webhook
    Delete { id: String },
}

#[derive(clap::Args, Debug)]
struct VerifySignatureArgs {
    /// File holding the raw request body
    #[arg(value_name = "FILE")]
    body: PathBuf,

    /// Webhook secret
    #[arg(long, env = "HELIUS_WEBHOOK_SECRET", hide_env_values = true)]
    secret: String,

    /// Hex signature from the X-Helius-Signature header
    #[arg(long)]
    signature: String,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            network: self.network,
            api_url: self.api_url.clone(),
            rpc_url: self.rpc_url.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            max_retries: self.max_retries,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let ctx = RequestContext::new().with_cancellation(token);

    let mut out = std::io::stdout().lock();
    let client = cli.config().client();

    match cli.command {
        Commands::VerifySignature(args) => {
            commands::verify_signature(&args.body, &args.signature, &args.secret, &mut out)?
        }
        Commands::Asset(args) => commands::asset(&client?, &ctx, &args.id, &mut out).await?,
        Commands::Assets(args) => {
            commands::assets(&client?, &ctx, &args.owner, args.page, args.limit, &mut out).await?
        }
        Commands::Holders(args) => {
            let query = HoldersQuery {
                mint: args.mint,
                limit: args.limit,
                cursor: args.cursor,
                all: args.all,
                top: args.top,
            };
            commands::holders(&client?, &ctx, &query, &mut out).await?
        }
        Commands::Fee(args) => {
            let query = FeeQuery {
                accounts: args.accounts,
                transaction: args.transaction,
                level: args.level,
                all_levels: args.all_levels,
            };
            commands::fee(&client?, &ctx, &query, &mut out).await?
        }
        Commands::Webhooks(WebhookCommands::List) => {
            commands::list_webhooks(&client?, &ctx, &mut out).await?
        }
        Commands::Webhooks(WebhookCommands::Get { id }) => {
            commands::get_webhook(&client?, &ctx, &id, &mut out).await?
        }
        Commands::Webhooks(WebhookCommands::Delete { id }) => {
            commands::delete_webhook(&client?, &ctx, &id, &mut out).await?
        }
        Commands::RpcUrl => writeln!(out, "{}", client?.rpc_url())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_asset_parsing() {
        let cli = Cli::try_parse_from(["helius", "asset", "mint1", "--api-key", "k"]).unwrap();
        match cli.command {
            Commands::Asset(args) => assert_eq!(args.id, "mint1"),
            _ => panic!("Expected Asset command"),
        }
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.network, Network::Mainnet);
    }

    #[test]
    fn test_cli_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "helius",
            "--network",
            "devnet",
            "--api-url",
            "http://localhost:1234",
            "--timeout",
            "3",
            "--max-retries",
            "0",
            "webhooks",
            "list",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Webhooks(WebhookCommands::List)));
        let config = cli.config();
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.max_retries, Some(0));
    }

    #[test]
    fn test_cli_fee_parsing() {
        let cli =
            Cli::try_parse_from(["helius", "fee", "acc1", "acc2", "--level", "very-high"]).unwrap();
        match cli.command {
            Commands::Fee(args) => {
                assert_eq!(args.accounts, vec!["acc1", "acc2"]);
                assert_eq!(args.level, Some(PriorityLevel::VeryHigh));
                assert!(args.transaction.is_none());
            }
            _ => panic!("Expected Fee command"),
        }
    }

    #[test]
    fn test_cli_fee_requires_input() {
        assert!(Cli::try_parse_from(["helius", "fee"]).is_err());
        assert!(Cli::try_parse_from(["helius", "fee", "--transaction", "AQAB"]).is_ok());
        assert!(Cli::try_parse_from(["helius", "fee", "acc1", "--transaction", "AQAB"]).is_err());
    }

    #[test]
    fn test_cli_holders_all_conflicts_with_cursor() {
        assert!(Cli::try_parse_from(["helius", "holders", "m", "--all", "--top", "10"]).is_ok());
        assert!(Cli::try_parse_from(["helius", "holders", "m", "--all", "--cursor", "c"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_network() {
        assert!(Cli::try_parse_from(["helius", "--network", "testnet", "rpc-url"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["helius", "mint1"]);
        assert!(result.is_err());
    }
}

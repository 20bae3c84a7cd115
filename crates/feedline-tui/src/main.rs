//! Feedline TUI entry point.

use clap::Parser;
use feedline_app::Runtime;
use feedline_client::{
    ChatConfig, GraphqlClient, PostsApi, RestClient, SystemEnv, chat::DEFAULT_CHAT_URL,
    http::DEFAULT_API_BASE_URL,
};
use feedline_core::{QueryHistory, ReconnectPolicy};
use feedline_tui::TerminalDriver;
use tracing_subscriber::EnvFilter;

/// Feedline terminal client
#[derive(Parser, Debug)]
#[command(name = "feedline-tui")]
#[command(about = "Terminal client for the Feedline blog and chat demo")]
#[command(version)]
struct Args {
    /// Posts API base URL
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Chat WebSocket URL (an echo endpoint)
    #[arg(long, default_value = DEFAULT_CHAT_URL)]
    chat_url: String,

    /// Display name for chat messages
    #[arg(short, long, default_value = "Guest")]
    username: String,

    /// Reconnect chat with bounded retries instead of staying down
    #[arg(long)]
    durable_chat: bool,

    /// Page size for the posts feed
    #[arg(long, default_value_t = 50)]
    limit: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let env = SystemEnv::new();
    let api = PostsApi::new(RestClient::new(args.api_url));
    let graphql = GraphqlClient::new(env, api.clone(), QueryHistory::new());

    let policy =
        if args.durable_chat { ReconnectPolicy::bounded() } else { ReconnectPolicy::FireOnce };
    let chat_config = ChatConfig::with_policy(args.chat_url, policy);

    let driver = TerminalDriver::new(api, graphql, chat_config)?;
    let runtime = Runtime::new(driver, env, args.username, args.limit);

    Ok(runtime.run().await?)
}

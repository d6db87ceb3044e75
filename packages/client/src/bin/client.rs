//! Interactive Tumult chat client.
//!
//! Connects to a Tumult server, offers the given nickname when asked and
//! prints everything the room says. Lines typed at the prompt are sent as
//! messages; `/nick <name>` renames, `/quit` (or Ctrl+C / Ctrl+D) leaves.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tumult-client -- --nickname alice
//! cargo run --bin tumult-client -- -H 127.0.0.1 -p 65535
//! ```

use clap::Parser;

use tumult_client::session::run_client_session;
use tumult_shared::{
    logger::setup_logger,
    protocol::{DEFAULT_HOST, DEFAULT_PORT},
};

#[derive(Parser, Debug)]
#[command(name = "tumult-client")]
#[command(about = "Tumult chat client", long_about = None)]
struct Args {
    /// Server IPv4 address
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Nickname to join with; the server assigns User<n> when omitted
    #[arg(short, long)]
    nickname: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.host, args.port, args.nickname).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

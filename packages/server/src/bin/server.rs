//! Tumult chat server.
//!
//! Accepts client connections, replays the message history to each newcomer
//! and broadcasts messages and join/leave events to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tumult-server
//! cargo run --bin tumult-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin tumult-server -- --broadcast-policy exclude-sender
//! ```

use clap::Parser;

use tumult_server::{BroadcastPolicy, ServerConfig, TumultServer, domain::PUSHER_QUEUE_CAPACITY};
use tumult_shared::{
    logger::setup_logger,
    protocol::{DEFAULT_HOST, DEFAULT_PORT},
};

#[derive(Parser, Debug)]
#[command(name = "tumult-server")]
#[command(about = "Tumult chat server with message history and presence broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Whether chat messages are echoed back to their sender
    #[arg(long, value_enum, default_value_t = BroadcastPolicy::IncludeSender)]
    broadcast_policy: BroadcastPolicy,

    /// Frames a client may have pending before it is dropped as too slow
    #[arg(
        long,
        default_value_t = PUSHER_QUEUE_CAPACITY,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    outbound_queue_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig::new(args.host, args.port)
        .with_broadcast_policy(args.broadcast_policy)
        .with_outbound_queue_capacity(args.outbound_queue_capacity);

    let server = match TumultServer::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

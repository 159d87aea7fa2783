//! ChatWizard Control - CLI client for the ChatWizard daemon.
//!
//! Sends message events to the daemon the way a platform adapter would,
//! and prints the formatted reply. Useful for manual testing.

mod rpc_client;

use anyhow::Result;
use chatwiz_common::ipc::{Event, Reply};
use clap::{Parser, Subcommand};
use rpc_client::RpcClient;

#[derive(Parser)]
#[command(name = "chatwizctl")]
#[command(about = "ChatWizard - send events to the scoring daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Daemon socket path (overrides $CHATWIZD_SOCKET)
    #[arg(long)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message event and print the bot's reply
    Send {
        /// Author user id
        #[arg(long, default_value = "local")]
        author_id: String,

        /// Author display name
        #[arg(long, default_value = "local")]
        author_name: String,

        /// Message text (commands like !help, !me, !reset work too)
        text: String,
    },

    /// Health check
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = RpcClient::connect(cli.socket.as_deref()).await?;

    match cli.command {
        Commands::Send {
            author_id,
            author_name,
            text,
        } => {
            let reply = client
                .call(Event::Message {
                    author_id,
                    author_name,
                    content: text,
                })
                .await?;
            match reply {
                Reply::Text(text) => println!("{}", text),
                Reply::Pong => println!("pong"),
            }
        }
        Commands::Ping => {
            client.call(Event::Ping).await?;
            println!("pong");
        }
    }

    Ok(())
}

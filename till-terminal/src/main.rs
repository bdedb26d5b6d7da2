//! till-terminal - point-of-sale scanning terminal
//!
//! Reads barcodes and `:` commands from stdin, one per line, and keeps a
//! cart until it is submitted. Receipts and labels go to the configured
//! network printer, or to stdout when there is none.

mod command;
mod config;
mod render;
mod session;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use config::Config;
use session::{Output, Session, Step};
use till_client::StoreApi;
use till_printer::{NetworkPrinter, Printer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads the environment
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    // RUST_LOG wins over --log / TILL_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let client_config = config.client_config();
    let api = StoreApi::new(client_config.build_http_client()?);

    let output = match config.printer_addr.as_deref().filter(|a| !a.trim().is_empty()) {
        Some(addr) => {
            let printer = NetworkPrinter::from_addr(addr)?;
            if !printer.is_online().await {
                tracing::warn!(addr = printer.addr(), "Printer not reachable yet");
            }
            Output::Printer(printer)
        }
        None => Output::Screen,
    };

    tracing::info!(backend = %client_config.base_url, "till-terminal ready");
    let mut session = Session::new(
        api,
        config.tax_policy()?,
        config.orphan_policy(),
        output,
        config.printer_width,
    );

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout.write_all(b"Scan a barcode or type :help\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let step = match command::parse(&line) {
            Ok(cmd) => session.handle(cmd).await,
            Err(e) => Err(e.into()),
        };
        let reply = match step {
            Ok(Step::Reply(text)) => text,
            Ok(Step::Quit) => break,
            Err(e) => format!("! {}", e.user_message()),
        };
        if !reply.is_empty() {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    if !session.cart().is_empty() {
        tracing::warn!(lines = session.cart().len(), "Exiting with an unsubmitted cart");
    }
    Ok(())
}

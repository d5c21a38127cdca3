//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! # Telnet Client Example
//!
//! Connects to a Telnet server, prints everything it sends, and forwards what you type.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example telnet_client
//! cargo run --example telnet_client -- localhost 4000
//! ```
//!
//! Lines typed on stdin are forwarded key by key with Enter sent as CR LF.
//! Press Ctrl+C to disconnect.

use std::io::{self, Write};
use termlink_client::{ClientConfig, TelnetConnection};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

/// Parse command line arguments
fn parse_args() -> ClientConfig {
    let args: Vec<String> = std::env::args().collect();

    let host = args.get(1).map_or("telehack.com", String::as_str);
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(23);

    ClientConfig::new(host, port)
        .with_terminal_size(80, 24)
        .with_status_notices(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = parse_args();

    // Keystrokes from stdin; the terminal hands us whole lines, so LF becomes Enter.
    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<u8>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for key in line.bytes().chain(std::iter::once(b'\r')) {
                if key_tx.send(key).is_err() {
                    return;
                }
            }
        }
    });

    let screen = |text: &str| {
        print!("{}", text);
        io::stdout().flush().ok();
    };
    let mut connection = TelnetConnection::connect(config, screen).await?;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut interrupted = false;
    while !connection.is_disconnected() {
        tokio::select! {
            result = connection.process(&mut key_rx) => result?,
            _ = &mut interrupt => interrupted = true,
        }
        if interrupted {
            info!("Received Ctrl+C, disconnecting");
            connection.close();
        }
    }

    println!();
    Ok(())
}

// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Security Remote console front-end.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use security_remote::config::Config;
use security_remote::connection::{ChannelSink, Peer, Session, SystemConnector};
use security_remote::events::EventProcessor;
use security_remote::protocol::Command;
use security_remote::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("security_remote=info".parse()?),
        )
        .init();

    info!("Starting Security Remote v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded from {}", Config::default_path().display());

    let state = AppState::new(config.display.max_notifications);
    let peer = config.peer.to_peer()?;

    // Session updates are applied on this task, never on the receive loop
    let (sink, mut update_rx) = ChannelSink::new();
    let mut session = Session::new(
        Box::new(SystemConnector),
        Arc::new(sink),
        config.session.to_session_config(),
    );

    let processor = EventProcessor::new(state.clone());
    tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            processor.process(update);
        }
    });

    match &peer {
        Some(peer) => connect(&mut session, peer.clone()).await,
        None => warn!(
            "No controller configured; set [peer] address in {}",
            Config::default_path().display()
        ),
    }

    info!("Ready. Commands: status, arm, disarm, lock, unlock, stop, password <pin>, connect, disconnect, show, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                match input.to_lowercase().as_str() {
                    "" => {}
                    "quit" | "exit" => break,
                    "show" => show(&state),
                    "disconnect" => session.disconnect().await,
                    "connect" => match &peer {
                        Some(peer) => connect(&mut session, peer.clone()).await,
                        None => warn!("No controller configured"),
                    },
                    _ => match Command::parse(input) {
                        Some(command) => {
                            if let Err(e) = session.send(&command).await {
                                error!("Command not sent: {}", e);
                            }
                        }
                        None if input.to_lowercase().starts_with("password") => {
                            warn!("Password must not be empty");
                        }
                        None => warn!("Unknown command: {}", input),
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.disconnect().await;
    info!("Security Remote stopped");
    Ok(())
}

async fn connect(session: &mut Session, peer: Peer) {
    let name = peer.name.clone();
    if let Err(e) = session.connect(peer).await {
        error!("Connection to {} failed: {}", name, e);
    }
}

fn show(state: &AppState) {
    let unknown = || "-".to_string();
    println!(
        "Connection: {} {}",
        state.get_status().as_str(),
        state.get_device_name().unwrap_or_default()
    );
    println!("{}", state.get_alarm_status().unwrap_or_else(unknown));
    println!("{}", state.get_door_status().unwrap_or_else(unknown));
    println!("{}", state.get_alert_status().unwrap_or_else(unknown));
    if let Some(e) = state.get_last_error() {
        println!("Last error: {}", e);
    }
    for n in state.get_notifications() {
        println!("{}  {}", n.received_at.format("%H:%M:%S"), n.text);
    }
}

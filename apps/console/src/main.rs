use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{InventoryClient, InventoryGateway, MissingInventoryGateway};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use shared::{domain::ObjUuid, protocol::ContextMenuAction};
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::{
    events::UiEvent,
    orchestration::{load_and_edit, load_context_menu, run_context_action, save_active, wake},
    reducer::ConsoleState,
};
use ui::TreeCursor;

#[derive(Parser, Debug)]
#[command(name = "console", about = "Inventory console for managed hosts")]
struct Cli {
    /// Base URL of the inventory service.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a host and print its attribute form.
    Edit {
        objuuid: String,
        /// Print the loaded record as JSON instead of the form.
        #[arg(long)]
        json: bool,
    },
    /// Ask the backend to wake a host.
    Wake {
        objuuid: String,
        /// Print the wake outcome instead of discarding it.
        #[arg(long)]
        report: bool,
    },
    /// Print a host's context menu, optionally running one of its entries.
    Menu {
        objuuid: String,
        /// Menu entry key to run, e.g. `edit` or `wake`.
        #[arg(long)]
        run: Option<String>,
    },
    /// Load a host, change one attribute, and save it back.
    Set {
        objuuid: String,
        key: String,
        value: String,
    },
}

struct Session {
    state: ConsoleState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    wait: Duration,
}

impl Session {
    /// Applies events in arrival order until `done` accepts one of them.
    fn pump_until(&mut self, mut done: impl FnMut(&UiEvent) -> bool) -> Result<()> {
        let deadline = Instant::now() + self.wait;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = match self.ui_rx.recv_timeout(remaining) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => bail!("no response from the backend worker"),
                Err(RecvTimeoutError::Disconnected) => bail!("backend worker stopped"),
            };
            let finished = done(&event);
            self.state.apply(event);
            if finished {
                return Ok(());
            }
        }
    }

    fn load(&mut self, objuuid: &str) -> Result<()> {
        if !load_and_edit(&mut self.state, &self.cmd_tx, ObjUuid::from(objuuid)) {
            bail!("{}", self.state.status);
        }
        self.pump_until(|event| {
            matches!(
                event,
                UiEvent::ObjectLoaded { .. } | UiEvent::ObjectLoadFailed { .. }
            )
        })?;
        if self.state.shell.is_blank() {
            bail!("{}", self.state.status);
        }
        tracing::debug!(selected = ?self.state.tree.selected(), "object revealed in tree");
        Ok(())
    }

    /// Runs one context-menu entry and waits for the load or wake it starts.
    fn run_menu_action(&mut self, action: &ContextMenuAction) -> Result<()> {
        if !run_context_action(&mut self.state, &self.cmd_tx, action) {
            bail!("{}", self.state.status);
        }
        let mut load_failed = false;
        self.pump_until(|event| {
            load_failed = matches!(event, UiEvent::ObjectLoadFailed { .. });
            matches!(
                event,
                UiEvent::ObjectLoaded { .. }
                    | UiEvent::ObjectLoadFailed { .. }
                    | UiEvent::WakeCompleted { .. }
            )
        })?;
        if load_failed {
            bail!("{}", self.state.status);
        }
        if let Some((objuuid, Err(err))) = self.state.last_wake() {
            bail!("wake for {objuuid} failed: {}", err.message());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.server_url {
        settings.server_url = Some(url);
    }
    if let Some(secs) = cli.timeout_secs {
        settings.set_request_timeout_secs(secs);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let gateway: Arc<dyn InventoryGateway> = match &settings.server_url {
        Some(url) => Arc::new(
            InventoryClient::with_timeout(url, settings.request_timeout())
                .with_context(|| format!("cannot use server url '{url}'"))?,
        ),
        None => {
            tracing::warn!("no server url configured; set --server-url or APP__SERVER_URL");
            Arc::new(MissingInventoryGateway)
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(settings.command_queue_depth);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(settings.event_queue_depth);
    let worker = backend_bridge::runtime::launch(cmd_rx, ui_tx, gateway);

    let mut session = Session {
        state: ConsoleState::new(TreeCursor::default()),
        cmd_tx,
        ui_rx,
        wait: settings.request_timeout() + Duration::from_secs(5),
    };

    let result = run(&mut session, cli.command);

    drop(session);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    result
}

fn run(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Edit { objuuid, json } => {
            session.load(&objuuid)?;
            if json {
                let record = session.state.active().context("no active object")?;
                println!("{}", serde_json::to_string_pretty(record)?);
            } else {
                print!("{}", session.state.shell);
            }
        }
        Command::Wake { objuuid, report } => {
            if !wake(&mut session.state, &session.cmd_tx, ObjUuid::from(objuuid.as_str())) {
                bail!("{}", session.state.status);
            }
            session.pump_until(|event| matches!(event, UiEvent::WakeCompleted { .. }))?;
            if report {
                match session.state.last_wake() {
                    Some((objuuid, Ok(()))) => println!("wake sent to {objuuid}"),
                    Some((objuuid, Err(err))) => println!("wake for {objuuid} failed: {}", err.message()),
                    None => println!("wake outcome unknown"),
                }
            }
        }
        Command::Menu { objuuid, run } => {
            if !load_context_menu(&mut session.state, &session.cmd_tx, ObjUuid::from(objuuid)) {
                bail!("{}", session.state.status);
            }
            session.pump_until(|event| {
                matches!(event, UiEvent::ContextMenuLoaded { .. } | UiEvent::Error(_))
            })?;
            if session.state.shell.dynamic_menu.is_empty() && !session.state.status.is_empty() {
                bail!("{}", session.state.status);
            }
            let Some(key) = run else {
                print!("{}", session.state.shell);
                return Ok(());
            };
            let action = session
                .state
                .shell
                .dynamic_menu
                .iter()
                .find(|entry| entry.key == key)
                .map(|entry| entry.action.clone())
                .with_context(|| format!("menu has no entry `{key}`"))?;
            session.run_menu_action(&action)?;
            print!("{}", session.state.shell);
        }
        Command::Set {
            objuuid,
            key,
            value,
        } => {
            session.load(&objuuid)?;
            session
                .state
                .edit_attribute(&key, &value)
                .map_err(|err| anyhow::anyhow!(err.status_line()))?;
            if !save_active(&mut session.state, &session.cmd_tx) {
                bail!("{}", session.state.status);
            }
            session.pump_until(|event| {
                matches!(event, UiEvent::ObjectSaved { .. } | UiEvent::Error(_))
            })?;
            if session.state.status != "Saved" {
                bail!("{}", session.state.status);
            }
            print!("{}", session.state.shell);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

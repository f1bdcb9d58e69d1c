//! Runtime bridge between UI command queue and backend event intake.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::InventoryGateway;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

/// Starts the backend worker thread. Each command runs as its own task, so
/// results are delivered in completion order rather than submission order.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    gateway: Arc<dyn InventoryGateway>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                emit(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut in_flight = Vec::new();
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                in_flight.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
                in_flight.push(tokio::spawn(handle_command(
                    Arc::clone(&gateway),
                    ui_tx.clone(),
                    cmd,
                )));
            }
            // Queue closed: let outstanding requests report before the runtime shuts down.
            for task in in_flight {
                let _ = task.await;
            }
        });
        tracing::debug!("backend worker stopped");
    })
}

async fn handle_command(
    gateway: Arc<dyn InventoryGateway>,
    ui_tx: Sender<UiEvent>,
    cmd: BackendCommand,
) {
    let event = match cmd {
        BackendCommand::LoadObject { ticket, objuuid } => match gateway.get_object(&objuuid).await {
            Ok(record) => UiEvent::ObjectLoaded { ticket, record },
            Err(err) => UiEvent::ObjectLoadFailed {
                ticket,
                objuuid,
                error: UiError::from_gateway(UiErrorContext::LoadObject, &err),
            },
        },
        BackendCommand::Wake { objuuid } => {
            let outcome = gateway
                .wake(&objuuid)
                .await
                .map_err(|err| UiError::from_gateway(UiErrorContext::Wake, &err));
            UiEvent::WakeCompleted { objuuid, outcome }
        }
        BackendCommand::LoadContextMenu { objuuid } => match gateway.context_menu(&objuuid).await {
            Ok(menu) => UiEvent::ContextMenuLoaded { objuuid, menu },
            Err(err) => UiEvent::Error(UiError::from_gateway(UiErrorContext::ContextMenu, &err)),
        },
        BackendCommand::SaveObject { record } => match gateway.post_object(&record).await {
            Ok(record) => UiEvent::ObjectSaved { record },
            Err(err) => UiEvent::Error(UiError::from_gateway(UiErrorContext::SaveObject, &err)),
        },
    };
    emit(&ui_tx, event);
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(?event, "ui event queue full; dropping event");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event receiver gone");
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;

//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::{
    domain::ObjUuid,
    protocol::{ContextMenuAction, EDIT_HOST_METHOD, WAKE_HOST_METHOD},
};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::reducer::ConsoleState,
    ui::NavigationTree,
};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the console".to_string();
            false
        }
    }
}

/// Blanks the view right away, then queues the fetch. The form is drawn when
/// the response event is applied.
pub fn load_and_edit<T: NavigationTree>(
    state: &mut ConsoleState<T>,
    cmd_tx: &Sender<BackendCommand>,
    objuuid: ObjUuid,
) -> bool {
    let ticket = state.begin_load(&objuuid);
    dispatch_backend_command(
        cmd_tx,
        BackendCommand::LoadObject { ticket, objuuid },
        &mut state.status,
    )
}

/// Queues a wake; the outcome arrives later as an event and never alters the form.
pub fn wake<T: NavigationTree>(
    state: &mut ConsoleState<T>,
    cmd_tx: &Sender<BackendCommand>,
    objuuid: ObjUuid,
) -> bool {
    dispatch_backend_command(cmd_tx, BackendCommand::Wake { objuuid }, &mut state.status)
}

pub fn load_context_menu<T: NavigationTree>(
    state: &mut ConsoleState<T>,
    cmd_tx: &Sender<BackendCommand>,
    objuuid: ObjUuid,
) -> bool {
    dispatch_backend_command(
        cmd_tx,
        BackendCommand::LoadContextMenu { objuuid },
        &mut state.status,
    )
}

pub fn save_active<T: NavigationTree>(
    state: &mut ConsoleState<T>,
    cmd_tx: &Sender<BackendCommand>,
) -> bool {
    let Some(record) = state.active().cloned() else {
        state.status = "Nothing to save; no object is open".to_string();
        return false;
    };
    dispatch_backend_command(
        cmd_tx,
        BackendCommand::SaveObject { record },
        &mut state.status,
    )
}

/// Runs a context-menu action. Only host actions are handled here; other
/// methods belong to other views and are reported as unsupported.
pub fn run_context_action<T: NavigationTree>(
    state: &mut ConsoleState<T>,
    cmd_tx: &Sender<BackendCommand>,
    action: &ContextMenuAction,
) -> bool {
    let Some(objuuid) = action.objuuid() else {
        state.status = format!("Menu action `{}` has no target object", action.method);
        return false;
    };

    match action.method.as_str() {
        EDIT_HOST_METHOD => load_and_edit(state, cmd_tx, objuuid),
        WAKE_HOST_METHOD => wake(state, cmd_tx, objuuid),
        other => {
            tracing::debug!(method = other, route = %action.route, "unsupported menu action");
            state.status = format!("Menu action `{other}` is not available here");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::protocol::host_context_menu;

    use super::*;
    use crate::ui::TreeCursor;

    #[test]
    fn load_and_edit_clears_synchronously_and_queues_fetch() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut state = ConsoleState::new(TreeCursor::default());
        state.shell.set_menu(host_context_menu(&ObjUuid::from("old")));

        assert!(load_and_edit(&mut state, &cmd_tx, ObjUuid::from("abc-1")));

        assert!(state.shell.is_blank());
        match cmd_rx.try_recv().expect("queued") {
            BackendCommand::LoadObject { ticket, objuuid } => {
                assert_eq!(ticket, 1);
                assert_eq!(objuuid, ObjUuid::from("abc-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn full_queue_is_reported_in_status() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut state = ConsoleState::new(TreeCursor::default());

        assert!(wake(&mut state, &cmd_tx, ObjUuid::from("a")));
        assert!(!wake(&mut state, &cmd_tx, ObjUuid::from("b")));
        assert!(state.status.contains("full"));
    }

    #[test]
    fn disconnected_queue_is_reported_in_status() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        let mut state = ConsoleState::new(TreeCursor::default());

        assert!(!wake(&mut state, &cmd_tx, ObjUuid::from("a")));
        assert!(state.status.contains("disconnected"));
    }

    #[test]
    fn host_menu_actions_map_to_commands() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut state = ConsoleState::new(TreeCursor::default());
        let menu = host_context_menu(&ObjUuid::from("h-9"));

        assert!(run_context_action(&mut state, &cmd_tx, &menu["wake"].action));
        assert!(run_context_action(&mut state, &cmd_tx, &menu["edit"].action));
        assert!(!run_context_action(&mut state, &cmd_tx, &menu["delete"].action));

        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::Wake { objuuid }) if objuuid == ObjUuid::from("h-9")
        ));
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadObject { .. })
        ));
        assert!(cmd_rx.try_recv().is_err());
        assert!(state.status.contains("delete node"));
    }

    #[test]
    fn save_requires_an_open_object() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut state = ConsoleState::new(TreeCursor::default());

        assert!(!save_active(&mut state, &cmd_tx));
        assert!(cmd_rx.try_recv().is_err());
    }
}

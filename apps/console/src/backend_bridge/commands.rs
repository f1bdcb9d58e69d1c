//! Backend commands queued from UI to backend worker.

use shared::domain::{HostRecord, ObjUuid};

use crate::controller::events::LoadTicket;

#[derive(Debug)]
pub enum BackendCommand {
    LoadObject {
        ticket: LoadTicket,
        objuuid: ObjUuid,
    },
    Wake {
        objuuid: ObjUuid,
    },
    LoadContextMenu {
        objuuid: ObjUuid,
    },
    SaveObject {
        record: HostRecord,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadObject { .. } => "load_object",
            BackendCommand::Wake { .. } => "wake",
            BackendCommand::LoadContextMenu { .. } => "load_context_menu",
            BackendCommand::SaveObject { .. } => "save_object",
        }
    }
}

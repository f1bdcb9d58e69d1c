//! Console state and the transitions driven by backend events.

use shared::domain::{FieldValue, HostRecord, ObjUuid};
use tracing::{debug, info, warn};

use crate::{
    controller::events::{LoadTicket, UiError, UiErrorContext, UiEvent},
    ui::{render_host, NavigationTree, TreeCursor, ViewShell},
};

/// Single owner of the active record and every view region.
pub struct ConsoleState<T: NavigationTree = TreeCursor> {
    pub shell: ViewShell,
    pub tree: T,
    pub status: String,
    active: Option<HostRecord>,
    last_issued: LoadTicket,
    last_wake: Option<(ObjUuid, Result<(), UiError>)>,
}

impl<T: NavigationTree> ConsoleState<T> {
    pub fn new(tree: T) -> Self {
        Self {
            shell: ViewShell::default(),
            tree,
            status: String::new(),
            active: None,
            last_issued: 0,
            last_wake: None,
        }
    }

    pub fn active(&self) -> Option<&HostRecord> {
        self.active.as_ref()
    }

    pub fn last_wake(&self) -> Option<&(ObjUuid, Result<(), UiError>)> {
        self.last_wake.as_ref()
    }

    /// Blanks the view ahead of a fetch and returns the ticket for the request.
    pub fn begin_load(&mut self, objuuid: &ObjUuid) -> LoadTicket {
        self.shell.clear();
        self.active = None;
        self.last_issued += 1;
        debug!(%objuuid, ticket = self.last_issued, "view cleared for load");
        self.last_issued
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::ObjectLoaded { ticket, record } => {
                // Responses land in arrival order; an older request can overwrite a newer one.
                if ticket < self.last_issued {
                    debug!(
                        ticket,
                        latest = self.last_issued,
                        objuuid = %record.objuuid,
                        "applying response from superseded load"
                    );
                }
                let objuuid = record.objuuid.clone();
                self.active = Some(record);
                self.shell.clear();
                self.render();
                self.tree.expand_to_node(&objuuid);
                self.status.clear();
            }
            UiEvent::ObjectLoadFailed {
                ticket,
                objuuid,
                error,
            } => {
                warn!(ticket, %objuuid, error = error.message(), "object load failed");
                self.status = error.status_line();
            }
            UiEvent::WakeCompleted { objuuid, outcome } => {
                match &outcome {
                    Ok(()) => info!(%objuuid, "wake delivered"),
                    Err(error) => debug!(%objuuid, error = error.message(), "wake outcome ignored"),
                }
                self.last_wake = Some((objuuid, outcome));
            }
            UiEvent::ContextMenuLoaded { objuuid, menu } => {
                debug!(%objuuid, entries = menu.len(), "context menu loaded");
                self.shell.set_menu(menu);
            }
            UiEvent::ObjectSaved { record } => {
                let same_object = self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.objuuid == record.objuuid);
                if same_object {
                    self.active = Some(record);
                    self.render();
                }
                self.status = "Saved".to_string();
            }
            UiEvent::Error(error) => {
                warn!(context = ?error.context(), error = error.message(), "console error");
                self.status = error.status_line();
            }
        }
    }

    /// Binds one form edit into the active record and redraws the form.
    pub fn edit_attribute(&mut self, key: &str, raw: &str) -> Result<(), UiError> {
        let Some(record) = self.active.as_mut() else {
            return Err(UiError::from_message(
                UiErrorContext::Edit,
                "no active object is being edited",
            ));
        };

        let view = render_host(record);
        let Some(attr) = view.attribute(key) else {
            return Err(UiError::from_message(
                UiErrorContext::Edit,
                format!("invalid attribute `{key}` for a host"),
            ));
        };
        if !attr.kind.is_editable() {
            return Err(UiError::from_message(
                UiErrorContext::Edit,
                format!("field `{key}` is read-only"),
            ));
        }
        let value: FieldValue = attr.kind.parse_input(raw).ok_or_else(|| {
            UiError::from_message(
                UiErrorContext::Edit,
                format!("invalid value `{raw}` for `{key}`"),
            )
        })?;

        record
            .set_field(key, value)
            .map_err(|err| UiError::from_message(UiErrorContext::Edit, err.to_string()))?;
        self.render();
        Ok(())
    }

    fn render(&mut self) {
        if let Some(record) = &self.active {
            let view = render_host(record);
            self.shell.show_host(view);
        }
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;

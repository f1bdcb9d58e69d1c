use shared::domain::ObjUuid;

/// Navigation tree the console asks to reveal the object being edited.
pub trait NavigationTree {
    fn expand_to_node(&mut self, objuuid: &ObjUuid);
}

/// In-process tree cursor: tracks the highlighted node.
#[derive(Debug, Default)]
pub struct TreeCursor {
    selected: Option<ObjUuid>,
}

impl TreeCursor {
    pub fn selected(&self) -> Option<&ObjUuid> {
        self.selected.as_ref()
    }
}

impl NavigationTree for TreeCursor {
    fn expand_to_node(&mut self, objuuid: &ObjUuid) {
        tracing::trace!(%objuuid, "expanding tree to node");
        self.selected = Some(objuuid.clone());
    }
}

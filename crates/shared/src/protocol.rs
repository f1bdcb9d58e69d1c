use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ObjUuid;

pub const GET_OBJECT_ROUTE: &str = "inventory/get_object";
pub const POST_OBJECT_ROUTE: &str = "inventory/post_object";
pub const CONTEXT_ROUTE: &str = "inventory/context";
pub const WAKE_ROUTE: &str = "host/wake";

pub const EDIT_HOST_METHOD: &str = "edit host";
pub const WAKE_HOST_METHOD: &str = "wake host";
pub const DELETE_NODE_METHOD: &str = "delete node";

/// Form body shared by every per-object call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    pub objuuid: ObjUuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContextMenuAction {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ContextMenuAction {
    pub fn objuuid(&self) -> Option<ObjUuid> {
        self.params
            .get("objuuid")
            .and_then(Value::as_str)
            .map(ObjUuid::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContextMenuItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub action: ContextMenuAction,
}

/// Context menu keyed by entry name (`edit`, `wake`, `delete`, ...).
pub type ContextMenu = BTreeMap<String, ContextMenuItem>;

fn item(label: &str, method: &str, route: &str, objuuid: &ObjUuid) -> ContextMenuItem {
    let mut params = Map::new();
    params.insert("objuuid".into(), Value::String(objuuid.0.clone()));
    ContextMenuItem {
        label: label.to_string(),
        action: ContextMenuAction {
            method: method.to_string(),
            route: route.to_string(),
            params,
        },
    }
}

/// The menu the inventory attaches to every host object.
pub fn host_context_menu(objuuid: &ObjUuid) -> ContextMenu {
    let mut menu = ContextMenu::new();
    menu.insert(
        "delete".into(),
        item("Delete", DELETE_NODE_METHOD, "inventory/delete", objuuid),
    );
    menu.insert(
        "edit".into(),
        item("Edit", EDIT_HOST_METHOD, GET_OBJECT_ROUTE, objuuid),
    );
    menu.insert(
        "wake".into(),
        item("Wake", WAKE_HOST_METHOD, WAKE_ROUTE, objuuid),
    );
    menu
}

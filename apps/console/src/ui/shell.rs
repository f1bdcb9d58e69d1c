//! Mutable view regions: main body, dynamic menu, document title, active tab.

use std::fmt;

use shared::protocol::{ContextMenu, ContextMenuAction};

use crate::ui::view::HostView;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
    pub action: ContextMenuAction,
}

#[derive(Debug, Default)]
pub struct ViewShell {
    pub document_title: String,
    pub active_tab: Option<&'static str>,
    pub body: Option<HostView>,
    pub dynamic_menu: Vec<MenuEntry>,
}

impl ViewShell {
    /// Empties the body and dynamic menu so nothing from the previous view lingers.
    pub fn clear(&mut self) {
        self.body = None;
        self.dynamic_menu.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.body.is_none() && self.dynamic_menu.is_empty()
    }

    pub fn show_host(&mut self, view: HostView) {
        self.document_title = view.title.clone();
        self.active_tab = Some(view.active_tab);
        self.body = Some(view);
    }

    pub fn set_menu(&mut self, menu: ContextMenu) {
        self.dynamic_menu = menu
            .into_iter()
            .map(|(key, item)| MenuEntry {
                key,
                label: item.label,
                action: item.action,
            })
            .collect();
    }
}

impl fmt::Display for ViewShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(body) = &self.body {
            write!(f, "{body}")?;
        }
        for entry in &self.dynamic_menu {
            writeln!(f, "  {:<8} {} ({})", entry.key, entry.label, entry.action.route)?;
        }
        Ok(())
    }
}

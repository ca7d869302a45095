//! Native menus built from the wire menu schema.
//!
//! Items are created with the peer's own id as their `MenuId`, so a
//! `MenuEvent` carries the id the peer expects back without a lookup
//! table.

use muda::accelerator::Accelerator;
use muda::{CheckMenuItem, IsMenuItem, Menu, MenuId, PredefinedMenuItem, Submenu};
use tronbun_common::PlatformError;
use tronbun_ipc::{MenuItem, MenuItemKind};

/// Build a native menu from parsed menu items.
pub fn build_menu(items: &[MenuItem]) -> Result<Menu, PlatformError> {
    let menu = Menu::new();
    append_items(&Parent::Menu(&menu), items)?;
    Ok(menu)
}

enum Parent<'a> {
    Menu(&'a Menu),
    Submenu(&'a Submenu),
}

impl Parent<'_> {
    fn append(&self, item: &dyn IsMenuItem) -> Result<(), PlatformError> {
        let result = match self {
            Parent::Menu(menu) => menu.append(item),
            Parent::Submenu(submenu) => submenu.append(item),
        };
        result.map_err(|e| PlatformError::MenuError(e.to_string()))
    }
}

fn append_items(parent: &Parent<'_>, items: &[MenuItem]) -> Result<(), PlatformError> {
    for item in items {
        match item.kind {
            MenuItemKind::Separator => parent.append(&PredefinedMenuItem::separator())?,
            MenuItemKind::Submenu => {
                let submenu = Submenu::with_id(item_id(item), &item.label, item.enabled);
                append_items(&Parent::Submenu(&submenu), &item.submenu)?;
                parent.append(&submenu)?;
            }
            MenuItemKind::Checkbox => {
                let check = CheckMenuItem::with_id(
                    item_id(item),
                    &item.label,
                    item.enabled,
                    item.checked,
                    accelerator(item),
                );
                parent.append(&check)?;
            }
            MenuItemKind::Normal => {
                let entry = muda::MenuItem::with_id(
                    item_id(item),
                    &item.label,
                    item.enabled,
                    accelerator(item),
                );
                parent.append(&entry)?;
            }
        }
    }
    Ok(())
}

/// The id reported on click: the peer's id, verbatim, even when empty.
pub fn item_id(item: &MenuItem) -> MenuId {
    MenuId::new(&item.id)
}

fn accelerator(item: &MenuItem) -> Option<Accelerator> {
    let text = item.accelerator.as_deref()?;
    match text.parse() {
        Ok(accel) => Some(accel),
        Err(e) => {
            tracing::warn!(accelerator = %text, error = %e, "ignoring invalid accelerator");
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

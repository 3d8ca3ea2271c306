//! Item activation: the renderer's `onItemSelect` contract.
//!
//! The feed performs no navigation itself. It hands the activated item to
//! a caller-supplied handler, and only for items advertised as selectable.

use thiserror::Error;

use super::item::UnifiedContentItem;
use super::view_model::FeedViewModel;

/// Receives activated items
pub trait ItemSelectHandler {
    fn on_item_select(&mut self, item: &UnifiedContentItem);
}

impl<F> ItemSelectHandler for F
where
    F: FnMut(&UnifiedContentItem),
{
    fn on_item_select(&mut self, item: &UnifiedContentItem) {
        self(item)
    }
}

/// Why an activation was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("No item with key {0} in the current feed")]
    NotFound(String),

    #[error("Item {0} is not selectable")]
    NotSelectable(String),
}

impl FeedViewModel {
    /// Activate the item with `key`, calling `handler` if it is selectable
    pub fn activate<H>(&self, key: &str, handler: &mut H) -> Result<(), SelectError>
    where
        H: ItemSelectHandler + ?Sized,
    {
        let entry = self
            .find(key)
            .ok_or_else(|| SelectError::NotFound(key.to_string()))?;

        if !entry.capabilities.selectable {
            return Err(SelectError::NotSelectable(key.to_string()));
        }

        handler.on_item_select(&entry.item);
        Ok(())
    }
}

use crate::clock::Clock;
use crate::models::{Item, ItemDraft};
use crate::store::ItemStore;

/// The item collection plus the mutations the forms can perform
///
/// This is a working copy: load it from an `ItemStore`, change it, save it
/// back. Newest items sit at the front, same as the list screen shows them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn load(store: &dyn ItemStore) -> Self {
        let items = store.load_items();
        tracing::debug!("Loaded {} items", items.len());
        Self { items }
    }

    pub fn save(&self, store: &dyn ItemStore) -> crate::Result<()> {
        store.save_items(&self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Find an item by full id or by an unambiguous id prefix
    pub fn resolve(&self, id_or_prefix: &str) -> crate::Result<&Item> {
        if let Some(item) = self.get(id_or_prefix) {
            return Ok(item);
        }
        if id_or_prefix.is_empty() {
            return Err(crate::Error::NotFound(id_or_prefix.to_string()));
        }

        let mut matches = self
            .items
            .iter()
            .filter(|item| item.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Ok(item),
            (Some(_), Some(_)) => Err(crate::Error::Validation(format!(
                "id prefix '{}' matches more than one item",
                id_or_prefix
            ))),
            _ => Err(crate::Error::NotFound(id_or_prefix.to_string())),
        }
    }

    /// Create an item from a submitted form
    pub fn add(&mut self, draft: ItemDraft, clock: &dyn Clock) -> crate::Result<&Item> {
        let draft = draft.normalize()?;
        let now = clock.now();

        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            category: draft.category,
            location: draft.location,
            quantity: draft.quantity,
            unit: draft.unit,
            expiry_date: draft.expiry_date,
            alert_days: draft.alert_days,
            memo: draft.memo,
            created_at: now,
            updated_at: now,
        };

        tracing::info!("Added item {} ({})", item.name, item.id);
        self.items.insert(0, item);
        Ok(&self.items[0])
    }

    /// Overwrite an item's editable fields; id and creation time stay put
    pub fn update(&mut self, id: &str, draft: ItemDraft, clock: &dyn Clock) -> crate::Result<&Item> {
        let draft = draft.normalize()?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| crate::Error::NotFound(id.to_string()))?;

        item.name = draft.name;
        item.category = draft.category;
        item.location = draft.location;
        item.quantity = draft.quantity;
        item.unit = draft.unit;
        item.expiry_date = draft.expiry_date;
        item.alert_days = draft.alert_days;
        item.memo = draft.memo;
        item.updated_at = clock.now();

        tracing::info!("Updated item {} ({})", item.name, item.id);
        Ok(&*item)
    }

    /// Remove an item for good
    pub fn delete(&mut self, id: &str) -> crate::Result<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| crate::Error::NotFound(id.to_string()))?;

        let removed = self.items.remove(index);
        tracing::info!("Deleted item {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

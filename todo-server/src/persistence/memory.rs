//! In-memory store for router tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::TodoStore;
use crate::error::StoreError;
use crate::models::{TodoItem, UpdateItemRequest};

/// Vec-backed store mirroring table semantics: no uniqueness on id,
/// silent no-op updates and deletes.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<TodoItem>>,
    torn_down: AtomicBool,
    fail_teardown: bool,
}

impl MemoryStore {
    /// A store whose teardown reports an error.
    pub fn failing_teardown() -> Self {
        Self {
            fail_teardown: true,
            ..Self::default()
        }
    }

    pub fn torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn teardown(&self) -> Result<(), StoreError> {
        self.torn_down.store(true, Ordering::SeqCst);
        if self.fail_teardown {
            return Err(StoreError::NotConfigured {
                operation: "close pool",
            });
        }
        Ok(())
    }

    async fn get_items(&self) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_item(&self, id: &str) -> Result<Option<TodoItem>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn store_item(&self, item: &TodoItem) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(item.clone());
        Ok(())
    }

    async fn update_item(&self, id: &str, update: &UpdateItemRequest) -> Result<(), StoreError> {
        for item in self.rows.lock().unwrap().iter_mut().filter(|item| item.id == id) {
            item.name = update.name.clone();
            item.completed = update.completed;
        }
        Ok(())
    }

    async fn remove_item(&self, id: &str) -> Result<(), StoreError> {
        self.rows.lock().unwrap().retain(|item| item.id != id);
        Ok(())
    }
}

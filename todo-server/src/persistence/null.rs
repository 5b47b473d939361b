//! Stand-in store for processes started without a database

use async_trait::async_trait;

use super::TodoStore;
use crate::error::StoreError;
use crate::models::{TodoItem, UpdateItemRequest};

/// Store with no backing database.
///
/// Lifecycle calls succeed so the server can start and stop; every data
/// operation fails immediately with [`StoreError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl TodoStore for NullStore {
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn teardown(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_items(&self) -> Result<Vec<TodoItem>, StoreError> {
        Err(StoreError::NotConfigured {
            operation: "list items",
        })
    }

    async fn get_item(&self, _id: &str) -> Result<Option<TodoItem>, StoreError> {
        Err(StoreError::NotConfigured {
            operation: "get item",
        })
    }

    async fn store_item(&self, _item: &TodoItem) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured {
            operation: "store item",
        })
    }

    async fn update_item(&self, _id: &str, _update: &UpdateItemRequest) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured {
            operation: "update item",
        })
    }

    async fn remove_item(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotConfigured {
            operation: "remove item",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lifecycle_succeeds() {
        assert!(NullStore.init().await.is_ok());
        assert!(NullStore.teardown().await.is_ok());
    }

    #[tokio::test]
    async fn data_operations_fail() {
        let item = TodoItem {
            id: "1".into(),
            name: "milk".into(),
            completed: false,
        };
        let update = UpdateItemRequest {
            name: "milk".into(),
            completed: true,
        };

        assert!(NullStore.get_items().await.is_err());
        assert!(NullStore.get_item("1").await.is_err());
        assert!(NullStore.store_item(&item).await.is_err());
        assert!(NullStore.update_item("1", &update).await.is_err());
        let err = NullStore.remove_item("1").await.unwrap_err();
        assert_eq!(err.to_string(), "no database configured; cannot remove item");
    }
}

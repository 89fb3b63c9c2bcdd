//! Grocery Order Repository

use serde_json::{Value, json};
use shared::models::{GroceryOrderCreate, GroceryStatus};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::GroceryOrder;

const TABLE: &str = "grocery_order";

/// `items` must carry at least one entry
fn has_items(items: &Value) -> bool {
    match items {
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        _ => false,
    }
}

#[derive(Clone)]
pub struct GroceryRepository {
    base: BaseRepository,
}

impl GroceryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, user: &str, data: GroceryOrderCreate) -> RepoResult<GroceryOrder> {
        if !has_items(&data.items) {
            return Err(RepoError::Validation("items must not be empty".into()));
        }

        let now = now_millis();
        let order = GroceryOrder {
            id: None,
            user: user.to_string(),
            assigned_to: None,
            items: data.items,
            status: GroceryStatus::Requested,
            created_at: now,
            updated_at: now,
        };

        let created: Option<GroceryOrder> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create grocery order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<GroceryOrder>> {
        let order: Option<GroceryOrder> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(order)
    }

    /// Orders the user requested or delivers, newest first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<GroceryOrder>> {
        let orders: Vec<GroceryOrder> = self
            .base
            .db()
            .query(
                "SELECT * FROM grocery_order WHERE user = $user OR assigned_to = $user \
                 ORDER BY created_at DESC",
            )
            .bind(("user", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// REQUESTED orders without a volunteer, oldest first
    pub async fn find_unassigned(&self) -> RepoResult<Vec<GroceryOrder>> {
        let orders: Vec<GroceryOrder> = self
            .base
            .db()
            .query(
                "SELECT * FROM grocery_order WHERE status = 'REQUESTED' \
                 AND (assigned_to = NONE OR assigned_to = NULL) \
                 ORDER BY created_at ASC",
            )
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn update_status(&self, id: &str, status: GroceryStatus) -> RepoResult<GroceryOrder> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", record_id(TABLE, id)))
            .bind((
                "data",
                json!({ "status": status.as_str(), "updated_at": now_millis() }),
            ))
            .await?;
        let updated: Vec<GroceryOrder> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Grocery order {} not found", id)))
    }

    /// Hand a REQUESTED, unassigned order to `volunteer` and mark it ACCEPTED
    ///
    /// Same contract as task assignment: assigned → `Duplicate`, not REQUESTED → `Validation`.
    pub async fn assign(&self, id: &str, volunteer: &str) -> RepoResult<GroceryOrder> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET assigned_to = $volunteer, status = 'ACCEPTED', updated_at = $now \
                 WHERE (assigned_to = NONE OR assigned_to = NULL) AND status = 'REQUESTED' \
                 RETURN AFTER",
            )
            .bind(("thing", record_id(TABLE, id)))
            .bind(("volunteer", volunteer.to_string()))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<GroceryOrder> = result.take(0)?;
        if let Some(order) = updated.into_iter().next() {
            return Ok(order);
        }

        match self.find_by_id(id).await? {
            Some(order) if order.assigned_to.is_some() => Err(RepoError::Duplicate(format!(
                "Grocery order {} is already assigned",
                id
            ))),
            Some(order) => Err(RepoError::Validation(format!(
                "Grocery order {} is {}",
                id,
                order.status.as_str()
            ))),
            None => Err(RepoError::NotFound(format!("Grocery order {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_items() {
        assert!(has_items(&json!(["milk", "bread"])));
        assert!(has_items(&json!({ "milk": 2 })));
        assert!(has_items(&json!("milk, bread")));
        assert!(!has_items(&json!([])));
        assert!(!has_items(&json!({})));
        assert!(!has_items(&json!("  ")));
        assert!(!has_items(&Value::Null));
        assert!(!has_items(&json!(3)));
    }
}

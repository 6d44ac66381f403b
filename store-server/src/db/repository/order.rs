//! Order Repository
//!
//! Status changes are compare-and-set on the current status so two
//! admins racing on the same order cannot both win.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{AdminResponse, Order};
use crate::utils::time::now_millis;
use shared::order::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a fully built order
    ///
    /// The caller has already verified totals and reserved stock.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        if order.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let created: Option<Order> = self.base.db().create("order").content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find all orders of a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user = parse_record_id(user_id)?.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Record payment; fails without writing if already paid
    pub async fn mark_paid(
        &self,
        id: &str,
        payment_result: Option<serde_json::Value>,
    ) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    is_paid = true,
                    paid_at = $now,
                    payment_result = IF $has_result THEN $result ELSE payment_result END,
                    updated_at = $now
                WHERE is_paid = false
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("now", now))
            .bind(("has_result", payment_result.is_some()))
            .bind(("result", payment_result))
            .await?;

        let updated: Option<Order> = result.take(0)?;
        match updated {
            Some(order) => Ok(order),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(RepoError::Duplicate("Order is already paid".to_string())),
                None => Err(RepoError::NotFound(format!("Order {} not found", id))),
            },
        }
    }

    /// Move an order from one status to another
    ///
    /// The caller validates the transition against the lifecycle table;
    /// the WHERE clause re-checks the starting status at write time.
    pub async fn set_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
        tracking_number: Option<String>,
        admin_response: Option<AdminResponse>,
    ) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    status = $to,
                    tracking_number = IF $has_tracking THEN $tracking ELSE tracking_number END,
                    admin_response = IF $has_response THEN $response ELSE admin_response END,
                    updated_at = $now
                WHERE status = $from
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("has_tracking", tracking_number.is_some()))
            .bind(("tracking", tracking_number))
            .bind(("has_response", admin_response.is_some()))
            .bind(("response", admin_response))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Order> = result.take(0)?;
        match updated {
            Some(order) => Ok(order),
            None => match self.find_by_id(id).await? {
                Some(current) => Err(RepoError::Validation(format!(
                    "Order status changed concurrently, now {}",
                    current.status
                ))),
                None => Err(RepoError::NotFound(format!("Order {} not found", id))),
            },
        }
    }

    /// Count orders currently in a given status
    pub async fn count_by_status(&self, status: OrderStatus) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order WHERE status = $status GROUP ALL")
            .bind(("status", status))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Count all orders
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Total revenue across paid orders
    pub async fn paid_revenue(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(total_price) AS revenue FROM order WHERE is_paid = true GROUP ALL",
            )
            .await?;
        let revenue: Option<f64> = result.take((0, "revenue"))?;
        Ok(revenue.unwrap_or(0.0))
    }
}

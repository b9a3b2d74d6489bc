use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    #[ts(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

impl Order {
    /// Insert an order with its line items in one transaction. The total is
    /// derived from the lines, not supplied by the caller.
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        items: &[CreateOrderItem],
    ) -> Result<OrderWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let order_id = Uuid::new_v4();
        let total: i64 = items
            .iter()
            .map(|i| i.unit_price_cents * i.quantity as i64)
            .sum();

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, user_id, total_cents) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (id, order_id, product_id, product_name,
                                          unit_price_cents, quantity, selected_color, selected_size)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(&item.selected_color)
            .bind(&item.selected_size)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(OrderWithItems {
            order,
            items: inserted,
        })
    }

    pub async fn find_for_user(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn items(pool: &SqlitePool, order_id: Uuid) -> Result<Vec<OrderItem>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    pub async fn bulk_update_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
        qb.push_bind(status)
            .push(", updated_at = datetime('now', 'subsec') WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;
    use crate::models::user::{CreateUser, User};

    async fn seed_user(pool: &SqlitePool, email: &str) -> User {
        User::create(
            pool,
            &CreateUser {
                email: email.to_string(),
                password_hash: "x".to_string(),
                name: "Ada".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn line(name: &str, unit_price_cents: i64, quantity: i32) -> CreateOrderItem {
        CreateOrderItem {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            unit_price_cents,
            quantity,
            selected_color: None,
            selected_size: None,
        }
    }

    #[tokio::test]
    async fn create_derives_total_from_lines() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "ada@example.com").await;

        let order = Order::create(
            &db.pool,
            user.id,
            &[line("Silk Scarf", 24900, 2), line("Leather Tote", 189000, 1)],
        )
        .await
        .unwrap();

        assert_eq!(order.order.total_cents, 2 * 24900 + 189000);
        assert_eq!(order.order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);

        let stored = Order::items(&db.pool, order.order.id).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn find_for_user_is_owner_scoped() {
        let db = DBService::new_in_memory().await.unwrap();
        let alice = seed_user(&db.pool, "alice@example.com").await;
        let bob = seed_user(&db.pool, "bob@example.com").await;

        let order = Order::create(&db.pool, alice.id, &[line("Silk Scarf", 24900, 1)])
            .await
            .unwrap();

        assert!(
            Order::find_for_user(&db.pool, order.order.id, alice.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            Order::find_for_user(&db.pool, order.order.id, bob.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn bulk_status_update_touches_only_given_ids() {
        let db = DBService::new_in_memory().await.unwrap();
        let user = seed_user(&db.pool, "ada@example.com").await;

        let shipped = Order::create(&db.pool, user.id, &[line("Silk Scarf", 24900, 1)])
            .await
            .unwrap();
        Order::create(&db.pool, user.id, &[line("Leather Tote", 189000, 1)])
            .await
            .unwrap();

        let affected =
            Order::bulk_update_status(&db.pool, &[shipped.order.id], OrderStatus::Shipped)
                .await
                .unwrap();
        assert_eq!(affected, 1);

        let orders = Order::list_by_user(&db.pool, user.id).await.unwrap();
        for order in orders {
            let expected = if order.id == shipped.order.id {
                OrderStatus::Shipped
            } else {
                OrderStatus::Pending
            };
            assert_eq!(order.status, expected, "order {}", order.id);
        }
    }
}

//! Order business logic - placing orders and tracking their status.
//!
//! Orders reference a user and a product by id only. The references are checked when the
//! order is placed, but later deletes leave them dangling, in which case the related record
//! simply comes back as `None`.

use crate::{
    core::money,
    entities::{Order, Product, User, order, product, user},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An order with the user and product it references, when they still exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// The order row
    #[serde(flatten)]
    pub order: order::Model,
    /// Customer, if still present
    pub user: Option<user::Model>,
    /// Ordered product, if still present
    pub product: Option<product::Model>,
}

/// Payload for placing an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    /// Units ordered, at least one
    pub quantity: i32,
    /// Total charged; computed from the product price when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    /// Initial status; `"pending"` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Customer placing the order
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Product being ordered
    #[serde(default)]
    pub product_id: Option<i64>,
}

fn normalize_status(status: &str) -> Result<String> {
    let status = status.trim();
    if status.is_empty() {
        return Err(Error::validation("Order status cannot be empty"));
    }
    Ok(status.to_string())
}

/// Attaches users and products to a batch of orders with one query per table.
async fn with_details(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderDetails>> {
    let user_ids: Vec<i64> = orders.iter().filter_map(|o| o.user_id).collect();
    let product_ids: Vec<i64> = orders.iter().filter_map(|o| o.product_id).collect();

    let users: HashMap<i64, user::Model> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };
    let products: HashMap<i64, product::Model> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Product::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };

    Ok(orders
        .into_iter()
        .map(|order| OrderDetails {
            user: order.user_id.and_then(|id| users.get(&id).cloned()),
            product: order.product_id.and_then(|id| products.get(&id).cloned()),
            order,
        })
        .collect())
}

/// Retrieves every order, newest first, with user and product attached.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<OrderDetails>> {
    let orders = Order::find()
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    with_details(db, orders).await
}

/// Retrieves one order with user and product attached.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<OrderDetails>> {
    let Some(order) = Order::find_by_id(order_id).one(db).await? else {
        return Ok(None);
    };
    Ok(with_details(db, vec![order]).await?.pop())
}

/// Retrieves a user's orders, newest first.
pub async fn get_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<OrderDetails>> {
    let orders = Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    with_details(db, orders).await
}

/// Places an order.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below one
/// - The given or computed total is negative, above 99,999,999.99, or finer than cents
/// - A supplied status is blank
/// - The referenced user or product does not exist
/// - No total is given and there is no product to price it from
/// - The database insert operation fails
pub async fn create_order(db: &DatabaseConnection, input: OrderInput) -> Result<order::Model> {
    if input.quantity < 1 {
        return Err(Error::validation("Quantity must be at least 1"));
    }
    if let Some(total) = input.total_price {
        money::check_amount(total, "Total price")?;
    }
    let status = match input.status.as_deref() {
        Some(status) => normalize_status(status)?,
        None => order::DEFAULT_STATUS.to_string(),
    };

    if let Some(user_id) = input.user_id {
        if User::find_by_id(user_id).one(db).await?.is_none() {
            return Err(Error::validation(format!("User {user_id} does not exist")));
        }
    }
    let product = match input.product_id {
        Some(product_id) => Some(
            Product::find_by_id(product_id)
                .one(db)
                .await?
                .ok_or_else(|| Error::validation(format!("Product {product_id} does not exist")))?,
        ),
        None => None,
    };

    let total_price = match (input.total_price, &product) {
        (Some(total), _) => total,
        (None, Some(product)) => money::line_total(product.price, input.quantity.unsigned_abs())?,
        (None, None) => {
            return Err(Error::validation(
                "Total price is required when no product is given",
            ));
        }
    };

    let order = order::ActiveModel {
        quantity: Set(input.quantity),
        total_price: Set(total_price),
        status: Set(status),
        order_date: Set(Utc::now()),
        user_id: Set(input.user_id),
        product_id: Set(input.product_id),
        ..Default::default()
    };
    let order = order.insert(db).await?;
    tracing::info!(order_id = order.id, user_id = ?order.user_id, "Order placed");
    Ok(order)
}

/// Replaces an order's status.
///
/// # Errors
/// Returns an error if the status is blank or the order does not exist.
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: &str,
) -> Result<order::Model> {
    let status = normalize_status(status)?;

    let mut order: order::ActiveModel = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Order",
            id: order_id,
        })?
        .into();
    order.status = Set(status);

    let order = order.update(db).await?;
    tracing::debug!(order_id, status = %order.status, "Order status updated");
    Ok(order)
}

//! Orders repository.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::orders::models::{Order, OrderNumber, OrderStatus};

/// Orders repository errors.
#[derive(Debug, Error, PartialEq)]
pub enum OrdersRepositoryError {
    /// An order with this number was already stored.
    #[error("order {0} already exists")]
    AlreadyExists(OrderNumber),

    /// No order with this number.
    #[error("order {0} not found")]
    NotFound(OrderNumber),

    /// The status change is not part of the order lifecycle.
    #[error("order cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },
}

/// Order storage.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Stores a new order.
    async fn create_order(&self, order: Order) -> Result<Order, OrdersRepositoryError>;

    /// Retrieve a single order.
    async fn get_order(&self, number: &OrderNumber) -> Result<Order, OrdersRepositoryError>;

    /// Retrieves all orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersRepositoryError>;

    /// Moves an order to a new status.
    async fn update_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<Order, OrdersRepositoryError>;
}

/// Orders held in process memory for the lifetime of the repository.
#[derive(Debug, Default)]
pub struct InMemoryOrdersRepository {
    orders: RwLock<FxHashMap<OrderNumber, Order>>,
}

impl InMemoryOrdersRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrdersRepository {
    async fn create_order(&self, order: Order) -> Result<Order, OrdersRepositoryError> {
        let mut orders = self.orders.write().await;

        if orders.contains_key(&order.number) {
            return Err(OrdersRepositoryError::AlreadyExists(order.number));
        }

        info!(order = %order.number, total = %order.quote.total(), "order created");

        orders.insert(order.number.clone(), order.clone());

        Ok(order)
    }

    async fn get_order(&self, number: &OrderNumber) -> Result<Order, OrdersRepositoryError> {
        self.orders
            .read()
            .await
            .get(number)
            .cloned()
            .ok_or_else(|| OrdersRepositoryError::NotFound(number.clone()))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersRepositoryError> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();

        orders.sort_by(|a, b| {
            b.placed_at
                .cmp(&a.placed_at)
                .then_with(|| b.number.cmp(&a.number))
        });

        Ok(orders)
    }

    async fn update_status(
        &self,
        number: &OrderNumber,
        status: OrderStatus,
    ) -> Result<Order, OrdersRepositoryError> {
        let mut orders = self.orders.write().await;

        let order = orders
            .get_mut(number)
            .ok_or_else(|| OrdersRepositoryError::NotFound(number.clone()))?;

        if !order.status.can_transition_to(status) {
            return Err(OrdersRepositoryError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }

        info!(order = %number, from = %order.status, to = %status, "order status changed");

        order.status = status;

        Ok(order.clone())
    }
}

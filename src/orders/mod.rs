//! Orders

pub mod models;
mod repository;

pub use models::{
    Address, Customer, DeliveryWindow, Order, OrderConfirmation, OrderLine, OrderNumber,
    OrderStatus,
};
pub use repository::{
    InMemoryOrdersRepository, MockOrdersRepository, OrdersRepository, OrdersRepositoryError,
};

#[cfg(test)]
pub(crate) use repository::tests::order as test_order;

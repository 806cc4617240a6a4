//! Decora prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthError, Role, Session, User},
    calculator::{CalculatorError, CurtainJob, RollSpec, Surface, WallpaperJob},
    cart::{Cart, CartError, CartItem},
    catalog::{
        Catalog, CatalogError, InMemoryProductsRepository, ProductQuery, ProductsRepository,
        SortOrder,
    },
    checkout::{Checkout, CheckoutConfig, CheckoutError, CheckoutForm, CheckoutStep, FormField},
    config::Settings,
    coupons::{Coupon, CouponBook, CouponError},
    fixtures::{Fixture, FixtureError},
    notifications::{Notification, NotificationCenter, NotificationError, NotificationKind, Priority},
    orders::{
        InMemoryOrdersRepository, Order, OrderConfirmation, OrderNumber, OrderStatus,
        OrdersRepository, OrdersRepositoryError,
    },
    prices::{Price, PriceError},
    pricing::{PaymentMethod, PricingConfig, PricingError, Quote, QuoteRequest, Services, quote},
    products::{Category, Product, ProductDetails},
    reports::DashboardSummary,
    room::RoomConfig,
    storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError},
};

//! Order Models

use std::fmt;

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    prices::Price,
    pricing::{PaymentMethod, Quote, Services},
};

/// Prefix of every order number.
pub const ORDER_NUMBER_PREFIX: &str = "DEC-";

/// Customer facing order number, e.g. `DEC-04817263`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a random order number.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let digits: u32 = rng.gen_range(0..100_000_000);

        Self(format!("{ORDER_NUMBER_PREFIX}{digits:08}"))
    }

    /// Wrap an existing order number.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// The order number as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, payment not yet confirmed
    #[default]
    Pending,

    /// Payment confirmed
    Confirmed,

    /// Being prepared
    Processing,

    /// Handed to the carrier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Cancelled before shipping
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether an order may move from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Processing)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (
                    Self::Pending | Self::Confirmed | Self::Processing,
                    Self::Cancelled
                )
        )
    }

    /// Whether the order has reached a final state.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };

        f.write_str(label)
    }
}

/// Who placed the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Taxpayer id (CPF)
    pub cpf: String,
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code (CEP)
    pub cep: String,
    /// Street
    pub street: String,
    /// House number
    pub number: String,
    /// Apartment, block, etc.
    pub complement: Option<String>,
    /// Neighbourhood
    pub neighborhood: String,
    /// City
    pub city: String,
    /// State abbreviation
    pub state: String,
}

/// A purchased product.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Catalog id
    pub product_id: String,
    /// Product name at the time of purchase
    pub name: String,
    /// Price per unit
    pub unit_price: Price,
    /// Units bought
    pub quantity: u32,
    /// Unit price times quantity
    pub line_total: Price,
}

/// Delivery estimate in calendar days after the order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    /// Earliest delivery, in days
    pub min_days: u16,
    /// Latest delivery, in days
    pub max_days: u16,
}

impl Default for DeliveryWindow {
    fn default() -> Self {
        Self {
            min_days: 7,
            max_days: 15,
        }
    }
}

impl DeliveryWindow {
    /// Earliest and latest delivery dates for an order placed at `placed_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`jiff::Error`] if the dates fall outside the supported range.
    pub fn dates_from(&self, placed_at: Timestamp) -> Result<(Date, Date), jiff::Error> {
        let placed = placed_at.to_zoned(TimeZone::UTC).date();

        Ok((
            placed.checked_add(i64::from(self.min_days).days())?,
            placed.checked_add(i64::from(self.max_days).days())?,
        ))
    }
}

impl fmt::Display for DeliveryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {} days", self.min_days, self.max_days)
    }
}

/// Order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Internal id
    pub uuid: Uuid,
    /// Customer-facing order number
    pub number: OrderNumber,
    /// When the order was placed
    pub placed_at: Timestamp,
    /// Who placed it
    pub customer: Customer,
    /// Where it ships
    pub shipping_address: Address,
    /// Purchased products
    pub lines: Vec<OrderLine>,
    /// Priced breakdown
    pub quote: Quote,
    /// Payment method
    pub payment: PaymentMethod,
    /// Card installments, 1 unless paid by credit
    pub installments: u32,
    /// Booked services
    pub services: Services,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Promised delivery window
    pub delivery: DeliveryWindow,
}

impl Order {
    /// Total units ordered.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// What the customer sees after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Order number
    pub number: OrderNumber,
    /// Amount charged
    pub total: Price,
    /// Units ordered
    pub item_count: u64,
    /// Promised delivery window
    pub delivery: DeliveryWindow,
    /// Earliest and latest delivery dates
    pub estimated_delivery: (Date, Date),
}

impl OrderConfirmation {
    /// Build the confirmation for a stored order.
    ///
    /// # Errors
    ///
    /// Returns a [`jiff::Error`] if the delivery dates cannot be computed.
    pub fn for_order(order: &Order) -> Result<Self, jiff::Error> {
        Ok(Self {
            number: order.number.clone(),
            total: order.quote.total(),
            item_count: order.item_count(),
            delivery: order.delivery,
            estimated_delivery: order.delivery.dates_from(order.placed_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_numbers_have_prefix_and_eight_digits() {
        let mut rng = StdRng::seed_from_u64(7);

        let number = OrderNumber::generate(&mut rng);
        let digits = number.as_str().trim_start_matches(ORDER_NUMBER_PREFIX);

        assert!(number.as_str().starts_with(ORDER_NUMBER_PREFIX));
        assert_eq!(digits.len(), 8);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn cancellation_only_before_shipping() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn skipping_and_reversing_are_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));

        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn delivery_dates_count_calendar_days() -> TestResult {
        let placed_at: Timestamp = "2026-03-27T15:00:00Z".parse()?;

        let (earliest, latest) = DeliveryWindow::default().dates_from(placed_at)?;

        assert_eq!(earliest, date(2026, 4, 3));
        assert_eq!(latest, date(2026, 4, 11));

        Ok(())
    }
}

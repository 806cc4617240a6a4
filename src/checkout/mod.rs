//! Checkout
//!
//! A four step form (personal details, address, payment, review) that turns a
//! cart into a stored order. Each step must be complete before moving on, and
//! submission re-checks every step.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    cart::Cart,
    config::Settings,
    orders::{
        DeliveryWindow, Order, OrderConfirmation, OrderLine, OrderNumber, OrderStatus,
        OrdersRepository, OrdersRepositoryError,
    },
    prices::PriceError,
    pricing::{PaymentMethod, PricingConfig, PricingError, Quote},
};

mod form;

pub use form::{CheckoutForm, CheckoutStep, FormField};

fn field_list(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields of a step are blank.
    #[error("{step} step is missing: {}", field_list(.fields))]
    MissingFields {
        /// Step that failed validation
        step: CheckoutStep,
        /// Every blank required field
        fields: Vec<FormField>,
    },

    /// Submission attempted before reaching the review step.
    #[error("orders can only be submitted from the review step, currently at {0}")]
    NotAtReview(CheckoutStep),

    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Wrapped orders repository error.
    #[error(transparent)]
    Orders(#[from] OrdersRepositoryError),

    /// Delivery dates could not be computed.
    #[error(transparent)]
    Delivery(#[from] jiff::Error),
}

/// Checkout behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Simulated payment processing delay
    pub submit_delay_ms: u64,

    /// Delivery estimate given on confirmation
    pub delivery: DeliveryWindow,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2_000,
            delivery: DeliveryWindow::default(),
        }
    }
}

/// Checkout state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkout {
    step: CheckoutStep,
    form: CheckoutForm,
}

impl Checkout {
    /// Start a checkout at the personal step with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a checkout with a pre-filled form.
    pub fn with_form(form: CheckoutForm) -> Self {
        Self {
            step: CheckoutStep::Personal,
            form,
        }
    }

    /// Current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Form contents.
    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Editable form contents.
    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    /// Check the required fields of `step`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing every blank required field.
    pub fn validate_step(&self, step: CheckoutStep) -> Result<(), CheckoutError> {
        let fields = self.form.missing_fields(step);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields { step, fields })
        }
    }

    /// Advance to the next step if the current one is complete.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] and stays on the current step.
    pub fn next_step(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.validate_step(self.step)?;

        self.step = self.step.next();

        debug!(step = %self.step, "checkout advanced");

        Ok(self.step)
    }

    /// Go back one step.
    pub fn prev_step(&mut self) -> CheckoutStep {
        self.step = self.step.prev();

        self.step
    }

    /// Price the cart with the services and payment method chosen on the form.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if pricing fails.
    pub fn quote(&self, cart: &Cart, pricing: &PricingConfig) -> Result<Quote, CheckoutError> {
        Ok(cart.quote(&self.form.quote_request(), pricing)?)
    }

    /// Place the order.
    ///
    /// Re-validates every step, prices the cart, waits for the simulated
    /// payment, stores the order and clears the cart. The checkout starts over
    /// once the order is stored.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotAtReview`]: the review step has not been reached.
    /// - [`CheckoutError::MissingFields`]: a step is incomplete.
    /// - [`CheckoutError::EmptyCart`]: there is nothing to order.
    /// - [`CheckoutError::Pricing`]: the quote or installment count is invalid.
    /// - [`CheckoutError::Orders`]: the order could not be stored.
    pub async fn submit(
        &mut self,
        cart: &mut Cart,
        orders: &dyn OrdersRepository,
        settings: &Settings,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::NotAtReview(self.step));
        }

        for step in CheckoutStep::ALL {
            self.validate_step(step)?;
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let quote = self.quote(cart, &settings.pricing)?;

        let installments = match self.form.payment_method {
            PaymentMethod::Credit => {
                let count = self.form.installments;

                quote.installments(count, settings.pricing.max_installments)?;

                count
            }
            PaymentMethod::Debit | PaymentMethod::Pix => 1,
        };

        let lines = cart
            .iter()
            .map(|item| {
                Ok(OrderLine {
                    product_id: item.product().id.clone(),
                    name: item.product().name.clone(),
                    unit_price: *item.unit_price(),
                    quantity: item.quantity(),
                    line_total: item.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, PriceError>>()?;

        info!(
            total = %quote.total(),
            items = cart.item_count(),
            payment = ?self.form.payment_method,
            "submitting order"
        );

        tokio::time::sleep(Duration::from_millis(settings.checkout.submit_delay_ms)).await;

        let number = OrderNumber::generate(&mut rand::thread_rng());

        let order = Order {
            uuid: Uuid::now_v7(),
            number,
            placed_at: Timestamp::now(),
            customer: self.form.customer(),
            shipping_address: self.form.address(),
            lines,
            quote,
            payment: self.form.payment_method,
            installments,
            services: self.form.services(),
            status: OrderStatus::Pending,
            delivery: settings.checkout.delivery,
        };

        let order = orders.create_order(order).await?;
        let confirmation = OrderConfirmation::for_order(&order)?;

        cart.clear();
        *self = Self::default();

        info!(order = %confirmation.number, "order placed");

        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        coupons::CouponBook,
        orders::{InMemoryOrdersRepository, MockOrdersRepository},
        prices::brl,
        products::tests::product,
    };

    use super::*;

    fn complete_form(payment_method: PaymentMethod) -> CheckoutForm {
        CheckoutForm {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "(11) 98765-4321".to_string(),
            cpf: "123.456.789-00".to_string(),
            cep: "01310-100".to_string(),
            street: "Av. Paulista".to_string(),
            number: "1000".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            payment_method,
            card_number: "4111 1111 1111 1111".to_string(),
            card_name: "ANA SOUZA".to_string(),
            card_expiry: "12/30".to_string(),
            card_cvv: "123".to_string(),
            ..CheckoutForm::default()
        }
    }

    fn at_review(form: CheckoutForm) -> TestResult<Checkout> {
        let mut checkout = Checkout::with_form(form);

        checkout.next_step()?;
        checkout.next_step()?;
        checkout.next_step()?;

        Ok(checkout)
    }

    fn filled_cart() -> TestResult<Cart> {
        let mut cart = Cart::default();

        cart.add_item(product("p1", 10_000), 2)?;

        Ok(cart)
    }

    #[test]
    fn personal_step_blocks_until_complete() {
        let mut checkout = Checkout::new();

        checkout.form_mut().name = "Ana".to_string();
        checkout.form_mut().email = "ana@example.com".to_string();

        assert!(matches!(
            checkout.next_step(),
            Err(CheckoutError::MissingFields { step: CheckoutStep::Personal, ref fields })
                if fields == &[FormField::Phone, FormField::Cpf]
        ));

        assert_eq!(checkout.step(), CheckoutStep::Personal);
    }

    #[test]
    fn credit_payment_requires_card_fields() -> TestResult {
        let mut form = complete_form(PaymentMethod::Credit);
        form.card_cvv = String::new();

        let mut checkout = Checkout::with_form(form);

        checkout.next_step()?;
        checkout.next_step()?;

        assert!(matches!(
            checkout.next_step(),
            Err(CheckoutError::MissingFields { step: CheckoutStep::Payment, ref fields })
                if fields == &[FormField::CardCvv]
        ));

        Ok(())
    }

    #[test]
    fn pix_skips_card_fields() -> TestResult {
        let form = CheckoutForm {
            card_number: String::new(),
            card_name: String::new(),
            card_expiry: String::new(),
            card_cvv: String::new(),
            ..complete_form(PaymentMethod::Pix)
        };

        let checkout = at_review(form)?;

        assert_eq!(checkout.step(), CheckoutStep::Review);

        Ok(())
    }

    #[test]
    fn review_is_the_last_step() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Credit))?;

        assert_eq!(checkout.next_step()?, CheckoutStep::Review);
        assert_eq!(checkout.prev_step(), CheckoutStep::Payment);
        assert_eq!(checkout.prev_step(), CheckoutStep::Address);
        assert_eq!(checkout.prev_step(), CheckoutStep::Personal);
        assert_eq!(checkout.prev_step(), CheckoutStep::Personal);

        Ok(())
    }

    #[test]
    fn missing_fields_message_lists_labels() {
        let error = CheckoutError::MissingFields {
            step: CheckoutStep::Payment,
            fields: vec![FormField::CardNumber, FormField::CardCvv],
        };

        assert_eq!(
            error.to_string(),
            "payment step is missing: card number, card cvv"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submit_stores_order_and_clears_cart() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Credit))?;
        let mut cart = filled_cart()?;
        cart.apply_coupon("FRETE20", &CouponBook::default())?;

        let orders = InMemoryOrdersRepository::new();
        let settings = Settings::default();

        let confirmation = checkout.submit(&mut cart, &orders, &settings).await?;

        assert_eq!(confirmation.total, brl(18_990));
        assert_eq!(confirmation.item_count, 2);
        assert!(confirmation.number.as_str().starts_with("DEC-"));

        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert_eq!(checkout.step(), CheckoutStep::Personal);

        let stored = orders.get_order(&confirmation.number).await?;

        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.customer.name, "Ana Souza");
        assert_eq!(stored.lines.len(), 1);
        assert_eq!(stored.quote.coupon(), Some("FRETE20"));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn submit_waits_for_simulated_payment() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Pix))?;
        let mut cart = filled_cart()?;
        let orders = InMemoryOrdersRepository::new();
        let settings = Settings::default();

        let started = tokio::time::Instant::now();

        checkout.submit(&mut cart, &orders, &settings).await?;

        assert!(started.elapsed() >= Duration::from_millis(2_000));

        Ok(())
    }

    #[tokio::test]
    async fn submit_requires_review_step() -> TestResult {
        let mut checkout = Checkout::with_form(complete_form(PaymentMethod::Pix));
        let mut cart = filled_cart()?;
        let orders = InMemoryOrdersRepository::new();

        let result = checkout
            .submit(&mut cart, &orders, &Settings::default())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::NotAtReview(CheckoutStep::Personal))
        ));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn submit_rejects_empty_cart() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Pix))?;
        let mut cart = Cart::default();
        let orders = InMemoryOrdersRepository::new();

        let result = checkout
            .submit(&mut cart, &orders, &Settings::default())
            .await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[tokio::test]
    async fn submit_revalidates_edited_form() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Pix))?;
        checkout.form_mut().city = " ".to_string();

        let mut cart = filled_cart()?;
        let orders = InMemoryOrdersRepository::new();

        let result = checkout
            .submit(&mut cart, &orders, &Settings::default())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::MissingFields {
                step: CheckoutStep::Address,
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn submit_rejects_too_many_installments() -> TestResult {
        let mut form = complete_form(PaymentMethod::Credit);
        form.installments = 13;

        let mut checkout = at_review(form)?;
        let mut cart = filled_cart()?;
        let orders = InMemoryOrdersRepository::new();

        let result = checkout
            .submit(&mut cart, &orders, &Settings::default())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::Pricing(PricingError::InvalidInstallments {
                requested: 13,
                max: 12
            }))
        ));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn repository_failure_keeps_cart() -> TestResult {
        let mut checkout = at_review(complete_form(PaymentMethod::Debit))?;
        let mut cart = filled_cart()?;

        let mut orders = MockOrdersRepository::new();

        orders
            .expect_create_order()
            .once()
            .returning(|order| Err(OrdersRepositoryError::AlreadyExists(order.number)));

        let result = checkout
            .submit(&mut cart, &orders, &Settings::default())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::Orders(OrdersRepositoryError::AlreadyExists(_)))
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(checkout.step(), CheckoutStep::Review);

        Ok(())
    }
}

//! Checkout Form

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    orders::{Address, Customer},
    pricing::{PaymentMethod, QuoteRequest, Services},
};

/// The four checkout steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    /// Name, email, phone and CPF
    #[default]
    Personal,

    /// Delivery address
    Address,

    /// Payment method and card details
    Payment,

    /// Final confirmation
    Review,
}

impl CheckoutStep {
    /// Steps in the order they are completed.
    pub const ALL: [CheckoutStep; 4] = [Self::Personal, Self::Address, Self::Payment, Self::Review];

    /// One-based step number shown to the customer.
    pub fn number(self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Address => 2,
            Self::Payment => 3,
            Self::Review => 4,
        }
    }

    /// Following step; `Review` stays put.
    pub fn next(self) -> Self {
        match self {
            Self::Personal => Self::Address,
            Self::Address => Self::Payment,
            Self::Payment | Self::Review => Self::Review,
        }
    }

    /// Preceding step; `Personal` stays put.
    pub fn prev(self) -> Self {
        match self {
            Self::Personal | Self::Address => Self::Personal,
            Self::Payment => Self::Address,
            Self::Review => Self::Payment,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Personal => "personal",
            Self::Address => "address",
            Self::Payment => "payment",
            Self::Review => "review",
        };

        f.write_str(label)
    }
}

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// CPF
    Cpf,
    /// CEP
    Cep,
    /// Street
    Street,
    /// House number
    Number,
    /// Neighbourhood
    Neighborhood,
    /// City
    City,
    /// State
    State,
    /// Card number
    CardNumber,
    /// Name on card
    CardName,
    /// Card expiry
    CardExpiry,
    /// Card security code
    CardCvv,
}

impl FormField {
    /// Field label as shown on the form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Cpf => "cpf",
            Self::Cep => "cep",
            Self::Street => "street",
            Self::Number => "number",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::State => "state",
            Self::CardNumber => "card number",
            Self::CardName => "card name",
            Self::CardExpiry => "card expiry",
            Self::CardCvv => "card cvv",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the customer types during checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Taxpayer id (CPF)
    pub cpf: String,

    /// Postal code (CEP)
    pub cep: String,
    /// Street
    pub street: String,
    /// House number
    pub number: String,
    /// Apartment, block, etc. (optional)
    pub complement: String,
    /// Neighbourhood
    pub neighborhood: String,
    /// City
    pub city: String,
    /// State abbreviation
    pub state: String,

    /// How the customer pays
    pub payment_method: PaymentMethod,
    /// Card number
    pub card_number: String,
    /// Name printed on the card
    pub card_name: String,
    /// Expiry as MM/YY
    pub card_expiry: String,
    /// Security code
    pub card_cvv: String,
    /// Credit card installments
    pub installments: u32,

    /// Book professional installation
    pub needs_installation: bool,
    /// Book a measurement visit
    pub needs_measurement: bool,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            cpf: String::new(),
            cep: String::new(),
            street: String::new(),
            number: String::new(),
            complement: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            payment_method: PaymentMethod::default(),
            card_number: String::new(),
            card_name: String::new(),
            card_expiry: String::new(),
            card_cvv: String::new(),
            installments: 1,
            needs_installation: false,
            needs_measurement: false,
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl CheckoutForm {
    /// Required fields of `step` that are still blank, in form order.
    pub fn missing_fields(&self, step: CheckoutStep) -> Vec<FormField> {
        let required: Vec<(FormField, &str)> = match step {
            CheckoutStep::Personal => vec![
                (FormField::Name, self.name.as_str()),
                (FormField::Email, self.email.as_str()),
                (FormField::Phone, self.phone.as_str()),
                (FormField::Cpf, self.cpf.as_str()),
            ],
            CheckoutStep::Address => vec![
                (FormField::Cep, self.cep.as_str()),
                (FormField::Street, self.street.as_str()),
                (FormField::Number, self.number.as_str()),
                (FormField::Neighborhood, self.neighborhood.as_str()),
                (FormField::City, self.city.as_str()),
                (FormField::State, self.state.as_str()),
            ],
            CheckoutStep::Payment if self.payment_method == PaymentMethod::Credit => vec![
                (FormField::CardNumber, self.card_number.as_str()),
                (FormField::CardName, self.card_name.as_str()),
                (FormField::CardExpiry, self.card_expiry.as_str()),
                (FormField::CardCvv, self.card_cvv.as_str()),
            ],
            CheckoutStep::Payment | CheckoutStep::Review => Vec::new(),
        };

        required
            .into_iter()
            .filter(|(_, value)| blank(value))
            .map(|(field, _)| field)
            .collect()
    }

    /// Customer details from the personal step.
    pub fn customer(&self) -> Customer {
        Customer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
        }
    }

    /// Delivery address from the address step.
    pub fn address(&self) -> Address {
        let complement = self.complement.trim();

        Address {
            cep: self.cep.trim().to_string(),
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            complement: (!complement.is_empty()).then(|| complement.to_string()),
            neighborhood: self.neighborhood.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
        }
    }

    /// Requested add-on services.
    pub fn services(&self) -> Services {
        Services {
            installation: self.needs_installation,
            measurement: self.needs_measurement,
        }
    }

    /// What to price on top of the cart contents.
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            services: self.services(),
            payment: Some(self.payment_method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_saturate_at_both_ends() {
        assert_eq!(CheckoutStep::Review.next(), CheckoutStep::Review);
        assert_eq!(CheckoutStep::Personal.prev(), CheckoutStep::Personal);
        assert_eq!(CheckoutStep::Payment.next(), CheckoutStep::Review);
        assert_eq!(CheckoutStep::Payment.prev(), CheckoutStep::Address);
    }

    #[test]
    fn step_numbers_follow_order() {
        let numbers: Vec<u8> = CheckoutStep::ALL.iter().map(|step| step.number()).collect();

        assert_eq!(numbers, [1, 2, 3, 4]);
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let form = CheckoutForm {
            name: "  ".to_string(),
            email: "ana@example.com".to_string(),
            phone: "\t".to_string(),
            cpf: "123.456.789-00".to_string(),
            ..CheckoutForm::default()
        };

        assert_eq!(
            form.missing_fields(CheckoutStep::Personal),
            [FormField::Name, FormField::Phone]
        );
    }

    #[test]
    fn card_fields_only_required_for_credit() {
        let mut form = CheckoutForm::default();

        assert_eq!(form.missing_fields(CheckoutStep::Payment).len(), 4);

        form.payment_method = PaymentMethod::Pix;
        assert!(form.missing_fields(CheckoutStep::Payment).is_empty());

        form.payment_method = PaymentMethod::Debit;
        assert!(form.missing_fields(CheckoutStep::Payment).is_empty());
    }

    #[test]
    fn blank_complement_is_dropped() {
        let form = CheckoutForm {
            street: " Rua das Flores ".to_string(),
            complement: " ".to_string(),
            ..CheckoutForm::default()
        };

        let address = form.address();

        assert_eq!(address.street, "Rua das Flores");
        assert_eq!(address.complement, None);
    }

    #[test]
    fn quote_request_carries_services_and_payment() {
        let form = CheckoutForm {
            payment_method: PaymentMethod::Pix,
            needs_installation: true,
            ..CheckoutForm::default()
        };

        let request = form.quote_request();

        assert!(request.services.installation);
        assert!(!request.services.measurement);
        assert_eq!(request.payment, Some(PaymentMethod::Pix));
    }
}

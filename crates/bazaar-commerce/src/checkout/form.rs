//! Checkout form: customer details and payment choice.

use crate::validation::FieldErrors;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Easypaisa mobile wallet.
    Easypaisa,
    /// JazzCash mobile wallet.
    Jazzcash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Easypaisa => "easypaisa",
            PaymentMethod::Jazzcash => "jazzcash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on Delivery",
            PaymentMethod::Easypaisa => "Easypaisa",
            PaymentMethod::Jazzcash => "JazzCash",
        }
    }

    /// Wallet payments need an account number and transaction id.
    pub fn requires_details(&self) -> bool {
        !matches!(self, PaymentMethod::Cod)
    }

    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        match s.to_lowercase().as_str() {
            "cod" | "cash" => Ok(PaymentMethod::Cod),
            "easypaisa" => Ok(PaymentMethod::Easypaisa),
            "jazzcash" => Ok(PaymentMethod::Jazzcash),
            _ => Err(CommerceError::UnknownValue {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

/// Wallet payment proof.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentDetails {
    pub account_number: String,
    pub transaction_id: String,
}

/// Contact and shipping fields of the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl Customer {
    /// Trim every field.
    pub fn normalized(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            province: self.province.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
        }
    }

    fn validate(&self, errors: &mut FieldErrors) {
        errors.require("full_name", "Full name", &self.full_name);
        errors.require("phone", "Phone", &self.phone);
        errors.require_email("email", &self.email);
        errors.require("address", "Address", &self.address);
        errors.require("city", "City", &self.city);
        errors.require("province", "Province", &self.province);
        errors.require("postal_code", "Postal code", &self.postal_code);
    }
}

/// Everything the shopper fills in at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutForm {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_details: Option<PaymentDetails>,
}

impl CheckoutForm {
    /// Collect field-level errors for the form.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        self.customer.validate(&mut errors);

        match (&self.payment_details, self.payment_method.requires_details()) {
            (Some(details), true) => {
                errors.require(
                    "payment_details.account_number",
                    "Account number",
                    &details.account_number,
                );
                errors.require(
                    "payment_details.transaction_id",
                    "Transaction ID",
                    &details.transaction_id,
                );
            }
            (None, true) => {
                errors.add(
                    "payment_details",
                    format!(
                        "Payment details are required for {}",
                        self.payment_method.display_name()
                    ),
                );
            }
            (Some(_), false) => {
                errors.add(
                    "payment_details",
                    "Payment details are not accepted for cash on delivery",
                );
            }
            (None, false) => {}
        }

        errors
    }
}

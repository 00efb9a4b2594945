//! Rent (payment) model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    checkout::checkout_label,
    common::Audit,
    enums::{PayStatus, RecordStatus},
};

/// Rent row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rent {
    pub id: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub audit: Audit,
    pub checkout_id: Option<i32>,
    pub days: i32,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub order_no: String,
    pub trade_no: String,
    pub pay_status: PayStatus,
}

/// Decimal places of `amount`
pub const AMOUNT_SCALE: u32 = 2;

/// Rent label: "<book>:<amount>", or "0.0" when the rent has no checkout
pub fn rent_label(book_name: Option<&str>, amount: Decimal) -> String {
    match book_name {
        Some(book) => format!("{}:{:.2}", book, amount),
        None => "0.0".to_string(),
    }
}

/// Rent with its checkout label
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RentDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rent: Rent,
    #[serde(skip)]
    pub book_name: Option<String>,
    #[serde(skip)]
    pub username: Option<String>,
    #[sqlx(skip)]
    pub checkout_label: String,
    #[sqlx(skip)]
    pub label: String,
}

impl RentDetails {
    pub fn finish(mut self) -> Self {
        // NUMERIC(10,2) zero comes back without its scale
        self.rent.amount.rescale(AMOUNT_SCALE);
        self.checkout_label = checkout_label(self.book_name.as_deref(), self.username.as_deref());
        self.label = rent_label(self.book_name.as_deref(), self.rent.amount);
        self
    }
}

/// Rent list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RentQuery {
    pub status: Option<RecordStatus>,
    pub pay_status: Option<PayStatus>,
    pub checkout_id: Option<i32>,
    /// Substring of the order or trade number
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create rent request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRent {
    pub checkout_id: Option<i32>,
    #[validate(range(min = 1, message = "A rent covers at least one day"))]
    pub days: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[validate(length(max = 50))]
    pub order_no: Option<String>,
    #[validate(length(max = 50))]
    pub trade_no: Option<String>,
    pub pay_status: Option<PayStatus>,
    pub status: Option<RecordStatus>,
}

/// Update rent request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRent {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub checkout_id: Option<Option<i32>>,
    #[validate(range(min = 1, message = "A rent covers at least one day"))]
    pub days: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[validate(length(max = 50))]
    pub order_no: Option<String>,
    #[validate(length(max = 50))]
    pub trade_no: Option<String>,
    pub pay_status: Option<PayStatus>,
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_label() {
        assert_eq!(rent_label(Some("Dune"), Decimal::new(1250, 2)), "Dune:12.50");
        assert_eq!(rent_label(None, Decimal::new(1250, 2)), "0.0");
    }

    #[test]
    fn test_zero_amount_keeps_two_places() {
        assert_eq!(rent_label(Some("Dune"), Decimal::ZERO), "Dune:0.00");
        assert_eq!(rent_label(Some("Dune"), Decimal::new(5, 0)), "Dune:5.00");

        let mut amount = Decimal::ZERO;
        amount.rescale(AMOUNT_SCALE);
        assert_eq!(amount.to_string(), "0.00");
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"0.00\"");
    }
}

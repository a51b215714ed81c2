use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    forms::{FieldErrors, FormData, parse_count},
    models::{Product, ProductRequest, Profile},
    workflow::RequestCounts,
};

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct ProductRequestForm {
    pub product_id: String,
    /// Units wanted, at least one.
    pub quantity: String,
    pub message: String,
}

impl ProductRequestForm {
    pub fn clean_quantity(&self) -> Result<i32, FieldErrors> {
        parse_count(&self.quantity)
            .filter(|quantity| *quantity >= 1)
            .ok_or_else(|| FieldErrors::single("quantity", "Enter a whole number of at least 1."))
    }
}

#[derive(Debug)]
pub enum CustomerAction {
    SendRequest(ProductRequestForm),
}

impl CustomerAction {
    pub fn from_form(data: &FormData) -> AppResult<Self> {
        if data.has("send_request") {
            return Ok(Self::SendRequest(data.bind()?));
        }
        Err(AppError::BadRequest("unknown customer dashboard action".into()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDashboard {
    pub profile: Profile,
    /// Every farmer's products.
    pub products: Vec<Product>,
    /// Own requests, newest first.
    pub requests: Vec<ProductRequest>,
    pub counts: RequestCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        let form = |quantity: &str| ProductRequestForm {
            product_id: String::new(),
            quantity: quantity.into(),
            message: String::new(),
        };
        assert_eq!(form("3").clean_quantity().unwrap(), 3);
        assert!(form("0").clean_quantity().is_err());
        assert!(form("").clean_quantity().is_err());
    }
}

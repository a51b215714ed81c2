use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::request_decision,
    error::{AppError, AppResult},
    forms::{FieldErrors, FormData, parse_count, parse_price, trim_field},
    models::{FarmerDetails, Land, LandRequest, Product, ProductRequest, Profile},
    workflow::{RequestAction, RequestCounts},
};

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
#[serde(default)]
pub struct FarmerDetailsForm {
    #[validate(length(min = 1, max = 100, message = "Enter a name of at most 100 characters."))]
    pub farmer_name: String,
    #[validate(length(min = 1, max = 15, message = "Enter a phone number of at most 15 characters."))]
    pub phone: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// Whole years, zero or more.
    pub experience_years: String,
    #[validate(length(min = 1, max = 100, message = "Enter at most 100 characters."))]
    pub field_experience: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
}

#[derive(Debug)]
pub struct FarmerDetailsInput {
    pub farmer_name: String,
    pub phone: String,
    pub email: String,
    pub experience_years: i32,
    pub field_experience: String,
    pub description: String,
}

impl FarmerDetailsForm {
    fn normalise(&mut self) {
        trim_field(&mut self.farmer_name);
        trim_field(&mut self.phone);
        trim_field(&mut self.email);
        trim_field(&mut self.field_experience);
        trim_field(&mut self.description);
    }

    pub fn clean(mut self) -> Result<FarmerDetailsInput, FieldErrors> {
        self.normalise();
        let mut errors = FieldErrors::from_validation(self.validate());
        let experience_years = parse_count(&self.experience_years);
        if experience_years.is_none() {
            errors.add("experience_years", "Enter a whole number of years.");
        }
        match experience_years {
            Some(experience_years) if errors.is_empty() => Ok(FarmerDetailsInput {
                farmer_name: self.farmer_name,
                phone: self.phone,
                email: self.email,
                experience_years,
                field_experience: self.field_experience,
                description: self.description,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
#[serde(default)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200, message = "Enter a name of at most 200 characters."))]
    pub name: String,
    /// Decimal amount with up to two fractional digits, e.g. `42.50`.
    pub price: String,
    /// Available quantity, zero or more.
    pub quantity: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
}

#[derive(Debug)]
pub struct ProductInput {
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub description: String,
}

impl ProductForm {
    pub fn clean(mut self) -> Result<ProductInput, FieldErrors> {
        trim_field(&mut self.name);
        trim_field(&mut self.description);
        let mut errors = FieldErrors::from_validation(self.validate());
        let price = parse_price(&self.price);
        if price.is_none() {
            errors.add(
                "price",
                "Enter a price up to 999999.99 with at most 2 decimal places.",
            );
        }
        let quantity = parse_count(&self.quantity);
        if quantity.is_none() {
            errors.add("quantity", "Enter a whole number, zero or more.");
        }
        match (price, quantity) {
            (Some(price), Some(quantity)) if errors.is_empty() => Ok(ProductInput {
                name: self.name,
                price,
                quantity,
                description: self.description,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct LandRequestForm {
    pub land_id: String,
    /// Optional note to the landowner.
    pub message: String,
}

/// What a post to the farmer dashboard asks for, picked by the submit button.
#[derive(Debug)]
pub enum FarmerAction {
    SaveDetails(FarmerDetailsForm),
    AddProduct(ProductForm),
    UpdateProduct {
        product_id: String,
        form: ProductForm,
    },
    SendRequest(LandRequestForm),
    DecideProductRequest {
        request_id: String,
        action: RequestAction,
    },
}

impl FarmerAction {
    pub fn from_form(data: &FormData) -> AppResult<Self> {
        if data.has("save_farmer") {
            return Ok(Self::SaveDetails(data.bind()?));
        }
        if data.has("add_product") {
            return Ok(Self::AddProduct(data.bind()?));
        }
        if data.has("update_product") {
            return Ok(Self::UpdateProduct {
                product_id: data.get("product_id").unwrap_or_default().to_string(),
                form: data.bind()?,
            });
        }
        if data.has("send_request") {
            return Ok(Self::SendRequest(data.bind()?));
        }
        if let Some((request_id, action)) = request_decision(data) {
            return Ok(Self::DecideProductRequest { request_id, action });
        }
        Err(AppError::BadRequest("unknown farmer dashboard action".into()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FarmerDashboard {
    pub profile: Profile,
    pub details: Option<FarmerDetails>,
    /// Every landowner's listings.
    pub lands: Vec<Land>,
    /// Own land requests, newest first.
    pub requests: Vec<LandRequest>,
    pub counts: RequestCounts,
    pub products: Vec<Product>,
    /// Customer requests against own products, newest first.
    pub product_requests: Vec<ProductRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_form_parses_numbers() {
        let input = ProductForm {
            name: " Tomatoes ".into(),
            price: "42.5".into(),
            quantity: "10".into(),
            description: "Fresh".into(),
        }
        .clean()
        .unwrap();
        assert_eq!(input.name, "Tomatoes");
        assert_eq!(input.price, 4250);
        assert_eq!(input.quantity, 10);
    }

    #[test]
    fn product_form_flags_bad_numbers() {
        let errors = ProductForm {
            name: "Okra".into(),
            price: "1.999".into(),
            quantity: "-2".into(),
            description: "Green".into(),
        }
        .clean()
        .unwrap_err();
        assert!(errors.contains("price"));
        assert!(errors.contains("quantity"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let errors = FarmerDetailsForm {
            farmer_name: "  ".into(),
            phone: "12345".into(),
            email: " ravi@example.com ".into(),
            experience_years: "3".into(),
            field_experience: "   ".into(),
            description: "Grows rice".into(),
        }
        .clean()
        .unwrap_err();
        assert!(errors.contains("farmer_name"));
        assert!(errors.contains("field_experience"));
        assert!(!errors.contains("email"));

        let errors = ProductForm {
            name: " ".into(),
            price: "10".into(),
            quantity: "1".into(),
            description: "\n".into(),
        }
        .clean()
        .unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
    }

    #[test]
    fn details_need_whole_years() {
        let errors = FarmerDetailsForm {
            farmer_name: "Ravi".into(),
            phone: "12345".into(),
            email: "ravi@example.com".into(),
            experience_years: "three".into(),
            field_experience: "Paddy".into(),
            description: "Grows rice".into(),
        }
        .clean()
        .unwrap_err();
        assert_eq!(
            errors.messages("experience_years"),
            ["Enter a whole number of years."]
        );
    }

    #[test]
    fn action_follows_the_pressed_button() {
        let data = FormData::from_pairs([("send_request", ""), ("land_id", "5"), ("message", "hi")]);
        match FarmerAction::from_form(&data).unwrap() {
            FarmerAction::SendRequest(form) => {
                assert_eq!(form.land_id, "5");
                assert_eq!(form.message, "hi");
            }
            other => panic!("unexpected action {other:?}"),
        }

        let data = FormData::from_pairs([("request_id", "abc"), ("reject_request", "")]);
        assert!(matches!(
            FarmerAction::from_form(&data).unwrap(),
            FarmerAction::DecideProductRequest {
                action: RequestAction::Reject,
                ..
            }
        ));

        let data = FormData::from_pairs([("land_id", "5")]);
        assert!(matches!(
            FarmerAction::from_form(&data),
            Err(AppError::BadRequest(_))
        ));
    }
}

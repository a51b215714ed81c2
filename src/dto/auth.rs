use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entity::sea_orm_active_enums::{Role, parse_choice},
    forms::{FieldErrors, trim_field},
    models::{Profile, User},
};

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
#[serde(default)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 100, message = "Enter a name of at most 100 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 15, message = "Enter a phone number of at most 15 characters."))]
    pub phone: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    /// One of `farmer`, `landowner`, `customer`.
    #[serde(alias = "role")]
    pub user_type: String,
}

#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignupForm {
    fn normalise(&mut self) {
        trim_field(&mut self.name);
        trim_field(&mut self.phone);
        trim_field(&mut self.user_type);
        self.email = self.email.trim().to_lowercase();
    }

    pub fn clean(mut self) -> Result<SignupInput, FieldErrors> {
        self.normalise();
        let mut errors = FieldErrors::from_validation(self.validate());
        let role = parse_choice::<Role>(&self.user_type);
        if role.is_none() {
            errors.add("user_type", "Select a valid choice.");
        }
        match role {
            Some(role) if errors.is_empty() => Ok(SignupInput {
                name: self.name,
                phone: self.phone,
                email: self.email,
                password: self.password,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    /// The account email.
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub profile: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupPage {
    pub fields: Vec<String>,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPage {
    pub fields: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

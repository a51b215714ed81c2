use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginForm, LoginPage, LoginResponse, SignupForm, SignupPage},
        customer::{CustomerDashboard, ProductRequestForm},
        farmer::{FarmerDashboard, FarmerDetailsForm, LandRequestForm, ProductForm},
        landowner::{LandForm, LandownerDashboard},
    },
    entity::sea_orm_active_enums::{RequestStatus, Role, SoilType, SuitableFor},
    forms::FieldErrors,
    middleware::auth::SESSION_COOKIE,
    models::{FarmerDetails, Image, Land, LandRequest, Product, ProductRequest, Profile, User},
    response::ApiResponse,
    routes::{auth, customer, farmer, health, landowner, pages},
    workflow::RequestCounts,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        pages::landing,
        pages::dispatch,
        auth::signup_page,
        auth::signup,
        auth::login_page,
        auth::login,
        auth::logout,
        farmer::dashboard,
        farmer::dashboard_action,
        farmer::delete_details,
        farmer::delete_product,
        farmer::cancel_request,
        landowner::dashboard,
        landowner::dashboard_action,
        landowner::delete_land,
        customer::dashboard,
        customer::dashboard_action,
        customer::cancel_request
    ),
    components(
        schemas(
            User,
            Profile,
            FarmerDetails,
            Image,
            Land,
            LandRequest,
            Product,
            ProductRequest,
            Role,
            RequestStatus,
            SoilType,
            SuitableFor,
            RequestCounts,
            FieldErrors,
            SignupForm,
            LoginForm,
            FarmerDetailsForm,
            ProductForm,
            LandRequestForm,
            LandForm,
            ProductRequestForm,
            SignupPage,
            LoginPage,
            LoginResponse,
            FarmerDashboard,
            LandownerDashboard,
            CustomerDashboard,
            pages::Landing,
            ApiResponse<LoginResponse>,
            ApiResponse<FarmerDashboard>,
            ApiResponse<LandownerDashboard>,
            ApiResponse<CustomerDashboard>
        )
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Pages", description = "Landing page and dashboard dispatch"),
        (name = "Auth", description = "Signup, login and logout"),
        (name = "Farmer", description = "Farmer dashboard: details, products, land requests"),
        (name = "Landowner", description = "Landowner dashboard: land listings and requests"),
        (name = "Customer", description = "Customer dashboard: product requests"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_dashboard_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/farmer/dashboard/",
            "/landowner/dashboard/",
            "/customer/dashboard/",
            "/landowner/delete-land/{id}/",
            "/farmer/cancel-request/{id}/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

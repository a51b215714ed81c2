use agrilink::{
    config::AppConfig,
    db::{create_orm_conn, prepare_schema},
    dto::{
        auth::{LoginForm, SignupForm},
        customer::ProductRequestForm,
        farmer::{FarmerDetailsForm, LandRequestForm, ProductForm},
        landowner::LandForm,
    },
    entity::{
        FarmerDetails, LandImages, LandRequests, Lands, ProductRequests, Products, Profiles, Users,
        sea_orm_active_enums::{RequestStatus, Role},
        users,
    },
    error::AppError,
    forms::UploadedFile,
    middleware::auth::AuthUser,
    services::{auth_service, customer_service, farmer_service, landowner_service},
    state::AppState,
    workflow::{RequestAction, RequestCounts},
};
use axum::body::Bytes;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tempfile::TempDir;
use uuid::Uuid;

async fn setup_state() -> anyhow::Result<(AppState, TempDir)> {
    let media = tempfile::tempdir()?;
    let orm = create_orm_conn("sqlite::memory:").await?;
    prepare_schema(&orm).await?;

    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        session_ttl_hours: 1,
        media_root: media.path().to_path_buf(),
        max_upload_bytes: 1024 * 1024,
    };
    Ok((AppState::new(orm, config), media))
}

async fn signup(state: &AppState, email: &str, role: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::signup(
        state,
        SignupForm {
            name: "Test User".into(),
            phone: "9876543210".into(),
            email: email.into(),
            password: "pw".into(),
            user_type: role.into(),
        },
    )
    .await?;
    Ok(AuthUser {
        user_id: resp.user.id,
        role: resp.profile.role,
    })
}

fn land_form(name: &str) -> LandForm {
    LandForm {
        farm_name: name.into(),
        soil_type: "alluvial".into(),
        suitable_for: "both".into(),
        location: "Nashik".into(),
        description: "Five irrigated acres".into(),
    }
}

fn product_form(name: &str) -> ProductForm {
    ProductForm {
        name: name.into(),
        price: "42.50".into(),
        quantity: "10".into(),
        description: "Fresh from the field".into(),
    }
}

fn png(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.into(),
        content_type: Some("image/png".into()),
        bytes: Bytes::from_static(b"\x89PNG\r\n"),
    }
}

#[tokio::test]
async fn signup_creates_user_and_profile_then_login_succeeds() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;

    let farmer = signup(&state, "a@x.com", "farmer").await?;
    assert_eq!(farmer.role, Role::Farmer);
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    let profiles = Profiles::find().all(&state.orm).await?;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].user_id, farmer.user_id);
    assert_eq!(profiles[0].role, Role::Farmer);

    let resp = auth_service::login(
        &state,
        LoginForm {
            username: "A@X.com ".into(),
            password: "pw".into(),
        },
    )
    .await?;
    assert_eq!(resp.user.id, farmer.user_id);
    assert!(!resp.token.is_empty());

    for (username, password) in [("a@x.com", "wrong"), ("nobody@x.com", "pw")] {
        let err = auth_service::login(
            &state,
            LoginForm {
                username: username.into(),
                password: password.into(),
            },
        )
        .await
        .unwrap_err();
        match err {
            AppError::BadRequest(message) => assert_eq!(message, "Invalid email or password"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_field_error() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    signup(&state, "a@x.com", "farmer").await?;

    let err = signup(&state, "A@x.com", "customer").await.unwrap_err();
    match err.downcast::<AppError>()? {
        AppError::Validation(fields) => assert!(fields.contains("email")),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    assert_eq!(Profiles::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn email_unique_violation_maps_to_field_error() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    signup(&state, "a@x.com", "farmer").await?;

    let err = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set("a@x.com".into()),
        name: Set("Racer".into()),
        password_hash: Set("x".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .unwrap_err();
    match auth_service::user_insert_error(err) {
        AppError::Validation(fields) => assert!(fields.contains("email")),
        other => panic!("unexpected error {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn padded_email_signs_up_and_blank_name_is_rejected() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;

    let user = signup(&state, " Asha@Example.com ", "farmer").await?;
    let stored = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .expect("user row");
    assert_eq!(stored.email, "asha@example.com");

    let result = auth_service::signup(
        &state,
        SignupForm {
            name: "   ".into(),
            phone: "   ".into(),
            email: "b@x.com".into(),
            password: "pw".into(),
            user_type: "customer".into(),
        },
    )
    .await;
    match result {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains("name"));
            assert!(fields.contains("phone"));
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn dispatcher_resolves_each_role() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    for (email, tag, role) in [
        ("f@x.com", "farmer", Role::Farmer),
        ("l@x.com", "landowner", Role::Landowner),
        ("c@x.com", "customer", Role::Customer),
    ] {
        let user = signup(&state, email, tag).await?;
        assert_eq!(auth_service::resolve_role(&state, &user).await?, role);
    }

    let ghost = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Farmer,
    };
    assert!(matches!(
        auth_service::resolve_role(&state, &ghost).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn dashboards_are_gated_by_stored_role() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let farmer = signup(&state, "f@x.com", "farmer").await?;
    let customer = signup(&state, "c@x.com", "customer").await?;

    assert!(matches!(
        landowner_service::dashboard(&state, &farmer).await,
        Err(AppError::WrongRole)
    ));
    assert!(matches!(
        farmer_service::dashboard(&state, &customer).await,
        Err(AppError::WrongRole)
    ));
    assert!(customer_service::dashboard(&state, &customer).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn request_for_unknown_land_writes_nothing() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let farmer = signup(&state, "a@x.com", "farmer").await?;
    auth_service::login(
        &state,
        LoginForm {
            username: "a@x.com".into(),
            password: "pw".into(),
        },
    )
    .await?;

    for land_id in ["5".to_string(), Uuid::new_v4().to_string()] {
        let result = farmer_service::send_land_request(
            &state,
            &farmer,
            LandRequestForm {
                land_id,
                message: "Interested".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
    assert_eq!(LandRequests::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn approved_request_cannot_be_cancelled() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;

    let land = landowner_service::add_land(&state, &owner, land_form("Green Acres"), vec![]).await?;
    assert_eq!(land.phone, "9876543210");

    let request = farmer_service::send_land_request(
        &state,
        &farmer,
        LandRequestForm {
            land_id: land.id.to_string(),
            message: "Looking to lease".into(),
        },
    )
    .await?;
    assert_eq!(request.status, RequestStatus::Pending);

    let board = landowner_service::dashboard(&state, &owner).await?;
    assert_eq!(board.requests.len(), 1);
    assert_eq!(board.counts.pending, 1);

    let status = landowner_service::decide_land_request(
        &state,
        &owner,
        &request.id.to_string(),
        RequestAction::Approve,
    )
    .await?;
    assert_eq!(status, RequestStatus::Approved);

    let status = farmer_service::cancel_land_request(&state, &farmer, &request.id.to_string()).await?;
    assert_eq!(status, RequestStatus::Approved);
    let stored = LandRequests::find_by_id(request.id)
        .one(&state.orm)
        .await?
        .expect("request row");
    assert_eq!(stored.status, RequestStatus::Approved);

    let board = farmer_service::dashboard(&state, &farmer).await?;
    assert_eq!(
        board.counts,
        RequestCounts {
            pending: 0,
            approved: 1,
            rejected: 0,
            cancelled: 0,
        }
    );
    assert_eq!(board.lands.len(), 1);
    Ok(())
}

#[tokio::test]
async fn pending_request_can_be_cancelled_once() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;
    let land = landowner_service::add_land(&state, &owner, land_form("Green Acres"), vec![]).await?;
    let request = farmer_service::send_land_request(
        &state,
        &farmer,
        LandRequestForm {
            land_id: land.id.to_string(),
            message: String::new(),
        },
    )
    .await?;
    let id = request.id.to_string();

    assert_eq!(
        farmer_service::cancel_land_request(&state, &farmer, &id).await?,
        RequestStatus::Cancelled
    );
    // Decisions after the cancel leave it as is.
    assert_eq!(
        landowner_service::decide_land_request(&state, &owner, &id, RequestAction::Approve).await?,
        RequestStatus::Cancelled
    );

    let other = signup(&state, "other@x.com", "farmer").await?;
    assert!(matches!(
        farmer_service::cancel_land_request(&state, &other, &id).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn cross_owner_decision_is_not_found() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;
    let rival = signup(&state, "rival@x.com", "landowner").await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;

    let land = landowner_service::add_land(&state, &owner, land_form("Green Acres"), vec![]).await?;
    let request = farmer_service::send_land_request(
        &state,
        &farmer,
        LandRequestForm {
            land_id: land.id.to_string(),
            message: "Hello".into(),
        },
    )
    .await?;

    for action in [RequestAction::Approve, RequestAction::Reject] {
        let result =
            landowner_service::decide_land_request(&state, &rival, &request.id.to_string(), action)
                .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
    let stored = LandRequests::find_by_id(request.id)
        .one(&state.orm)
        .await?
        .expect("request row");
    assert_eq!(stored.status, RequestStatus::Pending);

    assert!(landowner_service::dashboard(&state, &rival).await?.requests.is_empty());
    assert!(matches!(
        landowner_service::delete_land(&state, &rival, &land.id.to_string()).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn deleting_land_removes_images_requests_and_files() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;

    let land = landowner_service::add_land(
        &state,
        &owner,
        land_form("Green Acres"),
        vec![png("north.png"), png("south.png")],
    )
    .await?;
    assert_eq!(land.images.len(), 2);
    let paths: Vec<_> = land
        .images
        .iter()
        .map(|image| state.media.root().join(&image.image))
        .collect();
    assert!(paths.iter().all(|path| path.exists()));

    farmer_service::send_land_request(
        &state,
        &farmer,
        LandRequestForm {
            land_id: land.id.to_string(),
            message: "Hello".into(),
        },
    )
    .await?;

    landowner_service::delete_land(&state, &owner, &land.id.to_string()).await?;

    assert_eq!(Lands::find().count(&state.orm).await?, 0);
    assert_eq!(LandImages::find().count(&state.orm).await?, 0);
    assert_eq!(LandRequests::find().count(&state.orm).await?, 0);
    assert!(paths.iter().all(|path| !path.exists()));
    assert!(farmer_service::dashboard(&state, &farmer).await?.lands.is_empty());
    assert!(landowner_service::dashboard(&state, &owner).await?.lands.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_land_submission_persists_nothing() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;

    let notes = UploadedFile {
        file_name: "notes.txt".into(),
        content_type: Some("text/plain".into()),
        bytes: Bytes::from_static(b"not an image"),
    };
    let form = LandForm {
        soil_type: "clay".into(),
        ..land_form("Green Acres")
    };
    match landowner_service::add_land(&state, &owner, form, vec![notes]).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains("soil_type"));
            assert!(fields.contains("images"));
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(Lands::find().count(&state.orm).await?, 0);
    assert_eq!(LandImages::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn blank_land_fields_persist_nothing() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;

    let form = LandForm {
        farm_name: "   ".into(),
        location: "  ".into(),
        ..land_form("unused")
    };
    match landowner_service::add_land(&state, &owner, form, vec![png("plot.png")]).await {
        Err(AppError::Validation(fields)) => {
            assert!(fields.contains("farm_name"));
            assert!(fields.contains("location"));
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(Lands::find().count(&state.orm).await?, 0);
    assert_eq!(LandImages::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn landowner_can_edit_own_listing_only() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let owner = signup(&state, "owner@x.com", "landowner").await?;
    let rival = signup(&state, "rival@x.com", "landowner").await?;
    let land = landowner_service::add_land(&state, &owner, land_form("Green Acres"), vec![]).await?;

    let updated = landowner_service::update_land(
        &state,
        &owner,
        &land.id.to_string(),
        LandForm {
            location: "Pune".into(),
            ..land_form("Green Acres East")
        },
    )
    .await?;
    assert_eq!(updated.farm_name, "Green Acres East");
    assert_eq!(updated.location, "Pune");

    assert!(matches!(
        landowner_service::update_land(&state, &rival, &land.id.to_string(), land_form("Mine")).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn farmer_details_are_upserted() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;
    let form = |years: &str| FarmerDetailsForm {
        farmer_name: "Ravi".into(),
        phone: "9000000000".into(),
        email: "ravi@x.com".into(),
        experience_years: years.into(),
        field_experience: "Paddy".into(),
        description: "Grows rice".into(),
    };

    let first = farmer_service::save_details(&state, &farmer, form("3")).await?;
    let second = farmer_service::save_details(&state, &farmer, form("4")).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.experience_years, 4);
    assert_eq!(FarmerDetails::find().count(&state.orm).await?, 1);

    let board = farmer_service::dashboard(&state, &farmer).await?;
    assert_eq!(board.details.map(|d| d.id), Some(first.id));

    farmer_service::delete_details(&state, &farmer, &first.id.to_string()).await?;
    assert_eq!(FarmerDetails::find().count(&state.orm).await?, 0);
    assert!(matches!(
        farmer_service::delete_details(&state, &farmer, &first.id.to_string()).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn product_request_flow() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;
    let other_farmer = signup(&state, "other@x.com", "farmer").await?;
    let customer = signup(&state, "customer@x.com", "customer").await?;

    let product =
        farmer_service::add_product(&state, &farmer, product_form("Tomatoes"), vec![png("t.png")])
            .await?;
    assert_eq!(product.price, 4250);
    assert_eq!(product.images.len(), 1);

    let catalog = customer_service::dashboard(&state, &customer).await?;
    assert_eq!(catalog.products.len(), 1);

    let request_form = |quantity: &str| ProductRequestForm {
        product_id: product.id.to_string(),
        quantity: quantity.into(),
        message: "For the weekend market".into(),
    };
    assert!(matches!(
        customer_service::send_product_request(&state, &customer, request_form("0")).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        customer_service::send_product_request(
            &state,
            &customer,
            ProductRequestForm {
                product_id: Uuid::new_v4().to_string(),
                ..request_form("1")
            }
        )
        .await,
        Err(AppError::NotFound)
    ));

    let first = customer_service::send_product_request(&state, &customer, request_form("3")).await?;
    let second = customer_service::send_product_request(&state, &customer, request_form("1")).await?;
    assert_eq!(first.status, RequestStatus::Pending);
    assert_eq!(first.quantity, 3);

    let board = farmer_service::dashboard(&state, &farmer).await?;
    assert_eq!(board.product_requests.len(), 2);
    assert!(farmer_service::dashboard(&state, &other_farmer)
        .await?
        .product_requests
        .is_empty());

    // Only the product's own farmer may decide.
    assert!(matches!(
        farmer_service::decide_product_request(
            &state,
            &other_farmer,
            &first.id.to_string(),
            RequestAction::Approve
        )
        .await,
        Err(AppError::NotFound)
    ));

    assert_eq!(
        customer_service::cancel_product_request(&state, &customer, &first.id.to_string()).await?,
        RequestStatus::Cancelled
    );
    assert_eq!(
        farmer_service::decide_product_request(
            &state,
            &farmer,
            &first.id.to_string(),
            RequestAction::Approve
        )
        .await?,
        RequestStatus::Cancelled
    );
    assert_eq!(
        farmer_service::decide_product_request(
            &state,
            &farmer,
            &second.id.to_string(),
            RequestAction::Reject
        )
        .await?,
        RequestStatus::Rejected
    );

    let board = customer_service::dashboard(&state, &customer).await?;
    assert_eq!(board.counts.cancelled, 1);
    assert_eq!(board.counts.rejected, 1);
    Ok(())
}

#[tokio::test]
async fn deleting_product_removes_its_requests() -> anyhow::Result<()> {
    let (state, _media) = setup_state().await?;
    let farmer = signup(&state, "farmer@x.com", "farmer").await?;
    let customer = signup(&state, "customer@x.com", "customer").await?;

    let product = farmer_service::add_product(&state, &farmer, product_form("Okra"), vec![]).await?;
    let updated = farmer_service::update_product(
        &state,
        &farmer,
        &product.id.to_string(),
        ProductForm {
            price: "50".into(),
            ..product_form("Okra")
        },
    )
    .await?;
    assert_eq!(updated.price, 5000);

    customer_service::send_product_request(
        &state,
        &customer,
        ProductRequestForm {
            product_id: product.id.to_string(),
            quantity: "2".into(),
            message: String::new(),
        },
    )
    .await?;

    assert!(matches!(
        farmer_service::delete_product(&state, &farmer, "not-an-id").await,
        Err(AppError::NotFound)
    ));
    farmer_service::delete_product(&state, &farmer, &product.id.to_string()).await?;
    assert_eq!(Products::find().count(&state.orm).await?, 0);
    assert_eq!(ProductRequests::find().count(&state.orm).await?, 0);
    assert!(customer_service::dashboard(&state, &customer).await?.requests.is_empty());
    Ok(())
}

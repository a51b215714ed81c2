use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::landowner::{LandForm, LandownerDashboard},
    entity::{
        land_images::Entity as LandImages,
        land_requests::{self, Entity as LandRequests},
        lands::{self, Entity as Lands},
        sea_orm_active_enums::{RequestStatus, Role, SoilType, SuitableFor, choices},
    },
    error::{AppError, AppResult},
    forms::{UploadedFile, parse_id, with_images},
    middleware::auth::AuthUser,
    models::{Land, land_from_entity},
    services::{auth_service::require_role, catalog},
    state::AppState,
    workflow::{RequestAction, RequestCounts},
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<LandownerDashboard> {
    let profile = require_role(state, user, Role::Landowner).await?;

    let lands = catalog::lands_with_images(&state.orm, Some(user.user_id)).await?;
    let requests = LandRequests::find()
        .join(JoinType::InnerJoin, land_requests::Relation::Lands.def())
        .filter(lands::Column::OwnerId.eq(user.user_id))
        .order_by_desc(land_requests::Column::CreatedAt)
        .all(&state.orm)
        .await?;
    let counts = RequestCounts::tally(requests.iter().map(|r| r.status));

    Ok(LandownerDashboard {
        profile: profile.into(),
        lands,
        requests: requests.into_iter().map(Into::into).collect(),
        counts,
        soil_types: choices::<SoilType>(),
        suitable_for: choices::<SuitableFor>(),
    })
}

/// Lists a new land with its photos. The contact phone comes from the
/// owner's profile.
pub async fn add_land(
    state: &AppState,
    user: &AuthUser,
    form: LandForm,
    files: Vec<UploadedFile>,
) -> AppResult<Land> {
    let profile = require_role(state, user, Role::Landowner).await?;
    let input = with_images(form.clean(), &files)?;

    let txn = state.orm.begin().await?;
    let mut stored = Vec::new();
    let result = async {
        let land = lands::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(user.user_id),
            farm_name: Set(input.farm_name),
            soil_type: Set(input.soil_type),
            suitable_for: Set(input.suitable_for),
            location: Set(input.location),
            phone: Set(profile.phone),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        let images =
            catalog::attach_land_images(&txn, &state.media, land.id, &files, &mut stored).await?;
        Ok::<_, AppError>((land, images))
    }
    .await;

    let (land, images) = match result {
        Ok(created) => created,
        Err(err) => {
            drop(txn);
            state.media.remove_all(&stored).await;
            return Err(err);
        }
    };
    if let Err(err) = txn.commit().await {
        state.media.remove_all(&stored).await;
        return Err(err.into());
    }

    tracing::info!(user_id = %user.user_id, land_id = %land.id, images = images.len(), "land listed");
    audit::record(
        &state.orm,
        user.user_id,
        "land_create",
        "lands",
        serde_json::json!({ "land_id": land.id, "images": images.len() }),
    )
    .await;

    Ok(land_from_entity(land, images))
}

pub async fn update_land(
    state: &AppState,
    user: &AuthUser,
    land_id: &str,
    form: LandForm,
) -> AppResult<Land> {
    require_role(state, user, Role::Landowner).await?;
    let land = find_own_land(&state.orm, user.user_id, land_id).await?;
    let input = form.clean()?;

    let mut active = lands::ActiveModel::from(land);
    active.farm_name = Set(input.farm_name);
    active.soil_type = Set(input.soil_type);
    active.suitable_for = Set(input.suitable_for);
    active.location = Set(input.location);
    active.description = Set(input.description);
    let land = active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, land_id = %land.id, "land updated");
    audit::record(
        &state.orm,
        user.user_id,
        "land_update",
        "lands",
        serde_json::json!({ "land_id": land.id }),
    )
    .await;

    let images = land.find_related(LandImages).all(&state.orm).await?;
    Ok(land_from_entity(land, images))
}

/// Approves or rejects a farmer's request. Only requests on the caller's own
/// listings are visible here.
pub async fn decide_land_request(
    state: &AppState,
    user: &AuthUser,
    request_id: &str,
    action: RequestAction,
) -> AppResult<RequestStatus> {
    require_role(state, user, Role::Landowner).await?;
    let id = parse_id(request_id)?;
    let request = LandRequests::find_by_id(id)
        .join(JoinType::InnerJoin, land_requests::Relation::Lands.def())
        .filter(lands::Column::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let Some(next) = request.status.apply(action) else {
        tracing::debug!(request_id = %id, status = ?request.status, action = action.as_str(), "decision ignored");
        return Ok(request.status);
    };

    let mut active = land_requests::ActiveModel::from(request);
    active.status = Set(next);
    active.update(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, request_id = %id, status = ?next, "land request decided");
    audit::record(
        &state.orm,
        user.user_id,
        "land_request_decide",
        "land_requests",
        serde_json::json!({ "request_id": id, "action": action.as_str() }),
    )
    .await;

    Ok(next)
}

/// Deletes a listing with its photos and requests in one transaction, then
/// removes the stored files.
pub async fn delete_land(state: &AppState, user: &AuthUser, land_id: &str) -> AppResult<()> {
    require_role(state, user, Role::Landowner).await?;
    let land = find_own_land(&state.orm, user.user_id, land_id).await?;

    let txn = state.orm.begin().await?;
    let references = catalog::delete_land_cascade(&txn, land.id).await?;
    txn.commit().await?;
    state.media.remove_all(&references).await;

    tracing::info!(user_id = %user.user_id, land_id = %land.id, "land deleted");
    audit::record(
        &state.orm,
        user.user_id,
        "land_delete",
        "lands",
        serde_json::json!({ "land_id": land.id, "images": references.len() }),
    )
    .await;

    Ok(())
}

async fn find_own_land<C>(db: &C, owner_id: Uuid, raw_id: &str) -> AppResult<lands::Model>
where
    C: ConnectionTrait,
{
    let id = parse_id(raw_id)?;
    Lands::find_by_id(id)
        .filter(lands::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

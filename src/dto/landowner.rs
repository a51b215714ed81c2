use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::request_decision,
    entity::sea_orm_active_enums::{SoilType, SuitableFor, parse_choice},
    error::{AppError, AppResult},
    forms::{FieldErrors, FormData, trim_field},
    models::{Land, LandRequest, Profile},
    workflow::{RequestAction, RequestCounts},
};

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
#[serde(default)]
pub struct LandForm {
    #[validate(length(min = 1, max = 200, message = "Enter a farm name of at most 200 characters."))]
    pub farm_name: String,
    /// One of `black`, `red`, `alluvial`, `sandy`.
    pub soil_type: String,
    /// One of `vegetables`, `fruits`, `both`.
    pub suitable_for: String,
    #[validate(length(min = 1, max = 200, message = "Enter a location of at most 200 characters."))]
    pub location: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
}

#[derive(Debug)]
pub struct LandInput {
    pub farm_name: String,
    pub soil_type: SoilType,
    pub suitable_for: SuitableFor,
    pub location: String,
    pub description: String,
}

impl LandForm {
    fn normalise(&mut self) {
        trim_field(&mut self.farm_name);
        trim_field(&mut self.location);
        trim_field(&mut self.description);
    }

    pub fn clean(mut self) -> Result<LandInput, FieldErrors> {
        self.normalise();
        let mut errors = FieldErrors::from_validation(self.validate());
        let soil_type = parse_choice::<SoilType>(&self.soil_type);
        if soil_type.is_none() {
            errors.add("soil_type", "Select a valid choice.");
        }
        let suitable_for = parse_choice::<SuitableFor>(&self.suitable_for);
        if suitable_for.is_none() {
            errors.add("suitable_for", "Select a valid choice.");
        }
        match (soil_type, suitable_for) {
            (Some(soil_type), Some(suitable_for)) if errors.is_empty() => Ok(LandInput {
                farm_name: self.farm_name,
                soil_type,
                suitable_for,
                location: self.location,
                description: self.description,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug)]
pub enum LandownerAction {
    AddLand(LandForm),
    UpdateLand { land_id: String, form: LandForm },
    DecideLandRequest {
        request_id: String,
        action: RequestAction,
    },
}

impl LandownerAction {
    pub fn from_form(data: &FormData) -> AppResult<Self> {
        if data.has("add_land") {
            return Ok(Self::AddLand(data.bind()?));
        }
        if data.has("update_land") {
            return Ok(Self::UpdateLand {
                land_id: data.get("land_id").unwrap_or_default().to_string(),
                form: data.bind()?,
            });
        }
        if let Some((request_id, action)) = request_decision(data) {
            return Ok(Self::DecideLandRequest { request_id, action });
        }
        Err(AppError::BadRequest("unknown landowner dashboard action".into()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LandownerDashboard {
    pub profile: Profile,
    pub lands: Vec<Land>,
    /// Farmer requests against own listings, newest first.
    pub requests: Vec<LandRequest>,
    pub counts: RequestCounts,
    /// Accepted `soil_type` values for the land form.
    pub soil_types: Vec<String>,
    pub suitable_for: Vec<String>,
}

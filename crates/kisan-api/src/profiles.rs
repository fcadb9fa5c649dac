//! Handlers for the caller's own profile.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/profiles` | Register; 409 if already registered |
//! | `GET`    | `/profiles/me` | Profile, joined communities and role |
//! | `PATCH`  | `/profiles/me` | Body: [`ProfileUpdate`] |
//! | `DELETE` | `/profiles/me` | Body: `{"confirm_name":"<full name>"}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kisan_core::{
  profile::{Locality, NewProfile, Profile, ProfileUpdate, UserId, non_empty},
  role::Role,
  store::{CascadeReport, PortalStore},
  validate::{confirm, require, require_if_present},
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  error::ApiError,
  extract::Json,
  session::CurrentSession,
  views::ConfirmBody,
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub mobile:     Option<String>,
  pub village:    Option<String>,
  pub taluka:     Option<String>,
  pub district:   Option<String>,
  pub state:      Option<String>,
}

/// `POST /profiles`: create the caller's profile.
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let first_name = require("first_name", &body.first_name)?.to_owned();
  let last_name = require("last_name", &body.last_name)?.to_owned();
  let email = require("email", &body.email)?.to_owned();

  if viewer.profile.is_some() {
    return Err(already_registered(&viewer.user_id));
  }

  let profile = state
    .store
    .create_profile(NewProfile {
      user_id: viewer.user_id.clone(),
      first_name,
      last_name,
      email,
      mobile: body.mobile,
      locality: Locality {
        village:  body.village.and_then(non_empty),
        taluka:   body.taluka.and_then(non_empty),
        district: body.district.and_then(non_empty),
        state:    body.state.and_then(non_empty),
      },
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| already_registered(&viewer.user_id))?;

  tracing::info!(user_id = %profile.user_id, "profile registered");
  Ok((StatusCode::CREATED, Json(profile)))
}

fn already_registered(user_id: &UserId) -> ApiError {
  ApiError::Conflict(format!("{user_id} is already registered"))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MeView {
  pub profile:     Profile,
  pub communities: Vec<String>,
  /// Role without community context.
  pub role:        Role,
}

/// `GET /profiles/me`
pub async fn me<S>(
  State(_state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
) -> Result<Json<MeView>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let profile = viewer.require_profile()?.clone();
  Ok(Json(MeView {
    role: viewer.role(None),
    communities: viewer.membership.iter().map(str::to_owned).collect(),
    profile,
  }))
}

/// `PATCH /profiles/me`
pub async fn update_me<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  viewer.require_profile()?;
  require_if_present("first_name", update.first_name.as_deref())?;
  require_if_present("last_name", update.last_name.as_deref())?;

  let update = ProfileUpdate {
    first_name: update.first_name.map(|v| v.trim().to_owned()),
    last_name: update.last_name.map(|v| v.trim().to_owned()),
    ..update
  };

  let profile = state
    .store
    .update_profile(&viewer.user_id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {} not found", viewer.user_id)))?;

  tracing::info!(user_id = %profile.user_id, "profile updated");
  Ok(Json(profile))
}

/// `DELETE /profiles/me`: remove the caller's profile and all their content.
pub async fn delete_me<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Json(body): Json<ConfirmBody>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let profile = viewer.require_profile()?;
  confirm(&profile.full_name(), &body.confirm_name)?;

  let report = state
    .store
    .delete_member(&viewer.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {} not found", viewer.user_id)))?;

  tracing::info!(user_id = %viewer.user_id, ?report, "account deleted");
  Ok(Json(report))
}

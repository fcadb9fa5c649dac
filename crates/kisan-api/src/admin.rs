//! Admin-only endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/members` | `?field=name\|village\|taluka\|district\|state\|community&value=` |
//! | `DELETE` | `/admin/members/{user_id}` | Body: `{"confirm_name":"<full name>"}` |
//! | `POST`   | `/admin/members/{user_id}/creator` | Toggles the creator flag |
//! | `POST`   | `/admin/communities` | Body: [`NewCommunityBody`] |
//! | `PATCH`  | `/admin/communities/{id}` | Body: [`CommunityUpdate`]; renames carry memberships |
//! | `DELETE` | `/admin/communities/{id}` | Body: `{"confirm_name":"<name>"}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kisan_core::{
  community::{Community, CommunityUpdate, NewCommunity},
  filter::{MemberFilter, MemberRecord},
  profile::{Profile, UserId},
  session::{Session, Viewer},
  store::{CascadeReport, PortalStore},
  validate::{confirm, require, require_if_present},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
  session::CurrentSession,
  views::ConfirmBody,
};

fn require_admin(session: &Session) -> Result<&Viewer, ApiError> {
  let viewer = session.require_viewer()?;
  viewer.require_admin()?;
  Ok(viewer)
}

async fn find_member<S>(store: &S, user_id: &UserId) -> Result<Profile, ApiError>
where
  S: PortalStore,
{
  store
    .get_profile(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("member {user_id} not found")))
}

// ─── Members ──────────────────────────────────────────────────────────────────

/// `GET /admin/members[?field=<field>&value=<text>]`
pub async fn list_members<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Query(filter): Query<MemberFilter>,
) -> Result<Json<Vec<MemberRecord>>, ApiError>
where
  S: PortalStore + 'static,
{
  require_admin(&session)?;

  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;
  let mut records = Vec::with_capacity(profiles.len());
  for profile in profiles {
    let membership = state
      .store
      .get_membership(&profile.user_id)
      .await
      .map_err(ApiError::store)?;
    records.push(MemberRecord::new(profile, membership));
  }
  Ok(Json(filter.apply(records)))
}

/// `DELETE /admin/members/{user_id}`
pub async fn delete_member<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(user_id): Path<String>,
  Json(body): Json<ConfirmBody>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: PortalStore + 'static,
{
  let admin = require_admin(&session)?;
  let user_id = UserId::new(user_id)?;
  let member = find_member(state.store.as_ref(), &user_id).await?;
  confirm(&member.full_name(), &body.confirm_name)?;

  let report = state
    .store
    .delete_member(&user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("member {user_id} not found")))?;

  tracing::info!(%user_id, by = %admin.user_id, ?report, "member deleted");
  Ok(Json(report))
}

/// `POST /admin/members/{user_id}/creator`
pub async fn toggle_creator<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(user_id): Path<String>,
) -> Result<Json<MemberRecord>, ApiError>
where
  S: PortalStore + 'static,
{
  let admin = require_admin(&session)?;
  let user_id = UserId::new(user_id)?;
  let member = find_member(state.store.as_ref(), &user_id).await?;

  let profile = state
    .store
    .set_creator(&user_id, !member.is_creator)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("member {user_id} not found")))?;
  let membership = state.store.get_membership(&user_id).await.map_err(ApiError::store)?;

  tracing::info!(%user_id, is_creator = profile.is_creator, by = %admin.user_id, "creator flag set");
  Ok(Json(MemberRecord::new(profile, membership)))
}

// ─── Communities ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewCommunityBody {
  pub name:        String,
  pub description: String,
  pub info:        Option<String>,
  pub category:    String,
}

async fn ensure_name_free<S>(store: &S, name: &str, except: Option<Uuid>) -> Result<(), ApiError>
where
  S: PortalStore,
{
  let existing = store.find_community(name).await.map_err(ApiError::store)?;
  match existing {
    Some(c) if Some(c.community_id) != except => {
      Err(ApiError::Conflict(format!("community {name:?} already exists")))
    }
    _ => Ok(()),
  }
}

/// `POST /admin/communities`
pub async fn create_community<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Json(body): Json<NewCommunityBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + 'static,
{
  let admin = require_admin(&session)?;
  let input = NewCommunity {
    name:        require("name", &body.name)?.to_owned(),
    description: require("description", &body.description)?.to_owned(),
    info:        body.info,
    category:    require("category", &body.category)?.to_owned(),
  }
  .normalized();
  ensure_name_free(state.store.as_ref(), &input.name, None).await?;

  let community = state
    .store
    .create_community(input)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(name = %community.name, by = %admin.user_id, "community created");
  Ok((StatusCode::CREATED, Json(community)))
}

/// `PATCH /admin/communities/{id}`
pub async fn update_community<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  Json(update): Json<CommunityUpdate>,
) -> Result<Json<Community>, ApiError>
where
  S: PortalStore + 'static,
{
  let admin = require_admin(&session)?;
  require_if_present("name", update.name.as_deref())?;
  require_if_present("description", update.description.as_deref())?;
  require_if_present("category", update.category.as_deref())?;

  let update = update.normalized();
  if let Some(name) = &update.name {
    ensure_name_free(state.store.as_ref(), name, Some(id)).await?;
  }

  let community = state
    .store
    .update_community(id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("community {id} not found")))?;

  tracing::info!(community_id = %id, name = %community.name, by = %admin.user_id, "community updated");
  Ok(Json(community))
}

/// `DELETE /admin/communities/{id}`
pub async fn delete_community<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<ConfirmBody>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: PortalStore + 'static,
{
  let admin = require_admin(&session)?;
  let community = crate::communities::find_by_id(state.store.as_ref(), id).await?;
  confirm(&community.name, &body.confirm_name)?;

  let report = state
    .store
    .delete_community(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("community {id} not found")))?;

  tracing::info!(name = %community.name, by = %admin.user_id, ?report, "community deleted");
  Ok(Json(report))
}

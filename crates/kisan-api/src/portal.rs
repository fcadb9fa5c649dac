//! Public portal-wide endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats` | Last document written by the stats job; 404 before its first run |
//! | `GET`  | `/categories` | The post-category table |

use axum::extract::State;
use kisan_core::{
  community::{CategoryEntry, PostCategory},
  stats::PortalStats,
  store::PortalStore,
};

use crate::{ApiState, error::ApiError, extract::Json};

/// `GET /stats`
pub async fn stats<S>(State(state): State<ApiState<S>>) -> Result<Json<PortalStats>, ApiError>
where
  S: PortalStore + 'static,
{
  let stats = state
    .store
    .read_stats()
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("stats have not been computed yet".into()))?;
  Ok(Json(stats))
}

/// `GET /categories`
pub async fn categories() -> Json<Vec<CategoryEntry>> { Json(PostCategory::table()) }

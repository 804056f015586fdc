use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer};

use crate::error::AppError;
use crate::models::{LinkUpdate, NewLink};
use crate::store::{self, LinkFilter};
use crate::AppState;

/// Raw `GET /links` query. Everything arrives as text so bad values can be
/// reported with the usual error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    tag: Option<String>,
    search: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_count(name: &str, value: Option<String>, default: i64) -> Result<i64, AppError> {
    let Some(raw) = non_empty(value) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "{name} must be a non-negative integer"
        ))),
    }
}

impl TryFrom<ListParams> for LinkFilter {
    type Error = AppError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let defaults = LinkFilter::default();

        let sort_by = match non_empty(params.sort_by) {
            Some(raw) => raw.parse().map_err(AppError::Validation)?,
            None => defaults.sort_by,
        };
        let sort_order = match non_empty(params.sort_order) {
            Some(raw) => raw.parse().map_err(AppError::Validation)?,
            None => defaults.sort_order,
        };

        Ok(LinkFilter {
            tag: non_empty(params.tag),
            search: non_empty(params.search),
            sort_by,
            sort_order,
            limit: parse_count("limit", params.limit, defaults.limit)?,
            offset: parse_count("offset", params.offset, defaults.offset)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    url: Option<String>,
    title: Option<String>,
    notes: Option<String>,
    tags: Option<Vec<String>>,
    created_at: Option<String>,
}

impl TryFrom<CreateLinkRequest> for NewLink {
    type Error = AppError;

    fn try_from(req: CreateLinkRequest) -> Result<Self, Self::Error> {
        let url = req.url.filter(|s| !s.trim().is_empty());
        let title = req.title.filter(|s| !s.trim().is_empty());
        let (Some(url), Some(title)) = (url, title) else {
            return Err(AppError::Validation("URL and title are required".to_string()));
        };

        Ok(NewLink {
            url,
            title,
            notes: req.notes,
            tags: req.tags.unwrap_or_default(),
            created_at: req.created_at,
        })
    }
}

// Distinguishes a field sent as `null` (Some(None)) from a missing one (None).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    notes: Option<Option<String>>,
    tags: Option<Vec<String>>,
}

impl TryFrom<UpdateLinkRequest> for LinkUpdate {
    type Error = AppError;

    fn try_from(req: UpdateLinkRequest) -> Result<Self, Self::Error> {
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }

        let update = LinkUpdate {
            title: req.title,
            notes: req.notes,
            tags: req.tags,
        };
        if update.is_empty() {
            return Err(AppError::Validation(
                "Provide at least one of title, notes or tags".to_string(),
            ));
        }

        Ok(update)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links).post(create_link))
        .route(
            "/links/{id}",
            get(get_link).patch(update_link).delete(delete_link),
        )
}

async fn list_links(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let filter = LinkFilter::try_from(params)?;

    let links = store::list_links(&state.db, &filter).await?;
    Ok(Json(links))
}

async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let link = store::get_link(&state.db, &id).await?;
    Ok(Json(link))
}

async fn create_link(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let new = NewLink::try_from(req)?;

    let link = store::create_link(&state.db, new).await?;
    tracing::info!(id = %link.id, url = %link.url, "link created");

    Ok((StatusCode::CREATED, Json(link)))
}

async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let update = LinkUpdate::try_from(req)?;

    let link = store::update_link(&state.db, &id, update).await?;
    Ok(Json(link))
}

async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store::delete_link(&state.db, &id).await?;
    tracing::info!(%id, "link deleted");

    Ok(StatusCode::NO_CONTENT)
}

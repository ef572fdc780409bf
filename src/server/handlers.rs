//! HTTP handlers for the author resources
//!
//! Listing requests run validate → filter → sort → paginate → shape; the
//! handlers only validate input, call the repository and attach links.

use crate::catalog::author::{Author, AuthorDto, AuthorForCreationDto, AuthorFullDto};
use crate::catalog::parameters::AuthorResourceParameters;
use crate::core::error::{EntityError, ShapeError, ShapeResult, ValidationError};
use crate::core::field::FieldValue;
use crate::core::shaping::{ShapedRecord, shape_data, shape_one};
use crate::core::validation::{
    Validated, ValidatedList, ensure_order_by_valid, ensure_type_has_fields,
};
use crate::links::{
    LinkDto, author_collection_uri, author_links, author_uri, authors_links, parse_author_ids,
    root_links,
};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Response header carrying the page metadata
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Methods allowed on the author collection
pub const AUTHORS_ALLOW: &str = "GET,HEAD,POST,OPTIONS";

/// Vendor media type asking for links in the body
pub const HATEOAS_MEDIA_TYPE: &str = "application/vnd.marvin.hateoas+json";

const VENDOR_PREFIX: &str = "application/vnd.marvin.";

/// `?fields=` on single-resource requests
#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

/// What the `Accept` header asks a single author to look like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPreference {
    pub media_type: String,
    pub include_links: bool,
    pub full: bool,
}

impl MediaPreference {
    fn json() -> Self {
        Self {
            media_type: "application/json".to_string(),
            include_links: false,
            full: false,
        }
    }

    /// Pick the first producible media range of `Accept`.
    ///
    /// No header means plain JSON. A header naming only media types outside
    /// `application/json` and the `application/vnd.marvin.*+json` family is
    /// [`ShapeError::NotAcceptable`].
    pub fn from_headers(headers: &HeaderMap) -> ShapeResult<Self> {
        let Some(accept) = headers.get(header::ACCEPT) else {
            return Ok(Self::json());
        };
        let not_acceptable = || ShapeError::NotAcceptable {
            media_type: String::from_utf8_lossy(accept.as_bytes()).into_owned(),
        };
        let accept = accept.to_str().map_err(|_| not_acceptable())?;

        let ranges: Vec<String> = accept
            .split(',')
            .filter_map(|range| range.split(';').next())
            .map(|media_type| media_type.trim().to_ascii_lowercase())
            .filter(|media_type| !media_type.is_empty())
            .collect();
        if ranges.is_empty() {
            return Ok(Self::json());
        }

        ranges
            .iter()
            .find_map(|media_type| Self::parse(media_type))
            .ok_or_else(not_acceptable)
    }

    fn parse(media_type: &str) -> Option<Self> {
        if matches!(media_type, "*/*" | "application/*" | "application/json") {
            return Some(Self::json());
        }

        let profile = media_type
            .strip_prefix(VENDOR_PREFIX)?
            .strip_suffix("+json")?;
        let (full, include_links) = match profile {
            "hateoas" => (false, true),
            "author.friendly" => (false, false),
            "author.friendly.hateoas" => (false, true),
            "author.full" => (true, false),
            "author.full.hateoas" => (true, true),
            _ => return None,
        };

        Some(Self {
            media_type: media_type.to_string(),
            include_links,
            full,
        })
    }

    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_str(&self.media_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/json"))
    }
}

/// Serialize a shaped record, adding a `links` member
fn with_links(record: &ShapedRecord, links: Vec<LinkDto>) -> ShapeResult<Value> {
    let mut value = serde_json::to_value(record).map_err(|e| ShapeError::Internal(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        map.insert("links".to_string(), json!(links));
    }
    Ok(value)
}

/// GET|HEAD /api/authors
pub async fn list_authors(
    State(state): State<AppState>,
    Query(params): Query<AuthorResourceParameters>,
    headers: HeaderMap,
) -> ShapeResult<Response> {
    MediaPreference::from_headers(&headers)?;
    let mapping = state.registry.lookup::<AuthorDto, Author>()?;
    ensure_order_by_valid(mapping, Some(params.order_by_or_default(&state.config)))?;
    ensure_type_has_fields::<AuthorDto>(params.fields.as_deref())?;

    let listing = params.resolve(&state.config)?;
    let page = state.repository.get_authors(&listing).await?;

    let now = Utc::now();
    let authors: Vec<AuthorDto> = page
        .items()
        .iter()
        .map(|author| AuthorDto::from_author_at(author, now))
        .collect();

    let value = shape_data(&authors, listing.fields.as_deref())?
        .map(|record| match record.get("id").and_then(FieldValue::as_uuid) {
            Some(id) => with_links(&record, author_links(id, None)),
            None => serde_json::to_value(&record).map_err(|e| ShapeError::Internal(e.to_string())),
        })
        .collect::<ShapeResult<Vec<Value>>>()?;

    let metadata = serde_json::to_string(&page.metadata()).map_err(|e| ShapeError::Internal(e.to_string()))?;
    let metadata = HeaderValue::from_str(&metadata).map_err(|e| ShapeError::Internal(e.to_string()))?;
    let links = authors_links(&listing, page.has_next(), page.has_previous());

    Ok((
        [(PAGINATION_HEADER, metadata)],
        Json(json!({ "value": value, "links": links })),
    )
        .into_response())
}

/// GET /api/authors/{author_id}
pub async fn get_author(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
    Query(query): Query<FieldsQuery>,
    headers: HeaderMap,
) -> ShapeResult<Response> {
    let preference = MediaPreference::from_headers(&headers)?;
    let fields = query.fields.as_deref();

    if preference.full {
        ensure_type_has_fields::<AuthorFullDto>(fields)?;
    } else {
        ensure_type_has_fields::<AuthorDto>(fields)?;
    }

    let id = Uuid::parse_str(&author_id).map_err(|_| ValidationError::InvalidUuid { value: author_id })?;
    let author = state
        .repository
        .get_author(&id)
        .await?
        .ok_or_else(|| EntityError::NotFound {
            entity_type: "Author".to_string(),
            id,
        })?;

    let record = if preference.full {
        shape_one(&AuthorFullDto::from(&author), fields)?
    } else {
        shape_one(&AuthorDto::from(&author), fields)?
    };

    let body = if preference.include_links {
        with_links(&record, author_links(id, fields))?
    } else {
        serde_json::to_value(&record).map_err(|e| ShapeError::Internal(e.to_string()))?
    };

    Ok(([(header::CONTENT_TYPE, preference.content_type())], Json(body)).into_response())
}

/// POST /api/authors
pub async fn create_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Validated(payload): Validated<AuthorForCreationDto>,
) -> ShapeResult<Response> {
    MediaPreference::from_headers(&headers)?;
    let author = state.repository.add_author(payload.into_author()).await?;
    tracing::info!(author_id = %author.id, "created author");

    let record = shape_one(&AuthorDto::from(&author), None)?;
    let body = with_links(&record, author_links(author.id, None))?;
    let location = HeaderValue::from_str(&author_uri(author.id)).map_err(|e| ShapeError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

/// GET /api/authorcollections/({author_ids})
///
/// Every requested author must exist, otherwise the whole request is 404.
pub async fn get_author_collection(
    State(state): State<AppState>,
    Path(author_ids): Path<String>,
    headers: HeaderMap,
) -> ShapeResult<Json<Vec<AuthorDto>>> {
    MediaPreference::from_headers(&headers)?;
    let ids = parse_author_ids(&author_ids)
        .ok_or_else(|| ValidationError::InvalidUuid { value: author_ids })?;

    let now = Utc::now();
    let mut authors = Vec::with_capacity(ids.len());
    for id in ids {
        let author = state
            .repository
            .get_author(&id)
            .await?
            .ok_or_else(|| EntityError::NotFound {
                entity_type: "Author".to_string(),
                id,
            })?;
        authors.push(AuthorDto::from_author_at(&author, now));
    }

    Ok(Json(authors))
}

/// POST /api/authorcollections
pub async fn create_author_collection(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedList(payload): ValidatedList<AuthorForCreationDto>,
) -> ShapeResult<Response> {
    MediaPreference::from_headers(&headers)?;

    let now = Utc::now();
    let mut created = Vec::with_capacity(payload.len());
    for author in payload {
        let author = state.repository.add_author(author.into_author()).await?;
        created.push(AuthorDto::from_author_at(&author, now));
    }
    tracing::info!(count = created.len(), "created author collection");

    let ids: Vec<Uuid> = created.iter().map(|author| author.id).collect();
    let location = HeaderValue::from_str(&author_collection_uri(&ids))
        .map_err(|e| ShapeError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response())
}

/// OPTIONS /api/authors
pub async fn authors_options() -> impl IntoResponse {
    [(header::ALLOW, AUTHORS_ALLOW)]
}

/// GET /api
pub async fn root() -> Json<Vec<LinkDto>> {
    Json(root_links())
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "shape-rs"
    }))
}

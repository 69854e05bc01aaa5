use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json as JsonResponse,
};
use std::sync::Arc;

use crate::{
    domains::locale::dto::{LocaleListResponse, LocaleResponse, ResolveQuery, SupportResponse},
    shared::state::SharedState,
    system::locale::{
        extract_requested_locale, normalize_tag, validate_tag, LocaleError, LocaleQuery,
        DEFAULT_LOCALE, SUPPORTED_LOCALES,
    },
};

// Supported base codes and what is cached so far
pub async fn list_locales(State(state): State<Arc<SharedState>>) -> JsonResponse<LocaleListResponse> {
    JsonResponse(LocaleListResponse {
        default: DEFAULT_LOCALE,
        supported: SUPPORTED_LOCALES,
        cached: state.resolver.cached_tags().await,
    })
}

// Resolve a tag given in the path; malformed tags never reach the cache
pub async fn get_locale(
    State(state): State<Arc<SharedState>>,
    Path(tag): Path<String>,
    Query(params): Query<ResolveQuery>,
) -> Result<JsonResponse<LocaleResponse>, LocaleError> {
    validate_tag(&tag)?;

    let resolution = state.resolver.resolve_detailed(&tag).await;

    if params.strict {
        if let Some(e) = resolution.fallback_error() {
            return Err(e);
        }
    }

    Ok(JsonResponse(resolution.into()))
}

pub async fn locale_support(
    State(state): State<Arc<SharedState>>,
    Path(tag): Path<String>,
) -> JsonResponse<SupportResponse> {
    JsonResponse(SupportResponse {
        base: normalize_tag(&tag),
        supported: state.resolver.is_supported(&tag),
        tag,
    })
}

// Resolve whatever locale the request asks for (query, then headers)
pub async fn negotiate_locale(
    State(state): State<Arc<SharedState>>,
    headers: HeaderMap,
    Query(query): Query<LocaleQuery>,
) -> Result<JsonResponse<LocaleResponse>, LocaleError> {
    let requested = extract_requested_locale(&headers, Some(&query));
    // Header tags are filtered during extraction; a query tag is rejected here
    validate_tag(&requested.tag)?;

    let resolution = state.resolver.resolve_detailed(&requested.tag).await;

    let mut response = LocaleResponse::from(resolution);
    response.source = Some(requested.source);
    Ok(JsonResponse(response))
}

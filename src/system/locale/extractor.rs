use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use super::{is_well_formed, DEFAULT_LOCALE};

// Query parameters for locale extraction
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub lang: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleSource {
    Query,   // ?locale= or ?lang=
    Header,  // accept-locale or Accept-Language
    Default, // Fallback
}

/// A locale tag as the client asked for it, region suffix included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLocale {
    pub tag: String,
    pub source: LocaleSource,
}

// Extract the requested tag from query parameters
pub fn extract_locale_from_query(query: &LocaleQuery) -> Option<String> {
    query
        .locale
        .as_deref()
        .or(query.lang.as_deref())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

// Extract the requested tag from headers, custom header first.
// Malformed tags are ignored, as if the header were absent.
pub fn extract_locale_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(locale_header) = headers.get("accept-locale") {
        if let Ok(locale_str) = locale_header.to_str() {
            let locale_str = locale_str.trim();
            if is_well_formed(locale_str) {
                return Some(locale_str.to_string());
            }
        }
    }

    headers
        .get("accept-language")
        .and_then(|accept_language| accept_language.to_str().ok())
        .and_then(parse_accept_language)
}

/// Pick the preferred tag from an Accept-Language value such as
/// "fr-CA,fr;q=0.9,en;q=0.8". Wildcards, malformed tags and q=0 entries
/// are skipped.
pub fn parse_accept_language(accept_language: &str) -> Option<String> {
    let mut locales: Vec<(String, f32)> = accept_language
        .split(',')
        .filter_map(|part| parse_locale_with_quality(part.trim()))
        .collect();

    // Sort by quality (highest first), stable for equal weights
    locales.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    locales.into_iter().next().map(|(locale, _)| locale)
}

fn parse_locale_with_quality(part: &str) -> Option<(String, f32)> {
    let (locale, quality) = match part.split_once(';') {
        Some((locale, params)) => {
            let quality = params
                .trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (locale.trim(), quality)
        }
        None => (part, 1.0),
    };

    if !is_well_formed(locale) || quality <= 0.0 {
        return None;
    }

    Some((locale.to_string(), quality))
}

/// Query parameter, then headers, then the default locale.
pub fn extract_requested_locale(headers: &HeaderMap, query: Option<&LocaleQuery>) -> RequestedLocale {
    if let Some(tag) = query.and_then(extract_locale_from_query) {
        return RequestedLocale {
            tag,
            source: LocaleSource::Query,
        };
    }

    if let Some(tag) = extract_locale_from_headers(headers) {
        return RequestedLocale {
            tag,
            source: LocaleSource::Header,
        };
    }

    RequestedLocale {
        tag: DEFAULT_LOCALE.to_string(),
        source: LocaleSource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(
            parse_accept_language("en-US,en;q=0.9,vi;q=0.8"),
            Some("en-US".to_string())
        );

        assert_eq!(
            parse_accept_language("de;q=0.5, fr-CA;q=0.9"),
            Some("fr-CA".to_string())
        );

        assert_eq!(parse_accept_language("ja-JP"), Some("ja-JP".to_string()));
        assert_eq!(parse_accept_language("*;q=0.5, pl;q=0.1"), Some("pl".to_string()));
        assert_eq!(parse_accept_language("fr;q=0"), None);
        assert_eq!(parse_accept_language(""), None);
    }

    #[test]
    fn test_malformed_header_tags_are_skipped() {
        let padded = format!("fr-{}", "x".repeat(200));
        assert_eq!(
            parse_accept_language(&format!("{padded},de;q=0.5")),
            Some("de".to_string())
        );

        let mut headers = HeaderMap::new();
        headers.insert("accept-locale", HeaderValue::from_str(&padded).unwrap());
        headers.insert("accept-language", HeaderValue::from_static("ja"));
        assert_eq!(extract_locale_from_headers(&headers), Some("ja".to_string()));

        headers.insert("accept-language", HeaderValue::from_static("fr--CA"));
        let requested = extract_requested_locale(&headers, None);
        assert_eq!(requested.tag, "en");
        assert_eq!(requested.source, LocaleSource::Default);
    }

    #[test]
    fn test_locale_extraction_from_query() {
        let query = LocaleQuery {
            lang: Some("vi".to_string()),
            locale: None,
        };
        assert_eq!(extract_locale_from_query(&query), Some("vi".to_string()));

        let query = LocaleQuery {
            lang: Some("vi".to_string()),
            locale: Some("fr-CA".to_string()),
        };
        assert_eq!(extract_locale_from_query(&query), Some("fr-CA".to_string()));

        let query = LocaleQuery {
            lang: None,
            locale: Some("  ".to_string()),
        };
        assert_eq!(extract_locale_from_query(&query), None);
    }

    #[test]
    fn test_custom_header_wins_over_accept_language() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("de-AT,de;q=0.8"));
        assert_eq!(extract_locale_from_headers(&headers), Some("de-AT".to_string()));

        headers.insert("accept-locale", HeaderValue::from_static("nl"));
        assert_eq!(extract_locale_from_headers(&headers), Some("nl".to_string()));
    }

    #[test]
    fn test_extraction_priority() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("fr-CA,fr;q=0.9"));

        let query = LocaleQuery {
            lang: Some("ja".to_string()),
            locale: None,
        };
        let requested = extract_requested_locale(&headers, Some(&query));
        assert_eq!(requested.tag, "ja");
        assert_eq!(requested.source, LocaleSource::Query);

        let requested = extract_requested_locale(&headers, Some(&LocaleQuery::default()));
        assert_eq!(requested.tag, "fr-CA");
        assert_eq!(requested.source, LocaleSource::Header);
    }

    #[test]
    fn test_default_locale() {
        let requested = extract_requested_locale(&HeaderMap::new(), None);
        assert_eq!(requested.tag, "en");
        assert_eq!(requested.source, LocaleSource::Default);
    }
}

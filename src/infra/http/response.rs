use chrono::{DateTime, TimeZone, Utc};
use http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES};
use http::{HeaderValue, Response, StatusCode};
use serde::Serialize;

pub const JSON_API: &str = "application/vnd.api+json";
pub const NO_CACHE: &str = "no-cache, must-revalidate";

/// Fixed instant in the past so intermediaries treat the body as stale.
fn expired_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1997, 7, 26, 5, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// HTTP-date (RFC 7231 IMF-fixdate).
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn json_api_response<T: Serialize>(
    body: &T,
    status: StatusCode,
) -> Result<Response<Vec<u8>>, serde_json::Error> {
    let body = serde_json::to_vec(body)?;

    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    if let Ok(expires) = HeaderValue::from_str(&http_date(expired_at())) {
        headers.insert(EXPIRES, expires);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));

    Ok(response)
}

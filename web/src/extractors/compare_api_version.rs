use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use log::*;
use semver::Version;
use service::config::ApiVersion;

/// Rejects requests whose `x-version` header is missing or names an API
/// version this server does not expose.
pub(crate) struct CompareApiVersion(pub Version);

impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(ApiVersion::field_name()) else {
            debug!("Request without a {} header", ApiVersion::field_name());
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing {} header", ApiVersion::field_name()),
            ));
        };

        let requested = header.to_str().unwrap_or_default().trim();
        if !ApiVersion::versions().contains(&requested) {
            warn!("Unsupported API version requested: {requested:?}");
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unsupported API version {requested:?}"),
            ));
        }

        Version::parse(requested)
            .map(CompareApiVersion)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

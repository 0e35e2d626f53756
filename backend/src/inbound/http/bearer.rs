//! Bearer-token extraction.
//!
//! Pulls `Authorization: Bearer <token>` out of the request if present.
//! Extraction never fails; handlers decide whether a missing token is an
//! error by passing the option to the auth service.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::AuthToken;

const BEARER_PREFIX: &str = "Bearer ";

/// Optional bearer token presented by the client.
#[derive(Debug, Clone)]
pub struct Bearer(Option<AuthToken>);

impl Bearer {
    /// The presented token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.0.as_ref()
    }

    /// Parse the token out of a request's headers.
    #[must_use]
    pub fn from_headers(req: &HttpRequest) -> Self {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(AuthToken::from_raw);
        Self(token)
    }
}

impl FromRequest for Bearer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_headers(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc123", Some("abc123"))]
    #[case("Bearer   abc123  ", Some("abc123"))]
    #[case("bearer abc123", None)]
    #[case("Basic abc123", None)]
    #[case("Bearer ", None)]
    fn parses_only_well_formed_bearer_headers(
        #[case] header: &str,
        #[case] expected: Option<&str>,
    ) {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        let bearer = Bearer::from_headers(&req);
        assert_eq!(bearer.token().map(AsRef::as_ref), expected);
    }

    #[test]
    fn missing_header_yields_no_token() {
        let req = TestRequest::default().to_http_request();
        assert!(Bearer::from_headers(&req).token().is_none());
    }
}

//! WebSocket inbound adapter: the realtime notice channel.
//!
//! Responsibilities:
//! - validate upgrade requests (Origin allow-list when the header is present)
//! - resolve the optional bearer token into a channel identity
//! - spawn the per-connection session task

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{error, warn};
use url::Url;

mod session;

pub mod hub;
pub mod state;

use crate::inbound::http::bearer::Bearer;

const LOCALHOST: &str = "localhost";

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    origins: web::Data<AllowedOrigins>,
    req: HttpRequest,
    stream: web::Payload,
) -> actix_web::Result<HttpResponse> {
    // Browsers always send Origin on WebSocket upgrades; native mobile
    // clients do not, so a missing header passes and a present one must
    // match the allow-list.
    if let Some(origin_header) = req.headers().get(ORIGIN) {
        validate_origin(origin_header, &origins)?;
    }

    let author = match Bearer::from_headers(&req).token() {
        Some(token) => state.auth.resolve(token).await.map_err(|err| {
            error!(error = %err, "failed to resolve channel bearer token");
            actix_web::error::ErrorInternalServerError("authentication unavailable")
        })?,
        None => None,
    };

    let (response, session, message_stream) = actix_ws::handle(&req, stream)?;
    let ws_state = state.get_ref().clone();
    // Subscribe before the upgrade response goes out so events published
    // immediately after the handshake cannot be missed.
    let events = ws_state.hub.subscribe();
    actix_web::rt::spawn(session::handle_ws_session(
        ws_state,
        author,
        events,
        session,
        message_stream,
    ));
    Ok(response)
}

/// Origins allowed to open browser WebSocket connections.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Vec<Url>);

impl AllowedOrigins {
    /// Parse an allow-list from origin strings, rejecting unparsable entries.
    pub fn parse(origins: &[String]) -> Result<Self, url::ParseError> {
        let parsed = origins
            .iter()
            .map(|raw| Url::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(parsed))
    }

    fn is_allowed(&self, origin: &Url) -> bool {
        // Localhost with an explicit non-zero port is always fine in dev.
        if origin.scheme() == "http" && origin.host_str() == Some(LOCALHOST) {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        self.0.iter().any(|allowed| {
            allowed.scheme() == origin.scheme()
                && allowed.host_str() == origin.host_str()
                && allowed.port() == origin.port()
        })
    }
}

fn validate_origin(
    origin_header: &HeaderValue,
    origins: &AllowedOrigins,
) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|err| {
        error!(error = %err, "failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|err| {
        error!(error = %err, "failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if origins.is_allowed(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "rejected channel upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

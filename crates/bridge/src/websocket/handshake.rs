use crate::attributes::ConnectionInfo;
use crate::config::BridgeConfig;
use crate::error::HandshakeError;
use crate::model::{CONNECTION_INFO, RequestHead};
use http::{Uri, header};
use micro_wire::websocket::{WEBSOCKET_VERSION, derive_accept_key};

/// An upgrade request that checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Handshake {
    pub(crate) location: Uri,
    pub(crate) accept_key: String,
}

impl Handshake {
    pub(crate) fn accept(request: &RequestHead, config: &BridgeConfig) -> Result<Handshake, HandshakeError> {
        let headers = request.headers();
        let secure = request.attributes().get::<ConnectionInfo>(CONNECTION_INFO).is_some_and(|info| info.secure);

        let host = headers.get(header::HOST.as_str()).ok_or(HandshakeError::MissingHost)?;
        let scheme = if secure { "wss" } else { "ws" };
        let location = format!("{scheme}://{}{}", host.trim(), request.uri().path());
        let location = location.parse::<Uri>().map_err(|e| HandshakeError::InvalidLocation { reason: e.to_string(), location })?;

        if let Some(origin) = headers.get(header::ORIGIN.as_str()) {
            if !config.allows_origin(origin) {
                return Err(HandshakeError::OriginRejected(origin.to_string()));
            }
        }

        let version = headers.get(header::SEC_WEBSOCKET_VERSION.as_str()).map(str::trim);
        if version != Some(WEBSOCKET_VERSION) {
            return Err(HandshakeError::UnsupportedVersion(version.map(String::from)));
        }

        let key = headers
            .get(header::SEC_WEBSOCKET_KEY.as_str())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(HandshakeError::MissingKey)?;

        Ok(Handshake { location, accept_key: derive_accept_key(key) })
    }
}

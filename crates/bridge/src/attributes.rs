//! Connection metadata attached to every converted request.
//!
//! Two entries may be produced: [`ConnectionInfo`] under [`CONNECTION_INFO`] and
//! [`SecureSession`] under [`SECURE_SESSION`]. Inputs that are missing or of an
//! unrecognized shape simply leave the corresponding entry out.

use crate::model::{Attributes, CONNECTION_INFO, SECURE_SESSION};
use bytes::Bytes;
use micro_wire::channel::{ChannelAddr, TlsSession};
use std::net::SocketAddr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub local: SocketAddr,
    pub remote: SocketAddr,
    pub secure: bool,
}

/// The negotiated TLS session, complete or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureSession {
    /// Lowercase hex.
    pub session_id: String,
    pub cipher_suite: String,
    pub key_size: u16,
    pub peer_certificates: Vec<Bytes>,
}

/// Cipher name fragments and the effective key size they imply. First match wins,
/// so longer fragments come before the ones they contain.
static KEY_SIZES: &[(&str, u16)] = &[
    ("TLS_AES_256_", 256),
    ("TLS_AES_128_", 128),
    ("CHACHA20_POLY1305", 256),
    ("WITH_AES_256_", 256),
    ("WITH_RC4_128_", 128),
    ("WITH_AES_128_", 128),
    ("WITH_RC4_40_", 40),
    ("WITH_3DES_EDE_CBC_", 168),
    ("WITH_IDEA_CBC_", 128),
    ("WITH_RC2_CBC_40_", 40),
    ("WITH_DES40_CBC_", 40),
    ("WITH_DES_CBC_", 56),
];

/// Classifies a cipher suite name by key size, `None` if the suite is not known.
pub fn key_size_for(cipher_suite: &str) -> Option<u16> {
    KEY_SIZES.iter().find(|(fragment, _)| cipher_suite.contains(fragment)).map(|(_, size)| *size)
}

pub fn extract_attributes(tls: Option<&TlsSession>, local: &ChannelAddr, remote: &ChannelAddr) -> Attributes {
    let mut builder = Attributes::builder();

    if let (Some(local), Some(remote)) = (local.as_inet(), remote.as_inet()) {
        builder = builder.insert(CONNECTION_INFO, ConnectionInfo { local, remote, secure: tls.is_some() });
    }

    if let Some(session) = tls.and_then(secure_session) {
        builder = builder.insert(SECURE_SESSION, session);
    }

    builder.build()
}

fn secure_session(tls: &TlsSession) -> Option<SecureSession> {
    let session_id = tls.id.as_ref().map(hex::encode);
    let cipher_suite = tls.cipher_suite.clone();
    let key_size = cipher_suite.as_deref().and_then(key_size_for);
    let peer_certificates = tls.peer_certificates.clone();

    match (session_id, cipher_suite, key_size, peer_certificates) {
        (Some(session_id), Some(cipher_suite), Some(key_size), Some(peer_certificates)) => {
            Some(SecureSession { session_id, cipher_suite, key_size, peer_certificates })
        }
        (session_id, cipher_suite, key_size, peer_certificates) => {
            trace!(
                has_id = session_id.is_some(),
                cipher_suite = cipher_suite.as_deref().unwrap_or_default(),
                has_key_size = key_size.is_some(),
                has_peer_certificates = peer_certificates.is_some(),
                "incomplete tls session, secure session attribute omitted"
            );
            None
        }
    }
}

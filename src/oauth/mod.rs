//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).
//!
//! Only the protocol parameters and any explicitly supplied query/form
//! parameters take part in the signature. JSON and multipart bodies are not
//! signed, matching what the Twitter API expects.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

/// Everything except the RFC 3986 unreserved set gets encoded
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Consumer and user-token credentials of the posting account
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Authorization header with a fresh nonce and the current timestamp.
    ///
    /// Call once per outgoing request; headers must not be reused.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<String, OAuthError> {
        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, extra_params, &nonce, &timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, OAuthError> {
        let mut oauth_params = self.protocol_params(nonce, timestamp);

        let mut signed: Vec<(&str, &str)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        signed.extend_from_slice(extra_params);

        let base = signature_base_string(method, url, &signed)?;
        let signature = sign(&base, &self.credentials.consumer_secret, &self.credentials.access_secret)?;
        oauth_params.push(("oauth_signature", signature));

        let rendered = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", rendered))
    }

    fn protocol_params(&self, nonce: &str, timestamp: &str) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.credentials.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.credentials.access_token.clone()),
            ("oauth_version", OAUTH_VERSION.to_string()),
        ]
    }
}

/// Normalized parameter string: encoded pairs sorted by key, then value
pub fn parameter_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&enc(base_url)&enc(params)`; query parameters in `url` are signed too
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> Result<String, OAuthError> {
    let parsed = Url::parse(url).map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;

    let query: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut all: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    all.extend_from_slice(params);

    let mut base_url = parsed;
    base_url.set_query(None);
    base_url.set_fragment(None);

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&parameter_string(&all))
    ))
}

pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String, OAuthError> {
    let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| OAuthError::InvalidKey)?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

//! Time-limited signed links for the media server.
//!
//! The media server validates links the way nginx `secure_link` does: it
//! renders a template over the request path, the expiration timestamp and a
//! shared secret, hashes it with MD5 and compares the unpadded base64url
//! digest against the `st` query parameter. The `e` parameter carries the
//! expiration as Unix seconds, or is empty when the link never expires.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use md5::{Digest, Md5};
use url::Url;

/// Default link lifetime in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60 * 60;

/// Template for archive/download links: the expiration is part of the
/// signed material, so a link stops validating once it lapses.
pub const LINK_FORMAT: &str = "{value}{expiration} {secret}";

/// Template for live-stream links: no expiration in the signed material, so
/// the signature is stable across time.
pub const LIVE_FORMAT: &str = "{value} {secret}";

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "st";

/// Query parameter carrying the expiration.
pub const EXPIRATION_PARAM: &str = "e";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Signs media-server URLs with a shared secret.
#[derive(Debug, Clone)]
pub struct SecureLink {
    secret: String,
    timeout: Option<u64>,
    format: String,
}

impl SecureLink {
    /// A link signer with the default timeout and [`LINK_FORMAT`].
    ///
    /// An empty `secret` is accepted and produces well-known signatures; the
    /// media server must be configured with a real key for links to mean
    /// anything.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            format: LINK_FORMAT.to_string(),
        }
    }

    /// Set the link lifetime. `None` disables expiration entirely: the
    /// signed material and the emitted `e` parameter both use an empty
    /// string.
    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the signing template.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    /// Expiration string for a link issued at `now` (Unix seconds).
    pub fn expiration_at(&self, now: i64) -> String {
        match self.timeout {
            Some(timeout) => now
                .saturating_add(i64::try_from(timeout).unwrap_or(i64::MAX))
                .to_string(),
            None => String::new(),
        }
    }

    /// Compute the signature for a path and expiration string.
    pub fn signature(&self, path: &str, expiration: &str) -> String {
        digest(&self.format, &self.secret, path, expiration)
    }

    /// Sign `url` for a request issued at `now`.
    ///
    /// Existing query pairs are kept as they are and `st` and `e` are
    /// appended after them.
    pub fn sign_at(&self, url: &str, now: i64) -> Result<String, SigningError> {
        let expiration = self.expiration_at(now);
        sign_with(url, |path| (self.signature(path, &expiration), expiration.clone()))
    }

    /// Sign `url` using the current wall clock.
    pub fn sign(&self, url: &str) -> Result<String, SigningError> {
        self.sign_at(url, chrono::Utc::now().timestamp())
    }

    /// Sign a live-stream URL.
    ///
    /// Uses [`LIVE_FORMAT`] regardless of the configured template and emits an
    /// empty `e` so the query has the shape the media server expects.
    pub fn sign_live(&self, url: &str) -> Result<String, SigningError> {
        sign_with(url, |path| {
            (digest(LIVE_FORMAT, &self.secret, path, ""), String::new())
        })
    }

    /// Check a signed URL the way the media server does.
    ///
    /// Returns `false` for unparseable URLs, missing parameters, signature
    /// mismatches and links whose non-empty expiration is before `now`.
    pub fn verify_at(&self, url: &str, now: i64) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        let mut signature = None;
        let mut expiration = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                SIGNATURE_PARAM => signature = Some(value.into_owned()),
                EXPIRATION_PARAM => expiration = Some(value.into_owned()),
                _ => {}
            }
        }
        let (Some(signature), Some(expiration)) = (signature, expiration) else {
            return false;
        };

        if !expiration.is_empty() {
            match expiration.parse::<i64>() {
                Ok(expires) if now <= expires => {}
                _ => return false,
            }
        }

        self.signature(parsed.path(), &expiration) == signature
    }
}

/// Render `format` and hash it into an unpadded base64url MD5 digest.
fn digest(format: &str, secret: &str, value: &str, expiration: &str) -> String {
    let material = format
        .replace("{value}", value)
        .replace("{expiration}", expiration)
        .replace("{secret}", secret);
    URL_SAFE_NO_PAD.encode(Md5::digest(material.as_bytes()))
}

fn sign_with<F>(url: &str, compute: F) -> Result<String, SigningError>
where
    F: FnOnce(&str) -> (String, String),
{
    let mut parsed = Url::parse(url)?;
    let (signature, expiration) = compute(parsed.path());
    parsed
        .query_pairs_mut()
        .append_pair(SIGNATURE_PARAM, &signature)
        .append_pair(EXPIRATION_PARAM, &expiration);
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_421_366_400;

    fn query_of(url: &str) -> String {
        Url::parse(url).unwrap().query().unwrap_or_default().to_string()
    }

    fn param(url: &str, name: &str) -> String {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn appends_signature_and_expiration_to_bare_url() {
        let signer = SecureLink::new("secret");
        let signed = signer.sign_at("http://media:8080/media/img/a.jpg", NOW).unwrap();

        assert!(signed.starts_with("http://media:8080/media/img/a.jpg?st="));
        assert_eq!(param(&signed, "e"), (NOW + 3600).to_string());
    }

    #[test]
    fn huge_timeouts_saturate() {
        let signer = SecureLink::new("secret").with_timeout(Some(u64::MAX));
        assert_eq!(signer.expiration_at(NOW), i64::MAX.to_string());

        let signer = SecureLink::new("secret").with_timeout(Some(i64::MAX as u64));
        assert_eq!(signer.expiration_at(NOW), i64::MAX.to_string());
    }

    #[test]
    fn preserves_existing_query_pairs_first() {
        let signer = SecureLink::new("secret");
        let signed = signer.sign_at("http://h/p?x=1", NOW).unwrap();

        let query = query_of(&signed);
        assert!(query.starts_with("x=1&st="), "query was {query}");
        assert!(query.ends_with(&format!("&e={}", NOW + 3600)));
    }

    #[test]
    fn signature_is_unpadded_base64url_md5() {
        let signer = SecureLink::new("secret");
        let sig = signer.signature("/p", "100");

        // MD5 digests are 16 bytes: 22 base64 chars once padding is stripped.
        assert_eq!(sig.len(), 22);
        assert!(!sig.contains('='));
        assert!(!sig.contains('+') && !sig.contains('/'));
    }

    #[test]
    fn signature_matches_known_digest() {
        // md5("/p100 secret"), base64url without padding.
        let expected = URL_SAFE_NO_PAD.encode(Md5::digest(b"/p100 secret"));
        assert_eq!(SecureLink::new("secret").signature("/p", "100"), expected);
    }

    #[test]
    fn signed_link_verifies_until_expiration() {
        let signer = SecureLink::new("secret");
        let signed = signer.sign_at("http://h/media/rec/a.mp4", NOW).unwrap();

        assert!(signer.verify_at(&signed, NOW));
        assert!(signer.verify_at(&signed, NOW + 3600));
        assert!(!signer.verify_at(&signed, NOW + 3601));
    }

    #[test]
    fn verification_fails_with_another_secret() {
        let signed = SecureLink::new("one").sign_at("http://h/p", NOW).unwrap();
        assert!(!SecureLink::new("two").verify_at(&signed, NOW));
    }

    #[test]
    fn tampered_path_fails_verification() {
        let signer = SecureLink::new("secret");
        let signed = signer.sign_at("http://h/a.mp4", NOW).unwrap();
        let tampered = signed.replace("/a.mp4", "/b.mp4");
        assert!(!signer.verify_at(&tampered, NOW));
    }

    #[test]
    fn link_signatures_change_with_time() {
        let signer = SecureLink::new("secret");
        let a = signer.sign_at("http://h/p", NOW).unwrap();
        let b = signer.sign_at("http://h/p", NOW + 1).unwrap();
        assert_ne!(param(&a, "st"), param(&b, "st"));
    }

    #[test]
    fn live_signatures_are_stable_and_never_expire() {
        let signer = SecureLink::new("secret");
        let a = signer.sign_live("rtmp://media:1935/kam/kam_sp100_cam").unwrap();
        let b = signer.sign_live("rtmp://media:1935/kam/kam_sp100_cam").unwrap();

        assert_eq!(a, b);
        assert_eq!(param(&a, "e"), "");
        assert!(query_of(&a).ends_with("&e="));

        let verifier = SecureLink::new("secret").with_format(LIVE_FORMAT);
        assert!(verifier.verify_at(&a, i64::MAX));
    }

    #[test]
    fn disabled_timeout_emits_empty_expiration() {
        let signer = SecureLink::new("secret").with_timeout(None);
        let signed = signer.sign_at("http://h/p", NOW).unwrap();

        assert_eq!(param(&signed, "e"), "");
        assert_eq!(param(&signed, "st"), signer.signature("/p", ""));
        assert!(signer.verify_at(&signed, NOW + 1_000_000));
    }

    #[test]
    fn empty_secret_still_signs_deterministically() {
        let signer = SecureLink::new("");
        let a = signer.sign_at("http://h/p", NOW).unwrap();
        let b = signer.sign_at("http://h/p", NOW).unwrap();
        assert_eq!(a, b);
        assert!(signer.verify_at(&a, NOW));
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = SecureLink::new("secret").sign_at("/just/a/path", NOW);
        assert!(matches!(err, Err(SigningError::InvalidUrl(_))));
    }
}

use axum::http::{header, HeaderMap};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub(crate) const SESSION_COOKIE: &str = "medichat_session";

/// Signs and verifies session tokens carried in the client cookie.
/// Cookie value format: `{token}.{hex(hmac_sha256(token))}`.
pub(crate) struct CookieSigner {
    key: Vec<u8>,
}

impl CookieSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: secret.to_vec(),
        }
    }

    pub fn sign(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(token.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{token}.{signature}")
    }

    /// Returns the token when the signature checks out; tampered or
    /// malformed values read as no session at all.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (token, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(token.to_string())
    }

    /// Extract and verify the session token from a request's Cookie header.
    pub fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == SESSION_COOKIE {
                self.verify(value)
            } else {
                None
            }
        })
    }

    pub fn set_cookie_value(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.sign(token)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn signer() -> CookieSigner {
        CookieSigner::new(b"an-adequately-long-test-secret-value")
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let signer = signer();
        let signed = signer.sign("abc-123");
        assert_eq!(signer.verify(&signed), Some("abc-123".to_string()));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let signer = signer();
        let signed = signer.sign("abc-123");
        let tampered = signed.replacen("abc", "xyz", 1);
        assert_eq!(signer.verify(&tampered), None);
    }

    #[test]
    fn different_key_is_rejected() {
        let signed = signer().sign("abc-123");
        let other = CookieSigner::new(b"a-completely-different-secret-value!");
        assert_eq!(other.verify(&signed), None);
    }

    #[test]
    fn unsigned_or_garbage_values_are_rejected() {
        let signer = signer();
        assert_eq!(signer.verify("no-signature-here"), None);
        assert_eq!(signer.verify("token.nothex!!"), None);
        assert_eq!(signer.verify(""), None);
    }

    #[test]
    fn token_is_read_from_cookie_header() {
        let signer = signer();
        let mut headers = HeaderMap::new();
        let value = format!("other=1; {SESSION_COOKIE}={}; theme=dark", signer.sign("tok"));
        headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());

        assert_eq!(signer.session_token(&headers), Some("tok".to_string()));
    }

    #[test]
    fn missing_cookie_header_reads_as_no_session() {
        assert_eq!(signer().session_token(&HeaderMap::new()), None);
    }
}

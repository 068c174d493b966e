use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use hackfest_types::api::Flash;
use hackfest_types::session::Claims;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "hackfest_session";
pub const FLASH_COOKIE: &str = "hackfest_flash";

/// Request-scoped identity, decoded from the signed session cookie. Both
/// fields default to "absent" on a missing, expired, or tampered token —
/// handlers decide what they require, the extractor never rejects.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user_id: Option<i64>,
    pub admin: bool,
}

impl Session {
    pub fn require_user(&self) -> Result<i64, ApiError> {
        self.user_id.ok_or(ApiError::Unauthenticated)
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.admin {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    /// Fresh claims carrying this session's identity.
    pub fn claims(&self) -> Claims {
        Claims::new(self.user_id, self.admin)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|c| decode_token(c.value(), &state.session_secret))
            .map(|claims| Session {
                user_id: claims.sub,
                admin: claims.admin,
            })
            .unwrap_or_default();
        Ok(session)
    }
}

pub fn encode_token(secret: &str, claims: &Claims) -> anyhow::Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

pub fn issue_session(
    jar: CookieJar,
    secret: &str,
    claims: &Claims,
) -> Result<CookieJar, ApiError> {
    let token = encode_token(secret, claims).map_err(ApiError::Internal)?;
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    Ok(jar.add(cookie))
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn set_flash(jar: CookieJar, flash: &Flash) -> CookieJar {
    let payload = B64.encode(serde_json::to_vec(flash).unwrap_or_default());
    let mut cookie = Cookie::new(FLASH_COOKIE, payload);
    cookie.set_path("/");
    jar.add(cookie)
}

/// Read and drop the pending flash, if any. Page handlers call this so a
/// message survives exactly one redirect.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE).and_then(|c| {
        let bytes = B64.decode(c.value().as_bytes()).ok()?;
        serde_json::from_slice(&bytes).ok()
    });
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_through_the_token() {
        let claims = Claims::new(Some(42), true);
        let token = encode_token("test-secret", &claims).unwrap();

        let decoded = decode_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, Some(42));
        assert!(decoded.admin);
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let claims = Claims::new(Some(7), false);
        let token = encode_token("test-secret", &claims).unwrap();

        assert!(decode_token(&token, "other-secret").is_none());

        let mut forged = token.clone();
        forged.push('x');
        assert!(decode_token(&forged, "test-secret").is_none());
    }

    #[test]
    fn admin_logout_keeps_participant_identity() {
        let claims = Claims::new(Some(9), true).without_admin();
        assert_eq!(claims.sub, Some(9));
        assert!(!claims.admin);
    }

    #[test]
    fn flash_survives_one_set_take_cycle() {
        let jar = set_flash(CookieJar::default(), &Flash::success("Saved."));
        let (_, flash) = take_flash(jar);
        let flash = flash.unwrap();
        assert_eq!(flash.message, "Saved.");
    }
}

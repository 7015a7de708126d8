use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::{
    config::AppConfig,
    state::{SharedState, sessions::SessionRegistry},
};

/// Name of the session cookie, shared with the web client.
pub const SESSION_COOKIE: &str = "pelada.sid";

/// How long a minted session cookie stays valid in the browser.
const SESSION_TTL: Duration = Duration::days(7);

/// Resolve the caller's session token, minting a token and its cookie when
/// the jar carries none. Mutating endpoints use this so a first-time caller
/// leaves with a session.
pub fn session_identity(state: &SharedState, jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_owned();
        return (jar, token);
    }

    let token = SessionRegistry::mint_token();
    let jar = jar.add(session_cookie(state.config(), token.clone()));
    (jar, token)
}

/// Token carried by the caller's cookie, if any. Read paths never mint one.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Build the session cookie: host-wide, HTTP-only, a week long, scoped to
/// the configured domain when the frontend is served from a sibling
/// subdomain. Production turns on `Secure` and `SameSite=None` so cross-site
/// frontends still send the cookie.
fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(SESSION_TTL);

    if let Some(domain) = config.cookie_domain.clone() {
        builder = builder.domain(domain);
    }
    if config.production {
        builder = builder.secure(true).same_site(SameSite::None);
    }

    builder.build()
}

//! One-shot messages carried across a redirect in a signed cookie.
//!
//! A handler that redirects sets the message with [set_flash]; the page it
//! redirects to consumes it with [take_flash], which also removes the
//! cookie so the message is shown once.

use axum_extra::extract::{SignedCookieJar, cookie::Cookie};

const FLASH_COOKIE: &str = "flash";

/// Store `message` in the flash cookie.
pub fn set_flash(jar: SignedCookieJar, message: &str) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_owned()))
        .path("/")
        .http_only(true)
        .build();

    jar.add(cookie)
}

/// Take the pending flash message, if any, removing it from the jar.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_owned();
            let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();

            (jar.remove(removal), Some(message))
        }
        None => (jar, None),
    }
}

#[cfg(test)]
mod flash_tests {
    use axum_extra::extract::SignedCookieJar;

    use crate::app_state::create_cookie_key;

    use super::{set_flash, take_flash};

    fn empty_jar() -> SignedCookieJar {
        SignedCookieJar::new(create_cookie_key("test-secret"))
    }

    #[test]
    fn take_returns_stored_message() {
        let jar = set_flash(empty_jar(), "Added 12 default categories");

        let (_, message) = take_flash(jar);

        assert_eq!(message, Some("Added 12 default categories".to_owned()));
    }

    #[test]
    fn take_removes_the_cookie() {
        let jar = set_flash(empty_jar(), "once only");

        let (jar, _) = take_flash(jar);
        let (_, message) = take_flash(jar);

        assert_eq!(message, None);
    }

    #[test]
    fn take_on_empty_jar_returns_none() {
        let (_, message) = take_flash(empty_jar());

        assert_eq!(message, None);
    }
}

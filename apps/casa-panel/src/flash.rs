use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "casa_flash";

/// Queues a one-shot notice for the next page rendered.
pub fn set_notice(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

/// Reads and clears the pending notice. Empty when there is none.
pub fn take_notice(jar: CookieJar) -> (CookieJar, String) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, String::new());
    };
    let notice = urlencoding::decode(cookie.value())
        .map(|s| s.into_owned())
        .unwrap_or_default();
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, notice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_survives_one_read() {
        let jar = set_notice(CookieJar::new(), "Fund Request was sent for case CINA-123");
        assert_eq!(
            jar.get(FLASH_COOKIE).unwrap().value(),
            "Fund%20Request%20was%20sent%20for%20case%20CINA-123"
        );

        let (jar, notice) = take_notice(jar);
        assert_eq!(notice, "Fund Request was sent for case CINA-123");

        let (_, again) = take_notice(jar);
        assert!(again.is_empty());
    }
}

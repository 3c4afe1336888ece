//! Browser profile for page loads.
//!
//! The archive viewer serves a reduced page to obvious bots, so requests carry
//! the headers a desktop Chrome would send with a Dutch language preference.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT,
};

/// Headers identifying the client as a desktop browser.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
    pub sec_ch_ua: String,
    pub sec_ch_ua_platform: String,
}

/// Recent Chrome releases (major, full version).
const CHROME_VERSIONS: &[(&str, &str)] = &[
    ("131", "131.0.0.0"),
    ("130", "130.0.0.0"),
    ("129", "129.0.0.0"),
    ("123", "123.0.0.0"),
];

const ACCEPT_LANGUAGES: &[&str] = &[
    "nl-NL,nl;q=0.9,en;q=0.8",
    "nl-NL,nl;q=0.9",
    "nl,en-US;q=0.9,en;q=0.8",
];

#[derive(Debug, Clone, Copy)]
enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    fn random() -> Self {
        let roll: f32 = rand::thread_rng().gen();
        if roll < 0.65 {
            Platform::Windows
        } else if roll < 0.85 {
            Platform::MacOS
        } else {
            Platform::Linux
        }
    }

    fn os_string(self) -> &'static str {
        match self {
            Platform::MacOS => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::Linux => "X11; Linux x86_64",
        }
    }

    fn sec_ch_platform(self) -> &'static str {
        match self {
            Platform::MacOS => "\"macOS\"",
            Platform::Windows => "\"Windows\"",
            Platform::Linux => "\"Linux\"",
        }
    }
}

/// A desktop Chrome profile with a random recent version and platform.
#[must_use]
pub fn chrome_profile() -> BrowserProfile {
    let mut rng = rand::thread_rng();
    let platform = Platform::random();
    let (major, full) = CHROME_VERSIONS.choose(&mut rng).copied().unwrap_or(("131", "131.0.0.0"));
    let accept_language = ACCEPT_LANGUAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or("nl-NL,nl;q=0.9");

    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{full} Safari/537.36",
            platform.os_string()
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
            .to_string(),
        accept_language: accept_language.to_string(),
        accept_encoding: "gzip, deflate, br".to_string(),
        sec_ch_ua: format!(
            "\"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""
        ),
        sec_ch_ua_platform: platform.sec_ch_platform().to_string(),
    }
}

impl BrowserProfile {
    /// Replace the generated User-Agent, e.g. from configuration.
    ///
    /// Client hints are dropped since they would contradict a foreign UA.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self.sec_ch_ua.clear();
        self.sec_ch_ua_platform.clear();
        self
    }

    /// Convert profile to reqwest `HeaderMap`. Values that are not valid
    /// header text are left out.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let mut insert = |name, value: &str| {
            if value.is_empty() {
                return;
            }
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        };

        insert(USER_AGENT, &self.user_agent);
        insert(ACCEPT, &self.accept);
        insert(ACCEPT_LANGUAGE, &self.accept_language);
        insert(ACCEPT_ENCODING, &self.accept_encoding);
        if !self.sec_ch_ua.is_empty() {
            insert(reqwest::header::HeaderName::from_static("sec-ch-ua"), &self.sec_ch_ua);
            insert(reqwest::header::HeaderName::from_static("sec-ch-ua-mobile"), "?0");
            insert(
                reqwest::header::HeaderName::from_static("sec-ch-ua-platform"),
                &self.sec_ch_ua_platform,
            );
        }

        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_profile_prefers_dutch() {
        let profile = chrome_profile();
        assert!(profile.user_agent.contains("Chrome"));
        assert!(profile.accept_language.starts_with("nl"));
        assert!(!profile.sec_ch_ua.is_empty());
    }

    #[test]
    fn headers_include_client_hints() {
        let headers = chrome_profile().to_headers();
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
        assert!(headers.contains_key("sec-ch-ua"));
    }

    #[test]
    fn user_agent_override_drops_client_hints() {
        let headers = chrome_profile().with_user_agent("gemdash-test/1.0").to_headers();
        assert_eq!(headers[USER_AGENT], "gemdash-test/1.0");
        assert!(!headers.contains_key("sec-ch-ua"));
    }
}

use reqwest::Url;

/// Job boards with page-specific overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Greenhouse,
    Lever,
    Generic,
}

impl Platform {
    /// Detects the platform from the URL host. Unparseable URLs are `Generic`.
    pub fn detect(url: &str) -> Self {
        let Some(host) = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        else {
            return Platform::Generic;
        };

        if host_matches(&host, "greenhouse.io") {
            Platform::Greenhouse
        } else if host_matches(&host, "lever.co") {
            Platform::Lever
        } else {
            Platform::Generic
        }
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

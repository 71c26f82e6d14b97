/// Feed URL helpers

pub mod url {
    use url::Url;

    /// Feeds must be reachable over http or https.
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        match Url::parse(url_str) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
            Err(_) => false,
        }
    }

    /// Host of a feed URL without a leading `www.`, for log lines.
    pub fn short_host(url_str: &str) -> String {
        Url::parse(url_str)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| url_str.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn accepts_only_http_feeds() {
            assert!(is_valid_rss_url("https://www.rosario3.com/rss/"));
            assert!(is_valid_rss_url("http://redboing.com/feed/"));
            assert!(!is_valid_rss_url("ftp://example.com/feed"));
            assert!(!is_valid_rss_url("not a url"));
        }

        #[test]
        fn short_host_strips_www() {
            assert_eq!(short_host("https://www.lacapital.com.ar/rss/x.xml"), "lacapital.com.ar");
            assert_eq!(short_host("garbage"), "garbage");
        }
    }
}

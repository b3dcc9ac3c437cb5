use crate::types::Result;
use url::Url;

/// Resolves a sentinel path against the page origin.
///
/// The origin may carry a path of its own (`http://127.0.0.1:5000/app/`);
/// the sentinel is appended to it the way a page-relative fetch would be.
pub fn sentinel_url(origin: &str, sentinel_path: &str) -> Result<Url> {
    let mut base = Url::parse(origin)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base.join(sentinel_path.trim_start_matches('/'))?)
}

/// Builds the WebSocket endpoint `ws://<host>:<port>`
pub fn websocket_endpoint(host: &str, port: u16) -> Result<Url> {
    Ok(Url::parse(&format!("ws://{}:{}", host, port))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::constants::sentinel_paths;

    #[test]
    fn test_sentinel_url_on_bare_origin() {
        let url = sentinel_url("http://127.0.0.1:5000", sentinel_paths::KEEP_ALIVE).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/flaskwebgui-keep-server-alive"
        );
    }

    #[test]
    fn test_sentinel_url_keeps_page_path_and_drops_query() {
        let url = sentinel_url("http://localhost:8000/app?tab=2#top", "/x").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/app/x");
    }

    #[test]
    fn test_sentinel_url_rejects_garbage() {
        assert!(sentinel_url("not a url", "x").is_err());
    }

    #[test]
    fn test_websocket_endpoint() {
        let url = websocket_endpoint("127.0.0.1", 8765).unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.port(), Some(8765));
    }
}

use crate::core::BrowserTrait;
use crate::errors::Result;
use std::path::PathBuf;
use tracing::info;
use url::Url;

const SCREENSHOT_FILENAME: &str = "screenshot.png";
const FALLBACK_HOST: &str = "unknown_host";

/// Persists full-page captures under `<base>/assets/<hostname>/screenshot.png`.
///
/// One filename per host: a later capture of the same host overwrites the
/// earlier one.
pub struct ScreenshotStore {
    base_dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn in_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Deterministic capture path for a page URL.
    pub fn path_for(&self, page_url: &str) -> PathBuf {
        self.base_dir
            .join("assets")
            .join(host_partition(page_url))
            .join(SCREENSHOT_FILENAME)
    }

    /// Capture the current page and write it to the host-partitioned path.
    /// Directory creation is idempotent.
    pub async fn capture<B: BrowserTrait>(
        &self,
        browser: &B,
        tab: &B::TabHandle,
    ) -> Result<PathBuf> {
        let page_url = browser.get_url(tab).await?;
        let path = self.path_for(&page_url);

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let bytes = browser.take_screenshot(tab).await?;
        tokio::fs::write(&path, bytes).await?;

        info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }
}

/// Hostname component used to partition captures, with a fixed fallback for
/// URLs that have no parseable host.
pub fn host_partition(page_url: &str) -> String {
    Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticBrowser;

    #[test]
    fn paths_are_partitioned_by_hostname() {
        let store = ScreenshotStore::new("/tmp/work");
        let path = store.path_for("https://example.com/login?next=/home");
        assert_eq!(
            path,
            PathBuf::from("/tmp/work/assets/example.com/screenshot.png")
        );
    }

    #[test]
    fn same_host_always_maps_to_the_same_path() {
        let store = ScreenshotStore::new("/srv/scans");
        let a = store.path_for("https://docs.rs/tokio");
        let b = store.path_for("https://docs.rs/serde/latest");
        assert_eq!(a, b);
    }

    #[test]
    fn hostless_urls_fall_back_to_a_fixed_partition() {
        assert_eq!(host_partition("not a url"), "unknown_host");
        assert_eq!(host_partition("about:blank"), "unknown_host");
    }

    #[tokio::test]
    async fn capture_writes_to_the_partitioned_path() {
        let dir = std::env::temp_dir().join("ui-scout-capture-test");
        let store = ScreenshotStore::new(&dir);
        let browser = StaticBrowser::new("[]").with_url("https://example.com/pricing");

        let path = store.capture(&browser, &()).await.unwrap();
        assert!(path.ends_with("assets/example.com/screenshot.png"));
        assert!(tokio::fs::metadata(&path).await.is_ok());

        // Second capture of the same host overwrites the same path.
        let again = store.capture(&browser, &()).await.unwrap();
        assert_eq!(path, again);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}

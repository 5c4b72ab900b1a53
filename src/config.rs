//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

const DEFAULT_IMAGE_BASE_URL: &str = "https://images.example.com/patterns";
const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://downloads.example.com/patterns";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Page size used when a listing request omits one
    pub default_page_size: usize,
    /// Largest page size a listing request may ask for
    pub max_page_size: usize,
    /// Records returned per scan page by the file-backed store
    pub scan_page_limit: usize,
    /// JSON export backing the catalog, if any
    pub seed_path: Option<PathBuf>,
    /// Base URL for derived preview image links
    pub image_base_url: String,
    /// Base URL for derived PDF download links
    pub download_base_url: String,
    /// Seconds between background refreshes, 0 disables the task
    pub refresh_interval: u64,
    /// Populate the cache once before accepting requests
    pub warm_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_PAGE_SIZE` - Listing page size (default: 24)
    /// - `MAX_PAGE_SIZE` - Largest accepted page size (default: 200)
    /// - `SCAN_PAGE_LIMIT` - Records per store scan page (default: 100)
    /// - `CATALOG_SEED_PATH` - JSON catalog export (default: unset)
    /// - `IMAGE_BASE_URL` / `DOWNLOAD_BASE_URL` - URL template bases
    /// - `REFRESH_INTERVAL` - Background refresh period in seconds (default: 0)
    /// - `WARM_ON_START` - Populate before serving (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_page_size: parse_var::<usize>("DEFAULT_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
            max_page_size: parse_var::<usize>("MAX_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.max_page_size),
            scan_page_limit: parse_var::<usize>("SCAN_PAGE_LIMIT")
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.scan_page_limit),
            seed_path: env::var("CATALOG_SEED_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            image_base_url: env::var("IMAGE_BASE_URL").unwrap_or(defaults.image_base_url),
            download_base_url: env::var("DOWNLOAD_BASE_URL")
                .unwrap_or(defaults.download_base_url),
            refresh_interval: parse_var("REFRESH_INTERVAL").unwrap_or(defaults.refresh_interval),
            warm_on_start: parse_var("WARM_ON_START").unwrap_or(defaults.warm_on_start),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_page_size: 24,
            max_page_size: 200,
            scan_page_limit: 100,
            seed_path: None,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            refresh_interval: 0,
            warm_on_start: true,
        }
    }
}

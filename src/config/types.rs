use serde::Deserialize;

/// Default portal the crawler talks to
pub const DEFAULT_BASE_URL: &str = "https://pje-consulta-publica.tjmg.jus.br";

/// Default pattern for the result link embedded in a row's `onclick` script.
///
/// The accented letter of "pública" is matched loosely because the portal's
/// markup is sometimes decoded with the wrong charset.
pub const DEFAULT_LINK_PATTERN: &str = r"'Consulta p[^']*blica','(.*?)'";

/// Main configuration structure for the lawsuit tracker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Target portal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Root URL of the public consultation portal (landing page)
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Regex with one capture group extracting the lawsuit link from a result row
    #[serde(rename = "link-pattern", default = "default_link_pattern")]
    pub link_pattern: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            link_pattern: default_link_pattern(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<code>.txt` file per lawsuit when saving is enabled
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Multi-code run configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(rename = "on-failure", default)]
    pub on_failure: FailurePolicy,
}

/// What the driver does when one lawsuit code's crawl fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failed code
    #[default]
    Abort,
    /// Keep going with the remaining codes
    Continue,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_link_pattern() -> String {
    DEFAULT_LINK_PATTERN.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_output_directory() -> String {
    "./save/".to_string()
}

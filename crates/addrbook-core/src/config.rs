//! Address book configuration.

use std::path::{Path, PathBuf};

use addrbook_address::{Address, AddressList, Charset, DEFAULT_WRAP_COLUMNS, IdnOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Application directory under the user's configuration directory.
const APP_DIR: &str = "addrbook";

/// Default mask selecting the real name in a GECOS field.
pub const DEFAULT_GECOS_MASK: &str = "^[^,]*";

/// Settings that affect parsing, expansion and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Qualify bare local mailboxes after alias expansion.
    pub use_domain: bool,
    /// Fully-qualified host name of this machine.
    pub hostname: Option<String>,
    /// Strip the first host label when a hidden host is allowed.
    pub hidden_host: bool,
    /// Allow Unicode domains to be encoded to Punycode.
    pub idn_encode: bool,
    /// Allow Punycode domains to be decoded for display.
    pub idn_decode: bool,
    /// Display charset.
    pub charset: String,
    /// Charset of alias files, when different from `charset`.
    pub config_charset: Option<String>,
    /// File new aliases are appended to.
    pub alias_file: Option<PathBuf>,
    /// The user's From address.
    pub from: Option<String>,
    /// Login name; falls back to `$USER` or `$LOGNAME`.
    pub username: Option<String>,
    /// Regex selecting the real-name part of a GECOS field.
    pub gecos_mask: String,
    /// Column at which header lines are folded.
    pub wrap_columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_domain: true,
            hostname: None,
            hidden_host: false,
            idn_encode: true,
            idn_decode: true,
            charset: "utf-8".to_string(),
            config_charset: None,
            alias_file: None,
            from: None,
            username: None,
            gecos_mask: DEFAULT_GECOS_MASK.to_string(),
            wrap_columns: DEFAULT_WRAP_COLUMNS,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        app_dir().join("config.json")
    }

    /// Loads configuration from a JSON file. A missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Saves configuration as JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the fully-qualified domain name.
    ///
    /// The host name only counts if it contains a dot. With
    /// `may_hide_host` and `hidden_host`, the first label is dropped.
    #[must_use]
    pub fn fqdn(&self, may_hide_host: bool) -> Option<&str> {
        let host = self.hostname.as_deref().filter(|h| h.contains('.'))?;
        if may_hide_host && self.hidden_host {
            return host.split_once('.').map(|(_, domain)| domain);
        }
        Some(host)
    }

    /// Returns the first label of the host name.
    #[must_use]
    pub fn short_hostname(&self) -> Option<&str> {
        let host = self.hostname.as_deref()?;
        host.split('.').next().filter(|h| !h.is_empty())
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.username
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("LOGNAME").ok())
            .filter(|u| !u.is_empty())
    }

    /// Returns the configured From address.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` is set but not a valid address.
    pub fn from_address(&self) -> Result<Option<Address>> {
        let Some(text) = self.from.as_deref() else {
            return Ok(None);
        };
        let list: AddressList = text.parse()?;
        list.iter()
            .find(|a| a.mailbox().is_some())
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::Config(format!("from: no address in '{text}'")))
    }

    /// Returns the IDN conversion switches.
    #[must_use]
    pub const fn idn_options(&self) -> IdnOptions {
        IdnOptions {
            encode: self.idn_encode,
            decode: self.idn_decode,
        }
    }

    /// Returns the charset of alias files.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured label is unknown.
    pub fn alias_charset(&self) -> Result<Charset> {
        let label = self.config_charset.as_deref().unwrap_or(&self.charset);
        Ok(Charset::from_label(label)?)
    }

    /// Returns the file new aliases are appended to.
    #[must_use]
    pub fn alias_file_path(&self) -> PathBuf {
        self.alias_file
            .clone()
            .unwrap_or_else(|| app_dir().join("aliases"))
    }
}

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn with_host(host: &str, hidden: bool) -> Config {
        Config {
            hostname: Some(host.to_string()),
            hidden_host: hidden,
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.use_domain);
        assert_eq!(config.wrap_columns, 74);
        assert_eq!(config.gecos_mask, "^[^,]*");
        assert_eq!(config.idn_options(), IdnOptions::default());
    }

    #[test]
    fn test_fqdn() {
        let config = with_host("mail.example.org", false);
        assert_eq!(config.fqdn(true), Some("mail.example.org"));
        assert_eq!(config.short_hostname(), Some("mail"));

        let hidden = with_host("mail.example.org", true);
        assert_eq!(hidden.fqdn(true), Some("example.org"));
        assert_eq!(hidden.fqdn(false), Some("mail.example.org"));

        assert_eq!(with_host("localhost", false).fqdn(false), None);
        assert_eq!(Config::default().fqdn(false), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"hostname": "a.b.c", "use_domain": false}"#).unwrap();
        assert_eq!(config.hostname.as_deref(), Some("a.b.c"));
        assert!(!config.use_domain);
        assert!(config.idn_encode);
        assert_eq!(config.charset, "utf-8");
    }

    #[test]
    fn test_load_missing_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        let config = with_host("x.y.z", true);
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Serde(_))));
    }

    #[test]
    fn test_from_address() {
        let config = Config {
            from: Some("Me <me@example.org>".into()),
            ..Config::default()
        };
        let from = config.from_address().unwrap().unwrap();
        assert_eq!(from.mailbox(), Some("me@example.org"));
        assert!(Config::default().from_address().unwrap().is_none());
    }

    #[test]
    fn test_alias_charset() {
        let config = Config {
            config_charset: Some("iso-8859-1".into()),
            ..Config::default()
        };
        assert!(!config.alias_charset().unwrap().is_utf8());
        assert!(Config::default().alias_charset().unwrap().is_utf8());
    }
}

//! The version check itself: registry fetch, comparison, state file,
//! and user messaging.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use humanly::{HumanDuration, HumanTime};
use serde::Deserialize;
use thiserror::Error;

use crate::changelog::latest_section;
use crate::output::{MessageSink, Severity};
use crate::version::parse_version;

/// Fixed per-request timeout. Not user-configurable: a dead network must
/// never wedge an interactive host for longer than this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Name of the single-line file recording the last checked version.
const STATE_FILE: &str = "last_version_check";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Failure classes behind the fail-soft surface. Callers never see this
/// type: the changelog path collapses errors to `None`, the check path
/// collapses them into a single error-severity message.
#[derive(Debug, Error)]
enum NotifyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("registry returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed registry payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("state file: {0}")]
    State(#[from] io::Error),
}

/// Registry metadata payload, PyPI-shaped: `info.version` names the
/// latest published release, `urls` lists its uploaded files.
#[derive(Deserialize)]
struct RegistryResponse {
    info: PackageInfo,
    #[serde(default)]
    urls: Vec<ReleaseFile>,
}

#[derive(Deserialize)]
struct PackageInfo {
    version: String,
}

#[derive(Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
}

/// The latest published release according to the registry.
struct LatestRelease {
    version: String,
    released: Option<DateTime<Utc>>,
}

/// Checks a registry for newer releases and tells the user what changed.
///
/// A notifier is built once per tool with the tool's package name, the
/// running version, and the URL of its changelog document. The registry
/// metadata endpoint defaults to PyPI and the state file lives in the
/// tool's dot-directory under the user's home; both can be overridden,
/// which is also how the tests point a notifier at a local server.
///
/// # Examples
///
/// ```no_run
/// use whatsnew::{StderrSink, VersionNotifier};
///
/// let notifier = VersionNotifier::new(
///     "pkgx",
///     env!("CARGO_PKG_VERSION"),
///     "https://raw.githubusercontent.com/acme/pkgx/main/CHANGELOG.rst",
/// );
/// notifier.check_and_notify(&StderrSink);
/// ```
pub struct VersionNotifier {
    package: String,
    current_version: String,
    changelog_url: String,
    registry_url: String,
    state_dir: Option<PathBuf>,
    http: reqwest::blocking::Client,
}

impl VersionNotifier {
    /// Creates a notifier for one tool.
    ///
    /// # Arguments
    ///
    /// * `package` - The published package name
    /// * `current_version` - The running version, typically
    ///   `env!("CARGO_PKG_VERSION")` at the host call site
    /// * `changelog_url` - Where the full changelog document is served
    pub fn new(package: &str, current_version: &str, changelog_url: &str) -> Self {
        VersionNotifier {
            package: package.to_string(),
            current_version: current_version.to_string(),
            changelog_url: changelog_url.to_string(),
            registry_url: format!("https://pypi.org/pypi/{}/json", package),
            state_dir: dirs::home_dir().map(|home| home.join(format!(".{}", package))),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Points the notifier at a different metadata endpoint, for tools
    /// published somewhere other than pypi.org. The endpoint must serve
    /// JSON with at least an `info.version` string field.
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    /// Keeps the state file under `dir` instead of the default
    /// `~/.{package}` directory.
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Fetches the full changelog document.
    ///
    /// # Returns
    ///
    /// * `Some(text)` - The response body on a success status
    /// * `None` - On any non-success status or network failure; the
    ///   cause is logged at debug level and otherwise swallowed
    pub fn fetch_changelog(&self) -> Option<String> {
        match self.fetch_changelog_inner() {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(error = %err, "changelog fetch failed");
                None
            }
        }
    }

    fn fetch_changelog_inner(&self) -> Result<String, NotifyError> {
        let response = self
            .http
            .get(&self.changelog_url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        Ok(response.text()?)
    }

    /// Returns the newest section of the changelog.
    ///
    /// # Arguments
    ///
    /// * `full_changelog` - An already-fetched changelog document, or
    ///   `None` to fetch it via [`fetch_changelog`](Self::fetch_changelog)
    pub fn latest_changelog(&self, full_changelog: Option<&str>) -> Option<String> {
        match full_changelog {
            Some(text) => latest_section(text),
            None => latest_section(&self.fetch_changelog()?),
        }
    }

    /// Runs the whole upgrade check, delivering its findings to `sink`.
    ///
    /// If a newer release is published, the sink receives warning-level
    /// upgrade instructions plus the newest changelog section. If the
    /// running version is current but newer than the last one this check
    /// recorded, the sink receives an info-level thank-you with the
    /// changes shipped in it. Any failure along the way is collapsed into
    /// a single error-level message; this method never panics and never
    /// returns an error.
    pub fn check_and_notify(&self, sink: &dyn MessageSink) {
        if let Err(err) = self.run_check(sink) {
            tracing::debug!(error = %err, "version check failed");
            sink.send(
                &format!("Error checking for most recent version: {}", err),
                Severity::Error,
            );
        }
    }

    fn run_check(&self, sink: &dyn MessageSink) -> Result<(), NotifyError> {
        let latest = self.fetch_latest_release()?;
        let current = self.current_version.as_str();

        if parse_version(current) < parse_version(&latest.version) {
            sink.send(&self.availability_notice(&latest), Severity::Warning);
            sink.send(
                &format!("pip install --upgrade {}", self.package),
                Severity::Warning,
            );
            if let Some(section) = self.latest_changelog(None).filter(|s| !s.is_empty()) {
                sink.send(
                    "Upgrade for the following features/improvements:",
                    Severity::Warning,
                );
                sink.send(&section, Severity::Warning);
            }
        } else {
            if let Some(last) = self.last_checked()? {
                if parse_version(&last) < parse_version(current) {
                    if let Some(section) = self.latest_changelog(None).filter(|s| !s.is_empty()) {
                        sink.send(
                            &format!("Thanks for upgrading to v{}.", current),
                            Severity::Info,
                        );
                        sink.send("Changes in this version:", Severity::Info);
                        sink.send(&section, Severity::Info);
                    }
                }
            }
            // Always rewritten, even when nothing was recorded before or
            // the recorded version already matches.
            self.record_checked(current)?;
        }
        Ok(())
    }

    fn fetch_latest_release(&self) -> Result<LatestRelease, NotifyError> {
        let response = self
            .http
            .get(&self.registry_url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        let payload: RegistryResponse = serde_json::from_str(&response.text()?)?;
        let released = payload
            .urls
            .iter()
            .find_map(|file| file.upload_time_iso_8601.as_deref())
            .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
            .map(|date| date.with_timezone(&Utc));

        Ok(LatestRelease {
            version: payload.info.version,
            released,
        })
    }

    /// First line of the upgrade notice, with the release's age when the
    /// registry reported an upload time.
    fn availability_notice(&self, latest: &LatestRelease) -> String {
        let mut notice = format!("Version v{} of {} is available", latest.version, self.package);
        if let Some(released) = latest.released {
            notice.push_str(&format!(", released {}", relative_release_date(released)));
        }
        notice.push_str(&format!(
            ". If pip was used to install {}, upgrade with:",
            self.package
        ));
        notice
    }

    /// Reads the recorded last-checked version. Missing file (or no
    /// resolvable state directory) reads as `None`; an unreadable
    /// existing file is an error.
    fn last_checked(&self) -> Result<Option<String>, NotifyError> {
        if let Some(path) = self.state_file() {
            if path.exists() {
                return Ok(Some(fs::read_to_string(path)?));
            }
        }
        Ok(None)
    }

    /// Overwrites the state file with `version`, creating the state
    /// directory first if needed.
    fn record_checked(&self, version: &str) -> Result<(), NotifyError> {
        let Some(dir) = self.state_dir.as_ref() else {
            return Err(NotifyError::State(io::Error::new(
                io::ErrorKind::NotFound,
                "no home directory to hold the state file",
            )));
        };
        fs::create_dir_all(dir)?;
        Ok(fs::write(dir.join(STATE_FILE), version)?)
    }

    fn state_file(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|dir| dir.join(STATE_FILE))
    }
}

/// Renders a release time as "3 days ago", "in 2 hours" for clock skew,
/// or an absolute date once it is more than a week old.
fn relative_release_date(released: DateTime<Utc>) -> String {
    let age = Utc::now().signed_duration_since(released);

    if age.num_days() > 7 {
        return released.format("%x %X").to_string();
    }

    if age.num_seconds() < 0 {
        let ahead = Duration::from_secs(age.num_seconds().unsigned_abs());
        return format!("in {}", HumanTime::from(ahead));
    }

    let elapsed = Duration::from_secs(age.num_seconds().max(0) as u64);
    HumanDuration::from(Some(SystemTime::now() - elapsed)).to_string()
}

/// Convenience wrapper that builds a [`VersionNotifier`] with the default
/// endpoints and runs one check.
///
/// This is the one-liner to call at host startup.
///
/// # Arguments
///
/// * `package` - The published package name
/// * `current_version` - The running version, typically `env!("CARGO_PKG_VERSION")`
/// * `changelog_url` - Where the full changelog document is served
/// * `sink` - Where messages for the user go
///
/// # Examples
///
/// ```no_run
/// use whatsnew::{StderrSink, version_check};
///
/// fn main() {
///     version_check(
///         "pkgx",
///         env!("CARGO_PKG_VERSION"),
///         "https://raw.githubusercontent.com/acme/pkgx/main/CHANGELOG.rst",
///         &StderrSink,
///     );
///
///     // Rest of the application...
/// }
/// ```
pub fn version_check(
    package: &str,
    current_version: &str,
    changelog_url: &str,
    sink: &dyn MessageSink,
) {
    VersionNotifier::new(package, current_version, changelog_url).check_and_notify(sink);
}

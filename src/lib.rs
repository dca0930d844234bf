//! # whatsnew
//!
//! A Rust library that announces new releases and changelog highlights for
//! PyPI-distributed tools.
//!
//! **whatsnew** compares the running version against the package's registry
//! metadata, then tells the user what changed through whatever output channel
//! the host application provides. Every check is fail-soft: a broken network,
//! a malformed payload, or an unwritable disk never panics and never raises,
//! it produces at most one error-severity message.
//!
//! # Quick Start
//!
//! Run the following command to add whatsnew to your project's dependencies:
//!
//! ```shell
//! cargo add whatsnew
//! ```
//!
//! # Usage
//!
//! ## Basic
//!
//! The easiest way to use this crate is with the [`version_check`] function:
//!
//! ```no_run
//!
//! fn main() {
//!     // Check for updates at startup
//!     whatsnew::version_check(
//!         "pkgx",
//!         env!("CARGO_PKG_VERSION"),
//!         "https://raw.githubusercontent.com/acme/pkgx/main/CHANGELOG.rst",
//!         &whatsnew::StderrSink,
//!     );
//!
//!     // Your application code here...
//!     println!("Hello, world!");
//! }
//! ```
//!
//! If a newer release is published, it will print to stderr:
//! ```text
//! Version v1.2.0 of pkgx is available, released 3 days ago. If pip was used to install pkgx, upgrade with:
//! pip install --upgrade pkgx
//! Upgrade for the following features/improvements:
//! - Faster startup
//! - Fewer crashes
//! ```
//!
//! After the user upgrades, the next check thanks them instead:
//! ```text
//! Thanks for upgrading to v1.2.0.
//! Changes in this version:
//! - Faster startup
//! - Fewer crashes
//! ```
//!
//! ## Advanced
//!
//! For more control over the checking process, use [`VersionNotifier`] directly:
//!
//! ```no_run
//! use whatsnew::{StderrSink, VersionNotifier};
//!
//! fn main() {
//!     let notifier = VersionNotifier::new(
//!         "pkgx",
//!         env!("CARGO_PKG_VERSION"),
//!         "https://example.com/CHANGELOG.rst",
//!     )
//!     .with_registry_url("https://registry.example.com/pypi/pkgx/json");
//!
//!     notifier.check_and_notify(&StderrSink);
//! }
//! ```
//!
//! ## Routing Messages
//!
//! Hosts with their own output pipeline implement [`MessageSink`] once and
//! decide what each [`Severity`] looks like on screen:
//!
//! ```no_run
//! use whatsnew::{MessageSink, Severity, version_check};
//!
//! struct Plain;
//!
//! impl MessageSink for Plain {
//!     fn send(&self, text: &str, severity: Severity) {
//!         match severity {
//!             Severity::Error => eprintln!("{}", text),
//!             _ => println!("{}", text),
//!         }
//!     }
//! }
//!
//! fn main() {
//!     version_check(
//!         "pkgx",
//!         env!("CARGO_PKG_VERSION"),
//!         "https://example.com/CHANGELOG.rst",
//!         &Plain,
//!     );
//! }
//! ```
//!
//! ## Reading the Changelog Yourself
//!
//! [`latest_section`] splits any changelog document you already hold, without
//! touching the network:
//!
//! ```
//! use whatsnew::latest_section;
//!
//! let changelog = "\
//! Changelog
//! =========
//!
//! v0.2.0
//! ------
//! - Added exports
//!
//! v0.1.0
//! ------
//! - First release
//! ";
//!
//! assert_eq!(latest_section(changelog).unwrap(), "- Added exports");
//! ```
//!
//! # State File Behaviour
//!
//! The thank-you message relies on one piece of persisted state:
//!
//! - **State location**: `~/.{package}/last_version_check`
//! - **State format**: a single version string, nothing else
//! - **Write policy**: rewritten after every up-to-date check, even when the
//!   recorded version has not changed
//!
//! No state is written while the running version is outdated, so the
//! thank-you fires exactly once per completed upgrade.
//!

mod changelog;
mod notifier;
mod output;
mod version;

pub use changelog::latest_section;
pub use notifier::{VersionNotifier, version_check};
pub use output::{MessageSink, Severity, StderrSink};

#[cfg(test)]
mod tests {
    use crate::version::parse_version;

    #[test]
    fn test_version_parsing() {
        assert!(parse_version("2.4.1") > parse_version("2.4.0"));
        assert!(parse_version("2.4.0") > parse_version("2.4.0-alpha"));
        assert!(parse_version("1.1.1") > parse_version("1.1.0"));
        assert_eq!(parse_version("1.0.0"), parse_version("1.0"));
    }

    #[test]
    fn test_prerelease_ordering() {
        assert!(parse_version("1.0.0") > parse_version("1.0.0-rc1"));
        assert!(parse_version("1.0.0-rc2") > parse_version("1.0.0-rc1"));
        assert!(parse_version("1.0.0-beta") < parse_version("1.0.0-rc"));
        assert!(parse_version("1.0.0-alpha") < parse_version("1.0.0-beta"));
    }

    #[test]
    fn test_post_and_dev_ordering() {
        assert!(parse_version("1.0.post1") > parse_version("1.0.0"));
        assert!(parse_version("1.0-1") > parse_version("1.0"));
        assert!(parse_version("1.0.dev3") < parse_version("1.0.0-alpha"));
        assert_eq!(parse_version("1.0.0-RC1"), parse_version("1.0.0-rc1"));
    }
}

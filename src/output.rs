//! Message delivery for upgrade notices.
//!
//! The notifier never prints on its own; every message goes through a
//! [`MessageSink`] supplied by the host, so an interactive session can
//! style warnings and errors however it renders the rest of its output.
//! [`StderrSink`] is the plain fallback for command-line hosts.

/// How urgently a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine notices, like post-upgrade changelog highlights
    Info,
    /// A newer release exists and the user should act
    Warning,
    /// The check itself failed
    Error,
}

/// Receives the (text, severity) pairs produced by a version check.
///
/// Implementations must not panic; the notifier offers no recovery path
/// for a failing sink.
pub trait MessageSink {
    /// Delivers one message to the user.
    fn send(&self, text: &str, severity: Severity);
}

/// A [`MessageSink`] that prints every message as a line on stderr.
///
/// Severity is ignored: the message texts already read correctly without
/// decoration, and hosts that want colour or routing implement their own
/// sink instead.
///
/// # Examples
///
/// ```no_run
/// use whatsnew::{StderrSink, version_check};
///
/// version_check(
///     "pkgx",
///     env!("CARGO_PKG_VERSION"),
///     "https://raw.githubusercontent.com/acme/pkgx/main/CHANGELOG.rst",
///     &StderrSink,
/// );
/// ```
pub struct StderrSink;

impl MessageSink for StderrSink {
    fn send(&self, text: &str, _severity: Severity) {
        eprintln!("{}", text);
    }
}

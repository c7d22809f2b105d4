//! Error classification shared by every fallible module.
//!
//! DESIGN
//! ======
//! Nothing in the browser is fatal to a session. Errors either fall back to
//! a default or surface as a transient notice, so each error type carries a
//! grepable code for logs and a retryable flag for the presentation layer.

/// Grepable code + retry hint for an error value.
pub trait ErrorCode {
    /// Stable upper-snake code, e.g. `E_LIMIT_REACHED`.
    fn error_code(&self) -> &'static str;

    /// `true` when repeating the same action may succeed.
    fn retryable(&self) -> bool {
        false
    }
}

//! Connect call configuration
//!
//! Every connect-shaped operation takes a [`ConnectRequest`]: either a URI
//! to dial plus driver options, or an explicit "reuse whatever is there"
//! marker. Typed optional fields replace argument sniffing; a request means
//! one thing no matter which convenience constructor built it.

use std::collections::HashMap;

/// Options forwarded to [`Driver::connect`](crate::Driver::connect).
///
/// The gate stores and forwards these without interpreting them.
/// `pool_size` is the conventional cap on transport connections a backing
/// driver may multiplex behind one handle; anything else rides in `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Maximum transport connections behind the handle (driver-defined
    /// default when `None`).
    pub pool_size: Option<u32>,
    /// Additional driver parameters.
    pub params: HashMap<String, String>,
}

impl ConnectOptions {
    /// Create empty options; the driver applies its own defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of transport connections behind the handle.
    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = Some(size);
        self
    }

    /// Add a driver parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// One connect-shaped call.
///
/// # Examples
///
/// ```
/// use poolgate::ConnectRequest;
///
/// // Dial this URI if nothing is connected yet.
/// let dial = ConnectRequest::to("memory://primary").pool_size(3);
/// assert_eq!(dial.uri.as_deref(), Some("memory://primary"));
///
/// // Take whatever the gate already has (or join the attempt in flight).
/// let reuse = ConnectRequest::reuse();
/// assert_eq!(reuse.uri, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectRequest {
    /// URI to dial if the gate turns out to be empty.
    pub uri: Option<String>,
    /// Options forwarded to the driver on a fresh dial.
    pub options: ConnectOptions,
}

impl ConnectRequest {
    /// Request targeting `uri`.
    ///
    /// The URI only matters when the gate is empty; a stored handle or an
    /// in-flight attempt always wins, whatever it was dialed with.
    pub fn to(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            options: ConnectOptions::default(),
        }
    }

    /// Parameterless request: reuse the stored handle or join the in-flight
    /// attempt. On an empty gate this yields
    /// [`Error::MissingUri`](crate::Error::MissingUri).
    pub fn reuse() -> Self {
        Self::default()
    }

    /// Replace the options wholesale.
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for [`ConnectOptions::pool_size`].
    pub fn pool_size(mut self, size: u32) -> Self {
        self.options.pool_size = Some(size);
        self
    }

    /// Shorthand for [`ConnectOptions::param`].
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ConnectOptions::new()
            .pool_size(5)
            .param("app_name", "reports");

        assert_eq!(options.pool_size, Some(5));
        assert_eq!(options.params.get("app_name").map(String::as_str), Some("reports"));
    }

    #[test]
    fn test_request_to_carries_uri_and_options() {
        let request = ConnectRequest::to("memory://primary")
            .pool_size(3)
            .param("replica_set", "rs0");

        assert_eq!(request.uri.as_deref(), Some("memory://primary"));
        assert_eq!(request.options.pool_size, Some(3));
        assert_eq!(
            request.options.params.get("replica_set").map(String::as_str),
            Some("rs0")
        );
    }

    #[test]
    fn test_reuse_request_is_empty() {
        let request = ConnectRequest::reuse();
        assert_eq!(request.uri, None);
        assert_eq!(request.options, ConnectOptions::default());
    }

    #[test]
    fn test_options_replaced_wholesale() {
        let request = ConnectRequest::to("memory://primary")
            .pool_size(10)
            .options(ConnectOptions::new().pool_size(2));

        assert_eq!(request.options.pool_size, Some(2));
    }
}

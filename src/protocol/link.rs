// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Link management: connection establishment with retry, and scoped
//! sessions whose I/O races the transport's disconnect signal.

use std::time::Duration;

use crate::error::LinkError;
use crate::protocol::frame::Frame;
use crate::protocol::transport::{
    DisconnectListener, Transport, TransportSession, disconnect_channel,
};

/// Configuration for connection establishment.
///
/// The retry policy is a tunable, not a correctness requirement: any policy
/// must eventually give up and surface [`LinkError::ConnectFailed`] instead
/// of retrying forever.
///
/// # Examples
///
/// ```
/// use dreamview_lib::protocol::LinkConfig;
/// use std::time::Duration;
///
/// let config = LinkConfig::new()
///     .with_connect_attempts(5)
///     .with_backoff(Duration::from_millis(100));
/// assert_eq!(config.connect_attempts(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct LinkConfig {
    connect_attempts: u32,
    backoff: Duration,
    backoff_cap: Duration,
}

impl LinkConfig {
    /// Default number of connection attempts.
    pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
    /// Default delay before the first reattempt; doubles per attempt.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);
    /// Default upper bound on the backoff delay.
    pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(2);

    /// Creates a configuration with the default retry policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_attempts: Self::DEFAULT_CONNECT_ATTEMPTS,
            backoff: Self::DEFAULT_BACKOFF,
            backoff_cap: Self::DEFAULT_BACKOFF_CAP,
        }
    }

    /// Sets the number of connection attempts (minimum 1).
    #[must_use]
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Sets the initial backoff delay between attempts.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the upper bound on the backoff delay.
    #[must_use]
    pub fn with_backoff_cap(mut self, cap: Duration) -> Self {
        self.backoff_cap = cap;
        self
    }

    /// Returns the configured number of attempts.
    #[must_use]
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    /// Returns the initial backoff delay.
    #[must_use]
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Returns the backoff cap.
    #[must_use]
    pub fn backoff_cap(&self) -> Duration {
        self.backoff_cap
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of the single physical link to one device.
///
/// `Link` hides transport flakiness behind a narrow API: [`connect`]
/// retries with exponential backoff and returns a scoped [`Session`]; every
/// session carries the disconnect signal registered with the transport, so
/// in-flight I/O fails fast instead of hanging until an external timeout.
///
/// [`connect`]: Link::connect
#[derive(Debug)]
pub struct Link<T: Transport> {
    transport: T,
    config: LinkConfig,
}

impl<T: Transport> Link<T> {
    /// Creates a link over the given transport with the default policy.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: LinkConfig::new(),
        }
    }

    /// Replaces the retry configuration.
    #[must_use]
    pub fn with_config(mut self, config: LinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Establishes a session, retrying transient failures with backoff.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::ConnectFailed`] wrapping the last attempt's
    /// error once the attempt budget is spent.
    pub async fn connect(&self) -> Result<Session<T::Session>, LinkError> {
        let attempts = self.config.connect_attempts;
        let mut delay = self.config.backoff;
        let mut last_error = None;

        for attempt in 1..=attempts {
            let (notifier, listener) = disconnect_channel();
            match self.transport.connect(notifier).await {
                Ok(inner) => {
                    tracing::debug!(attempt, "link established");
                    return Ok(Session::new(inner, listener));
                }
                Err(err) => {
                    tracing::warn!(attempt, attempts, error = %err, "connect attempt failed");
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                        delay = (delay * 2).min(self.config.backoff_cap);
                    }
                }
            }
        }

        Err(LinkError::ConnectFailed {
            attempts,
            source: Box::new(
                last_error.unwrap_or_else(|| LinkError::Transport("no attempt made".to_string())),
            ),
        })
    }
}

/// A scoped live connection to the device.
///
/// A session is bounded to one logical operation (init, refresh or a
/// command batch) and is never held across polling intervals. Both I/O
/// methods race the transport's disconnect signal: whichever fires first
/// determines the outcome, so a dropped link surfaces as
/// [`LinkError::Disconnected`] immediately instead of stalling the
/// operation until its deadline.
///
/// Call [`close`](Session::close) at the end of the scope; if the session
/// is instead dropped (for example when a surrounding deadline cancels the
/// operation), the transport session's own drop handling releases the link.
#[derive(Debug)]
pub struct Session<S: TransportSession> {
    inner: S,
    disconnected: DisconnectListener,
}

impl<S: TransportSession> Session<S> {
    pub(crate) fn new(inner: S, disconnected: DisconnectListener) -> Self {
        Self {
            inner,
            disconnected,
        }
    }

    /// Writes one frame to the control characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Disconnected`] if the link drops first, or the
    /// transport's own error if the write fails.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<(), LinkError> {
        tokio::select! {
            biased;
            () = self.disconnected.wait() => Err(LinkError::Disconnected),
            result = self.inner.write(frame.as_bytes()) => result,
        }
    }

    /// Reads the next raw notification from the control characteristic.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Disconnected`] if the link drops first, or the
    /// transport's own error if the read fails.
    pub async fn read_frame(&mut self) -> Result<Vec<u8>, LinkError> {
        tokio::select! {
            biased;
            () = self.disconnected.wait() => Err(LinkError::Disconnected),
            result = self.inner.read() => result,
        }
    }

    /// Releases the underlying connection.
    pub async fn close(mut self) {
        self.inner.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.connect_attempts(), 3);
        assert_eq!(config.backoff(), Duration::from_millis(250));
        assert_eq!(config.backoff_cap(), Duration::from_secs(2));
    }

    #[test]
    fn config_normalizes_zero_attempts() {
        let config = LinkConfig::new().with_connect_attempts(0);
        assert_eq!(config.connect_attempts(), 1);
    }

    #[test]
    fn config_builder_chain() {
        let config = LinkConfig::new()
            .with_connect_attempts(5)
            .with_backoff(Duration::from_millis(50))
            .with_backoff_cap(Duration::from_millis(800));

        assert_eq!(config.connect_attempts(), 5);
        assert_eq!(config.backoff(), Duration::from_millis(50));
        assert_eq!(config.backoff_cap(), Duration::from_millis(800));
    }
}

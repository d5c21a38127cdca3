//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Client configuration

use std::time::Duration;

/// Capability announcement sent as soon as the transport opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Announcement {
    /// `WILL SGA`, `WILL ECHO`, `WILL NAWS`
    #[default]
    Full,
    /// Nothing; the server has to ask.
    Minimal,
}

/// Telnet client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Terminal width in columns
    pub terminal_width: u16,

    /// Terminal height in rows
    pub terminal_height: u16,

    /// Bound on address resolution plus TCP connect
    pub connect_timeout: Duration,

    /// Longest a single `process` call waits for the socket to become readable
    pub poll_timeout: Duration,

    /// Maximum number of bytes drained per `process` call
    pub read_chunk_size: usize,

    /// Options offered right after connecting
    pub announcement: Announcement,

    /// Deliver connection progress messages to the output sink
    pub status_notices: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            terminal_width: 80,
            terminal_height: 24,
            connect_timeout: Duration::from_secs(10),
            poll_timeout: Duration::from_millis(10),
            read_chunk_size: 1024,
            announcement: Announcement::Full,
            status_notices: false,
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the terminal size
    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the readiness wait used by each `process` call
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the maximum chunk drained per `process` call
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    /// Set the capability announcement
    pub fn with_announcement(mut self, announcement: Announcement) -> Self {
        self.announcement = announcement;
        self
    }

    /// Enable or disable progress messages on the output sink
    pub fn with_status_notices(mut self, enabled: bool) -> Self {
        self.status_notices = enabled;
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if self.connect_timeout.is_zero() {
            return Err("connect_timeout must be greater than 0".to_string());
        }

        if self.poll_timeout.is_zero() {
            return Err("poll_timeout must be greater than 0".to_string());
        }

        if self.read_chunk_size == 0 {
            return Err("read_chunk_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

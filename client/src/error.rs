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


//! Client error types

use std::io;
use termlink_telnetcodec::CodecError;
use thiserror::Error;

/// Client error type
///
/// A closed connection is not an error: `process` returns `Ok(())` and the connection
/// reports itself disconnected.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure while connecting, sending, or receiving
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connection timeout
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// The connection has already been torn down
    #[error("Not connected")]
    NotConnected,

    /// Codec error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration rejected by `ClientConfig::validate`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

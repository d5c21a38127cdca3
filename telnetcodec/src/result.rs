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


use crate::TelnetOption;
use thiserror::Error;

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur while encoding or decoding Telnet payloads.
///
/// Negotiation itself never fails: every unrecognised option falls into the refusal branch
/// of the policy table. These errors only come from writing frames into a buffer or from
/// interpreting a sub-negotiation payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error occurred while writing an encoded payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sub-negotiation payload was shorter than its option requires.
    #[error(
        "Subnegotiation error for option {option}: insufficient data (required: {required}, available: {available})"
    )]
    InsufficientData {
        /// The telnet option being subnegotiated
        option: TelnetOption,
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },
}

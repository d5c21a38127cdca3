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


use crate::{CodecResult, TelnetOption, WindowSize, consts};
use bytes::{BufMut, Bytes};

/// The four option negotiation verbs of RFC 854.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NegotiationCommand {
    /// Sender wants to enable an option on its side
    Will,
    /// Sender refuses or disables an option on its side
    Wont,
    /// Sender asks the receiver to enable an option
    Do,
    /// Sender asks the receiver to disable an option
    Dont,
}

impl NegotiationCommand {
    /// Wire code of this command.
    pub fn to_u8(self) -> u8 {
        match self {
            NegotiationCommand::Will => consts::WILL,
            NegotiationCommand::Wont => consts::WONT,
            NegotiationCommand::Do => consts::DO,
            NegotiationCommand::Dont => consts::DONT,
        }
    }

    /// Returns the command for a wire code, or `None` for any other command byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            consts::WILL => Some(NegotiationCommand::Will),
            consts::WONT => Some(NegotiationCommand::Wont),
            consts::DO => Some(NegotiationCommand::Do),
            consts::DONT => Some(NegotiationCommand::Dont),
            _ => None,
        }
    }
}

impl std::fmt::Display for NegotiationCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationCommand::Will => write!(f, "WILL"),
            NegotiationCommand::Wont => write!(f, "WONT"),
            NegotiationCommand::Do => write!(f, "DO"),
            NegotiationCommand::Dont => write!(f, "DONT"),
        }
    }
}

///
/// Telnet Subnegotiation Argument
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// A NAWS payload: the window width and height in characters.
    NAWSWindowSize(WindowSize),
    /// A subnegotiation for any other option, or a NAWS payload of the wrong length.
    Unknown(TelnetOption, Bytes),
}

impl TelnetArgument {
    /// Classifies a completed sub-negotiation payload.
    pub fn parse(option: TelnetOption, payload: Bytes) -> Self {
        match option {
            TelnetOption::NAWS if payload.len() == WindowSize::LEN => {
                let mut src = payload.clone();
                match WindowSize::decode(&mut src) {
                    Ok(size) => TelnetArgument::NAWSWindowSize(size),
                    Err(_) => TelnetArgument::Unknown(option, payload),
                }
            }
            _ => TelnetArgument::Unknown(option, payload),
        }
    }

    /// Returns the option this argument belongs to.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::NAWSWindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }

    /// Returns the encoded byte length of the payload, excluding framing.
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.len(),
            TelnetArgument::Unknown(_option, inner) => inner.len(),
        }
    }

    /// Returns `true` when the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the payload bytes into `dst`, returning the number of bytes written.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.encode(dst),
            TelnetArgument::Unknown(_option, inner) => {
                dst.put_slice(inner);
                Ok(inner.len())
            }
        }
    }
}

///
/// An outbound Telnet command frame.
///
/// Replies produced by the negotiation policy and the client's own announcements
/// are expressed as frames and serialised by [`crate::TelnetCodec`].
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// `IAC WILL <option>`
    Will(TelnetOption),
    /// `IAC WONT <option>`
    Wont(TelnetOption),
    /// `IAC DO <option>`
    Do(TelnetOption),
    /// `IAC DONT <option>`
    Dont(TelnetOption),
    /// `IAC SB <option> <payload> IAC SE`
    Subnegotiate(TelnetArgument),
}

impl TelnetFrame {
    /// The window-size report frame for the given geometry.
    pub fn window_size(size: WindowSize) -> Self {
        TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(size))
    }

    /// Number of bytes this frame occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        match self {
            TelnetFrame::Subnegotiate(argument) => 5 + argument.len(),
            _ => 3,
        }
    }
}

impl std::fmt::Display for TelnetFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetFrame::Will(option) => write!(f, "WILL {option}"),
            TelnetFrame::Wont(option) => write!(f, "WONT {option}"),
            TelnetFrame::Do(option) => write!(f, "DO {option}"),
            TelnetFrame::Dont(option) => write!(f, "DONT {option}"),
            TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(size)) => {
                write!(f, "SB NAWS {size}")
            }
            TelnetFrame::Subnegotiate(argument) => {
                write!(f, "SB {} ({} bytes)", argument.option(), argument.len())
            }
        }
    }
}

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


//! Byte-at-a-time Telnet negotiation state machine.

use crate::{
    CodecError, NegotiationCommand, NegotiationPolicy, TelnetArgument, TelnetFrame, TelnetOption,
    WindowSize, consts,
};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace, warn};

///
/// The automaton's current mode. Exactly one variant is active at a time and the
/// sub-negotiation buffer is empty whenever the state is not `InSubnegotiation`.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ParserState {
    /// Pass-through data.
    #[default]
    Normal,
    /// Received IAC, next byte is a command.
    SawEscape,
    /// Received DO/DONT/WILL/WONT, next byte is the option code.
    AwaitingOptionArgument(NegotiationCommand),
    /// Accumulating a sub-negotiation payload until `IAC SE`.
    ///
    /// `saw_iac` remembers an IAC at the end of the previous byte so the terminator is
    /// recognised even when `IAC` and `SE` arrive in different chunks.
    InSubnegotiation {
        /// The previous byte was IAC.
        saw_iac: bool,
    },
}

/// Everything produced by one call to [`TelnetParser::parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutput {
    /// Clean text bytes with all command framing removed.
    pub data: BytesMut,
    /// Policy replies to transmit, in the order their triggers were received.
    pub replies: Vec<TelnetFrame>,
    /// Completed sub-negotiation blocks.
    pub subnegotiations: Vec<TelnetArgument>,
}

impl ParseOutput {
    /// Decodes the clean bytes as UTF-8, substituting U+FFFD for invalid sequences.
    ///
    /// Returns `None` when the chunk carried no text at all.
    pub fn text(&self) -> Option<String> {
        if self.data.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.data).into_owned())
        }
    }

    /// Returns `true` when the chunk produced no text, replies, or sub-negotiations.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.replies.is_empty() && self.subnegotiations.is_empty()
    }
}

/// Strips Telnet command framing out of a byte stream and decides the replies.
///
/// The parser is sans-IO: it never touches a socket. State persists across calls, so a
/// command or sub-negotiation split over several chunks is handled exactly as if it had
/// arrived at once.
///
/// Inside a sub-negotiation every IAC that is not followed by SE is dropped, including the
/// `IAC IAC` escape, so a literal 0xFF cannot be carried in a sub-negotiation payload.
///
/// ```
/// use termlink_telnetcodec::{TelnetFrame, TelnetOption, TelnetParser, WindowSize};
///
/// let mut parser = TelnetParser::new(WindowSize::new(80, 24));
/// let output = parser.parse(b"Hi\xFF\xFD\x1F");
/// assert_eq!(output.text().as_deref(), Some("Hi"));
/// assert_eq!(output.replies[0], TelnetFrame::Will(TelnetOption::NAWS));
/// ```
#[derive(Clone, Debug)]
pub struct TelnetParser {
    state: ParserState,
    subnegotiation: BytesMut,
    policy: NegotiationPolicy,
    window_size: WindowSize,
}

impl TelnetParser {
    /// Creates a parser that reports `window_size` whenever NAWS is granted.
    pub fn new(window_size: WindowSize) -> Self {
        TelnetParser {
            state: ParserState::Normal,
            subnegotiation: BytesMut::new(),
            policy: NegotiationPolicy::new(),
            window_size,
        }
    }

    /// Current automaton state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// The geometry reported in NAWS replies.
    pub fn window_size(&self) -> WindowSize {
        self.window_size
    }

    /// Bytes accumulated for the sub-negotiation in progress.
    pub fn pending_subnegotiation(&self) -> &[u8] {
        &self.subnegotiation
    }

    /// Feeds one chunk through the state machine.
    ///
    /// An empty chunk leaves the state untouched and returns an empty output.
    pub fn parse(&mut self, chunk: &[u8]) -> ParseOutput {
        let mut output = ParseOutput {
            data: BytesMut::with_capacity(chunk.len()),
            ..ParseOutput::default()
        };
        for &byte in chunk {
            self.advance(byte, &mut output);
        }
        output
    }

    fn advance(&mut self, byte: u8, output: &mut ParseOutput) {
        self.state = match (self.state, byte) {
            (ParserState::Normal, consts::IAC) => ParserState::SawEscape,
            (ParserState::Normal, _) => {
                output.data.put_u8(byte);
                ParserState::Normal
            }
            (ParserState::SawEscape, consts::SB) => {
                self.subnegotiation.clear();
                ParserState::InSubnegotiation { saw_iac: false }
            }
            (ParserState::SawEscape, _) => match NegotiationCommand::from_u8(byte) {
                Some(command) => ParserState::AwaitingOptionArgument(command),
                None => {
                    trace!("Ignoring Telnet command {:#X}", byte);
                    ParserState::Normal
                }
            },
            (ParserState::AwaitingOptionArgument(command), _) => {
                let option = TelnetOption::from_u8(byte);
                let replies = self.policy.reply(command, option, self.window_size);
                debug!("Received {} {}, replying with {:?}", command, option, replies);
                output.replies.extend(replies);
                ParserState::Normal
            }
            (ParserState::InSubnegotiation { saw_iac: true }, consts::SE) => {
                self.finish_subnegotiation(output);
                ParserState::Normal
            }
            (ParserState::InSubnegotiation { .. }, consts::IAC) => {
                ParserState::InSubnegotiation { saw_iac: true }
            }
            (ParserState::InSubnegotiation { .. }, _) => {
                self.subnegotiation.put_u8(byte);
                ParserState::InSubnegotiation { saw_iac: false }
            }
        };
    }

    fn finish_subnegotiation(&mut self, output: &mut ParseOutput) {
        let mut payload = self.subnegotiation.split().freeze();
        if payload.is_empty() {
            warn!("Received subnegotiation without an option code");
            return;
        }
        let option = TelnetOption::from_u8(payload.get_u8());
        let argument = TelnetArgument::parse(option, payload);
        debug!("Received subnegotiation {:?}", argument);
        output.subnegotiations.push(argument);
    }
}

impl Default for TelnetParser {
    fn default() -> Self {
        TelnetParser::new(WindowSize::default())
    }
}

impl Decoder for TelnetParser {
    type Item = ParseOutput;
    type Error = CodecError;

    /// Consumes everything buffered in `src` as a single chunk.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<ParseOutput>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let chunk = src.split();
        Ok(Some(self.parse(&chunk)))
    }
}

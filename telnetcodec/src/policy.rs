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


//! Fixed negotiation policy.
//!
//! The policy is a pure lookup from a received `(command, option)` pair to the reply the
//! client sends back. Accepting another option is a one-line addition to [`ACCEPTED_LOCAL`].

use crate::{NegotiationCommand, TelnetFrame, TelnetOption, WindowSize};

/// Extra work owed after agreeing to an option.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FollowUp {
    /// Nothing beyond the `WILL` reply.
    None,
    /// Send the window-size report immediately after `WILL NAWS`.
    ReportWindowSize,
}

/// Options the client agrees to enable on its side when the server sends `DO`.
pub const ACCEPTED_LOCAL: &[(TelnetOption, FollowUp)] = &[
    (TelnetOption::NAWS, FollowUp::ReportWindowSize),
    (TelnetOption::SuppressGoAhead, FollowUp::None),
];

/// Options offered with `WILL` as soon as the transport opens.
pub const ANNOUNCED: &[TelnetOption] = &[
    TelnetOption::SuppressGoAhead,
    TelnetOption::Echo,
    TelnetOption::NAWS,
];

/// The reply chosen for a received negotiation command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Response {
    /// Agree with `WILL <option>`, then perform the follow-up.
    Will(FollowUp),
    /// Refuse a `DO` with `WONT <option>`.
    Wont,
    /// Refuse a `WILL` with `DONT <option>`.
    Dont,
    /// `WONT`/`DONT` are acknowledgements of a disabled state; nothing is sent.
    Silent,
}

impl Response {
    /// Expands the response into the frames to transmit, in order.
    pub fn frames(self, option: TelnetOption, size: WindowSize) -> Vec<TelnetFrame> {
        match self {
            Response::Will(FollowUp::None) => vec![TelnetFrame::Will(option)],
            Response::Will(FollowUp::ReportWindowSize) => {
                vec![TelnetFrame::Will(option), TelnetFrame::window_size(size)]
            }
            Response::Wont => vec![TelnetFrame::Wont(option)],
            Response::Dont => vec![TelnetFrame::Dont(option)],
            Response::Silent => Vec::new(),
        }
    }
}

/// The client's negotiation policy.
///
/// ```
/// use termlink_telnetcodec::{NegotiationCommand, NegotiationPolicy, Response, TelnetOption};
///
/// let policy = NegotiationPolicy::new();
/// assert_eq!(
///     policy.respond(NegotiationCommand::Do, TelnetOption::TTYPE),
///     Response::Wont
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NegotiationPolicy;

impl NegotiationPolicy {
    /// Creates the policy.
    pub fn new() -> Self {
        NegotiationPolicy
    }

    /// Looks up the reply for a received `(command, option)` pair.
    pub fn respond(&self, command: NegotiationCommand, option: TelnetOption) -> Response {
        match command {
            NegotiationCommand::Do => ACCEPTED_LOCAL
                .iter()
                .find(|(accepted, _)| *accepted == option)
                .map_or(Response::Wont, |(_, follow_up)| Response::Will(*follow_up)),
            NegotiationCommand::Will => Response::Dont,
            NegotiationCommand::Wont | NegotiationCommand::Dont => Response::Silent,
        }
    }

    /// Looks up the reply and expands it into frames for the given geometry.
    pub fn reply(
        &self,
        command: NegotiationCommand,
        option: TelnetOption,
        size: WindowSize,
    ) -> Vec<TelnetFrame> {
        self.respond(command, option).frames(option, size)
    }

    /// The capability announcement sent right after connecting.
    pub fn announcement(&self) -> Vec<TelnetFrame> {
        ANNOUNCED.iter().copied().map(TelnetFrame::Will).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: WindowSize = WindowSize { cols: 80, rows: 24 };

    #[test]
    fn test_do_naws_accepts_and_reports() {
        let policy = NegotiationPolicy::new();
        assert_eq!(
            policy.reply(NegotiationCommand::Do, TelnetOption::NAWS, SIZE),
            vec![
                TelnetFrame::Will(TelnetOption::NAWS),
                TelnetFrame::window_size(SIZE)
            ]
        );
    }

    #[test]
    fn test_do_sga_accepts() {
        let policy = NegotiationPolicy::new();
        assert_eq!(
            policy.reply(NegotiationCommand::Do, TelnetOption::SuppressGoAhead, SIZE),
            vec![TelnetFrame::Will(TelnetOption::SuppressGoAhead)]
        );
    }

    #[test]
    fn test_do_anything_else_is_refused() {
        let policy = NegotiationPolicy::new();
        for option in [
            TelnetOption::Echo,
            TelnetOption::TTYPE,
            TelnetOption::Linemode,
            TelnetOption::Unknown(200),
        ] {
            assert_eq!(
                policy.reply(NegotiationCommand::Do, option, SIZE),
                vec![TelnetFrame::Wont(option)]
            );
        }
    }

    #[test]
    fn test_will_is_always_refused() {
        let policy = NegotiationPolicy::new();
        for option in [
            TelnetOption::Echo,
            TelnetOption::SuppressGoAhead,
            TelnetOption::NAWS,
        ] {
            assert_eq!(policy.respond(NegotiationCommand::Will, option), Response::Dont);
        }
    }

    #[test]
    fn test_wont_and_dont_are_silent() {
        let policy = NegotiationPolicy::new();
        assert!(
            policy
                .reply(NegotiationCommand::Wont, TelnetOption::Echo, SIZE)
                .is_empty()
        );
        assert!(
            policy
                .reply(NegotiationCommand::Dont, TelnetOption::NAWS, SIZE)
                .is_empty()
        );
    }

    #[test]
    fn test_announcement() {
        assert_eq!(
            NegotiationPolicy::new().announcement(),
            vec![
                TelnetFrame::Will(TelnetOption::SuppressGoAhead),
                TelnetFrame::Will(TelnetOption::Echo),
                TelnetFrame::Will(TelnetOption::NAWS),
            ]
        );
    }
}

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


//! Seams to the local terminal
//!
//! Server text leaves through an [`OutputSink`]; keystrokes arrive through an
//! [`InputSource`]. Neither side blocks the connection.

use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Receives decoded server text and connection notices.
pub trait OutputSink {
    /// Delivers one piece of text. Pieces arrive in stream order.
    fn deliver(&mut self, text: &str);
}

impl<F> OutputSink for F
where
    F: FnMut(&str),
{
    fn deliver(&mut self, text: &str) {
        self(text)
    }
}

/// Supplies keystrokes to forward to the server.
pub trait InputSource {
    /// Returns the next pending keystroke, or `None` immediately when there is none.
    fn try_read_one(&mut self) -> Option<u8>;
}

impl InputSource for VecDeque<u8> {
    fn try_read_one(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl InputSource for mpsc::Receiver<u8> {
    fn try_read_one(&mut self) -> Option<u8> {
        self.try_recv().ok()
    }
}

impl InputSource for mpsc::UnboundedReceiver<u8> {
    fn try_read_one(&mut self) -> Option<u8> {
        self.try_recv().ok()
    }
}

/// An input source that never has a keystroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn try_read_one(&mut self) -> Option<u8> {
        None
    }
}

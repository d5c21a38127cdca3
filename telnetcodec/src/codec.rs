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


use crate::{CodecError, TelnetFrame, consts};
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

/// Serialises outbound traffic: negotiation frames and forwarded keystrokes.
///
/// The encoder is stateless; a single instance can be shared by every send path of a
/// connection.
#[derive(Clone, Copy, Debug, Default)]
pub struct TelnetCodec;

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec`.
    pub fn new() -> TelnetCodec {
        TelnetCodec
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a `TelnetFrame` into its wire form.
    ///
    /// - `Will`/`Wont`/`Do`/`Dont` become `IAC <command> <option>`.
    /// - `Subnegotiate` becomes `IAC SB <option> <payload> IAC SE`; for NAWS this is the
    ///   nine-byte window-size report `FF FA 1F Chi Clo Rhi Rlo FF F0`.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.encoded_len());
        match item {
            TelnetFrame::Do(option) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::DO);
                dst.put_u8(option.into());
            }
            TelnetFrame::Dont(option) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::DONT);
                dst.put_u8(option.into());
            }
            TelnetFrame::Will(option) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::WILL);
                dst.put_u8(option.into());
            }
            TelnetFrame::Wont(option) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::WONT);
                dst.put_u8(option.into());
            }
            TelnetFrame::Subnegotiate(argument) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                argument.encode(dst)?;
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    /// Encodes one keystroke.
    ///
    /// Enter (CR) becomes Telnet's canonical line terminator CR LF. Every other byte is
    /// sent unmodified, without IAC doubling.
    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item == consts::CR {
            dst.reserve(2);
            dst.put_u8(consts::CR);
            dst.put_u8(consts::LF);
        } else {
            dst.reserve(1);
            dst.put_u8(item);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TelnetArgument, TelnetOption, WindowSize};
    use bytes::Bytes;

    fn encode_frame(frame: TelnetFrame) -> BytesMut {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(frame, &mut dst).expect("encode ok");
        dst
    }

    fn encode_key(key: u8) -> BytesMut {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(key, &mut dst).expect("encode ok");
        dst
    }

    #[test]
    fn encode_will_naws() {
        let dst = encode_frame(TelnetFrame::Will(TelnetOption::NAWS));
        assert_eq!(&dst[..], &[0xFF, 0xFB, 0x1F]);
    }

    #[test]
    fn encode_wont_unknown() {
        let dst = encode_frame(TelnetFrame::Wont(TelnetOption::Unknown(200)));
        assert_eq!(&dst[..], &[consts::IAC, consts::WONT, 200]);
    }

    #[test]
    fn encode_do_and_dont() {
        let dst = encode_frame(TelnetFrame::Do(TelnetOption::SuppressGoAhead));
        assert_eq!(&dst[..], &[consts::IAC, consts::DO, consts::option::SGA]);
        let dst = encode_frame(TelnetFrame::Dont(TelnetOption::Echo));
        assert_eq!(&dst[..], &[consts::IAC, consts::DONT, consts::option::ECHO]);
    }

    #[test]
    fn encode_window_size_report() {
        let dst = encode_frame(TelnetFrame::window_size(WindowSize::new(80, 24)));
        assert_eq!(
            &dst[..],
            &[0xFF, 0xFA, 0x1F, 0x00, 0x50, 0x00, 0x18, 0xFF, 0xF0]
        );
    }

    #[test]
    fn encode_unknown_subnegotiation() {
        let dst = encode_frame(TelnetFrame::Subnegotiate(TelnetArgument::Unknown(
            TelnetOption::TTYPE,
            Bytes::from_static(&[0]),
        )));
        assert_eq!(
            &dst[..],
            &[consts::IAC, consts::SB, 24, 0, consts::IAC, consts::SE]
        );
    }

    #[test]
    fn encode_enter_as_crlf() {
        assert_eq!(&encode_key(consts::CR)[..], b"\r\n");
    }

    #[test]
    fn encode_other_keys_raw() {
        assert_eq!(&encode_key(b'a')[..], b"a");
        assert_eq!(&encode_key(consts::LF)[..], b"\n");
        assert_eq!(&encode_key(0x1B)[..], &[0x1B]);
        assert_eq!(&encode_key(0xFF)[..], &[0xFF]);
    }
}

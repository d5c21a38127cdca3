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


use async_trait::async_trait;
use bytes::Bytes;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termlink_client::{
    Announcement, ClientConfig, ClientError, ConnectionState, NoInput, OutputSink,
    ParserState, REMOTE_CLOSED_NOTICE, Received, TelnetConnection, Transport,
};
use tracing_test::traced_test;

const ANNOUNCEMENT: &[u8] = &[0xFF, 0xFB, 0x03, 0xFF, 0xFB, 0x01, 0xFF, 0xFB, 0x1F];
const REPORT_80X24: &[u8] = &[0xFF, 0xFA, 0x1F, 0x00, 0x50, 0x00, 0x18, 0xFF, 0xF0];

/// What the mock transport saw, kept outside it so it survives `close(self)`.
#[derive(Debug, Default)]
struct Wire {
    sent: Vec<Vec<u8>>,
    closed: usize,
}

struct MockTransport {
    inbound: VecDeque<io::Result<Received>>,
    wire: Arc<Mutex<Wire>>,
    accept_at_most: Option<usize>,
    fail_sends: bool,
    sends_before_failure: Option<usize>,
}

impl MockTransport {
    fn new() -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let transport = Self {
            inbound: VecDeque::new(),
            wire: wire.clone(),
            accept_at_most: None,
            fail_sends: false,
            sends_before_failure: None,
        };
        (transport, wire)
    }

    fn chunk(mut self, bytes: &'static [u8]) -> Self {
        self.inbound
            .push_back(Ok(Received::Data(Bytes::from_static(bytes))));
        self
    }

    fn then(mut self, outcome: io::Result<Received>) -> Self {
        self.inbound.push_back(outcome);
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn readable(&mut self, _wait: Duration) -> io::Result<bool> {
        Ok(!self.inbound.is_empty())
    }

    fn try_receive(&mut self, _max_bytes: usize) -> io::Result<Received> {
        self.inbound.pop_front().unwrap_or(Ok(Received::WouldBlock))
    }

    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let exhausted = self
            .sends_before_failure
            .is_some_and(|limit| self.wire.lock().unwrap().sent.len() >= limit);
        if self.fail_sends || exhausted {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        let accepted = self.accept_at_most.map_or(bytes.len(), |n| n.min(bytes.len()));
        self.wire.lock().unwrap().sent.push(bytes[..accepted].to_vec());
        Ok(accepted)
    }

    fn close(self) {
        self.wire.lock().unwrap().closed += 1;
    }
}

#[derive(Debug, Default)]
struct Screen(Vec<String>);

impl Screen {
    fn text(&self) -> String {
        self.0.concat()
    }
}

impl OutputSink for Screen {
    fn deliver(&mut self, text: &str) {
        self.0.push(text.to_owned());
    }
}

fn sent_after_setup(wire: &Arc<Mutex<Wire>>) -> Vec<Vec<u8>> {
    wire.lock().unwrap().sent[2..].to_vec()
}

#[tokio::test]
async fn test_setup_announces_then_reports_size() {
    let (transport, wire) = MockTransport::new();
    let connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    assert_eq!(connection.state(), ConnectionState::Connected);
    assert_eq!(
        wire.lock().unwrap().sent,
        vec![ANNOUNCEMENT.to_vec(), REPORT_80X24.to_vec()]
    );
    assert!(connection.sink().0.is_empty());
}

#[tokio::test]
async fn test_minimal_announcement_only_reports_size() {
    let (transport, wire) = MockTransport::new();
    let config = ClientConfig::default().with_announcement(Announcement::Minimal);
    let _connection = TelnetConnection::establish(config, transport, Screen::default()).unwrap();

    assert_eq!(wire.lock().unwrap().sent, vec![REPORT_80X24.to_vec()]);
}

#[tokio::test]
async fn test_status_notices_follow_setup() {
    let (transport, _wire) = MockTransport::new();
    let config = ClientConfig::default()
        .with_terminal_size(53, 15)
        .with_status_notices(true);
    let connection = TelnetConnection::establish(config, transport, Screen::default()).unwrap();

    assert_eq!(
        connection.sink().0,
        vec!["REPORTED SIZE: 53x15\r\n".to_string(), "Connected\r\n".to_string()]
    );
}

#[tokio::test]
async fn test_plain_text_is_delivered_without_replies() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.chunk(b"Hello");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();

    assert_eq!(connection.sink().text(), "Hello");
    assert!(sent_after_setup(&wire).is_empty());
}

#[tokio::test]
async fn test_naws_request_is_answered_with_two_sends() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.chunk(b"Hi\xFF\xFD\x1F");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();

    assert_eq!(connection.sink().text(), "Hi");
    assert_eq!(
        sent_after_setup(&wire),
        vec![vec![0xFF, 0xFB, 0x1F], REPORT_80X24.to_vec()]
    );
}

#[tokio::test]
async fn test_failed_reply_send_disconnects_with_parser_reset() {
    let (mut transport, wire) = MockTransport::new();
    transport.sends_before_failure = Some(2);
    let transport = transport.chunk(b"Hi\xFF\xFD\x1F");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    let result = connection.process(&mut NoInput).await;

    assert!(matches!(result, Err(ClientError::Io(_))));
    assert!(connection.is_disconnected());
    assert_eq!(connection.parser_state(), ParserState::Normal);
    assert_eq!(
        connection.sink().0,
        vec![
            "Hi".to_string(),
            "\r\nConnection lost: I/O error: broken pipe\r\n".to_string(),
        ]
    );
    assert_eq!(wire.lock().unwrap().closed, 1);
    assert_eq!(wire.lock().unwrap().sent.len(), 2);
}

#[tokio::test]
async fn test_requested_size_report_is_announced() {
    let (transport, _wire) = MockTransport::new();
    let transport = transport.chunk(b"\xFF\xFD\x1F");
    let config = ClientConfig::default().with_status_notices(true);
    let mut connection = TelnetConnection::establish(config, transport, Screen::default()).unwrap();
    connection.sink_mut().0.clear();

    connection.process(&mut NoInput).await.unwrap();

    assert_eq!(connection.sink().0, vec!["REPORTED SIZE: 80x24\r\n".to_string()]);
}

#[tokio::test]
async fn test_unknown_option_is_refused() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.chunk(b"\xFF\xFD\x18\xFF\xFB\x01");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();

    assert!(connection.sink().0.is_empty());
    assert_eq!(
        sent_after_setup(&wire),
        vec![vec![0xFF, 0xFC, 0x18], vec![0xFF, 0xFE, 0x01]]
    );
}

#[tokio::test]
async fn test_subnegotiation_split_across_reads() {
    let (transport, wire) = MockTransport::new();
    let transport = transport
        .chunk(b"\xFF\xFA\x1F\x00")
        .chunk(b"\x50\x00\x18\xFF\xF0after");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();
    assert_eq!(connection.parser_state(), ParserState::InSubnegotiation { saw_iac: false });
    assert!(connection.sink().0.is_empty());

    connection.process(&mut NoInput).await.unwrap();
    assert_eq!(connection.parser_state(), ParserState::Normal);
    assert_eq!(connection.sink().text(), "after");
    assert!(sent_after_setup(&wire).is_empty());
}

#[tokio::test]
async fn test_clean_continuation_of_split_command_is_not_text() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.chunk(b"ready\xFF\xFD").chunk(b"\x1F");
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();
    connection.process(&mut NoInput).await.unwrap();

    assert_eq!(connection.sink().text(), "ready");
    assert_eq!(
        sent_after_setup(&wire),
        vec![vec![0xFF, 0xFB, 0x1F], REPORT_80X24.to_vec()]
    );
}

#[tokio::test]
async fn test_remote_close_disconnects_with_notice() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.chunk(b"bye").then(Ok(Received::Closed));
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();
    assert!(!connection.is_disconnected());
    connection.process(&mut NoInput).await.unwrap();

    assert!(connection.is_disconnected());
    assert!(connection.transport().is_none());
    assert_eq!(
        connection.sink().0.last().map(String::as_str),
        Some(format!("\r\n{}\r\n", REMOTE_CLOSED_NOTICE).as_str())
    );
    assert_eq!(wire.lock().unwrap().closed, 1);

    let mut keys: VecDeque<u8> = VecDeque::from(vec![b'x']);
    assert!(matches!(
        connection.process(&mut keys).await,
        Err(ClientError::NotConnected)
    ));
    assert_eq!(keys.len(), 1);
    assert_eq!(wire.lock().unwrap().sent.len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_receive_failure_disconnects() {
    let (transport, wire) = MockTransport::new();
    let transport = transport.then(Err(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset",
    )));
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    let result = connection.process(&mut NoInput).await;

    assert!(matches!(result, Err(ClientError::Io(_))));
    assert!(connection.is_disconnected());
    assert!(connection.sink().text().starts_with("\r\nConnection lost:"));
    assert_eq!(wire.lock().unwrap().closed, 1);
    assert!(logs_contain("Connection error"));
}

#[tokio::test]
async fn test_keys_are_forwarded_one_per_call() {
    let (transport, wire) = MockTransport::new();
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();
    let mut keys: VecDeque<u8> = b"\ra\xFF".iter().copied().collect();

    connection.process(&mut keys).await.unwrap();
    assert_eq!(sent_after_setup(&wire), vec![vec![0x0D, 0x0A]]);

    connection.process(&mut keys).await.unwrap();
    connection.process(&mut keys).await.unwrap();
    connection.process(&mut keys).await.unwrap();
    assert_eq!(
        sent_after_setup(&wire),
        vec![vec![0x0D, 0x0A], vec![b'a'], vec![0xFF]]
    );
}

#[tokio::test]
async fn test_idle_poll_does_nothing() {
    let (transport, wire) = MockTransport::new();
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.process(&mut NoInput).await.unwrap();

    assert_eq!(connection.state(), ConnectionState::Connected);
    assert!(connection.sink().0.is_empty());
    assert!(sent_after_setup(&wire).is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_partial_write_is_logged_not_retried() {
    let (mut transport, wire) = MockTransport::new();
    transport.accept_at_most = Some(4);
    let _connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    assert_eq!(wire.lock().unwrap().sent.len(), 2);
    assert!(logs_contain("Partial write: 4 of 9 bytes sent"));
}

#[tokio::test]
async fn test_failed_setup_releases_transport() {
    let (mut transport, wire) = MockTransport::new();
    transport.fail_sends = true;

    let result = TelnetConnection::establish(ClientConfig::default(), transport, Screen::default());

    assert!(matches!(result, Err(ClientError::Io(_))));
    assert_eq!(wire.lock().unwrap().closed, 1);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let (transport, wire) = MockTransport::new();
    let config = ClientConfig::default().with_read_chunk_size(0);

    let result = TelnetConnection::establish(config, transport, Screen::default());

    assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    assert!(wire.lock().unwrap().sent.is_empty());
}

#[tokio::test]
async fn test_close_releases_transport_once() {
    let (transport, wire) = MockTransport::new();
    let mut connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    connection.close();
    connection.close();
    drop(connection);

    assert_eq!(wire.lock().unwrap().closed, 1);
}

#[tokio::test]
async fn test_drop_releases_transport() {
    let (transport, wire) = MockTransport::new();
    let connection =
        TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
            .unwrap();

    drop(connection);

    assert_eq!(wire.lock().unwrap().closed, 1);
}

#[tokio::test]
async fn test_tcp_session_end_to_end() {
    use termlink_client::TcpTransport;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut setup = [0u8; 18];
        socket.read_exact(&mut setup).await.unwrap();
        socket.write_all(b"Welcome\xFF\xFD\x1F").await.unwrap();
        let mut reply = [0u8; 12];
        socket.read_exact(&mut reply).await.unwrap();
        (setup, reply)
    });

    let config = ClientConfig::new("127.0.0.1", port).with_poll_timeout(Duration::from_millis(50));
    let mut connection: TelnetConnection<TcpTransport, Screen> =
        TelnetConnection::connect(config, Screen::default()).await.unwrap();

    for _ in 0..200 {
        if connection.is_disconnected() {
            break;
        }
        connection.process(&mut NoInput).await.unwrap();
    }

    let (setup, reply) = server.await.unwrap();
    assert_eq!(&setup[..9], ANNOUNCEMENT);
    assert_eq!(&setup[9..], REPORT_80X24);
    assert_eq!(&reply[..3], &[0xFF, 0xFB, 0x1F]);
    assert_eq!(&reply[3..], REPORT_80X24);

    assert!(connection.is_disconnected());
    let screen = connection.sink().text();
    assert!(screen.starts_with("Welcome"));
    assert!(screen.ends_with(&format!("\r\n{}\r\n", REMOTE_CLOSED_NOTICE)));
}

#[tokio::test]
async fn test_connect_rejects_invalid_config() {
    let config = ClientConfig::new("", 23);
    let result = TelnetConnection::connect(config, Screen::default()).await;
    assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
}

proptest! {
    #[test]
    fn prop_non_enter_keys_are_sent_raw(key in any::<u8>()) {
        prop_assume!(key != b'\r');
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (transport, wire) = MockTransport::new();
        let mut connection =
            TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
                .unwrap();
        let mut keys = VecDeque::from(vec![key]);

        runtime.block_on(connection.process(&mut keys)).unwrap();

        prop_assert_eq!(sent_after_setup(&wire), vec![vec![key]]);
    }

    #[test]
    fn prop_clean_text_is_delivered_verbatim(text in "[ -~\r\n]{1,64}") {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (mut transport, wire) = MockTransport::new();
        transport.inbound.push_back(Ok(Received::Data(Bytes::from(text.clone()))));
        let mut connection =
            TelnetConnection::establish(ClientConfig::default(), transport, Screen::default())
                .unwrap();

        runtime.block_on(connection.process(&mut NoInput)).unwrap();

        prop_assert_eq!(connection.sink().text(), text);
        prop_assert!(sent_after_setup(&wire).is_empty());
    }
}

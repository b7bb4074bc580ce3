//! Per-pane session connection.
//!
//! A connector is driven by its host: animation frames until the first fit,
//! backend events routed by session id, and `poll` for the command timer.
//! Once disposed, every call is a no-op.

mod lifecycle;
mod replay;
mod types;

pub use lifecycle::SessionConnector;
pub use types::*;

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::backend::{BackendCall, BackendEvent, CreateReply, RecordingBackend, Snapshot};
    use crate::terminal::TranscriptSink;
    use termdock_common::{GridSize, SessionError, SessionId};

    fn sid() -> SessionId {
        SessionId::from("s1")
    }

    fn connector() -> SessionConnector {
        SessionConnector::new(sid(), Some("/tmp".into()), ConnectorConfig::default())
    }

    struct Harness {
        conn: SessionConnector,
        backend: RecordingBackend,
        sink: TranscriptSink,
        now: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                conn: connector(),
                backend: RecordingBackend::new(),
                sink: TranscriptSink::new(),
                now: Instant::now(),
            }
        }

        fn mount(&mut self) {
            self.conn.on_animation_frame(None, &mut self.backend);
            self.conn
                .on_animation_frame(Some(GridSize::new(100, 30)), &mut self.backend);
        }

        fn send(&mut self, event: BackendEvent) -> Vec<ConnectorEvent> {
            self.conn
                .handle_event(event, self.now, &mut self.backend, &mut self.sink)
        }

        fn created(&mut self, created: bool) -> Vec<ConnectorEvent> {
            self.send(BackendEvent::Created {
                session_id: sid(),
                result: Ok(CreateReply { created }),
            })
        }

        fn data(&mut self, offset: u64, bytes: &[u8]) -> Vec<ConnectorEvent> {
            self.send(BackendEvent::Data {
                session_id: sid(),
                offset,
                bytes: bytes.to_vec(),
            })
        }

        fn snapshot(&mut self, data: &[u8]) -> Vec<ConnectorEvent> {
            self.send(BackendEvent::Buffer {
                session_id: sid(),
                result: Ok(Snapshot {
                    data: data.to_vec(),
                    end_offset: data.len() as u64,
                }),
            })
        }
    }

    #[test]
    fn create_waits_for_fit_frames() {
        let mut conn = connector();
        let mut backend = RecordingBackend::new();
        assert!(!conn.on_animation_frame(None, &mut backend));
        assert!(backend.creates().is_empty());
        assert!(conn.on_animation_frame(Some(GridSize::new(120, 40)), &mut backend));
        let creates = backend.creates();
        assert_eq!(creates.len(), 1);
        assert_eq!(creates[0].size, GridSize::new(120, 40));
        assert!(!conn.on_animation_frame(None, &mut backend));
        assert_eq!(backend.creates().len(), 1);
    }

    #[test]
    fn create_size_is_clamped() {
        let mut conn = connector();
        let mut backend = RecordingBackend::new();
        conn.on_animation_frame(None, &mut backend);
        conn.on_animation_frame(Some(GridSize::new(3, 1)), &mut backend);
        assert_eq!(backend.creates()[0].size, GridSize::new(10, 2));
    }

    #[test]
    fn created_flushes_queued_bytes_and_goes_live() {
        let mut h = Harness::new();
        h.mount();
        h.data(0, b"$ ");
        assert!(h.sink.bytes.is_empty());
        let events = h.created(true);
        assert_eq!(h.conn.state(), ConnectionState::Live);
        assert_eq!(h.conn.origin(), Some(SessionOrigin::Created));
        assert_eq!(h.sink.text(), "$ ");
        assert_eq!(
            events,
            vec![
                ConnectorEvent::Attached(SessionOrigin::Created),
                ConnectorEvent::Output("$ ".into())
            ]
        );
        h.data(2, b"ls");
        assert_eq!(h.sink.text(), "$ ls");
    }

    #[test]
    fn reconnect_replays_snapshot_then_live_tail_once() {
        let mut h = Harness::new();
        h.mount();
        h.created(false);
        assert_eq!(h.conn.state(), ConnectionState::Replaying);
        assert!(h
            .backend
            .calls
            .contains(&BackendCall::RequestBuffer(sid())));

        h.data(2, b"C");
        assert!(h.sink.bytes.is_empty());
        h.snapshot(b"AB");
        assert_eq!(h.sink.text(), "ABC");
        assert_eq!(h.conn.state(), ConnectionState::Live);

        h.data(3, b"D");
        assert_eq!(h.sink.text(), "ABCD");
    }

    #[test]
    fn reconnect_drops_live_bytes_already_in_snapshot() {
        let mut h = Harness::new();
        h.mount();
        h.created(false);
        h.data(1, b"B");
        h.data(2, b"C");
        h.snapshot(b"AB");
        assert_eq!(h.sink.text(), "ABC");
        assert_eq!(h.sink.writes, 1);
    }

    #[test]
    fn snapshot_failure_goes_live_with_queued_bytes() {
        let mut h = Harness::new();
        h.mount();
        h.created(false);
        h.data(7, b"tail");
        h.send(BackendEvent::Buffer {
            session_id: sid(),
            result: Err(SessionError::BufferFailed("gone".into())),
        });
        assert_eq!(h.conn.state(), ConnectionState::Live);
        assert_eq!(h.sink.text(), "tail");
    }

    #[test]
    fn create_failure_leaves_pane_usable() {
        let mut h = Harness::new();
        h.mount();
        h.data(0, b"x");
        let events = h.send(BackendEvent::Created {
            session_id: sid(),
            result: Err(SessionError::CreateFailed("no shell".into())),
        });
        assert_eq!(h.conn.state(), ConnectionState::Live);
        assert_eq!(h.conn.origin(), Some(SessionOrigin::Unconfirmed));
        assert_eq!(h.sink.text(), "x");
        assert_eq!(
            events,
            vec![
                ConnectorEvent::Attached(SessionOrigin::Unconfirmed),
                ConnectorEvent::Output("x".into()),
            ]
        );

        h.backend.take();
        h.conn.input(b"ls\r", &mut h.backend);
        h.conn
            .resize(GridSize::new(120, 40), &mut h.backend, &mut h.sink);
        assert_eq!(h.backend.written(&sid()), b"ls\r");
        assert_eq!(h.backend.resizes(), vec![GridSize::new(120, 40)]);
    }

    #[test]
    fn duplicate_created_reply_is_ignored() {
        let mut h = Harness::new();
        h.mount();
        h.created(true);
        assert!(h.created(false).is_empty());
        assert_eq!(h.conn.state(), ConnectionState::Live);
    }

    #[test]
    fn queued_command_waits_for_delay_after_first_output() {
        let mut h = Harness::new();
        h.conn.queue_command("npm run dev", h.now);
        h.mount();
        h.created(true);
        assert!(h.conn.poll(h.now, &mut h.backend).is_empty());

        h.data(0, b"$ ");
        let before = h.now + Duration::from_millis(399);
        assert!(h.conn.poll(before, &mut h.backend).is_empty());

        let due = h.now + Duration::from_millis(400);
        let events = h.conn.poll(due, &mut h.backend);
        assert_eq!(
            events,
            vec![ConnectorEvent::CommandSent {
                text: "npm run dev".into(),
                processing: false
            }]
        );
        assert_eq!(h.backend.written(&sid()), b"npm run dev\r");
        assert!(h.conn.poll(due, &mut h.backend).is_empty());
        assert!(!h.conn.has_pending_command());
    }

    #[test]
    fn queued_command_not_sent_while_replaying() {
        let mut h = Harness::new();
        h.conn.queue_command("claude", h.now);
        h.mount();
        h.created(false);
        h.data(0, b"old");
        let later = h.now + Duration::from_secs(1);
        assert!(h.conn.poll(later, &mut h.backend).is_empty());
        h.snapshot(b"");
        let later = h.now + Duration::from_secs(1);
        let events = h.conn.poll(later, &mut h.backend);
        assert_eq!(
            events,
            vec![ConnectorEvent::CommandSent {
                text: "claude".into(),
                processing: true
            }]
        );
    }

    #[test]
    fn processing_command_matches_first_word() {
        let config = ConnectorConfig::default();
        assert!(config.is_processing_command("claude --resume"));
        assert!(config.is_processing_command("/usr/local/bin/claude"));
        assert!(!config.is_processing_command("npm run claude"));
        assert!(!config.is_processing_command("   "));
    }

    #[test]
    fn input_passes_through_once_attached() {
        let mut h = Harness::new();
        h.conn.input(b"early", &mut h.backend);
        assert!(h.backend.written(&sid()).is_empty());
        h.mount();
        h.created(true);
        h.conn.input(b"ls\r", &mut h.backend);
        assert_eq!(h.backend.written(&sid()), b"ls\r");
    }

    #[test]
    fn resize_clamps_and_reaches_backend_when_attached() {
        let mut h = Harness::new();
        h.conn
            .resize(GridSize::new(50, 20), &mut h.backend, &mut h.sink);
        assert_eq!(h.sink.size, Some(GridSize::new(50, 20)));
        assert!(h.backend.resizes().is_empty());

        h.mount();
        h.created(true);
        h.conn.resize(GridSize::new(4, 0), &mut h.backend, &mut h.sink);
        assert_eq!(h.backend.resizes(), vec![GridSize::new(10, 2)]);
    }

    #[test]
    fn disposed_connector_ignores_everything() {
        let mut h = Harness::new();
        h.conn.queue_command("ls", h.now);
        h.mount();
        h.conn.dispose();
        assert_eq!(h.conn.state(), ConnectionState::Disposed);
        h.backend.take();

        assert!(h.created(false).is_empty());
        assert!(h.data(0, b"late").is_empty());
        assert!(h.snapshot(b"AB").is_empty());
        h.conn.input(b"x", &mut h.backend);
        h.conn.resize(GridSize::new(80, 24), &mut h.backend, &mut h.sink);
        assert!(h.conn.poll(h.now + Duration::from_secs(5), &mut h.backend).is_empty());
        assert!(h.backend.calls.is_empty());
        assert!(h.sink.bytes.is_empty());
        assert_eq!(h.conn.state(), ConnectionState::Disposed);
    }

    #[test]
    fn kill_ends_backend_session() {
        let mut h = Harness::new();
        h.mount();
        h.created(true);
        h.conn.kill(&mut h.backend);
        assert!(h.backend.calls.contains(&BackendCall::Kill(sid())));
        assert!(h.conn.is_disposed());
    }

    #[test]
    fn exit_is_reported() {
        let mut h = Harness::new();
        h.mount();
        h.created(true);
        let events = h.send(BackendEvent::Exit {
            session_id: sid(),
            code: Some(0),
        });
        assert_eq!(events, vec![ConnectorEvent::Exited(Some(0))]);
    }

    #[test]
    fn split_utf8_output_decodes_across_chunks() {
        let mut h = Harness::new();
        h.mount();
        h.created(true);
        let bytes = "✓ done".as_bytes();
        let events_a = h.data(0, &bytes[..1]);
        assert!(events_a.is_empty());
        let events_b = h.data(1, &bytes[1..]);
        assert_eq!(events_b, vec![ConnectorEvent::Output("✓ done".into())]);
    }
}

//! Structured log output from bag and lifecycle activity.

use std::io;
use std::sync::{Arc, Mutex};

use disposebag::{DisposeBag, DisposeEvent, LifecycleState, attach, disposables};
use disposebag_harness::TestLifecycleOwner;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(run: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    buffer.contents()
}

#[test]
fn lifecycle_disposal_is_logged() {
    let logs = capture(|| {
        let owner = TestLifecycleOwner::shared_in(LifecycleState::Started);
        let bag = DisposeBag::with_event(&owner, DisposeEvent::Stop);
        bag.add(disposables::empty());
        owner.perform_stop();
    });

    assert!(logs.contains("dispose bag disposed"), "{logs}");
    assert!(logs.contains("lifecycle"), "{logs}");
    assert!(logs.contains("lifecycle transition"), "{logs}");
}

#[test]
fn manual_disposal_is_logged() {
    let logs = capture(|| {
        let owner = TestLifecycleOwner::shared_in(LifecycleState::Created);
        let bag = DisposeBag::with_event(&owner, DisposeEvent::Destroy);
        bag.dispose();
    });

    assert!(logs.contains("dispose bag disposed"), "{logs}");
    assert!(logs.contains("manual"), "{logs}");
}

#[test]
fn attachment_to_destroyed_owner_is_logged() {
    let logs = capture(|| {
        let owner = TestLifecycleOwner::shared_in(LifecycleState::Created);
        owner.perform_destroy();
        attach(disposables::empty(), &owner, DisposeEvent::Destroy);
    });

    assert!(logs.contains("owner already destroyed"), "{logs}");
}

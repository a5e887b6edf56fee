use crate::{
    event::PickerEvent,
    picker::{RefreshSnapshot, StatusChange},
};
use log::{debug, warn};
use std::{fmt, sync::mpsc, thread};

/// Where a refresh job delivers its results. Sends after the picker has
/// closed are dropped.
#[derive(Debug, Clone)]
pub struct RefreshSink {
    tx: mpsc::Sender<PickerEvent>,
}

impl RefreshSink {
    pub fn new(tx: mpsc::Sender<PickerEvent>) -> Self {
        Self { tx }
    }

    pub fn merge(&self, snapshot: RefreshSnapshot) {
        let _ = self.tx.send(PickerEvent::Refreshed(snapshot));
    }

    pub fn status(&self, change: StatusChange) {
        let _ = self.tx.send(PickerEvent::Status(change));
    }
}

/// Gate a refresh job waits on before reporting anything
pub struct Readiness {
    rx: mpsc::Receiver<RefreshSink>,
    sink: Option<RefreshSink>,
}

impl Readiness {
    /// Block until the picker publishes its sink.
    ///
    /// Returns `None` when the picker went away without publishing; the job
    /// should then stop quietly.
    pub fn sink(&mut self) -> Option<&RefreshSink> {
        if self.sink.is_none() {
            self.sink = self.rx.recv().ok();
        }
        self.sink.as_ref()
    }
}

/// Publishing side of a spawned refresher's readiness gate
#[derive(Debug)]
pub struct ReadyHandle {
    tx: mpsc::SyncSender<RefreshSink>,
}

impl ReadyHandle {
    pub fn publish(self, sink: RefreshSink) {
        let _ = self.tx.send(sink);
    }
}

type Job = Box<dyn FnOnce(&mut Readiness) + Send>;

/// A slow data source that runs on its own thread while the picker is open
pub struct Refresher {
    name: String,
    job: Job,
}

impl fmt::Debug for Refresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresher")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Refresher {
    pub fn new(name: impl Into<String>, job: impl FnOnce(&mut Readiness) + Send + 'static) -> Self {
        Self {
            name: name.into(),
            job: Box::new(job),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the job. It may do its slow work right away but cannot report
    /// until the returned handle is published.
    pub fn spawn(self) -> ReadyHandle {
        let (tx, rx) = mpsc::sync_channel(1);
        let Self { name, job } = self;
        let spawned = thread::Builder::new()
            .name(format!("refresh-{name}"))
            .spawn(move || {
                let mut readiness = Readiness { rx, sink: None };
                job(&mut readiness);
                debug!("refresher {name} finished");
            });
        if let Err(e) = spawned {
            warn!("failed to spawn refresher: {e}");
        }
        ReadyHandle { tx }
    }
}

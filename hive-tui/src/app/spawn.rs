use hive_core::{
    event::PickerEvent,
    refresh::{ReadyHandle, RefreshSink, Refresher},
};
use log::debug;
use std::sync::mpsc;

/// Background refreshers started before the picker can take their results.
///
/// Each job begins its slow work right away and blocks on its readiness gate
/// until [`PendingRefreshers::publish`] hands it a sink. Dropping this without
/// publishing releases the jobs without results.
pub(super) struct PendingRefreshers {
    handles: Vec<ReadyHandle>,
}

impl PendingRefreshers {
    pub(super) fn spawn(refreshers: Vec<Refresher>) -> Self {
        let handles = refreshers
            .into_iter()
            .map(|refresher| {
                debug!("starting refresher {}", refresher.name());
                refresher.spawn()
            })
            .collect();
        Self { handles }
    }

    /// Let every job report into `tx`. Later calls are no-ops.
    pub(super) fn publish(&mut self, tx: &mpsc::Sender<PickerEvent>) {
        for handle in self.handles.drain(..) {
            handle.publish(RefreshSink::new(tx.clone()));
        }
    }
}

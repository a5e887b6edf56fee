use crate::{constants::COUNTDOWN_TICK_MS, event::PickerEvent};
use log::{debug, warn};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU8, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

/// Pick `target` on the user's behalf unless they touch a key within `timeout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSelect {
    pub target: String,
    pub timeout: Duration,
}

impl AutoSelect {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }

    /// A zero timeout resolves without showing the picker at all
    pub fn is_immediate(&self) -> bool {
        self.timeout.is_zero()
    }
}

/// One-shot token shared by everything that can resolve a picker.
/// Only the first `claim` succeeds.
#[derive(Debug, Clone, Default)]
pub struct ResolveGuard(Arc<AtomicBool>);

impl ResolveGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

const PENDING: u8 = 0;
const CANCELLED: u8 = 1;
const FIRED: u8 = 2;

/// Countdown thread driving an [`AutoSelect`].
///
/// Publishes a `Countdown` event every tick and an `AutoSelected` event on
/// expiry, the latter only if it was not cancelled first and it wins the
/// shared [`ResolveGuard`].
#[derive(Debug)]
pub struct AutoSelectTimer {
    state: Arc<AtomicU8>,
    cancel_tx: mpsc::Sender<()>,
}

impl AutoSelectTimer {
    pub fn start(auto: AutoSelect, guard: ResolveGuard, tx: mpsc::Sender<PickerEvent>) -> Self {
        let state = Arc::new(AtomicU8::new(PENDING));
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let thread_state = Arc::clone(&state);

        let spawned = thread::Builder::new()
            .name("auto-select".into())
            .spawn(move || {
                let AutoSelect { target, timeout } = auto;
                let Some(deadline) = Instant::now().checked_add(timeout) else {
                    // too far out to ever fire; wait for the picker to finish
                    debug!("auto-select timeout {timeout:?} is out of range, not counting down");
                    let _ = cancel_rx.recv();
                    return;
                };
                let tick = Duration::from_millis(COUNTDOWN_TICK_MS);
                loop {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    let seconds = u64::try_from(remaining.as_millis().div_ceil(1000)).unwrap_or(u64::MAX);
                    let countdown = PickerEvent::Countdown {
                        target: target.clone(),
                        seconds,
                    };
                    if tx.send(countdown).is_err() {
                        return;
                    }
                    match cancel_rx.recv_timeout(remaining.min(tick)) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
                let fired = thread_state
                    .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok();
                if fired && guard.claim() {
                    debug!("auto-selecting {target}");
                    let _ = tx.send(PickerEvent::AutoSelected(target));
                }
            });
        if let Err(e) = spawned {
            warn!("failed to spawn auto-select timer: {e}");
            state.store(CANCELLED, Ordering::Release);
        }

        Self { state, cancel_tx }
    }

    /// Stop a pending countdown. Returns true when this call did the cancelling.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cancelled {
            let _ = self.cancel_tx.send(());
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_until_quiet(rx: &mpsc::Receiver<PickerEvent>, quiet: Duration) -> Vec<PickerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(quiet) {
            events.push(event);
        }
        events
    }

    #[test]
    fn fires_once_after_timeout() {
        let (tx, rx) = mpsc::channel();
        let guard = ResolveGuard::new();
        let timer = AutoSelectTimer::start(
            AutoSelect::new("main", Duration::from_millis(50)),
            guard.clone(),
            tx,
        );

        let events = collect_until_quiet(&rx, Duration::from_secs(2));
        assert_eq!(
            events.first(),
            Some(&PickerEvent::Countdown {
                target: "main".into(),
                seconds: 1
            })
        );
        assert_eq!(events.last(), Some(&PickerEvent::AutoSelected("main".into())));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, PickerEvent::AutoSelected(_)))
                .count(),
            1
        );
        assert!(guard.is_claimed());
        assert!(!timer.is_pending());
        assert!(!timer.cancel());
    }

    #[test]
    fn countdown_rounds_seconds_up() {
        let (tx, rx) = mpsc::channel();
        let timer = AutoSelectTimer::start(
            AutoSelect::new("dev", Duration::from_millis(2500)),
            ResolveGuard::new(),
            tx,
        );
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(
            first,
            PickerEvent::Countdown {
                target: "dev".into(),
                seconds: 3
            }
        );
        assert!(timer.cancel());
    }

    #[test]
    fn cancel_prevents_selection() {
        let (tx, rx) = mpsc::channel();
        let guard = ResolveGuard::new();
        let timer = AutoSelectTimer::start(
            AutoSelect::new("main", Duration::from_millis(200)),
            guard.clone(),
            tx,
        );
        assert!(timer.cancel());
        assert!(!timer.cancel());

        let events = collect_until_quiet(&rx, Duration::from_millis(600));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, PickerEvent::AutoSelected(_)))
        );
        assert!(!guard.is_claimed());
    }

    #[test]
    fn losing_the_guard_suppresses_selection() {
        let (tx, rx) = mpsc::channel();
        let guard = ResolveGuard::new();
        let _timer = AutoSelectTimer::start(
            AutoSelect::new("main", Duration::from_millis(50)),
            guard.clone(),
            tx,
        );
        assert!(guard.claim());

        let events = collect_until_quiet(&rx, Duration::from_millis(600));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, PickerEvent::AutoSelected(_)))
        );
    }

    #[test]
    fn unreachable_deadline_never_fires() {
        let (tx, rx) = mpsc::channel();
        let guard = ResolveGuard::new();
        let timer = AutoSelectTimer::start(AutoSelect::new("main", Duration::MAX), guard.clone(), tx);

        assert!(collect_until_quiet(&rx, Duration::from_millis(200)).is_empty());
        assert!(timer.is_pending());
        assert!(timer.cancel());
        assert!(!guard.is_claimed());
    }

    #[test]
    fn immediate_when_timeout_is_zero() {
        assert!(AutoSelect::new("main", Duration::ZERO).is_immediate());
        assert!(!AutoSelect::new("main", Duration::from_millis(1)).is_immediate());
    }
}

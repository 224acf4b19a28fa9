use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ProgressError;

/// Receiver of the aggregate figure. Must not block; may read the
/// coordinator back but not update it.
pub trait ProgressSink: Send + Sync {
    fn on_start(&self) {}
    fn on_progress(&self, percent: f64);
}

impl<S: ProgressSink + ?Sized> ProgressSink for Arc<S> {
    fn on_start(&self) {
        (**self).on_start();
    }

    fn on_progress(&self, percent: f64) {
        (**self).on_progress(percent);
    }
}

pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn on_progress(&self, _percent: f64) {}
}

pub struct LogSink {
    pub label: String,
}

impl ProgressSink for LogSink {
    fn on_start(&self) {
        log::info!("{}: started", self.label);
    }

    fn on_progress(&self, percent: f64) {
        log::info!("{}: {percent:.1}%", self.label);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started,
    Progress(f64),
}

pub struct ChannelSink {
    tx: Mutex<Sender<ProgressEvent>>,
}

impl ChannelSink {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }

    fn send(&self, event: ProgressEvent) {
        let tx = self.tx.lock().unwrap_or_else(|poison| poison.into_inner());
        let _ = tx.send(event);
    }
}

impl ProgressSink for ChannelSink {
    fn on_start(&self) {
        self.send(ProgressEvent::Started);
    }

    fn on_progress(&self, percent: f64) {
        self.send(ProgressEvent::Progress(percent));
    }
}

#[derive(Debug, Clone, Copy)]
struct Operation {
    // None while the name has only been seen through `update`.
    weight: Option<f64>,
    progress: f64,
}

#[derive(Debug, Default)]
struct State {
    operations: HashMap<String, Operation>,
    started: bool,
    emitted: f64,
    last_emit: Option<Instant>,
    pending: bool,
    flush_scheduled: bool,
    run: u64,
}

impl State {
    fn aggregate(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for op in self.operations.values() {
            if let Some(weight) = op.weight {
                weighted += weight * op.progress;
                total_weight += weight;
            }
        }
        if total_weight > 0.0 {
            (weighted / total_weight).min(100.0)
        } else {
            0.0
        }
    }
}

struct Shared {
    sink: Arc<dyn ProgressSink>,
    min_interval: Duration,
    state: Mutex<State>,
    // What the sink has seen. Guards delivery order once the state lock is
    // released.
    delivered: Mutex<Delivered>,
}

#[derive(Debug, Default)]
struct Delivered {
    run: u64,
    percent: f64,
}

#[derive(Debug, Clone, Copy)]
struct Emission {
    run: u64,
    percent: f64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    fn lock_delivered(&self) -> MutexGuard<'_, Delivered> {
        self.delivered
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn mark_emitted(&self, state: &mut State, aggregate: f64) -> Emission {
        state.emitted = aggregate;
        state.last_emit = Some(Instant::now());
        state.pending = false;
        Emission {
            run: state.run,
            percent: aggregate,
        }
    }

    fn take_pending(&self, state: &mut State) -> Option<Emission> {
        state.pending = false;
        let aggregate = state.aggregate();
        (aggregate > state.emitted).then(|| self.mark_emitted(state, aggregate))
    }

    fn deliver(&self, emission: Emission) {
        let mut delivered = self.lock_delivered();
        // Anything from a finished run is stale.
        if emission.run == delivered.run && emission.percent > delivered.percent {
            delivered.percent = emission.percent;
            self.sink.on_progress(emission.percent);
        }
    }

    fn schedule_flush(self: &Arc<Self>, state: &mut State) {
        if state.flush_scheduled {
            return;
        }
        state.flush_scheduled = true;
        let shared = Arc::clone(self);
        let run = state.run;
        thread::spawn(move || shared.trailing_flush(run));
    }

    fn trailing_flush(&self, run: u64) {
        loop {
            let wait = {
                let mut state = self.lock();
                if state.run != run {
                    return;
                }
                if !state.started || !state.pending {
                    state.flush_scheduled = false;
                    return;
                }
                let since = state
                    .last_emit
                    .map_or(self.min_interval, |at| at.elapsed());
                if since >= self.min_interval {
                    state.flush_scheduled = false;
                    let value = self.take_pending(&mut state);
                    drop(state);
                    if let Some(value) = value {
                        self.deliver(value);
                    }
                    return;
                }
                self.min_interval - since
            };
            thread::sleep(wait);
        }
    }
}

/// Folds progress from several named, concurrently running operations into
/// one weighted 0..=100 figure.
///
/// Per-operation progress never goes backwards, the emitted aggregate never
/// goes backwards, and emissions are spaced at least `min_interval` apart.
/// An update that lands inside the interval is held back and goes out once
/// the interval has passed, even if nothing else arrives.
pub struct ProgressCoordinator {
    shared: Arc<Shared>,
}

impl ProgressCoordinator {
    pub fn new(sink: Arc<dyn ProgressSink>, min_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                sink,
                min_interval,
                state: Mutex::new(State::default()),
                delivered: Mutex::new(Delivered::default()),
            }),
        }
    }

    pub fn register(&self, name: &str, weight: f64) -> Result<(), ProgressError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ProgressError::InvalidWeight {
                name: name.to_string(),
                weight,
            });
        }
        let mut state = self.shared.lock();
        if state.started {
            return Err(ProgressError::AlreadyStarted(name.to_string()));
        }
        if let Some(op) = state.operations.get_mut(name) {
            if op.weight.is_some() {
                return Err(ProgressError::DuplicateOperation(name.to_string()));
            }
            log::warn!(
                "operation {name} reported {:.1}% before registering; discarding it",
                op.progress
            );
            *op = Operation {
                weight: Some(weight),
                progress: 0.0,
            };
            return Ok(());
        }
        state.operations.insert(
            name.to_string(),
            Operation {
                weight: Some(weight),
                progress: 0.0,
            },
        );
        Ok(())
    }

    /// Opens a run. Call once registration is done and before any
    /// callback is handed out.
    pub fn start(&self) {
        let run = {
            let mut state = self.shared.lock();
            state.started = true;
            state.emitted = 0.0;
            state.last_emit = None;
            state.pending = false;
            state.flush_scheduled = false;
            state.run += 1;
            state.run
        };
        let mut delivered = self.shared.lock_delivered();
        *delivered = Delivered { run, percent: 0.0 };
        self.shared.sink.on_start();
    }

    /// Records `progress` (clamped to 0..=100) for `name`. Lower values than
    /// already recorded are ignored. Unregistered names are tracked but do
    /// not count towards the aggregate.
    pub fn update(&self, name: &str, progress: f64) {
        if progress.is_nan() {
            return;
        }
        let clamped = progress.clamp(0.0, 100.0);

        let value = {
            let mut state = self.shared.lock();
            let op = state.operations.entry(name.to_string()).or_insert_with(|| {
                log::warn!("progress for unregistered operation {name}");
                Operation {
                    weight: None,
                    progress: 0.0,
                }
            });
            if clamped <= op.progress {
                return;
            }
            op.progress = clamped;
            let registered = op.weight.is_some();
            if !registered || !state.started {
                return;
            }

            let aggregate = state.aggregate();
            if aggregate <= state.emitted {
                return;
            }
            let due = state
                .last_emit
                .is_none_or(|at| at.elapsed() >= self.shared.min_interval);
            if !due {
                state.pending = true;
                self.shared.schedule_flush(&mut state);
                return;
            }
            self.shared.mark_emitted(&mut state, aggregate)
        };
        self.shared.deliver(value);
    }

    pub fn flush(&self) {
        let value = {
            let mut state = self.shared.lock();
            if !state.started || !state.pending {
                return;
            }
            self.shared.take_pending(&mut state)
        };
        if let Some(value) = value {
            self.shared.deliver(value);
        }
    }

    /// Emits exactly 100 and resets every operation so the coordinator can
    /// drive another run.
    pub fn complete(&self) {
        let run = {
            let mut state = self.shared.lock();
            let run = state.run + 1;
            *state = State {
                run,
                ..State::default()
            };
            run
        };
        let mut delivered = self.shared.lock_delivered();
        self.shared.sink.on_progress(100.0);
        *delivered = Delivered { run, percent: 0.0 };
    }

    pub fn callback<'a>(&'a self, name: &'a str) -> impl Fn(f64) + Send + Sync + 'a {
        move |progress| self.update(name, progress)
    }

    pub fn current(&self) -> f64 {
        self.shared.lock().emitted
    }

    pub fn aggregate(&self) -> f64 {
        self.shared.lock().aggregate()
    }
}

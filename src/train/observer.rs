use std::ops::ControlFlow;
use std::sync::mpsc;

use crate::train::epoch_snapshot::EpochSnapshot;

/// Receives training snapshots at the `log_every` cadence.
///
/// Returning `ControlFlow::Break` ends training after the current epoch with
/// `TrainStatus::Stopped`.
pub trait TrainObserver {
    fn on_epoch(&mut self, snapshot: &EpochSnapshot) -> ControlFlow<()>;
}

impl<F> TrainObserver for F
where
    F: FnMut(&EpochSnapshot),
{
    fn on_epoch(&mut self, snapshot: &EpochSnapshot) -> ControlFlow<()> {
        self(snapshot);
        ControlFlow::Continue(())
    }
}

/// Forwards snapshots over a channel. Training stops once the receiver is dropped.
impl TrainObserver for mpsc::Sender<EpochSnapshot> {
    fn on_epoch(&mut self, snapshot: &EpochSnapshot) -> ControlFlow<()> {
        match self.send(snapshot.clone()) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

/// Ignores every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrainObserver for NoopObserver {
    fn on_epoch(&mut self, _snapshot: &EpochSnapshot) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Emits one `tracing` event per snapshot, plus a `debug` event per layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TrainObserver for LogObserver {
    fn on_epoch(&mut self, snapshot: &EpochSnapshot) -> ControlFlow<()> {
        tracing::info!(epoch = snapshot.epoch, error = snapshot.error, "training progress");
        for (index, layer) in snapshot.layers.iter().enumerate() {
            tracing::debug!(
                index,
                kind = ?layer.kind,
                inputs = ?layer.inputs,
                weights = ?layer.weights,
                outputs = ?layer.outputs,
                "layer state"
            );
        }
        ControlFlow::Continue(())
    }
}

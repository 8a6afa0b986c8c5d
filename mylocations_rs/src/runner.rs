//! Tokio host for [`FixController`].
//!
//! Commands from [`RunnerHandle`] and callbacks from the position source,
//! geocoder and timer all funnel into one `select!` loop, so the controller
//! only ever sees one event at a time.

use crate::acquisition::{
    Authorization, Effect, Event, FixController, Notification, SessionToken, StatusSnapshot,
};
use crate::error::{ControllerError, LocationError};
use crate::geocoder::ReverseGeocoder;
use crate::types::{duration_from_secs, Position};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Where a position source delivers callbacks for one subscription
#[derive(Clone, Debug)]
pub struct PositionSink {
    token: SessionToken,
    tx: mpsc::Sender<Event>,
}

impl PositionSink {
    pub fn new(token: SessionToken, tx: mpsc::Sender<Event>) -> Self {
        Self { token, tx }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Returns false once the runner is gone.
    pub async fn sample(&self, position: Position) -> bool {
        self.tx
            .send(Event::Sample {
                token: self.token,
                position,
            })
            .await
            .is_ok()
    }

    pub async fn error(&self, error: LocationError) -> bool {
        self.tx
            .send(Event::SampleError {
                token: self.token,
                error,
            })
            .await
            .is_ok()
    }
}

/// Platform location service.
///
/// The caller checks authorization before starting; `open` assumes permission.
pub trait PositionSource: Send {
    fn open(&mut self, desired_accuracy_m: f64, sink: PositionSink);
    fn close(&mut self, token: SessionToken);
}

enum Command {
    Start {
        reply: oneshot::Sender<Result<(), ControllerError>>,
    },
    Stop,
    Authorization(Authorization),
    Snapshot {
        reply: oneshot::Sender<StatusSnapshot>,
    },
}

/// Caller-side commands
#[derive(Clone)]
pub struct RunnerHandle {
    commands: mpsc::Sender<Command>,
}

impl RunnerHandle {
    pub async fn start(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Start { reply }).await?;
        rx.await??;
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(Command::Stop).await
    }

    pub async fn set_authorization(&self, authorization: Authorization) -> Result<()> {
        self.send(Command::Authorization(authorization)).await
    }

    pub async fn snapshot(&self) -> Result<StatusSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        Ok(rx.await?)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("fix runner has shut down"))
    }
}

pub struct FixRunner<S: PositionSource> {
    controller: FixController,
    source: S,
    geocoder: Arc<dyn ReverseGeocoder>,
    commands_rx: mpsc::Receiver<Command>,
    events_tx: mpsc::Sender<Event>,
    events_rx: mpsc::Receiver<Event>,
    notifications: mpsc::UnboundedSender<Notification>,
    timer: Option<(SessionToken, JoinHandle<()>)>,
}

impl<S: PositionSource> FixRunner<S> {
    pub fn new(
        controller: FixController,
        source: S,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> (Self, RunnerHandle, mpsc::UnboundedReceiver<Notification>) {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let (events_tx, events_rx) = mpsc::channel(100);
        let (notifications, notifications_rx) = mpsc::unbounded_channel();

        let runner = FixRunner {
            controller,
            source,
            geocoder,
            commands_rx,
            events_tx,
            events_rx,
            notifications,
            timer: None,
        };

        (
            runner,
            RunnerHandle {
                commands: commands_tx,
            },
            notifications_rx,
        )
    }

    /// Process events until every [`RunnerHandle`] is dropped, then cancel
    /// any running acquisition.
    pub async fn run(mut self) {
        loop {
            let event = tokio::select! {
                command = self.commands_rx.recv() => match command {
                    Some(Command::Start { reply }) => {
                        let result = self.controller.start().map(|effects| self.execute(effects));
                        let _ = reply.send(result);
                        continue;
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.controller.snapshot());
                        continue;
                    }
                    Some(Command::Stop) => Event::Stop,
                    Some(Command::Authorization(auth)) => Event::Authorization(auth),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => event,
            };

            match self.controller.handle(event) {
                Ok(effects) => self.execute(effects),
                Err(e) => log::warn!("Ignoring event: {}", e),
            }
        }

        let effects = self.controller.stop();
        self.execute(effects);
        log::debug!("Fix runner shut down");
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenSubscription {
                    token,
                    desired_accuracy_m,
                } => {
                    let sink = PositionSink::new(token, self.events_tx.clone());
                    self.source.open(desired_accuracy_m, sink);
                }
                Effect::CloseSubscription { token } => self.source.close(token),
                Effect::ArmTimer { token, after_secs } => self.arm_timer(token, after_secs),
                Effect::CancelTimer { token } => self.cancel_timer(token),
                Effect::StartGeocode {
                    token,
                    request,
                    position,
                } => {
                    let lookup = self.geocoder.lookup(position);
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = lookup.await;
                        let _ = tx
                            .send(Event::GeocodeCompleted {
                                token,
                                request,
                                result,
                            })
                            .await;
                    });
                }
                Effect::Notify { notification } => {
                    // observers may have gone away; the session carries on
                    let _ = self.notifications.send(notification);
                }
            }
        }
    }

    fn arm_timer(&mut self, token: SessionToken, after_secs: f64) {
        if let Some((_, handle)) = self.timer.take() {
            handle.abort();
        }
        let tx = self.events_tx.clone();
        let delay = duration_from_secs(after_secs);
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Event::TimerFired { token }).await;
        });
        self.timer = Some((token, handle));
    }

    fn cancel_timer(&mut self, token: SessionToken) {
        match self.timer.take() {
            Some((armed, handle)) if armed == token => handle.abort(),
            other => self.timer = other,
        }
    }
}

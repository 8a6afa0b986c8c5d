//! Fix acquisition state machine.
//!
//! The controller never talks to a location service, geocoder or clock
//! directly. Every command and callback goes through [`FixController::handle`],
//! which mutates the session and returns the [`Effect`]s a runner must carry
//! out. Callbacks carry the [`SessionToken`] they were dispatched under; any
//! token other than the current one is dropped.

use super::config::AcquisitionConfig;
use super::policy::{assess_sample, Authorization, SampleVerdict};
use super::status::{classify, FixReason, Notification, Outcome, StatusSnapshot};
use crate::error::{AcquisitionError, ControllerError, GeocodeError, LocationError};
use crate::types::{Address, Position};
use serde::{Deserialize, Serialize};

/// Monotonic id of an acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub u64);

/// Session lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// Subscription open; `refining` once a first fix has been accepted
    Acquiring,
    Done(Outcome),
}

/// Inputs to the controller, in delivery order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    Stop,
    Authorization(Authorization),
    Sample {
        token: SessionToken,
        position: Position,
    },
    SampleError {
        token: SessionToken,
        error: LocationError,
    },
    TimerFired {
        token: SessionToken,
    },
    GeocodeCompleted {
        token: SessionToken,
        request: u64,
        result: Result<Address, GeocodeError>,
    },
}

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    OpenSubscription {
        token: SessionToken,
        desired_accuracy_m: f64,
    },
    CloseSubscription {
        token: SessionToken,
    },
    ArmTimer {
        token: SessionToken,
        after_secs: f64,
    },
    CancelTimer {
        token: SessionToken,
    },
    StartGeocode {
        token: SessionToken,
        request: u64,
        position: Position,
    },
    Notify {
        notification: Notification,
    },
}

/// Mutable session record
#[derive(Debug, Clone, Default)]
struct Session {
    active: bool,
    timer_armed: bool,
    best: Option<Position>,
    last_error: Option<AcquisitionError>,
    /// Request id of the geocode currently in flight
    geocode_in_flight: Option<u64>,
    address: Option<Address>,
    last_geocode_error: Option<GeocodeError>,
}

pub struct FixController {
    config: AcquisitionConfig,
    token: SessionToken,
    phase: Phase,
    session: Session,
    authorization: Option<Authorization>,
    next_geocode_request: u64,
}

impl FixController {
    pub fn new(config: AcquisitionConfig) -> Self {
        FixController {
            config,
            token: SessionToken(0),
            phase: Phase::Idle,
            session: Session::default(),
            authorization: None,
            next_geocode_request: 0,
        }
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Replace the tuning. Takes effect from the next `start`.
    pub fn set_config(&mut self, config: AcquisitionConfig) {
        self.config = config;
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Last authorization reported by the caller, if any
    pub fn authorization(&self) -> Option<Authorization> {
        self.authorization
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_acquiring(&self) -> bool {
        self.phase == Phase::Acquiring
    }

    /// Acquiring with at least one accepted fix
    pub fn is_refining(&self) -> bool {
        self.is_acquiring() && self.session.best.is_some()
    }

    pub fn best_sample(&self) -> Option<&Position> {
        self.session.best.as_ref()
    }

    pub fn resolved_address(&self) -> Option<&Address> {
        self.session.address.as_ref()
    }

    pub fn last_error(&self) -> Option<&AcquisitionError> {
        self.session.last_error.as_ref()
    }

    pub fn last_geocode_error(&self) -> Option<&GeocodeError> {
        self.session.last_geocode_error.as_ref()
    }

    pub fn is_geocoding(&self) -> bool {
        self.session.geocode_in_flight.is_some()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        // a fix already on screen outranks the permission banner
        let services_blocked = self.session.best.is_none()
            && self
                .authorization
                .map(Authorization::is_blocked)
                .unwrap_or(false);
        let acquiring = self.is_acquiring();

        StatusSnapshot {
            position: self.session.best,
            address: self.session.address.clone(),
            acquiring,
            geocoding: self.is_geocoding(),
            geocode_failed: self.session.last_geocode_error.is_some(),
            status: classify(self.session.last_error.as_ref(), services_blocked, acquiring),
            error: self.session.last_error.clone(),
        }
    }

    /// Feed one event. Only `Start` can fail; callbacks never do.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, ControllerError> {
        let effects = match event {
            Event::Start => return self.start(),
            Event::Stop => self.stop(),
            Event::Authorization(auth) => self.on_authorization(auth),
            Event::Sample { token, position } => self.on_sample(token, position),
            Event::SampleError { token, error } => self.on_sample_error(token, error),
            Event::TimerFired { token } => self.on_timeout(token),
            Event::GeocodeCompleted {
                token,
                request,
                result,
            } => self.on_geocode_completed(token, request, result),
        };
        Ok(effects)
    }

    pub fn start(&mut self) -> Result<Vec<Effect>, ControllerError> {
        if self.is_acquiring() {
            return Err(ControllerError::AlreadyRunning);
        }

        self.token = SessionToken(self.token.0 + 1);
        self.session = Session {
            active: true,
            timer_armed: true,
            ..Session::default()
        };
        self.phase = Phase::Acquiring;

        log::info!(
            "Fix acquisition {} started (target {:.0} m, timeout {:.0} s)",
            self.token.0,
            self.config.target_accuracy_m,
            self.config.timeout_secs
        );

        Ok(vec![
            Effect::OpenSubscription {
                token: self.token,
                desired_accuracy_m: self.config.target_accuracy_m,
            },
            Effect::ArmTimer {
                token: self.token,
                after_secs: self.config.timeout_secs,
            },
            self.notify_status(),
        ])
    }

    /// Manual cancel. No-op unless acquiring.
    pub fn stop(&mut self) -> Vec<Effect> {
        if !self.is_acquiring() {
            return Vec::new();
        }

        let mut effects = self.teardown();
        self.phase = Phase::Idle;
        // late callbacks for the cancelled attempt must not land anywhere
        self.session.geocode_in_flight = None;
        self.token = SessionToken(self.token.0 + 1);

        log::info!("Fix acquisition stopped by caller");
        effects.push(self.notify_status());
        effects
    }

    pub fn on_authorization(&mut self, authorization: Authorization) -> Vec<Effect> {
        if self.authorization == Some(authorization) {
            return Vec::new();
        }
        self.authorization = Some(authorization);
        vec![self.notify_status()]
    }

    pub fn on_sample(&mut self, token: SessionToken, sample: Position) -> Vec<Effect> {
        if !self.accepts_callback(token) {
            log::debug!("Dropping sample for stale session {}", token.0);
            return Vec::new();
        }

        let verdict = assess_sample(&self.config, self.session.best.as_ref(), &sample);
        match verdict {
            SampleVerdict::Stale => {
                log::debug!("Rejected cached fix ({:.1} s old)", sample.age_secs);
                Vec::new()
            }
            SampleVerdict::Invalid => {
                log::debug!("Rejected fix with invalid accuracy {}", sample.accuracy);
                Vec::new()
            }
            SampleVerdict::Improved {
                distance,
                reached_target,
            } => self.accept(sample, distance, reached_target),
            SampleVerdict::Stalled { interval_secs } => {
                log::info!(
                    "No improvement for {:.1} s, accepting best-effort fix",
                    interval_secs
                );
                match self.session.best {
                    Some(best) => self.finish(Outcome::Success {
                        position: best,
                        reason: FixReason::Stalled,
                    }),
                    None => Vec::new(),
                }
            }
            SampleVerdict::NotBetter { .. } => Vec::new(),
        }
    }

    fn accept(&mut self, sample: Position, distance: f64, reached_target: bool) -> Vec<Effect> {
        let had_best = self.session.best.is_some();
        self.session.last_error = None;
        self.session.best = Some(sample);

        log::debug!(
            "Accepted fix {:.6},{:.6} ±{:.1} m",
            sample.latitude,
            sample.longitude,
            sample.accuracy
        );

        let mut effects = Vec::new();
        let mut outcome = None;

        if reached_target {
            effects.extend(self.teardown());
            if had_best && distance > 0.0 {
                // the in-flight lookup was for an earlier, slightly different fix
                if let Some(request) = self.session.geocode_in_flight.take() {
                    log::debug!("Superseding geocode request {}", request);
                }
            }
            let done = Outcome::Success {
                position: sample,
                reason: FixReason::TargetReached,
            };
            self.phase = Phase::Done(done.clone());
            outcome = Some(done);
            log::info!("Fix acquired at ±{:.1} m", sample.accuracy);
        }

        if self.session.geocode_in_flight.is_none() {
            effects.push(self.begin_geocode(sample));
        }

        effects.push(self.notify_status());
        if let Some(outcome) = outcome {
            effects.push(Effect::Notify {
                notification: Notification::Finished(outcome),
            });
        }
        effects
    }

    pub fn on_sample_error(&mut self, token: SessionToken, error: LocationError) -> Vec<Effect> {
        if !self.accepts_callback(token) {
            return Vec::new();
        }

        if error.is_transient() {
            log::debug!("Position source has no fix yet, still waiting");
            return Vec::new();
        }

        log::warn!("Fix acquisition failed: {}", error);
        let cause = AcquisitionError::Position(error);
        self.session.last_error = Some(cause.clone());
        self.finish(Outcome::Failure { cause })
    }

    pub fn on_timeout(&mut self, token: SessionToken) -> Vec<Effect> {
        if !self.accepts_callback(token) {
            return Vec::new();
        }

        if self.session.best.is_some() {
            // still refining a usable fix; keep listening
            return Vec::new();
        }

        log::warn!(
            "No fix within {:.0} s, giving up",
            self.config.timeout_secs
        );
        let cause = AcquisitionError::TimedOut;
        self.session.last_error = Some(cause.clone());
        self.finish(Outcome::Failure { cause })
    }

    pub fn on_geocode_completed(
        &mut self,
        token: SessionToken,
        request: u64,
        result: Result<Address, GeocodeError>,
    ) -> Vec<Effect> {
        if token != self.token {
            log::debug!("Dropping geocode result for stale session {}", token.0);
            return Vec::new();
        }
        if self.session.geocode_in_flight != Some(request) {
            log::debug!("Dropping superseded geocode result {}", request);
            return Vec::new();
        }

        self.session.geocode_in_flight = None;
        match result {
            Ok(address) => {
                self.session.address = Some(address);
                self.session.last_geocode_error = None;
            }
            Err(err) => {
                log::warn!("Reverse geocoding failed: {}", err);
                self.session.address = None;
                self.session.last_geocode_error = Some(err);
            }
        }

        vec![self.notify_status()]
    }

    /// Sample, error and timer callbacks only count while acquiring under the
    /// current token.
    fn accepts_callback(&self, token: SessionToken) -> bool {
        token == self.token && self.is_acquiring()
    }

    fn begin_geocode(&mut self, position: Position) -> Effect {
        self.next_geocode_request += 1;
        let request = self.next_geocode_request;
        self.session.geocode_in_flight = Some(request);
        Effect::StartGeocode {
            token: self.token,
            request,
            position,
        }
    }

    /// Close the subscription and cancel the timer, each at most once.
    fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.session.active {
            self.session.active = false;
            effects.push(Effect::CloseSubscription { token: self.token });
        }
        if self.session.timer_armed {
            self.session.timer_armed = false;
            effects.push(Effect::CancelTimer { token: self.token });
        }
        effects
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Effect> {
        let mut effects = self.teardown();
        self.phase = Phase::Done(outcome.clone());
        effects.push(self.notify_status());
        effects.push(Effect::Notify {
            notification: Notification::Finished(outcome),
        });
        effects
    }

    fn notify_status(&self) -> Effect {
        Effect::Notify {
            notification: Notification::Status(self.snapshot()),
        }
    }
}

impl Default for FixController {
    fn default() -> Self {
        Self::new(AcquisitionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::status::StatusClass;

    const T0: f64 = 1_700_000_000.0;

    fn fix(acc: f64, dt: f64) -> Position {
        Position::new(37.3318, -122.0312, acc, T0 + dt)
    }

    fn started() -> (FixController, SessionToken) {
        let mut c = FixController::default();
        c.start().unwrap();
        let token = c.token();
        (c, token)
    }

    fn geocode_requests(effects: &[Effect]) -> Vec<u64> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::StartGeocode { request, .. } => Some(*request),
                _ => None,
            })
            .collect()
    }

    fn finished(effects: &[Effect]) -> Option<&Outcome> {
        effects.iter().find_map(|e| match e {
            Effect::Notify {
                notification: Notification::Finished(outcome),
            } => Some(outcome),
            _ => None,
        })
    }

    fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
        effects.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_start_opens_subscription_and_arms_timer() {
        let mut c = FixController::default();
        let effects = c.start().unwrap();

        assert_eq!(
            effects[0],
            Effect::OpenSubscription {
                token: SessionToken(1),
                desired_accuracy_m: 10.0
            }
        );
        assert_eq!(
            effects[1],
            Effect::ArmTimer {
                token: SessionToken(1),
                after_secs: 60.0
            }
        );
        assert!(c.is_acquiring());
        assert_eq!(c.snapshot().status, StatusClass::Searching);
    }

    #[test]
    fn test_start_while_acquiring_is_rejected() {
        let (mut c, _) = started();
        assert_eq!(c.start(), Err(ControllerError::AlreadyRunning));
        assert_eq!(c.handle(Event::Start), Err(ControllerError::AlreadyRunning));
    }

    #[test]
    fn test_decreasing_accuracy_keeps_last() {
        let (mut c, token) = started();
        for (i, acc) in [120.0, 80.0, 45.0, 20.0, 12.0].iter().enumerate() {
            c.on_sample(token, fix(*acc, i as f64));
        }
        assert_eq!(c.best_sample(), Some(&fix(12.0, 4.0)));
        assert!(c.is_refining());
    }

    #[test]
    fn test_non_improving_keeps_first() {
        let (mut c, token) = started();
        c.on_sample(token, fix(50.0, 0.0));
        c.on_sample(token, fix(50.0, 1.0));
        c.on_sample(token, fix(70.0, 2.0));
        c.on_sample(token, fix(50.0, 3.0));
        assert_eq!(c.best_sample(), Some(&fix(50.0, 0.0)));
    }

    #[test]
    fn test_stale_and_invalid_never_accepted() {
        let (mut c, token) = started();
        assert!(c.on_sample(token, fix(3.0, 0.0).with_age(6.0)).is_empty());
        assert!(c.on_sample(token, fix(-1.0, 0.0)).is_empty());
        assert!(c.best_sample().is_none());
        assert!(c.is_acquiring());
    }

    #[test]
    fn test_reaching_target_ends_session() {
        let (mut c, token) = started();
        c.on_sample(token, fix(50.0, 0.0));
        let effects = c.on_sample(token, fix(8.0, 2.0));

        assert_eq!(c.best_sample(), Some(&fix(8.0, 2.0)));
        assert!(effects.contains(&Effect::CloseSubscription { token }));
        assert!(effects.contains(&Effect::CancelTimer { token }));
        assert_eq!(
            finished(&effects),
            Some(&Outcome::Success {
                position: fix(8.0, 2.0),
                reason: FixReason::TargetReached
            })
        );
        assert!(matches!(c.phase(), Phase::Done(o) if o.is_success()));
    }

    #[test]
    fn test_accurate_first_sample_ends_immediately() {
        let (mut c, token) = started();
        let effects = c.on_sample(token, fix(5.0, 0.0));
        assert!(finished(&effects).is_some());
        assert_eq!(geocode_requests(&effects).len(), 1);
        assert!(c.is_geocoding());
    }

    #[test]
    fn test_single_geocode_in_flight() {
        let (mut c, token) = started();
        let first = c.on_sample(token, fix(100.0, 0.0));
        let second = c.on_sample(token, fix(60.0, 1.0));
        assert_eq!(geocode_requests(&first).len(), 1);
        assert!(geocode_requests(&second).is_empty());
    }

    #[test]
    fn test_final_fix_supersedes_in_flight_geocode() {
        let (mut c, token) = started();
        let first = c.on_sample(token, fix(100.0, 0.0));
        let stale_request = geocode_requests(&first)[0];

        // moved a few meters and got accurate
        let final_fix = Position::new(37.33185, -122.0312, 6.0, T0 + 3.0);
        let effects = c.on_sample(token, final_fix);
        let fresh = geocode_requests(&effects);
        assert_eq!(fresh.len(), 1);
        assert_ne!(fresh[0], stale_request);

        // the earlier lookup finishing late must not overwrite anything
        let address = Address {
            street: Some("Old Street".to_string()),
            ..Default::default()
        };
        assert!(c
            .on_geocode_completed(token, stale_request, Ok(address))
            .is_empty());
        assert!(c.resolved_address().is_none());
        assert!(c.is_geocoding());

        let address = Address {
            street: Some("Infinite Loop".to_string()),
            ..Default::default()
        };
        c.on_geocode_completed(token, fresh[0], Ok(address.clone()));
        assert_eq!(c.resolved_address(), Some(&address));
        assert!(!c.is_geocoding());
    }

    #[test]
    fn test_final_fix_at_same_spot_keeps_in_flight_geocode() {
        let (mut c, token) = started();
        c.on_sample(token, fix(100.0, 0.0));
        let effects = c.on_sample(token, fix(6.0, 1.0));
        assert!(geocode_requests(&effects).is_empty());
        assert!(c.is_geocoding());
    }

    #[test]
    fn test_stall_after_eleven_seconds_completes() {
        let (mut c, token) = started();
        c.on_sample(token, fix(65.0, 0.0));
        let effects = c.on_sample(token, fix(65.0, 11.0));
        assert_eq!(
            finished(&effects),
            Some(&Outcome::Success {
                position: fix(65.0, 0.0),
                reason: FixReason::Stalled
            })
        );
        assert!(!c.is_acquiring());
    }

    #[test]
    fn test_no_stall_after_nine_seconds() {
        let (mut c, token) = started();
        c.on_sample(token, fix(65.0, 0.0));
        let effects = c.on_sample(token, fix(65.0, 9.0));
        assert!(effects.is_empty());
        assert!(c.is_acquiring());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut c = FixController::default();
        assert!(c.stop().is_empty());
        assert_eq!(c.phase(), &Phase::Idle);
        assert_eq!(c.token(), SessionToken(0));
    }

    #[test]
    fn test_stop_tears_down_once() {
        let (mut c, token) = started();
        let effects = c.stop();
        assert_eq!(effects[0], Effect::CloseSubscription { token });
        assert_eq!(effects[1], Effect::CancelTimer { token });
        assert_eq!(c.phase(), &Phase::Idle);
        assert_eq!(c.snapshot().status, StatusClass::Idle);
        assert!(c.stop().is_empty());
    }

    #[test]
    fn test_timeout_without_fix_fails_once() {
        let (mut c, token) = started();
        let effects = c.on_timeout(token);

        assert_eq!(
            count(&effects, |e| matches!(e, Effect::CloseSubscription { .. })),
            1
        );
        assert_eq!(
            count(&effects, |e| matches!(e, Effect::CancelTimer { .. })),
            1
        );
        assert_eq!(
            finished(&effects),
            Some(&Outcome::Failure {
                cause: AcquisitionError::TimedOut
            })
        );
        assert_eq!(c.snapshot().status, StatusClass::ErrorGettingLocation);

        assert!(c.on_timeout(token).is_empty());
        assert!(c.handle(Event::TimerFired { token }).unwrap().is_empty());
    }

    #[test]
    fn test_timeout_while_refining_is_noop() {
        let (mut c, token) = started();
        c.on_sample(token, fix(80.0, 0.0));
        assert!(c.on_timeout(token).is_empty());
        assert!(c.is_acquiring());
        assert!(c.last_error().is_none());

        let effects = c.on_sample(token, fix(9.0, 2.0));
        assert!(finished(&effects).is_some());
    }

    #[test]
    fn test_transient_error_is_swallowed() {
        let (mut c, token) = started();
        assert!(c
            .on_sample_error(token, LocationError::LocationUnknown)
            .is_empty());
        assert!(c.is_acquiring());
        assert!(c.last_error().is_none());
    }

    #[test]
    fn test_denied_error_ends_session() {
        let (mut c, token) = started();
        let effects = c.on_sample_error(token, LocationError::Denied);
        assert!(effects.contains(&Effect::CloseSubscription { token }));
        assert!(effects.contains(&Effect::CancelTimer { token }));
        assert_eq!(
            c.last_error(),
            Some(&AcquisitionError::Position(LocationError::Denied))
        );
        assert_eq!(c.snapshot().status, StatusClass::LocationServicesDisabled);
    }

    #[test]
    fn test_restart_clears_previous_session() {
        let (mut c, token) = started();
        c.on_sample_error(token, LocationError::Network);
        assert!(c.last_error().is_some());

        c.start().unwrap();
        assert!(c.last_error().is_none());
        assert!(c.best_sample().is_none());
        assert!(c.resolved_address().is_none());
    }

    #[test]
    fn test_geocode_failure_does_not_fail_session() {
        let (mut c, token) = started();
        let effects = c.on_sample(token, fix(40.0, 0.0));
        let request = geocode_requests(&effects)[0];

        c.on_geocode_completed(token, request, Err(GeocodeError::NoResult));
        assert!(c.is_acquiring());
        assert!(c.resolved_address().is_none());
        assert_eq!(c.last_geocode_error(), Some(&GeocodeError::NoResult));
        assert!(c.snapshot().geocode_failed);

        // the next improvement is free to look up again
        let effects = c.on_sample(token, fix(30.0, 1.0));
        assert_eq!(geocode_requests(&effects).len(), 1);
    }

    #[test]
    fn test_geocode_lands_after_successful_finish() {
        let (mut c, token) = started();
        let effects = c.on_sample(token, fix(5.0, 0.0));
        let request = geocode_requests(&effects)[0];

        let address = Address {
            locality: Some("Cupertino".to_string()),
            ..Default::default()
        };
        let effects = c.on_geocode_completed(token, request, Ok(address.clone()));
        assert_eq!(effects.len(), 1);
        assert_eq!(c.resolved_address(), Some(&address));
    }

    #[test]
    fn test_geocode_after_stop_ignored_by_next_session() {
        let (mut c, old) = started();
        let effects = c.on_sample(old, fix(40.0, 0.0));
        let request = geocode_requests(&effects)[0];
        c.stop();

        c.start().unwrap();
        let late = Address {
            street: Some("Old Street".to_string()),
            ..Default::default()
        };
        assert!(c.on_geocode_completed(old, request, Ok(late)).is_empty());
        assert!(c.resolved_address().is_none());
    }

    #[test]
    fn test_geocode_from_finished_session_ignored_after_restart() {
        let (mut c, old) = started();
        let effects = c.on_sample(old, fix(5.0, 0.0));
        assert!(finished(&effects).is_some());
        let request = geocode_requests(&effects)[0];

        c.start().unwrap();
        assert_ne!(c.token(), old);
        let late = Address {
            street: Some("Old Street".to_string()),
            ..Default::default()
        };
        assert!(c.on_geocode_completed(old, request, Ok(late)).is_empty());
        assert!(c.resolved_address().is_none());
        assert!(c.last_geocode_error().is_none());
    }

    #[test]
    fn test_callbacks_after_stop_ignored() {
        let (mut c, token) = started();
        c.stop();
        assert!(c.on_sample(token, fix(5.0, 0.0)).is_empty());
        assert!(c.on_sample_error(token, LocationError::Network).is_empty());
        assert!(c.on_timeout(token).is_empty());
        assert!(c.best_sample().is_none());
        assert!(c.last_error().is_none());
    }

    #[test]
    fn test_authorization_blocked_status() {
        let mut c = FixController::default();
        let effects = c.on_authorization(Authorization::Denied);
        assert_eq!(effects.len(), 1);
        assert_eq!(c.snapshot().status, StatusClass::LocationServicesDisabled);
        assert!(c.on_authorization(Authorization::Denied).is_empty());

        c.on_authorization(Authorization::Authorized);
        assert_eq!(c.snapshot().status, StatusClass::Idle);
    }

    #[test]
    fn test_revoked_authorization_keeps_fix_visible() {
        let (mut c, token) = started();
        c.on_sample(token, fix(40.0, 0.0));
        c.on_authorization(Authorization::Denied);
        let snapshot = c.snapshot();
        assert_eq!(snapshot.status, StatusClass::Searching);
        assert!(snapshot.position.is_some());
    }

    #[test]
    fn test_effects_serialize_for_host() {
        let mut c = FixController::default();
        let effects = c.start().unwrap();
        let json = serde_json::to_value(&effects).unwrap();
        assert_eq!(json[0]["type"], "open_subscription");
        assert_eq!(json[0]["token"], 1);
        assert_eq!(json[1]["type"], "arm_timer");
        assert_eq!(json[2]["notification"]["kind"], "status");
        assert_eq!(json[2]["notification"]["status"], "searching");
    }
}

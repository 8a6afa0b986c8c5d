use super::current_timestamp;
use crate::acquisition::SessionToken;
use crate::error::LocationError;
use crate::geocoder::GeocodeScript;
use crate::runner::{PositionSink, PositionSource};
use crate::types::{duration_from_secs, Position};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// One scripted callback from the location service, `at_secs` after open
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStep {
    Fix {
        at_secs: f64,
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        #[serde(default)]
        age_secs: f64,
    },
    Error {
        at_secs: f64,
        error: LocationError,
    },
}

impl ScenarioStep {
    pub fn at_secs(&self) -> f64 {
        match self {
            ScenarioStep::Fix { at_secs, .. } | ScenarioStep::Error { at_secs, .. } => *at_secs,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub steps: Vec<ScenarioStep>,
    #[serde(default)]
    pub geocode: GeocodeScript,
}

impl Scenario {
    /// Load a scenario from `.json` or `.json.gz`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let mut scenario: Scenario = if path.extension().map(|e| e == "gz").unwrap_or(false) {
            let gz = GzDecoder::new(file);
            serde_json::from_reader(BufReader::new(gz))?
        } else {
            serde_json::from_reader(BufReader::new(file))?
        };
        scenario.sort_steps();
        Ok(scenario)
    }

    pub fn sort_steps(&mut self) {
        self.steps
            .sort_by(|a, b| a.at_secs().total_cmp(&b.at_secs()));
    }
}

/// Replays a [`Scenario`] as a position subscription.
///
/// Fix timestamps are `open time + at_secs` regardless of the time scale, so
/// the stall rule sees scenario time while delivery can run faster.
pub struct ScenarioSource {
    scenario: Arc<Scenario>,
    time_scale: f64,
    subscription: Option<(SessionToken, JoinHandle<()>)>,
}

impl ScenarioSource {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario: Arc::new(scenario),
            time_scale: 1.0,
            subscription: None,
        }
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        if scale > 0.0 {
            self.time_scale = scale;
        }
        self
    }

    pub fn is_open(&self) -> bool {
        self.subscription
            .as_ref()
            .map(|(_, handle)| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl PositionSource for ScenarioSource {
    fn open(&mut self, desired_accuracy_m: f64, sink: PositionSink) {
        if let Some((_, previous)) = self.subscription.take() {
            previous.abort();
        }

        let token = sink.token();
        let scenario = Arc::clone(&self.scenario);
        let scale = self.time_scale;
        let base_timestamp = current_timestamp();
        log::info!(
            "Replaying scenario '{}' ({} steps, desired accuracy {:.0} m)",
            scenario.name,
            scenario.steps.len(),
            desired_accuracy_m
        );

        let handle = tokio::spawn(async move {
            let opened = Instant::now();
            for step in scenario.steps.iter() {
                let offset = duration_from_secs(step.at_secs() / scale);
                match opened.checked_add(offset) {
                    Some(deadline) => sleep_until(deadline).await,
                    None => {
                        log::warn!("Step at {} s is out of reach, ending replay", step.at_secs());
                        break;
                    }
                }

                let delivered = match step {
                    ScenarioStep::Fix {
                        at_secs,
                        latitude,
                        longitude,
                        accuracy,
                        age_secs,
                    } => {
                        let position =
                            Position::new(*latitude, *longitude, *accuracy, base_timestamp + at_secs)
                                .with_age(*age_secs);
                        sink.sample(position).await
                    }
                    ScenarioStep::Error { error, .. } => sink.error(error.clone()).await,
                };

                if !delivered {
                    log::warn!("Runner gone, stopping scenario replay");
                    break;
                }
            }
            log::debug!("Scenario replay for session {} exhausted", sink.token().0);
        });

        self.subscription = Some((token, handle));
    }

    fn close(&mut self, token: SessionToken) {
        match self.subscription.take() {
            Some((open, handle)) if open == token => handle.abort(),
            other => self.subscription = other,
        }
    }
}

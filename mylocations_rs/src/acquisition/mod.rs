pub mod config;
pub mod controller;
pub mod policy;
pub mod status;

pub use config::AcquisitionConfig;
pub use controller::{Effect, Event, FixController, Phase, SessionToken};
pub use policy::{assess_sample, preflight, Authorization, Preflight, SampleVerdict};
pub use status::{FixReason, FixReport, Notification, Outcome, StatusClass, StatusSnapshot};

// MyLocations JNI Library
// Hosts the fix acquisition controller for the Kotlin capture screen via JNI

pub mod android_jni;
pub mod bridge;
pub mod error;
pub mod session;

pub use error::{BridgeError, JResult};
pub use session::FixSession;

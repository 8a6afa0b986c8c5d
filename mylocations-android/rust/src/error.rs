use jni::JNIEnv;
use mylocations_rs::ControllerError;
use thiserror::Error;

/// Errors surfaced to the Kotlin side
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Acquisition already running")]
    AlreadyRunning,

    #[error("Location permission has not been requested yet")]
    PermissionRequired,

    #[error("Location services disabled for this app")]
    ServicesDisabled,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("JNI error: {0}")]
    JniError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ControllerError> for BridgeError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::AlreadyRunning => BridgeError::AlreadyRunning,
        }
    }
}

/// Result type for JNI operations
pub type JResult<T> = Result<T, BridgeError>;

/// Throw Java exception from Rust error
pub fn throw_java_exception(env: &mut JNIEnv, error: &BridgeError) -> JResult<()> {
    let exception_class = match error {
        BridgeError::AlreadyRunning | BridgeError::InvalidState(_) => {
            "java/lang/IllegalStateException"
        }
        BridgeError::PermissionRequired | BridgeError::ServicesDisabled => {
            "java/lang/SecurityException"
        }
        BridgeError::InvalidParameters(_) => "java/lang/IllegalArgumentException",
        BridgeError::JniError(_) | BridgeError::Internal(_) => "java/lang/RuntimeException",
    };

    let message = error.to_string();
    env.throw_new(exception_class, message)
        .map_err(|_| BridgeError::JniError("Failed to throw exception".to_string()))?;

    Ok(())
}

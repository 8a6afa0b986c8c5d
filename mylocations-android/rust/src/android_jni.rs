use crate::bridge::{
    address_from_json, config_from_json, effects_to_json, geocode_error_from_message,
    location_from_jni, request_from_jni, token_from_jni,
};
use crate::error::{throw_java_exception, BridgeError, JResult};
use crate::session::FixSession;
use jni::objects::{JClass, JString};
use jni::sys::{jdouble, jint, jlong, jstring};
use jni::JNIEnv;
use mylocations_rs::acquisition::Authorization;
use mylocations_rs::{Effect, LocationError};

// One controller for the capture screen, persisted across JNI calls
lazy_static::lazy_static! {
    static ref GLOBAL_SESSION: FixSession = {
        init_logging();
        FixSession::new()
    };
}

#[cfg(target_os = "android")]
fn init_logging() {
    let _ = android_log::init("MyLocations");
}

#[cfg(not(target_os = "android"))]
fn init_logging() {}

/// Hand a JSON payload back to Kotlin, or throw and return null
fn respond(env: &mut JNIEnv, result: JResult<String>) -> jstring {
    match result {
        Ok(json) => match env.new_string(&json) {
            Ok(jstr) => jstr.into_raw(),
            Err(_) => {
                let _ = throw_java_exception(
                    env,
                    &BridgeError::JniError("Failed to create Java string".to_string()),
                );
                std::ptr::null_mut()
            }
        },
        Err(e) => {
            log::warn!("JNI call failed: {}", e);
            let _ = throw_java_exception(env, &e);
            std::ptr::null_mut()
        }
    }
}

fn effects_response(effects: JResult<Vec<Effect>>) -> JResult<String> {
    effects_to_json(&effects?)
}

fn read_string(env: &mut JNIEnv, value: &JString) -> JResult<String> {
    env.get_string(value)
        .map(String::from)
        .map_err(|e| BridgeError::JniError(format!("Failed to read Java string: {}", e)))
}

/// JNI: Replace acquisition tuning from a JSON object
/// Returns: 0 on success, -1 on error (throws Java exception)
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_configure(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
) -> jint {
    let result = read_string(&mut env, &config_json)
        .and_then(|json| config_from_json(&json))
        .and_then(|config| GLOBAL_SESSION.configure(config));

    match result {
        Ok(()) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

/// JNI: Report the app's location permission
/// `status`: 0 not determined, 1 restricted, 2 denied, 3 authorized
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_setAuthorization(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
) -> jstring {
    let authorization = Authorization::from_code(status);
    let result = effects_response(GLOBAL_SESSION.set_authorization(authorization));
    respond(&mut env, result)
}

/// JNI: Begin acquiring a fix
/// Returns: effects JSON; throws SecurityException when permission is missing
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_startAcquisition(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = effects_response(GLOBAL_SESSION.start());
    if result.is_ok() {
        log::info!("Acquisition started");
    }
    respond(&mut env, result)
}

#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_stopAcquisition(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = effects_response(GLOBAL_SESSION.stop());
    respond(&mut env, result)
}

/// JNI: Deliver a location update for `token`
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_pushLocation(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
    latitude: jdouble,
    longitude: jdouble,
    accuracy: jdouble,
    timestamp: jdouble,
    age_secs: jdouble,
) -> jstring {
    let result = push_location_impl(token, latitude, longitude, accuracy, timestamp, age_secs);
    respond(&mut env, result)
}

fn push_location_impl(
    token: jlong,
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    timestamp: f64,
    age_secs: f64,
) -> JResult<String> {
    let token = token_from_jni(token)?;
    let position = location_from_jni(latitude, longitude, accuracy, timestamp, age_secs)?;
    effects_response(GLOBAL_SESSION.push_location(token, position))
}

/// JNI: Deliver a location failure
/// `code`: 0 location unknown, 1 denied, 2 network; anything else is passed
/// through with `message`
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_pushLocationError(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
    code: jint,
    message: JString,
) -> jstring {
    let result = read_string(&mut env, &message).and_then(|message| {
        let token = token_from_jni(token)?;
        let error = match LocationError::from_code(code) {
            LocationError::Other(_) if !message.is_empty() => LocationError::Other(message),
            error => error,
        };
        effects_response(GLOBAL_SESSION.push_location_error(token, error))
    });
    respond(&mut env, result)
}

#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_timerFired(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
) -> jstring {
    let result =
        token_from_jni(token).and_then(|token| effects_response(GLOBAL_SESSION.timer_fired(token)));
    respond(&mut env, result)
}

/// JNI: Geocoder returned an address (JSON object of `Address` fields)
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_geocodeCompleted(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
    request: jlong,
    address_json: JString,
) -> jstring {
    let result = read_string(&mut env, &address_json).and_then(|json| {
        let token = token_from_jni(token)?;
        let request = request_from_jni(request)?;
        let address = address_from_json(&json)?;
        effects_response(GLOBAL_SESSION.geocode_completed(token, request, Ok(address)))
    });
    respond(&mut env, result)
}

/// JNI: Geocoder failed or found nothing (empty message)
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_geocodeFailed(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
    request: jlong,
    message: JString,
) -> jstring {
    let result = read_string(&mut env, &message).and_then(|message| {
        let token = token_from_jni(token)?;
        let request = request_from_jni(request)?;
        let error = geocode_error_from_message(&message);
        effects_response(GLOBAL_SESSION.geocode_completed(token, request, Err(error)))
    });
    respond(&mut env, result)
}

/// JNI: Current status snapshot as JSON
#[no_mangle]
pub extern "C" fn Java_com_example_mylocations_FixBinding_getStatusJson(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = GLOBAL_SESSION.snapshot().and_then(|snapshot| {
        serde_json::to_string(&snapshot)
            .map_err(|_| BridgeError::Internal("JSON serialization failed".to_string()))
    });
    respond(&mut env, result)
}

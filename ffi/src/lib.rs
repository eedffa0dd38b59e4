//! This library is the C interface to the VR player, and consists predominantly of FFI
//! bridging functions the host application calls to create an engine, issue the
//! load/save/clear/record/play commands and drive it once per display refresh.

use std::ffi::{CStr, c_char};
use std::str::Utf8Error;

use vr_host_integrations::Log;

pub mod engine;
pub mod host;
pub mod logger;

/// A small helper method for moving in and out of our known types.
///
/// > This method operates in `unsafe` territory as it's operating on pointers handed out by
/// > `vrp_engine_create` and held by the host. We silo the `unsafe` usage here to not bloat the
/// > FFI layer; this should not be taken as an invitation to do all `unsafe` calls this way.
pub(crate) fn with<T, F>(instance_ptr: usize, handler: F)
where
    F: FnOnce(&mut T),
{
    with_returning::<T, _, _>(instance_ptr, handler)
}

/// A small helper method for moving in and out of our known types.
///
/// This variant can be used to return a value from within a handler.
pub(crate) fn with_returning<T, F, R>(instance_ptr: usize, handler: F) -> R
where
    F: FnOnce(&mut T) -> R,
{
    // Coerce the instance from the pointer. This is theoretically safe since the host only
    // ever passes back pointers it received from us, and is responsible for not using them
    // after the matching destroy call.
    let mut instance = unsafe { Box::from_raw(instance_ptr as *mut T) };

    let ret = handler(&mut instance);

    // Fall back into a raw pointer so Rust doesn't obliterate the object.
    let _leak = Box::into_raw(instance);

    ret
}

/// A helper function for converting c str types to Rust ones with some optional args for
/// aiding in debugging should this ever be a problem.
///
/// Paths are ordinary host input, so a string that isn't valid UTF-8 is logged and handed
/// back as an error rather than taking the process down.
pub(crate) fn c_str_to_string(string: *const c_char, fn_label: &str, err_label: &str) -> Result<String, Utf8Error> {
    // This is theoretically safe as the host guarantees a valid, NUL terminated string.
    let slice = unsafe { CStr::from_ptr(string) };

    match slice.to_str() {
        Ok(s) => Ok(s.to_string()),

        Err(e) => {
            tracing::error!(
                target: Log::Host,
                error = ?e,
                "[{}] Failed to bridge {}",
                fn_label,
                err_label
            );

            Err(e)
        },
    }
}

/// Like `c_str_to_string`, but treats a null pointer as "not provided".
pub(crate) fn optional_c_str_to_string(
    string: *const c_char,
    fn_label: &str,
    err_label: &str,
) -> Result<Option<String>, Utf8Error> {
    match string.is_null() {
        true => Ok(None),
        false => c_str_to_string(string, fn_label, err_label).map(Some),
    }
}

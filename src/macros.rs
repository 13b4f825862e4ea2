use core::fmt;
use core::panic::Location;

use crate::types::DynArrResult;

/// Always-on check. A failure leaves the array in a state it cannot
/// continue from, so it ends in `fatal`.
macro_rules! runtime_assert {
    ($expr:expr, $($msg:tt)+) => {
        if !($expr) {
            $crate::macros::fatal(format_args!($($msg)+));
        }
    };
}

/// Check guarding the preconditions of the `unsafe` unchecked operations.
///
/// Enabled with `debug_assertions` or the `checked_release` feature. When
/// neither is set the check is compiled out and a broken precondition is
/// undefined behavior.
macro_rules! runtime_debug_assert {
    ($expr:expr, $($msg:tt)+) => {
        if cfg!(any(debug_assertions, feature = "checked_release")) {
            runtime_assert!($expr, $($msg)+);
        }
    };
}

/// Emits a `log::trace!` record under the `dyn_array` target when the `log`
/// feature is enabled. Expands to nothing otherwise.
macro_rules! trace_block {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        log::trace!(target: "dyn_array", $($arg)+);
    };
}

/// Reports `msg` with the caller's location and ends the process.
///
/// The message goes through the panic hook, but the panic starts inside an
/// `extern "C"` frame, which cannot unwind, so it always aborts. Nothing
/// above the failing operation gets to observe the array afterwards.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn fatal(msg: fmt::Arguments<'_>) -> ! {
    abort_with(Location::caller(), msg);
}

#[allow(improper_ctypes_definitions)]
extern "C" fn abort_with(loc: &Location<'_>, msg: fmt::Arguments<'_>) -> ! {
    panic!("dyn_array runtime assert at {}, line {}: {}", loc.file(), loc.line(), msg);
}

/// Unwraps the result of a fallible operation or ends in `fatal` with the
/// error's message.
#[inline]
#[track_caller]
pub(crate) fn unwrap_fatal<V>(res: DynArrResult<V>) -> V {
    match res {
        Ok(v) => return v,
        Err(e) => fatal(format_args!("{}", e)),
    }
}

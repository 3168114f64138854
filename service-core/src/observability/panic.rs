//! Process-wide crash policy.
//!
//! A panic anywhere in the process (a request handler, a spawned task, the
//! main task) is logged and then terminates the process with exit code 1.
//! The runtime never gets a chance to swallow it; restarts are left to
//! whatever supervises the process.

use std::{any::Any, backtrace, panic};

/// Exit code used when the process dies on a panic.
pub const PANIC_EXIT_CODE: i32 = 1;

/// Extracts the message carried by a panic payload, if it is a string.
pub fn panic_reason(payload: &(dyn Any + Send)) -> Option<&str> {
    match payload.downcast_ref::<&str>() {
        Some(reason) => Some(reason),
        None => payload.downcast_ref::<String>().map(String::as_str),
    }
}

fn handle_panic(info: &panic::PanicHookInfo<'_>) {
    let bt = backtrace::Backtrace::force_capture();
    let location = info
        .location()
        .map(|l| format!("{}:{}", l.file(), l.line()))
        .unwrap_or_else(|| "-".to_string());

    match panic_reason(info.payload()) {
        Some(reason) => tracing::error!(
            %reason,
            %location,
            "Unhandled panic, application will terminate\n{bt}"
        ),
        None => tracing::error!(%location, "Unhandled panic, application will terminate\n{bt}"),
    }
}

/// Sets a panic hook that logs the panic, runs the previous hook and exits
/// the process with [`PANIC_EXIT_CODE`].
pub fn install_panic_hook() {
    let old_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        handle_panic(info);
        old_hook(info);
        std::process::exit(PANIC_EXIT_CODE);
    }));
}

/// Prints a diagnostic to stderr when `$enabled` is set.
///
/// The layer cannot report on itself through `tracing` without feeding its
/// own events back in.
macro_rules! bugsnag_debug {
    ($enabled:expr, $($arg:tt)*) => {
        if $enabled {
            eprint!("[bugsnag] ");
            eprintln!($($arg)*);
        }
    };
}

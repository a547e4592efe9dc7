pub use log::debug;

/// Write a debug message either directly to stderr or through the logger
///
/// The first argument is a local debug flag. When it is set the message is printed to stderr
/// regardless of log level, which is useful to trace a single code path. Otherwise the message is
/// logged at debug level, so it only appears when the program is run with `--debug`.
///
/// # Examples
///
/// ```
/// let debug = false;
/// debug_msg!(debug, "Sweep {iteration} objective: {objective}");
/// ```
macro_rules! debug_msg {
    ($flag:expr, $($arg:tt)+) => {
        if $flag {
            eprintln!($($arg)+);
        } else {
            $crate::log_utils::debug!($($arg)+);
        }
    }
}

pub(crate) use debug_msg;

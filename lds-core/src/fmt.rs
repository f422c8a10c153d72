//! Logging shims.
//!
//! Forward to `defmt` when the `defmt` feature is enabled, otherwise to `log`
//! when `log` is enabled, otherwise expand to nothing. Format strings must
//! stay within the common subset of both (`{}` and `{:?}`).

#![macro_use]
#![allow(unused_macros)]

macro_rules! lds_log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "defmt")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($arg:tt)*) => { lds_log!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { lds_log!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { lds_log!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { lds_log!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { lds_log!(error, $($arg)*) };
}

//! Crate-private logging macros.
//!
//! With the `log` feature these forward to the [`log`](https://docs.rs/log)
//! facade; without it they expand to nothing and the arguments are not
//! evaluated.

macro_rules! trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            ::log::trace!($($arg)+);
        }
    };
}

macro_rules! debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            ::log::debug!($($arg)+);
        }
    };
}

macro_rules! warn_ {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            ::log::warn!($($arg)+);
        }
    };
}

pub(crate) use {debug, trace, warn_ as warn};

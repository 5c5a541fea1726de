//! Printf-style logging capability
//!
//! Components that only need "take a template and arguments and log it"
//! depend on [`Printf`] instead of the whole [`Logger`](super::Logger) surface.

use std::fmt;
use std::sync::Arc;

/// Render a template with its arguments and log it at INFO
pub trait Printf: Send + Sync {
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>);
}

impl<T: Printf + ?Sized> Printf for &T {
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>) {
        (**self).printf(args);
    }
}

impl<T: Printf + ?Sized> Printf for Arc<T> {
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>) {
        (**self).printf(args);
    }
}

impl<T: Printf + ?Sized> Printf for Box<T> {
    #[track_caller]
    fn printf(&self, args: fmt::Arguments<'_>) {
        (**self).printf(args);
    }
}

/// Call [`Printf::printf`] with `format!`-style arguments
///
/// ```
/// use leveled_logs::{printf, Logger, Printf};
///
/// fn report(out: &dyn Printf) {
///     printf!(out, "processed {} jobs", 3);
/// }
///
/// let logger = Logger::new();
/// report(logger.standard_interface());
/// ```
#[macro_export]
macro_rules! printf {
    ($target:expr, $($arg:tt)+) => {
        $crate::Printf::printf(&$target, format_args!($($arg)+))
    };
}

// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session-wide state shared by every provider.

use core::fmt;
use std::sync::Arc;

const LOG_TARGET: &str = "caption_fonts";

/// Severity of a message sent to the [`Context`] log sink.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LogLevel {
    /// An operation failed.
    Error,
    /// Something unexpected happened but the operation went on.
    Warning,
    /// Diagnostic detail, only forwarded to the callback in verbose mode.
    Verbose,
}

impl LogLevel {
    fn to_log(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Warning => log::Level::Warn,
            Self::Verbose => log::Level::Debug,
        }
    }
}

/// Receiver for log messages emitted by providers.
pub type LogCallback = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Options for a [`Context`].
#[derive(Clone, Default, Debug)]
pub struct ContextOptions {
    /// If true, [`LogLevel::Verbose`] messages are passed to the log
    /// callback as well.
    ///
    /// The default value is false.
    pub verbose: bool,
    /// Default caption language applied to every new provider, as an
    /// ISO 639-2 code such as `"jpn"`.
    ///
    /// The default value is `None`.
    pub language: Option<String>,
}

/// Environment shared by all providers created for a rendering session.
///
/// Wrap it in an [`Arc`] and pass it to
/// [`create_provider`](crate::create_provider). Providers keep a clone of the
/// `Arc` and only read from it, so one context can serve any number of
/// providers on any number of threads.
#[derive(Clone, Default)]
pub struct Context {
    options: ContextOptions,
    callback: Option<LogCallback>,
}

impl Context {
    /// Creates a context with the given options and no log callback.
    pub fn new(options: ContextOptions) -> Self {
        Self {
            options,
            callback: None,
        }
    }

    /// Installs a callback that receives every message this context logs.
    ///
    /// Messages always go to the [`log`] facade; the callback is an extra
    /// sink for hosts that route caption logs elsewhere.
    pub fn with_log_callback(
        mut self,
        callback: impl Fn(LogLevel, &str) + Send + Sync + 'static,
    ) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Returns the options this context was created with.
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Returns true if verbose messages are forwarded to the callback.
    pub fn is_verbose(&self) -> bool {
        self.options.verbose
    }

    /// Returns the default language code for new providers.
    pub fn language(&self) -> Option<&str> {
        self.options.language.as_deref()
    }

    pub(crate) fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    pub(crate) fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warning, args);
    }

    pub(crate) fn verbose(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Verbose, args);
    }

    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        log::log!(target: LOG_TARGET, level.to_log(), "{args}");
        if level == LogLevel::Verbose && !self.options.verbose {
            return;
        }
        if let Some(callback) = &self.callback {
            callback(level, &args.to_string());
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, ContextOptions, LogLevel};
    use std::sync::{Arc, Mutex};

    fn recording(options: ContextOptions) -> (Context, Arc<Mutex<Vec<(LogLevel, String)>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let context = Context::new(options).with_log_callback(move |level, message| {
            sink.lock().unwrap().push((level, message.to_owned()));
        });
        (context, messages)
    }

    #[test]
    fn verbose_messages_are_filtered() {
        let (context, messages) = recording(ContextOptions::default());
        context.verbose(format_args!("matched {}", "Arimo"));
        context.warn(format_args!("unknown language {:?}", "xyz"));
        let messages = messages.lock().unwrap();
        assert_eq!(
            *messages,
            [(LogLevel::Warning, "unknown language \"xyz\"".to_owned())],
            "only the warning should reach the callback"
        );
    }

    #[test]
    fn verbose_mode_forwards_everything() {
        let (context, messages) = recording(ContextOptions {
            verbose: true,
            ..Default::default()
        });
        context.verbose(format_args!("one"));
        context.error(format_args!("two"));
        let levels: Vec<_> = messages.lock().unwrap().iter().map(|m| m.0).collect();
        assert_eq!(levels, [LogLevel::Verbose, LogLevel::Error], "both messages expected");
    }

    #[test]
    fn context_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}

use backtrace::Backtrace;
use std::{cell::RefCell, io, path::Path};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{writer::MakeWriterExt, Layer},
    prelude::*,
};

thread_local! {
    pub static BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

#[cfg(not(feature = "print_debug"))]
const STDOUT_LEVEL: Level = Level::INFO;
#[cfg(feature = "print_debug")]
const STDOUT_LEVEL: Level = Level::DEBUG;

/// Logs go to stdout and to a daily rolling file in `log_folder`. The returned guard flushes the
/// file on drop and must be kept alive by the host.
///
/// # Panics
/// In case tracing has already been set up.
pub fn tracing_setup(log_folder: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_folder, "log");
    let (file_appender, guard_flush_file) = tracing_appender::non_blocking(file_appender);
    let file_layer = Layer::new()
        .with_writer(file_appender.with_max_level(Level::INFO))
        .with_line_number(true)
        .compact()
        .with_ansi(false)
        .with_file(true);
    let stdout_layer = Layer::new()
        .with_writer(io::stdout.with_max_level(STDOUT_LEVEL))
        .with_file(true)
        .with_line_number(true);
    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();
    std::panic::set_hook(Box::new(|_| {
        let trace = Backtrace::new();
        BACKTRACE.with(move |b| b.borrow_mut().replace(trace));
    }));
    guard_flush_file
}

use std::sync::Once;
static INIT: Once = Once::new();

pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use color_eyre::eyre;
pub use mirror_testhelpers_macros::test;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::{OwoColorize, Style};
use std::io::Write;
use std::sync::Once;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let level_style = match record.level() {
            Level::Error => Style::new().fg_rgb::<243, 139, 168>(),
            Level::Warn => Style::new().fg_rgb::<249, 226, 175>(),
            Level::Info => Style::new().fg_rgb::<166, 227, 161>(),
            Level::Debug => Style::new().fg_rgb::<137, 180, 250>(),
            Level::Trace => Style::new().fg_rgb::<148, 226, 213>(),
        };

        eprintln!(
            "{} - {}: {}",
            record.level().style(level_style),
            record
                .target()
                .style(Style::new().fg_rgb::<137, 180, 250>()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static SETUP: Once = Once::new();

/// Installs the color-eyre report hook (except on miri) and a logger that
/// prints every record to stderr.
///
/// Safe to call from every test: only the first call in a process does
/// anything.
pub fn setup() {
    SETUP.call_once(|| {
        #[cfg(not(miri))]
        install_eyre_hook();

        // Another logger may already be installed by the test binary.
        if log::set_boxed_logger(Box::new(StderrLogger)).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

#[cfg(not(miri))]
fn install_eyre_hook() {
    use color_eyre::config::HookBuilder;
    use regex::Regex;
    use std::sync::LazyLock;

    /// Frames from the panic machinery and the test harness, which never
    /// help reading a failure.
    static IGNORE_FRAMES: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(std::panic|core::panic|test::run_test|__pthread_cond_wait|std::sys::(pal|backtrace)|std::thread::Builder|core::ops::function|test::__rust_begin_short_backtrace|<core::panic::|<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once)")
            .expect("frame filter regex is valid")
    });

    let frame_filter = move |frames: &mut Vec<&color_eyre::config::Frame>| {
        frames.retain(|frame| {
            frame
                .name
                .as_ref()
                .map(|name| !IGNORE_FRAMES.is_match(&name.to_string()))
                .unwrap_or(true)
        });
    };

    let _ = HookBuilder::default()
        .add_frame_filter(Box::new(frame_filter))
        .install();
}

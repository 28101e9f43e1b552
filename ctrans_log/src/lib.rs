//! A small logger for ctrans, configured by the `CTRANS_LOG` environment
//! variable.
//!
//! `CTRANS_LOG=debug` enables every target at `debug` and above.
//! `CTRANS_LOG=ctrans=trace,rustyline=warn` sets a level per crate. Output
//! goes to stderr, since stdout carries the generated C program.

use std::{
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
    sync::RwLock,
};

use fnv::FnvHashMap;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ENV_VAR: &str = "CTRANS_LOG";

#[derive(Clone, Debug, Default, PartialEq)]
struct Filter {
    all: Option<Level>,
    targets: FnvHashMap<String, Level>,
}

impl Filter {
    fn level_for(&self, target: &str) -> Option<Level> {
        self.all.or_else(|| {
            TARGET_REGEX
                .captures(target)
                .and_then(|captures| captures.get(1))
                .and_then(|krate| self.targets.get(krate.as_str()).copied())
        })
    }
}

static TARGET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("^([a-z_]+)(?:::.*)?$").expect("target regex"));
static LEVEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("^([a-z]+)$").expect("level regex"));
static PAIR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z_\\-]+)=([a-z]+)").expect("pair regex"));

/// Parses a `CTRANS_LOG` value. Unknown levels are ignored.
fn parse_filter(config: &str) -> Filter {
    let config = config.trim();
    if LEVEL_REGEX.is_match(config) {
        return Filter {
            all: Level::from_str(config).ok(),
            targets: Default::default(),
        };
    }

    let targets = PAIR_REGEX
        .captures_iter(config)
        .filter_map(|captures| {
            let level = Level::from_str(&captures[2]).ok()?;
            Some((captures[1].replace('-', "_"), level))
        })
        .collect();

    Filter { all: None, targets }
}

fn paint(s: &str, level: Level) -> String {
    use owo_colors::OwoColorize;
    match level {
        Level::Error => s.black().on_bright_red().to_string(),
        Level::Warn => s.bright_yellow().to_string(),
        Level::Info => s.cyan().to_string(),
        Level::Debug => s.blue().to_string(),
        Level::Trace => s.green().dimmed().to_string(),
    }
}

struct StderrLogger {
    filter: RwLock<Filter>,
    enabled: AtomicBool,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if !self.enabled.load(Ordering::Relaxed) {
            return false;
        }

        self.filter
            .read()
            .map(|filter| filter.level_for(metadata.target()))
            .ok()
            .flatten()
            .map(|level| level >= metadata.level())
            .unwrap_or(false)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut level = format!("{:5}", record.level());
        let mut target = format!("[{}]", record.target());
        if atty::is(atty::Stream::Stderr) {
            level = paint(&level, record.level());
            target = paint(&target, record.level());
        }

        eprintln!("{level} {target} {}", record.args());
    }

    fn flush(&self) {}
}

static LOGGER: Lazy<StderrLogger> = Lazy::new(|| StderrLogger {
    filter: RwLock::new(Filter::default()),
    enabled: AtomicBool::new(false),
});

/// Installs the logger. Nothing is logged unless `CTRANS_LOG` is set.
pub fn init() {
    if let Ok(config) = std::env::var(ENV_VAR) {
        if let Ok(mut filter) = LOGGER.filter.write() {
            *filter = parse_filter(&config);
        }
        LOGGER.enabled.store(true, Ordering::SeqCst);
    }

    // a second init keeps the first logger
    if log::set_logger(&*LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

//! # ctrans
//!
//! ctrans is a tiny translator for an assignment language over doubles. Each
//! statement is scanned, parsed into an AST, evaluated immediately against a
//! shared [`Store`], and rendered as equivalent C code.
//!
//! ```
//! let mut store = ctrans::Store::new();
//! let node = ctrans::parse("x = 1 + 2 * 3;").unwrap();
//! assert_eq!(node.evaluate(&mut store).unwrap(), 7.0);
//! assert_eq!(node.generate_code(), "x = 1+2*3;");
//! ```

#[macro_export]
macro_rules! trace {
    ($($log:expr),*) => {
        #[cfg(feature = "log")]
        log::trace!($($log),*);
    };
}

#[macro_export]
macro_rules! debug {
    ($($log:expr),*) => {
        #[cfg(feature = "log")]
        log::debug!($($log),*);
    };
}

#[macro_export]
macro_rules! info {
    ($($log:expr),*) => {
        #[cfg(feature = "log")]
        log::info!($($log),*);
    };
}

#[macro_export]
macro_rules! warn {
    ($($log:expr),*) => {
        #[cfg(feature = "log")]
        log::warn!($($log),*);
    };
}

#[macro_export]
macro_rules! error {
    ($($log:expr),*) => {
        #[cfg(feature = "log")]
        log::error!($($log),*);
    };
}

pub mod compiler;
pub mod driver;
pub mod error;
pub mod runtime;

pub use compiler::{
    ast::Node,
    parser::{parse, parse_program},
    scanner::Scanner,
    Token, TokenKind,
};
pub use driver::Driver;
pub use error::{ErrorKind, TranslateError};
pub use runtime::Store;

/// Translates a batch of programs that share one store, returning the
/// complete C program. Programs that fail are skipped.
pub fn translate<'a, I>(programs: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut driver = Driver::new();
    for program in programs {
        let _ = driver.run(program);
    }
    driver.finish()
}

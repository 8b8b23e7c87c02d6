use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorTree
///
/// Flat accumulator for validation errors so a single pass can report
/// every problem in a schema instead of stopping at the first.
///

#[derive(Clone, Debug, Default, ThisError)]
pub struct ErrorTree {
    errors: Vec<String>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error message.
    pub fn add(&mut self, err: impl fmt::Display) {
        self.errors.push(err.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Collapse into a `Result`, returning `self` if any error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }

        Ok(())
    }
}

// err
/// Format an error message and push it onto an `ErrorTree`.
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

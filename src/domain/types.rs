//! Core domain types
//!
//! Newtype wrappers prevent mixing up raw integers in signatures that
//! take both process ids and addresses.

use std::fmt;

/// Process identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub libc::pid_t);

impl Pid {
    /// The calling process's own pid.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn current() -> Self {
        Self(std::process::id() as libc::pid_t)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID:{}", self.0)
    }
}

impl From<libc::pid_t> for Pid {
    fn from(raw: libc::pid_t) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        assert_eq!(Pid(1234).to_string(), "PID:1234");
    }

    #[test]
    fn test_current_pid_positive() {
        assert!(Pid::current().0 > 0);
    }
}

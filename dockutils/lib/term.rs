//! Module containing terminal utilities

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Determines if the process is running in an interactive terminal environment
pub fn is_interactive_terminal() -> bool {
    // Check if stdin and stdout are TTYs
    let stdin_is_tty = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };
    let stdout_is_tty = unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 };

    stdin_is_tty && stdout_is_tty
}

/// Determines if the process is running in an interactive terminal that renders ANSI colors
///
/// `NO_COLOR` (set to anything) and `TERM=dumb` turn colors off.
pub fn is_ansi_interactive_terminal() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    let dumb = std::env::var("TERM").is_ok_and(|term| term == "dumb");
    if dumb {
        tracing::debug!("TERM is dumb, disabling colors");
    }

    is_interactive_terminal() && !dumb
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_disables_ansi() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!is_ansi_interactive_terminal());
        std::env::remove_var("NO_COLOR");
    }
}

//! Configuration types for runtime and execution settings

/// Output and logging configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress error output and per-node progress lines
    pub quiet: bool,
    /// Verbosity level: 0=ERROR, 1=INFO, 2=DEBUG, 3=TRACE
    pub verbose: u8,
    /// Print summary statistics at the end
    pub print_summary: bool,
}

impl OutputConfig {
    /// Log filter directive matching the requested verbosity
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "off";
        }
        match self.verbose {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Throttling configuration for coordination-service load
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrottleConfig {
    /// Node operations per second (0 = no throttle)
    pub ops_throttle: usize,
}

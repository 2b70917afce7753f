//! Interpreter configuration.

/// Default maximum nesting of user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Configuration for a [`Vm`](crate::Vm).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Maximum nesting of user-function calls before the run is aborted.
    pub max_call_depth: usize,

    /// Maximum number of executed statements (`None` = unlimited).
    pub exec_fuel: Option<u64>,

    /// Stream `Print` output to stdout as it is produced instead of
    /// collecting it in [`Vm::output`](crate::Vm::output).
    pub echo_output: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            exec_fuel: None,
            echo_output: false,
        }
    }
}

impl VmConfig {
    /// Configuration for command-line runs: output is echoed to stdout.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            echo_output: true,
            ..Self::default()
        }
    }

    /// Builder method to set the call depth limit.
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Builder method to set the statement budget.
    #[must_use]
    pub fn with_exec_fuel(mut self, fuel: Option<u64>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Builder method to enable/disable stdout echo.
    #[must_use]
    pub fn with_echo_output(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }
}

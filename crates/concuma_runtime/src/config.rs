//! Environment-driven runtime configuration.

use concuma_language::VmConfig;

use crate::error::RuntimeError;

/// Maximum call depth override.
pub const MAX_CALL_DEPTH_VAR: &str = "CONCUMA_MAX_CALL_DEPTH";
/// Statement budget.
pub const FUEL_VAR: &str = "CONCUMA_FUEL";
/// Log filter, in `tracing-subscriber` `EnvFilter` syntax.
pub const LOG_VAR: &str = "CONCUMA_LOG";
/// Fallback log filter.
pub const RUST_LOG_VAR: &str = "RUST_LOG";

/// Configuration for one `concuma` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Interpreter settings.
    pub vm: VmConfig,
    /// Log filter; `None` leaves logging off.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            vm: VmConfig::interactive(),
            log_filter: None,
        }
    }
}

impl RuntimeConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuntimeError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_CALL_DEPTH_VAR) {
            let depth = parse_number::<usize>(MAX_CALL_DEPTH_VAR, &raw)?;
            if depth == 0 {
                return Err(RuntimeError::Config {
                    variable: MAX_CALL_DEPTH_VAR,
                    message: "must be at least 1".to_string(),
                });
            }
            config.vm = config.vm.with_max_call_depth(depth);
        }
        if let Some(raw) = lookup(FUEL_VAR) {
            let fuel = parse_number::<u64>(FUEL_VAR, &raw)?;
            config.vm = config.vm.with_exec_fuel(Some(fuel));
        }
        config.log_filter = lookup(LOG_VAR)
            .or_else(|| lookup(RUST_LOG_VAR))
            .filter(|filter| !filter.trim().is_empty());
        Ok(config)
    }

    /// Builder method to replace the interpreter settings.
    #[must_use]
    pub fn with_vm(mut self, vm: VmConfig) -> Self {
        self.vm = vm;
        self
    }
}

fn parse_number<T: std::str::FromStr>(variable: &'static str, raw: &str) -> Result<T, RuntimeError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err| RuntimeError::Config {
        variable,
        message: format!("`{raw}`: {err}"),
    })
}

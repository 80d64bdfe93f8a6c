//! Engine configuration

use once_cell::sync::Lazy;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Report bound calls that fall back to call-through because no
    /// shadow method matched (missing-coverage debugging aid)
    pub log_missing_shadow_methods: bool,
    /// Sweep dead pairing entries every N insertions (0 disables)
    pub sweep_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            log_missing_shadow_methods: false,
            sweep_interval: 64,
        }
    }
}

impl EngineConfig {
    /// Build a config from the process environment.
    ///
    /// `UMBRA_LOG_MISSING_METHODS=1` enables missing-method reporting;
    /// `UMBRA_SWEEP_INTERVAL=N` overrides the sweep cadence.
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();
        if let Ok(v) = std::env::var("UMBRA_LOG_MISSING_METHODS") {
            config.log_missing_shadow_methods = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(n) = std::env::var("UMBRA_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.sweep_interval = n;
        }
        config
    }

    /// Process-wide config snapshot, read from the environment once
    pub fn env_default() -> &'static EngineConfig {
        static ENV_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::from_env);
        &ENV_CONFIG
    }
}

use std::env;

/// Runtime configuration shared by the pipeline and the backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default beta for the F-beta score.
    pub beta: f64,
    /// UI convention for the beta slider. The metrics engine itself accepts
    /// any beta > 0; clamping happens only at this boundary.
    pub beta_min: f64,
    pub beta_max: f64,
    /// SQLite cache for the ingested dataset.
    pub db_path: String,
    /// Bind address of the backend.
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            beta: 1.0,
            beta_min: 0.1,
            beta_max: 5.0,
            db_path: "db/dataset.sqlite".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by CLF_BETA, CLF_DB_PATH and CLF_BIND_ADDR.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("CLF_BETA") {
            if let Ok(beta) = v.parse::<f64>() {
                cfg.beta = beta;
            }
        }
        if let Ok(v) = env::var("CLF_DB_PATH") {
            cfg.db_path = v;
        }
        if let Ok(v) = env::var("CLF_BIND_ADDR") {
            cfg.bind_addr = v;
        }
        cfg
    }

    /// Clamp a caller-supplied beta to the slider range.
    pub fn clamp_beta(&self, beta: f64) -> f64 {
        beta.clamp(self.beta_min, self.beta_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.beta, 1.0);
        assert_eq!(cfg.beta_min, 0.1);
        assert_eq!(cfg.beta_max, 5.0);
    }

    #[test]
    fn clamp_beta_bounds() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.clamp_beta(0.01), 0.1);
        assert_eq!(cfg.clamp_beta(2.0), 2.0);
        assert_eq!(cfg.clamp_beta(50.0), 5.0);
    }
}

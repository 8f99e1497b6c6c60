//! Doctor command for configuration and connectivity diagnostics

use crate::cli::Config;
use crate::provider::client::ApiKeySource;
use crate::provider::GeminiClient;
use colored::*;
use std::path::Path;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_config(),
            self.check_credential(),
            self.check_provider().await,
            self.check_export_dir(),
        ]
    }

    /// Check 1: configuration values
    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: API key present in the environment
    fn check_credential(&self) -> HealthCheck {
        let source = ApiKeySource::Env(self.config.provider.api_key_env.clone());
        match source.resolve() {
            Ok(_) => HealthCheck::new("API Key", HealthStatus::Pass),
            Err(e) => HealthCheck::new("API Key", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 3: provider reachable and model known
    async fn check_provider(&self) -> HealthCheck {
        let client = match GeminiClient::with_config(
            &self.config.provider.base_url,
            &self.config.provider.model,
            self.config.request_timeout(),
        ) {
            Ok(client) => client.with_api_key(ApiKeySource::Env(
                self.config.provider.api_key_env.clone(),
            )),
            Err(e) => return HealthCheck::new("Provider", HealthStatus::Fail(e.to_string())),
        };

        match client.health_check().await {
            Ok(true) => HealthCheck::new("Provider", HealthStatus::Pass),
            Ok(false) => HealthCheck::new(
                "Provider",
                HealthStatus::Fail(format!(
                    "Model {} not reachable at {}",
                    self.config.provider.model, self.config.provider.base_url
                )),
            ),
            Err(_) => HealthCheck::new(
                "Provider",
                HealthStatus::Warn("Skipped (no API key)".to_string()),
            ),
        }
    }

    /// Check 4: export directory writable
    fn check_export_dir(&self) -> HealthCheck {
        let dir = self.config.export_dir();
        check_writable(&dir)
    }

    /// True when no check failed
    pub fn all_passed(checks: &[HealthCheck]) -> bool {
        !checks
            .iter()
            .any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "MediTriage Diagnostics".bold().cyan());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<20} {}", check.name, status);
        }
        println!();
    }
}

fn check_writable(dir: &Path) -> HealthCheck {
    if !dir.exists() {
        return HealthCheck::new(
            "Export Directory",
            HealthStatus::Warn(format!("{} does not exist yet", dir.display())),
        );
    }

    let marker = dir.join(".meditriage_write_check");
    match std::fs::write(&marker, b"") {
        Ok(_) => {
            let _ = std::fs::remove_file(&marker);
            HealthCheck::new("Export Directory", HealthStatus::Pass)
        }
        Err(_) => HealthCheck::new(
            "Export Directory",
            HealthStatus::Fail(format!("No write permission in {}", dir.display())),
        ),
    }
}

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources are layered: `config/default`, then `config/{RUN_ENV}`, then
/// environment variables prefixed with `TIMELISH` (double underscore as
/// section separator, e.g. `TIMELISH_SERVER__PORT`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "TIMELISH".to_string());

    let config_root = config_root();
    let default_path = config_root.join("config/default");
    let env_path = config_root.join(format!("config/{}", run_env));

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    builder.build()?.try_deserialize()
}

/// Resolves the directory that holds `config/`. Inside the workspace this is
/// the workspace root; for an installed binary it is the working directory.
fn config_root() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let manifest_dir = PathBuf::from(manifest_dir);
        if let Some(root) = manifest_dir.ancestors().nth(2) {
            return root.to_path_buf();
        }
    }
    PathBuf::from(".")
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is loaded at most once per process. `DOTENV_OVERRIDE` selects an
/// alternative file; otherwise `.env` is used. A missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_defaults_are_permissive() {
        let scheduling = SchedulingConfig::default();
        assert_eq!(scheduling.default_deposit, DepositRuleConfig::Inherit);
        assert!(scheduling.cancellation.tiers.is_empty());
        assert_eq!(
            scheduling.cancellation.otherwise,
            CancellationOutcomeConfig::FullRefund
        );
        assert_eq!(
            scheduling.reschedule.otherwise,
            RescheduleOutcomeConfig::Free
        );
    }

    #[test]
    fn policy_tables_deserialize_from_flat_json() {
        let raw = r#"{
            "tiers": [
                { "up_to_minutes_before": 60, "type": "no_refund" },
                { "up_to_minutes_before": 1440, "type": "partial_refund", "refund_percent": 50 }
            ],
            "otherwise": { "type": "full_refund" }
        }"#;
        let schedule: CancellationScheduleConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(schedule.tiers.len(), 2);
        assert_eq!(
            schedule.tiers[1].outcome,
            CancellationOutcomeConfig::PartialRefund { refund_percent: 50 }
        );
    }

    #[test]
    fn deposit_rule_defaults_to_inherit() {
        let raw = r#"{
            "id": "8f2f9e8e-7c41-49c0-a1cf-0b8e9c7f3a11",
            "name": "Consultation",
            "duration_minutes": 60,
            "price": 7500
        }"#;
        let option: BookingOptionConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(option.deposit, DepositRuleConfig::Inherit);
        assert!(option.cancellation.is_none());
    }
}

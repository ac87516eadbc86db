//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Supervisor settings
    #[serde(default)]
    pub supervisor: RawSupervisorConfig,

    /// Pre-registered principals
    #[serde(default)]
    pub principals: Vec<RawPrincipal>,
}

/// Supervisor-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSupervisorConfig {
    /// Execution-time budget in seconds (default: 10)
    pub limit_seconds: Option<u64>,

    /// Charge interval in milliseconds (default: 1000)
    pub quantum_millis: Option<u64>,

    /// Whether the budget is cumulative per principal or fresh per request
    pub scope: Option<BudgetScope>,

    /// Capacity of the quota event channel (default: 64)
    pub event_buffer: Option<usize>,
}

/// What the budget limit is measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    /// All requests of a principal draw from one accumulated total
    #[default]
    PerPrincipal,
    /// Every request gets its own full allowance
    PerRequest,
}

/// Raw principal definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPrincipal {
    /// Unique stable ID
    pub id: String,

    /// Exempt from the budget
    #[serde(default)]
    pub premium: bool,

    /// Time already consumed, in seconds
    #[serde(default)]
    pub initial_used_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_supervisor_section() {
        let toml_str = r#"
            config_version = 1

            [supervisor]
            limit_seconds = 30
            quantum_millis = 250
            scope = "per_request"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.supervisor.limit_seconds, Some(30));
        assert_eq!(config.supervisor.quantum_millis, Some(250));
        assert_eq!(config.supervisor.scope, Some(BudgetScope::PerRequest));
        assert!(config.principals.is_empty());
    }

    #[test]
    fn parse_principals() {
        let toml_str = r#"
            config_version = 1

            [[principals]]
            id = "alice"
            premium = true

            [[principals]]
            id = "bob"
            initial_used_seconds = 4
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.principals.len(), 2);
        assert!(config.principals[0].premium);
        assert!(!config.principals[1].premium);
        assert_eq!(config.principals[1].initial_used_seconds, 4);
    }

    #[test]
    fn reject_unknown_scope() {
        let toml_str = r#"
            config_version = 1

            [supervisor]
            scope = "per_galaxy"
        "#;

        assert!(toml::from_str::<RawConfig>(toml_str).is_err());
    }
}

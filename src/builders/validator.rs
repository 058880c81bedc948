use anyhow::Result;

use crate::core::config;

/// The `ConfigValidator` trait defines the public interface for validating the
/// scanner configuration.
pub trait ConfigValidator {
    /// Performs a full validation of the `DirTreeConfig` and returns a list of
    /// issues found. An empty list means the configuration is usable.
    fn validate_config(&self, config: &config::DirTreeConfig) -> Result<Vec<String>>;
}

/// The `StandardValidator` is a concrete implementation of `ConfigValidator`.
///
/// It checks the settings that would make a scan or its output meaningless
/// rather than failing outright.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    fn check_display(&self, display: &config::DisplaySettings) -> Vec<String> {
        let mut issues = Vec::new();
        if display.indent_unit.is_empty() {
            issues.push("indent_unit is empty, nesting would not be visible".to_string());
        } else if !display.indent_unit.chars().all(char::is_whitespace) {
            issues.push(format!(
                "indent_unit {:?} contains non-whitespace characters",
                display.indent_unit
            ));
        }
        issues
    }

    fn check_scan(&self, scan: &config::ScanSettings) -> Vec<String> {
        let mut issues = Vec::new();
        if scan.max_depth == Some(0) {
            issues.push("max_depth = 0 is invalid, the root is always listed".to_string());
        }
        issues
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &config::DirTreeConfig) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        // Check for an unsupported configuration version.
        if config.version != "1.0" {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        issues.extend(self.check_scan(&config.scan));
        issues.extend(self.check_display(&config.display));

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DirTreeConfig;

    #[test]
    fn test_default_config_is_valid() {
        let issues = StandardValidator::new()
            .validate_config(&DirTreeConfig::default())
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_reports_every_issue() {
        let mut config = DirTreeConfig::default();
        config.version = "2.0".to_string();
        config.scan.max_depth = Some(0);
        config.display.indent_unit = "--".to_string();

        let issues = StandardValidator::new().validate_config(&config).unwrap();
        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("2.0"));
    }

    #[test]
    fn test_empty_indent_unit() {
        let mut config = DirTreeConfig::default();
        config.display.indent_unit = String::new();
        let issues = StandardValidator::new().validate_config(&config).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("empty"));
    }
}

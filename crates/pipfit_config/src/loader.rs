//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ClassRule, FitConfig, SolverConfig};
use regex::Regex;
use std::path::Path;

/// Loads and validates a configuration file.
///
/// Relative design paths in `[[designs]]` are resolved against the directory
/// containing the configuration file.
pub fn load_config(path: &Path) -> Result<FitConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = load_config_from_str(&content)?;
    if let Some(base) = path.parent() {
        for design in &mut config.designs {
            if design.route.is_relative() {
                design.route = base.join(&design.route);
            }
            if design.sdf.is_relative() {
                design.sdf = base.join(&design.sdf);
            }
        }
    }
    Ok(config)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<FitConfig, ConfigError> {
    let config: FitConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &FitConfig) -> Result<(), ConfigError> {
    if config.fit.top_scope.is_empty() {
        return Err(ConfigError::ValidationError(
            "fit.top_scope must not be empty".to_string(),
        ));
    }
    validate_solver(&config.solver)?;
    for (index, rule) in config.classifier.rules.iter().enumerate() {
        validate_rule(index, rule)?;
    }
    Ok(())
}

fn validate_solver(solver: &SolverConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("atol", solver.atol),
        ("btol", solver.btol),
        ("damp", solver.damp),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "solver.{name} must be a finite non-negative number, got {value}"
            )));
        }
    }
    if !(solver.conlim > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "solver.conlim must be positive, got {}",
            solver.conlim
        )));
    }
    Ok(())
}

fn validate_rule(index: usize, rule: &ClassRule) -> Result<(), ConfigError> {
    if rule.class.is_empty() {
        return Err(ConfigError::InvalidRule {
            index,
            message: "class must not be empty".to_string(),
        });
    }
    for pattern in [&rule.src, &rule.dst].into_iter().flatten() {
        Regex::new(pattern).map_err(|e| ConfigError::InvalidRule {
            index,
            message: e.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.fit.top_scope, "top");
        assert!(config.fit.zero_delay_classes.is_empty());
        assert_eq!(config.solver.max_iterations, 0);
        assert_eq!(config.solver.atol, 1e-6);
        assert_eq!(config.solver.btol, 1e-6);
        assert_eq!(config.solver.conlim, 1e8);
        assert_eq!(config.solver.damp, 0.0);
        assert!(config.classifier.rules.is_empty());
        assert!(config.designs.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[fit]
top_scope = "chip"
zero_delay_classes = ["FIXED", "CIBMUX"]

[solver]
max_iterations = 500
atol = 1e-8
btol = 1e-8
conlim = 1e10

[[classifier.rules]]
class = "H0$1"
dst = "^H0(\\d)"
dx = 1
dy = 0

[[classifier.rules]]
class = "LOCAL"

[[designs]]
route = "a.route.json"
sdf = "a.sdf"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fit.top_scope, "chip");
        assert_eq!(config.fit.zero_delay_classes, vec!["FIXED", "CIBMUX"]);
        assert_eq!(config.solver.max_iterations, 500);
        assert_eq!(config.solver.conlim, 1e10);
        assert_eq!(config.classifier.rules.len(), 2);
        assert_eq!(config.classifier.rules[0].dst.as_deref(), Some("^H0(\\d)"));
        assert_eq!(config.classifier.rules[0].dx, Some(1));
        assert!(config.classifier.rules[1].src.is_none());
        assert_eq!(config.designs[0].route, PathBuf::from("a.route.json"));
    }

    #[test]
    fn zero_delay_accepts_single_string() {
        let config = load_config_from_str("[fit]\nzero_delay_classes = \"FIXED\"\n").unwrap();
        assert_eq!(config.fit.zero_delay_classes, vec!["FIXED"]);
    }

    #[test]
    fn integer_damp_is_accepted() {
        let config = load_config_from_str("[solver]\ndamp = 0\n").unwrap();
        assert_eq!(config.solver.damp, 0.0);
    }

    #[test]
    fn negative_tolerance_rejected() {
        let err = load_config_from_str("[solver]\natol = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_conlim_rejected() {
        let err = load_config_from_str("[solver]\nconlim = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_top_scope_rejected() {
        let err = load_config_from_str("[fit]\ntop_scope = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_regex_rejected() {
        let toml = "[[classifier.rules]]\nclass = \"X\"\nsrc = \"(unclosed\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { index: 0, .. }));
    }

    #[test]
    fn empty_class_rejected() {
        let toml = "[[classifier.rules]]\nclass = \"\"\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { index: 0, .. }));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn design_paths_resolved_against_config_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("pipfit.toml");
        std::fs::write(
            &path,
            "[[designs]]\nroute = \"d/r.json\"\nsdf = \"/abs/d.sdf\"\n",
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.designs[0].route, tmp.path().join("d/r.json"));
        assert_eq!(config.designs[0].sdf, PathBuf::from("/abs/d.sdf"));
    }

    #[test]
    fn io_error_for_missing_file() {
        let err = load_config(Path::new("/nonexistent/pipfit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}

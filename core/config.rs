use crate::error::{AppError, Result};
use indexmap::IndexMap;
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "gmd-config.yaml";
pub const DEFAULT_OUTPUT_DIR: &str = "gmd_output";

static DEFAULT_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../data/gmd-config.yaml"
));

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Optional at the serde level so a missing key gets a precise error.
    #[serde(default)]
    outputs: Option<IndexMap<String, Vec<Rule>>>,
}

/// One scan of `base_dir` contributing to a single output document.
///
/// `include`/`exclude` are matched against a file's base name and
/// `exclude_dirs` against a directory's base name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub base_dir: PathBuf,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    #[serde(default)]
    pub section_heading: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Rule {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_dirs<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn section_heading(mut self, heading: impl Into<String>) -> Self {
        self.section_heading = Some(heading.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn heading_text(&self) -> Option<&str> {
        self.section_heading.as_deref().filter(|s| !s.is_empty())
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|s| !s.is_empty())
    }
}

impl Config {
    pub fn new(outputs: IndexMap<String, Vec<Rule>>) -> Result<Self> {
        let config = Self {
            outputs: Some(outputs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Output name → ordered rules, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.outputs
            .iter()
            .flatten()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    pub fn output_count(&self) -> usize {
        self.outputs.as_ref().map_or(0, IndexMap::len)
    }

    pub fn rules_for(&self, output_name: &str) -> Option<&[Rule]> {
        self.outputs
            .as_ref()
            .and_then(|o| o.get(output_name))
            .map(Vec::as_slice)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let yaml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        let config: Config = serde_yml::from_str(yaml_content)?;
        config.validate()?;
        log::debug!("Configuration declares {} output(s)", config.output_count());
        Ok(config)
    }

    pub fn default_template() -> &'static str {
        DEFAULT_TEMPLATE
    }

    fn validate(&self) -> Result<()> {
        let outputs = self.outputs.as_ref().ok_or_else(|| {
            AppError::Config("'outputs' section missing in configuration".to_string())
        })?;

        for name in outputs.keys() {
            validate_output_name(name)?;
        }
        Ok(())
    }
}

fn validate_output_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Config(
            "Output file name must not be empty".to_string(),
        ));
    }
    let path = Path::new(name);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(AppError::Config(format!(
            "Output file name '{}' must be a relative path inside the output directory",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_in_declaration_order() {
        let yaml = r#"
outputs:
  b.md:
    - base_dir: "./src"
      include: ["*.rs"]
      exclude: ["*_test.rs"]
      exclude_dirs: ["target"]
      section_heading: "Sources"
      description: "All Rust files."
  a.md:
    - base_dir: "."
      include: ["*.md"]
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        let names: Vec<&str> = config.outputs().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b.md", "a.md"]);

        let rules = config.rules_for("b.md").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].base_dir, PathBuf::from("./src"));
        assert_eq!(rules[0].exclude_dirs, vec!["target".to_string()]);
        assert_eq!(rules[0].heading_text(), Some("Sources"));

        let a_rule = &config.rules_for("a.md").unwrap()[0];
        assert!(a_rule.exclude.is_empty());
        assert_eq!(a_rule.heading_text(), None);
        assert_eq!(a_rule.description_text(), None);
    }

    #[test]
    fn missing_outputs_section_is_a_config_error() {
        let err = Config::from_yaml_str("{}").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("'outputs' section missing")));
    }

    #[test]
    fn unknown_rule_field_is_rejected() {
        let yaml = "outputs:\n  a.md:\n    - base_dir: .\n      includes: ['*.go']\n";
        assert!(matches!(
            Config::from_yaml_str(yaml),
            Err(AppError::YamlError(_))
        ));
    }

    #[test]
    fn output_names_may_not_escape_output_dir() {
        let yaml = "outputs:\n  ../evil.md:\n    - base_dir: .\n";
        assert!(matches!(
            Config::from_yaml_str(yaml),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn empty_strings_count_as_absent_heading_and_description() {
        let rule = Rule::new(".").section_heading("").description("");
        assert_eq!(rule.heading_text(), None);
        assert_eq!(rule.description_text(), None);
    }

    #[test]
    fn embedded_template_is_a_valid_config() {
        let config = Config::from_yaml_str(Config::default_template()).unwrap();
        assert_eq!(config.output_count(), 2);
        assert!(config.rules_for("main_docs.md").is_some());
    }
}

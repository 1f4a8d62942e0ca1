//! Configuration management for bbdoc.
//!
//! Parses `bbdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Relative paths are
//! resolved against the directory of the config file.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `classes.source_dir`, `classes.output_dir`, `classes.index_file`
//! - `links.external_base_url`
//! - `graph_nodes.source`, `graph_nodes.markdown_output`, `graph_nodes.cpp_output`
//!
//! ## Example
//!
//! ```toml
//! [classes]
//! source_dir = "doc/classes"
//! output_dir = "doc/source/api"
//! index_file = "doc/source/api/Class_List.md"
//!
//! [links]
//! external_base_url = "https://docs.godotengine.org/en/stable/classes"
//!
//! [graph_nodes]
//! source = "doc/graph_nodes.xml"
//! markdown_output = "doc/source/graph_nodes.md"
//! cpp_output = "editor/graph/graph_nodes_doc_data.h"
//! link_prefix = "api/"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override class XML directory.
    pub source_dir: Option<PathBuf>,
    /// Override class page directory.
    pub output_dir: Option<PathBuf>,
    /// Override graph node catalog file.
    pub nodes_source: Option<PathBuf>,
    /// Override graph node Markdown page.
    pub nodes_markdown_output: Option<PathBuf>,
    /// Override generated C++ header.
    pub nodes_cpp_output: Option<PathBuf>,
    /// Override footer timestamp flag.
    pub timestamp: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bbdoc.toml";

/// Index file name used when `classes.index_file` is not set.
pub const DEFAULT_INDEX_FILE: &str = "Class_List.md";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Class reference configuration (paths are relative strings from TOML).
    classes: ClassesConfigRaw,
    /// Link configuration.
    pub links: LinksConfig,
    /// Graph node catalog configuration (optional section).
    /// When present, `source` is required.
    graph_nodes: Option<GraphNodesConfigRaw>,
    /// Output configuration.
    pub output: OutputConfig,

    /// Resolved class reference configuration (set after loading).
    #[serde(skip)]
    pub classes_resolved: ClassesConfig,
    /// Resolved graph node configuration (set after loading).
    #[serde(skip)]
    pub graph_nodes_resolved: Option<GraphNodesConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw class reference configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ClassesConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    index_file: Option<String>,
    index_title: Option<String>,
    index_intro: Option<String>,
    link_prefix: Option<String>,
}

/// Resolved class reference configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ClassesConfig {
    /// Directory holding one XML record per class.
    pub source_dir: PathBuf,
    /// Directory receiving one page per class.
    pub output_dir: PathBuf,
    /// Class index page. `None` when disabled with an empty `index_file`.
    pub index_file: Option<PathBuf>,
    /// Title of the class index.
    pub index_title: String,
    /// Markup shown below the index title.
    pub index_intro: Option<String>,
    /// Prefix of class page links in the index, relative to the index file.
    pub link_prefix: String,
}

/// Link configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LinksConfig {
    /// Extension of generated pages, without the dot.
    pub page_extension: String,
    /// Base URL of the engine's class reference.
    pub external_base_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            page_extension: "md".to_owned(),
            external_base_url: "https://docs.godotengine.org/en/stable/classes".to_owned(),
        }
    }
}

/// Layout of the graph node page.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeListLayout {
    /// One section per node.
    #[default]
    Listing,
    /// One table per category.
    Table,
}

/// Raw graph node configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GraphNodesConfigRaw {
    source: Option<String>,
    markdown_output: Option<String>,
    cpp_output: Option<String>,
    link_prefix: Option<String>,
    title: Option<String>,
    intro: Option<String>,
    layout: NodeListLayout,
}

/// Resolved graph node configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNodesConfig {
    /// Node catalog XML file.
    pub source: PathBuf,
    /// Markdown page. Skipped when `None`.
    pub markdown_output: Option<PathBuf>,
    /// Generated C++ header. Skipped when `None`.
    pub cpp_output: Option<PathBuf>,
    /// Prefix of class page links, relative to the Markdown page.
    pub link_prefix: String,
    /// Page title.
    pub title: String,
    /// Markup shown below the title.
    pub intro: Option<String>,
    /// Page layout.
    pub layout: NodeListLayout,
}

impl GraphNodesConfig {
    fn new(source: PathBuf) -> Self {
        Self {
            source,
            markdown_output: None,
            cpp_output: None,
            link_prefix: String::new(),
            title: "Graph nodes".to_owned(),
            intro: None,
            layout: NodeListLayout::default(),
        }
    }

    /// Validate that at least one output is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if neither output is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markdown_output.is_none() && self.cpp_output.is_none() {
            return Err(ConfigError::Validation(
                "[graph_nodes] requires markdown_output or cpp_output".to_owned(),
            ));
        }
        require_non_empty(&self.title, "graph_nodes.title")
    }
}

/// Output configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether generated pages end with a "Generated on" footer.
    pub timestamp: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { timestamp: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`classes.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOC_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `bbdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let classes = &mut self.classes_resolved;
        if let Some(source_dir) = &settings.source_dir {
            classes.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            // A default index follows the pages it lists
            let default_index = classes.output_dir.join(DEFAULT_INDEX_FILE);
            if classes.index_file.as_ref() == Some(&default_index) {
                classes.index_file = Some(output_dir.join(DEFAULT_INDEX_FILE));
            }
            classes.output_dir.clone_from(output_dir);
        }

        if let Some(source) = &settings.nodes_source {
            match &mut self.graph_nodes_resolved {
                Some(nodes) => nodes.source.clone_from(source),
                None => self.graph_nodes_resolved = Some(GraphNodesConfig::new(source.clone())),
            }
        }
        if let Some(nodes) = &mut self.graph_nodes_resolved {
            if let Some(path) = &settings.nodes_markdown_output {
                nodes.markdown_output = Some(path.clone());
            }
            if let Some(path) = &settings.nodes_cpp_output {
                nodes.cpp_output = Some(path.clone());
            }
        }

        if let Some(timestamp) = settings.timestamp {
            self.output.timestamp = timestamp;
        }
    }

    /// Get validated graph node configuration.
    ///
    /// Use this instead of accessing `graph_nodes_resolved` directly when the
    /// command requires the node catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_graph_nodes(&self) -> Result<&GraphNodesConfig, ConfigError> {
        let nodes = self.graph_nodes_resolved.as_ref().ok_or_else(|| {
            ConfigError::Validation("[graph_nodes] section required in config".into())
        })?;
        nodes.validate()?;
        Ok(nodes)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let output_dir = base.join("doc/source/api");
        Self {
            classes: ClassesConfigRaw::default(),
            links: LinksConfig::default(),
            graph_nodes: None,
            output: OutputConfig::default(),
            classes_resolved: ClassesConfig {
                source_dir: base.join("doc/classes"),
                index_file: Some(output_dir.join(DEFAULT_INDEX_FILE)),
                output_dir,
                index_title: "Class List".to_owned(),
                index_intro: None,
                link_prefix: String::new(),
            },
            graph_nodes_resolved: None,
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_links()?;
        require_non_empty(&self.classes_resolved.index_title, "classes.index_title")?;
        if let Some(nodes) = &self.graph_nodes_resolved {
            nodes.validate()?;
        }
        Ok(())
    }

    /// Validate link configuration.
    fn validate_links(&self) -> Result<(), ConfigError> {
        let extension = &self.links.page_extension;
        require_non_empty(extension, "links.page_extension")?;
        if extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::Validation(
                "links.page_extension must be a bare extension such as \"md\"".to_owned(),
            ));
        }

        require_non_empty(&self.links.external_base_url, "links.external_base_url")?;
        require_http_url(&self.links.external_base_url, "links.external_base_url")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let classes = &mut self.classes;
        classes.source_dir = expand::expand_opt(classes.source_dir.as_deref(), "classes.source_dir")?;
        classes.output_dir = expand::expand_opt(classes.output_dir.as_deref(), "classes.output_dir")?;
        classes.index_file = expand::expand_opt(classes.index_file.as_deref(), "classes.index_file")?;

        self.links.external_base_url =
            expand::expand_env(&self.links.external_base_url, "links.external_base_url")?;

        if let Some(ref mut nodes) = self.graph_nodes {
            nodes.source = expand::expand_opt(nodes.source.as_deref(), "graph_nodes.source")?;
            nodes.markdown_output =
                expand::expand_opt(nodes.markdown_output.as_deref(), "graph_nodes.markdown_output")?;
            nodes.cpp_output = expand::expand_opt(nodes.cpp_output.as_deref(), "graph_nodes.cpp_output")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Validates that `source` is provided when `[graph_nodes]` section exists.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let classes = &self.classes;
        let output_dir = resolve(classes.output_dir.as_deref(), "doc/source/api");
        let index_file = match classes.index_file.as_deref() {
            Some("") => None,
            Some(path) => Some(config_dir.join(path)),
            None => Some(output_dir.join(DEFAULT_INDEX_FILE)),
        };
        self.classes_resolved = ClassesConfig {
            source_dir: resolve(classes.source_dir.as_deref(), "doc/classes"),
            output_dir,
            index_file,
            index_title: classes
                .index_title
                .clone()
                .unwrap_or_else(|| "Class List".to_owned()),
            index_intro: classes.index_intro.clone(),
            link_prefix: classes.link_prefix.clone().unwrap_or_default(),
        };

        self.graph_nodes_resolved = match &self.graph_nodes {
            Some(nodes) => {
                let source = nodes.source.as_deref().ok_or_else(|| {
                    ConfigError::Validation("[graph_nodes] section requires source to be set".to_owned())
                })?;
                let mut resolved = GraphNodesConfig::new(config_dir.join(source));
                resolved.markdown_output = nodes.markdown_output.as_deref().map(|p| config_dir.join(p));
                resolved.cpp_output = nodes.cpp_output.as_deref().map(|p| config_dir.join(p));
                resolved.link_prefix = nodes.link_prefix.clone().unwrap_or_default();
                if let Some(title) = &nodes.title {
                    resolved.title.clone_from(title);
                }
                resolved.intro.clone_from(&nodes.intro);
                resolved.layout = nodes.layout;
                Some(resolved)
            }
            None => None,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.classes_resolved.source_dir, PathBuf::from("/test/doc/classes"));
        assert_eq!(config.classes_resolved.output_dir, PathBuf::from("/test/doc/source/api"));
        assert_eq!(
            config.classes_resolved.index_file,
            Some(PathBuf::from("/test/doc/source/api/Class_List.md"))
        );
        assert_eq!(config.classes_resolved.index_title, "Class List");
        assert_eq!(config.links, LinksConfig::default());
        assert!(config.output.timestamp);
        assert!(config.graph_nodes_resolved.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.links.page_extension, "md");
        assert!(config.output.timestamp);
    }

    #[test]
    fn test_parse_links_and_output() {
        let toml = r#"
[links]
page_extension = "markdown"
external_base_url = "https://docs.godotengine.org/en/4.2/classes"

[output]
timestamp = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.links.page_extension, "markdown");
        assert_eq!(
            config.links.external_base_url,
            "https://docs.godotengine.org/en/4.2/classes"
        );
        assert!(!config.output.timestamp);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[classes]
source_dir = "classes"
output_dir = "source/api"
index_file = "source/classes.md"
index_title = "Voxel Tools Class List"
link_prefix = "api/"

[graph_nodes]
source = "graph_nodes.xml"
markdown_output = "source/graph_nodes.md"
cpp_output = "../editor/graph/graph_nodes_doc_data.h"
layout = "table"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project/doc")).unwrap();

        let classes = &config.classes_resolved;
        assert_eq!(classes.source_dir, PathBuf::from("/project/doc/classes"));
        assert_eq!(classes.output_dir, PathBuf::from("/project/doc/source/api"));
        assert_eq!(
            classes.index_file,
            Some(PathBuf::from("/project/doc/source/classes.md"))
        );
        assert_eq!(classes.index_title, "Voxel Tools Class List");
        assert_eq!(classes.link_prefix, "api/");

        let nodes = config.graph_nodes_resolved.as_ref().unwrap();
        assert_eq!(nodes.source, PathBuf::from("/project/doc/graph_nodes.xml"));
        assert_eq!(
            nodes.cpp_output,
            Some(PathBuf::from("/project/doc/../editor/graph/graph_nodes_doc_data.h"))
        );
        assert_eq!(nodes.layout, NodeListLayout::Table);
        assert_eq!(nodes.title, "Graph nodes");
    }

    #[test]
    fn test_empty_index_file_disables_index() {
        let toml = r#"
[classes]
index_file = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();
        assert_eq!(config.classes_resolved.index_file, None);
    }

    #[test]
    fn test_graph_nodes_section_requires_source() {
        let toml = r#"
[graph_nodes]
markdown_output = "nodes.md"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_paths(Path::new("/project")).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("source"));
    }

    #[test]
    fn test_require_graph_nodes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert!(config.require_graph_nodes().is_err());

        config.apply_cli_settings(&CliSettings {
            nodes_source: Some(PathBuf::from("/test/nodes.xml")),
            ..CliSettings::default()
        });
        let err = config.require_graph_nodes().unwrap_err();
        assert!(err.to_string().contains("markdown_output or cpp_output"));

        config.apply_cli_settings(&CliSettings {
            nodes_cpp_output: Some(PathBuf::from("/test/nodes.h")),
            ..CliSettings::default()
        });
        let nodes = config.require_graph_nodes().unwrap();
        assert_eq!(nodes.source, PathBuf::from("/test/nodes.xml"));
        assert_eq!(nodes.cpp_output, Some(PathBuf::from("/test/nodes.h")));
    }

    #[test]
    fn test_cli_output_dir_moves_default_index() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from("/out")),
            timestamp: Some(false),
            ..CliSettings::default()
        });

        assert_eq!(config.classes_resolved.output_dir, PathBuf::from("/out"));
        assert_eq!(
            config.classes_resolved.index_file,
            Some(PathBuf::from("/out/Class_List.md"))
        );
        assert!(!config.output.timestamp);
    }

    #[test]
    fn test_validate_page_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.page_extension = ".md".to_owned();
        assert!(config.validate().is_err());

        config.links.page_extension = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_external_base_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.external_base_url = "docs.godotengine.org".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bbdoc.toml");
        std::fs::write(
            &path,
            r#"
[classes]
source_dir = "${BBDOC_TEST_LOAD_ROOT:-doc}/classes"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.classes_resolved.source_dir, dir.path().join("doc/classes"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/bbdoc.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bbdoc.toml");
        std::fs::write(&path, "[classes\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

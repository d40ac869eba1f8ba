use pagecraft_render_html::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the page JSON files
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Section widths for pages created by `init`
    #[serde(default = "default_layout")]
    pub default_layout: Vec<u32>,

    /// Undo levels kept per session (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Where uploaded files are written
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// URL prefix handed back for uploaded files
    #[serde(default = "default_asset_url_prefix")]
    pub asset_url_prefix: String,

    /// HTML output options
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub pretty: bool,
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            pretty: options.pretty,
            title: options.title,
        }
    }
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_layout() -> Vec<u32> {
    vec![12]
}

fn default_undo_levels() -> usize {
    100
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_asset_url_prefix() -> String {
    "/assets".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the pages directory
    pub fn get_pages_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pages_dir)
    }

    /// Path of the JSON file for page `name`
    pub fn page_path(&self, cwd: &str, name: &str) -> PathBuf {
        let file = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };
        self.get_pages_dir(cwd).join(file)
    }

    pub fn get_assets_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.assets_dir)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pretty: self.render.pretty,
            title: self.render.title.clone(),
            ..RenderOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            default_layout: default_layout(),
            undo_levels: default_undo_levels(),
            assets_dir: default_assets_dir(),
            asset_url_prefix: default_asset_url_prefix(),
            render: RenderConfig::default(),
        }
    }
}

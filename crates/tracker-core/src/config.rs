use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

/// Contents of `config.json`. Theme colors live at the top level so files
/// written by older versions (colors only) keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(flatten)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Named colors. Values are `#rrggbb` hex strings or ANSI palette indices
/// such as `"240"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ThemeConfig {
    pub color_primary: String,
    pub color_background: String,
    pub color_text: String,
    pub color_accent: String,
    pub color_highlight: String,
    pub color_dialog_border: String,
    pub color_table_border: String,
    pub color_selected_text: String,
    pub color_alt_text: String,
    pub color_alt_background: String,
    pub color_list_selection: String,
    pub color_list_title_fg: String,
    #[serde(rename = "ColorActiveSelectedBtnFG")]
    pub color_active_selected_btn_fg: String,
    #[serde(rename = "ColorActiveSelectedBtnBG")]
    pub color_active_selected_btn_bg: String,
    #[serde(rename = "ColorActiveUnselectedBtnFG")]
    pub color_active_unselected_btn_fg: String,
    #[serde(rename = "ColorActiveUnselectedBtnBG")]
    pub color_active_unselected_btn_bg: String,
    #[serde(rename = "ColorAltSelectedBtnFG")]
    pub color_alt_selected_btn_fg: String,
    #[serde(rename = "ColorAltSelectedBtnBG")]
    pub color_alt_selected_btn_bg: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_primary: "#c4746e".into(),
            color_background: "#232323".into(),
            color_text: "#c5c9c5".into(),
            color_accent: "#8a9a7b".into(),
            color_highlight: "#8ba4b0".into(),
            color_dialog_border: "#874BFD".into(),
            color_table_border: "240".into(),
            color_selected_text: "#131313".into(),
            color_alt_text: "#c5c9c5".into(),
            color_alt_background: "#232323".into(),
            color_list_selection: "#8a9a7b".into(),
            color_list_title_fg: "#232323".into(),
            color_active_selected_btn_fg: "#232323".into(),
            color_active_selected_btn_bg: "#87a987".into(),
            color_active_unselected_btn_fg: "#c5c9c5".into(),
            color_active_unselected_btn_bg: "#232323".into(),
            color_alt_selected_btn_fg: "#c5c9c5".into(),
            color_alt_selected_btn_bg: "#434343".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackConfig {
    /// Cadence of the position-sampling tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(10))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetrievalConfig {
    /// Endpoint that `/f/<id>` share links are rewritten onto.
    #[serde(default = "default_download_api_base")]
    pub download_api_base: String,
    /// Explicit yt-dlp binary. Empty means search `YT_DLP_PATH`, the
    /// executable's directory, then PATH.
    #[serde(default)]
    pub yt_dlp_path: String,
    #[serde(default = "default_file_wait_interval_ms")]
    pub file_wait_interval_ms: u64,
    #[serde(default = "default_file_wait_attempts")]
    pub file_wait_attempts: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            download_api_base: default_download_api_base(),
            yt_dlp_path: String::new(),
            file_wait_interval_ms: default_file_wait_interval_ms(),
            file_wait_attempts: default_file_wait_attempts(),
        }
    }
}

impl RetrievalConfig {
    pub fn yt_dlp_binary(&self) -> PathBuf {
        if !self.yt_dlp_path.trim().is_empty() {
            return PathBuf::from(self.yt_dlp_path.trim());
        }
        platform::find_yt_dlp_binary().unwrap_or_else(|| PathBuf::from("yt-dlp"))
    }

    pub fn file_wait_interval(&self) -> Duration {
        Duration::from_millis(self.file_wait_interval_ms)
    }
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_download_api_base() -> String {
    "https://api.pillowcase.su/api/download".to_string()
}

fn default_file_wait_interval_ms() -> u64 {
    1000
}

fn default_file_wait_attempts() -> u32 {
    30
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing the defaults there first if it does not exist.
    /// Malformed JSON is an error, never silently replaced.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme.color_primary, "#c4746e");
        assert_eq!(config.theme.color_table_border, "240");
        assert_eq!(config.playback.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.retrieval.file_wait_attempts, 30);
        assert!(config.retrieval.download_api_base.starts_with("https://"));
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"ColorPrimary\""));
        assert!(written.contains("\"ColorActiveSelectedBtnFG\""));
        assert!(written.contains("\"Retrieval\""));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"ColorPrimary\": ").unwrap();

        assert!(Config::load_from(&path).is_err());
        // The broken file is left for the user to fix.
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{ \"ColorPrimary\": "
        );
    }

    #[test]
    fn test_colors_only_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r##"{ "ColorPrimary": "#ffffff", "ColorAltSelectedBtnBG": "#000000" }"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme.color_primary, "#ffffff");
        assert_eq!(config.theme.color_alt_selected_btn_bg, "#000000");
        assert_eq!(config.theme.color_background, "#232323");
        assert_eq!(config.playback, PlaybackConfig::default());
        assert_eq!(config.retrieval, RetrievalConfig::default());
    }
}

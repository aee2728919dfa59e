use std::path::PathBuf;

/// Name of the folder under `~/Documents` that holds everything we write.
pub const APP_DIR_NAME: &str = "tracker-tui";

/// `~/Documents/tracker-tui`, or `None` when the home directory cannot be
/// resolved (a fatal start-up condition for the binary).
pub fn try_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Documents").join(APP_DIR_NAME))
}

pub fn data_dir() -> PathBuf {
    try_data_dir().unwrap_or_else(|| temp_dir().join(APP_DIR_NAME))
}

/// Downloaded and browsable catalog files.
pub fn catalog_dir() -> PathBuf {
    data_dir().join("csv")
}

/// Retrieved media files.
pub fn media_dir() -> PathBuf {
    data_dir().join("songs")
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

pub fn log_path() -> PathBuf {
    data_dir().join("tracker-tui.log")
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(unix)]
fn yt_dlp_binary_names() -> &'static [&'static str] {
    &["yt-dlp"]
}

#[cfg(windows)]
fn yt_dlp_binary_names() -> &'static [&'static str] {
    &["yt-dlp.exe", "yt-dlp"]
}

fn find_beside_exe(names: &[&str]) -> Option<PathBuf> {
    let current_exe = std::env::current_exe().ok()?;
    let dir = current_exe.parent()?;
    names.iter().map(|name| dir.join(name)).find(|p| p.exists())
}

fn find_on_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// Find the yt-dlp binary used for streaming-host links.
///
/// Searches in order:
/// 1. `YT_DLP_PATH` environment variable
/// 2. Beside the current executable
/// 3. PATH
pub fn find_yt_dlp_binary() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("YT_DLP_PATH").map(PathBuf::from) {
        if p.exists() {
            return Some(p);
        }
    }

    find_beside_exe(yt_dlp_binary_names()).or_else(|| find_on_path(yt_dlp_binary_names()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_share_data_root() {
        let root = data_dir();
        assert!(root.ends_with(APP_DIR_NAME));
        assert!(catalog_dir().starts_with(&root));
        assert!(media_dir().starts_with(&root));
        assert!(config_path().ends_with("tracker-tui/config.json"));
    }
}

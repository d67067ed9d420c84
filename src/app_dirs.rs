use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("stype");
            Some(state_dir.join("stype.log"))
        } else {
            ProjectDirs::from("", "", "stype")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("stype.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_names_the_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("stype.log"));
        }
    }
}

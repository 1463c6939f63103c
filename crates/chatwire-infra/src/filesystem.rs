//! Data directory layout.

use std::path::PathBuf;

/// Overrides the data directory.
pub const ENV_DATA_DIR: &str = "CHATWIRE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATWIRE_DATA_DIR` environment variable
/// 2. `~/.chatwire`
/// 3. `./.chatwire` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatwire");
    }

    PathBuf::from(".chatwire")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: no other test in this crate reads or writes this variable.
        unsafe {
            std::env::set_var(ENV_DATA_DIR, "/tmp/test-chatwire");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-chatwire"));
        unsafe {
            std::env::remove_var(ENV_DATA_DIR);
        }
    }
}

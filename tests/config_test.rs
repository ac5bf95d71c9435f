//! Integration tests for Settings loading from explicit config files.
//!
//! Each test points `XDG_CONFIG_HOME` at its own temp directory, so the user's
//! global config is never read. Tests touching the environment hold `ENV_LOCK`.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use nametree::application::ApplicationError;
use nametree::config::Settings;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Isolated environment: empty XDG config home, no NAMETREE_* overrides.
struct IsolatedEnv {
    dir: TempDir,
    _guard: MutexGuard<'static, ()>,
}

impl IsolatedEnv {
    fn new() -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path().join("xdg"));
        std::env::remove_var("NAMETREE_SEED__NAME");
        Self { dir, _guard: guard }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    let dir = IsolatedEnv::new();
    let path = dir.path().join("nametree.toml");
    fs::write(
        &path,
        r#"
validate_input = false

[seed]
enabled = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert!(!settings.validate_input);
    assert!(!settings.seed.enabled);
    assert!(settings.json_pretty, "unspecified field keeps default");
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let _env = IsolatedEnv::new();
    let err = Settings::load(Some(Path::new("/nonexistent/nametree.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("/nonexistent/nametree.toml"));
}

#[test]
fn given_malformed_config_file_when_load_then_config_error() {
    let dir = IsolatedEnv::new();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "validate_input = maybe").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn given_env_var_when_load_then_env_wins_over_file() {
    let dir = IsolatedEnv::new();
    let path = dir.path().join("nametree.toml");
    fs::write(&path, "[seed]\nname = \"FromFile\"\n").unwrap();

    std::env::set_var("NAMETREE_SEED__NAME", "FromEnv");
    let settings = Settings::load(Some(&path));
    std::env::remove_var("NAMETREE_SEED__NAME");

    assert_eq!(settings.unwrap().seed.name, "FromEnv");
}

#[test]
fn given_template_written_to_file_when_load_then_defaults() {
    let dir = IsolatedEnv::new();
    let path = dir.path().join("nametree.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    assert!(settings.validate_input);
    assert!(settings.seed.enabled);
}

#[test]
#[cfg(target_os = "linux")]
fn given_global_config_when_load_then_explicit_file_wins() {
    let env = IsolatedEnv::new();
    let global_dir = env.path().join("xdg").join("nametree");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("nametree.toml"),
        "json_pretty = false\n[seed]\nname = \"Global\"\n",
    )
    .unwrap();
    let path = env.path().join("local.toml");
    fs::write(&path, "[seed]\nname = \"Local\"\n").unwrap();

    let global_only = Settings::load(None).unwrap();
    let layered = Settings::load(Some(&path)).unwrap();

    assert_eq!(global_only.seed.name, "Global");
    assert!(!global_only.json_pretty);
    assert_eq!(layered.seed.name, "Local");
    assert!(!layered.json_pretty, "global value survives the overlay");
}

#[test]
fn given_no_config_anywhere_when_load_then_defaults() {
    let _env = IsolatedEnv::new();
    assert_eq!(Settings::load(None).unwrap(), Settings::default());
}

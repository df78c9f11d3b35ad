use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_color: bool,
    pub perf: bool,
    pub theme: Option<ThemeMode>,
    pub cache_dir: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_color: self.no_color || other.no_color,
            perf: self.perf || other.perf,
            theme: other.theme.or(self.theme),
            cache_dir: other.cache_dir.clone().or_else(|| self.cache_dir.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("adfless").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("adfless")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("adfless").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("adfless").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".adflessrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# adfless defaults (saved with --save)".to_string()];
    if flags.no_color {
        lines.push("--no-color".to_string());
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme_name(theme)));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(dir) = &flags.cache_dir {
        lines.push(format!("--cache-dir {}", dir.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of a token list. Anything else
/// (subcommands, file names, unknown flags) is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--no-color" => flags.no_color = true,
            "--perf" => flags.perf = true,
            "--theme" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.theme = parse_theme(next);
                    i += 1;
                }
            }
            "--cache-dir" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.cache_dir = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--theme=") {
                    flags.theme = parse_theme(value);
                } else if let Some(value) = token.strip_prefix("--cache-dir=") {
                    flags.cache_dir = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

const fn theme_name(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

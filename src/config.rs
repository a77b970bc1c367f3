/*
 * This file is part of pihw.
 *
 * Copyright (C) 2026 pihw contributors
 *
 * pihw is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * pihw is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with pihw. If not, see <https://www.gnu.org/licenses/>.
 */

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sysfs node holding the vendor trip-point temperature, read once at startup.
pub const DEFAULT_LIMIT_PATH: &str = "/sys/class/thermal/thermal_zone0/trip_point_0_temp";

/// Sysfs node holding the live SoC temperature.
pub const DEFAULT_TEMP_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Upper bound for the configurable decimal count; anything beyond this is
/// noise given millidegree sensor resolution.
const MAX_DECIMALS: u32 = 9;

fn default_limit_path() -> PathBuf {
    PathBuf::from(DEFAULT_LIMIT_PATH)
}

fn default_temp_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMP_PATH)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HwConfig {
    #[serde(default = "default_limit_path")]
    pub limit_path: PathBuf,
    #[serde(default = "default_temp_path")]
    pub temp_path: PathBuf,
    /// Decimal places applied to every reported temperature; `None` keeps raw values.
    #[serde(default)]
    pub decimals: Option<u32>,
}

impl Default for HwConfig {
    fn default() -> Self {
        Self {
            limit_path: default_limit_path(),
            temp_path: default_temp_path(),
            decimals: None,
        }
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("pihw").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config").join("pihw").join("config.json");
    }
    PathBuf::from("/etc/pihw/config.json")
}

/// Best-effort load from the default location; missing or malformed files
/// fall back to `None` so callers can use `HwConfig::default()`.
pub fn load_config() -> Option<HwConfig> {
    let data = fs::read_to_string(config_path()).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn try_load_config<P: AsRef<Path>>(path: P) -> Result<HwConfig, String> {
    let data = fs::read_to_string(path.as_ref()).map_err(|e| e.to_string())?;
    let cfg: HwConfig = serde_json::from_str(&data).map_err(|e| format!("parse error: {}", e))?;
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn save_config(cfg: &HwConfig) -> io::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(cfg).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, json)
}

pub fn validate_config(cfg: &HwConfig) -> Result<(), String> {
    if cfg.limit_path.as_os_str().is_empty() {
        return Err("limit_path must not be empty".to_string());
    }
    if cfg.temp_path.as_os_str().is_empty() {
        return Err("temp_path must not be empty".to_string());
    }
    if let Some(d) = cfg.decimals {
        if d > MAX_DECIMALS {
            return Err(format!("decimals out of range (0..={})", MAX_DECIMALS));
        }
    }
    Ok(())
}

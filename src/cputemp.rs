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

//! SoC temperature from the kernel thermal zone.
//!
//! The trip-point limit is read once at construction; the live temperature is
//! re-read on every `measure` call. A failed read or parse never raises, it
//! degrades the value to `None` and every conversion derived from it stays
//! `None` as well.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{HwConfig, DEFAULT_LIMIT_PATH, DEFAULT_TEMP_PATH};

/// Raw sysfs values above this are assumed to be millidegrees and are scaled
/// down by 1000. Raspbian exposes degrees, most other Pi kernels millidegrees;
/// the value itself carries no unit tag, so the cutoff is a fixed policy.
const MILLIDEGREE_CUTOFF: f64 = 85.0;

/// SoC temperature reader with a fixed trip-point limit.
///
/// All temperatures are degrees Celsius as `f64`. `None` means the value
/// could not be read; arithmetic on `None` yields `None`.
#[derive(Debug)]
pub struct CpuTemp {
    limit: Option<f64>,
    current: Option<f64>,
    temp_path: PathBuf,
    decimals: Option<u32>,
}

impl CpuTemp {
    /// Reader over the default thermal_zone0 paths, no rounding.
    pub fn new() -> Self {
        Self::from_paths(DEFAULT_LIMIT_PATH, DEFAULT_TEMP_PATH, None)
    }

    pub fn with_config(cfg: &HwConfig) -> Self {
        Self::from_paths(&cfg.limit_path, &cfg.temp_path, cfg.decimals)
    }

    /// Reads the limit from `limit_path` once and takes an initial
    /// measurement from `temp_path`.
    pub fn from_paths<L, T>(limit_path: L, temp_path: T, decimals: Option<u32>) -> Self
    where
        L: AsRef<Path>,
        T: AsRef<Path>,
    {
        let mut reader = Self {
            limit: None,
            current: None,
            temp_path: temp_path.as_ref().to_path_buf(),
            decimals,
        };
        reader.limit = reader.read_temperature(limit_path.as_ref());
        debug!(limit = ?reader.limit, "temperature limit");
        reader.measure();
        reader
    }

    /// Re-read the live path and replace the stored sample.
    pub fn measure(&mut self) -> Option<f64> {
        let sample = self.read_temperature(&self.temp_path);
        debug!(temperature = ?sample, "measured SoC temperature");
        self.current = sample;
        sample
    }

    /// Re-read the live path and return the sample as percentage of the limit.
    pub fn measure_percent(&mut self) -> Option<f64> {
        let sample = self.measure();
        self.temp_to_percent(sample)
    }

    /// Last measured temperature, without touching sysfs.
    pub fn temperature(&self) -> Option<f64> {
        self.current
    }

    /// Last measured temperature as percentage of the limit, without touching sysfs.
    pub fn percent(&self) -> Option<f64> {
        self.temp_to_percent(self.current)
    }

    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// `t / limit * 100`. `None` when the operand or the limit is unknown,
    /// or the limit is zero.
    pub fn temp_to_percent(&self, temperature: Option<f64>) -> Option<f64> {
        let t = temperature?;
        let limit = self.limit.filter(|l| *l != 0.0)?;
        Some(self.round(t / limit * 100.0))
    }

    /// `p * limit / 100`. `None` when the operand or the limit is unknown,
    /// or the limit is zero.
    pub fn percent_to_temp(&self, percentage: Option<f64>) -> Option<f64> {
        let p = percentage?;
        let limit = self.limit.filter(|l| *l != 0.0)?;
        Some(self.round(p * limit / 100.0))
    }

    fn read_temperature(&self, path: &Path) -> Option<f64> {
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read temperature file");
                return None;
            }
        };
        let mut value: f64 = match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(path = %path.display(), raw = raw.trim(), "unparseable temperature");
                return None;
            }
        };
        if value > MILLIDEGREE_CUTOFF {
            value /= 1000.0;
        }
        Some(self.round(value))
    }

    fn round(&self, value: f64) -> f64 {
        match self.decimals {
            Some(d) => {
                let factor = 10f64.powi(d as i32);
                (value * factor).round() / factor
            }
            None => value,
        }
    }
}

impl fmt::Display for CpuTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current, self.limit) {
            (Some(t), Some(l)) => write!(f, "Temperature {}°C, Limit {}°C", t, l),
            _ => write!(f, "No temperature available."),
        }
    }
}

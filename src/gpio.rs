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

//! Pin-level GPIO access.
//!
//! The registry never touches hardware itself; it goes through the
//! [`GpioDriver`] trait. [`SysfsGpio`] is the stock implementation over the
//! kernel gpio class. Its base directory is overridable so tests can run
//! against a plain directory tree.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::board::SocPort;

/// Logical pin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::High => write!(f, "high"),
        }
    }
}

/// I/O mode of a registered pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GpioError {
    #[error("unknown pin {0}")]
    UnknownPin(String),

    #[error("unknown LED {0}")]
    UnknownLed(String),

    #[error("pin {0} is not registered")]
    NotRegistered(String),

    #[error("pin {name} is configured as {actual}, operation requires {expected}")]
    ModeMismatch {
        name: String,
        expected: Direction,
        actual: Direction,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Pin-level driver capability consumed by the registry.
#[cfg_attr(test, automock)]
pub trait GpioDriver {
    /// Bring the GPIO interface up. Called once by the registry constructor.
    fn init(&mut self) -> Result<(), GpioError>;

    fn set_direction(&mut self, port: SocPort, direction: Direction) -> Result<(), GpioError>;

    fn write(&mut self, port: SocPort, level: Level) -> Result<(), GpioError>;

    fn read(&mut self, port: SocPort) -> Result<Level, GpioError>;
}

/// Driver over the kernel gpio class (`/sys/class/gpio`).
///
/// Pins are exported on first use; direction and value go through the
/// per-pin attribute files.
#[derive(Debug)]
pub struct SysfsGpio {
    base: PathBuf,
}

const SYSFS_GPIO_BASE: &str = "/sys/class/gpio";

impl SysfsGpio {
    pub fn new() -> Self {
        Self::with_base(SYSFS_GPIO_BASE)
    }

    pub fn with_base<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    fn pin_dir(&self, port: SocPort) -> PathBuf {
        self.base.join(format!("gpio{}", port))
    }

    fn export(&self, port: SocPort) -> Result<(), GpioError> {
        if self.pin_dir(port).is_dir() {
            return Ok(());
        }
        fs::write(self.base.join("export"), port.to_string())?;
        debug!(port, "exported GPIO");
        Ok(())
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioDriver for SysfsGpio {
    fn init(&mut self) -> Result<(), GpioError> {
        if !self.base.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("GPIO interface not available at {}", self.base.display()),
            )
            .into());
        }
        Ok(())
    }

    fn set_direction(&mut self, port: SocPort, direction: Direction) -> Result<(), GpioError> {
        self.export(port)?;
        let value = match direction {
            Direction::Input => "in",
            Direction::Output => "out",
        };
        fs::write(self.pin_dir(port).join("direction"), value)?;
        debug!(port, %direction, "set pin direction");
        Ok(())
    }

    fn write(&mut self, port: SocPort, level: Level) -> Result<(), GpioError> {
        let value = match level {
            Level::Low => "0",
            Level::High => "1",
        };
        fs::write(self.pin_dir(port).join("value"), value)?;
        Ok(())
    }

    fn read(&mut self, port: SocPort) -> Result<Level, GpioError> {
        let raw = fs::read_to_string(self.pin_dir(port).join("value"))?;
        Ok(match raw.trim() {
            "0" => Level::Low,
            _ => Level::High,
        })
    }
}

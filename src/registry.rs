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

//! Registry of named GPIO pins and system LEDs.
//!
//! Records are keyed by catalog name and mirror the last logical state seen
//! through the driver. The manager owns its driver exclusively; calls are
//! synchronous and blocking, and the toggle read-modify-write sequence is not
//! atomic. Callers needing cross-thread access must wrap the manager in their
//! own lock.

use std::collections::HashMap;

use tracing::debug;

use crate::board::{Board, SocPort};
use crate::gpio::{Direction, GpioDriver, GpioError, Level};

#[derive(Debug, Clone, Copy)]
struct PinRecord {
    port: SocPort,
    direction: Direction,
    level: Level,
}

#[derive(Debug, Clone, Copy)]
struct LedRecord {
    port: SocPort,
    // None until the first on/off call; LEDs are never read back at registration
    level: Option<Level>,
}

/// Pin and LED registry over a pin-level driver.
pub struct GpioManager<D: GpioDriver> {
    driver: D,
    board: Board,
    pins: HashMap<String, PinRecord>,
    leds: HashMap<String, LedRecord>,
}

impl<D: GpioDriver> GpioManager<D> {
    /// Initializes the driver and starts with empty registries.
    pub fn new(mut driver: D, board: Board) -> Result<Self, GpioError> {
        driver.init()?;
        Ok(Self {
            driver,
            board,
            pins: HashMap::new(),
            leds: HashMap::new(),
        })
    }

    /// Register `name` with the given mode, or update the mode of an existing
    /// record in place. Passing `None` removes the record instead. New
    /// registrations start with a Low stored state.
    pub fn register_pin(&mut self, name: &str, direction: Option<Direction>) -> Result<(), GpioError> {
        let port = self.board.resolve_pin(name)?;

        let Some(direction) = direction else {
            if self.pins.remove(name).is_some() {
                debug!(name, "pin removed from registry");
            }
            return Ok(());
        };

        self.driver.set_direction(port, direction)?;
        match self.pins.get_mut(name) {
            Some(record) => record.direction = direction,
            None => {
                self.pins.insert(
                    name.to_string(),
                    PinRecord {
                        port,
                        direction,
                        level: Level::Low,
                    },
                );
            }
        }
        debug!(name, port, %direction, "pin registered");
        Ok(())
    }

    /// Drive a registered output pin and mirror the level in the registry.
    pub fn set_pin(&mut self, name: &str, level: Level) -> Result<(), GpioError> {
        let record = self.pin_record(name)?;
        if record.direction != Direction::Output {
            return Err(GpioError::ModeMismatch {
                name: name.to_string(),
                expected: Direction::Output,
                actual: record.direction,
            });
        }
        self.driver.write(record.port, level)?;
        if let Some(r) = self.pins.get_mut(name) {
            r.level = level;
        }
        Ok(())
    }

    pub fn pin_on(&mut self, name: &str) -> Result<(), GpioError> {
        self.set_pin(name, Level::High)
    }

    pub fn pin_off(&mut self, name: &str) -> Result<(), GpioError> {
        self.set_pin(name, Level::Low)
    }

    /// Read a registered input pin through the driver, mirroring the result.
    pub fn read_pin(&mut self, name: &str) -> Result<Level, GpioError> {
        let record = self.pin_record(name)?;
        if record.direction != Direction::Input {
            return Err(GpioError::ModeMismatch {
                name: name.to_string(),
                expected: Direction::Input,
                actual: record.direction,
            });
        }
        let level = self.driver.read(record.port)?;
        if let Some(r) = self.pins.get_mut(name) {
            r.level = level;
        }
        Ok(level)
    }

    /// Last stored state without touching hardware; `None` when unregistered.
    pub fn pin_state(&self, name: &str) -> Option<Level> {
        self.pins.get(name).map(|r| r.level)
    }

    pub fn is_pin_on(&self, name: &str) -> bool {
        matches!(self.pin_state(name), Some(Level::High))
    }

    /// Invert a registered output pin. The live level is read back through
    /// the driver first; read-then-write, concurrent toggles race.
    pub fn toggle_pin(&mut self, name: &str) -> Result<Level, GpioError> {
        let record = self.pin_record(name)?;
        if record.direction != Direction::Output {
            return Err(GpioError::ModeMismatch {
                name: name.to_string(),
                expected: Direction::Output,
                actual: record.direction,
            });
        }
        let next = self.driver.read(record.port)?.toggled();
        self.driver.write(record.port, next)?;
        if let Some(r) = self.pins.get_mut(name) {
            r.level = next;
        }
        Ok(next)
    }

    /// Register an LED by its designated name and configure it as an output.
    /// LEDs carry no mode; the stored state stays unknown until driven.
    pub fn register_led(&mut self, name: &str) -> Result<(), GpioError> {
        let port = self.board.resolve_led(name)?;
        self.driver.set_direction(port, Direction::Output)?;
        self.leds
            .entry(name.to_string())
            .or_insert(LedRecord { port, level: None });
        debug!(name, port, "LED registered");
        Ok(())
    }

    pub fn remove_led(&mut self, name: &str) {
        if self.leds.remove(name).is_some() {
            debug!(name, "LED removed from registry");
        }
    }

    pub fn led_on(&mut self, name: &str) -> Result<(), GpioError> {
        self.set_led(name, Level::High)
    }

    pub fn led_off(&mut self, name: &str) -> Result<(), GpioError> {
        self.set_led(name, Level::Low)
    }

    pub fn toggle_led(&mut self, name: &str) -> Result<Level, GpioError> {
        let record = self.led_record(name)?;
        let next = self.driver.read(record.port)?.toggled();
        self.driver.write(record.port, next)?;
        if let Some(r) = self.leds.get_mut(name) {
            r.level = Some(next);
        }
        Ok(next)
    }

    /// Last stored LED state; `None` when unregistered or never driven.
    pub fn led_state(&self, name: &str) -> Option<Level> {
        self.leds.get(name).and_then(|r| r.level)
    }

    pub fn is_led_on(&self, name: &str) -> bool {
        matches!(self.led_state(name), Some(Level::High))
    }

    fn set_led(&mut self, name: &str, level: Level) -> Result<(), GpioError> {
        let record = self.led_record(name)?;
        self.driver.write(record.port, level)?;
        if let Some(r) = self.leds.get_mut(name) {
            r.level = Some(level);
        }
        Ok(())
    }

    fn pin_record(&self, name: &str) -> Result<PinRecord, GpioError> {
        self.pins
            .get(name)
            .copied()
            .ok_or_else(|| GpioError::NotRegistered(name.to_string()))
    }

    fn led_record(&self, name: &str) -> Result<LedRecord, GpioError> {
        self.leds
            .get(name)
            .copied()
            .ok_or_else(|| GpioError::NotRegistered(name.to_string()))
    }
}

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

//! Closed pin-name catalogs for supported boards.
//!
//! Every pin can be addressed by two alternate names: the SoC port name
//! (`PA12`) or the 40-pin header connector name (`gpio1p3`). Both resolve to
//! the same sunxi GPIO number (`bank letter index * 32 + line`). System LEDs
//! live in their own restricted catalogs.

use std::collections::HashMap;

use crate::gpio::GpioError;

/// SoC-level GPIO number understood by the pin driver.
pub type SocPort = u16;

// Orange Pi One, Allwinner H3.
const OPI_ONE_PORTS: &[(&str, SocPort)] = &[
    ("PA0", 0),
    ("PA1", 1),
    ("PA2", 2),
    ("PA3", 3),
    ("PA6", 6),
    ("PA7", 7),
    ("PA8", 8),
    ("PA9", 9),
    ("PA10", 10),
    ("PA11", 11),
    ("PA12", 12),
    ("PA13", 13),
    ("PA14", 14),
    ("PA18", 18),
    ("PA19", 19),
    ("PA20", 20),
    ("PA21", 21),
    ("PC0", 64),
    ("PC1", 65),
    ("PC2", 66),
    ("PC3", 67),
    ("PC4", 68),
    ("PC7", 71),
    ("PD14", 110),
    ("PG6", 198),
    ("PG7", 199),
    ("PG8", 200),
    ("PG9", 201),
];

// Header aliases for the same physical pins, keyed by connector position.
const OPI_ONE_CONNECTORS: &[(&str, SocPort)] = &[
    ("gpio1p3", 12),
    ("gpio1p5", 11),
    ("gpio1p7", 6),
    ("gpio1p8", 13),
    ("gpio1p10", 14),
    ("gpio1p11", 1),
    ("gpio1p12", 110),
    ("gpio1p13", 0),
    ("gpio1p15", 3),
    ("gpio1p16", 68),
    ("gpio1p18", 71),
    ("gpio1p19", 64),
    ("gpio1p21", 65),
    ("gpio1p22", 2),
    ("gpio1p23", 66),
    ("gpio1p24", 67),
    ("gpio1p26", 21),
    ("gpio1p27", 19),
    ("gpio1p28", 18),
    ("gpio1p29", 7),
    ("gpio1p31", 8),
    ("gpio1p32", 200),
    ("gpio1p33", 9),
    ("gpio1p35", 10),
    ("gpio1p36", 201),
    ("gpio1p37", 20),
    ("gpio1p38", 198),
    ("gpio1p40", 199),
];

// PL10 and PA15 drive the on-board power and status LEDs.
const OPI_ONE_LED_PORTS: &[(&str, SocPort)] = &[("POWER_LED", 362), ("STATUS_LED", 15)];

const OPI_ONE_LED_CONNECTORS: &[(&str, SocPort)] = &[("LEDp1", 362), ("LEDp2", 15)];

/// Name catalogs for one board, built once at initialization.
#[derive(Debug, Clone)]
pub struct Board {
    ports: HashMap<&'static str, SocPort>,
    connectors: HashMap<&'static str, SocPort>,
    led_ports: HashMap<&'static str, SocPort>,
    led_connectors: HashMap<&'static str, SocPort>,
}

impl Board {
    pub fn orange_pi_one() -> Self {
        Self {
            ports: OPI_ONE_PORTS.iter().copied().collect(),
            connectors: OPI_ONE_CONNECTORS.iter().copied().collect(),
            led_ports: OPI_ONE_LED_PORTS.iter().copied().collect(),
            led_connectors: OPI_ONE_LED_CONNECTORS.iter().copied().collect(),
        }
    }

    /// Resolve a GPIO name, port namespace first, then connector namespace.
    /// The system LED names are valid GPIO names too.
    pub fn resolve_pin(&self, name: &str) -> Result<SocPort, GpioError> {
        self.ports
            .get(name)
            .or_else(|| self.connectors.get(name))
            .or_else(|| self.led_ports.get(name))
            .or_else(|| self.led_connectors.get(name))
            .copied()
            .ok_or_else(|| GpioError::UnknownPin(name.to_string()))
    }

    /// Resolve an LED name against the LED-designated catalogs only.
    pub fn resolve_led(&self, name: &str) -> Result<SocPort, GpioError> {
        self.led_ports
            .get(name)
            .or_else(|| self.led_connectors.get(name))
            .copied()
            .ok_or_else(|| GpioError::UnknownLed(name.to_string()))
    }

    pub fn pin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ports.keys().chain(self.connectors.keys()).copied()
    }

    pub fn led_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.led_ports.keys().chain(self.led_connectors.keys()).copied()
    }
}

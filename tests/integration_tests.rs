/*
 * Integration tests for pihw
 *
 * These tests exercise the temperature reader and the pin/LED registry
 * end to end against fake sysfs trees, without touching real hardware.
 */

use std::fs;

use pihw::board::Board;
use pihw::config::HwConfig;
use pihw::cputemp::CpuTemp;
use pihw::gpio::{Direction, GpioDriver, GpioError, Level, SysfsGpio};
use pihw::registry::GpioManager;
use tempfile::TempDir;

fn fake_thermal_zone(limit: &str, temp: &str) -> (TempDir, HwConfig) {
    let dir = TempDir::new().unwrap();
    let limit_path = dir.path().join("trip_point_0_temp");
    let temp_path = dir.path().join("temp");
    fs::write(&limit_path, limit).unwrap();
    fs::write(&temp_path, temp).unwrap();
    let cfg = HwConfig {
        limit_path,
        temp_path,
        decimals: None,
    };
    (dir, cfg)
}

fn fake_gpio_tree(ports: &[u16]) -> (TempDir, SysfsGpio) {
    let dir = TempDir::new().unwrap();
    for port in ports {
        let pin = dir.path().join(format!("gpio{}", port));
        fs::create_dir(&pin).unwrap();
        fs::write(pin.join("direction"), "in").unwrap();
        fs::write(pin.join("value"), "0").unwrap();
    }
    let driver = SysfsGpio::with_base(dir.path());
    (dir, driver)
}

#[test]
fn test_temperature_flow_with_config() {
    let (_dir, cfg) = fake_thermal_zone("60000\n", "45000\n");
    let mut reader = CpuTemp::with_config(&cfg);

    assert_eq!(reader.limit(), Some(60.0));
    assert_eq!(reader.temperature(), Some(45.0));
    assert_eq!(reader.percent(), Some(75.0));
    assert_eq!(reader.percent_to_temp(Some(75.0)), Some(45.0));
    assert_eq!(format!("{}", reader), "Temperature 45°C, Limit 60°C");

    // Accessors stay on the stored sample until the next measure
    fs::write(&cfg.temp_path, "51000\n").unwrap();
    assert_eq!(reader.temperature(), Some(45.0));
    assert_eq!(reader.measure(), Some(51.0));
    assert_eq!(reader.percent(), Some(85.0));
}

#[test]
fn test_temperature_flow_survives_sensor_loss() {
    let (_dir, cfg) = fake_thermal_zone("60000\n", "45000\n");
    let mut reader = CpuTemp::with_config(&cfg);
    assert_eq!(reader.temperature(), Some(45.0));

    fs::remove_file(&cfg.temp_path).unwrap();
    assert_eq!(reader.measure(), None);
    assert_eq!(reader.percent(), None);
    assert_eq!(reader.measure_percent(), None);
    assert_eq!(format!("{}", reader), "No temperature available.");
}

#[test]
fn test_temperature_rounding_from_config() {
    let (_dir, mut cfg) = fake_thermal_zone("60000\n", "45678\n");
    cfg.decimals = Some(1);
    let reader = CpuTemp::with_config(&cfg);
    assert_eq!(reader.temperature(), Some(45.7));
}

#[test]
fn test_pin_flow_over_sysfs() {
    // PA12 and its header alias gpio1p3 share sunxi port 12
    let (dir, driver) = fake_gpio_tree(&[12]);
    let mut mgr = GpioManager::new(driver, Board::orange_pi_one()).unwrap();

    mgr.register_pin("PA12", Some(Direction::Output)).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("gpio12/direction")).unwrap(),
        "out"
    );

    mgr.pin_on("PA12").unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("gpio12/value")).unwrap(), "1");
    assert!(mgr.is_pin_on("PA12"));

    // The connector alias drives the same value file
    mgr.register_pin("gpio1p3", Some(Direction::Output)).unwrap();
    mgr.pin_off("gpio1p3").unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("gpio12/value")).unwrap(), "0");

    assert_eq!(mgr.toggle_pin("PA12").unwrap(), Level::High);
    assert_eq!(mgr.toggle_pin("PA12").unwrap(), Level::Low);
    assert_eq!(mgr.pin_state("PA12"), Some(Level::Low));
}

#[test]
fn test_input_pin_flow_over_sysfs() {
    let (dir, driver) = fake_gpio_tree(&[6]);
    let mut mgr = GpioManager::new(driver, Board::orange_pi_one()).unwrap();

    mgr.register_pin("PA6", Some(Direction::Input)).unwrap();
    fs::write(dir.path().join("gpio6/value"), "1").unwrap();
    assert_eq!(mgr.read_pin("PA6").unwrap(), Level::High);
    assert_eq!(mgr.pin_state("PA6"), Some(Level::High));

    assert!(matches!(
        mgr.set_pin("PA6", Level::High),
        Err(GpioError::ModeMismatch { .. })
    ));
}

#[test]
fn test_led_flow_over_sysfs() {
    let (dir, driver) = fake_gpio_tree(&[15]);
    let mut mgr = GpioManager::new(driver, Board::orange_pi_one()).unwrap();

    mgr.register_led("STATUS_LED").unwrap();
    assert_eq!(mgr.led_state("STATUS_LED"), None);

    mgr.led_on("STATUS_LED").unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("gpio15/value")).unwrap(), "1");
    assert!(mgr.is_led_on("STATUS_LED"));

    assert_eq!(mgr.toggle_led("STATUS_LED").unwrap(), Level::Low);
    assert_eq!(mgr.led_state("STATUS_LED"), Some(Level::Low));

    mgr.remove_led("STATUS_LED");
    assert!(matches!(
        mgr.led_on("STATUS_LED"),
        Err(GpioError::NotRegistered(_))
    ));
}

#[test]
fn test_unknown_names_are_hard_failures() {
    let (_dir, driver) = fake_gpio_tree(&[]);
    let mut mgr = GpioManager::new(driver, Board::orange_pi_one()).unwrap();

    assert!(matches!(
        mgr.register_pin("PZZ99", Some(Direction::Output)),
        Err(GpioError::UnknownPin(_))
    ));
    assert!(matches!(
        mgr.register_led("NOT_A_LED"),
        Err(GpioError::UnknownLed(_))
    ));
}

#[test]
fn test_manager_requires_gpio_interface() {
    let driver = SysfsGpio::with_base("/nonexistent/gpio");
    assert!(matches!(
        GpioManager::new(driver, Board::orange_pi_one()),
        Err(GpioError::Io(_))
    ));
}

#[test]
fn test_sysfs_driver_standalone() {
    let (dir, mut driver) = fake_gpio_tree(&[71]);
    driver.init().unwrap();
    driver.set_direction(71, Direction::Output).unwrap();
    driver.write(71, Level::High).unwrap();
    assert_eq!(driver.read(71).unwrap(), Level::High);
    assert_eq!(
        fs::read_to_string(dir.path().join("gpio71/direction")).unwrap(),
        "out"
    );
}

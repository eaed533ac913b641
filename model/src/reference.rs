//! Static reference material for building the real circuit. Nothing here
//! depends on the simulation state.

/// Parts needed for the physical build.
pub const PARTS: [&str; 5] = [
    "Arduino Uno R3",
    "DS18B20 Temperature Sensor",
    "16x2 LCD Display (I2C)",
    "4.7kΩ Pull-up Resistor",
    "Breadboard & Jumper Wires",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WiringNote {
    pub title: &'static str,
    pub detail: &'static str,
}

pub const WIRING: [WiringNote; 3] = [
    WiringNote {
        title: "DS18B20 → Arduino",
        detail: "VCC → 5V, GND → GND, Data → Pin 2",
    },
    WiringNote {
        title: "LCD (I2C) → Arduino",
        detail: "VCC → 5V, GND → GND, SDA → A4, SCL → A5",
    },
    WiringNote {
        title: "Pull-up Resistor",
        detail: "4.7kΩ between DS18B20 Data and VCC",
    },
];

/// Arduino sketch driving the real sensor and LCD.
pub const FIRMWARE_LISTING: &str = std::include_str!("./firmware.ino");

#[test]
fn test_firmware_listing() {
    assert!(FIRMWARE_LISTING.starts_with("#include <OneWire.h>"));
    assert!(FIRMWARE_LISTING.contains("Sensor Error!"));
    assert!(WIRING.iter().all(|note| note.title.ends_with("Arduino") || note.title.starts_with("Pull-up")));
}

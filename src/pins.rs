//! GPIO / peripheral pin assignments for the EnvNode board.
//!
//! Single source of truth — the ESP32 adapter references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus (BME280 environmental sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// I²C bus clock (standard mode is plenty for one sensor).
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Sensors — Digital / Analog
// ---------------------------------------------------------------------------

/// PIR motion sensor — digital input, HIGH = motion.
pub const PIR_MOTION_GPIO: i32 = 27;

/// Battery voltage divider — ADC1 channel 6 (GPIO 34).
pub const BATTERY_ADC_GPIO: i32 = 34;
pub const BATTERY_ADC_CHANNEL: u32 = 6;
/// Divider halves the pack voltage before the ADC pin.
pub const BATTERY_DIVIDER_RATIO: f32 = 2.0;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Serial link to the host
// ---------------------------------------------------------------------------

/// UART0 doubles as the USB console on most dev boards.
pub const LINK_UART_PORT: u32 = 0;
pub const LINK_BAUD: u32 = 115_200;

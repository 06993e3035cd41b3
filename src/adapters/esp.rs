//! ESP32 board adapters (ESP-IDF).
//!
//! Real-peripheral implementations of the port traits:
//!
//! - [`EspLink`] — UART0 at 115200 baud, non-blocking reads (zero-tick
//!   timeout) so the cooperative loop never stalls on the host.
//! - [`EspBoard`] — BME280 over I2C via the vendor driver crate, PIR
//!   motion input, battery divider on ADC1, status LED.
//! - [`EspClock`] — `esp_timer_get_time()` truncated to u32 milliseconds.
//!
//! GPIO and ADC go through raw `esp_idf_svc::sys` calls, which is the
//! lightest way to drive single pins; the I2C bus uses the typed
//! `esp-idf-hal` driver because the BME280 crate consumes an
//! `embedded-hal` bus.

use core::ffi::c_void;
use core::ptr;

use bme280::i2c::BME280;
use embedded_hal::i2c::I2c;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::{ActuatorPort, ClockPort, LinkRx, SensorPort, TelemetrySink};
use crate::error::{Error, LinkError};
use crate::pins;
use crate::telemetry::{self, Telemetry};

// ───────────────────────────────────────────────────────────────
// Serial link on UART0
// ───────────────────────────────────────────────────────────────

const UART_RX_BUF_BYTES: i32 = 2048;

pub struct EspLink {
    port: uart_port_t,
}

impl EspLink {
    /// Install the UART driver on the link port. Call once at boot.
    pub fn new() -> Result<Self, Error> {
        let port = pins::LINK_UART_PORT as uart_port_t;
        let config = uart_config_t {
            baud_rate: pins::LINK_BAUD as i32,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: called once from main() before the tick loop starts;
        // the port number is a compile-time constant.
        let rc = unsafe { uart_param_config(port, &config) };
        if rc != ESP_OK as i32 {
            return Err(Error::Init("uart_param_config failed"));
        }
        let rc = unsafe {
            uart_driver_install(port, UART_RX_BUF_BYTES, 0, 0, ptr::null_mut(), 0)
        };
        if rc != ESP_OK as i32 {
            return Err(Error::Init("uart_driver_install failed"));
        }
        info!("uart{}: link up at {} baud", port, pins::LINK_BAUD);
        Ok(Self { port })
    }
}

impl LinkRx for EspLink {
    fn poll_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // Zero-tick timeout: returns immediately whether or not a byte is
        // waiting in the RX FIFO.
        let n = unsafe {
            uart_read_bytes(self.port, (&raw mut byte).cast::<c_void>(), 1, 0)
        };
        (n == 1).then_some(byte)
    }
}

impl TelemetrySink for EspLink {
    fn emit(&mut self, msg: &Telemetry) -> Result<(), LinkError> {
        let mut line = telemetry::to_line(msg)?;
        line.push('\n');
        let written = unsafe {
            uart_write_bytes(self.port, line.as_ptr().cast::<c_void>(), line.len())
        };
        if written < 0 || written as usize != line.len() {
            return Err(LinkError::Io);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Board: BME280 + PIR + battery + LED
// ───────────────────────────────────────────────────────────────

/// BME280 chip-id register and expected value, used to probe an address
/// before handing the bus to the vendor driver.
const BME280_REG_CHIP_ID: u8 = 0xD0;
const BME280_CHIP_ID: u8 = 0x60;

/// ADC raw counts below this mean the divider is not populated.
const BATTERY_PRESENT_MIN_RAW: u16 = 200;

pub struct EspBoard {
    /// Bus held here until a probe succeeds, then moved into the driver.
    i2c: Option<I2cDriver<'static>>,
    bme: Option<BME280<I2cDriver<'static>>>,
    last_env: (f32, f32, f32),
}

impl EspBoard {
    /// Configure GPIO directions and the I2C bus. Call once at boot.
    pub fn new(i2c: I2cDriver<'static>) -> Result<Self, Error> {
        // SAFETY: one-shot pin configuration before the tick loop.
        unsafe {
            let rc = gpio_set_direction(
                pins::STATUS_LED_GPIO,
                gpio_mode_t_GPIO_MODE_OUTPUT,
            );
            if rc != ESP_OK as i32 {
                return Err(Error::Init("LED gpio config failed"));
            }
            let rc = gpio_set_direction(
                pins::PIR_MOTION_GPIO,
                gpio_mode_t_GPIO_MODE_INPUT,
            );
            if rc != ESP_OK as i32 {
                return Err(Error::Init("PIR gpio config failed"));
            }
            init_battery_adc()?;
        }
        Ok(Self {
            i2c: Some(i2c),
            bme: None,
            last_env: (0.0, 0.0, 0.0),
        })
    }

    /// Build the I2C driver for [`EspBoard::new`] from raw peripherals.
    pub fn i2c_driver(
        i2c0: esp_idf_hal::i2c::I2C0,
        sda: esp_idf_hal::gpio::AnyIOPin,
        scl: esp_idf_hal::gpio::AnyIOPin,
    ) -> Result<I2cDriver<'static>, Error> {
        let config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
        I2cDriver::new(i2c0, sda, scl, &config)
            .map_err(|_| Error::Init("i2c driver init failed"))
    }

    /// One measurement from the vendor driver; on a bus hiccup the
    /// previous good triple is retained so a single flaky read cannot
    /// disturb the telemetry cadence.
    fn refresh_env(&mut self) {
        let Some(bme) = self.bme.as_mut() else {
            return;
        };
        match bme.measure(&mut FreeRtos) {
            Ok(m) => {
                self.last_env = (m.temperature, m.humidity, m.pressure / 100.0);
            }
            Err(_) => warn!("bme280: measure failed, keeping previous reading"),
        }
    }

    fn battery_raw(&self) -> u16 {
        battery_adc_read()
    }
}

impl SensorPort for EspBoard {
    fn begin(&mut self, address: u8) -> bool {
        if self.bme.is_some() {
            return true;
        }
        let Some(mut i2c) = self.i2c.take() else {
            return false;
        };

        // Cheap chip-id probe while we still own the bus; the vendor
        // driver takes ownership and cannot give it back on failure.
        let mut id = [0u8; 1];
        let responded =
            I2c::write_read(&mut i2c, address, &[BME280_REG_CHIP_ID], &mut id).is_ok()
                && id[0] == BME280_CHIP_ID;
        if !responded {
            self.i2c = Some(i2c);
            return false;
        }

        let mut bme = BME280::new(i2c, address);
        match bme.init(&mut FreeRtos) {
            Ok(()) => {
                self.bme = Some(bme);
                true
            }
            Err(_) => {
                warn!("bme280: responded at 0x{address:02x} but init failed");
                false
            }
        }
    }

    // Temperature triggers the bus transaction; humidity and pressure
    // reuse the same measurement (the sampler reads all three together).
    fn read_temperature(&mut self) -> f32 {
        self.refresh_env();
        self.last_env.0
    }

    fn read_humidity(&mut self) -> f32 {
        self.last_env.1
    }

    fn read_pressure(&mut self) -> f32 {
        self.last_env.2
    }

    fn motion_detected(&mut self) -> bool {
        // SAFETY: input pin configured in new(); read-only register access.
        unsafe { gpio_get_level(pins::PIR_MOTION_GPIO) == 1 }
    }

    fn battery_connected(&mut self) -> bool {
        self.battery_raw() >= BATTERY_PRESENT_MIN_RAW
    }

    fn read_battery_volts(&mut self) -> f32 {
        let raw = f32::from(self.battery_raw());
        (raw / 4095.0) * 3.3 * pins::BATTERY_DIVIDER_RATIO
    }
}

impl ActuatorPort for EspBoard {
    fn set_led(&mut self, on: bool) {
        // SAFETY: output pin configured in new().
        unsafe {
            gpio_set_level(pins::STATUS_LED_GPIO, u32::from(on));
        }
    }
}

// ── Battery ADC (oneshot) ─────────────────────────────────────

static mut BATTERY_ADC_HANDLE: adc_oneshot_unit_handle_t = ptr::null_mut();

unsafe fn init_battery_adc() -> Result<(), Error> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: BATTERY_ADC_HANDLE is written once at boot, before the
    // single-threaded tick loop starts reading it.
    let rc = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut BATTERY_ADC_HANDLE) };
    if rc != ESP_OK as i32 {
        return Err(Error::Init("battery ADC unit init failed"));
    }
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let rc = unsafe {
        adc_oneshot_config_channel(BATTERY_ADC_HANDLE, pins::BATTERY_ADC_CHANNEL, &chan_cfg)
    };
    if rc != ESP_OK as i32 {
        return Err(Error::Init("battery ADC channel config failed"));
    }
    Ok(())
}

fn battery_adc_read() -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: handle written once during init; single-threaded main-loop
    // access only.
    let rc = unsafe { adc_oneshot_read(BATTERY_ADC_HANDLE, pins::BATTERY_ADC_CHANNEL, &mut raw) };
    if rc != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ───────────────────────────────────────────────────────────────
// Clock and restart
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock from the ESP high-resolution timer.
pub struct EspClock;

impl ClockPort for EspClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wraparound contract: u32 millis roll over
        // every ~49 days and the cadence math wraps with them.
        ((unsafe { esp_timer_get_time() }) / 1000) as u32
    }
}

/// Restart the chip. The run ends here; the next boot re-probes hardware.
pub fn restart() {
    unsafe { esp_restart() }
}

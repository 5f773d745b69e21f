/*
 *  board/lis3dh.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  LIS3DH tri-axis accelerometer over I2C
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::error::SensorError;
use crate::hal::{Acceleration, TriAxisSensor};

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL_REG1: u8 = 0x20;
const REG_CTRL_REG4: u8 = 0x23;
const REG_OUT_X_L: u8 = 0x28;

// sub-address MSB enables auto-increment on multi-byte reads
const AUTO_INCREMENT: u8 = 0x80;

const DEVICE_ID: u8 = 0x33;

// 400 Hz, all three axes enabled
const CTRL1_400HZ_XYZ: u8 = 0x77;
// block data update, +/-2g, high resolution
const CTRL4_BDU_2G_HR: u8 = 0x88;

// counts per g at +/-2g, left-justified 12-bit data
const COUNTS_PER_G: f32 = 16380.0;
const STANDARD_GRAVITY: f32 = 9.806_65;

pub struct Lis3dh<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Lis3dh<I2C> {
    /// Check identity and configure the part
    pub fn new(i2c: I2C, address: u8) -> Result<Self, SensorError> {
        let mut dev = Self { i2c, address };
        let id = dev.read_reg(REG_WHO_AM_I)?;
        if id != DEVICE_ID {
            return Err(SensorError::NotPresent { expected: DEVICE_ID, found: id });
        }
        dev.write_reg(REG_CTRL_REG1, CTRL1_400HZ_XYZ)?;
        dev.write_reg(REG_CTRL_REG4, CTRL4_BDU_2G_HR)?;
        debug!("LIS3DH at {:#04x} configured", address);
        Ok(dev)
    }

    /// Acceleration in m/s^2
    pub fn read_accel(&mut self) -> Result<Acceleration, SensorError> {
        let mut data = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_OUT_X_L | AUTO_INCREMENT], &mut data)
            .map_err(bus)?;
        let axis = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]) as f32 / COUNTS_PER_G * STANDARD_GRAVITY;
        Ok(Acceleration::new(
            axis(data[0], data[1]),
            axis(data[2], data[3]),
            axis(data[4], data[5]),
        ))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8];
        self.i2c.write_read(self.address, &[reg], &mut buf).map_err(bus)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), SensorError> {
        self.i2c.write(self.address, &[reg, val]).map_err(bus)
    }
}

fn bus<E: embedded_hal::i2c::Error>(e: E) -> SensorError {
    SensorError::Bus(format!("{:?}", e.kind()))
}

impl<I2C: I2c> TriAxisSensor for Lis3dh<I2C> {
    fn read(&mut self) -> Result<Acceleration, SensorError> {
        self.read_accel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x18;

    fn init() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![DEVICE_ID]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG1, CTRL1_400HZ_XYZ]),
            I2cTransaction::write(ADDR, vec![REG_CTRL_REG4, CTRL4_BDU_2G_HR]),
        ]
    }

    #[test]
    fn test_init_and_read() {
        let mut expectations = init();
        // x = 0, y = -16380, z = 16380
        let y = (-16380i16).to_le_bytes();
        let z = 16380i16.to_le_bytes();
        expectations.push(I2cTransaction::write_read(
            ADDR,
            vec![REG_OUT_X_L | AUTO_INCREMENT],
            vec![0, 0, y[0], y[1], z[0], z[1]],
        ));
        let i2c = I2cMock::new(&expectations);

        let mut dev = Lis3dh::new(i2c, ADDR).unwrap();
        let a = dev.read().unwrap();
        assert_eq!(a.x, 0.0);
        assert!((a.y + STANDARD_GRAVITY).abs() < 1e-4);
        assert!((a.z - STANDARD_GRAVITY).abs() < 1e-4);
        dev.release().done();
    }

    #[test]
    fn test_wrong_identity_is_not_present() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![0x44])];
        let mut i2c = I2cMock::new(&expectations);
        let err = Lis3dh::new(i2c.clone(), ADDR).err().unwrap();
        assert!(matches!(err, SensorError::NotPresent { expected: 0x33, found: 0x44 }));
        i2c.done();
    }

    #[test]
    fn test_bus_error_surfaces() {
        let expectations = [I2cTransaction::write_read(ADDR, vec![REG_WHO_AM_I], vec![0])
            .with_error(ErrorKind::Other)];
        let mut i2c = I2cMock::new(&expectations);
        let err = Lis3dh::new(i2c.clone(), ADDR).err().unwrap();
        assert!(matches!(err, SensorError::Bus(_)));
        i2c.done();
    }
}

/*
 *  channel/accel.rs
 *
 *  BadgeScope - a scope that fits on a lanyard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Accelerometer sweep: composite readings with interpolated midpoints
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

use crate::constants::ACCEL_SCALE;
use crate::error::SensorError;
use crate::hal::{Acceleration, TriAxisSensor};

/// Sum of the three axes scaled and biased onto the sample domain
#[inline]
pub fn composite(reading: Acceleration, midscale: i32) -> u16 {
    let v = (reading.sum() * ACCEL_SCALE + midscale as f32).round();
    v.clamp(0.0, u16::MAX as f32) as u16
}

/// Real readings on even slots, neighbour averages on odd ones.
///
/// The sensor is too slow to fill every slot, so every other slot is the
/// integer mean of its neighbours. A trailing odd slot with no right
/// neighbour repeats the reading before it.
pub fn fill_interpolated(
    sensor: &mut dyn TriAxisSensor,
    samples: &mut [u16],
    midscale: i32,
) -> Result<(), SensorError> {
    let n = samples.len();
    for i in (0..n).step_by(2) {
        samples[i] = composite(sensor.read()?, midscale);
    }
    for i in (1..n).step_by(2) {
        samples[i] = if i + 1 < n {
            ((samples[i - 1] as u32 + samples[i + 1] as u32) >> 1) as u16
        } else {
            samples[i - 1]
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ADC_MIDSCALE;

    struct Ramp {
        n: f32,
    }

    impl TriAxisSensor for Ramp {
        fn read(&mut self) -> Result<Acceleration, SensorError> {
            self.n += 1.0;
            Ok(Acceleration::new(self.n, 0.5, -0.25))
        }
    }

    struct Broken;

    impl TriAxisSensor for Broken {
        fn read(&mut self) -> Result<Acceleration, SensorError> {
            Err(SensorError::Bus("nack".into()))
        }
    }

    #[test]
    fn test_composite_scaling() {
        assert_eq!(composite(Acceleration::new(0.0, 0.0, 0.0), ADC_MIDSCALE), 32768);
        // 9.81 * 25 = 245.25 -> 245
        assert_eq!(composite(Acceleration::new(0.0, 0.0, 9.81), ADC_MIDSCALE), 33013);
        assert_eq!(composite(Acceleration::new(0.0, 0.0, -1.0), ADC_MIDSCALE), 32743);
    }

    #[test]
    fn test_composite_saturates() {
        assert_eq!(composite(Acceleration::new(5000.0, 0.0, 0.0), ADC_MIDSCALE), u16::MAX);
        assert_eq!(composite(Acceleration::new(-5000.0, 0.0, 0.0), ADC_MIDSCALE), 0);
    }

    #[test]
    fn test_odd_slots_are_neighbour_means() {
        let mut sensor = Ramp { n: 0.0 };
        let mut buf = [0u16; 11];
        fill_interpolated(&mut sensor, &mut buf, ADC_MIDSCALE).unwrap();
        for i in (1..buf.len() - 1).step_by(2) {
            assert_eq!(buf[i], ((buf[i - 1] as u32 + buf[i + 1] as u32) >> 1) as u16);
        }
        // six real reads for eleven slots
        assert_eq!(sensor.n, 6.0);
    }

    #[test]
    fn test_even_length_guards_last_slot() {
        let mut sensor = Ramp { n: 0.0 };
        let mut buf = [0u16; 10];
        fill_interpolated(&mut sensor, &mut buf, ADC_MIDSCALE).unwrap();
        assert_eq!(buf[9], buf[8]);
    }

    #[test]
    fn test_read_error_propagates() {
        let mut buf = [7u16; 4];
        assert!(fill_interpolated(&mut Broken, &mut buf, ADC_MIDSCALE).is_err());
    }
}

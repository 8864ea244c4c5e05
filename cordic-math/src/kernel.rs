use crate::fixed_point::FixedPointFormat;
use crate::schedule::RepeatSchedule;
use crate::tables::AtanhTable;

/// Arithmetic right shift that stays total for any iteration index.
///
/// Every accumulator is below `2^63` in magnitude, so for `i >= 63` the
/// floor of `v / 2^i` is `v >> 63` (0 or -1).
#[inline(always)]
fn asr(v: i64, i: u32) -> i64 {
    v >> i.min(63)
}

/// Working accumulators of one kernel invocation.
///
/// `z` (the rotation angle) only moves when the kernel is driven with an
/// atanh table; the square root leaves it at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelState {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl KernelState {
    /// `x = u + 1`, `y = u - 1`, `z = 0` with `u` in `[1, 2)`.
    ///
    /// Vectoring drives `z` to `atanh((u - 1) / (u + 1)) = ln(u) / 2`.
    pub fn for_ln(u: u64, format: FixedPointFormat) -> Self {
        let one = format.one();
        Self {
            x: u as i64 + one,
            y: u as i64 - one,
            z: 0,
        }
    }

    /// `x = u + 0.25`, `y = u - 0.25` in units of `2^Wl`.
    ///
    /// `x^2 - y^2 = u`, so vectoring leaves `x` at `sqrt(u)` shrunk by the
    /// hyperbolic gain.
    pub fn for_sqrt(u: u64, format: FixedPointFormat) -> Self {
        let quarter = 1i64 << (format.word_length() - 2);
        Self {
            x: u as i64 + quarter,
            y: u as i64 - quarter,
            z: 0,
        }
    }

    /// One micro-rotation at index `i`, steering `y` toward zero.
    ///
    /// Both branches do the same amount of work.
    #[inline(always)]
    pub fn rotate(&mut self, i: u32, angle: i64) {
        let x_shift = asr(self.x, i);
        let y_shift = asr(self.y, i);
        if self.y < 0 {
            self.x += y_shift;
            self.y += x_shift;
            self.z -= angle;
        } else {
            self.x -= y_shift;
            self.y -= x_shift;
            self.z += angle;
        }
    }

    /// Run every step of `schedule`, accumulating angles from `table` when given.
    ///
    /// The caller guarantees `table` covers the schedule's `n_iter`.
    pub fn vector(&mut self, schedule: RepeatSchedule, table: Option<&AtanhTable>) {
        match table {
            Some(table) => {
                let angles = table.as_slice();
                for i in schedule {
                    self.rotate(i, angles[i as usize - 1]);
                }
            }
            None => {
                for i in schedule {
                    self.rotate(i, 0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asr_is_floor_division() {
        assert_eq!(asr(-1, 1), -1);
        assert_eq!(asr(-5, 1), -3);
        assert_eq!(asr(5, 1), 2);
        assert_eq!(asr(-5, 70), -1);
        assert_eq!(asr(5, 70), 0);
    }

    #[test]
    fn test_rotation_direction_follows_sign_of_y() {
        let mut s = KernelState { x: 100, y: -40, z: 0 };
        s.rotate(1, 7);
        assert_eq!(s, KernelState { x: 80, y: 10, z: -7 });
        s.rotate(1, 7);
        assert_eq!(s, KernelState { x: 75, y: -30, z: 0 });
    }

    #[test]
    fn test_ln_initialization() {
        let f = FixedPointFormat::new(16).unwrap();
        let s = KernelState::for_ln(0xC000, f);
        assert_eq!(s, KernelState { x: 0xC000 + 0x8000, y: 0x4000, z: 0 });
    }

    #[test]
    fn test_sqrt_initialization() {
        let f = FixedPointFormat::new(16).unwrap();
        let s = KernelState::for_sqrt(0x4000, f);
        assert_eq!(s, KernelState { x: 0x8000, y: 0, z: 0 });
    }

    #[test]
    fn test_vector_drives_y_to_zero() {
        let f = FixedPointFormat::new(32).unwrap();
        let table = AtanhTable::build(f, 32).unwrap();
        let mut s = KernelState::for_ln(0xB504_F334, f);
        s.vector(RepeatSchedule::new(32), Some(&table));
        assert!(s.y.abs() < 64, "y = {}", s.y);
        // ln(sqrt(2)) / 2
        let half_ln = f.to_real(s.z);
        assert!((half_ln - std::f64::consts::LN_2 / 4.0).abs() < 1e-8);
    }

    #[test]
    fn test_sqrt_kernel_leaves_z_untouched() {
        let f = FixedPointFormat::new(16).unwrap();
        let mut s = KernelState::for_sqrt(0x8000, f);
        s.vector(RepeatSchedule::new(16), None);
        assert_eq!(s.z, 0);
        assert!(s.x > 0);
    }
}

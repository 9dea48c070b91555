// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use num_traits::PrimInt;

pub use self::bits::*;

mod bits;

/// Rounds `value` up to the next multiple of `alignment`, which must be a
/// power of two.
#[inline]
pub const fn align_ceil(value: usize, alignment: usize) -> usize {
  debug_assert!(alignment.is_power_of_two());
  (value + alignment - 1) & !(alignment - 1)
}

/// Limits `input` to `[min, max]`. The lower bound is checked first, so
/// `min` is returned for any input below it even when `min > max`.
#[inline]
pub fn clamp<T: PartialOrd>(input: T, min: T, max: T) -> T {
  if input < min {
    min
  } else if input > max {
    max
  } else {
    input
  }
}

pub fn gcd<T: PrimInt>(mut a: T, mut b: T) -> T {
  while b != T::zero() {
    let t = a % b;
    a = b;
    b = t;
  }
  a
}

/// Least common multiple, or zero when either input is zero.
pub fn lcm<T: PrimInt>(a: T, b: T) -> T {
  if a.is_zero() || b.is_zero() {
    return T::zero();
  }
  a / gcd(a, b) * b
}

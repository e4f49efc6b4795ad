// Copyright 2016 GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

use std::ops::Range;

/// Returns true if nth bit in array is 1. Bits past the end of array are 0.
pub fn test_bit(n: u16, array: &[u8]) -> bool {
    array
        .get((n / 8) as usize)
        .map(|byte| (byte >> (n % 8)) & 1 != 0)
        .unwrap_or(false)
}

/// Indexes of set bits in `range`.
pub fn set_bits(array: &[u8], range: Range<u16>) -> impl Iterator<Item = u16> + '_ {
    range.filter(move |&bit| test_bit(bit, array))
}

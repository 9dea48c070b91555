// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use crate::config::Generation;

/// Versioned binary contract between the driver and one generation of the
/// command-initializer firmware.
pub trait FirmwareLayoutProfile: Sync {
  fn generation(&self) -> Generation;

  /// Byte offset of the generated Cmd1 in the output batch.
  fn cmd1_offset(&self, brc_enabled: bool) -> u16;

  fn cmd2_offset(&self, brc_enabled: bool) -> u16;

  /// Byte offset of the PIC_STATE command, if the generation emits one.
  fn cmd5_offset(&self, brc_enabled: bool) -> Option<u16>;

  /// Number of commands the HEVC DMEM must describe.
  fn command_count(&self) -> u32;

  /// Lower clamp applied to the slice QP before computing lambdas.
  fn min_lambda_qp(&self) -> i32;

  /// Whether the intra non-DC penalty follows the QP.
  fn qp_ramped_penalty(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct G10Profile;

impl FirmwareLayoutProfile for G10Profile {
  fn generation(&self) -> Generation {
    Generation::G10
  }

  fn cmd1_offset(&self, _brc_enabled: bool) -> u16 {
    28
  }

  fn cmd2_offset(&self, _brc_enabled: bool) -> u16 {
    276
  }

  fn cmd5_offset(&self, _brc_enabled: bool) -> Option<u16> {
    None
  }

  fn command_count(&self) -> u32 {
    2
  }

  fn min_lambda_qp(&self) -> i32 {
    0
  }

  fn qp_ramped_penalty(&self) -> bool {
    false
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct G11Profile;

impl FirmwareLayoutProfile for G11Profile {
  fn generation(&self) -> Generation {
    Generation::G11
  }

  fn cmd1_offset(&self, brc_enabled: bool) -> u16 {
    if brc_enabled {
      36
    } else {
      0
    }
  }

  fn cmd2_offset(&self, brc_enabled: bool) -> u16 {
    if brc_enabled {
      308
    } else {
      272
    }
  }

  fn cmd5_offset(&self, brc_enabled: bool) -> Option<u16> {
    Some(if brc_enabled { 156 } else { 120 })
  }

  fn command_count(&self) -> u32 {
    3
  }

  fn min_lambda_qp(&self) -> i32 {
    10
  }

  fn qp_ramped_penalty(&self) -> bool {
    true
  }
}

pub fn layout_profile(generation: Generation) -> &'static dyn FirmwareLayoutProfile {
  match generation {
    Generation::G10 => &G10Profile,
    Generation::G11 => &G11Profile,
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use interpolate_name::interpolate_test;

  #[interpolate_test(g11_brc, Generation::G11, true, 36, 308, Some(156))]
  #[interpolate_test(g11_cqp, Generation::G11, false, 0, 272, Some(120))]
  #[interpolate_test(g10_brc, Generation::G10, true, 28, 276, None)]
  #[interpolate_test(g10_cqp, Generation::G10, false, 28, 276, None)]
  fn offsets(
    generation: Generation, brc: bool, cmd1: u16, cmd2: u16, cmd5: Option<u16>,
  ) {
    let profile = layout_profile(generation);
    assert_eq!(profile.generation(), generation);
    assert_eq!(profile.cmd1_offset(brc), cmd1);
    assert_eq!(profile.cmd2_offset(brc), cmd2);
    assert_eq!(profile.cmd5_offset(brc), cmd5);
  }

  #[test]
  fn command_counts() {
    assert_eq!(layout_profile(Generation::G10).command_count(), 2);
    assert_eq!(layout_profile(Generation::G11).command_count(), 3);
  }
}

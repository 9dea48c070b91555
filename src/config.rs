// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use arg_enum_proc_macro::ArgEnum;
use num_derive::FromPrimitive;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::InvalidParameter;
use crate::params::CodecKind;

/// Number of recycled buffer sets kept by the encoder.
pub const DEFAULT_RING_SIZE: usize = 6;
/// Upper bound on the recycled buffer ring.
pub const MAX_RING_SIZE: usize = 16;
/// Kernel descriptor of the command-initializer firmware.
pub const CMD_INITIALIZER_KERNEL_DESCRIPTOR: u32 = 14;
/// Default size of the second level batch written by the copy command.
pub const DEFAULT_COPY_BATCH_SIZE: u32 = 4096;

/// Maximum number of PAK passes before panic mode adds one.
pub const fn max_brc_passes(codec: CodecKind) -> usize {
  match codec {
    CodecKind::HEVC | CodecKind::VP8 => 4,
    CodecKind::VP9 => 3,
  }
}

/// Hardware generation, which selects the firmware layout profile.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Generation {
  G10 = 10,
  G11 = 11,
}

impl Default for Generation {
  fn default() -> Self {
    Generation::G11
  }
}

/// Settings that stay fixed for the lifetime of an encode session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SessionConfig {
  pub generation: Generation,
  pub codec: CodecKind,
  /// Number of recycled buffer sets.
  pub ring_size: usize,
  /// PAK passes per frame, panic excluded.
  pub num_passes: usize,
  pub panic_enabled: bool,
  /// Visual quality improvement tuning of the lambdas.
  pub vqi_enabled: bool,
  /// Content protection, which changes how indirect data is fetched.
  pub content_protection: bool,
  pub kernel_descriptor: u32,
  pub copy_batch_size: u32,
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig {
      generation: Generation::G11,
      codec: CodecKind::HEVC,
      ring_size: DEFAULT_RING_SIZE,
      num_passes: 1,
      panic_enabled: true,
      vqi_enabled: false,
      content_protection: false,
      kernel_descriptor: CMD_INITIALIZER_KERNEL_DESCRIPTOR,
      copy_batch_size: DEFAULT_COPY_BATCH_SIZE,
    }
  }
}

impl SessionConfig {
  pub fn new(generation: Generation, codec: CodecKind) -> Self {
    SessionConfig { generation, codec, ..Default::default() }
  }

  pub const fn with_ring_size(mut self, ring_size: usize) -> Self {
    self.ring_size = ring_size;
    self
  }

  pub const fn with_passes(mut self, num_passes: usize) -> Self {
    self.num_passes = num_passes;
    self
  }

  pub const fn with_panic(mut self, panic_enabled: bool) -> Self {
    self.panic_enabled = panic_enabled;
    self
  }

  pub const fn with_vqi(mut self, vqi_enabled: bool) -> Self {
    self.vqi_enabled = vqi_enabled;
    self
  }

  pub const fn with_content_protection(mut self, enabled: bool) -> Self {
    self.content_protection = enabled;
    self
  }

  pub const fn with_copy_batch_size(mut self, size: u32) -> Self {
    self.copy_batch_size = size;
    self
  }

  /// Passes a frame may take, including the panic pass.
  pub const fn max_passes(&self) -> usize {
    self.num_passes + self.panic_enabled as usize
  }

  /// # Errors
  ///
  /// Returns `InvalidParameter` if the ring or pass count is out of range,
  /// or if the generation cannot drive the codec.
  pub fn validate(&self) -> Result<(), InvalidParameter> {
    use InvalidParameter::*;

    if self.ring_size == 0 || self.ring_size > MAX_RING_SIZE {
      return Err(RingSize { actual: self.ring_size, max: MAX_RING_SIZE });
    }
    let max = max_brc_passes(self.codec);
    if self.num_passes == 0 || self.num_passes > max {
      return Err(PassCount { actual: self.num_passes, max });
    }
    if self.generation == Generation::G10 && self.codec == CodecKind::VP9 {
      return Err(Codec(self.codec));
    }

    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn defaults_validate() {
    assert_eq!(SessionConfig::default().validate(), Ok(()));
    assert_eq!(SessionConfig::default().max_passes(), 2);
  }

  #[test]
  fn pass_bound_per_codec() {
    let cfg = SessionConfig::new(Generation::G11, CodecKind::HEVC);
    assert_eq!(cfg.with_passes(4).validate(), Ok(()));
    assert_eq!(
      cfg.with_passes(5).validate(),
      Err(InvalidParameter::PassCount { actual: 5, max: 4 })
    );
    let cfg = SessionConfig::new(Generation::G11, CodecKind::VP9);
    assert_eq!(
      cfg.with_passes(4).validate(),
      Err(InvalidParameter::PassCount { actual: 4, max: 3 })
    );
  }

  #[test]
  fn ring_bounds() {
    let cfg = SessionConfig::default().with_ring_size(0);
    assert_eq!(
      cfg.validate(),
      Err(InvalidParameter::RingSize { actual: 0, max: MAX_RING_SIZE })
    );
  }

  #[test]
  fn generation_from_code() {
    use num_traits::FromPrimitive;
    assert_eq!(Generation::from_u32(11), Some(Generation::G11));
    assert_eq!(Generation::from_u32(9), None);
  }
}

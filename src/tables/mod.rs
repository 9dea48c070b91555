// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Static rate control tables and the device copy shared by all frames.

use bitstream_io::ByteWrite;

use crate::error::Error;
use crate::params::CodecKind;
use crate::provider::{write_buffer, BufferHandle, ResourceProvider};
use crate::util::payload_writer;

pub mod hevc;
pub mod vp8;
pub mod vp9;

pub use self::hevc::*;
pub use self::vp8::*;
pub use self::vp9::*;

pub const VP8_CONSTANT_TABLE_SIZE: usize = 3136;
pub const VP9_CONSTANT_TABLE_SIZE: usize = 3328;
pub const HEVC_CONSTANT_TABLE_SIZE: usize = 4 * 52 * 2 + 900 * 4;

/// Size in bytes of the constant table surface of a codec.
pub const fn constant_table_size(codec: CodecKind) -> usize {
  match codec {
    CodecKind::HEVC => HEVC_CONSTANT_TABLE_SIZE,
    CodecKind::VP8 => VP8_CONSTANT_TABLE_SIZE,
    CodecKind::VP9 => VP9_CONSTANT_TABLE_SIZE,
  }
}

/// Serializes the constant tables of `codec` in their device layout.
pub fn constant_table_bytes(codec: CodecKind) -> Result<Vec<u8>, Error> {
  let mut buf = Vec::with_capacity(constant_table_size(codec));
  {
    let mut w = payload_writer(&mut buf);
    match codec {
      CodecKind::VP8 => {
        w.write_bytes(&VP8_BRC_QP_ADJUST_IPB)?;
        w.write_bytes(&VP8_BRC_IFRAME_COST)?;
        for &v in VP8_BRC_PFRAME_COST.iter() {
          w.write::<u32>(v)?;
        }
        for &v in VP8_QUANT_DC.iter().chain(&VP8_QUANT_AC) {
          w.write::<u16>(v)?;
        }
        for &v in VP8_SKIP_MV_THRESHOLD.iter() {
          w.write::<u16>(v)?;
        }
      }
      CodecKind::VP9 => {
        for &v in VP9_BRC_CONST_DATA.iter().flatten() {
          w.write::<u32>(v)?;
        }
      }
      CodecKind::HEVC => {
        for &v in HEVC_SAD_QP_LAMBDA_I
          .iter()
          .chain(&HEVC_SAD_QP_LAMBDA_P)
          .chain(&HEVC_RD_QP_LAMBDA_I)
          .chain(&HEVC_RD_QP_LAMBDA_P)
        {
          w.write::<u16>(v)?;
        }
        for &v in HEVC_HUC_CONST_DATA.iter() {
          w.write::<u32>(v)?;
        }
      }
    }
  }
  debug_assert_eq!(buf.len(), constant_table_size(codec));
  Ok(buf)
}

/// Device copy of the constant tables of one codec.
///
/// Written once when built; frames only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantTableSet {
  pub codec: CodecKind,
  pub buffer: BufferHandle,
  pub size: usize,
}

/// Allocates a device buffer and copies the constant tables into it.
///
/// # Errors
///
/// Returns `ResourceError` when the provider cannot allocate or map the
/// buffer.
pub fn build_constant_table<P: ResourceProvider + ?Sized>(
  codec: CodecKind, provider: &mut P,
) -> Result<ConstantTableSet, Error> {
  let bytes = constant_table_bytes(codec)?;
  let name = match codec {
    CodecKind::HEVC => "HEVC BRC constant data",
    CodecKind::VP8 => "VP8 BRC constant data",
    CodecKind::VP9 => "VP9 BRC constant data",
  };
  let buffer = provider.allocate_buffer(bytes.len(), name)?;
  write_buffer(provider, buffer, &bytes)?;
  debug!("built {:?} constant tables, {} bytes", codec, bytes.len());
  Ok(ConstantTableSet { codec, buffer, size: bytes.len() })
}

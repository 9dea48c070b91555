// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Binary layouts of the BRC kernel and firmware parameters.
//!
//! Every packer is a plain struct filled from the rate control session and
//! the frame parameters, then serialized field by field as little-endian
//! integers. Fields are assigned independently of each other, so building
//! a payload never depends on the order in which fields are set.

use std::io;

use crate::error::Error;
use crate::provider::{write_buffer, BufferHandle, ResourceProvider};
use crate::util::{payload_writer, PayloadWriter};

mod hevc;
mod vp8;
mod vp9;

pub use self::hevc::*;
pub use self::vp8::*;
pub use self::vp9::*;

/// A fixed size parameter block read by a BRC kernel or firmware.
pub trait BrcPayload {
  /// Packed size in bytes.
  const SIZE: usize;

  fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()>;

  fn to_bytes(&self) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(Self::SIZE);
    self.write_to(&mut payload_writer(&mut buf))?;
    debug_assert_eq!(buf.len(), Self::SIZE);
    trace!("packed {} byte payload", buf.len());
    Ok(buf)
  }

  /// Packs the payload into the start of a device buffer.
  fn write_to_buffer<P: ResourceProvider + ?Sized>(
    &self, provider: &mut P, handle: BufferHandle,
  ) -> Result<(), Error> {
    write_buffer(provider, handle, &self.to_bytes()?)
  }
}

/// Uncompressed 4:2:0 frame size in bytes, the default per frame cap.
pub(crate) fn uncompressed_frame_bytes(width: u32, height: u32) -> u32 {
  let size = width as u64 * height as u64 * 3 / 2;
  size.min(u32::MAX as u64) as u32
}

/// Bitrate clamped into a 32-bit firmware field.
pub(crate) fn bitrate_u32(bps: u64) -> u32 {
  bps.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::provider::RecordingProvider;
  use bitstream_io::ByteWrite;

  struct Pair(u16, u16);

  impl BrcPayload for Pair {
    const SIZE: usize = 4;

    fn write_to(&self, w: &mut PayloadWriter<'_>) -> io::Result<()> {
      w.write::<u16>(self.0)?;
      w.write::<u16>(self.1)
    }
  }

  #[test]
  fn payload_lands_in_buffer() {
    let mut p = RecordingProvider::new();
    let h = p.allocate_buffer(8, "pair").unwrap();
    Pair(0x0102, 0x0304).write_to_buffer(&mut p, h).unwrap();
    assert_eq!(p.contents(h).unwrap(), &[2, 1, 4, 3, 0, 0, 0, 0]);
  }

  #[test]
  fn oversized_payload_is_rejected() {
    let mut p = RecordingProvider::new();
    let h = p.allocate_buffer(2, "small").unwrap();
    assert!(Pair(1, 2).write_to_buffer(&mut p, h).is_err());
  }

  #[test]
  fn frame_size_caps() {
    assert_eq!(uncompressed_frame_bytes(1920, 1080), 3_110_400);
    assert_eq!(bitrate_u32(u64::MAX), u32::MAX);
  }
}

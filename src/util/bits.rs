// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use bitstream_io::{ByteReader, ByteWrite, ByteWriter, LittleEndian};
use std::io;

/// Little-endian writer used by every firmware and kernel payload.
pub type PayloadWriter<'a> = ByteWriter<&'a mut Vec<u8>, LittleEndian>;

pub fn payload_writer(buf: &mut Vec<u8>) -> PayloadWriter<'_> {
  ByteWriter::endian(buf, LittleEndian)
}

/// Reader for records the GPU writes back.
pub type PayloadReader<'a> = ByteReader<&'a [u8], LittleEndian>;

pub fn payload_reader(bytes: &[u8]) -> PayloadReader<'_> {
  ByteReader::endian(bytes, LittleEndian)
}

/// Packs `(value, width)` bit-fields into one dword, least significant field
/// first. Values wider than their field are truncated.
pub fn pack_dword(fields: &[(u32, u32)]) -> u32 {
  let mut dword = 0u32;
  let mut shift = 0u32;
  for &(value, width) in fields {
    debug_assert!(width > 0 && shift + width <= 32);
    let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
    dword |= (value & mask) << shift;
    shift += width;
  }
  dword
}

/// Four signed bytes packed into a dword, first byte lowest.
pub fn pack_i8x4(bytes: [i8; 4]) -> u32 {
  u32::from_le_bytes(bytes.map(|b| b as u8))
}

pub fn write_dwords<W: ByteWrite>(w: &mut W, dwords: &[u32]) -> io::Result<()> {
  for &dw in dwords {
    w.write::<u32>(dw)?;
  }
  Ok(())
}

pub fn write_zeros<W: ByteWrite>(w: &mut W, count: usize) -> io::Result<()> {
  const ZEROS: [u8; 64] = [0; 64];
  let mut left = count;
  while left > 0 {
    let n = left.min(ZEROS.len());
    w.write_bytes(&ZEROS[..n])?;
    left -= n;
  }
  Ok(())
}

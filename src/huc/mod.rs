// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! HuC command-initializer firmware: binary records, layout profiles and
//! the per-pass state machine.

use arrayvec::ArrayVec;
use bitstream_io::ByteWrite;

use crate::error::{Error, InvalidParameter};
use crate::util::{payload_writer, write_zeros};

pub mod cmd;
pub mod initializer;
pub mod lambda;
pub mod pool;
pub mod profile;

pub use self::cmd::*;
pub use self::initializer::*;
pub use self::pool::*;
pub use self::profile::*;

/// Terminates a second level batch written by the firmware.
pub const BATCH_BUFFER_END: u32 = 0x0500_0000;
pub const CMD_LIST_MODE: u8 = 1;
pub const CACHELINE_SIZE: usize = 64;
pub const PAGE_SIZE: usize = 4096;
/// Space reserved in the output batch for every generated command.
pub const MAX_CMD_SIZE: u32 = 256;
/// DMEM offset of the firmware parameters.
pub const HUC_DMEM_OFFSET_RTOS_GEMS: u32 = 0x2000;
/// Status bit the firmware raises to request a re-encode.
pub const REENCODE_MASK: u32 = 1 << 31;

pub const MAX_COMMANDS: usize = 50;
/// Payload capacity of one input command, in dwords.
pub const MAX_PAYLOAD_DWORDS: usize = 40;

const DMEM_RESERVED: usize = 37;
const OUTPUT_COMMAND_SIZE: usize = 8;
const INPUT_COMMAND_SIZE: usize = 4 + MAX_PAYLOAD_DWORDS * 4;

/// Size of a packed [`HucComDmem`].
pub const HUC_COM_DMEM_SIZE: usize =
  4 + 4 + 3 + DMEM_RESERVED + MAX_COMMANDS * OUTPUT_COMMAND_SIZE;
/// Size of a packed [`HucComData`].
pub const HUC_COM_DATA_SIZE: usize = 4 + MAX_COMMANDS * INPUT_COMMAND_SIZE;

/// Where the firmware writes one generated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputCommand {
  pub start_in_bytes: u16,
  pub id: u8,
  pub kind: u8,
  /// Non-zero to close the batch after this command.
  pub bb_end: u32,
}

/// DMEM header of the command initializer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HucComDmem {
  pub output_size: u32,
  pub target_usage: u8,
  pub codec: u8,
  pub frame_type: u8,
  pub output_commands: ArrayVec<OutputCommand, MAX_COMMANDS>,
}

impl HucComDmem {
  pub fn total_output_commands(&self) -> u32 {
    self.output_commands.len() as u32
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(HUC_COM_DMEM_SIZE);
    {
      let mut w = payload_writer(&mut buf);
      w.write::<u32>(self.output_size)?;
      w.write::<u32>(self.total_output_commands())?;
      w.write::<u8>(self.target_usage)?;
      w.write::<u8>(self.codec)?;
      w.write::<u8>(self.frame_type)?;
      write_zeros(&mut w, DMEM_RESERVED)?;
      for out in self.output_commands.iter() {
        w.write::<u16>(out.start_in_bytes)?;
        w.write::<u8>(out.id)?;
        w.write::<u8>(out.kind)?;
        w.write::<u32>(out.bb_end)?;
      }
      let unused = MAX_COMMANDS - self.output_commands.len();
      write_zeros(&mut w, unused * OUTPUT_COMMAND_SIZE)?;
    }
    trace!("packed DMEM with {} output commands", self.output_commands.len());
    Ok(buf)
  }
}

/// One command handed to the firmware as input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputCommand {
  pub id: u16,
  /// Payload size in the unit the firmware expects for this ID.
  pub size_of_data: u16,
  pub data: ArrayVec<u32, MAX_PAYLOAD_DWORDS>,
}

impl InputCommand {
  /// Builds a command from a dword payload.
  pub fn new(
    id: u16, size_of_data: u16, payload: &[u32],
  ) -> Result<Self, Error> {
    let mut data = ArrayVec::new();
    data.try_extend_from_slice(payload).map_err(|_| {
      InvalidParameter::PayloadSize {
        actual: payload.len() * 4,
        max: MAX_PAYLOAD_DWORDS * 4,
      }
    })?;
    Ok(InputCommand { id, size_of_data, data })
  }

  /// Builds a command from raw bytes, zero padded to whole dwords.
  pub fn from_bytes(id: u16, bytes: &[u8]) -> Result<Self, Error> {
    if bytes.len() > MAX_PAYLOAD_DWORDS * 4 {
      return Err(
        InvalidParameter::PayloadSize {
          actual: bytes.len(),
          max: MAX_PAYLOAD_DWORDS * 4,
        }
        .into(),
      );
    }
    let data = bytes
      .chunks(4)
      .map(|c| {
        let mut dw = [0u8; 4];
        dw[..c.len()].copy_from_slice(c);
        u32::from_le_bytes(dw)
      })
      .collect();
    Ok(InputCommand { id, size_of_data: bytes.len() as u16, data })
  }
}

/// Input records of the command initializer, in firmware order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HucComData {
  pub commands: ArrayVec<InputCommand, MAX_COMMANDS>,
}

impl HucComData {
  pub fn total_commands(&self) -> u32 {
    self.commands.len() as u32
  }

  pub fn push(&mut self, cmd: InputCommand) -> Result<(), Error> {
    self.commands.try_push(cmd).map_err(|_| {
      InvalidParameter::CommandCount {
        actual: MAX_COMMANDS as u32 + 1,
        expected: MAX_COMMANDS as u32,
      }
      .into()
    })
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(HUC_COM_DATA_SIZE);
    {
      let mut w = payload_writer(&mut buf);
      w.write::<u32>(self.total_commands())?;
      for cmd in self.commands.iter() {
        w.write::<u16>(cmd.id)?;
        w.write::<u16>(cmd.size_of_data)?;
        for &dw in cmd.data.iter() {
          w.write::<u32>(dw)?;
        }
        write_zeros(&mut w, (MAX_PAYLOAD_DWORDS - cmd.data.len()) * 4)?;
      }
      let unused = MAX_COMMANDS - self.commands.len();
      write_zeros(&mut w, unused * INPUT_COMMAND_SIZE)?;
    }
    Ok(buf)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use nom::number::complete::{le_u16, le_u32, le_u8};
  use nom::sequence::tuple;
  use pretty_assertions::assert_eq;

  #[test]
  fn record_sizes() {
    assert_eq!(HUC_COM_DMEM_SIZE, 448);
    assert_eq!(HUC_COM_DMEM_SIZE % CACHELINE_SIZE, 0);
    assert_eq!(HUC_COM_DATA_SIZE, 8204);
    assert_eq!(HucComDmem::default().to_bytes().unwrap().len(), 448);
    assert_eq!(HucComData::default().to_bytes().unwrap().len(), 8204);
  }

  #[test]
  fn dmem_layout() {
    let mut dmem = HucComDmem {
      output_size: 768,
      target_usage: 4,
      codec: 0,
      frame_type: 1,
      ..Default::default()
    };
    dmem.output_commands.push(OutputCommand {
      start_in_bytes: 36,
      id: 2,
      kind: 1,
      bb_end: 0,
    });
    dmem.output_commands.push(OutputCommand {
      start_in_bytes: 308,
      id: 1,
      kind: 1,
      bb_end: BATCH_BUFFER_END,
    });
    let bytes = dmem.to_bytes().unwrap();
    let (_, (size, count, tu, codec, ft)) =
      tuple((le_u32::<_, ()>, le_u32, le_u8, le_u8, le_u8))(&bytes[..])
        .unwrap();
    assert_eq!((size, count, tu, codec, ft), (768, 2, 4, 0, 1));
    let second = &bytes[48 + 8..];
    let (_, (start, id, kind, end)) =
      tuple((le_u16::<_, ()>, le_u8, le_u8, le_u32))(second).unwrap();
    assert_eq!((start, id, kind, end), (308, 1, 1, BATCH_BUFFER_END));
  }

  #[test]
  fn raw_bytes_are_padded() {
    let cmd = InputCommand::from_bytes(5, &[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(cmd.size_of_data, 5);
    assert_eq!(&cmd.data[..], &[0x0403_0201, 5]);
    assert!(InputCommand::from_bytes(5, &[0; 161]).is_err());
    assert!(InputCommand::new(1, 41, &[0; 41]).is_err());
  }
}

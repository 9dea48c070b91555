// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use arrayvec::ArrayVec;

use super::*;
use crate::config::SessionConfig;
use crate::error::{Error, InvalidParameter};
use crate::params::*;
use crate::provider::*;

/// Progress of the command initializer through one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerState {
  Idle,
  ConstDataBuilt,
  DmemBuilt,
  /// Reported for slots whose work is still owned by the GPU.
  Dispatched,
}

/// Parameters of one `set_const_data` call. Absent inputs are reported as
/// `NullParameter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstDataInput<'a> {
  pub sequence: Option<&'a SequenceParameters>,
  pub picture: Option<&'a PictureParameters>,
  pub slice: Option<&'a SliceParameters>,
}

/// A buffer to buffer copy executed by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyParams {
  pub src: BufferHandle,
  pub dst: BufferHandle,
  pub size: u32,
  pub length_of_table: u16,
  pub frame_type: FrameType,
}

/// Size of the VP9 Cmd2 block in the output batch.
pub const VP9_CMD2_SIZE: u32 = 256;
/// Start of the VP9 Cmd1 block in the output batch.
pub const VP9_CMD1_START: u16 = 544;

/// Builds and dispatches the command-initializer firmware, one
/// `(ring, pass)` slot at a time.
pub struct CommandInitializer {
  profile: &'static dyn FirmwareLayoutProfile,
  config: SessionConfig,
  pool: SlotPool,
  state: InitializerState,
  ring: usize,
  pass: usize,
  data: HucComData,
  frame_type: FrameType,
  target_usage: u8,
  dynamic_scaling: bool,
}

impl CommandInitializer {
  /// Allocates the slot pool for the session.
  pub fn new<P: ResourceProvider + ?Sized>(
    config: SessionConfig, provider: &mut P, dynamic_scaling: bool,
  ) -> Result<Self, Error> {
    config.validate()?;
    let pool = SlotPool::allocate(
      provider,
      config.ring_size,
      config.max_passes(),
      config.copy_batch_size,
      dynamic_scaling && config.codec == CodecKind::VP9,
    )?;
    Ok(CommandInitializer {
      profile: layout_profile(config.generation),
      config,
      pool,
      state: InitializerState::Idle,
      ring: 0,
      pass: 0,
      data: HucComData::default(),
      frame_type: FrameType::I,
      target_usage: 4,
      dynamic_scaling: false,
    })
  }

  pub fn state(&self) -> InitializerState {
    self.state
  }

  pub fn pool(&self) -> &SlotPool {
    &self.pool
  }

  pub fn profile(&self) -> &'static dyn FirmwareLayoutProfile {
    self.profile
  }

  /// State of one slot.
  pub fn slot_state(&self, ring: usize, pass: usize) -> InitializerState {
    if self.pool.is_in_flight(SlotKind::Initializer, ring, pass) {
      InitializerState::Dispatched
    } else if (ring, pass) == (self.ring, self.pass) {
      self.state
    } else {
      InitializerState::Idle
    }
  }

  fn require(
    &self, op: &'static str, state: InitializerState,
  ) -> Result<(), InvalidParameter> {
    if self.state != state {
      return Err(InvalidParameter::Transition { op, state: self.state });
    }
    Ok(())
  }

  /// Current slot buffers, or the dynamic scaling pair when it is in use.
  fn target_buffers(&self) -> Result<SlotBuffers, Error> {
    if self.dynamic_scaling {
      if let Some(dys) = self.pool.dynamic_scaling_buffers() {
        return Ok(dys);
      }
    }
    Ok(self.pool.buffers(SlotKind::Initializer, self.ring, self.pass)?)
  }

  /// Builds Cmd1 and Cmd2 for the slot `(ring, pass)`.
  ///
  /// A slot dispatched earlier is only rebuilt with the completed fence of
  /// that dispatch.
  pub fn set_const_data<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, input: ConstDataInput<'_>, flags: CmdFlags,
    ring: usize, pass: usize, completed: Option<CompletedFence>,
  ) -> Result<(), Error> {
    self.require("set_const_data", InitializerState::Idle)?;
    let seq = input.sequence.ok_or(Error::NullParameter("sequence"))?;
    let pic = input.picture.ok_or(Error::NullParameter("picture"))?;

    let codec = self.config.codec;
    let mut data = HucComData::default();
    match codec {
      CodecKind::HEVC => {
        let slice = input.slice.ok_or(Error::NullParameter("slice"))?;
        let cmd2 = Cmd2::hevc(pic, slice, flags, self.profile);
        let cmd1 = Cmd1::hevc(seq, pic, slice, flags, self.profile)?;
        data.push(cmd2.to_input_command()?)?;
        data.push(cmd1.to_input_command()?)?;
        self.target_usage = seq.target_usage;
      }
      CodecKind::VP9 => {
        let cmd2 = Cmd2::vp9(pic)?;
        let cmd1 = Cmd1::vp9(seq, pic, flags)?;
        data.push(cmd2.to_input_command()?)?;
        data.push(cmd1.to_input_command()?)?;
        self.target_usage = seq.target_usage;
      }
      CodecKind::VP8 => return Err(InvalidParameter::Codec(codec).into()),
    }

    self.pool.acquire(SlotKind::Initializer, ring, pass, completed)?;
    self.ring = ring;
    self.pass = pass;
    self.frame_type = pic.frame_type;
    self.dynamic_scaling = codec == CodecKind::VP9 && seq.dynamic_scaling;
    let bufs = self.target_buffers()?;
    write_buffer(provider, bufs.data, &data.to_bytes()?)?;
    debug!(
      "built {} commands for slot ({}, {}), {} frame",
      data.total_commands(),
      ring,
      pass,
      pic.frame_type
    );
    self.data = data;
    self.state = InitializerState::ConstDataBuilt;
    Ok(())
  }

  /// Abandons a slot that was built but not executed and returns to
  /// `Idle`. The slot itself was never handed to the GPU and is free.
  pub fn abort(&mut self) {
    if self.state != InitializerState::Idle {
      debug!(
        "abandoned slot ({}, {}) in {:?}",
        self.ring, self.pass, self.state
      );
    }
    self.state = InitializerState::Idle;
    self.data = HucComData::default();
  }

  /// Frees the slot of an executed pass whose command buffer could not be
  /// submitted.
  ///
  /// # Errors
  ///
  /// Returns `StaleFence` if `fence` is not the latest dispatch of its
  /// slot.
  pub fn release(&mut self, fence: GpuFence) -> Result<(), Error> {
    debug!("released unsubmitted slot ({}, {})", fence.ring(), fence.pass());
    Ok(self.pool.release(fence)?)
  }

  /// Appends a raw command record, such as the PIC_STATE block. `bytes` is
  /// copied verbatim and its size recorded in bytes.
  pub fn add_cmd_const_data<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, id: u16, bytes: &[u8],
  ) -> Result<(), Error> {
    self.require("add_cmd_const_data", InitializerState::ConstDataBuilt)?;
    self.data.push(InputCommand::from_bytes(id, bytes)?)?;
    let bufs = self.target_buffers()?;
    write_buffer(provider, bufs.data, &self.data.to_bytes()?)?;
    trace!("appended command {} with {} bytes", id, bytes.len());
    Ok(())
  }

  /// Builds the DMEM header describing where each command lands in the
  /// output batch.
  pub fn set_dmem<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, brc_enabled: bool,
  ) -> Result<(), Error> {
    self.require("set_dmem", InitializerState::ConstDataBuilt)?;
    let dmem = match self.config.codec {
      CodecKind::HEVC => self.hevc_dmem(brc_enabled)?,
      CodecKind::VP9 => self.vp9_dmem()?,
      codec => return Err(InvalidParameter::Codec(codec).into()),
    };
    let bufs = self.target_buffers()?;
    write_buffer(provider, bufs.dmem, &dmem.to_bytes()?)?;
    self.state = InitializerState::DmemBuilt;
    Ok(())
  }

  fn hevc_dmem(&self, brc_enabled: bool) -> Result<HucComDmem, Error> {
    let expected = self.profile.command_count();
    if self.data.total_commands() != expected {
      return Err(
        InvalidParameter::CommandCount {
          actual: self.data.total_commands(),
          expected,
        }
        .into(),
      );
    }
    let mut outputs = ArrayVec::new();
    outputs.push(OutputCommand {
      start_in_bytes: self.profile.cmd1_offset(brc_enabled),
      id: CMD2_ID as u8,
      kind: 1,
      bb_end: 0,
    });
    outputs.push(OutputCommand {
      start_in_bytes: self.profile.cmd2_offset(brc_enabled),
      id: CMD1_ID as u8,
      kind: 1,
      bb_end: BATCH_BUFFER_END,
    });
    if let Some(start) = self.profile.cmd5_offset(brc_enabled) {
      outputs.push(OutputCommand {
        start_in_bytes: start,
        id: CMD5_ID as u8,
        kind: 1,
        bb_end: 0,
      });
    }
    Ok(HucComDmem {
      output_size: outputs.len() as u32 * MAX_CMD_SIZE,
      target_usage: self.target_usage,
      codec: 0,
      frame_type: self.frame_type.dmem_frame_type(),
      output_commands: outputs,
    })
  }

  fn vp9_dmem(&self) -> Result<HucComDmem, Error> {
    if self.data.total_commands() != 2 {
      return Err(
        InvalidParameter::CommandCount {
          actual: self.data.total_commands(),
          expected: 2,
        }
        .into(),
      );
    }
    let mut outputs = ArrayVec::new();
    outputs.push(OutputCommand {
      start_in_bytes: 0,
      id: CMD2_ID as u8,
      kind: 1,
      bb_end: 0,
    });
    outputs.push(OutputCommand {
      start_in_bytes: VP9_CMD1_START,
      id: CMD1_ID as u8,
      kind: 1,
      bb_end: 0,
    });
    Ok(HucComDmem {
      output_size: VP9_CMD1_START as u32 + VP9_CMD2_SIZE,
      target_usage: self.target_usage,
      codec: 1,
      frame_type: !self.frame_type.is_intra() as u8,
      output_commands: outputs,
    })
  }

  /// Appends the firmware invocation to `cmds` and hands the slot to the
  /// GPU. `output` receives the generated second level batch.
  pub fn execute(
    &mut self, cmds: &mut CommandBuffer, output: BufferHandle,
  ) -> Result<GpuFence, Error> {
    self.require("execute", InitializerState::DmemBuilt)?;
    let bufs = self.target_buffers()?;
    let mut regions = ArrayVec::new();
    regions.push(Region {
      index: 0,
      buffer: bufs.data,
      offset: 0,
      writable: false,
    });
    regions.push(Region { index: 1, buffer: output, offset: 0, writable: true });
    self.emit(cmds, bufs.dmem, regions);

    let fence = self.pool.dispatch(SlotKind::Initializer, self.ring, self.pass)?;
    debug!("dispatched slot ({}, {})", self.ring, self.pass);
    self.state = InitializerState::Idle;
    Ok(fence)
  }

  fn emit(
    &self, cmds: &mut CommandBuffer, dmem: BufferHandle,
    regions: ArrayVec<Region, MAX_REGIONS>,
  ) {
    cmds.push(HucCommand::ImemState {
      kernel_descriptor: self.config.kernel_descriptor,
    });
    cmds.push(HucCommand::PipeModeSelect {
      codec: self.config.codec,
      stream_out: false,
    });
    cmds.push(HucCommand::DmemState {
      source: dmem,
      length: DMEM_BUFFER_SIZE as u32,
      dmem_offset: HUC_DMEM_OFFSET_RTOS_GEMS,
    });
    cmds.push(HucCommand::VirtualAddrState { regions });
    cmds.push(HucCommand::Start { last_stream_object: true });
    cmds.push(HucCommand::VdPipelineFlush {
      flush_hevc: true,
      wait_done_hevc: true,
    });
    cmds.push(HucCommand::MiFlush { video_pipeline_cache_invalidate: true });
  }

  /// Builds the copy DMEM and data records and appends the copy invocation
  /// to `cmds`. Copy slots are tracked apart from the initializer slots.
  pub fn add_copy_cmds<P: ResourceProvider + ?Sized>(
    &mut self, provider: &mut P, cmds: &mut CommandBuffer, params: CopyParams,
    ring: usize, pass: usize, completed: Option<CompletedFence>,
  ) -> Result<GpuFence, Error> {
    let src = provider.gpu_address(params.src)?;
    let dst = provider.gpu_address(params.dst)?;
    let bufs = self.pool.acquire(SlotKind::Copy, ring, pass, completed)?;

    let mut dmem = HucComDmem {
      output_size: self.config.copy_batch_size,
      frame_type: params.frame_type.dmem_frame_type(),
      ..Default::default()
    };
    dmem.output_commands.push(OutputCommand {
      start_in_bytes: 0,
      id: CMD3_ID as u8,
      kind: 1,
      bb_end: BATCH_BUFFER_END,
    });
    write_buffer(provider, bufs.dmem, &dmem.to_bytes()?)?;

    let cmd3 = Cmd3::new(
      src,
      dst,
      params.size,
      params.length_of_table,
      self.config.content_protection,
    );
    let mut data = HucComData::default();
    data.push(cmd3.to_input_command()?)?;
    write_buffer(provider, bufs.data, &data.to_bytes()?)?;

    let copy_batch = self.pool.copy_batch();
    let mut regions = ArrayVec::new();
    regions.push(Region {
      index: 0,
      buffer: bufs.data,
      offset: 0,
      writable: false,
    });
    regions.push(Region {
      index: 1,
      buffer: copy_batch,
      offset: 0,
      writable: true,
    });
    self.emit(cmds, bufs.dmem, regions);
    cmds.push(HucCommand::BatchBufferStart { buffer: copy_batch });
    cmds.push(HucCommand::MfxWait);

    trace!("copy of {} bytes queued on slot ({}, {})", params.size, ring, pass);
    Ok(self.pool.dispatch(SlotKind::Copy, ring, pass)?)
  }
}

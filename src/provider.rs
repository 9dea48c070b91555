// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! The boundary between the rate control core and the platform.
//!
//! Buffers are allocated, mapped and submitted through a [`ResourceProvider`].
//! GPU commands are modelled as typed [`HucCommand`] values; encoding them
//! into hardware instructions is up to the provider.

use arrayvec::ArrayVec;

use crate::error::{Error, InvalidParameter};
use crate::params::CodecKind;

/// Status code reported when a buffer cannot be allocated.
pub const STATUS_NO_SPACE: i32 = -12;
/// Status code reported when a buffer cannot be mapped.
pub const STATUS_LOCK_FAILED: i32 = -14;
/// Status code reported for an unknown handle.
pub const STATUS_INVALID_HANDLE: i32 = -22;
/// Status code reported when a command buffer is rejected.
pub const STATUS_SUBMIT_FAILED: i32 = -5;

/// Opaque reference to a device visible buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmitFlags {
  /// Submit without rendering, as used by null hardware.
  pub null_rendering: bool,
}

/// One virtual address region handed to the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
  pub index: u8,
  pub buffer: BufferHandle,
  pub offset: u32,
  pub writable: bool,
}

/// Maximum number of virtual address regions per firmware invocation.
pub const MAX_REGIONS: usize = 16;

/// A typed GPU command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HucCommand {
  /// Load the firmware image selected by `kernel_descriptor`.
  ImemState { kernel_descriptor: u32 },
  PipeModeSelect { codec: CodecKind, stream_out: bool },
  /// Copy `length` bytes of `source` into firmware data memory.
  DmemState { source: BufferHandle, length: u32, dmem_offset: u32 },
  VirtualAddrState { regions: ArrayVec<Region, MAX_REGIONS> },
  Start { last_stream_object: bool },
  VdPipelineFlush { flush_hevc: bool, wait_done_hevc: bool },
  MiFlush { video_pipeline_cache_invalidate: bool },
  BatchBufferStart { buffer: BufferHandle },
  MfxWait,
}

/// An ordered list of commands for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandBuffer {
  cmds: Vec<HucCommand>,
}

impl CommandBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, cmd: HucCommand) {
    self.cmds.push(cmd);
  }

  pub fn len(&self) -> usize {
    self.cmds.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cmds.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &HucCommand> {
    self.cmds.iter()
  }

  pub fn as_slice(&self) -> &[HucCommand] {
    &self.cmds
  }

  pub fn clear(&mut self) {
    self.cmds.clear();
  }
}

/// Platform services used by the core.
///
/// Every call may fail with [`Error::ResourceError`]. Waiting for the GPU
/// reports a hang as [`Error::GpuHangOrTimeout`].
pub trait ResourceProvider {
  fn allocate_buffer(
    &mut self, size: usize, name: &str,
  ) -> Result<BufferHandle, Error>;

  /// Maps the buffer for CPU access until [`unlock`](Self::unlock).
  fn lock(&mut self, handle: BufferHandle) -> Result<&mut [u8], Error>;

  fn unlock(&mut self, handle: BufferHandle) -> Result<(), Error>;

  fn submit_command_buffer(
    &mut self, cmds: &CommandBuffer, flags: SubmitFlags,
  ) -> Result<(), Error>;

  /// Blocks until all submitted work has retired.
  fn wait_idle(&mut self) -> Result<(), Error>;

  fn gpu_address(&self, handle: BufferHandle) -> Result<u64, Error>;
}

/// Copies `data` to the start of the buffer. The buffer is unlocked even
/// when the copy fails.
pub fn write_buffer<P: ResourceProvider + ?Sized>(
  provider: &mut P, handle: BufferHandle, data: &[u8],
) -> Result<(), Error> {
  let buf = provider.lock(handle)?;
  let max = buf.len();
  let res = match buf.get_mut(..data.len()) {
    Some(dst) => {
      dst.copy_from_slice(data);
      Ok(())
    }
    None => Err(
      InvalidParameter::PayloadSize { actual: data.len(), max }.into(),
    ),
  };
  provider.unlock(handle)?;
  res
}

/// Runs `f` over the mapped contents of the buffer.
pub fn read_buffer<P: ResourceProvider + ?Sized, T>(
  provider: &mut P, handle: BufferHandle, f: impl FnOnce(&[u8]) -> T,
) -> Result<T, Error> {
  let buf = provider.lock(handle)?;
  let res = f(buf);
  provider.unlock(handle)?;
  Ok(res)
}

#[derive(Debug)]
struct Allocation {
  name: String,
  data: Vec<u8>,
  locked: bool,
}

/// In-memory provider that records every submission.
///
/// Faults can be injected to exercise the error paths of the core.
#[derive(Debug, Default)]
pub struct RecordingProvider {
  buffers: Vec<Allocation>,
  submissions: Vec<CommandBuffer>,
  fail_alloc_after: Option<usize>,
  fail_lock: Option<BufferHandle>,
  fail_submit: bool,
  hang: bool,
  waits: usize,
}

const GPU_BASE: u64 = 0x1_0000_0000;

impl RecordingProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every allocation after the first `count` fail.
  pub fn fail_allocations_after(&mut self, count: usize) {
    self.fail_alloc_after = Some(count);
  }

  pub fn fail_lock(&mut self, handle: Option<BufferHandle>) {
    self.fail_lock = handle;
  }

  /// Makes the next submission fail before it reaches the GPU.
  pub fn fail_next_submit(&mut self) {
    self.fail_submit = true;
  }

  /// Makes the next wait report a hang.
  pub fn inject_hang(&mut self) {
    self.hang = true;
  }

  pub fn submissions(&self) -> &[CommandBuffer] {
    &self.submissions
  }

  pub fn waits(&self) -> usize {
    self.waits
  }

  pub fn allocations(&self) -> usize {
    self.buffers.len()
  }

  /// Contents of a buffer without locking it.
  pub fn contents(&self, handle: BufferHandle) -> Option<&[u8]> {
    self.buffers.get(handle.0 as usize).map(|b| b.data.as_slice())
  }

  pub fn name(&self, handle: BufferHandle) -> Option<&str> {
    self.buffers.get(handle.0 as usize).map(|b| b.name.as_str())
  }

  fn get_mut(
    &mut self, handle: BufferHandle, op: &'static str,
  ) -> Result<&mut Allocation, Error> {
    self
      .buffers
      .get_mut(handle.0 as usize)
      .ok_or(Error::ResourceError { op, code: STATUS_INVALID_HANDLE })
  }
}

impl ResourceProvider for RecordingProvider {
  fn allocate_buffer(
    &mut self, size: usize, name: &str,
  ) -> Result<BufferHandle, Error> {
    if self.fail_alloc_after.map_or(false, |n| self.buffers.len() >= n) {
      return Err(Error::ResourceError {
        op: "allocate buffer",
        code: STATUS_NO_SPACE,
      });
    }
    let handle = BufferHandle(self.buffers.len() as u32);
    trace!("allocated {} bytes for {} as {:?}", size, name, handle);
    self.buffers.push(Allocation {
      name: name.to_owned(),
      data: vec![0; size],
      locked: false,
    });
    Ok(handle)
  }

  fn lock(&mut self, handle: BufferHandle) -> Result<&mut [u8], Error> {
    if self.fail_lock == Some(handle) {
      return Err(Error::ResourceError { op: "lock", code: STATUS_LOCK_FAILED });
    }
    let alloc = self.get_mut(handle, "lock")?;
    if alloc.locked {
      return Err(Error::ResourceError { op: "lock", code: STATUS_LOCK_FAILED });
    }
    alloc.locked = true;
    Ok(&mut alloc.data)
  }

  fn unlock(&mut self, handle: BufferHandle) -> Result<(), Error> {
    self.get_mut(handle, "unlock")?.locked = false;
    Ok(())
  }

  fn submit_command_buffer(
    &mut self, cmds: &CommandBuffer, _flags: SubmitFlags,
  ) -> Result<(), Error> {
    if self.fail_submit {
      self.fail_submit = false;
      return Err(Error::ResourceError {
        op: "submit",
        code: STATUS_SUBMIT_FAILED,
      });
    }
    self.submissions.push(cmds.clone());
    Ok(())
  }

  fn wait_idle(&mut self) -> Result<(), Error> {
    self.waits += 1;
    if self.hang {
      self.hang = false;
      return Err(Error::GpuHangOrTimeout);
    }
    Ok(())
  }

  fn gpu_address(&self, handle: BufferHandle) -> Result<u64, Error> {
    if (handle.0 as usize) < self.buffers.len() {
      Ok(GPU_BASE + ((handle.0 as u64) << 20))
    } else {
      Err(Error::ResourceError {
        op: "query address",
        code: STATUS_INVALID_HANDLE,
      })
    }
  }
}

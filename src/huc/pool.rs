// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Per `(ring, pass)` DMEM and data buffers, and the fences that guard their
//! reuse.

use super::{CACHELINE_SIZE, HUC_COM_DATA_SIZE, HUC_COM_DMEM_SIZE, PAGE_SIZE};
use crate::error::{Error, InvalidParameter};
use crate::provider::{BufferHandle, ResourceProvider};
use crate::util::align_ceil;

/// Bytes allocated for a DMEM record.
pub const DMEM_BUFFER_SIZE: usize = align_ceil(HUC_COM_DMEM_SIZE, CACHELINE_SIZE);
/// Bytes allocated for a data record.
pub const DATA_BUFFER_SIZE: usize = align_ceil(HUC_COM_DATA_SIZE, PAGE_SIZE);

/// Which set of slot buffers a fence guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
  Initializer,
  Copy,
}

/// Outstanding GPU work on one slot.
///
/// The slot cannot be rebuilt until the fence has been waited on and the
/// resulting [`CompletedFence`] handed back.
#[must_use = "a slot stays busy until its fence is waited on"]
#[derive(Debug, PartialEq, Eq)]
pub struct GpuFence {
  kind: SlotKind,
  ring: usize,
  pass: usize,
  seq: u64,
}

impl GpuFence {
  pub const fn ring(&self) -> usize {
    self.ring
  }

  pub const fn pass(&self) -> usize {
    self.pass
  }

  pub const fn kind(&self) -> SlotKind {
    self.kind
  }

  /// Blocks until the GPU has retired the work.
  ///
  /// # Errors
  ///
  /// Returns `GpuHangOrTimeout` if the GPU does not complete the work.
  pub fn wait<P: ResourceProvider + ?Sized>(
    self, provider: &mut P,
  ) -> Result<CompletedFence, Error> {
    provider.wait_idle()?;
    Ok(CompletedFence {
      kind: self.kind,
      ring: self.ring,
      pass: self.pass,
      seq: self.seq,
    })
  }
}

/// Proof that the work guarded by a [`GpuFence`] has retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedFence {
  kind: SlotKind,
  ring: usize,
  pass: usize,
  seq: u64,
}

impl CompletedFence {
  pub const fn ring(&self) -> usize {
    self.ring
  }

  pub const fn pass(&self) -> usize {
    self.pass
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBuffers {
  pub dmem: BufferHandle,
  pub data: BufferHandle,
}

#[derive(Debug)]
struct SlotSet {
  buffers: Vec<SlotBuffers>,
  in_flight: Vec<Option<u64>>,
}

impl SlotSet {
  fn allocate<P: ResourceProvider + ?Sized>(
    provider: &mut P, count: usize, dmem_name: &str, data_name: &str,
  ) -> Result<Self, Error> {
    let mut buffers = Vec::with_capacity(count);
    for _ in 0..count {
      let dmem = provider.allocate_buffer(DMEM_BUFFER_SIZE, dmem_name)?;
      let data = provider.allocate_buffer(DATA_BUFFER_SIZE, data_name)?;
      buffers.push(SlotBuffers { dmem, data });
    }
    Ok(SlotSet { buffers, in_flight: vec![None; count] })
  }
}

/// Fixed ring of slot buffers, allocated once.
#[derive(Debug)]
pub struct SlotPool {
  ring_size: usize,
  passes: usize,
  initializer: SlotSet,
  copy: SlotSet,
  copy_batch: BufferHandle,
  dys: Option<SlotBuffers>,
  next_seq: u64,
}

impl SlotPool {
  /// Allocates `ring_size * passes` slots for the initializer and for the
  /// copy command, the copy batch and, with `dynamic_scaling`, the extra
  /// VP9 buffer pair.
  pub fn allocate<P: ResourceProvider + ?Sized>(
    provider: &mut P, ring_size: usize, passes: usize, copy_batch_size: u32,
    dynamic_scaling: bool,
  ) -> Result<Self, Error> {
    let count = ring_size * passes;
    let initializer = SlotSet::allocate(
      provider,
      count,
      "VDEnc CmdInitializer Dmem Buffer",
      "VDEnc CmdInitializer Data Buffer",
    )?;
    let copy = SlotSet::allocate(
      provider,
      count,
      "VDEnc CmdInitializer Copy Dmem Buffer",
      "VDEnc CmdInitializer Copy Data Buffer",
    )?;
    let copy_batch = provider
      .allocate_buffer(copy_batch_size as usize, "VDEnc Copy Batch Buffer")?;
    let dys = if dynamic_scaling {
      Some(SlotBuffers {
        dmem: provider.allocate_buffer(
          DMEM_BUFFER_SIZE,
          "VDEnc CmdInitializer DysScaling Dmem Buffer",
        )?,
        data: provider.allocate_buffer(
          DATA_BUFFER_SIZE,
          "VDEnc CmdInitializer DysScaling Data Buffer",
        )?,
      })
    } else {
      None
    };
    debug!("allocated {} command initializer slots", count);
    Ok(SlotPool {
      ring_size,
      passes,
      initializer,
      copy,
      copy_batch,
      dys,
      next_seq: 0,
    })
  }

  pub const fn ring_size(&self) -> usize {
    self.ring_size
  }

  pub const fn passes(&self) -> usize {
    self.passes
  }

  pub const fn copy_batch(&self) -> BufferHandle {
    self.copy_batch
  }

  pub const fn dynamic_scaling_buffers(&self) -> Option<SlotBuffers> {
    self.dys
  }

  fn index(&self, ring: usize, pass: usize) -> Result<usize, InvalidParameter> {
    if ring >= self.ring_size {
      return Err(InvalidParameter::RingIndex {
        index: ring,
        max: self.ring_size,
      });
    }
    if pass >= self.passes {
      return Err(InvalidParameter::Pass { pass, max: self.passes });
    }
    Ok(ring * self.passes + pass)
  }

  fn set(&self, kind: SlotKind) -> &SlotSet {
    match kind {
      SlotKind::Initializer => &self.initializer,
      SlotKind::Copy => &self.copy,
    }
  }

  fn set_mut(&mut self, kind: SlotKind) -> &mut SlotSet {
    match kind {
      SlotKind::Initializer => &mut self.initializer,
      SlotKind::Copy => &mut self.copy,
    }
  }

  pub fn buffers(
    &self, kind: SlotKind, ring: usize, pass: usize,
  ) -> Result<SlotBuffers, InvalidParameter> {
    let idx = self.index(ring, pass)?;
    Ok(self.set(kind).buffers[idx])
  }

  pub fn is_in_flight(&self, kind: SlotKind, ring: usize, pass: usize) -> bool {
    self
      .index(ring, pass)
      .map_or(false, |idx| self.set(kind).in_flight[idx].is_some())
  }

  /// Claims a slot for CPU writes.
  ///
  /// A slot still owned by the GPU is released only by the completed fence
  /// of its own submission.
  pub fn acquire(
    &mut self, kind: SlotKind, ring: usize, pass: usize,
    completed: Option<CompletedFence>,
  ) -> Result<SlotBuffers, InvalidParameter> {
    let idx = self.index(ring, pass)?;
    let set = self.set_mut(kind);
    if let Some(seq) = set.in_flight[idx] {
      match completed {
        None => return Err(InvalidParameter::SlotBusy { ring, pass }),
        Some(f)
          if f.kind != kind || f.ring != ring || f.pass != pass || f.seq != seq =>
        {
          return Err(InvalidParameter::StaleFence { ring, pass })
        }
        Some(_) => set.in_flight[idx] = None,
      }
    }
    Ok(set.buffers[idx])
  }

  /// Frees a slot whose submission never reached the GPU.
  ///
  /// Only the fence of the latest dispatch on the slot releases it.
  pub fn release(&mut self, fence: GpuFence) -> Result<(), InvalidParameter> {
    let idx = self.index(fence.ring, fence.pass)?;
    let set = self.set_mut(fence.kind);
    if set.in_flight[idx] != Some(fence.seq) {
      return Err(InvalidParameter::StaleFence {
        ring: fence.ring,
        pass: fence.pass,
      });
    }
    set.in_flight[idx] = None;
    Ok(())
  }

  /// Hands the slot to the GPU.
  pub fn dispatch(
    &mut self, kind: SlotKind, ring: usize, pass: usize,
  ) -> Result<GpuFence, InvalidParameter> {
    let idx = self.index(ring, pass)?;
    let seq = self.next_seq;
    self.next_seq += 1;
    self.set_mut(kind).in_flight[idx] = Some(seq);
    Ok(GpuFence { kind, ring, pass, seq })
  }
}

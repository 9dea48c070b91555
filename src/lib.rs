// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! Bit-rate control and HuC command-initializer core for GPU video
//! encoders.
//!
//! The crate computes everything the BRC firmware and kernels of an HEVC,
//! VP9 or VP8 encoder consume: constant tables, the rate control session,
//! packed DMEM and CURBE payloads and the command-initializer firmware
//! invocations. Device memory and command submission go through a
//! [`ResourceProvider`](provider::ResourceProvider).
//!
//! ```
//! use hucbrc::prelude::*;
//!
//! let mut provider = RecordingProvider::new();
//! let config = SessionConfig::new(Generation::G11, CodecKind::HEVC);
//! let mut session = EncodeSession::new(config, &mut provider, false)?;
//!
//! let seq = SequenceParameters::new(1280, 720)
//!   .with_bitrate(2_000_000, 2_000_000);
//! let pic = PictureParameters::new(FrameType::I, 30);
//! let slice = SliceParameters::new(SliceType::I);
//! let input = FrameInput { slice: Some(&slice), pic_state: None };
//! let report =
//!   session.encode_frame(&mut provider, &seq, &pic, input, |p, pass| {
//!     write_buffer(p, pass.stats, &8_000u32.to_le_bytes())
//!   })?;
//! assert_eq!(report.passes, 1);
//! # Ok::<(), hucbrc::Error>(())
//! ```

#![deny(bare_trait_objects)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_ptr_alignment)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod huc;
pub mod packers;
pub mod params;
pub mod provider;
pub mod rate;
pub mod session;
pub mod tables;
pub mod util;

pub use crate::config::{Generation, SessionConfig};
pub use crate::error::{Error, InvalidParameter};
pub use crate::session::EncodeSession;

/// Commonly used types and traits.
pub mod prelude {
  pub use crate::config::*;
  pub use crate::error::{Error, InvalidParameter};
  pub use crate::huc::{
    CmdFlags, CommandInitializer, ConstDataInput, CopyParams,
    FirmwareLayoutProfile,
  };
  pub use crate::packers::BrcPayload;
  pub use crate::params::*;
  pub use crate::provider::{
    read_buffer, write_buffer, BufferHandle, RecordingProvider,
    ResourceProvider,
  };
  pub use crate::rate::{
    InitMode, PassStats, RateControlSession, UpdateDecision,
  };
  pub use crate::session::*;
  pub use crate::tables::{build_constant_table, ConstantTableSet};
}

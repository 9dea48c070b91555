// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

#![deny(bare_trait_objects)]

#[macro_use]
extern crate log;

mod common;
mod error;

use crate::common::*;
use crate::error::*;
use hucbrc::prelude::*;
use itertools::Itertools;

use std::process::exit;
use std::str::FromStr;

/// Frame size produced by the synthetic PAK stage.
///
/// A frame at the reference QP spends its budget, and every six QP steps
/// halve or double it. Intra frames cost three times as much.
fn synthetic_frame_bytes(
  codec: CodecKind, budget_bits: f64, frame_type: FrameType, qp: i32,
) -> u32 {
  let scale = codec.max_qp() as f64 / HEVC_MAX_QP as f64;
  let reference = 30.0 * scale;
  let steps = (reference - qp as f64) / scale / 6.0;
  let mut bits = budget_bits * steps.exp2();
  if frame_type.is_intra() {
    bits *= 3.0;
  }
  (bits / 8.0).clamp(1.0, u32::MAX as f64) as u32
}

fn frame_type(seq: &SequenceParameters, frame: usize) -> FrameType {
  if seq.gop_size <= 1 || frame % seq.gop_size as usize == 0 {
    FrameType::I
  } else {
    FrameType::P
  }
}

fn hex(bytes: &[u8]) -> String {
  bytes.iter().map(|b| format!("{:02x}", b)).join("")
}

fn dump<P: ResourceProvider>(
  provider: &mut P, name: &'static str, handle: BufferHandle,
) -> Result<(), CliError> {
  let line = read_buffer(provider, handle, hex)
    .map_err(|err| CliError::Dump { name, err })?;
  println!("{} {}", name, line);
  Ok(())
}

fn run() -> Result<(), CliError> {
  let cli = parse_cli()?;
  let mut provider = RecordingProvider::new();
  let dynamic_scaling = cli.sequence.dynamic_scaling;
  let mut session =
    EncodeSession::new(cli.config, &mut provider, dynamic_scaling)
      .map_err(CliError::Session)?;
  let codec = cli.config.codec;
  let budget =
    cli.sequence.target_bitrate as f64 / cli.sequence.frame_rate.as_f64();

  let mut total_bits = 0u64;
  let mut total_qp = 0i64;
  let mut total_passes = 0;
  for frame in 0..cli.frames {
    let frame_type = frame_type(&cli.sequence, frame);
    let mut pic = PictureParameters::new(frame_type, cli.qp);
    pic.curr_poc = frame as i32;
    if frame_type == FrameType::P {
      pic.vp8.ref_frame_ctrl = 1;
    }
    let slice = SliceParameters::new(frame_type.into());
    let input = FrameInput { slice: Some(&slice), pic_state: None };

    let mut frame_bytes = 0;
    let report = session
      .encode_frame(&mut provider, &cli.sequence, &pic, input, |p, pass| {
        frame_bytes =
          synthetic_frame_bytes(codec, budget, pass.frame_type, pass.qp);
        let stats =
          PassStats { frame_size_bytes: frame_bytes, ..Default::default() };
        write_buffer(p, pass.stats, &stats.to_bytes())
      })
      .map_err(|err| CliError::Frame { frame, frame_type, err })?;

    total_bits += frame_bytes as u64 * 8;
    total_qp += report.qp as i64;
    total_passes += report.passes;
    info!(
      "frame {} {}: qp {} in {} passes, {} bytes{}",
      frame,
      report.frame_type,
      report.qp,
      report.passes,
      frame_bytes,
      if report.panic { ", panic" } else { "" }
    );
    println!(
      "{} {} {} {} {}",
      frame, report.frame_type, report.qp, report.passes, frame_bytes
    );
    if cli.dump {
      let buffers = session.buffers();
      if frame == 0 {
        dump(&mut provider, "init", buffers.init)?;
      }
      dump(&mut provider, "update", buffers.update)?;
    }
  }

  if cli.frames > 0 {
    let seconds = cli.frames as f64 / cli.sequence.frame_rate.as_f64();
    eprintln!(
      "{} frames, {} passes, {:.0} bps, average qp {:.2}",
      cli.frames,
      total_passes,
      total_bits as f64 / seconds,
      total_qp as f64 / cli.frames as f64
    );
  }
  Ok(())
}

fn main() {
  init_logger();

  run().unwrap_or_else(|e| {
    error::print_error(&e);
    exit(1);
  });
}

fn init_logger() {
  fn level_colored(l: log::Level) -> console::StyledObject<&'static str> {
    use console::style;
    use log::Level;
    match l {
      Level::Trace => style("??").dim(),
      Level::Debug => style("? ").dim(),
      Level::Info => style("> ").green(),
      Level::Warn => style("! ").yellow(),
      Level::Error => style("!!").red(),
    }
  }

  let level = std::env::var("HUCBRC_LOG")
    .ok()
    .and_then(|l| log::LevelFilter::from_str(&l).ok())
    .unwrap_or(log::LevelFilter::Info);

  let res = fern::Dispatch::new()
    .format(move |out, message, record| {
      out.finish(format_args!(
        "{level} {message}",
        level = level_colored(record.level()),
        message = message,
      ));
    })
    .level(log::LevelFilter::Warn)
    .level_for("hucbrc", level)
    .chain(std::io::stderr())
    .apply();
  if let Err(e) = res {
    eprintln!("Cannot install logger: {}", e);
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn synthetic_sizes() {
    let size = |frame_type, qp| {
      synthetic_frame_bytes(CodecKind::HEVC, 133_333.0, frame_type, qp)
    };
    assert_eq!(size(FrameType::P, 30), 16_666);
    assert_eq!(size(FrameType::P, 36), 8_333);
    assert_eq!(size(FrameType::I, 30), 49_999);
  }

  #[test]
  fn gop_structure() {
    let seq = SequenceParameters::new(64, 64).with_gop(4, 0);
    let types: Vec<_> = (0..6).map(|i| frame_type(&seq, i)).collect();
    assert_eq!(
      types,
      [
        FrameType::I,
        FrameType::P,
        FrameType::P,
        FrameType::P,
        FrameType::I,
        FrameType::P
      ]
    );
  }
}

// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use crate::error::*;
use clap::{App, AppSettings, Arg, ArgMatches};
use hucbrc::prelude::*;
use serde::Deserialize;

use std::fs;
use std::str::FromStr;

pub struct CliOptions {
  pub config: SessionConfig,
  pub sequence: SequenceParameters,
  pub frames: usize,
  /// Starting QP of the first frame.
  pub qp: i32,
  pub dump: bool,
}

/// Session description loaded with `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SessionFile {
  session: SessionConfig,
  sequence: SequenceParameters,
  frames: Option<usize>,
  qp: Option<i32>,
}

pub fn parse_cli() -> Result<CliOptions, CliError> {
  let matches = App::new("hucbrc")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Runs the bit-rate controller over synthetic frames")
    .setting(AppSettings::DeriveDisplayOrder)
    .arg(
      Arg::with_name("CONFIG")
        .help("TOML file describing the session and the sequence")
        .long("config")
        .short("c")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("CODEC")
        .help("Codec driven by the rate controller")
        .long("codec")
        .possible_values(&CodecKind::variants())
        .case_insensitive(true)
        .takes_value(true),
    )
    .arg(
      Arg::with_name("GENERATION")
        .help("Hardware generation")
        .long("generation")
        .possible_values(&Generation::variants())
        .case_insensitive(true)
        .takes_value(true),
    )
    .arg(
      Arg::with_name("RC")
        .help("Rate control method")
        .long("rc")
        .possible_values(&RateControlMethod::variants())
        .case_insensitive(true)
        .takes_value(true),
    )
    .arg(
      Arg::with_name("BITRATE")
        .help("Target bitrate in bits per second")
        .long("bitrate")
        .short("b")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("MAX_BITRATE")
        .help("Maximum bitrate in bits per second")
        .long("max-bitrate")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("FPS")
        .help("Frame rate, as a ratio like 30000/1001 or an integer")
        .long("fps")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("VBV")
        .help("VBV buffer size in bits, 0 to derive it from the bitrate")
        .long("vbv")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("GOP")
        .help("Frames between two intra frames")
        .long("gop")
        .short("g")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("PASSES")
        .help("PAK passes per frame, panic pass excluded")
        .long("passes")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("FRAMES")
        .help("Number of frames to run")
        .long("frames")
        .short("l")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("SIZE")
        .help("Size of the synthetic frames, as WIDTHxHEIGHT")
        .long("size")
        .short("s")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("QP")
        .help("QP of the first frame")
        .long("qp")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("DUMP")
        .help("Print the packed BRC payloads of every frame")
        .long("dump"),
    )
    .get_matches();

  parse_config(&matches)
}

fn load_session_file(path: &str) -> Result<SessionFile, CliError> {
  let text = fs::read_to_string(path)
    .map_err(|io| CliError::ReadSessionFile { path: path.to_owned(), io })?;
  toml::from_str(&text).map_err(|err| CliError::MalformedSessionFile {
    path: path.to_owned(),
    err,
  })
}

fn parse_enum<T: FromStr>(
  value: &str, opt: &'static str,
) -> Result<T, CliError> {
  value
    .parse()
    .map_err(|_| CliError::UnknownChoice { opt, value: value.to_owned() })
}

/// Parses the integer option `arg`, reported as `--{opt}` on failure.
fn parse_u64(
  matches: &ArgMatches, arg: &str, opt: &'static str,
) -> Result<Option<u64>, CliError> {
  matches
    .value_of(arg)
    .map(|v| v.parse().map_err(CliError::not_an_integer(opt, v)))
    .transpose()
}

fn parse_frame_rate(value: &str) -> Result<Rational, CliError> {
  let mut terms = value.splitn(2, '/');
  let num = terms.next().unwrap_or_default();
  let num = num.parse().map_err(CliError::not_an_integer("fps", value))?;
  let den = match terms.next() {
    Some(den) => den.parse().map_err(CliError::not_an_integer("fps", value))?,
    None => 1,
  };
  Ok(Rational::new(num, den))
}

fn parse_size(value: &str) -> Result<(u32, u32), CliError> {
  let (w, h) = value
    .split_once('x')
    .ok_or_else(|| CliError::FrameSize(value.to_owned()))?;
  Ok((
    w.parse().map_err(CliError::not_an_integer("size", value))?,
    h.parse().map_err(CliError::not_an_integer("size", value))?,
  ))
}

fn parse_config(matches: &ArgMatches) -> Result<CliOptions, CliError> {
  let file = match matches.value_of("CONFIG") {
    Some(path) => load_session_file(path)?,
    None => SessionFile::default(),
  };
  let mut config = file.session;
  let mut seq = file.sequence;

  if let Some(codec) = matches.value_of("CODEC") {
    config.codec = parse_enum(codec, "codec")?;
  }
  if let Some(generation) = matches.value_of("GENERATION") {
    config.generation = parse_enum(generation, "generation")?;
  }
  if let Some(rc) = matches.value_of("RC") {
    seq.rc_method = parse_enum(rc, "rc")?;
  }
  if let Some(passes) = parse_u64(matches, "PASSES", "passes")? {
    config.num_passes = passes as usize;
  }
  if let Some(bitrate) = parse_u64(matches, "BITRATE", "bitrate")? {
    seq.target_bitrate = bitrate;
    seq.max_bitrate = seq.max_bitrate.max(bitrate);
  }
  if let Some(max) = parse_u64(matches, "MAX_BITRATE", "max-bitrate")? {
    seq.max_bitrate = max;
  }
  if let Some(fps) = matches.value_of("FPS") {
    seq.frame_rate = parse_frame_rate(fps)?;
  }
  if let Some(vbv) = parse_u64(matches, "VBV", "vbv")? {
    seq.vbv_buffer_size = vbv;
  }
  if let Some(gop) = parse_u64(matches, "GOP", "gop")? {
    seq.gop_size = gop as u32;
  }
  if let Some(size) = matches.value_of("SIZE") {
    (seq.width, seq.height) = parse_size(size)?;
  }

  config
    .validate()
    .map_err(|status| CliError::Settings { scope: "session", status })?;
  seq
    .validate()
    .map_err(|status| CliError::Settings { scope: "sequence", status })?;

  let frames = match parse_u64(matches, "FRAMES", "frames")? {
    Some(frames) => frames as usize,
    None => file.frames.unwrap_or(30),
  };
  let default_qp = match config.codec {
    CodecKind::HEVC => 30,
    CodecKind::VP8 => 60,
    CodecKind::VP9 => 120,
  };
  let qp = match matches.value_of("QP") {
    Some(qp) => qp.parse().map_err(CliError::not_an_integer("qp", qp))?,
    None => file.qp.unwrap_or(default_qp),
  };

  Ok(CliOptions {
    config,
    sequence: seq,
    frames,
    qp,
    dump: matches.is_present("DUMP"),
  })
}

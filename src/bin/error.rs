// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use hucbrc::prelude::FrameType;
use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
  #[error("Cannot read session file `{path}`")]
  ReadSessionFile {
    path: String,
    #[source]
    io: std::io::Error,
  },
  #[error("Session file `{path}` is malformed")]
  MalformedSessionFile {
    path: String,
    #[source]
    err: toml::de::Error,
  },
  #[error("Option --{opt} expects an integer, got `{value}`")]
  NotAnInteger {
    opt: &'static str,
    value: String,
    #[source]
    err: ParseIntError,
  },
  #[error("`{value}` is not a valid {opt}")]
  UnknownChoice { opt: &'static str, value: String },
  #[error("Frame size must be WIDTHxHEIGHT, got `{0}`")]
  FrameSize(String),
  #[error("Invalid {scope} settings")]
  Settings {
    scope: &'static str,
    #[source]
    status: hucbrc::InvalidParameter,
  },
  #[error("Cannot create the encode session")]
  Session(#[source] hucbrc::Error),
  #[error("Rate control failed on frame {frame} ({frame_type})")]
  Frame {
    frame: usize,
    frame_type: FrameType,
    #[source]
    err: hucbrc::Error,
  },
  #[error("Cannot read back the {name} payload")]
  Dump {
    name: &'static str,
    #[source]
    err: hucbrc::Error,
  },
}

impl CliError {
  pub fn not_an_integer<'a>(
    opt: &'static str, value: &'a str,
  ) -> impl FnOnce(ParseIntError) -> CliError + 'a {
    move |err| CliError::NotAnInteger { opt, value: value.to_owned(), err }
  }
}

pub fn print_error(e: &dyn std::error::Error) {
  error!("{}", e);
  let mut cause = e.source();
  while let Some(e) = cause {
    error!("Caused by: {}", e);
    cause = e.source();
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::error::Error as _;

  #[test]
  fn integer_option_message() {
    let err = "12k"
      .parse::<u64>()
      .map_err(CliError::not_an_integer("bitrate", "12k"))
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "Option --bitrate expects an integer, got `12k`"
    );
    assert!(err.source().is_some());
  }

  #[test]
  fn frame_failure_names_the_frame() {
    let err = CliError::Frame {
      frame: 7,
      frame_type: FrameType::P,
      err: hucbrc::Error::NullParameter("pak"),
    };
    assert_eq!(err.to_string(), "Rate control failed on frame 7 (P)");
    assert_eq!(
      err.source().map(|e| e.to_string()),
      Some(hucbrc::Error::NullParameter("pak").to_string())
    );
  }
}

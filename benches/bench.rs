// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

use criterion::*;
use hucbrc::huc::layout_profile;
use hucbrc::packers::*;
use hucbrc::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

fn hevc_sequence() -> SequenceParameters {
  SequenceParameters::new(1920, 1080)
    .with_bitrate(4_000_000, 6_000_000)
    .with_rc_method(RateControlMethod::VBR)
}

fn random_sizes(ra: &mut ChaChaRng, count: usize, mean: u32) -> Vec<u32> {
  (0..count).map(|_| ra.gen_range(mean / 4..mean * 4)).collect()
}

fn bench_constant_tables(c: &mut Criterion) {
  for codec in [CodecKind::HEVC, CodecKind::VP8, CodecKind::VP9] {
    c.bench_function(&format!("constant_tables_{:?}", codec), |b| {
      b.iter_with_setup(RecordingProvider::new, |mut p| {
        black_box(build_constant_table(codec, &mut p).unwrap())
      })
    });
  }
}

fn bench_brc_update(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([0; 32]);
  let seq = hevc_sequence();
  let pic = PictureParameters::new(FrameType::P, 30);
  let config = SessionConfig::new(Generation::G11, CodecKind::HEVC);
  let sizes = random_sizes(&mut ra, 64, 16_666);

  c.bench_function("brc_update_hevc", |b| {
    b.iter_with_setup(
      || {
        RateControlSession::init_or_reset(&seq, &pic, InitMode::Init, &config)
          .unwrap()
      },
      |mut rc| {
        for &frame_size_bytes in &sizes {
          rc.begin_frame(FrameType::P);
          let stats = PassStats { frame_size_bytes, ..Default::default() };
          black_box(rc.update(&stats).unwrap());
        }
      },
    )
  });
}

fn bench_update_payloads(c: &mut Criterion) {
  let seq = hevc_sequence();
  let pic = PictureParameters::new(FrameType::P, 30);
  let slice = SliceParameters::new(SliceType::P);
  let config = SessionConfig::new(Generation::G11, CodecKind::HEVC);
  let rc =
    RateControlSession::init_or_reset(&seq, &pic, InitMode::Init, &config)
      .unwrap();
  let layout = SlbLayout::hevc(layout_profile(Generation::G11), true);

  c.bench_function("hevc_update_dmem", |b| {
    b.iter(|| {
      let dmem = HevcBrcUpdateDmem::new(&rc, &seq, &pic, &slice, 7, layout);
      black_box(dmem.to_bytes().unwrap())
    })
  });
}

fn bench_session(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([0; 32]);
  let seq = hevc_sequence();
  let slice = SliceParameters::new(SliceType::P);
  let sizes = random_sizes(&mut ra, 30, 16_666);

  c.bench_function("session_30_frames_hevc", |b| {
    b.iter_with_setup(
      || {
        let mut p = RecordingProvider::new();
        let config = SessionConfig::new(Generation::G11, CodecKind::HEVC)
          .with_passes(2);
        let session = EncodeSession::new(config, &mut p, false).unwrap();
        (p, session)
      },
      |(mut p, mut session)| {
        for &size in &sizes {
          let pic = PictureParameters::new(FrameType::P, 30);
          let input = FrameInput { slice: Some(&slice), pic_state: None };
          let report = session
            .encode_frame(&mut p, &seq, &pic, input, |p, pass| {
              let stats =
                PassStats { frame_size_bytes: size, ..Default::default() };
              write_buffer(p, pass.stats, &stats.to_bytes())
            })
            .unwrap();
          black_box(report);
        }
      },
    )
  });
}

criterion_group!(
  benches,
  bench_constant_tables,
  bench_brc_update,
  bench_update_payloads,
  bench_session
);
criterion_main!(benches);

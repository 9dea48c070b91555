#![no_main]
#[macro_use]
extern crate libfuzzer_sys;

use hucbrc::huc::layout_profile;
use hucbrc::packers::*;
use hucbrc::prelude::*;

struct Bytes<'a>(&'a [u8]);

impl Bytes<'_> {
  fn u8(&mut self) -> u8 {
    match self.0.split_first() {
      Some((&b, rest)) => {
        self.0 = rest;
        b
      }
      None => 0,
    }
  }

  fn u32(&mut self) -> u32 {
    u32::from_le_bytes([self.u8(), self.u8(), self.u8(), self.u8()])
  }
}

fuzz_target!(|data: &[u8]| {
  let mut b = Bytes(data);
  let codec = match b.u8() % 3 {
    0 => CodecKind::HEVC,
    1 => CodecKind::VP8,
    _ => CodecKind::VP9,
  };
  let generation = if b.u8() & 1 == 0 { Generation::G10 } else { Generation::G11 };
  let rc_method = match b.u8() % 5 {
    0 => RateControlMethod::CBR,
    1 => RateControlMethod::VBR,
    2 => RateControlMethod::AVBR,
    3 => RateControlMethod::ICQ,
    _ => RateControlMethod::CQP,
  };
  let target = b.u32() as u64;
  let max = b.u32() as u64;
  let seq = SequenceParameters::new(b.u8() as u32 * 16 + 16, b.u8() as u32 * 16 + 16)
    .with_rc_method(rc_method)
    .with_bitrate(target, max)
    .with_frame_rate(Rational::new(b.u8() as u64, b.u8() as u64))
    .with_vbv(b.u32() as u64, b.u32() as u64)
    .with_gop(b.u8() as u32, 0);
  let frame_type = if b.u8() & 1 == 0 { FrameType::I } else { FrameType::P };
  let mut pic = PictureParameters::new(frame_type, b.u8() as i32);
  pic.vp8.ref_frame_ctrl = b.u8();
  let slice = SliceParameters::new(frame_type.into());
  let config = SessionConfig::new(generation, codec);

  let Ok(mut rc) =
    RateControlSession::init_or_reset(&seq, &pic, InitMode::Init, &config)
  else {
    return;
  };
  rc.begin_frame(frame_type);
  let fullness = rc.advance_target_fullness();
  let layout = SlbLayout::hevc(layout_profile(generation), true);

  let _ = match codec {
    CodecKind::HEVC => HevcBrcInitDmem::new(&rc, &seq, &pic, &slice)
      .and_then(|d| d.to_bytes())
      .and_then(|_| {
        HevcBrcUpdateDmem::new(&rc, &seq, &pic, &slice, b.u32(), layout)
          .to_bytes()
      }),
    CodecKind::VP9 => Vp9BrcInitDmem::new(&rc, &seq)
      .and_then(|d| d.to_bytes())
      .and_then(|_| {
        Vp9BrcUpdateDmem::new(&rc, &seq, &pic, Some(fullness), SlbLayout::vp9())
          .to_bytes()
      }),
    CodecKind::VP8 => Vp8BrcInitCurbe::new(&rc, &seq, &pic)
      .and_then(|d| d.to_bytes())
      .and_then(|_| Vp8BrcUpdateCurbe::new(&rc, &seq, &pic, fullness))
      .and_then(|d| d.to_bytes()),
  };

  let stats = PassStats { frame_size_bytes: b.u32(), ..Default::default() };
  let _ = rc.update(&stats);
});

#![no_main]
#[macro_use]
extern crate libfuzzer_sys;

use hucbrc::prelude::*;

fuzz_target!(|data: &[u8]| {
  let Some((&head, sizes)) = data.split_first() else {
    return;
  };
  let codec = match head % 3 {
    0 => CodecKind::HEVC,
    1 => CodecKind::VP8,
    _ => CodecKind::VP9,
  };
  let passes = 1 + (head as usize >> 2) % 3;
  let mut p = RecordingProvider::new();
  let config = SessionConfig::new(Generation::G11, codec).with_passes(passes);
  let Ok(mut session) = EncodeSession::new(config, &mut p, false) else {
    return;
  };
  let seq = SequenceParameters::new(640, 480).with_bitrate(1_000_000, 2_000_000);
  let slice = SliceParameters::new(SliceType::P);

  for (i, chunk) in sizes.chunks(2).enumerate() {
    let frame_type = if i % 8 == 0 { FrameType::I } else { FrameType::P };
    let pic = PictureParameters::new(frame_type, 30);
    let size = chunk.iter().fold(0u32, |acc, &b| acc << 8 | b as u32) * 16;
    let input = FrameInput { slice: Some(&slice), pic_state: None };
    let res = session.encode_frame(&mut p, &seq, &pic, input, |p, pass| {
      let stats = PassStats { frame_size_bytes: size, ..Default::default() };
      write_buffer(p, pass.stats, &stats.to_bytes())
    });
    if let Ok(report) = res {
      assert!(report.passes <= config.max_passes());
    }
  }
});

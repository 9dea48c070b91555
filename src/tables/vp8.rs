// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! VP8 rate-control lookup tables.

/// QP adjustment, distortion threshold, max-frame threshold and
/// distortion QP adjustment blocks for I, P and B frames.
#[rustfmt::skip]
pub const VP8_BRC_QP_ADJUST_IPB: [u8; 576] = [
  1, 3, 5, 7, 9, 1, 2, 3, 5, 7, 0, 0, 1, 2, 4, 0,
  0, 0, 1, 2, 255, 0, 0, 0, 1, 253, 254, 255, 0, 0, 251, 252,
  254, 255, 0, 249, 250, 252, 254, 255, 247, 249, 251, 254, 255, 0, 4, 30,
  60, 80, 120, 140, 200, 255, 8, 9, 10, 11, 12, 0, 0, 0, 0, 0,
  1, 2, 5, 8, 10, 1, 2, 4, 6, 8, 0, 1, 2, 4, 6, 0,
  0, 0, 1, 2, 255, 0, 0, 0, 1, 254, 255, 255, 0, 0, 253, 254,
  255, 255, 0, 251, 253, 254, 255, 0, 249, 250, 252, 254, 255, 0, 4, 30,
  60, 80, 120, 140, 200, 255, 4, 5, 6, 6, 7, 0, 0, 0, 0, 0,
  1, 2, 5, 8, 10, 1, 2, 4, 6, 8, 0, 1, 2, 4, 6, 0,
  0, 0, 1, 2, 255, 0, 0, 0, 1, 254, 255, 255, 0, 0, 253, 254,
  255, 255, 0, 251, 253, 254, 255, 0, 249, 250, 252, 254, 255, 0, 2, 20,
  40, 70, 130, 160, 200, 255, 4, 5, 6, 6, 7, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 4, 6, 8, 10, 0, 0, 0, 0, 0, 3, 5,
  7, 9, 255, 0, 0, 0, 0, 3, 4, 6, 7, 254, 255, 0, 0, 0,
  1, 2, 3, 5, 253, 254, 255, 0, 0, 0, 1, 3, 5, 252, 254, 255,
  0, 0, 0, 1, 3, 5, 251, 253, 254, 255, 0, 0, 1, 3, 5, 250,
  252, 254, 255, 0, 0, 1, 3, 5, 250, 252, 254, 255, 0, 0, 1, 3,
  5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 3, 5, 7, 9, 0, 0, 0, 0, 0, 3, 5,
  6, 8, 255, 0, 0, 0, 0, 3, 5, 7, 8, 254, 255, 0, 0, 0,
  2, 4, 5, 6, 253, 254, 255, 0, 0, 0, 1, 4, 5, 252, 254, 255,
  0, 0, 0, 1, 4, 5, 252, 254, 255, 255, 0, 0, 0, 4, 5, 252,
  253, 254, 255, 0, 0, 0, 1, 5, 251, 252, 254, 255, 0, 0, 0, 1,
  4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 3, 5, 7, 9, 0, 0, 0, 0, 0, 3, 5,
  6, 8, 255, 0, 0, 0, 0, 3, 5, 7, 8, 254, 255, 0, 0, 0,
  2, 4, 5, 6, 253, 254, 255, 0, 0, 0, 1, 4, 5, 252, 254, 255,
  0, 0, 0, 1, 4, 5, 252, 254, 255, 255, 0, 0, 0, 4, 5, 252,
  253, 254, 255, 0, 0, 0, 1, 5, 251, 252, 254, 255, 0, 0, 0, 1,
  4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Intra cost per quantizer index, four mode classes per entry.
#[rustfmt::skip]
pub const VP8_BRC_IFRAME_COST: [u8; 512] = [
  5, 5, 8, 8, 10, 10, 13, 13, 13, 15, 15, 25, 25, 26, 26, 26,
  27, 27, 29, 29, 29, 29, 30, 30, 30, 30, 31, 31, 31, 40, 40, 41,
  41, 41, 41, 42, 42, 43, 43, 43, 43, 43, 44, 44, 44, 44, 45, 45,
  46, 46, 46, 46, 46, 47, 47, 56, 56, 56, 56, 56, 56, 57, 57, 57,
  57, 57, 57, 58, 58, 58, 58, 58, 58, 58, 58, 59, 59, 59, 59, 59,
  59, 60, 60, 60, 60, 60, 60, 60, 61, 61, 61, 61, 61, 61, 62, 62,
  62, 62, 63, 63, 63, 72, 72, 72, 72, 72, 72, 72, 73, 73, 73, 73,
  73, 73, 74, 74, 74, 74, 74, 74, 75, 75, 75, 75, 75, 76, 76, 76,
  31, 31, 43, 43, 47, 47, 57, 57, 57, 59, 59, 61, 61, 63, 63, 63,
  72, 72, 73, 73, 73, 73, 74, 74, 74, 74, 75, 75, 75, 76, 76, 77,
  77, 78, 78, 79, 79, 88, 88, 88, 88, 88, 88, 88, 89, 89, 89, 89,
  90, 90, 90, 90, 90, 91, 91, 91, 91, 92, 92, 92, 92, 93, 93, 93,
  93, 94, 94, 94, 94, 95, 95, 95, 95, 104, 104, 104, 104, 104, 104, 104,
  104, 104, 104, 104, 105, 105, 105, 105, 105, 105, 105, 105, 106, 106, 106, 106,
  106, 106, 107, 107, 107, 107, 107, 108, 108, 108, 108, 108, 109, 109, 109, 109,
  110, 110, 110, 111, 111, 111, 111, 111, 120, 120, 120, 120, 120, 120, 121, 121,
  2, 2, 3, 3, 4, 4, 5, 5, 5, 6, 6, 7, 7, 8, 8, 8,
  9, 9, 9, 9, 9, 9, 10, 10, 10, 10, 11, 11, 11, 12, 12, 13,
  13, 14, 14, 15, 15, 16, 16, 17, 17, 17, 18, 18, 19, 19, 20, 20,
  21, 21, 22, 22, 22, 23, 23, 24, 24, 25, 25, 26, 26, 26, 26, 27,
  27, 28, 28, 29, 29, 30, 30, 31, 31, 32, 32, 33, 33, 34, 34, 35,
  35, 36, 36, 36, 37, 37, 38, 38, 39, 39, 40, 40, 41, 41, 42, 42,
  43, 43, 44, 45, 46, 47, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56,
  58, 59, 60, 61, 61, 62, 63, 64, 65, 66, 67, 68, 70, 71, 73, 74,
  9, 9, 14, 14, 18, 18, 23, 23, 23, 27, 27, 32, 32, 36, 36, 36,
  41, 41, 45, 45, 45, 45, 50, 50, 50, 50, 54, 54, 54, 59, 59, 63,
  63, 68, 68, 72, 72, 77, 77, 81, 81, 81, 86, 86, 90, 90, 95, 95,
  99, 99, 104, 104, 104, 108, 108, 113, 113, 118, 118, 122, 122, 127, 127, 131,
  131, 136, 136, 140, 140, 145, 145, 149, 149, 154, 154, 158, 158, 163, 163, 167,
  167, 172, 172, 172, 176, 176, 181, 181, 185, 185, 190, 190, 194, 194, 199, 199,
  203, 208, 212, 217, 221, 226, 226, 230, 235, 240, 244, 249, 253, 255, 255, 255,
  255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
];

/// Inter cost per quantizer index, packed four bytes per word.
#[rustfmt::skip]
pub const VP8_BRC_PFRAME_COST: [u32; 256] = [
  0x06040402, 0x06040402, 0x06040402, 0x06040402, 0x0d080805, 0x0d080805, 0x0d080805, 0x0d080805,
  0x0d080805, 0x190b0c07, 0x190b0c07, 0x190b0c07, 0x190b0c07, 0x1c0f0f0a, 0x1c0f0f0a, 0x1c0f0f0a,
  0x1c0f0f0a, 0x1c0f0f0a, 0x2819190c, 0x2819190c, 0x2819190c, 0x2819190c, 0x2819190c, 0x2819190c,
  0x2819190c, 0x2819190c, 0x291b1b0f, 0x291b1b0f, 0x291b1b0f, 0x291b1b0f, 0x291b1b0f, 0x2b1d1d18,
  0x2b1d1d18, 0x2b1d1d18, 0x2b1d1d18, 0x2c1f1f19, 0x2c1f1f19, 0x2c1f1f19, 0x2c1f1f19, 0x2e28281b,
  0x2e28281b, 0x2e28281b, 0x2e28281b, 0x2e28281b, 0x2f29291c, 0x2f29291c, 0x2f29291c, 0x2f29291c,
  0x382a2a1d, 0x382a2a1d, 0x382a2a1d, 0x382a2a1d, 0x382a2a1d, 0x392b2b1e, 0x392b2b1e, 0x392b2b1e,
  0x392b2b1e, 0x3a2c2c1f, 0x3a2c2c1f, 0x3a2c2c1f, 0x3a2c2c1f, 0x3b2d2d28, 0x3b2d2d28, 0x3b2d2d28,
  0x3b2d2d28, 0x3b2e2e29, 0x3b2e2e29, 0x3b2e2e29, 0x3b2e2e29, 0x3c2f2f29, 0x3c2f2f29, 0x3c2f2f29,
  0x3c2f2f29, 0x3d38382a, 0x3d38382a, 0x3d38382a, 0x3d38382a, 0x3e38382b, 0x3e38382b, 0x3e38382b,
  0x3e38382b, 0x3f38392b, 0x3f38392b, 0x3f38392b, 0x3f38392b, 0x3f38392b, 0x3f39392c, 0x3f39392c,
  0x3f39392c, 0x3f39392c, 0x48393a2c, 0x48393a2c, 0x48393a2c, 0x48393a2c, 0x483a3a2d, 0x483a3a2d,
  0x483a3a2d, 0x493a3b2e, 0x493a3b2e, 0x493b3b2e, 0x493b3b2e, 0x493b3c2f, 0x493b3c2f, 0x493b3c2f,
  0x4a3c3c2f, 0x4a3c3c2f, 0x4a3c3d38, 0x4a3c3d38, 0x4b3d3d38, 0x4b3d3d38, 0x4b3d3e38, 0x4b3d3e38,
  0x4b3e3e39, 0x4c3e3e39, 0x4c3e3e39, 0x4c3f3f39, 0x4c3f3f39, 0x4d3f3f3a, 0x4d3f3f3a, 0x4d48483a,
  0x4d48483a, 0x4d48483a, 0x4d48483a, 0x4e48483a, 0x4e48483b, 0x4e48483b, 0x4f48493b, 0x4f49493b,
  0x1a0c0907, 0x1a0c0907, 0x1a0c0907, 0x1a0c0907, 0x291b190e, 0x291b190e, 0x291b190e, 0x291b190e,
  0x291b190e, 0x2e281e1a, 0x2e281e1a, 0x2e281e1a, 0x2e281e1a, 0x392b291e, 0x392b291e, 0x392b291e,
  0x392b291e, 0x392b291e, 0x3c2e2b29, 0x3c2e2b29, 0x3c2e2b29, 0x3c2e2b29, 0x3c2e2b29, 0x3c2e2b29,
  0x3c2e2b29, 0x3c2e2b29, 0x3e382e2a, 0x3e382e2a, 0x3e382e2a, 0x3e382e2a, 0x3e382e2a, 0x483a382c,
  0x483a382c, 0x483a382c, 0x483a382c, 0x493b392e, 0x493b392e, 0x493b392e, 0x493b392e, 0x4b3d3a38,
  0x4b3d3a38, 0x4b3d3a38, 0x4b3d3a38, 0x4b3d3a38, 0x4c3e3b38, 0x4c3e3b38, 0x4c3e3b38, 0x4c3e3b38,
  0x4d483c39, 0x4d483c39, 0x4d483c39, 0x4d483c39, 0x4d483c39, 0x4e483e3a, 0x4e483e3a, 0x4e483e3a,
  0x4e483e3a, 0x4f493f3b, 0x4f493f3b, 0x4f493f3b, 0x4f493f3b, 0x584a483c, 0x584a483c, 0x584a483c,
  0x584a483c, 0x594b483d, 0x594b483d, 0x594b483d, 0x594b483d, 0x594b493e, 0x594b493e, 0x594b493e,
  0x594b493e, 0x5a4c493f, 0x5a4c493f, 0x5a4c493f, 0x5a4c493f, 0x5b4d4a48, 0x5b4d4a48, 0x5b4d4a48,
  0x5b4d4a48, 0x5b4d4b48, 0x5b4d4b48, 0x5b4d4b48, 0x5b4d4b48, 0x5b4d4b48, 0x5c4e4b48, 0x5c4e4b48,
  0x5c4e4b48, 0x5c4e4b48, 0x5c4f4c49, 0x5c4f4c49, 0x5c4f4c49, 0x5c4f4c49, 0x5d584c49, 0x5d584c49,
  0x5d584c49, 0x5e584d4a, 0x5e584d4a, 0x5e584e4a, 0x5e584e4a, 0x5f594e4b, 0x5f594e4b, 0x5f594e4b,
  0x5f594f4b, 0x5f594f4b, 0x68594f4c, 0x68594f4c, 0x685a584c, 0x685a584c, 0x685a584c, 0x685a584c,
  0x695b584d, 0x695b594d, 0x695b594d, 0x695b594e, 0x695b594e, 0x6a5c594e, 0x6a5c594e, 0x6a5c594f,
  0x6a5c594f, 0x6a5c5a4f, 0x6a5c5a4f, 0x6a5d5a58, 0x6b5d5a58, 0x6b5d5a58, 0x6b5d5b58, 0x6b5e5b58,
];

#[rustfmt::skip]
pub const VP8_QUANT_DC: [u16; 128] = [
  4, 5, 6, 7, 8, 9, 10, 10, 11, 12, 13, 14, 15, 16, 17, 17,
  18, 19, 20, 20, 21, 21, 22, 22, 23, 23, 24, 25, 25, 26, 27, 28,
  29, 30, 31, 32, 33, 34, 35, 36, 37, 37, 38, 39, 40, 41, 42, 43,
  44, 45, 46, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58,
  59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74,
  75, 76, 76, 77, 78, 79, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89,
  91, 93, 95, 96, 98, 100, 101, 102, 104, 106, 108, 110, 112, 114, 116, 118,
  122, 124, 126, 128, 130, 132, 134, 136, 138, 140, 143, 145, 148, 151, 154, 157,
];

#[rustfmt::skip]
pub const VP8_QUANT_AC: [u16; 128] = [
  4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
  20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35,
  36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51,
  52, 53, 54, 55, 56, 57, 58, 60, 62, 64, 66, 68, 70, 72, 74, 76,
  78, 80, 82, 84, 86, 88, 90, 92, 94, 96, 98, 100, 102, 104, 106, 108,
  110, 112, 114, 116, 119, 122, 125, 128, 131, 134, 137, 140, 143, 146, 149, 152,
  155, 158, 161, 164, 167, 170, 173, 177, 181, 185, 189, 193, 197, 201, 205, 209,
  213, 217, 221, 225, 229, 234, 239, 245, 249, 254, 259, 264, 269, 274, 279, 284,
];

/// Skip threshold per quantizer index. Only the first 128 entries are
/// populated.
#[rustfmt::skip]
pub const VP8_SKIP_MV_THRESHOLD: [u16; 256] = [
  111, 120, 129, 137, 146, 155, 163, 172, 180, 189, 198, 206, 215, 224, 232, 241,
  249, 258, 267, 275, 284, 293, 301, 310, 318, 327, 336, 344, 353, 362, 370, 379,
  387, 396, 405, 413, 422, 431, 439, 448, 456, 465, 474, 482, 491, 500, 508, 517,
  525, 534, 543, 551, 560, 569, 577, 586, 594, 603, 612, 620, 629, 638, 646, 655,
  663, 672, 681, 689, 698, 707, 715, 724, 733, 741, 750, 758, 767, 776, 784, 793,
  802, 810, 819, 827, 836, 845, 853, 862, 871, 879, 888, 896, 905, 914, 922, 931,
  940, 948, 957, 965, 974, 983, 991, 1000, 1009, 1017, 1026, 1034, 1043, 1052, 1060, 1069,
  1078, 1086, 1095, 1103, 1112, 1121, 1129, 1138, 1147, 1155, 1164, 1172, 1181, 1190, 1198, 1208,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Main reference ordering indexed by `ref_frame_ctrl`.
pub const VP8_MAINREF: [u8; 8] = [0, 1, 2, 9, 3, 13, 14, 57];

/// Number of active references indexed by `ref_frame_ctrl`.
pub const VP8_NUM_REFS: [u8; 8] = [0, 1, 1, 2, 1, 2, 2, 3];

// Copyright (c) 2026, The hucbrc contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at opensource.org/licenses/BSD-2-Clause.

//! VP9 rate-control lookup tables.

/// Per frame type (intra, inter) constant surface consumed by the BRC
/// update firmware.
#[rustfmt::skip]
pub const VP9_BRC_CONST_DATA: [[u32; 416]; 2] = [
  [
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x32191900, 0x00264b4b, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x0e0a0602, 0x06040212, 0x00000e0a, 0x00080402, 0x04020000, 0x000000fe, 0xfefcfa02, 0xf8f60000,
    0xf200fefc, 0xfefcf8f4, 0xfcf6f2ee, 0x0a0402fe, 0x04021410, 0x00100c08, 0x0c080402, 0x02000000,
    0x0000fe04, 0xfefc0200, 0xfa0000fe, 0x00fefefc, 0xfefcfaf6, 0xf8f4f200, 0x0402fefc, 0x0214100a,
    0x100c0804, 0x08040200, 0x0000000c, 0x00fe0402, 0xfc020000, 0x0000fefe, 0xfefefcfa, 0xfcfaf600,
    0xf4f200fe, 0x00fefcf8, 0x00000000, 0x14100c08, 0x00000000, 0x0e0a0600, 0x0000fe12, 0x08060000,
    0xfefc0e0c, 0x02000000, 0xfa0a0604, 0x0000fefc, 0x0a060200, 0x00fefcf8, 0x06020000, 0xfcfaf60a,
    0x020000fe, 0xf8f40a06, 0x0000fefc, 0xf40a0602, 0x00fefcf8, 0x0a060200, 0x00000000, 0x0e0a0600,
    0x00000012, 0x0a060000, 0x00fe100c, 0x06000000, 0xfc100e0a, 0x000000fe, 0x0c0a0804, 0x00fefcfa,
    0x08020000, 0xfefcf80a, 0x02000000, 0xfcf80a08, 0x0000fefe, 0xf80a0800, 0x00fefcfa, 0x0a020000,
    0xfefcf8f6, 0x02000000, 0x00000008, 0x0a060000, 0x0000120e, 0x06000000, 0xfe100c0a, 0x00000000,
    0x100e0a06, 0x0000fefc, 0x0a080400, 0xfefcfa0c, 0x02000000, 0xfcf80a08, 0x000000fe, 0xf80a0802,
    0x00fefefc, 0x0a080000, 0xfefcfaf8, 0x02000000, 0xfcf8f60a, 0x000000fe, 0x00000802, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
  ],
  [
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626,
    0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904,
    0x0b0b001e, 0x0000000b, 0x13194b0d, 0x1f5e2626, 0x19321f4b, 0x1e1e1904, 0x0b0b001e, 0x0000000b,
    0x0e0a0602, 0x06040212, 0x00000e0a, 0x00080402, 0x04020000, 0x000000fe, 0xfefcfa02, 0xf8f60000,
    0xf200fefc, 0xfefcf8f4, 0xfcf6f2ee, 0x0a0402fe, 0x04021410, 0x00100c08, 0x0c080402, 0x02000000,
    0x0000fe04, 0xfefc0200, 0xfa0000fe, 0x00fefefc, 0xfefcfaf6, 0xf8f4f200, 0x0402fefc, 0x0214100a,
    0x100c0804, 0x08040200, 0x0000000c, 0x00fe0402, 0xfc020000, 0x0000fefe, 0xfefefcfa, 0xfcfaf600,
    0xf4f200fe, 0x00fefcf8, 0x00000000, 0x14100c08, 0x00000000, 0x0e0a0600, 0x0000fe12, 0x08060000,
    0xfefc0e0c, 0x02000000, 0xfa0a0604, 0x0000fefc, 0x0a060200, 0x00fefcf8, 0x06020000, 0xfcfaf60a,
    0x020000fe, 0xf8f40a06, 0x0000fefc, 0xf40a0602, 0x00fefcf8, 0x0a060200, 0x00000000, 0x0e0a0600,
    0x00000012, 0x0a060000, 0x00fe100c, 0x06000000, 0xfc100e0a, 0x000000fe, 0x0c0a0804, 0x00fefcfa,
    0x08020000, 0xfefcf80a, 0x02000000, 0xfcf80a08, 0x0000fefe, 0xf80a0800, 0x00fefcfa, 0x0a020000,
    0xfefcf8f6, 0x02000000, 0x00000008, 0x0a060000, 0x0000120e, 0x06000000, 0xfe100c0a, 0x00000000,
    0x100e0a06, 0x0000fefc, 0x0a080400, 0xfefcfa0c, 0x02000000, 0xfcf80a08, 0x000000fe, 0xf80a0802,
    0x00fefefc, 0x0a080000, 0xfefcfaf8, 0x02000000, 0xfcf8f60a, 0x000000fe, 0x00000802, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000, 0x00000000,
  ],
];

/// 8-bit luma AC quantizer step per `base_q_idx`.
#[rustfmt::skip]
pub const VP9_AC_QLOOKUP: [u16; 256] = [
  4, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22,
  23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38,
  39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54,
  55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70,
  71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, 85, 86,
  87, 88, 89, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100, 101, 102,
  104, 106, 108, 110, 112, 114, 116, 118, 120, 122, 124, 126, 128, 130, 132, 134,
  136, 138, 140, 142, 144, 146, 148, 150, 152, 155, 158, 161, 164, 167, 170, 173,
  176, 179, 182, 185, 188, 191, 194, 197, 200, 203, 207, 211, 215, 219, 223, 227,
  231, 235, 239, 243, 247, 251, 255, 260, 265, 270, 275, 280, 285, 290, 295, 300,
  305, 311, 317, 323, 329, 335, 341, 347, 353, 359, 366, 373, 380, 387, 394, 401,
  408, 416, 424, 432, 440, 448, 456, 465, 474, 483, 492, 501, 510, 520, 530, 540,
  550, 560, 571, 582, 593, 604, 615, 627, 639, 651, 663, 676, 689, 702, 715, 729,
  743, 757, 771, 786, 801, 816, 832, 848, 864, 881, 898, 915, 933, 951, 969, 988,
  1007, 1026, 1046, 1066, 1087, 1108, 1129, 1151, 1173, 1196, 1219, 1243, 1267, 1292, 1317, 1343,
  1369, 1396, 1423, 1451, 1479, 1508, 1537, 1567, 1597, 1628, 1660, 1692, 1725, 1759, 1793, 1828,
];

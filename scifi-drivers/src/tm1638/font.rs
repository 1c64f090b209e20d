//! ASCII to seven-segment font
//!
//! Bit 0 is segment A, bit 6 is segment G and bit 7 the decimal point:
//!
//! ```text
//!  AAA
//! F   B
//!  GGG
//! E   C
//!  DDD  .
//! ```

pub const SEG_A: u8 = 0b_0000_0001;
pub const SEG_B: u8 = 0b_0000_0010;
pub const SEG_C: u8 = 0b_0000_0100;
pub const SEG_D: u8 = 0b_0000_1000;
pub const SEG_E: u8 = 0b_0001_0000;
pub const SEG_F: u8 = 0b_0010_0000;
pub const SEG_G: u8 = 0b_0100_0000;
pub const SEG_DP: u8 = 0b_1000_0000;

const FIRST: u8 = b' ';

/// Glyphs for printable ASCII, starting at space
const PRINTABLE: [u8; 95] = [
    // Symbols (32-47)
    0b_0000_0000,    // (space)
    0b_1000_0110,    // !
    SEG_B | SEG_F,   // "
    0b_0111_0110,    // #
    0b_0110_1101,    // $
    0b_0010_0100,    // %
    0b_0111_1111,    // &
    SEG_B,           // '
    0b_0011_1001,    // (
    0b_0000_1111,    // )
    0b_0110_0011,    // *
    0b_0100_0110,    // +
    SEG_C,           // ,
    SEG_G,           // -
    SEG_DP,          // .
    0b_0101_0010,    // /
    // Numbers (48-57)
    0b_0011_1111, // 0
    0b_0000_0110, // 1
    0b_0101_1011, // 2
    0b_0100_1111, // 3
    0b_0110_0110, // 4
    0b_0110_1101, // 5
    0b_0111_1101, // 6
    0b_0000_0111, // 7
    0b_0111_1111, // 8
    0b_0110_1111, // 9
    // Symbols (58-64)
    0b_0000_0000,    // :
    0b_0000_0000,    // ;
    SEG_D | SEG_E | SEG_G, // <
    SEG_D | SEG_G,   // =
    SEG_C | SEG_D | SEG_G, // >
    0b_0101_0011,    // ?
    0b_0101_1111,    // @
    // Uppercase letters (65-90)
    0b_0111_0111, // A
    0b_0111_1111, // B
    0b_0011_1001, // C
    0b_0011_1111, // D
    0b_0111_1001, // E
    0b_0111_0001, // F
    0b_0011_1101, // G
    0b_0111_0110, // H
    0b_0000_0110, // I
    0b_0001_1111, // J
    0b_0111_0110, // K
    0b_0011_1000, // L
    0b_0001_0101, // M
    0b_0011_0111, // N
    0b_0011_1111, // O
    0b_0111_0011, // P
    0b_0110_0111, // Q
    0b_0011_0001, // R
    0b_0110_1101, // S
    0b_0111_1000, // T
    0b_0011_1110, // U
    0b_0010_1010, // V
    0b_0001_1101, // W
    0b_0111_0110, // X
    0b_0110_1110, // Y
    0b_0101_1011, // Z
    // Symbols (91-96)
    0b_0011_1001, // [
    0b_0110_0100, // \
    0b_0000_1111, // ]
    0b_0010_0011, // ^
    SEG_D,        // _
    SEG_F,        // `
    // Lowercase letters (97-122)
    0b_0101_1111, // a
    0b_0111_1100, // b
    0b_0101_1000, // c
    0b_0101_1110, // d
    0b_0111_1011, // e
    0b_0111_0001, // f
    0b_0110_1111, // g
    0b_0111_0100, // h
    0b_0000_0100, // i
    0b_0000_1110, // j
    0b_0111_0101, // k
    0b_0011_0000, // l
    0b_0101_0101, // m
    0b_0101_0100, // n
    0b_0101_1100, // o
    0b_0111_0011, // p
    0b_0110_0111, // q
    0b_0101_0000, // r
    0b_0110_1101, // s
    0b_0111_1000, // t
    0b_0001_1100, // u
    0b_0010_1010, // v
    0b_0001_1101, // w
    0b_0111_0110, // x
    0b_0110_1110, // y
    0b_0100_0111, // z
    // Symbols (123-126)
    0b_0100_0110, // {
    SEG_B | SEG_C, // |
    0b_0111_0000, // }
    SEG_A,        // ~
];

/// Segment pattern for an ASCII byte
///
/// Control characters and bytes past `~` render blank.
pub fn glyph(byte: u8) -> u8 {
    byte.checked_sub(FIRST)
        .and_then(|index| PRINTABLE.get(index as usize))
        .copied()
        .unwrap_or(0)
}

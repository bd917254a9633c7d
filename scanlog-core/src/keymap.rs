//! PS/2 scan code set 2 translation table.
//!
//! Only the keys a barcode scanner actually produces are mapped: the keypad digits, the letters,
//! the top row digits and a handful of punctuation keys. Anything else is noise.

/// ENTER, terminates the current line.
pub const SCAN_ENTER: u8 = 0x5a;

/// Break prefix, the next scan code is a key release.
pub const SCAN_BREAK: u8 = 0xf0;

/// Number of mapped scan codes.
pub const SYMBOL_COUNT: usize = 50;

/// `(scan code, character)` pairs. Scan codes are unique; characters are not, since both the
/// keypad and the top row produce digits.
pub const SYMBOL_TABLE: [(u8, char); SYMBOL_COUNT] = [
    // keypad digits
    (0x70, '0'),
    (0x69, '1'),
    (0x72, '2'),
    (0x7a, '3'),
    (0x6b, '4'),
    (0x73, '5'),
    (0x74, '6'),
    (0x6c, '7'),
    (0x75, '8'),
    (0x7d, '9'),
    // letters
    (0x1c, 'A'),
    (0x32, 'B'),
    (0x21, 'C'),
    (0x23, 'D'),
    (0x24, 'E'),
    (0x2b, 'F'),
    (0x34, 'G'),
    (0x33, 'H'),
    (0x43, 'I'),
    (0x3b, 'J'),
    (0x42, 'K'),
    (0x4b, 'L'),
    (0x3a, 'M'),
    (0x31, 'N'),
    (0x44, 'O'),
    (0x4d, 'P'),
    (0x15, 'Q'),
    (0x2d, 'R'),
    (0x1b, 'S'),
    (0x2c, 'T'),
    (0x3c, 'U'),
    (0x2a, 'V'),
    (0x1d, 'W'),
    (0x22, 'X'),
    (0x35, 'Y'),
    (0x1a, 'Z'),
    // top row digits
    (0x16, '1'),
    (0x1e, '2'),
    (0x26, '3'),
    (0x25, '4'),
    (0x2e, '5'),
    (0x36, '6'),
    (0x3d, '7'),
    (0x3e, '8'),
    (0x46, '9'),
    (0x45, '0'),
    // punctuation
    (0x29, ' '),
    (0x41, ','),
    (0x49, '.'),
    (0x4a, '/'),
];

/// Translate a scan code into its character.
pub fn lookup(symbol: u8) -> Option<char> {
    SYMBOL_TABLE
        .iter()
        .find(|(code, _)| *code == symbol)
        .map(|&(_, c)| c)
}

/// Find the first scan code producing `c`.
///
/// For digits this is the keypad key.
pub fn symbol_for(c: char) -> Option<u8> {
    SYMBOL_TABLE
        .iter()
        .find(|(_, ch)| *ch == c)
        .map(|&(code, _)| code)
}

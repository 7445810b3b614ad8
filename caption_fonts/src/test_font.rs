// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal in-memory fonts for tests.

/// Builds an sfnt with a single `cmap` table mapping `A..=Z` to glyphs
/// `1..=26` through a format 4 subtable.
pub(crate) fn uppercase_latin() -> Vec<u8> {
    let mut subtable = Vec::new();
    for value in [
        4_u16,  // format
        32,     // length
        0,      // language
        4,      // segCountX2
        4,      // searchRange
        1,      // entrySelector
        0,      // rangeShift
        0x005A, // endCode
        0xFFFF,
        0, // reservedPad
        0x0041, // startCode
        0xFFFF,
        0xFFC0, // idDelta: 'A' + delta == 1
        0x0001,
        0, // idRangeOffset
        0,
    ] {
        push_u16(&mut subtable, value);
    }

    // Windows, Unicode BMP
    with_cmap(3, 1, &subtable)
}

/// Builds an sfnt whose only `cmap` subtable is a Mac Roman format 0 table
/// mapping `A` to glyph 1 and byte `0x8E` (`é`) to glyph 5.
pub(crate) fn mac_roman() -> Vec<u8> {
    let mut subtable = Vec::new();
    push_u16(&mut subtable, 0); // format
    push_u16(&mut subtable, 262); // length
    push_u16(&mut subtable, 0); // language
    let mut glyphs = [0_u8; 256];
    glyphs[0x41] = 1;
    glyphs[0x8E] = 5;
    subtable.extend_from_slice(&glyphs);
    // Macintosh, Roman
    with_cmap(1, 0, &subtable)
}

fn with_cmap(platform: u16, encoding: u16, subtable: &[u8]) -> Vec<u8> {
    let mut cmap = Vec::new();
    push_u16(&mut cmap, 0); // version
    push_u16(&mut cmap, 1); // numTables
    push_u16(&mut cmap, platform);
    push_u16(&mut cmap, encoding);
    push_u32(&mut cmap, 12);
    cmap.extend_from_slice(subtable);

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, 1); // numTables
    push_u16(&mut font, 16); // searchRange
    push_u16(&mut font, 0); // entrySelector
    push_u16(&mut font, 0); // rangeShift
    font.extend_from_slice(b"cmap");
    push_u32(&mut font, 0); // checksum
    push_u32(&mut font, 28); // offset
    push_u32(&mut font, u32::try_from(cmap.len()).unwrap());
    font.extend_from_slice(&cmap);
    font
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

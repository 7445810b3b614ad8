// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caption language hints.

use core::fmt;

/// ISO 639-2 codes (bibliographic and terminologic) and ISO 639-1 codes
/// paired with the BCP 47 tag passed to the font backends.
const LANGUAGES: &[(&[&str], &str)] = &[
    (&["jpn", "ja"], "ja"),
    (&["eng", "en"], "en"),
    (&["por", "pt"], "pt"),
    (&["spa", "es"], "es"),
    (&["zho", "chi", "zh"], "zh"),
    (&["kor", "ko"], "ko"),
    (&["fra", "fre", "fr"], "fr"),
    (&["deu", "ger", "de"], "de"),
];

/// Language used as a matching hint by the font backends.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Language(&'static str);

impl Language {
    /// Japanese, the language of ARIB and most ISDB captions.
    pub const JAPANESE: Self = Self("ja");

    /// Looks up a language from an ISO 639-2 or ISO 639-1 code.
    ///
    /// Matching is case-insensitive. Returns `None` for codes without a
    /// known mapping.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        LANGUAGES
            .iter()
            .find(|(codes, _)| codes.iter().any(|c| c.eq_ignore_ascii_case(code)))
            .map(|(_, tag)| Self(tag))
    }

    /// Returns the BCP 47 tag for the language.
    pub fn tag(self) -> &'static str {
        self.0
    }

    /// Returns true for Chinese, Japanese and Korean.
    pub fn is_cjk(self) -> bool {
        matches!(self.0, "ja" | "zh" | "ko")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

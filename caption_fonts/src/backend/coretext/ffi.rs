// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font lookup through CoreText.

#![allow(unsafe_code, reason = "CoreText is only reachable through its C API")]

use crate::{
    Context, Error, FaceDescriptor, Language, ProviderType, backend::SystemFonts,
    collection_index, family_name::FamilyKey,
};
use core::ptr::{null, null_mut};
use hashbrown::HashMap;
use objc2_core_foundation::{CFDictionary, CFRange, CFRetained, CFString, CFURL};
use objc2_core_text::{CTFont, CTFontDescriptor, CTFontUIFontType, kCTFontURLAttribute};
use std::{ffi::OsStr, path::Path};

/// PostScript name of the font CoreText returns when nothing covers a
/// string.
const LAST_RESORT: &str = "LastResort";

/// CoreText needs no connection; this only caches collection indices, which
/// CoreText doesn't report.
#[derive(Debug, Default)]
pub(crate) struct CoreText {
    collection_indices: HashMap<String, u32>,
}

impl CoreText {
    fn describe(&mut self, font: &CTFont) -> Option<FaceDescriptor> {
        let family = unsafe { font.family_name() }.to_string();
        let postscript_name = unsafe { font.post_script_name() }.to_string();
        let url = unsafe { font.attribute(kCTFontURLAttribute) }?
            .downcast::<CFURL>()
            .ok()?;
        let path = url.to_file_path()?;
        let index = self.collection_index(&path, &postscript_name);
        Some(
            FaceDescriptor::new(&family, path.as_path(), index)
                .with_postscript_name(&postscript_name),
        )
    }

    fn collection_index(&mut self, path: &Path, postscript_name: &str) -> u32 {
        let is_collection = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("ttc") || ext.eq_ignore_ascii_case("otc")
            });
        if !is_collection {
            return 0;
        }
        if let Some(index) = self.collection_indices.get(postscript_name) {
            return *index;
        }
        let index = std::fs::read(path)
            .ok()
            .and_then(|data| collection_index(&data, postscript_name))
            .unwrap_or(0);
        self.collection_indices.insert(postscript_name.to_owned(), index);
        index
    }
}

impl SystemFonts for CoreText {
    fn open(_kind: ProviderType, context: &Context) -> Result<Self, Error> {
        let base = create_base_font()
            .ok_or_else(|| Error::Initialization("CoreText returned no system font".into()))?;
        context.verbose(format_args!(
            "CoreText base font is {}",
            unsafe { base.family_name() }
        ));
        Ok(Self::default())
    }

    fn match_family(&mut self, family: &str, _language: Option<Language>) -> Vec<FaceDescriptor> {
        let font = font_with_name(family);
        // CoreText substitutes a default font for unknown names.
        let key = FamilyKey::new(family);
        let family_name = unsafe { font.family_name() }.to_string();
        let postscript_name = unsafe { font.post_script_name() }.to_string();
        if !key.matches(&family_name) && !key.matches(&postscript_name) {
            return Vec::new();
        }
        self.describe(&font).into_iter().collect()
    }

    fn match_codepoint(
        &mut self,
        ch: char,
        preferred_family: Option<&str>,
        language: Option<Language>,
    ) -> Option<FaceDescriptor> {
        let base = match preferred_family {
            Some(family) => font_with_name(family),
            None => create_base_font()?,
        };
        let mut buf = [0_u8; 4];
        let text = CFString::from_str(ch.encode_utf8(&mut buf));
        let text_range = CFRange {
            location: 0,
            length: text.length(),
        };
        let locale = language.map(|language| CFString::from_str(language.tag()));
        let font = unsafe {
            if let Some(locale) = locale {
                CTFont::for_string_with_language(&base, &text, text_range, Some(&locale))
            } else {
                CTFont::for_string(&base, &text, text_range)
            }
        };
        let descriptor = self.describe(&font)?;
        (descriptor.postscript_name() != Some(LAST_RESORT)).then_some(descriptor)
    }
}

fn font_with_name(name: &str) -> CFRetained<CTFont> {
    let name = CFString::from_str(name);
    unsafe { CTFont::with_name(&name, 0.0, null()) }
}

fn create_base_font() -> Option<CFRetained<CTFont>> {
    if let Some(font) =
        unsafe { CTFont::new_ui_font_for_language(CTFontUIFontType::System, 0.0, None) }
    {
        return Some(font);
    }
    unsafe {
        let attrs = CFDictionary::new(None, null_mut(), null_mut(), 0, null(), null())?;
        let desc = CTFontDescriptor::with_attributes(&attrs);
        Some(CTFont::with_font_descriptor(&desc, 0.0, null()))
    }
}

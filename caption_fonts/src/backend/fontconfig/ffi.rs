// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Safe wrappers over the parts of the Fontconfig C API used for matching.

#![allow(unsafe_code, reason = "Fontconfig is only reachable through its C API")]

use super::convert::{style_from_fontconfig, weight_from_fontconfig};
use crate::{
    Context, Error, FaceDescriptor, Language, ProviderType, backend::SystemFonts,
    family_name::FamilyKey,
};
use core::{
    ffi::{CStr, c_char},
    fmt,
    marker::PhantomData,
    ptr::NonNull,
};
use std::{
    borrow::Cow,
    ffi::{CString, OsStr},
    os::unix::ffi::OsStrExt,
    path::Path,
};

use fontconfig_sys::{
    FcChar8, FcCharSet, FcConfig, FcFontSet, FcLangSet, FcMatchKind, FcMatchPattern, FcPattern,
    FcResult, FcResultMatch, FcResultNoId, FcResultNoMatch, FcResultOutOfMemory,
    FcResultTypeMismatch,
    constants::{
        FC_CHARSET, FC_FAMILY, FC_FILE, FC_INDEX, FC_LANG, FC_OUTLINE, FC_SLANT, FC_WEIGHT,
    },
    statics::{LIB, LIB_RESULT},
};

const FC_POSTSCRIPT_NAME: &CStr = c"postscriptname";

/// Family names that Fontconfig resolves through its alias rules rather
/// than a family of that name.
const GENERIC_FAMILY_NAMES: &[&str] = &[
    "serif",
    "sans-serif",
    "sans",
    "monospace",
    "mono",
    "cursive",
    "fantasy",
    "system-ui",
    "emoji",
    "math",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MatchErr {
    NoMatch,
    TypeMismatch,
    NoId,
    OutOfMemory,
    Other,
}

impl MatchErr {
    fn from_raw(raw: FcResult) -> Self {
        #[allow(non_upper_case_globals, reason = "Fontconfig constants")]
        match raw {
            FcResultNoMatch => Self::NoMatch,
            FcResultTypeMismatch => Self::TypeMismatch,
            FcResultNoId => Self::NoId,
            FcResultOutOfMemory => Self::OutOfMemory,
            _ => Self::Other,
        }
    }
}

type MatchResult<T> = Result<T, MatchErr>;

/// Ownership for refcounted Fontconfig objects. Used to track if a given
/// fontconfig function returns an object that it owns or is passing its
/// ownership to us.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Ownership {
    /// This object is owned by Fontconfig and needs to be freed by it.
    Fontconfig,
    /// This object is owned by the application.
    Application,
}

/// Wrapper for an `FcPattern`.
struct Pattern {
    inner: NonNull<FcPattern>,
}

impl Pattern {
    fn new() -> Option<Self> {
        unsafe { Self::from_raw((LIB.FcPatternCreate)(), Ownership::Application) }
    }

    unsafe fn from_raw(raw: *mut FcPattern, ownership: Ownership) -> Option<Self> {
        let inner = NonNull::new(raw)?;
        // Take our own reference so that dropping doesn't free Fontconfig's.
        if ownership == Ownership::Fontconfig {
            unsafe {
                (LIB.FcPatternReference)(inner.as_ptr());
            }
        }
        Some(Self { inner })
    }

    fn add_string(&mut self, object: &CStr, s: &CStr) -> bool {
        // All objects passed to FcPatternAddWhatever are cloned.
        unsafe {
            (LIB.FcPatternAddString)(self.inner.as_ptr(), object.as_ptr(), s.as_ptr() as *const _)
                != 0
        }
    }

    fn add_bool(&mut self, object: &CStr, value: bool) -> bool {
        unsafe {
            (LIB.FcPatternAddBool)(self.inner.as_ptr(), object.as_ptr(), i32::from(value)) != 0
        }
    }

    fn add_charset(&mut self, object: &CStr, s: &CharSet) -> bool {
        unsafe {
            (LIB.FcPatternAddCharSet)(self.inner.as_ptr(), object.as_ptr(), s.inner.as_ptr()) != 0
        }
    }

    fn add_langset(&mut self, object: &CStr, s: &LangSet) -> bool {
        unsafe {
            (LIB.FcPatternAddLangSet)(self.inner.as_ptr(), object.as_ptr(), s.inner.as_ptr()) != 0
        }
    }

    /// Fills in any properties the caller left unset with their defaults.
    fn default_substitute(&mut self) {
        unsafe { (LIB.FcDefaultSubstitute)(self.inner.as_ptr()) };
    }

    fn get_string<'a>(&'a self, object: &CStr, n: u32) -> MatchResult<Cow<'a, str>> {
        Ok(self.get_c_string(object, n)?.to_string_lossy())
    }

    fn get_c_string<'a>(&'a self, object: &CStr, n: u32) -> MatchResult<&'a CStr> {
        let mut dest: *mut FcChar8 = std::ptr::null_mut();
        let result = unsafe {
            (LIB.FcPatternGetString)(
                self.inner.as_ptr(),
                object.as_ptr(),
                n.try_into().map_err(|_| MatchErr::Other)?,
                &raw mut dest,
            )
        };
        if result != FcResultMatch {
            return Err(MatchErr::from_raw(result));
        }
        let dest = NonNull::new(dest).ok_or(MatchErr::Other)?;
        Ok(unsafe { CStr::from_ptr(dest.as_ptr() as *const _) })
    }

    fn get_int(&self, object: &CStr, n: u32) -> MatchResult<i32> {
        let mut dest = 0;
        let result = unsafe {
            (LIB.FcPatternGetInteger)(
                self.inner.as_ptr(),
                object.as_ptr(),
                n.try_into().map_err(|_| MatchErr::Other)?,
                &raw mut dest,
            )
        };
        if result != FcResultMatch {
            return Err(MatchErr::from_raw(result));
        }
        Ok(dest)
    }

    /// Returns every family name of the pattern, preferred name first.
    fn family_names(&self) -> impl Iterator<Item = Cow<'_, str>> {
        (0..).map_while(move |i| self.get_string(FC_FAMILY, i).ok())
    }

    /// Returns true if the pattern's `FC_CHARSET` contains `ch`.
    fn has_char(&self, ch: char) -> bool {
        let mut charset: *mut FcCharSet = std::ptr::null_mut();
        let result = unsafe {
            (LIB.FcPatternGetCharSet)(
                self.inner.as_ptr(),
                FC_CHARSET.as_ptr(),
                0,
                &raw mut charset,
            )
        };
        if result != FcResultMatch || charset.is_null() {
            return false;
        }
        // The charset is borrowed from the pattern, which outlives this call.
        unsafe { (LIB.FcCharSetHasChar)(charset, u32::from(ch)) != 0 }
    }
}

impl Drop for Pattern {
    fn drop(&mut self) {
        unsafe { (LIB.FcPatternDestroy)(self.inner.as_ptr()) };
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NonNull::new(unsafe { (LIB.FcNameUnparse)(self.inner.as_ptr()) }) {
            Some(unparsed) => {
                let res = f.write_str(unsafe {
                    &CStr::from_ptr(unparsed.as_ptr() as *const c_char).to_string_lossy()
                });
                unsafe { (LIB.FcStrFree)(unparsed.as_ptr()) };
                res
            }
            None => f.debug_struct("Pattern").finish_non_exhaustive(),
        }
    }
}

/// Sorted match results. The patterns may be shared with other sort results
/// and must not be modified.
struct FontSet<'a> {
    inner: NonNull<FcFontSet>,
    _parent: PhantomData<&'a ()>,
}

impl FontSet<'_> {
    /// Takes ownership of a set returned by `FcFontSort`.
    unsafe fn from_raw(raw: *mut FcFontSet) -> Option<Self> {
        let inner = NonNull::new(raw)?;
        Some(Self {
            inner,
            _parent: PhantomData,
        })
    }

    fn iter(&self) -> FontSetIter<'_> {
        FontSetIter {
            i: 0,
            font_set: self,
        }
    }
}

impl Drop for FontSet<'_> {
    fn drop(&mut self) {
        unsafe { (LIB.FcFontSetDestroy)(self.inner.as_ptr()) };
    }
}

struct FontSetIter<'a> {
    i: usize,
    font_set: &'a FontSet<'a>,
}

impl Iterator for FontSetIter<'_> {
    type Item = Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        let font_set = self.font_set.inner.as_ptr();
        if self.i >= unsafe { (*font_set).nfont }.try_into().ok()? {
            None
        } else {
            let pattern: *mut FcPattern = unsafe { *(*font_set).fonts.add(self.i) };
            self.i += 1;
            unsafe { Pattern::from_raw(pattern, Ownership::Fontconfig) }
        }
    }
}

struct LangSet {
    inner: NonNull<FcLangSet>,
}

impl LangSet {
    fn new(language: Language) -> Option<Self> {
        let inner = NonNull::new(unsafe { (LIB.FcLangSetCreate)() })?;
        let set = Self { inner };
        let tag = CString::new(language.tag()).ok()?;
        let added = unsafe { (LIB.FcLangSetAdd)(set.inner.as_ptr(), tag.as_ptr() as *const _) };
        (added != 0).then_some(set)
    }
}

impl Drop for LangSet {
    fn drop(&mut self) {
        unsafe { (LIB.FcLangSetDestroy)(self.inner.as_ptr()) };
    }
}

struct CharSet {
    inner: NonNull<FcCharSet>,
}

impl CharSet {
    fn new(ch: char) -> Option<Self> {
        let inner = NonNull::new(unsafe { (LIB.FcCharSetCreate)() })?;
        let set = Self { inner };
        let added = unsafe { (LIB.FcCharSetAddChar)(set.inner.as_ptr(), u32::from(ch)) };
        (added != 0).then_some(set)
    }
}

impl Drop for CharSet {
    fn drop(&mut self) {
        unsafe { (LIB.FcCharSetDestroy)(self.inner.as_ptr()) };
    }
}

struct Config {
    inner: NonNull<FcConfig>,
}

impl Config {
    /// Loads the user's configuration and builds the system font set.
    fn load() -> Result<Self, Error> {
        // fontconfig returns a new config object each time we call FcInitLoadConfig
        let inner = NonNull::new(unsafe { (LIB.FcInitLoadConfig)() }).ok_or_else(|| {
            Error::Initialization("Fontconfig could not load its configuration".into())
        })?;
        let config = Self { inner };
        if unsafe { (LIB.FcConfigBuildFonts)(config.inner.as_ptr()) } == 0 {
            return Err(Error::Initialization(
                "Fontconfig could not build the system font set".into(),
            ));
        }
        Ok(config)
    }

    /// Returns false once a configuration file or font directory has
    /// changed since the font set was built.
    fn is_up_to_date(&self) -> bool {
        unsafe { (LIB.FcConfigUptoDate)(self.inner.as_ptr()) != 0 }
    }

    fn substitute(&self, pattern: &mut Pattern, kind: FcMatchKind) {
        unsafe { (LIB.FcConfigSubstitute)(self.inner.as_ptr(), pattern.inner.as_ptr(), kind) };
    }

    fn font_sort<'ret, 'pat: 'ret>(
        &self,
        pattern: &'pat Pattern,
        trim: bool,
    ) -> MatchResult<FontSet<'ret>> {
        let mut result = 0;
        // The returned FcFontSet is for us to free
        let font_set = unsafe {
            FontSet::from_raw((LIB.FcFontSort)(
                self.inner.as_ptr(),
                pattern.inner.as_ptr(),
                i32::from(trim),
                std::ptr::null_mut(),
                &raw mut result,
            ))
        }
        .ok_or(MatchErr::Other)?;
        if result != FcResultMatch {
            return Err(MatchErr::from_raw(result));
        }
        Ok(font_set)
    }

    fn font_render_prepare(&self, pat: &Pattern, font: &Pattern) -> Option<Pattern> {
        unsafe {
            Pattern::from_raw(
                (LIB.FcFontRenderPrepare)(
                    self.inner.as_ptr(),
                    pat.inner.as_ptr(),
                    font.inner.as_ptr(),
                ),
                Ownership::Application,
            )
        }
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        unsafe { (LIB.FcConfigDestroy)(self.inner.as_ptr()) };
    }
}

/// An open Fontconfig configuration with its system font set.
pub(crate) struct Fontconfig {
    config: Config,
}

// The config is only reachable through `&mut self` of the owning provider.
unsafe impl Send for Fontconfig {}

impl fmt::Debug for Fontconfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fontconfig")
            .field("config", &self.config.inner)
            .finish()
    }
}

impl Fontconfig {
    /// Rebuilds the font set if fonts were installed or removed since it was
    /// built. A failed rebuild keeps the old set.
    fn refresh(&mut self) {
        if self.config.is_up_to_date() {
            return;
        }
        if let Ok(config) = Config::load() {
            self.config = config;
        }
    }

    /// Builds a substituted query pattern.
    fn query(
        &self,
        family: Option<&str>,
        ch: Option<char>,
        language: Option<Language>,
    ) -> Option<Pattern> {
        let mut pattern = Pattern::new()?;
        if let Some(family) = family {
            pattern.add_string(FC_FAMILY, CString::new(family).ok()?.as_c_str());
        }
        if let Some(ch) = ch {
            pattern.add_charset(FC_CHARSET, &CharSet::new(ch)?);
        }
        if let Some(set) = language.and_then(LangSet::new) {
            pattern.add_langset(FC_LANG, &set);
        }
        // Captions are rendered at arbitrary sizes; bitmap fonts won't do.
        pattern.add_bool(FC_OUTLINE, true);
        self.config.substitute(&mut pattern, FcMatchPattern);
        pattern.default_substitute();
        Some(pattern)
    }
}

impl SystemFonts for Fontconfig {
    fn open(_kind: ProviderType, context: &Context) -> Result<Self, Error> {
        if LIB_RESULT.as_ref().is_err() {
            return Err(Error::LibraryUnavailable("fontconfig"));
        }
        let config = Config::load()?;
        context.verbose(format_args!("loaded the Fontconfig configuration"));
        Ok(Self { config })
    }

    fn match_family(&mut self, family: &str, language: Option<Language>) -> Vec<FaceDescriptor> {
        self.refresh();
        let Some(pattern) = self.query(Some(family), None, language) else {
            return Vec::new();
        };
        let Ok(fonts) = self.config.font_sort(&pattern, false) else {
            return Vec::new();
        };
        let mut key = FamilyKey::new(family);
        let is_generic = GENERIC_FAMILY_NAMES.iter().any(|name| key.matches(name));
        let mut faces = Vec::new();
        for font in fonts.iter() {
            let Some(font) = self.config.font_render_prepare(&pattern, &font) else {
                continue;
            };
            // A generic name stands for whatever family the aliases put first.
            if is_generic && faces.is_empty() {
                if let Ok(name) = font.get_string(FC_FAMILY, 0) {
                    key = FamilyKey::new(&name);
                }
            }
            // Results are sorted by closeness, so the first face of another
            // family marks the start of the fallbacks.
            if !font.family_names().any(|name| key.matches(&name)) {
                break;
            }
            faces.extend(describe(&font));
        }
        faces
    }

    fn match_codepoint(
        &mut self,
        ch: char,
        preferred_family: Option<&str>,
        language: Option<Language>,
    ) -> Option<FaceDescriptor> {
        self.refresh();
        let pattern = self.query(preferred_family, Some(ch), language)?;
        // Trimming drops fonts that add no coverage over the ones before them.
        let fonts = self.config.font_sort(&pattern, true).ok()?;
        let font = fonts.iter().find(|font| font.has_char(ch))?;
        let font = self.config.font_render_prepare(&pattern, &font)?;
        describe(&font)
    }
}

fn describe(font: &Pattern) -> Option<FaceDescriptor> {
    let family = font.get_string(FC_FAMILY, 0).ok()?;
    let path = font.get_c_string(FC_FILE, 0).ok()?;
    let path = Path::new(OsStr::from_bytes(path.to_bytes()));
    // The upper 16 bits select a named instance of a variable font.
    let index = font
        .get_int(FC_INDEX, 0)
        .map_or(0, |index| u32::try_from(index & 0xFFFF).unwrap_or(0));
    let weight = font
        .get_int(FC_WEIGHT, 0)
        .map_or(FaceDescriptor::NORMAL_WEIGHT, weight_from_fontconfig);
    let style = font
        .get_int(FC_SLANT, 0)
        .map(style_from_fontconfig)
        .unwrap_or_default();
    let mut descriptor = FaceDescriptor::new(&family, path, index)
        .with_weight(weight)
        .with_style(style);
    if let Ok(name) = font.get_string(FC_POSTSCRIPT_NAME, 0) {
        descriptor = descriptor.with_postscript_name(&name);
    }
    Some(descriptor)
}

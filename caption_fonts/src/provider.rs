// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The provider contract shared by every backend.

use crate::{Context, Error, FaceDescriptor, FontFace, Language};
use core::{fmt, str::FromStr};
use std::sync::Arc;

/// Selector passed to [`create_provider`](crate::create_provider).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum ProviderType {
    /// Use the backend compiled for the current platform.
    #[default]
    Auto,
    /// Apple CoreText.
    CoreText,
    /// Fontconfig.
    Fontconfig,
    /// DirectWrite. Reserved: no backend exists yet.
    DirectWrite,
}

impl ProviderType {
    /// Returns the backend that [`Auto`](Self::Auto) resolves to in this
    /// build, or `None` if the platform has no backend.
    pub const fn native() -> Option<Self> {
        #[cfg(target_vendor = "apple")]
        let native = Some(Self::CoreText);
        #[cfg(target_os = "windows")]
        let native = None;
        #[cfg(not(any(target_vendor = "apple", target_os = "windows")))]
        let native = Some(Self::Fontconfig);
        native
    }

    /// Resolves [`Auto`](Self::Auto) to the native backend. Every other value
    /// is returned unchanged.
    pub const fn resolve(self) -> Option<Self> {
        match self {
            Self::Auto => Self::native(),
            other => Some(other),
        }
    }

    /// Returns the lowercase name used by [`Display`](fmt::Display) and
    /// [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::CoreText => "coretext",
            Self::Fontconfig => "fontconfig",
            Self::DirectWrite => "directwrite",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseProviderTypeError(String);

impl fmt::Display for ParseProviderTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown font provider `{}`", self.0)
    }
}

impl std::error::Error for ParseProviderTypeError {}

impl FromStr for ProviderType {
    type Err = ParseProviderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Auto,
            Self::CoreText,
            Self::Fontconfig,
            Self::DirectWrite,
        ]
        .into_iter()
        .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ParseProviderTypeError(s.to_owned()))
    }
}

/// Uniform access to a platform font subsystem.
///
/// Instances come from [`create_provider`](crate::create_provider) and are
/// owned exclusively by the caller. Construction is cheap; call
/// [`initialize`](Self::initialize) before any lookup.
pub trait FontProvider: Send + fmt::Debug {
    /// Returns the concrete backend behind this provider. Never
    /// [`ProviderType::Auto`].
    fn kind(&self) -> ProviderType;

    /// Returns the context this provider was created with.
    fn context(&self) -> &Arc<Context>;

    /// Returns true once [`initialize`](Self::initialize) has succeeded.
    fn is_initialized(&self) -> bool;

    /// Opens the platform font database.
    ///
    /// This may block on system font cache access. Calling it again after
    /// it succeeded does nothing; calling it after a failure tries again.
    /// While it has not succeeded every lookup returns
    /// [`Error::NotInitialized`].
    fn initialize(&mut self) -> Result<(), Error>;

    /// Sets the caption language from an ISO 639-2 or ISO 639-1 code, or
    /// clears it with `None`. Unknown codes are logged and clear the hint.
    fn set_language(&mut self, code: Option<&str>);

    /// Returns the current language hint.
    fn language(&self) -> Option<Language>;

    /// Returns the faces of `family`, best match first.
    ///
    /// An empty list means the family is not installed.
    fn match_family(&mut self, family: &str) -> Result<Vec<FaceDescriptor>, Error>;

    /// Finds a face with a glyph for `ch`, preferring `preferred_family`.
    ///
    /// `Ok(None)` means no installed face covers the character.
    fn match_codepoint(
        &mut self,
        ch: char,
        preferred_family: Option<&str>,
    ) -> Result<Option<FaceDescriptor>, Error>;

    /// Loads the face described by `descriptor`.
    ///
    /// The font set can change between a match and the load; such failures
    /// are [retryable](Error::is_retryable) by matching again.
    fn load_face(&mut self, descriptor: &FaceDescriptor) -> Result<FontFace, Error>;

    /// Family names tried by [`resolve_face`](Self::resolve_face) when the
    /// caller passes none.
    fn default_families(&self) -> &'static [&'static str];

    /// Resolves a loaded face for `ch` (or for any text when `ch` is
    /// `None`), trying `families` in order before falling back to coverage
    /// matching.
    ///
    /// Candidates whose load fails with a retryable error are skipped.
    fn resolve_face(&mut self, families: &[&str], ch: Option<char>) -> Result<FontFace, Error> {
        let families: &[&str] = if families.is_empty() {
            self.default_families()
        } else {
            families
        };
        for family in families {
            for descriptor in self.match_family(family)? {
                let face = match self.load_face(&descriptor) {
                    Ok(face) => face,
                    Err(err) if err.is_retryable() => {
                        self.context().warn(format_args!("skipping {family}: {err}"));
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                if ch.is_none_or(|ch| face.has_codepoint(ch)) {
                    return Ok(face);
                }
            }
        }
        let Some(ch) = ch else {
            return Err(Error::FontNotFound(families.join(", ")));
        };
        let Some(descriptor) = self.match_codepoint(ch, families.first().copied())? else {
            return Err(Error::CodepointNotFound(ch));
        };
        match self.load_face(&descriptor) {
            Ok(face) => Ok(face),
            Err(err) if err.is_retryable() => {
                self.context().warn(format_args!(
                    "fallback face {} for {ch:?} failed to load: {err}",
                    descriptor.family_name()
                ));
                Err(Error::CodepointNotFound(ch))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FontProvider, ProviderType};
    use crate::{
        Blob, Context, Error, FaceDescriptor, FontFace, Language, test_font,
    };
    use std::{collections::HashMap, path::Path, sync::Arc};

    #[test]
    fn auto_resolution() {
        assert_eq!(ProviderType::Auto.resolve(), ProviderType::native());
        assert_eq!(ProviderType::CoreText.resolve(), Some(ProviderType::CoreText));
        assert_eq!(ProviderType::Fontconfig.resolve(), Some(ProviderType::Fontconfig));
        assert_eq!(ProviderType::DirectWrite.resolve(), Some(ProviderType::DirectWrite));
        assert_ne!(ProviderType::native(), Some(ProviderType::Auto));
    }

    #[test]
    fn parse_and_display() {
        for kind in [
            ProviderType::Auto,
            ProviderType::CoreText,
            ProviderType::Fontconfig,
            ProviderType::DirectWrite,
        ] {
            assert_eq!(kind.to_string().parse::<ProviderType>(), Ok(kind));
        }
        assert_eq!("CoreText".parse::<ProviderType>(), Ok(ProviderType::CoreText));
        let err = "freetype".parse::<ProviderType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown font provider `freetype`");
    }

    /// Provider over a fixed table of in-memory faces.
    #[derive(Debug)]
    struct FixedProvider {
        context: Arc<Context>,
        families: HashMap<&'static str, Vec<FaceDescriptor>>,
        fallback: Option<FaceDescriptor>,
    }

    impl FixedProvider {
        fn new() -> Self {
            let latin = Blob::new(Arc::new(test_font::uppercase_latin()));
            let removed = Path::new("/nonexistent/caption_fonts/removed.ttf");
            let mut families = HashMap::new();
            families.insert("Latin", vec![FaceDescriptor::new("Latin", latin.clone(), 0)]);
            families.insert(
                "Broken",
                vec![
                    FaceDescriptor::new("Broken", removed, 0),
                    FaceDescriptor::new("Broken", latin.clone(), 0),
                ],
            );
            Self {
                context: Arc::new(Context::default()),
                families,
                fallback: Some(FaceDescriptor::new("Fallback", latin, 0)),
            }
        }
    }

    impl FontProvider for FixedProvider {
        fn kind(&self) -> ProviderType {
            ProviderType::Fontconfig
        }

        fn context(&self) -> &Arc<Context> {
            &self.context
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn initialize(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn set_language(&mut self, _code: Option<&str>) {}

        fn language(&self) -> Option<Language> {
            None
        }

        fn match_family(&mut self, family: &str) -> Result<Vec<FaceDescriptor>, Error> {
            Ok(self.families.get(family).cloned().unwrap_or_default())
        }

        fn match_codepoint(
            &mut self,
            ch: char,
            _preferred_family: Option<&str>,
        ) -> Result<Option<FaceDescriptor>, Error> {
            Ok(self.fallback.clone().filter(|_| ch.is_ascii_uppercase()))
        }

        fn load_face(&mut self, descriptor: &FaceDescriptor) -> Result<FontFace, Error> {
            FontFace::load(descriptor)
        }

        fn default_families(&self) -> &'static [&'static str] {
            &["Missing", "Latin"]
        }
    }

    #[test]
    fn resolve_first_covering_family() {
        let mut provider = FixedProvider::new();
        let face = provider.resolve_face(&["Missing", "Latin"], Some('A')).unwrap();
        assert_eq!(face.descriptor().family_name(), "Latin");
    }

    #[test]
    fn resolve_uses_defaults() {
        let mut provider = FixedProvider::new();
        let face = provider.resolve_face(&[], None).unwrap();
        assert_eq!(face.descriptor().family_name(), "Latin");
    }

    #[test]
    fn resolve_skips_unloadable_candidates() {
        let mut provider = FixedProvider::new();
        let face = provider.resolve_face(&["Broken"], Some('B')).unwrap();
        assert_eq!(face.descriptor().family_name(), "Broken");
        assert!(face.has_codepoint('B'), "second candidate covers B");
    }

    #[test]
    fn resolve_stops_at_bad_caller_data() {
        let mut provider = FixedProvider::new();
        let junk = Blob::new(Arc::new(b"junk".to_vec()));
        provider
            .families
            .insert("Junk", vec![FaceDescriptor::new("Junk", junk, 0)]);
        let err = provider.resolve_face(&["Junk", "Latin"], Some('A')).unwrap_err();
        assert!(
            matches!(err, Error::InvalidFace { path: None, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn resolve_falls_back_to_coverage() {
        let mut provider = FixedProvider::new();
        provider.families.remove("Latin");
        let face = provider.resolve_face(&["Latin"], Some('Z')).unwrap();
        assert_eq!(face.descriptor().family_name(), "Fallback");
    }

    #[test]
    fn resolve_reports_missing_coverage() {
        let mut provider = FixedProvider::new();
        let err = provider.resolve_face(&["Latin"], Some('あ')).unwrap_err();
        assert!(matches!(err, Error::CodepointNotFound('あ')), "got {err:?}");
    }

    #[test]
    fn resolve_reports_missing_families() {
        let mut provider = FixedProvider::new();
        let err = provider.resolve_face(&["Nope", "Nada"], None).unwrap_err();
        assert!(
            matches!(&err, Error::FontNotFound(list) if list == "Nope, Nada"),
            "got {err:?}"
        );
    }
}

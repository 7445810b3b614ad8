// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provider state shared by the system backends.

use super::SystemFonts;
use crate::{
    Context, Error, FaceDescriptor, FontFace, FontProvider, Language, ProviderType,
    family_name::FamilyKey,
};
use hashbrown::HashMap;
use std::sync::Arc;

/// A [`FontProvider`] backed by a platform font database.
///
/// Nothing touches the platform until [`initialize`](FontProvider::initialize)
/// opens `S`.
#[derive(Debug)]
pub(crate) struct SystemProvider<S> {
    kind: ProviderType,
    default_families: fn(Option<Language>) -> &'static [&'static str],
    context: Arc<Context>,
    language: Option<Language>,
    fonts: Option<S>,
    /// Family matches for the current language.
    family_cache: HashMap<FamilyKey, Vec<FaceDescriptor>>,
}

impl<S: SystemFonts> SystemProvider<S> {
    pub(crate) fn new(
        kind: ProviderType,
        default_families: fn(Option<Language>) -> &'static [&'static str],
        context: Arc<Context>,
    ) -> Self {
        let language = context
            .language()
            .and_then(|code| parse_language(&context, code));
        Self {
            kind,
            default_families,
            context,
            language,
            fonts: None,
            family_cache: HashMap::new(),
        }
    }

    fn fonts(&mut self) -> Result<&mut S, Error> {
        self.fonts.as_mut().ok_or(Error::NotInitialized)
    }

    /// Drops cached family matches that name the file behind `descriptor`,
    /// so the next match asks the backend again.
    fn forget_source(&mut self, descriptor: &FaceDescriptor) {
        let Some(path) = descriptor.source().path() else {
            return;
        };
        self.family_cache
            .retain(|_, faces| !faces.iter().any(|face| face.source().path() == Some(path)));
    }
}

impl<S: SystemFonts> FontProvider for SystemProvider<S> {
    fn kind(&self) -> ProviderType {
        self.kind
    }

    fn context(&self) -> &Arc<Context> {
        &self.context
    }

    fn is_initialized(&self) -> bool {
        self.fonts.is_some()
    }

    fn initialize(&mut self) -> Result<(), Error> {
        if self.fonts.is_some() {
            return Ok(());
        }
        match S::open(self.kind, &self.context) {
            Ok(fonts) => {
                self.context
                    .verbose(format_args!("{} font provider initialized", self.kind));
                self.fonts = Some(fonts);
                Ok(())
            }
            Err(err) => {
                self.context.error(format_args!("{}: {err}", self.kind));
                Err(err)
            }
        }
    }

    fn set_language(&mut self, code: Option<&str>) {
        let language = code.and_then(|code| parse_language(&self.context, code));
        if language != self.language {
            self.language = language;
            self.family_cache.clear();
        }
    }

    fn language(&self) -> Option<Language> {
        self.language
    }

    fn match_family(&mut self, family: &str) -> Result<Vec<FaceDescriptor>, Error> {
        let language = self.language;
        let key = FamilyKey::new(family);
        if let Some(faces) = self.family_cache.get(&key) {
            return Ok(faces.clone());
        }
        let faces = self.fonts()?.match_family(family, language);
        self.context.verbose(format_args!(
            "{}: family {family:?} matched {} face(s)",
            self.kind,
            faces.len()
        ));
        self.family_cache.insert(key, faces.clone());
        Ok(faces)
    }

    fn match_codepoint(
        &mut self,
        ch: char,
        preferred_family: Option<&str>,
    ) -> Result<Option<FaceDescriptor>, Error> {
        let language = self.language;
        let face = self
            .fonts()?
            .match_codepoint(ch, preferred_family, language);
        match &face {
            Some(face) => self.context.verbose(format_args!(
                "{}: {ch:?} resolved to {}",
                self.kind,
                face.family_name()
            )),
            None => self
                .context
                .verbose(format_args!("{}: no face covers {ch:?}", self.kind)),
        }
        Ok(face)
    }

    fn load_face(&mut self, descriptor: &FaceDescriptor) -> Result<FontFace, Error> {
        self.fonts()?;
        FontFace::load(descriptor).inspect_err(|err| {
            self.context
                .warn(format_args!("{}: loading {descriptor:?} failed: {err}", self.kind));
            if err.is_retryable() {
                self.forget_source(descriptor);
            }
        })
    }

    fn default_families(&self) -> &'static [&'static str] {
        (self.default_families)(self.language)
    }
}

fn parse_language(context: &Context, code: &str) -> Option<Language> {
    let language = Language::from_code(code);
    if language.is_none() {
        context.warn(format_args!("unknown caption language {code:?}"));
    }
    language
}

#[cfg(test)]
mod tests {
    use super::SystemProvider;
    use crate::{
        Context, ContextOptions, Error, FaceDescriptor, FontProvider, Language, ProviderType,
        backend::{SystemFonts, Unavailable},
        test_font,
    };
    use std::{io::Write as _, path::PathBuf, sync::Arc};

    /// Font database whose files move: each family match hands out the next
    /// path in `paths`.
    #[derive(Debug)]
    struct MovingFonts {
        paths: Vec<PathBuf>,
        matches: usize,
    }

    impl SystemFonts for MovingFonts {
        fn open(kind: ProviderType, _context: &Context) -> Result<Self, Error> {
            Err(Error::Unsupported(kind))
        }

        fn match_family(
            &mut self,
            family: &str,
            _language: Option<Language>,
        ) -> Vec<FaceDescriptor> {
            let path = self.paths[self.matches.min(self.paths.len() - 1)].clone();
            self.matches += 1;
            vec![FaceDescriptor::new(family, path.as_path(), 0)]
        }

        fn match_codepoint(
            &mut self,
            _ch: char,
            _preferred_family: Option<&str>,
            _language: Option<Language>,
        ) -> Option<FaceDescriptor> {
            None
        }
    }

    fn moving(paths: Vec<PathBuf>) -> SystemProvider<MovingFonts> {
        let mut provider = SystemProvider::new(
            ProviderType::Fontconfig,
            helvetica,
            Arc::new(Context::default()),
        );
        provider.fonts = Some(MovingFonts { paths, matches: 0 });
        provider
    }

    fn helvetica(_: Option<Language>) -> &'static [&'static str] {
        &["Helvetica"]
    }

    fn unavailable(context: ContextOptions) -> SystemProvider<Unavailable> {
        SystemProvider::new(
            ProviderType::CoreText,
            helvetica,
            Arc::new(Context::new(context)),
        )
    }

    #[test]
    fn language_comes_from_context() {
        let provider = unavailable(ContextOptions {
            language: Some("jpn".into()),
            ..Default::default()
        });
        assert_eq!(provider.language(), Some(Language::JAPANESE));
    }

    #[test]
    fn unknown_language_clears_hint() {
        let mut provider = unavailable(ContextOptions::default());
        provider.set_language(Some("por"));
        assert_eq!(provider.language().map(Language::tag), Some("pt"));
        provider.set_language(Some("???"));
        assert_eq!(provider.language(), None);
    }

    #[test]
    fn unavailable_backend_fails_cleanly() {
        let mut provider = unavailable(ContextOptions::default());
        let err = provider.initialize().unwrap_err();
        assert!(matches!(err, Error::Unsupported(ProviderType::CoreText)), "got {err:?}");
        assert!(!provider.is_initialized(), "failed init leaves provider unusable");
        assert!(
            matches!(provider.match_family("Helvetica"), Err(Error::NotInitialized)),
            "family lookup before init"
        );
        assert!(
            matches!(provider.match_codepoint('a', None), Err(Error::NotInitialized)),
            "coverage lookup before init"
        );
        assert_eq!(provider.default_families(), ["Helvetica"]);
    }

    #[test]
    fn family_matches_are_cached() {
        let mut provider = moving(vec!["/a.ttf".into(), "/b.ttf".into()]);
        let first = provider.match_family("Caption").unwrap();
        let second = provider.match_family("caption").unwrap();
        assert_eq!(
            first[0].source().path(),
            second[0].source().path(),
            "second lookup is served from the cache"
        );
        assert_eq!(provider.fonts.as_ref().unwrap().matches, 1);
    }

    #[test]
    fn rematch_after_retryable_failure() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.ttf");
        let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(&test_font::uppercase_latin()).unwrap();
        let mut provider = moving(vec![gone.clone(), file.path().to_path_buf()]);

        let first = provider.match_family("Caption").unwrap();
        assert_eq!(first[0].source().path(), Some(gone.as_path()));
        let err = provider.load_face(&first[0]).unwrap_err();
        assert!(err.is_retryable(), "got {err:?}");

        let second = provider.match_family("Caption").unwrap();
        assert_eq!(provider.fonts.as_ref().unwrap().matches, 2, "backend asked again");
        assert_eq!(second[0].source().path(), Some(file.path()));
        assert!(provider.load_face(&second[0]).is_ok(), "fresh match loads");
    }

    #[test]
    fn resolve_recovers_on_the_next_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(&test_font::uppercase_latin()).unwrap();
        let mut provider = moving(vec![dir.path().join("gone.ttf"), file.path().to_path_buf()]);

        let err = provider.resolve_face(&["Caption"], Some('A')).unwrap_err();
        assert!(matches!(err, Error::CodepointNotFound('A')), "got {err:?}");
        let face = provider.resolve_face(&["Caption"], Some('A')).unwrap();
        assert_eq!(face.descriptor().source().path(), Some(file.path()));
    }
}

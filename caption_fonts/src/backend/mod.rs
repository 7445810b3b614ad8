// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! System backends and the factory that picks one.

mod coretext;
mod fontconfig;
mod system;

use crate::{Context, Error, FaceDescriptor, FontProvider, Language, ProviderType};
use core::fmt;
use std::sync::Arc;

/// Creates a provider of the requested type.
///
/// [`ProviderType::Auto`] resolves to the backend compiled for the current
/// platform (see [`ProviderType::native`]). Explicit types are constructed
/// on every platform; if the backend cannot run here,
/// [`FontProvider::initialize`] reports [`Error::Unsupported`].
///
/// Construction does no I/O. Returns [`Error::NoBackend`] when there is no
/// backend at all for the request, which is the case for `Auto` on Windows
/// and for the reserved [`ProviderType::DirectWrite`].
pub fn create_provider(
    kind: ProviderType,
    context: &Arc<Context>,
) -> Result<Box<dyn FontProvider>, Error> {
    match kind.resolve() {
        Some(ProviderType::CoreText) => Ok(Box::new(coretext::provider(context.clone()))),
        Some(ProviderType::Fontconfig) => Ok(Box::new(fontconfig::provider(context.clone()))),
        Some(ProviderType::Auto | ProviderType::DirectWrite) | None => {
            context.error(format_args!("no font provider available for `{kind}`"));
            Err(Error::NoBackend(kind))
        }
    }
}

/// Access to a platform font database, owned by a single provider.
pub(crate) trait SystemFonts: Sized + Send + fmt::Debug {
    /// Opens the font database. May block.
    fn open(kind: ProviderType, context: &Context) -> Result<Self, Error>;

    /// Faces of `family`, best first.
    fn match_family(&mut self, family: &str, language: Option<Language>) -> Vec<FaceDescriptor>;

    /// A face with a glyph for `ch`.
    fn match_codepoint(
        &mut self,
        ch: char,
        preferred_family: Option<&str>,
        language: Option<Language>,
    ) -> Option<FaceDescriptor>;
}

/// Stand-in for a platform font database that is not compiled into this
/// build. It can never be opened.
#[derive(Debug)]
pub(crate) enum Unavailable {}

impl SystemFonts for Unavailable {
    fn open(kind: ProviderType, _context: &Context) -> Result<Self, Error> {
        Err(Error::Unsupported(kind))
    }

    fn match_family(&mut self, _family: &str, _language: Option<Language>) -> Vec<FaceDescriptor> {
        match *self {}
    }

    fn match_codepoint(
        &mut self,
        _ch: char,
        _preferred_family: Option<&str>,
        _language: Option<Language>,
    ) -> Option<FaceDescriptor> {
        match *self {}
    }
}

/// Picks the default family list for `language` from a backend table.
///
/// The last entry of `table` applies to languages without their own row.
fn families_for(
    table: &'static [(Option<&'static str>, &'static [&'static str])],
    language: Option<Language>,
) -> &'static [&'static str] {
    table
        .iter()
        .find(|(tag, _)| tag.is_some() && *tag == language.map(Language::tag))
        .or_else(|| table.last())
        .map_or(&[], |(_, families)| *families)
}

// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptions of matched font faces.

use crate::Blob;
use core::fmt;
use std::{path::Path, sync::Arc};

/// Where the data for a face lives.
#[derive(Clone)]
pub enum FaceSource {
    /// Font file on disk.
    Path(Arc<Path>),
    /// Font data already in memory.
    Memory(Blob<u8>),
}

impl FaceSource {
    /// Returns the path of the font file, if the data lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Memory(_) => None,
        }
    }
}

impl fmt::Debug for FaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Memory(blob) => f.debug_tuple("Memory").field(&blob.as_ref().len()).finish(),
        }
    }
}

impl From<&Path> for FaceSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.into())
    }
}

impl From<Blob<u8>> for FaceSource {
    fn from(blob: Blob<u8>) -> Self {
        Self::Memory(blob)
    }
}

/// Visual style or 'slope' of a face.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum FaceStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// Generally a slanted style, originally based on semi-cursive forms.
    Italic,
    /// A slanted version of the normal style.
    Oblique,
}

impl fmt::Display for FaceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        })
    }
}

/// Lightweight description of a matched face, produced by
/// [`FontProvider::match_family`] and [`FontProvider::match_codepoint`].
///
/// Pass it to [`FontProvider::load_face`] to get a usable [`FontFace`].
///
/// [`FontProvider::match_family`]: crate::FontProvider::match_family
/// [`FontProvider::match_codepoint`]: crate::FontProvider::match_codepoint
/// [`FontProvider::load_face`]: crate::FontProvider::load_face
/// [`FontFace`]: crate::FontFace
#[derive(Clone, Debug)]
pub struct FaceDescriptor {
    family_name: Arc<str>,
    postscript_name: Option<Arc<str>>,
    source: FaceSource,
    index: u32,
    weight: u16,
    style: FaceStyle,
}

impl FaceDescriptor {
    /// Normal weight on the OpenType scale.
    pub const NORMAL_WEIGHT: u16 = 400;

    /// Creates a descriptor for the face at `index` in `source`, with normal
    /// weight and style.
    pub fn new(family_name: &str, source: impl Into<FaceSource>, index: u32) -> Self {
        Self {
            family_name: family_name.into(),
            postscript_name: None,
            source: source.into(),
            index,
            weight: Self::NORMAL_WEIGHT,
            style: FaceStyle::Normal,
        }
    }

    /// Sets the PostScript name of the face.
    pub fn with_postscript_name(mut self, name: &str) -> Self {
        self.postscript_name = Some(name.into());
        self
    }

    /// Sets the weight on the OpenType scale, clamped to `1..=1000`.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight.clamp(1, 1000);
        self
    }

    /// Sets the style of the face.
    pub fn with_style(mut self, style: FaceStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the family name reported by the backend.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Returns the PostScript name, if the backend reported one.
    pub fn postscript_name(&self) -> Option<&str> {
        self.postscript_name.as_deref()
    }

    /// Returns an object describing how to locate the data containing this
    /// face.
    pub fn source(&self) -> &FaceSource {
        &self.source
    }

    /// Returns the index of the face in a collection.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the weight on the OpenType scale.
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Returns the style.
    pub fn style(&self) -> FaceStyle {
        self.style
    }
}

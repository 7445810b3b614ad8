// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the factory and every backend.

use crate::ProviderType;
use std::path::PathBuf;

/// Failures reported by [`create_provider`](crate::create_provider) and
/// [`FontProvider`](crate::FontProvider) operations.
///
/// An empty match is never an error: [`FontProvider::match_family`] returns an
/// empty list and [`FontProvider::match_codepoint`] returns `None`.
///
/// [`FontProvider::match_family`]: crate::FontProvider::match_family
/// [`FontProvider::match_codepoint`]: crate::FontProvider::match_codepoint
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No backend is compiled in for the requested provider type.
    #[error("no `{0}` font provider is available in this build")]
    NoBackend(ProviderType),
    /// The backend was constructed but cannot run on this platform or build.
    #[error("the `{0}` font provider is not supported on this platform")]
    Unsupported(ProviderType),
    /// A native library the backend depends on could not be loaded.
    #[error("could not load the {0} library")]
    LibraryUnavailable(&'static str),
    /// The platform font database could not be opened.
    #[error("failed to initialize the font provider: {0}")]
    Initialization(String),
    /// A lookup was made before [`FontProvider::initialize`] succeeded.
    ///
    /// [`FontProvider::initialize`]: crate::FontProvider::initialize
    #[error("the font provider has not been initialized")]
    NotInitialized,
    /// The font file named by a descriptor could not be opened or mapped.
    #[error("font file {} is unavailable", .path.display())]
    FaceUnavailable {
        /// Path of the font file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The font data does not contain a readable face at the given index.
    #[error("font data has no valid face at index {index}")]
    InvalidFace {
        /// Path of the font file, or `None` for in-memory data.
        path: Option<PathBuf>,
        /// Collection index that was requested.
        index: u32,
    },
    /// No face covering the character could be found.
    #[error("no font face covers {0:?}")]
    CodepointNotFound(char),
    /// None of the requested families matched an installed face.
    #[error("no font face found for families [{0}]")]
    FontNotFound(String),
}

impl Error {
    /// Returns true if the failure may go away by matching again.
    ///
    /// Face loads race against changes to the system font set: a file
    /// that was matched a moment ago can be removed or replaced before it is
    /// loaded. Bad in-memory data was supplied by the caller and stays bad.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::FaceUnavailable { .. } => true,
            Self::InvalidFace { path, .. } => path.is_some(),
            _ => false,
        }
    }
}

// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform font provider selection for caption rendering.
//!
//! A renderer asks [`create_provider`] for a [`FontProvider`], either naming a
//! backend explicitly or letting [`ProviderType::Auto`] pick the one compiled
//! for the current platform. From then on it only talks to the trait:
//!
//! ```no_run
//! use std::sync::Arc;
//! use caption_fonts::{Context, ProviderType, create_provider};
//!
//! let context = Arc::new(Context::default());
//! let mut provider = create_provider(ProviderType::Auto, &context)?;
//! provider.initialize()?;
//! provider.set_language(Some("jpn"));
//! let face = provider.resolve_face(&[], Some('あ'))?;
//! println!("{}", face.descriptor().family_name());
//! # Ok::<(), caption_fonts::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod backend;
mod charmap;
mod context;
mod descriptor;
mod error;
mod face;
mod family_name;
mod language;
mod provider;

#[cfg(test)]
mod test_font;

pub use linebender_resource_handle::Blob;

pub use backend::create_provider;
pub use charmap::{Charmap, CharmapIndex};
pub use context::{Context, ContextOptions, LogCallback, LogLevel};
pub use descriptor::{FaceDescriptor, FaceSource, FaceStyle};
pub use error::Error;
pub use face::{FontFace, collection_index};
pub use language::Language;
pub use provider::{FontProvider, ParseProviderTypeError, ProviderType};

// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loaded font faces.

use crate::{Blob, CharmapIndex, Error, FaceDescriptor, FaceSource};
use core::fmt;
use read_fonts::{FileRef, FontRef, TableProvider as _, types::NameId};
use std::{path::Path, sync::Arc};

/// A font face materialized from a [`FaceDescriptor`], ready to be handed to
/// a rasterizer.
///
/// The face owns a reference to its data, so it stays readable even if the
/// provider that loaded it is dropped. It does not track later changes to the
/// file on disk.
#[derive(Clone)]
pub struct FontFace {
    descriptor: FaceDescriptor,
    data: Blob<u8>,
    charmap_index: Option<CharmapIndex>,
}

impl FontFace {
    /// Loads the face described by `descriptor`.
    ///
    /// File sources are memory mapped.
    pub(crate) fn load(descriptor: &FaceDescriptor) -> Result<Self, Error> {
        let data = match descriptor.source() {
            FaceSource::Path(path) => load_blob(path)?,
            FaceSource::Memory(blob) => blob.clone(),
        };
        let index = descriptor.index();
        let font = FontRef::from_index(data.as_ref(), index)
            .map_err(|_| Error::InvalidFace {
                path: descriptor.source().path().map(Path::to_path_buf),
                index,
            })?;
        let charmap_index = CharmapIndex::new(&font);
        Ok(Self {
            descriptor: descriptor.clone(),
            data,
            charmap_index,
        })
    }

    /// Returns the descriptor this face was loaded from.
    pub fn descriptor(&self) -> &FaceDescriptor {
        &self.descriptor
    }

    /// Returns the raw font data. For collections this is the whole file; use
    /// [`index`](Self::index) to locate the face.
    pub fn data(&self) -> &Blob<u8> {
        &self.data
    }

    /// Returns the index of the face in a collection.
    pub fn index(&self) -> u32 {
        self.descriptor.index()
    }

    /// Returns the nominal glyph identifier for `ch`.
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.charmap_index?.charmap(self.data.as_ref())?.map(ch)
    }

    /// Returns true if the face has a glyph for `ch`.
    pub fn has_codepoint(&self, ch: char) -> bool {
        self.glyph_id(ch).is_some()
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("descriptor", &self.descriptor)
            .field("len", &self.data.as_ref().len())
            .field("charmap_index", &self.charmap_index)
            .finish()
    }
}

/// Returns the index of the face named `postscript_name` within `data`.
///
/// Single fonts always report index 0. For collections the `name` table of
/// each member is searched.
pub fn collection_index(data: &[u8], postscript_name: &str) -> Option<u32> {
    match FileRef::new(data).ok()? {
        FileRef::Font(_) => Some(0),
        FileRef::Collection(collection) => (0..collection.len()).find(|&index| {
            collection
                .get(index)
                .is_ok_and(|font| postscript_name_of(&font).as_deref() == Some(postscript_name))
        }),
    }
}

fn postscript_name_of(font: &FontRef<'_>) -> Option<String> {
    let name = font.name().ok()?;
    let record = name
        .name_record()
        .iter()
        .find(|rec| rec.name_id() == NameId::POSTSCRIPT_NAME)?;
    Some(record.string(name.string_data()).ok()?.to_string())
}

fn load_blob(path: &Path) -> Result<Blob<u8>, Error> {
    let unavailable = |source| Error::FaceUnavailable {
        path: path.to_owned(),
        source,
    };
    let file = std::fs::File::open(path).map_err(unavailable)?;
    #[allow(unsafe_code, reason = "the mapping is read-only and owned by the blob")]
    let mapped = unsafe { memmap2::Mmap::map(&file) }.map_err(unavailable)?;
    Ok(Blob::new(Arc::new(mapped)))
}

// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case-insensitive font family name keys.

use smallvec::SmallVec;

/// Key for case-insensitive comparison and lookup of family names.
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub(crate) struct FamilyKey {
    data: SmallVec<[u8; 64]>,
}

impl FamilyKey {
    pub(crate) fn new(name: &str) -> Self {
        let mut res = Self::default();
        let mut buf = [0_u8; 4];
        for ch in name.trim().chars() {
            for ch in ch.to_lowercase() {
                res.data
                    .extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
        res
    }

    /// Returns true if `name` refers to this family.
    pub(crate) fn matches(&self, name: &str) -> bool {
        *self == Self::new(name)
    }
}

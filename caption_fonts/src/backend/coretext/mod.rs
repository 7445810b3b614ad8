// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CoreText backend.

#[cfg(all(feature = "system", target_vendor = "apple"))]
mod ffi;

#[cfg(all(feature = "system", target_vendor = "apple"))]
use ffi::CoreText as Fonts;

#[cfg(not(all(feature = "system", target_vendor = "apple")))]
use super::Unavailable as Fonts;

use super::{families_for, system::SystemProvider};
use crate::{Context, Language, ProviderType};
use std::sync::Arc;

const DEFAULT_FAMILIES: &[(Option<&str>, &[&str])] = &[
    (
        Some("ja"),
        &[
            "Hiragino Maru Gothic ProN",
            "Hiragino Sans",
            "Hiragino Kaku Gothic ProN",
        ],
    ),
    (Some("zh"), &["PingFang SC", "Heiti SC"]),
    (Some("ko"), &["Apple SD Gothic Neo"]),
    (None, &["Helvetica", "Arial"]),
];

fn default_families(language: Option<Language>) -> &'static [&'static str] {
    families_for(DEFAULT_FAMILIES, language)
}

pub(super) fn provider(context: Arc<Context>) -> SystemProvider<Fonts> {
    SystemProvider::new(ProviderType::CoreText, default_families, context)
}

#[cfg(test)]
mod tests {
    use super::default_families;
    use crate::Language;

    #[test]
    fn japanese_prefers_hiragino() {
        let japanese = default_families(Some(Language::JAPANESE));
        assert_eq!(japanese.first(), Some(&"Hiragino Maru Gothic ProN"));
        assert_eq!(default_families(None), ["Helvetica", "Arial"]);
        assert_eq!(
            default_families(Language::from_code("eng")),
            ["Helvetica", "Arial"]
        );
    }
}

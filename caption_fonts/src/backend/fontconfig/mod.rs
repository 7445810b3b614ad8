// Copyright 2024 the Caption Fonts Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fontconfig backend.

#[cfg(all(feature = "system", unix, not(target_vendor = "apple")))]
mod convert;
#[cfg(all(feature = "system", unix, not(target_vendor = "apple")))]
mod ffi;

#[cfg(all(feature = "system", unix, not(target_vendor = "apple")))]
use ffi::Fontconfig as Fonts;

#[cfg(not(all(feature = "system", unix, not(target_vendor = "apple"))))]
use super::Unavailable as Fonts;

use super::{families_for, system::SystemProvider};
use crate::{Context, Language, ProviderType};
use std::sync::Arc;

const DEFAULT_FAMILIES: &[(Option<&str>, &[&str])] = &[
    (
        Some("ja"),
        &[
            "Noto Sans CJK JP",
            "Source Han Sans JP",
            "IPAexGothic",
            "IPAGothic",
            "sans-serif",
        ],
    ),
    (Some("zh"), &["Noto Sans CJK SC", "Source Han Sans SC", "sans-serif"]),
    (Some("ko"), &["Noto Sans CJK KR", "Source Han Sans KR", "sans-serif"]),
    (None, &["sans-serif"]),
];

fn default_families(language: Option<Language>) -> &'static [&'static str] {
    families_for(DEFAULT_FAMILIES, language)
}

pub(super) fn provider(context: Arc<Context>) -> SystemProvider<Fonts> {
    SystemProvider::new(ProviderType::Fontconfig, default_families, context)
}

// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signing key fragments and the mixin key derived from them.

use bilicomments_core::BiliError;

/// Fixed permutation applied to `img_key + sub_key`. Must match the
/// platform bit for bit; any deviation invalidates every signature.
pub const MIXIN_KEY_ENC_TAB: [usize; 64] = [
    46, 47, 18, 2, 53, 8, 23, 32, 15, 50, 10, 31, 58, 3, 45, 35, //
    27, 43, 5, 49, 33, 9, 42, 19, 29, 28, 14, 39, 12, 38, 41, 13, //
    37, 48, 7, 16, 24, 55, 40, 61, 26, 17, 0, 1, 60, 51, 30, 4, //
    22, 25, 54, 21, 56, 59, 6, 63, 57, 62, 11, 36, 20, 34, 44, 52,
];

/// Length of the derived mixin key.
pub const MIXIN_KEY_LEN: usize = 32;

/// The two key fragments issued by the navigation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WbiKeys {
    pub img_key: String,
    pub sub_key: String,
}

impl WbiKeys {
    /// Extracts both fragments from their asset URLs.
    pub fn from_urls(img_url: &str, sub_url: &str) -> Result<Self, BiliError> {
        Ok(Self {
            img_key: key_from_url(img_url)?,
            sub_key: key_from_url(sub_url)?,
        })
    }

    /// Derives the mixin key for this pair.
    pub fn mixin_key(&self) -> Result<MixinKey, BiliError> {
        MixinKey::derive(&self.img_key, &self.sub_key)
    }
}

/// Filename of an asset URL without its extension.
///
/// `https://i0.hdslb.com/bfs/wbi/7cd0...077c.png` yields `7cd0...077c`.
pub fn key_from_url(url: &str) -> Result<String, BiliError> {
    let filename = url.rsplit('/').next().unwrap_or_default();
    let key = filename.split('.').next().unwrap_or_default();
    if key.is_empty() {
        return Err(BiliError::Signing(format!(
            "cannot extract key fragment from `{url}`"
        )));
    }
    Ok(key.to_string())
}

/// 32-character key mixed into every request digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinKey(String);

impl MixinKey {
    /// Permutes `img_key + sub_key` through [`MIXIN_KEY_ENC_TAB`] and keeps
    /// the first 32 characters.
    pub fn derive(img_key: &str, sub_key: &str) -> Result<Self, BiliError> {
        let raw: Vec<char> = img_key.chars().chain(sub_key.chars()).collect();
        if raw.len() < MIXIN_KEY_ENC_TAB.len() {
            return Err(BiliError::Signing(format!(
                "key fragments too short: {} characters, need {}",
                raw.len(),
                MIXIN_KEY_ENC_TAB.len()
            )));
        }

        let key = MIXIN_KEY_ENC_TAB
            .iter()
            .take(MIXIN_KEY_LEN)
            .map(|&index| raw[index])
            .collect();
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMG_KEY: &str = "7cd084941338484aae1ad9425b84077c";
    const SUB_KEY: &str = "4932caff0ff746eab6f01bf08b70ac45";

    #[test]
    fn derives_known_mixin_key() {
        let mixin = MixinKey::derive(IMG_KEY, SUB_KEY).unwrap();
        assert_eq!(mixin.as_str(), "ea1db124af3c7062474693fa704f4ff8");
        assert_eq!(mixin.as_str().len(), MIXIN_KEY_LEN);
    }

    #[test]
    fn table_is_a_permutation_of_0_to_63() {
        let mut seen = [false; 64];
        for &i in &MIXIN_KEY_ENC_TAB {
            assert!(!seen[i], "index {i} repeated");
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn short_fragments_are_rejected() {
        let err = MixinKey::derive("abc", "def").unwrap_err();
        assert!(matches!(err, BiliError::Signing(_)));
    }

    #[test]
    fn extracts_keys_from_asset_urls() {
        let keys = WbiKeys::from_urls(
            "https://i0.hdslb.com/bfs/wbi/7cd084941338484aae1ad9425b84077c.png",
            "https://i0.hdslb.com/bfs/wbi/4932caff0ff746eab6f01bf08b70ac45.png",
        )
        .unwrap();
        assert_eq!(keys.img_key, IMG_KEY);
        assert_eq!(keys.sub_key, SUB_KEY);
        assert_eq!(
            keys.mixin_key().unwrap().as_str(),
            "ea1db124af3c7062474693fa704f4ff8"
        );
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(key_from_url("https://i0.hdslb.com/bfs/wbi/").is_err());
    }
}

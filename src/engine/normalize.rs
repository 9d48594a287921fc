use icu_normalizer::ComposingNormalizerBorrowed;

/// NFC-normalize text so that compatibility ideographs and composed forms from
/// different input methods compare equal to the passage.
pub fn nfc(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(text)
        .into_owned()
}

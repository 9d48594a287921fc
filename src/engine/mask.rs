use rand::Rng;

use crate::engine::classify::is_separator;
use crate::engine::mode::PracticeMode;

/// Live reveal state: `Some(ch)` is shown, `None` is a blank to fill.
pub type MaskBuffer = Vec<Option<char>>;

const RANDOM_HIDE_PROBABILITY: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskOutcome {
    pub mask: MaskBuffer,
    /// Copy of the freshly generated mask, captured only in random mode.
    /// Positions revealed here are pre-filled and never become answerable.
    pub snapshot: Option<MaskBuffer>,
}

pub fn create_mask<R: Rng + ?Sized>(passage: &[char], mode: PracticeMode, rng: &mut R) -> MaskOutcome {
    match mode {
        PracticeMode::All | PracticeMode::Free => MaskOutcome {
            mask: hidden_mask(passage),
            snapshot: None,
        },
        PracticeMode::Random => {
            let mask: MaskBuffer = passage
                .iter()
                .map(|&ch| {
                    if is_separator(ch) || !rng.gen_bool(RANDOM_HIDE_PROBABILITY) {
                        Some(ch)
                    } else {
                        None
                    }
                })
                .collect();
            MaskOutcome {
                snapshot: Some(mask.clone()),
                mask,
            }
        }
    }
}

/// Every content position hidden, every separator shown.
pub fn hidden_mask(passage: &[char]) -> MaskBuffer {
    passage
        .iter()
        .map(|&ch| is_separator(ch).then_some(ch))
        .collect()
}

/// True when `index` was pre-revealed by the random-mode snapshot.
pub fn is_protected(snapshot: Option<&[Option<char>]>, index: usize) -> bool {
    snapshot.is_some_and(|s| s.get(index).is_some_and(Option::is_some))
}

/// Render the mask with a placeholder for blanks.
pub fn render(mask: &[Option<char>], blank: char) -> String {
    mask.iter().map(|c| c.unwrap_or(blank)).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_all_mode_hides_every_content_char() {
        let passage = chars("学而时习之，不亦说乎？");
        let mut rng = SmallRng::seed_from_u64(1);
        let out = create_mask(&passage, PracticeMode::All, &mut rng);
        assert_eq!(out.mask.len(), passage.len());
        assert!(out.snapshot.is_none());
        assert_eq!(render(&out.mask, '_'), "_____，____？");
    }

    #[test]
    fn test_free_mode_matches_all_mode() {
        let passage = chars("有朋自远方来，不亦乐乎？");
        let mut rng = SmallRng::seed_from_u64(2);
        let free = create_mask(&passage, PracticeMode::Free, &mut rng);
        let all = create_mask(&passage, PracticeMode::All, &mut rng);
        assert_eq!(free, all);
    }

    #[test]
    fn test_random_mode_captures_snapshot_and_keeps_separators() {
        let passage = chars("人不知而不愠，不亦君子乎？学而不思则罔，思而不学则殆。");
        let mut rng = SmallRng::seed_from_u64(7);
        let out = create_mask(&passage, PracticeMode::Random, &mut rng);
        assert_eq!(out.snapshot.as_ref(), Some(&out.mask));
        for (i, &ch) in passage.iter().enumerate() {
            match out.mask[i] {
                Some(shown) => assert_eq!(shown, ch),
                None => assert!(!is_separator(ch)),
            }
            if is_separator(ch) {
                assert_eq!(out.mask[i], Some(ch));
            }
        }
    }

    #[test]
    fn test_random_mode_hides_roughly_half() {
        let passage: Vec<char> = std::iter::repeat('字').take(2000).collect();
        let mut rng = SmallRng::seed_from_u64(42);
        let out = create_mask(&passage, PracticeMode::Random, &mut rng);
        let hidden = out.mask.iter().filter(|c| c.is_none()).count();
        assert!((800..1200).contains(&hidden), "hidden = {hidden}");
    }

    #[test]
    fn test_empty_passage_yields_empty_mask() {
        let mut rng = SmallRng::seed_from_u64(3);
        for mode in PracticeMode::ALL {
            let out = create_mask(&[], mode, &mut rng);
            assert!(out.mask.is_empty());
        }
    }

    #[test]
    fn test_is_protected() {
        let snapshot = vec![Some('学'), None];
        assert!(is_protected(Some(&snapshot), 0));
        assert!(!is_protected(Some(&snapshot), 1));
        assert!(!is_protected(Some(&snapshot), 9));
        assert!(!is_protected(None, 0));
    }
}

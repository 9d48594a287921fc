use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::classify::is_content;

/// Classical particles mixed into the distractor pool so short passages still
/// get a full set of choices.
pub const FILLER_CHARS: [char; 5] = ['之', '乎', '者', '也', '矣'];

pub const DISTRACTOR_COUNT: usize = 5;

/// Build a shuffled candidate set for `correct`: the correct character once,
/// plus up to five distinct distractors from the passage and the filler set.
pub fn generate_options<R: Rng + ?Sized>(passage: &[char], correct: char, rng: &mut R) -> Vec<char> {
    let mut pool: Vec<char> = Vec::new();
    for &ch in passage.iter().chain(FILLER_CHARS.iter()) {
        if ch != correct && is_content(ch) && !pool.contains(&ch) {
            pool.push(ch);
        }
    }

    let take = DISTRACTOR_COUNT.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, take);

    let mut options = Vec::with_capacity(take + 1);
    options.push(correct);
    options.extend_from_slice(picked);
    options.shuffle(rng);
    options
}

use rand::seq::SliceRandom;
use rand::Rng;

/// Built-in sentences offered for a test.
pub const SAMPLE_TEXTS: &[&str] = &[
    "фильм мозайка стойка вид в у но короб.",
    "дом дверь текст машина жизнь ноги вахта.",
    "карл украл у клары коралы клара украла у карла кларнет",
    "Шла саша по шоссе и сосала сушку",
];

pub fn random_sample<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SAMPLE_TEXTS.choose(rng).copied().unwrap_or(SAMPLE_TEXTS[0])
}

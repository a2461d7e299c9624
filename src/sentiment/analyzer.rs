//! # Sentiment Analyzer
//!
//! Lexicon and rule based scorer in the style of VADER. Produces a compound
//! score in [-1, 1] plus the positive / neutral / negative proportions.

use super::lexicon::Lexicon;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BOOST_INCREMENT: f64 = 0.293;
const BOOST_DECREMENT: f64 = -0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;

/// Normalization constant approximating the max expected raw sum.
const ALPHA: f64 = 15.0;

const EXCLAMATION_STEP: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_STEP: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

const IDIOMS: &[(&str, f64)] = &[
    ("the shit", 3.0),
    ("the bomb", 3.0),
    ("bad ass", 1.5),
    ("yeah right", -2.0),
    ("cut the mustard", 2.0),
    ("kiss of death", -1.5),
    ("hand to mouth", -2.0),
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "fricking" | "frickin"
        | "frigging" | "friggin" | "fully" | "fucking" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most" | "particularly"
        | "purely" | "quite" | "really" | "remarkably" | "so" | "substantially" | "thoroughly"
        | "totally" | "tremendously" | "uber" | "unbelievably" | "unusually" | "utterly"
        | "very" => Some(BOOST_INCREMENT),
        "almost" | "barely" | "hardly" | "just enough" | "kind of" | "kinda" | "kindof"
        | "kind-of" | "less" | "little" | "marginally" | "occasionally" | "partly"
        | "scarcely" | "slightly" | "somewhat" | "sort of" | "sorta" | "sortof" | "sort-of" => {
            Some(BOOST_DECREMENT)
        }
        _ => None,
    }
}

fn idiom(phrase: &str) -> Option<f64> {
    IDIOMS
        .iter()
        .find(|(idiom, _)| *idiom == phrase)
        .map(|(_, valence)| *valence)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// At least one uppercase letter and no lowercase ones.
fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are ALL CAPS.
fn has_caps_differential(tokens: &[&str]) -> bool {
    let all_caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    let differential = tokens.len() - all_caps;
    differential > 0 && differential < tokens.len()
}

/// Strip surrounding punctuation unless that would leave an emoticon-sized stub.
fn strip_punctuation(token: &str) -> &str {
    let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
    if stripped.chars().count() <= 2 {
        token
    } else {
        stripped
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(strip_punctuation)
        .filter(|t| t.chars().count() > 1)
        .collect()
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_STEP,
        _ => QUESTION_CAP,
    };

    exclamations as f64 * EXCLAMATION_STEP + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// Scores review text against a loaded lexicon.
///
/// Built once per run and shared by reference; holds no mutable state.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Load the lexicon from disk and build an analyzer around it.
    pub fn from_lexicon_file(path: &Path) -> Result<Self> {
        Ok(Self::new(Lexicon::load(path)?))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compound score in [-1, 1], rounded to four decimals.
    pub fn score(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::default();
        }

        let words: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_differential = has_caps_differential(&tokens);

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let starts_kind_of =
                words[i] == "kind" && words.get(i + 1).map(String::as_str) == Some("of");
            if booster(&words[i]).is_some() || starts_kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence(&tokens, &words, i, caps_differential));
        }

        apply_but_contrast(&words, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn valence(
        &self,
        tokens: &[&str],
        words: &[String],
        i: usize,
        caps_differential: bool,
    ) -> f64 {
        let Some(mut valence) = self.lexicon.get(&words[i]) else {
            return 0.0;
        };

        if caps_differential && is_all_caps(tokens[i]) {
            if valence > 0.0 {
                valence += CAPS_INCREMENT;
            } else {
                valence -= CAPS_INCREMENT;
            }
        }

        for distance in 0..3 {
            if i <= distance {
                break;
            }
            let j = i - (distance + 1);
            if self.lexicon.contains(&words[j]) {
                continue;
            }

            let mut scalar = booster_scalar(tokens[j], &words[j], valence, caps_differential);
            match distance {
                1 => scalar *= 0.95,
                2 => scalar *= 0.9,
                _ => {}
            }
            valence += scalar;
            valence = negation_check(valence, tokens, words, distance, i);
            if distance == 2 {
                valence = idioms_check(valence, tokens, i);
            }
        }

        self.least_check(valence, words, i)
    }

    fn least_check(&self, valence: f64, words: &[String], i: usize) -> f64 {
        if i == 0 || words[i - 1] != "least" || self.lexicon.contains(&words[i - 1]) {
            return valence;
        }
        if i > 1 && (words[i - 2] == "at" || words[i - 2] == "very") {
            return valence;
        }
        valence * NEGATION_SCALAR
    }
}

fn booster_scalar(token: &str, word: &str, valence: f64, caps_differential: bool) -> f64 {
    let Some(mut scalar) = booster(word) else {
        return 0.0;
    };

    if valence < 0.0 {
        scalar = -scalar;
    }
    if caps_differential && is_all_caps(token) {
        if valence > 0.0 {
            scalar += CAPS_INCREMENT;
        } else {
            scalar -= CAPS_INCREMENT;
        }
    }
    scalar
}

/// The "never so/this" intensifier matches raw tokens, so a capitalised
/// "Never" falls through to the plain negation rule.
fn negation_check(
    valence: f64,
    tokens: &[&str],
    words: &[String],
    distance: usize,
    i: usize,
) -> f64 {
    let so_or_this = |w: &str| w == "so" || w == "this";

    match distance {
        0 if is_negation(&words[i - 1]) => valence * NEGATION_SCALAR,
        1 if tokens[i - 2] == "never" && so_or_this(tokens[i - 1]) => valence * 1.25,
        1 if is_negation(&words[i - 2]) => valence * NEGATION_SCALAR,
        2 if (tokens[i - 3] == "never" && so_or_this(tokens[i - 2]))
            || so_or_this(tokens[i - 1]) =>
        {
            valence * 1.25
        }
        2 if is_negation(&words[i - 3]) => valence * NEGATION_SCALAR,
        _ => valence,
    }
}

/// Only reached with `i >= 3`. Phrases match raw tokens.
fn idioms_check(mut valence: f64, tokens: &[&str], i: usize) -> f64 {
    let one_zero = format!("{} {}", tokens[i - 1], tokens[i]);
    let two_one_zero = format!("{} {} {}", tokens[i - 2], tokens[i - 1], tokens[i]);
    let two_one = format!("{} {}", tokens[i - 2], tokens[i - 1]);
    let three_two_one = format!("{} {} {}", tokens[i - 3], tokens[i - 2], tokens[i - 1]);
    let three_two = format!("{} {}", tokens[i - 3], tokens[i - 2]);

    for phrase in [&one_zero, &two_one_zero, &two_one, &three_two_one, &three_two] {
        if let Some(v) = idiom(phrase) {
            valence = v;
            break;
        }
    }

    if tokens.len() > i + 1 {
        if let Some(v) = idiom(&format!("{} {}", tokens[i], tokens[i + 1])) {
            valence = v;
        }
    }
    if tokens.len() > i + 2 {
        if let Some(v) = idiom(&format!("{} {} {}", tokens[i], tokens[i + 1], tokens[i + 2])) {
            valence = v;
        }
    }

    if booster(&three_two).is_some() || booster(&two_one).is_some() {
        valence += BOOST_DECREMENT;
    }
    valence
}

/// Halve everything before the first "but" and amplify everything after it.
fn apply_but_contrast(words: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = words.iter().position(|w| w == "but") else {
        return;
    };

    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        if idx < but_idx {
            *sentiment *= 0.5;
        } else if idx > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    // Each scored word counts one extra so neutral words weigh in at 1.
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0usize;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f64;

    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to(neu_count as f64 / total, 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

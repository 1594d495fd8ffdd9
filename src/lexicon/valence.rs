use ahash::{AHashMap, AHashSet};

use super::{words, ScoreError, ValenceScorer};

const BOOST_INCR: f64 = 0.293;
const BOOST_DECR: f64 = -0.293;
/// Added to an all-caps word when the rest of the text is not shouting
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Normalization constant of `x / sqrt(x^2 + alpha)`
const ALPHA: f64 = 15.0;
/// Window of preceding words checked for boosters and negations
const LOOKBACK: usize = 3;
const BOOST_DAMPING: [f64; LOOKBACK] = [1.0, 0.95, 0.9];

/// Mean valence ratings on a `-4..=4` scale
const ENGLISH_VALENCES: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 3.2),
    ("fantastic", 2.6),
    ("fun", 2.3),
    ("funny", 1.9),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("superb", 3.1),
    ("wonderful", 2.7),
    ("annoying", -1.7),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("disappointing", -2.2),
    ("dull", -1.7),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("poor", -2.1),
    ("sad", -2.1),
    ("stupid", -2.4),
    ("terrible", -2.1),
    ("ugly", -2.3),
    ("waste", -1.8),
    ("worst", -3.1),
];

const ENGLISH_BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST_INCR),
    ("completely", BOOST_INCR),
    ("extremely", BOOST_INCR),
    ("highly", BOOST_INCR),
    ("incredibly", BOOST_INCR),
    ("really", BOOST_INCR),
    ("so", BOOST_INCR),
    ("totally", BOOST_INCR),
    ("truly", BOOST_INCR),
    ("very", BOOST_INCR),
    ("barely", BOOST_DECR),
    ("hardly", BOOST_DECR),
    ("slightly", BOOST_DECR),
    ("somewhat", BOOST_DECR),
];

const ENGLISH_NEGATIONS: &[&str] = &[
    "not", "never", "no", "none", "nope", "nor", "nothing", "nowhere", "neither",
    "cannot", "without", "aint", "dont", "doesnt", "didnt", "isnt", "wasnt", "wont",
];

/// Valence-aware rule-based scorer.
///
/// Each rated word contributes its valence, adjusted by boosters and negations
/// among the three preceding words and by all-caps emphasis. Trailing `!`
/// marks push the sum further from zero. The sum is normalized to `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct ValenceLexicon {
    valences: AHashMap<String, f64>,
    boosters: AHashMap<String, f64>,
    negations: AHashSet<String>,
}

impl Default for ValenceLexicon {
    fn default() -> Self {
        Self::english()
    }
}

fn is_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

/// `x / sqrt(x^2 + alpha)`, clamped
pub fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

impl ValenceLexicon {
    pub fn empty() -> Self {
        Self {
            valences: AHashMap::new(),
            boosters: AHashMap::new(),
            negations: AHashSet::new(),
        }
    }

    pub fn english() -> Self {
        let mut lexicon = Self::empty();
        lexicon.valences.extend(
            ENGLISH_VALENCES
                .iter()
                .map(|&(w, v)| (w.to_string(), v)),
        );
        lexicon.boosters.extend(
            ENGLISH_BOOSTERS
                .iter()
                .map(|&(w, b)| (w.to_string(), b)),
        );
        lexicon
            .negations
            .extend(ENGLISH_NEGATIONS.iter().map(|w| w.to_string()));
        lexicon
    }

    pub fn with_valence(mut self, word: &str, valence: f64) -> Self {
        self.valences.insert(word.to_lowercase(), valence);
        self
    }

    fn is_negation(&self, lower: &str) -> bool {
        self.negations.contains(lower) || lower.ends_with("n't")
    }

    /// Unnormalized valence sum of a text
    pub fn raw_sum(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = words(text).collect();
        let lower: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps_count = tokens.iter().filter(|t| is_caps(t)).count();
        let shouting_mixed = caps_count > 0 && caps_count < tokens.len();

        let mut sum = 0.0;
        for (i, word) in lower.iter().enumerate() {
            if self.boosters.contains_key(word) {
                continue;
            }
            let Some(&base) = self.valences.get(word) else {
                continue;
            };
            let sign = base.signum();
            let mut valence = base;
            if shouting_mixed && is_caps(tokens[i]) {
                valence += CAPS_INCR * sign;
            }

            let mut negated = false;
            for dist in 1..=LOOKBACK.min(i) {
                let prev = &lower[i - dist];
                if let Some(&boost) = self.boosters.get(prev) {
                    let mut scalar = boost * sign;
                    if shouting_mixed && is_caps(tokens[i - dist]) {
                        scalar += CAPS_INCR * sign;
                    }
                    valence += scalar * BOOST_DAMPING[dist - 1];
                }
                negated |= self.is_negation(prev);
            }
            if negated {
                valence *= NEGATION_SCALAR;
            }
            sum += valence;
        }

        if sum != 0.0 {
            let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS);
            sum += sum.signum() * bangs as f64 * EXCLAMATION_INCR;
        }
        sum
    }
}

impl ValenceScorer for ValenceLexicon {
    fn compound(&self, text: &str) -> Result<f64, ScoreError> {
        if text.trim().is_empty() {
            return Err(ScoreError::MissingText);
        }
        Ok(normalize(self.raw_sum(text)))
    }
}

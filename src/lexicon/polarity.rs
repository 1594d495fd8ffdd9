use ahash::{AHashMap, AHashSet};

use super::{words, PolarityScore, PolarityScorer, ScoreError};

/// Negated sentiment words keep half their strength with the sign flipped
const NEGATION_FACTOR: f64 = -0.5;

/// `(word, polarity, subjectivity)`
const ENGLISH_ADJECTIVES: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("brilliant", 0.9, 1.0),
    ("enjoyable", 0.5, 0.6),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.4, 0.5),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("interesting", 0.5, 0.5),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("nice", 0.6, 1.0),
    ("perfect", 1.0, 1.0),
    ("superb", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("annoying", -0.8, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("boring", -1.0, 1.0),
    ("disappointing", -0.6, 0.7),
    ("dull", -0.3, 0.7),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("horrible", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("waste", -0.2, 0.1),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
];

const ENGLISH_INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.3),
    ("totally", 1.4),
    ("truly", 1.3),
    ("very", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.6),
];

const ENGLISH_NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "nobody", "cannot",
    "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "weren't", "won't",
    "wouldn't", "shouldn't", "couldn't", "can't", "hardly",
];

/// Pattern-style polarity lexicon.
///
/// Every known word found in the text is one assessment. A preceding
/// intensifier scales it, a preceding negation flips it by `-0.5`. Polarity and
/// subjectivity are the means over all assessments, clamped to their ranges.
/// A text with no known word scores `0.0` / `0.0`.
#[derive(Debug, Clone)]
pub struct PatternLexicon {
    words: AHashMap<String, (f64, f64)>,
    intensifiers: AHashMap<String, f64>,
    negations: AHashSet<String>,
}

impl Default for PatternLexicon {
    fn default() -> Self {
        Self::english()
    }
}

impl PatternLexicon {
    /// Lexicon with no entries; everything scores neutral
    pub fn empty() -> Self {
        Self {
            words: AHashMap::new(),
            intensifiers: AHashMap::new(),
            negations: AHashSet::new(),
        }
    }

    pub fn english() -> Self {
        let mut lexicon = Self::empty();
        for &(word, polarity, subjectivity) in ENGLISH_ADJECTIVES {
            lexicon = lexicon.with_word(word, polarity, subjectivity);
        }
        for &(word, factor) in ENGLISH_INTENSIFIERS {
            lexicon = lexicon.with_intensifier(word, factor);
        }
        lexicon
            .negations
            .extend(ENGLISH_NEGATIONS.iter().map(|w| w.to_string()));
        lexicon
    }

    pub fn with_word(mut self, word: &str, polarity: f64, subjectivity: f64) -> Self {
        self.words.insert(
            word.to_lowercase(),
            (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)),
        );
        self
    }

    pub fn with_intensifier(mut self, word: &str, factor: f64) -> Self {
        self.intensifiers.insert(word.to_lowercase(), factor);
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl PolarityScorer for PatternLexicon {
    fn score(&self, text: &str) -> Result<PolarityScore, ScoreError> {
        if text.trim().is_empty() {
            return Err(ScoreError::MissingText);
        }

        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut intensity = 1.0;
        let mut negated = false;
        for word in words(text) {
            let word = word.to_lowercase();
            if self.negations.contains(&word) {
                negated = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(&word) {
                intensity *= factor;
                continue;
            }
            if let Some(&(polarity, subjectivity)) = self.words.get(&word) {
                let mut polarity = polarity * intensity;
                if negated {
                    polarity *= NEGATION_FACTOR;
                }
                assessments.push((polarity, (subjectivity * intensity).min(1.0)));
            }
            intensity = 1.0;
            negated = false;
        }

        if assessments.is_empty() {
            return Ok(PolarityScore::default());
        }
        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|a| a.0).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|a| a.1).sum::<f64>() / n;
        Ok(PolarityScore {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{polarity_label, Sentiment};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn averages_known_words() {
        let lexicon = PatternLexicon::english();
        let score = lexicon.score("great acting but awful plot").unwrap();
        assert!(close(score.polarity, (0.8 - 1.0) / 2.0));
        assert!(close(score.subjectivity, (0.75 + 1.0) / 2.0));
        assert_eq!(polarity_label(score.polarity), Sentiment::Negative);
    }

    #[test]
    fn negation_flips_by_half() {
        let lexicon = PatternLexicon::english();
        let score = lexicon.score("not great").unwrap();
        assert!(close(score.polarity, -0.4));
        let score = lexicon.score("not bad at all").unwrap();
        assert!(close(score.polarity, 0.35));
    }

    #[test]
    fn intensifier_scales_and_clamps() {
        let lexicon = PatternLexicon::english();
        let score = lexicon.score("very good").unwrap();
        assert!(close(score.polarity, 0.7 * 1.3));
        assert!(close(score.subjectivity, 0.6 * 1.3));
        let score = lexicon.score("extremely EXCELLENT").unwrap();
        assert_eq!(score.polarity, 1.0);
        assert_eq!(score.subjectivity, 1.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        let lexicon = PatternLexicon::english();
        let score = lexicon.score("the film runs two hours").unwrap();
        assert_eq!(score, PolarityScore::default());
        assert_eq!(polarity_label(score.polarity), Sentiment::Neutral);
    }

    #[test]
    fn blank_text_is_an_error() {
        let lexicon = PatternLexicon::english();
        assert_eq!(lexicon.score("   "), Err(ScoreError::MissingText));
        assert_eq!(lexicon.score(""), Err(ScoreError::MissingText));
    }

    #[test]
    fn custom_entries() {
        let lexicon = PatternLexicon::empty().with_word("Meh", -0.1, 0.4);
        assert_eq!(lexicon.len(), 1);
        let score = lexicon.score("meh").unwrap();
        assert!(close(score.polarity, -0.1));
        assert!(PatternLexicon::empty().is_empty());
    }
}

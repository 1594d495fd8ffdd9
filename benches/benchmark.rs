use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use review_sentiment::{
    classifier, Classifier, ClassifierKind, FeatureExtractor, Normalizer, TfidfVectorizer,
};

const WORDS: [&str; 24] = [
    "The", "movie", "was", "great", "awful", "acting", "plot", "boring", "I", "loved",
    "hated", "this", "film!", "really", "not", "a", "wonderful", "terrible", "story,",
    "ending", "director", "cast", "music", "scenes",
];

/// Deterministic pseudo-reviews of 20..60 words
fn synthetic_reviews(n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|i| {
            let len = 20 + i % 40;
            (0..len)
                .filter_map(|_| WORDS.choose(&mut rng).copied())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn vectorize_benchmark(c: &mut Criterion) {
    let reviews = synthetic_reviews(2_000);
    let normalizer = Normalizer::english();

    c.bench_function("normalize_corpus", |b| {
        b.iter(|| normalizer.normalize_corpus(&reviews));
    });

    let docs = normalizer.normalize_corpus(&reviews);
    c.bench_function("tfidf_fit_transform", |b| {
        b.iter(|| {
            let mut vectorizer: TfidfVectorizer = TfidfVectorizer::new((1, 2), (0.0, 1.0))
                .unwrap_or_else(|e| panic!("vectorizer config: {e}"));
            vectorizer.fit_transform(&docs)
        });
    });

    let mut vectorizer: TfidfVectorizer = TfidfVectorizer::new((1, 2), (0.0, 1.0))
        .unwrap_or_else(|e| panic!("vectorizer config: {e}"));
    let x = vectorizer
        .fit_transform(&docs)
        .unwrap_or_else(|e| panic!("fit_transform: {e}"));
    let y: Vec<usize> = docs.iter().map(|d| usize::from(d.contains("great"))).collect();

    c.bench_function("linear_svm_fit", |b| {
        b.iter(|| {
            let mut model = classifier::build(ClassifierKind::LinearSvm, &Default::default(), 42);
            model.fit(&x, &y, 2)
        });
    });
}

criterion_group!(benches, vectorize_benchmark);
criterion_main!(benches);

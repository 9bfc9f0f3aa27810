//! Benchmarks for sentence classification.
//!
//! Measures the gate plus rule pass over a synthetic corpus, and the
//! per-sentence context computation on its own.

use criterion::{criterion_group, criterion_main, Criterion};
use levelmark_engine::{conllu, Classifier, LexicalResources, NoSynthesizer, SentenceContext};
use std::hint::black_box;

const SENTENCE: &str = "\
# sent_id = b1
# text = Väike poiss luges eile raamatukogus raamatut.
1\tVäike\tväike\tADJ\tA\tCase=Nom|Number=Sing\t2\tamod\t_\t_
2\tpoiss\tpoiss\tNOUN\tS\tCase=Nom|Number=Sing\t3\tnsubj\t_\t_
3\tluges\tlugema\tVERB\tV\tMood=Ind|Tense=Past|VerbForm=Fin\t0\troot\t_\t_
4\teile\teile\tADV\tD\t_\t3\tadvmod\t_\t_
5\traamatukogus\traamatukogu\tNOUN\tS\tCase=Ine|Number=Sing\t3\tobl\t_\t_
6\traamatut\traamat\tNOUN\tS\tCase=Par|Number=Sing\t3\tobj\t_\tSpaceAfter=No
7\t.\t.\tPUNCT\tZ\t_\t3\tpunct\t_\t_
";

fn corpus(size: usize) -> String {
    let mut text = String::with_capacity(SENTENCE.len() * size);
    for _ in 0..size {
        text.push_str(SENTENCE);
        text.push('\n');
    }
    text
}

fn resources() -> LexicalResources {
    LexicalResources::from_lists(["kurat", "loll"], ["ka", "aga", "siis"])
}

fn bench_classify_corpus(c: &mut Criterion) {
    let text = corpus(1_000);
    let resources = resources();

    c.bench_function("classify_1k_sentences", |b| {
        b.iter(|| {
            let mut classifier = Classifier::new(&resources, &NoSynthesizer);
            let (sentences, report) = classifier.classify(conllu::parse_document(black_box(&text)));
            assert_eq!(sentences.len(), 1_000);
            black_box(report)
        });
    });
}

fn bench_sentence_context(c: &mut Criterion) {
    let resources = resources();
    let sentence = conllu::parse_document(SENTENCE)
        .into_iter()
        .flatten()
        .next();
    let Some(sentence) = sentence else {
        return;
    };

    c.bench_function("sentence_context", |b| {
        b.iter(|| black_box(SentenceContext::new(black_box(&sentence), &resources).flags));
    });
}

criterion_group!(benches, bench_classify_corpus, bench_sentence_context);
criterion_main!(benches);

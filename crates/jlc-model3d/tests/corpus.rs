use jlc_model3d::Thresholds;
use jlc_model3d::corpus::FixtureCorpus;
use std::path::PathBuf;

fn corpus_path() -> PathBuf {
    let resources_dir = if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(manifest_dir).join("tests/resources")
    } else {
        PathBuf::from("tests/resources")
    };
    resources_dir.join("corpus.toml")
}

#[test]
fn default_thresholds_reproduce_known_placements() {
    let _ = env_logger::builder().is_test(true).try_init();
    let corpus = FixtureCorpus::from_path(&corpus_path()).unwrap();
    assert!(corpus.cases.len() >= 10);

    let mismatches = corpus.check(&Thresholds::default());
    let report: Vec<String> = mismatches.iter().map(ToString::to_string).collect();
    assert!(report.is_empty(), "corpus mismatches:\n{}", report.join("\n"));
}

#[test]
fn retuned_thresholds_are_caught_by_the_corpus() {
    let corpus = FixtureCorpus::from_path(&corpus_path()).unwrap();
    let loose = Thresholds::from_toml_str("min_intentional_offset = 0.1\n").unwrap();

    let ids: Vec<String> = corpus
        .check(&loose)
        .into_iter()
        .map(|mismatch| mismatch.id)
        .collect();
    assert_eq!(ids, vec!["C5213".to_string()]);
}

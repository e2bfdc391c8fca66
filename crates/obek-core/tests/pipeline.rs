use std::io::Cursor;

use obek_core::corpus::{read_analysis_file, read_full_features};
use obek_core::{
    ChunkType, Chunker, LabelPredictor, MorphAnalysis, ObekError, Result, TemplateSet, Tokenizer,
};

const TEMPLATES: &str = "\
# word and part of speech
U00:%x[0,0]
U01:%x[0,2]
U02:%x[-1,2]/%x[0,2]
U03:%x[0,5]
";

const CORPUS: &str = "\
Ahmet\tAhmet\tNoun\tProp\tA3sg+Pnon+Nom
dün\tdün\tAdverb\t_\t_
çayı\tçay\tNoun\t_\tA3sg+Pnon+Acc
demledi\tdemle\tVerb\t_\tPos+Past+A3sg

Kitap\tkitap\tNoun\t_\tA3sg+Pnon+Nom
FAIL
okundu\toku\tVerb\t_\tPass+Pos+Past+A3sg

Ayşe\tAyşe\tNoun\tProp\tA3sg+Pnon+Nom
güldü\tgül\tVerb\t_\tPos+Past+A3sg
";

/// Labels tokens from their expanded features: column 1 holds the part of
/// speech and column 3 the case.
struct RulePredictor;

impl LabelPredictor for RulePredictor {
    fn predict(&self, features: &[Vec<String>]) -> Result<Vec<String>> {
        if features.iter().any(|row| row[0] == "FAIL") {
            return Err(ObekError::PredictorFailure("refused sentence".into()));
        }
        Ok(features
            .iter()
            .map(|row| {
                let label = match (row[1].as_str(), row[3].as_str()) {
                    ("Verb", _) => "VB",
                    ("Prop", _) | (_, "Nom") => "SB",
                    (_, "Acc") => "OB",
                    _ => "AB",
                };
                label.to_string()
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "rules"
    }
}

fn chunker() -> Chunker<RulePredictor> {
    Chunker::new(TemplateSet::parse(TEMPLATES).unwrap(), RulePredictor)
}

#[test]
fn corpus_is_chunked_per_sentence() {
    let sentences = read_analysis_file(Cursor::new(CORPUS)).unwrap();
    assert_eq!(sentences.len(), 3);

    let results = chunker().chunk_corpus(&sentences);
    assert_eq!(results.len(), 3);

    let first = results[0].as_ref().unwrap();
    let rendered: Vec<String> = first.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["[Ahmet:SUBJECT]", "[dün:ADJUNCT]", "[çayı:OBJECT]", "[demledi:VERB]"]
    );

    assert!(matches!(results[1], Err(ObekError::PredictorFailure(_))));

    let third = results[2].as_ref().unwrap();
    assert_eq!(third.len(), 2);
    assert_eq!(third[0].chunk_type, ChunkType::Subject);
    assert_eq!(third[1].explain(), "[gül:VERB-1]");
}

#[test]
fn hypothesis_labels_follow_the_predictor() {
    let sentences = read_analysis_file(Cursor::new(CORPUS)).unwrap();
    let sentence = &sentences[0];
    let labels = chunker()
        .hypothesis_labels(&sentence.words(), &sentence.analyses())
        .unwrap();
    let raw: Vec<&str> = labels.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(raw, vec!["SB", "AB", "OB", "VB"]);
}

#[test]
fn tokenized_sentence_without_analyses() {
    let words = Tokenizer::new().words("Ali geldi.");
    let analyses: Vec<Option<MorphAnalysis>> = vec![None; words.len()];
    let chunks = chunker().chunk(&words, &analyses).unwrap();
    // Unanalyzed tokens carry `_` for part of speech and case.
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.chunk_type == ChunkType::Adjunct));
}

#[test]
fn batch_generation_round_trips_through_reader() {
    let templates = TemplateSet::parse(TEMPLATES).unwrap();
    let single = "\
Ahmet\tAhmet\tProp\t_\tA3sg+Pnon+Nom\tNom\tmet\tfalse\tCc\ttrue\tfalse\tfalse\tfalse\tSB
geldi\tgel\tVerb\t_\tPos+Past+A3sg\t_\tldi\tfalse\tc\tfalse\tfalse\tfalse\tfalse\tVB

Evet\tevet\tInterj\t_\t_\t_\tvet\tfalse\tCc\ttrue\tfalse\tfalse\tfalse\tAB
";
    let mut out = Vec::new();
    let count = templates
        .generate_full_features(Cursor::new(single), &mut out, "\t")
        .unwrap();
    assert_eq!(count, 2);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Ahmet\tProp\t_/Prop\tNom\tSB\n"));
    assert!(!text.ends_with("\n\n"));

    let sentences = read_full_features(Cursor::new(text), "\t").unwrap();
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0][1].features, vec!["geldi", "Verb", "Prop/Verb", "_"]);
    assert_eq!(sentences[1][0].label, "AB");
}

#[cfg(unix)]
#[test]
fn crf_test_subprocess_end_to_end() {
    use obek_core::CrfPlusPlusPredictor;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("crf_test.sh");
    std::fs::write(
        &script,
        r#"n=0
while IFS= read -r line; do
  [ -z "$line" ] && continue
  if [ "$n" -eq 0 ]; then printf '%s\tSB\n' "$line"; else printf '%s\tVI\n' "$line"; fi
  n=$((n+1))
done < "$3"
"#,
    )
    .unwrap();

    let predictor = CrfPlusPlusPredictor::new(dir.path().join("model"))
        .with_executable("sh")
        .with_leading_args([script]);
    let chunker = Chunker::new(TemplateSet::parse(TEMPLATES).unwrap(), predictor);

    let words = ["Ayşe", "eve", "döndü"];
    let chunks = chunker.chunk(&words, &[None, None, None]).unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].chunk_type, ChunkType::Subject);
    assert_eq!(chunks[1].chunk_type, ChunkType::Verb);
    assert_eq!(chunks[1].indices, vec![1, 2]);
}

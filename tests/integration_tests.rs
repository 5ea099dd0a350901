//! Integration tests for the full retreeing pipeline
//!
//! Resources are built from small TSV snippets in the formats the loaders
//! read from disk.

use std::fs;

use morph_retree::cli::retree_treebank;
use morph_retree::normalizer::from_corpus;
use morph_retree::root::select_by_frequency;
use morph_retree::{
    AlignmentTable, Document, FrequencyTable, InflectionLexicon, MorphCorpus, Resources, Retreer,
    Role, RunConfig, SegmentationLexicon, SourceKind, SuffixKind, Word,
};
use pretty_assertions::assert_eq;

const LEXICON: &str = "\
unhappiness\t_\t_\t_\t{\"segmentation\": [{\"span\": [0, 1], \"type\": \"prefix\"}, {\"span\": [2, 3, 4, 5, 6], \"type\": \"root\"}, {\"span\": [7, 8, 9, 10], \"type\": \"suffix\"}]}
kindness\t_\t_\t_\t{\"segmentation\": [{\"span\": [0, 1, 2, 3], \"type\": \"root\"}, {\"span\": [4, 5, 6, 7], \"type\": \"suffix\"}]}
blackbird\t_\t_\t_\t{\"segmentation\": [{\"span\": [0, 1, 2, 3, 4], \"type\": \"root\"}, {\"span\": [5, 6, 7, 8], \"type\": \"root\"}]}
cat\t_\t_\t_\t{\"segmentation\": [{\"span\": [0, 1, 2], \"type\": \"root\"}]}
";

const INFLECTION: &str = "\
blackbird\tblackbirds\tN;PL\tblackbird|s
walk\twalked\tV;PST\twalk|ed
walk\twalks\tV;PRS;3;SG\twalk|s
go\twent\tV;PST\t-
";

const CORPUS: &str = "\
1\tthey were do @@ing it
2\tgo @@ing home
3\tsee @@ing is believ @@ing
";

fn resources() -> Resources {
    Resources {
        lexicon: SegmentationLexicon::from_tsv(LEXICON).unwrap(),
        inflection: InflectionLexicon::from_tsv(INFLECTION, false).unwrap(),
        corpus: Some(MorphCorpus::from_tsv(CORPUS).unwrap()),
        alignments: None,
    }
}

fn word(form: &str, lemma: &str, upos: &str) -> Word {
    let mut w = Word::new(1, form);
    w.lemma = lemma.to_string();
    w.upos = upos.to_string();
    w.head = Some(0);
    w.deprel = "root".to_string();
    w
}

// =============================================================================
// Worked cases
// =============================================================================

#[test]
fn test_prefix_root_suffix_noun() {
    let retreer = Retreer::new(resources());
    let mut w = word("unhappiness", "unhappiness", "NOUN");
    w.deprel = "nsubj".to_string();

    let directive = retreer.directive_for(&w).unwrap();
    assert_eq!(directive.forms, vec!["un", "happi", "ness"]);
    assert_eq!(directive.deprels, vec!["nmod:morph", "nsubj", "case:morph"]);
    assert_eq!(directive.upos, vec!["X", "NOUN", "X"]);
    assert_eq!(directive.main, 1);
}

#[test]
fn test_rarest_corpus_morph_is_root() {
    let table = FrequencyTable::from_pairs([("do", 0.1), ("ing", 40.0)]);
    let seg = from_corpus(&["do".to_string(), "ing".to_string()], &table).unwrap();

    assert_eq!(seg.roots.len(), 1);
    assert_eq!(seg.roots[0].text, "do");
    assert_eq!(seg.suffixes.len(), 1);
    assert_eq!(seg.suffixes[0].text, "ing");

    let directive = morph_retree::MultiwordDirective::build(&seg, "VERB", "root", "_");
    assert_eq!(directive.deprels, vec!["root", "aux:morph"]);
}

#[test]
fn test_ending_heuristic_adds_one_suffix() {
    let retreer = Retreer::new(resources());
    let seg = retreer.segment("kindnesses", "kindness").unwrap();

    assert_eq!(seg.source, SourceKind::Lexicon);
    let texts: Vec<&str> = seg.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["kind", "ness", "es"]);
    let last = seg.suffixes.last().unwrap();
    assert_eq!(last.role, Role::Suffix(SuffixKind::Inflectional));
}

#[test]
fn test_unknown_word_left_alone() {
    let retreer = Retreer::new(resources());
    let text = "1\tzebra\tzebra\tNOUN\t_\t_\t0\troot\t_\t_\n";
    let mut doc = Document::parse(text).unwrap();

    let stats = retreer.process_document(&mut doc).unwrap();
    assert_eq!(stats.split(), 0);
    assert_eq!(doc.word_count(), 1);
    assert_eq!(doc.to_conllu_string(), format!("{}\n", text));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_corpus_split_preserves_morph_sequence() {
    let retreer = Retreer::new(resources());
    let corpus = MorphCorpus::from_tsv(CORPUS).unwrap();

    for form in ["doing", "going", "seeing", "believing"] {
        let seg = retreer.segment(form, form).unwrap();
        assert_eq!(seg.source, SourceKind::Corpus);
        let texts: Vec<String> = seg.iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts.as_slice(), corpus.morphs(form).unwrap());
    }
}

#[test]
fn test_frequency_ties_pick_leftmost() {
    let table = FrequencyTable::from_pairs([("a", 5.0), ("b", 5.0), ("c", 9.0)]);
    let candidates: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(select_by_frequency(&candidates, &table), Some(1));

    // unseen morphs count as zero
    let candidates: Vec<String> = ["a", "zzz"].iter().map(|s| s.to_string()).collect();
    assert_eq!(select_by_frequency(&candidates, &table), Some(1));
}

#[test]
fn test_main_index_points_at_root() {
    let retreer = Retreer::new(resources());
    let cases = [
        ("unhappiness", "unhappiness"),
        ("kindnesses", "kindness"),
        ("blackbirds", "blackbird"),
        ("walked", "walk"),
        ("doing", "do"),
    ];

    for (form, lemma) in cases {
        let seg = retreer.segment(form, lemma).unwrap();
        let directive = retreer.directive_for(&word(form, lemma, "NOUN")).unwrap();
        assert!(directive.main < directive.len(), "{}", form);
        let main = seg.iter().nth(directive.main).unwrap();
        assert!(main.role.is_root(), "{}", form);
    }
}

#[test]
fn test_compound_roots() {
    let retreer = Retreer::new(resources());
    let directive = retreer
        .directive_for(&word("blackbirds", "blackbird", "NOUN"))
        .unwrap();

    assert_eq!(directive.forms, vec!["black", "bird", "s"]);
    assert_eq!(directive.deprels, vec!["root", "conj:morph", "case:morph"]);
    assert_eq!(directive.upos, vec!["NOUN", "NOUN", "X"]);
    assert_eq!(directive.main, 0);
}

#[test]
fn test_single_morph_entries_do_not_split() {
    let retreer = Retreer::new(resources());
    assert!(retreer.segment("cat", "cat").is_none());
    // no segmentation recorded for the suppletive form
    assert!(retreer.segment("went", "go").is_none());
}

#[test]
fn test_alignment_pass_is_idempotent() {
    let mut res = resources();
    res.alignments = Some(AlignmentTable::from_tsv("s\tNumber=Plur\n").unwrap());
    let retreer = Retreer::new(res);

    let mut doc = Document::parse(
        "1\tblackbirds\tblackbird\tNOUN\t_\tNumber=Plur\t0\troot\t_\t_\n",
    )
    .unwrap();
    let stats = retreer.process_document(&mut doc).unwrap();
    assert_eq!(stats.feats_nulled, 1);

    let words = &doc.sentences[0].words;
    assert!(words[0].feats.is_empty());
    assert_eq!(words[1].feats.get("Number"), Some("Plur"));

    let table = retreer.resources().alignments.as_ref().unwrap();
    let once = doc.clone();
    assert_eq!(table.null_document(&mut doc), 0);
    assert_eq!(doc, once);
}

// =============================================================================
// Documents and files
// =============================================================================

const TREEBANK: &str = "# sent_id = 1
# text = Unhappiness walked, doing kindnesses.
1\tUnhappiness\tunhappiness\tNOUN\t_\tNumber=Sing\t2\tnsubj\t_\t_
2\twalked\twalk\tVERB\t_\tTense=Past\t0\troot\t_\tSpaceAfter=No
3\t,\t,\tPUNCT\t_\t_\t4\tpunct\t_\t_
4\tdoing\tdo\tVERB\t_\tVerbForm=Ger\t2\tadvcl\t_\t_
5\tkindnesses\tkindness\tNOUN\t_\tNumber=Plur\t4\tobj\t_\tSpaceAfter=No
6\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_

";

#[test]
fn test_document_rewrite() {
    let retreer = Retreer::new(resources());
    let mut doc = Document::parse(TREEBANK).unwrap();

    let stats = retreer.process_document(&mut doc).unwrap();
    assert_eq!(stats.words, 6);
    assert_eq!(stats.split_corpus, 1);
    assert_eq!(stats.split_lexicon, 2);
    assert_eq!(stats.split_inflection, 1);
    assert_eq!(doc.word_count(), 6 + 2 + 1 + 1 + 2);

    let sentence = &doc.sentences[0];
    assert_eq!(sentence.multiwords.len(), 4);
    // unsplit punctuation still points at the head of "walked"
    let walk = sentence.words.iter().find(|w| w.form == "walk").unwrap();
    let period = sentence.words.last().unwrap();
    assert_eq!(period.head, Some(walk.id));

    let out = doc.to_conllu_string();
    assert!(out.starts_with("# sent_id = 1\n"));
    assert!(out.contains("\twalked\t_\t_\t_\t_\t_\t_\t_\tSpaceAfter=No\n"));

    // the output reads back and keeps the same shape
    let reread = Document::parse(&out).unwrap();
    assert_eq!(reread, doc);
}

#[test]
fn test_plan_matches_processing() {
    let retreer = Retreer::new(resources());
    let doc = Document::parse(TREEBANK).unwrap();
    let planned = retreer.plan_document(&doc);

    let forms: Vec<&str> = planned.iter().map(|p| p.form.as_str()).collect();
    assert_eq!(forms, vec!["Unhappiness", "walked", "doing", "kindnesses"]);
    assert_eq!(planned[2].directive.source, SourceKind::Corpus);

    let json = serde_json::to_string(&planned).unwrap();
    assert!(json.contains("\"main\":1"));
}

#[test]
fn test_retree_files() {
    let dir = tempfile::tempdir().unwrap();
    let treebank_dir = dir.path().join("UD_English-Test");
    fs::create_dir_all(&treebank_dir).unwrap();

    let lexicon = dir.path().join("UniSegments-1.0-eng-MorphoLex.useg");
    let inflection = dir.path().join("eng.segmentations");
    let corpus = dir.path().join("eng.word.train.tsv");
    let treebank = treebank_dir.join("en_test-ud-dev.conllu");
    fs::write(&lexicon, LEXICON).unwrap();
    fs::write(&inflection, INFLECTION).unwrap();
    fs::write(&corpus, CORPUS).unwrap();
    fs::write(&treebank, TREEBANK).unwrap();

    let config = RunConfig {
        lexicon,
        inflection,
        corpus: Some(corpus),
        alignments: None,
        treebank,
        output_dir: dir.path().join("out"),
        fold_diacritics: false,
    };
    let (path, stats) = retree_treebank(&config).unwrap();

    assert_eq!(
        path,
        dir.path()
            .join("out")
            .join("dev")
            .join("English-Test-dev-MorphoLex.conllu")
    );
    assert_eq!(stats.split(), 4);
    let written = Document::parse(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.word_count(), 12);
}

#[test]
fn test_missing_resource_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        lexicon: dir.path().join("missing.useg"),
        inflection: dir.path().join("missing.tsv"),
        treebank: dir.path().join("missing.conllu"),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        Resources::load(&config),
        Err(morph_retree::RetreeError::Io { .. })
    ));
}

#[test]
fn test_latin_inflection_is_folded() {
    let lexicon = InflectionLexicon::from_tsv("amō\tamāvī\tV;PST\tamāv|ī\n", true).unwrap();
    assert_eq!(
        lexicon.affixes("amavi", "amo").map(|a| a.to_vec()),
        Some(vec!["amav".to_string(), "i".to_string()])
    );
}

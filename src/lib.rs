//! # morph-retree
//!
//! Split treebank words into morphological trees.
//!
//! Words of a CoNLL-U treebank are segmented into prefixes, roots and
//! suffixes using a span-tagged segmentation lexicon, an inflection lexicon
//! and, where available, a supervised segmentation corpus. Each segmented
//! word becomes a multiword token whose morphs are attached under the root,
//! which keeps the word's place in the dependency tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use morph_retree::{Document, InflectionLexicon, Resources, Retreer, SegmentationLexicon};
//!
//! let lexicon = SegmentationLexicon::from_tsv(
//!     "unhappiness\t_\t_\t_\t{\"segmentation\": [{\"span\": [0, 1], \"type\": \"prefix\"}, \
//!      {\"span\": [2, 3, 4, 5, 6], \"type\": \"root\"}, {\"span\": [7, 8, 9, 10], \"type\": \"suffix\"}]}",
//! )
//! .unwrap();
//! let inflection = InflectionLexicon::from_tsv("walk\twalked\tV;PST\twalk|ed", false).unwrap();
//!
//! let retreer = Retreer::new(Resources {
//!     lexicon,
//!     inflection,
//!     ..Default::default()
//! });
//!
//! let mut doc = Document::parse(
//!     "1\tunhappiness\tunhappiness\tNOUN\t_\t_\t0\troot\t_\t_\n",
//! )
//! .unwrap();
//! let stats = retreer.process_document(&mut doc).unwrap();
//!
//! assert_eq!(stats.split(), 1);
//! assert_eq!(doc.sentences[0].words.len(), 3);
//! ```

pub mod alignment;
pub mod cli;
pub mod config;
pub mod conllu;
pub mod corpus;
pub mod deprel;
pub mod directive;
pub mod error;
pub mod inflection;
pub mod lexicon;
pub mod morph;
pub mod normalizer;
pub mod retree;
pub mod root;
pub mod source;
pub mod text;

// Re-export main types for convenience
pub use alignment::AlignmentTable;
pub use config::RunConfig;
pub use conllu::{Attributes, Document, MultiwordToken, Sentence, Word};
pub use corpus::{FrequencyTable, MorphCorpus};
pub use directive::{MultiwordDirective, Shape};
pub use error::{Result, RetreeError};
pub use inflection::InflectionLexicon;
pub use lexicon::{LexiconEntry, SegmentationLexicon};
pub use morph::{Morph, Role, Segmentation, SourceKind, SuffixKind};
pub use retree::{PlannedSplit, Resources, RetreeStats, Retreer};
pub use source::{Segment, SegmentType, SourceRecord};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

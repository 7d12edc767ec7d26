//! File processing API for the front end
//!
//! Processing specs name a stage (what to compute) and a format (how to print it), written as
//! `<stage>-<format>`: `token-simple`, `derivation-json`, `tree-treeviz`, ... See
//! [`available_formats`] for the full list.
//!
//! [`Frontend`] owns one compiled grammar and runs split -> tokenize -> parse for every source
//! it is given; the analysis stages work from the raw tokens of the same run.

use crate::ktfront::analysis::{render_partitions, SymbolTableBuilder, TokenPartitioner};
use crate::ktfront::config::FrontendConfig;
use crate::ktfront::grammar::{CompiledGrammar, GrammarError, GrammarOptions};
use crate::ktfront::lexer::{filter_significant, lex, LexError, Token};
use crate::ktfront::parser::{
    to_treeviz_str, Derivation, ParseError, ParseTree, ParserOptions, PredictiveParser, TreeError,
};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// The grammar shipped with the crate, `grammar/kotlin.grammar`
pub const BUNDLED_GRAMMAR: &str = include_str!("../../grammar/kotlin.grammar");

/// What to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Derivation,
    Tree,
    Symbols,
    Partition,
    Grammar,
}

impl ProcessingStage {
    fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Token => "token",
            ProcessingStage::Derivation => "derivation",
            ProcessingStage::Tree => "tree",
            ProcessingStage::Symbols => "symbols",
            ProcessingStage::Partition => "partition",
            ProcessingStage::Grammar => "grammar",
        }
    }
}

/// How to print it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    /// Every token, auxiliary ones included
    RawSimple,
    RawJson,
    Treeviz,
    Sets,
    Table,
}

impl OutputFormat {
    fn name(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::RawSimple => "raw-simple",
            OutputFormat::RawJson => "raw-json",
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Sets => "sets",
            OutputFormat::Table => "table",
        }
    }
}

/// Every valid stage/format pair, in listing order
const SUPPORTED: &[(ProcessingStage, OutputFormat)] = &[
    (ProcessingStage::Token, OutputFormat::Simple),
    (ProcessingStage::Token, OutputFormat::Json),
    (ProcessingStage::Token, OutputFormat::Yaml),
    (ProcessingStage::Token, OutputFormat::RawSimple),
    (ProcessingStage::Token, OutputFormat::RawJson),
    (ProcessingStage::Derivation, OutputFormat::Simple),
    (ProcessingStage::Derivation, OutputFormat::Json),
    (ProcessingStage::Derivation, OutputFormat::Yaml),
    (ProcessingStage::Tree, OutputFormat::Treeviz),
    (ProcessingStage::Tree, OutputFormat::Json),
    (ProcessingStage::Symbols, OutputFormat::Simple),
    (ProcessingStage::Symbols, OutputFormat::Json),
    (ProcessingStage::Partition, OutputFormat::Simple),
    (ProcessingStage::Partition, OutputFormat::Json),
    (ProcessingStage::Grammar, OutputFormat::Sets),
    (ProcessingStage::Grammar, OutputFormat::Table),
];

/// A complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "token-raw-json"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "derivation" => ProcessingStage::Derivation,
            "tree" => ProcessingStage::Tree,
            "symbols" => ProcessingStage::Symbols,
            "partition" => ProcessingStage::Partition,
            "grammar" => ProcessingStage::Grammar,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "raw-simple" => OutputFormat::RawSimple,
            "raw-json" => OutputFormat::RawJson,
            "treeviz" => OutputFormat::Treeviz,
            "sets" => OutputFormat::Sets,
            "table" => OutputFormat::Table,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !SUPPORTED.contains(&(stage, format)) {
            return Err(ProcessingError::InvalidFormatType(format!(
                "format '{}' is not supported for the {} stage",
                format.name(),
                stage.name()
            )));
        }
        Ok(spec)
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        SUPPORTED
            .iter()
            .map(|(stage, format)| ProcessingSpec {
                stage: *stage,
                format: *format,
            })
            .collect()
    }
}

impl fmt::Display for ProcessingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.stage.name(), self.format.name())
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid format type: {0}")]
    InvalidFormatType(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Tokens and derivation of one successful run
#[derive(Debug, Clone, Serialize)]
pub struct FrontendOutput {
    /// Raw tokens, auxiliary ones included
    pub tokens: Vec<Token>,
    pub derivation: Derivation,
}

/// Compiled grammar plus parser settings, reusable across sources
#[derive(Debug, Clone)]
pub struct Frontend {
    grammar: CompiledGrammar,
    parser_options: ParserOptions,
}

impl Frontend {
    pub fn new(grammar: CompiledGrammar, parser_options: ParserOptions) -> Self {
        Self {
            grammar,
            parser_options,
        }
    }

    /// Front end over the bundled grammar with default options
    pub fn bundled() -> Result<Self, ProcessingError> {
        let grammar = CompiledGrammar::compile(BUNDLED_GRAMMAR, &GrammarOptions::default())?;
        Ok(Self::new(grammar, ParserOptions::default()))
    }

    pub fn from_config(config: &FrontendConfig) -> Result<Self, ProcessingError> {
        let options = config.grammar.options();
        let grammar = match &config.grammar.path {
            Some(path) => CompiledGrammar::from_file(path, &options)?,
            None => CompiledGrammar::compile(BUNDLED_GRAMMAR, &options)?,
        };
        Ok(Self::new(grammar, config.parser.clone()))
    }

    pub fn grammar(&self) -> &CompiledGrammar {
        &self.grammar
    }

    pub fn parser(&self) -> PredictiveParser<'_> {
        PredictiveParser::with_options(&self.grammar, self.parser_options.clone())
    }

    /// Split, tokenize and parse
    pub fn run(&self, source: &str) -> Result<FrontendOutput, ProcessingError> {
        let tokens = lex(source)?;
        let derivation = self.parser().parse(&tokens)?;
        Ok(FrontendOutput { tokens, derivation })
    }

    pub fn process_source(
        &self,
        source: &str,
        spec: &ProcessingSpec,
    ) -> Result<String, ProcessingError> {
        debug!(%spec, "processing source");
        match spec.stage {
            ProcessingStage::Token => {
                let tokens = lex(source)?;
                match spec.format {
                    OutputFormat::RawSimple | OutputFormat::RawJson => {
                        format_tokens(&tokens, spec.format)
                    }
                    _ => format_tokens(&filter_significant(&tokens), spec.format),
                }
            }
            ProcessingStage::Derivation => {
                let output = self.run(source)?;
                match spec.format {
                    OutputFormat::Simple => Ok(with_newline(output.derivation.render())),
                    format => serialize(&output.derivation, format),
                }
            }
            ProcessingStage::Tree => {
                let output = self.run(source)?;
                let tree =
                    ParseTree::from_derivation(&self.grammar, &output.derivation, &output.tokens)?;
                match spec.format {
                    OutputFormat::Treeviz => Ok(to_treeviz_str(&tree)),
                    format => serialize(&tree, format),
                }
            }
            ProcessingStage::Symbols => {
                let table = SymbolTableBuilder::build(&lex(source)?);
                match spec.format {
                    OutputFormat::Simple => Ok(table.render()),
                    format => serialize(&table, format),
                }
            }
            ProcessingStage::Partition => {
                let partitions = TokenPartitioner::partition(&lex(source)?);
                match spec.format {
                    OutputFormat::Simple => Ok(render_partitions(&partitions)),
                    format => serialize(&partitions, format),
                }
            }
            ProcessingStage::Grammar => match spec.format {
                OutputFormat::Table => Ok(self.grammar.render_table()),
                _ => Ok(format!(
                    "{}\n\n{}",
                    self.grammar.render_rules(),
                    self.grammar.render_sets()
                )),
            },
        }
    }

    /// Process a source file according to the given specification
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
        spec: &ProcessingSpec,
    ) -> Result<String, ProcessingError> {
        let file_path = file_path.as_ref();
        let content = fs::read_to_string(file_path).map_err(|source| ProcessingError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        info!(path = %file_path.display(), %spec, "processing file");
        self.process_source(&content, spec)
    }
}

/// Format tokens according to the specified format
fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple | OutputFormat::RawSimple => Ok(tokens
            .iter()
            .map(|token| format!("{}\n", token))
            .collect()),
        OutputFormat::RawJson => serialize(tokens, OutputFormat::Json),
        format => serialize(tokens, format),
    }
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| ProcessingError::Serialization(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| ProcessingError::Serialization(e.to_string()))
        }
        other => Err(ProcessingError::InvalidFormatType(other.name().to_string())),
    }
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(|spec| spec.to_string())
        .collect()
}

/// Process a file with the bundled grammar and default options
pub fn process_file(
    file_path: impl AsRef<Path>,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    Frontend::bundled()?.process_file(file_path, spec)
}

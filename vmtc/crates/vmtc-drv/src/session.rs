//! A translation run.
//!
//! ```text
//!   discover + read every unit
//!          |
//!   pass 1: FunctionCollector over all units -> FunctionTable + diagnostics
//!          |            (errors stop here, no output file is created)
//!   bootstrap (directory input, or `bootstrap = "always"`)
//!          |
//!   pass 2: CodeWriter over all units, in file-name order
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use vmtc_gen::{CodeWriter, WriterOptions};
use vmtc_lex::Lexer;
use vmtc_sem::{CheckLevel, CheckPolicy, FunctionCollector, FunctionTable};
use vmtc_util::{Handler, Level};

use crate::config::Config;
use crate::error::{Result, TranslateError};
use crate::source::{default_output, discover, InputKind, SourceMap};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TranslationReport {
    pub output: PathBuf,
    pub units: usize,
    pub commands: usize,
    pub lines: usize,
    pub bootstrap: bool,
    pub functions: FunctionTable,
}

pub struct Session {
    pub config: Config,
    pub kind: InputKind,
    pub sources: SourceMap,
    pub diagnostics: Handler,
    output: PathBuf,
}

impl Session {
    /// Discover and read every unit `input` stands for.
    pub fn open(input: &Path, config: Config) -> Result<Self> {
        let (kind, files) = discover(input)?;
        info!(input = %input.display(), units = files.len(), "opening input");

        let mut sources = SourceMap::new();
        for path in files {
            sources.load(path)?;
        }

        Ok(Self {
            output: default_output(input, kind)?,
            config,
            kind,
            sources,
            diagnostics: Handler::new(),
        })
    }

    /// Write somewhere other than the default output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn bootstrap_enabled(&self) -> bool {
        self.config
            .translate
            .bootstrap
            .applies(self.kind == InputKind::Directory)
    }

    /// Pass 1: learn every function, report problems.
    ///
    /// A lone file routinely calls into units it is not translated with, so
    /// calls are only checked when the output is a whole program (directory
    /// input or a bootstrap).
    pub fn collect_functions(&self) -> Result<FunctionTable> {
        let whole_program = self.kind == InputKind::Directory || self.bootstrap_enabled();
        let policy = CheckPolicy {
            undefined_calls: if whole_program {
                self.config.checks.undefined_calls
            } else {
                CheckLevel::Allow
            },
            ..self.config.checks
        };

        let mut collector = FunctionCollector::new(&self.diagnostics, policy);
        for (_, unit) in self.sources.iter() {
            collector
                .scan_unit(&unit.name, &unit.content)
                .map_err(|source| TranslateError::Scan {
                    unit: unit.name.clone(),
                    source,
                })?;
        }
        if self.bootstrap_enabled() {
            collector.require(&self.config.translate.entry_point);
        }
        let functions = collector.finish();
        info!(functions = functions.len(), "collected functions");

        let errors = self.diagnostics.error_count();
        for diagnostic in self.diagnostics.take() {
            match diagnostic.level {
                Level::Error => error!("{}", diagnostic),
                Level::Warning => warn!("{}", diagnostic),
                Level::Note => info!("{}", diagnostic),
            }
        }
        if errors > 0 {
            return Err(TranslateError::ChecksFailed { errors });
        }
        Ok(functions)
    }

    /// Run both passes and write the output file.
    ///
    /// A partially written file is removed when pass 2 fails.
    pub fn translate(&self) -> Result<TranslationReport> {
        let functions = self.collect_functions()?;

        let file = File::create(&self.output).map_err(|source| TranslateError::Io {
            path: self.output.clone(),
            source,
        })?;
        match self.emit(BufWriter::new(file), functions) {
            Ok((_, report)) => {
                info!(
                    output = %report.output.display(),
                    commands = report.commands,
                    lines = report.lines,
                    "wrote assembly"
                );
                Ok(report)
            }
            Err(err) => {
                if let Err(e) = fs::remove_file(&self.output) {
                    debug!(error = %e, "could not remove partial output");
                }
                Err(err)
            }
        }
    }

    /// Run both passes into any writer.
    pub fn translate_to<W: Write>(&self, out: W) -> Result<(W, TranslationReport)> {
        let functions = self.collect_functions()?;
        self.emit(out, functions)
    }

    /// Pass 2.
    fn emit<W: Write>(&self, out: W, functions: FunctionTable) -> Result<(W, TranslationReport)> {
        let options = WriterOptions {
            emit_comments: self.config.translate.emit_comments,
        };
        let mut writer = CodeWriter::with_options(out, options);

        let bootstrap = self.bootstrap_enabled();
        if bootstrap {
            let translate = &self.config.translate;
            writer
                .write_init(&translate.entry_point, translate.stack_base)
                .map_err(TranslateError::Bootstrap)?;
        }

        let mut commands = 0;
        for (_, unit) in self.sources.iter() {
            info!(unit = %unit.name, "translating unit");
            writer.set_unit(unit.name.as_str());
            for item in Lexer::new(&unit.content) {
                let (line, command) = item.map_err(|source| TranslateError::Scan {
                    unit: unit.name.clone(),
                    source,
                })?;
                writer
                    .write_command(&command)
                    .map_err(|source| TranslateError::CodeGen {
                        unit: unit.name.clone(),
                        line,
                        command: command.to_string(),
                        source,
                    })?;
                commands += 1;
            }
        }

        let lines = writer.lines_written();
        let out = writer.finish().map_err(|source| TranslateError::Emit {
            path: self.output.clone(),
            source,
        })?;

        Ok((
            out,
            TranslationReport {
                output: self.output.clone(),
                units: self.sources.len(),
                commands,
                lines,
                bootstrap,
                functions,
            },
        ))
    }
}

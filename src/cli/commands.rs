//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::Analyzer;
use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::config::Settings;
use crate::output::{
    create_exporter, create_progress_callback, create_writer, format_impact, format_summary,
    ProgressReporter,
};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the configuration tree and render the report
    Analyze(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => Self::analyze(args),
            Command::Init => Self::init(),
        }
    }

    fn analyze(args: &Args) -> Result<()> {
        let started = Instant::now();
        let settings = config::load_config(CliArgs::from(args))?;
        tracing::debug!(?settings, "effective settings");

        let report = Self::run_analysis(&settings)?;
        tracing::info!(
            modules = report.total_modules,
            dependencies = report.total_dependencies,
            cycles = report.total_cycles,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );

        if !settings.quiet {
            eprint!("{}", format_summary(&report, settings.use_colors, settings.verbose));
        }

        // --impact answers one question instead of rendering the whole report
        let rendered = match &args.impact {
            Some(id) => format_impact(id, report.impact_of(id)?, false),
            None => create_exporter(settings.output_format).export(&report)?,
        };

        create_writer(settings.output_file.as_ref()).write(&rendered)
    }

    fn run_analysis(settings: &Settings) -> Result<AnalysisReport> {
        let reporter = Arc::new(ProgressReporter::new(
            !settings.quiet && settings.show_progress,
        ));
        let analyzer = Analyzer::new(settings.clone());

        reporter.start(0, &format!("Parsing {}", settings.scan_path.display()));
        let result = analyzer.analyze_with_progress(
            analyzer.timestamp(),
            create_progress_callback(reporter.clone()),
        );
        reporter.finish("Parsing finished");

        result
    }

    fn init() -> Result<()> {
        let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            eprintln!(
                "Configuration file already exists at: {}",
                config_path.display()
            );
            eprintln!("To overwrite it, delete the file first and run this command again.");
            return Ok(());
        }

        config::create_default_config(&config_path)?;

        eprintln!(
            "Created default configuration file at: {}",
            config_path.display()
        );
        eprintln!("Edit it to change the scan root, exclude patterns, output format or file names.");
        Ok(())
    }
}

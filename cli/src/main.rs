//! tocdigest CLI - catalog topic summarizer

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tocdigest::extract::{
    resolve_line, DEFAULT_PAGES_AFTER, DEFAULT_PAGES_BEFORE, DEFAULT_TOC_MARKER,
    DEFAULT_TOC_PAGE_LIMIT,
};
use tocdigest::pipeline::{io, TopicStatus, DEFAULT_ARTIFACT_EXTENSION};
use tocdigest::summarize::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use tocdigest::{
    BatchPipeline, DryRunSummarizer, ExistingArtifact, ExtractionWindow, GeminiClient,
    GeminiConfig, ParseOptions, PdfFile, PdfParser, PipelineEvent, PipelineOptions, Summarizer,
    TocLocator, TopicExtractor,
};

#[derive(Parser)]
#[command(name = "tocdigest")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Summarize catalog topics found through a PDF table of contents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every topic in a topic list
    Run {
        /// Catalog PDF
        #[arg(short, long, value_name = "FILE")]
        catalog: PathBuf,

        /// Topic list, one topic per line
        #[arg(short, long, value_name = "FILE")]
        topics: PathBuf,

        /// Prompt template appended after each excerpt
        #[arg(short, long, value_name = "FILE")]
        prompt: PathBuf,

        /// Output directory for the summaries
        #[arg(short, long, value_name = "DIR", default_value = "summaries")]
        output: PathBuf,

        /// Summarizer model
        #[arg(short, long, env = "TOCDIGEST_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Extension of summary files (empty for none)
        #[arg(long, default_value = DEFAULT_ARTIFACT_EXTENSION)]
        extension: String,

        /// Summarizer timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,

        /// Topics processed concurrently
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Keep summaries that already exist instead of regenerating them
        #[arg(long)]
        skip_existing: bool,

        /// Write the prompts instead of calling the summarizer
        #[arg(long)]
        dry_run: bool,

        /// Also write the error report as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Gemini API key (falls back to GOOGLE_API_KEY)
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Gemini API base URL
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Read undecodable pages as empty instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Print the table-of-contents page
    Toc {
        /// Catalog PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        toc: TocArgs,
    },

    /// Show the page and window a topic resolves to
    Resolve {
        /// Catalog PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Topic to look up
        #[arg(value_name = "TOPIC")]
        topic: String,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Print the bold excerpt for a topic
    Bold {
        /// Catalog PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Topic to extract
        #[arg(value_name = "TOPIC")]
        topic: String,

        #[command(flatten)]
        toc: TocArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the excerpt with its page and window as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information
    Info {
        /// Catalog PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct TocArgs {
    /// Heading that identifies the table-of-contents page
    #[arg(long, default_value = DEFAULT_TOC_MARKER)]
    toc_marker: String,

    /// Number of leading pages searched for the heading
    #[arg(long, default_value_t = DEFAULT_TOC_PAGE_LIMIT)]
    toc_pages: u32,
}

impl TocArgs {
    fn locator(&self) -> TocLocator {
        TocLocator::new(self.toc_marker.clone()).with_page_limit(self.toc_pages)
    }
}

#[derive(Args)]
struct WindowArgs {
    /// Pages read before the listed page
    #[arg(long, default_value_t = DEFAULT_PAGES_BEFORE)]
    before: u32,

    /// Pages read after the listed page
    #[arg(long, default_value_t = DEFAULT_PAGES_AFTER)]
    after: u32,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            catalog,
            topics,
            prompt,
            output,
            model,
            toc,
            window,
            extension,
            timeout,
            jobs,
            skip_existing,
            dry_run,
            report,
            api_key,
            endpoint,
            lenient,
        } => {
            let mut options = PipelineOptions::new()
                .with_toc_marker(toc.toc_marker)
                .with_toc_page_limit(toc.toc_pages)
                .with_window(window.before, window.after)
                .with_model(model)
                .with_extension(extension)
                .with_workers(jobs);
            if skip_existing {
                options = options.with_existing(ExistingArtifact::Skip);
            }
            if lenient {
                options = options.with_parse_options(ParseOptions::new().lenient());
            }
            let summarizer = if dry_run {
                Ok(Box::new(DryRunSummarizer) as Box<dyn Summarizer>)
            } else {
                gemini_summarizer(api_key, endpoint, Duration::from_secs(timeout))
            };
            summarizer.and_then(|summarizer| {
                cmd_run(
                    &catalog,
                    &topics,
                    &prompt,
                    &output,
                    options,
                    summarizer,
                    report.as_deref(),
                )
            })
        }
        Commands::Toc { input, toc } => cmd_toc(&input, &toc),
        Commands::Resolve {
            input,
            topic,
            toc,
            window,
        } => cmd_resolve(&input, &topic, &toc, &window),
        Commands::Bold {
            input,
            topic,
            toc,
            window,
            output,
            json,
        } => cmd_bold(&input, &topic, &toc, &window, output.as_deref(), json),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn gemini_summarizer(
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
) -> Result<Box<dyn Summarizer>, Box<dyn std::error::Error>> {
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or("No API key: set GEMINI_API_KEY or pass --api-key (or use --dry-run)")?;

    let config = GeminiConfig::new(api_key)
        .with_endpoint(endpoint)
        .with_timeout(timeout);
    Ok(Box::new(GeminiClient::new(config)?))
}

fn cmd_run(
    catalog: &Path,
    topic_list: &Path,
    prompt_file: &Path,
    output_dir: &Path,
    options: PipelineOptions,
    summarizer: Box<dyn Summarizer>,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let topics = io::read_topics(topic_list)?;
    let prompt = io::read_prompt(prompt_file)?;
    log::debug!(
        "Read {} topics from {} and {} prompt bytes from {}",
        topics.len(),
        topic_list.display(),
        prompt.len(),
        prompt_file.display()
    );
    let source = PdfFile::new(catalog).with_options(options.parse.clone());

    println!(
        "{} {} topics with {} ({})",
        "Summarizing".cyan().bold(),
        topics.len(),
        summarizer.name(),
        options.model
    );

    let pb = ProgressBar::new(topics.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let pipeline = BatchPipeline::new(options, summarizer).with_events(tx);

    let report = std::thread::scope(|scope| {
        let pb = &pb;
        scope.spawn(move || {
            for event in rx.iter() {
                match event {
                    PipelineEvent::Started { topic, .. } => pb.set_message(topic),
                    PipelineEvent::Finished { topic, status, .. } => {
                        if status == TopicStatus::Failed {
                            pb.println(format!("  {} {}", "✗".red(), topic));
                        }
                        pb.inc(1);
                    }
                }
            }
        });

        let report = pipeline.run(&topics, &source, &prompt, output_dir);
        // Closes the channel so the progress thread exits.
        drop(pipeline);
        report
    })?;

    pb.finish_and_clear();

    println!(
        "{} {} written, {} skipped, {} failed",
        "Done!".green().bold(),
        report.succeeded,
        report.skipped,
        report.failed()
    );

    if !report.is_clean() {
        println!();
        print!("{}", report.to_string().yellow());
    }

    if let Some(path) = report_path {
        io::write_all(path, &report.to_json()?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn cmd_toc(input: &Path, toc: &TocArgs) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let text = toc.locator().locate(&parser)?;
    println!("{}", text);
    Ok(())
}

fn cmd_resolve(
    input: &Path,
    topic: &str,
    toc: &TocArgs,
    window: &WindowArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let toc_text = toc.locator().locate(&parser)?;
    let (line, page) = resolve_line(&toc_text, topic)?;
    let range = ExtractionWindow::around(page, window.before, window.after, parser.page_count());

    println!("{}: {}", "Line".bold(), line.trim());
    println!("{}: {}", "Page".bold(), page);
    match range {
        Some(range) => println!("{}: {}", "Window".bold(), range),
        None => println!(
            "{}: {}",
            "Window".bold(),
            format!("outside the document ({} pages)", parser.page_count()).yellow()
        ),
    }
    Ok(())
}

fn cmd_bold(
    input: &Path,
    topic: &str,
    toc: &TocArgs,
    window: &WindowArgs,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let extractor = TopicExtractor::new()
        .with_locator(toc.locator())
        .with_window(window.before, window.after);
    let excerpt = extractor.extract(&parser, topic)?;
    log::debug!("{}: page {}, window {:?}", topic, excerpt.page, excerpt.window);

    let content = if json {
        serde_json::to_string_pretty(&excerpt)?
    } else {
        excerpt.text
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, ParseOptions::new().lenient())?;
    let metadata = parser.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "tocdigest".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Catalog topic summarizer");
    println!();
    println!("License: MIT");
}

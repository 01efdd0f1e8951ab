use crate::error::SplitError;
use crate::geometry::SplitDirection;
use crate::layout::{assemble, output_page_count};
use crate::page_range::{format_pages, resolve, PageSpec};
use crate::pdf::{render::render, PdfDocument};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RULE_WIDTH: usize = 50;

/// One invocation's worth of options, as collected by the CLI or MCP layer.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub pages: Option<String>,
    pub start: u32,
    pub end: Option<u32>,
    pub direction: SplitDirection,
    pub dry_run: bool,
}

impl SplitRequest {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        SplitRequest {
            input: input.into(),
            output: None,
            pages: None,
            start: 3,
            end: None,
            direction: SplitDirection::Vertical,
            dry_run: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub input: PathBuf,
    /// Absent on a dry run
    pub output: Option<PathBuf>,
    pub direction: SplitDirection,
    /// The selection as given, before it was checked against the document
    pub requested: String,
    /// The pages actually split, compacted into runs ("1,3-5")
    pub selection: String,
    pub total_pages: u32,
    pub split_pages: Vec<u32>,
    pub output_page_count: u32,
    pub warnings: Vec<String>,
    pub bytes_written: Option<u64>,
}

/// `dir/name.pdf` -> `dir/name - Split.pdf`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{} - Split{}", stem, ext))
}

/// Resolve, assemble, render, and (unless dry-running) write the output.
///
/// The page spec is parsed before the input is touched, and nothing is
/// written until the whole output document exists in memory.
pub fn execute(request: &SplitRequest) -> Result<SplitReport, SplitError> {
    let spec = PageSpec::from_options(request.pages.as_deref(), request.start, request.end)?;
    let requested = request.pages.clone().unwrap_or_else(|| spec.to_string());
    let output = request.output_path();

    let source = PdfDocument::open(&request.input)?;
    let total_pages = source.page_count();
    info!("Opened {} ({} pages)", request.input.display(), total_pages);

    let resolution = resolve(total_pages, &spec);
    for warning in &resolution.warnings {
        warn!("{}", warning);
    }
    let ignored: u64 = resolution.warnings.iter().map(|w| w.dropped()).sum();
    if ignored > 0 {
        debug!("{} requested pages ignored", ignored);
    }

    if resolution.pages.is_empty() {
        if let PageSpec::ExplicitSet { .. } = spec {
            return Err(SplitError::NoValidPages {
                spec: requested,
                total: total_pages,
            });
        }
    }

    let source_pages = source.source_pages(&resolution.pages)?;
    let layout = assemble(&source_pages, &resolution.pages, request.direction);
    debug_assert_eq!(
        layout.len() as u32,
        output_page_count(total_pages, &resolution.pages)
    );

    let (first_name, second_name) = request.direction.half_names();
    for page in &source_pages {
        match page.bbox {
            Some(bbox) => info!(
                "Splitting page {} ({} x {}) -> {} + {}",
                page.number, bbox.width, bbox.height, first_name, second_name
            ),
            None => info!("Keeping page {} as is", page.number),
        }
    }

    let bytes_written = if request.dry_run {
        debug!("Dry run, not writing {}", output.display());
        None
    } else {
        let mut doc = render(&source, &layout)?;
        Some(PdfDocument::save(&mut doc, &output)?)
    };

    Ok(SplitReport {
        input: request.input.clone(),
        output: (!request.dry_run).then_some(output),
        direction: request.direction,
        requested,
        selection: format_pages(resolution.pages.iter().copied()),
        total_pages,
        split_pages: resolution.pages.into_iter().collect(),
        output_page_count: layout.len() as u32,
        warnings: resolution.warnings.iter().map(|w| w.to_string()).collect(),
        bytes_written,
    })
}

pub fn run(request: &SplitRequest, json: bool) -> Result<()> {
    if !json {
        println!("Starting PDF page splitting...");
        println!("{}", "=".repeat(RULE_WIDTH));
    }

    let report = match execute(request) {
        Ok(report) => report,
        Err(e) => {
            if !json {
                println!("{}", "=".repeat(RULE_WIDTH));
            }
            eprintln!("Processing failed!");
            return Err(e)
                .with_context(|| format!("Failed to split {}", request.input.display()));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if request.dry_run {
        print_plan(&report, request.direction);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_plan(report: &SplitReport, direction: SplitDirection) {
    let (first_name, second_name) = direction.half_names();

    println!("Dry run for {}", report.input.display());
    println!("Total pages in PDF: {}", report.total_pages);
    for page in 1..=report.total_pages {
        if report.split_pages.binary_search(&page).is_ok() {
            println!("  page {}: split -> {} + {}", page, first_name, second_name);
        } else {
            println!("  page {}: keep", page);
        }
    }
    println!("Output page count would be: {}", report.output_page_count);
}

fn print_summary(report: &SplitReport) {
    println!("Total pages in PDF: {}", report.total_pages);
    println!(
        "Split pages ({}): {}",
        report.direction,
        if report.selection.is_empty() {
            "none"
        } else {
            report.selection.as_str()
        }
    );
    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }
    println!();
    println!("Splitting finished!");
    println!("Input file: {}", report.input.display());
    if let Some(output) = &report.output {
        println!("Output file: {}", output.display());
    }
    println!("Original page count: {}", report.total_pages);
    println!("Output page count: {}", report.output_page_count);
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Processing complete!");
    if let Some(bytes) = report.bytes_written {
        println!("Output file size: {} bytes", group_thousands(bytes));
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

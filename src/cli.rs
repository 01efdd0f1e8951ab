use crate::commands::split::SplitRequest;
use crate::geometry::SplitDirection;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfhalve")]
#[command(about = "Split PDF pages into left/right or top/bottom halves")]
#[command(version)]
pub struct Cli {
    /// PDF file to split
    #[arg(required_unless_present = "mcp")]
    pub input_file: Option<PathBuf>,

    /// Output file (default: "<input> - Split.pdf" next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First page to split, 1-based (ignored with --pages)
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Last page to split (default: last page; ignored with --pages)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub end: Option<u32>,

    /// Pages to split (e.g., "1,3-5,7"); overrides --start/--end
    #[arg(short, long)]
    pub pages: Option<String>,

    /// Where to cut each selected page
    #[arg(short, long, value_enum, default_value_t = SplitDirection::Vertical)]
    pub direction: SplitDirection,

    /// Show which pages would be split without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Run as MCP server on stdin/stdout
    #[arg(long, conflicts_with = "input_file")]
    pub mcp: bool,
}

impl Cli {
    /// `None` when running as a server
    pub fn split_request(&self) -> Option<SplitRequest> {
        let input = self.input_file.clone()?;
        Some(SplitRequest {
            output: self.output.clone(),
            pages: self.pages.clone(),
            start: self.start,
            end: self.end,
            direction: self.direction,
            dry_run: self.dry_run,
            ..SplitRequest::new(input)
        })
    }
}

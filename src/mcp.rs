use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::commands::split::{execute, SplitRequest};
use crate::geometry::SplitDirection;
use crate::pdf::PdfDocument;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Output file path (default: '<input> - Split.pdf' next to the input)")]
    pub output: Option<String>,
    #[schemars(description = "Pages to split (e.g., '1,3-5,7'); overrides start/end")]
    pub pages: Option<String>,
    #[schemars(description = "First page to split, 1-based (default: 3)")]
    #[serde(default = "default_start")]
    pub start: u32,
    #[schemars(description = "Last page to split (default: last page)")]
    pub end: Option<u32>,
    #[schemars(description = "'vertical' (left/right halves) or 'horizontal' (top/bottom halves), default vertical")]
    pub direction: Option<String>,
}

fn default_start() -> u32 {
    3
}

impl PdfSplitRequest {
    fn into_split_request(self, dry_run: bool) -> Result<SplitRequest, String> {
        if self.start == 0 {
            return Err("start must be >= 1".to_string());
        }
        if self.end == Some(0) {
            return Err("end must be >= 1".to_string());
        }

        let direction = match self.direction.as_deref() {
            Some(d) => d.parse::<SplitDirection>()?,
            None => SplitDirection::Vertical,
        };

        Ok(SplitRequest {
            input: PathBuf::from(self.path),
            output: self.output.map(PathBuf::from),
            pages: self.pages,
            start: self.start,
            end: self.end,
            direction,
            dry_run,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    fn split(&self, req: PdfSplitRequest, dry_run: bool) -> String {
        let request = match req.into_split_request(dry_run) {
            Ok(r) => r,
            Err(e) => return format!("Error: {}", e),
        };

        match execute(&request) {
            Ok(report) => {
                info!(
                    "Split {} -> {} pages",
                    request.input.display(),
                    report.output_page_count
                );
                serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the page count and the width/height (in PDF points) of every page's media box")]
    fn pdf_page_sizes(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let doc = match PdfDocument::open(&path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };

        match doc.page_sizes() {
            Ok(pages) => {
                let result = PageSizesResult {
                    path,
                    page_count: doc.page_count(),
                    pages: pages
                        .into_iter()
                        .map(|(page, bbox)| PageSizeResult {
                            page,
                            width: bbox.width,
                            height: bbox.height,
                        })
                        .collect(),
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Preview a split without writing anything: which pages would be split and how many pages the output would have")]
    fn pdf_plan_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        self.split(req, true)
    }

    #[tool(description = "Split selected pages of a PDF into two halves (left/right or top/bottom) and save the result to a new file. Unselected pages are copied unchanged.")]
    fn pdf_split_pages(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        self.split(req, false)
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageSizesResult {
    pub path: String,
    pub page_count: u32,
    pub pages: Vec<PageSizeResult>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageSizeResult {
    pub page: u32,
    pub width: f64,
    pub height: f64,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page splitting tools. Use pdf_page_sizes to inspect page dimensions, \
                 pdf_plan_split to preview which pages would be cut in half, and \
                 pdf_split_pages to write a new PDF where the selected pages are replaced \
                 by their two halves."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("Starting MCP server on stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}

use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::models::{
    Document, IndexReport, OutputFormat, QueryAnswer, SearchResult, StoreStats,
};
use crate::sources::{FileNode, render_tree};

const PREVIEW_CHARS: usize = 200;

pub trait Formatter {
    fn format_answer(&self, answer: &QueryAnswer) -> String;
    fn format_search_results(&self, query: &str, results: &[SearchResult]) -> String;
    fn format_index_report(&self, report: &IndexReport) -> String;
    fn format_dry_run(&self, documents: &[Document], files: usize) -> String;
    fn format_stats(&self, stats: &StoreStats) -> String;
    fn format_tree(&self, tree: &FileNode) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        format!("{}...", head)
    } else {
        head
    }
}

pub struct TextFormatter;

impl TextFormatter {
    fn write_results(output: &mut String, results: &[SearchResult]) {
        for (i, result) in results.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}]", i + 1, result.score).unwrap();
            writeln!(
                output,
                "   Location: {} (chunk {})",
                result.document.source_path, result.document.chunk_index
            )
            .unwrap();
            writeln!(output, "   ---").unwrap();
            for line in preview(&result.document.content).lines() {
                writeln!(output, "   {}", line).unwrap();
            }
            writeln!(output).unwrap();
        }
    }
}

impl Formatter for TextFormatter {
    fn format_answer(&self, answer: &QueryAnswer) -> String {
        let mut output = String::new();
        writeln!(output, "{}\n", answer.answer.trim_end()).unwrap();

        if !answer.results.is_empty() {
            writeln!(output, "Sources").unwrap();
            writeln!(output, "-------").unwrap();
            for result in &answer.results {
                writeln!(
                    output,
                    "  [{:.3}] {} (chunk {})",
                    result.score, result.document.source_path, result.document.chunk_index
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }

        writeln!(output, "Answered in {}ms", answer.duration_ms).unwrap();
        output
    }

    fn format_search_results(&self, query: &str, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", query);
        }

        let mut output = String::new();
        writeln!(output, "Search results for: \"{}\"", query).unwrap();
        writeln!(output, "Found {} results\n", results.len()).unwrap();
        Self::write_results(&mut output, results);
        output
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        let mut output = String::new();
        if report.cancelled {
            writeln!(output, "Indexing Cancelled").unwrap();
            writeln!(output, "------------------").unwrap();
        } else {
            writeln!(output, "Indexing Complete").unwrap();
            writeln!(output, "-----------------").unwrap();
        }
        writeln!(output, "Documents:       {}", report.documents).unwrap();
        writeln!(output, "Embedded:        {}", report.embedded).unwrap();
        writeln!(output, "Already indexed: {}", report.already_indexed).unwrap();
        writeln!(output, "Failed:          {}", report.failed).unwrap();
        writeln!(output, "Duration:        {}ms", report.duration_ms).unwrap();
        output
    }

    fn format_dry_run(&self, documents: &[Document], files: usize) -> String {
        let mut output = String::new();
        writeln!(
            output,
            "Dry run: Would index {} chunks from {} files",
            documents.len(),
            files
        )
        .unwrap();
        for document in documents {
            writeln!(output, "  {} #{}", document.source_path, document.chunk_index).unwrap();
        }
        output
    }

    fn format_stats(&self, stats: &StoreStats) -> String {
        let mut output = String::new();
        writeln!(output, "Vector Store").unwrap();
        writeln!(output, "------------").unwrap();
        writeln!(output, "Total documents: {}", stats.total_documents).unwrap();
        writeln!(output, "Dimension:       {}", stats.dimension).unwrap();
        writeln!(output, "Database size:   {:.2} MB", stats.database_size_mb).unwrap();

        if !stats.files_by_extension.is_empty() {
            writeln!(output, "\nBy extension:").unwrap();
            for (ext, count) in &stats.files_by_extension {
                let ext = if ext.is_empty() { "(none)" } else { ext };
                writeln!(output, "  {:<10} {}", ext, count).unwrap();
            }
        }
        output
    }

    fn format_tree(&self, tree: &FileNode) -> String {
        render_tree(tree)
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.unwrap_or_else(|e| serde_json::json!({"error": e.to_string()}).to_string())
    }
}

impl Formatter for JsonFormatter {
    fn format_answer(&self, answer: &QueryAnswer) -> String {
        self.to_json(answer)
    }

    fn format_search_results(&self, query: &str, results: &[SearchResult]) -> String {
        self.to_json(&serde_json::json!({
            "query": query,
            "total": results.len(),
            "results": results,
        }))
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        self.to_json(report)
    }

    fn format_dry_run(&self, documents: &[Document], files: usize) -> String {
        let chunks: Vec<serde_json::Value> = documents
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "file_path": d.source_path,
                    "chunk_idx": d.chunk_index,
                })
            })
            .collect();

        self.to_json(&serde_json::json!({
            "dry_run": true,
            "files": files,
            "total_chunks": documents.len(),
            "chunks": chunks,
        }))
    }

    fn format_stats(&self, stats: &StoreStats) -> String {
        self.to_json(&serde_json::json!({
            "total_documents": stats.total_documents,
            "files_by_extension": stats.files_by_extension,
            "dimension": stats.dimension,
            "database_size": format!("{:.2} MB", stats.database_size_mb),
        }))
    }

    fn format_tree(&self, tree: &FileNode) -> String {
        self.to_json(&tree_json(tree))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

fn tree_json(node: &FileNode) -> serde_json::Value {
    if node.is_dir {
        let children: Vec<serde_json::Value> = node.children.iter().map(tree_json).collect();
        serde_json::json!({
            "name": node.name,
            "path": node.path,
            "type": "directory",
            "children": children,
        })
    } else {
        serde_json::json!({
            "name": node.name,
            "path": node.path,
            "type": "file",
            "indexable": node.content.is_some(),
        })
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_answer(&self, answer: &QueryAnswer) -> String {
        let mut output = String::new();
        writeln!(output, "## Answer\n").unwrap();
        writeln!(output, "**Query:** `{}`\n", answer.query).unwrap();
        writeln!(output, "{}\n", answer.answer.trim_end()).unwrap();

        if !answer.results.is_empty() {
            writeln!(output, "### Sources\n").unwrap();
            writeln!(output, "| Score | Location | Chunk |").unwrap();
            writeln!(output, "|-------|----------|-------|").unwrap();
            for result in &answer.results {
                writeln!(
                    output,
                    "| {:.3} | `{}` | {} |",
                    result.score, result.document.source_path, result.document.chunk_index
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }

        writeln!(output, "*Answered in {}ms*", answer.duration_ms).unwrap();
        output
    }

    fn format_search_results(&self, query: &str, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return format!("## No results found\n\nQuery: `{}`\n", query);
        }

        let mut output = String::new();
        writeln!(output, "## Search Results\n").unwrap();
        writeln!(output, "**Query:** `{}`\n", query).unwrap();
        writeln!(output, "Found {} results\n", results.len()).unwrap();

        for (i, result) in results.iter().enumerate() {
            writeln!(output, "### {}. Score: {:.3}\n", i + 1, result.score).unwrap();
            writeln!(
                output,
                "**Location:** `{}` (chunk {})\n",
                result.document.source_path, result.document.chunk_index
            )
            .unwrap();
            writeln!(output, "```").unwrap();
            writeln!(output, "{}", result.document.content).unwrap();
            writeln!(output, "```\n").unwrap();
        }

        output
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        let mut output = String::new();
        let title = if report.cancelled {
            "Indexing Cancelled"
        } else {
            "Indexing Complete"
        };
        writeln!(output, "## {}\n", title).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Documents | {} |", report.documents).unwrap();
        writeln!(output, "| Embedded | {} |", report.embedded).unwrap();
        writeln!(output, "| Already indexed | {} |", report.already_indexed).unwrap();
        writeln!(output, "| Failed | {} |", report.failed).unwrap();
        writeln!(output, "| Duration | {}ms |", report.duration_ms).unwrap();
        output
    }

    fn format_dry_run(&self, documents: &[Document], files: usize) -> String {
        let mut output = String::new();
        writeln!(output, "## Dry Run\n").unwrap();
        writeln!(
            output,
            "Would index {} chunks from {} files\n",
            documents.len(),
            files
        )
        .unwrap();
        writeln!(output, "| File | Chunk |").unwrap();
        writeln!(output, "|------|-------|").unwrap();
        for document in documents {
            writeln!(
                output,
                "| `{}` | {} |",
                document.source_path, document.chunk_index
            )
            .unwrap();
        }
        output
    }

    fn format_stats(&self, stats: &StoreStats) -> String {
        let mut output = String::new();
        writeln!(output, "## Vector Store\n").unwrap();
        writeln!(output, "- **Total documents:** {}", stats.total_documents).unwrap();
        writeln!(output, "- **Dimension:** {}", stats.dimension).unwrap();
        writeln!(
            output,
            "- **Database size:** {:.2} MB",
            stats.database_size_mb
        )
        .unwrap();

        if !stats.files_by_extension.is_empty() {
            writeln!(output, "\n| Extension | Documents |").unwrap();
            writeln!(output, "|-----------|-----------|").unwrap();
            for (ext, count) in &stats.files_by_extension {
                let ext = if ext.is_empty() { "(none)" } else { ext };
                writeln!(output, "| `{}` | {} |", ext, count).unwrap();
            }
        }
        output
    }

    fn format_tree(&self, tree: &FileNode) -> String {
        format!("```\n{}```\n", render_tree(tree))
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> ⚠️ **Error:** {}\n", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

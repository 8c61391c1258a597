//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use serde::Serialize;
use vitrine::{
    clock::format_millis,
    view::{BlockContent, BlockView, CollectionTree, CollectionView, PanelView, SectionView, WaypointView},
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// A view that can be printed as one table row.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl Row for CollectionView {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "REVISION", "UPDATED"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.revision.to_string(),
            format_millis(self.updated_at),
        ]
    }
}

impl Row for SectionView {
    const HEADERS: &'static [&'static str] = &["ORDER", "ID", "TITLE", "DESCRIPTION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.id.to_string(),
            self.title.clone(),
            or_dash(self.description.as_deref()),
        ]
    }
}

impl Row for PanelView {
    const HEADERS: &'static [&'static str] = &["ORDER", "ID", "TITLE", "DISPLAY"];

    fn row(&self) -> Vec<String> {
        let mut display = Vec::new();
        if !self.display.show_title {
            display.push("hidden-title".to_string());
        }
        if self.display.full_width {
            display.push("full-width".to_string());
        }
        if let Some(theme) = &self.display.theme {
            display.push(format!("theme={theme}"));
        }
        vec![
            self.order.to_string(),
            self.id.to_string(),
            self.title.clone(),
            if display.is_empty() {
                "-".to_string()
            } else {
                display.join(",")
            },
        ]
    }
}

/// One-line summary of a block payload.
pub fn summarize(content: &BlockContent) -> String {
    let summary = match content {
        BlockContent::Text(text) => text.body.clone(),
        BlockContent::Image(image) => image.url.clone(),
        BlockContent::Video(video) => video.url.clone(),
        BlockContent::Audio(audio) => audio.url.clone(),
        BlockContent::Quote(quote) => quote.text.clone(),
        BlockContent::Other { content, .. } => content.to_string(),
    };
    let mut chars = summary.chars();
    let head: String = chars.by_ref().take(48).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

impl Row for BlockView {
    const HEADERS: &'static [&'static str] = &["ORDER", "ID", "TYPE", "CONTENT"];

    fn row(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.id.to_string(),
            self.content.kind().to_string(),
            summarize(&self.content),
        ]
    }
}

impl Row for WaypointView {
    const HEADERS: &'static [&'static str] = &["ORDER", "ID", "TITLE", "COORDINATES"];

    fn row(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.id.to_string(),
            self.title.clone(),
            self.coordinates
                .map(|c| format!("{:.5}, {:.5}", c.lat, c.lng))
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    // Column widths in characters, not bytes
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(headers.to_vec()));
    for row in rows {
        println!("{}", render(row.iter().take(col_count).map(String::as_str).collect()));
    }
}

/// Print a list of views as a table or a JSON array.
pub fn print_rows<T: Row + Serialize>(
    items: &[T],
    format: OutputFormat,
    empty: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            if items.is_empty() {
                println!("{empty}");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = items.iter().map(Row::row).collect();
            print_table(T::HEADERS, &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(items)?),
    }
    Ok(())
}

/// Print a single view as `KEY: value` lines or a JSON object.
pub fn print_one<T: Row + Serialize>(
    item: &T,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            let width = T::HEADERS.iter().map(|h| h.len()).max().unwrap_or(0) + 1;
            for (header, value) in T::HEADERS.iter().zip(item.row()) {
                println!("{:<width$} {value}", format!("{header}:"), width = width);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(item)?),
    }
    Ok(())
}

/// Print a whole collection as an indented outline or nested JSON.
pub fn print_tree(
    tree: &CollectionTree,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string(tree)?);
        return Ok(());
    }

    let collection = &tree.collection;
    println!("{} ({}) rev {}", collection.name, collection.id, collection.revision);
    if let Some(description) = &collection.description {
        println!("  {description}");
    }
    for section in &tree.sections {
        println!(
            "  [{}] {} ({})",
            section.section.order, section.section.title, section.section.id
        );
        for panel in &section.panels {
            println!(
                "    [{}] {} ({})",
                panel.panel.order, panel.panel.title, panel.panel.id
            );
            for block in &panel.blocks {
                println!(
                    "      [{}] {}: {} ({})",
                    block.order,
                    block.content.kind(),
                    summarize(&block.content),
                    block.id
                );
            }
        }
    }
    if !tree.waypoints.is_empty() {
        println!("  Waypoints:");
        for waypoint in &tree.waypoints {
            println!("    [{}] {} ({})", waypoint.order, waypoint.title, waypoint.id);
        }
    }
    Ok(())
}

//! Table detection from positioned text (stream-mode heuristic).
//!
//! pdfium exposes text as segments with bounding boxes but has no notion of
//! tables. This module rebuilds them from alignment alone: consecutive lines
//! that each hold several separated segments, whose left edges line up in
//! consistent columns, are read as a table. Ruling lines are ignored.
//!
//! The detector is pure so it can be tested without a PDF engine.

use crate::output::{Row, Table};
use std::collections::HashSet;
use tracing::debug;

/// A run of text with its bounding box in PDF points (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            left,
            bottom,
            width,
            height,
        }
    }
}

/// Tuning knobs for [`TableDetector`].
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum consecutive multi-segment lines to form a table.
    pub min_rows: usize,
    /// Minimum number of aligned columns.
    pub min_columns: usize,
    /// Above this many columns the region is more likely word-split prose.
    pub max_columns: usize,
    /// Baseline tolerance when grouping fragments into lines, as a fraction of
    /// fragment height.
    pub row_tolerance_factor: f32,
    /// Left edges within this many points belong to the same column.
    pub edge_tolerance: f32,
    /// Column anchors closer than this are merged.
    pub min_column_gap: f32,
    /// Fraction of a region's rows a column edge must appear in.
    pub min_alignment_ratio: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            row_tolerance_factor: 0.5,
            edge_tolerance: 5.0,
            min_column_gap: 15.0,
            min_alignment_ratio: 0.5,
        }
    }
}

/// Detects tables in the text fragments of a single page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

type Line<'a> = Vec<&'a TextFragment>;

impl TableDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables, returned top to bottom.
    pub fn detect(&self, fragments: &[TextFragment]) -> Vec<Table> {
        let lines = self.group_into_lines(fragments);
        let mut tables = Vec::new();
        let mut region_start: Option<usize> = None;

        for (i, line) in lines.iter().enumerate() {
            if line.len() >= self.config.min_columns {
                region_start.get_or_insert(i);
            } else if let Some(start) = region_start.take() {
                tables.extend(self.table_from_region(&lines[start..i]));
            }
        }
        if let Some(start) = region_start {
            tables.extend(self.table_from_region(&lines[start..]));
        }

        debug!(
            "TableDetector: {} fragments, {} lines, {} tables",
            fragments.len(),
            lines.len(),
            tables.len()
        );
        tables
    }

    /// Group fragments into lines by baseline, top to bottom, each line left to right.
    fn group_into_lines<'a>(&self, fragments: &'a [TextFragment]) -> Vec<Line<'a>> {
        let mut sorted: Vec<&TextFragment> = fragments
            .iter()
            .filter(|f| !f.text.trim().is_empty())
            .collect();
        sorted.sort_by(|a, b| {
            b.bottom
                .total_cmp(&a.bottom)
                .then_with(|| a.left.total_cmp(&b.left))
        });

        let mut lines: Vec<Line<'a>> = Vec::new();
        let mut baseline: Option<f32> = None;

        for fragment in sorted {
            let tolerance = fragment.height.max(1.0) * self.config.row_tolerance_factor;
            let same_line = matches!(baseline, Some(y) if (fragment.bottom - y).abs() <= tolerance);
            if let (true, Some(line)) = (same_line, lines.last_mut()) {
                line.push(fragment);
                continue;
            }
            baseline = Some(fragment.bottom);
            lines.push(vec![fragment]);
        }

        for line in &mut lines {
            line.sort_by(|a, b| a.left.total_cmp(&b.left));
        }
        lines
    }

    /// Column anchors: left-edge clusters shared by enough lines of the region.
    fn column_anchors(&self, region: &[Line<'_>]) -> Vec<f32> {
        let mut edges: Vec<(f32, usize)> = region
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.iter().map(move |f| (f.left, row)))
            .collect();
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));

        let needed = ((region.len() as f32 * self.config.min_alignment_ratio).ceil() as usize).max(2);

        let mut anchors: Vec<f32> = Vec::new();
        let mut cluster_start = f32::NEG_INFINITY;
        let mut cluster_rows: HashSet<usize> = HashSet::new();

        let close_cluster = |start: f32, rows: &HashSet<usize>, anchors: &mut Vec<f32>| {
            if rows.len() >= needed {
                match anchors.last() {
                    Some(last) if start - last < self.config.min_column_gap => {}
                    _ => anchors.push(start),
                }
            }
        };

        for (x, row) in edges {
            if x - cluster_start > self.config.edge_tolerance {
                close_cluster(cluster_start, &cluster_rows, &mut anchors);
                cluster_start = x;
                cluster_rows.clear();
            }
            cluster_rows.insert(row);
        }
        close_cluster(cluster_start, &cluster_rows, &mut anchors);

        anchors
    }

    fn table_from_region(&self, region: &[Line<'_>]) -> Option<Table> {
        if region.len() < self.config.min_rows {
            return None;
        }

        let anchors = self.column_anchors(region);
        if anchors.len() < self.config.min_columns || anchors.len() > self.config.max_columns {
            debug!(
                "TableDetector: rejecting {}-line region with {} columns",
                region.len(),
                anchors.len()
            );
            return None;
        }

        let rows: Vec<Row> = region
            .iter()
            .map(|line| self.layout_row(line, &anchors))
            .collect();

        let filled_rows = rows
            .iter()
            .filter(|row| row.iter().flatten().count() >= self.config.min_columns)
            .count();
        if filled_rows < self.config.min_rows {
            return None;
        }

        Some(Table::new(rows))
    }

    /// Place each fragment in the last column starting at or before it.
    fn layout_row(&self, line: &[&TextFragment], anchors: &[f32]) -> Row {
        let mut cells: Row = vec![None; anchors.len()];
        for fragment in line {
            let column = anchors
                .iter()
                .rposition(|a| *a <= fragment.left + self.config.edge_tolerance)
                .unwrap_or(0);
            let text = fragment.text.trim();
            match &mut cells[column] {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(text);
                }
                empty => *empty = Some(text.to_string()),
            }
        }
        cells
    }
}

//! Minimal markdown-aware layout detection.
//!
//! Used only when no external structure detector output is available and the
//! caller opts in. Regions carry char offsets into the original text and never
//! include the blank lines separating blocks.
//!
//! - `#` heading lines → `heading`
//! - fenced code blocks → atomic `code`
//! - blocks made only of `|` lines → atomic `table`
//! - any other blank-line separated block → `paragraph`

use anchorage_core::LayoutRegion;

struct Block {
    start: usize,
    end: usize,
    all_table_rows: bool,
}

fn flush(block: &mut Option<Block>, regions: &mut Vec<LayoutRegion>) {
    if let Some(b) = block.take() {
        if b.all_table_rows {
            regions.push(LayoutRegion::new(b.start, b.end, "table", true));
        } else {
            regions.push(LayoutRegion::new(b.start, b.end, "paragraph", false));
        }
    }
}

fn is_heading(line: &str) -> bool {
    let rest = line.trim_start_matches('#');
    rest.len() < line.len() && (rest.is_empty() || rest.starts_with(' '))
}

/// Detect layout regions in markdown-ish text.
pub fn detect_markdown_regions(text: &str) -> Vec<LayoutRegion> {
    let mut regions = Vec::new();
    let mut block: Option<Block> = None;
    let mut fence_start: Option<usize> = None;
    let mut last_line_end = 0usize;
    let mut pos = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let content = raw_line.trim_end_matches(['\n', '\r']);
        let line_start = pos;
        let line_end = pos + content.chars().count();
        pos += raw_line.chars().count();

        let trimmed = content.trim_start();

        if let Some(start) = fence_start {
            if trimmed.starts_with("```") {
                regions.push(LayoutRegion::new(start, line_end, "code", true));
                fence_start = None;
            }
            last_line_end = line_end;
            continue;
        }

        if trimmed.starts_with("```") {
            flush(&mut block, &mut regions);
            fence_start = Some(line_start);
            last_line_end = line_end;
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut block, &mut regions);
            continue;
        }

        if is_heading(trimmed) {
            flush(&mut block, &mut regions);
            regions.push(LayoutRegion::new(line_start, line_end, "heading", false));
            last_line_end = line_end;
            continue;
        }

        let table_row = trimmed.starts_with('|');
        match block.as_mut() {
            Some(b) => {
                b.end = line_end;
                b.all_table_rows &= table_row;
            }
            None => {
                block = Some(Block {
                    start: line_start,
                    end: line_end,
                    all_table_rows: table_row,
                });
            }
        }
        last_line_end = line_end;
    }

    // Unterminated fence runs to the end of the text.
    if let Some(start) = fence_start {
        regions.push(LayoutRegion::new(start, last_line_end, "code", true));
    }
    flush(&mut block, &mut regions);
    regions
}

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Per-cell formatting flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// One cell of the report grid: a text value plus optional styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

/// Older payloads carry cells as bare strings; the canonical form is the
/// structured one. Normalize at the boundary so the rest of the engine only
/// ever sees `TableCell`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Plain(String),
    Styled {
        value: String,
        #[serde(default)]
        style: Option<CellStyle>,
    },
}

impl<'de> Deserialize<'de> for TableCell {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match CellRepr::deserialize(deserializer)? {
            CellRepr::Plain(value) => TableCell {
                value,
                style: None,
            },
            CellRepr::Styled { value, style } => TableCell { value, style },
        })
    }
}

/// A rectangular grid of styled text cells, the tabular payload of a
/// report submission. A presentation model: no validation, no formulas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(pub Vec<Vec<TableCell>>);

impl Grid {
    /// An empty-valued grid; the client starts submissions at 3×3.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self(vec![vec![TableCell::default(); cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.0.len()
    }

    pub fn cols(&self) -> usize {
        self.0.first().map_or(0, |row| row.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.0.get(row).and_then(|r| r.get(col))
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut TableCell> {
        self.0
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(Error::CellOutOfBounds(row, col))
    }

    /// In-place edit of one cell's text.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> Result<()> {
        self.cell_mut(row, col)?.value = value.to_string();
        Ok(())
    }

    /// Bulk paste of a tab/newline-delimited clipboard payload anchored at
    /// (start_row, start_col). Values are trimmed; a trailing empty line is
    /// skipped; anything landing outside the current bounds is silently
    /// dropped; the grid never grows on paste. Styles of overwritten
    /// cells are preserved.
    pub fn paste(&mut self, start_row: usize, start_col: usize, clipboard: &str) {
        let lines: Vec<&str> = clipboard.split('\n').collect();
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() && i == lines.len() - 1 {
                continue;
            }
            for (j, value) in line.split('\t').enumerate() {
                if let Ok(cell) = self.cell_mut(start_row + i, start_col + j) {
                    cell.value = value.trim().to_string();
                }
            }
        }
    }

    /// Appends a row of empty cells, matching the current column count.
    pub fn add_row(&mut self) {
        let cols = self.cols();
        self.0.push(vec![TableCell::default(); cols]);
    }

    /// Appends an empty cell to every row.
    pub fn add_column(&mut self) {
        for row in &mut self.0 {
            row.push(TableCell::default());
        }
    }

    pub fn toggle_bold(&mut self, row: usize, col: usize) -> Result<()> {
        let style = self.cell_mut(row, col)?.style.get_or_insert_with(CellStyle::default);
        style.bold = !style.bold;
        Ok(())
    }

    pub fn toggle_italic(&mut self, row: usize, col: usize) -> Result<()> {
        let style = self.cell_mut(row, col)?.style.get_or_insert_with(CellStyle::default);
        style.italic = !style.italic;
        Ok(())
    }

    /// Sets the focused cell's background. The palette includes white, so
    /// this only ever sets a color, never clears one.
    pub fn set_background(&mut self, row: usize, col: usize, color: &str) -> Result<()> {
        let style = self.cell_mut(row, col)?.style.get_or_insert_with(CellStyle::default);
        style.background_color = Some(color.to_string());
        Ok(())
    }
}

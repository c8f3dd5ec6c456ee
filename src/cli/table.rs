//! Plain-text table rendering for `ledger list`.

use crate::domain::Expense;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            max_width: None,
            alignment,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Represents a table with column metadata and rows of data to render.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Computes the content width of each column from headers, rows, and limits.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                match column.max_width {
                    Some(max_width) => width.min(max_width),
                    None => width,
                }
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(cell, widths[idx], column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Renders the header, a rule, and every row.
    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

        let mut lines = vec![
            self.render_row(&header, &widths),
            rule.join("  "),
        ];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Builds the table shown by `ledger list`.
pub fn expense_table(expenses: &[Expense]) -> Table {
    Table {
        columns: vec![
            TableColumn::new("id", Alignment::Right),
            TableColumn::new("date", Alignment::Left),
            TableColumn::new("description", Alignment::Left).max_width(48),
            TableColumn::new("amount", Alignment::Right),
        ],
        rows: expenses
            .iter()
            .map(|expense| expense.to_row().to_vec())
            .collect(),
    }
}

fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

/// Renders a single cell with alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    match alignment {
        Alignment::Left => format!("{}{}", fitted, " ".repeat(remaining)),
        Alignment::Right => format!("{}{}", " ".repeat(remaining), fitted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use chrono::NaiveDate;

    #[test]
    fn renders_aligned_columns() {
        let expenses = vec![
            Expense::new(
                1,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                "coffee",
                Amount::from_cents(300),
            ),
            Expense::new(
                12,
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                "book",
                Amount::from_cents(2050),
            ),
        ];
        let rendered = expense_table(&expenses).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "id  date        description  amount");
        assert_eq!(lines[1], "--  ----------  -----------  ------");
        assert_eq!(lines[2], " 1  2024-03-01  coffee           $3");
        assert_eq!(lines[3], "12  2024-03-02  book         $20.50");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(render_cell("abcdef", 4, Alignment::Left), "abc…");
        assert_eq!(render_cell("ab", 4, Alignment::Right), "  ab");
    }
}

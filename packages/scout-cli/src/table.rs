//! Plain-text, left-aligned tables for terminal output.

const MAX_CELL_CHARS: usize = 40;

#[derive(Debug, Clone, Default)]
pub struct Table {
	headers: Vec<String>,
	rows: Vec<Vec<String>>,
}
impl Table {
	pub fn new<I, S>(headers: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
	}

	/// Missing cells render empty; extra cells are dropped.
	pub fn push_row(&mut self, cells: Vec<String>) {
		let mut row: Vec<String> =
			cells.into_iter().take(self.headers.len()).map(|cell| clip(&cell)).collect();

		row.resize(self.headers.len(), String::new());

		self.rows.push(row);
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn render(&self) -> String {
		let mut widths: Vec<usize> = self.headers.iter().map(|header| header.chars().count()).collect();

		for row in &self.rows {
			for (width, cell) in widths.iter_mut().zip(row) {
				*width = (*width).max(cell.chars().count());
			}
		}

		let mut out = render_line(&self.headers, &widths);
		let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

		out.push_str(&render_line(&rule, &widths));

		for row in &self.rows {
			out.push_str(&render_line(row, &widths));
		}

		out
	}
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
	let line = cells
		.iter()
		.zip(widths)
		.map(|(cell, width)| format!("{cell:<width$}"))
		.collect::<Vec<_>>()
		.join("  ");

	format!("{}\n", line.trim_end())
}

fn clip(cell: &str) -> String {
	let cell = cell.replace(['\n', '\r'], " ");

	if cell.chars().count() <= MAX_CELL_CHARS {
		return cell;
	}

	let mut clipped: String = cell.chars().take(MAX_CELL_CHARS - 3).collect();

	clipped.push_str("...");

	clipped
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aligns_columns_to_the_widest_cell() {
		let mut table = Table::new(["id", "name"]);

		table.push_row(vec!["12".to_string(), "Nikos".to_string()]);
		table.push_row(vec!["5".to_string()]);

		assert_eq!(table.render(), "id  name\n--  -----\n12  Nikos\n5\n");
	}

	#[test]
	fn clips_long_cells() {
		let mut table = Table::new(["skills"]);

		table.push_row(vec!["x".repeat(100)]);

		let rendered = table.render();
		let last = rendered.lines().last().unwrap_or_default();

		assert_eq!(last.chars().count(), MAX_CELL_CHARS);
		assert!(last.ends_with("..."));
	}
}

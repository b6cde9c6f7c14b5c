//! Reporter - format accumulated test results for humans
//!
//! The report partitions the results log into failed and passed groups
//! (registration order preserved within each), renders every failed test as
//! a block with its error messages drawn as a small tree, then lists the
//! passed tests and a summary count.

use crate::harness::TestRecord;
use colored::{Color, Colorize};
use std::io::{self, Write};

/// Test reporter with output configuration
pub struct Reporter {
    /// Disable colored glyphs
    no_color: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Reporter { no_color: false }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Print the report to stdout
    pub fn report(&self, results: &[TestRecord]) {
        print!("{}", self.render(results));
    }

    /// Render the report to a string
    pub fn render(&self, results: &[TestRecord]) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_report(&mut buf, results);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Color a glyph unless colors are disabled for this reporter
    fn glyph(&self, symbol: &str, color: Color) -> String {
        if self.no_color {
            symbol.to_string()
        } else {
            symbol.color(color).to_string()
        }
    }

    fn write_report<W: Write>(&self, out: &mut W, results: &[TestRecord]) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Test results:")?;

        let failed: Vec<&TestRecord> = results.iter().filter(|r| r.is_fail()).collect();
        let passed: Vec<&TestRecord> = results.iter().filter(|r| r.is_pass()).collect();

        for record in &failed {
            writeln!(out, "{} {}", self.glyph("✗", Color::Red), record.description)?;
            write_error_tree(out, &record.errors)?;
            writeln!(out)?;
        }

        for record in &passed {
            writeln!(out, "{} {}", self.glyph("✓", Color::Green), record.description)?;
        }

        writeln!(out)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "Total: {}", results.len())?;
        writeln!(out, "Passed: {}", passed.len())?;
        writeln!(out, "Failed: {}", failed.len())?;
        Ok(())
    }
}

/// Render one failed test's error list as a tree: the last error gets the
/// closing branch, continuation lines of multi-line messages stay aligned
/// under their branch.
fn write_error_tree<W: Write>(out: &mut W, errors: &[String]) -> io::Result<()> {
    for (index, error) in errors.iter().enumerate() {
        let is_last = index == errors.len() - 1;
        let branch = if is_last { "└─" } else { "├─" };
        let continuation = if is_last { "  " } else { "│ " };

        let mut lines = error.lines();
        if let Some(first) = lines.next() {
            writeln!(out, "  {} {}", branch, first)?;
        }
        for line in lines {
            writeln!(out, "  {} {}", continuation, line)?;
        }
    }
    Ok(())
}

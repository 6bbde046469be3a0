use std::fmt;

pub const INVALID_DATA: &str = "Invalid Data";

/// Per-record outcome lines of one import call, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    lines: Vec<String>,
    imported: usize,
    rejected: usize,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imported(&mut self, line: String) {
        self.lines.push(line);
        self.imported += 1;
    }

    pub fn rejected(&mut self) {
        self.lines.push(INVALID_DATA.to_string());
        self.rejected += 1;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn imported_count(&self) -> usize {
        self.imported
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines joined by `\n`, without a trailing newline.
impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_order_and_counts() {
        let mut report = ImportReport::new();
        report.imported("Imported Alpha with 2 cells".to_string());
        report.rejected();
        report.imported("Imported Beta with 1 cells".to_string());

        assert_eq!(report.len(), 3);
        assert_eq!(report.imported_count(), 2);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(
            report.to_string(),
            "Imported Alpha with 2 cells\nInvalid Data\nImported Beta with 1 cells"
        );
    }

    #[test]
    fn test_empty_report_renders_empty() {
        let report = ImportReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }
}

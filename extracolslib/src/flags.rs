//! Printer flags: the values a command line collects for table printing.
//!
//! [`ExtraColumnFlags`] holds raw flag values and knows which output formats
//! it can serve. Given an output format it builds a configured
//! [`ExtraColumnsPrinter`], or reports that no compatible printer exists so
//! the caller can try another printer family.

use serde::{Deserialize, Serialize};

use crate::error::ExtraColumnsError;
use crate::printer::{ExtraColumnsPrinter, PrintOptions};
use crate::Result;

/// Output format names this printer accepts besides the empty default.
pub const WIDE_FORMAT: &str = "wide";

/// Flag values for the extra-columns printer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraColumnFlags {
    /// Raw `<header>:<path-expr>` specs
    pub extra_columns: Vec<String>,
    /// Suppress the header line
    pub no_headers: bool,
    /// Show priority columns
    pub show_priority_columns: bool,
}

impl ExtraColumnFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add one extra column spec
    pub fn extra_column(mut self, spec: impl Into<String>) -> Self {
        self.extra_columns.push(spec.into());
        self
    }

    /// Builder: add several extra column specs
    pub fn extra_columns<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_columns.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Builder: suppress headers
    pub fn no_headers(mut self, no_headers: bool) -> Self {
        self.no_headers = no_headers;
        self
    }

    /// Builder: show priority columns
    pub fn show_priority_columns(mut self, show: bool) -> Self {
        self.show_priority_columns = show;
        self
    }

    /// Output formats served in addition to the empty default.
    pub fn allowed_formats(&self) -> Vec<String> {
        vec![WIDE_FORMAT.to_string()]
    }

    /// Build a printer for `output_format`.
    ///
    /// The empty format and `wide` are accepted. Anything else yields
    /// [`ExtraColumnsError::NoCompatiblePrinter`].
    pub fn to_printer(&self, output_format: &str) -> Result<ExtraColumnsPrinter> {
        if !output_format.is_empty() && output_format != WIDE_FORMAT {
            return Err(ExtraColumnsError::NoCompatiblePrinter {
                format: output_format.to_string(),
                allowed: self.allowed_formats(),
            });
        }

        let options = PrintOptions::new()
            .with_no_headers(self.no_headers)
            .with_wide(output_format == WIDE_FORMAT)
            .with_priority_columns(self.show_priority_columns);

        ExtraColumnsPrinter::new(self.extra_columns.as_slice(), options)
    }
}

/// Whether `err` means "this printer does not handle that format".
pub fn is_no_compatible_printer_error(err: &ExtraColumnsError) -> bool {
    matches!(err, ExtraColumnsError::NoCompatiblePrinter { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_wide_formats_match() {
        let flags = ExtraColumnFlags::new().extra_column("NAME:.metadata.name");

        let printer = flags.to_printer("").unwrap();
        assert!(!printer.options().wide);
        assert_eq!(printer.columns().len(), 1);

        let printer = flags.to_printer("wide").unwrap();
        assert!(printer.options().wide);
        assert!(!printer.options().show_priority_columns);
    }

    #[test]
    fn test_other_formats_do_not_match() {
        let flags = ExtraColumnFlags::new();
        for format in ["invalid", "go-template", "json"] {
            let err = flags.to_printer(format).unwrap_err();
            assert!(is_no_compatible_printer_error(&err), "format: {format}");
            assert!(err.to_string().contains("allowed formats are: wide"));
        }
    }

    #[test]
    fn test_options_are_forwarded() {
        let flags = ExtraColumnFlags::new()
            .extra_columns(["A:.a", "B:.b"])
            .no_headers(true)
            .show_priority_columns(true);
        let printer = flags.to_printer("").unwrap();
        assert_eq!(
            printer.options(),
            PrintOptions {
                no_headers: true,
                wide: false,
                show_priority_columns: true,
            }
        );
        let headers: Vec<&str> = printer.columns().iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["A", "B"]);
    }

    #[test]
    fn test_bad_spec_is_reported_not_mismatched() {
        let err = ExtraColumnFlags::new()
            .extra_column("no-separator")
            .to_printer("")
            .unwrap_err();
        assert!(!is_no_compatible_printer_error(&err));
        assert!(matches!(err, ExtraColumnsError::SpecSyntax { .. }));
    }
}

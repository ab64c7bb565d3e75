use owo_colors::OwoColorize;
use std::fmt;

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Computes a 1-based line and column from a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line: usize) -> &str {
    source.lines().nth(line - 1).unwrap_or("")
}

/// Renders diagnostics in a compiler-like layout:
///
/// ```text
/// error[E0101]: expected next token to be ), got EOF instead
///   --> input:1:7
///    |
///  1 | add(1, 2
///    |       ^
/// ```
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        self.render_header(&mut output, diagnostic);

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            let width = line.to_string().len();
            let gutter = " ".repeat(width + 1);

            output.push_str(&format!(
                "{}{} {}:{}:{}\n",
                gutter,
                self.paint_blue("-->"),
                self.file_name,
                line,
                col
            ));
            output.push_str(&format!("{} {}\n", gutter, self.paint_blue("|")));
            output.push_str(&format!(
                "{:>width$} {} {}\n",
                self.paint_blue(&line.to_string()),
                self.paint_blue("|"),
                line_text(self.source, line),
                width = width + 1
            ));

            let underline_len = self.source[label.span.start.min(self.source.len())
                ..label.span.end.min(self.source.len())]
                .chars()
                .count()
                .max(1);
            let mut marker = format!("{}{}", " ".repeat(col - 1), "^".repeat(underline_len));
            if !label.message.is_empty() {
                marker.push(' ');
                marker.push_str(&label.message);
            }
            output.push_str(&format!(
                "{} {} {}\n",
                gutter,
                self.paint_blue("|"),
                self.paint_red(&marker)
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.paint_blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity = diagnostic.severity.to_string();
        let severity = if self.use_color {
            severity.red().bold().to_string()
        } else {
            severity
        };

        let message = if self.use_color {
            diagnostic.message.bold().to_string()
        } else {
            diagnostic.message.clone()
        };

        match &diagnostic.code {
            Some(code) => output.push_str(&format!("{}[{}]: {}\n", severity, code, message)),
            None => output.push_str(&format!("{}: {}\n", severity, message)),
        }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.use_color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_blue(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Renders every diagnostic followed by an error-count summary line.
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "let x = 5;\nlet y = 10;";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 4), (1, 5));
        assert_eq!(line_col(source, 11), (2, 1));
        assert_eq!(line_col(source, 15), (2, 5));
    }

    #[test]
    fn test_rendering_points_at_span() {
        let source = "let x = ;\n";
        let diagnostic = Diagnostic::error("no prefix parse function for ; found")
            .with_code("E0102")
            .with_label(Label::primary(Span::new(8, 9), "expected an expression"))
            .with_note("help: provide a value after `=`");

        let output = DiagnosticRenderer::new(source, "input", false).render(&diagnostic);

        assert!(output.starts_with("error[E0102]: no prefix parse function for ; found"));
        assert!(output.contains("--> input:1:9"));
        assert!(output.contains("1 | let x = ;"));
        assert!(output.contains("        ^ expected an expression"));
        assert!(output.contains("= help: provide a value"));
    }

    #[test]
    fn test_summary_counts_errors() {
        let diagnostics = vec![Diagnostic::error("one"), Diagnostic::error("two")];
        let output = render_diagnostics("", "input", &diagnostics, false);
        assert!(output.ends_with("error: aborting due to 2 errors\n"));
    }
}

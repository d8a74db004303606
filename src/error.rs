/**
 * Copyright 2022 - Jahred Love
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1. Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2. Redistributions in binary form must reproduce the above copyright notice, this
 * list of conditions and the following disclaimer in the documentation and/or other
 * materials provided with the distribution.
 *
 * 3. Neither the name of the copyright holder nor the names of its contributors may
 * be used to endorse or promote products derived from this software without specific
 * prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS “AS IS” AND
 * ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED.
 * IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT,
 * INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT
 * NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
 * PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
 * WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
 * ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
 * POSSIBILITY OF SUCH DAMAGE.
 */

use crate::ast::Span;

/// Backend failure taxonomy. Every kind is an internal-consistency failure:
/// a well-checked program never triggers one, and none are recoverable —
/// unit generation aborts on the first error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier that is neither a declared function nor a resolvable
    /// local/parameter (also covers keyword-argument sets that do not
    /// match the callee's signature).
    Name,
    /// A call or identifier names a function absent from the symbol table.
    Signature,
    /// A static type with no known target representation, or a node the
    /// type table has no entry for.
    Type,
    Io,
}

#[derive(Clone, Debug)]
pub struct CodegenError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl CodegenError {
    pub fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn at(kind: ErrorKind, at: usize, message: impl Into<String>) -> Self {
        Self::new(kind, Span::point(at), message)
    }

    pub fn render(&self, src: &str, path: Option<&str>) -> String {
        let (line, col, src_line, caret) = render_span(src, self.span);

        let kind = match self.kind {
            ErrorKind::Name => "name error",
            ErrorKind::Signature => "signature error",
            ErrorKind::Type => "type error",
            ErrorKind::Io => "io error",
        };

        let loc = match path {
            Some(p) => format!("{}:{}:{}", p, line, col),
            None => format!("{}:{}", line, col),
        };

        format!(
            "{}: {}\n --> {}\n{}\n{}",
            kind, self.message, loc, src_line, caret
        )
    }
}

/// Line/column plus excerpt and caret line for a span's start offset.
/// Columns are 1-based character counts; tabs count as one column.
fn render_span(src: &str, span: Span) -> (usize, usize, String, String) {
    let off = span.start.min(src.len());
    let before = &src[..off];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = src[line_start..off].chars().count() + 1;

    let line_end = src[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(src.len());
    let src_line = src[line_start..line_end].trim_end_matches('\r').to_string();

    let mut caret = String::new();
    for ch in src_line.chars().take(col.saturating_sub(1)) {
        caret.push(if ch == '\t' { '\t' } else { ' ' });
    }
    caret.push('^');
    (line, col, src_line, caret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_points_at_line_and_col() {
        let src = "fun f()\n  ret x;\n";
        let err = CodegenError::at(ErrorKind::Name, 14, "unresolved variable 'x'");
        let rendered = err.render(src, Some("prog.tfy"));
        assert!(rendered.contains("name error:"), "rendered:\n{rendered}");
        assert!(rendered.contains("prog.tfy:2:7"), "rendered:\n{rendered}");
        assert!(rendered.contains("  ret x;"), "rendered:\n{rendered}");
        assert!(rendered.lines().last().unwrap().ends_with('^'));
    }

    #[test]
    fn render_tolerates_empty_source() {
        let err = CodegenError::at(ErrorKind::Type, 0, "no representation for type");
        let rendered = err.render("", None);
        assert!(rendered.contains("type error: no representation for type"));
    }
}

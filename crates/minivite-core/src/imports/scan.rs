//! Import specifier scanner.
//!
//! Locates the string literal of every ES module import in a source text
//! without full parsing: static `import ... from '...'`, side-effect
//! `import '...'`, re-exports `export ... from '...'` and dynamic
//! `import('...')` with a literal argument. Comments, strings and template
//! literals are skipped, so import-looking text inside them is ignored.
//!
//! Offsets are byte offsets into the scanned text and cover the literal
//! including its quotes. Regex literals are not recognized.

/// How a specifier was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from '...'` or `import '...'`
    Static,
    /// `import('...')`
    Dynamic,
    /// `export ... from '...'`
    ReExport,
}

/// A lexically located import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    /// Byte offset of the opening quote.
    pub start: usize,
    /// Byte offset one past the closing quote.
    pub end: usize,
    /// Specifier text between the quotes.
    pub raw: String,
    pub kind: ImportKind,
}

/// Scan source code for import specifiers, in ascending source order.
#[must_use]
pub fn scan_imports(source: &str) -> Vec<ImportSpecifier> {
    let mut scanner = Scanner {
        src: source,
        bytes: source.as_bytes(),
        results: Vec::new(),
    };
    scanner.run();
    scanner.results
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    results: Vec<ImportSpecifier>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        let len = self.bytes.len();
        let mut i = 0;

        while i < len {
            let b = self.bytes[i];
            match b {
                b'/' if self.peek(i + 1) == Some(b'/') || self.peek(i + 1) == Some(b'*') => {
                    i = self.skip_comment(i);
                }
                b'/' if self.regex_allowed(i) => {
                    i = self.skip_regex(i);
                }
                b'\'' | b'"' => {
                    i = self.skip_string(i).unwrap_or(i + 1);
                }
                b'`' => {
                    i = self.skip_template(i);
                }
                _ if is_ident_start(b) => {
                    let end = self.ident_end(i);
                    let after_dot = i > 0 && self.prev_significant(i) == Some(b'.');
                    i = match &self.src[i..end] {
                        "import" if !after_dot => self.scan_import(end),
                        "export" if !after_dot => self.scan_export(end),
                        _ => end,
                    };
                }
                _ => i += 1,
            }
        }
    }

    /// After the `import` keyword.
    fn scan_import(&mut self, start: usize) -> usize {
        let mut i = self.skip_trivia(start);
        match self.peek(i) {
            Some(b'\'' | b'"') => self.record(i, ImportKind::Static).unwrap_or(i + 1),
            Some(b'(') => {
                i = self.skip_trivia(i + 1);
                if matches!(self.peek(i), Some(b'\'' | b'"')) {
                    if let Some(end) = self.skip_string(i) {
                        let after = self.skip_trivia(end);
                        if matches!(self.peek(after), Some(b')' | b',')) {
                            self.record(i, ImportKind::Dynamic);
                        }
                        return end;
                    }
                }
                i
            }
            // import.meta
            Some(b'.') => i + 1,
            _ => self.scan_clause_until_from(i, ImportKind::Static),
        }
    }

    /// After the `export` keyword. Only `export * ...` and `export { ... }`
    /// can carry a `from` clause.
    fn scan_export(&mut self, start: usize) -> usize {
        let i = self.skip_trivia(start);
        match self.peek(i) {
            Some(b'*' | b'{') => self.scan_clause_until_from(i, ImportKind::ReExport),
            _ => i,
        }
    }

    /// Walk an import/export clause until `from '<spec>'`, a `;`, or
    /// something that cannot belong to the clause.
    fn scan_clause_until_from(&mut self, start: usize, kind: ImportKind) -> usize {
        let len = self.bytes.len();
        let mut i = start;

        while i < len {
            i = self.skip_trivia(i);
            let Some(b) = self.peek(i) else {
                break;
            };

            match b {
                b'{' => {
                    i = match memchr::memchr(b'}', &self.bytes[i..]) {
                        Some(offset) => i + offset + 1,
                        None => return len,
                    };
                }
                b'*' | b',' => i += 1,
                _ if is_ident_start(b) => {
                    let end = self.ident_end(i);
                    if &self.src[i..end] == "from" {
                        let lit = self.skip_trivia(end);
                        if matches!(self.peek(lit), Some(b'\'' | b'"')) {
                            return self.record(lit, kind).unwrap_or(lit + 1);
                        }
                    }
                    i = end;
                }
                _ => return i,
            }
        }

        i
    }

    /// Record the string literal starting at `quote`; returns the offset after it.
    fn record(&mut self, quote: usize, kind: ImportKind) -> Option<usize> {
        let end = self.skip_string(quote)?;
        self.results.push(ImportSpecifier {
            start: quote,
            end,
            raw: self.src[quote + 1..end - 1].to_string(),
            kind,
        });
        Some(end)
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    fn prev_significant(&self, i: usize) -> Option<u8> {
        self.bytes[..i]
            .iter()
            .rev()
            .copied()
            .find(|b| !b.is_ascii_whitespace())
    }

    fn ident_end(&self, start: usize) -> usize {
        let mut i = start;
        while i < self.bytes.len() && is_ident_continue(self.bytes[i]) {
            i += 1;
        }
        i
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&self, start: usize) -> usize {
        let mut i = start;
        loop {
            match self.peek(i) {
                Some(b) if b.is_ascii_whitespace() => i += 1,
                Some(b'/') if matches!(self.peek(i + 1), Some(b'/' | b'*')) => {
                    i = self.skip_comment(i);
                }
                _ => return i,
            }
        }
    }

    /// `start` points at `//` or `/*`.
    fn skip_comment(&self, start: usize) -> usize {
        let rest = &self.bytes[start + 2..];
        if self.bytes[start + 1] == b'/' {
            match memchr::memchr(b'\n', rest) {
                Some(offset) => start + 2 + offset + 1,
                None => self.bytes.len(),
            }
        } else {
            match memchr::memmem::find(rest, b"*/") {
                Some(offset) => start + 2 + offset + 2,
                None => self.bytes.len(),
            }
        }
    }

    /// Skip a `'` or `"` string. Returns the offset after the closing quote,
    /// or `None` if the string is unterminated on its line.
    fn skip_string(&self, start: usize) -> Option<usize> {
        let quote = self.bytes[start];
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return None,
                b if b == quote => return Some(i + 1),
                _ => i += 1,
            }
        }
        None
    }

    /// Whether a `/` at `i` starts a regex literal rather than a division.
    ///
    /// A regex can follow punctuation that ends in an expression slot, the
    /// start of input, or a keyword such as `return`. After an identifier,
    /// a number, `)` or `]` it is a division.
    fn regex_allowed(&self, i: usize) -> bool {
        let Some(prev) = self.bytes[..i].iter().rposition(|b| !b.is_ascii_whitespace()) else {
            return true;
        };

        match self.bytes[prev] {
            b'(' | b',' | b'=' | b':' | b'[' | b'!' | b'&' | b'|' | b'?' | b'{' | b'}' | b';' | b'+'
            | b'-' | b'*' | b'%' | b'<' | b'>' | b'~' | b'^' => true,
            b if is_ident_continue(b) => {
                let mut start = prev;
                while start > 0 && is_ident_continue(self.bytes[start - 1]) {
                    start -= 1;
                }
                REGEX_KEYWORDS.contains(&&self.src[start..=prev])
            }
            _ => false,
        }
    }

    /// Skip a regex literal starting at `start`, including its flags.
    /// `/` inside a `[...]` class or after `\` does not end it. A literal
    /// that runs into a newline is not a regex; only the `/` is skipped.
    fn skip_regex(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut in_class = false;
        let mut i = start + 1;

        while i < len {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return start + 1,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => return self.ident_end(i + 1),
                _ => i += 1,
            }
        }

        start + 1
    }

    /// Skip a template literal, including nested `${ ... }` expressions.
    fn skip_template(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut i = start + 1;
        while i < len {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'`' => return i + 1,
                b'$' if self.peek(i + 1) == Some(b'{') => {
                    i = self.skip_expression(i + 2);
                }
                _ => i += 1,
            }
        }
        len
    }

    /// Skip a `${ ... }` body up to and including its closing brace.
    fn skip_expression(&self, start: usize) -> usize {
        let len = self.bytes.len();
        let mut depth = 0usize;
        let mut i = start;
        while i < len {
            match self.bytes[i] {
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    if depth == 0 {
                        return i + 1;
                    }
                    depth -= 1;
                    i += 1;
                }
                b'\'' | b'"' => i = self.skip_string(i).unwrap_or(i + 1),
                b'`' => i = self.skip_template(i),
                b'/' if matches!(self.peek(i + 1), Some(b'/' | b'*')) => {
                    i = self.skip_comment(i);
                }
                b'/' if self.regex_allowed(i) => i = self.skip_regex(i),
                _ => i += 1,
            }
        }
        len
    }
}

/// Keywords after which a `/` begins a regex literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do", "else", "yield",
    "await",
];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

//! Template parser for path queries.
//!
//! A template is a mix of literal text and `{...}` action blocks. Each block
//! holds one path made of segments:
//!
//! - `.name` / `['name']` field access
//! - `[n]`, `[a:b]`, `[a:b:c]` index and slices
//! - `[*]` / `.*` wildcards
//! - `..` recursive descent
//! - `[?(@.path)]` and `[?(@.path == 'x')]` filters

/// One top-level piece of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text outside any block
    Text(String),
    /// A `{...}` block
    Path(Vec<Segment>),
}

/// A single step of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Field(String),
    Array(ArraySpec),
    Wildcard,
    Recursive,
    Filter(Filter),
}

/// Index or slice parameters of a `[...]` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySpec {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
    /// `[n]` rather than `[a:b]`
    pub single: bool,
}

/// A `[?(...)]` predicate applied to array elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Path relative to the element (`@`)
    pub path: Vec<Segment>,
    /// Absent for existence checks
    pub condition: Option<(CmpOp, Literal)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Bool(bool),
}

type ParseResult<T> = std::result::Result<T, String>;

/// Parse a template into its nodes.
pub fn parse_template(template: &str) -> ParseResult<Vec<Node>> {
    Parser::new(template).parse()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

fn is_terminator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '.' | ',' | '[' | ']' | '$' | '@' | '{' | '}' | '(' | ')' | '=' | '!' | '<' | '>'
        )
}

impl Parser {
    fn new(template: &str) -> Self {
        Self {
            chars: template.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, wanted: char) -> ParseResult<()> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(format!(
                "expected '{}' at position {}, found '{}'",
                wanted,
                self.pos - 1,
                c
            )),
            None => Err(format!("expected '{}', found end of input", wanted)),
        }
    }

    fn parse(mut self) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if c == '{' {
                if !text.is_empty() {
                    nodes.push(Node::Text(std::mem::take(&mut text)));
                }
                self.pos += 1;
                nodes.push(Node::Path(self.parse_block()?));
            } else {
                text.push(c);
                self.pos += 1;
            }
        }

        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }

        Ok(nodes)
    }

    /// Parse the inside of a `{...}` block, consuming the closing brace.
    fn parse_block(&mut self) -> ParseResult<Vec<Segment>> {
        self.skip_whitespace();
        if self.peek() == Some('$') {
            self.pos += 1;
        }

        let mut segments = Vec::new();
        // `{metadata.name}` is the same as `{.metadata.name}`
        if self.peek().is_some_and(|c| !is_terminator(c)) {
            segments.push(self.parse_name_or_wildcard()?);
        }
        segments.extend(self.parse_segments()?);

        self.skip_whitespace();
        match self.bump() {
            Some('}') => Ok(segments),
            Some(c) => Err(format!(
                "unexpected character '{}' at position {}",
                c,
                self.pos - 1
            )),
            None => Err("unclosed action block, missing '}'".to_string()),
        }
    }

    /// Parse `.`/`[` segments until something else shows up.
    fn parse_segments(&mut self) -> ParseResult<Vec<Segment>> {
        let mut segments = Vec::new();

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    if self.peek() == Some('.') {
                        self.pos += 1;
                        segments.push(Segment::Recursive);
                    }
                    if self.peek().is_some_and(|c| !is_terminator(c)) {
                        segments.push(self.parse_name_or_wildcard()?);
                    }
                }
                Some('[') => {
                    self.pos += 1;
                    segments.push(self.parse_bracket()?);
                }
                _ => return Ok(segments),
            }
        }
    }

    fn parse_name_or_wildcard(&mut self) -> ParseResult<Segment> {
        if self.peek() == Some('*') {
            self.pos += 1;
            return Ok(Segment::Wildcard);
        }

        let start = self.pos;
        while self.peek().is_some_and(|c| !is_terminator(c)) {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.is_empty() {
            return Err(format!("expected a field name at position {}", start));
        }
        Ok(Segment::Field(name))
    }

    /// Parse the inside of `[...]`, consuming the closing bracket.
    fn parse_bracket(&mut self) -> ParseResult<Segment> {
        self.skip_whitespace();
        let segment = match self.peek() {
            Some('\'') | Some('"') => Segment::Field(self.parse_quoted()?),
            Some('*') => {
                self.pos += 1;
                Segment::Wildcard
            }
            Some('?') => {
                self.pos += 1;
                self.skip_whitespace();
                self.expect('(')?;
                let filter = self.parse_filter()?;
                self.expect(')')?;
                Segment::Filter(filter)
            }
            _ => Segment::Array(self.parse_array_spec()?),
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(segment)
    }

    fn parse_quoted(&mut self) -> ParseResult<String> {
        let quote = self.bump().ok_or("expected a quoted string")?;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err("unterminated quoted string".to_string()),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
                None => return Err("unterminated quoted string".to_string()),
            }
        }
    }

    fn parse_array_spec(&mut self) -> ParseResult<ArraySpec> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != ']') {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let parts: Vec<&str> = raw.split(':').map(str::trim).collect();

        if parts.len() > 3 {
            return Err(format!("invalid array index [{}]", raw));
        }

        let mut values = [None; 3];
        for (ix, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            let n = part
                .parse::<i64>()
                .map_err(|_| format!("invalid array index [{}]", raw))?;
            values[ix] = Some(n);
        }

        let single = parts.len() == 1;
        if single && values[0].is_none() {
            return Err("empty array index []".to_string());
        }
        if let Some(step) = values[2].filter(|step| *step <= 0) {
            return Err(format!("slice step must be positive, got {}", step));
        }

        Ok(ArraySpec {
            start: values[0],
            end: values[1],
            step: values[2],
            single,
        })
    }

    fn parse_filter(&mut self) -> ParseResult<Filter> {
        self.skip_whitespace();
        self.expect('@')?;
        let path = self.parse_segments()?;
        self.skip_whitespace();

        if self.peek() == Some(')') {
            return Ok(Filter {
                path,
                condition: None,
            });
        }

        let op = self.parse_op()?;
        self.skip_whitespace();
        let literal = self.parse_literal()?;
        self.skip_whitespace();

        Ok(Filter {
            path,
            condition: Some((op, literal)),
        })
    }

    fn parse_op(&mut self) -> ParseResult<CmpOp> {
        let op = match (self.peek(), self.peek_at(1)) {
            (Some('='), Some('=')) => CmpOp::Eq,
            (Some('!'), Some('=')) => CmpOp::Ne,
            (Some('<'), Some('=')) => CmpOp::Le,
            (Some('>'), Some('=')) => CmpOp::Ge,
            (Some('<'), _) => CmpOp::Lt,
            (Some('>'), _) => CmpOp::Gt,
            _ => {
                return Err(format!(
                    "expected a comparison operator at position {}",
                    self.pos
                ))
            }
        };
        self.pos += match op {
            CmpOp::Lt | CmpOp::Gt => 1,
            _ => 2,
        };
        Ok(op)
    }

    fn parse_literal(&mut self) -> ParseResult<Literal> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Literal::String(self.parse_quoted()?)),
            _ => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c != ')' && !c.is_whitespace())
                {
                    self.pos += 1;
                }
                let raw: String = self.chars[start..self.pos].iter().collect();
                match raw.as_str() {
                    "true" => Ok(Literal::Bool(true)),
                    "false" => Ok(Literal::Bool(false)),
                    _ => raw
                        .parse::<f64>()
                        .map(Literal::Number)
                        .map_err(|_| format!("invalid filter literal '{}'", raw)),
                }
            }
        }
    }
}

//! Line-oriented parser.

use crate::error::{LangError, LangResult};

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `name = <int>`
    Assign { name: String, value: i64 },
    /// `def name():` followed by an indented body.
    Def { name: String, body: Vec<BodyStatement> },
    /// `name()`
    Call { name: String },
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStatement {
    pub line: usize,
    pub kind: BodyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyKind {
    /// `name = <int>`, binding a local.
    Assign { name: String, value: i64 },
    /// `return <term> (+ <term>)*`; an empty list returns `None`.
    Return(Vec<Term>),
}

/// An operand of a return expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Int(i64),
    Name(String),
}

/// A logical line: physical lines joined by trailing `\`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogicalLine {
    line: usize,
    indent: usize,
    text: String,
}

/// Parses source text into top-level statements.
pub fn parse(source: &str) -> LangResult<Vec<Statement>> {
    let lines = logical_lines(source)?;
    let mut statements = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let logical = &lines[index];
        index += 1;
        if logical.indent > 0 {
            return Err(LangError::UnexpectedIndent { line: logical.line });
        }

        if let Some(name) = parse_def(&logical.text, logical.line)? {
            let mut body = Vec::new();
            while index < lines.len() && lines[index].indent > 0 {
                body.push(&lines[index]);
                index += 1;
            }
            if body.is_empty() {
                return Err(LangError::EmptyFunction {
                    line: logical.line,
                    name,
                });
            }
            let body = parse_body(&body)?;
            statements.push(Statement {
                line: logical.line,
                kind: StatementKind::Def { name, body },
            });
            continue;
        }

        let kind = if let Some((name, value)) = parse_assign(&logical.text, logical.line)? {
            StatementKind::Assign { name, value }
        } else if let Some(name) = parse_call(&logical.text, logical.line)? {
            StatementKind::Call { name }
        } else {
            return Err(invalid(logical));
        };
        statements.push(Statement {
            line: logical.line,
            kind,
        });
    }

    Ok(statements)
}

fn parse_body(lines: &[&LogicalLine]) -> LangResult<Vec<BodyStatement>> {
    let mut body = Vec::with_capacity(lines.len());
    let mut returned = false;

    for logical in lines {
        if returned {
            return Err(LangError::StatementAfterReturn { line: logical.line });
        }
        if parse_def(&logical.text, logical.line)?.is_some() {
            return Err(LangError::NestedFunction { line: logical.line });
        }

        let kind = if let Some(terms) = parse_return(&logical.text, logical.line)? {
            returned = true;
            BodyKind::Return(terms)
        } else if let Some((name, value)) = parse_assign(&logical.text, logical.line)? {
            BodyKind::Assign { name, value }
        } else {
            return Err(invalid(logical));
        };
        body.push(BodyStatement {
            line: logical.line,
            kind,
        });
    }

    Ok(body)
}

fn logical_lines(source: &str) -> LangResult<Vec<LogicalLine>> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine> = None;

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim_end();
        let (content, continues) = match raw.strip_suffix('\\') {
            Some(head) => (head, true),
            None => (raw, false),
        };

        let mut logical = match pending.take() {
            Some(mut open) => {
                open.text.truncate(open.text.trim_end().len());
                open.text.push(' ');
                open.text.push_str(content.trim());
                open
            }
            None => {
                let trimmed = content.trim_start();
                if !continues && (trimmed.is_empty() || trimmed.starts_with('#')) {
                    continue;
                }
                LogicalLine {
                    line,
                    indent: content.len() - trimmed.len(),
                    text: trimmed.to_string(),
                }
            }
        };

        if continues {
            pending = Some(logical);
        } else {
            logical.text.truncate(logical.text.trim_end().len());
            lines.push(logical);
        }
    }

    if let Some(open) = pending {
        return Err(LangError::DanglingContinuation { line: open.line });
    }
    Ok(lines)
}

fn parse_def(text: &str, line: usize) -> LangResult<Option<String>> {
    let Some(rest) = text.strip_prefix("def ") else {
        return Ok(None);
    };
    let signature = rest
        .strip_suffix(':')
        .map(str::trim_end)
        .and_then(|head| head.strip_suffix("()"))
        .ok_or_else(|| LangError::InvalidStatement {
            line,
            text: text.to_string(),
        })?;
    identifier(signature.trim(), line).map(Some)
}

fn parse_assign(text: &str, line: usize) -> LangResult<Option<(String, i64)>> {
    let Some((target, value)) = text.split_once('=') else {
        return Ok(None);
    };
    let name = identifier(target.trim(), line)?;
    let value = literal(value.trim(), line)?;
    Ok(Some((name, value)))
}

fn parse_call(text: &str, line: usize) -> LangResult<Option<String>> {
    let Some(callee) = text.strip_suffix("()") else {
        return Ok(None);
    };
    identifier(callee.trim_end(), line).map(Some)
}

fn parse_return(text: &str, line: usize) -> LangResult<Option<Vec<Term>>> {
    let Some(rest) = text.strip_prefix("return") else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(Some(Vec::new()));
    }
    if !rest.starts_with(char::is_whitespace) {
        return Ok(None);
    }

    let mut terms = Vec::new();
    for piece in rest.split('+') {
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(LangError::EmptyTerm { line });
        }
        let term = if piece.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            Term::Int(literal(piece, line)?)
        } else {
            Term::Name(identifier(piece, line)?)
        };
        terms.push(term);
    }
    Ok(Some(terms))
}

fn identifier(text: &str, line: usize) -> LangResult<String> {
    let mut chars = text.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if valid && !is_keyword(text) {
        Ok(text.to_string())
    } else {
        Err(LangError::InvalidName {
            line,
            name: text.to_string(),
        })
    }
}

fn is_keyword(text: &str) -> bool {
    matches!(text, "def" | "return")
}

fn literal(text: &str, line: usize) -> LangResult<i64> {
    text.parse().map_err(|_| LangError::InvalidLiteral {
        line,
        literal: text.to_string(),
    })
}

fn invalid(logical: &LogicalLine) -> LangError {
    LangError::InvalidStatement {
        line: logical.line,
        text: logical.text.clone(),
    }
}

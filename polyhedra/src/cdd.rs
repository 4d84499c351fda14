//! Reader for the cdd text format written by [`LpMatrix::to_cdd_string`].

use std::str::FromStr;

use polyhedra_core::types::RepresentationKind;

use crate::any::AnyMatrix;
use crate::error::{PolyhedraError as Error, Result};
use crate::matrix::{LpMatrix, LpObjective};
use crate::num::{Num, NumberKind, Rat};

#[derive(Clone, Debug)]
struct Tokens<'a> {
    line: usize,
    values: Vec<&'a str>,
}

/// A cdd document split into tokens but not yet committed to a number type.
#[derive(Clone, Debug)]
pub struct CddDocument<'a> {
    representation: Option<RepresentationKind>,
    linearity: Vec<usize>,
    kind: NumberKind,
    cols: usize,
    rows: Vec<Tokens<'a>>,
    objective: LpObjective,
    objective_row: Option<Tokens<'a>>,
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

fn parse_count(token: Option<&str>, line: usize, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| parse_error(line, format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {what} `{token}`")))
}

const HEADERS: [RepresentationKind; 2] =
    [RepresentationKind::Inequality, RepresentationKind::Generator];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Dimensions,
    Rows,
    Trailer,
}

impl<'a> CddDocument<'a> {
    pub fn scan(text: &'a str) -> Result<Self> {
        let mut section = Section::Preamble;
        let mut representation = None;
        let mut linearity: Option<(usize, Vec<usize>)> = None;
        let mut kind = NumberKind::Rational;
        let (mut row_count, mut cols) = (0usize, 0usize);
        let mut rows = Vec::new();
        let mut objective = LpObjective::None;
        let mut objective_row: Option<Tokens<'a>> = None;
        let mut last_line = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            last_line = line;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('*') {
                continue;
            }
            let mut words = trimmed.split_whitespace();
            match section {
                Section::Preamble => {
                    let Some(first) = words.next() else {
                        continue;
                    };
                    if first.eq_ignore_ascii_case("begin") {
                        section = Section::Dimensions;
                    } else if first.eq_ignore_ascii_case("linearity") {
                        let count = parse_count(words.next(), line, "linearity count")?;
                        let indices = words
                            .map(|w| parse_count(Some(w), line, "linearity index"))
                            .collect::<Result<Vec<_>>>()?;
                        if indices.len() != count {
                            return Err(parse_error(
                                line,
                                format!("linearity lists {} rows, expected {count}", indices.len()),
                            ));
                        }
                        linearity = Some((line, indices));
                    } else if let Some(rep) = HEADERS
                        .into_iter()
                        .find(|rep| first.eq_ignore_ascii_case(rep.header()))
                    {
                        representation = Some(rep);
                    }
                }
                Section::Dimensions => {
                    row_count = parse_count(words.next(), line, "row count")?;
                    cols = parse_count(words.next(), line, "column count")?;
                    let keyword = words
                        .next()
                        .ok_or_else(|| parse_error(line, "missing number type"))?;
                    kind = NumberKind::from_str(keyword).map_err(|_| {
                        parse_error(line, format!("unknown number type `{keyword}`"))
                    })?;
                    section = Section::Rows;
                }
                Section::Rows => {
                    if rows.len() == row_count {
                        if trimmed.eq_ignore_ascii_case("end") {
                            section = Section::Trailer;
                            continue;
                        }
                        return Err(parse_error(line, "expected `end`"));
                    }
                    let values: Vec<&str> = words.collect();
                    if values.len() != cols {
                        return Err(parse_error(
                            line,
                            format!("row has {} entries, expected {cols}", values.len()),
                        ));
                    }
                    rows.push(Tokens { line, values });
                }
                Section::Trailer => {
                    if objective != LpObjective::None && objective_row.is_none() {
                        objective_row = Some(Tokens {
                            line,
                            values: words.collect(),
                        });
                        continue;
                    }
                    let Some(first) = words.next() else {
                        continue;
                    };
                    let sense = match first.to_ascii_lowercase().as_str() {
                        "maximize" => LpObjective::Maximize,
                        "minimize" => LpObjective::Minimize,
                        _ => continue,
                    };
                    objective = sense;
                    let rest: Vec<&str> = words.collect();
                    if !rest.is_empty() {
                        objective_row = Some(Tokens { line, values: rest });
                    }
                }
            }
        }

        match section {
            Section::Trailer => {}
            Section::Preamble => return Err(parse_error(last_line, "missing `begin`")),
            Section::Dimensions => return Err(parse_error(last_line, "missing dimensions")),
            Section::Rows => return Err(parse_error(last_line, "missing `end`")),
        }
        if objective != LpObjective::None && objective_row.is_none() {
            return Err(parse_error(last_line, "missing objective row"));
        }

        let linearity = match linearity {
            None => Vec::new(),
            Some((line, indices)) => indices
                .into_iter()
                .map(|i| {
                    if (1..=row_count).contains(&i) {
                        Ok(i - 1)
                    } else {
                        Err(parse_error(
                            line,
                            format!("linearity index {i} outside 1..={row_count}"),
                        ))
                    }
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self {
            representation,
            linearity,
            kind,
            cols,
            rows,
            objective,
            objective_row,
        })
    }

    pub fn number_kind(&self) -> NumberKind {
        self.kind
    }

    pub fn representation(&self) -> Option<RepresentationKind> {
        self.representation
    }

    /// Converts every token into `N`.
    pub fn build<N: Num>(&self) -> Result<LpMatrix<N>> {
        let convert = |tokens: &Tokens<'_>| -> Result<Vec<N>> {
            tokens
                .values
                .iter()
                .map(|t| N::parse_token(t).map_err(|e| parse_error(tokens.line, e.to_string())))
                .collect()
        };
        let mut builder = LpMatrix::builder(self.cols);
        for (idx, tokens) in self.rows.iter().enumerate() {
            builder = builder.push_row(convert(tokens)?, self.linearity.contains(&idx));
        }
        if let Some(kind) = self.representation {
            builder = builder.representation(kind);
        }
        if let Some(tokens) = &self.objective_row {
            let row_vec = convert(tokens)?;
            if row_vec.len() != self.cols {
                return Err(parse_error(
                    tokens.line,
                    format!("objective has {} entries, expected {}", row_vec.len(), self.cols),
                ));
            }
            builder = builder.objective(self.objective, row_vec);
        }
        Ok(builder.build())
    }
}

/// Parses cdd text into the number type named in its `begin` block.
pub fn parse_any(text: &str) -> Result<AnyMatrix> {
    let doc = CddDocument::scan(text)?;
    Ok(match doc.number_kind() {
        NumberKind::Rational => AnyMatrix::Rational(doc.build::<Rat>()?),
        NumberKind::Float => AnyMatrix::Float(doc.build::<f64>()?),
    })
}

/// Parses cdd text into `N`, regardless of the declared number type.
pub fn parse<N: Num>(text: &str) -> Result<LpMatrix<N>> {
    CddDocument::scan(text)?.build()
}

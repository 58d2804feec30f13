//! Rebuild text lines from positioned text fragments.
//!
//! Statement streams place every piece of text with an absolute text matrix,
//! so grouping the shown strings by vertical offset is enough to recover the
//! printed lines.

use std::io::Read;

use lopdf::Object;
use solde_core::Result;
use tracing::warn;

use crate::tokenizer::tokenize_reader;

/// Shown text and the column it was drawn at
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub column: f64,
    pub text: String,
}

impl Fragment {
    pub fn new(column: f64, text: impl Into<String>) -> Self {
        Self {
            column,
            text: text.into(),
        }
    }
}

/// Fragments sharing one vertical offset, left to right
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Fragment texts joined by single spaces
    pub text: String,
    pub fragments: Vec<Fragment>,
}

impl Line {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self {
            text: join_fragments(&fragments),
            fragments,
        }
    }
}

pub fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn number(o: &Object) -> Option<f64> {
    o.as_float().ok().map(f64::from)
}

/// Shown strings are single byte encoded.
fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[derive(Debug, Default)]
struct LineBuilder {
    x: f64,
    y: f64,
    in_text: bool,
    /// One bucket per vertical offset, in first seen order
    buckets: Vec<(f64, Vec<Fragment>)>,
}

impl LineBuilder {
    fn apply(&mut self, keyword: &str, operands: &[Object]) {
        match keyword {
            "BT" => self.in_text = true,
            "ET" => self.in_text = false,
            "Tm" => {
                let pos = operands.get(4).and_then(number).zip(operands.get(5).and_then(number));
                match pos {
                    Some((x, y)) => {
                        self.x = x;
                        self.y = y;
                    }
                    None => warn!(?operands, in_text = self.in_text, "ignoring text matrix without a position"),
                }
            }
            "Tj" => match operands.first() {
                Some(Object::String(bytes, _)) => self.push(Fragment::new(self.x, decode_text(bytes))),
                _ => warn!(?operands, "ignoring show text without a string"),
            },
            _ => {}
        }
    }

    fn push(&mut self, fragment: Fragment) {
        match self.buckets.iter_mut().find(|(y, _)| *y == self.y) {
            Some((_, fragments)) => fragments.push(fragment),
            None => self.buckets.push((self.y, vec![fragment])),
        }
    }

    /// Lines from the top of the page down.
    fn finish(mut self) -> Vec<Line> {
        for (_, fragments) in &mut self.buckets {
            fragments.sort_by(|a, b| a.column.total_cmp(&b.column));
        }
        self.buckets.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.buckets
            .into_iter()
            .map(|(_, fragments)| Line::new(fragments))
            .collect()
    }
}

/// Tokenize a decoded content stream and rebuild its lines, top first.
pub fn reconstruct_lines<R: Read>(stream: R) -> Result<Vec<Line>> {
    let mut builder = LineBuilder::default();
    tokenize_reader(stream, |keyword, operands| {
        builder.apply(keyword, operands);
        Ok(())
    })?;
    Ok(builder.finish())
}

//! Content stream tokenizer.
//!
//! Content streams are postfix: operands come first, then the operator that
//! consumes them. lopdf does the parsing. The whole stream is decoded before
//! any instruction is reported, so a malformed stream fails up front.

use std::io::Read;

use lopdf::content::{Content, Operation};
use lopdf::Object;
use solde_core::{ExtractError, Result};
use tracing::debug;

/// Appended to every stream. lopdf stops quietly at the first operation it
/// cannot parse, so a stream was read to the end only if this operator comes
/// back last.
const END_MARKER: &str = "soldeEnd";

fn decode_operations(bytes: &[u8]) -> Result<Vec<Operation>> {
    let tokenize_error = |reason: String, parsed: usize| ExtractError::Tokenize {
        reason,
        parsed,
        raw: bytes.to_vec(),
    };

    let mut data = Vec::with_capacity(bytes.len() + END_MARKER.len() + 1);
    data.extend_from_slice(bytes);
    data.push(b'\n');
    data.extend_from_slice(END_MARKER.as_bytes());

    let mut operations = Content::decode(&data)
        .map_err(|e| tokenize_error(e.to_string(), 0))?
        .operations;
    match operations.pop() {
        Some(end) if end.operator == END_MARKER => {
            if !end.operands.is_empty() {
                debug!(count = end.operands.len(), "trailing operands without operator");
            }
            Ok(operations)
        }
        Some(last) => Err(tokenize_error(
            format!("unreadable content after {:?}", last.operator),
            operations.len() + 1,
        )),
        None => Err(tokenize_error("unreadable content".to_string(), 0)),
    }
}

/// Tokenize a content stream, calling `on_instruction` with every operator and
/// its operands.
///
/// Errors returned by the callback are propagated unchanged; unreadable
/// content becomes [`ExtractError::Tokenize`] carrying the whole stream.
pub fn tokenize<F>(bytes: &[u8], mut on_instruction: F) -> Result<()>
where
    F: FnMut(&str, &[Object]) -> Result<()>,
{
    for op in decode_operations(bytes)? {
        on_instruction(&op.operator, &op.operands)?;
    }
    Ok(())
}

/// Read `r` to the end, then [`tokenize`] it.
pub fn tokenize_reader<R, F>(mut r: R, on_instruction: F) -> Result<()>
where
    R: Read,
    F: FnMut(&str, &[Object]) -> Result<()>,
{
    let mut data = Vec::new();
    r.read_to_end(&mut data)?;
    tokenize(&data, on_instruction)
}

//! Per-page text extraction: find the page's content streams and rebuild
//! their lines.

use solde_core::Result;
use tracing::{debug, warn};

use crate::decode::decode_stream;
use crate::graph::{GraphNode, NodeKind, walk};
use crate::lines::{Line, reconstruct_lines};

/// Whether a stream may hold page text. Font programs and images are binary.
pub fn is_text_stream<N: GraphNode>(node: &N) -> bool {
    if node.kind() != NodeKind::Stream {
        return false;
    }
    if node.get("Length1").is_some() {
        return false;
    }
    let subtype = node.get("Subtype").and_then(|s| s.name());
    subtype.as_deref() != Some("Image")
}

/// Lines of every text stream reachable from a page, one list per stream in
/// traversal order.
pub fn page_lines<N: GraphNode>(page: &N) -> Result<Vec<Vec<Line>>> {
    let mut streams = Vec::new();
    walk(page, |node: &N| -> Result<()> {
        if !is_text_stream(node) {
            return Ok(());
        }
        let Some(raw) = node.raw_bytes() else {
            return Ok(());
        };
        let filters = node.filters();
        let decoded = decode_stream(raw, &filters)?;
        let lines = reconstruct_lines(decoded).inspect_err(|e| {
            warn!(?filters, error = %e, "could not parse stream");
        })?;
        debug!(lines = lines.len(), ?filters, "stream lines");
        streams.push(lines);
        Ok(())
    })?;
    Ok(streams)
}

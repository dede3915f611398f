//! Raw JSON form of a document.
//!
//! ```json
//! {"document": {"nodes": [
//!   {"kind": "block", "type": "paragraph", "nodes": [
//!     {"kind": "text", "ranges": [{"text": "Hi", "marks": [{"type": "bold"}]}]}
//!   ]}
//! ]}}
//! ```
//!
//! Text nodes may also use the terse `{"kind": "text", "text": "Hi"}` form.
//! Block keys are not stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Block, BlockKind, Content, Data, Document, Leaf, Mark, MarkSet, Text};

const DEFAULT_STATE: &str = include_str!("default_state.json");

#[derive(Debug, Error)]
pub enum RawError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("text node found directly inside a {0} block")]
    TextInContainer(BlockKind),
    #[error("block node found inside a {0} block, which only holds text")]
    BlockInLeaf(BlockKind),
    #[error("text node found at the top level of the document")]
    TextAtRoot,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawState {
    document: RawDocument,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDocument {
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawNode {
    Block(RawBlock),
    Text(RawText),
}

#[derive(Debug, Serialize, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(rename = "isVoid", default, skip_serializing_if = "is_false")]
    is_void: bool,
    #[serde(default, skip_serializing_if = "Data::is_empty")]
    data: Data,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ranges: Vec<RawRange>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawRange {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    marks: Vec<RawMark>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: Mark,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes by reference
const fn is_false(value: &bool) -> bool {
    !*value
}

/// Serialize a document to its raw JSON form.
pub fn to_json(document: &Document) -> Result<String, RawError> {
    let raw = RawState {
        document: RawDocument {
            nodes: document.nodes().iter().map(raw_block).collect(),
        },
    };
    Ok(serde_json::to_string(&raw)?)
}

/// Parse a document from its raw JSON form. Every block gets a fresh key.
pub fn from_json(json: &str) -> Result<Document, RawError> {
    let raw: RawState = serde_json::from_str(json)?;
    let nodes = raw
        .document
        .nodes
        .into_iter()
        .map(|node| match node {
            RawNode::Block(block) => block_from_raw(block),
            RawNode::Text(_) => Err(RawError::TextAtRoot),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Document::new(nodes))
}

/// The document shown when nothing has been stored yet.
pub fn default_document() -> Result<Document, RawError> {
    from_json(DEFAULT_STATE)
}

fn raw_block(block: &Block) -> RawNode {
    let nodes = match &block.content {
        Content::Blocks(children) => children.iter().map(raw_block).collect(),
        Content::Text(text) => vec![RawNode::Text(raw_text(text))],
    };
    RawNode::Block(RawBlock {
        kind: block.kind,
        is_void: block.kind.is_void(),
        data: block.data.clone(),
        nodes,
    })
}

fn raw_text(text: &Text) -> RawText {
    let mut ranges: Vec<RawRange> = text
        .leaves()
        .iter()
        .map(|leaf| RawRange {
            text: leaf.text.clone(),
            marks: leaf.marks.iter().map(|kind| RawMark { kind }).collect(),
        })
        .collect();
    if ranges.is_empty() {
        ranges.push(RawRange {
            text: String::new(),
            marks: Vec::new(),
        });
    }
    RawText { text: None, ranges }
}

fn block_from_raw(raw: RawBlock) -> Result<Block, RawError> {
    let kind = raw.kind;
    let content = if kind.is_container() {
        let children = raw
            .nodes
            .into_iter()
            .map(|node| match node {
                RawNode::Block(block) => block_from_raw(block),
                RawNode::Text(_) => Err(RawError::TextInContainer(kind)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Content::Blocks(children)
    } else {
        let mut leaves = Vec::new();
        for node in raw.nodes {
            match node {
                RawNode::Text(text) => leaves.extend(text_leaves(text)),
                RawNode::Block(_) => return Err(RawError::BlockInLeaf(kind)),
            }
        }
        if kind.is_void() {
            leaves.clear();
        }
        Content::Text(Text::from_leaves(leaves))
    };
    Ok(Block {
        key: super::types::Key::UNSET,
        kind,
        data: raw.data,
        content,
    })
}

fn text_leaves(raw: RawText) -> Vec<Leaf> {
    if raw.ranges.is_empty() {
        return raw
            .text
            .map(|text| vec![Leaf::new(text, MarkSet::EMPTY)])
            .unwrap_or_default();
    }
    raw.ranges
        .into_iter()
        .map(|range| {
            let marks = range.marks.into_iter().map(|mark| mark.kind).collect();
            Leaf::new(range.text, marks)
        })
        .collect()
}

//! Core document types.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key-value data bag attached to every block.
pub type Data = serde_json::Map<String, Value>;

/// Width and height given to freshly inserted images, in pixels.
pub const DEFAULT_IMAGE_SIZE: i64 = 300;

/// Stable identity of a block inside one document.
///
/// Keys are handed out by the owning [`Document`] and are not persisted;
/// loading a stored document assigns fresh keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Key(u64);

impl Key {
    /// Key of a block that has not been attached to a document yet.
    pub const UNSET: Self = Self(0);
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every node type the editor knows about.
///
/// The set is closed: a type tag that is not listed here cannot be
/// constructed, and fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    BulletedList,
    NumberedList,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Image,
    CheckListItem,
}

impl BlockKind {
    pub const ALL: [Self; 12] = [
        Self::Paragraph,
        Self::HeadingOne,
        Self::HeadingTwo,
        Self::BlockQuote,
        Self::BulletedList,
        Self::NumberedList,
        Self::ListItem,
        Self::Table,
        Self::TableRow,
        Self::TableCell,
        Self::Image,
        Self::CheckListItem,
    ];

    /// The type tag used in the serialized form.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::HeadingOne => "heading-one",
            Self::HeadingTwo => "heading-two",
            Self::BlockQuote => "block-quote",
            Self::BulletedList => "bulleted-list",
            Self::NumberedList => "numbered-list",
            Self::ListItem => "list-item",
            Self::Table => "table",
            Self::TableRow => "table-row",
            Self::TableCell => "table-cell",
            Self::Image => "image",
            Self::CheckListItem => "check-list-item",
        }
    }

    /// Container kinds hold child blocks; every other kind holds one text.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::BulletedList | Self::NumberedList | Self::Table | Self::TableRow
        )
    }

    /// Void kinds have no editable text.
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Image)
    }

    pub const fn is_list(self) -> bool {
        matches!(self, Self::BulletedList | Self::NumberedList)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Text formatting marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Underlined,
    Code,
}

impl Mark {
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underlined, Self::Code];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underlined => "underlined",
            Self::Code => "code",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A small set of [`Mark`]s, stored as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(u8);

impl MarkSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    #[must_use]
    pub const fn with(self, mark: Mark) -> Self {
        Self(self.0 | mark.bit())
    }

    #[must_use]
    pub const fn without(self, mark: Mark) -> Self {
        Self(self.0 & !mark.bit())
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |mark| self.contains(*mark))
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// A run of characters sharing one mark set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaf {
    pub text: String,
    pub marks: MarkSet,
}

impl Leaf {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

/// Formatted text content of a leaf block.
///
/// Always normalized: no empty leaves, and no two neighbouring leaves with
/// the same marks. Offsets are counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    leaves: Vec<Leaf>,
}

impl Text {
    /// Unformatted text.
    pub fn plain(text: &str) -> Self {
        Self::from_leaves([Leaf::new(text, MarkSet::EMPTY)])
    }

    pub fn from_leaves(leaves: impl IntoIterator<Item = Leaf>) -> Self {
        let mut merged: Vec<Leaf> = Vec::new();
        for leaf in leaves {
            if leaf.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.marks == leaf.marks => last.text.push_str(&leaf.text),
                _ => merged.push(leaf),
            }
        }
        Self { leaves: merged }
    }

    fn from_chars(chars: impl IntoIterator<Item = (char, MarkSet)>) -> Self {
        let mut leaves: Vec<Leaf> = Vec::new();
        for (ch, marks) in chars {
            match leaves.last_mut() {
                Some(last) if last.marks == marks => last.text.push(ch),
                _ => leaves.push(Leaf::new(ch.to_string(), marks)),
            }
        }
        Self { leaves }
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.leaves.iter().map(|leaf| leaf.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// The text without formatting.
    pub fn content(&self) -> String {
        self.leaves.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    /// Characters paired with their marks, in order.
    pub fn chars(&self) -> impl Iterator<Item = (char, MarkSet)> + '_ {
        self.leaves
            .iter()
            .flat_map(|leaf| leaf.text.chars().map(move |ch| (ch, leaf.marks)))
    }

    /// Marks that typing at `offset` would pick up: those of the character
    /// before the offset, or of the first character at offset zero.
    pub fn marks_before(&self, offset: usize) -> MarkSet {
        let len = self.len();
        if len == 0 {
            return MarkSet::EMPTY;
        }
        let index = offset.saturating_sub(1).min(len - 1);
        self.chars()
            .nth(index)
            .map_or(MarkSet::EMPTY, |(_, marks)| marks)
    }

    /// Union of the marks of every character in `range`.
    pub fn marks_in(&self, range: Range<usize>) -> MarkSet {
        if range.is_empty() {
            return self.marks_before(range.start);
        }
        self.chars()
            .skip(range.start)
            .take(range.end - range.start)
            .fold(MarkSet::EMPTY, |acc, (_, marks)| acc.union(marks))
    }

    pub fn insert(&mut self, offset: usize, text: &str, marks: MarkSet) {
        let offset = offset.min(self.len());
        let mut chars: Vec<(char, MarkSet)> = self.chars().collect();
        chars.splice(offset..offset, text.chars().map(|ch| (ch, marks)));
        *self = Self::from_chars(chars);
    }

    pub fn remove(&mut self, range: Range<usize>) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        let mut chars: Vec<(char, MarkSet)> = self.chars().collect();
        chars.drain(start..end);
        *self = Self::from_chars(chars);
    }

    /// Split at `offset`, keeping the head and returning the tail.
    #[must_use]
    pub fn split_off(&mut self, offset: usize) -> Self {
        let mut chars: Vec<(char, MarkSet)> = self.chars().collect();
        let tail = chars.split_off(offset.min(chars.len()));
        *self = Self::from_chars(chars);
        Self::from_chars(tail)
    }

    pub fn append(&mut self, other: Self) {
        let leaves = std::mem::take(&mut self.leaves);
        *self = Self::from_leaves(leaves.into_iter().chain(other.leaves));
    }

    /// Add or remove `mark` on every character in `range`.
    pub fn set_mark(&mut self, range: Range<usize>, mark: Mark, on: bool) {
        let chars: Vec<(char, MarkSet)> = self
            .chars()
            .enumerate()
            .map(|(index, (ch, marks))| {
                if range.contains(&index) {
                    (ch, if on { marks.with(mark) } else { marks.without(mark) })
                } else {
                    (ch, marks)
                }
            })
            .collect();
        *self = Self::from_chars(chars);
    }
}

/// Stored dimensions of an image block, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: i64,
    pub height: i64,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
        }
    }
}

/// Children of a block: nested blocks for containers, one text for leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Blocks(Vec<Block>),
    Text(Text),
}

/// A typed element of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub key: Key,
    pub kind: BlockKind,
    pub data: Data,
    pub content: Content,
}

impl Block {
    /// A leaf block holding `text`. The key is assigned when the block
    /// enters a document.
    pub fn leaf(kind: BlockKind, text: Text) -> Self {
        Self {
            key: Key::UNSET,
            kind,
            data: Data::new(),
            content: Content::Text(text),
        }
    }

    pub fn container(kind: BlockKind, children: Vec<Self>) -> Self {
        Self {
            key: Key::UNSET,
            kind,
            data: Data::new(),
            content: Content::Blocks(children),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::leaf(BlockKind::Paragraph, Text::plain(text))
    }

    pub fn check_list_item(text: &str, checked: bool) -> Self {
        Self::leaf(BlockKind::CheckListItem, Text::plain(text)).with_data("checked", checked)
    }

    /// A void image block.
    pub fn image(src: &str, width: i64, height: i64) -> Self {
        Self::leaf(BlockKind::Image, Text::default())
            .with_data("src", src)
            .with_data("width", width)
            .with_data("height", height)
    }

    /// An empty `columns` × `rows` table.
    pub fn table(columns: usize, rows: usize) -> Self {
        let rows = (0..rows)
            .map(|_| {
                let cells = (0..columns)
                    .map(|_| Self::leaf(BlockKind::TableCell, Text::default()))
                    .collect();
                Self::container(BlockKind::TableRow, cells)
            })
            .collect();
        Self::container(BlockKind::Table, rows)
    }

    #[must_use]
    pub fn with_data(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data.insert(name.to_string(), value.into());
        self
    }

    pub const fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Text(_))
    }

    pub const fn is_void(&self) -> bool {
        self.kind.is_void()
    }

    pub const fn text(&self) -> Option<&Text> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Blocks(_) => None,
        }
    }

    pub const fn text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.content {
            Content::Text(text) => Some(text),
            Content::Blocks(_) => None,
        }
    }

    /// Text length in characters; zero for containers.
    pub fn text_len(&self) -> usize {
        self.text().map_or(0, Text::len)
    }

    pub fn children(&self) -> &[Self] {
        match &self.content {
            Content::Blocks(children) => children,
            Content::Text(_) => &[],
        }
    }

    pub const fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match &mut self.content {
            Content::Blocks(children) => Some(children),
            Content::Text(_) => None,
        }
    }

    /// Keys of every leaf block at or below this one, in order.
    pub fn leaf_keys(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        collect_leaves(std::slice::from_ref(self), &mut |block| keys.push(block.key));
        keys
    }

    pub fn first_leaf(&self) -> Option<&Self> {
        match &self.content {
            Content::Text(_) => Some(self),
            Content::Blocks(children) => children.iter().find_map(Self::first_leaf),
        }
    }

    /// Checked state of a check-list item; missing data reads as unchecked.
    pub fn checked(&self) -> bool {
        self.data
            .get("checked")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn image_src(&self) -> Option<&str> {
        self.data.get("src").and_then(Value::as_str)
    }

    pub fn image_size(&self) -> ImageSize {
        let read = |name: &str| {
            self.data
                .get(name)
                .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(f64_to_i64)))
                .unwrap_or(DEFAULT_IMAGE_SIZE)
        };
        ImageSize {
            width: read("width"),
            height: read("height"),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
// Stored sizes are small pixel counts; saturation on absurd values is fine.
const fn f64_to_i64(value: f64) -> i64 {
    value as i64
}

fn collect_leaves<'a>(blocks: &'a [Block], visit: &mut impl FnMut(&'a Block)) {
    for block in blocks {
        match &block.content {
            Content::Text(_) => visit(block),
            Content::Blocks(children) => collect_leaves(children, visit),
        }
    }
}

/// The document tree.
///
/// Invariants kept by every transform: containers are never empty, and the
/// document always holds at least one leaf block.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Block>,
    next_key: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Build a document, assigning fresh keys to every block.
    pub fn new(nodes: Vec<Block>) -> Self {
        let mut document = Self {
            nodes: Vec::with_capacity(nodes.len()),
            next_key: 1,
        };
        for mut node in nodes {
            document.rekey(&mut node);
            document.nodes.push(node);
        }
        document.prune();
        document
    }

    pub fn nodes(&self) -> &[Block] {
        &self.nodes
    }

    pub(crate) const fn alloc_key(&mut self) -> Key {
        let key = Key(self.next_key);
        self.next_key += 1;
        key
    }

    /// Give `block` and all of its descendants fresh keys.
    pub(crate) fn rekey(&mut self, block: &mut Block) {
        block.key = self.alloc_key();
        if let Some(children) = block.children_mut() {
            for child in children {
                self.rekey(child);
            }
        }
    }

    /// Leaf blocks in document order.
    pub fn leaf_blocks(&self) -> Vec<&Block> {
        let mut leaves = Vec::new();
        collect_leaves(&self.nodes, &mut |block| leaves.push(block));
        leaves
    }

    pub fn first_leaf(&self) -> Option<&Block> {
        self.nodes.iter().find_map(Block::first_leaf)
    }

    pub fn last_leaf(&self) -> Option<&Block> {
        self.leaf_blocks().last().copied()
    }

    /// Position of a leaf block in document order.
    pub fn leaf_index(&self, key: Key) -> Option<usize> {
        self.leaf_blocks().iter().position(|block| block.key == key)
    }

    pub fn previous_leaf(&self, key: Key) -> Option<&Block> {
        let leaves = self.leaf_blocks();
        let index = leaves.iter().position(|block| block.key == key)?;
        index.checked_sub(1).map(|prev| leaves[prev])
    }

    pub fn next_leaf(&self, key: Key) -> Option<&Block> {
        let leaves = self.leaf_blocks();
        let index = leaves.iter().position(|block| block.key == key)?;
        leaves.get(index + 1).copied()
    }

    /// Child indexes leading from the root to the block with `key`.
    pub fn path_of(&self, key: Key) -> Option<Vec<usize>> {
        fn search(blocks: &[Block], key: Key, path: &mut Vec<usize>) -> bool {
            for (index, block) in blocks.iter().enumerate() {
                path.push(index);
                if block.key == key || search(block.children(), key, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
        let mut path = Vec::new();
        search(&self.nodes, key, &mut path).then_some(path)
    }

    pub fn get(&self, path: &[usize]) -> Option<&Block> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    pub(crate) fn get_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for index in rest {
            node = node.children_mut()?.get_mut(*index)?;
        }
        Some(node)
    }

    /// The child list that contains the node at `parent_path + [i]`.
    pub(crate) fn siblings_mut(&mut self, parent_path: &[usize]) -> Option<&mut Vec<Block>> {
        if parent_path.is_empty() {
            return Some(&mut self.nodes);
        }
        self.get_mut(parent_path)?.children_mut()
    }

    pub fn find(&self, key: Key) -> Option<&Block> {
        self.get(&self.path_of(key)?)
    }

    pub(crate) fn find_mut(&mut self, key: Key) -> Option<&mut Block> {
        let path = self.path_of(key)?;
        self.get_mut(&path)
    }

    /// Ancestors of `key`, nearest first. The node itself is excluded.
    pub fn ancestors(&self, key: Key) -> Vec<&Block> {
        let Some(path) = self.path_of(key) else {
            return Vec::new();
        };
        (1..path.len())
            .rev()
            .filter_map(|depth| self.get(&path[..depth]))
            .collect()
    }

    /// Nearest ancestor of `key` matching `predicate`.
    pub fn closest(&self, key: Key, predicate: impl Fn(&Block) -> bool) -> Option<&Block> {
        self.ancestors(key).into_iter().find(|block| predicate(block))
    }

    pub fn parent(&self, key: Key) -> Option<&Block> {
        self.ancestors(key).into_iter().next()
    }

    /// True when `key` is `ancestor` itself or lies below it.
    pub fn contains(&self, ancestor: Key, key: Key) -> bool {
        match (self.path_of(ancestor), self.path_of(key)) {
            (Some(outer), Some(inner)) => inner.starts_with(&outer),
            _ => false,
        }
    }

    /// Detach the block with `key`. Does not prune.
    pub(crate) fn remove(&mut self, key: Key) -> Option<Block> {
        let path = self.path_of(key)?;
        let (index, parent) = path.split_last()?;
        let siblings = self.siblings_mut(parent)?;
        Some(siblings.remove(*index))
    }

    /// Drop empty containers and make sure one paragraph remains.
    pub(crate) fn prune(&mut self) {
        fn prune_blocks(blocks: &mut Vec<Block>) {
            for block in blocks.iter_mut() {
                if let Some(children) = block.children_mut() {
                    prune_blocks(children);
                }
            }
            blocks.retain(|block| !matches!(&block.content, Content::Blocks(children) if children.is_empty()));
        }
        prune_blocks(&mut self.nodes);
        if self.nodes.is_empty() {
            let mut paragraph = Block::paragraph("");
            paragraph.key = self.alloc_key();
            self.nodes.push(paragraph);
        }
    }
}

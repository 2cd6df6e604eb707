//! Retained node tree plus the mount / replace / unmount reconciliation
//! helpers views are rendered through.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::edit_token::EditorSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInputHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    AfterBegin,
    BeforeEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("component has no materialized element")]
    NotMaterialized,
    #[error("node {0:?} is not attached to a parent")]
    Detached(NodeId),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("unknown date input {0:?}")]
    UnknownDateInput(DateInputHandle),
}

#[derive(Debug)]
struct Node {
    markup: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct DateBinding {
    anchor: NodeId,
    value: DateTime<Utc>,
}

/// The on-screen surface: a tree of nodes, the global key capture list and
/// the live date-input bindings.
#[derive(Debug)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_node: u64,
    key_listeners: Vec<EditorSlot>,
    date_inputs: HashMap<DateInputHandle, DateBinding>,
    next_date_input: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                markup: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            next_node: 1,
            key_listeners: Vec::new(),
            date_inputs: HashMap::new(),
            next_date_input: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends a static anchor under the root.
    pub fn create_region(&mut self, label: &str) -> NodeId {
        let id = self.create_node(label.to_string());
        self.attach(self.root, id, RenderPosition::BeforeEnd);
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn markup(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.markup.as_str())
    }

    /// True when `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Indented dump of every attached node, depth first.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root) {
            self.write_node(&mut out, *child, 0);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        for line in node.markup.lines() {
            out.push_str(&indent);
            out.push_str(line);
            out.push('\n');
        }
        for child in &node.children {
            self.write_node(out, *child, depth + 1);
        }
    }

    pub fn add_key_listener(&mut self, slot: EditorSlot) {
        if !self.key_listeners.contains(&slot) {
            self.key_listeners.push(slot);
        }
    }

    pub fn remove_key_listener(&mut self, slot: EditorSlot) {
        self.key_listeners.retain(|listener| *listener != slot);
    }

    pub fn key_listeners(&self) -> &[EditorSlot] {
        &self.key_listeners
    }

    pub fn bind_date_input(&mut self, anchor: NodeId, initial: DateTime<Utc>) -> DateInputHandle {
        let handle = DateInputHandle(self.next_date_input);
        self.next_date_input += 1;
        self.date_inputs.insert(
            handle,
            DateBinding {
                anchor,
                value: initial,
            },
        );
        handle
    }

    pub fn set_date_input(
        &mut self,
        handle: DateInputHandle,
        value: DateTime<Utc>,
    ) -> Result<(), RenderError> {
        let binding = self
            .date_inputs
            .get_mut(&handle)
            .ok_or(RenderError::UnknownDateInput(handle))?;
        binding.value = value;
        Ok(())
    }

    pub fn date_input_value(&self, handle: DateInputHandle) -> Option<DateTime<Utc>> {
        self.date_inputs.get(&handle).map(|binding| binding.value)
    }

    pub fn date_input_anchor(&self, handle: DateInputHandle) -> Option<NodeId> {
        self.date_inputs.get(&handle).map(|binding| binding.anchor)
    }

    pub fn release_date_input(&mut self, handle: DateInputHandle) {
        self.date_inputs.remove(&handle);
    }

    pub fn live_date_inputs(&self) -> usize {
        self.date_inputs.len()
    }

    fn create_node(&mut self, markup: String) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                markup,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, position: RenderPosition) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&parent) {
            match position {
                RenderPosition::AfterBegin => node.children.insert(0, child),
                RenderPosition::BeforeEnd => node.children.push(child),
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    /// Puts `new` where `old` sits under `parent` and detaches `old`.
    fn swap_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<(), RenderError> {
        if !self.contains(new) {
            return Err(RenderError::UnknownNode(new));
        }
        self.detach(new);
        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or(RenderError::UnknownNode(parent))?;
        let index = node
            .children
            .iter()
            .position(|child| *child == old)
            .ok_or(RenderError::Detached(old))?;
        node.children[index] = new;
        if let Some(node) = self.nodes.get_mut(&new) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&old) {
            node.parent = None;
        }
        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
    }
}

/// A component that renders into one document node.
pub trait View {
    fn template(&self) -> String;

    fn element(&self) -> Option<NodeId>;

    fn set_element(&mut self, element: Option<NodeId>);

    /// Called after a fresh element has been created for this view.
    fn restore_handlers(&mut self, _doc: &mut Document, _element: NodeId) {}

    /// Called right before the view's element leaves the document for good.
    fn release(&mut self, _doc: &mut Document) {}
}

fn materialize(doc: &mut Document, view: &mut dyn View) -> NodeId {
    if let Some(element) = view.element() {
        if doc.contains(element) {
            return element;
        }
    }
    let element = doc.create_node(view.template());
    view.set_element(Some(element));
    view.restore_handlers(doc, element);
    element
}

pub fn mount(
    doc: &mut Document,
    view: &mut dyn View,
    container: NodeId,
    position: RenderPosition,
) -> Result<(), RenderError> {
    if !doc.contains(container) {
        return Err(RenderError::UnknownNode(container));
    }
    let element = materialize(doc, view);
    doc.attach(container, element, position);
    Ok(())
}

/// Swaps `new` into the position `old` occupies. `old` must be mounted;
/// `new` is materialized on demand.
pub fn replace(doc: &mut Document, new: &mut dyn View, old: &dyn View) -> Result<(), RenderError> {
    let old_element = old.element().ok_or(RenderError::NotMaterialized)?;
    if !doc.contains(old_element) {
        return Err(RenderError::UnknownNode(old_element));
    }
    let parent = doc
        .parent(old_element)
        .ok_or(RenderError::Detached(old_element))?;
    let new_element = materialize(doc, new);
    doc.swap_child(parent, old_element, new_element)
}

/// Drops the view's element from the document. No-op when already unmounted.
pub fn unmount(doc: &mut Document, view: &mut dyn View) {
    let Some(element) = view.element() else {
        return;
    };
    view.release(doc);
    doc.remove_subtree(element);
    view.set_element(None);
}

/// Re-renders the view from its current state, keeping its position.
pub fn update_element(doc: &mut Document, view: &mut dyn View) -> Result<(), RenderError> {
    let Some(previous) = view.element() else {
        return Ok(());
    };
    let parent = doc.parent(previous);
    view.release(doc);
    view.set_element(None);
    let next = materialize(doc, view);
    if let Some(parent) = parent {
        doc.swap_child(parent, previous, next)?;
    }
    doc.remove_subtree(previous);
    Ok(())
}

/// Mounts `next` into `container` the first time, or swaps it in place of
/// the view currently held in `slot`, then unmounts the previous one.
pub fn swap_view<V: View>(
    doc: &mut Document,
    slot: &mut Option<V>,
    mut next: V,
    container: NodeId,
    position: RenderPosition,
) -> Result<(), RenderError> {
    match slot.as_ref() {
        Some(previous) if previous.element().is_some_and(|el| doc.parent(el).is_some()) => {
            replace(doc, &mut next, previous)?;
        }
        _ => mount(doc, &mut next, container, position)?,
    }
    if let Some(mut previous) = slot.take() {
        unmount(doc, &mut previous);
    }
    *slot = Some(next);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label {
        text: String,
        element: Option<NodeId>,
        bound: Option<DateInputHandle>,
    }

    impl Label {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                element: None,
                bound: None,
            }
        }
    }

    impl View for Label {
        fn template(&self) -> String {
            self.text.clone()
        }

        fn element(&self) -> Option<NodeId> {
            self.element
        }

        fn set_element(&mut self, element: Option<NodeId>) {
            self.element = element;
        }

        fn restore_handlers(&mut self, doc: &mut Document, element: NodeId) {
            let now: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().expect("timestamp");
            self.bound = Some(doc.bind_date_input(element, now));
        }

        fn release(&mut self, doc: &mut Document) {
            if let Some(handle) = self.bound.take() {
                doc.release_date_input(handle);
            }
        }
    }

    #[test]
    fn mount_positions_children() {
        let mut doc = Document::new();
        let region = doc.create_region("list");
        let mut first = Label::new("first");
        let mut second = Label::new("second");

        mount(&mut doc, &mut first, region, RenderPosition::BeforeEnd).expect("mount");
        mount(&mut doc, &mut second, region, RenderPosition::AfterBegin).expect("mount");

        assert_eq!(doc.render_text(), "list\n  second\n  first\n");
    }

    #[test]
    fn replace_requires_a_mounted_old_view() {
        let mut doc = Document::new();
        let mut new = Label::new("new");
        let old = Label::new("old");

        assert_eq!(
            replace(&mut doc, &mut new, &old),
            Err(RenderError::NotMaterialized)
        );
    }

    #[test]
    fn replace_swaps_in_place_and_keeps_old_node_for_reuse() {
        let mut doc = Document::new();
        let region = doc.create_region("list");
        let mut row = Label::new("row");
        let mut form = Label::new("form");
        let mut tail = Label::new("tail");
        mount(&mut doc, &mut row, region, RenderPosition::BeforeEnd).expect("mount");
        mount(&mut doc, &mut tail, region, RenderPosition::BeforeEnd).expect("mount");

        replace(&mut doc, &mut form, &row).expect("open");
        assert_eq!(doc.render_text(), "list\n  form\n  tail\n");
        let row_element = row.element().expect("row keeps element");

        replace(&mut doc, &mut row, &form).expect("close");
        assert_eq!(doc.render_text(), "list\n  row\n  tail\n");
        assert_eq!(row.element(), Some(row_element));
    }

    #[test]
    fn unmount_is_idempotent_and_releases_bindings() {
        let mut doc = Document::new();
        let region = doc.create_region("list");
        let mut label = Label::new("label");
        mount(&mut doc, &mut label, region, RenderPosition::BeforeEnd).expect("mount");
        assert_eq!(doc.live_date_inputs(), 1);

        unmount(&mut doc, &mut label);
        unmount(&mut doc, &mut label);

        assert_eq!(doc.live_date_inputs(), 0);
        assert!(label.element().is_none());
        assert_eq!(doc.render_text(), "list\n");
    }

    #[test]
    fn update_element_rerenders_in_place() {
        let mut doc = Document::new();
        let region = doc.create_region("list");
        let mut head = Label::new("head");
        let mut label = Label::new("before");
        mount(&mut doc, &mut head, region, RenderPosition::BeforeEnd).expect("mount");
        mount(&mut doc, &mut label, region, RenderPosition::BeforeEnd).expect("mount");
        let before = label.element();

        label.text = "after".to_string();
        update_element(&mut doc, &mut label).expect("update");

        assert_ne!(label.element(), before);
        assert_eq!(doc.render_text(), "list\n  head\n  after\n");
        assert_eq!(doc.live_date_inputs(), 2);
    }

    #[test]
    fn key_listeners_register_once() {
        let mut doc = Document::new();
        doc.add_key_listener(EditorSlot::Create);
        doc.add_key_listener(EditorSlot::Create);
        assert_eq!(doc.key_listeners(), &[EditorSlot::Create]);

        doc.remove_key_listener(EditorSlot::Create);
        assert!(doc.key_listeners().is_empty());
    }
}

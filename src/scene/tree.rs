use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::value::{Prop, PropValue};
use crate::foundation::error::{LanderError, LanderResult};
use crate::scene::selector::{Chain, Compound, Selector};

/// Stable handle to an element in a [`SceneTree`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
struct Element {
    tag: String,
    classes: Vec<String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    style: BTreeMap<Prop, PropValue>,
}

#[derive(Clone, Debug)]
struct StyleRule {
    selector: Selector,
    declarations: BTreeMap<Prop, PropValue>,
}

/// Minimal element tree standing in for the page: tags, classes, text, inline style and a
/// flat stylesheet (later rules win).
#[derive(Clone, Debug)]
pub struct SceneTree {
    nodes: Vec<Element>,
    rules: Vec<StyleRule>,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Tree with a single `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element {
                tag: "body".to_owned(),
                classes: Vec::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
                style: BTreeMap::new(),
            }],
            rules: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    /// Create an element as the last child of `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        classes: &[&str],
    ) -> LanderResult<NodeId> {
        if !self.contains(parent) {
            return Err(LanderError::validation(format!(
                "append to unknown node {}",
                parent.0
            )));
        }
        let id = NodeId(
            u32::try_from(self.nodes.len())
                .map_err(|_| LanderError::validation("scene tree is full"))?,
        );
        self.nodes.push(Element {
            tag: tag.to_owned(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            text: String::new(),
            parent: Some(parent),
            children: Vec::new(),
            style: BTreeMap::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        Ok(id)
    }

    /// Same as [`Self::append_element`] followed by [`Self::set_text`].
    pub fn append_text_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        classes: &[&str],
        text: &str,
    ) -> LanderResult<NodeId> {
        let id = self.append_element(parent, tag, classes)?;
        self.set_text(id, text);
        Ok(id)
    }

    fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|e| e.tag.as_str())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Own text of the element (not including descendants).
    pub fn text(&self, id: NodeId) -> &str {
        self.get(id).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(e) = self.get_mut(id) {
            e.text = text.to_owned();
        }
    }

    /// Own text plus descendant text, in document order, joined by single spaces.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(id, &mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, id: NodeId, out: &mut Vec<&'a str>) {
        let Some(e) = self.get(id) else {
            return;
        };
        if !e.text.is_empty() {
            out.push(&e.text);
        }
        for &c in &e.children {
            self.collect_text(c, out);
        }
    }

    /// Append a stylesheet rule. Later rules override earlier ones.
    pub fn add_rule(
        &mut self,
        selector: &str,
        declarations: &[(Prop, PropValue)],
    ) -> LanderResult<()> {
        let selector = Selector::parse(selector)?;
        let declarations = declarations
            .iter()
            .map(|(p, v)| Ok((*p, v.clone().coerce(*p)?)))
            .collect::<LanderResult<BTreeMap<_, _>>>()?;
        self.rules.push(StyleRule {
            selector,
            declarations,
        });
        Ok(())
    }

    /// Inline style value, if set.
    pub fn inline(&self, id: NodeId, prop: Prop) -> Option<&PropValue> {
        self.get(id).and_then(|e| e.style.get(&prop))
    }

    pub fn set_style(&mut self, id: NodeId, prop: Prop, value: PropValue) {
        if let Some(e) = self.get_mut(id) {
            e.style.insert(prop, value);
        }
    }

    /// Effective value: inline style, else the last matching stylesheet rule, else the
    /// property's initial value.
    pub fn computed(&self, id: NodeId, prop: Prop) -> PropValue {
        if let Some(v) = self.inline(id, prop) {
            return v.clone();
        }
        self.rules
            .iter()
            .rev()
            .filter(|r| r.declarations.contains_key(&prop))
            .find(|r| self.matches(id, &r.selector))
            .and_then(|r| r.declarations.get(&prop).cloned())
            .unwrap_or_else(|| prop.initial())
    }

    /// All attached elements matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.select_within(self.root(), selector)
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in document order.
    pub fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.matches(id, selector) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Parse and select in one go.
    pub fn query(&self, selector: &str) -> LanderResult<Vec<NodeId>> {
        Ok(self.select(&Selector::parse(selector)?))
    }

    /// First match of `selector`, if any.
    pub fn query_one(&self, selector: &str) -> LanderResult<Option<NodeId>> {
        Ok(self.query(selector)?.into_iter().next())
    }

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.chains.iter().any(|c| self.matches_chain(id, c))
    }

    fn matches_chain(&self, id: NodeId, chain: &Chain) -> bool {
        let Some((last, ancestors)) = chain.parts.split_last() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }
        // Descendant-only combinators: greedy right-to-left walk is exact.
        let mut cursor = self.parent(id);
        for part in ancestors.iter().rev() {
            loop {
                let Some(anc) = cursor else {
                    return false;
                };
                cursor = self.parent(anc);
                if self.matches_compound(anc, part) {
                    break;
                }
            }
        }
        true
    }

    fn matches_compound(&self, id: NodeId, c: &Compound) -> bool {
        let Some(e) = self.get(id) else {
            return false;
        };
        if let Some(tag) = &c.tag
            && &e.tag != tag
        {
            return false;
        }
        c.classes
            .iter()
            .all(|want| e.classes.iter().any(|have| have == want))
    }

    /// Serializable view of every attached element and its styled properties.
    pub fn snapshot(&self) -> TreeSnapshot {
        let mut nodes = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(e) = self.get(id) else {
                continue;
            };
            let mut props: Vec<Prop> = e.style.keys().copied().collect();
            for rule in &self.rules {
                if self.matches(id, &rule.selector) {
                    props.extend(rule.declarations.keys().copied());
                }
            }
            let style = props
                .into_iter()
                .map(|p| (p, self.computed(id, p)))
                .collect();
            nodes.push(NodeSnapshot {
                id,
                tag: e.tag.clone(),
                classes: e.classes.clone(),
                text: e.text.clone(),
                style,
            });
            stack.extend(e.children.iter().rev().copied());
        }
        TreeSnapshot { nodes }
    }
}

/// JSON-friendly dump of a [`SceneTree`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<Prop, PropValue>,
}

impl TreeSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;

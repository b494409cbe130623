//! Diagrams - the item tree rendered onto one page.
//!
//! A [`Diagram`] is a persistent value. Every edit returns a new diagram and
//! leaves the old one valid, so earlier snapshots can be kept for undo.
//! Items live in a persistent hash map: an edit copies only the path to the
//! changed entries, and unchanged items are shared between snapshots.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DiagramContainer, DiagramError, DiagramItem, DiagramResult, Group, ItemId, ItemSet, Rect2,
    Transform,
};

/// Unique identifier for a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagramId(String);

impl DiagramId {
    /// Create a new unique diagram ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DiagramId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiagramId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An ID-indexed set of items plus the root container.
///
/// Invariant: the IDs reachable from the root (recursing into groups) form a
/// tree. No ID is reachable twice and there are no cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDiagram")]
pub struct Diagram {
    id: DiagramId,
    title: Option<String>,
    items: imbl::HashMap<ItemId, DiagramItem>,
    root: DiagramContainer,
    /// Child ID to the ID of the group listing it. Root items have no entry.
    #[serde(skip)]
    parents: imbl::HashMap<ItemId, ItemId>,
}

#[derive(Deserialize)]
struct RawDiagram {
    id: DiagramId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    items: HashMap<ItemId, DiagramItem>,
    #[serde(default)]
    root: DiagramContainer,
}

impl TryFrom<RawDiagram> for Diagram {
    type Error = DiagramError;

    fn try_from(raw: RawDiagram) -> DiagramResult<Self> {
        let diagram = Self::from_parts(raw.id, raw.items.into_values(), raw.root)?;
        Ok(diagram.with_title(raw.title))
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramId::new())
    }
}

impl Diagram {
    /// Create an empty diagram.
    #[must_use]
    pub fn new(id: DiagramId) -> Self {
        Self {
            id,
            title: None,
            items: imbl::HashMap::new(),
            root: DiagramContainer::new(),
            parents: imbl::HashMap::new(),
        }
    }

    /// Assemble a diagram from items and a root container.
    ///
    /// Container entries without a matching item are tolerated and skipped
    /// when traversing.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MalformedTree`] if an ID is reachable twice
    /// (which includes cycles), or [`DiagramError::DuplicateItem`] if two items
    /// share an ID.
    pub fn from_parts<I>(id: DiagramId, items: I, root: DiagramContainer) -> DiagramResult<Self>
    where
        I: IntoIterator<Item = DiagramItem>,
    {
        let mut map = imbl::HashMap::new();
        for item in items {
            let key = item.id().clone();
            if map.insert(key.clone(), item).is_some() {
                return Err(DiagramError::DuplicateItem(key.to_string()));
            }
        }

        let parents = map
            .values()
            .filter_map(DiagramItem::as_group)
            .flat_map(|group| {
                group
                    .child_ids
                    .iter()
                    .map(move |child| (child.clone(), group.id.clone()))
            })
            .collect();

        let diagram = Self {
            id,
            title: None,
            items: map,
            root,
            parents,
        };
        diagram.validate()?;
        Ok(diagram)
    }

    /// Check the tree invariant.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MalformedTree`] naming the first ID reached twice.
    pub fn validate(&self) -> DiagramResult<()> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&ItemId> = self.root.iter().rev().collect();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(DiagramError::MalformedTree(id.to_string()));
            }
            match self.items.get(id) {
                Some(DiagramItem::Group(group)) => stack.extend(group.child_ids.iter().rev()),
                Some(DiagramItem::Shape(_)) => {}
                None => tracing::warn!(diagram = %self.id, item = %id, "Dangling item id in container"),
            }
        }

        Ok(())
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &DiagramId {
        &self.id
    }

    /// Optional display title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Copy with a different title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Root container.
    #[must_use]
    pub fn root(&self) -> &DiagramContainer {
        &self.root
    }

    /// Look up an item.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&DiagramItem> {
        self.items.get(id)
    }

    /// Whether an item with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// All items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &DiagramItem> {
        self.items.values()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the diagram has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The container listing children of `parent`, or the root for `None`.
    #[must_use]
    pub fn children_of(&self, parent: Option<&ItemId>) -> Option<&DiagramContainer> {
        match parent {
            None => Some(&self.root),
            Some(id) => self
                .items
                .get(id)
                .and_then(DiagramItem::as_group)
                .map(|group| &group.child_ids),
        }
    }

    /// The group directly containing `id`, or `None` for root items and unknown IDs.
    #[must_use]
    pub fn parent_of(&self, id: &ItemId) -> Option<&Arc<Group>> {
        self.parents
            .get(id)
            .and_then(|group| self.items.get(group))
            .and_then(DiagramItem::as_group)
    }

    /// Locate the container of `id`: `Some(None)` is the root, `Some(Some(g))` a group.
    fn locate(&self, id: &ItemId) -> Option<Option<ItemId>> {
        match self.parents.get(id) {
            Some(group) => Some(Some(group.clone())),
            None if self.root.contains(id) => Some(None),
            None => None,
        }
    }

    fn set_children(&mut self, parent: Option<&ItemId>, children: DiagramContainer) {
        let old = match parent {
            None => std::mem::replace(&mut self.root, children.clone()),
            Some(id) => {
                let Some(DiagramItem::Group(group)) = self.items.get(id) else {
                    return;
                };
                let old = group.child_ids.clone();
                let updated = Group {
                    child_ids: children.clone(),
                    ..Group::clone(group)
                };
                self.items.insert(id.clone(), updated.into());
                old
            }
        };
        self.reindex(parent, &old, &children);
    }

    /// Point the parent index of every ID in `new` at `parent` and drop the
    /// entries of IDs that left it.
    fn reindex(&mut self, parent: Option<&ItemId>, old: &DiagramContainer, new: &DiagramContainer) {
        let kept: HashSet<&ItemId> = new.iter().collect();
        for id in old.iter().filter(|id| !kept.contains(id)) {
            if self.parents.get(id) == parent {
                self.parents.remove(id);
            }
        }
        for id in new {
            match parent {
                Some(group) => {
                    self.parents.insert(id.clone(), group.clone());
                }
                None => {
                    self.parents.remove(id);
                }
            }
        }
    }

    /// Add `item` on top of `parent`'s children (the root for `None`).
    ///
    /// Groups must be added empty; fill them with further `add_item` calls or
    /// build them with [`Diagram::group_items`].
    ///
    /// # Errors
    ///
    /// Returns an error if the ID already exists, the parent is not a group,
    /// or a non-empty group is added.
    pub fn add_item(&self, parent: Option<&ItemId>, item: impl Into<DiagramItem>) -> DiagramResult<Self> {
        let item = item.into();
        let id = item.id().clone();

        if self.contains(&id) {
            return Err(DiagramError::DuplicateItem(id.to_string()));
        }
        if item.as_group().is_some_and(|g| !g.child_ids.is_empty()) {
            return Err(DiagramError::InvalidOperation(format!(
                "group {id} must be added without children"
            )));
        }

        let children = self.children_of(parent).ok_or_else(|| match parent {
            Some(p) if self.contains(p) => {
                DiagramError::InvalidOperation(format!("{p} is not a group"))
            }
            Some(p) => DiagramError::ItemNotFound(p.to_string()),
            None => DiagramError::InvalidOperation("missing root".to_string()),
        })?;
        let children = children.add(id.clone());

        let mut next = self.clone();
        next.items.insert(id, item);
        next.set_children(parent, children);
        Ok(next)
    }

    /// Remove items and everything nested inside them. Unknown IDs are ignored.
    #[must_use]
    pub fn remove_items(&self, ids: &[ItemId]) -> Self {
        let set = ItemSet::from_diagram(ids, self);
        if set.is_empty() {
            return self.clone();
        }

        let removed: Vec<ItemId> = set.all_items().iter().map(|i| i.id().clone()).collect();
        tracing::debug!(diagram = %self.id, count = removed.len(), "Removing items");

        let gone: HashSet<&ItemId> = removed.iter().collect();
        let mut affected: Vec<ItemId> = Vec::new();
        for parent in removed.iter().filter_map(|id| self.parents.get(id)) {
            if !gone.contains(parent) && !affected.contains(parent) {
                affected.push(parent.clone());
            }
        }

        let mut next = self.clone();
        for id in &removed {
            next.items.remove(id);
            next.parents.remove(id);
        }

        let root = next.root.remove(&removed);
        if root.len() != next.root.len() {
            next.set_children(None, root);
        }
        for group_id in affected {
            if let Some(children) = next.children_of(Some(&group_id)) {
                let children = children.remove(&removed);
                next.set_children(Some(&group_id), children);
            }
        }

        next
    }

    /// Wrap `ids` in a new group called `group_id`.
    ///
    /// All IDs must share a parent. The group takes the lowest position of its
    /// members, members keep their relative order, and the group's bounds are
    /// the union of the members' bounding boxes.
    ///
    /// # Errors
    ///
    /// Returns an error if `ids` is empty, an ID is unknown, the members have
    /// different parents, or `group_id` is already used.
    pub fn group_items(&self, group_id: impl Into<ItemId>, ids: &[ItemId]) -> DiagramResult<Self> {
        let group_id = group_id.into();
        if self.contains(&group_id) {
            return Err(DiagramError::DuplicateItem(group_id.to_string()));
        }
        let (parent, children) = self.common_parent(ids)?;

        let members: Vec<ItemId> = children.iter().filter(|id| ids.contains(id)).cloned().collect();
        let index = members
            .iter()
            .filter_map(|id| children.index_of(id))
            .min()
            .unwrap_or(0);

        let bounds: Vec<Rect2> = members
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|item| item.transform().aabb())
            .collect();
        let transform = Transform::create_from_rect(Rect2::union(&bounds));

        let group = Group::new(group_id.clone(), transform, DiagramContainer::from_ids(members.clone()));
        let children = children.remove(&members).insert(index, group_id.clone());

        tracing::debug!(diagram = %self.id, group = %group_id, members = members.len(), "Grouping items");

        let mut next = self.clone();
        next.set_children(parent.as_ref(), children);
        next.items.insert(group_id.clone(), group.into());
        for member in members {
            next.parents.insert(member, group_id.clone());
        }
        Ok(next)
    }

    /// Dissolve a group, putting its children where the group was.
    ///
    /// # Errors
    ///
    /// Returns an error if `group_id` is unknown or not a group.
    pub fn ungroup(&self, group_id: &ItemId) -> DiagramResult<Self> {
        let group = match self.items.get(group_id) {
            Some(DiagramItem::Group(group)) => Arc::clone(group),
            Some(DiagramItem::Shape(_)) => {
                return Err(DiagramError::InvalidOperation(format!(
                    "{group_id} is not a group"
                )))
            }
            None => return Err(DiagramError::ItemNotFound(group_id.to_string())),
        };

        let parent = self
            .locate(group_id)
            .ok_or_else(|| DiagramError::ItemNotFound(group_id.to_string()))?;
        let children = self
            .children_of(parent.as_ref())
            .ok_or_else(|| DiagramError::ItemNotFound(group_id.to_string()))?
            .replace_with(group_id, group.child_ids.ids());

        let mut next = self.clone();
        next.items.remove(group_id);
        next.parents.remove(group_id);
        next.set_children(parent.as_ref(), children);
        Ok(next)
    }

    /// Change the paint order of `ids` inside their shared parent so the first
    /// of them lands at `index`. `usize::MAX` brings them to the front.
    ///
    /// # Errors
    ///
    /// Returns an error if an ID is unknown or the IDs have different parents.
    pub fn move_items(&self, ids: &[ItemId], index: usize) -> DiagramResult<Self> {
        let (parent, children) = self.common_parent(ids)?;
        let children = children.move_to(ids, index);

        let mut next = self.clone();
        next.set_children(parent.as_ref(), children);
        Ok(next)
    }

    /// Replace each listed item with `f(item)`.
    ///
    /// Unknown IDs are skipped. Items for which `f` returns the same value are
    /// left shared with the old snapshot. A result with a different ID, or a
    /// group whose children changed, is rejected and the item is kept.
    #[must_use]
    pub fn update_items<F>(&self, ids: &[ItemId], mut f: F) -> Self
    where
        F: FnMut(&DiagramItem) -> DiagramItem,
    {
        let mut next: Option<Self> = None;

        for id in ids {
            let Some(item) = self.items.get(id) else {
                continue;
            };

            let updated = f(item);
            if updated.ptr_eq(item) || updated == *item {
                continue;
            }
            if updated.id() != id || !same_children(item, &updated) {
                tracing::warn!(diagram = %self.id, item = %id, "Rejected structural change in update_items");
                continue;
            }

            next.get_or_insert_with(|| self.clone())
                .items
                .insert(id.clone(), updated);
        }

        next.unwrap_or_else(|| self.clone())
    }

    fn common_parent(&self, ids: &[ItemId]) -> DiagramResult<(Option<ItemId>, &DiagramContainer)> {
        let Some(first) = ids.first() else {
            return Err(DiagramError::InvalidOperation("no items given".to_string()));
        };

        let parent = self
            .locate(first)
            .ok_or_else(|| DiagramError::ItemNotFound(first.to_string()))?;

        for id in &ids[1..] {
            let other = self
                .locate(id)
                .ok_or_else(|| DiagramError::ItemNotFound(id.to_string()))?;
            if other != parent {
                return Err(DiagramError::InvalidOperation(format!(
                    "{first} and {id} have different parents"
                )));
            }
        }

        let children = self
            .children_of(parent.as_ref())
            .ok_or_else(|| DiagramError::ItemNotFound(first.to_string()))?;
        Ok((parent, children))
    }
}

fn same_children(a: &DiagramItem, b: &DiagramItem) -> bool {
    match (a, b) {
        (DiagramItem::Group(a), DiagramItem::Group(b)) => a.child_ids == b.child_ids,
        (DiagramItem::Shape(_), DiagramItem::Shape(_)) => true,
        _ => false,
    }
}

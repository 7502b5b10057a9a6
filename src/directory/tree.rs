// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use crate::model::StreamerName;

/// Nested group listing. Groups and streamers keep their insertion order, so a depth-first walk
/// yields the same order a user sees in the stream list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTree {
    root: GroupNode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupNode {
    name: SmolStr,
    groups: Vec<GroupNode>,
    order: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Group(usize),
    Streamer(StreamerName),
}

impl GroupNode {
    fn new(name: SmolStr) -> Self {
        Self { name, groups: Vec::new(), order: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct subgroups in insertion order.
    pub fn subgroups(&self) -> &[GroupNode] {
        &self.groups
    }

    /// Direct members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &StreamerName> {
        self.order.iter().filter_map(|slot| match slot {
            Slot::Streamer(name) => Some(name),
            Slot::Group(_) => None,
        })
    }

    fn child_mut(&mut self, name: &str) -> &mut GroupNode {
        let index = match self.groups.iter().position(|group| group.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(GroupNode::new(SmolStr::new(name)));
                self.order.push(Slot::Group(self.groups.len() - 1));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    fn child(&self, name: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|group| group.name == name)
    }

    fn collect_streamers<'a>(&'a self, out: &mut Vec<&'a StreamerName>) {
        for slot in &self.order {
            match slot {
                Slot::Group(index) => {
                    if let Some(group) = self.groups.get(*index) {
                        group.collect_streamers(out);
                    }
                }
                Slot::Streamer(name) => out.push(name),
            }
        }
    }
}

impl GroupTree {
    /// Places `name` under `path`, creating missing groups. Re-inserting is a no-op.
    pub fn insert(&mut self, path: &[SmolStr], name: &StreamerName) {
        let mut node = &mut self.root;
        for segment in path {
            node = node.child_mut(segment);
        }
        if !node.members().any(|member| member == name) {
            node.order.push(Slot::Streamer(name.clone()));
        }
    }

    pub fn root(&self) -> &GroupNode {
        &self.root
    }

    pub fn node(&self, path: &[SmolStr]) -> Option<&GroupNode> {
        path.iter().try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Every streamer in listing order.
    pub fn listing(&self) -> Vec<&StreamerName> {
        let mut out = Vec::new();
        self.root.collect_streamers(&mut out);
        out
    }

    /// Streamers at or below `path`, in listing order.
    pub fn listing_under(&self, path: &[SmolStr]) -> Vec<&StreamerName> {
        let mut out = Vec::new();
        if let Some(node) = self.node(path) {
            node.collect_streamers(&mut out);
        }
        out
    }
}

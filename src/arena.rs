//! A slot arena backing every tree in this crate.
//!
//! Nodes live in a `Vec` and reference each other by index, so child,
//! parent, and thread links are all plain [`NodeId`]s and none of them
//! carry ownership. Deleting a node vacates its slot; the slot is reused
//! by a later insertion.

use crate::tree::NodeId;

#[derive(Clone)]
pub(crate) struct Arena<N> {
    slots: Vec<Option<N>>,
    free: Vec<usize>,
}

impl<N> Arena<N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn insert(&mut self, node: N) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> N {
        let node = self.slots[id.0]
            .take()
            .expect("removed a vacant arena slot");
        self.free.push(id.0);
        node
    }

    pub(crate) fn get(&self, id: NodeId) -> &N {
        self.slots[id.0].as_ref().expect("read a vacant arena slot")
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut N {
        self.slots[id.0].as_mut().expect("read a vacant arena slot")
    }
}

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Arena size below which no automatic collection runs.
const MIN_COLLECTION_THRESHOLD: usize = 1024;

/// Stable index of a node inside its [`Graph`] arena.
///
/// An id stays valid while the node is alive. Slots of reclaimed nodes are
/// reused, so an id kept after every handle onto its node was dropped may
/// later name a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Arena {
    slots: RefCell<Vec<Option<TensorData>>>,
    /// Number of live `Tensor` handles per slot.
    handles: RefCell<Vec<usize>>,
    free: RefCell<Vec<usize>>,
    next_collection: Cell<usize>,
}

impl Default for Arena {
    fn default() -> Self {
        Arena {
            slots: RefCell::new(Vec::new()),
            handles: RefCell::new(Vec::new()),
            free: RefCell::new(Vec::new()),
            next_collection: Cell::new(MIN_COLLECTION_THRESHOLD),
        }
    }
}

/// Arena owning every node of one computation graph.
///
/// `Graph` is a cheap handle: clones share the same arena, which is dropped
/// together with the last handle (including the ones held by [`Tensor`]s).
/// It uses `Rc<RefCell<..>>` and is therefore neither `Send` nor `Sync`; one
/// graph belongs to one thread of control.
///
/// A node stays alive while a `Tensor` handle points to it or while it is
/// reachable through the dependencies of such a node. Unreachable nodes are
/// reclaimed by [`Graph::collect_garbage`], which also runs on its own once
/// the arena has doubled since the last collection.
#[derive(Clone, Default)]
pub struct Graph {
    arena: Rc<Arena>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.slots.borrow().len() - self.arena.free.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if both handles point to the same arena.
    pub fn ptr_eq(&self, other: &Graph) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    /// Returns a handle onto a live node, or `None` for an unknown or
    /// reclaimed id.
    pub fn tensor(&self, id: NodeId) -> Option<Tensor> {
        let alive = matches!(self.arena.slots.borrow().get(id.0), Some(Some(_)));
        alive.then(|| Tensor::from_parts(self.clone(), id))
    }

    /// Frees every node that no `Tensor` handle can reach, and returns how
    /// many were freed. Their slots are reused by later inserts.
    pub fn collect_garbage(&self) -> usize {
        // Dropped only after the arena borrows end: a custom `grad_fn` may own
        // a `Tensor`, whose drop updates the handle counts.
        let reclaimed: Vec<TensorData> = {
            let handles = self.arena.handles.borrow();
            let mut slots = self.arena.slots.borrow_mut();
            let mut free = self.arena.free.borrow_mut();

            let mut live = vec![false; slots.len()];
            let mut stack: Vec<usize> = handles
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(index, _)| index)
                .collect();
            while let Some(index) = stack.pop() {
                if live[index] {
                    continue;
                }
                live[index] = true;
                if let Some(node) = &slots[index] {
                    stack.extend(node.depends_on.iter().map(|dependency| dependency.node.0));
                }
            }

            let mut reclaimed = Vec::new();
            for (index, slot) in slots.iter_mut().enumerate() {
                if live[index] {
                    continue;
                }
                if let Some(node) = slot.take() {
                    free.push(index);
                    reclaimed.push(node);
                }
            }

            let remaining = slots.len() - free.len();
            self.arena
                .next_collection
                .set(MIN_COLLECTION_THRESHOLD.max(2 * remaining));
            debug!("Graph: reclaimed {} nodes, {} alive", reclaimed.len(), remaining);
            reclaimed
        };
        reclaimed.len()
    }

    /// Pushes a node into the arena and returns a handle onto it.
    pub(crate) fn insert(&self, node: TensorData) -> Tensor {
        let id = {
            let mut slots = self.arena.slots.borrow_mut();
            let mut handles = self.arena.handles.borrow_mut();
            match self.arena.free.borrow_mut().pop() {
                Some(index) => {
                    slots[index] = Some(node);
                    handles[index] = 1;
                    NodeId(index)
                }
                None => {
                    slots.push(Some(node));
                    handles.push(1);
                    NodeId(slots.len() - 1)
                }
            }
        };
        trace!("Graph: recorded node {}", id);
        let tensor = Tensor::from_owned_handle(self.clone(), id);
        if self.len() >= self.arena.next_collection.get() {
            self.collect_garbage();
        }
        tensor
    }

    pub(crate) fn acquire(&self, id: NodeId) {
        self.arena.handles.borrow_mut()[id.0] += 1;
    }

    pub(crate) fn release(&self, id: NodeId) {
        let mut handles = self.arena.handles.borrow_mut();
        handles[id.0] = handles[id.0].saturating_sub(1);
    }

    /// Runs `f` with shared access to a node.
    ///
    /// The arena is borrowed for the duration of `f`; `f` must not call back
    /// into the graph mutably. Panics if the node was reclaimed, which cannot
    /// happen for ids reached through a live handle or its dependencies.
    pub(crate) fn read<R>(&self, id: NodeId, f: impl FnOnce(&TensorData) -> R) -> R {
        let slots = self.arena.slots.borrow();
        match slots.get(id.0) {
            Some(Some(node)) => f(node),
            _ => panic!("Graph: node {} is not alive", id),
        }
    }

    /// Runs `f` with exclusive access to a node.
    pub(crate) fn write<R>(&self, id: NodeId, f: impl FnOnce(&mut TensorData) -> R) -> R {
        let mut slots = self.arena.slots.borrow_mut();
        match slots.get_mut(id.0) {
            Some(Some(node)) => f(node),
            _ => panic!("Graph: node {} is not alive", id),
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("nodes", &self.len()).finish()
    }
}

//! The tree description produced by components.

/// The output of a component: an ordered list of root nodes.
///
/// A view is only a description of what was built; once mounted, updates flow through effects
/// that mutate the nodes directly.
#[derive(Clone)]
pub struct View<G> {
    nodes: Vec<G>,
}

impl<G: Clone> View<G> {
    /// Create a new view with a single root node.
    pub fn new_node(node: G) -> Self {
        Self { nodes: vec![node] }
    }

    /// Create a new view from multiple views, flattened.
    pub fn new_fragment(fragment: Vec<View<G>>) -> Self {
        Self {
            nodes: fragment.into_iter().flat_map(|view| view.nodes).collect(),
        }
    }

    /// Create a view with no nodes at all.
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// The root nodes of this view.
    pub fn nodes(&self) -> &[G] {
        &self.nodes
    }
}

impl<G: Clone> Default for View<G> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_flattens() {
        let view = View::new_fragment(vec![
            View::new_node(1),
            View::empty(),
            View::new_fragment(vec![View::new_node(2), View::new_node(3)]),
        ]);
        assert_eq!(view.nodes(), [1, 2, 3].as_slice());
    }
}

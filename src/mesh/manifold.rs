use crate::mesh::Mesh;
use hashbrown::HashMap;

impl Mesh {
    /// Undirected edge `(low, high)` -> number of incident triangles.
    pub fn edge_counts(&self) -> HashMap<(u32, u32), u32> {
        let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edge_counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        edge_counts
    }

    /// Checks if the mesh is closed
    ///
    /// ### Returns
    /// Returns `true` if every edge is shared by exactly two triangles. An
    /// empty mesh is not closed.
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_counts().values().all(|&count| count == 2)
    }

    /// Number of edges used by a single triangle.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_counts().values().filter(|&&count| count == 1).count()
    }

    /// `true` if every directed edge appears at most once, i.e. neighbouring
    /// triangles never disagree on winding.
    pub fn is_consistently_wound(&self) -> bool {
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            for edge in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let count = directed.entry(edge).or_insert(0);
                *count += 1;
                if *count > 1 {
                    return false;
                }
            }
        }
        true
    }
}

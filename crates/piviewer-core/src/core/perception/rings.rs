use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};
use std::collections::{HashMap, HashSet, VecDeque};

/// A perceived ring: a cycle of bonded atoms with its derived geometry.
#[derive(Debug, Clone)]
pub struct Ring {
    atoms: Vec<AtomId>,
    members: HashSet<AtomId>,
    aromatic: bool,
    geometry: Option<(Point3<f64>, Vector3<f64>)>,
}

impl Ring {
    /// Builds a ring from atoms listed in cycle order.
    ///
    /// Atoms missing from `system` are skipped when computing the geometry.
    pub fn new(system: &MolecularSystem, atoms: Vec<AtomId>, aromatic: bool) -> Self {
        let positions: Vec<Point3<f64>> = atoms
            .iter()
            .filter_map(|&id| system.atom(id).map(|a| a.position))
            .collect();
        let geometry = geometry::center_and_normal(&positions);
        let members = atoms.iter().copied().collect();
        Self {
            atoms,
            members,
            aromatic,
            geometry,
        }
    }

    /// Member atoms in cycle order; consecutive atoms (and the last and first) are bonded.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.members.contains(&atom_id)
    }

    pub fn is_aromatic(&self) -> bool {
        self.aromatic
    }

    /// Centroid and unit plane normal, or `None` when the members are collinear.
    pub fn geometry(&self) -> Option<(Point3<f64>, Vector3<f64>)> {
        self.geometry
    }

    /// Ring bonds as consecutive atom pairs, closing the cycle.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomId, AtomId)> + '_ {
        let n = self.atoms.len();
        (0..n).map(move |i| (self.atoms[i], self.atoms[(i + 1) % n]))
    }
}

/// Bond graph of a system in dense index form.
struct BondGraph {
    atoms: Vec<AtomId>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    edge_index: HashMap<(usize, usize), usize>,
}

impl BondGraph {
    fn new(system: &MolecularSystem) -> Self {
        let atoms: Vec<AtomId> = system.atoms_iter().map(|(id, _)| id).collect();
        let index: HashMap<AtomId, usize> =
            atoms.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut adjacency = vec![Vec::new(); atoms.len()];
        let mut edges = Vec::with_capacity(system.bonds().len());
        let mut edge_index = HashMap::with_capacity(system.bonds().len());
        for bond in system.bonds() {
            let (Some(&a), Some(&b)) = (index.get(&bond.atom1_id), index.get(&bond.atom2_id)) else {
                continue;
            };
            let key = (a.min(b), a.max(b));
            if edge_index.contains_key(&key) {
                continue;
            }
            edge_index.insert(key, edges.len());
            edges.push(key);
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        Self {
            atoms,
            adjacency,
            edges,
            edge_index,
        }
    }

    fn connected_components(&self) -> usize {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = 0;
        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for &w in &self.adjacency[v] {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        components
    }

    /// Shortest cycle through the edge `(u, v)`, as vertices in cycle order.
    ///
    /// Searches for the shortest `u -> v` path that does not use the edge itself,
    /// giving up once the cycle would exceed `max_size` atoms.
    fn shortest_cycle_through(&self, u: usize, v: usize, max_size: usize) -> Option<Vec<usize>> {
        let mut parent: HashMap<usize, usize> = HashMap::new();
        let mut depth: HashMap<usize, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        depth.insert(u, 0);
        queue.push_back(u);

        while let Some(current) = queue.pop_front() {
            let d = depth[&current];
            if d + 1 >= max_size {
                continue;
            }
            for &next in &self.adjacency[current] {
                if current == u && next == v {
                    continue;
                }
                if depth.contains_key(&next) {
                    continue;
                }
                depth.insert(next, d + 1);
                parent.insert(next, current);
                if next == v {
                    let mut path = vec![v];
                    let mut node = v;
                    while let Some(&p) = parent.get(&node) {
                        path.push(p);
                        node = p;
                    }
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn edge_vector(&self, cycle: &[usize]) -> BitSet {
        let mut bits = BitSet::new(self.edges.len());
        for i in 0..cycle.len() {
            let (a, b) = (cycle[i], cycle[(i + 1) % cycle.len()]);
            if let Some(&e) = self.edge_index.get(&(a.min(b), a.max(b))) {
                bits.toggle(e);
            }
        }
        bits
    }
}

/// Bond-incidence vector over GF(2).
#[derive(Debug, Clone, PartialEq, Eq)]
struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    fn toggle(&mut self, bit: usize) {
        self.words[bit / 64] ^= 1 << (bit % 64);
    }

    fn get(&self, bit: usize) -> bool {
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    fn xor_assign(&mut self, other: &BitSet) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }

    fn first_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }
}

/// Incrementally maintained GF(2) basis in reduced row echelon form.
#[derive(Default)]
struct CycleBasis {
    rows: Vec<(usize, BitSet)>,
}

impl CycleBasis {
    /// Adds `vector` if it is independent of the rows accepted so far.
    fn try_insert(&mut self, mut vector: BitSet) -> bool {
        for (pivot, row) in &self.rows {
            if vector.get(*pivot) {
                vector.xor_assign(row);
            }
        }
        let Some(pivot) = vector.first_set() else {
            return false;
        };
        for (_, row) in &mut self.rows {
            if row.get(pivot) {
                row.xor_assign(&vector);
            }
        }
        self.rows.push((pivot, vector));
        true
    }
}

/// Computes the smallest set of smallest rings of the system's bond graph.
///
/// Every bond contributes the shortest cycle passing through it (up to
/// `max_ring_size` atoms) as a candidate. Candidates are ordered by size, then
/// by their sorted member atoms in file order, and accepted greedily when their
/// bond sets are linearly independent of the rings already accepted, until the
/// cyclomatic number `E - V + C` is reached.
///
/// # Return
///
/// Rings as atom lists in cycle order.
pub fn find_sssr(system: &MolecularSystem, max_ring_size: usize) -> Vec<Vec<AtomId>> {
    let graph = BondGraph::new(system);
    let cyclomatic =
        (graph.edges.len() + graph.connected_components()).saturating_sub(graph.atoms.len());
    if cyclomatic == 0 {
        return Vec::new();
    }

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut candidates: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
    for &(u, v) in &graph.edges {
        if let Some(cycle) = graph.shortest_cycle_through(u, v, max_ring_size) {
            let mut key = cycle.clone();
            key.sort_unstable();
            if seen.insert(key.clone()) {
                candidates.push((key, cycle));
            }
        }
    }
    candidates.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut basis = CycleBasis::default();
    let mut rings = Vec::with_capacity(cyclomatic);
    for (_, cycle) in candidates {
        if rings.len() == cyclomatic {
            break;
        }
        if basis.try_insert(graph.edge_vector(&cycle)) {
            rings.push(cycle.into_iter().map(|i| graph.atoms[i]).collect());
        }
    }
    rings
}

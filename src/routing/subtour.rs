//! Subtour detection: cycle decomposition of a selected-arc set.
//!
//! Every city carries a visited marker. The detector repeatedly starts at the
//! lowest unvisited city and follows successor links until the walk returns
//! to its start. Each walk takes at most `n` steps because every step visits
//! a new city; a walk that reaches an already-visited city other than its
//! start, or a city without a successor, is reported as an error instead of
//! looping.
//!
//! Total cost is O(n + arcs).

use crate::error::SubtourError;

/// Disjoint cycles covering every city exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtours {
    n: usize,
    cycles: Vec<Vec<usize>>,
}

impl Subtours {
    /// Cycles in discovery order, each in visiting order from its lowest
    /// city.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }

    /// Number of cycles.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether there are no cycles (empty instance).
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// The cycle with the fewest cities; the first one found on ties.
    pub fn shortest(&self) -> &[usize] {
        self.cycles
            .iter()
            .min_by_key(|c| c.len())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether one cycle covers all cities.
    pub fn is_hamiltonian(&self) -> bool {
        self.shortest().len() == self.n && self.n > 0
    }

    /// Consumes the decomposition, returning its cycles.
    pub fn into_cycles(self) -> Vec<Vec<usize>> {
        self.cycles
    }
}

/// Decomposes a successor graph given as directed arcs `(from, to)`.
///
/// Every city must have exactly one outgoing arc, and the arcs must form a
/// permutation.
///
/// # Examples
///
/// ```
/// use u_milp::routing::decompose_directed;
///
/// let subtours = decompose_directed(5, &[(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)]).unwrap();
/// assert_eq!(subtours.cycles(), &[vec![0, 1], vec![2, 3, 4]]);
/// assert_eq!(subtours.shortest(), &[0, 1]);
/// assert!(!subtours.is_hamiltonian());
/// ```
pub fn decompose_directed(n: usize, arcs: &[(usize, usize)]) -> Result<Subtours, SubtourError> {
    let mut successor: Vec<Option<usize>> = vec![None; n];
    for &(from, to) in arcs {
        check_range(from, n)?;
        check_range(to, n)?;
        if successor[from].replace(to).is_some() {
            return Err(SubtourError::DuplicateSuccessor { city: from });
        }
    }

    walk_all(n, |city, _prev| {
        successor[city].ok_or(SubtourError::MissingSuccessor { city })
    })
}

/// Decomposes a degree-2 graph given as undirected edges `{a, b}`.
///
/// Every city must have exactly two incident edges. Cycles are oriented
/// towards the first-listed neighbour of their start.
pub fn decompose_undirected(n: usize, edges: &[(usize, usize)]) -> Result<Subtours, SubtourError> {
    let mut neighbours: Vec<Vec<usize>> = vec![Vec::with_capacity(2); n];
    for &(a, b) in edges {
        check_range(a, n)?;
        check_range(b, n)?;
        neighbours[a].push(b);
        neighbours[b].push(a);
    }
    if let Some((city, adj)) = neighbours.iter().enumerate().find(|(_, adj)| adj.len() != 2) {
        return Err(SubtourError::WrongDegree {
            city,
            degree: adj.len(),
        });
    }

    walk_all(n, |city, prev| {
        let adj = &neighbours[city];
        Ok(match prev {
            Some(p) if adj[0] == p => adj[1],
            _ => adj[0],
        })
    })
}

fn check_range(city: usize, n: usize) -> Result<(), SubtourError> {
    if city < n {
        Ok(())
    } else {
        Err(SubtourError::UnknownCity { city, cities: n })
    }
}

/// Walks from every unvisited city until all cities are visited.
///
/// `next(city, previous)` yields the city after `city`.
fn walk_all(
    n: usize,
    mut next: impl FnMut(usize, Option<usize>) -> Result<usize, SubtourError>,
) -> Result<Subtours, SubtourError> {
    let mut visited = vec![false; n];
    let mut cycles = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut cycle = Vec::new();
        let mut prev = None;
        let mut current = start;
        loop {
            visited[current] = true;
            cycle.push(current);
            let following = next(current, prev)?;
            if following == start {
                break;
            }
            if visited[following] {
                return Err(SubtourError::OpenWalk { city: start });
            }
            prev = Some(current);
            current = following;
        }
        cycles.push(cycle);
    }

    Ok(Subtours { n, cycles })
}

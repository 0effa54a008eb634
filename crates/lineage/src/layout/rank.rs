//! Rank assignment: longest path from the sources.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Colour {
    White,
    Grey,
    Black,
}

/// Find edges closing a cycle, by position in the edge list.
///
/// Depth-first colouring, started from in-degree-0 nodes in graph order and
/// then from any node still unvisited. Children are visited in edge order, so
/// the same graph always yields the same back edges. Self-loops are always
/// back edges. Removing the returned edges leaves the graph acyclic.
pub(super) fn find_back_edges(outgoing: &[Vec<(usize, usize)>]) -> HashSet<usize> {
    let n = outgoing.len();
    let mut in_degree = vec![0usize; n];
    for &(target, _) in outgoing.iter().flatten() {
        in_degree[target] += 1;
    }

    let mut colour = vec![Colour::White; n];
    let mut back_edges = HashSet::new();
    let roots = (0..n).filter(|&v| in_degree[v] == 0).chain(0..n);

    for root in roots {
        if colour[root] != Colour::White {
            continue;
        }

        colour[root] = Colour::Grey;
        let mut stack = vec![(root, 0usize)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&(next, edge)) = outgoing[node].get(cursor) else {
                colour[node] = Colour::Black;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match colour[next] {
                Colour::White => {
                    colour[next] = Colour::Grey;
                    stack.push((next, 0));
                }
                Colour::Grey => {
                    back_edges.insert(edge);
                }
                Colour::Black => {}
            }
        }
    }

    back_edges
}

/// Longest-path ranks over an acyclic adjacency.
///
/// Kahn's algorithm: sources get rank 0 and every other node
/// `1 + max(rank of predecessors)`.
pub(super) fn assign_ranks(successors: &[Vec<usize>], predecessors: &[Vec<usize>]) -> Vec<usize> {
    let n = successors.len();
    let mut remaining: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut ranks = vec![0usize; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&v| remaining[v] == 0).collect();

    while let Some(node) = queue.pop_front() {
        for &next in &successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            remaining[next] -= 1;
            if remaining[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    ranks
}

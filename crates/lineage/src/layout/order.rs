//! Ordering within ranks: barycenter crossing reduction.

/// Per-node adjacency consumed by the ordering pass.
pub(super) struct OrderInput<'a> {
    pub ranks: &'a [usize],
    pub successors: &'a [Vec<usize>],
    pub predecessors: &'a [Vec<usize>],
    pub isolated: &'a [bool],
}

/// Order nodes within their ranks, returning each node's index in its rank.
///
/// Ranks start in graph order with isolated nodes last. Each pass sweeps
/// forward (placing rank `r` by its predecessors in `r - 1`) and then
/// backward (placing `r` by its successors in `r + 1`). A node's value is the
/// mean index of its neighbours in the adjacent rank, or its own index when it
/// has none there. Sorting is by `(isolated, value, graph index)`, so ties
/// fall back to graph order and isolated nodes stay at the end. Stops after a
/// pass that moves nothing, or after `max_sweeps` passes.
pub(super) fn order_ranks(input: &OrderInput<'_>, max_sweeps: usize) -> (Vec<usize>, usize) {
    let n = input.ranks.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    let rank_count = input.ranks.iter().copied().max().unwrap_or(0) + 1;
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for isolated_pass in [false, true] {
        for v in (0..n).filter(|&v| input.isolated[v] == isolated_pass) {
            buckets[input.ranks[v]].push(v);
        }
    }

    let mut position = vec![0usize; n];
    for bucket in &buckets {
        for (i, &v) in bucket.iter().enumerate() {
            position[v] = i;
        }
    }

    let mut sweeps = 0;
    while sweeps < max_sweeps {
        sweeps += 1;
        let mut changed = false;

        for r in 1..rank_count {
            changed |= reorder(
                &mut buckets[r],
                input.predecessors,
                r - 1,
                input,
                &mut position,
            );
        }
        for r in (0..rank_count - 1).rev() {
            changed |= reorder(
                &mut buckets[r],
                input.successors,
                r + 1,
                input,
                &mut position,
            );
        }

        if !changed {
            break;
        }
    }

    (position, sweeps)
}

/// Re-sort one rank by barycenter against `adjacent_rank`.
///
/// Returns whether the order changed.
#[allow(clippy::cast_precision_loss)]
fn reorder(
    bucket: &mut Vec<usize>,
    neighbours: &[Vec<usize>],
    adjacent_rank: usize,
    input: &OrderInput<'_>,
    position: &mut [usize],
) -> bool {
    let mut keyed: Vec<(bool, f64, usize)> = bucket
        .iter()
        .map(|&v| {
            let (sum, count) = neighbours[v]
                .iter()
                .filter(|&&u| input.ranks[u] == adjacent_rank)
                .fold((0usize, 0usize), |(sum, count), &u| {
                    (sum + position[u], count + 1)
                });
            let value = if count == 0 {
                position[v] as f64
            } else {
                sum as f64 / count as f64
            };
            (input.isolated[v], value, v)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));

    let reordered: Vec<usize> = keyed.into_iter().map(|(_, _, v)| v).collect();
    let changed = reordered != *bucket;
    for (i, &v) in reordered.iter().enumerate() {
        position[v] = i;
    }
    *bucket = reordered;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        ranks: Vec<usize>,
        successors: Vec<Vec<usize>>,
        predecessors: Vec<Vec<usize>>,
        isolated: Vec<bool>,
    }

    impl Fixture {
        fn new(ranks: Vec<usize>, edges: &[(usize, usize)]) -> Self {
            let n = ranks.len();
            let mut successors = vec![Vec::new(); n];
            let mut predecessors = vec![Vec::new(); n];
            for &(from, to) in edges {
                successors[from].push(to);
                predecessors[to].push(from);
            }
            let isolated = (0..n)
                .map(|v| successors[v].is_empty() && predecessors[v].is_empty())
                .collect();
            Self {
                ranks,
                successors,
                predecessors,
                isolated,
            }
        }

        fn order(&self, max_sweeps: usize) -> (Vec<usize>, usize) {
            order_ranks(
                &OrderInput {
                    ranks: &self.ranks,
                    successors: &self.successors,
                    predecessors: &self.predecessors,
                    isolated: &self.isolated,
                },
                max_sweeps,
            )
        }
    }

    #[test]
    fn uncrosses_swapped_pairs() {
        // rank 0: a(0) b(1); rank 1: x(2) y(3); edges a->y, b->x cross
        let fixture = Fixture::new(vec![0, 0, 1, 1], &[(0, 3), (1, 2)]);

        let (position, _) = fixture.order(4);

        // y follows a and x follows b, so y sits above x
        assert_eq!(position[3], 0);
        assert_eq!(position[2], 1);
        assert_eq!(position[0], 0);
        assert_eq!(position[1], 1);
    }

    #[test]
    fn isolated_nodes_go_last() {
        // node 0 is isolated, 1 -> 2 connected
        let fixture = Fixture::new(vec![0, 0, 1], &[(1, 2)]);

        let (position, _) = fixture.order(4);

        assert_eq!(position[1], 0);
        assert_eq!(position[0], 1);
        assert_eq!(position[2], 0);
    }

    #[test]
    fn zero_sweeps_keeps_graph_order() {
        let fixture = Fixture::new(vec![0, 0, 1, 1], &[(0, 3), (1, 2)]);

        let (position, sweeps) = fixture.order(0);

        assert_eq!(sweeps, 0);
        assert_eq!(position, vec![0, 1, 0, 1]);
    }

    #[test]
    fn stops_early_when_stable() {
        let fixture = Fixture::new(vec![0, 1, 2], &[(0, 1), (1, 2)]);

        let (_, sweeps) = fixture.order(4);

        assert_eq!(sweeps, 1);
    }

    #[test]
    fn empty_input() {
        let fixture = Fixture::new(Vec::new(), &[]);

        assert_eq!(fixture.order(4), (Vec::new(), 0));
    }
}

//! End-to-end lineage scenarios through the public API.
//!
//! Registry used throughout:
//! ```text
//! s1 (source) -> m1 (model) -> c1 (chart)
//! ```

use lineage::{
    EdgeKind, Graph, LayoutEngine, ObjectRecord, ObjectType, Registry, build, filter, selector,
};
use rstest::rstest;

fn scenario_registry() -> Registry {
    Registry::from_iter([
        ObjectRecord::new("s1", ObjectType::Source),
        ObjectRecord::new("m1", ObjectType::Model).depends_on(["s1"]),
        ObjectRecord::new("c1", ObjectType::Chart).depends_on(["m1"]),
    ])
}

fn select(registry: &Registry, input: &str) -> Graph {
    let graph = build(registry);
    let selected = selector::parse(input).select(&graph);
    filter(&graph, &selected)
}

fn node_ids(graph: &Graph) -> Vec<&str> {
    graph.node_ids().collect()
}

fn edge_ids(graph: &Graph) -> Vec<&str> {
    graph.edges().iter().map(|edge| edge.id.as_str()).collect()
}

#[test]
fn empty_selector_shows_everything_ranked_by_depth() {
    let registry = scenario_registry();
    let graph = build(&registry);
    let layout = LayoutEngine::default().run(&graph);

    let visible = select(&registry, "");

    assert_eq!(node_ids(&visible), vec!["s1", "m1", "c1"]);
    assert_eq!(edge_ids(&visible), vec!["s1->m1", "m1->c1"]);
    assert_eq!(layout.rank("s1"), Some(0));
    assert_eq!(layout.rank("m1"), Some(1));
    assert_eq!(layout.rank("c1"), Some(2));
}

// "+m1+" selects all three; a bare name is the zero-expansion case
#[test]
fn bare_name_selects_only_that_node() {
    let visible = select(&scenario_registry(), "m1");

    assert_eq!(node_ids(&visible), vec!["m1"]);
    assert!(visible.edges().is_empty());
}

#[test]
fn unbounded_in_both_directions_selects_full_lineage() {
    let visible = select(&scenario_registry(), "+m1+");

    assert_eq!(node_ids(&visible), vec!["s1", "m1", "c1"]);
    assert_eq!(edge_ids(&visible), vec!["s1->m1", "m1->c1"]);
}

#[test]
fn prefix_selects_ancestors() {
    let visible = select(&scenario_registry(), "+m1");

    assert_eq!(node_ids(&visible), vec!["s1", "m1"]);
    assert_eq!(edge_ids(&visible), vec!["s1->m1"]);
}

#[test]
fn suffix_selects_descendants() {
    let visible = select(&scenario_registry(), "m1+");

    assert_eq!(node_ids(&visible), vec!["m1", "c1"]);
    assert_eq!(edge_ids(&visible), vec!["m1->c1"]);
}

#[rstest]
#[case::unknown_name("ghost")]
#[case::unknown_with_expansion("+ghost+")]
#[case::garbage("++,,+")]
#[case::only_commas(",")]
fn unmatched_selectors_select_nothing(#[case] input: &str) {
    let visible = select(&scenario_registry(), input);

    assert!(visible.is_empty());
    assert!(visible.edges().is_empty());
}

#[test]
fn unknown_terms_do_not_disturb_known_ones() {
    let visible = select(&scenario_registry(), "ghost, c1, 1+");

    assert_eq!(node_ids(&visible), vec!["c1"]);
}

#[test]
fn dangling_dependency_is_omitted() {
    let registry = Registry::from_iter([
        ObjectRecord::new("s1", ObjectType::Source),
        ObjectRecord::new("m1", ObjectType::Model).depends_on(["s1", "deleted_source"]),
        ObjectRecord::new("c1", ObjectType::Chart).depends_on(["m1", "typo_insight"]),
    ]);

    let graph = build(&registry);

    assert_eq!(node_ids(&graph), vec!["s1", "m1", "c1"]);
    assert_eq!(edge_ids(&graph), vec!["s1->m1", "m1->c1"]);
}

#[rstest]
#[case::one_up("1+c1", &["m1", "c1"])]
#[case::two_up("2+c1", &["s1", "m1", "c1"])]
#[case::one_down("s1+1", &["s1", "m1"])]
#[case::union("s1, c1", &["s1", "c1"])]
#[case::overlap("+m1, m1+", &["s1", "m1", "c1"])]
fn bounded_and_combined_terms(#[case] input: &str, #[case] expected: &[&str]) {
    let visible = select(&scenario_registry(), input);

    assert_eq!(node_ids(&visible), expected);
}

#[test]
fn filtered_nodes_keep_full_graph_positions() {
    let registry = Registry::from_iter([
        ObjectRecord::new("s1", ObjectType::Source),
        ObjectRecord::new("s2", ObjectType::Source),
        ObjectRecord::new("m1", ObjectType::Model).depends_on(["s1"]),
        ObjectRecord::new("m2", ObjectType::Model).depends_on(["s2"]),
        ObjectRecord::new("d1", ObjectType::Dashboard).depends_on(["m1", "m2"]),
    ]);
    let mut cache = lineage::LineageCache::default();

    let full = cache.view(&registry, "").clone();
    let focused = cache.view(&registry, "+m2").clone();

    for node in &focused.nodes {
        let original = full.node(&node.id).expect("node present in full view");
        assert_eq!((node.x, node.y), (original.x, original.y));
    }
    assert_eq!(focused.nodes.len(), 2);
}

#[test]
fn inferred_default_source_edges_survive_filtering() {
    let registry = Registry::from_iter([
        ObjectRecord::new("warehouse", ObjectType::Source),
        ObjectRecord::new("orders", ObjectType::Model),
        ObjectRecord::new("orders_chart", ObjectType::Chart).depends_on(["orders"]),
    ]);
    let builder = lineage::GraphBuilder::new(lineage::BuildOptions {
        default_source: Some("warehouse".to_string()),
        ..lineage::BuildOptions::default()
    });
    let graph = builder.build(&registry);

    let selected = selector::parse("+orders_chart").select(&graph);
    let visible = filter(&graph, &selected);

    assert_eq!(
        node_ids(&visible),
        vec!["warehouse", "orders", "orders_chart"]
    );
    assert_eq!(visible.edges()[0].id, "warehouse->orders");
    assert_eq!(visible.edges()[0].kind, EdgeKind::Inferred);
    assert_eq!(visible.edges()[1].kind, EdgeKind::Explicit);
}

#[test]
fn edge_ids_stay_unique_when_names_contain_the_separator() {
    let registry = Registry::from_iter([
        ObjectRecord::new("a", ObjectType::Source),
        ObjectRecord::new("a->b", ObjectType::Source),
        ObjectRecord::new("b->c", ObjectType::Model).depends_on(["a"]),
        ObjectRecord::new("c", ObjectType::Model).depends_on(["a->b"]),
    ]);
    let mut cache = lineage::LineageCache::default();

    let view = cache.view(&registry, "");

    let ids: Vec<&str> = view.edges.iter().map(|edge| edge.id.as_str()).collect();
    assert_eq!(ids, vec!["a->b->c", "a->b->c#1"]);
    assert_eq!(
        (view.edges[1].source.as_str(), view.edges[1].target.as_str()),
        ("a->b", "c")
    );
}

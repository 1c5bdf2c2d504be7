//! Merging a static graph with a profile graph of the same program.

use std::path::PathBuf;

use surface_analysis::{load_profile, load_static, merge, Call, CallGraph, Environment, LoadSource};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn hello(name: &str) -> Call {
    Call::function(name, "./src/helloworld.c", Environment::C)
}

fn greetings(name: &str) -> Call {
    Call::function(name, "./src/greetings.c", Environment::C)
}

fn merged_helloworld() -> CallGraph {
    let cflow = load_static(fixture("helloworld_cflow.txt"), false).unwrap();
    let gprof = load_profile(fixture("helloworld_gprof.txt")).unwrap();
    merge(cflow, gprof)
}

fn topology(graph: &CallGraph) -> (Vec<Call>, Vec<(Call, Call)>) {
    let mut nodes: Vec<Call> = graph.calls().cloned().collect();
    nodes.sort();
    let mut edges: Vec<(Call, Call)> = graph
        .edges()
        .map(|(u, v, _)| (u.clone(), v.clone()))
        .collect();
    edges.sort();
    (nodes, edges)
}

/// A name-only profile node is folded into the static node with the same name.
#[test]
fn test_merge_fixes_name_only_nodes() {
    let cflow = load_static(
        LoadSource::text(
            "main() <int main (void) at ./src/helloworld.c:58>:\n    \
             GreeterSayHi() <void GreeterSayHi (Greeter *greeter) at ./src/helloworld.c:48>:\n        \
             printf()\n",
        ),
        false,
    )
    .unwrap();

    let mut gprof = CallGraph::new("profile");
    let profiled = Call::function("GreeterSayHi", "", Environment::C);
    let caller = Call::function("new_Greeter", "", Environment::C);
    gprof.add_edge(
        &caller,
        &profiled,
        surface_analysis::EdgeAttrs::call(surface_analysis::call_graph::Provenance::Gprof),
    );
    gprof.node_attrs_mut(&profiled).unwrap().tested = true;

    let merged = merge(cflow, gprof);
    let fixed = hello("GreeterSayHi");

    assert!(merged.contains(&fixed));
    assert!(!merged.contains(&profiled));
    assert!(merged.node_attrs(&fixed).unwrap().tested);
    assert!(merged.node_attrs(&fixed).unwrap().exit);
    assert!(merged.edge_attrs(&hello("main"), &fixed).is_some());
    assert!(merged.edge_attrs(&caller, &fixed).is_some());
    assert_eq!(merged.source(), "cflow: <text> - gprof: profile");
}

#[test]
fn test_merged_helloworld_nodes() {
    let graph = merged_helloworld();

    assert_eq!(graph.num_nodes(), 11);
    assert_eq!(graph.num_edges(), 28);
    assert!(graph.calls().all(|call| !call.signature().is_empty()));

    let mut untested: Vec<Call> = graph
        .nodes()
        .filter(|(_, attrs)| !attrs.tested)
        .map(|(call, _)| call.clone())
        .collect();
    untested.sort();
    assert_eq!(untested, vec![hello("functionPtr")]);

    assert_eq!(graph.entry_points(), vec![hello("greet_b")]);
    assert_eq!(graph.exit_points().len(), 6);
    assert_eq!(graph.errors().len(), 1);
    assert!(graph.node_attrs(&hello("main")).unwrap().frequency == Some(1));
    assert!(graph.node_attrs(&hello("functionPtr")).unwrap().frequency.is_none());
}

#[test]
fn test_merged_helloworld_edge_provenance() {
    let graph = merged_helloworld();

    let both = graph.edge_attrs(&hello("main"), &hello("GreeterSayHi")).unwrap();
    assert!(both.cflow && both.gprof && both.is_call);

    let static_only = graph.edge_attrs(&hello("main"), &hello("functionPtr")).unwrap();
    assert!(static_only.cflow && !static_only.gprof);

    let profile_only = graph
        .edge_attrs(&hello("new_Greeter"), &hello("GreeterSayHiTo"))
        .unwrap();
    assert!(profile_only.gprof && !profile_only.cflow);

    let recursion = graph
        .edge_attrs(&greetings("recursive_b"), &greetings("recursive_a"))
        .unwrap();
    assert!(recursion.cflow && recursion.gprof && recursion.is_call && recursion.is_return);
}

#[test]
fn test_merged_helloworld_degree() {
    let graph = merged_helloworld();
    assert_eq!(graph.get_degree(&hello("main")).unwrap(), (7, 7));
    assert_eq!(graph.get_degree(&hello("new_Greeter")).unwrap(), (3, 3));
    assert_eq!(graph.get_fan(&hello("main")).unwrap(), (0, 7));
    assert_eq!(graph.get_fan(&hello("new_Greeter")).unwrap(), (1, 2));
}

/// Swapping the inputs leaves nodes and edges unchanged.
#[test]
fn test_merge_topology_is_commutative() {
    let forward = merged_helloworld();
    let cflow = load_static(fixture("helloworld_cflow.txt"), false).unwrap();
    let gprof = load_profile(fixture("helloworld_gprof.txt")).unwrap();
    let swapped = CallGraph::from_merge(gprof, cflow, false);

    assert_eq!(topology(&forward), topology(&swapped));
}

#[test]
fn test_merge_with_fragmentation() {
    let cflow = load_static(fixture("helloworld_cflow.txt"), false).unwrap();
    let gprof = load_profile(fixture("helloworld_gprof.txt")).unwrap();
    let graph = CallGraph::from_merge(cflow, gprof, true);

    // Return edges make every connected program strongly connected.
    assert_eq!(graph.num_fragments(), Some(1));
    assert_eq!(graph.monolithicity(), Some(1.0));
    assert_eq!(graph.num_nodes(), 11);
}

#[test]
fn test_ambiguous_name_is_left_alone() {
    let cflow = load_static(
        LoadSource::text(
            "main() <int main (void) at ./a.c:1>:\n    \
             helper() <void helper (void) at ./a.c:9>\n    \
             other() <void other (void) at ./b.c:1>:\n        \
             helper() <void helper (void) at ./b.c:4>\n",
        ),
        false,
    )
    .unwrap();
    let mut gprof = CallGraph::new("profile");
    let helper = Call::function("helper", "", Environment::C);
    gprof.add_node(helper.clone(), Default::default());

    let merged = merge(cflow, gprof);
    assert!(merged.contains(&helper));
    assert_eq!(merged.num_nodes(), 5);
}

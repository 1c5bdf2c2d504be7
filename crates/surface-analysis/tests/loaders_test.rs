//! Loader tests: cflow trees, gprof reports, java-callgraph listings, and
//! multi-profile aggregation.

use std::path::PathBuf;

use surface_analysis::call_graph::Provenance;
use surface_analysis::{
    load_java, load_profile, load_profile_many, load_static, Call, CallGraph, CflowLoader,
    Environment, Granularity, LoadSource, LoaderOptions,
};
use surface_core::errors::LoadError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn c(name: &str, file: &str) -> Call {
    Call::function(name, file, Environment::C)
}

fn hello(name: &str) -> Call {
    c(name, "./src/helloworld.c")
}

fn greetings(name: &str) -> Call {
    c(name, "./src/greetings.c")
}

fn call_edges(graph: &CallGraph) -> Vec<(Call, Call)> {
    let mut edges: Vec<(Call, Call)> = graph
        .edges()
        .filter(|(_, _, attrs)| attrs.is_call)
        .map(|(u, v, _)| (u.clone(), v.clone()))
        .collect();
    edges.sort();
    edges
}

const TWO_FILES: &str = "\
main() <int main (void) at ./src/helloworld.c:5>:
    greet() <void greet (void) at ./src/greetings.c:3>:
        printf()
";

/// A two-file program: main calls greet, greet calls printf.
#[test]
fn test_static_trivial_program() {
    let graph = load_static(LoadSource::text(TWO_FILES), false).unwrap();
    let main = hello("main");
    let greet = greetings("greet");

    assert_eq!(graph.num_nodes(), 2);
    assert_eq!(call_edges(&graph), vec![(main.clone(), greet.clone())]);
    assert!(graph.node_attrs(&main).unwrap().is_empty());
    assert!(graph.node_attrs(&greet).unwrap().exit);
    assert!(graph.entry_points().is_empty());
    assert_eq!(graph.get_descendants(&main).unwrap(), vec![greet.clone()]);
    assert_eq!(graph.get_exit_point_reachability(&greet).unwrap(), 0.5);
}

/// A lone main calling getchar is an entry point that reaches nothing.
#[test]
fn test_static_getchar_entry() {
    let text = "main() <int main (void) at ./src/main.c:1>:\n    getchar()\n";
    let graph = load_static(LoadSource::text(text), false).unwrap();
    let main = c("main", "./src/main.c");

    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(graph.entry_points(), vec![main.clone()]);
    assert_eq!(graph.get_entry_point_reachability(&main).unwrap(), 0.0);
}

/// File granularity collapses functions onto their source file.
#[test]
fn test_static_file_granularity() {
    let loader = CflowLoader::new(LoadSource::text(TWO_FILES), false)
        .with_options(LoaderOptions::default().with_granularity(Granularity::File));
    let graph = CallGraph::from_loader(&loader, false).unwrap();
    let hello_c = Call::file("./src/helloworld.c", Environment::C);
    let greetings_c = Call::file("./src/greetings.c", Environment::C);

    assert_eq!(graph.num_nodes(), 2);
    assert_eq!(call_edges(&graph), vec![(hello_c.clone(), greetings_c.clone())]);
    assert_eq!(hello_c.identity(), "./src/helloworld.c");
    assert!(graph.calls().all(|call| call.name().is_empty() && !call.signature().is_empty()));
    assert!(graph.node_attrs(&greetings_c).unwrap().exit);
}

#[test]
fn test_static_helloworld_fixture() {
    let graph = load_static(fixture("helloworld_cflow.txt"), false).unwrap();

    assert_eq!(graph.num_nodes(), 11);
    assert_eq!(call_edges(&graph).len(), 13);
    assert!(graph.errors().is_empty());
    assert_eq!(graph.entry_points(), vec![hello("greet_b")]);

    let mut exits = graph.exit_points();
    exits.sort();
    let mut expected = vec![
        hello("GreeterSayHi"),
        hello("GreeterSayHiTo"),
        greetings("greet"),
        hello("main"),
        greetings("recursive_a"),
        greetings("recursive_b"),
    ];
    expected.sort();
    assert_eq!(exits, expected);

    assert!(!graph.contains(&c("printf", "")));
    assert!(!graph.contains(&c("malloc", "")));
    assert!(graph.calls().all(|call| !call.in_stdlib()));
    assert!(graph.nodes().all(|(_, attrs)| !attrs.tested && attrs.frequency.is_none()));

    let recursion = graph
        .edge_attrs(&greetings("recursive_a"), &greetings("recursive_b"))
        .unwrap();
    assert!(recursion.is_call && recursion.is_return);
}

/// `cflow -r` output of the same program yields the same caller → callee graph.
#[test]
fn test_static_reverse_matches_forward() {
    let forward = load_static(fixture("helloworld_cflow.txt"), false).unwrap();
    let reverse = load_static(fixture("helloworld_cflow_reverse.txt"), true).unwrap();

    assert_eq!(call_edges(&forward), call_edges(&reverse));
    assert_eq!(forward.num_edges(), reverse.num_edges());
    for (call, attrs) in forward.nodes() {
        assert_eq!(reverse.node_attrs(call), Some(attrs), "attributes of {call}");
    }
}

#[test]
fn test_static_missing_file() {
    let err = load_static(fixture("missing.txt"), false).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_profile_helloworld_fixture() {
    let graph = load_profile(fixture("helloworld_gprof.txt")).unwrap();

    assert_eq!(graph.num_nodes(), 10);
    assert_eq!(call_edges(&graph).len(), 14);
    assert!(!graph.contains(&c("functionPtr", "")));
    assert!(graph.nodes().all(|(_, attrs)| attrs.tested && attrs.frequency == Some(1)));
    assert!(graph
        .edges()
        .all(|(_, _, attrs)| attrs.gprof && !attrs.cflow));

    // `<spontaneous>` is not a function.
    assert_eq!(graph.errors().len(), 1);
    assert_eq!(graph.errors()[0].line(), 9);

    let cycle = graph
        .edge_attrs(&c("recursive_b", ""), &c("recursive_a", ""))
        .unwrap();
    assert!(cycle.is_call);
}

/// Two profiles that both saw factorial count it twice.
#[test]
fn test_profile_aggregation_frequency() {
    let paths = [fixture("multigprof_one.txt"), fixture("multigprof_two.txt")];
    let graph = load_profile_many(&paths, 2).unwrap();
    let at = |name: &str| c(name, "multigprof.c");

    let frequency = |name: &str| graph.node_attrs(&at(name)).unwrap().frequency;
    assert_eq!(frequency("main"), Some(2));
    assert_eq!(frequency("factorial"), Some(2));
    assert_eq!(frequency("fibonacci"), Some(1));

    assert_eq!(
        call_edges(&graph),
        vec![
            (at("factorial"), at("factorial")),
            (at("main"), at("factorial")),
            (at("main"), at("fibonacci")),
        ]
    );
    assert_eq!(graph.errors().len(), 2);
    assert!(graph.source().contains("multigprof_one.txt"));
}

/// The aggregate does not depend on the pool size.
#[test]
fn test_profile_aggregation_worker_count() {
    let paths = [
        fixture("multigprof_one.txt"),
        fixture("multigprof_two.txt"),
        fixture("multigprof_one.txt"),
    ];
    let single = load_profile_many(&paths, 1).unwrap();
    let pooled = load_profile_many(&paths, 8).unwrap();

    assert_eq!(call_edges(&single), call_edges(&pooled));
    let factorial = c("factorial", "multigprof.c");
    assert_eq!(single.node_attrs(&factorial).unwrap().frequency, Some(3));
    assert_eq!(pooled.node_attrs(&factorial).unwrap().frequency, Some(3));
}

#[test]
fn test_java_fixture() {
    let graph = load_java(fixture("helloandroid_javacg.txt"), &[]).unwrap();
    let main = |method: &str| {
        Call::function(method, "com.example.kevin.helloandroid.MainActivity", Environment::Android)
    };
    let greeter = |method: &str| {
        Call::function(method, "com.example.kevin.helloandroid.Greeter", Environment::Android)
    };

    assert_eq!(graph.num_nodes(), 11);
    assert!(graph.calls().all(|call| !call.in_stdlib()));

    let mut entries = graph.entry_points();
    entries.sort();
    assert_eq!(entries, vec![main("onActivityResultHandler"), main("onCreate")]);
    assert_eq!(graph.exit_points(), vec![main("sendMessage")]);

    let edge = graph
        .edge_attrs(&greeter("buildGreeting"), &greeter("sayHelloInSpanish"))
        .unwrap();
    assert!(edge.is_call);
    assert_eq!(main("onCreate").to_string(), "com.example.kevin.helloandroid.MainActivity.onCreate");
}

#[test]
fn test_java_package_filter() {
    let graph = load_java(
        fixture("helloandroid_javacg.txt"),
        &["com.example.kevin.helloandroid".to_string()],
    )
    .unwrap();
    assert_eq!(graph.num_nodes(), 9);
    assert!(graph
        .calls()
        .all(|call| call.package() == "com.example.kevin.helloandroid"));
}

#[test]
fn test_edge_provenance_tags() {
    let graph = load_static(LoadSource::text(TWO_FILES), false).unwrap();
    for (_, _, attrs) in graph.edges() {
        assert!(attrs.has(Provenance::Cflow.name()));
        assert!(!attrs.has("weight"));
    }
}

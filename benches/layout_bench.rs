use criterion::{black_box, criterion_group, criterion_main, Criterion};
use arena_atlas::graph::{GraphIndex, NodeRef};
use arena_atlas::interaction::similarity::similar_blocks;
use arena_atlas::layout::LayoutKind;
use serde_json::json;

const TYPES: [&str; 5] = ["Image", "Text", "Link", "Media", "Attachment"];
const TAGS: [&str; 8] = [
    "theme:sea", "theme:stone", "theme:sky", "medium:ink",
    "medium:photo", "mood:quiet", "mood:loud", "place:coast",
];

/// A deterministic graph with `channels` channels and `blocks` blocks,
/// roughly one block in eight linked to a second channel.
fn synthetic(channels: usize, blocks: usize) -> GraphIndex {
    let mut nodes = Vec::with_capacity(channels + blocks);
    let mut edges = Vec::with_capacity(blocks * 2);
    for c in 0..channels {
        nodes.push(json!({ "data": {
            "id": format!("c{c}"), "type": "channel", "label": format!("channel {c}")
        }}));
    }
    for b in 0..blocks {
        nodes.push(json!({ "data": {
            "id": format!("b{b}"),
            "type": TYPES[b % TYPES.len()],
            "label": format!("block {b}"),
            "createdAt": format!("20{:02}-01-01T00:00:00Z", 10 + b % 14),
            "autoTags": [TAGS[b % TAGS.len()], TAGS[(b * 3 + 1) % TAGS.len()]],
        }}));
        let home = b % channels;
        edges.push(json!({ "data": {
            "id": format!("e{b}"), "source": format!("c{home}"), "target": format!("b{b}")
        }}));
        if b % 8 == 0 {
            let other = (home + 1 + b / 8) % channels;
            edges.push(json!({ "data": {
                "id": format!("x{b}"), "source": format!("c{other}"), "target": format!("b{b}")
            }}));
        }
    }
    let payload = json!({ "elements": { "nodes": nodes, "edges": edges } });
    GraphIndex::from_json(&payload.to_string()).unwrap()
}

fn layout_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (channels, blocks) in [(10, 200), (40, 2_000), (120, 10_000)] {
        let graph = synthetic(channels, blocks);
        for kind in LayoutKind::ALL {
            group.bench_function(format!("{}_{blocks}", kind.name()), |b| {
                b.iter(|| black_box(kind.compute(black_box(&graph))))
            });
        }
    }
    group.finish();
}

fn query_benchmark(c: &mut Criterion) {
    let graph = synthetic(40, 2_000);
    c.bench_function("search_two_terms", |b| {
        b.iter(|| black_box(graph.search(black_box("sea quiet"))))
    });
    c.bench_function("bfs_path", |b| {
        b.iter(|| black_box(graph.bfs_path(NodeRef::Block(0), NodeRef::Block(1_999))))
    });
    c.bench_function("similar_blocks_top20", |b| {
        b.iter(|| black_box(similar_blocks(&graph, black_box(17), 20)))
    });
}

criterion_group!(benches, layout_benchmark, query_benchmark);
criterion_main!(benches);

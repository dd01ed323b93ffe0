//! This bench test simulates extracting acceptance criteria from a large
//! work-item description with a mix of GWT blocks, bullet lists, and
//! filler prose.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use criteria::{DocNode, ItemKey, extract_criteria};

/// Generates a large document tree with the shapes the pipeline has to
/// handle: headings, full and partial GWT paragraphs, and bullet lists.
fn build_document(sections: usize) -> DocNode {
    let mut children = Vec::new();

    for i in 0..sections {
        children.push(DocNode::heading(
            2,
            vec![DocNode::text(format!("Scenario {i}"))],
        ));
        children.push(DocNode::paragraph(vec![DocNode::text(format!(
            "GIVEN a user on page {i} WHEN they press save THEN revision {i} is stored"
        ))]));
        children.push(DocNode::paragraph(vec![DocNode::text(
            "GIVEN an incomplete scenario without the other keywords",
        )]));
        children.push(DocNode::bullet_list(vec![
            DocNode::list_item(vec![DocNode::text("The form should validate inline")]),
            DocNode::list_item(vec![DocNode::text("Errors must be announced to screen readers")]),
        ]));
        children.push(DocNode::paragraph(vec![DocNode::text(
            "Some connective prose that carries no requirement at all.",
        )]));
    }

    DocNode::other(children)
}

fn explicit_list(len: usize) -> Vec<String> {
    (0..len)
        .map(|i| format!("Stored criterion number {i}"))
        .collect()
}

fn extract_many(c: &mut Criterion) {
    let key: ItemKey = "PROJ-1".parse().unwrap();

    c.bench_function("extract 200 sections", |b| {
        b.iter_batched(
            || (build_document(200), explicit_list(50)),
            |(document, explicit)| {
                extract_criteria(Some(&document), Some(&explicit), &key);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, extract_many);
criterion_main!(benches);

use coderag_chunker::{ChunkType, Chunker, CodeChunk};
use pretty_assertions::assert_eq;

fn chunk(code: &str, file_path: &str) -> Vec<CodeChunk> {
    Chunker::default()
        .chunk_str(code, Some(file_path))
        .expect("chunking failed")
}

fn find<'a>(chunks: &'a [CodeChunk], name: &str) -> &'a CodeChunk {
    chunks
        .iter()
        .find(|c| c.name() == name)
        .unwrap_or_else(|| panic!("no chunk named {name}"))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn python_decorated_definitions_cover_the_decorator() {
    let code = r#"import functools

@functools.lru_cache(maxsize=None)
def fib(n, *, memo=None):
    """Fibonacci."""
    return n if n < 2 else fib(n - 1) + fib(n - 2)

@dataclass
class Point:
    x: int
    y: int
"#;
    let chunks = chunk(code, "math.py");

    let fib = find(&chunks, "fib");
    assert_eq!(fib.chunk_type(), ChunkType::Function);
    assert!(fib.content.starts_with("@functools.lru_cache"));
    assert_eq!(fib.start_line, 3);
    assert_eq!(fib.metadata.parameters, strings(&["n", "memo"]));
    assert_eq!(fib.metadata.docstring.as_deref(), Some("Fibonacci."));
    assert!(fib.metadata.references.function_calls.contains("fib"));
    assert!(fib.metadata.references.function_calls.contains("lru_cache"));

    let point = find(&chunks, "Point");
    assert_eq!(point.chunk_type(), ChunkType::Class);
    assert!(point.content.starts_with("@dataclass"));
    assert!(!point.metadata.references.class_instances.contains("Point"));
}

#[test]
fn python_class_references_exclude_own_name() {
    let code = r#"class Node:
    def child(self):
        return Node()

    class Meta:
        pass
"#;
    let chunks = chunk(code, "tree.py");
    let node = find(&chunks, "Node");

    assert!(!node.metadata.references.class_instances.contains("Node"));
    assert!(!node.metadata.references.function_calls.contains("Node"));
    assert!(node.metadata.references.class_instances.contains("Meta"));
}

#[test]
fn javascript_functions_classes_and_arrow_bindings() {
    let code = r#"import { api } from "./api";
import React from "react";

export class Cart {
  constructor() { this.items = []; }
  add(item) { this.items.push(item); }
}

export function total(items, tax = 0.2, ...extras) {
  return items.reduce((a, b) => a + b, 0) * (1 + tax);
}

const double = x => x * 2;

const render = ({ items }, options) => {
  const cart = new Cart();
  return api.draw(cart, options);
};

for (const item of list) {
  console.log(item);
}
"#;
    let chunks = chunk(code, "src/cart.js");
    let kinds: Vec<_> = chunks.iter().map(|c| (c.chunk_type(), c.name())).collect();

    assert_eq!(
        kinds,
        vec![
            (ChunkType::Import, "import_statements"),
            (ChunkType::Class, "Cart"),
            (ChunkType::Function, "total"),
            (ChunkType::Function, "double"),
            (ChunkType::Function, "render"),
            (ChunkType::LogicalBlock, "for_in_statement_block"),
        ]
    );

    assert_eq!(
        find(&chunks, "total").metadata.parameters,
        strings(&["items", "tax", "extras"])
    );
    assert_eq!(find(&chunks, "double").metadata.parameters, strings(&["x"]));

    let render = find(&chunks, "render");
    assert_eq!(
        render.metadata.parameters,
        strings(&["{ items }", "options"])
    );
    assert!(render.metadata.references.class_instances.contains("Cart"));
    assert!(render.metadata.references.function_calls.contains("draw"));
    assert_eq!(render.metadata.language.as_deref(), Some("javascript"));
}

#[test]
fn typescript_parameters_and_interfaces() {
    let code = r#"import { Shape } from "./shape";

export interface Sized {
  area(): number;
}

export abstract class Base implements Sized {
  abstract area(): number;
}

function scale(shape: Shape, factor?: number): Shape {
  return shape.resize(factor ?? 1);
}

type Pair = [number, number];
"#;
    let chunks = chunk(code, "geo.ts");

    assert_eq!(find(&chunks, "Sized").chunk_type(), ChunkType::Class);
    assert_eq!(find(&chunks, "Base").chunk_type(), ChunkType::Class);

    let scale = find(&chunks, "scale");
    assert_eq!(scale.metadata.parameters, strings(&["shape", "factor"]));
    assert!(scale.metadata.references.function_calls.contains("resize"));

    let last = chunks.last().unwrap();
    assert_eq!(last.chunk_type(), ChunkType::LogicalBlock);
    assert_eq!(last.content, "type Pair = [number, number];");
    assert_eq!(last.metadata.language.as_deref(), Some("typescript"));
}

#[test]
fn tsx_files_use_the_tsx_grammar() {
    let code = "export const App = (props: Props) => <div>{props.title}</div>;\n";
    let chunks = chunk(code, "App.tsx");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_type(), ChunkType::Function);
    assert_eq!(chunks[0].name(), "App");
    assert_eq!(chunks[0].metadata.parameters, strings(&["props"]));
    assert_eq!(chunks[0].metadata.language.as_deref(), Some("tsx"));
}

#[test]
fn rust_items_docs_and_parameters() {
    let code = r#"use std::fmt;
use std::collections::HashMap;

/// A point in the plane.
#[derive(Debug)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn scaled(&self, factor: f64) -> Point {
        Point { x: self.x * factor, y: self.y * factor }
    }
}

/// Distance between two points.
fn distance(a: &Point, b: &Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

const ORIGIN: Point = Point { x: 0.0, y: 0.0 };
"#;
    let chunks = chunk(code, "src/geo.rs");

    let imports = &chunks[0];
    assert_eq!(imports.chunk_type(), ChunkType::Import);
    assert_eq!(imports.content, "use std::fmt;\nuse std::collections::HashMap;");

    let point = chunks
        .iter()
        .find(|c| c.name() == "Point" && c.content.starts_with("pub struct"))
        .unwrap();
    assert_eq!(point.metadata.docstring.as_deref(), Some("A point in the plane."));

    let implementation = chunks
        .iter()
        .find(|c| c.name() == "Point" && c.content.starts_with("impl"))
        .unwrap();
    assert_eq!(implementation.chunk_type(), ChunkType::Class);
    assert!(implementation.metadata.references.class_instances.is_empty());

    let distance = find(&chunks, "distance");
    assert_eq!(distance.metadata.parameters, strings(&["a", "b"]));
    assert_eq!(
        distance.metadata.docstring.as_deref(),
        Some("Distance between two points.")
    );
    assert!(distance.metadata.references.function_calls.contains("sqrt"));

    let origin = chunks.last().unwrap();
    assert_eq!(origin.chunk_type(), ChunkType::LogicalBlock);
    assert!(origin.metadata.references.class_instances.contains("Point"));
}

#[test]
fn rust_inline_modules_are_segmented_in_place() {
    let code = r#"fn top() {}

mod inner {
    pub fn hidden(a: i32) -> i32 { a }
}

mod api {
    pub struct Car;

    impl Car {
        pub fn drive(&self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks() {}
}
"#;
    let chunks = chunk(code, "src/lib.rs");
    let names: Vec<_> = chunks.iter().map(|c| (c.chunk_type(), c.name())).collect();

    assert_eq!(
        names,
        vec![
            (ChunkType::Function, "top"),
            (ChunkType::Function, "hidden"),
            (ChunkType::Class, "Car"),
            (ChunkType::Class, "Car"),
            (ChunkType::Import, "import_statements"),
            (ChunkType::Function, "checks"),
        ]
    );

    let hidden = find(&chunks, "hidden");
    assert_eq!((hidden.start_line, hidden.end_line), (4, 4));
    assert_eq!(hidden.metadata.parameters, strings(&["a"]));
    assert_eq!(find(&chunks, "checks").start_line, 20);
}

#[test]
fn typescript_namespaces_and_enums() {
    let code = "namespace Shapes {\n  export function area(r: number) { return r * r; }\n}\n\nenum Color { Red, Green }\n";
    let chunks = chunk(code, "shapes.ts");
    let names: Vec<_> = chunks.iter().map(|c| (c.chunk_type(), c.name())).collect();

    assert_eq!(
        names,
        vec![(ChunkType::Function, "area"), (ChunkType::Class, "Color")]
    );
    assert_eq!(find(&chunks, "area").metadata.parameters, strings(&["r"]));
}

#[test]
fn rust_block_doc_comments_become_docstrings() {
    let code = "/**\n * Documented.\n */\nfn documented() {}\n";
    let chunks = chunk(code, "doc.rs");

    assert_eq!(chunks[0].metadata.docstring.as_deref(), Some("Documented."));
}

#[test]
fn syntax_errors_do_not_lose_the_file() {
    let code = "def ok(a):\n    return a\n\ndef broken(:\n    pass\n";
    let chunks = chunk(code, "broken.py");

    assert_eq!(find(&chunks, "ok").metadata.parameters, strings(&["a"]));
}

#[test]
fn flat_records_join_lists() {
    let chunks = chunk("def add(a, b):\n    return max(a, b)\n", "pkg/ops.py");
    let record = chunks[0].to_flat_record();

    assert_eq!(record["type"], "function");
    assert_eq!(record["name"], "add");
    assert_eq!(record["parameters"], "a,b");
    assert_eq!(record["function_calls"], "max");
    assert_eq!(record["class_instances"], "");
    assert_eq!(record["start_line"], "1");
    assert_eq!(chunks[0].record_id(), "pkg/ops.py_function_add_1");
}

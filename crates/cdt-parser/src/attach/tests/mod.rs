use super::*;


fn attach_default(source: &str) -> Vec<DocNode> {
    attach(source, None).expect("attachment should succeed")
}

fn attach_with(source: &str, options: ParseOptions) -> Vec<DocNode> {
    SourceParser::new(options)
        .attach(source, None)
        .expect("attachment should succeed")
}

fn paths(docs: &[DocNode]) -> Vec<&str> {
    docs.iter().map(|d| d.path.as_str()).collect()
}

fn texts(docs: &[DocNode]) -> Vec<&str> {
    docs.iter().map(|d| d.text.as_str()).collect()
}

fn find_by_path<'a>(docs: &'a [DocNode], path: &str) -> &'a DocNode {
    docs.iter().find(|d| d.path == path).unwrap_or_else(|| {
        panic!(
            "doc node {path:?} not found. Available paths:\n{}",
            paths(docs).join("\n")
        );
    })
}

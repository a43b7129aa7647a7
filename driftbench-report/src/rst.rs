//! reStructuredText Rendering
//!
//! Renders a benchmark definition as documentation blocks: setup and timed
//! statement as literal code blocks, plus an optional image directive
//! pointing at an externally generated plot.

use driftbench_core::Benchmark;

/// Indent every non-empty line of `text` by `by` spaces.
fn indent(text: &str, by: usize) -> String {
    let pad = " ".repeat(by);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a benchmark as rST documentation blocks.
///
/// The setup block is omitted when the benchmark has no setup text. Pass
/// `image_path` to append an image directive, typically for the plot
/// produced from this benchmark's history.
pub fn benchmark_entry(benchmark: &Benchmark, image_path: Option<&str>) -> String {
    let mut out = String::new();

    if !benchmark.setup().is_empty() {
        out.push_str("**Benchmark setup**\n\n");
        out.push_str(".. code-block:: rust\n\n");
        out.push_str(&indent(benchmark.setup().source(), 4));
        out.push_str("\n\n");
    }

    out.push_str("**Benchmark statement**\n\n");
    out.push_str(".. code-block:: rust\n\n");
    out.push_str(&indent(benchmark.code().source(), 4));
    out.push_str("\n\n");

    if let Some(path) = image_path {
        out.push_str("**Performance graph**\n\n");
        out.push_str(&format!(".. image:: {path}\n   :width: 6in\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbench_core::Snippet;

    fn bench(code: &str, setup: &str) -> Benchmark {
        Benchmark::new(Snippet::new(code, |_| Ok(())), Snippet::new(setup, |_| Ok(())))
    }

    #[test]
    fn entry_has_setup_and_statement_blocks() {
        let rst = benchmark_entry(&bench("sum(values)", "values = build()"), None);
        assert!(rst.contains("**Benchmark setup**"));
        assert!(rst.contains("**Benchmark statement**"));
        assert!(rst.contains(".. code-block:: rust"));
        assert!(rst.contains("    values = build()"));
        assert!(rst.contains("    sum(values)"));
        assert!(!rst.contains(".. image::"));
    }

    #[test]
    fn empty_setup_block_is_omitted() {
        let rst = benchmark_entry(&bench("sum(values)", ""), None);
        assert!(!rst.contains("**Benchmark setup**"));
        assert!(rst.contains("**Benchmark statement**"));
    }

    #[test]
    fn image_directive_appends_when_requested() {
        let rst = benchmark_entry(&bench("sum(values)", ""), Some("plots/sum.png"));
        assert!(rst.contains(".. image:: plots/sum.png"));
        assert!(rst.contains(":width: 6in"));
    }

    #[test]
    fn multiline_sources_indent_line_by_line() {
        let rst = benchmark_entry(&bench("first();\nsecond();", ""), None);
        assert!(rst.contains("    first();\n    second();"));
    }

    #[test]
    fn blank_interior_lines_stay_blank() {
        let indented = indent("a\n\nb", 4);
        assert_eq!(indented, "    a\n\n    b");
    }
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *emphasis*, **strong text**, `code`, and a [link](page.md).\n\n- Bullet point\n- [x] Done task\n1. Ordered item\n\n> [!NOTE]\n> An alert body line.\n\n> A plain quote.\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n|col|col|\n|---|---|\n|1|2|\n\n";
    base.repeat(size)
}

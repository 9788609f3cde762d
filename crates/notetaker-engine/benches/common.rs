// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let base = "# Meeting [notes][N]\n\n- call [Alice][A] about [the budget][B]\n- ask [Bob][BO] for [figures][F]\n  continued [line][L] here\n\n```\n[not][CODE]\n```\n\nPlain paragraph with [one link][P] and some filler text.\n\n";
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn row_count(text: &str) -> usize {
    text.lines().count()
}

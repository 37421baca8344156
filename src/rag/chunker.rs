/// Split text into paragraph chunks on blank-line boundaries, trimming each
/// chunk and dropping the empty ones.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

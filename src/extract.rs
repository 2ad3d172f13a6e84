//! Class-token extraction from markup.

use indexmap::IndexSet;

/// Collect the tokens of every `class="..."` (or `class='...'`) attribute in
/// `markup`, first occurrence order, without duplicates.
///
/// ```
/// use utilcss::extract_class_tokens;
///
/// let html = r#"<div class="row md-up:padding=2"><p class='row color=red'></p></div>"#;
/// assert_eq!(extract_class_tokens(html), vec!["row", "md-up:padding=2", "color=red"]);
/// ```
pub fn extract_class_tokens(markup: &str) -> Vec<String> {
    let mut tokens: IndexSet<&str> = IndexSet::new();
    for caps in regex!(r#"(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).captures_iter(markup) {
        let Some(list) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        tokens.extend(list.as_str().split_whitespace());
    }
    tokens.into_iter().map(str::to_string).collect()
}

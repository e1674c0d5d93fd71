/// Normalize a raw payload key into its canonical PascalCase name
///
/// Every character outside `[A-Za-z0-9]` separates words; the first letter of
/// each word is uppercased and the rest is kept as-is, then the words are
/// joined. Two keys that differ only in separators or leading case share a
/// canonical name, which is how fillers are looked up.
pub fn canonical_field_name(key: &str) -> String {
    key.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::with_capacity(word.len());
                    out.push(first.to_ascii_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

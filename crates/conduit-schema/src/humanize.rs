/// Turn a property key such as `first_name` or `postId` into a label (`First Name`, `Post Id`)
pub fn humanize_field_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        match ch {
            '_' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    spaced.split_whitespace().map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            std::iter::once(first.to_ascii_uppercase()).chain(chars.map(|c| c.to_ascii_lowercase())).collect()
        }
        None => String::new(),
    }
}

use tera::Tera;

const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*");

/// Loads every page template shipped with the crate.
pub fn load() -> tera::Result<Tera> {
    let mut tera = Tera::new(TEMPLATES)?;
    tera.set_escape_fn(escape_html);
    Ok(tera)
}

/// Like tera's default escaping, but leaves `/` alone so paths and dates stay readable.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(
            escape_html("<a href=\"/movie/1\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;/movie/1&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn all_pages_load() {
        let tera = load().unwrap();
        let mut names = tera.get_template_names().collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["base.html", "delete.html", "detail.html", "form.html", "index.html", "list.html"]
        );
    }
}

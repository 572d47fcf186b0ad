//! Named placeholder substitution.
//!
//! Templates use `{name}` placeholders. Placeholders without a matching
//! substitution are left in place, and `{{` / `}}` produce literal braces.

/// Renders a template with the given substitutions.
///
/// Substituted values are inserted verbatim; braces inside a value are not
/// interpreted.
#[must_use]
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail.find('}') {
                Some(end) => {
                    let name = &tail[1..end];
                    match substitutions.iter().find(|(key, _)| *key == name) {
                        Some((_, value)) => out.push_str(value),
                        None => out.push_str(&tail[..=end]),
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_named_placeholders() {
        let rendered = render(
            "{item_name} for {item_price} by {username}",
            &[
                ("item_name", "Bike"),
                ("item_price", "50"),
                ("username", "alice"),
            ],
        );
        assert_eq!(rendered, "Bike for 50 by alice");
    }

    #[test]
    fn repeated_placeholder() {
        assert_eq!(render("{a}-{a}", &[("a", "x")]), "x-x");
    }

    #[test]
    fn unknown_placeholder_is_kept() {
        assert_eq!(render("hello {who}", &[]), "hello {who}");
    }

    #[test]
    fn escaped_braces() {
        assert_eq!(render("{{literal}} {a}", &[("a", "1")]), "{literal} 1");
    }

    #[test]
    fn values_are_not_reinterpreted() {
        assert_eq!(
            render("{a} {b}", &[("a", "{b}"), ("b", "2")]),
            "{b} 2"
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(render("price {item", &[("item", "x")]), "price {item");
    }

    #[test]
    fn multibyte_text_around_placeholders() {
        assert_eq!(render("Товар: {n} ✓", &[("n", "Велосипед")]), "Товар: Велосипед ✓");
    }
}

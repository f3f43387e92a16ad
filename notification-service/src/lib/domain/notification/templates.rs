/// Subject and HTML body of the welcome email.
pub fn welcome_email(product_name: &str, username: &str) -> (String, String) {
    let subject = format!("Welcome to {}", product_name);
    let body = format!(
        "<h1>Hello, {}!</h1><p>Welcome to {}.</p>",
        escape_html(username),
        escape_html(product_name)
    );
    (subject, body)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_email_greets_user() {
        let (subject, body) = welcome_email("Acme", "alice");
        assert_eq!(subject, "Welcome to Acme");
        assert_eq!(body, "<h1>Hello, alice!</h1><p>Welcome to Acme.</p>");
    }

    #[test]
    fn test_username_is_escaped() {
        let (_, body) = welcome_email("Acme", "<script>alert('x')</script>");
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}

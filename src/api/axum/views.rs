use crate::gate::paths;
use crate::session::User;

pub(super) fn index(user: &User) -> String {
    let greeting = if user.authenticated {
        format!(
            "<p>Signed in as {}.</p>\n<p><a href=\"{}\">secret</a> | <a href=\"{}\">log out</a></p>",
            escape(&user.user_name),
            paths::SECRET,
            paths::LOGOUT
        )
    } else {
        format!(
            "<form method=\"post\" action=\"{}\">\n\
             <input name=\"username\" placeholder=\"username\">\n\
             <input name=\"code\" placeholder=\"code\">\n\
             <button type=\"submit\">log in</button>\n\
             </form>",
            paths::LOGIN
        )
    };
    page("Welcome", &greeting)
}

pub(super) fn secret(user_name: &str) -> String {
    let body = format!(
        "<p>Hello {}, the secret is safe with you.</p>\n<p><a href=\"{}\">log out</a></p>",
        escape(user_name),
        paths::LOGOUT
    );
    page("Secret", &body)
}

pub(super) fn forbidden(messages: &[String]) -> String {
    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>\n", escape(message)))
        .collect();
    let body = format!(
        "<ul>\n{items}</ul>\n<p><a href=\"{}\">back</a></p>",
        paths::HOME
    );
    page("Forbidden", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body></html>\n"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

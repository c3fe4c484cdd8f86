use crate::domain::badges::Badge;
use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn badge(b: Badge) -> Markup {
    html! {
        span class=(b.class) { (b.label) }
    }
}

pub fn progress_bar(percent: u8) -> Markup {
    html! {
        div class="progress" title=(format!("{percent}%")) {
            div class="progress-fill" style=(format!("width: {percent}%;")) {}
        }
        span class="progress-label" { (percent) "%" }
    }
}

/// Builds a link with form-encoded query parameters.
pub fn href(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

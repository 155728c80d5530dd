use maud::{html, Markup};
use std::error::Error;

/// Failure report: the title, then the error and each of its causes.
pub fn error_email(title: &str, err: &(dyn Error + 'static)) -> Markup {
    let chain = std::iter::successors(Some(err), |e| (*e).source());

    html! {
        h1 { (title) }
        ul {
            @for cause in chain {
                li { (cause.to_string()) }
            }
        }
    }
}

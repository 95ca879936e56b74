use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    ty: Option<&'static str>,
    placeholder: &'static str,
    value: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input type=(ty.unwrap_or("text")) id=(id) name=(id) placeholder=(placeholder) value=(value) class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
        },
    )
}

/// A centred dialog over a darkened backdrop. `backdrop_post` is where a click on the backdrop goes.
pub fn modal(z_index: &'static str, backdrop_post: &'static str, contents: Markup) -> Markup {
    html! {
        div class={"fixed inset-0 flex items-center justify-center " (z_index)} {
            div class="absolute inset-0 bg-black/60" hx-post=(backdrop_post) hx-target="#roster" {}
            div class="relative bg-gray-800 p-6 rounded shadow-xl max-w-md w-full" {
                (contents)
            }
        }
    }
}

/// htmx `hx-vals` carrying a single id, escaped as JSON.
pub fn id_vals(id: &str) -> String {
    serde_json::json!({ "id": id }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_vals_escapes_quotes() {
        assert_eq!(id_vals("a\"b"), r#"{"id":"a\"b"}"#);
    }
}

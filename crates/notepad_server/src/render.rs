//! Minimal HTML pages for browser-driven form flows.

use notepad_core::NotepadRecord;
use std::fmt::Write;

pub const EMPTY_LIST_MESSAGE: &str = "You have no notepads.";

pub fn list_page(notepads: &[NotepadRecord]) -> String {
    let mut content = String::from("<h1>My notepads</h1>\n");
    content.push_str("<p><a href=\"/notepad/create\">New notepad</a></p>\n");
    if notepads.is_empty() {
        let _ = writeln!(content, "<p>{EMPTY_LIST_MESSAGE}</p>");
    } else {
        content.push_str("<ul>\n");
        for notepad in notepads {
            let _ = writeln!(
                content,
                "<li><a href=\"/notepad/{id}\">{title}</a><p>{body}</p></li>",
                id = notepad.id,
                title = escape_html(&notepad.title),
                body = escape_html(&notepad.body),
            );
        }
        content.push_str("</ul>\n");
    }
    page("Notepads", &content)
}

pub fn detail_page(notepad: &NotepadRecord) -> String {
    let content = format!(
        "<h1>{title}</h1>\n<p>{body}</p>\n\
         <p><a href=\"/notepad/edit/{id}\">Edit</a></p>\n\
         <form method=\"post\" action=\"/notepad/delete/{id}\"><button type=\"submit\">Delete</button></form>\n\
         <p><a href=\"/notepad\">Back</a></p>\n",
        id = notepad.id,
        title = escape_html(&notepad.title),
        body = escape_html(&notepad.body),
    );
    page(&notepad.title, &content)
}

pub fn create_form_page() -> String {
    page("New notepad", &form("/notepad/create", "", "", "Create"))
}

pub fn edit_form_page(notepad: &NotepadRecord) -> String {
    let action = format!("/notepad/edit/{}", notepad.id);
    page(
        "Edit notepad",
        &form(&action, &notepad.title, &notepad.body, "Save"),
    )
}

fn form(action: &str, title: &str, body: &str, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Title <input name=\"title\" value=\"{title}\" required></label>\n\
         <label>Body <textarea name=\"body\">{body}</textarea></label>\n\
         <button type=\"submit\">{submit}</button>\n\
         </form>\n",
        title = escape_html(title),
        body = escape_html(body),
    )
}

fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{content}</body>\n</html>\n",
        escape_html(title)
    )
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

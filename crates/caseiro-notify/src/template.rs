use crate::error::{NotifyError, Result};
use crate::utils::truncate_chars;
use caseiro_common::types::AlertRecord;
use handlebars::Handlebars;
use serde::Serialize;

const SUBJECT_PREFIX: &str = "Caseiro 2º — Alert: ";
const SUBJECT_ALERT_CHARS: usize = 60;
const MISSING_ALERT: &str = "—";
const HTML_TEMPLATE: &str = "alert_email_html";

const HTML_BODY: &str = r#"<h2>Caseiro 2º — Alert</h2>
<p><b>Message:</b></p>
<div class="alert-message">{{{message_html}}}</div>
<p><b>File:</b> {{file_uri}}</p>
<p><a href="{{presigned_url}}">Open object (pre-signed)</a></p>
<pre style="white-space:pre-wrap">{{pretty_json}}</pre>
"#;

/// Subject and both bodies of an alert email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Serialize)]
struct HtmlContext<'a> {
    message_html: String,
    file_uri: &'a str,
    presigned_url: &'a str,
    pretty_json: &'a str,
}

/// Renders alert records into email content.
pub struct AlertEmailRenderer {
    registry: Handlebars<'static>,
}

impl AlertEmailRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(HTML_TEMPLATE, HTML_BODY)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Agent answers are often markdown; raw HTML inside them is kept as text.
    pub fn markdown_to_html(markdown: &str) -> String {
        use pulldown_cmark::{html, Event, Options, Parser};

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(markdown, options).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }

    pub fn subject(alert: &AlertRecord) -> String {
        let text = alert.alert_text().unwrap_or_default();
        format!("{SUBJECT_PREFIX}{}", truncate_chars(text, SUBJECT_ALERT_CHARS))
    }

    pub fn text_body(alert: &AlertRecord, file_uri: &str) -> String {
        format!(
            "Alert message:\n{}\n\nFile: {}\nLink: {}\n\nFull JSON:\n{}\n",
            alert.alert_text().unwrap_or(MISSING_ALERT),
            file_uri,
            alert.presigned_url,
            alert.pretty_data()
        )
    }

    pub fn html_body(&self, alert: &AlertRecord, file_uri: &str) -> Result<String> {
        let pretty_json = alert.pretty_data();
        let context = HtmlContext {
            message_html: Self::markdown_to_html(alert.alert_text().unwrap_or(MISSING_ALERT)),
            file_uri,
            presigned_url: &alert.presigned_url,
            pretty_json: &pretty_json,
        };
        self.registry
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// `file_uri` is the `s3://bucket/key` location shown in the body.
    pub fn render(&self, alert: &AlertRecord, file_uri: &str) -> Result<RenderedEmail> {
        Ok(RenderedEmail {
            subject: Self::subject(alert),
            text_body: Self::text_body(alert, file_uri),
            html_body: self.html_body(alert, file_uri)?,
        })
    }
}

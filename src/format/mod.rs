//! Bot reply formatting.
//!
//! Structured replies are rendered to markdown in three optional sections:
//! the question in bold, a name/value table of the collected details and a
//! bulleted list of suggested options. Field names and value codes pass
//! through [`field_label`] / [`value_label`].

mod labels;

pub use labels::{field_label, value_label};

use pulldown_cmark::{Options, Parser};

use crate::backend::{BotReply, StructuredReply};

/// Heading above the details table ("request details").
const DETAILS_HEADING: &str = "**تفاصيل الطلب:**";
/// Table header: name / value.
const TABLE_HEADER: &str = "| الاسم | القيمة |\n| --- | --- |";
/// Heading above the options list ("suggested options").
const OPTIONS_HEADING: &str = "**الخيارات المقترحة:**";

/// Text of the bot message for a backend reply.
#[must_use]
pub fn reply_text(reply: &BotReply) -> String {
    match reply {
        BotReply::Text(text) => text.clone(),
        BotReply::Structured(structured) => format_structured(structured),
        BotReply::Other(value) => {
            tracing::warn!(reply = %value, "Reply is neither text nor object");
            String::new()
        }
    }
}

/// Render a structured reply as markdown. Empty sections are omitted.
#[must_use]
pub fn format_structured(reply: &StructuredReply) -> String {
    let mut md = String::new();

    if let Some(question) = reply.question.as_deref().filter(|q| !q.is_empty()) {
        md.push_str(&format!("**{question}**\n\n"));
    }

    if !reply.display_params.is_empty() {
        md.push_str(DETAILS_HEADING);
        md.push_str("\n\n");
        md.push_str(TABLE_HEADER);
        md.push('\n');
        for param in &reply.display_params {
            md.push_str(&format!(
                "| {} | {} |\n",
                table_cell(field_label(&param.name)),
                table_cell(value_label(&param.value)),
            ));
        }
        md.push('\n');
    }

    if !reply.suggested_actions.is_empty() {
        md.push_str(OPTIONS_HEADING);
        md.push('\n');
        for action in &reply.suggested_actions {
            md.push_str(&format!("- {}\n", value_label(action)));
        }
        md.push('\n');
    }

    md
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Render markdown to HTML.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Writing direction of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for the HTML `dir` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// `Rtl` when the text contains any character from the Arabic block.
#[must_use]
pub fn text_direction(text: &str) -> TextDirection {
    if text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

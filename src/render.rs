//! HTML output: summary markdown to safe HTML, and the index page.

use chrono::Utc;
use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use serde::Serialize;

use crate::digest::{Digest, SummarizedPaper};
use crate::error::Result;
use crate::topics::Topic;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../templates/index.html"))
        .expect("Failed to parse index template");
    env
});

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

#[derive(Serialize)]
struct PaperView<'a> {
    title: &'a str,
    link: String,
    summary_html: String,
}

#[derive(Serialize)]
struct TopicOption {
    label: &'static str,
    checked: bool,
}

/// Markdown to HTML that can go straight into the page. Raw HTML in the
/// input comes out escaped and script-like link targets become `#`.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralise(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralise(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn neutralise(url: CowStr<'_>) -> CowStr<'_> {
    let lowered = url.trim_start().to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

fn views(papers: &[SummarizedPaper]) -> Vec<PaperView<'_>> {
    papers
        .iter()
        .map(|p| PaperView {
            title: &p.title,
            link: neutralise(CowStr::Borrowed(&p.link)).into_string(),
            summary_html: markdown_to_html(&p.summary),
        })
        .collect()
}

pub fn render_page(digest: &Digest) -> Result<String> {
    let topics: Vec<TopicOption> = Topic::ALL
        .into_iter()
        .map(|t| TopicOption {
            label: t.label(),
            checked: digest.selected_topics.contains(&t.label()),
        })
        .collect();

    let page = TEMPLATES.get_template("index.html")?.render(context! {
        topics => topics,
        selected_topics => digest.selected_topics,
        arxiv_papers => views(&digest.arxiv_papers),
        jmlr_papers => views(&digest.jmlr_papers),
        generated_at => Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
    })?;
    Ok(page)
}

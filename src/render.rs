//! Render a combined state as an HTML page of collapsible sections
//!
//! Every provider becomes one accordion section. Flat providers show their
//! bibliographic information and volume lists directly; layered providers
//! show one nested section per `Resource-N` layer. Section ids are derived
//! from the provider index and the resource key so toggles stay independent.

use crate::html::{Element, Node};
use crate::merge::{CombinedState, ProviderEntry};
use crate::record::{display_scalar, ProviderRecord, VolumeRecord};
use crate::vocab::{OCR_VIEWER_BASE_URL, PROVIDER_HEADING};

const BOOTSTRAP_BUNDLE_URL: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/js/bootstrap.bundle.min.js";

const STYLESHEET: &str = r#"
:root {
  --primary: #36864f;
  --primary-dark: #1c6c35;
  --primary-light: #e3e3e3;
  --bs-accordion-border-color: var(--primary-light);
  --bs-accordion-border-width: 1px;
  --bs-accordion-border-radius: 0.25rem;
  --bs-accordion-inner-border-radius: calc(0.25rem - 1px);
  --bs-accordion-btn-padding-x: 1.25rem;
  --bs-accordion-btn-padding-y: 1rem;
  --bs-accordion-btn-color: #212529;
  --bs-accordion-btn-bg: var(--primary-light);
  --bs-accordion-btn-active-color: #fff;
  --bs-accordion-btn-active-bg: var(--primary);
  --bs-accordion-btn-focus-border-color: var(--primary-dark);
  --bs-accordion-body-padding-x: 1.25rem;
  --bs-accordion-body-padding-y: 1rem;
  --bs-accordion-body-color: #212529;
  --bs-accordion-body-bg: #fff;
  --bs-collapse-transition-duration: 0.35s;
}
.accordion-item {
  background-color: var(--bs-accordion-body-bg);
  border: var(--bs-accordion-border-width) solid var(--bs-accordion-border-color);
  border-radius: var(--bs-accordion-border-radius);
  margin-bottom: 0.5rem;
}
.accordion-item:last-of-type {
  margin-bottom: 0;
}
.accordion-header {
  margin-bottom: 0;
}
.accordion-button {
  position: relative;
  display: flex;
  align-items: center;
  width: 100%;
  padding: var(--bs-accordion-btn-padding-y) var(--bs-accordion-btn-padding-x);
  color: var(--bs-accordion-btn-color);
  text-align: left;
  background-color: var(--bs-accordion-btn-bg);
  border: 0;
  border-radius: var(--bs-accordion-inner-border-radius);
  overflow-anchor: none;
  transition: background-color 0.15s ease-in-out;
}
.accordion-button:not(.collapsed) {
  color: var(--bs-accordion-btn-active-color);
  background-color: var(--bs-accordion-btn-active-bg);
  box-shadow: inset 0 -1px 0 rgba(0, 0, 0, 0.125);
}
.accordion-button:focus {
  z-index: 3;
  border-color: var(--bs-accordion-btn-focus-border-color);
  outline: 0;
  box-shadow: 0 0 0 0.25rem rgba(13, 110, 253, 0.25);
}
.accordion-button::after {
  flex-shrink: 0;
  width: 1.25rem;
  height: 1.25rem;
  margin-left: auto;
  content: "";
  background-image: url("data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' fill='%23212529' viewBox='0 0 16 16'%3E%3Cpath fill-rule='evenodd' d='M1.5 6a.5.5 0 0 1 .5-.5h12a.5.5 0 0 1 .354.854l-6 6a.5.5 0 0 1-.708 0l-6-6A.5.5 0 0 1 1.5 6z'/%3E%3C/svg%3E");
  background-repeat: no-repeat;
  background-size: 1.25rem;
  transition: transform 0.2s ease-in-out;
}
.accordion-button:not(.collapsed)::after {
  transform: rotate(180deg);
}
.accordion-collapse {
  border-top: var(--bs-accordion-border-width) solid var(--bs-accordion-border-color);
}
.accordion-body {
  padding: var(--bs-accordion-body-padding-y) var(--bs-accordion-body-padding-x);
  color: var(--bs-accordion-body-color);
  background-color: var(--bs-accordion-body-bg);
}
.collapse {
  display: none;
}
.collapse.show {
  display: block;
}
.collapsing {
  height: 0;
  overflow: hidden;
  transition: height var(--bs-collapse-transition-duration) ease;
}
"#;

// Moves the embedded page below the first <dl> of the hosting repository page.
const RELOCATE_SCRIPT: &str = r#"
window.addEventListener('DOMContentLoaded', function() {
  var mediaRenderDiv = document.querySelector('.media-render.recore');
  var dlElement = document.querySelector('dl');
  if (mediaRenderDiv && dlElement) {
    dlElement.parentNode.insertBefore(mediaRenderDiv, dlElement.nextSibling);
  }
});
"#;

/// Options for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Viewer URL prefix; the METS identifier is appended verbatim
    pub viewer_base_url: String,
    /// Heading shown above each provider section
    pub heading: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewer_base_url: OCR_VIEWER_BASE_URL.to_string(),
            heading: PROVIDER_HEADING.to_string(),
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Pretty-printed markup, ready to be written to disk
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n");
        html.push_str(&self.root.to_pretty_string());
        html
    }
}

/// Render all providers of `state` into one page
pub fn render(state: &CombinedState, options: &RenderOptions) -> Document {
    let mut accordion = Element::new("div")
        .class("accordion")
        .id("accordionProviders");

    for (index, (name, entry)) in state.iter().enumerate() {
        let provider_id = format!("provider-{}", index);
        accordion.push(
            Element::new("h4").child(Element::new("span").class("title").text(&options.heading)),
        );
        accordion.push(render_provider(name, entry, &provider_id, options));
    }

    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("style").child(Node::raw(STYLESHEET)))
        .child(Element::new("script").child(Node::raw(RELOCATE_SCRIPT)))
        .child(Element::new("script").attr("src", BOOTSTRAP_BUNDLE_URL));

    let root = Element::new("html")
        .child(head)
        .child(Element::new("body").child(accordion));

    Document { root }
}

fn render_provider(
    name: &str,
    entry: &ProviderEntry,
    provider_id: &str,
    options: &RenderOptions,
) -> Element {
    let body = match entry {
        ProviderEntry::Flat(record) => render_record(record, provider_id, options),
        ProviderEntry::Layered(layers) => layers
            .iter()
            .map(|(key, record)| {
                Node::from(render_resource(key, &id_fragment(key), record, provider_id, options))
            })
            .collect(),
    };
    collapsible(provider_id, name, body)
}

fn render_resource(
    key: &str,
    fragment: &str,
    record: &ProviderRecord,
    parent_id: &str,
    options: &RenderOptions,
) -> Element {
    let id = format!("{}-{}", fragment, parent_id);
    let body = render_record(record, &id, options);
    collapsible(&id, key, body)
}

/// Bibliographic info, volume lists and nested resource layers of a record
fn render_record(record: &ProviderRecord, parent_id: &str, options: &RenderOptions) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();

    if let Some(info) = record.bibliographic_info() {
        let items = info.iter().map(|(field, value)| {
            Element::new("li")
                .child(Element::new("strong").text(format!("{}:", field)))
                .text(display_scalar(value))
        });
        nodes.push(
            collapsible(
                &format!("bibliographic-{}", parent_id),
                "Bibliographic Information",
                vec![Node::from(Element::new("ul").children(items))],
            )
            .into(),
        );
    }

    if let Some(groups) = record.volume_groups() {
        for (index, (title, volumes)) in groups.iter().enumerate() {
            let items = volumes.iter().map(|v| render_volume(v, options));
            nodes.push(
                collapsible(
                    &format!("volumes-{}-{}", index, parent_id),
                    &format!("List of Volumes - {}", title),
                    vec![Node::from(Element::new("ul").children(items))],
                )
                .into(),
            );
        }
    }

    for (index, (key, nested)) in record.nested_resources().into_iter().enumerate() {
        let mut fragment = id_fragment(&key);
        if fragment != key {
            fragment = format!("{}-{}", fragment, index);
        }
        nodes.push(render_resource(&key, &fragment, &nested, parent_id, options).into());
    }

    nodes
}

/// Id-safe form of a resource key: anything outside `[A-Za-z0-9_-]` becomes `-`
fn id_fragment(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn render_volume(volume: &VolumeRecord, options: &RenderOptions) -> Element {
    let mut item = Element::new("li").child(Element::new("strong").text(format!(
        "{} ({}):",
        volume.volume_label(),
        volume.year_label()
    )));

    let mut links = Vec::new();
    if let Some(url) = volume.source_url() {
        links.push(Element::new("a").attr("href", url).text("View Source"));
    }
    if let Some(mets) = volume.mets_id() {
        links.push(
            Element::new("a")
                .attr("href", format!("{}{}", options.viewer_base_url, mets))
                .text("Open with OCR-Viewer"),
        );
        links.push(Element::new("a").attr("href", mets).text("View METS"));
    }

    for (i, link) in links.into_iter().enumerate() {
        if i > 0 {
            item.push(Node::text("|"));
        }
        item.push(link);
    }
    item
}

/// One accordion item: a toggle button and a collapsed body
fn collapsible(id: &str, title: &str, body: Vec<Node>) -> Element {
    let heading_id = format!("heading-{}", id);
    let collapse_id = format!("collapse-{}", id);

    let button = Element::new("button")
        .class("accordion-button collapsed")
        .attr("type", "button")
        .attr("data-bs-toggle", "collapse")
        .attr("data-bs-target", format!("#{}", collapse_id))
        .attr("aria-expanded", "false")
        .attr("aria-controls", collapse_id.as_str())
        .text(title);

    Element::new("div")
        .class("accordion-item")
        .child(
            Element::new("h2")
                .class("accordion-header")
                .id(heading_id.as_str())
                .child(button),
        )
        .child(
            Element::new("div")
                .id(collapse_id.as_str())
                .class("accordion-collapse collapse")
                .attr("aria-labelledby", heading_id)
                .child(Element::new("div").class("accordion-body").children(body)),
        )
}

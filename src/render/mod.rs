//! Purpose: Render a decoded post body into linear markdown.
//! Exports: `render_markdown`, `render_markdown_with`, `render_paragraph`, `post_page_url`.
//! Role: Last stage of the pipeline (raw JSON -> typed tree -> markdown).
//! Invariants: Flat bodies are returned verbatim; article bodies render block by block.
//! Invariants: Unknown blocks and embeds become visible placeholders, never dropped.
//! Invariants: A `url_embed` block whose id is missing from `urlEmbedMap` is a `Render` error.
mod annotate;

pub use annotate::render_paragraph;

use crate::core::diag::Diagnostics;
use crate::core::error::{Error, ErrorKind};
use crate::model::body::{ArticleBlock, PostBody, UrlEmbed};

/// Public page of a post, `https://<creatorId>.fanbox.cc/posts/<postId>`.
pub fn post_page_url(creator_id: &str, post_id: &str) -> String {
    format!("https://{creator_id}.fanbox.cc/posts/{post_id}")
}

pub fn render_markdown(body: &PostBody, creator_id: &str) -> Result<String, Error> {
    let mut diags = Diagnostics::new();
    render_markdown_with(body, creator_id, &mut diags)
}

/// Like `render_markdown`, collecting span/style diagnostics into `diags`.
pub fn render_markdown_with(
    body: &PostBody,
    creator_id: &str,
    diags: &mut Diagnostics,
) -> Result<String, Error> {
    let Some(blocks) = body.blocks.as_present() else {
        return Ok(body.text.as_present().cloned().unwrap_or_default());
    };

    let mut out = String::new();
    for (idx, block) in blocks.iter().enumerate() {
        render_block(block, body, creator_id, &mut out, diags)
            .map_err(|err| err.with_field(idx.to_string()).with_field("blocks"))?;
    }
    Ok(out)
}

fn render_block(
    block: &ArticleBlock,
    body: &PostBody,
    creator_id: &str,
    out: &mut String,
    diags: &mut Diagnostics,
) -> Result<(), Error> {
    match block {
        ArticleBlock::Paragraph(paragraph) => {
            let styles = paragraph.styles.as_present().map(Vec::as_slice).unwrap_or(&[]);
            let links = paragraph.links.as_present().map(Vec::as_slice).unwrap_or(&[]);
            out.push_str(&render_paragraph(&paragraph.text, styles, links, diags));
            out.push_str("\n\n");
        }
        ArticleBlock::Header(header) => {
            out.push_str("\n\n### ");
            out.push_str(&header.text);
            out.push_str("\n\n");
        }
        ArticleBlock::Image(image) => {
            out.push_str(&format!("{{image:{}}}\n\n", image.image_id));
        }
        ArticleBlock::File(file) => {
            out.push_str(&format!("{{file:{}}}\n\n", file.file_id));
        }
        ArticleBlock::UrlEmbed(block) => {
            render_embed(&block.url_embed_id, body, creator_id, out)?;
        }
        ArticleBlock::Unknown(variant) => {
            out.push_str(&format!("{{unknown_block:{}}}\n\n", variant.type_name()));
        }
    }
    Ok(())
}

fn render_embed(
    embed_id: &str,
    body: &PostBody,
    creator_id: &str,
    out: &mut String,
) -> Result<(), Error> {
    let embed = body
        .url_embed_map
        .as_present()
        .and_then(|embeds| embeds.get(embed_id))
        .ok_or_else(|| {
            Error::new(ErrorKind::Render)
                .with_node("UrlEmbedBlock")
                .with_message(format!("url embed `{embed_id}` is not in urlEmbedMap"))
                .with_hint("The post body references an embed the response did not include.")
        })?;

    match embed {
        UrlEmbed::Generic(generic) => {
            let label = generic
                .host
                .as_present()
                .map(String::as_str)
                .unwrap_or(generic.url.as_str());
            push_link(out, label, generic.url.as_str());
        }
        UrlEmbed::RawHtml(html) | UrlEmbed::HtmlCard(html) => {
            out.push_str(&html.html);
            out.push_str("\n\n");
        }
        UrlEmbed::Creator(creator) => {
            let profile = &creator.profile;
            let label = profile
                .user
                .as_present()
                .and_then(|user| user.name.as_present())
                .map(String::as_str)
                .unwrap_or(profile.creator_id.as_str());
            push_link(out, label, &profile.page_url());
        }
        UrlEmbed::Post(post) => {
            let info = &post.post_info;
            let label = info
                .title
                .as_present()
                .map(String::as_str)
                .unwrap_or(info.id.as_str());
            push_link(out, label, &post_page_url(creator_id, &info.id));
        }
        UrlEmbed::Unknown(variant) => {
            out.push_str(&format!(
                "{{url_embed:{}:{}}}\n\n",
                variant.type_name(),
                embed_id
            ));
        }
    }
    Ok(())
}

fn push_link(out: &mut String, label: &str, url: &str) {
    out.push_str(&format!("[{label}]({url})\n\n"));
}

#[cfg(test)]
mod tests {
    use super::{post_page_url, render_markdown};
    use crate::model::body::PostBody;
    use crate::model::user::creator_page_url;

    #[test]
    fn flat_body_is_returned_verbatim() {
        let body = PostBody::flat("line one\n**not parsed**");
        assert_eq!(
            render_markdown(&body, "anyone").expect("render"),
            "line one\n**not parsed**"
        );
        assert_eq!(render_markdown(&PostBody::default(), "anyone").expect("render"), "");
    }

    #[test]
    fn page_urls_use_creator_subdomain() {
        assert_eq!(creator_page_url("mika"), "https://mika.fanbox.cc/");
        assert_eq!(post_page_url("mika", "42"), "https://mika.fanbox.cc/posts/42");
    }
}

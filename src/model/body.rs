//! Purpose: Post body nodes: flat text/media bodies and structured article blocks.
//! Exports: `PostBody`, `ArticleBlock` and its variants, `StyleSpan`, `LinkSpan`,
//! `UrlEmbed` and its variants, `ImageAsset`, `FileAsset`.
//! Role: Input of the markdown renderer.
//! Invariants: `ArticleBlock` and `UrlEmbed` resolve through static variant tables;
//! unknown discriminants become `Unknown` and never fail the decode.
use crate::core::decode::{Decode, Extra, ObjectReader};
use crate::core::diag::Diagnostics;
use crate::core::encode::{Encode, ObjectWriter};
use crate::core::enums::Coerced;
use crate::core::error::Error;
use crate::core::field::{Field, WebUrl};
use crate::core::resolve::{TaggedUnion, UnknownVariant, VariantTable, resolve, tag};
use crate::model::enums::ParagraphStyle;
use crate::model::post::EmbedPostInfo;
use crate::model::user::Creator;
use serde_json::Value;
use std::collections::BTreeMap;

const DISCRIMINANT: &str = "type";

#[derive(Clone, Debug, PartialEq)]
pub struct ImageAsset {
    pub id: String,
    pub extension: Field<String>,
    pub width: Field<i64>,
    pub height: Field<i64>,
    pub original_url: Field<WebUrl>,
    pub thumbnail_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for ImageAsset {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ImageAsset", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            extension: obj.optional("extension")?,
            width: obj.optional("width")?,
            height: obj.optional("height")?,
            original_url: obj.optional("originalUrl")?,
            thumbnail_url: obj.optional("thumbnailUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for ImageAsset {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("extension", &self.extension)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("originalUrl", &self.original_url)
            .field("thumbnailUrl", &self.thumbnail_url)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileAsset {
    pub id: String,
    pub name: Field<String>,
    pub extension: Field<String>,
    pub size: Field<i64>,
    pub url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for FileAsset {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("FileAsset", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            name: obj.optional("name")?,
            extension: obj.optional("extension")?,
            size: obj.optional("size")?,
            url: obj.optional("url")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for FileAsset {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("size", &self.size)
            .field("url", &self.url)
            .finish(&self.extra)
    }
}

/// Style annotation over `[offset, offset + length)` of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSpan {
    pub style: Field<Coerced<ParagraphStyle>>,
    pub offset: u64,
    pub length: u64,
    pub extra: Extra,
}

impl StyleSpan {
    pub fn bold(offset: u64, length: u64) -> Self {
        Self {
            style: Field::Present(Coerced::Known(ParagraphStyle::Bold)),
            offset,
            length,
            extra: Extra::new(),
        }
    }
}

impl Decode for StyleSpan {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("StyleSpan", value, diags)?;
        Ok(Self {
            style: obj.enumeration("type"),
            offset: obj.required("offset")?,
            length: obj.required("length")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for StyleSpan {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("type", &self.style)
            .value("offset", &self.offset)
            .value("length", &self.length)
            .finish(&self.extra)
    }
}

/// Hyperlink annotation over `[offset, offset + length)` of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSpan {
    pub offset: u64,
    pub length: u64,
    pub url: WebUrl,
    pub extra: Extra,
}

impl LinkSpan {
    pub fn new(offset: u64, length: u64, url: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            url: WebUrl::new(url),
            extra: Extra::new(),
        }
    }
}

impl Decode for LinkSpan {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("LinkSpan", value, diags)?;
        Ok(Self {
            offset: obj.required("offset")?,
            length: obj.required("length")?,
            url: obj.required("url")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for LinkSpan {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("offset", &self.offset)
            .value("length", &self.length)
            .value("url", &self.url)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphBlock {
    pub text: String,
    pub styles: Field<Vec<StyleSpan>>,
    pub links: Field<Vec<LinkSpan>>,
    pub extra: Extra,
}

impl ParagraphBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Field::Absent,
            links: Field::Absent,
            extra: Extra::new(),
        }
    }

    pub fn with_styles(mut self, styles: Vec<StyleSpan>) -> Self {
        self.styles = Field::Present(styles);
        self
    }

    pub fn with_links(mut self, links: Vec<LinkSpan>) -> Self {
        self.links = Field::Present(links);
        self
    }
}

impl Decode for ParagraphBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ParagraphBlock", value, diags)?;
        Ok(Self {
            text: obj.required("text")?,
            styles: obj.optional("styles")?,
            links: obj.optional("links")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for ParagraphBlock {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("text", &self.text)
            .field("styles", &self.styles)
            .field("links", &self.links)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderBlock {
    pub text: String,
    pub extra: Extra,
}

impl Decode for HeaderBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("HeaderBlock", value, diags)?;
        Ok(Self {
            text: obj.required("text")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for HeaderBlock {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("text", &self.text)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    pub image_id: String,
    pub extra: Extra,
}

impl Decode for ImageBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ImageBlock", value, diags)?;
        Ok(Self {
            image_id: obj.required("imageId")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for ImageBlock {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("imageId", &self.image_id)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileBlock {
    pub file_id: String,
    pub extra: Extra,
}

impl Decode for FileBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("FileBlock", value, diags)?;
        Ok(Self {
            file_id: obj.required("fileId")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for FileBlock {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("fileId", &self.file_id)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UrlEmbedBlock {
    pub url_embed_id: String,
    pub extra: Extra,
}

impl Decode for UrlEmbedBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("UrlEmbedBlock", value, diags)?;
        Ok(Self {
            url_embed_id: obj.required("urlEmbedId")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for UrlEmbedBlock {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("urlEmbedId", &self.url_embed_id)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArticleBlock {
    Paragraph(ParagraphBlock),
    Header(HeaderBlock),
    Image(ImageBlock),
    File(FileBlock),
    UrlEmbed(UrlEmbedBlock),
    Unknown(UnknownVariant),
}

fn paragraph_block(value: Value, diags: &mut Diagnostics) -> Result<ArticleBlock, Error> {
    ParagraphBlock::decode(value, diags).map(ArticleBlock::Paragraph)
}

fn header_block(value: Value, diags: &mut Diagnostics) -> Result<ArticleBlock, Error> {
    HeaderBlock::decode(value, diags).map(ArticleBlock::Header)
}

fn image_block(value: Value, diags: &mut Diagnostics) -> Result<ArticleBlock, Error> {
    ImageBlock::decode(value, diags).map(ArticleBlock::Image)
}

fn file_block(value: Value, diags: &mut Diagnostics) -> Result<ArticleBlock, Error> {
    FileBlock::decode(value, diags).map(ArticleBlock::File)
}

fn url_embed_block(value: Value, diags: &mut Diagnostics) -> Result<ArticleBlock, Error> {
    UrlEmbedBlock::decode(value, diags).map(ArticleBlock::UrlEmbed)
}

static ARTICLE_BLOCKS: VariantTable<ArticleBlock> = VariantTable {
    union: "ArticleBlock",
    discriminant: DISCRIMINANT,
    variants: &[
        ("p", paragraph_block),
        ("header", header_block),
        ("image", image_block),
        ("file", file_block),
        ("url_embed", url_embed_block),
    ],
};

impl TaggedUnion for ArticleBlock {
    fn table() -> &'static VariantTable<Self> {
        &ARTICLE_BLOCKS
    }

    fn unknown(variant: UnknownVariant) -> Self {
        ArticleBlock::Unknown(variant)
    }
}

impl Decode for ArticleBlock {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        resolve(value, diags)
    }
}

impl Encode for ArticleBlock {
    fn encode(&self) -> Value {
        match self {
            ArticleBlock::Paragraph(block) => tag(DISCRIMINANT, "p", block.encode()),
            ArticleBlock::Header(block) => tag(DISCRIMINANT, "header", block.encode()),
            ArticleBlock::Image(block) => tag(DISCRIMINANT, "image", block.encode()),
            ArticleBlock::File(block) => tag(DISCRIMINANT, "file", block.encode()),
            ArticleBlock::UrlEmbed(block) => tag(DISCRIMINANT, "url_embed", block.encode()),
            ArticleBlock::Unknown(variant) => Value::Object(variant.raw.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenericEmbed {
    pub id: String,
    pub url: WebUrl,
    pub host: Field<String>,
    pub extra: Extra,
}

impl Decode for GenericEmbed {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("GenericEmbed", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            url: obj.required("url")?,
            host: obj.optional("host")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for GenericEmbed {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .value("url", &self.url)
            .field("host", &self.host)
            .finish(&self.extra)
    }
}

/// Shared shape of the `html` and `html.card` embeds.
#[derive(Clone, Debug, PartialEq)]
pub struct HtmlEmbed {
    pub id: String,
    pub html: String,
    pub extra: Extra,
}

impl Decode for HtmlEmbed {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("HtmlEmbed", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            html: obj.required("html")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for HtmlEmbed {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .value("html", &self.html)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatorEmbed {
    pub id: String,
    pub profile: Creator,
    pub extra: Extra,
}

impl Decode for CreatorEmbed {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("CreatorEmbed", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            profile: obj.required("profile")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for CreatorEmbed {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .value("profile", &self.profile)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostEmbed {
    pub id: String,
    pub post_info: EmbedPostInfo,
    pub extra: Extra,
}

impl Decode for PostEmbed {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PostEmbed", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            post_info: obj.required("postInfo")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PostEmbed {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .value("postInfo", &self.post_info)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UrlEmbed {
    Generic(GenericEmbed),
    RawHtml(HtmlEmbed),
    HtmlCard(HtmlEmbed),
    Creator(CreatorEmbed),
    Post(PostEmbed),
    Unknown(UnknownVariant),
}

fn generic_embed(value: Value, diags: &mut Diagnostics) -> Result<UrlEmbed, Error> {
    GenericEmbed::decode(value, diags).map(UrlEmbed::Generic)
}

fn raw_html_embed(value: Value, diags: &mut Diagnostics) -> Result<UrlEmbed, Error> {
    HtmlEmbed::decode(value, diags).map(UrlEmbed::RawHtml)
}

fn html_card_embed(value: Value, diags: &mut Diagnostics) -> Result<UrlEmbed, Error> {
    HtmlEmbed::decode(value, diags).map(UrlEmbed::HtmlCard)
}

fn creator_embed(value: Value, diags: &mut Diagnostics) -> Result<UrlEmbed, Error> {
    CreatorEmbed::decode(value, diags).map(UrlEmbed::Creator)
}

fn post_embed(value: Value, diags: &mut Diagnostics) -> Result<UrlEmbed, Error> {
    PostEmbed::decode(value, diags).map(UrlEmbed::Post)
}

static URL_EMBEDS: VariantTable<UrlEmbed> = VariantTable {
    union: "UrlEmbed",
    discriminant: DISCRIMINANT,
    variants: &[
        ("default", generic_embed),
        ("html", raw_html_embed),
        ("html.card", html_card_embed),
        ("fanbox.creator", creator_embed),
        ("fanbox.post", post_embed),
    ],
};

impl TaggedUnion for UrlEmbed {
    fn table() -> &'static VariantTable<Self> {
        &URL_EMBEDS
    }

    fn unknown(variant: UnknownVariant) -> Self {
        UrlEmbed::Unknown(variant)
    }
}

impl Decode for UrlEmbed {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        resolve(value, diags)
    }
}

impl Encode for UrlEmbed {
    fn encode(&self) -> Value {
        match self {
            UrlEmbed::Generic(embed) => tag(DISCRIMINANT, "default", embed.encode()),
            UrlEmbed::RawHtml(embed) => tag(DISCRIMINANT, "html", embed.encode()),
            UrlEmbed::HtmlCard(embed) => tag(DISCRIMINANT, "html.card", embed.encode()),
            UrlEmbed::Creator(embed) => tag(DISCRIMINANT, "fanbox.creator", embed.encode()),
            UrlEmbed::Post(embed) => tag(DISCRIMINANT, "fanbox.post", embed.encode()),
            UrlEmbed::Unknown(variant) => Value::Object(variant.raw.clone()),
        }
    }
}

/// Body of a post: flat (`text`, `images`, `files`) or an article (`blocks` + side maps).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostBody {
    pub text: Field<String>,
    pub files: Field<Vec<FileAsset>>,
    pub images: Field<Vec<ImageAsset>>,
    pub blocks: Field<Vec<ArticleBlock>>,
    pub image_map: Field<BTreeMap<String, ImageAsset>>,
    pub file_map: Field<BTreeMap<String, FileAsset>>,
    /// Legacy embed map; its shape is undocumented, so it stays raw.
    pub embed_map: Field<Value>,
    pub url_embed_map: Field<BTreeMap<String, UrlEmbed>>,
    pub extra: Extra,
}

impl PostBody {
    pub fn flat(text: impl Into<String>) -> Self {
        Self {
            text: Field::Present(text.into()),
            ..Self::default()
        }
    }

    pub fn article(blocks: Vec<ArticleBlock>) -> Self {
        Self {
            blocks: Field::Present(blocks),
            ..Self::default()
        }
    }

    pub fn with_url_embeds(mut self, embeds: BTreeMap<String, UrlEmbed>) -> Self {
        self.url_embed_map = Field::Present(embeds);
        self
    }

    pub fn is_article(&self) -> bool {
        self.blocks.as_present().is_some()
    }
}

impl Decode for PostBody {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PostBody", value, diags)?;
        Ok(Self {
            text: obj.optional("text")?,
            files: obj.optional("files")?,
            images: obj.optional("images")?,
            blocks: obj.optional("blocks")?,
            image_map: obj.optional("imageMap")?,
            file_map: obj.optional("fileMap")?,
            embed_map: obj.optional("embedMap")?,
            url_embed_map: obj.optional("urlEmbedMap")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PostBody {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("text", &self.text)
            .field("files", &self.files)
            .field("images", &self.images)
            .field("blocks", &self.blocks)
            .field("imageMap", &self.image_map)
            .field("fileMap", &self.file_map)
            .field("embedMap", &self.embed_map)
            .field("urlEmbedMap", &self.url_embed_map)
            .finish(&self.extra)
    }
}

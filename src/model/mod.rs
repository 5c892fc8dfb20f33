// Typed nodes for API payloads; every node keeps undeclared keys in `extra`.
pub mod body;
pub mod enums;
pub mod post;
pub mod response;
pub mod user;

pub use body::{
    ArticleBlock, CreatorEmbed, FileAsset, FileBlock, GenericEmbed, HeaderBlock, HtmlEmbed,
    ImageAsset, ImageBlock, LinkSpan, ParagraphBlock, PostBody, PostEmbed, StyleSpan, UrlEmbed,
    UrlEmbedBlock,
};
pub use enums::{CoverType, ParagraphStyle, PaymentMethod, PostType};
pub use post::{
    CommentItem, CommentList, Cover, EmbedPostInfo, PostInfo, PostItem, PostListCreator,
    ShortPostInfo,
};
pub use response::ApiResponse;
pub use user::{BellCount, Creator, Payment, PaymentCreator, Plan, ProfileItem, Tag, User};

//! Post-side nodes: list items, full post info, embedded post summaries, comments.
use crate::core::decode::{Decode, Extra, ObjectReader};
use crate::core::diag::Diagnostics;
use crate::core::encode::{Encode, ObjectWriter};
use crate::core::enums::Coerced;
use crate::core::error::Error;
use crate::core::field::{Field, Timestamp, WebUrl};
use crate::model::body::PostBody;
use crate::model::enums::{CoverType, PostType};
use crate::model::user::User;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
    pub kind: Field<Coerced<CoverType>>,
    pub url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for Cover {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("Cover", value, diags)?;
        Ok(Self {
            kind: obj.enumeration("type"),
            url: obj.optional("url")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for Cover {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("type", &self.kind)
            .field("url", &self.url)
            .finish(&self.extra)
    }
}

/// Entry of `post.listCreator`.
#[derive(Clone, Debug, PartialEq)]
pub struct PostItem {
    pub id: String,
    pub title: Field<String>,
    pub fee_required: Field<i64>,
    pub published_datetime: Field<Timestamp>,
    pub updated_datetime: Field<Timestamp>,
    pub tags: Field<Vec<String>>,
    pub is_liked: Field<bool>,
    pub like_count: Field<i64>,
    pub comment_count: Field<i64>,
    pub is_restricted: Field<bool>,
    pub user: Field<User>,
    pub creator_id: String,
    pub has_adult_content: Field<bool>,
    pub cover: Field<Cover>,
    pub excerpt: Field<String>,
    pub extra: Extra,
}

impl PostItem {
    /// Restricted posts are the ones the session cannot read; unknown counts as browsable.
    pub fn is_browsable(&self) -> bool {
        !matches!(self.is_restricted, Field::Present(true))
    }
}

impl Decode for PostItem {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PostItem", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            title: obj.optional("title")?,
            fee_required: obj.optional("feeRequired")?,
            published_datetime: obj.optional("publishedDatetime")?,
            updated_datetime: obj.optional("updatedDatetime")?,
            tags: obj.optional("tags")?,
            is_liked: obj.optional("isLiked")?,
            like_count: obj.optional("likeCount")?,
            comment_count: obj.optional("commentCount")?,
            is_restricted: obj.optional("isRestricted")?,
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            has_adult_content: obj.optional("hasAdultContent")?,
            cover: obj.optional("cover")?,
            excerpt: obj.optional("excerpt")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PostItem {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("title", &self.title)
            .field("feeRequired", &self.fee_required)
            .field("publishedDatetime", &self.published_datetime)
            .field("updatedDatetime", &self.updated_datetime)
            .field("tags", &self.tags)
            .field("isLiked", &self.is_liked)
            .field("likeCount", &self.like_count)
            .field("commentCount", &self.comment_count)
            .field("isRestricted", &self.is_restricted)
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("hasAdultContent", &self.has_adult_content)
            .field("cover", &self.cover)
            .field("excerpt", &self.excerpt)
            .finish(&self.extra)
    }
}

/// Body of `post.listCreator`.
#[derive(Clone, Debug, PartialEq)]
pub struct PostListCreator {
    pub items: Field<Vec<PostItem>>,
    pub next_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for PostListCreator {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PostListCreator", value, diags)?;
        Ok(Self {
            items: obj.optional("items")?,
            next_url: obj.optional("nextUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PostListCreator {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("items", &self.items)
            .field("nextUrl", &self.next_url)
            .finish(&self.extra)
    }
}

/// Neighbour link (`nextPost`/`prevPost`) of a post.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortPostInfo {
    pub id: String,
    pub title: Field<String>,
    pub published_datetime: Field<Timestamp>,
    pub extra: Extra,
}

impl Decode for ShortPostInfo {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ShortPostInfo", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            title: obj.optional("title")?,
            published_datetime: obj.optional("publishedDatetime")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for ShortPostInfo {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("title", &self.title)
            .field("publishedDatetime", &self.published_datetime)
            .finish(&self.extra)
    }
}

/// A comment and, recursively, its replies.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentItem {
    pub id: String,
    pub parent_comment_id: Field<String>,
    pub root_comment_id: Field<String>,
    pub body: Field<String>,
    pub created_datetime: Field<Timestamp>,
    pub like_count: Field<i64>,
    pub is_liked: Field<bool>,
    pub is_own: Field<bool>,
    pub user: Field<User>,
    pub replies: Field<Vec<CommentItem>>,
    pub extra: Extra,
}

impl CommentItem {
    /// Number of comments in this subtree, the comment itself included.
    pub fn thread_len(&self) -> usize {
        1 + self
            .replies
            .as_present()
            .map(|replies| replies.iter().map(CommentItem::thread_len).sum())
            .unwrap_or(0)
    }
}

impl Decode for CommentItem {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("CommentItem", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            parent_comment_id: obj.optional("parentCommentId")?,
            root_comment_id: obj.optional("rootCommentId")?,
            body: obj.optional("body")?,
            created_datetime: obj.optional("createdDatetime")?,
            like_count: obj.optional("likeCount")?,
            is_liked: obj.optional("isLiked")?,
            is_own: obj.optional("isOwn")?,
            user: obj.optional("user")?,
            replies: obj.optional("replies")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for CommentItem {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("parentCommentId", &self.parent_comment_id)
            .field("rootCommentId", &self.root_comment_id)
            .field("body", &self.body)
            .field("createdDatetime", &self.created_datetime)
            .field("likeCount", &self.like_count)
            .field("isLiked", &self.is_liked)
            .field("isOwn", &self.is_own)
            .field("user", &self.user)
            .field("replies", &self.replies)
            .finish(&self.extra)
    }
}

/// Body of `post.listComments`, also embedded in `PostInfo.commentList`.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentList {
    pub items: Field<Vec<CommentItem>>,
    pub next_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for CommentList {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("CommentList", value, diags)?;
        Ok(Self {
            items: obj.optional("items")?,
            next_url: obj.optional("nextUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for CommentList {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("items", &self.items)
            .field("nextUrl", &self.next_url)
            .finish(&self.extra)
    }
}

/// Body of `post.info`.
#[derive(Clone, Debug, PartialEq)]
pub struct PostInfo {
    pub id: String,
    pub title: Field<String>,
    pub fee_required: Field<i64>,
    pub published_datetime: Field<Timestamp>,
    pub updated_datetime: Field<Timestamp>,
    pub kind: Field<Coerced<PostType>>,
    pub cover_image_url: Field<WebUrl>,
    /// Null when the session may not read the post.
    pub body: Field<PostBody>,
    pub tags: Field<Vec<String>>,
    pub excerpt: Field<String>,
    pub is_liked: Field<bool>,
    pub like_count: Field<i64>,
    pub comment_count: Field<i64>,
    pub restricted_for: Field<i64>,
    pub is_restricted: Field<bool>,
    pub user: Field<User>,
    pub creator_id: String,
    pub has_adult_content: Field<bool>,
    pub comment_list: Field<CommentList>,
    pub next_post: Field<ShortPostInfo>,
    pub prev_post: Field<ShortPostInfo>,
    pub image_for_share: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for PostInfo {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PostInfo", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            title: obj.optional("title")?,
            fee_required: obj.optional("feeRequired")?,
            published_datetime: obj.optional("publishedDatetime")?,
            updated_datetime: obj.optional("updatedDatetime")?,
            kind: obj.enumeration("type"),
            cover_image_url: obj.optional("coverImageUrl")?,
            body: obj.optional("body")?,
            tags: obj.optional("tags")?,
            excerpt: obj.optional("excerpt")?,
            is_liked: obj.optional("isLiked")?,
            like_count: obj.optional("likeCount")?,
            comment_count: obj.optional("commentCount")?,
            restricted_for: obj.optional("restrictedFor")?,
            is_restricted: obj.optional("isRestricted")?,
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            has_adult_content: obj.optional("hasAdultContent")?,
            comment_list: obj.optional("commentList")?,
            next_post: obj.optional("nextPost")?,
            prev_post: obj.optional("prevPost")?,
            image_for_share: obj.optional("imageForShare")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PostInfo {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("title", &self.title)
            .field("feeRequired", &self.fee_required)
            .field("publishedDatetime", &self.published_datetime)
            .field("updatedDatetime", &self.updated_datetime)
            .field("type", &self.kind)
            .field("coverImageUrl", &self.cover_image_url)
            .field("body", &self.body)
            .field("tags", &self.tags)
            .field("excerpt", &self.excerpt)
            .field("isLiked", &self.is_liked)
            .field("likeCount", &self.like_count)
            .field("commentCount", &self.comment_count)
            .field("restrictedFor", &self.restricted_for)
            .field("isRestricted", &self.is_restricted)
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("hasAdultContent", &self.has_adult_content)
            .field("commentList", &self.comment_list)
            .field("nextPost", &self.next_post)
            .field("prevPost", &self.prev_post)
            .field("imageForShare", &self.image_for_share)
            .finish(&self.extra)
    }
}

/// Summary of another post carried by a `fanbox.post` embed.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbedPostInfo {
    pub id: String,
    pub title: Field<String>,
    pub fee_required: Field<i64>,
    pub published_datetime: Field<Timestamp>,
    pub updated_datetime: Field<Timestamp>,
    pub tags: Field<Vec<String>>,
    pub excerpt: Field<String>,
    pub is_liked: Field<bool>,
    pub like_count: Field<i64>,
    pub comment_count: Field<i64>,
    pub restricted_for: Field<i64>,
    pub is_restricted: Field<bool>,
    pub user: Field<User>,
    pub creator_id: String,
    pub has_adult_content: Field<bool>,
    pub cover: Field<Cover>,
    pub extra: Extra,
}

impl Decode for EmbedPostInfo {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("EmbedPostInfo", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            title: obj.optional("title")?,
            fee_required: obj.optional("feeRequired")?,
            published_datetime: obj.optional("publishedDatetime")?,
            updated_datetime: obj.optional("updatedDatetime")?,
            tags: obj.optional("tags")?,
            excerpt: obj.optional("excerpt")?,
            is_liked: obj.optional("isLiked")?,
            like_count: obj.optional("likeCount")?,
            comment_count: obj.optional("commentCount")?,
            restricted_for: obj.optional("restrictedFor")?,
            is_restricted: obj.optional("isRestricted")?,
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            has_adult_content: obj.optional("hasAdultContent")?,
            cover: obj.optional("cover")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for EmbedPostInfo {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("title", &self.title)
            .field("feeRequired", &self.fee_required)
            .field("publishedDatetime", &self.published_datetime)
            .field("updatedDatetime", &self.updated_datetime)
            .field("tags", &self.tags)
            .field("excerpt", &self.excerpt)
            .field("isLiked", &self.is_liked)
            .field("likeCount", &self.like_count)
            .field("commentCount", &self.comment_count)
            .field("restrictedFor", &self.restricted_for)
            .field("isRestricted", &self.is_restricted)
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("hasAdultContent", &self.has_adult_content)
            .field("cover", &self.cover)
            .finish(&self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentList, Cover, PostItem, PostListCreator};
    use crate::core::decode::decode;
    use crate::core::encode::encode;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn comment_replies_nest_without_limit() {
        let raw = json!({
            "items": [{
                "id": "c1",
                "body": "root",
                "replies": [{
                    "id": "c2",
                    "parentCommentId": "c1",
                    "rootCommentId": "c1",
                    "replies": [{"id": "c3", "parentCommentId": "c2", "rootCommentId": "c1"}]
                }]
            }],
            "nextUrl": null
        });
        let decoded = decode::<CommentList>(raw.clone()).expect("comments");
        let items = decoded.node.items.as_present().expect("items");
        assert_eq!(items[0].thread_len(), 3);
        assert!(decoded.node.next_url.is_null());
        assert_eq!(encode(&decoded.node), raw);
    }

    #[test]
    fn nested_reply_error_carries_full_path() {
        let raw = json!({"items": [{"id": "c1", "replies": [{"body": "orphan"}]}]});
        let err = decode::<CommentList>(raw).expect_err("reply without id");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field().as_deref(), Some("items.0.replies.0.id"));
        assert_eq!(err.node(), Some("CommentItem"));
    }

    #[test]
    fn restricted_flag_drives_browsability() {
        let open = decode::<PostItem>(json!({"id": "1", "creatorId": "c", "isRestricted": false}))
            .expect("post");
        let locked = decode::<PostItem>(json!({"id": "2", "creatorId": "c", "isRestricted": true}))
            .expect("post");
        let unknown = decode::<PostItem>(json!({"id": "3", "creatorId": "c"})).expect("post");
        assert!(open.node.is_browsable());
        assert!(!locked.node.is_browsable());
        assert!(unknown.node.is_browsable());
    }

    #[test]
    fn list_and_cover_fields_may_be_missing() {
        let cover = decode::<Cover>(json!({"type": "cover_image"})).expect("cover");
        assert!(cover.node.url.is_absent());
        assert_eq!(encode(&cover.node), json!({"type": "cover_image"}));

        let list = decode::<PostListCreator>(json!({"nextUrl": null})).expect("post list");
        assert!(list.node.items.is_absent());
        assert!(list.node.next_url.is_null());

        let comments = decode::<CommentList>(json!({})).expect("comments");
        assert!(comments.node.items.is_absent());
    }
}

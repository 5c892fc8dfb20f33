//! The `{ "body": ... }` envelope shared by every endpoint, plus per-endpoint aliases.
use crate::core::decode::{Decode, Extra, ObjectReader};
use crate::core::diag::Diagnostics;
use crate::core::encode::{Encode, ObjectWriter};
use crate::core::error::Error;
use crate::core::field::WebUrl;
use crate::model::post::{CommentList, PostInfo, PostListCreator};
use crate::model::user::{BellCount, Creator, Payment, Plan, Tag};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<B> {
    pub body: B,
    pub extra: Extra,
}

impl<B: Decode> Decode for ApiResponse<B> {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ApiResponse", value, diags)?;
        Ok(Self {
            body: obj.required("body")?,
            extra: obj.finish(),
        })
    }
}

impl<B: Encode> Encode for ApiResponse<B> {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("body", &self.body)
            .finish(&self.extra)
    }
}

pub type PostPaginateResponse = ApiResponse<Vec<WebUrl>>;
pub type PostListCreatorResponse = ApiResponse<PostListCreator>;
pub type PostInfoResponse = ApiResponse<PostInfo>;
pub type CommentListResponse = ApiResponse<CommentList>;
pub type CreatorResponse = ApiResponse<Creator>;
pub type CreatorListResponse = ApiResponse<Vec<Creator>>;
pub type PlanListResponse = ApiResponse<Vec<Plan>>;
pub type TagListResponse = ApiResponse<Vec<Tag>>;
pub type BellCountResponse = ApiResponse<BellCount>;
pub type CountResponse = ApiResponse<i64>;
pub type PaymentListResponse = ApiResponse<Vec<Payment>>;

#[cfg(test)]
mod tests {
    use super::{CountResponse, PostPaginateResponse};
    use crate::core::decode::decode;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn scalar_and_list_bodies_decode() {
        let count = decode::<CountResponse>(json!({"body": 4})).expect("count");
        assert_eq!(count.node.body, 4);

        let pages = decode::<PostPaginateResponse>(json!({
            "body": ["https://api.fanbox.cc/post.listCreator?creatorId=a&limit=10"]
        }))
        .expect("pages");
        assert_eq!(pages.node.body.len(), 1);
    }

    #[test]
    fn missing_body_is_schema_error() {
        let err = decode::<CountResponse>(json!({"error": "general_error"})).expect_err("no body");
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field().as_deref(), Some("body"));
    }
}

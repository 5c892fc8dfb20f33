//! Account-side nodes: users, creators, plans, tags, payments, and counters.
use crate::core::decode::{Decode, Extra, ObjectReader};
use crate::core::diag::Diagnostics;
use crate::core::encode::{Encode, ObjectWriter};
use crate::core::enums::Coerced;
use crate::core::error::Error;
use crate::core::field::{Field, Timestamp, WebUrl};
use crate::model::enums::PaymentMethod;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub user_id: String,
    pub name: Field<String>,
    pub icon_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for User {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("User", value, diags)?;
        Ok(Self {
            user_id: obj.required("userId")?,
            name: obj.optional("name")?,
            icon_url: obj.optional("iconUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for User {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("userId", &self.user_id)
            .field("name", &self.name)
            .field("iconUrl", &self.icon_url)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileItem {
    pub id: String,
    pub kind: Field<String>,
    pub image_url: Field<WebUrl>,
    pub thumbnail_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for ProfileItem {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("ProfileItem", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            kind: obj.optional("type")?,
            image_url: obj.optional("imageUrl")?,
            thumbnail_url: obj.optional("thumbnailUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for ProfileItem {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("type", &self.kind)
            .field("imageUrl", &self.image_url)
            .field("thumbnailUrl", &self.thumbnail_url)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Creator {
    pub user: Field<User>,
    pub creator_id: String,
    pub description: Field<String>,
    pub has_adult_content: Field<bool>,
    pub cover_image_url: Field<WebUrl>,
    pub profile_links: Field<Vec<WebUrl>>,
    pub profile_items: Field<Vec<ProfileItem>>,
    pub is_followed: Field<bool>,
    pub is_supported: Field<bool>,
    pub is_stopped: Field<bool>,
    pub is_accepting_request: Field<bool>,
    pub has_booth_shop: Field<bool>,
    pub extra: Extra,
}

impl Creator {
    /// Public page of the creator, `https://<creatorId>.fanbox.cc/`.
    pub fn page_url(&self) -> String {
        creator_page_url(&self.creator_id)
    }
}

pub fn creator_page_url(creator_id: &str) -> String {
    format!("https://{creator_id}.fanbox.cc/")
}

impl Decode for Creator {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("Creator", value, diags)?;
        Ok(Self {
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            description: obj.optional("description")?,
            has_adult_content: obj.optional("hasAdultContent")?,
            cover_image_url: obj.optional("coverImageUrl")?,
            profile_links: obj.optional("profileLinks")?,
            profile_items: obj.optional("profileItems")?,
            is_followed: obj.optional("isFollowed")?,
            is_supported: obj.optional("isSupported")?,
            is_stopped: obj.optional("isStopped")?,
            is_accepting_request: obj.optional("isAcceptingRequest")?,
            has_booth_shop: obj.optional("hasBoothShop")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for Creator {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("description", &self.description)
            .field("hasAdultContent", &self.has_adult_content)
            .field("coverImageUrl", &self.cover_image_url)
            .field("profileLinks", &self.profile_links)
            .field("profileItems", &self.profile_items)
            .field("isFollowed", &self.is_followed)
            .field("isSupported", &self.is_supported)
            .field("isStopped", &self.is_stopped)
            .field("isAcceptingRequest", &self.is_accepting_request)
            .field("hasBoothShop", &self.has_booth_shop)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub id: String,
    pub title: Field<String>,
    pub fee: Field<i64>,
    pub description: Field<String>,
    pub cover_image_url: Field<WebUrl>,
    pub user: Field<User>,
    pub creator_id: String,
    pub has_adult_content: Field<bool>,
    pub payment_method: Field<String>,
    pub extra: Extra,
}

impl Decode for Plan {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("Plan", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            title: obj.optional("title")?,
            fee: obj.optional("fee")?,
            description: obj.optional("description")?,
            cover_image_url: obj.optional("coverImageUrl")?,
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            has_adult_content: obj.optional("hasAdultContent")?,
            payment_method: obj.optional("paymentMethod")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for Plan {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("title", &self.title)
            .field("fee", &self.fee)
            .field("description", &self.description)
            .field("coverImageUrl", &self.cover_image_url)
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("hasAdultContent", &self.has_adult_content)
            .field("paymentMethod", &self.payment_method)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub tag: Field<String>,
    pub count: Field<i64>,
    pub cover_image_url: Field<WebUrl>,
    pub extra: Extra,
}

impl Decode for Tag {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("Tag", value, diags)?;
        Ok(Self {
            tag: obj.optional("tag")?,
            count: obj.optional("count")?,
            cover_image_url: obj.optional("coverImageUrl")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for Tag {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("tag", &self.tag)
            .field("count", &self.count)
            .field("coverImageUrl", &self.cover_image_url)
            .finish(&self.extra)
    }
}

/// Body of `bell.countUnread`.
#[derive(Clone, Debug, PartialEq)]
pub struct BellCount {
    pub count: Field<i64>,
    pub extra: Extra,
}

impl Decode for BellCount {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("BellCount", value, diags)?;
        Ok(Self {
            count: obj.optional("count")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for BellCount {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("count", &self.count)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentCreator {
    pub user: Field<User>,
    pub creator_id: String,
    pub is_active: Field<bool>,
    pub extra: Extra,
}

impl Decode for PaymentCreator {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("PaymentCreator", value, diags)?;
        Ok(Self {
            user: obj.optional("user")?,
            creator_id: obj.required("creatorId")?,
            is_active: obj.optional("isActive")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for PaymentCreator {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .field("user", &self.user)
            .value("creatorId", &self.creator_id)
            .field("isActive", &self.is_active)
            .finish(&self.extra)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    pub id: String,
    pub creator: Field<PaymentCreator>,
    pub paid_amount: Field<i64>,
    pub payment_method: Field<Coerced<PaymentMethod>>,
    pub payment_datetime: Field<Timestamp>,
    pub extra: Extra,
}

impl Decode for Payment {
    fn decode(value: Value, diags: &mut Diagnostics) -> Result<Self, Error> {
        let mut obj = ObjectReader::new("Payment", value, diags)?;
        Ok(Self {
            id: obj.required("id")?,
            creator: obj.optional("creator")?,
            paid_amount: obj.optional("paidAmount")?,
            payment_method: obj.enumeration("paymentMethod"),
            payment_datetime: obj.optional("paymentDatetime")?,
            extra: obj.finish(),
        })
    }
}

impl Encode for Payment {
    fn encode(&self) -> Value {
        ObjectWriter::new()
            .value("id", &self.id)
            .field("creator", &self.creator)
            .field("paidAmount", &self.paid_amount)
            .field("paymentMethod", &self.payment_method)
            .field("paymentDatetime", &self.payment_datetime)
            .finish(&self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::{BellCount, Creator, Payment, Tag, User};
    use crate::core::decode::decode;
    use crate::core::diag::DiagnosticKind;
    use crate::core::encode::encode;
    use crate::core::enums::Coerced;
    use crate::core::field::Field;
    use serde_json::json;

    #[test]
    fn user_accepts_null_icon() {
        let decoded = decode::<User>(json!({"userId": "1", "name": "a", "iconUrl": null}))
            .expect("user");
        assert!(decoded.node.icon_url.is_null());
        assert!(decoded.diagnostics.is_empty());
    }

    #[test]
    fn creator_round_trips_with_unknown_keys() {
        let raw = json!({
            "user": {"userId": "9", "name": "Mika", "iconUrl": "https://i/9.png"},
            "creatorId": "mika",
            "description": "hi",
            "profileLinks": ["https://twitter.com/mika"],
            "profileItems": [],
            "isFollowed": false,
            "newBadge": {"label": "new"}
        });
        let decoded = decode::<Creator>(raw.clone()).expect("creator");
        assert_eq!(decoded.node.page_url(), "https://mika.fanbox.cc/");
        assert_eq!(decoded.diagnostics.len(), 1);
        assert_eq!(decoded.diagnostics[0].kind, DiagnosticKind::UnknownField);
        assert_eq!(encode(&decoded.node), raw);
    }

    #[test]
    fn payment_keeps_unknown_method_raw() {
        let decoded = decode::<Payment>(json!({
            "id": "p1",
            "paymentMethod": "convenience_store",
            "paymentDatetime": "2024-05-01T00:00:00+09:00"
        }))
        .expect("payment");
        assert_eq!(
            decoded.node.payment_method,
            Field::Present(Coerced::Raw(json!("convenience_store")))
        );
        assert_eq!(
            decoded.diagnostics[0].kind,
            DiagnosticKind::UnrecognizedEnumValue
        );
    }

    #[test]
    fn tag_and_bell_count_tolerate_missing_fields() {
        let tag = decode::<Tag>(json!({"count": 3})).expect("tag");
        assert!(tag.node.tag.is_absent());
        assert_eq!(tag.node.count, Field::Present(3));
        assert_eq!(encode(&tag.node), json!({"count": 3}));

        let bell = decode::<BellCount>(json!({})).expect("bell");
        assert!(bell.node.count.is_absent());
        assert_eq!(encode(&bell.node), json!({}));
    }
}

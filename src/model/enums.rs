//! Known enumerations of the API; anything else is kept raw via `Coerced::Raw`.
use crate::core::enums::KnownEnum;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoverType {
    CoverImage,
    PostImage,
}

impl KnownEnum for CoverType {
    const NAME: &'static str = "CoverType";

    fn from_wire(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "cover_image" => Some(CoverType::CoverImage),
            "post_image" => Some(CoverType::PostImage),
            _ => None,
        }
    }

    fn to_wire(self) -> Value {
        let text = match self {
            CoverType::CoverImage => "cover_image",
            CoverType::PostImage => "post_image",
        };
        Value::from(text)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParagraphStyle {
    Bold,
}

impl KnownEnum for ParagraphStyle {
    const NAME: &'static str = "ParagraphStyle";

    fn from_wire(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "bold" => Some(ParagraphStyle::Bold),
            _ => None,
        }
    }

    fn to_wire(self) -> Value {
        match self {
            ParagraphStyle::Bold => Value::from("bold"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PostType {
    Image,
    Text,
    File,
    Article,
    Video,
    Entry,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Image => "image",
            PostType::Text => "text",
            PostType::File => "file",
            PostType::Article => "article",
            PostType::Video => "video",
            PostType::Entry => "entry",
        }
    }
}

impl KnownEnum for PostType {
    const NAME: &'static str = "PostType";

    fn from_wire(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "image" => Some(PostType::Image),
            "text" => Some(PostType::Text),
            "file" => Some(PostType::File),
            "article" => Some(PostType::Article),
            "video" => Some(PostType::Video),
            "entry" => Some(PostType::Entry),
            _ => None,
        }
    }

    fn to_wire(self) -> Value {
        Value::from(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaymentMethod {
    Paypal,
}

impl KnownEnum for PaymentMethod {
    const NAME: &'static str = "PaymentMethod";

    fn from_wire(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "paypal" => Some(PaymentMethod::Paypal),
            _ => None,
        }
    }

    fn to_wire(self) -> Value {
        match self {
            PaymentMethod::Paypal => Value::from("paypal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoverType, PostType};
    use crate::core::enums::KnownEnum;
    use serde_json::json;

    #[test]
    fn post_type_wire_names_round_trip() {
        for name in ["image", "text", "file", "article", "video", "entry"] {
            let member = PostType::from_wire(&json!(name)).expect("known post type");
            assert_eq!(member.to_wire(), json!(name));
        }
        assert_eq!(PostType::from_wire(&json!("podcast")), None);
    }

    #[test]
    fn cover_type_rejects_non_strings() {
        assert_eq!(CoverType::from_wire(&json!(1)), None);
        assert_eq!(
            CoverType::from_wire(&json!("post_image")),
            Some(CoverType::PostImage)
        );
    }
}

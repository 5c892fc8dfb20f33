// Core modules implementing schema-tolerant decoding, encoding, and error modeling.
pub mod decode;
pub mod diag;
pub mod encode;
pub mod enums;
pub mod error;
pub mod field;
pub mod resolve;
